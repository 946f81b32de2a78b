use std::fs;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use reqwest::blocking::Client;
use scorecard_tools::config::DOWNLOAD_TIMEOUT;
use scorecard_tools::fetch;
use scorecard_tools::io::http;
use scorecard_tools::model::SourceManifest;
use scorecard_tools::pipeline;
use scorecard_tools::ToolError;
use tempfile::tempdir;

/// Serves `requests` connections: `/files/<name>` answers 200 with a body
/// derived from the name, anything else answers 404.
fn serve(requests: usize) -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("listener bound");
    let address = listener.local_addr().expect("local address");

    let handle = thread::spawn(move || {
        for stream in listener.incoming().take(requests) {
            let mut stream = stream.expect("connection accepted");
            let mut request = Vec::new();
            let mut buffer = [0u8; 1024];
            while !request.windows(4).any(|window| window == b"\r\n\r\n") {
                let read = stream.read(&mut buffer).expect("request read");
                if read == 0 {
                    break;
                }
                request.extend_from_slice(&buffer[..read]);
            }

            let request = String::from_utf8_lossy(&request);
            let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
            let (status, body) = match path.strip_prefix("/files/") {
                Some(name) => ("200 OK", format!("workbook bytes for {name}")),
                None => ("404 Not Found", "not found".to_string()),
            };
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream
                .write_all(response.as_bytes())
                .expect("response written");
        }
    });

    (format!("http://{address}"), handle)
}

/// Serves one connection: headers and half the body, then `pause`, then the
/// rest of the body.
fn serve_stalled(pause: Duration) -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("listener bound");
    let address = listener.local_addr().expect("local address");

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("connection accepted");
        let mut buffer = [0u8; 1024];
        let _ = stream.read(&mut buffer).expect("request read");

        let head = "HTTP/1.1 200 OK\r\nContent-Length: 10\r\nConnection: close\r\n\r\nfirst";
        stream.write_all(head.as_bytes()).expect("head written");
        stream.flush().expect("head flushed");
        thread::sleep(pause);
        // The client may already have given up; a failed write is expected then.
        let _ = stream.write_all(b"-half");
    });

    (format!("http://{address}/slow"), handle)
}

#[test]
fn download_timeout_is_disabled() {
    assert_eq!(DOWNLOAD_TIMEOUT, None);
}

#[test]
fn stalled_body_completes_without_timeout() {
    let (locator, server) = serve_stalled(Duration::from_secs(2));
    let temp_dir = tempdir().expect("temporary directory");
    let target = temp_dir.path().join("slow.xlsx");

    let client = http::client(DOWNLOAD_TIMEOUT).expect("client built");
    let bytes = http::download_to(&client, &locator, &target).expect("download completed");
    server.join().expect("server finished");

    assert_eq!(bytes, 10);
    assert_eq!(fs::read_to_string(&target).expect("body read"), "first-half");
}

#[test]
fn stalled_body_is_cut_off_by_a_timeout() {
    let (locator, server) = serve_stalled(Duration::from_secs(2));
    let temp_dir = tempdir().expect("temporary directory");
    let target = temp_dir.path().join("slow.xlsx");

    let client = http::client(Some(Duration::from_millis(300))).expect("client built");
    let result = http::download_to(&client, &locator, &target);
    server.join().expect("server finished");

    assert!(matches!(result, Err(ToolError::Http(_))));
    assert!(!target.exists());
    assert!(!temp_dir.path().join("slow.xlsx.part").exists());
}

#[test]
fn manifest_pairs_lines_and_ignores_blanks() {
    let manifest = SourceManifest::from_lists(
        "https://a.example/1\n\n  https://a.example/2  \nhttps://a.example/3\n",
        "one.xlsx\n\ntwo.xlsx\n",
    );

    assert_eq!(manifest.len(), 2);
    assert_eq!(manifest.entries[0].locator, "https://a.example/1");
    assert_eq!(manifest.entries[0].name, "one.xlsx");
    assert_eq!(manifest.entries[1].locator, "https://a.example/2");
    assert_eq!(manifest.entries[1].name, "two.xlsx");
}

#[test]
fn load_manifest_stops_at_the_shorter_list() {
    let temp_dir = tempdir().expect("temporary directory");
    let links = temp_dir.path().join("download_links.txt");
    fs::write(&links, "https://a.example/1\n\n   \nhttps://a.example/2\nhttps://a.example/3\n")
        .expect("links written");
    let names = temp_dir.path().join("filenames.txt");
    fs::write(&names, "\none.xlsx\n  two.xlsx\n\n").expect("names written");

    let manifest = fetch::load_manifest(&links, &names).expect("manifest loaded");

    assert_eq!(manifest.len(), 2);
    assert_eq!(manifest.entries[1].locator, "https://a.example/2");
    assert_eq!(manifest.entries[1].name, "two.xlsx");
}

#[test]
fn missing_manifest_aborts_fetch() {
    let temp_dir = tempdir().expect("temporary directory");
    let links = temp_dir.path().join("download_links.txt");
    fs::write(&links, "https://a.example/1\n").expect("links written");
    let names = temp_dir.path().join("filenames.txt");

    let result = pipeline::run_fetch(&links, &names, &temp_dir.path().join("out"));
    assert!(matches!(result, Err(ToolError::MissingInput(path)) if path == names));
}

#[test]
fn fetch_continues_past_failed_items() {
    let (base, server) = serve(3);
    let temp_dir = tempdir().expect("temporary directory");
    let output_dir = temp_dir.path().join("2023_application");
    fs::create_dir_all(&output_dir).expect("output directory");
    fs::write(output_dir.join("first.xlsx"), "stale").expect("stale file written");

    let locators = format!(
        "{base}/files/first\n{base}/missing\nhttp://127.0.0.1:1/unreachable\n{base}/files/third\n"
    );
    let names = "first.xlsx\nsecond.xlsx\nunreachable.xlsx\nthird.xlsx\n";
    let manifest = SourceManifest::from_lists(&locators, names);

    let client = Client::new();
    let report = fetch::fetch_all(&client, &manifest, &output_dir).expect("batch completed");
    server.join().expect("server finished");

    assert_eq!(
        report.succeeded,
        vec![output_dir.join("first.xlsx"), output_dir.join("third.xlsx")]
    );
    assert_eq!(report.failed.len(), 2);
    assert!(matches!(
        report.failed[0].error,
        ToolError::HttpStatus { status: 404, .. }
    ));
    assert!(matches!(report.failed[1].error, ToolError::Http(_)));

    assert_eq!(
        fs::read_to_string(output_dir.join("first.xlsx")).expect("first read"),
        "workbook bytes for first"
    );
    assert_eq!(
        fs::read_to_string(output_dir.join("third.xlsx")).expect("third read"),
        "workbook bytes for third"
    );
    assert!(!output_dir.join("second.xlsx").exists());
    assert!(!output_dir.join("second.xlsx.part").exists());
    assert!(!output_dir.join("unreachable.xlsx").exists());
}
