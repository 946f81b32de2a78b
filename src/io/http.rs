use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::{Result, ToolError};

/// Builds the blocking client used for downloads. `None` disables
/// reqwest's default 30s total timeout.
pub fn client(timeout: Option<Duration>) -> Result<Client> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// Streams the body of `locator` into `target`.
///
/// The body lands in a `.part` sibling first and is renamed over `target`
/// only once fully written; on failure the partial file is removed.
pub fn download_to(client: &Client, locator: &str, target: &Path) -> Result<u64> {
    let partial = partial_path(target);
    let result = stream_body(client, locator, &partial);

    match result {
        Ok(bytes) => {
            fs::rename(&partial, target)?;
            Ok(bytes)
        }
        Err(error) => {
            let _ = fs::remove_file(&partial);
            Err(error)
        }
    }
}

fn stream_body(client: &Client, locator: &str, partial: &Path) -> Result<u64> {
    let mut response = client.get(locator).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(ToolError::HttpStatus {
            status: status.as_u16(),
            locator: locator.to_string(),
        });
    }

    let mut writer = BufWriter::new(File::create(partial)?);
    let bytes = response.copy_to(&mut writer)?;
    writer.flush()?;
    Ok(bytes)
}

fn partial_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    target.with_file_name(name)
}
