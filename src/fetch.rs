use std::fs;
use std::path::{Path, PathBuf};

use reqwest::blocking::Client;
use tracing::{info, warn};

use crate::error::{Result, ToolError};
use crate::io::http;
use crate::model::{BatchReport, SourceManifest, non_blank_lines};

/// Reads the locator and name manifests and pairs them by position.
pub fn load_manifest(links: &Path, names: &Path) -> Result<SourceManifest> {
    let locators = read_manifest_file(links)?;
    let names = read_manifest_file(names)?;
    let manifest = SourceManifest::from_lists(&locators, &names);

    let locator_count = non_blank_lines(&locators).count();
    let name_count = non_blank_lines(&names).count();
    if locator_count != name_count {
        warn!(
            locators = locator_count,
            names = name_count,
            "manifest lists differ in length; extra entries ignored"
        );
    }
    Ok(manifest)
}

fn read_manifest_file(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(ToolError::MissingInput(path.to_path_buf()));
    }
    Ok(fs::read_to_string(path)?)
}

/// Downloads every manifest entry into `output_dir`, one after another.
/// A failed entry is logged and recorded; the batch always runs to the end.
pub fn fetch_all(
    client: &Client,
    manifest: &SourceManifest,
    output_dir: &Path,
) -> Result<BatchReport<PathBuf>> {
    fs::create_dir_all(output_dir)?;

    let total = manifest.len();
    let mut report = BatchReport::default();
    for (index, entry) in manifest.entries.iter().enumerate() {
        info!("downloading {}/{}: {}", index + 1, total, entry.name);
        let target = output_dir.join(&entry.name);
        let result = http::download_to(client, &entry.locator, &target).map(|bytes| {
            info!(name = %entry.name, bytes, "downloaded");
            target.clone()
        });
        if let Err(error) = &result {
            warn!(name = %entry.name, %error, "download failed");
        }
        report.record(target, result);
    }
    Ok(report)
}
