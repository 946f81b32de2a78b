use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::aggregate;
use crate::config::{DOWNLOAD_TIMEOUT, ScoringConfig};
use crate::error::{Result, ToolError};
use crate::extract;
use crate::fetch;
use crate::io::{delimited, http};
use crate::model::{BatchReport, EntitySummaryRow, SummaryTable};

/// Downloads the workbooks listed by the two manifests.
#[instrument(
    level = "info",
    skip_all,
    fields(links = %links.display(), names = %names.display(), output = %output.display())
)]
pub fn run_fetch(links: &Path, names: &Path, output: &Path) -> Result<BatchReport<PathBuf>> {
    let manifest = fetch::load_manifest(links, names)?;
    info!(entries = manifest.len(), "manifest loaded");
    let client = http::client(DOWNLOAD_TIMEOUT)?;
    let report = fetch::fetch_all(&client, &manifest, output)?;
    info!(
        downloaded = report.succeeded.len(),
        failed = report.failed.len(),
        "download completed"
    );
    Ok(report)
}

/// Extracts the applicability block of every workbook in `input`.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), output = %output.display())
)]
pub fn run_extract(
    input: &Path,
    output: &Path,
    config: &ScoringConfig,
) -> Result<BatchReport<PathBuf>> {
    let report = extract::extract_dir(input, output, config)?;
    info!(
        extracted = report.succeeded.len(),
        failed = report.failed.len(),
        "extraction completed"
    );
    Ok(report)
}

/// Aggregates every block in `input` into the wide summary written to
/// `output`. Nothing is written when no block yields a score.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), output = %output.display())
)]
pub fn run_aggregate(
    input: &Path,
    output: &Path,
    config: &ScoringConfig,
) -> Result<BatchReport<EntitySummaryRow>> {
    let report = aggregate::aggregate_dir(input, config)?;
    if report.succeeded.is_empty() {
        return Err(ToolError::NoData);
    }

    let table = SummaryTable::from_rows(report.succeeded.iter().cloned());
    delimited::write_summary(output, &table)?;
    preview(&table);
    info!(
        entities = table.rows.len(),
        columns = table.columns.len(),
        skipped = report.failed.len(),
        "summary written"
    );
    Ok(report)
}

const PREVIEW_ROWS: usize = 5;

fn preview(table: &SummaryTable) {
    debug!(header = %table.header().join(","), "summary preview");
    for row in table.rows.iter().take(PREVIEW_ROWS) {
        let values: Vec<String> = table
            .columns
            .iter()
            .map(|column| row.value_or_zero(column).to_string())
            .collect();
        debug!(entity = %row.entity, values = %values.join(","), "summary row");
    }
}

/// Locations used by [`run_all`].
#[derive(Debug, Clone)]
pub struct PipelinePaths {
    pub links: PathBuf,
    pub names: PathBuf,
    pub download_dir: PathBuf,
    pub block_dir: PathBuf,
    pub summary: PathBuf,
}

/// Runs fetch, extract and aggregate back to back.
#[instrument(level = "info", skip_all)]
pub fn run_all(paths: &PipelinePaths, config: &ScoringConfig) -> Result<()> {
    run_fetch(&paths.links, &paths.names, &paths.download_dir)?;
    run_extract(&paths.download_dir, &paths.block_dir, config)?;
    run_aggregate(&paths.block_dir, &paths.summary, config)?;
    Ok(())
}
