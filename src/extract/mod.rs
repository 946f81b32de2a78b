//! Locates the applicability block inside the scoring worksheet and persists
//! it as a headerless delimited table.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::{ScoringConfig, WORKBOOK_EXTENSION};
use crate::error::{Result, ToolError};
use crate::io::listing::list_files;
use crate::io::{delimited, excel_read};
use crate::model::{BatchReport, Grid};

/// Returns the first `(row, col)` whose uppercased text contains `marker`,
/// scanning row by row and, within a row, column by column.
pub fn find_marker(grid: &Grid, marker: &str) -> Option<(usize, usize)> {
    let needle = marker.to_uppercase();
    grid.rows().enumerate().find_map(|(row_idx, row)| {
        row.iter()
            .position(|cell| cell.to_string().to_uppercase().contains(&needle))
            .map(|col_idx| (row_idx, col_idx))
    })
}

/// Slices the applicability block out of `grid`.
pub fn extract_block(grid: &Grid, marker: &str) -> Result<Grid> {
    let (row, col) = find_marker(grid, marker).ok_or_else(|| ToolError::MarkerNotFound {
        marker: marker.to_string(),
    })?;
    debug!(row, col, "marker located");
    Ok(grid.slice_from(row, col))
}

/// Output path of the block extracted from `workbook`.
pub fn block_path(workbook: &Path, output_dir: &Path, config: &ScoringConfig) -> PathBuf {
    let stem = workbook
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    output_dir.join(format!("{stem}{}", config.block_suffix))
}

/// Extracts the block of one workbook and writes it next to its siblings in
/// `output_dir`. Returns the written path.
pub fn extract_file(workbook: &Path, output_dir: &Path, config: &ScoringConfig) -> Result<PathBuf> {
    let grid = excel_read::read_sheet(workbook, &config.sheet_name)?;
    let block = extract_block(&grid, &config.marker)?;
    let output = block_path(workbook, output_dir, config);
    delimited::write_grid(&output, &block)?;
    Ok(output)
}

/// Runs [`extract_file`] over every workbook in `input_dir`. Individual
/// failures are logged and recorded, never fatal.
pub fn extract_dir(
    input_dir: &Path,
    output_dir: &Path,
    config: &ScoringConfig,
) -> Result<BatchReport<PathBuf>> {
    if !input_dir.is_dir() {
        return Err(ToolError::MissingInput(input_dir.to_path_buf()));
    }

    let workbooks = list_files(input_dir, |path| has_extension(path, WORKBOOK_EXTENSION))?;
    info!(count = workbooks.len(), "found workbooks");

    let mut report = BatchReport::default();
    for workbook in workbooks {
        let result = extract_file(&workbook, output_dir, config);
        match &result {
            Ok(output) => info!(output = %output.display(), "saved applicability block"),
            Err(error) => warn!(file = %workbook.display(), %error, "extraction failed"),
        }
        report.record(workbook, result);
    }
    Ok(report)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
}
