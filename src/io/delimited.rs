use std::fs;
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};

use crate::error::Result;
use crate::model::{Grid, SummaryTable};

/// Writes a grid as comma-delimited text with no header row, creating the
/// parent directory when needed. Empty cells become empty fields.
pub fn write_grid(path: &Path, grid: &Grid) -> Result<()> {
    ensure_parent(path)?;
    let mut writer = WriterBuilder::new().has_headers(false).from_path(path)?;
    for row in grid.rows() {
        writer.write_record(row.iter().map(|cell| cell.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads a headerless delimited file as raw string records. Rows may have
/// different lengths.
pub fn read_records(path: &Path) -> Result<Vec<Vec<String>>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

/// Writes the wide summary table with a header row. Cells an entity lacks are
/// written as `0`.
pub fn write_summary(path: &Path, table: &SummaryTable) -> Result<()> {
    ensure_parent(path)?;
    let mut writer = WriterBuilder::new().from_path(path)?;
    writer.write_record(table.header())?;

    for row in &table.rows {
        let mut record = Vec::with_capacity(table.columns.len() + 1);
        record.push(row.entity.clone());
        record.extend(
            table
                .columns
                .iter()
                .map(|column| row.value_or_zero(column).to_string()),
        );
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
