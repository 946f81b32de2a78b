use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use crate::error::ToolError;

/// A single worksheet cell. Numeric and textual cells keep their source type
/// so later stages can tell numbers from labels.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    /// Blank or missing cell.
    #[default]
    Empty,
    /// Numeric literal.
    Number(f64),
    /// Text literal.
    Text(String),
    /// Boolean literal.
    Bool(bool),
}

impl Cell {
    /// Returns `true` when the cell carries no value.
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Number(value) => write!(f, "{value}"),
            Cell::Text(value) => f.write_str(value),
            Cell::Bool(true) => f.write_str("True"),
            Cell::Bool(false) => f.write_str("False"),
        }
    }
}

/// Rectangular, 0-indexed grid of cells. Every row has the same width.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
    width: usize,
}

impl Grid {
    /// Builds a grid from ragged rows, padding short rows with empty cells.
    pub fn from_rows(mut rows: Vec<Vec<Cell>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, Cell::Empty);
        }
        Self { rows, width }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|cells| cells.get(col))
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Returns the region at and below/right of `(row, col)`.
    pub fn slice_from(&self, row: usize, col: usize) -> Grid {
        let rows = self
            .rows
            .iter()
            .skip(row)
            .map(|cells| cells.iter().skip(col).cloned().collect())
            .collect();
        Grid {
            rows,
            width: self.width.saturating_sub(col),
        }
    }
}

/// Ordered (locator, target file name) pairs to download.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceManifest {
    pub entries: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ManifestEntry {
    pub locator: String,
    pub name: String,
}

impl SourceManifest {
    /// Pairs two line-delimited lists by position, ignoring blank lines and
    /// stopping at the shorter list.
    pub fn from_lists(locators: &str, names: &str) -> Self {
        let entries = non_blank_lines(locators)
            .zip(non_blank_lines(names))
            .map(|(locator, name)| ManifestEntry {
                locator: locator.to_string(),
                name: name.to_string(),
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Trimmed lines of `text`, skipping blank ones.
pub fn non_blank_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|line| !line.is_empty())
}

/// Score pair extracted from one criterion row of an applicability block.
#[derive(Debug, Clone, PartialEq)]
pub struct CriterionScore {
    pub name: String,
    pub max: f64,
    pub actual: f64,
}

impl CriterionScore {
    pub fn new(name: impl Into<String>, max: f64, actual: f64) -> Self {
        Self {
            name: name.into(),
            max,
            actual,
        }
    }
}

/// Column header of the entity column in the summary table.
pub const ENTITY_COLUMN: &str = "company_name";

/// One entity and its criterion columns, in first-seen order.
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySummaryRow {
    pub entity: String,
    pub values: Vec<(String, f64)>,
}

impl EntitySummaryRow {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            values: Vec::new(),
        }
    }

    /// Inserts or replaces a column value.
    pub fn set(&mut self, column: String, value: f64) {
        match self.values.iter_mut().find(|(name, _)| *name == column) {
            Some(slot) => slot.1 = value,
            None => self.values.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| *value)
    }

    /// Column value, or `0` when this entity has no such criterion.
    pub fn value_or_zero(&self, column: &str) -> f64 {
        self.get(column).unwrap_or(0.0)
    }
}

/// Wide table with one row per entity and the union of all criterion columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SummaryTable {
    pub columns: Vec<String>,
    pub rows: Vec<EntitySummaryRow>,
}

impl SummaryTable {
    /// Folds entity rows into a table. A later row with an already-seen
    /// entity name replaces the earlier one in place.
    pub fn from_rows(rows: impl IntoIterator<Item = EntitySummaryRow>) -> Self {
        let mut table = SummaryTable::default();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for row in rows {
            for (column, _) in &row.values {
                if !table.columns.contains(column) {
                    table.columns.push(column.clone());
                }
            }
            match positions.get(&row.entity) {
                Some(&index) => table.rows[index] = row,
                None => {
                    positions.insert(row.entity.clone(), table.rows.len());
                    table.rows.push(row);
                }
            }
        }

        table
    }

    /// Header line: entity column followed by every criterion column.
    pub fn header(&self) -> Vec<String> {
        std::iter::once(ENTITY_COLUMN.to_string())
            .chain(self.columns.iter().cloned())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Outcome of a batch stage: what succeeded and what failed, per item.
#[derive(Debug)]
pub struct BatchReport<T> {
    pub succeeded: Vec<T>,
    pub failed: Vec<ItemFailure>,
}

/// A single item that could not be processed, with the reason.
#[derive(Debug)]
pub struct ItemFailure {
    pub item: PathBuf,
    pub error: ToolError,
}

impl<T> Default for BatchReport<T> {
    fn default() -> Self {
        Self {
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }
}

impl<T> BatchReport<T> {
    pub fn record(&mut self, item: PathBuf, result: crate::error::Result<T>) {
        match result {
            Ok(value) => self.succeeded.push(value),
            Err(error) => self.failed.push(ItemFailure { item, error }),
        }
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}
