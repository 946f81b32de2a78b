use std::path::Path;

use calamine::{DataType, Range, Reader, Xlsx, open_workbook};

use crate::error::{Result, ToolError};
use crate::model::{Cell, Grid};

/// Reads one worksheet into a [`Grid`] without any header interpretation.
///
/// Cell coordinates match the sheet: leading blank rows and columns that
/// calamine trims from the used range are restored as empty cells.
pub fn read_sheet(path: &Path, sheet: &str) -> Result<Grid> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = read_required_sheet(&mut workbook, sheet)?;
    Ok(range_to_grid(&range))
}

fn read_required_sheet<R: std::io::Read + std::io::Seek>(
    workbook: &mut Xlsx<R>,
    name: &str,
) -> Result<Range<DataType>> {
    let range_result = workbook
        .worksheet_range(name)
        .ok_or_else(|| ToolError::MissingSheet(name.to_string()))?;
    let range = range_result.map_err(ToolError::from)?;
    Ok(range)
}

fn range_to_grid(range: &Range<DataType>) -> Grid {
    let (row_offset, col_offset) = range
        .start()
        .map(|(row, col)| (row as usize, col as usize))
        .unwrap_or((0, 0));

    let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); row_offset];
    for row in range.rows() {
        let mut cells = vec![Cell::Empty; col_offset];
        cells.extend(row.iter().map(to_cell));
        rows.push(cells);
    }

    Grid::from_rows(rows)
}

/// Dates and durations are kept as text (`2023-05-01 00:00:00`), never as
/// their Excel serial.
fn to_cell(cell: &DataType) -> Cell {
    match cell {
        DataType::Empty => Cell::Empty,
        DataType::Float(value) => Cell::Number(*value),
        DataType::Int(value) => Cell::Number(*value as f64),
        DataType::Bool(value) => Cell::Bool(*value),
        DataType::String(value) => Cell::Text(value.clone()),
        DataType::DateTime(_) | DataType::DateTimeIso(_) => Cell::Text(
            cell.as_datetime()
                .map(|datetime| datetime.to_string())
                .unwrap_or_else(|| cell.to_string()),
        ),
        DataType::Duration(_) | DataType::DurationIso(_) => Cell::Text(
            cell.as_duration()
                .map(|duration| duration.to_string())
                .unwrap_or_else(|| cell.to_string()),
        ),
        other => Cell::Text(other.to_string()),
    }
}
