//! Heuristic constants and default locations used by the pipeline stages.
//!
//! Everything that ties the extractor and aggregator to the layout of the
//! scoring workbook lives in [`ScoringConfig`], so callers (and tests) can
//! substitute their own values instead of relying on module-level state.

use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::Result;

/// Phrase locating the top-left corner of the applicability block.
pub const MARKER_PHRASE: &str = "APPLICABILITY OF SCORING CRITERIA";
/// Worksheet holding the scoring criteria.
pub const SCORING_SHEET: &str = "Part VIII Scoring Criteria";
/// Suffix appended to the stem of every extracted block file.
pub const BLOCK_SUFFIX: &str = "_Applicability_Block.csv";
/// Extension of the workbooks picked up by the extractor.
pub const WORKBOOK_EXTENSION: &str = "xlsx";

/// Manifest listing one download locator per line.
pub const DEFAULT_LINKS_FILE: &str = "download_links.txt";
/// Manifest listing one target file name per line.
pub const DEFAULT_NAMES_FILE: &str = "filenames.txt";
/// Directory receiving downloaded workbooks.
pub const DEFAULT_DOWNLOAD_DIR: &str = "2023_application";
/// Directory receiving extracted applicability blocks.
pub const DEFAULT_BLOCK_DIR: &str = "excel_to_csv_output";
/// Final wide summary table.
pub const DEFAULT_SUMMARY_FILE: &str = "applicability_scores_summary_wide.csv";

/// Total time allowed for one download. `None` waits as long as the server
/// keeps the connection open.
pub const DOWNLOAD_TIMEOUT: Option<Duration> = None;

/// Labels of rows inside the block that never describe a scoring criterion.
pub const DEFAULT_SKIP_LIST: &[&str] = &[
    "APPLICABILITY OF SCORING CRITERIA",
    "Maximum Point Totals",
    "Type of Credit:",
    "Set-Aside Elections",
    "NonProfit",
    "General",
    "Disaster Recovery",
    "Preservation:",
    "HUD RAD",
    "HTC",
    "HUD RA",
    "CHDO",
    "NOAH",
    "HUD RAD is also",
];

/// Positional heuristics applied to the scoring workbook template.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Phrase searched (case-insensitively) to find the block origin.
    pub marker: String,
    /// Worksheet loaded from each workbook.
    pub sheet_name: String,
    /// Leading rows of a block treated as headers.
    pub header_rows: usize,
    /// Criterion labels must be strictly longer than this many characters.
    pub min_name_len: usize,
    /// Columns searched for the maximum score, relative to the block.
    pub max_columns: RangeInclusive<usize>,
    /// Columns searched for the awarded score, relative to the block.
    pub actual_columns: RangeInclusive<usize>,
    /// Case-sensitive substrings disqualifying a row.
    pub skip_list: Vec<String>,
    /// Application year used by the file name patterns.
    pub application_year: String,
    /// Suffix of extracted block files.
    pub block_suffix: String,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            marker: MARKER_PHRASE.to_string(),
            sheet_name: SCORING_SHEET.to_string(),
            header_rows: 2,
            min_name_len: 3,
            max_columns: 5..=11,
            actual_columns: 23..=36,
            skip_list: DEFAULT_SKIP_LIST.iter().map(|s| s.to_string()).collect(),
            application_year: "2023".to_string(),
            block_suffix: BLOCK_SUFFIX.to_string(),
        }
    }
}

impl ScoringConfig {
    /// Loads overrides from a JSON file. Missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }
}
