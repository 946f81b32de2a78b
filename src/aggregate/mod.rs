//! Turns extracted applicability blocks into per-entity score rows and folds
//! them into the wide summary table.

use std::ops::RangeInclusive;
use std::path::Path;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::config::ScoringConfig;
use crate::error::{Result, ToolError};
use crate::io::delimited;
use crate::io::listing::list_files;
use crate::model::{BatchReport, CriterionScore, EntitySummaryRow};

/// Derives entity names from block file names.
///
/// Patterns are tried in order: `<year>-NNN<name>`, then a seven-digit
/// prefix followed by the name (with any `<year>-NNN` removed), then the
/// file name minus the block suffix.
#[derive(Debug, Clone)]
pub struct EntityNamer {
    numbered: Regex,
    compact: Regex,
    year_tag: Regex,
    suffix: String,
}

impl EntityNamer {
    pub fn new(config: &ScoringConfig) -> Result<Self> {
        let year = regex::escape(&config.application_year);
        Ok(Self {
            numbered: Regex::new(&format!(r"{year}-\d{{3}}([^_]+)"))?,
            compact: Regex::new(r"(\d{4}\d{3}[^_]+)")?,
            year_tag: Regex::new(&format!(r"{year}-\d{{3}}"))?,
            suffix: config.block_suffix.clone(),
        })
    }

    pub fn entity_name(&self, file_name: &str) -> String {
        if let Some(captures) = self.numbered.captures(file_name) {
            return captures[1].to_string();
        }
        if let Some(found) = self.compact.find(file_name) {
            return self.year_tag.replace_all(found.as_str(), "").into_owned();
        }
        file_name.replace(&self.suffix, "")
    }
}

/// Applies the criterion-row heuristics to the rows of one block.
#[derive(Debug, Clone)]
pub struct ScoreExtractor<'a> {
    config: &'a ScoringConfig,
    numeral_prefix: Regex,
}

impl<'a> ScoreExtractor<'a> {
    pub fn new(config: &'a ScoringConfig) -> Result<Self> {
        Ok(Self {
            config,
            numeral_prefix: Regex::new(r"^[IVX]+\.\s*")?,
        })
    }

    /// Returns one score per qualifying row, in row order.
    pub fn extract<S: AsRef<str>>(&self, rows: &[Vec<S>]) -> Vec<CriterionScore> {
        rows.iter()
            .skip(self.config.header_rows)
            .filter_map(|row| self.score_row(row))
            .collect()
    }

    /// Scores a single row, or `None` when it is not a criterion row.
    pub fn score_row<S: AsRef<str>>(&self, row: &[S]) -> Option<CriterionScore> {
        let label = row.first()?.as_ref().trim();
        if label.chars().count() <= self.config.min_name_len {
            return None;
        }
        if self
            .config
            .skip_list
            .iter()
            .any(|pattern| label.contains(pattern.as_str()))
        {
            return None;
        }

        let max = first_number(row, &self.config.max_columns)?;
        let actual = first_number(row, &self.config.actual_columns)?;
        let name = self.numeral_prefix.replace(label, "");
        Some(CriterionScore::new(name, max, actual))
    }
}

fn first_number<S: AsRef<str>>(row: &[S], columns: &RangeInclusive<usize>) -> Option<f64> {
    row.iter()
        .enumerate()
        .skip(*columns.start())
        .take_while(|(idx, _)| idx <= columns.end())
        .find_map(|(_, cell)| parse_number(cell.as_ref()))
}

/// Parses a finite number from a field, ignoring surrounding whitespace.
pub fn parse_number(field: &str) -> Option<f64> {
    field
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Turns a criterion name into a column key: spaces, slashes and hyphens
/// become underscores; quotes, parentheses, dots and commas are dropped.
pub fn column_key(name: &str) -> String {
    name.chars()
        .filter_map(|ch| match ch {
            ' ' | '/' | '-' => Some('_'),
            '"' | '\'' | '(' | ')' | '.' | ',' => None,
            other => Some(other),
        })
        .collect()
}

/// Builds the summary row of one entity.
pub fn summary_row(entity: &str, scores: &[CriterionScore]) -> EntitySummaryRow {
    let mut row = EntitySummaryRow::new(entity);
    for score in scores {
        let key = column_key(&score.name);
        row.set(format!("{key}_max"), score.max);
        row.set(format!("{key}_actual"), score.actual);
    }
    row
}

/// Reads one block file and returns its entity row.
pub fn summarize_file(
    path: &Path,
    namer: &EntityNamer,
    extractor: &ScoreExtractor<'_>,
) -> Result<EntitySummaryRow> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let entity = namer.entity_name(&file_name);
    let rows = delimited::read_records(path)?;
    let scores = extractor.extract(&rows);
    if scores.is_empty() {
        return Err(ToolError::NoScores(entity));
    }
    debug!(%entity, criteria = scores.len(), "scores extracted");
    Ok(summary_row(&entity, &scores))
}

/// Summarises every block file in `input_dir`, in sorted path order.
pub fn aggregate_dir(
    input_dir: &Path,
    config: &ScoringConfig,
) -> Result<BatchReport<EntitySummaryRow>> {
    if !input_dir.is_dir() {
        return Err(ToolError::MissingInput(input_dir.to_path_buf()));
    }

    let namer = EntityNamer::new(config)?;
    let extractor = ScoreExtractor::new(config)?;
    let files = list_files(input_dir, |path| {
        path.file_name()
            .is_some_and(|name| name.to_string_lossy().ends_with(&config.block_suffix))
    })?;
    info!(count = files.len(), "processing block files");

    let mut report = BatchReport::default();
    for file in files {
        let result = summarize_file(&file, &namer, &extractor);
        match &result {
            Ok(row) => info!(
                file = %file.display(),
                entity = %row.entity,
                criteria = row.values.len() / 2,
                "extracted scoring criteria"
            ),
            Err(error) => warn!(file = %file.display(), %error, "skipping block file"),
        }
        report.record(file, result);
    }
    Ok(report)
}
