// ============================================
// CSV rating ingestion
// ============================================
//
// Reads (user id, song id, rating) records from a delimited file. Columns are
// positional so the header names do not matter. Only the first `limit` data
// records are kept.

use crate::error::{RecommendError, Result};
use crate::models::{Identifier, Interaction};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const EXPECTED_FIELDS: usize = 3;

pub type RatingRecord = Interaction<Identifier, Identifier>;

#[derive(Debug, Clone)]
pub struct CsvRatingSource {
    path: PathBuf,
    limit: Option<usize>,
    has_headers: bool,
}

impl CsvRatingSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            limit: None,
            has_headers: true,
        }
    }

    /// Keep only the first `limit` records; 0 disables truncation
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = if limit == 0 { None } else { Some(limit) };
        self
    }

    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Vec<RatingRecord>> {
        let file = File::open(&self.path).map_err(|e| {
            RecommendError::Io(format!("Failed to open {}: {}", self.path.display(), e))
        })?;

        let records = self.read_from(file)?;

        info!(
            path = %self.path.display(),
            records = records.len(),
            limit = ?self.limit,
            "Ratings loaded"
        );

        Ok(records)
    }

    pub fn read_from<R: Read>(&self, reader: R) -> Result<Vec<RatingRecord>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(self.has_headers)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let limit = self.limit.unwrap_or(usize::MAX);
        let mut records = Vec::new();

        for row in reader.records().take(limit) {
            let row = row?;
            let line = row.position().map(|p| p.line()).unwrap_or_default();

            if row.len() != EXPECTED_FIELDS {
                return Err(RecommendError::Ingest(format!(
                    "line {}: expected {} fields (user, song, rating), found {}",
                    line,
                    EXPECTED_FIELDS,
                    row.len()
                )));
            }

            records.push(Interaction::new(
                Identifier::parse(&row[0]),
                Identifier::parse(&row[1]),
                parse_rating(&row[2], line)?,
            ));
        }

        debug!(records = records.len(), "CSV records parsed");

        Ok(records)
    }
}

fn parse_rating(raw: &str, line: u64) -> Result<f64> {
    match raw.parse::<f64>() {
        Ok(rating) if rating.is_finite() => Ok(rating),
        _ => Err(RecommendError::InvalidParameter(format!(
            "line {}: rating {:?} is not a finite number",
            line, raw
        ))),
    }
}
