// Preprocessor abstraction for log ingestion
//
// This module defines the boundary between raw log text and the rule engine.
// Everything after this point works with AccountRecords and never sees the
// line layout again.

use crate::error::{SanctionError, SanctionResult};
use crate::types::{AccountRecord, RecordKey};
use std::collections::HashMap;
use std::path::Path;

/// Preprocessor trait - converts log lines to AccountRecords
pub trait Preprocessor {
    /// Parse a single line. Returns `None` for lines that do not carry a record.
    fn parse_line(&self, line: &str) -> Option<AccountRecord>;

    /// Parse a whole log and apply the dedup rule
    fn parse_text(&self, text: &str) -> Vec<AccountRecord> {
        let mut dropped = 0usize;
        let records = text.lines().filter_map(|line| {
            let record = self.parse_line(line);
            if record.is_none() && !line.trim().is_empty() {
                dropped += 1;
            }
            record
        });
        let records = merge_records(records);
        if dropped > 0 {
            log::debug!("{}: skipped {} malformed lines", self.name(), dropped);
        }
        records
    }

    /// Read a log from disk. Invalid UTF-8 is replaced rather than rejected.
    fn process_file(&self, input: &Path) -> SanctionResult<Vec<AccountRecord>> {
        let bytes = std::fs::read(input).map_err(|e| SanctionError::io(input, e))?;
        Ok(self.parse_text(&String::from_utf8_lossy(&bytes)))
    }

    /// Get preprocessor name for debugging/logging
    fn name(&self) -> &str;
}

/// Collapse records sharing an identity key.
///
/// A colliding record is compared with the running total of the first
/// occurrence: a different count is added onto it, an equal count is dropped.
/// The first occurrence keeps its position and its `first_login_page`.
pub fn merge_records<I>(records: I) -> Vec<AccountRecord>
where
    I: IntoIterator<Item = AccountRecord>,
{
    let mut merged: Vec<AccountRecord> = Vec::new();
    let mut positions: HashMap<RecordKey, usize> = HashMap::new();

    for record in records {
        match positions.get(&record.key()) {
            Some(&index) => {
                let existing = &mut merged[index];
                if existing.total_logins != record.total_logins {
                    existing.total_logins = existing.total_logins.saturating_add(record.total_logins);
                }
            }
            None => {
                positions.insert(record.key(), merged.len());
                merged.push(record);
            }
        }
    }

    merged
}
