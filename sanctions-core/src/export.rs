use crate::error::{SanctionError, SanctionResult};
use crate::types::{RuleReference, SanctionRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use uuid::Uuid;

/// Column order of the sanction sheet
pub const CSV_HEADER: [&str; 5] = ["Regelverstoß", "Account ID", "Benutzername", "Socialclubs", "Sanktion"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl FromStr for ExportFormat {
    type Err = SanctionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(SanctionError::UnknownFormat {
                format: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportLayout {
    /// All five columns
    Full,
    /// Without `Benutzername`, as read by older moderation sheets
    Legacy,
}

impl ExportLayout {
    pub fn from_include_username(include_username: bool) -> Self {
        if include_username {
            ExportLayout::Full
        } else {
            ExportLayout::Legacy
        }
    }

    fn header(&self) -> Vec<&'static str> {
        match self {
            ExportLayout::Full => CSV_HEADER.to_vec(),
            ExportLayout::Legacy => CSV_HEADER.iter().copied().filter(|c| *c != "Benutzername").collect(),
        }
    }

    fn row<'a>(&self, record: &'a SanctionRecord) -> Vec<&'a str> {
        let mut row = vec![record.rule_reference.code(), record.account_id.as_str()];
        if *self == ExportLayout::Full {
            row.push(record.username.as_str());
        }
        row.push(record.social_club_list.as_str());
        row.push(record.sanction_text.as_str());
        row
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordCounts {
    pub multi_club: usize,
    pub shared_club: usize,
    pub combined: usize,
}

impl RecordCounts {
    pub fn tally(records: &[SanctionRecord]) -> Self {
        let mut counts = Self::default();
        for record in records {
            match record.rule_reference {
                RuleReference::MultiClub => counts.multi_club += 1,
                RuleReference::SharedClub => counts.shared_club += 1,
                RuleReference::Combined => counts.combined += 1,
            }
        }
        counts
    }
}

/// JSON export document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub counts: RecordCounts,
    pub records: Vec<SanctionRecord>,
}

impl ExportReport {
    pub fn new(run_id: Uuid, records: &[SanctionRecord]) -> Self {
        Self {
            run_id,
            generated_at: Utc::now(),
            counts: RecordCounts::tally(records),
            records: records.to_vec(),
        }
    }
}

/// Write the sanction sheet to any writer
pub fn write_csv<W: Write>(records: &[SanctionRecord], writer: W, layout: ExportLayout) -> SanctionResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(layout.header())?;
    for record in records {
        wtr.write_record(layout.row(record))?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn save_with_format(
    records: &[SanctionRecord],
    run_id: Uuid,
    path: impl AsRef<Path>,
    format: ExportFormat,
    layout: ExportLayout,
) -> SanctionResult<()> {
    let path = path.as_ref();
    match format {
        ExportFormat::Csv => {
            let file = File::create(path).map_err(|e| SanctionError::io(path, e))?;
            write_csv(records, file, layout)?;
        }
        ExportFormat::Json => {
            let report = ExportReport::new(run_id, records);
            let json = serde_json::to_string_pretty(&report)?;
            std::fs::write(path, json).map_err(|e| SanctionError::io(path, e))?;
        }
    }
    log::info!("Exported {} sanctions to {}", records.len(), path.display());
    Ok(())
}
