//! Review session
//!
//! Holds the sanction collections of the last successful pass so a reviewer can
//! remove, filter and select entries before exporting. Every operation either
//! replaces the whole state or returns a new view; nothing is shared globally.

use crate::error::{SanctionError, SanctionResult};
use crate::export::{self, ExportFormat, ExportLayout};
use crate::processor::{AnalysisRun, SanctionProcessor};
use crate::relations::RelationAnalytics;
use crate::types::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct SanctionSession {
    run_id: Uuid,
    source: Option<PathBuf>,
    analytics: RelationAnalytics,
    evaluation: Evaluation,
}

impl Default for SanctionSession {
    fn default() -> Self {
        Self::from_evaluation(Evaluation::default())
    }
}

impl SanctionSession {
    pub fn from_evaluation(evaluation: Evaluation) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            source: None,
            analytics: RelationAnalytics::default(),
            evaluation,
        }
    }

    /// Session over a pass that already ran, e.g. a profiled one
    pub fn from_run(run: AnalysisRun, source: Option<PathBuf>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            source,
            analytics: run.analytics,
            evaluation: run.evaluation,
        }
    }

    /// Parse and evaluate `path` into a fresh session
    pub fn load(processor: &SanctionProcessor, path: impl AsRef<Path>) -> SanctionResult<Self> {
        let mut session = Self::default();
        session.reload(processor, path)?;
        Ok(session)
    }

    /// Replace the state with the evaluation of `records`
    pub fn evaluate(&mut self, processor: &SanctionProcessor, records: &[AccountRecord]) -> &Evaluation {
        let run = processor.process_records(records);
        self.run_id = Uuid::new_v4();
        self.analytics = run.analytics;
        self.evaluation = run.evaluation;
        &self.evaluation
    }

    /// Re-run the full pass on `path`. On failure the current state is kept.
    pub fn reload(&mut self, processor: &SanctionProcessor, path: impl AsRef<Path>) -> SanctionResult<&Evaluation> {
        let path = path.as_ref();
        let run = processor.process_file(path)?;

        self.run_id = Uuid::new_v4();
        self.source = Some(path.to_path_buf());
        self.analytics = run.analytics;
        self.evaluation = run.evaluation;
        Ok(&self.evaluation)
    }

    /// Drop one sanction from whichever collection holds it
    pub fn remove(&mut self, id: &SanctionId) -> SanctionResult<SanctionRecord> {
        if let Some(pos) = self.evaluation.multi_club.iter().position(|v| &v.record.id == id) {
            return Ok(self.evaluation.multi_club.remove(pos).record);
        }

        for group_index in 0..self.evaluation.shared_club.len() {
            let group = &mut self.evaluation.shared_club[group_index];
            if let Some(pos) = group.entries.iter().position(|e| &e.record.id == id) {
                let removed = group.entries.remove(pos).record;
                if group.entries.is_empty() {
                    self.evaluation.shared_club.remove(group_index);
                }
                return Ok(removed);
            }
        }

        if let Some(pos) = self.evaluation.combined.iter().position(|c| &c.record.id == id) {
            return Ok(self.evaluation.combined.remove(pos).record);
        }

        Err(SanctionError::SanctionNotFound { id: id.to_string() })
    }

    /// Entries whose account id or club list contains `query`.
    /// An empty query keeps everything.
    pub fn filter(&self, query: &str) -> SanctionSession {
        let query = query.trim();
        if query.is_empty() {
            return self.clone();
        }

        let multi_club = self
            .evaluation
            .multi_club
            .iter()
            .filter(|v| v.record.matches(query))
            .cloned()
            .collect();

        let shared_club = self
            .evaluation
            .shared_club
            .iter()
            .filter_map(|group| {
                let entries: Vec<SharedClubEntry> = group
                    .entries
                    .iter()
                    .filter(|e| e.record.matches(query) || group.social_club.contains(query))
                    .cloned()
                    .collect();
                (!entries.is_empty()).then(|| SharedClubViolation {
                    social_club: group.social_club.clone(),
                    entries,
                })
            })
            .collect();

        let combined = self
            .evaluation
            .combined
            .iter()
            .filter(|c| c.record.matches(query))
            .cloned()
            .collect();

        SanctionSession {
            evaluation: Evaluation {
                multi_club,
                shared_club,
                combined,
            },
            ..self.clone()
        }
    }

    /// Records for the chosen ids, in display order
    pub fn select(&self, ids: &HashSet<SanctionId>) -> Vec<SanctionRecord> {
        self.evaluation
            .records()
            .into_iter()
            .filter(|record| ids.contains(&record.id))
            .cloned()
            .collect()
    }

    pub fn all_records(&self) -> Vec<SanctionRecord> {
        self.evaluation.records().into_iter().cloned().collect()
    }

    /// Write `records` (usually a selection of this session) to `path`
    pub fn export(
        &self,
        records: &[SanctionRecord],
        path: impl AsRef<Path>,
        format: ExportFormat,
        layout: ExportLayout,
    ) -> SanctionResult<()> {
        export::save_with_format(records, self.run_id, path, format, layout)
    }

    pub fn summary(&self) -> SanctionSummary {
        self.evaluation.summary()
    }

    pub fn outcome(&self) -> EvaluationOutcome {
        self.evaluation.outcome()
    }

    pub fn evaluation(&self) -> &Evaluation {
        &self.evaluation
    }

    pub fn analytics(&self) -> &RelationAnalytics {
        &self.analytics
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}
