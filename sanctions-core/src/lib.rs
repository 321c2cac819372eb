// ACP Sanctions Core Library
//
// Parses ACP login exports, indexes account ↔ social club relations and
// evaluates the multi-account rules (§1.1, §1.4) into sanction recommendations.

pub mod action_log;
pub mod config;
pub mod error;
pub mod export;
pub mod preprocessors;
pub mod processor;
pub mod relations;
pub mod rules;
pub mod session;
pub mod types;

// Re-export main types and functions for easy use
pub use action_log::{ActionLog, FileActionLog, NoOpActionLog};
pub use config::AnalysisConfig;
pub use error::{SanctionError, SanctionResult};
pub use export::{ExportFormat, ExportLayout};
pub use preprocessors::{AcpLogPreprocessor, Preprocessor};
pub use processor::{AnalysisRun, SanctionProcessor};
pub use relations::{RelationAnalytics, RelationIndex};
pub use rules::{combine, RuleEngine};
pub use session::SanctionSession;
pub use types::*;
