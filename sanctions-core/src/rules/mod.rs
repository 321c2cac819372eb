// Main rules module - delegates to one file per rule:
// - engine.rs: RuleEngine, the SanctionRule trait and the config-driven pipeline
// - multi_club.rs: §1.1, one account under several social clubs
// - shared_club.rs: §1.4, one social club shared by too many accounts
// - combiner.rs: reconciliation of accounts flagged by both rules

pub mod combiner;
pub mod engine;
pub mod multi_club;
pub mod shared_club;

pub use combiner::{combine, combine_all, combine_findings};
pub use engine::*;
pub use multi_club::MultiClubRule;
pub use shared_club::SharedClubRule;
