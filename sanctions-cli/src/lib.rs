// All analysis lives in acp-sanctions-core
// This crate is the command line front end around it

// CLI-specific modules
pub mod report;

// Re-export core types for convenience
pub use sanctions_core::*;

// Re-export CLI utilities
pub use report::{format_analytics, format_listing, format_summary, ReviewStatus};
