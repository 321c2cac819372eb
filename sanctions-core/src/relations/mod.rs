pub mod analytics;
pub mod index;

// Re-export for easy access
pub use analytics::RelationAnalytics;
pub use index::RelationIndex;
