//! Record preprocessors
//!
//! Turns raw ACP log text into deduplicated [`AccountRecord`]s that feed the
//! relation index.
//!
//! ```text
//! ACP log text
//!     ↓
//! [Preprocessor::parse_line]   (malformed lines dropped)
//!     ↓
//! merge_records                (one record per identity key)
//!     ↓
//! Vec<AccountRecord>
//! ```
//!
//! [`AccountRecord`]: crate::types::AccountRecord

pub mod acp_log;
pub mod preprocessor;

pub use acp_log::AcpLogPreprocessor;
pub use preprocessor::{merge_records, Preprocessor};
