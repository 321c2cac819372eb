use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

// ===== SANCTION TEXTS =====
// Output texts are German because moderators file them verbatim.

pub mod sanction_texts {
    pub const PERMANENT_BAN: &str = "Permanenter Bann";
    pub const MAIN_ACCOUNT_BAN: &str = "Hauptaccount Bann 60 Tage";
    /// Marker shared by every temporary ban text
    pub const TEMPORARY_MARKER: &str = "60 Tage";

    /// Append the `(Logins: N)` annotation used for ranking transparency
    pub fn with_logins(text: &str, logins: u64) -> String {
        format!("{text} (Logins: {logins})")
    }
}

// ===== RECORDS =====

/// One parsed ACP activity entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub username: String,
    pub account_id: String,
    pub social_club: String,
    /// Date and time tokens joined by a single space. Never interpreted.
    pub login_timestamp: String,
    pub first_login_page: String,
    pub total_logins: u64,
}

/// Dedup identity of a record. Two lines with the same key describe the same login.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    pub username: String,
    pub account_id: String,
    pub social_club: String,
    pub login_timestamp: String,
}

impl AccountRecord {
    pub fn key(&self) -> RecordKey {
        RecordKey {
            username: self.username.clone(),
            account_id: self.account_id.clone(),
            social_club: self.social_club.clone(),
            login_timestamp: self.login_timestamp.clone(),
        }
    }

    /// Render the record in the canonical ACP line layout accepted by the parser
    pub fn to_log_line(&self) -> String {
        format!(
            "{} {} SC: {} {} FirstLogin: (Page:{}) (Total Logins: {})",
            self.username,
            self.account_id,
            self.social_club,
            self.login_timestamp,
            self.first_login_page,
            self.total_logins
        )
    }
}

// ===== RULES & SANCTIONS =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleReference {
    /// One account, several social clubs, corroborated by another account
    #[serde(rename = "§1.1")]
    MultiClub,
    /// One social club shared by more than two accounts
    #[serde(rename = "§1.4")]
    SharedClub,
    #[serde(rename = "§1.1 + §1.4")]
    Combined,
}

impl RuleReference {
    pub fn code(&self) -> &'static str {
        match self {
            RuleReference::MultiClub => "§1.1",
            RuleReference::SharedClub => "§1.4",
            RuleReference::Combined => "§1.1 + §1.4",
        }
    }
}

impl fmt::Display for RuleReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Stable identifier of a sanction, derived from its content.
/// Survives re-evaluation of the same input, so selections can be replayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SanctionId(String);

impl SanctionId {
    const LEN: usize = 12;

    pub fn derive(rule: RuleReference, account_id: &str, social_club_list: &str, scope: &str) -> Self {
        let mut hasher = Sha256::new();
        for part in [rule.code(), account_id, social_club_list, scope] {
            hasher.update(part.as_bytes());
            hasher.update([0x1f]);
        }
        let digest = format!("{:x}", hasher.finalize());
        Self(digest[..Self::LEN].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SanctionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for SanctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Uniform output row shared by all three sanction collections
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanctionRecord {
    pub id: SanctionId,
    pub rule_reference: RuleReference,
    pub account_id: String,
    pub username: String,
    pub social_club_list: String,
    pub sanction_text: String,
}

impl SanctionRecord {
    /// `scope` separates otherwise identical rows, e.g. the triggering club of a §1.4 group
    pub fn new(
        rule_reference: RuleReference,
        account_id: &str,
        username: &str,
        social_clubs: &[String],
        sanction_text: String,
        scope: &str,
    ) -> Self {
        let social_club_list = social_clubs.join(", ");
        Self {
            id: SanctionId::derive(rule_reference, account_id, &social_club_list, scope),
            rule_reference,
            account_id: account_id.to_string(),
            username: username.to_string(),
            social_club_list,
            sanction_text,
        }
    }

    /// Substring match on account id or club list
    pub fn matches(&self, query: &str) -> bool {
        self.account_id.contains(query) || self.social_club_list.contains(query)
    }
}

/// §1.1 finding for one account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiClubViolation {
    pub record: SanctionRecord,
    /// Every distinct club of the account, first-seen order
    pub social_clubs: Vec<String>,
    /// The first club (in first-seen order) that another account also uses
    pub corroborating_club: String,
    pub max_logins: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedClubEntry {
    pub record: SanctionRecord,
    /// Login count that produced the ranking
    pub total_logins: u64,
    pub is_main: bool,
}

/// §1.4 finding for one social club
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedClubViolation {
    pub social_club: String,
    pub entries: Vec<SharedClubEntry>,
}

impl SharedClubViolation {
    pub fn main_entry(&self) -> Option<&SharedClubEntry> {
        self.entries.iter().find(|entry| entry.is_main)
    }

    pub fn entry_for(&self, account_id: &str) -> Option<&SharedClubEntry> {
        self.entries
            .iter()
            .find(|entry| entry.record.account_id == account_id)
    }
}

/// Reconciled sanction for an account flagged under both rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedSanction {
    pub record: SanctionRecord,
    pub social_clubs: Vec<String>,
    pub multi_club_text: String,
    pub shared_club_texts: Vec<String>,
}

// ===== EVALUATION RESULT =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvaluationOutcome {
    NoViolations,
    ViolationsFound,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanctionSummary {
    pub multi_club: usize,
    pub shared_club_groups: usize,
    pub shared_club_entries: usize,
    pub combined: usize,
}

impl SanctionSummary {
    pub fn total_records(&self) -> usize {
        self.multi_club + self.shared_club_entries + self.combined
    }
}

/// Output of one parse → index → evaluate → combine pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub multi_club: Vec<MultiClubViolation>,
    pub shared_club: Vec<SharedClubViolation>,
    pub combined: Vec<CombinedSanction>,
}

impl Evaluation {
    pub fn is_empty(&self) -> bool {
        self.multi_club.is_empty() && self.shared_club.is_empty() && self.combined.is_empty()
    }

    pub fn outcome(&self) -> EvaluationOutcome {
        if self.is_empty() {
            EvaluationOutcome::NoViolations
        } else {
            EvaluationOutcome::ViolationsFound
        }
    }

    pub fn summary(&self) -> SanctionSummary {
        SanctionSummary {
            multi_club: self.multi_club.len(),
            shared_club_groups: self.shared_club.len(),
            shared_club_entries: self.shared_club.iter().map(|g| g.entries.len()).sum(),
            combined: self.combined.len(),
        }
    }

    /// Every sanction row in display order: §1.1, §1.4 by group, combined
    pub fn records(&self) -> Vec<&SanctionRecord> {
        self.multi_club
            .iter()
            .map(|v| &v.record)
            .chain(
                self.shared_club
                    .iter()
                    .flat_map(|group| group.entries.iter().map(|e| &e.record)),
            )
            .chain(self.combined.iter().map(|c| &c.record))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(logins: u64) -> AccountRecord {
        AccountRecord {
            username: "Max_Power".to_string(),
            account_id: "1001".to_string(),
            social_club: "ClubA".to_string(),
            login_timestamp: "2024-03-01 18:22:10".to_string(),
            first_login_page: "/spawn".to_string(),
            total_logins: logins,
        }
    }

    #[test]
    fn test_key_ignores_logins_and_page() {
        let mut other = record(99);
        other.first_login_page = "/elsewhere".to_string();
        assert_eq!(record(1).key(), other.key());
    }

    #[test]
    fn test_log_line_has_eleven_tokens() {
        let line = record(42).to_log_line();
        assert_eq!(line.split_whitespace().count(), 11);
        assert!(line.ends_with("42)"));
    }

    #[test]
    fn test_sanction_id_is_stable_and_scoped() {
        let a = SanctionId::derive(RuleReference::SharedClub, "1001", "ClubA, ClubB", "ClubA");
        let b = SanctionId::derive(RuleReference::SharedClub, "1001", "ClubA, ClubB", "ClubA");
        let c = SanctionId::derive(RuleReference::SharedClub, "1001", "ClubA, ClubB", "ClubB");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.as_str().len(), 12);
    }

    #[test]
    fn test_rule_reference_serializes_as_code() {
        let json = serde_json::to_string(&RuleReference::SharedClub).unwrap();
        assert_eq!(json, "\"§1.4\"");
    }

    #[test]
    fn test_empty_evaluation_reports_no_violations() {
        let evaluation = Evaluation::default();
        assert_eq!(evaluation.outcome(), EvaluationOutcome::NoViolations);
        assert_eq!(evaluation.summary().total_records(), 0);
    }
}
