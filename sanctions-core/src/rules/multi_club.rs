use super::engine::{RuleFindings, SanctionRule};
use crate::config::RuleThresholds;
use crate::relations::index::{OrderedSet, RelationIndex};
use crate::types::{sanction_texts, MultiClubViolation, RuleReference, SanctionRecord};

/// §1.1 - one account played under several social clubs.
///
/// Multi-club usage alone is not enough: at least one of the clubs must also
/// be used by a different account.
pub struct MultiClubRule {
    min_clubs_per_account: usize,
}

impl MultiClubRule {
    pub fn new(thresholds: &RuleThresholds) -> Self {
        Self {
            // a single club is never a §1.1 violation
            min_clubs_per_account: thresholds.min_clubs_per_account.max(1),
        }
    }

    pub fn evaluate(&self, index: &RelationIndex) -> Vec<MultiClubViolation> {
        let mut violations = Vec::new();

        for account_id in index.accounts() {
            let Some(clubs) = index.clubs_of(account_id) else {
                continue;
            };
            if clubs.len() <= self.min_clubs_per_account {
                continue;
            }
            let Some(corroborating_club) = first_corroborating_club(index, account_id, clubs) else {
                log::debug!("§1.1: {account_id} uses {} clubs, none shared", clubs.len());
                continue;
            };

            let max_logins = index.max_logins_of(account_id);
            let record = SanctionRecord::new(
                RuleReference::MultiClub,
                account_id,
                index.username_of(account_id),
                clubs.as_slice(),
                sanction_texts::with_logins(sanction_texts::PERMANENT_BAN, max_logins),
                "",
            );
            log::debug!("§1.1: {account_id} corroborated via {corroborating_club}");

            violations.push(MultiClubViolation {
                record,
                social_clubs: clubs.as_slice().to_vec(),
                corroborating_club: corroborating_club.to_string(),
                max_logins,
            });
        }

        violations
    }
}

/// Clubs are checked in first-seen order and the scan stops at the first
/// club that another account also uses.
fn first_corroborating_club<'a>(
    index: &RelationIndex,
    account_id: &str,
    clubs: &'a OrderedSet,
) -> Option<&'a str> {
    clubs
        .iter()
        .find(|club| index.is_shared_with_other(club, account_id))
}

impl SanctionRule for MultiClubRule {
    fn apply(&self, index: &RelationIndex, findings: &mut RuleFindings) {
        findings.multi_club.extend(self.evaluate(index));
    }

    fn name(&self) -> &str {
        "MultiClub"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AccountRecord;

    fn record(id: &str, club: &str, logins: u64) -> AccountRecord {
        AccountRecord {
            username: format!("user_{id}"),
            account_id: id.to_string(),
            social_club: club.to_string(),
            login_timestamp: "2024-03-01 18:22:10".to_string(),
            first_login_page: "/spawn".to_string(),
            total_logins: logins,
        }
    }

    fn evaluate(records: &[AccountRecord]) -> Vec<MultiClubViolation> {
        MultiClubRule::new(&RuleThresholds::default()).evaluate(&RelationIndex::build(records))
    }

    #[test]
    fn test_single_club_account_never_flagged() {
        let violations = evaluate(&[record("X", "A", 1), record("Y", "A", 1), record("Z", "A", 1)]);
        assert!(violations.is_empty());
    }

    #[test]
    fn test_uncorroborated_multi_club_not_flagged() {
        let violations = evaluate(&[record("X", "A", 1), record("X", "B", 1), record("Y", "C", 1)]);
        assert!(violations.is_empty());
    }

    #[test]
    fn test_corroborated_account_lists_all_clubs() {
        let violations = evaluate(&[record("X", "A", 3), record("X", "B", 8), record("Y", "A", 1)]);

        assert_eq!(violations.len(), 1);
        let violation = &violations[0];
        assert_eq!(violation.record.account_id, "X");
        assert_eq!(violation.record.username, "user_X");
        assert_eq!(violation.record.social_club_list, "A, B");
        assert_eq!(violation.record.sanction_text, "Permanenter Bann (Logins: 8)");
        assert_eq!(violation.record.rule_reference, RuleReference::MultiClub);
        assert_eq!(violation.max_logins, 8);
    }

    #[test]
    fn test_scan_stops_at_first_corroborating_club() {
        // Both A and B are shared, only the first-seen club is reported
        let violations = evaluate(&[
            record("X", "B", 1),
            record("X", "A", 1),
            record("Y", "A", 1),
            record("Z", "B", 1),
        ]);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].corroborating_club, "B");
        assert_eq!(violations[0].social_clubs, vec!["B", "A"]);
    }

    #[test]
    fn test_corroboration_by_later_club() {
        let violations = evaluate(&[record("X", "A", 1), record("X", "B", 1), record("Y", "B", 1)]);
        assert_eq!(violations[0].corroborating_club, "B");
    }

    #[test]
    fn test_zero_threshold_still_needs_two_clubs() {
        let thresholds = RuleThresholds {
            min_clubs_per_account: 0,
            ..RuleThresholds::default()
        };
        let index = RelationIndex::build(&[record("X", "A", 1), record("Y", "A", 1), record("Z", "A", 1)]);
        assert!(MultiClubRule::new(&thresholds).evaluate(&index).is_empty());
    }

    #[test]
    fn test_threshold_is_configurable() {
        let thresholds = RuleThresholds {
            min_clubs_per_account: 2,
            ..RuleThresholds::default()
        };
        let index = RelationIndex::build(&[record("X", "A", 1), record("X", "B", 1), record("Y", "A", 1)]);
        assert!(MultiClubRule::new(&thresholds).evaluate(&index).is_empty());
    }
}
