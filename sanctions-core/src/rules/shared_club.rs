use super::engine::{RuleFindings, SanctionRule};
use crate::config::RuleThresholds;
use crate::relations::RelationIndex;
use crate::types::{
    sanction_texts, AccountRecord, RuleReference, SanctionRecord, SharedClubEntry, SharedClubViolation,
};
use std::collections::HashMap;

/// §1.4 - one social club shared by more than two accounts.
///
/// The account with the most logins keeps a temporary ban as the main
/// account, every other account in the club is banned permanently.
pub struct SharedClubRule {
    max_accounts_per_club: usize,
}

impl SharedClubRule {
    pub fn new(thresholds: &RuleThresholds) -> Self {
        Self {
            max_accounts_per_club: thresholds.max_accounts_per_club,
        }
    }

    pub fn evaluate(&self, index: &RelationIndex) -> Vec<SharedClubViolation> {
        let mut violations = Vec::new();

        for social_club in index.clubs() {
            let Some(accounts) = index.accounts_of(social_club) else {
                continue;
            };
            if accounts.len() <= self.max_accounts_per_club {
                continue;
            }

            let records = index.records_of(social_club);
            let (main_account, ranking) = rank_accounts(records);

            let entries: Vec<SharedClubEntry> = accounts
                .iter()
                .map(|account_id| {
                    let total_logins = ranking.get(account_id).copied().unwrap_or(0);
                    let is_main = main_account == Some(account_id);
                    let base_text = if is_main {
                        sanction_texts::MAIN_ACCOUNT_BAN
                    } else {
                        sanction_texts::PERMANENT_BAN
                    };
                    let username = index.username_of(account_id);
                    let clubs = index
                        .clubs_of(account_id)
                        .map(|clubs| clubs.as_slice())
                        .unwrap_or(&[]);

                    SharedClubEntry {
                        record: SanctionRecord::new(
                            RuleReference::SharedClub,
                            account_id,
                            username,
                            clubs,
                            sanction_texts::with_logins(base_text, total_logins),
                            social_club,
                        ),
                        total_logins,
                        is_main,
                    }
                })
                .collect();

            log::debug!(
                "§1.4: {social_club} shared by {} accounts, main {:?}",
                entries.len(),
                main_account
            );
            violations.push(SharedClubViolation {
                social_club: social_club.to_string(),
                entries,
            });
        }

        violations
    }
}

/// Stable descending sort by `total_logins`. The first record of the sorted
/// list names the main account; the first time an account shows up in the
/// sorted list fixes its ranking count.
fn rank_accounts(records: &[AccountRecord]) -> (Option<&str>, HashMap<&str, u64>) {
    let mut sorted: Vec<&AccountRecord> = records.iter().collect();
    sorted.sort_by(|a, b| b.total_logins.cmp(&a.total_logins));

    let mut ranking = HashMap::new();
    for record in &sorted {
        ranking
            .entry(record.account_id.as_str())
            .or_insert(record.total_logins);
    }

    let main_account = sorted.first().map(|record| record.account_id.as_str());
    (main_account, ranking)
}

impl SanctionRule for SharedClubRule {
    fn apply(&self, index: &RelationIndex, findings: &mut RuleFindings) {
        findings.shared_club.extend(self.evaluate(index));
    }

    fn name(&self) -> &str {
        "SharedClub"
    }
}
