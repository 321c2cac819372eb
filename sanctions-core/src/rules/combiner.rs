use super::engine::RuleFindings;
use crate::types::{sanction_texts, CombinedSanction, Evaluation, RuleReference, SanctionRecord};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

static LOGINS_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(Logins:\s*(\d+)\)\s*$").unwrap());

/// Trailing `(Logins: N)` annotation, 0 when absent
fn annotated_logins(text: &str) -> u64 {
    LOGINS_PATTERN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Merge two sanction texts for the same account.
///
/// Two permanent bans add up their login annotations. A temporary ban next to
/// anything else escalates to a plain permanent ban.
pub fn combine(first: &str, second: &str) -> String {
    combine_all([first, second])
}

/// Merge any number of sanction texts for the same account.
///
/// Repeated texts count once, so the result does not depend on the order of
/// the inputs. Any temporary ban escalates the whole set to a plain permanent
/// ban; a set of permanent bans adds up its login annotations.
pub fn combine_all<'a>(texts: impl IntoIterator<Item = &'a str>) -> String {
    let mut distinct: Vec<&str> = Vec::new();
    for text in texts {
        if !distinct.contains(&text) {
            distinct.push(text);
        }
    }

    let permanent = sanction_texts::PERMANENT_BAN;
    match distinct.as_slice() {
        [] => permanent.to_string(),
        [only] => only.to_string(),
        texts if texts.iter().any(|t| t.contains(sanction_texts::TEMPORARY_MARKER)) => permanent.to_string(),
        texts if texts.iter().all(|t| t.contains(permanent)) => {
            let logins = texts
                .iter()
                .fold(0u64, |sum, text| sum.saturating_add(annotated_logins(text)));
            sanction_texts::with_logins(permanent, logins)
        }
        _ => permanent.to_string(),
    }
}

/// Reconcile accounts flagged under both rules.
///
/// Each such account gets exactly one combined sanction and leaves the §1.1
/// list. The §1.4 groups are returned untouched, so the account still shows up
/// in its club listing.
pub fn combine_findings(findings: RuleFindings) -> Evaluation {
    let RuleFindings {
        multi_club,
        shared_club,
    } = findings;

    // account -> its §1.4 texts in group order
    let mut shared_texts_by_account: HashMap<String, Vec<String>> = HashMap::new();
    for group in &shared_club {
        for entry in &group.entries {
            shared_texts_by_account
                .entry(entry.record.account_id.clone())
                .or_default()
                .push(entry.record.sanction_text.clone());
        }
    }

    let mut combined = Vec::new();
    let mut combined_accounts = HashSet::new();

    for violation in &multi_club {
        let account_id = &violation.record.account_id;
        let Some(shared_club_texts) = shared_texts_by_account.get(account_id.as_str()) else {
            continue;
        };

        let sanction_text = combine_all(
            std::iter::once(violation.record.sanction_text.as_str())
                .chain(shared_club_texts.iter().map(String::as_str)),
        );
        log::debug!("Combined sanction for {account_id}: {sanction_text}");

        combined.push(CombinedSanction {
            record: SanctionRecord::new(
                RuleReference::Combined,
                account_id,
                &violation.record.username,
                &violation.social_clubs,
                sanction_text,
                "",
            ),
            social_clubs: violation.social_clubs.clone(),
            multi_club_text: violation.record.sanction_text.clone(),
            shared_club_texts: shared_club_texts.clone(),
        });
        combined_accounts.insert(account_id.clone());
    }

    let multi_club = multi_club
        .into_iter()
        .filter(|violation| !combined_accounts.contains(&violation.record.account_id))
        .collect();

    Evaluation {
        multi_club,
        shared_club,
        combined,
    }
}
