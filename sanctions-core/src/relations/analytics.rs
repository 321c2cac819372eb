use super::index::RelationIndex;
use serde::{Deserialize, Serialize};

/// Shape of the account/club relation of one batch, reported alongside the sanctions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationAnalytics {
    pub record_count: usize,
    pub account_count: usize,
    pub social_club_count: usize,
    /// Accounts seen under more than one social club
    pub multi_club_accounts: usize,
    /// Social clubs used by more than one account
    pub shared_clubs: usize,
    /// Club with the most distinct accounts (first seen wins on ties)
    pub largest_club: Option<ClubSize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClubSize {
    pub social_club: String,
    pub accounts: usize,
}

impl RelationAnalytics {
    pub fn compute(index: &RelationIndex) -> Self {
        let multi_club_accounts = index
            .accounts()
            .filter(|account| index.clubs_of(account).map_or(0, |c| c.len()) > 1)
            .count();

        let mut shared_clubs = 0;
        let mut largest_club: Option<ClubSize> = None;
        for club in index.clubs() {
            let accounts = index.accounts_of(club).map_or(0, |a| a.len());
            if accounts > 1 {
                shared_clubs += 1;
            }
            if largest_club.as_ref().map_or(true, |largest| accounts > largest.accounts) {
                largest_club = Some(ClubSize {
                    social_club: club.to_string(),
                    accounts,
                });
            }
        }

        Self {
            record_count: index.record_count(),
            account_count: index.account_count(),
            social_club_count: index.club_count(),
            multi_club_accounts,
            shared_clubs,
            largest_club,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AccountRecord;

    fn record(id: &str, club: &str) -> AccountRecord {
        AccountRecord {
            username: id.to_lowercase(),
            account_id: id.to_string(),
            social_club: club.to_string(),
            login_timestamp: "2024-03-01 18:22:10".to_string(),
            first_login_page: "/spawn".to_string(),
            total_logins: 1,
        }
    }

    #[test]
    fn test_compute_counts() {
        let index = RelationIndex::build(&[
            record("X", "A"),
            record("X", "B"),
            record("Y", "A"),
            record("Z", "C"),
            record("W", "C"),
        ]);
        let analytics = RelationAnalytics::compute(&index);

        assert_eq!(analytics.record_count, 5);
        assert_eq!(analytics.account_count, 4);
        assert_eq!(analytics.social_club_count, 3);
        assert_eq!(analytics.multi_club_accounts, 1);
        assert_eq!(analytics.shared_clubs, 2);
        // A and C both have two accounts; A was seen first
        assert_eq!(
            analytics.largest_club,
            Some(ClubSize {
                social_club: "A".to_string(),
                accounts: 2
            })
        );
    }

    #[test]
    fn test_empty_index_has_no_largest_club() {
        let analytics = RelationAnalytics::compute(&RelationIndex::build(&[]));
        assert_eq!(analytics, RelationAnalytics::default());
    }
}
