use crate::types::AccountRecord;
use std::collections::{HashMap, HashSet};

/// Insertion-ordered set of strings. Iteration order is first-seen order,
/// which keeps club listings and tie-breaks deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedSet {
    items: Vec<String>,
    seen: HashSet<String>,
}

impl OrderedSet {
    /// Returns false when the value was already present
    pub fn insert(&mut self, value: &str) -> bool {
        if self.seen.contains(value) {
            return false;
        }
        self.seen.insert(value.to_string());
        self.items.push(value.to_string());
        true
    }

    pub fn contains(&self, value: &str) -> bool {
        self.seen.contains(value)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }
}

/// Account ↔ social club associations for one batch of records
#[derive(Debug, Clone, Default)]
pub struct RelationIndex {
    clubs_by_account: HashMap<String, OrderedSet>,
    records_by_club: HashMap<String, Vec<AccountRecord>>,
    accounts_by_club: HashMap<String, OrderedSet>,
    usernames: HashMap<String, String>,
    max_logins: HashMap<String, u64>,
    account_order: Vec<String>,
    club_order: Vec<String>,
    record_count: usize,
}

impl RelationIndex {
    pub fn build(records: &[AccountRecord]) -> Self {
        let mut index = Self::default();

        for record in records {
            index.record_count += 1;

            if !index.clubs_by_account.contains_key(&record.account_id) {
                index.account_order.push(record.account_id.clone());
                index
                    .usernames
                    .insert(record.account_id.clone(), record.username.clone());
            }
            if !index.records_by_club.contains_key(&record.social_club) {
                index.club_order.push(record.social_club.clone());
            }

            let max_logins = index.max_logins.entry(record.account_id.clone()).or_insert(0);
            *max_logins = (*max_logins).max(record.total_logins);

            index
                .clubs_by_account
                .entry(record.account_id.clone())
                .or_default()
                .insert(&record.social_club);
            index
                .records_by_club
                .entry(record.social_club.clone())
                .or_default()
                .push(record.clone());
            index
                .accounts_by_club
                .entry(record.social_club.clone())
                .or_default()
                .insert(&record.account_id);
        }

        log::debug!(
            "Indexed {} records: {} accounts, {} social clubs",
            index.record_count,
            index.account_order.len(),
            index.club_order.len()
        );
        index
    }

    /// Account ids in first-seen order
    pub fn accounts(&self) -> impl Iterator<Item = &str> {
        self.account_order.iter().map(String::as_str)
    }

    /// Social clubs in first-seen order
    pub fn clubs(&self) -> impl Iterator<Item = &str> {
        self.club_order.iter().map(String::as_str)
    }

    pub fn clubs_of(&self, account_id: &str) -> Option<&OrderedSet> {
        self.clubs_by_account.get(account_id)
    }

    pub fn records_of(&self, social_club: &str) -> &[AccountRecord] {
        self.records_by_club
            .get(social_club)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn accounts_of(&self, social_club: &str) -> Option<&OrderedSet> {
        self.accounts_by_club.get(social_club)
    }

    /// Username of the first record seen for the account
    pub fn username_of(&self, account_id: &str) -> &str {
        self.usernames
            .get(account_id)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Whether any account other than `account_id` uses `social_club`
    pub fn is_shared_with_other(&self, social_club: &str, account_id: &str) -> bool {
        self.accounts_of(social_club)
            .map(|accounts| accounts.iter().any(|other| other != account_id))
            .unwrap_or(false)
    }

    /// Highest `total_logins` over all records of the account
    pub fn max_logins_of(&self, account_id: &str) -> u64 {
        self.max_logins.get(account_id).copied().unwrap_or(0)
    }

    pub fn record_count(&self) -> usize {
        self.record_count
    }

    pub fn account_count(&self) -> usize {
        self.account_order.len()
    }

    pub fn club_count(&self) -> usize {
        self.club_order.len()
    }
}
