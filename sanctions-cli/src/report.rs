//! Plain-text rendering of a session for the terminal

use sanctions_core::{
    Evaluation, EvaluationOutcome, RelationAnalytics, SanctionRecord, SanctionSession, SanctionSummary,
};

/// What a run has to report once exclusions and the filter are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewStatus {
    /// The evaluation itself found nothing
    NoViolations,
    /// Violations exist but `--exclude`/`--filter` hide every one of them
    AllHidden,
    /// Number of sanctions left to list and export
    Sanctions(usize),
}

impl ReviewStatus {
    /// `evaluated` is the session as loaded, `view` what is left after review
    pub fn of(evaluated: EvaluationOutcome, view: &SanctionSession) -> Self {
        if evaluated == EvaluationOutcome::NoViolations {
            return ReviewStatus::NoViolations;
        }
        match view.summary().total_records() {
            0 => ReviewStatus::AllHidden,
            n => ReviewStatus::Sanctions(n),
        }
    }
}

/// Grouped listing: §1.1, then one block per §1.4 club, then combined.
/// Every row carries the id `--exclude` expects.
pub fn format_listing(evaluation: &Evaluation) -> String {
    let mut lines = Vec::new();

    if !evaluation.multi_club.is_empty() {
        lines.push(format!("\n🔗 §1.1 Mehrere Socialclubs ({})", evaluation.multi_club.len()));
        for violation in &evaluation.multi_club {
            lines.push(format!(
                "{}   (via {})",
                row(&violation.record, "  "),
                violation.corroborating_club
            ));
        }
    }

    if !evaluation.shared_club.is_empty() {
        lines.push(format!("\n👥 §1.4 Geteilte Socialclubs ({})", evaluation.shared_club.len()));
        for group in &evaluation.shared_club {
            lines.push(format!("   SC: {} ({} Accounts)", group.social_club, group.entries.len()));
            for entry in &group.entries {
                let marker = if entry.is_main { "★ " } else { "  " };
                lines.push(format!("  {}", row(&entry.record, marker)));
            }
        }
    }

    if !evaluation.combined.is_empty() {
        lines.push(format!("\n⚖️  §1.1 + §1.4 Kombiniert ({})", evaluation.combined.len()));
        for combined in &evaluation.combined {
            lines.push(row(&combined.record, "  "));
        }
    }

    lines.join("\n")
}

fn row(record: &SanctionRecord, marker: &str) -> String {
    format!(
        " {}[{}] {} ({}) | {} | {}",
        marker, record.id, record.account_id, record.username, record.social_club_list, record.sanction_text
    )
}

pub fn format_summary(summary: &SanctionSummary) -> String {
    [
        "📊 Sanktionen:".to_string(),
        format!("   - §1.1: {}", summary.multi_club),
        format!(
            "   - §1.4: {} in {} Socialclubs",
            summary.shared_club_entries, summary.shared_club_groups
        ),
        format!("   - §1.1 + §1.4: {}", summary.combined),
        format!("   - Gesamt: {}", summary.total_records()),
    ]
    .join("\n")
}

pub fn format_analytics(analytics: &RelationAnalytics) -> String {
    let mut lines = vec![
        "📈 Eingabe:".to_string(),
        format!("   - Einträge: {}", analytics.record_count),
        format!("   - Accounts: {}", analytics.account_count),
        format!("   - Socialclubs: {}", analytics.social_club_count),
        format!("   - Accounts mit mehreren Socialclubs: {}", analytics.multi_club_accounts),
        format!("   - Geteilte Socialclubs: {}", analytics.shared_clubs),
    ];
    if let Some(largest) = &analytics.largest_club {
        lines.push(format!(
            "   - Größter Socialclub: {} ({} Accounts)",
            largest.social_club, largest.accounts
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sanctions_core::SanctionProcessor;

    const LOG: &str = "\
p P SC: C 2024-03-01 10:00:00 FirstLogin: (Page:/a) (Total Logins: 10)
q Q SC: C 2024-03-01 10:00:00 FirstLogin: (Page:/a) (Total Logins: 3)
r R SC: C 2024-03-01 10:00:00 FirstLogin: (Page:/a) (Total Logins: 7)
x X SC: A 2024-03-01 10:00:00 FirstLogin: (Page:/a) (Total Logins: 2)
x X SC: B 2024-03-01 10:00:00 FirstLogin: (Page:/a) (Total Logins: 2)
y Y SC: A 2024-03-01 10:00:00 FirstLogin: (Page:/a) (Total Logins: 1)
";

    fn session(log: &str) -> SanctionSession {
        let processor = SanctionProcessor::default();
        let mut session = SanctionSession::default();
        session.evaluate(&processor, &processor.parse_text(log));
        session
    }

    #[test]
    fn test_listing_groups_and_marks_main_account() {
        let run = SanctionProcessor::default().process_text(LOG);
        let listing = format_listing(&run.evaluation);

        assert!(listing.contains("§1.1 Mehrere Socialclubs (1)"));
        assert!(listing.contains("SC: C (3 Accounts)"));
        assert!(listing.contains("★ ["));
        assert!(listing.contains("P (p) | C | Hauptaccount Bann 60 Tage (Logins: 10)"));
        assert!(!listing.contains("Kombiniert"));

        // every id is listed so it can be passed to --exclude
        for record in run.evaluation.records() {
            assert!(listing.contains(record.id.as_str()));
        }
    }

    #[test]
    fn test_empty_listing() {
        assert!(format_listing(&Evaluation::default()).is_empty());
    }

    #[test]
    fn test_summary_totals() {
        let run = SanctionProcessor::default().process_text(LOG);
        let summary = format_summary(&run.evaluation.summary());
        assert!(summary.contains("§1.4: 3 in 1 Socialclubs"));
        assert!(summary.ends_with("Gesamt: 4"));

        let analytics = format_analytics(&run.analytics);
        assert!(analytics.contains("Größter Socialclub: C (3 Accounts)"));
    }

    #[test]
    fn test_filter_hiding_everything_is_not_no_violations() {
        let session = session(LOG);
        let status = ReviewStatus::of(session.outcome(), &session.filter("nomatch"));
        assert_eq!(status, ReviewStatus::AllHidden);
    }

    #[test]
    fn test_review_status_counts_view() {
        let session = session(LOG);
        assert_eq!(ReviewStatus::of(session.outcome(), &session.filter("C")), ReviewStatus::Sanctions(3));
        assert_eq!(ReviewStatus::of(session.outcome(), &session), ReviewStatus::Sanctions(4));
    }

    #[test]
    fn test_clean_input_is_no_violations() {
        let session = session("y Y SC: A 2024-03-01 10:00:00 FirstLogin: (Page:/a) (Total Logins: 1)\n");
        assert_eq!(ReviewStatus::of(session.outcome(), &session), ReviewStatus::NoViolations);
    }
}
