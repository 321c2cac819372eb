use super::preprocessor::Preprocessor;
use crate::types::AccountRecord;

/// Minimum whitespace-separated tokens of a usable ACP line
pub const MIN_TOKENS: usize = 11;

const USERNAME: usize = 0;
const ACCOUNT_ID: usize = 1;
const SOCIAL_CLUB: usize = 3;
const LOGIN_DATE: usize = 4;
const LOGIN_TIME: usize = 5;
const FIRST_LOGIN_PAGE: usize = 7;

/// Parser for the admin-panel account export.
///
/// Lines look like
/// `Max_Power 1001 SC: ClubA 2024-03-01 18:22:10 FirstLogin: (Page:/spawn) (Total Logins: 42)`.
/// Only token positions matter; label tokens are never checked.
#[derive(Debug, Clone, Default)]
pub struct AcpLogPreprocessor;

impl AcpLogPreprocessor {
    pub fn new() -> Self {
        Self
    }
}

impl Preprocessor for AcpLogPreprocessor {
    fn parse_line(&self, line: &str) -> Option<AccountRecord> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < MIN_TOKENS {
            return None;
        }

        Some(AccountRecord {
            username: tokens[USERNAME].to_string(),
            account_id: tokens[ACCOUNT_ID].to_string(),
            social_club: tokens[SOCIAL_CLUB].to_string(),
            login_timestamp: format!("{} {}", tokens[LOGIN_DATE], tokens[LOGIN_TIME]),
            first_login_page: strip_page_decoration(tokens[FIRST_LOGIN_PAGE]),
            total_logins: parse_login_count(tokens[tokens.len() - 1]),
        })
    }

    fn name(&self) -> &str {
        "AcpLog"
    }
}

/// `(Page:/spawn)` → `/spawn`
fn strip_page_decoration(token: &str) -> String {
    let inner = token.trim_start_matches('(').trim_end_matches(')');
    inner.strip_prefix("Page:").unwrap_or(inner).to_string()
}

/// `42)` / `Logins:42)` → 42. Anything that is not a bare number once the
/// decoration is gone counts as 0.
fn parse_login_count(token: &str) -> u64 {
    token
        .trim_matches(|c: char| !c.is_ascii_digit())
        .parse()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str =
        "Max_Power 1001 SC: ClubA 2024-03-01 18:22:10 FirstLogin: (Page:/spawn) (Total Logins: 42)";

    #[test]
    fn test_parse_canonical_line() {
        let record = AcpLogPreprocessor::new().parse_line(LINE).unwrap();
        assert_eq!(record.username, "Max_Power");
        assert_eq!(record.account_id, "1001");
        assert_eq!(record.social_club, "ClubA");
        assert_eq!(record.login_timestamp, "2024-03-01 18:22:10");
        assert_eq!(record.first_login_page, "/spawn");
        assert_eq!(record.total_logins, 42);
    }

    #[test]
    fn test_short_line_is_dropped() {
        let parser = AcpLogPreprocessor::new();
        assert!(parser.parse_line("Max_Power 1001 SC: ClubA").is_none());
        assert!(parser.parse_line("").is_none());
    }

    #[test]
    fn test_login_count_uses_last_token() {
        let line = format!("{LINE} trailing 7)");
        let record = AcpLogPreprocessor::new().parse_line(&line).unwrap();
        assert_eq!(record.total_logins, 7);
    }

    #[test]
    fn test_unparsable_login_count_is_zero() {
        assert_eq!(parse_login_count("Logins:n/a)"), 0);
        assert_eq!(parse_login_count("4x2)"), 0);
        assert_eq!(parse_login_count(")"), 0);
        assert_eq!(parse_login_count("Logins:17)"), 17);
    }

    #[test]
    fn test_page_without_decoration_passes_through() {
        assert_eq!(strip_page_decoration("/garage"), "/garage");
        assert_eq!(strip_page_decoration("(Page:)"), "");
    }

    #[test]
    fn test_parse_text_skips_noise_and_merges() {
        let text = format!(
            "header line\n{LINE}\n\n{}\n{LINE}\n",
            LINE.replace("42)", "8)")
        );
        let records = AcpLogPreprocessor::new().parse_text(&text);
        assert_eq!(records.len(), 1);
        // 42 + 8, then the repeated 42 collides with 50 and is summed again
        assert_eq!(records[0].total_logins, 92);
    }

    #[test]
    fn test_reparsing_rendered_records_is_idempotent() {
        let text = format!(
            "{LINE}\n{}\n{}",
            LINE.replace("1001", "1002"),
            LINE.replace("ClubA", "ClubB").replace("42)", "3)")
        );
        let parser = AcpLogPreprocessor::new();
        let first = parser.parse_text(&text);
        let rendered: Vec<String> = first.iter().map(|r| r.to_log_line()).collect();
        let second = parser.parse_text(&rendered.join("\n"));
        assert_eq!(first, second);
    }
}
