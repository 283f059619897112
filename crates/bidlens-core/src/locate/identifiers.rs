use crate::locate::matching::normalize_token;
use regex::Regex;
use std::sync::LazyLock;

static TAG_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z]{2,})-").expect("valid regex"));

static DIGIT_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{4,}").expect("valid regex"));

/// Derive search candidates from an equipment tag string.
///
/// - "TK-8424" -> ["TK-8424", "8424"]
/// - "TK-5031, -5032" -> ["TK-5031", "5031", "TK-5032", "5032"]
///
/// A token starting with `-` borrows the alphabetic prefix of the last prefixed
/// token. Each full token is followed by its first run of four or more digits.
/// Callers try candidates in the returned order.
pub fn extract_identifiers(tag: &str) -> Vec<String> {
    let mut identifiers = Vec::new();
    let mut last_prefix: Option<&str> = None;

    for token in tag
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        let full = match last_prefix {
            Some(prefix) if token.starts_with('-') => format!("{prefix}{token}"),
            _ => token.to_string(),
        };

        if let Some(caps) = TAG_PREFIX.captures(token) {
            last_prefix = caps.get(1).map(|m| m.as_str());
        }

        let digits = DIGIT_RUN.find(&full).map(|m| m.as_str().to_string());
        identifiers.push(full);
        if let Some(d) = digits {
            identifiers.push(d);
        }
    }

    identifiers
}

/// Derive search candidates from a free-text contact value (address, phone, ...).
///
/// The value is split on whitespace, commas and semicolons. Tokens shorter than
/// three significant characters are dropped, duplicates are removed, and tokens
/// carrying a digit or `@` come first since they are the most distinctive.
pub fn contact_identifiers(value: &str) -> Vec<String> {
    let mut distinctive = Vec::new();
    let mut plain = Vec::new();

    for token in value
        .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .filter(|t| normalize_token(t).len() >= 3)
    {
        if distinctive.iter().chain(plain.iter()).any(|t: &String| t == token) {
            continue;
        }
        if token.chars().any(|c| c.is_ascii_digit() || c == '@') {
            distinctive.push(token.to_string());
        } else {
            plain.push(token.to_string());
        }
    }

    distinctive.extend(plain);
    distinctive
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_tag() {
        assert_eq!(extract_identifiers("TK-8424"), vec!["TK-8424", "8424"]);
    }

    #[test]
    fn test_continuation_tag_uses_last_prefix() {
        assert_eq!(
            extract_identifiers("TK-5031, -5032"),
            vec!["TK-5031", "5031", "TK-5032", "5032"]
        );
    }

    #[test]
    fn test_prefix_switches_between_tags() {
        assert_eq!(
            extract_identifiers("TK-1001 -1002 PV-2001 -2002"),
            vec!["TK-1001", "1001", "TK-1002", "1002", "PV-2001", "2001", "PV-2002", "2002"]
        );
    }

    #[test]
    fn test_continuation_without_prefix_kept_verbatim() {
        assert_eq!(extract_identifiers("-5032"), vec!["-5032", "5032"]);
    }

    #[test]
    fn test_short_numbers_have_no_numeric_form() {
        assert_eq!(extract_identifiers("P-12"), vec!["P-12"]);
    }

    #[test]
    fn test_lowercase_prefix_is_not_remembered() {
        assert_eq!(extract_identifiers("tk-5031, -5032"), vec!["tk-5031", "5031", "-5032", "5032"]);
    }

    #[test]
    fn test_empty_tag() {
        assert!(extract_identifiers("  , ").is_empty());
    }

    #[test]
    fn test_contact_identifiers_prefer_distinctive_tokens() {
        assert_eq!(
            contact_identifiers("123 Main Street, Houston TX 77002"),
            vec!["123", "77002", "Main", "Street", "Houston"]
        );
    }

    #[test]
    fn test_contact_identifiers_keep_email_whole() {
        assert_eq!(contact_identifiers("sales@acme.com"), vec!["sales@acme.com"]);
    }

    #[test]
    fn test_contact_identifiers_dedupe() {
        assert_eq!(contact_identifiers("555-1234 555-1234"), vec!["555-1234"]);
    }
}
