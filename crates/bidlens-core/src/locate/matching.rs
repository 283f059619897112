use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

/// Minimum length of the shorter side for a suffix match. Stops short numbers
/// like "424" from matching unrelated values like "8424".
const MIN_SUFFIX_LEN: usize = 4;

static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)").expect("valid regex"));

/// Reduce a token to ASCII letters, digits and hyphens, lowercased.
pub fn normalize_token(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Whether an OCR word matches a candidate identifier.
///
/// Exact match after normalization, or a suffix match in either direction when
/// the shorter side has at least four characters ("TK-8424" vs "8424").
pub fn matches_identifier(word: &str, identifier: &str) -> bool {
    let w = normalize_token(word);
    let id = normalize_token(identifier);

    if w.is_empty() || id.is_empty() {
        return false;
    }
    if w == id {
        return true;
    }

    (w.ends_with(&id) && id.len() >= MIN_SUFFIX_LEN)
        || (id.ends_with(&w) && w.len() >= MIN_SUFFIX_LEN)
}

/// Parse the numeric value of an OCR price token.
///
/// `$` and `,` are removed, then the leading number is read and anything after it
/// ignored ("1,250.00*" -> 1250.00). Returns `None` when the token does not start
/// with a number.
pub fn parse_price_token(word: &str) -> Option<Decimal> {
    let cleaned: String = word.chars().filter(|c| *c != '$' && *c != ',').collect();
    let m = LEADING_NUMBER.find(cleaned.trim_start())?;
    let number = m.as_str().trim_start_matches('+').trim_end_matches('.');
    Decimal::from_str(number).ok()
}

/// Whether an OCR word holds `price`, within `max(0.01, price * 0.001)`.
pub fn matches_price(word: &str, price: Decimal) -> bool {
    let Some(parsed) = parse_price_token(word) else {
        return false;
    };
    let tolerance = price_tolerance(price);
    match parsed.checked_sub(price) {
        Some(diff) => diff.abs() < tolerance,
        None => false,
    }
}

fn price_tolerance(price: Decimal) -> Decimal {
    let relative = price.checked_mul(Decimal::new(1, 3)).unwrap_or(Decimal::MAX);
    relative.max(Decimal::new(1, 2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_normalize_token() {
        assert_eq!(normalize_token("(TK-8424)."), "tk-8424");
        assert_eq!(normalize_token("$1,234"), "1234");
    }

    #[test]
    fn test_identifier_exact() {
        assert!(matches_identifier("TK-8424", "tk-8424"));
        assert!(matches_identifier("TK-8424,", "TK-8424"));
    }

    #[test]
    fn test_identifier_word_ends_with_id() {
        assert!(matches_identifier("TK-8424", "8424"));
    }

    #[test]
    fn test_identifier_id_ends_with_word() {
        assert!(matches_identifier("8424", "TK-8424"));
    }

    #[test]
    fn test_identifier_short_suffix_rejected() {
        assert!(!matches_identifier("424", "8424"));
        assert!(!matches_identifier("8424", "424"));
    }

    #[test]
    fn test_identifier_empty_never_matches() {
        assert!(!matches_identifier("***", "TK-8424"));
        assert!(!matches_identifier("TK-8424", ""));
    }

    #[test]
    fn test_parse_price_token() {
        assert_eq!(parse_price_token("$1,234.50"), Some(dec!(1234.50)));
        assert_eq!(parse_price_token("77,000.00"), Some(dec!(77000)));
        assert_eq!(parse_price_token("1,250.00*"), Some(dec!(1250)));
        assert_eq!(parse_price_token("12."), Some(dec!(12)));
        assert_eq!(parse_price_token("-5"), Some(dec!(-5)));
        assert_eq!(parse_price_token("USD"), None);
        assert_eq!(parse_price_token(""), None);
    }

    #[test]
    fn test_price_with_currency_and_separators() {
        assert!(matches_price("$1,234.50", dec!(1234.50)));
    }

    #[test]
    fn test_price_tolerance_is_relative() {
        // tolerance for 1234.50 is 1.2345
        assert!(matches_price("1234.00", dec!(1234.50)));
        assert!(!matches_price("1236.00", dec!(1234.50)));
    }

    #[test]
    fn test_price_tolerance_floor() {
        assert!(matches_price("5.004", dec!(5.00)));
        assert!(!matches_price("5.01", dec!(5.00)));
    }

    #[test]
    fn test_price_unparsable() {
        assert!(!matches_price("TK-8424", dec!(8424)));
        assert!(!matches_price("Total", dec!(1)));
    }
}
