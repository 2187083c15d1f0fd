//! Monetary amount grammar for statement rows.
//!
//! Accepted: `1,234`, `1,234.56`, `45.00`, `45.5`, `45.00CR`, `1,200.00*`.
//! Rejected: bare integers such as `45` or `2025`, which are far more often
//! dates, reference numbers or page numbers than amounts.

use regex::Regex;
use std::sync::LazyLock;

static AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?P<int>\d{1,3}(?:,\d{3})+|\d+)",
        r"(?P<frac>\.\d{1,2})?",
        r"(?P<cr>(?i:CR))?",
        r"\*?$"
    ))
    .expect("valid amount regex")
});

static PLAIN_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?$").expect("valid plain number regex")
});

/// A billed amount as printed on the statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatementAmount {
    /// Signed value; credits are negative
    pub value: f64,
    pub is_credit: bool,
}

/// Parse a token against the billed-amount grammar.
pub fn parse_amount(token: &str) -> Option<StatementAmount> {
    let caps = AMOUNT_RE.captures(token.trim())?;
    let int = &caps["int"];
    let frac = caps.name("frac").map(|m| m.as_str()).unwrap_or("");
    if !int.contains(',') && frac.is_empty() {
        return None;
    }

    let magnitude: f64 = format!("{}{}", int.replace(',', ""), frac).parse().ok()?;
    let is_credit = caps.name("cr").is_some();
    Some(StatementAmount {
        value: if is_credit { -magnitude } else { magnitude },
        is_credit,
    })
}

/// True if the token matches the billed-amount grammar.
pub fn is_amount(token: &str) -> bool {
    parse_amount(token).is_some()
}

/// Lenient parse used for the foreign-currency column, where whole numbers
/// (`JPY 5000`) are normal.
pub fn parse_plain_number(token: &str) -> Option<f64> {
    let token = token.trim();
    if !PLAIN_NUMBER_RE.is_match(token) {
        return None;
    }
    token.replace(',', "").parse().ok()
}

/// Format a non-negative value with thousands separators and a fixed number of
/// fraction digits, the way statements print it.
pub fn format_grouped(value: f64, frac_digits: usize) -> String {
    let fixed = format!("{:.*}", frac_digits, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (fixed.clone(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{grouped}.{f}"),
        None => grouped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_statement_amounts() {
        assert_eq!(parse_amount("45.00").unwrap().value, 45.0);
        assert_eq!(parse_amount("1,234.56").unwrap().value, 1234.56);
        assert_eq!(parse_amount("1,234").unwrap().value, 1234.0);
        assert_eq!(parse_amount("12,000.5").unwrap().value, 12000.5);
        assert_eq!(parse_amount("88.80*").unwrap().value, 88.8);
    }

    #[test]
    fn test_credit_suffix_negates() {
        let amt = parse_amount("45.00CR").unwrap();
        assert_eq!(amt.value, -45.0);
        assert!(amt.is_credit);
        assert_eq!(parse_amount("1,000.00CR*").unwrap().value, -1000.0);
    }

    #[test]
    fn test_rejects_non_amounts() {
        for token in ["45", "2025", "25DEC", "STARBUCKS", "45.000", "1,23.00", "", "CR", "4,5"] {
            assert!(parse_amount(token).is_none(), "should reject {token:?}");
        }
    }

    #[test]
    fn test_plain_number_allows_integers() {
        assert_eq!(parse_plain_number("5000"), Some(5000.0));
        assert_eq!(parse_plain_number("12,345.678"), Some(12345.678));
        assert_eq!(parse_plain_number("JPY"), None);
        assert_eq!(parse_plain_number("5000CR"), None);
    }

    #[test]
    fn test_grouping_reconstructs_digits() {
        for token in ["1,234.56", "45.00", "999.9", "12,345,678.00", "1,000", "0.50", "100,000.01CR"] {
            let amt = parse_amount(token).unwrap();
            let body = token.trim_end_matches('*').trim_end_matches("CR");
            let frac_digits = body.split_once('.').map(|(_, f)| f.len()).unwrap_or(0);
            let regrouped = format_grouped(amt.value, frac_digits);
            let digits = |s: &str| s.chars().filter(|c| c.is_ascii_digit()).collect::<String>();
            assert_eq!(digits(&regrouped), digits(body), "token {token}");
        }
    }

    #[test]
    fn test_format_grouped() {
        assert_eq!(format_grouped(1234567.5, 2), "1,234,567.50");
        assert_eq!(format_grouped(-45.0, 2), "45.00");
        assert_eq!(format_grouped(999.0, 0), "999");
    }
}
