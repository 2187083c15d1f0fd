//! Statement metadata printed above the transaction table: card name, masked
//! card number and the statement (closing) date.

use cardscan_core::parse_full_date;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

use crate::types::RecognizedRow;

const STATEMENT_DATE_KEYWORDS: &[&str] = &[
    "STATEMENT DATE",
    "STATEMENTDATE",
    "STATEMENT CLOSING DATE",
    "結單日",
];

const CARD_NAME_KEYWORDS: &[&str] = &["CARD", "VISA", "MASTERCARD", "卡"];

static LAST_FOUR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[X*•]{4}[\s-]?(\d{4})\b").expect("valid card number regex"));

static MASKED_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\d{4}[\s-]?)?[X*•]{4}.*$").expect("valid masked number regex")
});

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatementHeader {
    pub card_name: String,
    pub card_last_four: String,
    pub statement_date: Option<NaiveDate>,
}

fn find_keyword(upper: &str, keywords: &[&str]) -> Option<usize> {
    keywords
        .iter()
        .filter_map(|k| upper.find(k).map(|i| i + k.len()))
        .min()
}

/// Statement date, either after its label on the same row or on the row
/// right below the label.
pub fn find_statement_date(rows: &[RecognizedRow]) -> Option<NaiveDate> {
    for (i, row) in rows.iter().enumerate() {
        let upper = row.text().to_uppercase();
        let Some(after) = find_keyword(&upper, STATEMENT_DATE_KEYWORDS) else {
            continue;
        };
        if let Some(d) = parse_full_date(&upper[after..]) {
            return Some(d);
        }
        if let Some(d) = rows.get(i + 1).and_then(|next| parse_full_date(&next.text())) {
            return Some(d);
        }
    }
    None
}

pub fn find_card_last_four(rows: &[RecognizedRow]) -> Option<String> {
    rows.iter().find_map(|row| {
        LAST_FOUR_RE
            .captures(&row.text().to_uppercase())
            .map(|caps| caps[1].to_string())
    })
}

pub fn find_card_name(rows: &[RecognizedRow]) -> Option<String> {
    rows.iter().find_map(|row| {
        let upper = row.text().to_uppercase();
        if find_keyword(&upper, STATEMENT_DATE_KEYWORDS).is_some()
            || find_keyword(&upper, CARD_NAME_KEYWORDS).is_none()
        {
            return None;
        }
        let name = MASKED_NUMBER_RE.replace(&upper, "").trim().to_string();
        (!name.is_empty()).then_some(name)
    })
}

/// Read the metadata block. Only rows above the table header are searched;
/// pass every row when the page has no table.
pub fn read_statement_header(rows: &[RecognizedRow]) -> StatementHeader {
    StatementHeader {
        card_name: find_card_name(rows).unwrap_or_default(),
        card_last_four: find_card_last_four(rows).unwrap_or_default(),
        statement_date: find_statement_date(rows),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::test_support::rows;

    #[test]
    fn test_reads_full_header() {
        let rows = rows(&[
            "HSBC RED CREDIT CARD 4512 XXXX XXXX 1234",
            "STATEMENT DATE 15 JAN 2025",
            "PAYMENT DUE DATE 10 FEB 2025",
        ]);
        let header = read_statement_header(&rows);
        assert_eq!(header.card_name, "HSBC RED CREDIT CARD");
        assert_eq!(header.card_last_four, "1234");
        assert_eq!(header.statement_date, NaiveDate::from_ymd_opt(2025, 1, 15));
    }

    #[test]
    fn test_date_on_row_below_label() {
        let rows = rows(&["Statement Date", "15JAN2025"]);
        assert_eq!(find_statement_date(&rows), NaiveDate::from_ymd_opt(2025, 1, 15));
    }

    #[test]
    fn test_star_masked_number() {
        let rows = rows(&["VISA PLATINUM ****5678"]);
        assert_eq!(find_card_last_four(&rows).as_deref(), Some("5678"));
        assert_eq!(find_card_name(&rows).as_deref(), Some("VISA PLATINUM"));
    }

    #[test]
    fn test_missing_metadata() {
        let rows = rows(&["IMPORTANT NOTICE"]);
        assert_eq!(read_statement_header(&rows), StatementHeader::default());
    }
}
