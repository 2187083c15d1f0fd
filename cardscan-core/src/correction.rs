//! OCR glyph corrections.
//!
//! Two fixed, ordered substitution tables: one for date tokens (day digits
//! and month abbreviations), one for merchant names. These only repair
//! misreadings observed on real statement scans; they are not a spell-checker.
//! Earlier entries win when patterns overlap, so specific fixes go first.

use regex::Regex;
use std::sync::LazyLock;

/// Month abbreviations as printed in `25DEC`-style date tokens.
pub const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

const MONTH_ALT: &str = "JAN|FEB|MAR|APR|MAY|JUN|JUL|AUG|SEP|OCT|NOV|DEC";

/// Month misreadings, only when glued to a preceding day digit.
const MONTH_FIXES: &[(&str, &str)] = &[
    (r"(\d)\s?0CT\b", "${1}OCT"),
    (r"(\d)\s?N0V\b", "${1}NOV"),
    (r"(\d)\s?DF[CG]\b", "${1}DEC"),
    (r"(\d)\s?DE[O0G]\b", "${1}DEC"),
    (r"(\d)\s?AU[CQ]\b", "${1}AUG"),
    (r"(\d)\s?[5S]EP\b", "${1}SEP"),
    (r"(\d)\s?JU[I1]\b", "${1}JUL"),
    (r"(\d)\s?MA[VW]\b", "${1}MAY"),
    (r"(\d)\s?FE8\b", "${1}FEB"),
    (r"(\d)\s?JA[MH]\b", "${1}JAN"),
    (r"(\d)\s?APH\b", "${1}APR"),
    (r"(\d)\s?MAH\b", "${1}MAR"),
];

/// Day-digit misreadings directly in front of a month. `{M}` is replaced by
/// the month alternation.
const DAY_FIXES: &[(&str, &str)] = &[
    (r"\b[O]([0-9])({M})", "0${1}${2}"),
    (r"\b([0-9])[O]({M})", "${1}0${2}"),
    (r"\b[Il|]([0-9])({M})", "1${1}${2}"),
    (r"\b([0-9])[Il|]({M})", "${1}1${2}"),
    (r"\b([0-9])[S]({M})", "${1}5${2}"),
    (r"\b[Z]([0-9])({M})", "2${1}${2}"),
    (r"\b[Il|]({M})\b", "1${1}"),
];

const MERCHANT_FIXES: &[(&str, &str)] = &[
    (r"APPLE\.C[0O]M/BI[L1I]{2}", "APPLE.COM/BILL"),
    (r"\.C0M\b", ".COM"),
    (r"STARBUCK5", "STARBUCKS"),
    (r"MCDONALD\s?'\s?[5S]", "MCDONALD'S"),
    (r"\b0CTOPUS", "OCTOPUS"),
    (r"7[\s-]?ELE[VU]E[NH]", "7-ELEVEN"),
    (r"PARKN[5S]H[0O]P", "PARKNSHOP"),
    (r"AMAZ[0]N", "AMAZON"),
    (r"\bTR[l1]P\b", "TRIP"),
    (r"HONG\s?K[0]NG", "HONG KONG"),
    (r"UNI[0]N\s?PAY", "UNIONPAY"),
    (r"APPLE\s?PA[VW]\b", "APPLE PAY"),
    (r"\s{2,}", " "),
];

struct Correction {
    pattern: Regex,
    replacement: &'static str,
}

fn compile(table: &[(&str, &'static str)]) -> Vec<Correction> {
    table
        .iter()
        .map(|(pattern, replacement)| Correction {
            pattern: Regex::new(&pattern.replace("{M}", MONTH_ALT)).expect("valid correction regex"),
            replacement,
        })
        .collect()
}

static DATE_CORRECTIONS: LazyLock<Vec<Correction>> = LazyLock::new(|| {
    let mut all = compile(MONTH_FIXES);
    all.extend(compile(DAY_FIXES));
    all
});

static MERCHANT_CORRECTIONS: LazyLock<Vec<Correction>> = LazyLock::new(|| compile(MERCHANT_FIXES));

fn apply(corrections: &[Correction], text: &str) -> String {
    corrections.iter().fold(text.to_string(), |acc, c| {
        c.pattern.replace_all(&acc, c.replacement).into_owned()
    })
}

/// Repair date glyphs in (already uppercased) row text.
pub fn correct_date_text(text: &str) -> String {
    apply(&DATE_CORRECTIONS, text)
}

/// Repair merchant-name glyphs in a description.
pub fn correct_merchant_name(text: &str) -> String {
    apply(&MERCHANT_CORRECTIONS, text).trim().to_string()
}
