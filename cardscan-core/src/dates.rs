//! Date handling for year-less `25DEC`-style statement dates.
//!
//! Statement rows carry only day and month. The year comes from a reference
//! date (the statement's closing date) or, until one is known, from today.

use chrono::{Datelike, NaiveDate, Utc};
use chrono_tz::Tz;
use regex::Regex;
use std::sync::LazyLock;

use crate::correction::{correct_date_text, MONTHS};
use crate::error::{Result, ScanError};

static DAY_MONTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,2})\s?(JAN|FEB|MAR|APR|MAY|JUN|JUL|AUG|SEP|OCT|NOV|DEC)")
        .expect("valid day-month regex")
});

static DATE_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{1,2}\s?(?:JAN|FEB|MAR|APR|MAY|JUN|JUL|AUG|SEP|OCT|NOV|DEC)$")
        .expect("valid date token regex")
});

static DATE_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{1,2}(?:JAN|FEB|MAR|APR|MAY|JUN|JUL|AUG|SEP|OCT|NOV|DEC)")
        .expect("valid date prefix regex")
});

// 15 JAN 2025 / 15JAN2025 / 15-JAN-2025
static DMY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,2})[\s-]?(JAN|FEB|MAR|APR|MAY|JUN|JUL|AUG|SEP|OCT|NOV|DEC)[A-Z]*[\s,-]*(\d{4})")
        .expect("valid d-m-y regex")
});

// JAN 15, 2025
static MDY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(JAN|FEB|MAR|APR|MAY|JUN|JUL|AUG|SEP|OCT|NOV|DEC)[A-Z]*\s?(\d{1,2}),?\s*(\d{4})")
        .expect("valid m-d-y regex")
});

// 15/01/2025 or 2025-01-15
static NUMERIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:(\d{1,2})/(\d{1,2})/(\d{4}))|(?:(\d{4})-(\d{2})-(\d{2}))")
        .expect("valid numeric date regex")
});

/// A year-less date as printed in a transaction row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayMonth {
    pub day: u32,
    pub month: u32,
}

impl DayMonth {
    pub fn new(day: u32, month: u32) -> Option<Self> {
        if (1..=31).contains(&day) && (1..=12).contains(&month) {
            Some(Self { day, month })
        } else {
            None
        }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            day: date.day(),
            month: date.month(),
        }
    }
}

fn month_number(abbr: &str) -> Option<u32> {
    let upper = abbr.get(..3)?.to_ascii_uppercase();
    MONTHS
        .iter()
        .position(|m| *m == upper)
        .map(|i| i as u32 + 1)
}

/// Find every day+month token in a row, in reading order.
///
/// Glyph corrections are applied first. A match preceded by another digit
/// (the `25DEC` inside `2025DEC`) is not a date.
pub fn extract_day_months(text: &str) -> Vec<DayMonth> {
    let corrected = correct_date_text(&text.to_uppercase());
    let bytes = corrected.as_bytes();
    DAY_MONTH_RE
        .captures_iter(&corrected)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            if whole.start() > 0 && bytes[whole.start() - 1].is_ascii_digit() {
                return None;
            }
            let day: u32 = caps[1].parse().ok()?;
            DayMonth::new(day, month_number(&caps[2])?)
        })
        .collect()
}

/// True if the whole token is a day+month date (after glyph correction).
pub fn is_date_token(token: &str) -> bool {
    DATE_TOKEN_RE.is_match(&correct_date_text(&token.trim().to_uppercase()))
}

/// Remove a leading `24DEC` glued onto the front of a token. Returns the
/// remainder, which may be empty.
pub fn strip_date_prefix(token: &str) -> String {
    let corrected = correct_date_text(&token.trim().to_uppercase());
    match DATE_PREFIX_RE.find(&corrected) {
        Some(m) => corrected[m.end()..].trim().to_string(),
        None => token.trim().to_string(),
    }
}

/// Resolve a day+month against a reference date.
///
/// The reference year is used, unless the month is later than the reference
/// month: then the date belongs to the previous year (a December purchase on a
/// January statement).
pub fn resolve_with_reference(dm: DayMonth, reference: NaiveDate) -> Option<NaiveDate> {
    let year = if dm.month > reference.month() {
        reference.year() - 1
    } else {
        reference.year()
    };
    NaiveDate::from_ymd_opt(year, dm.month, dm.day)
}

/// Year assignment for one analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateResolver {
    /// Statement closing date, once known
    pub reference: Option<NaiveDate>,
    /// Fallback anchor when no reference is known
    pub today: NaiveDate,
}

impl DateResolver {
    pub fn new(reference: Option<NaiveDate>, today: NaiveDate) -> Self {
        Self { reference, today }
    }

    pub fn anchor(&self) -> NaiveDate {
        self.reference.unwrap_or(self.today)
    }

    /// Without a reference date, 29 Feb is parked in the nearest leap year at
    /// or before the inferred year so `realign_year` can move it once the
    /// statement date turns up.
    pub fn resolve(&self, dm: DayMonth) -> Option<NaiveDate> {
        let anchor = self.anchor();
        resolve_with_reference(dm, anchor).or_else(|| {
            if self.reference.is_some() || (dm.month, dm.day) != (2, 29) {
                return None;
            }
            let year = if dm.month > anchor.month() { anchor.year() - 1 } else { anchor.year() };
            (0..4).find_map(|back| NaiveDate::from_ymd_opt(year - back, 2, 29))
        })
    }
}

/// Re-run year inference on an already-resolved date once the real reference
/// date is known. Keeps the original date if the day doesn't exist in the new
/// year (29 Feb).
pub fn realign_year(date: NaiveDate, reference: NaiveDate) -> NaiveDate {
    resolve_with_reference(DayMonth::from_date(date), reference).unwrap_or(date)
}

/// Parse a full date carrying its own year, as printed in a statement header.
pub fn parse_full_date(text: &str) -> Option<NaiveDate> {
    let upper = text.to_uppercase();

    if let Some(caps) = DMY_RE.captures(&upper) {
        let day: u32 = caps[1].parse().ok()?;
        let month = month_number(&caps[2])?;
        let year: i32 = caps[3].parse().ok()?;
        if let Some(d) = NaiveDate::from_ymd_opt(year, month, day) {
            return Some(d);
        }
    }

    if let Some(caps) = MDY_RE.captures(&upper) {
        let month = month_number(&caps[1])?;
        let day: u32 = caps[2].parse().ok()?;
        let year: i32 = caps[3].parse().ok()?;
        if let Some(d) = NaiveDate::from_ymd_opt(year, month, day) {
            return Some(d);
        }
    }

    let caps = NUMERIC_RE.captures(&upper)?;
    if let (Some(d), Some(m), Some(y)) = (caps.get(1), caps.get(2), caps.get(3)) {
        return NaiveDate::from_ymd_opt(
            y.as_str().parse().ok()?,
            m.as_str().parse().ok()?,
            d.as_str().parse().ok()?,
        );
    }
    NaiveDate::from_ymd_opt(
        caps.get(4)?.as_str().parse().ok()?,
        caps.get(5)?.as_str().parse().ok()?,
        caps.get(6)?.as_str().parse().ok()?,
    )
}

/// Today's date in an IANA time zone such as "Asia/Hong_Kong".
pub fn today_in(tz: &str) -> Result<NaiveDate> {
    let tz: Tz = tz
        .parse()
        .map_err(|_| ScanError::Config(format!("invalid timezone: {tz}")))?;
    Ok(Utc::now().with_timezone(&tz).date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_extract_two_dates() {
        let dms = extract_day_months("25DEC 24DEC STARBUCKS HK 45.00");
        assert_eq!(dms, vec![DayMonth::new(25, 12).unwrap(), DayMonth::new(24, 12).unwrap()]);
    }

    #[test]
    fn test_extract_glued_and_corrected() {
        let dms = extract_day_months("O3JAN 04JANAMAZON");
        assert_eq!(dms.len(), 2);
        assert_eq!(dms[0], DayMonth::new(3, 1).unwrap());
        assert_eq!(dms[1], DayMonth::new(4, 1).unwrap());
    }

    #[test]
    fn test_digit_before_day_is_not_a_date() {
        assert!(extract_day_months("REF 2025DEC").is_empty());
        assert!(extract_day_months("45DEC").is_empty());
    }

    #[test]
    fn test_date_tokens() {
        assert!(is_date_token("25DEC"));
        assert!(is_date_token("3 JAN"));
        assert!(is_date_token("1ODEC"));
        assert!(!is_date_token("25DECSTARBUCKS"));
        assert_eq!(strip_date_prefix("24DECSTARBUCKS"), "STARBUCKS");
        assert_eq!(strip_date_prefix("STARBUCKS"), "STARBUCKS");
    }

    #[test]
    fn test_year_wraps_back_across_january() {
        let reference = ymd(2025, 1, 15);
        let dec = extract_day_months("25DEC")[0];
        let jan = extract_day_months("03JAN")[0];
        assert_eq!(resolve_with_reference(dec, reference), Some(ymd(2024, 12, 25)));
        assert_eq!(resolve_with_reference(jan, reference), Some(ymd(2025, 1, 3)));
    }

    #[test]
    fn test_year_boundary_for_every_month() {
        let reference = ymd(2025, 6, 30);
        for month in 1..=12 {
            let resolved = resolve_with_reference(DayMonth::new(1, month).unwrap(), reference).unwrap();
            let expected = if month > 6 { 2024 } else { 2025 };
            assert_eq!(resolved.year(), expected, "month {month}");
        }
    }

    #[test]
    fn test_resolver_falls_back_to_today() {
        let resolver = DateResolver::new(None, ymd(2026, 3, 10));
        assert_eq!(resolver.resolve(DayMonth::new(28, 11).unwrap()), Some(ymd(2025, 11, 28)));
        let resolver = DateResolver::new(Some(ymd(2025, 1, 15)), ymd(2026, 3, 10));
        assert_eq!(resolver.resolve(DayMonth::new(28, 11).unwrap()), Some(ymd(2024, 11, 28)));
    }

    #[test]
    fn test_realign_year() {
        assert_eq!(realign_year(ymd(2026, 12, 25), ymd(2025, 1, 15)), ymd(2024, 12, 25));
        assert_eq!(realign_year(ymd(2026, 1, 3), ymd(2025, 1, 15)), ymd(2025, 1, 3));
    }

    #[test]
    fn test_leap_day_waits_for_reference() {
        let leap = DayMonth::new(29, 2).unwrap();
        let provisional = DateResolver::new(None, ymd(2026, 10, 16)).resolve(leap).unwrap();
        assert_eq!(provisional, ymd(2024, 2, 29));
        assert_eq!(realign_year(provisional, ymd(2020, 3, 15)), ymd(2020, 2, 29));

        // A known reference in a non-leap year still rejects it
        let resolver = DateResolver::new(Some(ymd(2025, 3, 15)), ymd(2026, 10, 16));
        assert_eq!(resolver.resolve(leap), None);
    }

    #[test]
    fn test_invalid_calendar_day_is_rejected() {
        assert_eq!(resolve_with_reference(DayMonth::new(31, 2).unwrap(), ymd(2025, 3, 1)), None);
    }

    #[test]
    fn test_parse_full_date_formats() {
        assert_eq!(parse_full_date("STATEMENT DATE 15 JAN 2025"), Some(ymd(2025, 1, 15)));
        assert_eq!(parse_full_date("15JAN2025"), Some(ymd(2025, 1, 15)));
        assert_eq!(parse_full_date("Statement Date: January 15, 2025"), Some(ymd(2025, 1, 15)));
        assert_eq!(parse_full_date("結單日 15/01/2025"), Some(ymd(2025, 1, 15)));
        assert_eq!(parse_full_date("2025-01-15"), Some(ymd(2025, 1, 15)));
        assert_eq!(parse_full_date("25DEC"), None);
    }

    #[test]
    fn test_today_in_rejects_bad_zone() {
        assert!(today_in("Asia/Hong_Kong").is_ok());
        assert!(today_in("Mars/Olympus").is_err());
    }
}
