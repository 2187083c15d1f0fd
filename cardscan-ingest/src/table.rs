//! Locate the transaction section between the column header row and the
//! first summary/footer row.

use crate::types::RecognizedRow;

pub const HEADER_KEYWORDS: &[&str] = &[
    "POST DATE",
    "POSTDATE",
    "TRANS DATE",
    "TRANSDATE",
    "TRANSACTION DATE",
    "DESCRIPTION OF TRANSACTION",
    "進支日期",
    "交易日期",
    "交易說明",
    "交易摘要",
];

pub const FOOTER_KEYWORDS: &[&str] = &[
    "REWARD CASH",
    "REWARDCASH",
    "SUMMARY",
    "POINTS",
    "獎賞錢",
    "結單摘要",
    "積分",
];

/// Row index range of the transaction section: `rows[start..end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableBounds {
    pub header: usize,
    pub start: usize,
    pub end: usize,
}

impl TableBounds {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn contains_keyword(row: &RecognizedRow, keywords: &[&str]) -> bool {
    let upper = row.text().to_uppercase();
    keywords.iter().any(|k| upper.contains(k))
}

/// Index of the first header row, if any.
pub fn find_header(rows: &[RecognizedRow]) -> Option<usize> {
    rows.iter().position(|r| contains_keyword(r, HEADER_KEYWORDS))
}

/// Find the transaction section. `None` means the page has no transaction
/// table at all (a cover page, a terms page), which is not an error.
pub fn find_table_bounds(rows: &[RecognizedRow]) -> Option<TableBounds> {
    let header = find_header(rows)?;
    let start = header + 1;
    let end = rows[start..]
        .iter()
        .position(|r| contains_keyword(r, FOOTER_KEYWORDS))
        .map(|offset| start + offset)
        .unwrap_or(rows.len());
    Some(TableBounds { header, start, end })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::test_support::rows;

    #[test]
    fn test_header_and_footer() {
        let rows = rows(&[
            "HSBC VISA SIGNATURE",
            "POST DATE TRANS DATE DESCRIPTION AMOUNT",
            "25DEC 24DEC STARBUCKS HK 45.00",
            "26DEC 26DEC MANNINGS 88.00",
            "REWARDCASH SUMMARY",
            "PAGE 1 OF 2",
        ]);
        let bounds = find_table_bounds(&rows).unwrap();
        assert_eq!(bounds, TableBounds { header: 1, start: 2, end: 4 });
        assert_eq!(bounds.len(), 2);
    }

    #[test]
    fn test_missing_footer_runs_to_end() {
        let rows = rows(&["Post Date Trans Date", "25DEC 24DEC STARBUCKS 45.00"]);
        let bounds = find_table_bounds(&rows).unwrap();
        assert_eq!(bounds.end, 2);
    }

    #[test]
    fn test_no_header() {
        let rows = rows(&["IMPORTANT NOTICE", "25DEC 24DEC STARBUCKS 45.00"]);
        assert!(find_table_bounds(&rows).is_none());
        assert!(find_table_bounds(&[]).is_none());
    }

    #[test]
    fn test_footer_before_header_is_ignored() {
        let rows = rows(&["POINTS BALANCE 1,200", "進支日期 交易日期 交易說明", "01JAN 01JAN TAXI 60.00"]);
        let bounds = find_table_bounds(&rows).unwrap();
        assert_eq!(bounds, TableBounds { header: 1, start: 2, end: 3 });
    }

    #[test]
    fn test_header_on_last_row_gives_empty_table() {
        let rows = rows(&["COVER", "POST DATE TRANS DATE"]);
        let bounds = find_table_bounds(&rows).unwrap();
        assert!(bounds.is_empty());
    }
}
