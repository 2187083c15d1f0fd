//! One page image's OCR output in, one analysis result out.

use cardscan_core::{DateResolver, RecognizedElement, ScanConfig, StatementAnalysisResult};
use chrono::NaiveDate;
use tracing::{info, warn};

use crate::header::read_statement_header;
use crate::merge::extract_transactions;
use crate::parser::RowContext;
use crate::rows::{RowClustering, is_reading_order, rows_to_text};
use crate::table::find_table_bounds;

/// Runs reconstruction, boundary detection, parsing and merging for a page.
/// Holds no per-page state, so one analyzer can serve pages in any order.
#[derive(Debug, Clone, PartialEq)]
pub struct PageAnalyzer {
    pub clustering: RowClustering,
    pub home_currency: String,
    /// Statement date known before this page was read (CLI override, or a
    /// page read earlier)
    pub reference: Option<NaiveDate>,
    pub today: NaiveDate,
}

impl PageAnalyzer {
    pub fn new(config: &ScanConfig, today: NaiveDate) -> Self {
        Self {
            clustering: RowClustering::new(config.row_threshold_factor),
            home_currency: config.home_currency.clone(),
            reference: None,
            today,
        }
    }

    pub fn with_reference(mut self, reference: Option<NaiveDate>) -> Self {
        self.reference = reference;
        self
    }

    pub fn analyze(&self, page_index: usize, elements: &[RecognizedElement]) -> StatementAnalysisResult {
        let rows = self.clustering.reconstruct(elements);
        debug_assert!(is_reading_order(&rows));
        let raw_text = rows_to_text(&rows);

        let bounds = find_table_bounds(&rows);
        let header_rows = match bounds {
            Some(b) => &rows[..b.header],
            None => &rows[..],
        };
        let header = read_statement_header(header_rows);

        let reference = self.reference.or(header.statement_date);
        let ctx = RowContext::new(DateResolver::new(reference, self.today), self.home_currency.clone());

        let transactions = match bounds {
            Some(b) => {
                let txns = extract_transactions(&rows[b.start..b.end], &ctx);
                if txns.is_empty() {
                    warn!(page = page_index, table_rows = b.len(), "transaction table found but no rows parsed");
                }
                txns
            }
            None => Vec::new(),
        };

        info!(
            page = page_index,
            rows = rows.len(),
            has_table = bounds.is_some(),
            transactions = transactions.len(),
            "analyzed page"
        );

        StatementAnalysisResult {
            card_name: header.card_name,
            card_last_four: header.card_last_four,
            statement_date: header.statement_date,
            transactions,
            raw_text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardscan_core::BoundingBox;

    fn line(tokens: &[&str], y: f64) -> Vec<RecognizedElement> {
        tokens
            .iter()
            .enumerate()
            .map(|(i, t)| RecognizedElement::new(*t, BoundingBox::new(0.05 + 0.12 * i as f64, y, 0.1, 0.015)))
            .collect()
    }

    fn analyzer() -> PageAnalyzer {
        PageAnalyzer::new(&ScanConfig::default(), NaiveDate::from_ymd_opt(2026, 3, 1).unwrap())
    }

    #[test]
    fn test_page_with_own_statement_date() {
        let mut els = Vec::new();
        els.extend(line(&["HSBC", "VISA", "CARD", "4512", "XXXX", "XXXX", "1234"], 0.95));
        els.extend(line(&["STATEMENT", "DATE", "15", "JAN", "2025"], 0.9));
        els.extend(line(&["POST", "DATE", "TRANS", "DATE", "DESCRIPTION"], 0.8));
        els.extend(line(&["25DEC", "24DEC", "STARBUCKS", "HK", "45.00"], 0.75));
        els.extend(line(&["REWARDCASH", "SUMMARY"], 0.5));
        // Shuffled input must not matter
        els.reverse();

        let result = analyzer().analyze(1, &els);
        assert_eq!(result.card_name, "HSBC VISA CARD");
        assert_eq!(result.card_last_four, "1234");
        assert_eq!(result.statement_date, NaiveDate::from_ymd_opt(2025, 1, 15));
        assert_eq!(result.transactions.len(), 1);
        assert_eq!(result.transactions[0].post_date, NaiveDate::from_ymd_opt(2024, 12, 25));
        assert_eq!(result.raw_text.lines().count(), 5);
    }

    #[test]
    fn test_cover_page_is_empty_not_an_error() {
        let els = line(&["IMPORTANT", "NOTICE"], 0.9);
        let result = analyzer().analyze(0, &els);
        assert!(result.transactions.is_empty());
        assert_eq!(result.raw_text, "IMPORTANT NOTICE");
    }

    #[test]
    fn test_blank_page() {
        let result = analyzer().analyze(0, &[]);
        assert_eq!(result, StatementAnalysisResult::default());
    }
}
