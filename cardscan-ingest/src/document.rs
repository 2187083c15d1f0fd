//! Multi-page documents: recognize each page, analyze it, then fix up years
//! across pages once the statement date is known.

use async_trait::async_trait;
use cardscan_core::{OcrObservation, RecognizedElement, Result, ScanError, StatementAnalysisResult};
use chrono::NaiveDate;
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

use crate::page::PageAnalyzer;

/// A rasterized page handed to the OCR engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageImage {
    pub index: usize,
    pub path: PathBuf,
    /// Script/language hints for the engine
    pub languages: Vec<String>,
}

/// The external text-recognition engine. Its failure is the only hard error
/// in the pipeline.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    async fn recognize(&self, page: &PageImage) -> Result<Vec<OcrObservation>>;
}

/// Per-document output: the merged result plus each page as read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentAnalysis {
    pub combined: StatementAnalysisResult,
    pub pages: Vec<StatementAnalysisResult>,
    pub reference_date: Option<NaiveDate>,
}

impl DocumentAnalysis {
    pub fn page_transaction_counts(&self) -> Vec<usize> {
        self.pages.iter().map(|p| p.transactions.len()).collect()
    }
}

/// First statement date printed on any page, in page order.
pub fn discover_reference_date(pages: &[StatementAnalysisResult]) -> Option<NaiveDate> {
    pages.iter().find_map(|p| p.statement_date)
}

/// Re-run year inference on every transaction against the reference date.
/// Pages read before the date was known used today's date as the anchor.
pub fn correct_years(pages: Vec<StatementAnalysisResult>, reference: NaiveDate) -> Vec<StatementAnalysisResult> {
    pages
        .into_iter()
        .map(|mut page| {
            for txn in &mut page.transactions {
                txn.realign_dates(reference);
            }
            page
        })
        .collect()
}

fn first_non_empty<'a>(mut values: impl Iterator<Item = &'a String>) -> String {
    values.find(|s| !s.is_empty()).cloned().unwrap_or_default()
}

/// Merge page results into one document result. `known_reference` (for
/// example a date supplied by the user) wins over one found on a page.
pub fn assemble(pages: Vec<StatementAnalysisResult>, known_reference: Option<NaiveDate>) -> DocumentAnalysis {
    let reference = known_reference.or_else(|| discover_reference_date(&pages));
    let pages = match reference {
        Some(r) => correct_years(pages, r),
        None => {
            warn!("no statement date found; transaction years assume today's date");
            pages
        }
    };

    let combined = StatementAnalysisResult {
        card_name: first_non_empty(pages.iter().map(|p| &p.card_name)),
        card_last_four: first_non_empty(pages.iter().map(|p| &p.card_last_four)),
        statement_date: reference,
        transactions: pages.iter().flat_map(|p| p.transactions.iter().cloned()).collect(),
        raw_text: pages.iter().map(|p| p.raw_text.as_str()).collect::<Vec<_>>().join("\n\n"),
    };

    DocumentAnalysis {
        combined,
        pages,
        reference_date: reference,
    }
}

/// Top candidates of a page's observations. Empty fragments are dropped and
/// malformed boxes are logged and skipped; neither fails the page.
pub fn usable_elements(page_index: usize, observations: &[OcrObservation]) -> Vec<RecognizedElement> {
    let mut elements = Vec::with_capacity(observations.len());
    for obs in observations {
        match RecognizedElement::from_observation(obs) {
            Ok(Some(el)) => elements.push(el),
            Ok(None) => {}
            Err(e) => warn!(page = page_index, error = %e, "skipping observation"),
        }
    }
    elements
}

/// Drives a recognizer and a page analyzer over a whole document.
pub struct DocumentAnalyzer<R> {
    recognizer: R,
    analyzer: PageAnalyzer,
}

impl<R: TextRecognizer> DocumentAnalyzer<R> {
    pub fn new(recognizer: R, analyzer: PageAnalyzer) -> Self {
        Self { recognizer, analyzer }
    }

    /// Recognize and analyze a single page. Safe to retry on its own.
    pub async fn analyze_page(&self, page: &PageImage) -> Result<StatementAnalysisResult> {
        let observations = self.recognizer.recognize(page).await.map_err(|e| match e {
            ScanError::Recognition { .. } => e,
            other => ScanError::Recognition {
                page: page.index,
                message: other.to_string(),
            },
        })?;

        let elements = usable_elements(page.index, &observations);
        Ok(self.analyzer.analyze(page.index, &elements))
    }

    /// Recognize all pages concurrently, then assemble them in page order.
    /// The first engine failure is returned; nothing is partially assembled.
    pub async fn analyze(&self, pages: &[PageImage]) -> Result<DocumentAnalysis> {
        let results = join_all(pages.iter().map(|p| self.analyze_page(p))).await;
        let pages = results.into_iter().collect::<Result<Vec<_>>>()?;

        let doc = assemble(pages, self.analyzer.reference);
        info!(
            pages = doc.pages.len(),
            transactions = doc.combined.transactions.len(),
            reference_date = ?doc.reference_date,
            "analyzed document"
        );
        Ok(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardscan_core::{BoundingBox, ParsedTransaction, PaymentMethod};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn page_with(date: NaiveDate, statement_date: Option<NaiveDate>) -> StatementAnalysisResult {
        StatementAnalysisResult {
            card_name: String::new(),
            card_last_four: String::new(),
            statement_date,
            transactions: vec![ParsedTransaction {
                post_date: Some(date),
                trans_date: Some(date),
                description: "SHOP".to_string(),
                billing_amount: 10.0,
                billing_currency: "HKD".to_string(),
                payment_method: Some(PaymentMethod::Sale),
                is_foreign_currency: false,
                spending_currency: None,
                spending_amount: None,
                is_refund_or_payment: false,
                cbf_fee: None,
            }],
            raw_text: "SHOP 10.00".to_string(),
        }
    }

    #[test]
    fn test_later_page_date_fixes_earlier_page() {
        // Page 0 was read with today = 2026-03-01, so December landed in 2025
        let pages = vec![page_with(ymd(2025, 12, 25), None), page_with(ymd(2026, 1, 3), Some(ymd(2025, 1, 15)))];
        let doc = assemble(pages, None);
        assert_eq!(doc.reference_date, Some(ymd(2025, 1, 15)));
        assert_eq!(doc.combined.transactions[0].post_date, Some(ymd(2024, 12, 25)));
        assert_eq!(doc.combined.transactions[1].post_date, Some(ymd(2025, 1, 3)));
        assert_eq!(doc.pages[0].transactions[0].trans_date, Some(ymd(2024, 12, 25)));
    }

    #[test]
    fn test_known_reference_wins() {
        let pages = vec![page_with(ymd(2025, 12, 25), Some(ymd(2025, 1, 15)))];
        let doc = assemble(pages, Some(ymd(2026, 1, 15)));
        assert_eq!(doc.combined.transactions[0].post_date, Some(ymd(2025, 12, 25)));
    }

    #[test]
    fn test_no_reference_leaves_dates() {
        let pages = vec![page_with(ymd(2025, 12, 25), None)];
        let doc = assemble(pages, None);
        assert_eq!(doc.reference_date, None);
        assert_eq!(doc.combined.transactions[0].post_date, Some(ymd(2025, 12, 25)));
        assert_eq!(doc.page_transaction_counts(), vec![1]);
    }

    #[test]
    fn test_metadata_from_first_page_that_has_it() {
        let mut a = page_with(ymd(2025, 1, 3), None);
        let mut b = page_with(ymd(2025, 1, 4), None);
        b.card_name = "HSBC RED CREDIT CARD".to_string();
        b.card_last_four = "1234".to_string();
        a.raw_text = "A".to_string();
        b.raw_text = "B".to_string();
        let doc = assemble(vec![a, b], None);
        assert_eq!(doc.combined.card_name, "HSBC RED CREDIT CARD");
        assert_eq!(doc.combined.card_last_four, "1234");
        assert_eq!(doc.combined.raw_text, "A\n\nB");
    }

    #[test]
    fn test_usable_elements_skips_bad_boxes() {
        let obs = |text: &str, x: f64| OcrObservation {
            candidates: vec![text.to_string()],
            bounding_box: BoundingBox::new(x, 0.5, 0.1, 0.02),
        };
        let observations = vec![obs("25DEC", 0.05), obs("GHOST", f64::NAN), obs(" ", 0.3), obs("45.00", 0.8)];
        let elements = usable_elements(0, &observations);
        let texts: Vec<_> = elements.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["25DEC", "45.00"]);
    }
}
