//! Row reconstruction: cluster OCR fragments into table rows by vertical
//! position alone.

use cardscan_core::{DEFAULT_ROW_THRESHOLD_FACTOR, RecognizedElement};
use std::cmp::Ordering;

use crate::types::RecognizedRow;

/// Vertical clustering tolerance, as a fraction of the mean fragment height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowClustering {
    pub threshold_factor: f64,
}

impl Default for RowClustering {
    fn default() -> Self {
        Self {
            threshold_factor: DEFAULT_ROW_THRESHOLD_FACTOR,
        }
    }
}

impl RowClustering {
    pub fn new(threshold_factor: f64) -> Self {
        Self { threshold_factor }
    }

    /// Group fragments into rows, top of page first, each row left to right.
    pub fn reconstruct(&self, elements: &[RecognizedElement]) -> Vec<RecognizedRow> {
        if elements.is_empty() {
            return Vec::new();
        }

        let mut sorted: Vec<RecognizedElement> = elements.to_vec();
        // Top first (y grows upward); ties broken so the output never depends on input order
        sorted.sort_by(|a, b| {
            b.y_center()
                .total_cmp(&a.y_center())
                .then_with(|| a.x_center.total_cmp(&b.x_center))
                .then_with(|| a.text.cmp(&b.text))
        });

        let avg_height = sorted.iter().map(|e| e.bounding_box.height).sum::<f64>() / sorted.len() as f64;
        let threshold = self.threshold_factor * avg_height;

        let mut rows = Vec::new();
        let mut current: Vec<RecognizedElement> = Vec::new();
        let mut last_y = sorted[0].y_center();

        for el in sorted {
            let y = el.y_center();
            if !current.is_empty() && (last_y - y).abs() > threshold {
                rows.extend(RecognizedRow::from_elements(std::mem::take(&mut current)));
            }
            last_y = y;
            current.push(el);
        }
        rows.extend(RecognizedRow::from_elements(current));

        rows
    }
}

/// Reconstruct rows with the default tolerance.
pub fn reconstruct_rows(elements: &[RecognizedElement]) -> Vec<RecognizedRow> {
    RowClustering::default().reconstruct(elements)
}

/// Debug dump: one line per row.
pub fn rows_to_text(rows: &[RecognizedRow]) -> String {
    rows.iter().map(|r| r.text()).collect::<Vec<_>>().join("\n")
}

fn is_non_increasing(values: impl Iterator<Item = f64>) -> bool {
    let mut prev: Option<f64> = None;
    for v in values {
        if let Some(p) = prev {
            if p.partial_cmp(&v) == Some(Ordering::Less) {
                return false;
            }
        }
        prev = Some(v);
    }
    true
}

/// Reading-order check used by the page analyzer's debug assertions and tests.
pub fn is_reading_order(rows: &[RecognizedRow]) -> bool {
    is_non_increasing(rows.iter().map(|r| r.y_center))
        && rows.iter().all(|r| {
            !r.elements.is_empty() && is_non_increasing(r.elements.iter().rev().map(|e| e.x_center))
        })
}
