use cardscan_core::RecognizedElement;
use serde::{Deserialize, Serialize};

/// Fragments believed to form one printed table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedRow {
    /// Mean of the member boxes' vertical centers
    pub y_center: f64,
    /// Left-to-right by `x_center`; never empty
    pub elements: Vec<RecognizedElement>,
}

impl RecognizedRow {
    /// Build a row from its members, sorting them left to right.
    /// Returns `None` for an empty member list.
    pub fn from_elements(mut elements: Vec<RecognizedElement>) -> Option<Self> {
        if elements.is_empty() {
            return None;
        }
        elements.sort_by(|a, b| a.x_center.total_cmp(&b.x_center));
        let y_center = elements.iter().map(|e| e.y_center()).sum::<f64>() / elements.len() as f64;
        Some(Self { y_center, elements })
    }

    pub fn text(&self) -> String {
        self.elements
            .iter()
            .map(|e| e.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use cardscan_core::BoundingBox;

    #[test]
    fn test_row_sorts_and_joins() {
        let els = vec![
            RecognizedElement::new("45.00", BoundingBox::new(0.8, 0.50, 0.1, 0.02)),
            RecognizedElement::new("25DEC", BoundingBox::new(0.0, 0.52, 0.1, 0.02)),
            RecognizedElement::new("STARBUCKS", BoundingBox::new(0.3, 0.51, 0.1, 0.02)),
        ];
        let row = RecognizedRow::from_elements(els).unwrap();
        assert_eq!(row.text(), "25DEC STARBUCKS 45.00");
        assert!((row.y_center - 0.52).abs() < 1e-9);
    }

    #[test]
    fn test_empty_row_is_none() {
        assert!(RecognizedRow::from_elements(vec![]).is_none());
    }
}
