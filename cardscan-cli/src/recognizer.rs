//! Stand-in OCR engine: reads observations the real engine dumped to JSON.
//!
//! Dump format, one file per page:
//!   [{"candidates": ["25DEC"], "bounding_box": {"x": 0.05, "y": 0.71, "width": 0.08, "height": 0.012}}, ...]

use async_trait::async_trait;
use cardscan_core::{OcrObservation, Result, ScanError};
use cardscan_ingest::{PageImage, TextRecognizer};
use std::path::Path;

pub struct JsonDumpRecognizer;

pub async fn read_dump(path: &Path) -> Result<Vec<OcrObservation>> {
    let s = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&s)?)
}

#[async_trait]
impl TextRecognizer for JsonDumpRecognizer {
    async fn recognize(&self, page: &PageImage) -> Result<Vec<OcrObservation>> {
        read_dump(&page.path).await.map_err(|e| ScanError::Recognition {
            page: page.index,
            message: format!("{}: {e}", page.path.display()),
        })
    }
}
