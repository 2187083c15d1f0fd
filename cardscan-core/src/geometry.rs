//! Recognized text fragments and their normalized bounding boxes.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanError};

/// Box normalized to the image size. Origin is bottom-left and `y` grows
/// upward, so a larger `y` means higher on the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn x_center(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn y_center(&self) -> f64 {
        self.y + self.height / 2.0
    }

    fn is_valid(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.width >= 0.0
            && self.height >= 0.0
    }
}

/// Raw engine output: ranked recognition candidates for one fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrObservation {
    /// Best candidate first
    pub candidates: Vec<String>,
    pub bounding_box: BoundingBox,
}

/// One OCR fragment, reduced to its top candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedElement {
    pub text: String,
    pub x_center: f64,
    pub bounding_box: BoundingBox,
}

impl RecognizedElement {
    pub fn new(text: impl Into<String>, bounding_box: BoundingBox) -> Self {
        Self {
            text: text.into(),
            x_center: bounding_box.x_center(),
            bounding_box,
        }
    }

    pub fn y_center(&self) -> f64 {
        self.bounding_box.y_center()
    }

    /// Take the top candidate of an observation.
    ///
    /// Returns `Ok(None)` for fragments with no usable text, and an error when
    /// the box itself is malformed (NaN or negative extents).
    pub fn from_observation(obs: &OcrObservation) -> Result<Option<Self>> {
        if !obs.bounding_box.is_valid() {
            return Err(ScanError::InvalidObservation(format!(
                "bad bounding box {:?}",
                obs.bounding_box
            )));
        }
        let Some(top) = obs.candidates.first() else {
            return Ok(None);
        };
        let text = top.trim();
        if text.is_empty() {
            return Ok(None);
        }
        Ok(Some(Self::new(text, obs.bounding_box)))
    }
}
