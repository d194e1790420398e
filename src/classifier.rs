//! Three-state capture classifier
//!
//! Scores the centered region of a frame for blur, reads text from it when
//! the frame is sharp, and reports red/yellow/green capture quality.

use crate::analysis::{filter_tokens, laplacian_variance, RegionOfInterest};
use crate::config::ClassifierConfig;
use crate::engine::TextDetector;
use crate::error::CaptureError;
use image::DynamicImage;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Capture quality signalled to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureState {
    Blurry,
    SharpNoText,
    SharpWithText,
}

impl CaptureState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blurry => "blurry",
            Self::SharpNoText => "sharp_no_text",
            Self::SharpWithText => "sharp_with_text",
        }
    }

    /// Traffic-light color for the frame overlay
    pub fn color(&self) -> &'static str {
        match self {
            Self::Blurry => "red",
            Self::SharpNoText => "yellow",
            Self::SharpWithText => "green",
        }
    }

    pub fn guidance(&self) -> &'static str {
        match self {
            Self::Blurry => "Hold still and try again.",
            Self::SharpNoText => "No clear text found. Move closer to the label.",
            Self::SharpWithText => "Capture success.",
        }
    }
}

/// Outcome of classifying one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Classification {
    Blurry {
        sharpness: f64,
    },
    SharpNoText {
        sharpness: f64,
    },
    SharpWithText {
        sharpness: f64,
        tokens: BTreeSet<String>,
    },
}

impl Classification {
    pub fn state(&self) -> CaptureState {
        match self {
            Self::Blurry { .. } => CaptureState::Blurry,
            Self::SharpNoText { .. } => CaptureState::SharpNoText,
            Self::SharpWithText { .. } => CaptureState::SharpWithText,
        }
    }

    pub fn sharpness(&self) -> f64 {
        match self {
            Self::Blurry { sharpness }
            | Self::SharpNoText { sharpness }
            | Self::SharpWithText { sharpness, .. } => *sharpness,
        }
    }

    /// Detected medicine-name tokens; empty unless the frame is sharp with text
    pub fn tokens(&self) -> Option<&BTreeSet<String>> {
        match self {
            Self::SharpWithText { tokens, .. } => Some(tokens),
            _ => None,
        }
    }
}

/// Decode encoded image bytes (PNG, JPEG, ...) into an 8-bit RGB frame
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, CaptureError> {
    let image =
        image::load_from_memory(bytes).map_err(|e| CaptureError::Decode(e.to_string()))?;
    Ok(DynamicImage::ImageRgb8(image.into_rgb8()))
}

/// Classifies frames with a fixed text detector and thresholds
#[derive(Clone)]
pub struct Classifier {
    detector: Arc<dyn TextDetector>,
    config: ClassifierConfig,
}

impl Classifier {
    pub fn new(detector: Arc<dyn TextDetector>, config: ClassifierConfig) -> Self {
        Self { detector, config }
    }

    pub fn engine_name(&self) -> &'static str {
        self.detector.name()
    }

    /// Decode `bytes` and classify the frame
    pub fn classify(&self, bytes: &[u8]) -> Result<Classification, CaptureError> {
        let image = decode(bytes)?;
        self.classify_image(&image)
    }

    /// Classify an already decoded frame
    pub fn classify_image(&self, image: &DynamicImage) -> Result<Classification, CaptureError> {
        self.classify_with_region(image).map(|(_, classification)| classification)
    }

    /// Classify a decoded frame and report the region that was examined.
    ///
    /// Both the sharpness score and the text pass look only at the centered
    /// region of interest. Blurry frames never reach the text detector; a
    /// score equal to `blur_threshold` counts as sharp.
    pub fn classify_with_region(
        &self,
        image: &DynamicImage,
    ) -> Result<(RegionOfInterest, Classification), CaptureError> {
        let roi = RegionOfInterest::of(image);
        let region = roi.crop(image);

        let sharpness = laplacian_variance(&region);
        tracing::debug!(
            "ROI {:?} ({}x{}), sharpness {:.2}",
            roi,
            roi.width(),
            roi.height(),
            sharpness
        );

        if sharpness < self.config.blur_threshold {
            return Ok((roi, Classification::Blurry { sharpness }));
        }

        let candidates = self.detector.detect(&region)?;
        let tokens = filter_tokens(&candidates, &self.config);
        tracing::debug!(
            "{} detections from {}, {} tokens kept",
            candidates.len(),
            self.detector.name(),
            tokens.len()
        );

        let classification = if tokens.is_empty() {
            Classification::SharpNoText { sharpness }
        } else {
            Classification::SharpWithText { sharpness, tokens }
        };

        Ok((roi, classification))
    }
}
