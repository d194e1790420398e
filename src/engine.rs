use crate::error::CaptureError;
use image::DynamicImage;
use serde::Serialize;

/// A single text detection with its recognition confidence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenCandidate {
    text: String,
    confidence: u8,
}

impl TokenCandidate {
    /// Confidences above 100 are clamped to 100
    pub fn new(text: impl Into<String>, confidence: u8) -> Self {
        Self {
            text: text.into(),
            confidence: confidence.min(100),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Confidence in [0, 100]
    pub fn confidence(&self) -> u8 {
        self.confidence
    }
}

/// Trait that all text detection engines must implement
pub trait TextDetector: Send + Sync {
    /// Returns the engine identifier (e.g., "ocrs", "leptess")
    fn name(&self) -> &'static str;

    /// Returns a human-readable description of the engine
    fn description(&self) -> &'static str;

    /// Detect words in an already decoded image
    fn detect(&self, image: &DynamicImage) -> Result<Vec<TokenCandidate>, CaptureError>;

    /// Get supported languages
    fn supported_languages(&self) -> Vec<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_is_clamped_to_100() {
        let candidate = TokenCandidate::new("ASPIRIN", 250);
        assert_eq!(candidate.confidence(), 100);
        assert_eq!(candidate.text(), "ASPIRIN");
    }

    #[test]
    fn test_serializes_text_and_confidence() {
        let value = serde_json::to_value(TokenCandidate::new("Ibuprofen", 73)).unwrap();
        assert_eq!(value["text"], "Ibuprofen");
        assert_eq!(value["confidence"], 73);
    }
}
