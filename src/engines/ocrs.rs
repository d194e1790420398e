//! OCRS engine implementation
//!
//! Pure Rust OCR engine using the ocrs library. No system dependencies required.
//! Downloads neural network models automatically on first use unless the
//! engine configuration is offline.

use super::assets::ensure_cached;
use crate::config::EngineConfig;
use crate::engine::{TextDetector, TokenCandidate};
use crate::error::CaptureError;
use image::DynamicImage;
use ocrs::{DecodeMethod, ImageSource, OcrEngine as OcrsOcrEngine, OcrEngineParams};
use rten::Model;

/// Default model URLs from the ocrs project
const DETECTION_MODEL_URL: &str =
    "https://ocrs-models.s3-accelerate.amazonaws.com/text-detection.rten";
const RECOGNITION_MODEL_URL: &str =
    "https://ocrs-models.s3-accelerate.amazonaws.com/text-recognition.rten";

/// Text detector wrapping the ocrs library
pub struct OcrsEngine {
    engine: OcrsOcrEngine,
}

impl OcrsEngine {
    pub fn new(config: &EngineConfig) -> Result<Self, CaptureError> {
        let dir = config.cache_dir();
        let detection_path =
            ensure_cached(config, &dir, "text-detection.rten", DETECTION_MODEL_URL)?;
        let recognition_path =
            ensure_cached(config, &dir, "text-recognition.rten", RECOGNITION_MODEL_URL)?;

        let detection_model = Model::load_file(&detection_path).map_err(|e| {
            CaptureError::EngineUnavailable(format!("Failed to load detection model: {}", e))
        })?;
        let recognition_model = Model::load_file(&recognition_path).map_err(|e| {
            CaptureError::EngineUnavailable(format!("Failed to load recognition model: {}", e))
        })?;

        let engine = OcrsOcrEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            decode_method: DecodeMethod::Greedy,
            ..Default::default()
        })
        .map_err(|e| {
            CaptureError::EngineUnavailable(format!("Failed to create OCR engine: {}", e))
        })?;

        tracing::info!("ocrs engine initialized (models: {:?})", dir);

        Ok(Self { engine })
    }
}

impl TextDetector for OcrsEngine {
    fn name(&self) -> &'static str {
        "ocrs"
    }

    fn description(&self) -> &'static str {
        "Pure Rust OCR engine - fast, no system dependencies required"
    }

    fn detect(&self, image: &DynamicImage) -> Result<Vec<TokenCandidate>, CaptureError> {
        // HWC RGB bytes, which is what ImageSource::from_bytes expects
        let rgb = image.to_rgb8();
        let dimensions = rgb.dimensions();

        let source = ImageSource::from_bytes(rgb.as_raw(), dimensions).map_err(|e| {
            CaptureError::Detection(format!("Failed to create image source: {}", e))
        })?;

        let input = self
            .engine
            .prepare_input(source)
            .map_err(|e| CaptureError::Detection(format!("Failed to prepare input: {}", e)))?;

        let word_rects = self
            .engine
            .detect_words(&input)
            .map_err(|e| CaptureError::Detection(format!("Failed to detect words: {}", e)))?;

        let line_rects = self.engine.find_text_lines(&input, &word_rects);

        let lines = self
            .engine
            .recognize_text(&input, &line_rects)
            .map_err(|e| CaptureError::Detection(format!("Failed to recognize text: {}", e)))?;

        let mut candidates = Vec::new();
        for line in lines.iter().flatten() {
            let words: Vec<String> = line.words().map(|word| word.to_string()).collect();
            let confidence = line_confidence(&words.join(" "));
            candidates.extend(
                words
                    .into_iter()
                    .map(|word| TokenCandidate::new(word, confidence)),
            );
        }

        Ok(candidates)
    }

    fn supported_languages(&self) -> Vec<String> {
        // ocrs currently only supports English/Latin alphabet
        vec!["eng".to_string()]
    }
}

// ============================================================================
// Confidence scoring heuristics
// ============================================================================

/// Score a recognized line in [0, 100].
///
/// ocrs reports no per-word confidence, so every word of a line shares a
/// score derived from how much the line looks like real text: mostly
/// letters, few stray symbols, plausible word lengths, no long runs of the
/// same character.
fn line_confidence(text: &str) -> u8 {
    let chars: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
    if chars.is_empty() {
        return 0;
    }
    let total = chars.len() as f32;

    let letters = chars.iter().filter(|c| c.is_alphabetic()).count() as f32;
    let letter_score = (letters / total * 1.5).min(1.0);

    let stray = chars
        .iter()
        .filter(|c| !c.is_alphanumeric() && !c.is_ascii_punctuation())
        .count() as f32;
    let symbol_score = 1.0 - (stray / total * 10.0).min(1.0);

    let score = 0.35 * letter_score
        + 0.25 * symbol_score
        + 0.20 * word_length_score(text)
        + 0.20 * repetition_score(&chars);

    (score * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Garbled OCR tends to produce single-character "words" or endless runs
fn word_length_score(text: &str) -> f32 {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return 0.0;
    }
    let avg_len =
        words.iter().map(|w| w.chars().count()).sum::<usize>() as f32 / words.len() as f32;

    match avg_len as usize {
        0..=1 => 0.3,
        2..=3 => 0.7,
        4..=12 => 1.0,
        _ => 0.5,
    }
}

/// Patterns like "aaaa" or "####" often indicate OCR confusion
fn repetition_score(chars: &[char]) -> f32 {
    let mut longest = 1;
    let mut run = 1;
    for pair in chars.windows(2) {
        if pair[0] == pair[1] {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 1;
        }
    }

    match longest {
        1..=3 => 1.0,
        4..=5 => 0.8,
        6..=10 => 0.5,
        _ => 0.2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_word_scores_high() {
        assert!(line_confidence("ASPIRIN") > 90);
        assert!(line_confidence("Ibuprofen Tablets 200mg") > 60);
    }

    #[test]
    fn test_garbage_scores_low() {
        assert!(line_confidence("|||| ~~~~ ©©©©©©©") <= 60);
    }

    #[test]
    fn test_empty_line_scores_zero() {
        assert_eq!(line_confidence("   "), 0);
    }

    #[test]
    fn test_repetition_is_penalized() {
        let runs: Vec<char> = "AAAAAAAAAAAA".chars().collect();
        assert_eq!(repetition_score(&runs), 0.2);
    }
}
