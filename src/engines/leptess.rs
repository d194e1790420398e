//! Leptess/Tesseract engine implementation
//!
//! Tesseract-based OCR engine. Better for noisy/messy images like phone photos.
//! Uses tesseract-static crate for static linking (no system dependencies).
//! Per-word confidence comes from Tesseract's TSV output.

use super::assets::ensure_cached;
use crate::config::EngineConfig;
use crate::engine::{TextDetector, TokenCandidate};
use crate::error::CaptureError;
use image::DynamicImage;
use tesseract_static::tesseract::Tesseract;

/// TSV row level for individual words
const WORD_LEVEL: &str = "5";

/// Tesseract text detector
pub struct LeptessEngine {
    /// Path to tessdata directory
    tessdata_path: String,
    language: String,
}

impl LeptessEngine {
    pub fn new(config: &EngineConfig) -> Result<Self, CaptureError> {
        let language = config.language.clone();
        let tessdata_path = resolve_tessdata(config)?;

        // Fail now rather than on the first sharp frame
        Tesseract::new(Some(&tessdata_path), Some(&language)).map_err(|e| {
            CaptureError::EngineUnavailable(format!("Failed to initialize Tesseract: {}", e))
        })?;

        tracing::info!(
            "Leptess engine initialized (tessdata: {}, language: {})",
            tessdata_path,
            language
        );

        Ok(Self {
            tessdata_path,
            language,
        })
    }
}

impl TextDetector for LeptessEngine {
    fn name(&self) -> &'static str {
        "leptess"
    }

    fn description(&self) -> &'static str {
        "Tesseract OCR engine - better for noisy/messy images like phone photos"
    }

    fn detect(&self, image: &DynamicImage) -> Result<Vec<TokenCandidate>, CaptureError> {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();

        // BMP is always supported by leptonica
        let mut bmp_data = Vec::new();
        rgb.write_to(
            &mut std::io::Cursor::new(&mut bmp_data),
            image::ImageFormat::Bmp,
        )
        .map_err(|e| CaptureError::Detection(format!("Failed to convert to BMP: {}", e)))?;

        tracing::debug!(
            "Running Tesseract on {}x{} region ({} bytes)",
            width,
            height,
            bmp_data.len()
        );

        let tess = Tesseract::new(Some(&self.tessdata_path), Some(&self.language)).map_err(|e| {
            CaptureError::EngineUnavailable(format!("Failed to create Tesseract: {}", e))
        })?;

        let mut tess = tess
            .set_image_from_mem(&bmp_data)
            .map_err(|e| CaptureError::Detection(format!("Failed to set image: {}", e)))?
            .recognize()
            .map_err(|e| CaptureError::Detection(format!("Failed to recognize text: {}", e)))?;

        let tsv = tess
            .get_tsv_text(0)
            .map_err(|e| CaptureError::Detection(format!("Failed to get TSV output: {}", e)))?;

        Ok(parse_tsv(&tsv))
    }

    fn supported_languages(&self) -> Vec<String> {
        vec![self.language.clone()]
    }
}

/// Word rows of Tesseract TSV output.
///
/// Columns: level, page, block, par, line, word, left, top, width, height,
/// conf, text. Rows without a confidence (-1) carry no recognized word.
fn parse_tsv(tsv: &str) -> Vec<TokenCandidate> {
    tsv.lines()
        .filter_map(|row| {
            let cols: Vec<&str> = row.split('\t').collect();
            if cols.len() < 11 || cols[0] != WORD_LEVEL {
                return None;
            }
            let conf: f32 = cols[10].trim().parse().ok()?;
            if conf < 0.0 {
                return None;
            }
            let text = cols.get(11).copied().unwrap_or_default();
            Some(TokenCandidate::new(text, conf.clamp(0.0, 100.0) as u8))
        })
        .collect()
}

/// Use the configured tessdata directory, or fetch `tessdata_fast` for the
/// configured language into the cache
fn resolve_tessdata(config: &EngineConfig) -> Result<String, CaptureError> {
    if let Some(path) = &config.tessdata_path {
        return path
            .to_str()
            .map(str::to_string)
            .ok_or_else(|| CaptureError::EngineUnavailable("Invalid tessdata path".to_string()));
    }

    let dir = config.cache_dir().join("tessdata");
    let filename = format!("{}.traineddata", config.language);
    let url = format!(
        "https://github.com/tesseract-ocr/tessdata_fast/raw/main/{}",
        filename
    );
    ensure_cached(config, &dir, &filename, &url)?;

    // Tesseract expects the directory, not the file
    dir.to_str()
        .map(str::to_string)
        .ok_or_else(|| CaptureError::EngineUnavailable("Invalid tessdata path".to_string()))
}
