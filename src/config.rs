use std::path::PathBuf;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub max_file_size: usize,
    pub engine: EngineConfig,
    pub classifier: ClassifierConfig,
}

/// Where and how text recognition engines find their data.
///
/// Resolved once by the caller and handed to the engines at construction.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Engine used when a request does not name one ("ocrs" or "leptess")
    pub default_engine: String,
    /// Tesseract language code (e.g. "eng")
    pub language: String,
    /// Existing tessdata directory; downloaded into the cache when unset
    pub tessdata_path: Option<PathBuf>,
    /// Directory holding ocrs models; defaults to the user cache dir
    pub model_dir: Option<PathBuf>,
    /// Never download missing models or tessdata
    pub offline: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_engine: "ocrs".to_string(),
            language: "eng".to_string(),
            tessdata_path: None,
            model_dir: None,
            offline: false,
        }
    }
}

impl EngineConfig {
    /// Cache directory for downloaded engine data
    pub fn cache_dir(&self) -> PathBuf {
        self.model_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("label-capture")
        })
    }
}

/// Thresholds applied by the capture classifier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifierConfig {
    /// Laplacian variance below which a frame is blurry
    pub blur_threshold: f64,
    /// Detections at or below this confidence are dropped
    pub min_confidence: u8,
    /// Minimum token length, both before and after cleaning
    pub min_token_len: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            blur_threshold: 100.0,
            min_confidence: 60,
            min_token_len: 4,
        }
    }
}
