//! Text detection engine implementations
//!
//! This module contains implementations of the TextDetector trait for different
//! OCR backends. Engines are conditionally compiled based on feature flags.

#[cfg(any(feature = "engine-ocrs", feature = "engine-leptess"))]
mod assets;

#[cfg(feature = "engine-ocrs")]
pub mod ocrs;

#[cfg(feature = "engine-leptess")]
pub mod leptess;

use crate::config::EngineConfig;
use crate::engine::TextDetector;
use crate::error::CaptureError;
use serde::Serialize;
use std::sync::Arc;

/// Information about a registered engine
#[derive(Debug, Clone, Serialize)]
pub struct EngineInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unavailable_reason: Option<String>,
    pub supported_languages: Vec<String>,
}

struct EngineEntry {
    name: &'static str,
    description: &'static str,
    detector: Result<Arc<dyn TextDetector>, String>,
}

/// Registry of text detection engines.
///
/// Engines that fail to initialize stay registered so that requests routed
/// to them fail with [`CaptureError::EngineUnavailable`] instead of
/// taking the whole server down.
pub struct EngineRegistry {
    engines: Vec<EngineEntry>,
    default_engine: String,
}

impl EngineRegistry {
    /// Create a registry with every compiled-in engine initialized from `config`
    pub fn new(config: &EngineConfig) -> Result<Self, CaptureError> {
        let mut registry = Self::empty(&config.default_engine);

        #[cfg(feature = "engine-ocrs")]
        {
            tracing::info!("Initializing ocrs engine...");
            match ocrs::OcrsEngine::new(config) {
                Ok(engine) => registry.register(Arc::new(engine)),
                Err(e) => registry.register_unavailable(
                    "ocrs",
                    "Pure Rust OCR engine - fast, no system dependencies required",
                    e.to_string(),
                ),
            }
        }

        #[cfg(feature = "engine-leptess")]
        {
            tracing::info!("Initializing leptess engine...");
            match leptess::LeptessEngine::new(config) {
                Ok(engine) => registry.register(Arc::new(engine)),
                Err(e) => registry.register_unavailable(
                    "leptess",
                    "Tesseract OCR engine - better for noisy/messy images like phone photos",
                    e.to_string(),
                ),
            }
        }

        if registry.engines.is_empty() {
            return Err(CaptureError::EngineUnavailable(
                "No OCR engines available. Build with --features engine-ocrs or --features engine-leptess".to_string(),
            ));
        }

        if !registry.list().iter().any(|name| *name == config.default_engine) {
            return Err(CaptureError::InvalidRequest(format!(
                "Unknown default engine '{}' (available: {})",
                config.default_engine,
                registry.list().join(", ")
            )));
        }

        Ok(registry)
    }

    /// A registry with no engines; populate it with [`register`](Self::register)
    pub fn empty(default_engine: &str) -> Self {
        Self {
            engines: Vec::new(),
            default_engine: default_engine.to_string(),
        }
    }

    pub fn register(&mut self, detector: Arc<dyn TextDetector>) {
        self.engines.push(EngineEntry {
            name: detector.name(),
            description: detector.description(),
            detector: Ok(detector),
        });
    }

    pub fn register_unavailable(
        &mut self,
        name: &'static str,
        description: &'static str,
        reason: String,
    ) {
        tracing::warn!("Engine {} unavailable: {}", name, reason);
        self.engines.push(EngineEntry {
            name,
            description,
            detector: Err(reason),
        });
    }

    /// Get an engine by name
    pub fn get(&self, name: &str) -> Result<Arc<dyn TextDetector>, CaptureError> {
        let entry = self
            .engines
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| {
                CaptureError::InvalidRequest(format!(
                    "Unknown engine '{}'. Available engines: {}",
                    name,
                    self.list().join(", ")
                ))
            })?;

        entry
            .detector
            .clone()
            .map_err(|reason| CaptureError::EngineUnavailable(format!("{}: {}", name, reason)))
    }

    /// Get the default engine
    pub fn default(&self) -> Result<Arc<dyn TextDetector>, CaptureError> {
        self.get(&self.default_engine)
    }

    /// Get the default engine name
    pub fn default_name(&self) -> &str {
        &self.default_engine
    }

    /// List all registered engine names
    pub fn list(&self) -> Vec<&'static str> {
        self.engines.iter().map(|e| e.name).collect()
    }

    /// Get info about all registered engines
    pub fn info(&self) -> Vec<EngineInfo> {
        self.engines
            .iter()
            .map(|e| match &e.detector {
                Ok(detector) => EngineInfo {
                    name: e.name,
                    description: e.description,
                    available: true,
                    unavailable_reason: None,
                    supported_languages: detector.supported_languages(),
                },
                Err(reason) => EngineInfo {
                    name: e.name,
                    description: e.description,
                    available: false,
                    unavailable_reason: Some(reason.clone()),
                    supported_languages: Vec::new(),
                },
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TokenCandidate;
    use image::DynamicImage;

    struct Echo;

    impl TextDetector for Echo {
        fn name(&self) -> &'static str {
            "echo"
        }

        fn description(&self) -> &'static str {
            "echo"
        }

        fn detect(&self, _image: &DynamicImage) -> Result<Vec<TokenCandidate>, CaptureError> {
            Ok(Vec::new())
        }

        fn supported_languages(&self) -> Vec<String> {
            vec!["eng".to_string()]
        }
    }

    fn registry() -> EngineRegistry {
        let mut registry = EngineRegistry::empty("echo");
        registry.register(Arc::new(Echo));
        registry.register_unavailable("leptess", "tesseract", "tessdata missing".to_string());
        registry
    }

    #[test]
    fn test_default_engine_resolves() {
        let registry = registry();
        assert_eq!(registry.default().unwrap().name(), "echo");
        assert_eq!(registry.default_name(), "echo");
    }

    #[test]
    fn test_unavailable_engine_reports_reason() {
        let err = registry().get("leptess").err().unwrap();
        assert!(matches!(err, CaptureError::EngineUnavailable(ref msg) if msg.contains("tessdata missing")));
    }

    #[test]
    fn test_unknown_engine_is_invalid_request() {
        let err = registry().get("paddle").err().unwrap();
        assert!(matches!(err, CaptureError::InvalidRequest(_)));
    }

    #[test]
    fn test_info_lists_availability() {
        let info = registry().info();
        assert_eq!(info.len(), 2);
        assert!(info[0].available);
        assert!(!info[1].available);
        assert_eq!(info[1].unavailable_reason.as_deref(), Some("tessdata missing"));
    }
}
