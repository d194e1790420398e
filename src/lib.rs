//! Guided-capture quality classifier for medicine label photos.
//!
//! A frame is scored for blur inside its centered region of interest, read
//! with a text detection engine when sharp, and reported as one of three
//! capture states (red, yellow, green) together with any plausible
//! medicine-name tokens.

pub mod analysis;
pub mod classifier;
pub mod config;
pub mod engine;
pub mod engines;
pub mod error;
pub mod overlay;
pub mod server;

pub use analysis::RegionOfInterest;
pub use classifier::{decode, CaptureState, Classification, Classifier};
pub use config::{ClassifierConfig, Config, EngineConfig};
pub use engine::{TextDetector, TokenCandidate};
pub use engines::EngineRegistry;
pub use error::CaptureError;
