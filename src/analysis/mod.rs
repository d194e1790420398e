//! Frame analysis steps used by the capture classifier
//!
//! Region selection, sharpness scoring, and token filtering. Each step is a
//! pure function of its input.

pub mod roi;
pub mod sharpness;
pub mod tokens;

pub use roi::RegionOfInterest;
pub use sharpness::laplacian_variance;
pub use tokens::{clean_token, filter_tokens};
