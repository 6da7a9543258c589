//! Audio analysis: frequency sources and spectrum transforms.

pub mod source;
pub mod spectrum;
