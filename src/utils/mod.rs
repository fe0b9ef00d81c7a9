// Utility functions

pub mod logger;
pub mod text;

pub use logger::*;
pub use text::{clamp, DEFAULT_MAX_CHARS, TRUNCATION_MARKER};
