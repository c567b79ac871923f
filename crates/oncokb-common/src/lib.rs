//! oncokb-common: Shared event types, errors, and configuration used across
//! the OncoKB annotator crates.

pub mod error;
pub mod entities;
pub mod config;

// Re-export commonly used types
pub use config::{AnnotatorConfig, OncoKbConfig};
pub use entities::{Event, EventBatch, OncoKbAnnotation};
pub use error::{AnnotatorError, Result};
