//! VidMeta video metadata extraction library
//!
//! Takes a video as an in-memory byte buffer plus an extension hint, probes it
//! with a native multimedia prober and returns a flat metadata record.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod error;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use app::{DefaultAppContainer, MetadataInteractor};
pub use domain::errors::ExtractionError;
pub use domain::model::{MetadataRequest, VideoMetadataRecord};
pub use error::{VidMetaError, VidMetaResult};
