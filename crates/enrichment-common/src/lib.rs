//! enrichment-common — Shared error type and configuration used across the
//! enrichment surface crates.

pub mod error;
pub mod surface_config;

// Re-export commonly used types
pub use error::{ResError, Result};
pub use surface_config::SurfaceConfig;
