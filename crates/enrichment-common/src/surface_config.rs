//! Configuration for enrichment surface computation.
//!
//! Every field has a default, so a config file only needs the keys it wants
//! to override. Loadable from YAML, JSON or TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ResError, Result};

/// Grid sampling and ranking options for one engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceConfig {
    /// Number of log-spaced cutoffs per axis (grid is k × k)
    #[serde(default = "default_num_samples")]
    pub num_samples_per_axis: usize,

    /// Exponent of the smallest cutoff (`base^start`)
    #[serde(default = "default_logspace_start")]
    pub logspace_start: f64,

    /// Exponent of the largest cutoff (`base^stop`)
    #[serde(default)]
    pub logspace_stop: f64,

    #[serde(default = "default_logspace_base")]
    pub logspace_base: f64,

    /// Rank highest values first instead of lowest
    #[serde(default)]
    pub descending: bool,

    /// Grid cell count at which cell scoring moves onto the rayon pool.
    /// 0 keeps everything sequential.
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
}

fn default_num_samples() -> usize { 30 }
fn default_logspace_start() -> f64 { -3.0 }
fn default_logspace_base() -> f64 { 10.0 }
fn default_parallel_threshold() -> usize { 64 }

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            num_samples_per_axis: default_num_samples(),
            logspace_start: default_logspace_start(),
            logspace_stop: 0.0,
            logspace_base: default_logspace_base(),
            descending: false,
            parallel_threshold: default_parallel_threshold(),
        }
    }
}

impl SurfaceConfig {
    /// Check the constraints that do not depend on input data.
    ///
    /// Both log-space endpoints must expand to cutoffs in `(0, 1]`; the
    /// samples in between are monotone, so that bounds every grid cell.
    pub fn validate(&self) -> Result<()> {
        if self.num_samples_per_axis == 0 {
            return Err(ResError::InvalidArgument(
                "num_samples_per_axis must be positive".to_string(),
            ));
        }
        if !self.logspace_base.is_finite() || self.logspace_base <= 0.0 {
            return Err(ResError::InvalidArgument(format!(
                "logspace_base must be finite and positive, got {}",
                self.logspace_base
            )));
        }
        if !self.logspace_start.is_finite() || !self.logspace_stop.is_finite() {
            return Err(ResError::InvalidArgument(format!(
                "logspace bounds must be finite, got [{}, {}]",
                self.logspace_start, self.logspace_stop
            )));
        }
        for exponent in [self.logspace_start, self.logspace_stop] {
            let cutoff = self.logspace_base.powf(exponent);
            if !(cutoff > 0.0 && cutoff <= 1.0) {
                return Err(ResError::InvalidArgument(format!(
                    "cutoff {}^{} = {} lies outside (0, 1]",
                    self.logspace_base, exponent, cutoff
                )));
            }
        }
        Ok(())
    }

    /// Load from YAML file
    pub fn from_yaml(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load from JSON file
    pub fn from_json(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Load from TOML file
    pub fn from_toml(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load from a file, picking the format from its extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        debug!("Loading surface config from {:?}", path);

        match ext.as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml(path),
            Some("json") => Self::from_json(path),
            Some("toml") => Self::from_toml(path),
            other => Err(ResError::Config(format!(
                "unsupported config extension {:?} for {:?}",
                other, path
            ))),
        }
    }

    /// Save to YAML file
    pub fn to_yaml(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }
}
