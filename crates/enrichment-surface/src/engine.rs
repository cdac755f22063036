//! Facade over the grid sampler and stratified aggregator.

use std::fmt::Debug;
use std::path::Path;

use tracing::info;

use enrichment_common::{ResError, Result, SurfaceConfig};

use crate::grid::{EnrichmentGrid, GridSpec};
use crate::stratify::{get_enrichment_grids, EnrichmentSurfaceResult};

/// Computes enrichment surfaces with one fixed configuration.
///
/// The engine holds no result state: each [`compute`](Self::compute) call
/// returns a fresh [`EnrichmentSurfaceResult`] that the caller owns.
#[derive(Debug, Clone, Default)]
pub struct EnrichmentSurfaceEngine {
    config: SurfaceConfig,
}

impl EnrichmentSurfaceEngine {
    /// Create an engine, rejecting configs whose cutoffs fall outside `(0, 1]`.
    pub fn new(config: SurfaceConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create an engine from a YAML, JSON or TOML config file.
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::new(SurfaceConfig::from_path(path)?)
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    /// Enrichment grids of `y_pred` against `y_true`, one per label group
    /// when `stratify_labels` is given.
    ///
    /// Inputs are validated before any ranking happens. An unstratified call
    /// whose data is too small for the smallest cutoff fails with
    /// [`ResError::DegenerateCutoff`]; stratified calls skip such groups and
    /// list them in the result's diagnostics.
    pub fn compute<L>(
        &self,
        y_true: &[f64],
        y_pred: &[f64],
        stratify_labels: Option<&[L]>,
    ) -> Result<EnrichmentSurfaceResult<L>>
    where
        L: Ord + Clone + Debug + Send + Sync,
    {
        self.validate_inputs(y_true, y_pred, stratify_labels.map(<[L]>::len))?;

        let spec = GridSpec::from(&self.config);
        let result = get_enrichment_grids(y_true, y_pred, stratify_labels, &spec)?;

        info!(
            "Enrichment surface: {} samples, {} grid(s) of {}x{}, {} group(s) skipped",
            y_true.len(),
            result.len(),
            spec.num_samples_per_axis,
            spec.num_samples_per_axis,
            result.diagnostics.len()
        );

        Ok(result)
    }

    /// Single grid over all samples.
    pub fn compute_unstratified(&self, y_true: &[f64], y_pred: &[f64]) -> Result<EnrichmentGrid> {
        let mut result = self.compute::<()>(y_true, y_pred, None)?;
        result.groups.pop().map(|g| g.grid).ok_or(ResError::EmptySurface)
    }

    fn validate_inputs(&self, y_true: &[f64], y_pred: &[f64], label_count: Option<usize>) -> Result<()> {
        self.config.validate()?;

        if y_true.len() != y_pred.len() {
            return Err(ResError::InvalidArgument(format!(
                "y_true has {} values but y_pred has {}",
                y_true.len(),
                y_pred.len()
            )));
        }
        if let Some(count) = label_count {
            if count != y_true.len() {
                return Err(ResError::InvalidArgument(format!(
                    "stratify_labels has {} values for {} samples",
                    count,
                    y_true.len()
                )));
            }
        }
        Ok(())
    }
}
