//! Log-spaced cutoff mesh and per-cell enrichment scoring.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::debug;

use enrichment_common::{ResError, Result, SurfaceConfig};

use crate::enrichment::CutoffScorer;
use crate::rank::{rank_order, RankDirection};

/// Sampling parameters for one enrichment grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub num_samples_per_axis: usize,
    pub logspace_start: f64,
    pub logspace_stop: f64,
    pub logspace_base: f64,
    pub direction: RankDirection,
    /// Cell count at which scoring runs on the rayon pool; 0 = never.
    pub parallel_threshold: usize,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self::from(&SurfaceConfig::default())
    }
}

impl From<&SurfaceConfig> for GridSpec {
    fn from(config: &SurfaceConfig) -> Self {
        Self {
            num_samples_per_axis: config.num_samples_per_axis,
            logspace_start: config.logspace_start,
            logspace_stop: config.logspace_stop,
            logspace_base: config.logspace_base,
            direction: RankDirection::from_descending(config.descending),
            parallel_threshold: config.parallel_threshold,
        }
    }
}

impl GridSpec {
    /// Cutoff positions along one axis, checked to lie in `(0, 1]`.
    pub fn axis(&self) -> Result<Vec<f64>> {
        if self.num_samples_per_axis == 0 {
            return Err(ResError::InvalidArgument(
                "num_samples_per_axis must be positive".to_string(),
            ));
        }
        let axis = logspace(
            self.logspace_start,
            self.logspace_stop,
            self.num_samples_per_axis,
            self.logspace_base,
        );
        if let Some(bad) = axis.iter().find(|&&c| !(c > 0.0 && c <= 1.0)) {
            return Err(ResError::InvalidArgument(format!(
                "log-spaced cutoff {bad} lies outside (0, 1] for bounds {}^[{}, {}]",
                self.logspace_base, self.logspace_start, self.logspace_stop
            )));
        }
        Ok(axis)
    }

    fn runs_parallel(&self, cells: usize) -> bool {
        self.parallel_threshold > 0 && cells >= self.parallel_threshold
    }
}

/// Cutoff (x), true cutoff (y) and enrichment (z) meshes of one grid.
///
/// `x[[i, j]]` is the predicted-ranking cutoff and varies along columns;
/// `y[[i, j]]` is the true-ranking cutoff and varies along rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentGrid {
    pub x: Array2<f64>,
    pub y: Array2<f64>,
    pub z: Array2<f64>,
}

impl EnrichmentGrid {
    pub fn shape(&self) -> (usize, usize) {
        self.z.dim()
    }

    /// Predicted-cutoff axis (first row of `x`).
    pub fn pred_cutoffs(&self) -> Array1<f64> {
        self.x.row(0).to_owned()
    }

    /// True-cutoff axis (first column of `y`).
    pub fn true_cutoffs(&self) -> Array1<f64> {
        self.y.column(0).to_owned()
    }
}

/// `num` samples evenly spaced in exponent between `base^start` and
/// `base^stop`, both inclusive. A single sample is `base^start`.
pub fn logspace(start: f64, stop: f64, num: usize, base: f64) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![base.powf(start)],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            (0..num)
                .map(|i| {
                    // Pin the last exponent so the top cutoff is exact
                    let exponent = if i == num - 1 { stop } else { start + i as f64 * step };
                    base.powf(exponent)
                })
                .collect()
        }
    }
}

/// Cartesian mesh with `xs` along columns and `ys` along rows.
pub fn meshgrid(xs: &[f64], ys: &[f64]) -> (Array2<f64>, Array2<f64>) {
    let shape = (ys.len(), xs.len());
    let x = Array2::from_shape_fn(shape, |(_, j)| xs[j]);
    let y = Array2::from_shape_fn(shape, |(i, _)| ys[i]);
    (x, y)
}

/// Scores every cell in row-major order. Indexed collection keeps the
/// parallel output in cell order.
fn score_cells(scorer: &CutoffScorer<'_>, axis: &[f64], parallel: bool) -> Result<Vec<f64>> {
    let k = axis.len();
    let cell = |idx: usize| scorer.score(axis[idx / k], axis[idx % k]);

    #[cfg(feature = "parallel")]
    {
        if parallel {
            use rayon::prelude::*;
            return (0..k * k).into_par_iter().map(cell).collect();
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    (0..k * k).map(cell).collect()
}

/// Enrichment grid of `y_pred` against `y_true`.
///
/// Both series are ranked once with the same direction. The degenerate-cell
/// check runs in row-major order before any scoring, so the reported cell
/// does not depend on how the cells are scheduled.
pub fn get_enrichment_grid(y_true: &[f64], y_pred: &[f64], spec: &GridSpec) -> Result<EnrichmentGrid> {
    if y_true.len() != y_pred.len() {
        return Err(ResError::InvalidArgument(format!(
            "series lengths differ: {} true vs {} predicted",
            y_true.len(),
            y_pred.len()
        )));
    }
    let axis = spec.axis()?;
    let k = axis.len();
    let n = y_true.len();

    debug!("Enrichment grid: n={}, k={}, direction={:?}", n, k, spec.direction);

    let ranked_true = rank_order(y_true, spec.direction);
    let ranked_pred = rank_order(y_pred, spec.direction);
    let scorer = CutoffScorer::new(&ranked_true, &ranked_pred)?;

    // Same axis for both: rows are true cutoffs, columns predicted cutoffs
    for &cutoff_true in &axis {
        for &cutoff_pred in &axis {
            if scorer.is_degenerate(cutoff_true, cutoff_pred) {
                return Err(ResError::DegenerateCutoff {
                    cutoff_true,
                    cutoff_pred,
                    sample_count: n,
                });
            }
        }
    }

    let values = score_cells(&scorer, &axis, spec.runs_parallel(k * k))?;

    let z = Array2::from_shape_vec((k, k), values)
        .map_err(|e| ResError::InvalidArgument(format!("grid assembly failed: {e}")))?;
    let (x, y) = meshgrid(&axis, &axis);

    Ok(EnrichmentGrid { x, y, z })
}
