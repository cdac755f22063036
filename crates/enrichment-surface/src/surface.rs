//! Averaged surface for plotting.
//!
//! Stratified results are shown as one surface: the group grids are
//! stacked along a new leading axis and averaged element-wise.

use ndarray::{Array2, Array3, Axis};

use enrichment_common::{ResError, Result};

use crate::grid::EnrichmentGrid;
use crate::stratify::EnrichmentSurfaceResult;

/// Element-wise mean of every group's `z`, clamped to `[0, 1]`.
///
/// All groups share one cutoff mesh, so `x` and `y` are taken from the first
/// group unchanged. Fails with [`ResError::EmptySurface`] when no group was
/// scored, and with [`ResError::ShapeMismatch`] when the grids disagree in
/// shape.
pub fn mean_surface<L>(result: &EnrichmentSurfaceResult<L>) -> Result<EnrichmentGrid> {
    let first = result.grids().next().ok_or(ResError::EmptySurface)?;
    let shape = first.shape();
    for grid in result.grids() {
        for found in [grid.x.dim(), grid.y.dim()] {
            if found != shape {
                return Err(ResError::ShapeMismatch { expected: shape, found });
            }
        }
    }

    let z = stack_mean(&result.z_grids())?.mapv_into(|v| v.clamp(0.0, 1.0));
    Ok(EnrichmentGrid { x: first.x.clone(), y: first.y.clone(), z })
}

fn stack_mean(grids: &[&Array2<f64>]) -> Result<Array2<f64>> {
    let first = grids.first().ok_or(ResError::EmptySurface)?;
    let shape = first.dim();

    let mut stacked = Array3::<f64>::zeros((grids.len(), shape.0, shape.1));
    for (mut layer, &grid) in stacked.outer_iter_mut().zip(grids) {
        if grid.dim() != shape {
            return Err(ResError::ShapeMismatch { expected: shape, found: grid.dim() });
        }
        layer.assign(grid);
    }

    stacked.mean_axis(Axis(0)).ok_or(ResError::EmptySurface)
}
