//! Area under an enrichment surface.
//!
//! Integrates `z` over both cutoff axes with composite Simpson's rule. In
//! log scale each axis becomes `ln(c) / |min ln(c)|`, so for cutoffs
//! ending at 1.0 the axis spans `[-1, 0]` and a perfect surface has area 1.

use enrichment_common::{ResError, Result};

use crate::grid::EnrichmentGrid;

/// Simpson's rule over sample points `x` (not necessarily evenly spaced).
///
/// With an even number of points the last interval cannot be paired; the
/// result is then the mean of (Simpson on the leading points + trapezoid on
/// the last interval) and (trapezoid on the first interval + Simpson on the
/// trailing points). Two points reduce to the trapezoid rule, one to zero.
/// Repeated coordinates are rejected: a zero-width interval has no parabola.
pub fn simpson(y: &[f64], x: &[f64]) -> Result<f64> {
    if y.len() != x.len() {
        return Err(ResError::InvalidArgument(format!(
            "simpson needs matching samples: {} values, {} coordinates",
            y.len(),
            x.len()
        )));
    }
    if let Some(i) = x.windows(2).position(|w| w[1] - w[0] == 0.0) {
        return Err(ResError::InvalidArgument(format!(
            "simpson needs distinct coordinates: x[{}] == x[{}] == {}",
            i,
            i + 1,
            x[i]
        )));
    }

    let n = y.len();
    let value = match n {
        0 => {
            return Err(ResError::InvalidArgument(
                "simpson needs at least one sample".to_string(),
            ))
        }
        1 => 0.0,
        2 => trapezoid(y[0], y[1], x[1] - x[0]),
        _ if n % 2 == 1 => simpson_paired(y, x),
        _ => {
            let leading = simpson_paired(&y[..n - 1], &x[..n - 1])
                + trapezoid(y[n - 2], y[n - 1], x[n - 1] - x[n - 2]);
            let trailing = trapezoid(y[0], y[1], x[1] - x[0]) + simpson_paired(&y[1..], &x[1..]);
            (leading + trailing) / 2.0
        }
    };

    Ok(value)
}

fn trapezoid(y0: f64, y1: f64, h: f64) -> f64 {
    0.5 * h * (y0 + y1)
}

/// Composite Simpson over an odd number of points, one parabola per pair
/// of intervals.
fn simpson_paired(y: &[f64], x: &[f64]) -> f64 {
    (0..y.len() / 2)
        .map(|p| {
            let i = 2 * p;
            let h0 = x[i + 1] - x[i];
            let h1 = x[i + 2] - x[i + 1];
            let hsum = h0 + h1;
            hsum / 6.0
                * (y[i] * (2.0 - h1 / h0)
                    + y[i + 1] * hsum * hsum / (h0 * h1)
                    + y[i + 2] * (2.0 - h0 / h1))
        })
        .sum()
}

/// Normalised log coordinates: `ln(c) / |min ln(c)|`.
fn log_axis(cutoffs: &[f64]) -> Result<Vec<f64>> {
    let logs: Vec<f64> = cutoffs.iter().map(|c| c.ln()).collect();
    let scale = logs.iter().copied().fold(f64::INFINITY, f64::min).abs();
    if !scale.is_finite() || scale == 0.0 {
        return Err(ResError::InvalidArgument(format!(
            "cannot normalise log cutoffs with scale {scale}"
        )));
    }
    Ok(logs.into_iter().map(|l| l / scale).collect())
}

/// Double Simpson integral of `grid.z`, first along the predicted-cutoff
/// axis and then along the true-cutoff axis.
///
/// For a stratified result, integrate its [`crate::mean_surface`].
pub fn surface_integral(grid: &EnrichmentGrid, log_scale: bool) -> Result<f64> {
    let pred_axis = grid.pred_cutoffs().to_vec();
    let true_axis = grid.true_cutoffs().to_vec();
    let (pred_axis, true_axis) = if log_scale {
        (log_axis(&pred_axis)?, log_axis(&true_axis)?)
    } else {
        (pred_axis, true_axis)
    };

    let row_areas = grid
        .z
        .rows()
        .into_iter()
        .map(|row| simpson(&row.to_vec(), &pred_axis))
        .collect::<Result<Vec<f64>>>()?;

    simpson(&row_areas, &true_axis)
}
