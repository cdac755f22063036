//! Per-label stratified aggregation of enrichment grids.
//!
//! Samples are grouped by label (sorted label order) and each group gets
//! its own grid. A group too small for the cutoff mesh is skipped whole and
//! recorded in [`EnrichmentSurfaceResult::diagnostics`].

use std::collections::BTreeMap;
use std::fmt::Debug;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::warn;

use enrichment_common::{ResError, Result};

use crate::grid::{get_enrichment_grid, EnrichmentGrid, GridSpec};

/// Grid computed for one group of samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSurface<L> {
    /// `None` for an unstratified computation
    pub label: Option<L>,
    pub sample_count: usize,
    pub grid: EnrichmentGrid,
}

/// A label whose grid hit a degenerate cutoff and was left out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedGroup<L> {
    pub label: L,
    pub sample_count: usize,
    /// First degenerate cell in row-major order
    pub cutoff_true: f64,
    pub cutoff_pred: f64,
}

/// Grids of every successfully scored group, in label order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentSurfaceResult<L> {
    pub groups: Vec<GroupSurface<L>>,
    pub diagnostics: Vec<SkippedGroup<L>>,
}

impl<L> EnrichmentSurfaceResult<L> {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn grids(&self) -> impl Iterator<Item = &EnrichmentGrid> {
        self.groups.iter().map(|g| &g.grid)
    }

    pub fn x_grids(&self) -> Vec<&Array2<f64>> {
        self.grids().map(|g| &g.x).collect()
    }

    pub fn y_grids(&self) -> Vec<&Array2<f64>> {
        self.grids().map(|g| &g.y).collect()
    }

    pub fn z_grids(&self) -> Vec<&Array2<f64>> {
        self.grids().map(|g| &g.z).collect()
    }

    pub fn labels(&self) -> impl Iterator<Item = Option<&L>> {
        self.groups.iter().map(|g| g.label.as_ref())
    }
}

/// Enrichment grids for the whole data set or for each label group.
///
/// Without labels the single grid is returned, and a degenerate cutoff is
/// an error. With labels, degenerate groups are skipped and listed in the
/// diagnostics; any other error aborts the call. If every group is skipped
/// the result is empty, which is not an error.
pub fn get_enrichment_grids<L>(
    y_true: &[f64],
    y_pred: &[f64],
    stratify_labels: Option<&[L]>,
    spec: &GridSpec,
) -> Result<EnrichmentSurfaceResult<L>>
where
    L: Ord + Clone + Debug + Send + Sync,
{
    if y_true.len() != y_pred.len() {
        return Err(ResError::InvalidArgument(format!(
            "series lengths differ: {} true vs {} predicted",
            y_true.len(),
            y_pred.len()
        )));
    }

    let Some(labels) = stratify_labels else {
        let grid = get_enrichment_grid(y_true, y_pred, spec)?;
        return Ok(EnrichmentSurfaceResult {
            groups: vec![GroupSurface { label: None, sample_count: y_true.len(), grid }],
            diagnostics: Vec::new(),
        });
    };

    if labels.len() != y_true.len() {
        return Err(ResError::InvalidArgument(format!(
            "label series has {} entries for {} samples",
            labels.len(),
            y_true.len()
        )));
    }

    let groups = group_by_label(labels);
    let outcomes = score_groups(&groups, y_true, y_pred, spec);

    let mut result = EnrichmentSurfaceResult { groups: Vec::new(), diagnostics: Vec::new() };
    for ((label, rows), outcome) in groups.into_iter().zip(outcomes) {
        match outcome {
            Ok(grid) => result.groups.push(GroupSurface {
                label: Some(label.clone()),
                sample_count: rows.len(),
                grid,
            }),
            Err(ResError::DegenerateCutoff { cutoff_true, cutoff_pred, sample_count }) => {
                warn!(
                    "Skipping label {:?}: {} samples too few for cutoffs ({}, {})",
                    label, sample_count, cutoff_true, cutoff_pred
                );
                result.diagnostics.push(SkippedGroup {
                    label: label.clone(),
                    sample_count,
                    cutoff_true,
                    cutoff_pred,
                });
            }
            Err(e) => return Err(e),
        }
    }

    Ok(result)
}

/// Row indices per unique label, in sorted label order.
fn group_by_label<L: Ord>(labels: &[L]) -> Vec<(&L, Vec<usize>)> {
    let mut groups: BTreeMap<&L, Vec<usize>> = BTreeMap::new();
    for (row, label) in labels.iter().enumerate() {
        groups.entry(label).or_default().push(row);
    }
    groups.into_iter().collect()
}

fn score_group(rows: &[usize], y_true: &[f64], y_pred: &[f64], spec: &GridSpec) -> Result<EnrichmentGrid> {
    let true_slice: Vec<f64> = rows.iter().map(|&r| y_true[r]).collect();
    let pred_slice: Vec<f64> = rows.iter().map(|&r| y_pred[r]).collect();
    get_enrichment_grid(&true_slice, &pred_slice, spec)
}

/// One outcome per group, in the same order as `groups`.
fn score_groups<L: Sync>(
    groups: &[(&L, Vec<usize>)],
    y_true: &[f64],
    y_pred: &[f64],
    spec: &GridSpec,
) -> Vec<Result<EnrichmentGrid>> {
    #[cfg(feature = "parallel")]
    {
        if groups.len() > 1 && spec.parallel_threshold > 0 {
            use rayon::prelude::*;
            return groups
                .par_iter()
                .map(|(_, rows)| score_group(rows, y_true, y_pred, spec))
                .collect();
        }
    }
    groups
        .iter()
        .map(|(_, rows)| score_group(rows, y_true, y_pred, spec))
        .collect()
}
