//! enrichment-surface — Regression enrichment surfaces.
//!
//! Measures how much of the true top Y% of a set of items a model recovers
//! when only its own top X% predictions are trusted, for a log-spaced grid
//! of (X, Y) cutoffs. Optionally stratified by a per-sample label.
//!
//! ```rust,no_run
//! use enrichment_surface::{EnrichmentSurfaceEngine, mean_surface, surface_integral};
//!
//! # fn main() -> enrichment_common::Result<()> {
//! let y_true: Vec<f64> = (0..2000).map(|i| i as f64).collect();
//! let y_pred: Vec<f64> = y_true.iter().map(|v| v + (v * 7.0) % 50.0).collect();
//!
//! let engine = EnrichmentSurfaceEngine::default();
//! let result = engine.compute::<u8>(&y_true, &y_pred, None)?;
//! let surface = mean_surface(&result)?;
//! println!("area under surface: {:.3}", surface_integral(&surface, true)?);
//! # Ok(())
//! # }
//! ```

pub mod rank;
pub mod enrichment;
pub mod grid;
pub mod stratify;
pub mod engine;
pub mod surface;
pub mod integral;

pub use rank::{rank_order, rank_positions, RankDirection};
pub use enrichment::{get_enrichment, CutoffScorer};
pub use grid::{get_enrichment_grid, logspace, meshgrid, EnrichmentGrid, GridSpec};
pub use stratify::{get_enrichment_grids, EnrichmentSurfaceResult, GroupSurface, SkippedGroup};
pub use engine::EnrichmentSurfaceEngine;
pub use surface::mean_surface;
pub use integral::{simpson, surface_integral};
