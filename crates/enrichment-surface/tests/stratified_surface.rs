//! End-to-end tests for the enrichment surface engine on synthetic screens.
//!
//! Run with: cargo test --package enrichment-surface --test stratified_surface

use pretty_assertions::assert_eq;

use enrichment_common::{ResError, SurfaceConfig};
use enrichment_surface::{
    get_enrichment, mean_surface, rank_order, surface_integral, EnrichmentSurfaceEngine,
    RankDirection,
};
use enrichment_test_utils::{assert_close, init_tracing, random_screen, synthetic_screen};

fn engine(k: usize) -> EnrichmentSurfaceEngine {
    EnrichmentSurfaceEngine::new(SurfaceConfig { num_samples_per_axis: k, ..Default::default() })
        .expect("valid config")
}

#[test]
fn test_stratified_screen_yields_grid_per_label() {
    init_tracing();
    let screen = synthetic_screen(4_000, 0.2, 3, 0);

    let result = engine(12)
        .compute(&screen.y_true, &screen.y_pred, Some(screen.labels.as_slice()))
        .unwrap();

    // ~1,333 samples per label: every group clears the 0.1% cutoff
    assert_eq!(result.len(), 3);
    assert!(result.diagnostics.is_empty());
    let labels: Vec<Option<&u32>> = result.labels().collect();
    assert_eq!(labels, vec![Some(&0), Some(&1), Some(&2)]);
    assert_eq!(
        result.groups.iter().map(|g| g.sample_count).sum::<usize>(),
        screen.y_true.len()
    );

    for grid in result.grids() {
        assert_eq!(grid.x.dim(), (12, 12));
        assert_eq!(grid.y.dim(), (12, 12));
        assert_eq!(grid.z.dim(), (12, 12));
        assert!(grid.z.iter().all(|&v| (0.0..=1.0).contains(&v)));
        for &c in grid.x.iter().chain(grid.y.iter()) {
            assert!(c >= 0.001 - 1e-12 && c <= 1.0);
        }
        // Whole-set cutoff on both axes always recovers everything
        assert_eq!(grid.z[[11, 11]], 1.0);
    }
}

#[test]
fn test_single_constant_label_matches_unstratified() {
    let screen = synthetic_screen(2_500, 0.2, 1, 11);
    let engine = engine(9);

    let unstratified = engine.compute::<u32>(&screen.y_true, &screen.y_pred, None).unwrap();
    let constant = vec!["all"; screen.y_true.len()];
    let stratified = engine.compute(&screen.y_true, &screen.y_pred, Some(constant.as_slice())).unwrap();

    assert_eq!(stratified.len(), 1);
    assert_eq!(stratified.groups[0].grid, unstratified.groups[0].grid);
    assert_eq!(stratified.groups[0].label, Some("all"));
}

#[test]
fn test_small_label_skipped_with_diagnostic() {
    init_tracing();
    let mut screen = synthetic_screen(3_000, 0.1, 2, 5);
    // Relabel a handful of rows so label 9 cannot fill the 0.1% cutoff
    for row in 0..20 {
        screen.labels[row] = 9;
    }

    let result = engine(6).compute(&screen.y_true, &screen.y_pred, Some(screen.labels.as_slice())).unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(result.labels().collect::<Vec<_>>(), vec![Some(&0), Some(&1)]);
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].label, 9);
    assert_eq!(result.diagnostics[0].sample_count, 20);
}

#[test]
fn test_concrete_three_item_scenario() {
    // Cutoffs {0.5, 1.0}: label a has 2 samples, b only 1
    let config = SurfaceConfig {
        num_samples_per_axis: 2,
        logspace_start: -1.0,
        logspace_stop: 0.0,
        logspace_base: 2.0,
        ..Default::default()
    };
    let engine = EnrichmentSurfaceEngine::new(config).unwrap();
    let result = engine
        .compute(&[0.0, 1.0, 2.0], &[0.0, 1.0, 2.0], Some(&["a", "a", "b"][..]))
        .unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result.groups[0].label, Some("a"));
    assert_eq!(result.diagnostics[0].label, "b");
    assert_eq!(result.diagnostics[0].sample_count, 1);
}

#[test]
fn test_concrete_metric_scenarios() {
    let ranked = rank_order(&[0.0, 1.0, 2.0, 3.0, 4.0], RankDirection::Ascending);
    assert_eq!(get_enrichment(&ranked, &ranked, 0.4, 0.4).unwrap(), 1.0);
    assert!(matches!(
        get_enrichment(&ranked, &ranked, 0.1, 0.1),
        Err(ResError::DegenerateCutoff { sample_count: 5, .. })
    ));
}

#[test]
fn test_informative_model_beats_random() {
    let good = synthetic_screen(3_000, 0.05, 1, 21);
    let random = random_screen(3_000, 21);
    let engine = engine(10);

    let good_area = surface_integral(&engine.compute_unstratified(&good.y_true, &good.y_pred).unwrap(), true).unwrap();
    let random_area =
        surface_integral(&engine.compute_unstratified(&random.y_true, &random.y_pred).unwrap(), true).unwrap();

    assert!(good_area > random_area, "good {good_area} vs random {random_area}");
    assert!((0.0..=1.0 + 1e-9).contains(&good_area));
}

#[test]
fn test_descending_direction_mirrors_negated_values() {
    let screen = synthetic_screen(2_000, 0.2, 1, 3);
    let neg_true: Vec<f64> = screen.y_true.iter().map(|v| -v).collect();
    let neg_pred: Vec<f64> = screen.y_pred.iter().map(|v| -v).collect();

    let descending = EnrichmentSurfaceEngine::new(SurfaceConfig {
        num_samples_per_axis: 8,
        descending: true,
        ..Default::default()
    })
    .unwrap();

    // Values are distinct, so tie order plays no part
    assert_eq!(
        descending.compute_unstratified(&screen.y_true, &screen.y_pred).unwrap(),
        engine(8).compute_unstratified(&neg_true, &neg_pred).unwrap()
    );
}

#[test]
fn test_mean_surface_of_stratified_result() {
    let screen = synthetic_screen(4_500, 0.2, 3, 8);
    let result = engine(7).compute(&screen.y_true, &screen.y_pred, Some(screen.labels.as_slice())).unwrap();
    let mean = mean_surface(&result).unwrap();

    assert_eq!(mean.shape(), (7, 7));
    assert_eq!(mean.x, result.groups[0].grid.x);
    let expected: Vec<f64> = (0..49)
        .map(|idx| {
            let (i, j) = (idx / 7, idx % 7);
            result.grids().map(|g| g.z[[i, j]]).sum::<f64>() / result.len() as f64
        })
        .collect();
    assert_close(&mean.z.iter().copied().collect::<Vec<_>>(), &expected, 1e-12);
}

#[test]
fn test_all_degenerate_result_cannot_be_averaged() {
    let y = vec![0.1, 0.2, 0.3, 0.4];
    let result = engine(5).compute(&y, &y, Some(&[0, 1, 2, 3][..])).unwrap();
    assert!(result.is_empty());
    assert_eq!(result.diagnostics.len(), 4);
    assert!(matches!(mean_surface(&result), Err(ResError::EmptySurface)));
}

#[test]
fn test_result_serializes_for_plotting() {
    let screen = synthetic_screen(1_500, 0.2, 1, 2);
    let result = engine(4).compute::<u32>(&screen.y_true, &screen.y_pred, None).unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert!(json["groups"][0]["grid"]["z"].is_object());
    assert_eq!(json["diagnostics"].as_array().map(Vec::len), Some(0));
}
