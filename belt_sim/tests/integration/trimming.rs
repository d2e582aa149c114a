//! Warm-up and run-out trimming across the bundle.

use belt_common::config::SimulationConfig;
use belt_sim::pipeline::Pipeline;

#[test]
fn margins_are_removed_from_both_ends() {
    let bundle = Pipeline::from_config(&SimulationConfig::default())
        .unwrap()
        .run()
        .unwrap();
    let drop = 500;
    assert_eq!(bundle.len(), bundle.raw_len - 2 * drop);
    assert!((bundle.times[0] - 0.050).abs() < 1e-12);
    let last = bundle.len() - 1;
    let expected_end = (bundle.raw_len - drop - 1) as f64 * 0.0001;
    assert!((bundle.times[last] - expected_end).abs() < 1e-12);
}

#[test]
fn zero_margin_keeps_everything() {
    let mut config = SimulationConfig::default();
    config.timing.margin_time = 0.0;
    let bundle = Pipeline::from_config(&config).unwrap().run().unwrap();
    assert_eq!(bundle.len(), bundle.raw_len);
    assert_eq!(bundle.times[0], 0.0);
}

#[test]
fn trimmed_window_excludes_filter_edges() {
    // Samples outside the filter window are zero; a surviving edge would
    // show up as a jump of the full travel within one sample.
    let bundle = Pipeline::from_config(&SimulationConfig::default())
        .unwrap()
        .run()
        .unwrap();
    assert_eq!(bundle.upd_positions[0], bundle.positions[0]);
    assert!(bundle.upd_accels.iter().all(|a| a.abs() < 1e7));
}

#[test]
fn margin_longer_than_run_is_rejected() {
    let mut config = SimulationConfig::default();
    config.timing.margin_time = 1.0;
    let err = Pipeline::from_config(&config).unwrap().run().unwrap_err();
    assert!(err.to_string().contains("margin"), "{err}");
}
