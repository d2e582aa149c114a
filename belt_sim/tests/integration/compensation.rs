//! Compensation effectiveness on the reference move list.
//!
//! The belt is a 35 Hz spring; every spring-aware filter must bring the
//! simulated head closer to the commanded path than no filter at all.

use belt_common::config::SimulationConfig;
use belt_common::model::{AccelOrder, FilterKind};
use belt_sim::filters::FilterBank;
use belt_sim::pipeline::{MotionBundle, Pipeline};
use belt_sim::spring::SpringEstimator;
use belt_sim::timebase::TimeBase;

fn run(kind: FilterKind, order: AccelOrder) -> MotionBundle {
    let mut config = SimulationConfig::default();
    config.filter.kind = kind;
    config.motion.accel_order = order;
    Pipeline::from_config(&config).unwrap().run().unwrap()
}

#[test]
fn default_filter_reduces_peak_deviation() {
    let bundle = run(FilterKind::SpringWeighted2, AccelOrder::Two);
    let s = bundle.summary;
    assert!(s.nominal_peak > 0.05, "nominal peak {}", s.nominal_peak);
    assert!(
        s.compensated_peak < s.nominal_peak,
        "compensated {} >= nominal {}",
        s.compensated_peak,
        s.nominal_peak
    );
}

#[test]
fn spring_aware_filters_help_for_every_order() {
    for order in [AccelOrder::Two, AccelOrder::Four, AccelOrder::Six] {
        for kind in [
            FilterKind::SpringRaw,
            FilterKind::SpringDoubleWeighted,
            FilterKind::SpringWeighted2,
        ] {
            let s = run(kind, order).summary;
            assert!(
                s.ratio().is_some_and(|r| r < 1.0),
                "{kind} with {order}: ratio {:?}",
                s.ratio()
            );
        }
    }
}

#[test]
fn spring_raw_nearly_cancels_the_spring() {
    // Pure inverse dynamics leaves only a discretisation residue.
    let s = run(FilterKind::SpringRaw, AccelOrder::Two).summary;
    assert!(s.compensated_peak < 0.01, "residual {}", s.compensated_peak);
}

#[test]
fn every_filter_and_order_runs() {
    for order in [AccelOrder::Two, AccelOrder::Four, AccelOrder::Six] {
        for kind in FilterKind::ALL {
            let bundle = run(kind, order);
            assert!(!bundle.is_empty());
            assert!(bundle.upd_positions.iter().all(|v| v.is_finite()));
            assert!(bundle.summary.compensated_peak.is_finite());
        }
    }
}

#[test]
fn compensated_path_reaches_the_same_endpoint() {
    // Filters only reshape motion; the head still ends at the target.
    let bundle = run(FilterKind::SpringWeighted2, AccelOrder::Two);
    let last = bundle.len() - 1;
    assert!((bundle.upd_positions[last] - bundle.positions[last]).abs() < 1e-9);
    assert!(bundle.spring_diff_upd[last].abs() < 5e-3);
}

#[test]
fn head_sequences_follow_the_estimator() {
    let config = SimulationConfig::default();
    let tb = TimeBase::new(config.timing.sample_period).unwrap();
    let pipeline = Pipeline::from_config(&config).unwrap();
    let positions = pipeline.positions().unwrap();

    let estimator = SpringEstimator::new(&config.spring, &tb);
    let head = estimator.simulate(&positions);
    let bank = FilterBank::new(
        tb,
        config.spring.constants(),
        config.filter.resolved_smooth_time(&config.spring.constants()),
    );
    let upd = bank.apply(config.filter.kind, &positions).unwrap();
    let head_upd = estimator.simulate(&upd);

    let bundle = pipeline.run().unwrap();
    let drop = 500;
    for i in [0, 1000, bundle.len() / 2, bundle.len() - 1] {
        let j = i + drop;
        assert!((bundle.spring_diff_orig[i] - (head[j] - positions[j])).abs() < 1e-12);
        assert!((bundle.spring_diff_upd[i] - (head_upd[j] - positions[j])).abs() < 1e-12);
    }
}
