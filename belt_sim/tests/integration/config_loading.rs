//! Configuration files driving a full run.

use std::io::Write;
use std::path::Path;

use belt_common::config::{ConfigError, ConfigLoader, SimulationConfig};
use belt_common::error::PipelineError;
use belt_common::model::{AccelOrder, FilterKind};
use belt_sim::pipeline::Pipeline;
use tempfile::NamedTempFile;

fn load(toml: &str) -> Result<SimulationConfig, ConfigError> {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{toml}").unwrap();
    SimulationConfig::load(file.path())
}

#[test]
fn shipped_config_matches_defaults() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/belt_sim.toml");
    let config = SimulationConfig::load(&path).unwrap();
    let default = SimulationConfig::default();
    assert_eq!(config.timing.sample_period, default.timing.sample_period);
    assert_eq!(config.timing.margin_time, default.timing.margin_time);
    assert_eq!(config.motion.accel, default.motion.accel);
    assert_eq!(config.motion.accel_order, default.motion.accel_order);
    assert_eq!(config.spring, default.spring);
    assert_eq!(config.filter.kind, default.filter.kind);
    assert_eq!(config.filter.smooth_time, None);

    let a = Pipeline::from_config(&config).unwrap().run().unwrap();
    let b = Pipeline::from_config(&default).unwrap().run().unwrap();
    assert_eq!(a.summary, b.summary);
}

#[test]
fn partial_file_overrides_selected_keys() {
    let config = load(
        r#"
[motion]
accel_order = 6

[filter]
kind = "weighted"
smooth_time = 0.040
"#,
    )
    .unwrap();
    assert_eq!(config.motion.accel_order, AccelOrder::Six);
    assert_eq!(config.filter.kind, FilterKind::Weighted);

    let bundle = Pipeline::from_config(&config).unwrap().run().unwrap();
    assert_eq!(bundle.accel_order, AccelOrder::Six);
    assert_eq!(bundle.filter, FilterKind::Weighted);
}

#[test]
fn unknown_filter_is_a_parse_error() {
    let result = load("[filter]\nkind = \"lowpass\"\n");
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}

#[test]
fn unsupported_accel_order_is_a_parse_error() {
    let result = load("[motion]\naccel_order = 3\n");
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}

#[test]
fn out_of_range_values_fail_pipeline_construction() {
    let config = load("[timing]\nsample_period = 0.5\n").unwrap();
    assert!(matches!(
        Pipeline::from_config(&config),
        Err(PipelineError::Config(ConfigError::ValidationError(_)))
    ));

    let config = load("[spring]\ndamping = -1.0\n").unwrap();
    assert!(Pipeline::from_config(&config).is_err());
}

#[test]
fn oversized_smooth_time_is_a_configuration_error() {
    let config = load("[filter]\nsmooth_time = 1.0e12\n").unwrap();
    let pipeline = Pipeline::from_config(&config).unwrap();
    assert!(matches!(
        pipeline.run(),
        Err(PipelineError::Configuration(_))
    ));
}

#[test]
fn stiffer_belt_deviates_less() {
    let soft = Pipeline::from_config(&SimulationConfig::default())
        .unwrap()
        .run()
        .unwrap();
    let config = load("[spring]\nnatural_frequency = 70.0\n").unwrap();
    let stiff = Pipeline::from_config(&config).unwrap().run().unwrap();
    assert!(stiff.summary.nominal_peak < soft.summary.nominal_peak);
}
