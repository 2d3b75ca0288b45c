use fontsynth_core::{ConfigError, ProcessorConfig, StagingPolicy};
use fontsynth_ports::types::Gain;
use pretty_assertions::assert_eq;

#[test]
fn empty_object_yields_defaults() {
    let config = ProcessorConfig::from_json_str("{}").expect("parse");
    assert_eq!(config, ProcessorConfig::default());
    assert_eq!(config.instrument_channel, 1);
    assert_eq!(config.staging, StagingPolicy::Lazy);
}

#[test]
fn partial_config_overrides_named_fields() {
    let config = ProcessorConfig::from_json_str(
        r#"{"max_polyphony": 64, "staging": "eager", "initial_bank": "our_piano.sf2"}"#,
    )
    .expect("parse");

    assert_eq!(config.max_polyphony, 64);
    assert_eq!(config.staging, StagingPolicy::Eager);
    assert_eq!(config.initial_bank.as_deref(), Some("our_piano.sf2"));
    assert_eq!(config.collector_capacity, 1024);

    let settings = config.engine_settings(48_000);
    assert_eq!(settings.sample_rate_hz, 48_000);
    assert_eq!(settings.max_polyphony, 64);
    assert_eq!(settings.master_gain, Gain(1.0));
}

#[test]
fn rejects_out_of_range_values() {
    for json in [
        r#"{"max_polyphony": 0}"#,
        r#"{"instrument_channel": 16}"#,
        r#"{"collector_capacity": 0}"#,
        r#"{"master_gain": -0.5}"#,
    ] {
        assert!(
            matches!(ProcessorConfig::from_json_str(json), Err(ConfigError::Invalid(_))),
            "{json} should be invalid"
        );
    }
}

#[test]
fn malformed_json_is_a_parse_error() {
    assert!(matches!(
        ProcessorConfig::from_json_str(r#"{"staging": "sometimes"}"#),
        Err(ConfigError::Parse(_))
    ));
    assert!(matches!(
        ProcessorConfig::from_json_str("not json"),
        Err(ConfigError::Parse(_))
    ));
}
