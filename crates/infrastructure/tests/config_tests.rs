//! Integration tests for configuration loading

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use application::services::ActiveFaultCounter;
use domain::{CallMetadata, MaxFaults, StatusCode};
use infrastructure::{
    ConfigurationError, FaultInjectionAppConfig, FaultInjectionFilter, TokioTimer,
};

const DOCUMENT: &str = r#"
enabled = true
seed = 42

[logging]
filter = "debug"
json = true

[[policies]]
method = "/pkg.Service/Method"
abort_code = "UNAVAILABLE"
abort_message = "injected by test"
abort_percentage = { numerator = 100, denominator = 100 }
delay_ms = 50
delay_percentage = { numerator = 25 }
max_faults = 5
abort_code_header = "X-Envoy-Fault-Abort-Request"
abort_percentage_header = "x-envoy-fault-abort-request-percentage"

[[policies]]
method = "*"
abort_code = 13
abort_percentage = { numerator = 1, denominator = 1000000 }
"#;

fn write_toml(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn parses_full_document() {
    let config = FaultInjectionAppConfig::from_toml_str(DOCUMENT).unwrap();
    assert!(config.enabled);
    assert_eq!(config.seed, Some(42));
    assert_eq!(config.logging.filter, "debug");
    assert!(config.logging.json);
    assert_eq!(config.policies.len(), 2);

    let registry = config.registry().unwrap();
    let policy = registry.policy_for("/pkg.Service/Method").unwrap();
    assert_eq!(policy.abort_code, StatusCode::Unavailable);
    assert_eq!(policy.abort_message(), "injected by test");
    assert!(policy.abort_percentage.is_always());
    assert_eq!(policy.delay, Duration::from_millis(50));
    assert_eq!(policy.delay_percentage.numerator(), 25);
    assert_eq!(policy.delay_percentage.denominator(), 100);
    assert_eq!(policy.max_faults, MaxFaults::limited(5));
    assert_eq!(
        policy.headers.abort_code.as_deref(),
        Some("x-envoy-fault-abort-request")
    );

    let fallback = registry.policy_for("/other.Service/Call").unwrap();
    assert_eq!(fallback.abort_code, StatusCode::Internal);
    assert_eq!(fallback.abort_percentage.denominator(), 1_000_000);
    assert_eq!(fallback.max_faults, MaxFaults::UNLIMITED);
}

#[test]
fn loads_from_file() {
    let file = write_toml(DOCUMENT);
    let config = FaultInjectionAppConfig::from_file(file.path()).unwrap();
    assert_eq!(config.policies.len(), 2);
    assert_eq!(config.seed, Some(42));
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = FaultInjectionAppConfig::from_file(dir.path().join("absent.toml"));
    assert!(matches!(result, Err(ConfigurationError::Load(_))));
}

#[test]
fn percentage_above_denominator_rejected() {
    let result = FaultInjectionAppConfig::from_toml_str(
        r#"
        [[policies]]
        method = "/svc/A"
        abort_percentage = { numerator = 11, denominator = 10 }
        "#,
    );
    assert!(matches!(result, Err(ConfigurationError::Load(_))));
}

#[test]
fn unknown_status_name_rejected() {
    let result = FaultInjectionAppConfig::from_toml_str(
        r#"
        [[policies]]
        method = "/svc/A"
        abort_code = "EXPLODED"
        "#,
    );
    assert!(result.is_err());
}

#[test]
fn duplicate_policy_rejected() {
    let config = FaultInjectionAppConfig::from_toml_str(
        r#"
        [[policies]]
        method = "/svc/A"

        [[policies]]
        method = "/svc/A"
        "#,
    )
    .unwrap();
    assert!(matches!(
        config.registry(),
        Err(ConfigurationError::DuplicatePolicy(_))
    ));
}

#[tokio::test(start_paused = true)]
async fn disabled_config_builds_passthrough_filter() {
    let config = FaultInjectionAppConfig::from_toml_str(
        r#"
        enabled = false

        [[policies]]
        method = "*"
        abort_code = "ABORTED"
        abort_percentage = { numerator = 100 }
        "#,
    )
    .unwrap();
    let timer = Arc::new(TokioTimer::try_current().unwrap());
    let filter =
        FaultInjectionFilter::from_config(&config, Arc::new(ActiveFaultCounter::new()), timer)
            .unwrap();

    assert!(!filter.is_enabled());
    assert!(filter.session("/svc/A", &CallMetadata::new()).is_none());
}

#[tokio::test(start_paused = true)]
async fn seeded_config_builds_active_filter() {
    let config = FaultInjectionAppConfig::from_toml_str(DOCUMENT).unwrap();
    let timer = Arc::new(TokioTimer::try_current().unwrap());
    let filter =
        FaultInjectionFilter::from_config(&config, Arc::new(ActiveFaultCounter::new()), timer)
            .unwrap();

    let session = filter
        .session("/pkg.Service/Method", &CallMetadata::new())
        .unwrap();
    assert!(session.abort_requested());
    assert_eq!(filter.stats().sessions, 1);
}
