//! Configuration loading from files on disk.

use std::io::Write;

use trackside_errors::ConfigError;
use trackside_telemetry_frame::{LayoutPolicy, WireLayout};
use trackside_telemetry_ingest::IngestConfig;
use trackside_telemetry_schema::SchemaVersion;

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[test]
fn load_yaml_file() -> TestResult {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile()?;
    writeln!(
        file,
        "schema: logger\nframe_layout: padded\nudp:\n  bind: 0.0.0.0:20000\n  max_datagram: 512\nrefresh_interval_ms: 250"
    )?;

    let config = IngestConfig::load(file.path())?;
    assert_eq!(config.schema, SchemaVersion::Logger);
    assert_eq!(config.frame_layout, LayoutPolicy::Pinned(WireLayout::Padded24));
    assert_eq!(config.udp.bind.port(), 20000);
    assert_eq!(config.udp.max_datagram, 512);
    assert_eq!(config.refresh_interval().as_millis(), 250);
    Ok(())
}

#[test]
fn load_json_file() -> TestResult {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile()?;
    write!(file, r#"{{"schema": "dashboard", "udp": {{"recv_timeout_ms": 50}}}}"#)?;

    let config = IngestConfig::load(file.path())?;
    assert_eq!(config.schema, SchemaVersion::Dashboard);
    assert_eq!(config.udp.recv_timeout_ms, 50);
    assert_eq!(config.frame_layout, LayoutPolicy::Auto);
    Ok(())
}

#[test]
fn parse_error_names_the_file() -> TestResult {
    let mut file = tempfile::Builder::new().suffix(".yml").tempfile()?;
    writeln!(file, "udp: [not, a, map]")?;

    match IngestConfig::load(file.path()) {
        Err(ConfigError::Parse { path, .. }) => {
            assert_eq!(path, file.path().display().to_string());
        }
        other => return Err(format!("expected parse error, got {other:?}").into()),
    }
    Ok(())
}

#[test]
fn missing_file_is_a_read_error() -> TestResult {
    let dir = tempfile::tempdir()?;
    let err = IngestConfig::load(&dir.path().join("absent.yaml")).err();
    assert!(matches!(err, Some(ConfigError::Read { .. })));
    Ok(())
}

#[test]
fn unsupported_extension_rejected_before_reading() -> TestResult {
    let dir = tempfile::tempdir()?;
    let err = IngestConfig::load(&dir.path().join("receiver.toml")).err();
    assert!(matches!(err, Some(ConfigError::UnsupportedFormat(_))));
    Ok(())
}
