use std::path::PathBuf;

use pretty_assertions::assert_eq;

use super::*;

#[test]
fn empty_input_yields_defaults() {
	let config = Config::parse("").unwrap();
	assert_eq!(config, Config::default());
	assert_eq!(config.logging.level(), LogLevel::Info);
	assert_eq!(config.logging.file_name(), "application.log");
	assert!(config.logging.ansi());
	assert_eq!(config.logging.file_path(), None);
	assert_eq!(config.execution_log.max_entries, None);
	assert_eq!(config.execution_log.retention(), None);
	assert!(config.permissions.granted().is_empty());
}

#[test]
fn parses_every_section() {
	let config = Config::parse(
		r#"
[logging]
level = "debug"
directory = "logs"
file_name = "zenox.log"
ansi = false

[execution_log]
max_entries = 500

[permissions]
granted = ["user", "maintainer"]
"#,
	)
	.unwrap();

	assert_eq!(config.logging.level(), LogLevel::Debug);
	assert_eq!(config.logging.file_path(), Some(PathBuf::from("logs").join("zenox.log")));
	assert!(!config.logging.ansi());
	assert_eq!(config.execution_log.max_entries, Some(500));
	assert_eq!(config.execution_log.retention(), NonZeroUsize::new(500));
	assert_eq!(config.permissions.granted(), &[PermissionLevel::User, PermissionLevel::Maintainer]);
}

#[test]
fn zero_max_entries_is_rejected() {
	let err = Config::parse("[execution_log]\nmax_entries = 0\n").unwrap_err();
	assert!(
		matches!(err, ConfigError::InvalidValue { field: "execution_log.max_entries", .. }),
		"unexpected error: {err}"
	);
}

#[test]
fn blank_file_name_is_rejected() {
	let err = Config::parse("[logging]\nfile_name = \"  \"\n").unwrap_err();
	assert_eq!(err.to_string(), "invalid value for logging.file_name: must not be empty");
}

#[test]
fn unknown_level_is_a_toml_error() {
	let err = Config::parse("[logging]\nlevel = \"loud\"\n").unwrap_err();
	assert!(matches!(err, ConfigError::Toml(_)), "unexpected error: {err}");

	let err = Config::parse("[permissions]\ngranted = [\"root\"]\n").unwrap_err();
	assert!(matches!(err, ConfigError::Toml(_)), "unexpected error: {err}");
}

#[test]
fn unknown_fields_are_rejected() {
	assert!(matches!(Config::parse("[logging]\ncolour = true\n"), Err(ConfigError::Toml(_))));
}

#[test]
fn merge_prefers_values_set_in_other() {
	let mut base = Config::parse(
		r#"
[logging]
level = "warn"
file_name = "base.log"

[permissions]
granted = ["user"]
"#,
	)
	.unwrap();
	let overlay = Config::parse("[logging]\nlevel = \"trace\"\n\n[execution_log]\nmax_entries = 10\n").unwrap();

	base.merge(overlay);
	assert_eq!(base.logging.level(), LogLevel::Trace);
	assert_eq!(base.logging.file_name(), "base.log");
	assert_eq!(base.execution_log.max_entries, Some(10));
	assert_eq!(base.permissions.granted(), &[PermissionLevel::User]);
}

#[test]
fn load_reads_file() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("zenox.toml");
	std::fs::write(&path, "[permissions]\ngranted = [\"admin\"]\n").unwrap();

	let config = Config::load(&path).unwrap();
	assert_eq!(config.permissions.granted(), &[PermissionLevel::Admin]);
}

#[test]
fn load_missing_file_reports_path() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("absent.toml");
	match Config::load(&path) {
		Err(ConfigError::Io { path: reported, .. }) => assert_eq!(reported, path),
		other => panic!("expected Io error, got {other:?}"),
	}
}

#[test]
fn load_or_default_falls_back_when_missing() {
	let dir = tempfile::tempdir().unwrap();
	let config = Config::load_or_default(dir.path().join("absent.toml")).unwrap();
	assert_eq!(config, Config::default());
}

#[test]
fn load_or_default_still_reports_parse_errors() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("broken.toml");
	std::fs::write(&path, "[logging\n").unwrap();
	assert!(matches!(Config::load_or_default(&path), Err(ConfigError::Toml(_))));
}

#[test]
fn log_level_maps_to_tracing() {
	assert_eq!(tracing::Level::from(LogLevel::Warn), tracing::Level::WARN);
	assert_eq!(LogLevel::Error.as_str(), "error");
}
