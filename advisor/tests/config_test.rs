//! Config loading and defaults integration tests

use std::io::Write;
use std::path::Path;

use advisor::{Cli, Config, ConfigError};
use clap::Parser;

#[test]
fn test_config_with_all_fields() {
    let toml_str = r#"
[llm]
base_url = "http://localhost:11434/v1"
model = "llama3.2"
api_key = "sk-local"
max_tokens = 1500
temperature = 0.3
timeout_secs = 15

[session]
auto_fill_delay_ms = 0
"#;

    let config = Config::from_toml_str(toml_str).expect("valid TOML");

    assert_eq!(config.llm.base_url, "http://localhost:11434/v1");
    assert_eq!(config.llm.model, "llama3.2");
    assert_eq!(config.llm.api_key(), Some("sk-local"));
    assert_eq!(config.llm.max_tokens, 1500);
    assert_eq!(config.llm.temperature, Some(0.3));
    assert_eq!(config.llm.timeout_secs, 15);
    assert_eq!(config.session.auto_fill_delay_ms, 0);
}

#[test]
fn test_partial_section_keeps_defaults() {
    let config = Config::from_toml_str("[llm]\nmodel = \"gpt-4o-mini\"\n").expect("valid TOML");

    assert_eq!(config.llm.model, "gpt-4o-mini");
    assert_eq!(config.llm.base_url, "https://api.openai.com/v1");
    assert_eq!(config.llm.api_key, None);
    assert_eq!(config.llm.max_tokens, 2000);
    assert_eq!(config.session.auto_fill_delay_ms, 350);
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[session]\nauto_fill_delay_ms = 100").unwrap();

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.session.auto_fill_delay_ms, 100);
    assert_eq!(config.llm.model, "gpt-4o");
}

#[test]
fn test_config_missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load(&dir.path().join("advisor.toml")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_invalid_toml_returns_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "this is not valid {{ toml }}}}").unwrap();

    let result = Config::load(file.path());
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn test_unreadable_path_is_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = Config::load(dir.path());
    assert!(matches!(result, Err(ConfigError::Read { .. })));
}

#[test]
fn test_cli_overrides_file_values() {
    let mut config = Config::from_toml_str("[llm]\nmodel = \"from-file\"\napi_key = \"sk-file\"\n")
        .expect("valid TOML");

    let cli = Cli::try_parse_from(["advisor", "--model", "from-cli", "report"]).unwrap();
    cli.apply_overrides(&mut config);

    assert_eq!(config.llm.model, "from-cli");
    assert!(config.llm.api_key().is_some());
    assert_eq!(cli.config, Path::new("advisor.toml"));
}
