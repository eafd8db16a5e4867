//! Command-line arguments

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::Config;

#[derive(Debug, Parser)]
#[command(name = "advisor")]
#[command(about = "Guided marketing questionnaire that produces a marketing strategy")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "advisor.toml")]
    pub config: PathBuf,

    /// API key for the chat-completions endpoint (overrides config file)
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model name (overrides config file)
    #[arg(long, env = "ADVISOR_MODEL")]
    pub model: Option<String>,

    /// API root URL (overrides config file)
    #[arg(long, env = "ADVISOR_BASE_URL")]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Answer every question, then print the summary and the full strategy
    Report(ReportArgs),

    /// Interactive session: questions, checkpoint, edits and walkthrough
    Chat,
}

#[derive(Debug, Clone, Default, Args)]
pub struct ReportArgs {
    /// Read answers from a JSON object instead of prompting
    #[arg(long, conflicts_with = "auto_fill")]
    pub answers: Option<PathBuf>,

    /// Use the built-in sample answers
    #[arg(long)]
    pub auto_fill: bool,
}

impl Cli {
    /// Apply command-line overrides to a loaded config.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(api_key) = &self.api_key {
            config.llm.api_key = Some(api_key.clone());
        }
        if let Some(model) = &self.model {
            config.llm.model = model.clone();
        }
        if let Some(base_url) = &self.base_url {
            config.llm.base_url = base_url.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_flags() {
        let cli = Cli::try_parse_from(["advisor", "report", "--answers", "spa.json"]).unwrap();
        match cli.command {
            Commands::Report(args) => {
                assert_eq!(args.answers, Some(PathBuf::from("spa.json")));
                assert!(!args.auto_fill);
            }
            Commands::Chat => panic!("expected report"),
        }
        assert_eq!(cli.config, PathBuf::from("advisor.toml"));
    }

    #[test]
    fn test_answers_conflicts_with_auto_fill() {
        let result = Cli::try_parse_from(["advisor", "report", "--answers", "a.json", "--auto-fill"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides_replace_config_values() {
        let cli = Cli::try_parse_from([
            "advisor",
            "--model",
            "gpt-4o-mini",
            "--base-url",
            "http://localhost:11434/v1",
            "--api-key",
            "sk-cli",
            "chat",
        ])
        .unwrap();

        let mut config = Config::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.base_url, "http://localhost:11434/v1");
        assert_eq!(config.llm.api_key(), Some("sk-cli"));
        assert_eq!(config.llm.max_tokens, 2000);
    }
}
