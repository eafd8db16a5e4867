//! advisor: command-line marketing advisor
//!
//! Walks a business owner through the marketing questionnaire and prints a
//! strategy produced by an OpenAI-compatible model (or the built-in
//! fallback when no model is configured).
//!
//! - `advisor report`: answer every question, print summary and full report
//! - `advisor chat`: interactive session with checkpoint, edits and a
//!   section-by-section walkthrough

pub mod chat;
pub mod cli;
pub mod config;
pub mod input;
pub mod report;

pub use cli::{Cli, Commands, ReportArgs};
pub use config::{Config, ConfigError, LlmConfig, SessionConfig};
