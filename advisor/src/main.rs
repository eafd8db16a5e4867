//! advisor: guided marketing questionnaire and strategy report
//!
//! See `advisor --help` for commands.

use std::sync::Arc;

use advisor::chat::run_chat;
use advisor::report::run_report;
use advisor::{Cli, Commands, Config};
use clap::Parser;
use questionnaire::Session;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout carries only the conversation and report
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("advisor=info".parse()?)
                .add_directive("strategist=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    info!("Starting advisor");
    info!("Config file: {}", cli.config.display());

    let mut config = Config::load(&cli.config)?;
    cli.apply_overrides(&mut config);

    let strategist = config.llm.strategist()?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    let result = match &cli.command {
        Commands::Report(args) => run_report(args, &strategist, &mut lines, &mut stdout).await,
        Commands::Chat => {
            let session = Arc::new(Mutex::new(Session::marketing()));
            run_chat(
                session,
                &strategist,
                config.session.auto_fill_delay(),
                &mut lines,
                &mut stdout,
            )
            .await
        }
    };

    if let Err(e) = result {
        error!(error = %e, "advisor failed");
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
