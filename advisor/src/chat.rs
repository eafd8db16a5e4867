//! `advisor chat`: the interactive session over stdin lines.
//!
//! Plain lines answer the current question. Everything else is a slash
//! command; which ones apply depends on the session mode.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use questionnaire::{
    fill_remaining, presenter, AutoFillOutcome, Mode, SectionKey, Session, SessionError,
    SharedSession, StrategyLookup, StrategySource, SubmitOutcome, UnknownSection,
};
use tokio::io::{AsyncBufRead, AsyncWrite, AsyncWriteExt, Lines};
use tokio::sync::mpsc;
use tracing::debug;

use crate::input::{question_text, resolve_answer};

/// One line of chat input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Answer(String),
    Fill,
    FillAll,
    Continue,
    Edit,
    Set { key: String, value: String },
    Save,
    Cancel,
    Next,
    Panel(SectionKey),
    Restart,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseCommandError {
    #[error("Unknown command: /{0}. Type /help for the list.")]
    Unknown(String),

    #[error("Usage: {0}")]
    MissingArgument(&'static str),

    #[error(transparent)]
    Section(#[from] UnknownSection),
}

impl FromStr for ChatCommand {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let Some(rest) = line.trim_start().strip_prefix('/') else {
            return Ok(Self::Answer(line.to_string()));
        };

        let (name, args) = match rest.split_once(char::is_whitespace) {
            Some((name, args)) => (name, args.trim()),
            None => (rest.trim(), ""),
        };

        match name {
            "fill" => Ok(Self::Fill),
            "fill-all" => Ok(Self::FillAll),
            "continue" => Ok(Self::Continue),
            "edit" => Ok(Self::Edit),
            "set" => {
                let (key, value) = args
                    .split_once(char::is_whitespace)
                    .map(|(k, v)| (k, v.trim()))
                    .unwrap_or((args, ""));
                if key.is_empty() {
                    return Err(ParseCommandError::MissingArgument("/set <field> <value>"));
                }
                Ok(Self::Set {
                    key: key.to_string(),
                    value: value.to_string(),
                })
            }
            "save" => Ok(Self::Save),
            "cancel" => Ok(Self::Cancel),
            "next" => Ok(Self::Next),
            "panel" => {
                if args.is_empty() {
                    return Err(ParseCommandError::MissingArgument("/panel <section>"));
                }
                Ok(Self::Panel(args.parse()?))
            }
            "restart" => Ok(Self::Restart),
            "help" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(ParseCommandError::Unknown(other.to_string())),
        }
    }
}

/// Commands offered in each mode.
fn help_text(mode: &Mode) -> &'static str {
    match mode {
        Mode::Collecting { .. } => {
            "Type your answer and press Enter. /fill answers with sample data, /fill-all fills every remaining question."
        }
        Mode::Checkpoint => "/continue to see your strategy, /edit to change answers.",
        Mode::Editing { .. } => "/set <field> <value> to change an answer, /save to keep changes, /cancel to discard.",
        Mode::Walkthrough(_) => {
            "/next for the next section, /panel <section> to expand a section, /edit to change answers, /restart to start over."
        }
    }
}

async fn say<W: AsyncWrite + Unpin>(out: &mut W, text: &str) -> std::io::Result<()> {
    out.write_all(text.as_bytes()).await?;
    out.write_all(b"\n").await?;
    out.flush().await
}

fn current_question(session: &Session) -> Option<String> {
    session.current_field().map(question_text)
}

fn checkpoint_text(session: &Session) -> String {
    format!(
        "Here's what I have so far:\n\n{}\n{}",
        session.summary(),
        help_text(&Mode::Checkpoint)
    )
}

fn edit_form(session: &Session) -> String {
    let mut form = String::from("Editing answers:\n");
    if let Some(buffer) = session.edit_buffer() {
        for field in session.catalog().iter() {
            form.push_str(&format!(
                "  {} ({}): {}\n",
                field.key,
                field.label,
                buffer.value(field.key)
            ));
        }
    }
    form.push_str(help_text(session.mode()));
    form
}

/// What to show after the collector moves on.
fn after_submit(session: &Session, outcome: SubmitOutcome) -> String {
    match outcome {
        SubmitOutcome::NextQuestion { .. } => current_question(session).unwrap_or_default(),
        SubmitOutcome::CollectionComplete => checkpoint_text(session),
    }
}

fn walkthrough_prompt(session: &Session) -> String {
    match session.walkthrough().and_then(|w| w.prompt()) {
        Some(prompt) => format!("{prompt} (/next)"),
        None => "That's the complete strategy. /edit to revise your answers or /restart to begin again."
            .to_string(),
    }
}

/// Run the chat loop until `/quit` or end of input.
pub async fn run_chat<R, W>(
    session: SharedSession,
    source: &dyn StrategySource,
    auto_fill_delay: Duration,
    lines: &mut Lines<R>,
    out: &mut W,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    say(out, "Hi! I'm your marketing advisor. Let's learn about your business.").await?;
    if let Some(question) = current_question(&*session.lock().await) {
        say(out, &question).await?;
    }

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() && !matches!(session.lock().await.mode(), Mode::Collecting { .. }) {
            continue;
        }

        let command = match line.parse::<ChatCommand>() {
            Ok(command) => command,
            Err(e) => {
                say(out, &e.to_string()).await?;
                continue;
            }
        };
        debug!(?command, "Chat command");

        if command == ChatCommand::Quit {
            break;
        }

        let reply = match command {
            ChatCommand::FillAll => {
                // Each answer is printed as it lands, while the run sleeps.
                let (tx, mut rx) = mpsc::unbounded_channel();
                let run = {
                    let session = Arc::clone(&session);
                    async move {
                        fill_remaining(&session, auto_fill_delay, |e| {
                            let _ = tx.send(format!("{}\n> {}", e.question, e.answer));
                        })
                        .await
                    }
                };
                let print = async {
                    while let Some(exchange) = rx.recv().await {
                        say(out, &exchange).await?;
                    }
                    Ok::<_, std::io::Error>(())
                };

                let (result, printed) = tokio::join!(run, print);
                printed?;
                match result {
                    Ok(AutoFillOutcome::Completed { .. }) => {
                        Ok(checkpoint_text(&*session.lock().await))
                    }
                    Ok(AutoFillOutcome::AlreadyRunning) => Ok("Auto-fill is already running.".to_string()),
                    Err(e) => Err(e),
                }
            }
            ChatCommand::Continue => {
                let mut guard = session.lock().await;
                if guard.mode() == &Mode::Checkpoint {
                    say(out, "Generating comprehensive marketing strategy...").await?;
                }
                guard
                    .continue_to_strategy(source)
                    .await
                    .map(|lookup| {
                        let lead = match lookup {
                            StrategyLookup::Fetched => "Your strategy is ready.",
                            StrategyLookup::Reused => "Your answers haven't changed, so here's the same strategy.",
                        };
                        format!("{lead}\n{}", walkthrough_prompt(&guard))
                    })
            }
            command => {
                let mut guard = session.lock().await;
                handle(&mut guard, command)
            }
        };

        match reply {
            Ok(text) => say(out, &text).await?,
            Err(e) if e.is_validation() => {
                say(out, &format!("{e}. Please enter a valid number.")).await?
            }
            Err(e) => say(out, &format!("{e}. {}", help_text(session.lock().await.mode()))).await?,
        }
    }

    say(out, "Goodbye!").await?;
    Ok(())
}

/// Commands that complete without awaiting anything.
fn handle(session: &mut Session, command: ChatCommand) -> Result<String, SessionError> {
    match command {
        ChatCommand::Answer(text) => {
            let field = session
                .current_field()
                .copied()
                .ok_or(SessionError::InvalidTransition {
                    action: "answer",
                    mode: session.mode().name(),
                })?;
            session.set_input(resolve_answer(&field, &text))?;
            let outcome = session.submit_input()?;
            Ok(after_submit(session, outcome))
        }
        ChatCommand::Fill => {
            let outcome = session.auto_fill_step()?;
            let answered = session
                .transcript()
                .last()
                .map(|e| format!("> {}\n", e.answer))
                .unwrap_or_default();
            Ok(format!("{answered}{}", after_submit(session, outcome)))
        }
        ChatCommand::Edit => {
            session.edit()?;
            Ok(edit_form(session))
        }
        ChatCommand::Set { key, value } => {
            session.set_edit_field(&key, value)?;
            Ok(format!("Updated {key}."))
        }
        ChatCommand::Save => {
            session.save_edit()?;
            Ok(checkpoint_text(session))
        }
        ChatCommand::Cancel => {
            session.cancel_edit()?;
            Ok(checkpoint_text(session))
        }
        ChatCommand::Next => {
            let shown = session.advance()?.map(str::to_string);
            Ok(match shown {
                Some(text) => format!("{text}\n\n{}", walkthrough_prompt(session)),
                None => walkthrough_prompt(session),
            })
        }
        ChatCommand::Panel(key) => {
            let open = session.toggle_panel(key);
            let label = presenter(key).label;
            if !open {
                return Ok(format!("[-] {label}"));
            }
            Ok(match session.panel_detail(key) {
                Some(lines) => {
                    let mut text = format!("[+] {label}");
                    for line in lines {
                        text.push_str(&format!("\n  - {line}"));
                    }
                    text
                }
                None => format!("[+] {label}\n  (available once your strategy is ready)"),
            })
        }
        ChatCommand::Restart => {
            session.start_over()?;
            Ok(format!(
                "Starting over.\n{}",
                current_question(session).unwrap_or_default()
            ))
        }
        ChatCommand::Help => Ok(help_text(session.mode()).to_string()),
        ChatCommand::FillAll | ChatCommand::Continue | ChatCommand::Quit => {
            unreachable!("handled by run_chat")
        }
    }
}
