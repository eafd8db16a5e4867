//! Interaction state machine.
//!
//! A [`Session`] walks one user through the flow
//!
//! ```text
//! Collecting ──(last answer)──▶ Checkpoint ──continue──▶ Walkthrough
//!     ▲                          │      ▲                   │
//!     │                        edit   save/cancel       back to edit
//!     │                          ▼      │                   │
//!     │                          Editing ◀──────────────────┘
//!     └──────────────── start over ◀── Walkthrough
//! ```
//!
//! Exactly one [`Mode`] is active at a time. All mutation goes through the
//! methods here; each rejects calls that are not valid in the current mode
//! without changing any state.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::autofill::canned_answer;
use crate::catalog::{Catalog, FieldDescriptor};
use crate::presenter::{presenter, presenters, Panel, SectionKey, SectionPresenter};
use crate::record::{BusinessRecord, Exchange, RecordError, Transcript};
use crate::report::render_summary;
use crate::strategy::{StrategyResult, StrategySource};

/// Error types for session operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// A numeric field received something that is not a number
    #[error("{key} expects a number, got {value:?}")]
    NotNumeric { key: &'static str, value: String },

    /// The answer was addressed to a field other than the current question
    #[error("Expected an answer for {expected}, got one for {actual}")]
    WrongField {
        expected: &'static str,
        actual: String,
    },

    /// The action does not exist in the current mode
    #[error("Cannot {action} while {mode}")]
    InvalidTransition {
        action: &'static str,
        mode: &'static str,
    },

    /// Only the auto-fill run may write answers while it is active
    #[error("Auto-fill is in progress")]
    AutoFillInProgress,

    /// Record access failed
    #[error(transparent)]
    Record(#[from] RecordError),
}

impl SessionError {
    /// Whether the caller should simply re-prompt.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::NotNumeric { .. })
    }
}

/// Current interaction mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Asking catalog questions; `cursor` is the current question
    Collecting { cursor: usize },
    /// Showing the confirmed record
    Checkpoint,
    /// Revising answers in a scratch copy of the record
    Editing { buffer: BusinessRecord },
    /// Stepping through the strategy sections
    Walkthrough(Walkthrough),
}

impl Mode {
    /// Short name used in errors and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Collecting { .. } => "collecting",
            Self::Checkpoint => "at checkpoint",
            Self::Editing { .. } => "editing",
            Self::Walkthrough(_) => "in walkthrough",
        }
    }
}

/// Progress through the strategy sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Walkthrough {
    step: usize,
    transcript: Vec<String>,
}

impl Walkthrough {
    /// Number of sections shown so far.
    pub fn step(&self) -> usize {
        self.step
    }

    /// Rendered sections in the order they were shown.
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    /// Whether every section has been shown.
    pub fn is_complete(&self) -> bool {
        self.step >= presenters().len()
    }

    /// Presenter that `advance` will render next.
    pub fn next_section(&self) -> Option<&'static SectionPresenter> {
        presenters().get(self.step)
    }

    /// Advisor prompt for the next section.
    pub fn prompt(&self) -> Option<String> {
        self.next_section()
            .map(|p| format!("Ready to learn about {}?", p.label))
    }
}

/// Result of an accepted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Collection continues with this question
    NextQuestion { index: usize, key: &'static str },
    /// Every question is answered; the session is at the checkpoint
    CollectionComplete,
}

/// How `continue_to_strategy` obtained its strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyLookup {
    /// The strategy source was called
    Fetched,
    /// The confirmed record is unchanged, so the previous result was kept
    Reused,
}

#[derive(Debug, Clone)]
struct CachedStrategy {
    basis: BusinessRecord,
    result: StrategyResult,
}

/// One user's questionnaire session.
///
/// Owns all of its state; nothing is shared between sessions.
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    catalog: Arc<Catalog>,
    record: BusinessRecord,
    transcript: Transcript,
    input: String,
    confirmed: Option<BusinessRecord>,
    strategy: Option<CachedStrategy>,
    panel: Panel,
    mode: Mode,
    auto_filling: bool,
}

impl Session {
    /// Start a session over a catalog.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let record = BusinessRecord::empty(&catalog);
        let id = Uuid::new_v4();
        debug!(session_id = %id, fields = catalog.len(), "Session created");

        Self {
            id,
            catalog,
            record,
            transcript: Transcript::new(),
            input: String::new(),
            confirmed: None,
            strategy: None,
            panel: Panel::new(),
            mode: Mode::Collecting { cursor: 0 },
            auto_filling: false,
        }
    }

    /// Start a session over the marketing questionnaire.
    pub fn marketing() -> Self {
        Self::new(Arc::new(Catalog::marketing()))
    }

    /// Session identifier (for logs).
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The catalog being collected.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Current mode.
    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Answers gathered so far.
    pub fn record(&self) -> &BusinessRecord {
        &self.record
    }

    /// Record confirmed at the last checkpoint.
    ///
    /// Always set in the checkpoint and the walkthrough, and equal to
    /// [`record`](Self::record) there.
    pub fn confirmed(&self) -> Option<&BusinessRecord> {
        self.confirmed.as_ref()
    }

    /// Question/answer history.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Pending, not yet submitted input.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Strategy obtained for the confirmed record, if any.
    pub fn strategy(&self) -> Option<&StrategyResult> {
        self.strategy.as_ref().map(|c| &c.result)
    }

    /// Side panel state.
    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    /// Whether a run-to-completion auto-fill is active.
    pub fn is_auto_filling(&self) -> bool {
        self.auto_filling
    }

    /// Collector position, while collecting.
    pub fn cursor(&self) -> Option<usize> {
        match self.mode {
            Mode::Collecting { cursor } => Some(cursor),
            _ => None,
        }
    }

    /// Question being asked, while collecting.
    pub fn current_field(&self) -> Option<&FieldDescriptor> {
        self.cursor().and_then(|c| self.catalog.get(c))
    }

    /// Edit buffer, while editing.
    pub fn edit_buffer(&self) -> Option<&BusinessRecord> {
        match &self.mode {
            Mode::Editing { buffer } => Some(buffer),
            _ => None,
        }
    }

    /// Walkthrough progress, while in the walkthrough.
    pub fn walkthrough(&self) -> Option<&Walkthrough> {
        match &self.mode {
            Mode::Walkthrough(w) => Some(w),
            _ => None,
        }
    }

    /// Checkpoint summary of the confirmed (or in-progress) record.
    pub fn summary(&self) -> String {
        let record = self.confirmed.as_ref().unwrap_or(&self.record);
        render_summary(&self.catalog, record)
    }

    fn invalid(&self, action: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            action,
            mode: self.mode.name(),
        }
    }

    // ------------------------------------------------------------------
    // Answer collector
    // ------------------------------------------------------------------

    /// Replace the pending input buffer.
    pub fn set_input(&mut self, value: impl Into<String>) -> Result<(), SessionError> {
        if self.cursor().is_none() {
            return Err(self.invalid("type an answer"));
        }
        self.input = value.into();
        Ok(())
    }

    /// Submit the pending input for the current question.
    pub fn submit_input(&mut self) -> Result<SubmitOutcome, SessionError> {
        let key = self
            .current_field()
            .map(|f| f.key)
            .ok_or_else(|| self.invalid("submit"))?;
        let value = self.input.clone();
        self.submit(key, &value)
    }

    /// Answer the current question.
    ///
    /// Rejected answers leave the cursor, record and transcript untouched.
    pub fn submit(&mut self, key: &str, raw: &str) -> Result<SubmitOutcome, SessionError> {
        if self.auto_filling {
            return Err(SessionError::AutoFillInProgress);
        }
        self.accept(key, raw.to_string())
    }

    /// Answer the current question with its canned debug value.
    pub fn auto_fill_step(&mut self) -> Result<SubmitOutcome, SessionError> {
        if self.auto_filling {
            return Err(SessionError::AutoFillInProgress);
        }
        self.fill_current()
    }

    /// Claim the auto-fill flag. Returns false if a run already holds it.
    pub(crate) fn begin_auto_fill(&mut self) -> Result<bool, SessionError> {
        if self.cursor().is_none() {
            return Err(self.invalid("auto-fill"));
        }
        if self.auto_filling {
            return Ok(false);
        }
        self.auto_filling = true;
        info!(session_id = %self.id, "Auto-fill started");
        Ok(true)
    }

    /// Release the auto-fill flag of a run that stopped early.
    pub(crate) fn end_auto_fill(&mut self) {
        if self.auto_filling {
            self.auto_filling = false;
            info!(session_id = %self.id, "Auto-fill stopped");
        }
    }

    /// One step of a claimed auto-fill run. Releases the flag when the run
    /// reaches the checkpoint or fails.
    pub(crate) fn auto_fill_next(&mut self) -> Result<SubmitOutcome, SessionError> {
        let outcome = self.fill_current();
        if !matches!(outcome, Ok(SubmitOutcome::NextQuestion { .. })) {
            self.auto_filling = false;
        }
        outcome
    }

    fn fill_current(&mut self) -> Result<SubmitOutcome, SessionError> {
        let field = *self.current_field().ok_or_else(|| self.invalid("auto-fill"))?;
        self.accept(field.key, canned_answer(&field).to_string())
    }

    fn accept(&mut self, key: &str, value: String) -> Result<SubmitOutcome, SessionError> {
        let Mode::Collecting { cursor } = self.mode else {
            return Err(self.invalid("submit"));
        };
        let Some(field) = self.catalog.get(cursor).copied() else {
            unreachable!("collector cursor {cursor} is past the end of the catalog");
        };

        if field.key != key {
            return Err(SessionError::WrongField {
                expected: field.key,
                actual: key.to_string(),
            });
        }
        if !field.kind.accepts(&value) {
            debug!(session_id = %self.id, key = field.key, "Rejected non-numeric answer");
            return Err(SessionError::NotNumeric {
                key: field.key,
                value,
            });
        }

        self.record.set(field.key, value.clone())?;
        self.transcript.push(Exchange {
            key: field.key,
            question: field.prompt.to_string(),
            answer: value,
        });
        self.input.clear();

        let next = cursor + 1;
        match self.catalog.get(next) {
            Some(next_field) => {
                self.mode = Mode::Collecting { cursor: next };
                debug!(session_id = %self.id, next = next_field.key, "Answer accepted");
                Ok(SubmitOutcome::NextQuestion {
                    index: next,
                    key: next_field.key,
                })
            }
            None => {
                self.confirmed = Some(self.record.clone());
                self.mode = Mode::Checkpoint;
                info!(
                    session_id = %self.id,
                    answers = self.transcript.len(),
                    "Collection complete"
                );
                Ok(SubmitOutcome::CollectionComplete)
            }
        }
    }

    // ------------------------------------------------------------------
    // Checkpoint and edit session
    // ------------------------------------------------------------------

    /// Move from the checkpoint into the walkthrough.
    ///
    /// Calls the strategy source only when no strategy exists for the
    /// confirmed record. The walkthrough is entered once it resolves.
    pub async fn continue_to_strategy(
        &mut self,
        source: &dyn StrategySource,
    ) -> Result<StrategyLookup, SessionError> {
        if self.mode != Mode::Checkpoint {
            return Err(self.invalid("continue to strategy"));
        }

        let Some(basis) = self.confirmed.clone() else {
            unreachable!("checkpoint entered without a confirmed record");
        };
        let reuse = self
            .strategy
            .as_ref()
            .is_some_and(|cached| cached.basis == basis);

        let lookup = if reuse {
            debug!(session_id = %self.id, "Reusing strategy for unchanged record");
            StrategyLookup::Reused
        } else {
            info!(session_id = %self.id, "Requesting strategy");
            let result = source.generate(&basis).await;
            self.strategy = Some(CachedStrategy { basis, result });
            StrategyLookup::Fetched
        };

        self.mode = Mode::Walkthrough(Walkthrough::default());
        Ok(lookup)
    }

    /// Open the edit form from the checkpoint or the walkthrough.
    pub fn edit(&mut self) -> Result<(), SessionError> {
        if !matches!(self.mode, Mode::Checkpoint | Mode::Walkthrough(_)) {
            return Err(self.invalid("edit"));
        }

        let Some(buffer) = self.confirmed.clone() else {
            unreachable!("{} entered without a confirmed record", self.mode.name());
        };
        self.mode = Mode::Editing { buffer };
        debug!(session_id = %self.id, "Editing answers");
        Ok(())
    }

    /// Change one field in the edit buffer. Not validated until save.
    pub fn set_edit_field(&mut self, key: &str, value: impl Into<String>) -> Result<(), SessionError> {
        let mode = self.mode.name();
        let Mode::Editing { buffer } = &mut self.mode else {
            return Err(SessionError::InvalidTransition {
                action: "edit a field",
                mode,
            });
        };
        buffer.set(key, value)?;
        Ok(())
    }

    /// Commit the edit buffer and return to the checkpoint.
    ///
    /// The transcript is rebuilt from the whole catalog so it always agrees
    /// with the committed record.
    pub fn save_edit(&mut self) -> Result<(), SessionError> {
        let Mode::Editing { buffer } = &self.mode else {
            return Err(self.invalid("save"));
        };

        for field in self.catalog.iter() {
            let value = buffer.value(field.key);
            if !field.kind.accepts(value) {
                return Err(SessionError::NotNumeric {
                    key: field.key,
                    value: value.to_string(),
                });
            }
        }

        let Mode::Editing { buffer } = std::mem::replace(&mut self.mode, Mode::Checkpoint) else {
            unreachable!("mode checked above");
        };
        self.transcript = Transcript::rebuild(&self.catalog, &buffer);
        self.record = buffer.clone();
        self.confirmed = Some(buffer);
        info!(session_id = %self.id, "Edits saved");
        Ok(())
    }

    /// Discard the edit buffer and return to the checkpoint.
    pub fn cancel_edit(&mut self) -> Result<(), SessionError> {
        if !matches!(self.mode, Mode::Editing { .. }) {
            return Err(self.invalid("cancel"));
        }
        self.mode = Mode::Checkpoint;
        debug!(session_id = %self.id, "Edits discarded");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Strategy walkthrough
    // ------------------------------------------------------------------

    /// Render the next strategy section.
    ///
    /// Returns the rendered text, or `None` once every section has been
    /// shown, in which case nothing changes.
    pub fn advance(&mut self) -> Result<Option<&str>, SessionError> {
        let mode = self.mode.name();
        let Mode::Walkthrough(walkthrough) = &mut self.mode else {
            return Err(SessionError::InvalidTransition {
                action: "advance",
                mode,
            });
        };
        let Some(cached) = &self.strategy else {
            unreachable!("walkthrough entered without a strategy");
        };
        let Some(section) = walkthrough.next_section() else {
            return Ok(None);
        };

        walkthrough.transcript.push(section.render(&cached.result));
        walkthrough.step += 1;
        debug!(session_id = %self.id, section = %section.key, step = walkthrough.step, "Section shown");

        Ok(walkthrough.transcript.last().map(String::as_str))
    }

    /// Expand or collapse a panel section; returns the new state.
    pub fn toggle_panel(&mut self, key: SectionKey) -> bool {
        self.panel.toggle(key)
    }

    /// Panel content for a section, available as soon as a strategy exists.
    pub fn panel_detail(&self, key: SectionKey) -> Option<Vec<String>> {
        self.strategy().map(|s| presenter(key).detail(s))
    }

    /// Discard everything and return to the first question.
    pub fn start_over(&mut self) -> Result<(), SessionError> {
        if !matches!(self.mode, Mode::Walkthrough(_)) {
            return Err(self.invalid("start over"));
        }

        self.record = BusinessRecord::empty(&self.catalog);
        self.transcript.clear();
        self.input.clear();
        self.confirmed = None;
        self.strategy = None;
        self.panel.close_all();
        self.mode = Mode::Collecting { cursor: 0 };
        info!(session_id = %self.id, "Session reset");
        Ok(())
    }
}
