//! Questionnaire - Guided Business Intake and Strategy Walkthrough
//!
//! This crate implements the interaction state machine behind the marketing
//! advisor:
//!
//! - **Collecting**: ask each catalog question in order, one answer at a time
//! - **Checkpoint**: show the confirmed answers for review
//! - **Editing**: revise any answer, then re-confirm
//! - **Walkthrough**: step through the generated strategy section by section
//!
//! # Key Components
//!
//! - [`Catalog`]: Ordered question list (the marketing catalog has 19 fields)
//! - [`Session`]: One user's state machine over a catalog
//! - [`StrategySource`]: Trait for whatever produces a [`StrategyResult`]
//! - [`presenters`]: Ordered section renderers shared by walkthrough and panel
//! - [`fill_remaining`]: Debug run-to-completion auto-fill
//!
//! # Example
//!
//! ```ignore
//! use questionnaire::{CannedStrategy, Session};
//!
//! let mut session = Session::marketing();
//! session.submit("name", "Acme")?;
//! // ... answer the rest ...
//! session.continue_to_strategy(&CannedStrategy).await?;
//! while let Some(text) = session.advance()? {
//!     println!("{text}");
//! }
//! ```

pub mod autofill;
pub mod catalog;
pub mod presenter;
pub mod record;
pub mod report;
pub mod session;
pub mod strategy;

// Re-export main types
pub use autofill::{
    canned_answer, fill_remaining, AutoFillOutcome, SharedSession, DEFAULT_STEP_DELAY,
    PLACEHOLDER_ANSWER,
};
pub use catalog::{is_numeric, Catalog, CatalogError, FieldDescriptor, FieldKind, Section};
pub use presenter::{presenter, presenters, Panel, SectionKey, SectionPresenter, UnknownSection};
pub use record::{BusinessRecord, Exchange, RecordError, Transcript};
pub use report::{render_strategy_report, render_summary, NOT_PROVIDED};
pub use session::{Mode, Session, SessionError, StrategyLookup, SubmitOutcome, Walkthrough};
pub use strategy::*;
