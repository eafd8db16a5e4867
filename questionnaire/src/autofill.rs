//! Debug auto-fill.
//!
//! Canned answers describe a small boutique spa. A field without a canned
//! answer gets [`PLACEHOLDER_ANSWER`] (or `"0"` when it is numeric).

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::catalog::{FieldDescriptor, FieldKind};
use crate::record::Exchange;
use crate::session::{Session, SessionError, SubmitOutcome};

/// Answer used when a field has no canned value.
pub const PLACEHOLDER_ANSWER: &str = "Test Value";

/// Pause between auto-filled answers.
pub const DEFAULT_STEP_DELAY: Duration = Duration::from_millis(350);

const CANNED_ANSWERS: &[(&str, &str)] = &[
    ("name", "LNO Boutique"),
    ("industry", "Health & Wellness"),
    (
        "description",
        "A boutique spa specializing in facials and massage for women 35+.",
    ),
    ("location", "New York, NY"),
    ("targetAudience", "Wealthier women 35+"),
    ("audienceAgeRange", "35-44"),
    ("audienceIncomeLevel", "$100k-$150k"),
    (
        "audiencePainPoints",
        "Stress, aging skin, lack of self-care time",
    ),
    ("competitors", "Luxury spas, local wellness centers"),
    (
        "uniqueValueProposition",
        "Personalized, luxury experience with expert staff",
    ),
    (
        "keyDifferentiators",
        "Boutique feel, advanced treatments, loyalty program",
    ),
    ("goals", "Increase bookings by 30% in 6 months"),
    ("timeline", "6 months"),
    ("successMetrics", "Number of bookings, customer retention"),
    ("budget", "2000"),
    ("budgetAllocation", "Mostly Google Ads"),
    ("currentChannels", "Google Ads, Instagram"),
    ("currentResults", "Steady bookings, low ad ROI"),
    ("marketingChallenges", "Standing out in a crowded market"),
];

/// Canned debug answer for a field.
pub fn canned_answer(field: &FieldDescriptor) -> &'static str {
    CANNED_ANSWERS
        .iter()
        .find(|(key, _)| *key == field.key)
        .map(|(_, answer)| *answer)
        .unwrap_or(match field.kind {
            FieldKind::Numeric => "0",
            _ => PLACEHOLDER_ANSWER,
        })
}

/// Session shared between a driver and a running auto-fill.
pub type SharedSession = Arc<Mutex<Session>>;

/// Result of [`fill_remaining`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoFillOutcome {
    /// Every remaining question was answered; the session is at the checkpoint
    Completed { filled: usize },
    /// Another run already holds the session
    AlreadyRunning,
}

/// Releases the auto-fill flag when a run stops early, including when its
/// future is dropped between steps.
struct RunGuard {
    session: SharedSession,
    armed: bool,
}

impl RunGuard {
    fn new(session: &SharedSession) -> Self {
        Self {
            session: Arc::clone(session),
            armed: true,
        }
    }

    /// The session already released the flag itself.
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        if let Ok(mut guard) = self.session.try_lock() {
            guard.end_auto_fill();
            return;
        }

        // Someone else holds the lock; release once they are done.
        let session = Arc::clone(&self.session);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    session.lock().await.end_auto_fill();
                });
            }
            Err(_) => warn!("Auto-fill stopped outside a runtime; flag left set"),
        }
    }
}

/// Auto-fill every remaining question in order.
///
/// Sleeps `delay` between answers with the lock released, so readers can
/// observe progress. Other writers are refused until the run finishes or
/// its future is dropped. `on_step` sees each exchange as it is recorded.
pub async fn fill_remaining<F>(
    session: &SharedSession,
    delay: Duration,
    mut on_step: F,
) -> Result<AutoFillOutcome, SessionError>
where
    F: FnMut(&Exchange) + Send,
{
    let id = {
        let mut guard = session.lock().await;
        if !guard.begin_auto_fill()? {
            return Ok(AutoFillOutcome::AlreadyRunning);
        }
        guard.id()
    };
    let mut release = RunGuard::new(session);

    let mut filled = 0;
    loop {
        let outcome = {
            let mut guard = session.lock().await;
            let outcome = guard.auto_fill_next();
            if !guard.is_auto_filling() {
                release.disarm();
            }
            let outcome = outcome?;
            if let Some(exchange) = guard.transcript().last() {
                on_step(exchange);
            }
            outcome
        };
        filled += 1;

        match outcome {
            SubmitOutcome::NextQuestion { .. } => tokio::time::sleep(delay).await,
            SubmitOutcome::CollectionComplete => break,
        }
    }

    info!(session_id = %id, filled, "Auto-fill finished");
    Ok(AutoFillOutcome::Completed { filled })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Section};
    use crate::session::Mode;

    fn shared() -> SharedSession {
        Arc::new(Mutex::new(Session::marketing()))
    }

    #[test]
    fn test_canned_answers_cover_marketing_catalog() {
        for field in Catalog::marketing().iter() {
            let answer = canned_answer(field);
            assert_ne!(answer, PLACEHOLDER_ANSWER, "{} has no canned answer", field.key);
            assert!(field.kind.accepts(answer));
        }
    }

    #[test]
    fn test_placeholder_for_unknown_fields() {
        let text = FieldDescriptor::new("mascot", "Mascot", "Mascot?", Section::Identity);
        let number = FieldDescriptor::new("staff", "Staff", "Staff?", Section::Identity)
            .with_kind(FieldKind::Numeric);

        assert_eq!(canned_answer(&text), PLACEHOLDER_ANSWER);
        assert_eq!(canned_answer(&number), "0");
    }

    #[tokio::test(start_paused = true)]
    async fn test_fill_remaining_reaches_checkpoint() {
        let session = shared();
        session.lock().await.submit("name", "My Shop").unwrap();

        let mut seen = Vec::new();
        let outcome = fill_remaining(&session, DEFAULT_STEP_DELAY, |e| seen.push(e.key))
            .await
            .unwrap();

        assert_eq!(outcome, AutoFillOutcome::Completed { filled: 18 });
        assert_eq!(seen.first(), Some(&"industry"));
        assert_eq!(seen.last(), Some(&"marketingChallenges"));

        let guard = session.lock().await;
        assert_eq!(guard.mode(), &Mode::Checkpoint);
        assert!(!guard.is_auto_filling());
        assert_eq!(guard.confirmed().unwrap().value("name"), "My Shop");
        assert_eq!(guard.confirmed().unwrap().value("budget"), "2000");
        assert_eq!(guard.transcript().len(), 19);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_run_is_a_no_op() {
        let session = shared();

        let (first, second) = tokio::join!(
            fill_remaining(&session, DEFAULT_STEP_DELAY, |_| {}),
            fill_remaining(&session, DEFAULT_STEP_DELAY, |_| {}),
        );

        assert_eq!(first.unwrap(), AutoFillOutcome::Completed { filled: 19 });
        assert_eq!(second.unwrap(), AutoFillOutcome::AlreadyRunning);
        assert_eq!(session.lock().await.transcript().len(), 19);
    }

    #[tokio::test(start_paused = true)]
    async fn test_writers_refused_during_run() {
        let session = shared();

        let probe = async {
            tokio::time::sleep(DEFAULT_STEP_DELAY / 2).await;
            let mut guard = session.lock().await;
            let key = guard.current_field().map(|f| f.key).unwrap();
            (guard.submit(key, "manual"), guard.auto_fill_step(), guard.cursor())
        };

        let (run, (submit, step, cursor)) =
            tokio::join!(fill_remaining(&session, DEFAULT_STEP_DELAY, |_| {}), probe);

        assert!(matches!(run.unwrap(), AutoFillOutcome::Completed { .. }));
        assert_eq!(submit, Err(SessionError::AutoFillInProgress));
        assert_eq!(step, Err(SessionError::AutoFillInProgress));
        assert_eq!(cursor, Some(1));
        assert!(session.lock().await.record().iter().all(|(_, v)| v != "manual"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_out_run_releases_session() {
        let session = shared();

        let cut_short = tokio::time::timeout(
            DEFAULT_STEP_DELAY + DEFAULT_STEP_DELAY / 2,
            fill_remaining(&session, DEFAULT_STEP_DELAY, |_| {}),
        )
        .await;
        assert!(cut_short.is_err());

        {
            let mut guard = session.lock().await;
            assert!(!guard.is_auto_filling());
            assert_eq!(guard.cursor(), Some(2));
            guard.submit("description", "Hand-poured candles").unwrap();
        }

        let rerun = fill_remaining(&session, Duration::ZERO, |_| {}).await.unwrap();
        assert_eq!(rerun, AutoFillOutcome::Completed { filled: 16 });
        assert_eq!(
            session.lock().await.record().value("description"),
            "Hand-poured candles"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_dropped_while_waiting_for_lock_releases_later() {
        let session = shared();

        let held = {
            let session = Arc::clone(&session);
            async move {
                tokio::time::sleep(DEFAULT_STEP_DELAY / 2).await;
                let guard = session.lock().await;
                tokio::time::sleep(DEFAULT_STEP_DELAY * 2).await;
                drop(guard);
            }
        };
        let run = tokio::time::timeout(
            DEFAULT_STEP_DELAY + DEFAULT_STEP_DELAY / 2,
            fill_remaining(&session, DEFAULT_STEP_DELAY, |_| {}),
        );

        let (cut_short, ()) = tokio::join!(run, held);
        assert!(cut_short.is_err());

        tokio::task::yield_now().await;
        let guard = session.lock().await;
        assert!(!guard.is_auto_filling());
        assert_eq!(guard.cursor(), Some(1));
    }

    #[tokio::test]
    async fn test_fill_requires_collecting() {
        let session = shared();
        fill_remaining(&session, Duration::ZERO, |_| {}).await.unwrap();

        let err = fill_remaining(&session, Duration::ZERO, |_| {})
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::InvalidTransition { .. }));
    }
}
