//! Per-session event loop.
//!
//! One spawned task owns everything mutable: the segmenter, the dispatcher,
//! the single quiet timer and the single in-flight request. Suspension points
//! are exactly the control channel, quiet-timer expiry and request
//! resolution, so no two of those ever run concurrently.
//!
//! Stopping the session drops the task. A request still in flight at that
//! point resolves nowhere and its result is discarded; a restarted session is
//! a fresh task with fresh state, so stale responses cannot leak across.

use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use candor_dispatch::{CompletionClient, CredentialConfig, PendingRequest, QuestionDispatcher};
use candor_segmenter::{DEFAULT_QUIET_INTERVAL, TranscriptSegmenter};
use tokio::sync::mpsc;
use tokio::time::Sleep;
use tracing::Instrument;

use crate::events::SessionEvent;
use crate::runtime::SessionRuntime;

#[derive(Debug, Clone)]
pub struct SessionParams {
    pub session_id: String,
    pub credential: CredentialConfig,
    pub quiet_interval: Duration,
}

impl SessionParams {
    pub fn new(session_id: impl Into<String>, credential: CredentialConfig) -> Self {
        Self {
            session_id: session_id.into(),
            credential,
            quiet_interval: DEFAULT_QUIET_INTERVAL,
        }
    }

    pub fn with_quiet_interval(mut self, quiet_interval: Duration) -> Self {
        self.quiet_interval = quiet_interval;
        self
    }
}

enum SessionMsg {
    TranscriptUpdated(String),
    Stop,
}

/// Control handle for one listening session.
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<SessionMsg>,
    task: tokio::task::JoinHandle<()>,
}

impl SessionHandle {
    /// Push the latest cumulative transcript snapshot.
    pub fn update_transcript(&self, full_text: impl Into<String>) -> crate::Result<()> {
        self.tx
            .send(SessionMsg::TranscriptUpdated(full_text.into()))
            .map_err(|_| crate::Error::SessionClosed)
    }

    /// Stop listening: the pending quiet timer is cancelled and any in-flight
    /// request is abandoned with its result discarded.
    pub async fn stop(self) {
        let _ = self.tx.send(SessionMsg::Stop);
        let _ = self.task.await;
    }
}

pub fn spawn_session<C>(
    runtime: Arc<dyn SessionRuntime>,
    client: C,
    params: SessionParams,
) -> SessionHandle
where
    C: CompletionClient + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let span = session_span(&params.session_id);
    let task = tokio::spawn(run_session(runtime, client, params, rx).instrument(span));

    SessionHandle { tx, task }
}

fn session_span(session_id: &str) -> tracing::Span {
    tracing::info_span!("session", session_id = %session_id)
}

struct InFlight {
    question: String,
    request: PendingRequest,
}

async fn run_session<C>(
    runtime: Arc<dyn SessionRuntime>,
    client: C,
    params: SessionParams,
    mut rx: mpsc::UnboundedReceiver<SessionMsg>,
) where
    C: CompletionClient,
{
    let session_id = params.session_id.clone();
    let credential = params.credential.clone();

    let mut segmenter = TranscriptSegmenter::new();
    let mut dispatcher = QuestionDispatcher::new(client);
    let mut quiet: Option<Pin<Box<Sleep>>> = None;
    let mut in_flight: Option<InFlight> = None;

    tracing::info!("session_started");
    runtime.emit(SessionEvent::ListeningStarted {
        session_id: session_id.clone(),
    });

    loop {
        tokio::select! {
            msg = rx.recv() => match msg {
                Some(SessionMsg::TranscriptUpdated(full_text)) => {
                    // Identical snapshots are idempotent: only a change
                    // cancels-and-reschedules the quiet timer.
                    if segmenter.observe(&full_text) {
                        quiet = Some(Box::pin(tokio::time::sleep(params.quiet_interval)));
                    }
                }
                Some(SessionMsg::Stop) | None => break,
            },

            _ = quiet_elapsed(&mut quiet) => {
                quiet = None;

                let Some(event) = segmenter.evaluate() else {
                    continue;
                };

                tracing::debug!(question = %event.text, "question_detected");
                runtime.emit(SessionEvent::QuestionDetected {
                    session_id: session_id.clone(),
                    question: event.clone(),
                });

                match dispatcher.submit(&event.text, &credential) {
                    Ok(Some(request)) => {
                        in_flight = Some(InFlight {
                            question: event.text,
                            request,
                        });
                    }
                    Ok(None) => {
                        tracing::debug!("question_dropped_while_busy");
                        runtime.emit(SessionEvent::QuestionDropped {
                            session_id: session_id.clone(),
                            question: event.text,
                        });
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "dispatch_rejected");
                        runtime.emit(SessionEvent::DispatchFailed {
                            session_id: session_id.clone(),
                            error: err.to_string(),
                        });
                    }
                }
            },

            outcome = answer_resolved(&mut in_flight) => {
                let question = in_flight
                    .take()
                    .map(|flight| flight.question)
                    .unwrap_or_default();

                let record = dispatcher.resolve(question, outcome);
                match record.error.clone() {
                    None => {
                        tracing::info!("answer_added");
                        runtime.emit(SessionEvent::AnswerAdded {
                            session_id: session_id.clone(),
                            record,
                        });
                    }
                    Some(error) => {
                        tracing::warn!(error = %error, "dispatch_failed");
                        runtime.emit(SessionEvent::DispatchFailed {
                            session_id: session_id.clone(),
                            error,
                        });
                    }
                }
            }
        }
    }

    tracing::info!("session_stopped");
    runtime.emit(SessionEvent::ListeningStopped { session_id });
}

async fn quiet_elapsed(timer: &mut Option<Pin<Box<Sleep>>>) {
    match timer.as_mut() {
        Some(sleep) => sleep.as_mut().await,
        None => std::future::pending().await,
    }
}

async fn answer_resolved(
    in_flight: &mut Option<InFlight>,
) -> Result<String, candor_dispatch::Error> {
    match in_flight.as_mut() {
        Some(flight) => flight.request.as_mut().await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use candor_dispatch::{ChatCompletionRequest, Error as DispatchError};

    use super::*;

    const QUIET: Duration = Duration::from_millis(25);

    /// Generous multiple of the quiet interval so timer-driven assertions
    /// are not flaky under load.
    async fn settle() {
        tokio::time::sleep(QUIET * 4).await;
    }

    struct TestRuntime {
        events: Mutex<Vec<SessionEvent>>,
    }

    impl TestRuntime {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                events: Mutex::new(Vec::new()),
            })
        }

        fn events(&self) -> Vec<SessionEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    impl SessionRuntime for TestRuntime {
        fn emit(&self, event: SessionEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    /// Replays scripted outcomes after a fixed delay; defaults to an
    /// immediate canned answer once the script runs out.
    struct ScriptedClient {
        delay: Duration,
        script: Mutex<VecDeque<Result<String, DispatchError>>>,
    }

    impl ScriptedClient {
        fn immediate(answer: &str) -> Self {
            Self::with_delay(Duration::ZERO, vec![Ok(answer.to_string())])
        }

        fn with_delay(delay: Duration, script: Vec<Result<String, DispatchError>>) -> Self {
            Self {
                delay,
                script: Mutex::new(script.into()),
            }
        }
    }

    impl CompletionClient for ScriptedClient {
        fn complete(&self, _api_key: String, _request: ChatCompletionRequest) -> PendingRequest {
            let outcome = self
                .script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok("canned answer".to_string()));
            let delay = self.delay;

            Box::pin(async move {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                outcome
            })
        }
    }

    fn params() -> SessionParams {
        SessionParams::new("test-session", CredentialConfig::new("sk-test"))
            .with_quiet_interval(QUIET)
    }

    fn answers(events: &[SessionEvent]) -> Vec<(String, Option<String>)> {
        events
            .iter()
            .filter_map(|event| match event {
                SessionEvent::AnswerAdded { record, .. } => {
                    Some((record.question.clone(), record.answer.clone()))
                }
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn question_is_detected_and_answered_end_to_end() {
        let runtime = TestRuntime::new();
        let handle = spawn_session(
            runtime.clone(),
            ScriptedClient::immediate("Paris"),
            params(),
        );

        handle
            .update_transcript("What is the capital of France?")
            .unwrap();
        settle().await;
        handle.stop().await;

        let events = runtime.events();
        assert!(matches!(events.first(), Some(SessionEvent::ListeningStarted { .. })));
        assert!(matches!(events.last(), Some(SessionEvent::ListeningStopped { .. })));

        assert!(events.iter().any(|e| matches!(
            e,
            SessionEvent::QuestionDetected { question, .. }
                if question.text == "What is the capital of France?"
        )));
        assert_eq!(
            answers(&events),
            [(
                "What is the capital of France?".to_string(),
                Some("Paris".to_string())
            )]
        );
    }

    #[tokio::test]
    async fn filler_speech_accumulates_into_the_next_question() {
        let runtime = TestRuntime::new();
        let handle = spawn_session(
            runtime.clone(),
            ScriptedClient::immediate("nice to meet you"),
            params(),
        );

        handle.update_transcript("Hello there").unwrap();
        settle().await;
        handle
            .update_transcript("Hello there what is your name?")
            .unwrap();
        settle().await;
        handle.stop().await;

        let detected: Vec<_> = runtime
            .events()
            .iter()
            .filter_map(|event| match event {
                SessionEvent::QuestionDetected { question, .. } => Some(question.text.clone()),
                _ => None,
            })
            .collect();

        // "Hello there" alone is never a question; it rides along with the
        // suffix that finally is one.
        assert_eq!(detected, ["Hello there what is your name?"]);
    }

    #[tokio::test]
    async fn second_question_during_busy_window_is_dropped() {
        let runtime = TestRuntime::new();
        let client = ScriptedClient::with_delay(
            QUIET * 8,
            vec![Ok("first answer".to_string())],
        );
        let handle = spawn_session(runtime.clone(), client, params());

        handle.update_transcript("what is rust?").unwrap();
        settle().await;
        handle
            .update_transcript("what is rust? and what is cargo?")
            .unwrap();
        settle().await;
        tokio::time::sleep(QUIET * 10).await;
        handle.stop().await;

        let events = runtime.events();
        let dropped: Vec<_> = events
            .iter()
            .filter_map(|event| match event {
                SessionEvent::QuestionDropped { question, .. } => Some(question.clone()),
                _ => None,
            })
            .collect();

        assert_eq!(dropped, ["and what is cargo?"]);
        assert_eq!(
            answers(&events),
            [("what is rust?".to_string(), Some("first answer".to_string()))]
        );
    }

    #[tokio::test]
    async fn stop_cancels_the_pending_quiet_timer() {
        let runtime = TestRuntime::new();
        let handle = spawn_session(runtime.clone(), ScriptedClient::immediate("never"), params());

        handle.update_transcript("what is rust?").unwrap();
        handle.stop().await;

        let events = runtime.events();
        assert!(!events
            .iter()
            .any(|e| matches!(e, SessionEvent::QuestionDetected { .. })));
        assert!(matches!(events.last(), Some(SessionEvent::ListeningStopped { .. })));
    }

    #[tokio::test]
    async fn missing_credential_surfaces_a_dispatch_failure() {
        let runtime = TestRuntime::new();
        let params = SessionParams::new("test-session", CredentialConfig::new(""))
            .with_quiet_interval(QUIET);
        let handle = spawn_session(runtime.clone(), ScriptedClient::immediate("never"), params);

        handle.update_transcript("what is rust?").unwrap();
        settle().await;
        handle.stop().await;

        let events = runtime.events();
        assert!(events.iter().any(|e| matches!(
            e,
            SessionEvent::DispatchFailed { error, .. } if error == "API key is required"
        )));
        assert!(answers(&events).is_empty());
    }

    #[tokio::test]
    async fn failure_releases_the_slot_for_the_next_question() {
        let runtime = TestRuntime::new();
        let client = ScriptedClient::with_delay(
            Duration::ZERO,
            vec![
                Err(DispatchError::Upstream {
                    status: 500,
                    message: "upstream exploded".into(),
                }),
                Ok("recovered".to_string()),
            ],
        );
        let handle = spawn_session(runtime.clone(), client, params());

        handle.update_transcript("what is rust?").unwrap();
        settle().await;
        handle
            .update_transcript("what is rust? what is cargo?")
            .unwrap();
        settle().await;
        handle.stop().await;

        let events = runtime.events();
        assert!(events.iter().any(|e| matches!(
            e,
            SessionEvent::DispatchFailed { error, .. } if error.contains("upstream exploded")
        )));
        assert_eq!(
            answers(&events),
            [("what is cargo?".to_string(), Some("recovered".to_string()))]
        );
    }

    #[tokio::test]
    async fn update_after_stop_reports_session_closed() {
        let runtime = TestRuntime::new();
        let handle = spawn_session(runtime.clone(), ScriptedClient::immediate("never"), params());

        let tx = handle.tx.clone();
        handle.stop().await;

        let err = SessionHandle {
            tx,
            task: tokio::spawn(async {}),
        }
        .update_transcript("anything")
        .unwrap_err();
        assert!(matches!(err, crate::Error::SessionClosed));
    }

    #[test]
    fn events_serialize_with_a_type_tag() {
        let event = SessionEvent::QuestionDropped {
            session_id: "s".into(),
            question: "why?".into(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "questionDropped");
        assert_eq!(json["question"], "why?");
    }
}
