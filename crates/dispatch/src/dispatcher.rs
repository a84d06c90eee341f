//! Single-flight admission over the completion service.
//!
//! The dispatcher owns the one `busy` slot and the append-only answer
//! history. It never queues: a question submitted while a request is
//! outstanding is dropped, and the caller is told so via `Ok(None)`. This is
//! deliberate backpressure, kept observable rather than hidden.

use crate::client::{CompletionClient, PendingRequest};
use crate::error::Error;
use crate::prompt;
use crate::types::{AnswerRecord, CredentialConfig};

pub struct QuestionDispatcher<C> {
    client: C,
    busy: bool,
    history: Vec<AnswerRecord>,
}

impl<C: CompletionClient> QuestionDispatcher<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            busy: false,
            history: Vec::new(),
        }
    }

    pub fn busy(&self) -> bool {
        self.busy
    }

    /// Ordered history of completed dispatch cycles, oldest first.
    pub fn history(&self) -> &[AnswerRecord] {
        &self.history
    }

    /// Admit a question for dispatch.
    ///
    /// - `Ok(None)`: a request is already in flight; the question is dropped.
    /// - `Err(..)`: validation failed; no request was issued and `busy` is
    ///   untouched.
    /// - `Ok(Some(..))`: the busy slot is taken and the returned future is
    ///   the outbound request. The caller must hand its outcome back via
    ///   [`resolve`](Self::resolve), which releases the slot.
    pub fn submit(
        &mut self,
        question: &str,
        credential: &CredentialConfig,
    ) -> Result<Option<PendingRequest>, Error> {
        if self.busy {
            return Ok(None);
        }

        if question.trim().is_empty() {
            return Err(Error::QuestionRequired);
        }
        if credential.api_key.trim().is_empty() {
            return Err(Error::ApiKeyRequired);
        }

        let request = prompt::build_request(question, credential.resume_context.as_deref());
        self.busy = true;
        Ok(Some(
            self.client.complete(credential.api_key.clone(), request),
        ))
    }

    /// Record the outcome of the in-flight request and release the busy slot.
    /// Failures become records with `error` set; no retry is attempted.
    pub fn resolve(&mut self, question: impl Into<String>, outcome: Result<String, Error>) -> AnswerRecord {
        self.busy = false;

        let question = question.into();
        let record = match outcome {
            Ok(answer) => AnswerRecord {
                question,
                answer: Some(answer),
                error: None,
            },
            Err(err) => AnswerRecord {
                question,
                answer: None,
                error: Some(err.to_string()),
            },
        };

        self.history.push(record.clone());
        record
    }
}
