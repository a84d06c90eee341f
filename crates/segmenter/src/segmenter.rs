//! # Transcript-as-Suffix Segmenter
//!
//! The upstream recognizer reports **cumulative snapshots**, not deltas: every
//! tick carries the whole transcript so far. The segmenter tracks how much of
//! that text has already been consumed by a confirmed question and treats the
//! remaining suffix as the candidate segment.
//!
//! ## Two-call protocol
//!
//! **On every snapshot** — `observe` records the text and tells the caller
//! whether anything changed (i.e. whether its quiet timer must be
//! rescheduled). Identical snapshots are idempotent; no timer churn.
//!
//! **On quiet expiry** — `evaluate` trims the unconsumed suffix and runs the
//! question heuristic. Only a confirmed question advances the consumed
//! offset; filler speech stays pending and concatenates with whatever is
//! spoken next.

use std::time::Duration;

use crate::types::QuestionEvent;

/// How long the transcript must stay unchanged before a segment is evaluated.
pub const DEFAULT_QUIET_INTERVAL: Duration = Duration::from_millis(1500);

/// Prefixes that mark a segment as question-like even without a `?`.
const INTERROGATIVE_PREFIXES: &[&str] = &[
    "what", "how", "why", "when", "where", "which", "can", "could",
];

/// Heuristic, not a parser: a literal `?` anywhere, or an interrogative
/// prefix on the lowercased segment. False positives and negatives are
/// accepted ("whatever happened" counts, "is this on" does not).
pub fn is_question_like(segment: &str) -> bool {
    if segment.contains('?') {
        return true;
    }

    let lowered = segment.to_lowercase();
    INTERROGATIVE_PREFIXES
        .iter()
        .any(|prefix| lowered.starts_with(prefix))
}

/// Converts a growing transcript into discrete question segments.
///
/// Pure state machine: the quiet timer itself lives in the session loop,
/// which calls `observe` per snapshot and `evaluate` when the timer fires.
pub struct TranscriptSegmenter {
    last_seen: String,
    /// Byte offset of the consumed prefix. Always recorded at a snapshot
    /// boundary, so slicing `last_seen[processed..]` never splits a UTF-8
    /// sequence. Invariant: `processed <= last_seen.len()`, non-decreasing
    /// within a session.
    processed: usize,
}

impl TranscriptSegmenter {
    pub fn new() -> Self {
        Self {
            last_seen: String::new(),
            processed: 0,
        }
    }

    /// Record the latest cumulative snapshot. Returns `true` when the text
    /// changed and the caller must cancel-and-reschedule its quiet timer.
    pub fn observe(&mut self, full_text: &str) -> bool {
        if full_text == self.last_seen {
            return false;
        }

        // A shorter snapshot means the recognizer restarted; the consumed
        // prefix no longer exists in the new text.
        if full_text.len() < self.processed {
            self.processed = 0;
        }

        self.last_seen.clear();
        self.last_seen.push_str(full_text);
        true
    }

    /// Quiet timer fired: classify the unconsumed suffix of the last
    /// observed snapshot.
    ///
    /// Returns `Some` only for question-like segments, and only then
    /// advances the consumed offset. An empty or non-question suffix leaves
    /// all state untouched so later speech concatenates into it.
    pub fn evaluate(&mut self) -> Option<QuestionEvent> {
        let segment = self.last_seen[self.processed..].trim();
        if segment.is_empty() {
            return None;
        }

        if !is_question_like(segment) {
            return None;
        }

        let event = QuestionEvent::now(segment);
        self.processed = self.last_seen.len();
        Some(event)
    }

    /// Consumed prefix length in bytes.
    pub fn processed(&self) -> usize {
        self.processed
    }

    pub fn last_seen(&self) -> &str {
        &self.last_seen
    }

    /// Discard all state. Called when a listening session (re)starts.
    pub fn reset(&mut self) {
        self.last_seen.clear();
        self.processed = 0;
    }
}

impl Default for TranscriptSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Feed snapshots with a quiet evaluation after each, collecting events.
    fn replay(snapshots: &[&str]) -> Vec<String> {
        let mut seg = TranscriptSegmenter::new();
        let mut questions = Vec::new();

        for snapshot in snapshots {
            seg.observe(snapshot);
            if let Some(event) = seg.evaluate() {
                questions.push(event.text);
            }
        }

        questions
    }

    #[test]
    fn question_mark_classifies() {
        assert!(is_question_like("tell me about yourself?"));
        assert!(is_question_like("so... ?"));
    }

    #[test]
    fn interrogative_prefix_classifies_case_insensitively() {
        assert!(is_question_like("What is your name"));
        assert!(is_question_like("COULD you repeat that"));
        assert!(is_question_like("how did you get here"));
    }

    #[test]
    fn prefix_match_is_literal_not_word_based() {
        // Deliberate heuristic looseness.
        assert!(is_question_like("whatever happened next"));
        assert!(is_question_like("cannot say"));
    }

    #[test]
    fn statements_are_not_questions() {
        assert!(!is_question_like("I worked at a startup for three years"));
        assert!(!is_question_like("is this thing on"));
    }

    #[test]
    fn identical_snapshot_schedules_no_new_timer() {
        let mut seg = TranscriptSegmenter::new();
        assert!(seg.observe("Hello there"));
        assert!(!seg.observe("Hello there"));
        assert!(seg.observe("Hello there friend"));
    }

    #[test]
    fn empty_segment_emits_nothing() {
        let mut seg = TranscriptSegmenter::new();
        seg.observe("   ");
        assert!(seg.evaluate().is_none());
        assert_eq!(seg.processed(), 0);
    }

    #[test]
    fn non_question_does_not_advance_offset() {
        let mut seg = TranscriptSegmenter::new();
        seg.observe("Hello there");
        assert!(seg.evaluate().is_none());
        assert_eq!(seg.processed(), 0);
    }

    #[test]
    fn unclassified_text_concatenates_into_next_segment() {
        // "Hello there" stays pending, then the question arrives: the
        // emitted segment is the whole unconsumed suffix.
        let questions = replay(&["Hello there", "Hello there what is your name?"]);
        assert_eq!(questions, ["Hello there what is your name?"]);
    }

    #[test]
    fn confirmed_question_consumes_transcript() {
        let mut seg = TranscriptSegmenter::new();

        seg.observe("what is your name?");
        let event = seg.evaluate().unwrap();
        assert_eq!(event.text, "what is your name?");
        assert_eq!(seg.processed(), "what is your name?".len());

        // Same snapshot again: nothing left to process.
        seg.observe("what is your name?");
        assert!(seg.evaluate().is_none());
    }

    #[test]
    fn only_new_suffix_is_emitted_after_a_confirmed_question() {
        let mut seg = TranscriptSegmenter::new();

        seg.observe("what is rust?");
        assert!(seg.evaluate().is_some());

        seg.observe("what is rust? and why use it?");
        let event = seg.evaluate().unwrap();
        assert_eq!(event.text, "and why use it?");
    }

    #[test]
    fn offset_is_monotonic_and_bounded() {
        let snapshots = [
            "hello",
            "hello how",
            "hello how are you?",
            "hello how are you? fine thanks",
            "hello how are you? fine thanks what about you?",
        ];

        let mut seg = TranscriptSegmenter::new();
        let mut previous = 0;

        for snapshot in snapshots {
            seg.observe(snapshot);
            seg.evaluate();
            assert!(seg.processed() >= previous);
            assert!(seg.processed() <= snapshot.len());
            previous = seg.processed();
        }
    }

    #[test]
    fn multibyte_text_never_splits_a_character() {
        let mut seg = TranscriptSegmenter::new();

        seg.observe("어떻게 지내세요?");
        let event = seg.evaluate().unwrap();
        assert_eq!(event.text, "어떻게 지내세요?");

        seg.observe("어떻게 지내세요? 감사합니다");
        assert!(seg.evaluate().is_none());
        assert_eq!(seg.last_seen()[seg.processed()..].trim(), "감사합니다");
    }

    #[test]
    fn shrunken_snapshot_is_treated_as_a_restart() {
        let mut seg = TranscriptSegmenter::new();

        seg.observe("what is your name?");
        seg.evaluate().unwrap();

        seg.observe("where");
        assert_eq!(seg.processed(), 0);
        let event = seg.evaluate().unwrap();
        assert_eq!(event.text, "where");
    }

    #[test]
    fn reset_clears_all_state() {
        let mut seg = TranscriptSegmenter::new();
        seg.observe("what time is it?");
        seg.evaluate().unwrap();

        seg.reset();
        assert_eq!(seg.processed(), 0);
        assert_eq!(seg.last_seen(), "");
    }
}
