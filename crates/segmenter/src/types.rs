/// A segment of speech that passed the question heuristic.
///
/// Produced by [`crate::TranscriptSegmenter::evaluate`] and consumed exactly
/// once by the dispatch layer. `text` is always non-empty and trimmed.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct QuestionEvent {
    pub text: String,
    pub timestamp_ms: i64,
}

impl QuestionEvent {
    pub fn now(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
        }
    }
}
