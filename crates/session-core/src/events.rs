use candor_dispatch::AnswerRecord;
use candor_segmenter::QuestionEvent;

#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "type")]
pub enum SessionEvent {
    #[serde(rename = "listeningStarted")]
    ListeningStarted { session_id: String },
    #[serde(rename = "listeningStopped")]
    ListeningStopped { session_id: String },
    #[serde(rename = "questionDetected")]
    QuestionDetected {
        session_id: String,
        question: QuestionEvent,
    },
    /// A classified question arrived while a request was in flight and was
    /// dropped. Backpressure is a drop, never a queue.
    #[serde(rename = "questionDropped")]
    QuestionDropped { session_id: String, question: String },
    #[serde(rename = "answerAdded")]
    AnswerAdded {
        session_id: String,
        record: AnswerRecord,
    },
    #[serde(rename = "dispatchFailed")]
    DispatchFailed { session_id: String, error: String },
}
