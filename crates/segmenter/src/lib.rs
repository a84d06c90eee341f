pub mod segmenter;
pub mod types;

pub use segmenter::{DEFAULT_QUIET_INTERVAL, TranscriptSegmenter, is_question_like};
pub use types::QuestionEvent;
