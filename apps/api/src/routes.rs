use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use candor_dispatch::{CompletionClient, Error as DispatchError, OpenAiClient, prompt};
use serde::{Deserialize, Serialize};

#[derive(Clone)]
pub struct InterviewState {
    client: OpenAiClient,
}

impl InterviewState {
    pub fn new(upstream_base: &str) -> Self {
        Self {
            client: OpenAiClient::builder().api_base(upstream_base).build(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewRequest {
    #[serde(default)]
    question: String,
    #[serde(default)]
    api_key: String,
    #[serde(default)]
    resume_text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InterviewResponse {
    answer: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    error: String,
}

pub fn router(state: InterviewState) -> Router {
    Router::new()
        .route("/api/interview", post(interview))
        .with_state(state)
}

type Rejection = (StatusCode, Json<ErrorResponse>);

fn reject(status: StatusCode, error: &DispatchError) -> Rejection {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

/// The service itself is stateless: single-flight admission lives with the
/// caller, and the caller's own credential rides along in the body.
async fn interview(
    State(state): State<InterviewState>,
    Json(body): Json<InterviewRequest>,
) -> Result<Json<InterviewResponse>, Rejection> {
    if body.question.trim().is_empty() {
        return Err(reject(
            StatusCode::BAD_REQUEST,
            &DispatchError::QuestionRequired,
        ));
    }
    if body.api_key.trim().is_empty() {
        return Err(reject(
            StatusCode::BAD_REQUEST,
            &DispatchError::ApiKeyRequired,
        ));
    }

    let request = prompt::build_request(&body.question, body.resume_text.as_deref());
    match state.client.complete(body.api_key, request).await {
        Ok(answer) => Ok(Json(InterviewResponse { answer })),
        Err(err) => {
            tracing::error!(error = %err, "interview_request_failed");
            Err(reject(StatusCode::INTERNAL_SERVER_ERROR, &err))
        }
    }
}
