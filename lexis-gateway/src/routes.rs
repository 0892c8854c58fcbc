//! Route definitions for the Lexis gateway.
//!
//! Submission endpoints are open; feedback and lexicon inspection require a
//! moderator token.

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use lexis_common::logging::generate_request_id;
use lexis_common::Error;
use lexis_core::{Analysis, AnalysisRecord, FeedbackEvent, FeedbackOutcome, SentimentEngine};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth::{require_moderator, AuthState, AuthUser};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SentimentEngine>,
    pub auth: AuthState,
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// A Lexis error rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

// Malformed bodies get the same error shape as every other failure.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(Error::InvalidInput(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        }
        let body = ErrorResponse {
            error: self.0.to_string(),
            code: self.0.code().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub service: String,
}

/// Submission of a text for analysis.
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub identifier: String,
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub identifier: String,
    #[serde(flatten)]
    pub analysis: Analysis,
}

/// A moderator's label correction. The label stays a string here so that
/// unknown labels are answered with a structured 400.
#[derive(Debug, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub identifier: String,
    pub original_text: String,
    pub corrected_label: String,
}

/// Learned vocabulary as exposed to moderators.
#[derive(Debug, Serialize, Deserialize)]
pub struct AdaptiveLexiconResponse {
    pub version: u64,
    pub positive_count: usize,
    pub negative_count: usize,
    pub positive: Vec<String>,
    pub negative: Vec<String>,
}

/// Build the router with all routes.
pub fn build_routes(engine: Arc<SentimentEngine>, auth: AuthState) -> Router {
    let state = AppState {
        engine,
        auth: auth.clone(),
    };

    let moderated = Router::new()
        .route("/api/v1/feedback", post(feedback_handler))
        .route("/api/v1/lexicon/adaptive", get(adaptive_lexicon_handler))
        .layer(middleware::from_fn_with_state(auth, require_moderator));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/analyze", post(analyze_handler))
        .route("/api/v1/results/:identifier", get(result_handler))
        .merge(moderated)
        .with_state(state)
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = if state.engine.health_check().await {
        "healthy"
    } else {
        "degraded"
    };
    Json(HealthResponse {
        status: status.into(),
        version: env!("CARGO_PKG_VERSION").into(),
        service: "lexis-gateway".into(),
    })
}

async fn analyze_handler(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let Json(request) = payload?;
    let analysis = state.engine.submit(&request.identifier, &request.text).await?;
    Ok(Json(AnalyzeResponse {
        identifier: request.identifier,
        analysis,
    }))
}

async fn result_handler(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Result<Json<AnalysisRecord>, ApiError> {
    state
        .engine
        .record(&identifier)
        .await?
        .map(Json)
        .ok_or_else(|| Error::NotFound(format!("no analysis for '{identifier}'")).into())
}

async fn feedback_handler(
    State(state): State<AppState>,
    Extension(moderator): Extension<AuthUser>,
    payload: Result<Json<FeedbackRequest>, JsonRejection>,
) -> Result<Json<FeedbackOutcome>, ApiError> {
    let Json(request) = payload?;
    let request_id = generate_request_id();
    let event = FeedbackEvent::parse(
        &request.identifier,
        &request.original_text,
        &request.corrected_label,
    )
    .inspect_err(|e| {
        tracing::info!(request_id = %request_id, moderator = %moderator.user_id, error = %e, "Rejected feedback");
    })?;

    tracing::info!(
        request_id = %request_id,
        moderator = %moderator.user_id,
        identifier = %event.identifier,
        label = %event.corrected_label,
        "Feedback received"
    );
    let outcome = state.engine.feedback(event).await?;
    Ok(Json(outcome))
}

async fn adaptive_lexicon_handler(State(state): State<AppState>) -> Json<AdaptiveLexiconResponse> {
    let adaptive = state.engine.adaptive();
    let lexicon = &adaptive.lexicon;
    Json(AdaptiveLexiconResponse {
        version: adaptive.version,
        positive_count: lexicon.positive.len(),
        negative_count: lexicon.negative.len(),
        positive: lexicon.positive.iter().cloned().collect(),
        negative: lexicon.negative.iter().cloned().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_status_follows_error_kind() {
        let cases = [
            (Error::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (Error::Auth("x".into()), StatusCode::UNAUTHORIZED),
            (Error::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (Error::NotFound("x".into()), StatusCode::NOT_FOUND),
            (Error::Conflict("x".into()), StatusCode::CONFLICT),
            (Error::Storage("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, status) in cases {
            assert_eq!(ApiError(error).into_response().status(), status);
        }
    }

    #[test]
    fn analyze_response_flattens_analysis() {
        let response = AnalyzeResponse {
            identifier: "c-1".into(),
            analysis: Analysis {
                label: lexis_core::SentimentLabel::Positive,
                score: 1.8,
                raw_score: 1.0,
                word_stats: Default::default(),
                word_count: 1,
                interrogative: false,
            },
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["identifier"], "c-1");
        assert_eq!(json["label"], "positive");
        assert_eq!(json["score"], 1.8);
    }
}
