//! HTTP routes and handlers

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::state::AppState;
use sentimeter_core::{FeedbackRecord, Prediction, Sentiment, MAX_TEXT_CHARS};
use sentimeter_store::{stats, FeedbackStats};

/// Prediction request body
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FeedbackList {
    pub feedbacks: Vec<FeedbackRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilteredFeedback {
    /// The path segment exactly as requested
    pub sentiment: String,
    pub count: usize,
    pub feedbacks: Vec<FeedbackRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub classifier: String,
}

pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new("Welcome to Sentiment Analysis API!"))
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        classifier: state.analyzer.mode().to_string(),
    })
}

pub async fn metrics(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let handle = state
        .metrics
        .as_ref()
        .ok_or_else(|| AppError::NotFound("Metrics are not enabled".to_string()))?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        handle.render(),
    ))
}

/// Classify a text and persist the result
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<Prediction>, AppError> {
    let Json(req) = payload?;

    let chars = req.text.chars().count();
    if chars > MAX_TEXT_CHARS {
        return Err(AppError::Validation(format!(
            "Text must be at most {} characters",
            MAX_TEXT_CHARS
        )));
    }

    let prediction = state.analyzer.predict(&req.text).await;
    debug!(chars, sentiment = %prediction.sentiment, score = prediction.score, "Predicted");

    // The prediction is returned even when it could not be stored.
    if let Err(e) = state
        .store
        .create(&req.text, prediction.sentiment, prediction.score)
        .await
    {
        warn!("Returning unsaved prediction: {}", e);
    }

    Ok(Json(prediction))
}

pub async fn list_feedbacks(State(state): State<AppState>) -> Result<Json<FeedbackList>, AppError> {
    let feedbacks = state.store.list_all().await?;
    Ok(Json(FeedbackList { feedbacks }))
}

pub async fn get_feedback(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<FeedbackRecord>, AppError> {
    let Path(id) = id?;

    state
        .store
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Feedback not found".to_string()))
}

pub async fn filter_feedbacks(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<FilteredFeedback>, AppError> {
    let sentiment: Sentiment = raw.parse()?;
    let feedbacks = state.store.list_by_sentiment(sentiment).await?;

    Ok(Json(FilteredFeedback {
        sentiment: raw,
        count: feedbacks.len(),
        feedbacks,
    }))
}

pub async fn delete_feedback(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Path(id) = id?;

    if !state.store.delete_by_id(id).await? {
        return Err(AppError::NotFound("Feedback not found".to_string()));
    }

    info!(id, "Deleted feedback");
    Ok(Json(MessageResponse::new(format!(
        "Feedback {} deleted successfully",
        id
    ))))
}

pub async fn delete_all_feedbacks(
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, AppError> {
    state.store.delete_all().await?;
    Ok(Json(MessageResponse::new("All feedbacks deleted successfully")))
}

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<FeedbackStats>, AppError> {
    let stats = stats::compute(&state.store).await?;
    Ok(Json(stats))
}

pub async fn fallback() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "detail": "Not Found" })),
    )
}
