//! API tests driving the router against a temporary SQLite database

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use sentimeter_classifiers::{ClassificationResult, Classifier, KeywordHeuristic, SentimentAnalyzer};
use sentimeter_server::{build_app, AppState};
use sentimeter_store::{DatabaseConfig, FeedbackStore};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

/// Model stand-in that always fails inference
struct BrokenModel;

#[async_trait]
impl Classifier for BrokenModel {
    async fn classify(&self, _text: &str) -> sentimeter_core::Result<ClassificationResult> {
        Err(sentimeter_core::Error::classifier("tensor shape mismatch"))
    }

    fn name(&self) -> &str {
        "broken"
    }
}

/// Model stand-in returning a fixed score
struct FixedModel(f64);

#[async_trait]
impl Classifier for FixedModel {
    async fn classify(&self, _text: &str) -> sentimeter_core::Result<ClassificationResult> {
        Ok(ClassificationResult::from_score(self.0).with_model("fixed"))
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

struct TestApp {
    router: Router,
    store: FeedbackStore,
    _dir: TempDir,
}

async fn spawn_app(analyzer: SentimentAnalyzer) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("api.db").display());

    let store = FeedbackStore::connect(&DatabaseConfig::from_url(url)).await.unwrap();
    store.migrate().await.unwrap();

    let state = AppState::new(analyzer, store.clone());
    TestApp {
        router: build_app(state, "/api"),
        store,
        _dir: dir,
    }
}

async fn heuristic_app() -> TestApp {
    spawn_app(SentimentAnalyzer::heuristic(KeywordHeuristic::with_seed(42).unwrap())).await
}

async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn predict(router: &Router, text: &str) -> (StatusCode, Value) {
    send(router, Method::POST, "/api/predict", Some(json!({ "text": text }))).await
}

#[tokio::test]
async fn test_root_and_health() {
    let app = heuristic_app().await;

    let (status, body) = send(&app.router, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Welcome to Sentiment Analysis API!");

    let (status, body) = send(&app.router, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok", "classifier": "heuristic" }));
}

#[tokio::test]
async fn test_predict_positive_with_heuristic() {
    let app = heuristic_app().await;

    let (status, body) = predict(&app.router, "I love this product!").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sentiment"], "Positive");

    let score = body["score"].as_f64().unwrap();
    assert!((0.7..=1.0).contains(&score), "score {}", score);
}

#[tokio::test]
async fn test_failing_model_falls_back_per_request() {
    let fallback = KeywordHeuristic::with_seed(7).unwrap();
    let app = spawn_app(SentimentAnalyzer::model_backed(Box::new(BrokenModel), fallback)).await;

    let (_, health) = send(&app.router, Method::GET, "/health", None).await;
    assert_eq!(health["classifier"], "model");

    let (status, body) = predict(&app.router, "I love this product!").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sentiment"], "Positive");
    let score = body["score"].as_f64().unwrap();
    assert!((0.7..=1.0).contains(&score), "score {}", score);
}

#[tokio::test]
async fn test_model_score_boundary_is_negative() {
    let fallback = KeywordHeuristic::with_seed(7).unwrap();
    let app = spawn_app(SentimentAnalyzer::model_backed(Box::new(FixedModel(0.5)), fallback)).await;

    let (status, body) = predict(&app.router, "Meh").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "sentiment": "Negative", "score": 0.5 }));
}

#[tokio::test]
async fn test_predict_persists_and_round_trips() {
    let app = heuristic_app().await;

    let (_, predicted) = predict(&app.router, "This was a terrible experience").await;
    assert_eq!(predicted["sentiment"], "Negative");

    let (status, body) = send(&app.router, Method::GET, "/api/feedbacks/", None).await;
    assert_eq!(status, StatusCode::OK);

    let feedbacks = body["feedbacks"].as_array().unwrap();
    assert_eq!(feedbacks.len(), 1);
    let record = &feedbacks[0];
    assert!(record["id"].as_i64().unwrap() > 0);
    assert_eq!(record["text"], "This was a terrible experience");
    assert_eq!(record["sentiment"], predicted["sentiment"]);
    assert_eq!(record["score"], predicted["score"]);
    assert!(record["created_at"].as_str().is_some());

    let (status, filtered) =
        send(&app.router, Method::GET, "/api/feedbacks/filter/negative", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(filtered["sentiment"], "negative");
    assert_eq!(filtered["count"], 1);
    assert_eq!(filtered["feedbacks"][0], *record);

    let id = record["id"].as_i64().unwrap();
    let (status, single) =
        send(&app.router, Method::GET, &format!("/api/feedbacks/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(single, *record);
}

#[tokio::test]
async fn test_bare_collection_paths() {
    let app = heuristic_app().await;
    predict(&app.router, "great").await;

    let (status, body) = send(&app.router, Method::GET, "/api/feedbacks", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["feedbacks"].as_array().unwrap().len(), 1);

    let (status, body) = send(&app.router, Method::GET, "/api/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_feedbacks"], 1);
}

#[tokio::test]
async fn test_filter_is_case_insensitive_and_echoes_segment() {
    let app = heuristic_app().await;
    predict(&app.router, "What a wonderful day").await;

    let (status, body) =
        send(&app.router, Method::GET, "/api/feedbacks/filter/POSITIVE", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sentiment"], "POSITIVE");
    assert_eq!(body["count"], 1);
    assert_eq!(body["feedbacks"][0]["sentiment"], "Positive");
}

#[tokio::test]
async fn test_filter_rejects_unknown_sentiment() {
    let app = heuristic_app().await;

    let (status, body) =
        send(&app.router, Method::GET, "/api/feedbacks/filter/neutral", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Sentiment must be 'positive' or 'negative'");
}

#[tokio::test]
async fn test_delete_one_twice() {
    let app = heuristic_app().await;
    predict(&app.router, "awful service").await;

    let id = app.store.list_all().await.unwrap()[0].id;
    let uri = format!("/api/feedbacks/{}", id);

    let (status, body) = send(&app.router, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], format!("Feedback {} deleted successfully", id));

    let (status, body) = send(&app.router, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Feedback not found");

    let (status, _) = send(&app.router, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_all_resets_stats_and_filters() {
    let app = heuristic_app().await;
    predict(&app.router, "I love it").await;
    predict(&app.router, "I hate it").await;

    let (status, body) = send(&app.router, Method::GET, "/api/stats/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_feedbacks"], 2);
    assert_eq!(body["positive"], 1);
    assert_eq!(body["negative"], 1);
    assert_eq!(body["positive_percentage"], 50.0);
    assert_eq!(body["negative_percentage"], 50.0);

    let (status, body) = send(&app.router, Method::DELETE, "/api/feedbacks/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "All feedbacks deleted successfully");

    let (_, body) = send(&app.router, Method::GET, "/api/stats/", None).await;
    assert_eq!(
        body,
        json!({
            "total_feedbacks": 0,
            "positive": 0,
            "negative": 0,
            "positive_percentage": 0.0,
            "negative_percentage": 0.0
        })
    );

    let (status, body) =
        send(&app.router, Method::GET, "/api/feedbacks/filter/positive", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "sentiment": "positive", "count": 0, "feedbacks": [] })
    );
}

#[tokio::test]
async fn test_text_too_long_is_rejected() {
    let app = heuristic_app().await;

    let (status, body) = predict(&app.router, &"a".repeat(1001)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("1000"));
    assert!(app.store.list_all().await.unwrap().is_empty());

    let (status, _) = predict(&app.router, &"a".repeat(1000)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_malformed_predict_body() {
    let app = heuristic_app().await;

    let (status, body) =
        send(&app.router, Method::POST, "/api/predict", Some(json!({ "message": "hi" }))).await;
    assert!(status.is_client_error());
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_non_numeric_id_is_rejected() {
    let app = heuristic_app().await;

    let (status, body) = send(&app.router, Method::GET, "/api/feedbacks/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_storage_failure_still_returns_prediction() {
    let app = heuristic_app().await;
    app.store.close().await;

    let (status, body) = predict(&app.router, "I love this product!").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sentiment"], "Positive");

    let (status, body) = send(&app.router, Method::GET, "/api/feedbacks/", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "Internal server error");
}

#[tokio::test]
async fn test_metrics_disabled_without_recorder() {
    let app = heuristic_app().await;

    let (status, _) = send(&app.router, Method::GET, "/metrics", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_route() {
    let app = heuristic_app().await;

    let (status, body) = send(&app.router, Method::GET, "/api/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Not Found");
}
