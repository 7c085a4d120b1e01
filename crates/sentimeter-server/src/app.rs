use crate::routes;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

/// Largest accepted request body
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Build the Axum application with the API mounted under `api_prefix`
pub fn build_app(state: AppState, api_prefix: &str) -> Router {
    // The browser frontend is served from a different origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Collection routes answer with and without the trailing slash
    let api_routes = Router::new()
        .route("/predict", post(routes::predict))
        .route("/predict/", post(routes::predict))
        .route(
            "/feedbacks",
            get(routes::list_feedbacks).delete(routes::delete_all_feedbacks),
        )
        .route(
            "/feedbacks/",
            get(routes::list_feedbacks).delete(routes::delete_all_feedbacks),
        )
        .route(
            "/feedbacks/:id",
            get(routes::get_feedback).delete(routes::delete_feedback),
        )
        .route(
            "/feedbacks/filter/:sentiment",
            get(routes::filter_feedbacks),
        )
        .route("/stats", get(routes::get_stats))
        .route("/stats/", get(routes::get_stats));

    let prefix = api_prefix.trim_matches('/');
    let router = Router::new()
        .route("/", get(routes::root))
        .route("/health", get(routes::health))
        .route("/metrics", get(routes::metrics));

    // Nesting at the root is not allowed
    let router = if prefix.is_empty() {
        router.merge(api_routes)
    } else {
        router.nest(&format!("/{}", prefix), api_routes)
    };

    router
        .fallback(routes::fallback)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
