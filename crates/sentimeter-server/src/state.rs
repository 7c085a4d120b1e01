use metrics_exporter_prometheus::PrometheusHandle;
use sentimeter_classifiers::SentimentAnalyzer;
use sentimeter_store::FeedbackStore;
use std::sync::Arc;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    /// Built once at startup, read-only afterwards
    pub analyzer: Arc<SentimentAnalyzer>,

    pub store: FeedbackStore,

    /// Prometheus handle for rendering `/metrics`; absent when no recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(analyzer: SentimentAnalyzer, store: FeedbackStore) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            store,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
