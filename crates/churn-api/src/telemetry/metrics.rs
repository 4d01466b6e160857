//! Prometheus metrics for the prediction server
//!
//! - `prediction_value` (histogram) - distribution of predicted probabilities
//! - `<target>_prediction_count` (counter) - predictions by decided class,
//!   labelled `<target>_status`
//! - `http_requests_total` (counter) - requests by method, route and status
//! - `http_request_duration_seconds` (histogram) - request latency by route
//!
//! # Example
//!
//! ```rust,no_run
//! use churn_api::telemetry::MetricsRegistry;
//! use churn_core::{PredictionResult, Profile};
//!
//! let registry = MetricsRegistry::new(Profile::Churn).unwrap();
//! registry.prediction().observe(&PredictionResult::from_probability(0.72));
//!
//! let text = registry.encode_text().unwrap();
//! assert!(text.contains("churn_prediction_count"));
//! ```

use churn_core::{PredictionResult, Profile};
use prometheus::{CounterVec, Histogram, HistogramOpts, HistogramVec, Opts, Registry};

use super::{Result, TelemetryError};

/// Buckets of the probability histogram
pub const PREDICTION_BUCKETS: [f64; 9] = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9];

/// Metrics recorded for every successful prediction
pub struct PredictionMetrics {
    /// Observed probabilities
    value: Histogram,

    /// Predictions by decided class
    count: CounterVec,

    positive_label: String,
    negative_label: String,
}

impl PredictionMetrics {
    /// Create the prediction metrics for a profile and register them
    pub fn new(registry: &Registry, profile: Profile) -> Result<Self> {
        let target = profile.target();

        let value = Histogram::with_opts(
            HistogramOpts::new("prediction_value", "Predicted probability of the positive class")
                .buckets(PREDICTION_BUCKETS.to_vec()),
        )?;

        let status_label = format!("{}_status", target);
        let count = CounterVec::new(
            Opts::new(
                format!("{}_prediction_count", target),
                format!("Number of {} predictions by decided class", target),
            ),
            &[status_label.as_str()],
        )?;

        registry.register(Box::new(value.clone()))?;
        registry.register(Box::new(count.clone()))?;

        Ok(Self {
            value,
            count,
            positive_label: target.to_string(),
            negative_label: format!("no_{}", target),
        })
    }

    fn label(&self, decision: bool) -> &str {
        if decision {
            &self.positive_label
        } else {
            &self.negative_label
        }
    }

    /// Record one prediction
    pub fn observe(&self, result: &PredictionResult) {
        self.value.observe(result.probability);
        self.count
            .with_label_values(&[self.label(result.decision)])
            .inc();
    }

    /// Number of predictions that decided the given class
    pub fn count(&self, decision: bool) -> u64 {
        self.count
            .with_label_values(&[self.label(decision)])
            .get() as u64
    }

    /// Number of observed probabilities
    pub fn observations(&self) -> u64 {
        self.value.get_sample_count()
    }
}

/// Metrics recorded for every HTTP request
pub struct HttpMetrics {
    requests_total: CounterVec,
    duration_seconds: HistogramVec,
}

impl HttpMetrics {
    pub fn new(registry: &Registry) -> Result<Self> {
        let requests_total = CounterVec::new(
            Opts::new("http_requests_total", "Total number of HTTP requests"),
            &["method", "handler", "status"],
        )?;

        let duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request duration in seconds",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),
            &["method", "handler"],
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(duration_seconds.clone()))?;

        Ok(Self {
            requests_total,
            duration_seconds,
        })
    }

    /// Record a finished request
    pub fn record_request(&self, method: &str, handler: &str, status: u16, duration_secs: f64) {
        self.requests_total
            .with_label_values(&[method, handler, &status.to_string()])
            .inc();
        self.duration_seconds
            .with_label_values(&[method, handler])
            .observe(duration_secs);
    }

    pub fn requests(&self, method: &str, handler: &str, status: u16) -> u64 {
        self.requests_total
            .with_label_values(&[method, handler, &status.to_string()])
            .get() as u64
    }
}

/// Registry holding every metric of the server
pub struct MetricsRegistry {
    registry: Registry,
    prediction: PredictionMetrics,
    http: HttpMetrics,
}

impl MetricsRegistry {
    /// Create a registry for the given profile
    pub fn new(profile: Profile) -> Result<Self> {
        let registry = Registry::new();
        let prediction = PredictionMetrics::new(&registry, profile)?;
        let http = HttpMetrics::new(&registry)?;

        #[cfg(target_os = "linux")]
        registry.register(Box::new(
            prometheus::process_collector::ProcessCollector::for_self(),
        ))?;

        Ok(Self {
            registry,
            prediction,
            http,
        })
    }

    pub fn prediction(&self) -> &PredictionMetrics {
        &self.prediction
    }

    pub fn http(&self) -> &HttpMetrics {
        &self.http
    }

    /// Gather all metrics in Prometheus format
    pub fn gather(&self) -> Vec<prometheus::proto::MetricFamily> {
        self.registry.gather()
    }

    /// Encode metrics as text for scraping
    pub fn encode_text(&self) -> Result<String> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|e| TelemetryError::EncodingFailed(e.to_string()))?;
        String::from_utf8(buffer).map_err(|e| TelemetryError::EncodingFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observe_increments_one_class() {
        let registry = MetricsRegistry::new(Profile::Churn).unwrap();
        let metrics = registry.prediction();

        metrics.observe(&PredictionResult::from_probability(0.8));
        metrics.observe(&PredictionResult::from_probability(0.5));
        metrics.observe(&PredictionResult::from_probability(0.1));

        assert_eq!(metrics.count(true), 2);
        assert_eq!(metrics.count(false), 1);
        assert_eq!(metrics.observations(), 3);
    }

    #[test]
    fn test_churn_exposition_names() {
        let registry = MetricsRegistry::new(Profile::Churn).unwrap();
        registry
            .prediction()
            .observe(&PredictionResult::from_probability(0.3));

        let text = registry.encode_text().unwrap();
        assert!(text.contains("churn_prediction_count{churn_status=\"no_churn\"} 1"));
        assert!(text.contains("prediction_value_bucket{le=\"0.3\"} 1"));
        assert!(text.contains("prediction_value_bucket{le=\"0.2\"} 0"));
        assert!(text.contains("prediction_value_count 1"));
    }

    #[test]
    fn test_lead_exposition_names() {
        let registry = MetricsRegistry::new(Profile::Lead).unwrap();
        registry
            .prediction()
            .observe(&PredictionResult::from_probability(0.9));

        let text = registry.encode_text().unwrap();
        assert!(text.contains("lead_prediction_count{lead_status=\"lead\"} 1"));
    }

    #[test]
    fn test_http_metrics() {
        let registry = MetricsRegistry::new(Profile::Churn).unwrap();
        registry.http().record_request("POST", "/predict", 200, 0.002);
        registry.http().record_request("POST", "/predict", 422, 0.001);
        registry.http().record_request("POST", "/predict", 200, 0.003);

        assert_eq!(registry.http().requests("POST", "/predict", 200), 2);
        let text = registry.encode_text().unwrap();
        assert!(text.contains("http_request_duration_seconds"));
        assert!(text.contains("status=\"422\""));
    }

    #[test]
    fn test_registries_are_independent() {
        let a = MetricsRegistry::new(Profile::Churn).unwrap();
        let b = MetricsRegistry::new(Profile::Churn).unwrap();
        a.prediction()
            .observe(&PredictionResult::from_probability(0.6));
        assert_eq!(b.prediction().observations(), 0);
    }

    #[test]
    fn test_concurrent_observations_are_not_lost() {
        let registry = MetricsRegistry::new(Profile::Churn).unwrap();
        let metrics = registry.prediction();

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for i in 0..1000 {
                        let probability = if i % 2 == 0 { 0.8 } else { 0.2 };
                        metrics.observe(&PredictionResult::from_probability(probability));
                    }
                });
            }
        });

        assert_eq!(metrics.observations(), 8000);
        assert_eq!(metrics.count(true), 4000);
        assert_eq!(metrics.count(true) + metrics.count(false), 8000);
    }
}
