use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,

    // Counters
    pub payments_prepared_total: IntCounterVec,
    pub payments_rejected_total: IntCounterVec,

    // Histograms
    pub http_request_duration_seconds: HistogramVec,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let payments_prepared_total = IntCounterVec::new(
            Opts::new(
                "checkout_payments_prepared_total",
                "Payment contexts prepared",
            ),
            &["protocol"], // simple_form|signed_redirect
        )
        .expect("metric");

        let payments_rejected_total = IntCounterVec::new(
            Opts::new(
                "checkout_payments_rejected_total",
                "Checkout requests rejected",
            ),
            &["reason"], // unconfigured|invalid_amount|validation
        )
        .expect("metric");

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new("http_request_duration_seconds", "HTTP request duration seconds"),
            &["path", "method", "status"],
        )
        .expect("metric");

        registry
            .register(Box::new(payments_prepared_total.clone()))
            .unwrap();
        registry
            .register(Box::new(payments_rejected_total.clone()))
            .unwrap();
        registry
            .register(Box::new(http_request_duration_seconds.clone()))
            .unwrap();

        Self {
            registry,
            payments_prepared_total,
            payments_rejected_total,
            http_request_duration_seconds,
        }
    }

    pub fn render(&self) -> Result<String, String> {
        let encoder = TextEncoder::new();
        let mf = self.registry.gather();
        let mut buf = Vec::new();
        encoder.encode(&mf, &mut buf).map_err(|e| e.to_string())?;
        String::from_utf8(buf).map_err(|e| e.to_string())
    }
}
