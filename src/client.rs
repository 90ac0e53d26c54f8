use std::time::{Duration, Instant};

use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry};
use url::Url;

use crate::error::FetchError;

/// HTTP client for the modem's embedded web server. Every request is
/// counted and timed, labeled by outcome code and method.
pub struct DeviceClient {
    base: Url,
    http: reqwest::Client,
    requests: IntCounterVec,
    duration: HistogramVec,
}

impl DeviceClient {
    pub fn new(base: Url, timeout: Duration, registry: &Registry) -> anyhow::Result<Self> {
        let requests = IntCounterVec::new(
            Opts::new("tc4400_exporter_client_requests_total", "HTTP requests to the TC4400."),
            &["code", "method"],
        )?;
        let duration = HistogramVec::new(
            HistogramOpts::new(
                "tc4400_exporter_client_request_duration_seconds",
                "Histogram of TC4400 HTTP request latencies.",
            ),
            &["code", "method"],
        )?;
        registry.register(Box::new(requests.clone()))?;
        registry.register(Box::new(duration.clone()))?;

        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { base, http, requests, duration })
    }

    /// GET one page relative to the base URL and return its body. Basic
    /// auth credentials embedded in the base URL are applied per request.
    pub async fn fetch(&self, page: &str) -> Result<String, FetchError> {
        let url = self.base.join(page)?;
        let mut request = self.http.get(url.clone());
        if !url.username().is_empty() {
            request = request.basic_auth(url.username(), url.password());
        }

        let start = Instant::now();
        let response = request.send().await;
        let elapsed = start.elapsed().as_secs_f64();

        let code = match &response {
            Ok(r) => r.status().as_str().to_string(),
            Err(_) => "error".to_string(),
        };
        self.requests.with_label_values(&[code.as_str(), "get"]).inc();
        self.duration
            .with_label_values(&[code.as_str(), "get"])
            .observe(elapsed);

        let response = response?;
        if !response.status().is_success() {
            return Err(FetchError::Status {
                page: page.to_string(),
                status: response.status(),
            });
        }
        Ok(response.text().await?)
    }
}
