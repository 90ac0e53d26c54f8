use std::time::Duration;

use prometheus::{IntCounter, IntCounterVec, Opts, Registry};
use tokio::sync::Mutex;
use tracing::warn;
use url::Url;

use crate::client::DeviceClient;
use crate::decode::{decode_page, Observation, PageScheme};
use crate::metrics;
use crate::schemes;
use crate::tables::extract_tables;

/// Everything one poll produced. Consumed by the exposition layer and then
/// discarded; only the exporter's counters survive across polls.
#[derive(Debug, Default)]
pub struct PollResult {
    /// 1.0 once the poll ran, regardless of per-page failures.
    pub up: f64,
    pub observations: Vec<Observation>,
    /// Decode failure counts per source page, applied to the
    /// `parse_errors_total` counter by the caller.
    pub parse_failures: Vec<(&'static str, u64)>,
}

/// Polls the modem's pages and tracks process-lifetime counters.
pub struct Exporter {
    client: DeviceClient,
    pages: &'static [PageScheme],
    // The modem's single slow web server must not be hit concurrently, and
    // the counters below must not be updated concurrently either.
    poll_lock: Mutex<()>,
    registry: Registry,
    scrapes: IntCounter,
    parse_failures: IntCounterVec,
}

impl Exporter {
    pub fn new(scrape_uri: Url, timeout: Duration) -> anyhow::Result<Self> {
        let registry = Registry::new();

        let scrapes = IntCounter::with_opts(Opts::new(
            "tc4400_exporter_scrapes_total",
            "Current total TC4400 scrapes.",
        ))?;
        let parse_failures = IntCounterVec::new(
            Opts::new(
                "tc4400_exporter_parse_errors_total",
                "Number of errors while parsing HTML tables.",
            ),
            &["file"],
        )?;
        registry.register(Box::new(scrapes.clone()))?;
        registry.register(Box::new(parse_failures.clone()))?;

        let client = DeviceClient::new(scrape_uri, timeout, &registry)?;

        Ok(Self {
            client,
            pages: schemes::PAGES,
            poll_lock: Mutex::new(()),
            registry,
            scrapes,
            parse_failures,
        })
    }

    /// Fetch, extract and decode every known page sequentially. A page that
    /// fails transport or structure is skipped; its metrics are simply
    /// absent from the result. Concurrent polls are serialized.
    pub async fn poll(&self) -> PollResult {
        let _guard = self.poll_lock.lock().await;
        self.scrapes.inc();

        let mut result = PollResult::default();
        for page in self.pages {
            let body = match self.client.fetch(page.page).await {
                Ok(body) => body,
                Err(e) => {
                    warn!("{e}");
                    continue;
                }
            };

            let tables = extract_tables(&body);
            match decode_page(&tables, page) {
                Ok((observations, failures)) => {
                    result.observations.extend(observations);
                    if failures > 0 {
                        result.parse_failures.push((page.page, failures));
                    }
                }
                Err(e) => {
                    warn!("{e}");
                    result.parse_failures.push((page.page, 1));
                }
            }
        }

        for (page, count) in &result.parse_failures {
            self.parse_failures.with_label_values(&[*page]).inc_by(*count);
        }

        // The poll itself ran; per-page failures are reported separately.
        result.up = 1.0;
        result
    }

    /// Render one poll result plus the exporter's own counters.
    pub fn render(&self, result: &PollResult) -> Result<String, prometheus::Error> {
        metrics::render(&self.registry, result)
    }
}
