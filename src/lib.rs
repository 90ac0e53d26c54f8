//! Prometheus exporter for the Technicolor TC4400 cable modem.
//!
//! The modem exposes its diagnostics as plain HTML tables on its embedded
//! web server. Each scrape of the exporter fetches those pages, extracts
//! the tables, decodes selected cells into typed observations and renders
//! the result in Prometheus text format.
//!
//! Pipeline: fetch page → [`tables::extract_tables`] → [`decode`] with the
//! per-page rule sets in [`schemes`] → [`metrics::render`].

pub mod client;
pub mod decode;
pub mod error;
pub mod exporter;
pub mod metrics;
pub mod schemes;
pub mod tables;

pub use exporter::{Exporter, PollResult};
