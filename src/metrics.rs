use std::collections::hash_map::Entry;
use std::collections::HashMap;

use prometheus::{CounterVec, Encoder, Gauge, GaugeVec, Opts, Registry, TextEncoder};

use crate::decode::MetricKind;
use crate::exporter::PollResult;

/// Render one poll's observations plus the exporter's own counters as
/// Prometheus text. Device metrics live in a registry built fresh per poll,
/// so stale channels and interfaces disappear on the next scrape.
pub fn render(self_registry: &Registry, result: &PollResult) -> Result<String, prometheus::Error> {
    let device = Registry::new();

    let up = Gauge::new("tc4400_up", "Whether the last poll of the TC4400 ran.")?;
    up.set(result.up);
    device.register(Box::new(up))?;

    let mut gauges: HashMap<&'static str, GaugeVec> = HashMap::new();
    let mut counters: HashMap<&'static str, CounterVec> = HashMap::new();

    for obs in &result.observations {
        let labels: Vec<&str> = obs.labels.iter().map(String::as_str).collect();
        let opts = Opts::new(obs.metric.name, obs.metric.help);
        match obs.metric.kind {
            MetricKind::Gauge => {
                let vec = match gauges.entry(obs.metric.name) {
                    Entry::Occupied(e) => e.into_mut(),
                    Entry::Vacant(e) => {
                        let vec = GaugeVec::new(opts, obs.metric.labels)?;
                        device.register(Box::new(vec.clone()))?;
                        e.insert(vec)
                    }
                };
                vec.with_label_values(&labels).set(obs.value);
            }
            MetricKind::Counter => {
                let vec = match counters.entry(obs.metric.name) {
                    Entry::Occupied(e) => e.into_mut(),
                    Entry::Vacant(e) => {
                        let vec = CounterVec::new(opts, obs.metric.labels)?;
                        device.register(Box::new(vec.clone()))?;
                        e.insert(vec)
                    }
                };
                // Fresh registry each poll, so the counter starts at zero
                // and one inc_by sets the sampled value.
                vec.with_label_values(&labels).inc_by(obs.value);
            }
        }
    }

    let mut families = self_registry.gather();
    families.extend(device.gather());
    families.sort_by(|a, b| a.get_name().cmp(b.get_name()));

    let mut buf = Vec::new();
    TextEncoder::new().encode(&families, &mut buf)?;
    String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

// ── Tests ──
