//! Decode schemes for the modem's diagnostic pages.
//!
//! Everything here is plain data handed to the decode engine: which pages
//! to fetch, which tables on them matter, and how each column turns into a
//! metric. Table indexes, row widths and the two skipped header rows match
//! the TC4400 firmware's page layout.

use crate::decode::{
    col, Column, DecodeRule::*, MetricDef, MetricKind::*, PageScheme, RowKey, TableScheme,
};

const FREQUENCY_UNITS: &[(&str, u64)] = &[("Hz", 1), ("kHz", 1000)];

const INTERFACE: &[&str] = &["interface"];
const CHANNEL: &[&str] = &["channel"];
const CHANNEL_TYPE: &[&str] = &["channel", "type"];
const CHANNEL_MODULATION: &[&str] = &["channel", "modulation"];

const fn counter(name: &'static str, help: &'static str, labels: &'static [&'static str]) -> MetricDef {
    MetricDef { name, help, kind: Counter, labels }
}

const fn gauge(name: &'static str, help: &'static str, labels: &'static [&'static str]) -> MetricDef {
    MetricDef { name, help, kind: Gauge, labels }
}

// ── statsifc.html: per-interface packet counters ──

static RECEIVE_BYTES: MetricDef = counter("tc4400_network_receive_bytes_total", "Bytes received on the interface.", INTERFACE);
static RECEIVE_PACKETS: MetricDef = counter("tc4400_network_receive_packets_total", "Packets received on the interface.", INTERFACE);
static RECEIVE_ERRS: MetricDef = counter("tc4400_network_receive_errs_total", "Receive errors on the interface.", INTERFACE);
static RECEIVE_DROP: MetricDef = counter("tc4400_network_receive_drop_total", "Received packets dropped on the interface.", INTERFACE);
static TRANSMIT_BYTES: MetricDef = counter("tc4400_network_transmit_bytes_total", "Bytes transmitted on the interface.", INTERFACE);
static TRANSMIT_PACKETS: MetricDef = counter("tc4400_network_transmit_packets_total", "Packets transmitted on the interface.", INTERFACE);
static TRANSMIT_ERRS: MetricDef = counter("tc4400_network_transmit_errs_total", "Transmit errors on the interface.", INTERFACE);
static TRANSMIT_DROP: MetricDef = counter("tc4400_network_transmit_drop_total", "Transmitted packets dropped on the interface.", INTERFACE);

// ── cmconnectionstatus.html: downstream channels ──

static DOWNSTREAM_LOCKED: MetricDef = gauge("tc4400_downstream_locked", "Downstream lock status.", CHANNEL);
static DOWNSTREAM_CHANNEL_TYPE: MetricDef = gauge("tc4400_downstream_channel_type", "Downstream channel type.", CHANNEL_TYPE);
static DOWNSTREAM_BONDED: MetricDef = gauge("tc4400_downstream_bonded", "Downstream bonding status.", CHANNEL);
static DOWNSTREAM_FREQUENCY: MetricDef = gauge("tc4400_downstream_center_frequency_hz", "Downstream center frequency.", CHANNEL);
static DOWNSTREAM_WIDTH: MetricDef = gauge("tc4400_downstream_width_hz", "Downstream channel width.", CHANNEL);
static DOWNSTREAM_SNR: MetricDef = gauge("tc4400_downstream_snr_threshold_db", "Downstream SNR/MER threshold value.", CHANNEL);
static DOWNSTREAM_LEVEL: MetricDef = gauge("tc4400_downstream_receive_level_dbmv", "Downstream receive level.", CHANNEL);
static DOWNSTREAM_MODULATION: MetricDef = gauge("tc4400_downstream_modulation", "Downstream modulation/profile ID.", CHANNEL_MODULATION);
static CODEWORDS_UNERRORED: MetricDef = counter("tc4400_downstream_codewords_unerrored_total", "Downstream unerrored codewords.", CHANNEL);
static CODEWORDS_CORRECTED: MetricDef = counter("tc4400_downstream_codewords_corrected_total", "Downstream corrected codewords.", CHANNEL);
static CODEWORDS_UNCORRECTABLE: MetricDef = counter("tc4400_downstream_codewords_uncorrectable_total", "Downstream uncorrectable codewords.", CHANNEL);

// ── cmconnectionstatus.html: upstream channels ──

static UPSTREAM_LOCKED: MetricDef = gauge("tc4400_upstream_locked", "Upstream lock status.", CHANNEL);
static UPSTREAM_CHANNEL_TYPE: MetricDef = gauge("tc4400_upstream_channel_type", "Upstream channel type.", CHANNEL_TYPE);
static UPSTREAM_BONDED: MetricDef = gauge("tc4400_upstream_bonded", "Upstream bonding status.", CHANNEL);
static UPSTREAM_FREQUENCY: MetricDef = gauge("tc4400_upstream_center_frequency_hz", "Upstream center frequency.", CHANNEL);
static UPSTREAM_WIDTH: MetricDef = gauge("tc4400_upstream_width_hz", "Upstream channel width.", CHANNEL);
static UPSTREAM_LEVEL: MetricDef = gauge("tc4400_upstream_transmit_level_dbmv", "Upstream transmit level.", CHANNEL);
static UPSTREAM_MODULATION: MetricDef = gauge("tc4400_upstream_modulation", "Upstream modulation/profile ID.", CHANNEL_MODULATION);

static NETWORK_COLUMNS: &[Column] = &[
    col(1, Int, &RECEIVE_BYTES),
    col(2, Int, &RECEIVE_PACKETS),
    col(3, Int, &RECEIVE_ERRS),
    col(4, Int, &RECEIVE_DROP),
    col(5, Int, &TRANSMIT_BYTES),
    col(6, Int, &TRANSMIT_PACKETS),
    col(7, Int, &TRANSMIT_ERRS),
    col(8, Int, &TRANSMIT_DROP),
];

static DOWNSTREAM_COLUMNS: &[Column] = &[
    col(2, StatusEquals("Locked"), &DOWNSTREAM_LOCKED),
    col(3, Label, &DOWNSTREAM_CHANNEL_TYPE),
    col(4, StatusEquals("Bonded"), &DOWNSTREAM_BONDED),
    col(5, UnitInt(FREQUENCY_UNITS), &DOWNSTREAM_FREQUENCY),
    col(6, UnitInt(FREQUENCY_UNITS), &DOWNSTREAM_WIDTH),
    col(7, UnitFloat("dB"), &DOWNSTREAM_SNR),
    col(8, UnitFloat("dBmV"), &DOWNSTREAM_LEVEL),
    col(9, Label, &DOWNSTREAM_MODULATION),
    col(10, Int, &CODEWORDS_UNERRORED),
    col(11, Int, &CODEWORDS_CORRECTED),
    col(12, Int, &CODEWORDS_UNCORRECTABLE),
];

static UPSTREAM_COLUMNS: &[Column] = &[
    col(2, StatusEquals("Locked"), &UPSTREAM_LOCKED),
    col(3, Label, &UPSTREAM_CHANNEL_TYPE),
    col(4, StatusEquals("Bonded"), &UPSTREAM_BONDED),
    col(5, UnitInt(FREQUENCY_UNITS), &UPSTREAM_FREQUENCY),
    col(6, UnitInt(FREQUENCY_UNITS), &UPSTREAM_WIDTH),
    col(7, UnitFloat("dBmV"), &UPSTREAM_LEVEL),
    col(8, Label, &UPSTREAM_MODULATION),
];

/// The pages polled on every scrape, in fetch order.
pub static PAGES: &[PageScheme] = &[
    PageScheme {
        page: "statsifc.html",
        tables: &[TableScheme {
            table: 0,
            skip_rows: 2,
            row_width: 9,
            key: RowKey::Text(0),
            columns: NETWORK_COLUMNS,
        }],
    },
    PageScheme {
        page: "cmconnectionstatus.html",
        tables: &[
            // Table 0 is the startup-procedure summary; not decoded.
            TableScheme {
                table: 1,
                skip_rows: 2,
                row_width: 13,
                key: RowKey::PaddedInt(1),
                columns: DOWNSTREAM_COLUMNS,
            },
            TableScheme {
                table: 2,
                skip_rows: 2,
                row_width: 9,
                key: RowKey::PaddedInt(1),
                columns: UPSTREAM_COLUMNS,
            },
        ],
    },
];

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{decode_table, Observation};

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn find<'a>(obs: &'a [Observation], name: &str) -> &'a Observation {
        obs.iter()
            .find(|o| o.metric.name == name)
            .unwrap_or_else(|| panic!("missing observation {name}"))
    }

    #[test]
    fn downstream_sample_row() {
        let table = vec![
            row(&["Downstream Channels"]),
            row(&["Index", "ID", "Lock", "Type", "Bonded", "Freq", "Width", "SNR", "Level", "Mod", "Unerr", "Corr", "Uncorr"]),
            row(&["", "1", "Locked", "QAM256", "Bonded", "603000000 Hz", "6400000 Hz", "35 dB", "3.5 dBmV", "256QAM", "100", "2", "0"]),
        ];
        let (obs, failures) = decode_table(&table, &PAGES[1].tables[0]);
        assert_eq!(failures, 0);
        assert_eq!(obs.len(), 11);

        let locked = find(&obs, "tc4400_downstream_locked");
        assert_eq!(locked.value, 1.0);
        assert_eq!(locked.labels, ["01"]);
        let bonded = find(&obs, "tc4400_downstream_bonded");
        assert_eq!(bonded.value, 1.0);
        assert_eq!(find(&obs, "tc4400_downstream_channel_type").labels, ["01", "QAM256"]);
        assert_eq!(find(&obs, "tc4400_downstream_center_frequency_hz").value, 603_000_000.0);
        assert_eq!(find(&obs, "tc4400_downstream_width_hz").value, 6_400_000.0);
        assert_eq!(find(&obs, "tc4400_downstream_snr_threshold_db").value, 35.0);
        assert_eq!(find(&obs, "tc4400_downstream_receive_level_dbmv").value, 3.5);
        assert_eq!(find(&obs, "tc4400_downstream_modulation").labels, ["01", "256QAM"]);
        assert_eq!(find(&obs, "tc4400_downstream_codewords_unerrored_total").value, 100.0);
        assert_eq!(find(&obs, "tc4400_downstream_codewords_corrected_total").value, 2.0);
        assert_eq!(find(&obs, "tc4400_downstream_codewords_uncorrectable_total").value, 0.0);
    }

    #[test]
    fn upstream_row_with_khz_width() {
        let table = vec![
            row(&["Upstream Channels"]),
            row(&["Index", "ID", "Lock", "Type", "Bonded", "Freq", "Width", "Level", "Mod"]),
            row(&["", "4", "Locked", "SC-QAM", "Bonded", "36500000 Hz", "6400 kHz", "41.3 dBmV", "64QAM"]),
        ];
        let (obs, failures) = decode_table(&table, &PAGES[1].tables[1]);
        assert_eq!(failures, 0);
        assert_eq!(obs.len(), 7);
        assert_eq!(find(&obs, "tc4400_upstream_width_hz").value, 6_400_000.0);
        assert_eq!(find(&obs, "tc4400_upstream_transmit_level_dbmv").value, 41.3);
        assert_eq!(find(&obs, "tc4400_upstream_locked").labels, ["04"]);
    }

    #[test]
    fn network_row_keyed_by_interface_name() {
        let table = vec![
            row(&["Interface Statistics"]),
            row(&["Name", "RxB", "RxP", "RxE", "RxD", "TxB", "TxP", "TxE", "TxD"]),
            row(&["erouter0", "1", "2", "3", "4", "5", "6", "7", "8"]),
        ];
        let (obs, failures) = decode_table(&table, &PAGES[0].tables[0]);
        assert_eq!(failures, 0);
        assert_eq!(obs.len(), 8);
        assert!(obs.iter().all(|o| o.labels == ["erouter0"]));
        assert_eq!(find(&obs, "tc4400_network_transmit_drop_total").value, 8.0);
    }
}
