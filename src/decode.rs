use tracing::warn;

use crate::error::{CellError, StructuralError};
use crate::tables::Table;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Gauge,
}

/// Identity of one output metric. Label names are the variable labels in
/// exposition order: the row-key label first, then any categorical label.
#[derive(Debug, PartialEq, Eq)]
pub struct MetricDef {
    pub name: &'static str,
    pub help: &'static str,
    pub kind: MetricKind,
    pub labels: &'static [&'static str],
}

/// How one column's cell text becomes a number (or an extra label).
#[derive(Debug, Clone, Copy)]
pub enum DecodeRule {
    /// Base-10 integer, emitted as-is.
    Int,
    /// 1.0 if the cell equals the expected string, else 0.0. Never fails.
    StatusEquals(&'static str),
    /// The raw cell text becomes an extra label value; the numeric value is
    /// fixed at 1.0 (one observation per category value actually seen).
    Label,
    /// `"<integer> <unit>"`, scaled by the unit's multiplier. Unrecognized
    /// units fail the cell.
    UnitInt(&'static [(&'static str, u64)]),
    /// `"<float> <unit>"` where the unit must match exactly.
    UnitFloat(&'static str),
}

/// The primary label every observation from a row carries. If it cannot be
/// derived, the entire row is skipped: each emitted observation needs it.
#[derive(Debug, Clone, Copy)]
pub enum RowKey {
    /// Cell text used verbatim (interface names).
    Text(usize),
    /// Cell parsed as an integer and rendered zero-padded to two digits
    /// (channel indexes).
    PaddedInt(usize),
}

#[derive(Debug)]
pub struct Column {
    pub index: usize,
    pub rule: DecodeRule,
    pub metric: &'static MetricDef,
}

pub const fn col(index: usize, rule: DecodeRule, metric: &'static MetricDef) -> Column {
    Column { index, rule, metric }
}

/// Decode scheme for one table of a page, identified positionally.
#[derive(Debug)]
pub struct TableScheme {
    /// Index of the table within the page's extracted tables.
    pub table: usize,
    /// Leading header/sub-header rows to skip. A layout property of the
    /// firmware's pages, configurable per table rather than hard-coded.
    pub skip_rows: usize,
    /// Exact cell count a data row must have; other widths are skipped.
    pub row_width: usize,
    pub key: RowKey,
    pub columns: &'static [Column],
}

/// All table schemes for one page.
#[derive(Debug)]
pub struct PageScheme {
    pub page: &'static str,
    pub tables: &'static [TableScheme],
}

/// One decoded (metric, label values, value) triple, ready for exposition.
/// Produced and consumed within a single poll.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub metric: &'static MetricDef,
    pub labels: Vec<String>,
    pub value: f64,
}

/// Decode every table the scheme covers. Returns the observations and the
/// number of cell/row-key decode failures. Fails only structurally, when an
/// expected table is absent or has fewer rows than its header block.
pub fn decode_page(
    tables: &[Table],
    scheme: &PageScheme,
) -> Result<(Vec<Observation>, u64), StructuralError> {
    for ts in scheme.tables {
        match tables.get(ts.table) {
            Some(t) if t.len() >= ts.skip_rows => {}
            _ => {
                return Err(StructuralError {
                    page: scheme.page,
                    table: ts.table,
                })
            }
        }
    }

    let mut observations = Vec::new();
    let mut failures = 0;
    for ts in scheme.tables {
        let (obs, f) = decode_table(&tables[ts.table], ts);
        observations.extend(obs);
        failures += f;
    }
    Ok((observations, failures))
}

/// Apply one table scheme row by row. Decode failures are never fatal:
/// a bad row key drops the row, a bad cell drops that observation.
pub fn decode_table(table: &Table, scheme: &TableScheme) -> (Vec<Observation>, u64) {
    let mut observations = Vec::new();
    let mut failures = 0u64;

    for row in table.iter().skip(scheme.skip_rows) {
        if row.len() != scheme.row_width {
            continue;
        }

        let key = match row_key(scheme.key, row) {
            Ok(key) => key,
            Err(e) => {
                warn!("row key: {e}");
                failures += 1;
                continue;
            }
        };

        for column in scheme.columns {
            match decode_cell(column.rule, &row[column.index]) {
                Ok((value, extra_label)) => {
                    let mut labels = vec![key.clone()];
                    labels.extend(extra_label);
                    observations.push(Observation {
                        metric: column.metric,
                        labels,
                        value,
                    });
                }
                Err(e) => {
                    warn!("{} (column {}): {e}", column.metric.name, column.index);
                    failures += 1;
                }
            }
        }
    }

    (observations, failures)
}

fn row_key(key: RowKey, row: &[String]) -> Result<String, CellError> {
    match key {
        RowKey::Text(i) => Ok(row[i].clone()),
        RowKey::PaddedInt(i) => {
            let n: i64 = row[i].parse().map_err(|_| CellError::Int(row[i].clone()))?;
            Ok(format!("{n:02}"))
        }
    }
}

fn decode_cell(rule: DecodeRule, cell: &str) -> Result<(f64, Option<String>), CellError> {
    match rule {
        DecodeRule::Int => {
            let n: i64 = cell.parse().map_err(|_| CellError::Int(cell.to_string()))?;
            Ok((n as f64, None))
        }
        DecodeRule::StatusEquals(expected) => {
            Ok((if cell == expected { 1.0 } else { 0.0 }, None))
        }
        DecodeRule::Label => Ok((1.0, Some(cell.to_string()))),
        DecodeRule::UnitInt(units) => {
            let (value, unit) = split_unit(cell)?;
            let n: i64 = value.parse().map_err(|_| CellError::Int(value.to_string()))?;
            let multiplier = units
                .iter()
                .find(|(u, _)| *u == unit)
                .map(|(_, m)| *m)
                .ok_or_else(|| CellError::Unit(unit.to_string()))?;
            Ok(((n * multiplier as i64) as f64, None))
        }
        DecodeRule::UnitFloat(expected) => {
            let (value, unit) = split_unit(cell)?;
            if unit != expected {
                return Err(CellError::Unit(unit.to_string()));
            }
            let v: f64 = value.parse().map_err(|_| CellError::Float(value.to_string()))?;
            Ok((v, None))
        }
    }
}

/// Split `"<value> <unit>"` on the single space; any other shape fails.
fn split_unit(cell: &str) -> Result<(&str, &str), CellError> {
    let mut parts = cell.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(value), Some(unit), None) => Ok((value, unit)),
        _ => Err(CellError::Tokens(cell.to_string())),
    }
}

// ── Tests ──
