use crate::models::{
    error::Error,
    table::{Series, Table},
};
use chrono::{DateTime, NaiveDateTime};
use serde_json::Value;

/// Builds the final table from the terminal objects a route extracted.
///
/// Each terminal object must carry a string `type` (the column name) and an
/// `attributes.values` list of `{datetime, value}` entries. Two terminal
/// objects producing the same column name fail the whole assembly rather
/// than silently overwriting one another.
pub fn assemble(terminals: &[&Value]) -> Result<Table, Error> {
    let mut series: Vec<Series> = Vec::with_capacity(terminals.len());
    for terminal in terminals {
        let extracted = extract_series(terminal)?;
        if series.iter().any(|s| s.name == extracted.name) {
            return Err(Error::DuplicateColumn(extracted.name));
        }
        series.push(extracted);
    }
    Ok(Table::from_series(series))
}

fn extract_series(terminal: &Value) -> Result<Series, Error> {
    let name = terminal
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::MalformedSeries("missing string 'type' field".to_string()))?;

    let values = terminal
        .get("attributes")
        .and_then(|a| a.get("values"))
        .and_then(Value::as_array)
        .ok_or_else(|| {
            Error::MalformedSeries(format!("series '{name}' has no 'attributes.values' list"))
        })?;

    let mut points = Vec::with_capacity(values.len());
    for entry in values {
        let datetime = entry
            .get("datetime")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                Error::MalformedSeries(format!("series '{name}' entry is missing 'datetime'"))
            })?;
        let value = entry.get("value").and_then(Value::as_f64).ok_or_else(|| {
            Error::MalformedSeries(format!("series '{name}' entry is missing numeric 'value'"))
        })?;
        points.push((parse_datetime(name, datetime)?, value));
    }

    Ok(Series {
        name: name.to_string(),
        points,
    })
}

/// REData reports local wall-clock timestamps with a fixed offset
/// (`2023-01-01T00:00:00.000+01:00`); the offset is dropped and the printed
/// wall time kept. Bare datetimes without an offset are accepted too.
fn parse_datetime(series: &str, raw: &str) -> Result<NaiveDateTime, Error> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.naive_local())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
        .map_err(|_| {
            Error::MalformedSeries(format!("series '{series}' has unparseable datetime '{raw}'"))
        })
}
