use serde_json::Value;
use std::io;

use super::{flatten, scalar_text};

type StdoutWriter<'a> = csv::Writer<io::StdoutLock<'a>>;

/// Write output as CSV to stdout.
///
/// Savings timelines become one row per month, schedules one row per
/// period, anything else a two-column field/value listing.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value.get("result");
    if let Some(timelines) = result.and_then(|r| r.get("timelines")) {
        write_timelines_csv(&mut wtr, timelines);
    } else if let Some(Value::Array(rows)) = value.get("results") {
        write_array_csv(&mut wtr, rows);
    } else {
        let mut rows = Vec::new();
        flatten("", result.unwrap_or(value), &mut rows);
        let _ = wtr.write_record(["field", "value"]);
        for (key, val) in rows {
            let _ = wtr.write_record([key, val]);
        }
    }

    if let Err(e) = wtr.flush() {
        tracing::error!(error = %e, "failed to flush CSV output");
    }
}

const TIMELINE_COLUMNS: [&str; 3] = ["refinance_now", "wait_then_refinance", "double_refinance"];

fn write_timelines_csv(wtr: &mut StdoutWriter<'_>, timelines: &Value) {
    let columns: Vec<(&str, &Vec<Value>)> = TIMELINE_COLUMNS
        .into_iter()
        .filter_map(|name| match timelines.get(name) {
            Some(Value::Array(points)) => Some((name, points)),
            _ => None,
        })
        .collect();

    let mut header = vec!["month"];
    header.extend(columns.iter().map(|(name, _)| *name));
    let _ = wtr.write_record(&header);

    let months = columns.first().map(|(_, points)| points.len()).unwrap_or(0);
    for idx in 0..months {
        let mut row = vec![idx.to_string()];
        for (_, points) in &columns {
            let cell = points
                .get(idx)
                .and_then(|p| p.get("cumulative_net_savings"))
                .map(scalar_text)
                .unwrap_or_default();
            row.push(cell);
        }
        let _ = wtr.write_record(&row);
    }
}

fn write_array_csv(wtr: &mut StdoutWriter<'_>, arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        return;
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);
    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(scalar_text).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    }
}
