use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{flatten, scalar_text};

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    let Value::Object(map) = value else {
        println!("{}", scalar_text(value));
        return;
    };

    if let Some(Value::Array(rows)) = map.get("results") {
        print_array_table(rows);
    }
    if let Some(summary) = map.get("summary") {
        println!("\nSummary:");
        print_field_table(summary);
    }
    if let Some(result) = map.get("result") {
        print_field_table(result);
    }

    if let Some(Value::Array(warnings)) = map.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = map.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_field_table(value: &Value) {
    let mut rows = Vec::new();
    flatten("", value, &mut rows);

    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in rows {
        builder.push_record([key, val]);
    }
    println!("{}", Table::from(builder));
}

fn print_array_table(arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        println!("(empty)");
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(scalar_text).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
    }
    println!("{}", Table::from(builder));
}
