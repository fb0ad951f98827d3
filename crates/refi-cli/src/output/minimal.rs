use serde_json::Value;

use super::scalar_text;

/// Dotted paths of headline answers, most specific first.
const PRIORITY_PATHS: [&str; 6] = [
    "best_strategy",
    "refinance_now.breakeven",
    "monthly_payment",
    "remaining_balance",
    "breakeven",
    "total_breakeven",
];

/// Print just the key answer value from the output.
///
/// Looks for well-known result fields in priority order, then falls back
/// to the first field in the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value.get("result").unwrap_or(value);

    for path in PRIORITY_PATHS {
        if let Some(val) = lookup(result_obj, path) {
            if !val.is_null() {
                println!("{}", minimal_text(val));
                return;
            }
        }
    }

    if let Some((key, val)) = result_obj.as_object().and_then(|m| m.iter().next()) {
        println!("{}: {}", key, minimal_text(val));
        return;
    }

    println!("{}", minimal_text(result_obj));
}

fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, key| current.get(key))
}

/// Breakeven renders as its month count or "never".
fn minimal_text(value: &Value) -> String {
    match value.get("months") {
        Some(months) => scalar_text(months),
        None => scalar_text(value),
    }
}
