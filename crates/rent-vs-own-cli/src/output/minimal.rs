use serde_json::Value;

/// Headline fields, most specific first.
const PRIORITY_KEYS: [&str; 7] = [
    "winner",
    "advantage",
    "monthly_payment",
    "net_profit",
    "base_case_value",
    "final_net_proceeds",
    "net_proceeds",
];

/// Print just the key answer value from the output.
///
/// Looks for a headline field in the result, then in its summary, and
/// falls back to the first scalar field of the result.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        let summary = map.get("summary").and_then(Value::as_object);

        // "winner" alone is ambiguous, so pair it with the advantage
        if let (Some(winner), Some(advantage)) = (map.get("winner"), map.get("advantage")) {
            println!("{} ({})", format_minimal(winner), format_minimal(advantage));
            return;
        }

        for scope in std::iter::once(map).chain(summary) {
            for key in &PRIORITY_KEYS {
                if let Some(val) = scope.get(*key) {
                    if !val.is_null() {
                        println!("{}", format_minimal(val));
                        return;
                    }
                }
            }
        }

        if let Some((key, val)) = map
            .iter()
            .find(|(_, v)| !matches!(v, Value::Array(_) | Value::Object(_)))
        {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
