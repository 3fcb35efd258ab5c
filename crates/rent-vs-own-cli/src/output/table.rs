use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

/// Nested summaries printed as their own tables, with their headings.
const SUMMARY_SECTIONS: [(&str, &str); 3] = [
    ("summary", "Summary"),
    ("ownership", "Ownership summary"),
    ("investment", "Investment summary"),
];

/// Format output as tables using the tabled crate.
///
/// Scalar result fields come first, then nested summaries and the
/// strategy table. Monthly series are only counted; use `--output csv`
/// for the full rows.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_flat_object(map);
            }
        }
        Value::Array(arr) => {
            print_array_table(arr);
        }
        _ => {
            println!("{}", value);
        }
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>) {
    if let Value::Object(res_map) = result {
        print_flat_object(res_map);

        for (key, heading) in SUMMARY_SECTIONS {
            let section = match res_map.get(key) {
                Some(Value::Object(obj)) if key == "summary" => Some(obj),
                Some(Value::Object(obj)) => match obj.get("summary") {
                    Some(Value::Object(summary)) => Some(summary),
                    _ => None,
                },
                _ => None,
            };
            if let Some(section) = section {
                println!("\n{}:", heading);
                print_flat_object(section);
            }
        }

        if let Some(Value::Array(strategies)) = res_map.get("strategies") {
            println!("\nStrategies:");
            print_array_table(strategies);
        }

        if let Some(Value::Array(matrix)) = res_map.get("matrix") {
            println!("\nMatrix:");
            print_matrix(res_map, matrix);
        }

        for (key, val) in res_map {
            if let Value::Array(rows) = val {
                if rows.first().map(Value::is_object).unwrap_or(false) && key != "strategies" {
                    println!("({}: {} rows, use --output csv for the series)", key, rows.len());
                }
            }
        }
    } else {
        print_flat_object(envelope);
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

/// Field/value table of the scalar entries of an object.
fn print_flat_object(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut rows = 0;
    for (key, val) in map {
        if matches!(val, Value::Object(_) | Value::Array(_)) {
            continue;
        }
        builder.push_record([key.as_str(), &format_value(val)]);
        rows += 1;
    }
    if rows > 0 {
        println!("{}", Table::from(builder));
    }
}

/// Sensitivity grid: variable_1 values down the side, variable_2 across.
fn print_matrix(res_map: &Map<String, Value>, matrix: &[Value]) {
    let empty = Vec::new();
    let row_values = match res_map.get("variable_1_values") {
        Some(Value::Array(v)) => v,
        _ => &empty,
    };
    let col_values = match res_map.get("variable_2_values") {
        Some(Value::Array(v)) => v,
        _ => &empty,
    };
    let corner = format!(
        "{} \\ {}",
        res_map
            .get("variable_1_name")
            .map(format_value)
            .unwrap_or_default(),
        res_map
            .get("variable_2_name")
            .map(format_value)
            .unwrap_or_default()
    );

    let mut builder = Builder::default();
    let mut header = vec![corner];
    header.extend(col_values.iter().map(format_value));
    builder.push_record(header);

    for (i, row) in matrix.iter().enumerate() {
        let mut record = vec![row_values.get(i).map(format_value).unwrap_or_default()];
        if let Value::Array(cells) = row {
            record.extend(cells.iter().map(format_value));
        }
        builder.push_record(record);
    }
    println!("{}", Table::from(builder));
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
