use serde_json::{Map, Value};
use std::io;

/// Month-level series, in the order they are looked for.
const SERIES_KEYS: [&str; 2] = ["monthly", "schedule"];

/// Write output as CSV to stdout.
///
/// A result carrying a monthly series is written one row per month; a
/// sensitivity result as its grid; anything else as field/value pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => write_result_csv(&mut wtr, result),
            _ => write_fields_csv(&mut wtr, map),
        },
        Value::Array(arr) => {
            write_array_csv(&mut wtr, arr);
        }
        _ => {
            let _ = wtr.write_record([&format_csv_value(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_result_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, result: &Map<String, Value>) {
    for key in SERIES_KEYS {
        if let Some(Value::Array(rows)) = result.get(key) {
            if !rows.is_empty() {
                write_array_csv(wtr, rows);
                return;
            }
        }
    }

    if let Some(Value::Array(matrix)) = result.get("matrix") {
        write_matrix_csv(wtr, result, matrix);
        return;
    }

    write_fields_csv(wtr, result);
}

fn write_fields_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, map: &Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in map {
        let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
    }
}

fn write_matrix_csv(
    wtr: &mut csv::Writer<io::StdoutLock<'_>>,
    result: &Map<String, Value>,
    matrix: &[Value],
) {
    let empty = Vec::new();
    let row_values = match result.get("variable_1_values") {
        Some(Value::Array(v)) => v,
        _ => &empty,
    };
    let col_values = match result.get("variable_2_values") {
        Some(Value::Array(v)) => v,
        _ => &empty,
    };

    let mut header = vec![result
        .get("variable_1_name")
        .map(format_csv_value)
        .unwrap_or_default()];
    header.extend(col_values.iter().map(format_csv_value));
    let _ = wtr.write_record(&header);

    for (i, row) in matrix.iter().enumerate() {
        let mut record = vec![row_values.get(i).map(format_csv_value).unwrap_or_default()];
        if let Value::Array(cells) = row {
            record.extend(cells.iter().map(format_csv_value));
        }
        let _ = wtr.write_record(&record);
    }
}

fn write_array_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
