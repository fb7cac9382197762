//! Render a store as TEMPO parameter file text

use crate::{ParameterEntry, ParameterStore, ParameterValue};

/// Width of the name column.
const NAME_WIDTH: usize = 15;

/// Format a float so it reads back as a float (never as an integer literal).
///
/// Uses the shortest representation that parses back to the same value.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn format_float(value: f64) -> String {
    let abs = value.abs();
    let text = if value == 0.0 || !value.is_finite() || (1e-4..1e15).contains(&abs) {
        format!("{value}")
    } else {
        format!("{value:e}")
    };

    if text.contains(['.', 'e', 'N', 'i']) {
        text
    } else {
        format!("{text}.0")
    }
}

/// TEMPO fit flag written ahead of every uncertainty.
const FIT_FLAG: &str = "1";

fn write_line(out: &mut String, name: &str, value: &str, error: Option<f64>) {
    let line = match error {
        Some(error) => format!(
            "{name:<width$} {value} {FIT_FLAG} {}\n",
            format_float(error),
            width = NAME_WIDTH
        ),
        None => format!("{name:<width$} {value}\n", width = NAME_WIDTH),
    };
    out.push_str(&line);
}

fn write_entry(out: &mut String, entry: &ParameterEntry) {
    let name = entry.name();
    match entry.main() {
        ParameterValue::Float64(value) => {
            let error = entry.error().and_then(ParameterValue::as_f64);
            write_line(out, name, &format_float(*value), error);
        }
        ParameterValue::Float64Vector(values) => {
            let errors = entry.error().and_then(ParameterValue::as_vector);
            for (i, value) in values.iter().enumerate() {
                let error = errors.and_then(|e| e.get(i)).copied();
                write_line(out, &format!("{name}{i}"), &format_float(*value), error);
            }
        }
        ParameterValue::Text(text) => write_line(out, name, text, None),
        ParameterValue::UInt32(value) => write_line(out, name, &value.to_string(), None),
    }
}

/// Render every entry in key order, one `NAME VALUE [FIT ERROR]` line each.
///
/// Vector parameters are expanded to `NAME0`, `NAME1`, ... lines.
#[must_use]
pub fn render(store: &ParameterStore) -> String {
    let mut out = String::new();
    for entry in store.iter() {
        write_entry(&mut out, entry);
    }
    out
}
