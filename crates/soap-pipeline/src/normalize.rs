use serde_json::Value;

use soap_types::{ClinicalInputs, Vitals};

/// Coerce an untyped request body into canonical inputs.
///
/// Never fails: malformed or missing fields become an empty string or an
/// absent number. Applying it to the serialized output again is a no-op.
pub fn normalize(body: &Value) -> ClinicalInputs {
    let vitals = &body["vitals"];
    ClinicalInputs {
        model: coerce_string(&body["model"]),
        notes: coerce_string(&body["notes"]),
        complaint_type: coerce_string(&body["complaintType"]),
        pain_scale: coerce_number(&body["painScale"]),
        diagnosis_tags: coerce_tags(&body["diagnosisTags"]),
        vitals: Vitals {
            bp: coerce_string(&vitals["bp"]),
            hr: coerce_number(&vitals["hr"]),
            rr: coerce_number(&vitals["rr"]),
            spo2: coerce_number(&vitals["spo2"]),
            temp: coerce_number(&vitals["temp"]),
        },
    }
}

fn coerce_string(v: &Value) -> String {
    stringify(v).trim().to_string()
}

fn stringify(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items.iter().map(stringify).collect::<Vec<_>>().join(","),
        Value::Object(_) => v.to_string(),
    }
}

/// Finite numbers pass through, numeric strings are parsed, anything else
/// is absent.
fn coerce_number(v: &Value) -> Option<f64> {
    let n = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                None
            } else {
                s.parse::<f64>().ok()
            }
        }
        _ => None,
    };
    n.filter(|n| n.is_finite())
}

/// Accepts an array of strings or a comma-separated string.
fn coerce_tags(v: &Value) -> Vec<String> {
    match v {
        Value::Array(items) => items
            .iter()
            .map(coerce_string)
            .filter(|t| !t.is_empty())
            .collect(),
        other => coerce_string(other)
            .split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect(),
    }
}
