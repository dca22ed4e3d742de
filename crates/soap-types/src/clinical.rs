use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Vitals
// ---------------------------------------------------------------------------

/// Vital signs. Every numeric field is either a finite number or `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    /// Blood pressure as entered, e.g. "120/80". Empty when absent.
    #[serde(default)]
    pub bp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hr: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rr: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spo2: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp: Option<f64>,
}

impl Vitals {
    /// Numeric fields paired with their wire names, in display order.
    pub fn numeric_fields(&self) -> [(&'static str, Option<f64>); 4] {
        [
            ("hr", self.hr),
            ("rr", self.rr),
            ("spo2", self.spo2),
            ("temp", self.temp),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.bp.is_empty() && self.numeric_fields().iter().all(|(_, v)| v.is_none())
    }
}

// ---------------------------------------------------------------------------
// ClinicalInputs
// ---------------------------------------------------------------------------

/// Canonical request data, produced by the normalizer and never mutated
/// afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalInputs {
    pub model: String,
    pub notes: String,
    #[serde(default)]
    pub complaint_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pain_scale: Option<f64>,
    #[serde(default)]
    pub diagnosis_tags: Vec<String>,
    #[serde(default)]
    pub vitals: Vitals,
}

// ---------------------------------------------------------------------------
// ValidationReport
// ---------------------------------------------------------------------------

/// A single field-level validation problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub field: String,
    pub message: String,
}

impl Issue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Every issue found in one validation pass, in rule order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub ok: bool,
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    pub fn from_issues(issues: Vec<Issue>) -> Self {
        Self {
            ok: issues.is_empty(),
            issues,
        }
    }
}

// ---------------------------------------------------------------------------
// SoapNote
// ---------------------------------------------------------------------------

/// Required section keys of a provider-generated note, in order.
pub const SOAP_SECTIONS: [&str; 4] = ["subjective", "objective", "assessment", "plan"];

/// A four-section clinical note.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoapNote {
    #[serde(default)]
    pub subjective: String,
    #[serde(default)]
    pub objective: String,
    #[serde(default)]
    pub assessment: String,
    #[serde(default)]
    pub plan: String,
}

impl SoapNote {
    /// Typed view of a parsed provider response. Sections that are missing
    /// or not strings come back empty.
    pub fn from_value(value: &serde_json::Value) -> Self {
        let section = |key: &str| value[key].as_str().unwrap_or_default().to_string();
        Self {
            subjective: section("subjective"),
            objective: section("objective"),
            assessment: section("assessment"),
            plan: section("plan"),
        }
    }

    /// Four-line `S:`/`O:`/`A:`/`P:` rendering.
    pub fn to_text(&self) -> String {
        format!(
            "S: {}\nO: {}\nA: {}\nP: {}",
            self.subjective, self.objective, self.assessment, self.plan
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn inputs_serialize_with_wire_names_and_skip_absent_numbers() {
        let input = ClinicalInputs {
            model: "gpt 5".into(),
            notes: "ear pain".into(),
            vitals: Vitals {
                hr: Some(72.0),
                ..Default::default()
            },
            ..Default::default()
        };
        let v = serde_json::to_value(&input).unwrap();
        assert_eq!(v["complaintType"], "");
        assert!(v.get("painScale").is_none());
        assert_eq!(v["diagnosisTags"], json!([]));
        assert_eq!(v["vitals"]["hr"], 72.0);
        assert!(v["vitals"].get("rr").is_none());
    }

    #[test]
    fn report_ok_tracks_issue_list() {
        assert!(ValidationReport::from_issues(vec![]).ok);
        let r = ValidationReport::from_issues(vec![Issue::new("model", "Model is required")]);
        assert!(!r.ok);
        assert_eq!(r.issues[0].field, "model");
    }

    #[test]
    fn soap_note_from_partial_value() {
        let note = SoapNote::from_value(&json!({"subjective": "a", "plan": 3}));
        assert_eq!(note.subjective, "a");
        assert_eq!(note.objective, "");
        assert_eq!(note.plan, "");
    }

    #[test]
    fn soap_note_text_has_four_prefixed_lines() {
        let note = SoapNote {
            subjective: "s".into(),
            objective: "o".into(),
            assessment: "a".into(),
            plan: "p".into(),
        };
        assert_eq!(note.to_text(), "S: s\nO: o\nA: a\nP: p");
    }

    #[test]
    fn vitals_empty_check() {
        assert!(Vitals::default().is_empty());
        let v = Vitals {
            bp: "120/80".into(),
            ..Default::default()
        };
        assert!(!v.is_empty());
    }
}
