use soap_types::{ClinicalInputs, Issue, ValidationReport};

/// Check canonical inputs against domain constraints.
///
/// Every rule runs; the report lists all violations in rule order.
pub fn validate(input: &ClinicalInputs) -> ValidationReport {
    let mut issues = Vec::new();

    if input.model.is_empty() {
        issues.push(Issue::new("model", "Model is required"));
    }
    if input.notes.is_empty() {
        issues.push(Issue::new("notes", "Doctor notes are required"));
    }
    if let Some(pain) = input.pain_scale {
        if !(0.0..=10.0).contains(&pain) {
            issues.push(Issue::new("painScale", "Pain scale must be 0-10"));
        }
    }
    for (name, value) in input.vitals.numeric_fields() {
        if matches!(value, Some(v) if !v.is_finite()) {
            issues.push(Issue::new(format!("vitals.{name}"), "Must be a number"));
        }
    }

    ValidationReport::from_issues(issues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use soap_types::Vitals;

    fn valid_input() -> ClinicalInputs {
        ClinicalInputs {
            model: "gemini 2.5 flash".into(),
            notes: "ear pain".into(),
            ..Default::default()
        }
    }

    fn fields(report: &ValidationReport) -> Vec<&str> {
        report.issues.iter().map(|i| i.field.as_str()).collect()
    }

    #[test]
    fn well_formed_input_is_ok() {
        let report = validate(&valid_input());
        assert!(report.ok);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn all_issues_are_collected() {
        let input = ClinicalInputs {
            pain_scale: Some(11.0),
            vitals: Vitals {
                hr: Some(f64::NAN),
                temp: Some(f64::INFINITY),
                ..Default::default()
            },
            ..Default::default()
        };
        let report = validate(&input);
        assert!(!report.ok);
        assert_eq!(
            fields(&report),
            vec!["model", "notes", "painScale", "vitals.hr", "vitals.temp"]
        );
    }

    #[test]
    fn pain_scale_bounds_are_inclusive() {
        for pain in [0.0, 10.0, 5.5] {
            let input = ClinicalInputs {
                pain_scale: Some(pain),
                ..valid_input()
            };
            assert!(validate(&input).ok, "{pain}");
        }
    }

    #[test]
    fn pain_scale_just_outside_bounds_gives_one_issue() {
        for pain in [-0.01, 10.01] {
            let input = ClinicalInputs {
                pain_scale: Some(pain),
                ..valid_input()
            };
            let report = validate(&input);
            assert_eq!(report.issues.len(), 1, "{pain}");
            assert_eq!(report.issues[0].field, "painScale");
            assert_eq!(report.issues[0].message, "Pain scale must be 0-10");
        }
    }

    #[test]
    fn nan_pain_scale_is_rejected() {
        let input = ClinicalInputs {
            pain_scale: Some(f64::NAN),
            ..valid_input()
        };
        assert_eq!(fields(&validate(&input)), vec!["painScale"]);
    }
}
