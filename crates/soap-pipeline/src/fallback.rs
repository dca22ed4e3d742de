//! Offline, rule-based SOAP generation.
//!
//! Used when no provider call is possible. Deterministic for a given input.

use soap_types::{ClinicalInputs, SoapNote, Vitals};

const NOT_PROVIDED: &str = "Not provided";
const EAR_PAIN_DIFFERENTIAL: &str = "Barotrauma vs Eustachian tube dysfunction";
const UNDETERMINED: &str = "To be determined";
const FOLLOW_UP: &str = "Monitor symptoms and follow-up if worsening";

/// Four-line `S:`/`O:`/`A:`/`P:` note built from the inputs alone.
pub fn fallback(input: &ClinicalInputs) -> String {
    fallback_note(input).to_text()
}

pub fn fallback_note(input: &ClinicalInputs) -> SoapNote {
    SoapNote {
        subjective: subjective(input),
        objective: objective(&input.vitals),
        assessment: assessment(&input.notes, &input.diagnosis_tags),
        plan: plan(&input.notes),
    }
}

fn subjective(input: &ClinicalInputs) -> String {
    let mut parts = Vec::new();
    if !input.complaint_type.is_empty() {
        parts.push(format!("{}.", input.complaint_type));
    }
    if !input.notes.is_empty() {
        parts.push(input.notes.clone());
    }
    if parts.is_empty() {
        NOT_PROVIDED.to_string()
    } else {
        parts.join(" ")
    }
}

fn objective(vitals: &Vitals) -> String {
    let mut parts = Vec::new();
    if !vitals.bp.is_empty() {
        parts.push(format!("BP: {}", vitals.bp));
    }
    if let Some(hr) = vitals.hr {
        parts.push(format!("HR: {hr} bpm"));
    }
    if let Some(rr) = vitals.rr {
        parts.push(format!("RR: {rr} rpm"));
    }
    if let Some(spo2) = vitals.spo2 {
        parts.push(format!("SpO₂: {spo2}%"));
    }
    if let Some(temp) = vitals.temp {
        parts.push(format!("Temp: {temp}°C"));
    }
    if parts.is_empty() {
        NOT_PROVIDED.to_string()
    } else {
        parts.join("; ")
    }
}

fn assessment(notes: &str, tags: &[String]) -> String {
    if !tags.is_empty() {
        return tags.join(" vs ");
    }
    let lowered = notes.to_lowercase();
    if lowered.contains("ear") && lowered.contains("pain") {
        EAR_PAIN_DIFFERENTIAL.to_string()
    } else {
        UNDETERMINED.to_string()
    }
}

fn plan(notes: &str) -> String {
    let lowered = notes.to_lowercase();
    let mut actions = Vec::new();
    if lowered.contains("clear") && lowered.contains("ear") {
        actions.push("Clear ears");
    }
    if lowered.contains("paracetamol") || lowered.contains("acetaminophen") {
        actions.push("Paracetamol 1g as needed");
    }
    actions.push(FOLLOW_UP);
    actions.join(", ")
}
