//! Deterministic prompt synthesis.
//!
//! Providers are called at temperature zero, so the prompt text is the only
//! thing that varies between runs. Everything here is pure.

use soap_types::{ClinicalInputs, Vitals};

const NOT_PROVIDED: &str = "Not provided";

const PREAMBLE: &[&str] = &[
    "You are an AI Visit Summary Generator that converts doctor's free-text notes and structured inputs into clean, standardized SOAP format.",
    "",
    "CRITICAL: You MUST generate ALL FOUR sections (S, O, A, P). Never skip the Plan section.",
    "",
];

const SCHEMA_AND_EXAMPLE: &[&str] = &[
    "REQUIRED JSON STRUCTURE (all 4 fields are MANDATORY):",
    "{",
    "  \"subjective\": \"...\",",
    "  \"objective\": \"...\",",
    "  \"assessment\": \"...\",",
    "  \"plan\": \"...\"",
    "}",
    "",
    "SECTION DEFINITIONS:",
    "1. SUBJECTIVE (S): Patient's complaint, symptoms, history, onset, progression, relevant background. Include pain scale if provided.",
    "2. OBJECTIVE (O): Vital signs + Physical exam findings extracted from doctor's notes (what doctor observed, examined, measured, or tested). Extract ALL objective observations from the notes.",
    "3. ASSESSMENT (A): Clinical diagnosis - most probable condition with differentials if applicable",
    "4. PLAN (P): Treatment plan - medications (with dose/route), patient advice, follow-up instructions, activity restrictions",
    "",
    "EXAMPLE:",
    "Input Notes: \"Passenger is former diver... now pain during cruising... advised clearing ears... two tablets paracetamol... examined ears, tympanic membranes look normal, no redness\"",
    "Vitals: BP 120/80, HR 78, SpO₂ 98%",
    "Pain Scale: 6",
    "",
    "Correct Output:",
    "{",
    "  \"subjective\": \"Former diver presenting with ear pain during flight cruising altitude. Pain onset during descent, rated 6/10. No prior episodes.\",",
    "  \"objective\": \"Vitals: BP 120/80 mmHg, HR 78 bpm, SpO₂ 98%. Otoscopy: Tympanic membranes appear normal bilaterally, no erythema noted. External auditory canals clear.\",",
    "  \"assessment\": \"Barotrauma vs Eustachian tube dysfunction\",",
    "  \"plan\": \"Valsalva maneuver demonstrated for ear clearing during descent. Paracetamol 1g PO PRN for pain. Advised to avoid diving for 48 hours. Return if pain worsens or hearing loss develops.\"",
    "}",
    "",
];

const RULES: &[&str] = &[
    "CRITICAL RULES FOR OBJECTIVE SECTION:",
    "- Start with vital signs if provided: \"Vitals: BP X mmHg, HR X bpm, RR X breaths/min, SpO₂ X%, Temp X°C\"",
    "- Extract ALL physical exam findings, observations, and measurements from doctor's notes",
    "- Look for: examination results, what doctor saw/heard/felt, diagnostic test results, clinical observations",
    "- If doctor mentions examining body parts (ears, chest, abdomen, etc.), include those findings",
    "- If doctor mentions normal/abnormal findings, include them",
    "- Convert informal language to clinical terms (e.g., \"ears look fine\" → \"Tympanic membranes intact, no erythema\")",
    "- If notes have NO exam findings, you may add \"Physical examination findings as documented\" or similar",
    "",
    "CRITICAL RULES FOR SUBJECTIVE SECTION:",
    "- Extract patient complaints, symptoms, history, timeline from doctor's notes",
    "- Include pain scale if provided",
    "- What patient reports, not what doctor observed",
    "",
    "OTHER RULES:",
    "- ALL FOUR fields (subjective, objective, assessment, plan) are REQUIRED",
    "- Separate subjective (what patient says) from objective (what doctor observes/measures)",
    "- If doctor notes mention treatment/advice, it goes in Plan section",
    "- Stay faithful to doctor's notes - extract and rephrase, don't invent",
    "- Use clear clinical terminology",
    "- Keep each section 1-3 sentences",
    "- Return ONLY the JSON object, no markdown fences",
    "",
    "Generate the complete SOAP note JSON with ALL FOUR sections now:",
];

/// Render the generation prompt for `input`.
pub fn build_prompt(input: &ClinicalInputs) -> String {
    let mut lines: Vec<String> = PREAMBLE.iter().map(|l| l.to_string()).collect();

    lines.push("INPUT DATA:".into());
    lines.push(format!("- Doctor's free-text notes: {}", or_not_provided(&input.notes)));
    lines.push(format!("- Chief complaint: {}", or_not_provided(&input.complaint_type)));
    lines.push(format!("- Pain scale (0-10): {}", format_pain_scale(input.pain_scale)));
    lines.push(String::new());
    lines.push("VITAL SIGNS (use these in the Objective section):".into());
    lines.push(format!("  {}", format_vitals_detail(&input.vitals).join("\n  ")));
    lines.push(String::new());
    lines.push(format!(
        "- Associated diagnosis tags: {}",
        format_diagnosis_tags(&input.diagnosis_tags)
    ));
    lines.push(String::new());

    lines.extend(SCHEMA_AND_EXAMPLE.iter().map(|l| l.to_string()));
    lines.extend(RULES.iter().map(|l| l.to_string()));
    lines.join("\n")
}

fn or_not_provided(value: &str) -> &str {
    if value.is_empty() {
        NOT_PROVIDED
    } else {
        value
    }
}

/// Present vitals, one labelled line each with units. A single
/// "Not provided" line when nothing was recorded.
pub fn format_vitals_detail(vitals: &Vitals) -> Vec<String> {
    let mut lines = Vec::new();
    if !vitals.bp.is_empty() {
        lines.push(format!("Blood Pressure: {} mmHg", vitals.bp));
    }
    if let Some(hr) = vitals.hr {
        lines.push(format!("Heart Rate: {hr} bpm"));
    }
    if let Some(rr) = vitals.rr {
        lines.push(format!("Respiratory Rate: {rr} breaths/min"));
    }
    if let Some(spo2) = vitals.spo2 {
        lines.push(format!("Oxygen Saturation: {spo2}%"));
    }
    if let Some(temp) = vitals.temp {
        lines.push(format!("Temperature: {temp}°C"));
    }
    if lines.is_empty() {
        lines.push(NOT_PROVIDED.to_string());
    }
    lines
}

pub fn format_pain_scale(pain_scale: Option<f64>) -> String {
    pain_scale.map_or_else(|| NOT_PROVIDED.to_string(), |p| p.to_string())
}

pub fn format_diagnosis_tags(tags: &[String]) -> String {
    if tags.is_empty() {
        "None".to_string()
    } else {
        tags.join(", ")
    }
}
