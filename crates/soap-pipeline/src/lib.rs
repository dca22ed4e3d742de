//! SOAP note generation pipeline.
//!
//! request body → [`normalize`] → [`validate`] → model resolution →
//! [`build_prompt`] → provider gateway → [`parse_response`]. [`fallback`] is
//! an independent, network-free path over the same [`ClinicalInputs`].
//!
//! [`ClinicalInputs`]: soap_types::ClinicalInputs

mod fallback;
mod generator;
mod normalize;
mod parse;
mod prompt;
mod validation;

pub use fallback::{fallback, fallback_note};
pub use generator::*;
pub use normalize::normalize;
pub use parse::{missing_sections, parse_response, strip_fences};
pub use prompt::{build_prompt, format_diagnosis_tags, format_pain_scale, format_vitals_detail};
pub use validation::validate;
