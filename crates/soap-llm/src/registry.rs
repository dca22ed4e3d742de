use std::collections::HashMap;
use std::sync::LazyLock;

use soap_types::{ModelResolution, Provider};

// ---------------------------------------------------------------------------
// Built-in model table
// ---------------------------------------------------------------------------

/// Human-facing labels per provider, mapped to the id the provider API expects.
/// Labels must be disjoint across providers.
const BUILTIN_MODELS: &[(Provider, &[(&str, &str)])] = &[
    (
        Provider::Google,
        &[
            ("gemini 2.5 flash", "gemini-2.5-flash"),
            ("gemini-2.5-flash", "gemini-2.5-flash"),
            ("gemini 2.5 pro", "gemini-2.5-pro"),
            ("gemini-2.5-pro", "gemini-2.5-pro"),
        ],
    ),
    (
        Provider::OpenAi,
        &[
            // GPT-5 series
            ("gpt-5", "gpt-5"),
            ("gpt 5", "gpt-5"),
            ("gpt-5-mini", "gpt-5-mini"),
            ("gpt 5 mini", "gpt-5-mini"),
            ("gpt-5-nano", "gpt-5-nano"),
            ("gpt 5 nano", "gpt-5-nano"),
            // GPT-5.1 series
            ("gpt-5.1", "gpt-5.1"),
            ("gpt 5.1", "gpt-5.1"),
            // GPT-5.2 series
            ("gpt-5.2", "gpt-5.2"),
            ("gpt 5.2", "gpt-5.2"),
            ("gpt-5.2-instant", "gpt-5.2-instant"),
            ("gpt 5.2 instant", "gpt-5.2-instant"),
            ("gpt-5.2-thinking", "gpt-5.2-thinking"),
            ("gpt 5.2 thinking", "gpt-5.2-thinking"),
        ],
    ),
    (
        Provider::Mistral,
        &[
            ("mistral small", "mistral-small"),
            ("mistral-small", "mistral-small"),
            ("mistral large", "mistral-large"),
            ("mistral-large", "mistral-large"),
        ],
    ),
];

static BUILTIN: LazyLock<ModelRegistry> = LazyLock::new(|| {
    let entries = BUILTIN_MODELS.iter().flat_map(|(provider, models)| {
        models
            .iter()
            .map(move |(label, id)| (*provider, label.to_string(), id.to_string()))
    });
    ModelRegistry::build(entries).0
});

/// Trim and lower-case a model label the way registry keys are stored.
pub fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Resolve a label against the built-in registry.
pub fn resolve_model(label: &str) -> ModelResolution {
    ModelRegistry::builtin().resolve(label)
}

// ---------------------------------------------------------------------------
// ModelRegistry
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Model label '{label}' registered for both {first} and {second}")]
    DuplicateLabel {
        label: String,
        first: Provider,
        second: Provider,
    },
}

/// Immutable label → (provider, model id) table.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    by_label: HashMap<String, ModelResolution>,
    labels: Vec<String>,
}

impl ModelRegistry {
    /// The process-wide built-in table, built on first use.
    pub fn builtin() -> &'static ModelRegistry {
        &BUILTIN
    }

    /// Build a registry from `(provider, label, model_id)` entries, rejecting
    /// labels that normalize to the same key.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (Provider, String, String)>,
    ) -> Result<Self, RegistryError> {
        let (registry, collisions) = Self::build(entries);
        match collisions.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(registry),
        }
    }

    /// First entry for a label wins; later ones are reported as collisions.
    fn build(
        entries: impl IntoIterator<Item = (Provider, String, String)>,
    ) -> (Self, Vec<RegistryError>) {
        let mut by_label: HashMap<String, ModelResolution> = HashMap::new();
        let mut labels = Vec::new();
        let mut collisions = Vec::new();

        for (provider, label, model_id) in entries {
            let key = normalize_label(&label);
            if let Some(existing) = by_label.get(&key) {
                collisions.push(RegistryError::DuplicateLabel {
                    label: key,
                    first: existing.provider,
                    second: provider,
                });
                continue;
            }
            labels.push(key.clone());
            by_label.insert(
                key,
                ModelResolution {
                    provider,
                    canonical_model_id: model_id,
                },
            );
        }

        (Self { by_label, labels }, collisions)
    }

    /// Resolve a label. A miss yields `Provider::Unknown` with the normalized
    /// label passed through as the model id.
    pub fn resolve(&self, label: &str) -> ModelResolution {
        let key = normalize_label(label);
        match self.by_label.get(&key) {
            Some(resolution) => resolution.clone(),
            None => ModelResolution {
                provider: Provider::Unknown,
                canonical_model_id: key,
            },
        }
    }

    /// Registered labels in insertion order.
    pub fn labels(&self) -> impl Iterator<Item = (&str, &ModelResolution)> {
        self.labels
            .iter()
            .filter_map(|l| self.by_label.get(l).map(|r| (l.as_str(), r)))
    }

    pub fn len(&self) -> usize {
        self.by_label.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_label.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_is_case_insensitive() {
        let a = resolve_model("Gemini 2.5 Flash");
        let b = resolve_model("gemini 2.5 flash");
        assert_eq!(a, b);
        assert_eq!(a.provider, Provider::Google);
        assert_eq!(a.canonical_model_id, "gemini-2.5-flash");
    }

    #[test]
    fn resolution_trims_whitespace() {
        let r = resolve_model("  GPT 5.2 Thinking \n");
        assert_eq!(r.provider, Provider::OpenAi);
        assert_eq!(r.canonical_model_id, "gpt-5.2-thinking");
    }

    #[test]
    fn unknown_label_passes_through_normalized() {
        let r = resolve_model("made-up-model-xyz");
        assert_eq!(r.provider, Provider::Unknown);
        assert_eq!(r.canonical_model_id, "made-up-model-xyz");

        let r = resolve_model("  Made-Up ");
        assert_eq!(r.canonical_model_id, "made-up");
    }

    #[test]
    fn spacing_and_dash_variants_share_an_id() {
        assert_eq!(resolve_model("gpt 5 mini"), resolve_model("gpt-5-mini"));
        assert_eq!(
            resolve_model("mistral large").canonical_model_id,
            "mistral-large"
        );
        assert_eq!(resolve_model("Mistral Small").provider, Provider::Mistral);
    }

    #[test]
    fn builtin_table_has_no_collisions() {
        let entries = BUILTIN_MODELS.iter().flat_map(|(provider, models)| {
            models
                .iter()
                .map(move |(label, id)| (*provider, label.to_string(), id.to_string()))
        });
        let registry = ModelRegistry::from_entries(entries).unwrap();
        assert_eq!(registry.len(), ModelRegistry::builtin().len());
    }

    #[test]
    fn duplicate_labels_are_rejected() {
        let err = ModelRegistry::from_entries(vec![
            (Provider::Google, "shared".into(), "g".into()),
            (Provider::Mistral, " SHARED ".into(), "m".into()),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateLabel {
                label: "shared".into(),
                first: Provider::Google,
                second: Provider::Mistral,
            }
        );
    }

    #[test]
    fn labels_keep_registry_order() {
        let registry = ModelRegistry::builtin();
        let first = registry.labels().next().unwrap();
        assert_eq!(first.0, "gemini 2.5 flash");
        assert!(!registry.is_empty());
    }
}
