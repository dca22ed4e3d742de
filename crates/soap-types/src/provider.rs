use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

/// An external language-model backend.
///
/// `Unknown` is a representable outcome of model resolution, not an error by
/// itself. It only becomes one when a call is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Google,
    #[serde(rename = "openai")]
    OpenAi,
    Mistral,
    Unknown,
}

impl Provider {
    /// Providers that can actually be called, in registry order.
    pub const CALLABLE: [Provider; 3] = [Provider::Google, Provider::OpenAi, Provider::Mistral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::OpenAi => "openai",
            Provider::Mistral => "mistral",
            Provider::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ModelResolution
// ---------------------------------------------------------------------------

/// Result of mapping a human-facing model label to a provider model id.
///
/// On a miss, `provider` is [`Provider::Unknown`] and `canonical_model_id`
/// holds the normalized label that failed to resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelResolution {
    pub provider: Provider,
    pub canonical_model_id: String,
}

impl ModelResolution {
    pub fn is_known(&self) -> bool {
        self.provider != Provider::Unknown
    }
}
