use std::fmt;

use soap_types::Provider;

/// Per-provider API keys. Blank values are treated as absent.
#[derive(Clone, Default)]
pub struct Credentials {
    google: Option<String>,
    openai: Option<String>,
    mistral: Option<String>,
}

impl Credentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the key for `provider`. Ignored for `Provider::Unknown`.
    pub fn with_key(mut self, provider: Provider, key: impl Into<String>) -> Self {
        let key = clean(Some(key.into()));
        match provider {
            Provider::Google => self.google = key,
            Provider::OpenAi => self.openai = key,
            Provider::Mistral => self.mistral = key,
            Provider::Unknown => {}
        }
        self
    }

    /// Read `GOOGLE_API_KEY` (or `GEMINI_API_KEY`), `OPENAI_API_KEY` and
    /// `MISTRAL_API_KEY` from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env) but with an injectable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            google: clean(lookup("GOOGLE_API_KEY")).or_else(|| clean(lookup("GEMINI_API_KEY"))),
            openai: clean(lookup("OPENAI_API_KEY")),
            mistral: clean(lookup("MISTRAL_API_KEY")),
        }
    }

    pub fn get(&self, provider: Provider) -> Option<&str> {
        match provider {
            Provider::Google => self.google.as_deref(),
            Provider::OpenAi => self.openai.as_deref(),
            Provider::Mistral => self.mistral.as_deref(),
            Provider::Unknown => None,
        }
    }

    pub fn has(&self, provider: Provider) -> bool {
        self.get(provider).is_some()
    }
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = |k: &Option<String>| if k.is_some() { "<set>" } else { "<unset>" };
        f.debug_struct("Credentials")
            .field("google", &mark(&self.google))
            .field("openai", &mark(&self.openai))
            .field("mistral", &mark(&self.mistral))
            .finish()
    }
}
