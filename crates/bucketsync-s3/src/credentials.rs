//! Credential resolution
//!
//! Keys are taken from the first source that provides a complete
//! access/secret pair:
//!
//! 1. keys given on the command line
//! 2. `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY` (or the older
//!    `AWS_ACCESS_KEY` / `AWS_SECRET_KEY`), with `AWS_SESSION_TOKEN`
//! 3. the SDK default provider chain (profiles, web identity, container
//!    and instance roles)
//!
//! If nothing yields credentials the client is still built; each upload
//! then fails with the service's authentication error.

use std::fmt;

/// Static access keys
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Keys {
    pub access_key: String,
    pub secret_key: String,
    pub token: Option<String>,
}

impl Keys {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.token = (!token.is_empty()).then_some(token);
        self
    }

    /// True unless both the access key and the secret key are set
    pub fn is_empty(&self) -> bool {
        self.access_key.is_empty() || self.secret_key.is_empty()
    }

    /// Reads keys from the process environment
    pub fn from_environment() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads keys through `lookup`, which maps a variable name to its value
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let first = |names: &[&str]| {
            names
                .iter()
                .copied()
                .filter_map(&lookup)
                .find(|value| !value.is_empty())
                .unwrap_or_default()
        };

        Self {
            access_key: first(&["AWS_ACCESS_KEY_ID", "AWS_ACCESS_KEY"]),
            secret_key: first(&["AWS_SECRET_ACCESS_KEY", "AWS_SECRET_KEY"]),
            token: lookup("AWS_SESSION_TOKEN").filter(|t| !t.is_empty()),
        }
    }
}

impl fmt::Debug for Keys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keys")
            .field("access_key", &self.access_key)
            .field("secret_key", &"[REDACTED]")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Where the client's credentials come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    Explicit(Keys),
    Environment(Keys),
    /// Defer to the SDK default provider chain
    Ambient,
}

impl CredentialSource {
    /// Picks the first complete source, reading the process environment
    pub fn resolve(explicit: Keys) -> Self {
        Self::resolve_with(explicit, |name| std::env::var(name).ok())
    }

    /// Same as [`CredentialSource::resolve`] with a custom variable lookup
    pub fn resolve_with(explicit: Keys, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if !explicit.is_empty() {
            return CredentialSource::Explicit(explicit);
        }
        let env = Keys::from_lookup(lookup);
        if !env.is_empty() {
            return CredentialSource::Environment(env);
        }
        CredentialSource::Ambient
    }

    /// Static keys, if this source has any
    pub fn keys(&self) -> Option<&Keys> {
        match self {
            CredentialSource::Explicit(keys) | CredentialSource::Environment(keys) => Some(keys),
            CredentialSource::Ambient => None,
        }
    }

    /// Short label for logging
    pub fn name(&self) -> &'static str {
        match self {
            CredentialSource::Explicit(_) => "command-line",
            CredentialSource::Environment(_) => "environment",
            CredentialSource::Ambient => "default-chain",
        }
    }
}
