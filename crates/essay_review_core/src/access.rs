//! crates/essay_review_core/src/access.rs
//!
//! The shared-secret gate in front of submission retrieval.

use crate::ports::{PortError, PortResult};
use subtle::ConstantTimeEq;

/// The credential accepted when no secret has been configured.
pub const DEFAULT_CREDENTIAL: &str = "teacher123";

/// How the gate treats [`DEFAULT_CREDENTIAL`] once a different secret is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DefaultCredentialPolicy {
    /// The default credential is accepted alongside the configured secret.
    #[default]
    AlwaysAccept,
    /// The default credential only works while it is also the configured secret.
    WhenUnconfigured,
}

/// Validates a caller-supplied credential against the configured secret.
#[derive(Clone)]
pub struct AccessGate {
    secret: String,
    default_policy: DefaultCredentialPolicy,
}

impl std::fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGate")
            .field("secret", &"<redacted>")
            .field("default_policy", &self.default_policy)
            .finish()
    }
}

impl AccessGate {
    pub fn new(secret: impl Into<String>, default_policy: DefaultCredentialPolicy) -> Self {
        Self {
            secret: secret.into(),
            default_policy,
        }
    }

    /// Succeeds iff `credential` matches the configured secret, or matches
    /// the default credential and the policy allows it.
    pub fn authorize(&self, credential: Option<&str>) -> PortResult<()> {
        let credential = credential.ok_or(PortError::Unauthorized)?;

        let matches_secret = constant_time_eq(credential, &self.secret);
        let matches_default = match self.default_policy {
            DefaultCredentialPolicy::AlwaysAccept => constant_time_eq(credential, DEFAULT_CREDENTIAL),
            DefaultCredentialPolicy::WhenUnconfigured => false,
        };

        if matches_secret || matches_default {
            Ok(())
        } else {
            Err(PortError::Unauthorized)
        }
    }
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    // Slices of different length compare unequal without an early return.
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
