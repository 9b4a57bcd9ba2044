//! Engine and credential configuration.
//!
//! Configuration values are provided by the application, not hardcoded.

use chrono::Duration;
use std::fmt;
use std::str::FromStr;

/// Page size used when the caller sends no limit, or a non-positive one.
pub const DEFAULT_PAGE_LIMIT: u64 = 30;

/// Who may resolve a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolvePolicy {
    /// Any authenticated caller may resolve any request.
    #[default]
    AnyAuthenticated,

    /// Only the identity named as the request's target may resolve it.
    TargetOnly,
}

impl ResolvePolicy {
    /// Configuration name of the policy.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AnyAuthenticated => "any",
            Self::TargetOnly => "target",
        }
    }
}

impl fmt::Display for ResolvePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResolvePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "any" | "any_authenticated" => Ok(Self::AnyAuthenticated),
            "target" | "target_only" => Ok(Self::TargetOnly),
            _ => Err(format!("Unknown resolve policy: {s}")),
        }
    }
}

/// Request lifecycle configuration.
#[derive(Debug, Clone)]
pub struct LifecycleConfig {
    /// Who may resolve pending requests.
    ///
    /// Default: [`ResolvePolicy::AnyAuthenticated`]
    pub resolve_policy: ResolvePolicy,

    /// Page size applied when the caller's limit is absent or non-positive.
    ///
    /// Default: 30
    pub default_page_limit: u64,

    /// Upper bound on any single call into the request store.
    ///
    /// Default: 10 seconds
    pub operation_timeout: std::time::Duration,
}

impl LifecycleConfig {
    /// Create a lifecycle configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            resolve_policy: ResolvePolicy::AnyAuthenticated,
            default_page_limit: DEFAULT_PAGE_LIMIT,
            operation_timeout: std::time::Duration::from_secs(10),
        }
    }

    /// Set the resolve policy.
    #[must_use]
    pub const fn with_resolve_policy(mut self, policy: ResolvePolicy) -> Self {
        self.resolve_policy = policy;
        self
    }

    /// Set the default page limit. Zero is ignored.
    #[must_use]
    pub const fn with_default_page_limit(mut self, limit: u64) -> Self {
        if limit > 0 {
            self.default_page_limit = limit;
        }
        self
    }

    /// Set the operation timeout.
    #[must_use]
    pub const fn with_operation_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Credential signing and validation configuration.
#[derive(Clone)]
pub struct CredentialConfig {
    /// HMAC secret used to sign and verify credentials.
    pub signing_key: Vec<u8>,

    /// Lifetime of issued credentials.
    ///
    /// Default: 2 hours
    pub token_ttl: Duration,

    /// Upper bound on a single identity resolution.
    ///
    /// Default: 5 seconds
    pub resolve_timeout: std::time::Duration,
}

impl CredentialConfig {
    /// Create credential configuration.
    ///
    /// # Arguments
    ///
    /// * `signing_key` - HMAC secret shared with whoever issues credentials
    #[must_use]
    pub fn new(signing_key: impl Into<Vec<u8>>) -> Self {
        Self {
            signing_key: signing_key.into(),
            token_ttl: Duration::hours(2),
            resolve_timeout: std::time::Duration::from_secs(5),
        }
    }

    /// Set credential lifetime.
    #[must_use]
    pub const fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    /// Set the identity resolution timeout.
    #[must_use]
    pub const fn with_resolve_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.resolve_timeout = timeout;
        self
    }
}

// Keeps the secret out of logs.
impl fmt::Debug for CredentialConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialConfig")
            .field("signing_key", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("resolve_timeout", &self.resolve_timeout)
            .finish()
    }
}
