//! Environment variable lookup.
//!
//! Every overlay in this crate reads variables through the [`EnvSource`] trait
//! rather than calling `std::env` directly, so callers can substitute a
//! synthetic environment (a `HashMap`, a dotenv file layered under the process
//! environment, ...) without touching process state.

use std::collections::HashMap;
use std::env;

/// Storage directory for server state.
pub const IMMU_DIR: &str = "IMMU_DIR";
/// Listener transport family (`tcp`, `unix`, ...).
pub const IMMU_NETWORK: &str = "IMMU_NETWORK";
/// Listener host or interface.
pub const IMMU_ADDRESS: &str = "IMMU_ADDRESS";
/// Listener port.
pub const IMMU_PORT: &str = "IMMU_PORT";
/// Default database name.
pub const IMMU_DBNAME: &str = "IMMU_DBNAME";
/// External configuration file location.
pub const IMMU_CFGFILE: &str = "IMMU_CFGFILE";
/// Mutual TLS toggle.
pub const IMMU_MTLS: &str = "IMMU_MTLS";
/// Server name presented for mutual TLS.
pub const IMMU_SERVERNAME: &str = "IMMU_SERVERNAME";
/// Private key file for mutual TLS.
pub const IMMU_PKEY: &str = "IMMU_PKEY";
/// Certificate file for mutual TLS.
pub const IMMU_CERTIFICATE: &str = "IMMU_CERTIFICATE";
/// Client CA bundle for mutual TLS.
pub const IMMU_CLIENTCAS: &str = "IMMU_CLIENTCAS";

/// A key-value source of environment variables.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use immu_config::EnvSource;
///
/// let mut env = HashMap::new();
/// env.insert("IMMU_PORT".to_string(), "3323".to_string());
///
/// assert_eq!(env.var("IMMU_PORT").as_deref(), Some("3323"));
/// assert_eq!(env.var("IMMU_DIR"), None);
/// ```
pub trait EnvSource {
    /// Look up a variable. `None` means the variable is not set.
    fn var(&self, key: &str) -> Option<String>;
}

impl<T: EnvSource + ?Sized> EnvSource for &T {
    fn var(&self, key: &str) -> Option<String> {
        (**self).var(key)
    }
}

/// The real process environment.
///
/// Values that are not valid UTF-8 are reported as unset.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Two sources stacked on top of each other.
///
/// `primary` is consulted first; `fallback` only answers for keys the primary
/// does not set at all. An empty value in `primary` still shadows `fallback`.
#[derive(Debug, Clone, Default)]
pub struct Layered<A, B> {
    primary: A,
    fallback: B,
}

impl<A, B> Layered<A, B> {
    /// Stack `primary` over `fallback`.
    pub fn new(primary: A, fallback: B) -> Self {
        Self { primary, fallback }
    }
}

impl<A: EnvSource, B: EnvSource> EnvSource for Layered<A, B> {
    fn var(&self, key: &str) -> Option<String> {
        self.primary.var(key).or_else(|| self.fallback.var(key))
    }
}

/// Keep a string value only if it is non-empty.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Parse a port number. Surrounding whitespace is not accepted.
pub(crate) fn parse_port(value: &str) -> Option<u16> {
    value.parse().ok()
}

/// Parse a boolean from a string.
///
/// Only the exact spellings below are accepted; mixed case such as `tRuE`
/// and words like `yes` or `off` are rejected.
pub(crate) fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
