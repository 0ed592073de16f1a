//! Mutual TLS settings.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::env::{self, non_empty, EnvSource};

/// File locations and server name used when mutual TLS is enabled.
///
/// The default value is empty. [`ServerOptions::apply_env`] replaces it with a
/// freshly overlaid value whenever mutual TLS resolves to enabled.
///
/// [`ServerOptions::apply_env`]: crate::ServerOptions::apply_env
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MtlsOptions {
    /// Server name presented to clients.
    pub servername: String,

    /// Private key file.
    pub pkey: String,

    /// Server certificate file.
    pub certificate: String,

    /// Bundle of CAs trusted to sign client certificates.
    pub client_cas: String,
}

impl MtlsOptions {
    /// Set the server name.
    pub fn with_servername(mut self, servername: impl Into<String>) -> Self {
        self.servername = servername.into();
        self
    }

    /// Set the private key file.
    pub fn with_pkey(mut self, pkey: impl Into<String>) -> Self {
        self.pkey = pkey.into();
        self
    }

    /// Set the certificate file.
    pub fn with_certificate(mut self, certificate: impl Into<String>) -> Self {
        self.certificate = certificate.into();
        self
    }

    /// Set the client CA bundle.
    pub fn with_client_cas(mut self, client_cas: impl Into<String>) -> Self {
        self.client_cas = client_cas.into();
        self
    }

    /// Overlay `IMMU_SERVERNAME`, `IMMU_PKEY`, `IMMU_CERTIFICATE` and
    /// `IMMU_CLIENTCAS`. Unset or empty variables keep the current value.
    pub fn apply_env(mut self, source: &impl EnvSource) -> Self {
        if let Some(servername) = non_empty(source.var(env::IMMU_SERVERNAME)) {
            debug!(var = env::IMMU_SERVERNAME, "applied environment override");
            self.servername = servername;
        }
        if let Some(pkey) = non_empty(source.var(env::IMMU_PKEY)) {
            debug!(var = env::IMMU_PKEY, "applied environment override");
            self.pkey = pkey;
        }
        if let Some(certificate) = non_empty(source.var(env::IMMU_CERTIFICATE)) {
            debug!(var = env::IMMU_CERTIFICATE, "applied environment override");
            self.certificate = certificate;
        }
        if let Some(client_cas) = non_empty(source.var(env::IMMU_CLIENTCAS)) {
            debug!(var = env::IMMU_CLIENTCAS, "applied environment override");
            self.client_cas = client_cas;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_default_is_empty() {
        let options = MtlsOptions::default();
        assert!(options.servername.is_empty());
        assert!(options.pkey.is_empty());
        assert!(options.certificate.is_empty());
        assert!(options.client_cas.is_empty());
    }

    #[test]
    fn test_builders() {
        let options = MtlsOptions::default()
            .with_servername("localhost")
            .with_pkey("server.key.pem")
            .with_certificate("server.cert.pem")
            .with_client_cas("ca-chain.cert.pem");

        assert_eq!(options.servername, "localhost");
        assert_eq!(options.pkey, "server.key.pem");
        assert_eq!(options.certificate, "server.cert.pem");
        assert_eq!(options.client_cas, "ca-chain.cert.pem");
    }

    #[test]
    fn test_apply_env_overlays_set_values() {
        let mut source = HashMap::new();
        source.insert("IMMU_SERVERNAME".to_string(), "db.internal".to_string());
        source.insert("IMMU_CLIENTCAS".to_string(), "/etc/immu/ca.pem".to_string());
        source.insert("IMMU_PKEY".to_string(), String::new());

        let options = MtlsOptions::default()
            .with_pkey("keep.key.pem")
            .apply_env(&source);

        assert_eq!(options.servername, "db.internal");
        assert_eq!(options.pkey, "keep.key.pem");
        assert_eq!(options.certificate, "");
        assert_eq!(options.client_cas, "/etc/immu/ca.pem");
    }
}
