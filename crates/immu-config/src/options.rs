//! Server options.
//!
//! [`ServerOptions`] is built once at startup: defaults, then builder calls,
//! then an optional environment overlay. After that it is only read.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::env::{self, non_empty, parse_bool, parse_port, EnvSource, ProcessEnv};
use crate::MtlsOptions;

/// Runtime options of an immudb server process.
///
/// # Example
///
/// ```
/// use immu_config::ServerOptions;
///
/// let options = ServerOptions::default()
///     .with_address("0.0.0.0")
///     .with_port(3323);
///
/// assert_eq!(options.bind(), "0.0.0.0:3323");
/// assert_eq!(options.metrics_bind(), "0.0.0.0:9497");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerOptions {
    /// Root directory for server state.
    #[serde(default = "default_dir")]
    pub dir: PathBuf,

    /// Listener transport family (`tcp`, `unix`, ...).
    #[serde(default = "default_network")]
    pub network: String,

    /// Host or interface the listeners attach to.
    #[serde(default = "default_address")]
    pub address: String,

    /// Port of the main service listener.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Port of the metrics listener, on the same address.
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,

    /// Name of the default database.
    #[serde(default = "default_db_name")]
    pub db_name: String,

    /// External configuration file, read by whoever parses it.
    #[serde(default = "default_config_file")]
    pub config_file: PathBuf,

    /// Require mutual TLS on the main listener.
    #[serde(default)]
    pub mtls: bool,

    /// Mutual TLS settings. Only meaningful while `mtls` is set.
    #[serde(default)]
    pub mtls_options: MtlsOptions,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            network: default_network(),
            address: default_address(),
            port: default_port(),
            metrics_port: default_metrics_port(),
            db_name: default_db_name(),
            config_file: default_config_file(),
            mtls: false,
            mtls_options: MtlsOptions::default(),
        }
    }
}

fn default_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_network() -> String {
    "tcp".to_string()
}

fn default_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3322
}

fn default_metrics_port() -> u16 {
    9497
}

fn default_db_name() -> String {
    "immudb".to_string()
}

fn default_config_file() -> PathBuf {
    PathBuf::from("configs/immucfg.yaml")
}

impl ServerOptions {
    /// Set the storage directory.
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }

    /// Set the transport family.
    pub fn with_network(mut self, network: impl Into<String>) -> Self {
        self.network = network.into();
        self
    }

    /// Set the listener address.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    /// Set the main listener port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the metrics listener port.
    pub fn with_metrics_port(mut self, metrics_port: u16) -> Self {
        self.metrics_port = metrics_port;
        self
    }

    /// Set the default database name.
    pub fn with_db_name(mut self, db_name: impl Into<String>) -> Self {
        self.db_name = db_name.into();
        self
    }

    /// Set the external configuration file.
    pub fn with_config_file(mut self, config_file: impl Into<PathBuf>) -> Self {
        self.config_file = config_file.into();
        self
    }

    /// Enable or disable mutual TLS.
    ///
    /// Disabling does not clear [`mtls_options`](Self::mtls_options).
    pub fn with_mtls(mut self, mtls: bool) -> Self {
        self.mtls = mtls;
        self
    }

    /// Set the mutual TLS settings.
    pub fn with_mtls_options(mut self, mtls_options: MtlsOptions) -> Self {
        self.mtls_options = mtls_options;
        self
    }

    /// `address:port` of the main listener.
    pub fn bind(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }

    /// `address:metrics_port` of the metrics listener.
    pub fn metrics_bind(&self) -> String {
        format!("{}:{}", self.address, self.metrics_port)
    }

    /// One-line summary, same as the [`Display`](fmt::Display) output.
    pub fn describe(&self) -> String {
        self.to_string()
    }

    /// Overlay environment variables from `source`.
    ///
    /// | Variable       | Field         | Rule                      |
    /// |----------------|---------------|---------------------------|
    /// | `IMMU_DIR`     | `dir`         | non-empty string          |
    /// | `IMMU_NETWORK` | `network`     | non-empty string          |
    /// | `IMMU_ADDRESS` | `address`     | non-empty string          |
    /// | `IMMU_PORT`    | `port`        | must parse as a `u16`     |
    /// | `IMMU_DBNAME`  | `db_name`     | non-empty string          |
    /// | `IMMU_CFGFILE` | `config_file` | non-empty string          |
    /// | `IMMU_MTLS`    | `mtls`        | must parse as a boolean   |
    ///
    /// Anything unset or malformed keeps its current value; this never fails.
    /// Ports outside `0..=65535` and negative ports count as malformed.
    /// Booleans must be one of `1 t T TRUE true True 0 f F FALSE false False`.
    /// If `mtls` is set afterwards, `mtls_options` is replaced by
    /// `MtlsOptions::default().apply_env(source)`. If it is not set,
    /// `mtls_options` is left untouched.
    ///
    /// # Example
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use immu_config::ServerOptions;
    ///
    /// let mut env = HashMap::new();
    /// env.insert("IMMU_PORT".to_string(), "4000".to_string());
    /// env.insert("IMMU_DBNAME".to_string(), "ledger".to_string());
    ///
    /// let options = ServerOptions::default().apply_env(&env);
    /// assert_eq!(options.port, 4000);
    /// assert_eq!(options.db_name, "ledger");
    /// ```
    pub fn apply_env(mut self, source: &impl EnvSource) -> Self {
        if let Some(dir) = non_empty(source.var(env::IMMU_DIR)) {
            debug!(var = env::IMMU_DIR, "applied environment override");
            self.dir = PathBuf::from(dir);
        }
        if let Some(network) = non_empty(source.var(env::IMMU_NETWORK)) {
            debug!(var = env::IMMU_NETWORK, "applied environment override");
            self.network = network;
        }
        if let Some(address) = non_empty(source.var(env::IMMU_ADDRESS)) {
            debug!(var = env::IMMU_ADDRESS, "applied environment override");
            self.address = address;
        }
        if let Some(port) = source.var(env::IMMU_PORT).as_deref().and_then(parse_port) {
            debug!(var = env::IMMU_PORT, "applied environment override");
            self.port = port;
        }
        if let Some(db_name) = non_empty(source.var(env::IMMU_DBNAME)) {
            debug!(var = env::IMMU_DBNAME, "applied environment override");
            self.db_name = db_name;
        }
        if let Some(config_file) = non_empty(source.var(env::IMMU_CFGFILE)) {
            debug!(var = env::IMMU_CFGFILE, "applied environment override");
            self.config_file = PathBuf::from(config_file);
        }
        if let Some(mtls) = source.var(env::IMMU_MTLS).as_deref().and_then(parse_bool) {
            debug!(var = env::IMMU_MTLS, "applied environment override");
            self.mtls = mtls;
        }

        if self.mtls {
            self.mtls_options = MtlsOptions::default().apply_env(source);
        }
        self
    }

    /// [`apply_env`](Self::apply_env) against the process environment.
    pub fn apply_process_env(self) -> Self {
        self.apply_env(&ProcessEnv)
    }
}

impl fmt::Display for ServerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{dir:{} network:{} address:{} port:{} metrics:{} name:{} config file:{} MTLs:{}}}",
            self.dir.display(),
            self.network,
            self.address,
            self.port,
            self.metrics_port,
            self.db_name,
            self.config_file.display(),
            self.mtls,
        )
    }
}
