//! Server options for immudb.
//!
//! This crate assembles the runtime options of a server process:
//! - Fixed defaults ([`ServerOptions::default`])
//! - Chainable `with_*` builders
//! - Derived bind addresses ([`ServerOptions::bind`], [`ServerOptions::metrics_bind`])
//! - An overlay of `IMMU_*` environment variables ([`ServerOptions::apply_env`])
//! - A layered [`OptionsLoader`] that adds dotenv files underneath the environment
//!
//! Values are assembled, not validated. Port ranges, path existence and the
//! contents of the mutual TLS files are checked by whoever opens listeners or
//! storage.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use immu_config::ServerOptions;
//!
//! let mut env = HashMap::new();
//! env.insert("IMMU_ADDRESS".to_string(), "0.0.0.0".to_string());
//! env.insert("IMMU_PORT".to_string(), "not-a-number".to_string());
//!
//! let options = ServerOptions::default()
//!     .with_db_name("ledger")
//!     .apply_env(&env);
//!
//! assert_eq!(options.bind(), "0.0.0.0:3322");
//! assert_eq!(
//!     options.to_string(),
//!     "{dir:. network:tcp address:0.0.0.0 port:3322 metrics:9497 name:ledger config file:configs/immucfg.yaml MTLs:false}"
//! );
//! ```
//!
//! # Environment Variables
//!
//! | Variable           | Target                        |
//! |--------------------|-------------------------------|
//! | `IMMU_DIR`         | `dir`                         |
//! | `IMMU_NETWORK`     | `network`                     |
//! | `IMMU_ADDRESS`     | `address`                     |
//! | `IMMU_PORT`        | `port`                        |
//! | `IMMU_DBNAME`      | `db_name`                     |
//! | `IMMU_CFGFILE`     | `config_file`                 |
//! | `IMMU_MTLS`        | `mtls`                        |
//! | `IMMU_SERVERNAME`  | `mtls_options.servername`     |
//! | `IMMU_PKEY`        | `mtls_options.pkey`           |
//! | `IMMU_CERTIFICATE` | `mtls_options.certificate`    |
//! | `IMMU_CLIENTCAS`   | `mtls_options.client_cas`     |
//!
//! The last four are only read when `mtls` resolves to `true`.

#![warn(missing_docs)]

pub mod env;
mod error;
mod loader;
mod mtls;
mod options;

pub use env::{EnvSource, Layered, ProcessEnv};
pub use error::{ConfigError, ConfigResult};
pub use loader::OptionsLoader;
pub use mtls::MtlsOptions;
pub use options::ServerOptions;
