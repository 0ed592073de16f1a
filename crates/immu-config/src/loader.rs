//! Layered options loader.
//!
//! This module provides the [`OptionsLoader`] for assembling [`ServerOptions`]
//! from defaults, dotenv files, and environment variables.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

use crate::env::{EnvSource, Layered, ProcessEnv};
use crate::{ConfigError, ConfigResult, ServerOptions};

/// Options loader with layered approach.
///
/// The loader applies options in layers, with later layers overriding
/// earlier ones:
/// 1. Default values, or a base passed to [`with_options`](Self::with_options)
/// 2. Dotenv files
/// 3. The environment (the process environment unless one is injected)
///
/// Dotenv entries are kept in memory and never exported to the process.
/// A variable set in the environment shadows the same dotenv entry.
///
/// # Example
///
/// ```no_run
/// use immu_config::OptionsLoader;
///
/// # fn main() -> Result<(), immu_config::ConfigError> {
/// let options = OptionsLoader::new()
///     .with_optional_dotenv_file(".env")?
///     .load();
///
/// println!("immudb will listen on: {}", options.bind());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct OptionsLoader<E = ProcessEnv> {
    options: ServerOptions,
    env: E,
    dotenv: HashMap<String, String>,
}

impl Default for OptionsLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl OptionsLoader {
    /// Create a loader over the process environment.
    pub fn new() -> Self {
        Self {
            options: ServerOptions::default(),
            env: ProcessEnv,
            dotenv: HashMap::new(),
        }
    }
}

impl<E: EnvSource> OptionsLoader<E> {
    /// Start from `options` instead of the defaults.
    ///
    /// # Example
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use immu_config::{OptionsLoader, ServerOptions};
    ///
    /// let options = OptionsLoader::new()
    ///     .with_env(HashMap::<String, String>::new())
    ///     .with_options(ServerOptions::default().with_port(3323))
    ///     .load();
    ///
    /// assert_eq!(options.port, 3323);
    /// ```
    pub fn with_options(mut self, options: ServerOptions) -> Self {
        self.options = options;
        self
    }

    /// Read variables from `env` instead of the process environment.
    pub fn with_env<F: EnvSource>(self, env: F) -> OptionsLoader<F> {
        OptionsLoader {
            options: self.options,
            env,
            dotenv: self.dotenv,
        }
    }

    /// Add the entries of a dotenv file.
    ///
    /// When several files define the same key, the file added last wins.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - The file does not exist
    /// - The file cannot be read
    /// - A line cannot be parsed
    pub fn with_dotenv_file<P: AsRef<Path>>(mut self, path: P) -> ConfigResult<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let entries = dotenvy::from_path_iter(path).map_err(|e| ConfigError::dotenv(path, e))?;
        for entry in entries {
            let (key, value) = entry.map_err(|e| ConfigError::dotenv(path, e))?;
            self.dotenv.insert(key, value);
        }

        debug!(path = %path.display(), "loaded dotenv file");
        Ok(self)
    }

    /// Add the entries of a dotenv file if it exists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be read or parsed.
    pub fn with_optional_dotenv_file<P: AsRef<Path>>(self, path: P) -> ConfigResult<Self> {
        if path.as_ref().exists() {
            self.with_dotenv_file(path)
        } else {
            Ok(self)
        }
    }

    /// Apply the environment overlay and return the options.
    pub fn load(self) -> ServerOptions {
        let source = Layered::new(&self.env, &self.dotenv);
        let options = self.options.apply_env(&source);

        info!(options = %options, "server options resolved");
        options
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::MtlsOptions;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn dotenv_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_loader_defaults() {
        let options = OptionsLoader::new().with_env(env(&[])).load();
        assert_eq!(options, ServerOptions::default());
    }

    #[test]
    fn test_loader_with_options() {
        let base = ServerOptions::default().with_db_name("ledger");
        let options = OptionsLoader::new()
            .with_env(env(&[]))
            .with_options(base.clone())
            .load();
        assert_eq!(options, base);
    }

    #[test]
    fn test_loader_applies_env() {
        let options = OptionsLoader::new()
            .with_env(env(&[("IMMU_ADDRESS", "0.0.0.0"), ("IMMU_PORT", "4000")]))
            .load();
        assert_eq!(options.bind(), "0.0.0.0:4000");
    }

    #[test]
    fn test_loader_with_dotenv_file() {
        let file = dotenv_file("IMMU_DBNAME=ledger\nIMMU_PORT=3323\n");

        let options = OptionsLoader::new()
            .with_env(env(&[]))
            .with_dotenv_file(file.path())
            .unwrap()
            .load();

        assert_eq!(options.db_name, "ledger");
        assert_eq!(options.port, 3323);
    }

    #[test]
    fn test_loader_env_shadows_dotenv() {
        let file = dotenv_file("IMMU_PORT=3323\nIMMU_DIR=/from/dotenv\n");

        let options = OptionsLoader::new()
            .with_env(env(&[("IMMU_PORT", "4000")]))
            .with_dotenv_file(file.path())
            .unwrap()
            .load();

        assert_eq!(options.port, 4000);
        assert_eq!(options.dir, std::path::PathBuf::from("/from/dotenv"));
    }

    #[test]
    fn test_loader_later_dotenv_wins() {
        let first = dotenv_file("IMMU_DBNAME=first\nIMMU_NETWORK=unix\n");
        let second = dotenv_file("IMMU_DBNAME=second\n");

        let options = OptionsLoader::new()
            .with_env(env(&[]))
            .with_dotenv_file(first.path())
            .unwrap()
            .with_dotenv_file(second.path())
            .unwrap()
            .load();

        assert_eq!(options.db_name, "second");
        assert_eq!(options.network, "unix");
    }

    #[test]
    fn test_loader_dotenv_mtls() {
        let file = dotenv_file("IMMU_MTLS=true\nIMMU_SERVERNAME=localhost\n");

        let options = OptionsLoader::new()
            .with_env(env(&[]))
            .with_dotenv_file(file.path())
            .unwrap()
            .load();

        assert!(options.mtls);
        assert_eq!(
            options.mtls_options,
            MtlsOptions::default().with_servername("localhost")
        );
    }

    #[test]
    fn test_loader_with_dotenv_file_not_found() {
        let result = OptionsLoader::new().with_dotenv_file("/nonexistent/.env");
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn test_loader_with_optional_dotenv_file_not_found() {
        let options = OptionsLoader::new()
            .with_env(env(&[]))
            .with_optional_dotenv_file("/nonexistent/.env")
            .unwrap()
            .load();

        assert_eq!(options, ServerOptions::default());
    }

    #[test]
    fn test_loader_with_malformed_dotenv_file() {
        let file = dotenv_file("IMMU_PORT=3323\nthis line is not an assignment\n");

        let result = OptionsLoader::new().with_dotenv_file(file.path());
        assert!(matches!(result, Err(ConfigError::Dotenv { .. })));
    }
}
