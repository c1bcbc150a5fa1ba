//! Compile options.
//!
//! Options can be loaded from:
//! 1. YAML files or strings
//! 2. Environment variables (with the `TESSERA_` prefix)
//!
//! Precedence, highest first: environment variables, the YAML document,
//! default values.

use serde::{Deserialize, Serialize};
use std::path::Path;

use tessera_ir::LinearFunction;

/// Options controlling how a block graph is compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileOptions {
    /// Rounds of syndrome extraction per block, as a function of `k`.
    #[serde(default = "default_rounds")]
    pub rounds: LinearFunction,

    /// Build blocks on the rayon thread pool.
    #[serde(default = "default_true")]
    pub parallel: bool,

    /// Search correlation surfaces when the caller supplies none.
    #[serde(default = "default_true")]
    pub find_observables: bool,
}

// Default value functions
fn default_rounds() -> LinearFunction {
    LinearFunction::new(2, -1)
}

fn default_true() -> bool {
    true
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            rounds: default_rounds(),
            parallel: default_true(),
            find_observables: default_true(),
        }
    }
}

impl CompileOptions {
    /// Parse options from a YAML document.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let options: CompileOptions =
            serde_yaml_ng::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_yaml_str(&contents)
    }

    /// Load options with the following precedence:
    /// 1. Load from file if provided
    /// 2. Apply environment variable overrides
    pub fn load(config_file: Option<&str>) -> Result<Self, ConfigError> {
        let options = if let Some(path) = config_file {
            Self::from_file(path)?
        } else {
            CompileOptions::default()
        };
        let options = options.apply_env_overrides();
        options.validate()?;
        Ok(options)
    }

    /// Override fields from `TESSERA_PARALLEL` and
    /// `TESSERA_FIND_OBSERVABLES`.
    ///
    /// Unset or unparsable variables leave the field unchanged.
    #[must_use]
    pub fn apply_env_overrides(self) -> Self {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    #[must_use]
    fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = lookup("TESSERA_PARALLEL") {
            if let Ok(val) = v.parse() {
                self.parallel = val;
            }
        }
        if let Some(v) = lookup("TESSERA_FIND_OBSERVABLES") {
            if let Ok(val) = v.parse() {
                self.find_observables = val;
            }
        }
        self
    }

    /// Validate option values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rounds.slope < 0 {
            return Err(ConfigError::ValidationError(format!(
                "rounds must not decrease with k, got {}",
                self.rounds
            )));
        }
        if self.rounds.eval(1) < 1 {
            return Err(ConfigError::ValidationError(format!(
                "rounds must be at least 1 at k = 1, got {}",
                self.rounds
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn with_rounds(mut self, rounds: LinearFunction) -> Self {
        self.rounds = rounds;
        self
    }

    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    #[must_use]
    pub fn with_observables(mut self, find_observables: bool) -> Self {
        self.find_observables = find_observables;
        self
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
