//! Frontend configuration.
//!
//! Loaded from a JSON file or from the environment:
//! - `GAST_FRONTEND`: parser program (required)
//! - `GAST_FRONTEND_ARGS`: whitespace-separated arguments placed before the mode tag
//! - `GAST_SCHEMA_VERSION`: schema the program emits (default `3.8`)

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{GastError, Result};
use crate::frontend::Mode;
use crate::translate::SchemaVersion;

pub const FRONTEND_VAR: &str = "GAST_FRONTEND";
pub const FRONTEND_ARGS_VAR: &str = "GAST_FRONTEND_ARGS";
pub const SCHEMA_VERSION_VAR: &str = "GAST_SCHEMA_VERSION";

/// How to run the external parser.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FrontendConfig {
    /// Schema of the trees the program prints, unless they carry a `"_version"` tag.
    #[serde(default)]
    pub version: SchemaVersion,
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    /// Mode used when the caller does not pick one.
    #[serde(default)]
    pub mode: Mode,
}

impl FrontendConfig {
    pub fn new(program: impl Into<String>, version: SchemaVersion) -> Self {
        FrontendConfig {
            version,
            program: program.into(),
            args: Vec::new(),
            mode: Mode::default(),
        }
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config: FrontendConfig = serde_json::from_str(&text)?;
        config.validate()?;
        debug!("Loaded frontend config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the variables through `lookup`, so callers and tests need not touch
    /// the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let program = lookup(FRONTEND_VAR)
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .ok_or_else(|| GastError::Config(format!("{} is not set", FRONTEND_VAR)))?;
        let args = lookup(FRONTEND_ARGS_VAR)
            .map(|a| a.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();
        let version = match lookup(SCHEMA_VERSION_VAR) {
            Some(tag) => tag.parse()?,
            None => {
                warn!("{} not set, assuming schema {}", SCHEMA_VERSION_VAR, SchemaVersion::default());
                SchemaVersion::default()
            }
        };
        Ok(FrontendConfig {
            version,
            program,
            args,
            mode: Mode::default(),
        })
    }

    fn validate(&self) -> Result<()> {
        if self.program.trim().is_empty() {
            return Err(GastError::Config("frontend program is empty".to_string()));
        }
        Ok(())
    }
}
