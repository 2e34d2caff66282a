//! `storyweld.toml` project configuration

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use storyweld::{ScriptDialect, TransformOptions};

/// Default configuration file name, looked up in the working directory
pub const CONFIG_FILE: &str = "storyweld.toml";

/// Settings read from the configuration file
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Script grammar (`tsx`, `ts`, `babel`, `flow`, ...)
    pub parser: Option<String>,
    /// Import source to rewrite away from
    pub legacy_package: Option<String>,
    /// Import source to rewrite to
    pub blocks_package: Option<String>,
}

impl ProjectConfig {
    /// Load from `path`
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    /// Load an explicitly named file, or `storyweld.toml` from `dir` when it
    /// exists
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let path = dir.join(CONFIG_FILE);
                if path.is_file() {
                    Self::load(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Build transform options; `parser` overrides the configured grammar
    pub fn transform_options(&self, parser: Option<&str>) -> Result<TransformOptions> {
        let mut options = TransformOptions::new();
        if let Some(name) = parser.or(self.parser.as_deref()) {
            let dialect: ScriptDialect = name.parse()?;
            options = options.dialect(dialect);
        }
        if let Some(package) = &self.legacy_package {
            options = options.legacy_package(package.as_str());
        }
        if let Some(package) = &self.blocks_package {
            options = options.blocks_package(package.as_str());
        }
        Ok(options)
    }
}
