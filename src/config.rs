use crate::analysis::ExtensionTable;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::warn;

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "noweb-figures.toml";

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub figure: FigureConfig,
    /// Extra suffix → language tag entries, tried after the built-in ones
    pub languages: BTreeMap<String, String>,
}

/// Markup used for rewritten code chunks
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    /// Float placement, as in `\begin{figure}[H]`
    pub placement: String,
    /// Listing environment name
    pub environment: String,
    /// Listing environment options
    pub options: String,
    /// Text printed before the cross-reference on `@use` lines
    pub reference_prefix: String,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            placement: "H".to_string(),
            environment: "minted".to_string(),
            options: "fontsize=\\footnotesize,frame=lines,mathescape".to_string(),
            reference_prefix: "// insert".to_string(),
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from file or return defaults
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        Self::load(path).unwrap_or_else(|e| {
            warn!(path = %path.display(), "ignoring config file: {}", e);
            Self::default()
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let env = &self.figure.environment;
        if env.is_empty() || !env.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(Error::config_validation(
                "figure.environment must be a non-empty alphanumeric name",
            ));
        }

        for (suffix, tag) in &self.languages {
            if !suffix.starts_with('.') || suffix.len() < 2 {
                return Err(Error::config_validation(format!(
                    "language suffix '{}' must look like '.ext'",
                    suffix
                )));
            }
            if tag.trim().is_empty() || tag.contains(char::is_whitespace) {
                return Err(Error::config_validation(format!(
                    "language tag for '{}' must be a single word",
                    suffix
                )));
            }
        }

        Ok(())
    }

    /// Built-in extension table extended with `[languages]`
    pub fn extension_table(&self) -> ExtensionTable {
        ExtensionTable::builtin().with_extra(&self.languages)
    }
}
