use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{CapifyError, Result};
use crate::taxonomy::{Taxonomy, DEFAULT_CATEGORIES};

/// Top-level configuration for the capify bot.
///
/// Loaded from `~/.capify/config.toml` by default. Every section falls back
/// to its defaults when omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CapifyConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub presenter: PresenterConfig,
    #[serde(default)]
    pub taxonomy: TaxonomyConfig,
}

impl CapifyConfig {
    /// Read and parse `path`. Missing sections take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: CapifyConfig = toml::from_str(&content)?;
        info!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Chat transport settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Environment variable holding the bot token.
    pub token_env: String,
    /// Username the bot answers to, used to accept `/command@name` forms.
    pub username: Option<String>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token_env: "TG_CAPIFY".to_string(),
            username: None,
        }
    }
}

impl BotConfig {
    /// Read the bot token from the configured environment variable.
    ///
    /// A missing or blank variable is fatal at startup.
    pub fn credential(&self) -> Result<Credential> {
        match std::env::var(&self.token_env) {
            Ok(token) if !token.trim().is_empty() => Ok(Credential(token)),
            _ => Err(CapifyError::MissingCredential {
                var: self.token_env.clone(),
            }),
        }
    }
}

/// Bot session token. Never printed.
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    /// The raw token, for handing to the transport.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// Placeholders shown for fields the draft has not received yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresenterConfig {
    pub date_placeholder: String,
    pub amount_placeholder: i64,
    pub category_placeholder: String,
    pub subcategory_placeholder: String,
    pub description_placeholder: String,
}

impl Default for PresenterConfig {
    fn default() -> Self {
        Self {
            date_placeholder: "DD.MM.YYYY".to_string(),
            amount_placeholder: 0,
            category_placeholder: "Cat".to_string(),
            subcategory_placeholder: "Sub".to_string(),
            description_placeholder: String::new(),
        }
    }
}

/// Category registry as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxonomyConfig {
    /// Array of tables so declaration order survives parsing.
    pub categories: Vec<CategoryConfig>,
}

/// One category and its subcategories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub name: String,
    #[serde(default)]
    pub subcategories: Vec<String>,
}

impl Default for TaxonomyConfig {
    fn default() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES
                .iter()
                .map(|(name, subs)| CategoryConfig {
                    name: name.to_string(),
                    subcategories: subs.iter().map(|s| s.to_string()).collect(),
                })
                .collect(),
        }
    }
}

impl TaxonomyConfig {
    /// Validate and build the runtime registry.
    pub fn build(&self) -> Result<Taxonomy> {
        Taxonomy::new(
            self.categories
                .iter()
                .map(|c| (c.name.clone(), c.subcategories.clone())),
        )
    }
}
