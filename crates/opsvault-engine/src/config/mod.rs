use opsvault_common::parsed::ParseMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OpsvaultConfig {
    /// Vault file location; defaults to `~/.opsvault/vault.json`.
    pub store_path: Option<PathBuf>,
    pub assist: AssistConfig,
    pub parse: ParseConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistConfig {
    pub model: String,
    /// Environment variable holding the API key. The key itself never lives
    /// in the config file.
    pub api_key_env: String,
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    pub default_mode: ParseMode,
}

impl OpsvaultConfig {
    pub fn store_path(&self) -> PathBuf {
        match &self.store_path {
            Some(path) => path.clone(),
            None => match dirs::home_dir() {
                Some(home) => home.join(".opsvault").join("vault.json"),
                None => PathBuf::from("opsvault-vault.json"),
            },
        }
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load from default locations:
    /// 1. ./opsvault.yaml
    /// 2. ~/.opsvault/config.yaml
    /// 3. Default configuration
    pub async fn load_default() -> Result<OpsvaultConfig, ConfigError> {
        let local_config = PathBuf::from("./opsvault.yaml");
        if local_config.exists() {
            return Self::load_from(&local_config).await;
        }

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".opsvault").join("config.yaml");
            if home_config.exists() {
                return Self::load_from(&home_config).await;
            }
        }

        Ok(OpsvaultConfig::default())
    }

    pub async fn load_from(path: &Path) -> Result<OpsvaultConfig, ConfigError> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: OpsvaultConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}
