use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use crate::error::{Error, Result};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Environment variables checked for the Gemini key, in order
pub const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Generator settings read from `config.json`. Talk credentials never live here.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Settings {
    pub gemini_api_key: Option<String>,
    pub gemini_model: Option<String>,
    pub gemini_base_url: Option<String>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| Error::Configuration(format!("could not read {}: {e}", path.display())))?;
        serde_json::from_str(&content)
            .map_err(|e| Error::Configuration(format!("invalid settings in {}: {e}", path.display())))
    }

    pub fn model(&self) -> &str {
        self.gemini_model.as_deref().unwrap_or(DEFAULT_GEMINI_MODEL)
    }

    pub fn base_url(&self) -> &str {
        self.gemini_base_url.as_deref().unwrap_or(DEFAULT_GEMINI_BASE_URL)
    }

    /// Gemini API key: env vars first, then the settings file
    pub fn resolve_api_key(&self) -> Result<String> {
        self.resolve_api_key_with(|name| std::env::var(name).ok())
    }

    fn resolve_api_key_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Result<String> {
        API_KEY_VARS
            .iter()
            .filter_map(|name| lookup(*name))
            .chain(self.gemini_api_key.clone())
            .find(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                Error::Configuration(format!(
                    "Gemini API key not set. Export {} or add gemini_api_key to {}",
                    API_KEY_VARS[0],
                    Self::get_config_path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|_| "config.json".to_string())
                ))
            })
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Configuration("Could not determine config directory".to_string()))?;

        Ok(config_dir.join("talkquote").join("config.json"))
    }
}
