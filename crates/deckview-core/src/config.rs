use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_USERS_API: &str =
    "https://my-json-server.typicode.com/DannieLudens/Sistemas-Interactivos-distribuidos";
pub const DEFAULT_CHARACTER_API: &str = "https://rickandmortyapi.com/api/character";

pub const USERS_API_ENV: &str = "DECKVIEW_USERS_API";
pub const CHARACTER_API_ENV: &str = "DECKVIEW_CHARACTER_API";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Base of the user directory API; users live at `<users_api>/users`
    pub users_api: String,
    /// Base of the character API; characters live at `<character_api>/<id>`
    pub character_api: String,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            users_api: DEFAULT_USERS_API.to_string(),
            character_api: DEFAULT_CHARACTER_API.to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Load the config file, writing the defaults first on a fresh install,
    /// then apply env overrides
    pub fn load() -> Result<Self> {
        let config = Self::load_or_init(&Self::config_path()?)?;
        Ok(config.with_overrides(|key| std::env::var(key).ok()))
    }

    /// Like [`Config::load_from`], but a missing file is created with the
    /// defaults so there is something to edit
    pub fn load_or_init(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load_from(path);
        }

        let config = Self::default();
        config
            .save_to(path)
            .with_context(|| format!("Failed to write default config {:?}", path))?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config {:?}", path))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Environment wins over the file. `lookup` is `std::env::var` outside tests.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(USERS_API_ENV).filter(|v| !v.trim().is_empty()) {
            self.users_api = url;
        }
        if let Some(url) = lookup(CHARACTER_API_ENV).filter(|v| !v.trim().is_empty()) {
            self.character_api = url;
        }
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("deckview").join("config.json"))
    }
}
