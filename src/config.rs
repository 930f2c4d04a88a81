use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::engine::EngineOptions;
use crate::error::StoreResult;
use crate::session::{clamp_seed_size, clamp_time_limit, Mode, DEFAULT_SEED_SIZE, DEFAULT_TIME_LIMIT};

/// Persisted settings for the next session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub time_limit: u32,
    pub mode: Mode,
    pub seed_size: usize,
    pub storage_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            time_limit: DEFAULT_TIME_LIMIT,
            mode: Mode::default(),
            seed_size: DEFAULT_SEED_SIZE,
            storage_key: "best".to_string(),
        }
    }
}

impl From<&Config> for EngineOptions {
    fn from(cfg: &Config) -> Self {
        Self {
            time_limit: clamp_time_limit(cfg.time_limit),
            mode: cfg.mode,
            seed_size: clamp_seed_size(cfg.seed_size),
            word_pool: None,
            storage_key: cfg.storage_key.clone(),
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> StoreResult<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("keyrace_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => return cfg,
                Err(err) => {
                    tracing::warn!(path = %self.path.display(), %err, "ignoring malformed config")
                }
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}
