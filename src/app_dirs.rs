use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "keyrace";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    fn project() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", APP_NAME)
    }

    /// Run history database under `$HOME/.local/state/keyrace`.
    pub fn history_db_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join(APP_NAME);
            Some(state_dir.join("history.db"))
        } else {
            Self::project().map(|proj_dirs| proj_dirs.data_local_dir().join("history.db"))
        }
    }

    /// Directory holding best-result records, one file per storage key.
    pub fn best_record_dir() -> Option<PathBuf> {
        Self::project().map(|proj_dirs| proj_dirs.data_dir().to_path_buf())
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::project().map(|proj_dirs| proj_dirs.config_dir().join("config.json"))
    }
}
