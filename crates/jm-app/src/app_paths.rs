use std::path::PathBuf;

use jm_core::app_dirs::AppDirs;

pub const DEFAULT_SESSION_FILE_NAME: &str = "session.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub session_file: PathBuf,
    pub logs_dir: PathBuf,
}

impl AppPaths {
    pub fn from_app_dirs(dirs: &AppDirs) -> Self {
        Self {
            session_file: dirs.app_data_root.join(DEFAULT_SESSION_FILE_NAME),
            logs_dir: dirs.app_data_root.join("logs"),
        }
    }

    /// Replaces the session file name; an empty name keeps the default.
    pub fn with_session_file_name(mut self, name: &str) -> Self {
        if !name.is_empty() {
            self.session_file.set_file_name(name);
        }
        self
    }
}
