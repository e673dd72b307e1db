//! Default data directory for the shell.
//!
//! Used only when `[storage] data_dir` is empty. The directory is
//! `<platform local data dir>/jobmarket`, or `jobmarket-<profile>` when a
//! profile is set, so two accounts on one machine keep separate sessions.

use std::path::PathBuf;

use jm_core::{
    app_dirs::AppDirs,
    ports::{AppDirsError, AppDirsPort},
};

const APP_DIR_NAME: &str = "jobmarket";
const PROFILE_ENV: &str = "JOBMARKET_PROFILE";

#[derive(Debug, Clone, Default)]
pub struct PlatformAppDirs {
    base: Option<PathBuf>,
    profile: Option<String>,
}

impl PlatformAppDirs {
    /// The platform data directory, with the profile taken from
    /// `JOBMARKET_PROFILE`.
    pub fn from_env() -> Self {
        Self {
            base: dirs::data_local_dir(),
            profile: std::env::var(PROFILE_ENV).ok(),
        }
    }

    /// Resolves under `base` instead of the platform directory.
    pub fn at(base: impl Into<PathBuf>) -> Self {
        Self {
            base: Some(base.into()),
            profile: None,
        }
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    fn dir_name(&self) -> String {
        match self.profile.as_deref() {
            Some(profile) if !profile.is_empty() => format!("{APP_DIR_NAME}-{profile}"),
            _ => APP_DIR_NAME.to_string(),
        }
    }
}

impl AppDirsPort for PlatformAppDirs {
    fn get_app_dirs(&self) -> Result<AppDirs, AppDirsError> {
        let base = self
            .base
            .as_ref()
            .ok_or(AppDirsError::DataLocalDirUnavailable)?;

        Ok(AppDirs {
            app_data_root: base.join(self.dir_name()),
        })
    }
}
