use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::orchestrator::RunSettings;
use crate::core::relocation::MoveOrder;
use crate::core::resolver::QuarantineRoots;
use crate::error::{LpqError, Result};

/// Connection settings for the remote FTP store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Deadline for connecting and for each control-channel operation
    pub timeout_secs: u64,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            host: "192.168.1.56".to_string(),
            port: 5000,
            user: "anonymous".to_string(),
            password: "anonymous".to_string(),
            timeout_secs: 30,
        }
    }
}

impl RemoteSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub remote: RemoteSettings,
    /// Simulate moves without touching the store (the playlist backup is still written)
    pub dry_run: bool,
    pub playlist_path: String,
    pub quarantine_prefix: String,
    pub thumbnails_root: String,
    /// Directory receiving general.log, error.log and processed.log
    pub log_dir: String,
    pub move_order: MoveOrder,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            remote: RemoteSettings::default(),
            dry_run: true,
            playlist_path: "/retroarch/playlists/delete.lpl".to_string(),
            quarantine_prefix: "/del".to_string(),
            thumbnails_root: "/retroarch/thumbnails".to_string(),
            log_dir: ".".to_string(),
            move_order: MoveOrder::default(),
        }
    }
}

impl Config {
    /// Load from the default location, falling back to defaults when the file is absent
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config file at {:?}, using defaults", path);
            return Ok(Config::default());
        }

        let data = fs::read(path)?;

        // An empty file is treated like a missing one
        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(Config::default());
        }

        serde_json::from_slice(&data)
            .map_err(|e| LpqError::config(format!("Failed to parse {:?}: {}", path, e)))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let data = serde_json::to_vec_pretty(self)?;
        fs::write(path, data)?;

        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| LpqError::config("Could not determine config directory"))?;

        Ok(config_dir.join("lpq").join("config.json"))
    }

    /// Reject settings that would make destinations escape the quarantine area
    pub fn validate(&self) -> Result<()> {
        if self.remote.host.trim().is_empty() {
            return Err(LpqError::config("remote.host must not be empty"));
        }
        if self.remote.port == 0 {
            return Err(LpqError::config("remote.port must not be 0"));
        }

        check_absolute("playlist_path", &self.playlist_path, false)?;
        check_absolute("quarantine_prefix", &self.quarantine_prefix, true)?;
        check_absolute("thumbnails_root", &self.thumbnails_root, true)?;

        if self.log_dir.trim().is_empty() {
            return Err(LpqError::config("log_dir must not be empty"));
        }

        Ok(())
    }

    pub fn roots(&self) -> QuarantineRoots {
        QuarantineRoots::new(&self.quarantine_prefix, &self.thumbnails_root)
    }

    pub fn run_settings(&self) -> RunSettings {
        RunSettings {
            playlist_path: self.playlist_path.clone(),
            roots: self.roots(),
            dry_run: self.dry_run,
            move_order: self.move_order,
        }
    }
}

fn check_absolute(field: &str, value: &str, reject_root: bool) -> Result<()> {
    if !value.starts_with('/') {
        return Err(LpqError::config(format!(
            "{} must be an absolute remote path, got '{}'",
            field, value
        )));
    }
    if reject_root && value.trim_end_matches('/').is_empty() {
        return Err(LpqError::config(format!("{} must not be '/'", field)));
    }
    Ok(())
}
