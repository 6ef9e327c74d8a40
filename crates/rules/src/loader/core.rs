//! Core [`ConfigStore`] struct: filesystem-backed per-user configs with optional hot-reload.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, info, warn};

use selection_core::config::SelectionSettings;
use selection_core::{Result, SelectionError};

use crate::schema::SelectionConfig;

use super::error::{LoadResult, LoadStatus};
use super::watcher::handle_fs_event;

/// Built-in default selection config.
pub const DEFAULT_CONFIG_YAML: &str = include_str!("../../../../data/selection/default-config.yml");

/// Parse the built-in default selection config.
pub fn builtin_default() -> Result<SelectionConfig> {
    SelectionConfig::from_yaml_str(DEFAULT_CONFIG_YAML)
}

/// User ids double as file stems: ASCII alphanumerics, `-` and `_` only.
pub fn is_valid_user_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

pub(super) type UserConfigs = Arc<RwLock<HashMap<String, Arc<SelectionConfig>>>>;

/// Per-user selection configs with a process-wide default fallback.
///
/// Configs are immutable once loaded; updates replace the whole entry, so
/// a caller holding an `Arc<SelectionConfig>` keeps evaluating against the
/// version it resolved.
pub struct ConfigStore {
    /// Directory containing `<user>.{yml,yaml,json}` files.
    config_dir: PathBuf,
    default_config: Arc<SelectionConfig>,
    user_configs: UserConfigs,
    /// Active filesystem watcher (held to keep it alive).
    _watcher: Option<RecommendedWatcher>,
}

impl ConfigStore {
    pub fn new(config_dir: PathBuf, default_config: SelectionConfig) -> Self {
        Self {
            config_dir,
            default_config: Arc::new(default_config),
            user_configs: Arc::new(RwLock::new(HashMap::new())),
            _watcher: None,
        }
    }

    /// Store with the built-in default config.
    pub fn with_builtin_default(config_dir: PathBuf) -> Result<Self> {
        Ok(Self::new(config_dir, builtin_default()?))
    }

    /// Build a store from settings: the default comes from
    /// `default_config_path` when set, otherwise the built-in one.
    pub fn from_settings(settings: &SelectionSettings) -> Result<Self> {
        let default_config = match &settings.default_config_path {
            Some(path) => {
                info!(path = %path.display(), "loading default selection config");
                Self::load_file(path)?
            }
            None => builtin_default()?,
        };
        Ok(Self::new(settings.config_dir.clone(), default_config))
    }

    /// Scan the config directory and load every user config.
    ///
    /// Dotfiles and unsupported extensions are skipped. Parse errors are
    /// reported per-file but do not abort the scan. A missing directory
    /// loads nothing.
    pub fn load_all(&self) -> Result<Vec<LoadResult>> {
        let mut results = Vec::new();

        let entries = match fs::read_dir(&self.config_dir) {
            Ok(e) => e,
            Err(e) => {
                warn!(path = %self.config_dir.display(), error = %e, "failed to read config directory");
                return Ok(results);
            }
        };

        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if path.is_dir() {
                continue;
            }

            let user = match user_for_path(&path) {
                Ok(user) => user,
                Err(reason) => {
                    results.push(LoadResult {
                        path,
                        status: LoadStatus::Skipped { reason },
                    });
                    continue;
                }
            };

            match Self::load_file(&path) {
                Ok(config) => {
                    info!(
                        user = %user,
                        rules = config.rules.len(),
                        overall_rules = config.overall_rules.len(),
                        path = %path.display(),
                        "loaded selection config"
                    );
                    self.upsert(user.clone(), config);
                    results.push(LoadResult {
                        path,
                        status: LoadStatus::Loaded { user },
                    });
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to load selection config");
                    results.push(LoadResult {
                        path,
                        status: LoadStatus::Failed {
                            error: e.to_string(),
                        },
                    });
                }
            }
        }

        Ok(results)
    }

    /// Parse a single config file; the format follows the extension.
    pub fn load_file(path: &Path) -> Result<SelectionConfig> {
        let contents = fs::read_to_string(path)?;
        match extension(path) {
            Some("json") => SelectionConfig::from_json_str(&contents),
            _ => SelectionConfig::from_yaml_str(&contents),
        }
    }

    /// Replace a user's in-memory config without touching the directory.
    pub fn upsert(&self, user: impl Into<String>, config: SelectionConfig) {
        insert_config(&self.user_configs, user.into(), config);
    }

    /// Drop a user's in-memory config; the user reverts to the default.
    pub fn remove(&self, user: &str) -> Option<Arc<SelectionConfig>> {
        self.user_configs
            .write()
            .expect("user_configs lock poisoned")
            .remove(user)
    }

    pub fn default_config(&self) -> Arc<SelectionConfig> {
        Arc::clone(&self.default_config)
    }

    /// The user's own config, if one is stored.
    pub fn get(&self, user: &str) -> Option<Arc<SelectionConfig>> {
        self.user_configs
            .read()
            .expect("user_configs lock poisoned")
            .get(user)
            .cloned()
    }

    /// The config to evaluate with: the user's own, or the default.
    pub fn resolve(&self, user: Option<&str>) -> Arc<SelectionConfig> {
        match user.and_then(|u| self.get(u)) {
            Some(config) => config,
            None => {
                debug!(user = user.unwrap_or("(anonymous)"), "using default selection config");
                self.default_config()
            }
        }
    }

    /// Users with a stored config, sorted.
    pub fn users(&self) -> Vec<String> {
        let mut users: Vec<String> = self
            .user_configs
            .read()
            .expect("user_configs lock poisoned")
            .keys()
            .cloned()
            .collect();
        users.sort();
        users
    }

    /// Start a filesystem watcher with 500ms debounce.
    ///
    /// On file create/modify the config is re-parsed and replaced.
    /// On file delete the user falls back to the default.
    /// Parse errors are logged as warnings; the previous version is kept.
    pub fn watch(&mut self) -> Result<()> {
        let user_configs = Arc::clone(&self.user_configs);

        let mut watcher = notify::recommended_watcher(move |res: std::result::Result<notify::Event, notify::Error>| {
            match res {
                Ok(event) => handle_fs_event(&event, &user_configs),
                Err(e) => warn!(error = %e, "filesystem watcher error"),
            }
        })
        .map_err(watch_error)?;

        watcher
            .watch(&self.config_dir, RecursiveMode::NonRecursive)
            .map_err(watch_error)?;

        let _ = watcher.configure(notify::Config::default().with_poll_interval(Duration::from_millis(500)));

        info!(path = %self.config_dir.display(), "watching selection config directory for changes");
        self._watcher = Some(watcher);
        Ok(())
    }

    /// Directory scanned for `<user>.yml|yaml|json` files.
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Atomically write a user's config as YAML and store it.
    ///
    /// Writes to a `.tmp` file first, then renames to the final path to
    /// avoid partial writes on crash. Any JSON file for the same user is
    /// removed so the YAML file is the single source.
    pub fn save(&self, user: &str, config: SelectionConfig) -> Result<PathBuf> {
        ensure_user_id(user)?;
        fs::create_dir_all(&self.config_dir)?;

        let final_path = self.config_dir.join(format!("{}.yml", user));
        let tmp_path = self.config_dir.join(format!(".{}.tmp", user));

        fs::write(&tmp_path, config.to_yaml()?)?;
        fs::rename(&tmp_path, &final_path)?;

        let json_path = self.config_dir.join(format!("{}.json", user));
        if json_path.exists() {
            fs::remove_file(&json_path)?;
        }

        info!(user = %user, path = %final_path.display(), "wrote selection config");
        self.upsert(user, config);
        Ok(final_path)
    }

    /// Delete a user's config file(s); the user reverts to the default.
    pub fn delete(&self, user: &str) -> Result<()> {
        ensure_user_id(user)?;

        let mut removed = false;
        for ext in ["yml", "yaml", "json"] {
            let path = self.config_dir.join(format!("{}.{}", user, ext));
            if path.exists() {
                fs::remove_file(&path)?;
                removed = true;
            }
        }

        if !removed {
            return Err(SelectionError::Other(format!(
                "no selection config found for user '{}'",
                user
            )));
        }

        self.remove(user);
        info!(user = %user, "deleted selection config");
        Ok(())
    }
}

pub(super) fn insert_config(user_configs: &UserConfigs, user: String, config: SelectionConfig) {
    user_configs
        .write()
        .expect("user_configs lock poisoned")
        .insert(user, Arc::new(config));
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|e| e.to_str())
}

/// Derive the user id from a config file path, or the reason to skip it.
pub(super) fn user_for_path(path: &Path) -> std::result::Result<String, String> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| "non UTF-8 file name".to_string())?;
    if name.starts_with('.') {
        return Err("dotfile".to_string());
    }
    if !matches!(extension(path), Some("yml" | "yaml" | "json")) {
        return Err("not a YAML or JSON file".to_string());
    }
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    if !is_valid_user_id(stem) {
        return Err(format!("'{}' is not a valid user id", stem));
    }
    Ok(stem.to_string())
}

fn ensure_user_id(user: &str) -> Result<()> {
    if is_valid_user_id(user) {
        Ok(())
    } else {
        Err(SelectionError::Other(format!("invalid user id '{}'", user)))
    }
}

fn watch_error(e: notify::Error) -> SelectionError {
    SelectionError::Other(format!("config watcher error: {}", e))
}
