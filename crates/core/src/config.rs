use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_u32(profile: &str, key: &str, default: u32) -> u32 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_usize(profile: &str, key: &str, default: usize) -> usize {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Top-level settings ────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Active profile name (empty = default).
    pub profile: String,
    pub selection: SelectionSettings,
    pub batch: BatchSettings,
}

impl Settings {
    /// Build settings from environment variables (call `load_dotenv()` first).
    /// Profile is read from `SELECTION_PROFILE`. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("SELECTION_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build settings for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            selection: SelectionSettings::from_env_profiled(p),
            batch: BatchSettings::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Settings loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  selection:   default_config={}, config_dir={}, default_days={}",
            self.selection
                .default_config_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(built-in)".to_string()),
            self.selection.config_dir.display(),
            self.selection.default_days,
        );
        tracing::info!("  batch:       threads={}", self.batch.threads);
    }

    /// Return a view safe for API responses.
    pub fn summary(&self) -> serde_json::Value {
        serde_json::json!({
            "profile": self.profile_label(),
            "selection": {
                "default_config": self.selection.default_config_path,
                "config_dir": self.selection.config_dir,
                "default_days": self.selection.default_days,
            },
            "batch": { "threads": self.batch.threads },
        })
    }
}

// ── Selection configs ─────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionSettings {
    /// Overrides the built-in default selection config when set.
    pub default_config_path: Option<PathBuf>,
    /// Directory holding per-user selection configs (`<user>.yml` / `.json`).
    pub config_dir: PathBuf,
    /// Window size used when a request omits `days`.
    pub default_days: u32,
}

impl SelectionSettings {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            default_config_path: profiled_env_opt(p, "SELECTION_DEFAULT_CONFIG").map(PathBuf::from),
            config_dir: PathBuf::from(profiled_env_or(p, "SELECTION_CONFIG_DIR", "data/selection/users")),
            default_days: profiled_env_u32(p, "SELECTION_DEFAULT_DAYS", 7),
        }
    }
}

// ── Batch analysis ────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSettings {
    /// Worker threads for batch analysis; 0 lets rayon pick.
    pub threads: usize,
}

impl BatchSettings {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            threads: profiled_env_usize(p, "SELECTION_BATCH_THREADS", 0),
        }
    }
}
