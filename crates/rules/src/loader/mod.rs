//! Per-user selection config store with hot-reload via `notify` watcher.
//!
//! Holds the process-wide default config plus one config per user, loaded
//! from `<user>.yml` / `<user>.yaml` / `<user>.json` files in a directory.
//! Users without a config of their own resolve to the default.

mod core;
mod error;
mod watcher;


pub use self::core::{builtin_default, is_valid_user_id, ConfigStore, DEFAULT_CONFIG_YAML};
pub use self::error::{LoadResult, LoadStatus};
