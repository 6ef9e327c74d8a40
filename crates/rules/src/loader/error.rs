//! Load result structures for the config store.

use std::path::PathBuf;

/// Outcome of loading a single config file.
#[derive(Debug)]
pub struct LoadResult {
    /// Path to the file that was loaded.
    pub path: PathBuf,
    /// Status of the load attempt.
    pub status: LoadStatus,
}

/// Status of a single file load attempt.
#[derive(Debug)]
pub enum LoadStatus {
    /// Config was successfully loaded for this user.
    Loaded { user: String },
    /// File was skipped (dotfile, unsupported extension, bad user id).
    Skipped { reason: String },
    /// Parse or structural error occurred.
    Failed { error: String },
}
