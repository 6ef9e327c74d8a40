//! Filesystem event handler for the notify watcher (hot-reload).

use std::path::Path;

use notify::event::{CreateKind, ModifyKind, RemoveKind};
use notify::{Event, EventKind};
use tracing::{info, warn};

use super::core::{insert_config, user_for_path, ConfigStore, UserConfigs};

/// Handle a single filesystem event from the notify watcher.
pub(super) fn handle_fs_event(event: &Event, user_configs: &UserConfigs) {
    for path in &event.paths {
        // Skips dotfiles (including our .tmp files) and other extensions.
        let Ok(user) = user_for_path(path) else {
            continue;
        };

        match &event.kind {
            EventKind::Create(CreateKind::File)
            | EventKind::Modify(ModifyKind::Data(_))
            | EventKind::Modify(ModifyKind::Name(_)) => {
                if !path.exists() {
                    // Rename away from this path.
                    remove_user(user_configs, &user, path);
                    continue;
                }
                match ConfigStore::load_file(path) {
                    Ok(config) => {
                        info!(user = %user, path = %path.display(), "hot-reloaded selection config");
                        insert_config(user_configs, user, config);
                    }
                    Err(e) => {
                        warn!(
                            path = %path.display(),
                            error = %e,
                            "failed to parse selection config during hot-reload, keeping previous version"
                        );
                    }
                }
            }
            EventKind::Remove(RemoveKind::File) => remove_user(user_configs, &user, path),
            _ => {}
        }
    }
}

fn remove_user(user_configs: &UserConfigs, user: &str, path: &Path) {
    let removed = user_configs
        .write()
        .expect("user_configs lock poisoned")
        .remove(user);
    if removed.is_some() {
        info!(user = %user, path = %path.display(), "removed selection config after file deletion");
    }
}
