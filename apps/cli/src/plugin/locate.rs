use crate::paths::{default_plugin_filename, plugins_dir};
use std::{
    env,
    path::{Path, PathBuf},
};

const ENV_PLUGIN_PATH: &str = "TESSERA_PLUGIN_PATH";
const ENV_PLUGIN_DIR: &str = "TESSERA_PLUGIN_DIR";

/// Resolve the backend plugin: explicit path, then `$TESSERA_PLUGIN_PATH`,
/// then the default file name inside `$TESSERA_PLUGIN_DIR` or the data dir.
pub(crate) fn locate_plugin_binary(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = explicit {
        if p.exists() {
            tracing::info!("[plugin] using {}", p.display());
            return Some(p.to_path_buf());
        }
        tracing::warn!("[plugin] configured plugin is missing: {}", p.display());
    }

    if let Ok(p) = env::var(ENV_PLUGIN_PATH) {
        let p = PathBuf::from(p);
        if p.exists() {
            tracing::info!("[plugin] {ENV_PLUGIN_PATH} = {}", p.display());
            return Some(p);
        }
        tracing::warn!(
            "[plugin] {ENV_PLUGIN_PATH} points to missing file: {}",
            p.display()
        );
    }

    let dir = env::var(ENV_PLUGIN_DIR)
        .ok()
        .map(PathBuf::from)
        .unwrap_or_else(plugins_dir);

    let p = dir.join(default_plugin_filename());
    if p.exists() {
        tracing::info!("[plugin] from plugin dir: {}", p.display());
        return Some(p);
    }

    tracing::debug!("[plugin] nothing at {}", p.display());
    None
}
