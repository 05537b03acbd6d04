use dirs::data_dir;
use std::env::consts::{DLL_PREFIX, DLL_SUFFIX};
use std::path::PathBuf;

pub fn tessera_home() -> PathBuf {
    // Linux resolves to ~/.local/share/Tessera
    data_dir()
        .unwrap_or_else(|| PathBuf::from("~/.local/share"))
        .join("Tessera")
}

pub fn plugins_dir() -> PathBuf {
    tessera_home().join("plugins")
}

/// Platform file name of the default backend plugin, e.g. `libtessera_backend.so`.
pub fn default_plugin_filename() -> String {
    format!("{DLL_PREFIX}tessera_backend{DLL_SUFFIX}")
}
