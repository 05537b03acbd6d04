use super::locate::locate_plugin_binary;
use libloading::Library;
use once_cell::sync::OnceCell;
use std::path::Path;
use tessera_abi::ffi::{PLUGIN_ENTRY_SYMBOL, PluginApi, PluginEntryFn, TESSERA_ABI_VERSION};

pub(crate) struct LoadedPlugin {
    #[allow(dead_code)]
    _lib: Library,
    pub(crate) api: &'static PluginApi,
}

unsafe impl Send for LoadedPlugin {}
unsafe impl Sync for LoadedPlugin {}

static PLUGIN: OnceCell<Result<LoadedPlugin, String>> = OnceCell::new();

/// Load the backend plugin on first call; later calls return the same result
/// regardless of `explicit`.
pub(crate) fn load_plugin_once(explicit: Option<&Path>) -> Result<&'static LoadedPlugin, String> {
    PLUGIN
        .get_or_init(|| {
            let Some(path) = locate_plugin_binary(explicit) else {
                return Err(
                    "backend plugin not found; pass --plugin or set TESSERA_PLUGIN_PATH".into(),
                );
            };
            let lib = unsafe { Library::new(&path) }
                .map_err(|e| format!("failed to load plugin {}: {e}", path.display()))?;
            init_loaded(lib)
        })
        .as_ref()
        .map_err(|e| e.clone())
}

fn init_loaded(lib: Library) -> Result<LoadedPlugin, String> {
    let entry: libloading::Symbol<PluginEntryFn> = unsafe {
        lib.get(PLUGIN_ENTRY_SYMBOL.as_bytes())
            .map_err(|e| format!("missing symbol {}: {e}", PLUGIN_ENTRY_SYMBOL))?
    };

    let api_ptr = unsafe { entry() };
    if api_ptr.is_null() {
        return Err("plugin entry returned null".into());
    }

    let api = unsafe { &*api_ptr };
    if api.info.abi_version != TESSERA_ABI_VERSION {
        return Err(format!(
            "ABI mismatch: host={} plugin={}",
            TESSERA_ABI_VERSION, api.info.abi_version
        ));
    }

    Ok(LoadedPlugin { _lib: lib, api })
}
