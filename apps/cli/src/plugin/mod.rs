pub mod backend;
pub mod loader;
pub mod locate;

pub use backend::PluginBackend;
pub(crate) use loader::load_plugin_once;
