//! Tessera ABI crate: backend contracts shared by the session driver and backend plugins.

pub mod backend;
pub mod ffi;
pub mod params;
pub mod sampling;
pub mod token;

pub use backend::*;
pub use params::*;
pub use sampling::*;
pub use token::*;
