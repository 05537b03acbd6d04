//! Tessera core: interactive instruct-mode session driver around an LLM backend.
//!
//! The backend owns the model; this crate owns the token flow around it: the
//! history ring, the context window, reverse-prompt detection and the
//! prime → sample → ask-the-user loop.

pub mod antiprompt;
pub mod config;
pub mod console;
pub mod error;
pub mod history;
pub mod input;
pub mod interrupt;
pub mod session;
pub mod window;

pub use antiprompt::ReversePrompts;
pub use config::SessionConfig;
pub use error::{Result, SessionError};
pub use history::TokenHistory;
pub use interrupt::{INTERRUPT_EXIT_CODE, Interaction, InterruptAction};
pub use input::{LineInput, TurnRead, TurnSource};
pub use session::{Phase, Session, SessionEnd, Step};
pub use window::ContextWindow;
