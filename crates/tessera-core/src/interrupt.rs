//! Bridge between an asynchronous interrupt (ctrl-c) and the session loop.
//!
//! The one piece of shared state is the "interacting" bit: set while the user
//! owns the terminal (or a pause has been requested), clear while the model is
//! producing output. The interrupt handler only flips it; the session reads it
//! between ticks.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Exit status used when an interrupt arrives while already interacting.
pub const INTERRUPT_EXIT_CODE: i32 = 130;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptAction {
    /// Generation was in flight; the next tick hands control to the user.
    Pause,
    /// The user already had control; the process should exit.
    Terminate,
}

/// Cloneable handle on the interacting flag.
#[derive(Debug, Clone)]
pub struct Interaction {
    interacting: Arc<AtomicBool>,
}

impl Interaction {
    /// Sessions start interacting so the user is asked right after the prompt.
    pub fn new(interacting: bool) -> Self {
        Self {
            interacting: Arc::new(AtomicBool::new(interacting)),
        }
    }

    #[inline]
    pub fn is_interacting(&self) -> bool {
        self.interacting.load(Ordering::SeqCst)
    }

    /// Request a user turn at the next tick.
    #[inline]
    pub fn pause(&self) {
        self.interacting.store(true, Ordering::SeqCst);
    }

    /// Hand control back to the model.
    #[inline]
    pub fn resume(&self) {
        self.interacting.store(false, Ordering::SeqCst);
    }

    /// Called from the interrupt handler. Safe to run on any thread.
    pub fn on_interrupt(&self) -> InterruptAction {
        // swap so two racing interrupts can't both observe "not interacting"
        if self.interacting.swap(true, Ordering::SeqCst) {
            InterruptAction::Terminate
        } else {
            InterruptAction::Pause
        }
    }
}

impl Default for Interaction {
    fn default() -> Self {
        Self::new(true)
    }
}
