//! Breathing session
//!
//! This module provides:
//! - **State**: the pure phase/countdown state machine
//! - **Effects**: side effects each transition asks for
//! - **Controller**: real-time driver with the one-second ticker
//!
//! # Phases
//!
//! Idle → Inhale → Hold → Exhale → Inhale … until the configured number of
//! rounds completes, then back to Idle. Stop returns to Idle from anywhere.

mod controller;
mod effects;
mod error;
mod state;

#[cfg(test)]
mod state_tests;

pub use controller::{DEFAULT_TICK_PERIOD, SessionChannels, SessionController};
pub use effects::Effect;
pub use error::SessionError;
pub use state::{COMPLETION_PHRASE, Session, SessionCommand};
