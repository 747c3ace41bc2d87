//! Error types for session commands

use thiserror::Error;

/// Rejected session commands.
///
/// These are benign: the caller asked for something that does not apply
/// to the current state, and the session is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("a session is already running")]
    AlreadyActive,

    #[error("no session is running")]
    NotActive,

    #[error("tick from run {tick} ignored; current run is {current}")]
    StaleTick { tick: u64, current: u64 },
}
