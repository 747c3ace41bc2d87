//! Side effects produced by session transitions
//!
//! The state machine never performs I/O itself. Every transition returns the
//! list of effects the caller must carry out, in order.

use breathe_types::Notification;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Speak `text`, interrupting whatever is currently being spoken
    Narrate { text: String },

    /// Silence any in-flight narration
    CancelNarration,

    /// Show a transient lifecycle alert
    Notify(Notification),

    /// Start the one-second ticker for the current run
    ArmTicker,

    /// Cancel any pending tick
    DisarmTicker,
}

impl Effect {
    pub fn narrate(text: impl Into<String>) -> Self {
        Effect::Narrate { text: text.into() }
    }
}
