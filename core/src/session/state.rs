//! Breathing session state machine
//!
//! `Session` is a pure transition function over `SessionCommand`s. It owns
//! no timers and speaks nothing; it returns the `Effect`s a controller must
//! perform.
//!
//! # Lifecycle
//!
//! 1. `Start` → Inhale with a full countdown, ticker armed
//! 2. Each `Tick` decrements the countdown; reaching zero advances
//!    Inhale → Hold → Exhale → Inhale (next round) in the same tick
//! 3. The Exhale that completes the final round returns to Idle
//! 4. `Stop` returns to Idle from any running phase

use breathe_types::{BreathingPattern, Notification, Phase, SessionSnapshot};

use super::effects::Effect;
use super::error::SessionError;

/// Spoken when the final round finishes.
pub const COMPLETION_PHRASE: &str = "Session complete. Well done!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Start,
    Stop,
    /// One elapsed second, tagged with the run it was armed for
    Tick { generation: u64 },
}

#[derive(Debug, Clone)]
pub struct Session {
    pattern: BreathingPattern,
    phase: Phase,
    countdown: u32,
    rounds_completed: u32,
    is_active: bool,
    /// Incremented on every start so ticks armed by an earlier run are dropped
    generation: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(BreathingPattern::default())
    }
}

impl Session {
    pub fn new(pattern: BreathingPattern) -> Self {
        Self {
            pattern,
            phase: Phase::Idle,
            countdown: 0,
            rounds_completed: 0,
            is_active: false,
            generation: 0,
        }
    }

    pub fn pattern(&self) -> &BreathingPattern {
        &self.pattern
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    pub fn rounds_completed(&self) -> u32 {
        self.rounds_completed
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            countdown: self.countdown,
            rounds_completed: self.rounds_completed,
            total_rounds: self.pattern.total_rounds,
            is_active: self.is_active,
        }
    }

    /// Apply one command, returning the effects to perform.
    ///
    /// On `Err` the session is unchanged.
    pub fn apply(&mut self, command: SessionCommand) -> Result<Vec<Effect>, SessionError> {
        match command {
            SessionCommand::Start => self.start(),
            SessionCommand::Stop => self.stop(),
            SessionCommand::Tick { generation } => self.tick(generation),
        }
    }

    /// Tick for the current run.
    pub fn tick_current(&mut self) -> Result<Vec<Effect>, SessionError> {
        self.tick(self.generation)
    }

    fn start(&mut self) -> Result<Vec<Effect>, SessionError> {
        if self.is_active {
            return Err(SessionError::AlreadyActive);
        }

        self.generation = self.generation.wrapping_add(1);
        self.rounds_completed = 0;
        self.is_active = true;

        let mut effects = vec![Effect::Notify(Notification::started(
            self.pattern.total_rounds,
        ))];
        self.enter(Phase::Inhale, &mut effects);
        effects.push(Effect::ArmTicker);
        Ok(effects)
    }

    fn stop(&mut self) -> Result<Vec<Effect>, SessionError> {
        if !self.is_active {
            return Err(SessionError::NotActive);
        }

        // rounds_completed is kept so partial progress stays visible
        self.is_active = false;
        self.phase = Phase::Idle;
        self.countdown = 0;

        Ok(vec![
            Effect::DisarmTicker,
            Effect::CancelNarration,
            Effect::Notify(Notification::stopped()),
        ])
    }

    fn tick(&mut self, generation: u64) -> Result<Vec<Effect>, SessionError> {
        if !self.is_active {
            return Err(SessionError::NotActive);
        }
        if generation != self.generation {
            return Err(SessionError::StaleTick {
                tick: generation,
                current: self.generation,
            });
        }

        self.countdown = self.countdown.saturating_sub(1);
        if self.countdown > 0 {
            return Ok(Vec::new());
        }

        let mut effects = Vec::new();
        self.advance(&mut effects);
        Ok(effects)
    }

    /// Move past an exhausted phase.
    fn advance(&mut self, effects: &mut Vec<Effect>) {
        match self.phase {
            Phase::Inhale => self.enter(Phase::Hold, effects),
            Phase::Hold => self.enter(Phase::Exhale, effects),
            Phase::Exhale => {
                self.rounds_completed += 1;
                if self.rounds_completed < self.pattern.total_rounds {
                    self.enter(Phase::Inhale, effects);
                } else {
                    self.complete(effects);
                }
            }
            Phase::Idle => {}
        }
    }

    /// Enter a running phase with a full countdown. Narration fires here, on
    /// the transition edge, and nowhere else.
    fn enter(&mut self, phase: Phase, effects: &mut Vec<Effect>) {
        self.phase = phase;
        self.countdown = self.pattern.duration(phase);
        if let Some(prompt) = phase.prompt() {
            effects.push(Effect::narrate(prompt));
        }
    }

    fn complete(&mut self, effects: &mut Vec<Effect>) {
        self.is_active = false;
        self.phase = Phase::Idle;
        self.countdown = 0;

        effects.push(Effect::DisarmTicker);
        effects.push(Effect::narrate(COMPLETION_PHRASE));
        effects.push(Effect::Notify(Notification::completed()));
    }
}
