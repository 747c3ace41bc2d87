//! Session controller: drives the state machine in real time
//!
//! Owns the single `Session`, the one-second ticker task and the output
//! channels. Start, stop and ticks all mutate the session under one mutex,
//! so they never interleave.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use breathe_types::{BreathingPattern, Notification, SessionSnapshot};

use crate::narration::{NarrationCommand, NarrationSender};

use super::effects::Effect;
use super::error::SessionError;
use super::state::{Session, SessionCommand};

/// Real-time length of one countdown second.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

/// Receiving ends handed to the presentation layer.
pub struct SessionChannels {
    /// Latest snapshot, updated after every command and tick
    pub snapshots: watch::Receiver<SessionSnapshot>,
    /// Lifecycle alerts (started, stopped, completed)
    pub notifications: mpsc::Receiver<Notification>,
}

struct Shared {
    session: Session,
    /// The one armed ticker, if any
    ticker: Option<JoinHandle<()>>,
}

struct Inner {
    shared: Mutex<Shared>,
    tick_period: Duration,
    snapshot_tx: watch::Sender<SessionSnapshot>,
    notification_tx: mpsc::Sender<Notification>,
    narration_tx: NarrationSender,
}

#[derive(Clone)]
pub struct SessionController {
    inner: Arc<Inner>,
}

impl SessionController {
    pub fn new(
        pattern: BreathingPattern,
        tick_period: Duration,
        narration_tx: NarrationSender,
    ) -> (Self, SessionChannels) {
        let session = Session::new(pattern);
        let (snapshot_tx, snapshots) = watch::channel(session.snapshot());
        let (notification_tx, notifications) = mpsc::channel(16);

        let inner = Arc::new(Inner {
            shared: Mutex::new(Shared {
                session,
                ticker: None,
            }),
            tick_period,
            snapshot_tx,
            notification_tx,
            narration_tx,
        });

        (
            Self { inner },
            SessionChannels {
                snapshots,
                notifications,
            },
        )
    }

    pub async fn start(&self) -> Result<(), SessionError> {
        self.inner.command(SessionCommand::Start).await
    }

    pub async fn stop(&self) -> Result<(), SessionError> {
        self.inner.command(SessionCommand::Stop).await
    }

    /// Start when idle, stop when running. Returns the resulting snapshot.
    pub async fn toggle(&self) -> SessionSnapshot {
        let mut shared = self.inner.shared.lock().await;
        let command = if shared.session.is_active() {
            SessionCommand::Stop
        } else {
            SessionCommand::Start
        };
        // The check and the command happen under one lock, so this cannot be rejected
        if let Err(e) = self.inner.apply(&mut shared, command) {
            tracing::debug!(error = %e, "Toggle rejected");
        }
        shared.session.snapshot()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.inner.shared.lock().await.session.snapshot()
    }

    /// Another receiver for snapshots.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.inner.snapshot_tx.subscribe()
    }

    /// Stop any running session and cancel the ticker.
    pub async fn shutdown(&self) {
        let mut shared = self.inner.shared.lock().await;
        if shared.session.is_active() {
            let _ = self.inner.apply(&mut shared, SessionCommand::Stop);
        }
        if let Some(handle) = shared.ticker.take() {
            handle.abort();
        }
    }
}

impl Inner {
    async fn command(self: &Arc<Self>, command: SessionCommand) -> Result<(), SessionError> {
        let mut shared = self.shared.lock().await;
        self.apply(&mut shared, command).inspect_err(|e| {
            tracing::debug!(error = %e, ?command, "Session command rejected");
        })
    }

    /// Apply a command and perform its effects while the lock is held.
    fn apply(self: &Arc<Self>, shared: &mut Shared, command: SessionCommand) -> Result<(), SessionError> {
        let effects = shared.session.apply(command)?;
        for effect in effects {
            self.perform(shared, effect);
        }
        self.snapshot_tx.send_replace(shared.session.snapshot());
        Ok(())
    }

    fn perform(self: &Arc<Self>, shared: &mut Shared, effect: Effect) {
        match effect {
            Effect::Narrate { text } => self.narrate(NarrationCommand::Speak { text }),
            Effect::CancelNarration => self.narrate(NarrationCommand::Cancel),
            Effect::Notify(notification) => {
                tracing::info!(kind = ?notification.kind, "{}", notification.title);
                if let Err(e) = self.notification_tx.try_send(notification) {
                    tracing::warn!(error = %e, "Dropped session notification");
                }
            }
            Effect::ArmTicker => {
                if let Some(handle) = shared.ticker.take() {
                    handle.abort();
                }
                let generation = shared.session.generation();
                shared.ticker = Some(tokio::spawn(run_ticker(Arc::clone(self), generation)));
            }
            Effect::DisarmTicker => {
                if let Some(handle) = shared.ticker.take() {
                    handle.abort();
                }
            }
        }
    }

    fn narrate(&self, command: NarrationCommand) {
        // Fire-and-forget: a full or closed channel only costs a spoken cue
        if let Err(e) = self.narration_tx.try_send(command) {
            tracing::debug!(error = %e, "Narration request dropped");
        }
    }

    /// Returns false once the run this ticker belongs to is over.
    async fn tick(self: &Arc<Self>, generation: u64) -> bool {
        let mut shared = self.shared.lock().await;
        match self.apply(&mut shared, SessionCommand::Tick { generation }) {
            Ok(()) => shared.session.is_active(),
            Err(e) => {
                tracing::debug!(error = %e, "Tick ignored");
                false
            }
        }
    }
}

async fn run_ticker(inner: Arc<Inner>, generation: u64) {
    let period = inner.tick_period;
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    // Late ticks are not replayed in a burst; the session simply runs long
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        if !inner.tick(generation).await {
            break;
        }
    }
}
