//! Terminal rendering of session snapshots and notifications

use breathe_core::session::SessionChannels;
use breathe_types::{Notification, SessionSnapshot};
use tokio::task::JoinHandle;

/// Print every snapshot change and notification until the session
/// controller goes away.
pub fn init_renderer(mut channels: SessionChannels) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                changed = channels.snapshots.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let snapshot = *channels.snapshots.borrow_and_update();
                    println!("{}", format_snapshot(&snapshot));
                }
                Some(notification) = channels.notifications.recv() => {
                    println!("{}", format_notification(&notification));
                }
                else => break,
            }
        }
    })
}

pub fn format_snapshot(snapshot: &SessionSnapshot) -> String {
    let progress = format!(
        "rounds {}/{} ({} remaining)",
        snapshot.rounds_completed,
        snapshot.total_rounds,
        snapshot.remaining_rounds()
    );

    if snapshot.phase.is_idle() {
        if snapshot.show_progress() {
            format!("{:<7}     {}", snapshot.label(), progress)
        } else {
            snapshot.label().to_string()
        }
    } else {
        format!(
            "{:<7} {:>2}  {:<10} {}",
            snapshot.label(),
            snapshot.countdown,
            "#".repeat(snapshot.countdown.min(10) as usize),
            progress
        )
    }
}

pub fn format_notification(notification: &Notification) -> String {
    format!("** {}: {}", notification.title, notification.message)
}
