//! Tests for the Session state machine
//!
//! Drives the pure transition function tick by tick and checks phase
//! sequencing, countdown bounds and narration counts.

use breathe_types::{BreathingPattern, NotificationKind, Phase};

use super::{COMPLETION_PHRASE, Effect, Session, SessionCommand, SessionError};

fn started() -> (Session, Vec<Effect>) {
    let mut session = Session::default();
    let effects = session.apply(SessionCommand::Start).unwrap();
    (session, effects)
}

fn narrations(effects: &[Effect]) -> Vec<String> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::Narrate { text } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

fn notifications(effects: &[Effect]) -> Vec<NotificationKind> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::Notify(n) => Some(n.kind),
            _ => None,
        })
        .collect()
}

/// Apply `n` ticks, collecting every effect produced.
fn tick_n(session: &mut Session, n: u32) -> Vec<Effect> {
    let mut all = Vec::new();
    for _ in 0..n {
        all.extend(session.tick_current().unwrap());
    }
    all
}

#[test]
fn test_new_session_is_idle() {
    let session = Session::default();
    assert_eq!(session.phase(), Phase::Idle);
    assert_eq!(session.countdown(), 0);
    assert_eq!(session.rounds_completed(), 0);
    assert!(!session.is_active());
}

#[test]
fn test_start_enters_inhale_and_arms_ticker() {
    let (session, effects) = started();

    assert!(session.is_active());
    assert_eq!(session.phase(), Phase::Inhale);
    assert_eq!(session.countdown(), 4);
    assert_eq!(narrations(&effects), vec!["Breath in"]);
    // Interrupting earlier speech is left to the narrator
    assert!(!effects.contains(&Effect::CancelNarration));
    assert_eq!(notifications(&effects), vec![NotificationKind::Started]);
    assert_eq!(effects.last(), Some(&Effect::ArmTicker));
}

#[test]
fn test_start_while_active_is_rejected() {
    let (mut session, _) = started();
    tick_n(&mut session, 2);

    let before = session.snapshot();
    assert_eq!(
        session.apply(SessionCommand::Start),
        Err(SessionError::AlreadyActive)
    );
    assert_eq!(session.snapshot(), before);
}

#[test]
fn test_stop_while_idle_is_rejected() {
    let mut session = Session::default();
    assert_eq!(
        session.apply(SessionCommand::Stop),
        Err(SessionError::NotActive)
    );
}

#[test]
fn test_tick_decrements_without_effects() {
    let (mut session, _) = started();

    let effects = session.tick_current().unwrap();
    assert!(effects.is_empty());
    assert_eq!(session.countdown(), 3);
    assert_eq!(session.phase(), Phase::Inhale);
}

#[test]
fn test_countdown_exhaustion_advances_phases() {
    let (mut session, _) = started();

    let effects = tick_n(&mut session, 4);
    assert_eq!(session.phase(), Phase::Hold);
    assert_eq!(session.countdown(), 7);
    assert_eq!(narrations(&effects), vec!["Hold breath"]);

    let effects = tick_n(&mut session, 7);
    assert_eq!(session.phase(), Phase::Exhale);
    assert_eq!(session.countdown(), 8);
    assert_eq!(narrations(&effects), vec!["Breath out"]);
}

#[test]
fn test_nineteen_ticks_complete_one_round() {
    let (mut session, _) = started();

    let effects = tick_n(&mut session, 19);

    assert_eq!(session.rounds_completed(), 1);
    assert_eq!(session.phase(), Phase::Inhale);
    assert_eq!(session.countdown(), 4);
    assert!(session.is_active());
    assert_eq!(
        narrations(&effects),
        vec!["Hold breath", "Breath out", "Breath in"]
    );
}

#[test]
fn test_full_session_completes_after_190_ticks() {
    let (mut session, start_effects) = started();

    let effects = tick_n(&mut session, 190);

    assert_eq!(session.rounds_completed(), 10);
    assert_eq!(session.phase(), Phase::Idle);
    assert_eq!(session.countdown(), 0);
    assert!(!session.is_active());

    // 3 cues per round plus the completion phrase; the first cue came from start
    let spoken = narrations(&effects);
    assert_eq!(narrations(&start_effects).len() + spoken.len(), 3 * 10 + 1);
    assert_eq!(spoken.last().map(String::as_str), Some(COMPLETION_PHRASE));
    assert_eq!(notifications(&effects), vec![NotificationKind::Completed]);
    assert!(effects.contains(&Effect::DisarmTicker));
}

#[test]
fn test_ticks_after_completion_are_rejected() {
    let (mut session, _) = started();
    tick_n(&mut session, 190);

    assert_eq!(session.tick_current(), Err(SessionError::NotActive));
    assert_eq!(session.rounds_completed(), 10);
}

#[test]
fn test_countdown_stays_within_phase_bounds() {
    let (mut session, _) = started();
    let pattern = *session.pattern();

    while session.is_active() {
        session.tick_current().unwrap();
        if session.is_active() {
            let max = pattern.duration(session.phase());
            assert!(session.countdown() <= max);
            assert!(session.countdown() > 0, "running phase shows zero");
        }
    }
    assert_eq!(session.countdown(), 0);
}

#[test]
fn test_stop_resets_phase_and_keeps_progress() {
    let (mut session, _) = started();
    tick_n(&mut session, 25);
    assert_eq!(session.rounds_completed(), 1);

    let effects = session.apply(SessionCommand::Stop).unwrap();

    assert_eq!(session.phase(), Phase::Idle);
    assert_eq!(session.countdown(), 0);
    assert!(!session.is_active());
    assert_eq!(session.rounds_completed(), 1);
    assert_eq!(
        effects,
        vec![
            Effect::DisarmTicker,
            Effect::CancelNarration,
            Effect::Notify(breathe_types::Notification::stopped()),
        ]
    );
}

#[test]
fn test_no_tick_mutates_a_stopped_session() {
    let (mut session, _) = started();
    let generation = session.generation();
    tick_n(&mut session, 3);
    session.apply(SessionCommand::Stop).unwrap();
    let stopped = session.snapshot();

    for _ in 0..50 {
        assert_eq!(
            session.apply(SessionCommand::Tick { generation }),
            Err(SessionError::NotActive)
        );
    }
    assert_eq!(session.snapshot(), stopped);
}

#[test]
fn test_stale_tick_from_previous_run_is_dropped() {
    let (mut session, _) = started();
    let old = session.generation();
    session.apply(SessionCommand::Stop).unwrap();
    session.apply(SessionCommand::Start).unwrap();

    let result = session.apply(SessionCommand::Tick { generation: old });
    assert_eq!(
        result,
        Err(SessionError::StaleTick {
            tick: old,
            current: old + 1
        })
    );
    assert_eq!(session.countdown(), 4);
}

#[test]
fn test_restart_resets_rounds() {
    let (mut session, _) = started();
    tick_n(&mut session, 190);
    assert_eq!(session.rounds_completed(), 10);

    session.apply(SessionCommand::Start).unwrap();
    assert_eq!(session.rounds_completed(), 0);
    assert_eq!(session.phase(), Phase::Inhale);
}

#[test]
fn test_custom_pattern_round_length() {
    let pattern = BreathingPattern {
        inhale_secs: 2,
        hold_secs: 1,
        exhale_secs: 3,
        total_rounds: 2,
    };
    let mut session = Session::new(pattern);
    session.apply(SessionCommand::Start).unwrap();

    tick_n(&mut session, pattern.round_secs());
    assert_eq!(session.rounds_completed(), 1);
    assert_eq!(session.phase(), Phase::Inhale);

    tick_n(&mut session, pattern.round_secs());
    assert_eq!(session.rounds_completed(), 2);
    assert!(!session.is_active());
}
