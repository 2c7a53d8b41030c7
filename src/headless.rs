// ============================================================================
// headless.rs — KeyIntent
// Windowless replay of recorded key transcripts through a tracker.
// ============================================================================

use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use serde::Serialize;
use thiserror::Error;

use crate::binding::KeyBinding;
use crate::error::ConfigurationError;
use crate::intent::IntentState;
use crate::motion::MotionState;
use crate::session::{self, RecordedEvent, SessionError};
use crate::surface::KeyboardSurface;
use crate::tracker::InputIntentTracker;

#[derive(Clone, Debug)]
pub struct HeadlessConfig {
    pub transcript_path: PathBuf,
    pub binding: KeyBinding,
}

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("cannot observe binding: {0}")]
    Configuration(#[from] ConfigurationError),
}

/// Outcome of a replay, printed as JSON by the binary.
#[derive(Debug, Serialize)]
pub struct ReplayReport {
    pub events: usize,
    pub changes: usize,
    pub position: [f32; 2],
    pub final_state: IntentState,
}

pub fn run_headless(config: &HeadlessConfig) -> Result<ReplayReport, ReplayError> {
    let events = session::load_transcript(&config.transcript_path)?;
    log::info!(
        "Replaying {} key events from {}",
        events.len(),
        config.transcript_path.display()
    );
    replay(&config.binding, &events)
}

/// Feeds `events` through a fresh tracker in order. Between consecutive
/// events the held intents drive a [`MotionState`] for the elapsed time.
pub fn replay(binding: &KeyBinding, events: &[RecordedEvent]) -> Result<ReplayReport, ReplayError> {
    let surface = KeyboardSurface::new();
    let mut tracker = InputIntentTracker::new(surface.clone());

    let changes = Rc::new(Cell::new(0usize));
    let counter = changes.clone();
    tracker.on_change(move |_| counter.set(counter.get() + 1));

    let mut handle = tracker.start(binding)?;
    let mut motion = MotionState::default();
    let mut last_ms = events.first().map_or(0.0, |e| e.elapsed_ms);

    for recorded in events {
        let dt = ((recorded.elapsed_ms - last_ms) / 1000.0).max(0.0) as f32;
        motion.apply_intents(&tracker.current_state(), dt);
        last_ms = recorded.elapsed_ms;
        surface.dispatch(&recorded.event);
    }

    let final_state = tracker.current_state();
    tracker.stop(&mut handle);

    log::info!(
        "Replay finished: {} events, {} intent changes, active = [{}]",
        events.len(),
        changes.get(),
        final_state.active().collect::<Vec<_>>().join(", ")
    );

    Ok(ReplayReport {
        events: events.len(),
        changes: changes.get(),
        position: motion.position,
        final_state,
    })
}
