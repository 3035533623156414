//! Collaborator seams for rendering and sound.
//!
//! The engine and driver never render or play anything themselves; they
//! call into these capabilities.

use crate::events::BeatEvent;

/// Renders the current beat.
///
/// `show` replaces any prior presentation - implementations must tolerate
/// being called again before a `dismiss`.
pub trait BeatPresenter: Send {
    fn show(&mut self, beat: &BeatEvent);
    fn dismiss(&mut self);
}

/// Plays the audible cue for a non-breath beat.
///
/// Implementations must never fail: a missing audio backend degrades to
/// silence.
pub trait Chime: Send + Sync {
    fn play(&self);
}

/// Chime used when sound is disabled or no backend is available.
pub struct NullChime;

impl Chime for NullChime {
    fn play(&self) {}
}
