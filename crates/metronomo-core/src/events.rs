use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::metronome::Phase;

/// One beat of a run, produced by the engine once per interval.
///
/// Consumed by a presenter and a chime; the engine does not retain it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeatEvent {
    /// Cycle this beat belongs to, 1-based.
    pub cycle: u32,
    /// Beat number within the cycle, 1-based.
    pub beat: u32,
    pub total_cycles: u32,
    /// Silent breath beat; presenters render it neutral, the chime stays
    /// quiet.
    pub is_breath: bool,
    /// Raw beat number; presenters map it to a display color and apply
    /// their own out-of-palette fallback.
    pub color_key: u32,
    /// Countdown seconds for this beat. Always equal to the scheduling
    /// period (`60 / bpm`).
    pub interval_secs: f64,
    pub at: DateTime<Utc>,
}

/// Every state change of a run produces an Event.
/// Front ends subscribe to the driver's broadcast stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    RunStarted {
        total_cycles: u32,
        beats_per_cycle: u32,
        bpm: u32,
        interval_secs: f64,
        at: DateTime<Utc>,
    },
    Beat(BeatEvent),
    /// Signaled exactly once per run, after the final beat of the final
    /// cycle. No further `Beat` follows it.
    RunCompleted {
        total_cycles: u32,
        at: DateTime<Utc>,
    },
    RunStopped {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: Phase,
        current_cycle: u32,
        current_beat: u32,
        total_cycles: u32,
        interval_secs: f64,
        at: DateTime<Utc>,
    },
}
