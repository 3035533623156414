//! Cycle timer engine.
//!
//! The engine is a caller-driven state machine. It does not use internal
//! threads or timers - a driver asks a tick source for one notification
//! per interval and calls `tick()` each time.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Completed -> Idle
//! ```
//!
//! `Completed` is transient: the engine folds back to `Idle` in the same
//! tick that signals completion.
//!
//! ## Breath placement
//!
//! When `breath_enabled` is set, the *last* beat of every cycle is emitted
//! with `is_breath = true`. The breath replaces that beat rather than
//! occupying an extra interval, so a run always produces exactly
//! `total_cycles * beats_per_cycle` beats.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::config::RunConfig;
use crate::error::ValidationError;
use crate::events::{BeatEvent, Event};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Running,
    Completed,
}

/// What a single tick resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// One beat, audible or breath.
    Beat(BeatEvent),
    /// The final cycle finished; no beat accompanies this.
    Completed { total_cycles: u32 },
}

/// Core cycle timer engine.
///
/// Owns the run configuration and position counters exclusively. While
/// running, `1 <= current_cycle <= total_cycles` and
/// `1 <= current_beat <= beats_per_cycle` hold between ticks (the beat
/// counter starts at 0 so the first tick lands on beat 1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetronomeEngine {
    phase: Phase,
    config: Option<RunConfig>,
    current_cycle: u32,
    current_beat: u32,
    /// Seconds between beats, derived from `bpm` on start.
    interval_secs: f64,
}

impl Default for MetronomeEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MetronomeEngine {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            config: None,
            current_cycle: 0,
            current_beat: 0,
            interval_secs: 0.0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_cycle(&self) -> u32 {
        self.current_cycle
    }

    pub fn current_beat(&self) -> u32 {
        self.current_beat
    }

    pub fn interval_secs(&self) -> f64 {
        self.interval_secs
    }

    pub fn config(&self) -> Option<&RunConfig> {
        self.config.as_ref()
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            phase: self.phase,
            current_cycle: self.current_cycle,
            current_beat: self.current_beat,
            total_cycles: self.config.map(|c| c.total_cycles).unwrap_or(0),
            interval_secs: self.interval_secs,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Arm a new run. A run already in flight is discarded first.
    ///
    /// Rejection leaves the engine untouched; no run state is created or
    /// mutated for an invalid configuration. The first beat is produced
    /// by the first tick, not by `start` itself.
    pub fn start(&mut self, config: RunConfig) -> Result<Event, ValidationError> {
        config.validate()?;
        self.reset();
        self.phase = Phase::Running;
        self.current_cycle = 1;
        self.current_beat = 0;
        self.interval_secs = config.interval_secs();
        self.config = Some(config);
        Ok(Event::RunStarted {
            total_cycles: config.total_cycles,
            beats_per_cycle: config.beats_per_cycle,
            bpm: config.bpm,
            interval_secs: self.interval_secs,
            at: Utc::now(),
        })
    }

    /// Advance the run by exactly one beat.
    ///
    /// Returns `None` when no run is active: a tick delivered after stop
    /// or completion is an expected race, not an error.
    pub fn tick(&mut self) -> Option<TickOutcome> {
        if self.phase != Phase::Running {
            return None;
        }
        let config = self.config?;

        self.current_beat += 1;
        if self.current_beat > config.beats_per_cycle {
            // Cycle boundary. The breath, if any, already went out with
            // the previous beat, so the counters just roll over.
            self.current_beat = 1;
            self.current_cycle += 1;
            if self.current_cycle > config.total_cycles {
                self.phase = Phase::Completed;
                let total_cycles = config.total_cycles;
                // Completed folds straight back to Idle.
                self.reset();
                return Some(TickOutcome::Completed { total_cycles });
            }
        }

        let is_breath = config.breath_enabled && self.current_beat == config.beats_per_cycle;
        Some(TickOutcome::Beat(BeatEvent {
            cycle: self.current_cycle,
            beat: self.current_beat,
            total_cycles: config.total_cycles,
            is_breath,
            color_key: self.current_beat,
            interval_secs: self.interval_secs,
            at: Utc::now(),
        }))
    }

    /// Discard the current run and return to `Idle`.
    ///
    /// Safe to call repeatedly, from `Completed`, and from within a tick
    /// handler.
    pub fn stop(&mut self) {
        self.reset();
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.config = None;
        self.current_cycle = 0;
        self.current_beat = 0;
        self.interval_secs = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(total_cycles: u32, beats_per_cycle: u32, bpm: u32, breath: bool) -> RunConfig {
        RunConfig {
            total_cycles,
            beats_per_cycle,
            bpm,
            breath_enabled: breath,
        }
    }

    /// Drive a started engine until completion, collecting beats.
    fn drive(engine: &mut MetronomeEngine) -> (Vec<BeatEvent>, u32) {
        let mut beats = Vec::new();
        loop {
            match engine.tick() {
                Some(TickOutcome::Beat(beat)) => beats.push(beat),
                Some(TickOutcome::Completed { total_cycles }) => return (beats, total_cycles),
                None => panic!("engine stalled before completion"),
            }
        }
    }

    #[test]
    fn start_arms_the_run() {
        let mut engine = MetronomeEngine::new();
        assert_eq!(engine.phase(), Phase::Idle);

        let started = engine.start(config(2, 4, 120, false)).unwrap();
        assert_eq!(engine.phase(), Phase::Running);
        assert_eq!(engine.current_cycle(), 1);
        assert_eq!(engine.current_beat(), 0);
        match started {
            Event::RunStarted { interval_secs, .. } => assert_eq!(interval_secs, 0.5),
            other => panic!("expected RunStarted, got {other:?}"),
        }
    }

    #[test]
    fn invalid_config_is_rejected_without_state_change() {
        let mut engine = MetronomeEngine::new();
        assert!(engine.start(config(0, 4, 120, false)).is_err());
        assert_eq!(engine.phase(), Phase::Idle);
        assert!(engine.tick().is_none());
    }

    #[test]
    fn eight_beats_across_two_cycles() {
        // bpm=120, beats=4, cycles=2 -> (1,1)..(1,4),(2,1)..(2,4), done.
        let mut engine = MetronomeEngine::new();
        engine.start(config(2, 4, 120, false)).unwrap();
        let (beats, total_cycles) = drive(&mut engine);

        assert_eq!(total_cycles, 2);
        let positions: Vec<(u32, u32)> = beats.iter().map(|b| (b.cycle, b.beat)).collect();
        assert_eq!(
            positions,
            vec![
                (1, 1),
                (1, 2),
                (1, 3),
                (1, 4),
                (2, 1),
                (2, 2),
                (2, 3),
                (2, 4)
            ]
        );
        assert!(beats.iter().all(|b| !b.is_breath));
        assert!(beats.iter().all(|b| b.color_key == b.beat));
        assert!(beats.iter().all(|b| b.interval_secs == 0.5));
    }

    #[test]
    fn breath_replaces_last_beat_of_each_cycle() {
        // bpm=60, beats=4, cycles=1, breath on -> fourth beat is silent.
        let mut engine = MetronomeEngine::new();
        engine.start(config(1, 4, 60, true)).unwrap();
        let (beats, total_cycles) = drive(&mut engine);

        assert_eq!(total_cycles, 1);
        assert_eq!(beats.len(), 4);
        assert_eq!(
            beats.iter().map(|b| b.is_breath).collect::<Vec<_>>(),
            vec![false, false, false, true]
        );
        // The breath still carries its beat number; the presenter picks
        // the neutral indicator.
        assert_eq!(beats[3].beat, 4);
    }

    #[test]
    fn breath_consumes_no_extra_tick() {
        let mut engine = MetronomeEngine::new();
        engine.start(config(3, 2, 100, true)).unwrap();
        let (beats, _) = drive(&mut engine);
        assert_eq!(beats.len(), 3 * 2);
        assert_eq!(beats.iter().filter(|b| b.is_breath).count(), 3);
    }

    #[test]
    fn completion_folds_to_idle_and_further_ticks_are_noops() {
        let mut engine = MetronomeEngine::new();
        engine.start(config(1, 2, 120, false)).unwrap();
        let (beats, _) = drive(&mut engine);
        assert_eq!(beats.len(), 2);

        assert_eq!(engine.phase(), Phase::Idle);
        assert!(engine.tick().is_none());
        assert!(engine.tick().is_none());
    }

    #[test]
    fn stop_discards_the_run() {
        let mut engine = MetronomeEngine::new();
        engine.start(config(5, 4, 90, false)).unwrap();
        assert!(engine.tick().is_some());

        engine.stop();
        assert_eq!(engine.phase(), Phase::Idle);
        assert_eq!(engine.current_cycle(), 0);
        assert!(engine.config().is_none());
        assert!(engine.tick().is_none());

        // Idempotent, including after completion.
        engine.stop();
        assert_eq!(engine.phase(), Phase::Idle);
    }

    #[test]
    fn restart_supersedes_previous_run() {
        let mut engine = MetronomeEngine::new();
        engine.start(config(10, 8, 200, false)).unwrap();
        assert!(engine.tick().is_some());

        engine.start(config(1, 2, 60, false)).unwrap();
        let (beats, total_cycles) = drive(&mut engine);
        assert_eq!(total_cycles, 1);
        assert_eq!(beats.len(), 2);
        assert!(beats.iter().all(|b| b.total_cycles == 1));
        assert!(beats.iter().all(|b| b.interval_secs == 1.0));
    }

    #[test]
    fn interval_matches_scheduling_period() {
        let mut engine = MetronomeEngine::new();
        let cfg = config(1, 4, 80, false);
        engine.start(cfg).unwrap();
        assert!((engine.interval_secs() - 60.0 / 80.0).abs() < f64::EPSILON);
        assert_eq!(engine.interval_secs(), cfg.interval_secs());
    }

    #[test]
    fn snapshot_reflects_position() {
        let mut engine = MetronomeEngine::new();
        engine.start(config(3, 4, 60, false)).unwrap();
        engine.tick();
        engine.tick();

        match engine.snapshot() {
            Event::StateSnapshot {
                phase,
                current_cycle,
                current_beat,
                total_cycles,
                interval_secs,
                ..
            } => {
                assert_eq!(phase, Phase::Running);
                assert_eq!(current_cycle, 1);
                assert_eq!(current_beat, 2);
                assert_eq!(total_cycles, 3);
                assert_eq!(interval_secs, 1.0);
            }
            other => panic!("expected StateSnapshot, got {other:?}"),
        }
    }
}
