//! Property tests over complete engine runs.

use metronomo_core::{MetronomeEngine, Phase, RunConfig, TickOutcome};
use proptest::prelude::*;

fn valid_configs() -> impl Strategy<Value = RunConfig> {
    (
        1u32..=20,
        prop::sample::select(vec![2u32, 4, 8]),
        1u32..=240,
        any::<bool>(),
    )
        .prop_map(
            |(total_cycles, beats_per_cycle, bpm, breath_enabled)| RunConfig {
                total_cycles,
                beats_per_cycle,
                bpm,
                breath_enabled,
            },
        )
}

/// Drive a run from start to completion, collecting (cycle, beat, breath).
fn drive_to_completion(config: RunConfig) -> (Vec<(u32, u32, bool)>, u32) {
    let mut engine = MetronomeEngine::new();
    engine.start(config).expect("strategy yields valid configs");
    let mut beats = Vec::new();
    loop {
        match engine.tick() {
            Some(TickOutcome::Beat(beat)) => beats.push((beat.cycle, beat.beat, beat.is_breath)),
            Some(TickOutcome::Completed { total_cycles }) => return (beats, total_cycles),
            None => panic!("engine stalled before completion"),
        }
    }
}

proptest! {
    #[test]
    fn beat_count_is_exact(config in valid_configs()) {
        let (beats, total_cycles) = drive_to_completion(config);
        prop_assert_eq!(beats.len() as u32, config.total_cycles * config.beats_per_cycle);
        prop_assert_eq!(total_cycles, config.total_cycles);
    }

    #[test]
    fn beats_increment_by_one_and_wrap(config in valid_configs()) {
        let (beats, _) = drive_to_completion(config);
        let mut expected_cycle = 1;
        let mut expected_beat = 1;
        for &(cycle, beat, _) in &beats {
            prop_assert_eq!(cycle, expected_cycle);
            prop_assert_eq!(beat, expected_beat);
            prop_assert!(beat <= config.beats_per_cycle);
            prop_assert!(cycle <= config.total_cycles);
            if expected_beat == config.beats_per_cycle {
                expected_beat = 1;
                expected_cycle += 1;
            } else {
                expected_beat += 1;
            }
        }
    }

    #[test]
    fn breath_marks_exactly_the_last_beat(config in valid_configs()) {
        let (beats, _) = drive_to_completion(config);
        for &(_, beat, is_breath) in &beats {
            prop_assert_eq!(
                is_breath,
                config.breath_enabled && beat == config.beats_per_cycle
            );
        }
    }

    #[test]
    fn completion_is_signaled_once_then_engine_is_idle(config in valid_configs()) {
        let mut engine = MetronomeEngine::new();
        engine.start(config).unwrap();
        let mut completions = 0;
        for _ in 0..(config.total_cycles * config.beats_per_cycle + 5) {
            if let Some(TickOutcome::Completed { .. }) = engine.tick() {
                completions += 1;
            }
        }
        prop_assert_eq!(completions, 1);
        prop_assert_eq!(engine.phase(), Phase::Idle);
        prop_assert!(engine.tick().is_none());
    }

    #[test]
    fn interval_is_sixty_over_bpm(config in valid_configs()) {
        let mut engine = MetronomeEngine::new();
        engine.start(config).unwrap();
        let expected = 60.0 / config.bpm as f64;
        prop_assert!((engine.interval_secs() - expected).abs() < 1e-12);
        // Every emitted beat carries the same countdown value.
        match engine.tick() {
            Some(TickOutcome::Beat(beat)) => prop_assert_eq!(beat.interval_secs, expected),
            other => prop_assert!(false, "first tick must be a beat, got {:?}", other),
        }
    }

    #[test]
    fn stop_makes_all_further_ticks_noops(config in valid_configs()) {
        let mut engine = MetronomeEngine::new();
        engine.start(config).unwrap();
        engine.tick();
        engine.stop();
        for _ in 0..10 {
            prop_assert!(engine.tick().is_none());
        }
    }
}
