use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Accepted values for [`RunConfig::beats_per_cycle`].
pub const ACCEPTED_BEATS: [u32; 3] = [2, 4, 8];

/// Immutable parameters of one metronome run.
///
/// Validated before a run starts; the engine never runs with a
/// non-positive value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    pub total_cycles: u32,
    pub beats_per_cycle: u32,
    pub bpm: u32,
    /// Replace the last beat of each cycle with a silent breath.
    pub breath_enabled: bool,
}

impl RunConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.total_cycles == 0 {
            return Err(ValidationError::NotPositive {
                field: "total_cycles",
            });
        }
        if self.bpm == 0 {
            return Err(ValidationError::NotPositive { field: "bpm" });
        }
        if self.beats_per_cycle == 0 {
            return Err(ValidationError::NotPositive {
                field: "beats_per_cycle",
            });
        }
        if !ACCEPTED_BEATS.contains(&self.beats_per_cycle) {
            return Err(ValidationError::UnsupportedBeats {
                got: self.beats_per_cycle,
            });
        }
        Ok(())
    }

    /// Seconds between beats.
    ///
    /// Single source of truth for both the scheduling period and the
    /// per-beat countdown shown by presenters.
    pub fn interval_secs(&self) -> f64 {
        60.0 / self.bpm as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(total_cycles: u32, beats_per_cycle: u32, bpm: u32) -> RunConfig {
        RunConfig {
            total_cycles,
            beats_per_cycle,
            bpm,
            breath_enabled: false,
        }
    }

    #[test]
    fn accepts_enumerated_beats() {
        for beats in ACCEPTED_BEATS {
            assert!(config(1, beats, 60).validate().is_ok());
        }
    }

    #[test]
    fn rejects_zero_cycles() {
        assert_eq!(
            config(0, 4, 60).validate(),
            Err(ValidationError::NotPositive {
                field: "total_cycles"
            })
        );
    }

    #[test]
    fn rejects_zero_bpm() {
        assert_eq!(
            config(1, 4, 0).validate(),
            Err(ValidationError::NotPositive { field: "bpm" })
        );
    }

    #[test]
    fn rejects_beats_outside_set() {
        assert_eq!(
            config(1, 3, 60).validate(),
            Err(ValidationError::UnsupportedBeats { got: 3 })
        );
        assert_eq!(
            config(1, 0, 60).validate(),
            Err(ValidationError::NotPositive {
                field: "beats_per_cycle"
            })
        );
    }

    #[test]
    fn interval_is_sixty_over_bpm() {
        assert_eq!(config(1, 4, 120).interval_secs(), 0.5);
        assert_eq!(config(1, 4, 60).interval_secs(), 1.0);
        assert!((config(1, 4, 80).interval_secs() - 0.75).abs() < f64::EPSILON);
    }
}
