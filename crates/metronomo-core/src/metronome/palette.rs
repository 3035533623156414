//! Beat display colors.
//!
//! Explicit `beat -> color` mapping with a single neutral fallback for
//! out-of-palette keys. Breath beats always render neutral, never a
//! numbered-beat color.

use serde::{Deserialize, Serialize};

use crate::events::BeatEvent;

/// Display color for a numbered beat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BeatColor {
    Lime,
    Magenta,
    Cyan,
    Yellow,
    Orange,
    Blue,
    Purple,
    Red,
    /// Fallback for beats beyond the palette and for breath beats.
    Neutral,
}

impl BeatColor {
    /// Color for a raw beat number. Beats outside 1..=8 fall back to
    /// `Neutral`.
    pub fn for_beat(beat: u32) -> Self {
        match beat {
            1 => BeatColor::Lime,
            2 => BeatColor::Magenta,
            3 => BeatColor::Cyan,
            4 => BeatColor::Yellow,
            5 => BeatColor::Orange,
            6 => BeatColor::Blue,
            7 => BeatColor::Purple,
            8 => BeatColor::Red,
            _ => BeatColor::Neutral,
        }
    }

    /// Color for a beat event. A breath beat is always neutral regardless
    /// of its number.
    pub fn for_event(event: &BeatEvent) -> Self {
        if event.is_breath {
            BeatColor::Neutral
        } else {
            Self::for_beat(event.color_key)
        }
    }

    /// RGBA components in 0.0..=1.0.
    pub fn rgba(&self) -> [f32; 4] {
        match self {
            BeatColor::Lime => [57.0 / 255.0, 1.0, 20.0 / 255.0, 1.0],
            BeatColor::Magenta => [1.0, 0.0, 1.0, 1.0],
            BeatColor::Cyan => [0.0, 1.0, 1.0, 1.0],
            BeatColor::Yellow => [1.0, 1.0, 0.0, 1.0],
            BeatColor::Orange => [1.0, 117.0 / 255.0, 24.0 / 255.0, 1.0],
            BeatColor::Blue => [0.0, 98.0 / 255.0, 1.0, 1.0],
            BeatColor::Purple => [125.0 / 255.0, 0.0, 1.0, 1.0],
            BeatColor::Red => [1.0, 0.0, 0.0, 1.0],
            BeatColor::Neutral => [1.0, 1.0, 1.0, 1.0],
        }
    }
}
