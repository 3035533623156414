mod config;
mod engine;
mod palette;

pub use config::{RunConfig, ACCEPTED_BEATS};
pub use engine::{MetronomeEngine, Phase, TickOutcome};
pub use palette::BeatColor;
