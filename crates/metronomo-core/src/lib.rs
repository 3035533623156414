//! # Metronomo Core Library
//!
//! Core logic for the Metronomo cycle metronome: given a beats-per-minute
//! rate, a number of beats per cycle and a number of cycles, it emits one
//! timed beat per interval, tracks position within and across cycles,
//! optionally substitutes a silent "breath" beat, and signals completion.
//!
//! ## Architecture
//!
//! - **Engine**: a caller-driven state machine ([`MetronomeEngine`]) that
//!   owns the run counters and the transition function; it never schedules
//!   anything itself
//! - **Driver**: a tokio binding ([`Conductor`]) that asks the runtime for
//!   periodic ticks, feeds them to the engine and dispatches the results to
//!   a presenter and a chime
//! - **Storage**: TOML-based defaults at `~/.config/metronomo/config.toml`
//!
//! Rendering and sound live behind the [`BeatPresenter`] and [`Chime`]
//! traits; a CLI front end provides terminal implementations.

pub mod driver;
pub mod error;
pub mod events;
pub mod metronome;
pub mod output;
pub mod storage;

pub use driver::Conductor;
pub use error::{ConfigError, CoreError, Result, ValidationError};
pub use events::{BeatEvent, Event};
pub use metronome::{BeatColor, MetronomeEngine, Phase, RunConfig, TickOutcome, ACCEPTED_BEATS};
pub use output::{BeatPresenter, Chime, NullChime};
pub use storage::Config;
