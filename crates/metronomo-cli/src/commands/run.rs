use clap::Args;
use metronomo_core::{Conductor, Config, Event, NullChime, RunConfig};

use crate::terminal::{BellChime, TerminalPresenter};

#[derive(Args)]
pub struct RunArgs {
    /// Number of cycles
    #[arg(long)]
    cycles: Option<u32>,
    /// Beats per cycle (2, 4 or 8)
    #[arg(long)]
    beats: Option<u32>,
    /// Beats per minute
    #[arg(long)]
    bpm: Option<u32>,
    /// Replace the last beat of each cycle with a silent breath
    #[arg(long)]
    breath: bool,
    /// Disable the audible chime
    #[arg(long)]
    silent: bool,
    /// Print events as JSON lines instead of the colored display
    #[arg(long)]
    json: bool,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let stored = Config::load();
    let defaults = stored.run_config();
    let config = RunConfig {
        total_cycles: args.cycles.unwrap_or(defaults.total_cycles),
        beats_per_cycle: args.beats.unwrap_or(defaults.beats_per_cycle),
        bpm: args.bpm.unwrap_or(defaults.bpm),
        breath_enabled: args.breath || defaults.breath_enabled,
    };
    let audible = stored.sound.enabled && !args.silent;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(drive(config, audible, args.json))
}

async fn drive(
    config: RunConfig,
    audible: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let presenter = TerminalPresenter::new(json);
    let conductor = if audible {
        Conductor::new(presenter, BellChime)
    } else {
        Conductor::new(presenter, NullChime)
    };

    let mut events = conductor.subscribe();
    conductor.start(config)?;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                conductor.stop();
                if !json {
                    println!("Stopped.");
                }
                break;
            }
            event = events.recv() => match event {
                Ok(started @ Event::RunStarted { .. }) => {
                    if json {
                        println!("{}", serde_json::to_string(&started)?);
                    } else if let Event::RunStarted { total_cycles, beats_per_cycle, bpm, .. } = started {
                        println!("{total_cycles} cycles of {beats_per_cycle} beats at {bpm} bpm");
                    }
                }
                Ok(completed @ Event::RunCompleted { .. }) => {
                    if json {
                        println!("{}", serde_json::to_string(&completed)?);
                    } else if let Event::RunCompleted { total_cycles, .. } = completed {
                        println!("Completed {total_cycles} cycles.");
                    }
                    break;
                }
                Ok(stopped @ Event::RunStopped { .. }) => {
                    if json {
                        println!("{}", serde_json::to_string(&stopped)?);
                    }
                    break;
                }
                // Beats are rendered by the presenter.
                Ok(_) => {}
                Err(_) => break,
            },
        }
    }
    Ok(())
}
