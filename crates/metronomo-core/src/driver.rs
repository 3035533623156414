//! Tokio run driver.
//!
//! [`Conductor`] binds the pure [`MetronomeEngine`] to a tick source
//! (`tokio::time`), a presenter and a chime. It owns the scheduling
//! policy: a slightly deferred first beat, a fixed repeating period with
//! no catch-up of missed beats, and a run-generation token so a tick that
//! was already in flight when its run was stopped or superseded is
//! discarded instead of mutating a newer run.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, trace};

use crate::error::ValidationError;
use crate::events::Event;
use crate::metronome::{MetronomeEngine, Phase, RunConfig, TickOutcome};
use crate::output::{BeatPresenter, Chime};

/// Delay before the first beat so the presenter can mount first. The
/// repeating schedule is anchored at the same instant, so the first beat
/// is neither lost nor doubled.
const FIRST_BEAT_DELAY: Duration = Duration::from_millis(120);

const EVENT_CHANNEL_CAPACITY: usize = 64;

fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Drives metronome runs on a tokio runtime.
///
/// `start` and `stop` may be called from any context; tick processing is
/// serialized with them through the engine lock, and a generation token
/// keeps a superseded run's pending tick from ever reaching the engine.
pub struct Conductor {
    engine: Arc<Mutex<MetronomeEngine>>,
    generation: Arc<AtomicU64>,
    presenter: Arc<Mutex<dyn BeatPresenter>>,
    chime: Arc<dyn Chime>,
    events: broadcast::Sender<Event>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Conductor {
    pub fn new(presenter: impl BeatPresenter + 'static, chime: impl Chime + 'static) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            engine: Arc::new(Mutex::new(MetronomeEngine::new())),
            generation: Arc::new(AtomicU64::new(0)),
            presenter: Arc::new(Mutex::new(presenter)),
            chime: Arc::new(chime),
            events,
            task: Mutex::new(None),
        }
    }

    /// Subscribes to the run event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    /// Current engine state snapshot.
    pub fn snapshot(&self) -> Event {
        lock(&self.engine).snapshot()
    }

    /// Start a run, superseding any run already in flight. Two tick
    /// streams are never live at once.
    ///
    /// Rejection leaves a run in flight untouched. Must be called from
    /// within a tokio runtime.
    pub fn start(&self, config: RunConfig) -> Result<(), ValidationError> {
        config.validate()?;
        self.halt();

        // A fresh token per run; ticks scheduled for any earlier run
        // compare against this and drop themselves.
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let started = lock(&self.engine).start(config)?;
        info!(
            total_cycles = config.total_cycles,
            beats_per_cycle = config.beats_per_cycle,
            bpm = config.bpm,
            breath = config.breath_enabled,
            "run started"
        );
        self.events.send(started).ok();

        let engine = Arc::clone(&self.engine);
        let generations = Arc::clone(&self.generation);
        let presenter = Arc::clone(&self.presenter);
        let chime = Arc::clone(&self.chime);
        let events = self.events.clone();
        let period = Duration::from_secs_f64(config.interval_secs());

        let handle = tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + FIRST_BEAT_DELAY, period);
            // A missed or delayed tick is simply the next tick; skipped
            // beats are never replayed.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                // Dispatch happens under the engine lock so that `stop`,
                // which also takes it, cannot return while a beat is
                // still being delivered.
                let mut engine = lock(&engine);
                if generations.load(Ordering::SeqCst) != generation {
                    trace!("discarding tick for a superseded run");
                    return;
                }
                match engine.tick() {
                    Some(TickOutcome::Beat(beat)) => {
                        debug!(
                            cycle = beat.cycle,
                            beat = beat.beat,
                            breath = beat.is_breath,
                            "beat"
                        );
                        lock(&presenter).show(&beat);
                        if !beat.is_breath {
                            chime.play();
                        }
                        events.send(Event::Beat(beat)).ok();
                    }
                    Some(TickOutcome::Completed { total_cycles }) => {
                        info!(total_cycles, "run completed");
                        lock(&presenter).dismiss();
                        events
                            .send(Event::RunCompleted {
                                total_cycles,
                                at: Utc::now(),
                            })
                            .ok();
                        return;
                    }
                    None => return,
                }
            }
        });
        *lock(&self.task) = Some(handle);
        Ok(())
    }

    /// Stop the current run. Idempotent; once this returns, no further
    /// beat is presented.
    pub fn stop(&self) {
        if self.halt() {
            info!("run stopped");
            self.events.send(Event::RunStopped { at: Utc::now() }).ok();
        }
    }

    /// Tear down any active run. Returns whether one was running.
    fn halt(&self) -> bool {
        // Invalidate the token first: a tick already past its timer but
        // not yet at the engine lock becomes a no-op.
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(task) = lock(&self.task).take() {
            task.abort();
        }
        let was_running = {
            let mut engine = lock(&self.engine);
            let active = engine.phase() == Phase::Running;
            engine.stop();
            active
        };
        if was_running {
            lock(&self.presenter).dismiss();
        }
        was_running
    }
}

impl Drop for Conductor {
    fn drop(&mut self) {
        if let Some(task) = lock(&self.task).take() {
            task.abort();
        }
    }
}
