//! Sharing a [`Game`] between a timer thread and an input loop.
//!
//! The engine itself is single-writer. [`SharedGame`] routes every call
//! through one mutex so steps from a [`Ticker`] and player commands never
//! interleave.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use crate::game::{Command, Game, GameEvent};
use crate::grid::Grid;

/// What a renderer needs from one tick, taken under a single lock.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Snapshot {
    pub state: Grid,
    pub score: u32,
    pub lines_cleared: u32,
    pub over: bool,
}

#[derive(Clone)]
pub struct SharedGame {
    inner: Arc<Mutex<Game>>,
}

impl SharedGame {
    pub fn new(game: Game) -> Self {
        Self {
            inner: Arc::new(Mutex::new(game)),
        }
    }

    /// Locks the game for a sequence of calls. Poisoned locks are recovered.
    pub fn lock(&self) -> MutexGuard<'_, Game> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn apply(&self, command: Command) -> bool {
        self.lock().apply(command)
    }

    pub fn restart(&self) {
        self.lock().restart();
    }

    pub fn take_events(&self) -> Vec<GameEvent> {
        self.lock().take_events()
    }

    pub fn snapshot(&self) -> Snapshot {
        let game = self.lock();
        Snapshot {
            state: game.current_state(),
            score: game.score(),
            lines_cleared: game.lines_cleared(),
            over: game.is_over(),
        }
    }

    /// Starts a thread calling [`Game::step`] every `interval` until the game
    /// ends or the returned [`Ticker`] is stopped.
    pub fn spawn_ticker(&self, interval: Duration) -> Ticker {
        let stop = Arc::new(AtomicBool::new(false));
        let handle = thread::spawn({
            let game = self.clone();
            let stop = Arc::clone(&stop);
            move || {
                let mut next = Instant::now() + interval;
                while !stop.load(Ordering::Acquire) {
                    let now = Instant::now();
                    if now < next {
                        thread::park_timeout(next - now);
                        continue;
                    }
                    next += interval;
                    if game.lock().step() {
                        break;
                    }
                }
            }
        });
        Ticker {
            stop,
            handle: Some(handle),
        }
    }
}

/// Handle to a running step timer. Dropping it stops the timer.
pub struct Ticker {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Stops the timer and waits for its thread to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    /// Whether the timer thread has exited, either stopped or because the game ended.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            handle.thread().unpark();
            let _ = handle.join();
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
