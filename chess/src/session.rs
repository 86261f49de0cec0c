//! Game with a running clock
//!
//! [`Session`] shares its [`Game`] with a background ticker thread, which counts the time of the
//! side to move. Moves and ticks take the same lock, so a tick never interleaves with a move.

use crate::game::{Game, GameError, MoveError, Status};
use crate::movegen::MoveList;
use crate::notation::MoveRecord;
use crate::types::{Color, Coord};

use std::ops::Deref;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, warn};

fn lock(game: &Mutex<Game>) -> MutexGuard<'_, Game> {
    // Every mutation of the game completes before the lock is released
    game.lock().unwrap_or_else(PoisonError::into_inner)
}

struct Ticker {
    stop_tx: Sender<()>,
    handle: JoinHandle<()>,
}

impl Ticker {
    fn spawn(game: Arc<Mutex<Game>>, period: Duration) -> Ticker {
        let (stop_tx, stop_rx) = mpsc::channel();
        debug!("starting ticker with period {:?}", period);
        let handle = thread::spawn(move || loop {
            match stop_rx.recv_timeout(period) {
                Err(RecvTimeoutError::Timeout) => {
                    let mut game = lock(&game);
                    game.tick();
                    if !game.clock().is_running() {
                        debug!("clock stopped, ticker exits");
                        break;
                    }
                }
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        });
        Ticker { stop_tx, handle }
    }

    fn is_alive(&self) -> bool {
        !self.handle.is_finished()
    }

    fn stop(self) {
        // The thread may have exited already, so the channel may be closed
        let _ = self.stop_tx.send(());
        if self.handle.join().is_err() {
            warn!("ticker thread panicked");
        }
        debug!("ticker stopped");
    }
}

/// Read-only access to the game of a [`Session`]
///
/// The ticker waits while the guard is held.
pub struct GameRef<'a>(MutexGuard<'a, Game>);

impl Deref for GameRef<'_> {
    type Target = Game;

    fn deref(&self) -> &Game {
        &self.0
    }
}

/// Game session with a clock driven by a background thread
///
/// The ticker thread is started by the first move and counts one second of the side to move per
/// tick period. It is stopped and joined before the session is paused, reset or dropped, so no
/// tick ever reaches a replaced game. It also exits by itself once the clock stops, for example
/// when the game is finished.
///
/// # Example
///
/// ```
/// # use chessrules::{Game, session::Session};
/// #
/// let mut session = Session::new(Game::new());
/// session.make_move("e2".parse().unwrap(), "e4".parse().unwrap()).unwrap();
/// assert!(session.lock().clock().is_running());
/// session.pause();
/// assert!(!session.lock().clock().is_running());
/// ```
pub struct Session {
    game: Arc<Mutex<Game>>,
    ticker: Option<Ticker>,
    period: Duration,
}

impl Session {
    /// Real-time tick period
    pub const DEFAULT_PERIOD: Duration = Duration::from_secs(1);

    pub fn new(game: Game) -> Self {
        Self::with_period(game, Self::DEFAULT_PERIOD)
    }

    /// Creates a session which counts one clock second per `period` of real time
    pub fn with_period(game: Game, period: Duration) -> Self {
        Session {
            game: Arc::new(Mutex::new(game)),
            ticker: None,
            period,
        }
    }

    /// Locks the game for reading
    ///
    /// Changes go through the session methods, which keep the ticker in step with the clock.
    pub fn lock(&self) -> GameRef<'_> {
        GameRef(lock(&self.game))
    }

    pub fn status(&self) -> Status {
        self.lock().status()
    }

    /// See [`Game::valid_moves()`]
    pub fn valid_moves(&self, src: Coord) -> MoveList {
        self.lock().valid_moves(src)
    }

    /// See [`Game::is_valid_move()`]
    pub fn is_valid_move(&self, src: Coord, dst: Coord) -> bool {
        self.lock().is_valid_move(src, dst)
    }

    /// Returns `true` if the ticker thread is running
    pub fn is_ticking(&self) -> bool {
        self.ticker.as_ref().map_or(false, Ticker::is_alive)
    }

    fn ensure_ticker(&mut self) {
        if self.is_ticking() {
            return;
        }
        self.stop_ticker();
        self.ticker = Some(Ticker::spawn(Arc::clone(&self.game), self.period));
    }

    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.stop();
        }
    }

    fn sync_ticker(&mut self, running: bool) {
        if running {
            self.ensure_ticker();
        } else {
            self.stop_ticker();
        }
    }

    /// Applies the move from `src` to `dst`, see [`Game::make_move()`]
    pub fn make_move(&mut self, src: Coord, dst: Coord) -> Result<MoveRecord, MoveError> {
        let (rec, running) = {
            let mut game = lock(&self.game);
            let rec = *game.make_move(src, dst)?;
            (rec, game.clock().is_running())
        };
        self.sync_ticker(running);
        Ok(rec)
    }

    /// Makes `side` lose by resignation
    pub fn resign(&mut self, side: Color) -> Result<(), GameError> {
        let res = lock(&self.game).resign(side);
        self.stop_ticker();
        res
    }

    /// Stops the clock and the ticker
    pub fn pause(&mut self) {
        self.stop_ticker();
        lock(&self.game).pause();
    }

    /// Restarts the clock stopped by [`Session::pause()`]
    pub fn resume(&mut self) {
        let running = {
            let mut game = lock(&self.game);
            game.resume();
            game.clock().is_running()
        };
        self.sync_ticker(running);
    }

    /// Starts a new game, keeping the time control
    pub fn reset(&mut self) {
        self.stop_ticker();
        lock(&self.game).reset();
    }

    pub fn set_time_control(&mut self, minutes: u32) {
        lock(&self.game).set_time_control(minutes);
    }

    pub fn set_increment(&mut self, secs: u32) {
        lock(&self.game).set_increment(secs);
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.stop_ticker();
    }
}
