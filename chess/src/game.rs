//! Game state machine

use crate::board::{Board, PlacementParseError, ValidateError};
use crate::clock::{Clock, TimeControl};
use crate::movegen::{self, MoveList};
use crate::moves::{self, Move};
use crate::notation::{MoveRecord, NotationList, NumberPolicy};
use crate::types::{Color, ColorParseError, Coord, DrawReason, Outcome, Piece, WinReason};

use std::fmt;

use log::{debug, trace};
use thiserror::Error;

/// Error parsing [`Game`] from FEN
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum FenParseError {
    /// FEN must contain piece placement and the side to move
    #[error("expected 2 fields, found {0}")]
    BadFieldCount(usize),
    /// Piece placement cannot be parsed
    #[error("cannot parse placement: {0}")]
    Placement(#[from] PlacementParseError),
    /// Side to move cannot be parsed
    #[error("cannot parse side: {0}")]
    Side(#[from] ColorParseError),
    /// Position was parsed, but it's invalid
    #[error("invalid position: {0}")]
    Valid(#[from] ValidateError),
}

/// Reason why a move was rejected
///
/// A rejected move never changes the game.
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum MoveError {
    #[error("game is finished")]
    Finished,
    #[error("no piece on {0}")]
    NoPiece(Coord),
    #[error("piece on {0} belongs to the side not to move")]
    WrongSide(Coord),
    #[error("move {src}{dst} is not legal")]
    Illegal { src: Coord, dst: Coord },
}

#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum GameError {
    #[error("game is finished")]
    Finished,
}

/// Game status
///
/// `Finished` is terminal: once the game is finished, no move, tick or resignation changes it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Status {
    /// The game goes on, `side` is to move
    Running { side: Color, check: bool },
    /// The game is over
    Finished(Outcome),
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            Status::Running { side, check: true } => {
                write!(f, "{} is in check!", side.as_long_str())
            }
            Status::Running { side, check: false } => {
                write!(f, "{} to move", side.as_long_str())
            }
            Status::Finished(outcome @ Outcome::Win { .. }) => write!(f, "{}!", outcome),
            Status::Finished(outcome) => write!(f, "{}", outcome),
        }
    }
}

/// Chess game
///
/// Owns the board, the side to move, the history of applied moves, the captured pieces and the
/// clock. The only way to change the position is [`Game::make_move()`], which either applies a
/// legal move completely or rejects it without any change.
///
/// # Example
///
/// ```
/// # use chessrules::{Color, Game, Outcome, WinReason};
/// #
/// let mut game = Game::new();
/// for (src, dst) in [("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")] {
///     game.make_move(src.parse().unwrap(), dst.parse().unwrap()).unwrap();
/// }
/// assert!(game.is_checkmate());
/// assert_eq!(game.outcome(), Some(Outcome::win(Color::Black, WinReason::Checkmate)));
/// assert_eq!(game.status().to_string(), "Black wins by checkmate!");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    board: Board,
    side: Color,
    history: Vec<MoveRecord>,
    captured: [Vec<Piece>; 2],
    status: Status,
    clock: Clock,
    time_control: TimeControl,
}

impl Game {
    /// Creates a game from the initial position with the default time control
    pub fn new() -> Game {
        Game::with_time_control(TimeControl::default())
    }

    /// Creates a game from the initial position with the time control `tc`
    pub fn with_time_control(tc: TimeControl) -> Game {
        Game {
            board: Board::initial(),
            side: Color::White,
            history: Vec::new(),
            captured: [Vec::new(), Vec::new()],
            status: Status::Running {
                side: Color::White,
                check: false,
            },
            clock: Clock::new(tc),
            time_control: tc,
        }
    }

    /// Creates a game from the position `board` with `side` to move
    ///
    /// The position is validated first. If there are no legal moves in it, the game is
    /// finished right away.
    pub fn from_position(board: Board, side: Color) -> Result<Game, ValidateError> {
        board.validate(side)?;
        let mut res = Game {
            board,
            side,
            ..Game::new()
        };
        res.update_status();
        Ok(res)
    }

    /// Creates a game from the piece placement and the side to move, like
    /// `"7k/5K2/8/6Q1/8/8/8/8 w"`
    pub fn from_fen(s: &str) -> Result<Game, FenParseError> {
        let fields: Vec<_> = s.split_ascii_whitespace().collect();
        if fields.len() != 2 {
            return Err(FenParseError::BadFieldCount(fields.len()));
        }
        let board = Board::from_placement(fields[0])?;
        let side: Color = fields[1].parse()?;
        Ok(Game::from_position(board, side)?)
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the side to move
    #[inline]
    pub fn side(&self) -> Color {
        self.side
    }

    /// Returns all the applied moves, the first one played is the first
    #[inline]
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    /// Returns the number of the current move, starting from 1
    #[inline]
    pub fn move_number(&self) -> usize {
        self.history.len() / 2 + 1
    }

    /// Returns the pieces captured by `color`, in capture order
    #[inline]
    pub fn captured(&self, color: Color) -> &[Piece] {
        &self.captured[color.index()]
    }

    #[inline]
    pub fn status(&self) -> Status {
        self.status
    }

    #[inline]
    pub fn outcome(&self) -> Option<Outcome> {
        match self.status {
            Status::Finished(outcome) => Some(outcome),
            Status::Running { .. } => None,
        }
    }

    #[inline]
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    #[inline]
    pub fn time_control(&self) -> TimeControl {
        self.time_control
    }

    /// Returns `true` if the side to move is in check
    pub fn is_check(&self) -> bool {
        match self.status {
            Status::Running { check, .. } => check,
            Status::Finished(Outcome::Win {
                reason: WinReason::Checkmate,
                ..
            }) => true,
            Status::Finished(_) => false,
        }
    }

    pub fn is_checkmate(&self) -> bool {
        matches!(
            self.status,
            Status::Finished(Outcome::Win {
                reason: WinReason::Checkmate,
                ..
            })
        )
    }

    pub fn is_stalemate(&self) -> bool {
        self.status == Status::Finished(Outcome::Draw(DrawReason::Stalemate))
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.status, Status::Finished(_))
    }

    /// Returns the legal moves of the piece on `src`
    ///
    /// The moves are generated for the piece's own color, whichever side is to move. The list
    /// is empty if `src` is empty.
    pub fn valid_moves(&self, src: Coord) -> MoveList {
        movegen::legal::moves_from(&self.board, src)
    }

    /// Returns `true` if [`Game::make_move()`] would accept the move from `src` to `dst`
    pub fn is_valid_move(&self, src: Coord, dst: Coord) -> bool {
        self.find_move(src, dst).is_ok()
    }

    fn find_move(&self, src: Coord, dst: Coord) -> Result<Move, MoveError> {
        if self.is_finished() {
            return Err(MoveError::Finished);
        }
        let piece = self.board.get(src).ok_or(MoveError::NoPiece(src))?;
        if piece.color() != self.side {
            return Err(MoveError::WrongSide(src));
        }
        self.valid_moves(src)
            .find_dst(dst)
            .ok_or(MoveError::Illegal { src, dst })
    }

    /// Applies the move from `src` to `dst` if it is legal for the side to move
    ///
    /// Castling is requested by moving the king two squares towards the rook. A pawn reaching the
    /// last rank is always promoted to a queen. After the move, the mover receives the clock
    /// increment, and the clock starts if it was the first move of the game.
    pub fn make_move(&mut self, src: Coord, dst: Coord) -> Result<&MoveRecord, MoveError> {
        let mv = self.find_move(src, dst).map_err(|e| {
            trace!("rejected move {}{}: {}", src, dst, e);
            e
        })?;
        let made =
            moves::make_move_unchecked(&mut self.board, mv).ok_or(MoveError::NoPiece(src))?;

        let mover = self.side;
        if let Some(captured) = made.captured {
            self.captured[mover.index()].push(captured);
        }
        let rec = MoveRecord::new(mv, &made);
        debug!("{} plays {} ({})", mover.as_long_str(), rec, mv);
        self.history.push(rec);

        self.clock.add_increment(mover);
        if self.history.len() == 1 {
            self.clock.start();
        }

        self.side = mover.inv();
        self.update_status();

        Ok(&self.history[self.history.len() - 1])
    }

    fn update_status(&mut self) {
        let check = self.board.is_check(self.side);
        if movegen::has_legal_moves(&self.board, self.side) {
            self.status = Status::Running {
                side: self.side,
                check,
            };
            return;
        }
        let outcome = if check {
            Outcome::win(self.side.inv(), WinReason::Checkmate)
        } else {
            Outcome::Draw(DrawReason::Stalemate)
        };
        self.finish(outcome);
    }

    fn finish(&mut self, outcome: Outcome) {
        debug!("game finished: {}", outcome);
        self.status = Status::Finished(outcome);
        self.clock.stop();
    }

    /// Makes `side` lose by resignation
    pub fn resign(&mut self, side: Color) -> Result<(), GameError> {
        if self.is_finished() {
            return Err(GameError::Finished);
        }
        self.finish(Outcome::win(side.inv(), WinReason::Resign));
        Ok(())
    }

    /// Counts one elapsed second for the side to move
    ///
    /// Does nothing if the clock is not running. If the time of the side to move expires, the
    /// opponent wins on time.
    pub fn tick(&mut self) {
        if self.is_finished() || !self.clock.is_running() {
            return;
        }
        if self.clock.tick(self.side) {
            debug!("{} ran out of time", self.side.as_long_str());
            self.finish(Outcome::win(self.side.inv(), WinReason::TimeForfeit));
        }
    }

    /// Stops the clock
    pub fn pause(&mut self) {
        self.clock.stop();
    }

    /// Restarts the clock stopped by [`Game::pause()`]
    ///
    /// The clock doesn't run before the first move or after the game is finished.
    pub fn resume(&mut self) {
        if !self.is_finished() && !self.history.is_empty() {
            self.clock.start();
        }
    }

    /// Starts a new game from the initial position, keeping the time control
    pub fn reset(&mut self) {
        debug!("game reset");
        *self = Game::with_time_control(self.time_control);
    }

    /// Sets the initial time to `minutes` and resets both clocks to it
    pub fn set_time_control(&mut self, minutes: u32) {
        self.time_control.minutes = minutes;
        self.clock.set_minutes(minutes);
    }

    /// Sets the number of seconds added after each move
    pub fn set_increment(&mut self, secs: u32) {
        self.time_control.increment = secs;
        self.clock.set_increment(secs);
    }

    /// Returns a wrapper to display the history, like `1. e4 e5 2. Nf3`
    pub fn notation_list(&self, policy: NumberPolicy) -> NotationList<'_> {
        NotationList::new(&self.history, policy)
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}
