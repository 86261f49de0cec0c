//! Rules engine for standard chess
//!
//! The crate enumerates legal moves, validates and applies them, detects check, checkmate and
//! stalemate, and keeps a per-side clock. En passant and under-promotion are not part of the
//! rules: a pawn reaching the last rank always becomes a queen.
//!
//! The main entry point is [`Game`]. For a game with a clock running in real time, see
//! [`session::Session`].
//!
//! # Example
//!
//! ```
//! # use chessrules::{Game, notation::Style};
//! #
//! let mut game = Game::new();
//! let rec = game.make_move("e2".parse().unwrap(), "e4".parse().unwrap()).unwrap();
//! assert_eq!(rec.notation(Style::Algebraic).to_string(), "e4");
//! assert_eq!(game.status().to_string(), "Black to move");
//! assert_eq!(game.valid_moves("g8".parse().unwrap()).len(), 2);
//! ```

pub mod attack;
pub mod board;
pub mod castling;
pub mod clock;
pub mod game;
pub mod legal;
pub mod movegen;
pub mod moves;
pub mod notation;
pub mod session;

pub use chessrules_base::{bitboard, geometry, types};

pub use bitboard::Bitboard;
pub use board::Board;
pub use clock::{Clock, TimeControl};
pub use game::{Game, Status};
pub use movegen::MoveList;
pub use moves::{Move, MoveKind};
pub use notation::MoveRecord;
pub use types::{
    CastlingSide, Color, Coord, DrawReason, File, Outcome, Piece, PieceKind, Rank, WinReason,
};
