//! Moves and applying them to the board

use crate::board::Board;
use crate::legal::Checker;
use crate::types::{CastlingSide, Color, Coord, Piece, PieceKind};
use crate::{attack, castling, geometry};

use std::fmt;

use thiserror::Error;

/// Move kind
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveKind {
    /// Any move except castling, including captures and promotions
    #[default]
    Simple = 0,
    /// Kingside castling
    CastlingKingside = 1,
    /// Queenside castling
    CastlingQueenside = 2,
}

impl From<CastlingSide> for MoveKind {
    #[inline]
    fn from(side: CastlingSide) -> Self {
        match side {
            CastlingSide::King => Self::CastlingKingside,
            CastlingSide::Queen => Self::CastlingQueenside,
        }
    }
}

impl TryFrom<MoveKind> for CastlingSide {
    type Error = ();

    #[inline]
    fn try_from(kind: MoveKind) -> Result<Self, Self::Error> {
        match kind {
            MoveKind::CastlingKingside => Ok(Self::King),
            MoveKind::CastlingQueenside => Ok(Self::Queen),
            MoveKind::Simple => Err(()),
        }
    }
}

/// Error indicating that move is invalid
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum ValidateError {
    /// Move is not semi-legal
    #[error("move is not semi-legal")]
    NotSemiLegal,
    /// Move is not legal
    #[error("move is not legal")]
    NotLegal,
}

/// Chess move
///
/// Represents a candidate move from `src` to `dst`. The color of the moving side is not stored,
/// it is taken from the piece on `src`.
///
/// Moves can have different degrees of validity:
///
/// - _Semilegal_. A move is semilegal if the piece on `src` can reach `dst` by its movement
///   rules (or castle, for castling moves), except that its king can remain under attack.
///
/// - _Legal_. A move is legal if it's semilegal plus the king of the moving side is not attacked
///   after the move.
///
/// Pawns reaching the last rank are always promoted to a queen, so promotion needs no separate
/// move kind.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    kind: MoveKind,
    src: Coord,
    dst: Coord,
}

/// Summary of a move applied by [`make_move_unchecked()`]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Made {
    /// The moving piece, as it stood on the source square
    pub piece: Piece,
    /// The piece removed from the destination square
    pub captured: Option<Piece>,
    /// Whether the moving pawn was turned into a queen
    pub promoted: bool,
}

impl Move {
    /// Creates a non-castling move
    #[inline]
    pub const fn new(src: Coord, dst: Coord) -> Move {
        Move {
            kind: MoveKind::Simple,
            src,
            dst,
        }
    }

    /// Creates a castling move made by `color` with side `side`
    #[inline]
    pub fn from_castling(color: Color, side: CastlingSide) -> Move {
        Move {
            kind: MoveKind::from(side),
            src: castling::king_src(color),
            dst: castling::king_dst(color, side),
        }
    }

    #[inline]
    pub const fn kind(&self) -> MoveKind {
        self.kind
    }

    #[inline]
    pub const fn src(&self) -> Coord {
        self.src
    }

    #[inline]
    pub const fn dst(&self) -> Coord {
        self.dst
    }

    /// Returns the castling side if this is a castling move
    #[inline]
    pub fn castling_side(&self) -> Option<CastlingSide> {
        CastlingSide::try_from(self.kind).ok()
    }

    fn castling_color(&self) -> Color {
        if self.src.rank() == geometry::castling_rank(Color::White) {
            Color::White
        } else {
            Color::Black
        }
    }

    /// Returns the initial square of the castling rook, or `None` for non-castling moves
    pub fn rook_src(&self) -> Option<Coord> {
        self.castling_side()
            .map(|side| castling::rook_src(self.castling_color(), side))
    }

    /// Returns the square where the castling rook lands, or `None` for non-castling moves
    pub fn rook_dst(&self) -> Option<Coord> {
        self.castling_side()
            .map(|side| castling::rook_dst(self.castling_color(), side))
    }

    /// Returns `true` if the move is semilegal in position `b`
    pub fn is_semilegal(&self, b: &Board) -> bool {
        let piece = match b.get(self.src) {
            Some(piece) => piece,
            None => return false,
        };
        match self.castling_side() {
            Some(side) => {
                *self == Move::from_castling(piece.color(), side)
                    && castling::is_available(b, piece.color(), side)
            }
            None => attack::destinations(b, self.src).has(self.dst),
        }
    }

    /// Validates whether this move is semilegal in position `b`
    #[inline]
    pub fn semi_validate(&self, b: &Board) -> Result<(), ValidateError> {
        if !self.is_semilegal(b) {
            return Err(ValidateError::NotSemiLegal);
        }
        Ok(())
    }

    /// Validates whether this move is legal in position `b`
    pub fn validate(&self, b: &Board) -> Result<(), ValidateError> {
        self.semi_validate(b)?;
        match Checker::new(b).is_legal(*self) {
            true => Ok(()),
            false => Err(ValidateError::NotLegal),
        }
    }

    /// Applies the move to a copy of `b` and returns the new position
    ///
    /// The move is validated first, and `b` itself is never changed.
    pub fn make(&self, b: &Board) -> Result<Board, ValidateError> {
        self.validate(b)?;
        let mut res = b.clone();
        make_move_unchecked(&mut res, *self).ok_or(ValidateError::NotSemiLegal)?;
        Ok(res)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}{}", self.src, self.dst)
    }
}

/// Applies the move `mv` to the board `b`
///
/// The move is not validated, the caller must ensure that it is at least semilegal. Captured piece
/// is removed from the destination square, a pawn reaching the last rank becomes a queen and every
/// piece which moves is marked as moved. For castling, both the king and the rook are transferred.
///
/// Returns `None` and leaves the board intact if `src` is empty.
pub fn make_move_unchecked(b: &mut Board, mv: Move) -> Option<Made> {
    let piece = b.take(mv.src)?;
    let captured = b.take(mv.dst);

    let promoted = piece.kind() == PieceKind::Pawn
        && mv.dst.rank() == geometry::promote_dst_rank(piece.color());
    let landed = if promoted {
        Piece::new(piece.color(), PieceKind::Queen)
    } else {
        piece
    };
    b.put(mv.dst, landed.moved());

    if let (Some(rook_src), Some(rook_dst)) = (mv.rook_src(), mv.rook_dst()) {
        if let Some(rook) = b.take(rook_src) {
            b.put(rook_dst, rook.moved());
        }
    }

    Some(Made {
        piece,
        captured,
        promoted,
    })
}
