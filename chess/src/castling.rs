//! Castling rules
//!
//! There is no separate castling rights state. Castling is available if the king and the rook
//! still stand on their initial squares and neither of them has ever moved, as recorded by
//! [`Piece::has_moved()`](crate::types::Piece::has_moved). A rook which arrives on the corner
//! square from elsewhere has already moved, so it never grants castling.

use crate::attack;
use crate::board::Board;
use crate::geometry;
use crate::moves::Move;
use crate::types::{CastlingSide, Color, Coord, File, PieceKind};

/// Initial square of the king of color `c`
pub const fn king_src(c: Color) -> Coord {
    Coord::from_parts(geometry::KING_FILE, geometry::castling_rank(c))
}

/// Initial square of the rook which castles with side `s`
pub const fn rook_src(c: Color, s: CastlingSide) -> Coord {
    let file = match s {
        CastlingSide::King => geometry::KINGSIDE_ROOK_FILE,
        CastlingSide::Queen => geometry::QUEENSIDE_ROOK_FILE,
    };
    Coord::from_parts(file, geometry::castling_rank(c))
}

/// Square on which the king lands after castling, two files away from its initial square
pub const fn king_dst(c: Color, s: CastlingSide) -> Coord {
    let file = match s {
        CastlingSide::King => File::G,
        CastlingSide::Queen => File::C,
    };
    Coord::from_parts(file, geometry::castling_rank(c))
}

/// Square on which the rook lands after castling, next to the king's initial square
pub const fn rook_dst(c: Color, s: CastlingSide) -> Coord {
    let file = match s {
        CastlingSide::King => File::F,
        CastlingSide::Queen => File::D,
    };
    Coord::from_parts(file, geometry::castling_rank(c))
}

fn is_unmoved(b: &Board, c: Coord, color: Color, kind: PieceKind) -> bool {
    b.get(c).map_or(false, |p| p.is(color, kind) && !p.has_moved())
}

/// Returns `true` if the side `color` can castle with side `side` in position `b`
///
/// The following conditions must hold:
///
/// - the king and the rook are on their initial squares and have never moved;
/// - all the squares strictly between them are empty;
/// - the king's square, the square it passes and its destination are not attacked.
pub fn is_available(b: &Board, color: Color, side: CastlingSide) -> bool {
    let king = king_src(color);
    let rook = rook_src(color, side);
    if !is_unmoved(b, king, color, PieceKind::King) || !is_unmoved(b, rook, color, PieceKind::Rook)
    {
        return false;
    }

    let (lo, hi) = if king.col() < rook.col() {
        (king.col(), rook.col())
    } else {
        (rook.col(), king.col())
    };
    let blocked = (lo + 1..hi)
        .any(|col| Coord::from_row_col(king.row(), col).map_or(true, |c| !b.is_free(c)));
    if blocked {
        return false;
    }

    let inv = color.inv();
    [king, rook_dst(color, side), king_dst(color, side)]
        .into_iter()
        .all(|c| !attack::is_cell_attacked(b, c, inv))
}

/// Iterates over the castling moves available to `color`
pub fn candidates(b: &Board, color: Color) -> impl Iterator<Item = Move> + '_ {
    [CastlingSide::King, CastlingSide::Queen]
        .into_iter()
        .filter(move |&side| is_available(b, color, side))
        .map(move |side| Move::from_castling(color, side))
}
