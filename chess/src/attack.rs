//! Piece movement rules and attack detection
//!
//! All the functions here work on the raw board and know nothing about checks or castling.
//! The movement rules (`knight()`, `bishop()`, ...) return the squares a piece of given color could
//! move to from `src`, the attack functions (`attacks_from()`, `is_cell_attacked()`) return the
//! squares it controls.

use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::geometry;
use crate::types::{Color, Coord, PieceKind};

const KNIGHT_DELTAS: [(isize, isize); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_DELTAS: [(isize, isize); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

const DIAG_DIRS: [(isize, isize); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];
const LINE_DIRS: [(isize, isize); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

fn leaps(src: Coord, deltas: &[(isize, isize)]) -> Bitboard {
    deltas
        .iter()
        .filter_map(|&(d_col, d_row)| src.try_shift(d_col, d_row))
        .collect()
}

fn rays(b: &Board, src: Coord, dirs: &[(isize, isize)]) -> Bitboard {
    let mut res = Bitboard::EMPTY;
    for &(d_col, d_row) in dirs {
        let mut cur = src;
        while let Some(next) = cur.try_shift(d_col, d_row) {
            res.set(next);
            if !b.is_free(next) {
                break;
            }
            cur = next;
        }
    }
    res
}

fn without_own(b: &Board, color: Color, bb: Bitboard) -> Bitboard {
    bb.into_iter()
        .filter(|&c| b.get(c).map_or(true, |p| p.color() != color))
        .collect()
}

/// Squares a pawn of color `color` on `src` can advance to
///
/// This is one square forward if it is empty, plus two squares forward from the pawn's initial
/// rank when both squares are empty.
pub fn pawn_pushes(b: &Board, src: Coord, color: Color) -> Bitboard {
    let delta = geometry::pawn_forward_delta(color);
    let mut res = Bitboard::EMPTY;
    let one = match src.try_shift(0, delta) {
        Some(one) if b.is_free(one) => one,
        _ => return res,
    };
    res.set(one);
    if src.rank() == geometry::double_move_src_rank(color) {
        if let Some(two) = one.try_shift(0, delta) {
            if b.is_free(two) {
                res.set(two);
            }
        }
    }
    res
}

/// Squares attacked by a pawn of color `color` on `src`, regardless of their contents
pub fn pawn_attacks(src: Coord, color: Color) -> Bitboard {
    let delta = geometry::pawn_forward_delta(color);
    leaps(src, &[(-1, delta), (1, delta)])
}

/// Squares a pawn of color `color` on `src` can capture on
pub fn pawn_captures(b: &Board, src: Coord, color: Color) -> Bitboard {
    pawn_attacks(src, color)
        .into_iter()
        .filter(|&c| b.get(c).map_or(false, |p| p.color() != color))
        .collect()
}

pub fn knight(b: &Board, src: Coord, color: Color) -> Bitboard {
    without_own(b, color, leaps(src, &KNIGHT_DELTAS))
}

/// Squares a king can step to, castling excluded
pub fn king(b: &Board, src: Coord, color: Color) -> Bitboard {
    without_own(b, color, leaps(src, &KING_DELTAS))
}

pub fn bishop(b: &Board, src: Coord, color: Color) -> Bitboard {
    without_own(b, color, rays(b, src, &DIAG_DIRS))
}

pub fn rook(b: &Board, src: Coord, color: Color) -> Bitboard {
    without_own(b, color, rays(b, src, &LINE_DIRS))
}

pub fn queen(b: &Board, src: Coord, color: Color) -> Bitboard {
    bishop(b, src, color) | rook(b, src, color)
}

/// Returns the destinations of the piece on `src` according to its movement rules
///
/// Checks are not taken into account, castling is not included. If `src` is empty, returns an
/// empty set.
pub fn destinations(b: &Board, src: Coord) -> Bitboard {
    let piece = match b.get(src) {
        Some(piece) => piece,
        None => return Bitboard::EMPTY,
    };
    let color = piece.color();
    match piece.kind() {
        PieceKind::Pawn => pawn_pushes(b, src, color) | pawn_captures(b, src, color),
        PieceKind::King => king(b, src, color),
        PieceKind::Knight => knight(b, src, color),
        PieceKind::Bishop => bishop(b, src, color),
        PieceKind::Rook => rook(b, src, color),
        PieceKind::Queen => queen(b, src, color),
    }
}

/// Returns the squares attacked by the piece on `src`
///
/// Unlike [`destinations()`], pawns attack both forward diagonals even if they are empty, and
/// squares occupied by pieces of the same color are included, as the piece defends them. A king
/// attacks only its adjacent squares. If `src` is empty, returns an empty set.
pub fn attacks_from(b: &Board, src: Coord) -> Bitboard {
    let piece = match b.get(src) {
        Some(piece) => piece,
        None => return Bitboard::EMPTY,
    };
    match piece.kind() {
        PieceKind::Pawn => pawn_attacks(src, piece.color()),
        PieceKind::King => leaps(src, &KING_DELTAS),
        PieceKind::Knight => leaps(src, &KNIGHT_DELTAS),
        PieceKind::Bishop => rays(b, src, &DIAG_DIRS),
        PieceKind::Rook => rays(b, src, &LINE_DIRS),
        PieceKind::Queen => rays(b, src, &DIAG_DIRS) | rays(b, src, &LINE_DIRS),
    }
}

/// Returns `true` if any piece of color `by` attacks `coord`
pub fn is_cell_attacked(b: &Board, coord: Coord, by: Color) -> bool {
    b.pieces(by).any(|(src, _)| attacks_from(b, src).has(coord))
}

/// Returns the squares of all the pieces of color `by` which attack `coord`
pub fn cell_attackers(b: &Board, coord: Coord, by: Color) -> Bitboard {
    b.pieces(by)
        .filter(|&(src, _)| attacks_from(b, src).has(coord))
        .map(|(src, _)| src)
        .collect()
}

/// Returns `true` if the king of color `color` is attacked by the opponent
///
/// A board without such king is never in check.
pub fn is_check(b: &Board, color: Color) -> bool {
    b.king_pos(color)
        .map_or(false, |king| is_cell_attacked(b, king, color.inv()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{File, Piece, Rank};

    fn sq(s: &str) -> Coord {
        s.parse().unwrap()
    }

    fn squares(list: &[&str]) -> Bitboard {
        list.iter().map(|s| sq(s)).collect()
    }

    #[test]
    fn test_initial() {
        let b = Board::initial();
        assert_eq!(destinations(&b, sq("b1")), squares(&["a3", "c3"]));
        assert_eq!(destinations(&b, sq("g8")), squares(&["f6", "h6"]));
        assert_eq!(destinations(&b, sq("e2")), squares(&["e3", "e4"]));
        assert_eq!(destinations(&b, sq("d7")), squares(&["d6", "d5"]));
        for src in ["a1", "c1", "d1", "e1", "f1", "h1", "e8"] {
            assert_eq!(destinations(&b, sq(src)), Bitboard::EMPTY);
        }
        assert_eq!(destinations(&b, sq("e4")), Bitboard::EMPTY);
        assert!(!is_check(&b, Color::White));
        assert!(!is_check(&b, Color::Black));
    }

    #[test]
    fn test_pawns() {
        let b = Board::from_placement("4k3/8/8/3p4/4P3/8/1P6/4K3").unwrap();
        assert_eq!(pawn_pushes(&b, sq("e4"), Color::White), squares(&["e5"]));
        assert_eq!(pawn_captures(&b, sq("e4"), Color::White), squares(&["d5"]));
        assert_eq!(pawn_attacks(sq("e4"), Color::White), squares(&["d5", "f5"]));
        assert_eq!(pawn_captures(&b, sq("d5"), Color::Black), squares(&["e4"]));
        assert_eq!(pawn_pushes(&b, sq("b2"), Color::White), squares(&["b3", "b4"]));

        let b = Board::from_placement("4k3/8/8/8/8/1n6/1P6/4K3").unwrap();
        assert_eq!(pawn_pushes(&b, sq("b2"), Color::White), Bitboard::EMPTY);
        let b = Board::from_placement("4k3/8/8/8/1n6/8/1P6/4K3").unwrap();
        assert_eq!(pawn_pushes(&b, sq("b2"), Color::White), squares(&["b3"]));

        // Edge files attack only one square
        assert_eq!(pawn_attacks(sq("a7"), Color::Black), squares(&["b6"]));
        assert_eq!(pawn_attacks(sq("h2"), Color::White), squares(&["g3"]));
    }

    #[test]
    fn test_sliders() {
        let b = Board::from_placement("4k3/8/1p6/8/3Q2P1/8/8/4K3").unwrap();
        let d4 = sq("d4");
        assert_eq!(
            rook(&b, d4, Color::White),
            squares(&["d1", "d2", "d3", "d5", "d6", "d7", "d8", "a4", "b4", "c4", "e4", "f4"])
        );
        assert_eq!(
            bishop(&b, d4, Color::White),
            squares(&["c5", "b6", "e5", "f6", "g7", "h8", "c3", "b2", "a1", "e3", "f2", "g1"])
        );
        assert_eq!(
            queen(&b, d4, Color::White),
            rook(&b, d4, Color::White) | bishop(&b, d4, Color::White)
        );
        // Own piece on g4 is defended but cannot be moved onto
        assert!(attacks_from(&b, d4).has(sq("g4")));
        assert!(!destinations(&b, d4).has(sq("g4")));
    }

    #[test]
    fn test_leapers() {
        let b = Board::from_placement("4k3/8/8/8/8/8/8/N3K3").unwrap();
        assert_eq!(knight(&b, sq("a1"), Color::White), squares(&["b3", "c2"]));
        assert_eq!(
            king(&b, sq("e1"), Color::White),
            squares(&["d1", "d2", "e2", "f2", "f1"])
        );
        assert_eq!(
            king(&b, sq("e8"), Color::Black),
            squares(&["d8", "d7", "e7", "f7", "f8"])
        );
    }

    #[test]
    fn test_cell_attackers() {
        let b = Board::from_placement("3R3B/8/3R4/1NP1Q3/3p4/1NP5/5B2/3R1K1k").unwrap();
        let d4 = Coord::from_parts(File::D, Rank::R4);
        assert!(is_cell_attacked(&b, d4, Color::White));
        assert_eq!(
            cell_attackers(&b, d4, Color::White),
            squares(&["d6", "b5", "e5", "b3", "c3", "f2", "d1"])
        );
        assert!(!is_cell_attacked(&b, d4, Color::Black));
        assert_eq!(cell_attackers(&b, d4, Color::Black), Bitboard::EMPTY);

        let b = Board::from_placement("8/8/8/2KPk3/8/8/8/8").unwrap();
        let d5 = sq("d5");
        assert_eq!(cell_attackers(&b, d5, Color::White), squares(&["c5"]));
        assert_eq!(cell_attackers(&b, d5, Color::Black), squares(&["e5"]));
    }

    #[test]
    fn test_check() {
        let b = Board::from_placement("4k3/8/8/8/8/8/8/4K2r").unwrap();
        assert!(is_check(&b, Color::White));
        assert!(!is_check(&b, Color::Black));

        let b = Board::from_placement("4k3/8/8/8/8/8/4P3/4K2r").unwrap();
        assert!(is_check(&b, Color::White));
        let b = Board::from_placement("4k3/8/8/8/8/8/8/4KB1r").unwrap();
        assert!(!is_check(&b, Color::White));

        let mut b = Board::empty();
        b.put(sq("e4"), Piece::new(Color::Black, PieceKind::Queen));
        assert!(!is_check(&b, Color::White));
    }
}
