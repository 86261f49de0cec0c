//! Move generation

use crate::board::Board;
use crate::legal::Checker;
use crate::moves::Move;
use crate::types::{Color, Coord, PieceKind};
use crate::{attack, castling};

use std::convert::Infallible;
use std::ops::{Deref, DerefMut};
use std::slice;

use arrayvec::ArrayVec;

trait MaybeMovePush {
    type Err;

    fn push(&mut self, m: Move) -> Result<(), Self::Err>;
}

/// List of moves with fixed capacity
///
/// A valid position (see [`Board::validate()`](crate::board::Board::validate)) has at most 218
/// legal moves, well below the capacity. Boards which don't pass validation may have more
/// semilegal moves than the list can hold.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct MoveList(ArrayVec<Move, 256>);

impl Deref for MoveList {
    type Target = ArrayVec<Move, 256>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for MoveList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl MoveList {
    pub fn new() -> MoveList {
        MoveList(ArrayVec::new())
    }

    /// Returns the move with destination `dst`, if any
    pub fn find_dst(&self, dst: Coord) -> Option<Move> {
        self.0.iter().copied().find(|mv| mv.dst() == dst)
    }
}

pub trait MovePush {
    fn push(&mut self, m: Move);
}

impl<const N: usize> MovePush for ArrayVec<Move, N> {
    fn push(&mut self, m: Move) {
        self.push(m);
    }
}

impl MovePush for MoveList {
    fn push(&mut self, m: Move) {
        self.0.push(m);
    }
}

impl MovePush for Vec<Move> {
    fn push(&mut self, m: Move) {
        self.push(m);
    }
}

impl<T: MovePush> MaybeMovePush for T {
    type Err = Infallible;

    fn push(&mut self, m: Move) -> Result<(), Self::Err> {
        <Self as MovePush>::push(self, m);
        Ok(())
    }
}

struct LegalFilter<'a, 'b, P> {
    checker: Checker<'a>,
    inner: &'b mut P,
}

impl<'a, 'b, P: MaybeMovePush> MaybeMovePush for LegalFilter<'a, 'b, P> {
    type Err = P::Err;

    fn push(&mut self, m: Move) -> Result<(), Self::Err> {
        if self.checker.is_legal(m) {
            self.inner.push(m)?;
        }
        Ok(())
    }
}

struct ErrOnFirst;

impl MaybeMovePush for ErrOnFirst {
    type Err = ();

    fn push(&mut self, _mv: Move) -> Result<(), ()> {
        Err(())
    }
}

fn do_gen_from<P: MaybeMovePush>(b: &Board, src: Coord, p: &mut P) -> Result<(), P::Err> {
    let piece = match b.get(src) {
        Some(piece) => piece,
        None => return Ok(()),
    };
    for dst in attack::destinations(b, src) {
        p.push(Move::new(src, dst))?;
    }
    if piece.kind() == PieceKind::King && src == castling::king_src(piece.color()) {
        for mv in castling::candidates(b, piece.color()) {
            p.push(mv)?;
        }
    }
    Ok(())
}

fn do_gen_all<P: MaybeMovePush>(b: &Board, color: Color, p: &mut P) -> Result<(), P::Err> {
    for (src, _) in b.pieces(color) {
        do_gen_from(b, src, p)?;
    }
    Ok(())
}

/// Semilegal move generation
///
/// Generated moves follow the movement rules of the pieces, but may leave the king under attack.
pub mod semilegal {
    use super::{MoveList, MovePush};
    use crate::board::Board;
    use crate::types::{Color, Coord};

    /// Adds all the semilegal moves of the piece on `src` to `dst`, castling included
    pub fn moves_from_into<P: MovePush>(b: &Board, src: Coord, dst: &mut P) {
        let _ = super::do_gen_from(b, src, dst);
    }

    /// Returns all the semilegal moves of the piece on `src`, castling included
    pub fn moves_from(b: &Board, src: Coord) -> MoveList {
        let mut res = MoveList::new();
        moves_from_into(b, src, &mut res);
        res
    }

    /// Adds all the semilegal moves of the side `color` to `dst`
    pub fn gen_all_into<P: MovePush>(b: &Board, color: Color, dst: &mut P) {
        let _ = super::do_gen_all(b, color, dst);
    }

    /// Returns all the semilegal moves of the side `color`
    pub fn gen_all(b: &Board, color: Color) -> MoveList {
        let mut res = MoveList::new();
        gen_all_into(b, color, &mut res);
        res
    }
}

/// Legal move generation
pub mod legal {
    use super::{LegalFilter, MoveList, MovePush};
    use crate::board::Board;
    use crate::legal::Checker;
    use crate::types::{Color, Coord};

    /// Adds all the legal moves of the piece on `src` to `dst`
    pub fn moves_from_into<P: MovePush>(b: &Board, src: Coord, dst: &mut P) {
        let mut p = LegalFilter {
            checker: Checker::new(b),
            inner: dst,
        };
        let _ = super::do_gen_from(b, src, &mut p);
    }

    /// Returns all the legal moves of the piece on `src`
    ///
    /// The list is empty if `src` is empty.
    pub fn moves_from(b: &Board, src: Coord) -> MoveList {
        let mut res = MoveList::new();
        moves_from_into(b, src, &mut res);
        res
    }

    /// Adds all the legal moves of the side `color` to `dst`
    pub fn gen_all_into<P: MovePush>(b: &Board, color: Color, dst: &mut P) {
        let mut p = LegalFilter {
            checker: Checker::new(b),
            inner: dst,
        };
        let _ = super::do_gen_all(b, color, &mut p);
    }

    /// Returns all the legal moves of the side `color`
    pub fn gen_all(b: &Board, color: Color) -> MoveList {
        let mut res = MoveList::new();
        gen_all_into(b, color, &mut res);
        res
    }
}

/// Returns `true` if the side `color` has at least one legal move
///
/// Stops on the first legal move found.
pub fn has_legal_moves(b: &Board, color: Color) -> bool {
    let mut err_on_first = ErrOnFirst;
    let mut p = LegalFilter {
        checker: Checker::new(b),
        inner: &mut err_on_first,
    };
    do_gen_all(b, color, &mut p).is_err()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::MoveKind;
    use std::collections::BTreeSet;

    fn sq(s: &str) -> Coord {
        s.parse().unwrap()
    }

    fn names(ml: &MoveList) -> BTreeSet<String> {
        ml.iter().map(ToString::to_string).collect()
    }

    fn set(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_initial() {
        let b = Board::initial();
        assert_eq!(legal::gen_all(&b, Color::White).len(), 20);
        assert_eq!(legal::gen_all(&b, Color::Black).len(), 20);
        assert_eq!(semilegal::gen_all(&b, Color::White).len(), 20);
        assert_eq!(names(&legal::moves_from(&b, sq("g1"))), set(&["g1f3", "g1h3"]));
        assert!(legal::moves_from(&b, sq("e4")).is_empty());
        assert!(legal::moves_from(&b, sq("e1")).is_empty());
        assert!(has_legal_moves(&b, Color::White));
    }

    #[test]
    fn test_castling() {
        let b = Board::from_placement("r3k2r/8/8/8/8/8/8/R3K2R").unwrap();
        let ml = legal::moves_from(&b, sq("e1"));
        assert_eq!(
            names(&ml),
            set(&["e1d1", "e1d2", "e1e2", "e1f2", "e1f1", "e1g1", "e1c1"])
        );
        assert_eq!(
            ml.find_dst(sq("g1")).map(|mv| mv.kind()),
            Some(MoveKind::CastlingKingside)
        );
        assert_eq!(
            ml.find_dst(sq("c1")).map(|mv| mv.kind()),
            Some(MoveKind::CastlingQueenside)
        );
        assert_eq!(ml.find_dst(sq("f1")).map(|mv| mv.kind()), Some(MoveKind::Simple));
        // 5 king steps, 2 castlings, 10 + 9 rook moves
        assert_eq!(legal::gen_all(&b, Color::White).len(), 26);
    }

    #[test]
    fn test_filtered() {
        // The white king is in check from the rook on e8, only evasions remain
        let b = Board::from_placement("4r2k/8/8/8/8/8/3P4/2B1K3").unwrap();
        assert_eq!(
            names(&legal::gen_all(&b, Color::White)),
            set(&["e1d1", "e1f1", "e1f2"])
        );
        assert!(semilegal::gen_all(&b, Color::White).len() > 3);

        // Double check, no interposition helps
        let b = Board::from_placement("4k3/8/8/8/8/8/4B3/r3K2r").unwrap();
        assert!(legal::moves_from(&b, sq("e2")).is_empty());
        assert_eq!(
            names(&legal::gen_all(&b, Color::White)),
            set(&["e1d2", "e1f2"])
        );

        // Pinned bishop
        let b = Board::from_placement("4r2k/8/8/8/8/8/4B3/4K3").unwrap();
        assert!(legal::moves_from(&b, sq("e2")).is_empty());
        assert!(!semilegal::moves_from(&b, sq("e2")).is_empty());
    }

    #[test]
    fn test_no_moves() {
        // Stalemate
        let b = Board::from_placement("7k/5K2/6Q1/8/8/8/8/8").unwrap();
        assert!(!has_legal_moves(&b, Color::Black));
        assert!(legal::gen_all(&b, Color::Black).is_empty());
        assert!(has_legal_moves(&b, Color::White));

        // Mate
        let b = Board::from_placement("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR").unwrap();
        assert!(b.is_check(Color::White));
        assert!(!has_legal_moves(&b, Color::White));
    }
}
