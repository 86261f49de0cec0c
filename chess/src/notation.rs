//! Recorded moves and their algebraic notation

use crate::moves::{Made, Move};
use crate::types::{CastlingSide, Color, Coord, PieceKind};

use std::fmt;
use std::marker::PhantomData;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Style for formatting moves
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Style {
    /// Use capital Latin letters for pieces
    Algebraic,
    /// Use Unicode chess symbols for pieces
    Utf8,
}

trait PieceTheme {
    fn marker() -> PhantomData<Self>;
    fn piece_to_char(piece: PieceKind) -> char;
}

struct Utf8Theme;

impl PieceTheme for Utf8Theme {
    fn marker() -> PhantomData<Self> {
        PhantomData
    }

    fn piece_to_char(piece: PieceKind) -> char {
        match piece {
            PieceKind::Pawn => '♙',
            PieceKind::Knight => '♘',
            PieceKind::Bishop => '♗',
            PieceKind::Rook => '♖',
            PieceKind::Queen => '♕',
            PieceKind::King => '♔',
        }
    }
}

struct AlgebraicTheme;

impl PieceTheme for AlgebraicTheme {
    fn marker() -> PhantomData<Self> {
        PhantomData
    }

    fn piece_to_char(piece: PieceKind) -> char {
        piece.as_char()
    }
}

/// Applied move, as stored in the game history
///
/// Records are created by [`Game::make_move()`](crate::game::Game::make_move) and never change
/// afterwards.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MoveRecord {
    /// Kind of the moving piece before the move
    pub piece: PieceKind,
    pub color: Color,
    pub src: Coord,
    pub dst: Coord,
    pub captured: Option<PieceKind>,
    pub castling: Option<CastlingSide>,
    /// Whether a pawn was promoted to a queen by this move
    pub promoted: bool,
}

impl MoveRecord {
    pub(crate) fn new(mv: Move, made: &Made) -> MoveRecord {
        MoveRecord {
            piece: made.piece.kind(),
            color: made.piece.color(),
            src: mv.src(),
            dst: mv.dst(),
            captured: made.captured.map(|p| p.kind()),
            castling: mv.castling_side(),
            promoted: made.promoted,
        }
    }

    /// Returns a wrapper to display the move in algebraic notation
    ///
    /// The notation is short and context-free: castling is written as `O-O` or `O-O-O`, other
    /// moves as the piece letter (omitted for pawns), `x` for captures, and the destination
    /// square. Pawn captures are prefixed with the origin file. There is no promotion suffix and
    /// no check mark.
    ///
    /// # Example
    ///
    /// ```
    /// # use chessrules::Game;
    /// # use chessrules::notation::Style;
    /// #
    /// let mut game = Game::new();
    /// let rec = game.make_move("g1".parse().unwrap(), "f3".parse().unwrap()).unwrap();
    /// assert_eq!(rec.notation(Style::Algebraic).to_string(), "Nf3");
    /// assert_eq!(rec.notation(Style::Utf8).to_string(), "♘f3");
    /// ```
    pub fn notation(&self, style: Style) -> Notation<'_> {
        Notation { rec: self, style }
    }

    fn do_fmt<P: PieceTheme>(
        &self,
        f: &mut fmt::Formatter<'_>,
        _: PhantomData<P>,
    ) -> Result<(), fmt::Error> {
        match self.castling {
            Some(CastlingSide::King) => return write!(f, "O-O"),
            Some(CastlingSide::Queen) => return write!(f, "O-O-O"),
            None => {}
        }
        if self.piece == PieceKind::Pawn {
            if self.captured.is_some() {
                write!(f, "{}x", self.src.file())?;
            }
        } else {
            write!(f, "{}", P::piece_to_char(self.piece))?;
            if self.captured.is_some() {
                write!(f, "x")?;
            }
        }
        write!(f, "{}", self.dst)
    }
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        self.do_fmt(f, AlgebraicTheme::marker())
    }
}

/// Wrapper to display a [`MoveRecord`] with a given [`Style`]
pub struct Notation<'a> {
    rec: &'a MoveRecord,
    style: Style,
}

impl<'a> fmt::Display for Notation<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self.style {
            Style::Algebraic => self.rec.do_fmt(f, AlgebraicTheme::marker()),
            Style::Utf8 => self.rec.do_fmt(f, Utf8Theme::marker()),
        }
    }
}

/// Policy for numbering moves in [`NotationList`]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum NumberPolicy {
    /// Do not print move numbers
    Omit,
    /// Print move numbers starting from 1
    FromStart,
    /// Print move numbers starting from the given number
    Custom(usize),
}

/// Wrapper to display a sequence of moves, like `1. e4 e5 2. Nf3`
pub struct NotationList<'a> {
    records: &'a [MoveRecord],
    policy: NumberPolicy,
    style: Style,
}

impl<'a> NotationList<'a> {
    pub fn new(records: &'a [MoveRecord], policy: NumberPolicy) -> Self {
        NotationList {
            records,
            policy,
            style: Style::Algebraic,
        }
    }

    pub fn with_style(self, style: Style) -> Self {
        NotationList { style, ..self }
    }
}

impl<'a> fmt::Display for NotationList<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let start_num = match self.policy {
            NumberPolicy::Omit => None,
            NumberPolicy::FromStart => Some(1),
            NumberPolicy::Custom(u) => Some(u),
        };

        // A list starting with a black move has its first move number shared by one ply only
        let shift = match self.records.first() {
            Some(rec) if rec.color == Color::Black => 1,
            _ => 0,
        };

        for (ply, rec) in self.records.iter().enumerate() {
            if ply != 0 {
                write!(f, " ")?;
            }
            if let Some(num) = start_num {
                match rec.color {
                    Color::White => write!(f, "{}. ", num + (ply + shift) / 2)?,
                    Color::Black if ply == 0 => write!(f, "{}... ", num)?,
                    Color::Black => {}
                }
            }
            write!(f, "{}", rec.notation(self.style))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::moves::{self, Move};
    use crate::types::Color;

    fn sq(s: &str) -> Coord {
        s.parse().unwrap()
    }

    fn record(b: &mut Board, mv: Move) -> MoveRecord {
        assert_eq!(mv.validate(b), Ok(()));
        let made = moves::make_move_unchecked(b, mv).unwrap();
        MoveRecord::new(mv, &made)
    }

    #[test]
    fn test_simple() {
        let mut b = Board::initial();
        let rec = record(&mut b, Move::new(sq("e2"), sq("e4")));
        assert_eq!(rec.to_string(), "e4");
        assert_eq!(rec.piece, PieceKind::Pawn);
        assert_eq!(rec.color, Color::White);
        assert_eq!(rec.captured, None);

        let rec = record(&mut b, Move::new(sq("d7"), sq("d5")));
        assert_eq!(rec.to_string(), "d5");
        let rec = record(&mut b, Move::new(sq("b1"), sq("c3")));
        assert_eq!(rec.to_string(), "Nc3");
        assert_eq!(rec.notation(Style::Utf8).to_string(), "♘c3");
        let rec = record(&mut b, Move::new(sq("g8"), sq("f6")));
        assert_eq!(rec.notation(Style::Algebraic).to_string(), "Nf6");
    }

    #[test]
    fn test_capture() {
        let mut b = Board::from_placement("4k3/8/8/3p4/4P3/8/8/R3K3").unwrap();
        let rec = record(&mut b, Move::new(sq("e4"), sq("d5")));
        assert_eq!(rec.to_string(), "exd5");
        assert_eq!(rec.captured, Some(PieceKind::Pawn));

        let mut b = Board::from_placement("r3k3/8/8/8/8/8/8/R3K3").unwrap();
        let rec = record(&mut b, Move::new(sq("a1"), sq("a8")));
        assert_eq!(rec.to_string(), "Rxa8");
        assert_eq!(rec.notation(Style::Utf8).to_string(), "♖xa8");
    }

    #[test]
    fn test_castling() {
        let mut b = Board::from_placement("r3k2r/8/8/8/8/8/8/R3K2R").unwrap();
        let rec = record(&mut b, Move::from_castling(Color::White, CastlingSide::King));
        assert_eq!(rec.to_string(), "O-O");
        assert_eq!(rec.piece, PieceKind::King);
        assert_eq!(rec.castling, Some(CastlingSide::King));
        let rec = record(&mut b, Move::from_castling(Color::Black, CastlingSide::Queen));
        assert_eq!(rec.notation(Style::Utf8).to_string(), "O-O-O");
    }

    #[test]
    fn test_promote() {
        let mut b = Board::from_placement("1n5k/P7/8/8/8/8/8/K7").unwrap();
        let rec = record(&mut b, Move::new(sq("a7"), sq("a8")));
        assert_eq!(rec.to_string(), "a8");
        assert!(rec.promoted);
        assert_eq!(rec.piece, PieceKind::Pawn);

        let mut b = Board::from_placement("1n5k/P7/8/8/8/8/8/K7").unwrap();
        let rec = record(&mut b, Move::new(sq("a7"), sq("b8")));
        assert_eq!(rec.to_string(), "axb8");
    }

    #[test]
    fn test_list() {
        let mut b = Board::initial();
        let recs: Vec<_> = [("e2", "e4"), ("e7", "e5"), ("g1", "f3")]
            .into_iter()
            .map(|(src, dst)| record(&mut b, Move::new(sq(src), sq(dst))))
            .collect();
        assert_eq!(
            NotationList::new(&recs, NumberPolicy::FromStart).to_string(),
            "1. e4 e5 2. Nf3"
        );
        assert_eq!(
            NotationList::new(&recs, NumberPolicy::Omit).to_string(),
            "e4 e5 Nf3"
        );
        assert_eq!(
            NotationList::new(&recs, NumberPolicy::Custom(10))
                .with_style(Style::Utf8)
                .to_string(),
            "10. e4 e5 11. ♘f3"
        );
        assert_eq!(
            NotationList::new(&recs[1..], NumberPolicy::FromStart).to_string(),
            "1... e5 2. Nf3"
        );
        assert_eq!(NotationList::new(&[], NumberPolicy::FromStart).to_string(), "");
    }
}
