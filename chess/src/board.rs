//! Board and related things

use crate::attack;
use crate::bitboard::Bitboard;
use crate::geometry;
use crate::types::{Color, Coord, File, Piece, PieceKind, Rank};

use std::fmt::{self, Display};
use std::str::FromStr;

use thiserror::Error;

/// Board validation error
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum ValidateError {
    /// Too many pieces of given color
    ///
    /// No more than 16 pieces of each color is allowed.
    #[error("too many pieces of color {0:?}")]
    TooManyPieces(Color),
    /// One of the sides doesn't have a king
    #[error("no king of color {0:?}")]
    NoKing(Color),
    /// One of the sides has more than one king
    #[error("more than one king of color {0:?}")]
    TooManyKings(Color),
    /// There is a pawn on the 1th or on the 8th rank
    #[error("invalid pawn position {0}")]
    InvalidPawn(Coord),
    /// King of the side which has just moved is under attack
    #[error("opponent's king is attacked")]
    OpponentKingAttacked,
}

/// Error parsing piece placement (i.e. the first part of FEN)
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum PlacementParseError {
    /// Rank is too large
    #[error("too many items in rank {0}")]
    RankOverflow(Rank),
    /// Rank is too small
    #[error("not enough items in rank {0}")]
    RankUnderflow(Rank),
    /// Too many ranks
    #[error("too many ranks")]
    Overflow,
    /// Not enough ranks
    #[error("not enough ranks")]
    Underflow,
    /// Unexpected character
    #[error("unexpected char {0:?}")]
    UnexpectedChar(char),
}

/// Chess board
///
/// The board is an 8x8 grid of optional [`Piece`]s indexed by `[row][col]`, where row 0 is the
/// 8th rank. It carries no side to move and no move history, those belong to
/// [`Game`](crate::game::Game).
///
/// Cloning a board yields a fully independent copy, which is how hypothetical moves are tried
/// without touching the live position.
///
/// # Example
///
/// ```
/// # use chessrules::{Board, Color, Coord, File, Piece, PieceKind, Rank};
/// #
/// let mut board = Board::empty();
/// board.put(Coord::from_parts(File::B, Rank::R2), Piece::new(Color::White, PieceKind::King));
/// board.put(Coord::from_parts(File::D, Rank::R5), Piece::new(Color::Black, PieceKind::King));
/// assert_eq!(board.as_placement(), "8/8/8/3k4/8/8/1K6/8");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[Option<Piece>; 8]; 8],
}

impl Board {
    /// Returns a board without pieces
    #[inline]
    pub const fn empty() -> Board {
        Board {
            cells: [[None; 8]; 8],
        }
    }

    /// Returns a board with the initial position
    pub fn initial() -> Board {
        let mut res = Board::empty();
        for file in File::iter() {
            res.put2(file, Rank::R2, Piece::new(Color::White, PieceKind::Pawn));
            res.put2(file, Rank::R7, Piece::new(Color::Black, PieceKind::Pawn));
        }
        for color in [Color::White, Color::Black] {
            let rank = geometry::castling_rank(color);
            for (file, kind) in File::iter().zip([
                PieceKind::Rook,
                PieceKind::Knight,
                PieceKind::Bishop,
                PieceKind::Queen,
                PieceKind::King,
                PieceKind::Bishop,
                PieceKind::Knight,
                PieceKind::Rook,
            ]) {
                res.put2(file, rank, Piece::new(color, kind));
            }
        }
        res
    }

    /// Parses the piece placement part of FEN, like `"8/8/8/3k4/8/8/1K6/8"`
    ///
    /// Placement carries no move history, so the moved flags are derived from the squares:
    /// kings and rooks are considered unmoved only on their initial squares, pawns only on their
    /// initial rank. All the other pieces are marked as moved.
    #[inline]
    pub fn from_placement(s: &str) -> Result<Board, PlacementParseError> {
        Board::from_str(s)
    }

    /// Returns the contents of the square with coordinate `c`
    #[inline]
    pub fn get(&self, c: Coord) -> Option<Piece> {
        self.cells[c.row()][c.col()]
    }

    /// Returns the contents of the square with file `file` and rank `rank`
    #[inline]
    pub fn get2(&self, file: File, rank: Rank) -> Option<Piece> {
        self.get(Coord::from_parts(file, rank))
    }

    /// Returns `true` if there is no piece on `c`
    #[inline]
    pub fn is_free(&self, c: Coord) -> bool {
        self.get(c).is_none()
    }

    /// Puts `piece` onto the square with coordinate `c`, replacing its previous contents
    #[inline]
    pub fn put(&mut self, c: Coord, piece: Piece) {
        self.set(c, Some(piece));
    }

    /// Puts `piece` onto the square with file `file` and rank `rank`
    #[inline]
    pub fn put2(&mut self, file: File, rank: Rank, piece: Piece) {
        self.put(Coord::from_parts(file, rank), piece);
    }

    /// Sets the contents of the square with coordinate `c`
    #[inline]
    pub fn set(&mut self, c: Coord, cell: Option<Piece>) {
        self.cells[c.row()][c.col()] = cell;
    }

    /// Removes the piece from `c` and returns it
    #[inline]
    pub fn take(&mut self, c: Coord) -> Option<Piece> {
        self.cells[c.row()][c.col()].take()
    }

    /// Iterates over all the occupied squares
    pub fn iter(&self) -> impl Iterator<Item = (Coord, Piece)> + '_ {
        Coord::iter().filter_map(move |c| self.get(c).map(|p| (c, p)))
    }

    /// Iterates over the pieces of color `color`
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Coord, Piece)> + '_ {
        self.iter().filter(move |(_, p)| p.color() == color)
    }

    /// Returns the squares occupied by pieces of color `c`
    pub fn color(&self, c: Color) -> Bitboard {
        self.pieces(c).map(|(coord, _)| coord).collect()
    }

    /// Returns the squares occupied by any piece
    pub fn occupied(&self) -> Bitboard {
        self.iter().map(|(coord, _)| coord).collect()
    }

    /// Returns the squares occupied by pieces of color `c` and kind `kind`
    pub fn piece2(&self, c: Color, kind: PieceKind) -> Bitboard {
        self.iter()
            .filter(|(_, p)| p.is(c, kind))
            .map(|(coord, _)| coord)
            .collect()
    }

    /// Returns the position of the king of color `c`
    ///
    /// Returns `None` if there is no such king. A board that passed [`Board::validate()`] always
    /// has exactly one king of each color.
    pub fn king_pos(&self, c: Color) -> Option<Coord> {
        self.iter()
            .find(|(_, p)| p.is(c, PieceKind::King))
            .map(|(coord, _)| coord)
    }

    /// Returns `true` if the king of color `c` is under attack
    #[inline]
    pub fn is_check(&self, c: Color) -> bool {
        attack::is_check(self, c)
    }

    /// Verifies that the board is a valid position with `side` to move
    pub fn validate(&self, side: Color) -> Result<(), ValidateError> {
        for color in [Color::White, Color::Black] {
            if self.pieces(color).count() > 16 {
                return Err(ValidateError::TooManyPieces(color));
            }
            match self.piece2(color, PieceKind::King).popcount() {
                0 => return Err(ValidateError::NoKing(color)),
                1 => {}
                _ => return Err(ValidateError::TooManyKings(color)),
            }
        }

        for (coord, piece) in self.iter() {
            if piece.kind() == PieceKind::Pawn && matches!(coord.rank(), Rank::R1 | Rank::R8) {
                return Err(ValidateError::InvalidPawn(coord));
            }
        }

        if self.is_check(side.inv()) {
            return Err(ValidateError::OpponentKingAttacked);
        }

        Ok(())
    }

    /// Returns a wrapper to pretty-print the board
    ///
    /// # Example
    ///
    /// ```
    /// # use chessrules::{Board, board::PrettyStyle};
    /// #
    /// let b = Board::initial();
    /// let res = r#"
    /// 8|rnbqkbnr
    /// 7|pppppppp
    /// 6|........
    /// 5|........
    /// 4|........
    /// 3|........
    /// 2|PPPPPPPP
    /// 1|RNBQKBNR
    /// -+--------
    ///  |abcdefgh
    /// "#;
    /// assert_eq!(b.pretty(PrettyStyle::Ascii).to_string(), res[1..].to_string());
    /// ```
    pub fn pretty(&self, style: PrettyStyle) -> Pretty<'_> {
        Pretty { board: self, style }
    }

    /// Returns the piece placement part of FEN for this board
    pub fn as_placement(&self) -> String {
        self.to_string()
    }
}

impl Default for Board {
    #[inline]
    fn default() -> Board {
        Board::empty()
    }
}

fn is_unmoved_on(coord: Coord, piece: Piece) -> bool {
    let color = piece.color();
    match piece.kind() {
        PieceKind::Pawn => coord.rank() == geometry::double_move_src_rank(color),
        PieceKind::King => {
            coord == Coord::from_parts(geometry::KING_FILE, geometry::castling_rank(color))
        }
        PieceKind::Rook => {
            coord.rank() == geometry::castling_rank(color)
                && matches!(
                    coord.file(),
                    geometry::QUEENSIDE_ROOK_FILE | geometry::KINGSIDE_ROOK_FILE
                )
        }
        _ => false,
    }
}

impl FromStr for Board {
    type Err = PlacementParseError;

    fn from_str(s: &str) -> Result<Board, Self::Err> {
        type Error = PlacementParseError;

        let mut file = 0_usize;
        let mut rank = 0_usize;
        let mut board = Board::empty();
        for ch in s.chars() {
            match ch {
                '1'..='8' => {
                    let add = (ch as u8 - b'0') as usize;
                    if file + add > 8 {
                        return Err(Error::RankOverflow(Rank::from_index(rank)));
                    }
                    file += add;
                }
                '/' => {
                    if file < 8 {
                        return Err(Error::RankUnderflow(Rank::from_index(rank)));
                    }
                    rank += 1;
                    file = 0;
                    if rank >= 8 {
                        return Err(Error::Overflow);
                    }
                }
                _ => {
                    if file >= 8 {
                        return Err(Error::RankOverflow(Rank::from_index(rank)));
                    }
                    let piece = Piece::from_char(ch).ok_or(Error::UnexpectedChar(ch))?;
                    let coord = Coord::from_parts(File::from_index(file), Rank::from_index(rank));
                    board.put(coord, piece.with_moved(!is_unmoved_on(coord, piece)));
                    file += 1;
                }
            }
        }

        if file < 8 {
            return Err(Error::RankUnderflow(Rank::from_index(rank)));
        }
        if rank < 7 {
            return Err(Error::Underflow);
        }

        Ok(board)
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for rank in Rank::iter() {
            if rank.index() != 0 {
                write!(f, "/")?;
            }
            let mut empty = 0;
            for file in File::iter() {
                let piece = match self.get2(file, rank) {
                    Some(piece) => piece,
                    None => {
                        empty += 1;
                        continue;
                    }
                };
                if empty != 0 {
                    write!(f, "{}", empty)?;
                    empty = 0;
                }
                write!(f, "{}", piece)?;
            }
            if empty != 0 {
                write!(f, "{}", empty)?;
            }
        }
        Ok(())
    }
}

/// Style for [`Board::pretty()`]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PrettyStyle {
    /// Print pieces and frames as ASCII characters
    Ascii,
    /// Print pieces and frames as fancy Unicode characters
    Utf8,
}

/// Wrapper to pretty-print the board
///
/// See docs for [`Board::pretty()`] for more details.
pub struct Pretty<'a> {
    board: &'a Board,
    style: PrettyStyle,
}

trait StyleTable {
    const HORZ_FRAME: char;
    const VERT_FRAME: char;
    const ANGLE_FRAME: char;
    const EMPTY: char;

    fn piece(p: Piece) -> char;

    fn fmt(b: &Board, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for rank in Rank::iter() {
            write!(f, "{}{}", rank, Self::VERT_FRAME)?;
            for file in File::iter() {
                let c = b.get2(file, rank).map_or(Self::EMPTY, Self::piece);
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        write!(f, "{}{}", Self::HORZ_FRAME, Self::ANGLE_FRAME)?;
        for _ in File::iter() {
            write!(f, "{}", Self::HORZ_FRAME)?;
        }
        writeln!(f)?;
        write!(f, " {}", Self::VERT_FRAME)?;
        for file in File::iter() {
            write!(f, "{}", file)?;
        }
        writeln!(f)?;
        Ok(())
    }
}

struct AsciiStyleTable;
struct Utf8StyleTable;

impl StyleTable for AsciiStyleTable {
    const HORZ_FRAME: char = '-';
    const VERT_FRAME: char = '|';
    const ANGLE_FRAME: char = '+';
    const EMPTY: char = '.';

    fn piece(p: Piece) -> char {
        p.as_char()
    }
}

impl StyleTable for Utf8StyleTable {
    const HORZ_FRAME: char = '─';
    const VERT_FRAME: char = '│';
    const ANGLE_FRAME: char = '┼';
    const EMPTY: char = '·';

    fn piece(p: Piece) -> char {
        p.as_utf8_char()
    }
}

impl<'a> Display for Pretty<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self.style {
            PrettyStyle::Ascii => AsciiStyleTable::fmt(self.board, f),
            PrettyStyle::Utf8 => Utf8StyleTable::fmt(self.board, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INI_PLACEMENT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

    #[test]
    fn test_initial() {
        let b = Board::initial();
        assert_eq!(b.to_string(), INI_PLACEMENT);
        assert_eq!(Board::from_placement(INI_PLACEMENT), Ok(b.clone()));

        for color in [Color::White, Color::Black] {
            assert_eq!(b.pieces(color).count(), 16);
            assert_eq!(b.piece2(color, PieceKind::Pawn).popcount(), 8);
            assert_eq!(b.piece2(color, PieceKind::Rook).popcount(), 2);
            assert_eq!(b.piece2(color, PieceKind::Knight).popcount(), 2);
            assert_eq!(b.piece2(color, PieceKind::Bishop).popcount(), 2);
            assert_eq!(b.piece2(color, PieceKind::Queen).popcount(), 1);
            assert_eq!(b.piece2(color, PieceKind::King).popcount(), 1);
        }
        assert!(b.iter().all(|(_, p)| !p.has_moved()));
        assert_eq!(b.occupied().popcount(), 32);
        assert_eq!(b.validate(Color::White), Ok(()));
    }

    #[test]
    fn test_rows() {
        let b = Board::initial();
        let black_king = b.king_pos(Color::Black).unwrap();
        assert_eq!((black_king.row(), black_king.col()), (0, 4));
        let white_king = b.king_pos(Color::White).unwrap();
        assert_eq!((white_king.row(), white_king.col()), (7, 4));
        assert_eq!(
            b.get(Coord::from_row_col(6, 0).unwrap()),
            Some(Piece::new(Color::White, PieceKind::Pawn))
        );
        assert_eq!(
            b.get(Coord::from_row_col(1, 7).unwrap()),
            Some(Piece::new(Color::Black, PieceKind::Pawn))
        );
    }

    #[test]
    fn test_midgame() {
        const PLACEMENT: &str = "1rq1r1k1/1p3ppp/pB3n2/3ppP2/Pbb1P3/1PN2B2/2P2QPP/R1R4K";

        let b = Board::from_placement(PLACEMENT).unwrap();
        assert_eq!(b.as_placement(), PLACEMENT);
        assert_eq!(
            b.get2(File::B, Rank::R4),
            Some(Piece::new(Color::Black, PieceKind::Bishop).moved())
        );
        assert_eq!(
            b.get2(File::F, Rank::R2),
            Some(Piece::new(Color::White, PieceKind::Queen).moved())
        );
        assert_eq!(
            b.get2(File::A, Rank::R1),
            Some(Piece::new(Color::White, PieceKind::Rook))
        );
        assert_eq!(
            b.get2(File::C, Rank::R1),
            Some(Piece::new(Color::White, PieceKind::Rook).moved())
        );
        assert_eq!(
            b.king_pos(Color::White),
            Some(Coord::from_parts(File::H, Rank::R1))
        );
        assert!(b.get2(File::H, Rank::R1).unwrap().has_moved());
        assert_eq!(
            b.king_pos(Color::Black),
            Some(Coord::from_parts(File::G, Rank::R8))
        );
    }

    #[test]
    fn test_placement_errors() {
        assert_eq!(
            Board::from_placement("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP"),
            Err(PlacementParseError::Underflow)
        );
        assert_eq!(
            Board::from_placement("rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR"),
            Err(PlacementParseError::UnexpectedChar('9'))
        );
        assert_eq!(
            Board::from_placement("rnbqkbnr/ppppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"),
            Err(PlacementParseError::RankOverflow(Rank::R7))
        );
        assert_eq!(
            Board::from_placement("rnbqkbnr/ppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"),
            Err(PlacementParseError::RankUnderflow(Rank::R7))
        );
        assert_eq!(
            Board::from_placement("8/8/8/8/8/8/8/8/8"),
            Err(PlacementParseError::Overflow)
        );
    }

    #[test]
    fn test_validate() {
        let b = Board::from_placement("8/8/8/8/8/8/8/K7").unwrap();
        assert_eq!(b.validate(Color::White), Err(ValidateError::NoKing(Color::Black)));

        let b = Board::from_placement("k7/8/8/8/8/8/8/K6K").unwrap();
        assert_eq!(
            b.validate(Color::White),
            Err(ValidateError::TooManyKings(Color::White))
        );

        let b = Board::from_placement("k6P/8/8/8/8/8/8/K7").unwrap();
        assert_eq!(
            b.validate(Color::White),
            Err(ValidateError::InvalidPawn(Coord::from_parts(File::H, Rank::R8)))
        );

        // Black king is in check, so White cannot be the side to move.
        let b = Board::from_placement("k7/8/8/8/8/8/8/KR6").unwrap();
        assert_eq!(b.validate(Color::Black), Ok(()));
        let b = Board::from_placement("k7/8/8/8/8/8/8/R6K").unwrap();
        assert_eq!(
            b.validate(Color::White),
            Err(ValidateError::OpponentKingAttacked)
        );
    }

    #[test]
    fn test_take() {
        let mut b = Board::initial();
        let e2 = Coord::from_parts(File::E, Rank::R2);
        assert_eq!(
            b.take(e2),
            Some(Piece::new(Color::White, PieceKind::Pawn))
        );
        assert!(b.is_free(e2));
        assert_eq!(b.take(e2), None);
    }

    #[test]
    fn test_pretty() {
        let b = Board::from_placement("7k/8/8/8/8/8/8/K7").unwrap();
        let res = "8│·······♚\n\
                   7│········\n\
                   6│········\n\
                   5│········\n\
                   4│········\n\
                   3│········\n\
                   2│········\n\
                   1│♔·······\n\
                   ─┼────────\n \
                   │abcdefgh\n";
        assert_eq!(b.pretty(PrettyStyle::Utf8).to_string(), res);
    }
}
