use crate::attack;
use crate::board::Board;
use crate::moves::{self, Move};

/// Legality filter for semilegal moves
///
/// Each candidate is applied to a scratch copy of the source board, and the move is accepted only
/// if the mover's king is not attacked afterwards. The source board is never modified, so the
/// checker can be used while the position is being read elsewhere.
#[derive(Clone, Debug)]
pub struct Checker<'a> {
    src: &'a Board,
    scratch: Board,
}

impl<'a> Checker<'a> {
    pub fn new(src: &'a Board) -> Self {
        Self {
            src,
            scratch: src.clone(),
        }
    }

    /// Returns `true` if the semilegal move `mv` doesn't leave the mover's king under attack
    ///
    /// Moves from an empty square are never legal.
    pub fn is_legal(&mut self, mv: Move) -> bool {
        self.scratch.clone_from(self.src);
        match moves::make_move_unchecked(&mut self.scratch, mv) {
            Some(made) => !attack::is_check(&self.scratch, made.piece.color()),
            None => false,
        }
    }
}
