use crate::types::{Color, File, Rank};

/// Back rank of the given color, where its king and rooks start
pub const fn castling_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R1,
        Color::Black => Rank::R8,
    }
}

/// Rank from which pawns of the given color may make a double move
pub const fn double_move_src_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R2,
        Color::Black => Rank::R7,
    }
}

/// Rank on which pawns of the given color are promoted
pub const fn promote_dst_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R8,
        Color::Black => Rank::R1,
    }
}

/// Row delta of a single pawn step
pub const fn pawn_forward_delta(c: Color) -> isize {
    match c {
        Color::White => -1,
        Color::Black => 1,
    }
}

pub const KING_FILE: File = File::E;
pub const KINGSIDE_ROOK_FILE: File = File::H;
pub const QUEENSIDE_ROOK_FILE: File = File::A;
