//! # Base types for chessrules
//!
//! This is an auxiliary crate for `chessrules`, which contains plain data types shared by the
//! rules engine: squares, colors, pieces, square sets and outcomes.
//!
//! Normally you don't want to use this crate directly. Use `chessrules` instead.

pub mod bitboard;
pub mod geometry;
pub mod types;
