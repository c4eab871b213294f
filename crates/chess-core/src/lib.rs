//! Core types for chess.
//!
//! This crate provides the board geometry and value types shared by the
//! rules engine:
//! - [`Piece`] and [`Color`] for piece representation
//! - [`Square`], [`File`], and [`Rank`] for board coordinates
//! - [`Move`] and [`MoveKind`], a bit-packed description of one ply

mod color;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use mov::{Move, MoveKind};
pub use piece::Piece;
pub use square::{File, Rank, Square};
