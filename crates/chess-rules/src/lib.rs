//! Chess rules with a bitboard board representation.
//!
//! This crate provides:
//! - [`Bitboard`] - 64-square set with shifting and precomputed masks
//! - [`Position`] - Full mutable game state with make/unmake and hashing
//! - [`PositionBuilder`] - Validated setup of arbitrary positions
//! - [`GameStatus`] - Checkmate and draw classification
//! - Move generation and [`perft`]
//!
//! # Architecture
//!
//! Each piece type and each colour has a 64-bit set of the squares it
//! occupies, mirrored by a square-indexed mailbox. Moves are generated with
//! set-wise shifts and filtered for legality by playing them on the board.
//! A Zobrist key is kept up to date incrementally and feeds repetition
//! detection.
//!
//! # Example
//!
//! ```
//! use chess_rules::{GameStatus, Position};
//!
//! let mut position = Position::startpos();
//! let moves = position.legal_moves();
//! assert_eq!(moves.len(), 20);
//!
//! let e4 = position.find_move("e2e4").unwrap();
//! assert!(position.make_move(e4));
//! assert_eq!(position.status(), GameStatus::Normal);
//! assert_eq!(position.unmake_move(), Some(e4));
//! ```

mod bitboard;
pub mod movegen;
mod position;
pub mod rules;
mod setup;
mod zobrist;

pub use bitboard::{Bitboard, BitboardIter};
pub use movegen::perft::{perft, perft_divide};
pub use movegen::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, queen_attacks, rook_attacks,
    MoveList,
};
pub use position::{CastlingRights, Position};
pub use rules::{DrawReason, GameStatus};
pub use setup::{PositionBuilder, SetupError};
pub use zobrist::ZobristKey;
