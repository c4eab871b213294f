//! Game-end classification.
//!
//! [`Position::status`] decides whether the game is still running, has ended
//! in checkmate, or is drawn, using the position plus the hash history it
//! carries for repetition counting.

use crate::{Bitboard, Position};
use chess_core::Piece;

/// Reason for a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawReason {
    /// No legal moves but not in check.
    Stalemate,
    /// 100 half-moves without a pawn move or capture.
    FiftyMoveRule,
    /// The current position has already occurred three times before.
    ThreefoldRepetition,
    /// Neither side has enough material to checkmate.
    InsufficientMaterial,
}

impl std::fmt::Display for DrawReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            DrawReason::Stalemate => "stalemate",
            DrawReason::FiftyMoveRule => "fifty-move rule",
            DrawReason::ThreefoldRepetition => "threefold repetition",
            DrawReason::InsufficientMaterial => "insufficient material",
        };
        write!(f, "{}", text)
    }
}

/// State of the game from the side to move's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    /// The game goes on.
    Normal,
    /// The side to move is checkmated.
    Checkmate,
    /// The game is drawn.
    Draw(DrawReason),
}

impl GameStatus {
    /// Returns true unless the game goes on.
    #[inline]
    pub fn is_over(self) -> bool {
        self != GameStatus::Normal
    }
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameStatus::Normal => write!(f, "normal"),
            GameStatus::Checkmate => write!(f, "checkmate"),
            GameStatus::Draw(reason) => write!(f, "draw by {}", reason),
        }
    }
}

/// Halfmove clock value at which the fifty-move rule applies.
pub const FIFTY_MOVE_PLIES: u32 = 100;

impl Position {
    /// Classifies the position.
    ///
    /// Without legal moves the game is over by checkmate or stalemate.
    /// Otherwise the draw rules are checked in order: fifty-move rule,
    /// threefold repetition, insufficient material.
    pub fn status(&mut self) -> GameStatus {
        if self.legal_moves().is_empty() {
            return if self.is_in_check() {
                GameStatus::Checkmate
            } else {
                GameStatus::Draw(DrawReason::Stalemate)
            };
        }

        if self.is_fifty_move_draw() {
            GameStatus::Draw(DrawReason::FiftyMoveRule)
        } else if self.is_threefold_repetition() {
            GameStatus::Draw(DrawReason::ThreefoldRepetition)
        } else if self.is_insufficient_material() {
            GameStatus::Draw(DrawReason::InsufficientMaterial)
        } else {
            GameStatus::Normal
        }
    }

    #[inline]
    pub fn is_fifty_move_draw(&self) -> bool {
        self.halfmove_clock >= FIFTY_MOVE_PLIES
    }

    /// Returns true if the current key appears at least three times among
    /// the keys of earlier positions.
    ///
    /// Only keys are compared, so a hash collision would be reported as a
    /// repetition.
    pub fn is_threefold_repetition(&self) -> bool {
        self.hash_history
            .iter()
            .filter(|&&key| key == self.hash)
            .count()
            >= 3
    }

    /// Returns true if neither side has enough material to checkmate.
    pub fn is_insufficient_material(&self) -> bool {
        let heavy = self.pieces(Piece::Pawn) | self.pieces(Piece::Rook) | self.pieces(Piece::Queen);
        if heavy.is_not_empty() {
            return false;
        }
        if self.occupied().count() < 4 {
            return true;
        }
        if self.pieces(Piece::Knight).is_not_empty() {
            return false;
        }
        let bishops = self.pieces(Piece::Bishop);
        (bishops & Bitboard::LIGHT_SQUARES).is_empty() || (bishops & Bitboard::DARK_SQUARES).is_empty()
    }
}
