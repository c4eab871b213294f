//! Setting up arbitrary positions.

use chess_core::{Color, Piece, Rank, Square};
use thiserror::Error;

use crate::position::CastlingRights;
use crate::Position;

/// Errors that can occur when building a position.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SetupError {
    #[error("square {0} already holds a piece")]
    SquareOccupied(Square),

    #[error("expected exactly one {color} king, found {count}")]
    KingCount { color: Color, count: u32 },

    #[error("pawn on back rank square {0}")]
    PawnOnBackRank(Square),

    #[error("castling right '{0}' needs king and rook on their home squares")]
    CastlingWithoutPieces(char),

    #[error("invalid en passant square: {0}")]
    InvalidEnPassant(Square),

    #[error("{0} is not to move but is in check")]
    OpponentInCheck(Color),
}

/// Builder for positions other than the starting position.
///
/// ```
/// use chess_core::{Color, Piece, Square};
/// use chess_rules::PositionBuilder;
///
/// let position = PositionBuilder::new()
///     .piece(Piece::King, Color::White, Square::E1)
///     .piece(Piece::King, Color::Black, Square::E8)
///     .build()
///     .unwrap();
/// assert_eq!(position.occupied().count(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PositionBuilder {
    pieces: Vec<(Piece, Color, Square)>,
    side_to_move: Option<Color>,
    castling: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u32,
}

impl PositionBuilder {
    /// Starts from an empty board, white to move, no castling rights.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn piece(mut self, piece: Piece, color: Color, square: Square) -> Self {
        self.pieces.push((piece, color, square));
        self
    }

    pub fn side_to_move(mut self, color: Color) -> Self {
        self.side_to_move = Some(color);
        self
    }

    /// Grants one castling right.
    pub fn castling(mut self, color: Color, kingside: bool) -> Self {
        self.castling.insert(color, kingside);
        self
    }

    /// Marks the pawn on `square` as having just made a double step.
    pub fn en_passant(mut self, square: Square) -> Self {
        self.en_passant = Some(square);
        self
    }

    pub fn halfmove_clock(mut self, plies: u32) -> Self {
        self.halfmove_clock = plies;
        self
    }

    /// Validates the setup and creates the position.
    pub fn build(self) -> Result<Position, SetupError> {
        let mut position = Position::empty();

        for &(piece, color, square) in &self.pieces {
            if position.piece_at(square).is_some() {
                return Err(SetupError::SquareOccupied(square));
            }
            if piece == Piece::Pawn && matches!(square.rank(), Rank::R1 | Rank::R8) {
                return Err(SetupError::PawnOnBackRank(square));
            }
            position.place_piece(piece, color, square);
        }

        for color in Color::ALL {
            let count = position.pieces_of(Piece::King, color).count();
            if count != 1 {
                return Err(SetupError::KingCount { color, count });
            }
        }

        let us = self.side_to_move.unwrap_or(Color::White);
        position.side_to_move = us;

        for (color, kingside, letter) in [
            (Color::White, true, 'K'),
            (Color::White, false, 'Q'),
            (Color::Black, true, 'k'),
            (Color::Black, false, 'q'),
        ] {
            if !self.castling.has(color, kingside) {
                continue;
            }
            let king_home = match color {
                Color::White => Square::E1,
                Color::Black => Square::E8,
            };
            let rook_home = CastlingRights::rook_square(color, kingside);
            let king_ok = position.pieces_of(Piece::King, color).contains(king_home);
            let rook_ok = position.pieces_of(Piece::Rook, color).contains(rook_home);
            if !(king_ok && rook_ok) {
                return Err(SetupError::CastlingWithoutPieces(letter));
            }
        }
        position.castling = self.castling;

        if let Some(square) = self.en_passant {
            if !is_double_stepped_pawn(&position, us.opposite(), square) {
                return Err(SetupError::InvalidEnPassant(square));
            }
        }
        position.en_passant = self.en_passant;
        position.halfmove_clock = self.halfmove_clock;

        if position.is_king_attacked(us.opposite()) {
            return Err(SetupError::OpponentInCheck(us.opposite()));
        }

        position.hash = position.compute_hash();
        Ok(position)
    }
}

/// A pawn of `color` on its double-step rank whose two squares behind are empty.
fn is_double_stepped_pawn(position: &Position, color: Color, square: Square) -> bool {
    let double_step_rank = color.pawn_rank() as i8 + 2 * color.pawn_direction();
    if square.rank().index() as i8 != double_step_rank {
        return false;
    }
    if !position.pieces_of(Piece::Pawn, color).contains(square) {
        return false;
    }
    let back = -8 * color.pawn_direction();
    [back, 2 * back]
        .into_iter()
        .all(|delta| square.offset(delta).is_some_and(|sq| position.piece_at(sq).is_none()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn kings() -> PositionBuilder {
        PositionBuilder::new()
            .piece(Piece::King, Color::White, Square::E1)
            .piece(Piece::King, Color::Black, Square::E8)
    }

    #[test]
    fn builds_minimal_position() {
        let pos = kings().side_to_move(Color::Black).halfmove_clock(7).build().unwrap();
        assert_eq!(pos.side_to_move(), Color::Black);
        assert_eq!(pos.halfmove_clock(), 7);
        assert_eq!(pos.castling(), CastlingRights::NONE);
        assert_eq!(pos.hash(), pos.compute_hash());
        assert!(!pos.can_undo());
    }

    #[test]
    fn rejects_doubly_occupied_square() {
        let err = kings()
            .piece(Piece::Knight, Color::White, sq("c3"))
            .piece(Piece::Bishop, Color::Black, sq("c3"))
            .build()
            .unwrap_err();
        assert_eq!(err, SetupError::SquareOccupied(sq("c3")));
    }

    #[test]
    fn requires_one_king_each() {
        let err = PositionBuilder::new()
            .piece(Piece::King, Color::White, Square::E1)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            SetupError::KingCount {
                color: Color::Black,
                count: 0
            }
        );

        let err = kings()
            .piece(Piece::King, Color::White, sq("a3"))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            SetupError::KingCount {
                color: Color::White,
                count: 2
            }
        );
        assert_eq!(err.to_string(), "expected exactly one White king, found 2");
    }

    #[test]
    fn rejects_pawns_on_back_ranks() {
        let err = kings()
            .piece(Piece::Pawn, Color::Black, sq("a1"))
            .build()
            .unwrap_err();
        assert_eq!(err, SetupError::PawnOnBackRank(sq("a1")));
    }

    #[test]
    fn castling_requires_home_squares() {
        let err = kings().castling(Color::White, true).build().unwrap_err();
        assert_eq!(err, SetupError::CastlingWithoutPieces('K'));

        let pos = kings()
            .piece(Piece::Rook, Color::Black, Square::A8)
            .castling(Color::Black, false)
            .build()
            .unwrap();
        assert!(pos.castling().can_castle_queenside(Color::Black));

        let err = PositionBuilder::new()
            .piece(Piece::King, Color::White, sq("d1"))
            .piece(Piece::King, Color::Black, Square::E8)
            .piece(Piece::Rook, Color::White, Square::A1)
            .castling(Color::White, false)
            .build()
            .unwrap_err();
        assert_eq!(err, SetupError::CastlingWithoutPieces('Q'));
    }

    #[test]
    fn en_passant_validation() {
        let pos = kings()
            .piece(Piece::Pawn, Color::White, sq("d4"))
            .side_to_move(Color::Black)
            .en_passant(sq("d4"))
            .build()
            .unwrap();
        assert_eq!(pos.en_passant(), Some(sq("d4")));
        assert_eq!(pos.hash(), pos.compute_hash());

        // Wrong colour: white to move cannot capture its own pawn.
        let err = kings()
            .piece(Piece::Pawn, Color::White, sq("d4"))
            .en_passant(sq("d4"))
            .build()
            .unwrap_err();
        assert_eq!(err, SetupError::InvalidEnPassant(sq("d4")));

        // Wrong rank.
        let err = kings()
            .piece(Piece::Pawn, Color::White, sq("d3"))
            .side_to_move(Color::Black)
            .en_passant(sq("d3"))
            .build()
            .unwrap_err();
        assert_eq!(err, SetupError::InvalidEnPassant(sq("d3")));

        // The pawn cannot have passed through an occupied square.
        let err = kings()
            .piece(Piece::Pawn, Color::White, sq("d4"))
            .piece(Piece::Knight, Color::White, sq("d3"))
            .side_to_move(Color::Black)
            .en_passant(sq("d4"))
            .build()
            .unwrap_err();
        assert_eq!(err, SetupError::InvalidEnPassant(sq("d4")));
    }

    #[test]
    fn side_not_to_move_must_not_be_in_check() {
        let err = kings()
            .piece(Piece::Rook, Color::White, sq("e4"))
            .build()
            .unwrap_err();
        assert_eq!(err, SetupError::OpponentInCheck(Color::Black));

        let pos = kings()
            .piece(Piece::Rook, Color::White, sq("e4"))
            .side_to_move(Color::Black)
            .build()
            .unwrap();
        assert!(pos.is_in_check());
    }
}
