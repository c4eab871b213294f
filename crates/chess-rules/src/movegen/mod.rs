//! Move generation.
//!
//! Moves are generated pseudo-legally from set-wise bitboard operations and
//! then, when asked for, filtered for legality by playing each one on the
//! board and checking whether the mover's king is left attacked.

mod attacks;
pub mod perft;

use crate::{Bitboard, Position};
use chess_core::{Color, Move, MoveKind, Piece, Square};

pub use attacks::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, queen_attacks, rook_attacks,
};

/// A list of moves with a fixed maximum capacity.
///
/// Chess positions have at most 218 legal moves, so we use a fixed-size
/// array to avoid heap allocations during move generation.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; Self::MAX_MOVES],
    len: usize,
}

impl MoveList {
    /// Maximum number of moves in any chess position.
    pub const MAX_MOVES: usize = 256;

    /// Creates an empty move list.
    #[inline]
    pub const fn new() -> Self {
        MoveList {
            moves: [Move::NULL; Self::MAX_MOVES],
            len: 0,
        }
    }

    /// Adds a move to the list.
    #[inline]
    pub fn push(&mut self, m: Move) {
        debug_assert!(self.len < Self::MAX_MOVES);
        self.moves[self.len] = m;
        self.len += 1;
    }

    /// Returns the number of moves.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a slice of the moves.
    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    /// Iterates over the moves in generation order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    /// Returns true if the list holds `m`.
    pub fn contains(&self, m: Move) -> bool {
        self.as_slice().contains(&m)
    }

    /// Retains only moves for which the predicate returns true.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&Move) -> bool,
    {
        let mut write = 0;
        for read in 0..self.len {
            if f(&self.moves[read]) {
                self.moves[write] = self.moves[read];
                write += 1;
            }
        }
        self.len = write;
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.as_slice()[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl Position {
    /// Returns true if any piece of colour `by` attacks `sq`.
    pub fn is_attacked(&self, by: Color, sq: Square) -> bool {
        let target = Bitboard::from_square(sq);
        let occupied = self.occupied();
        let queens = self.pieces_of(Piece::Queen, by);

        (pawn_attacks(self.pieces_of(Piece::Pawn, by), by) & target).is_not_empty()
            || (knight_attacks(sq) & self.pieces_of(Piece::Knight, by)).is_not_empty()
            || (king_attacks(sq) & self.pieces_of(Piece::King, by)).is_not_empty()
            || (bishop_attacks(target, occupied) & (self.pieces_of(Piece::Bishop, by) | queens))
                .is_not_empty()
            || (rook_attacks(target, occupied) & (self.pieces_of(Piece::Rook, by) | queens))
                .is_not_empty()
    }

    /// Returns true if `color` may castle on the given side right now.
    ///
    /// The right must be held and the squares between king and rook must be
    /// empty. With `verify_attacks`, the king's start, transit and
    /// destination squares must also be safe.
    pub fn can_castle(&self, color: Color, kingside: bool, verify_attacks: bool) -> bool {
        if !self.castling.has(color, kingside) {
            return false;
        }

        let direction: i8 = if kingside { 1 } else { -1 };
        let king = if color == Color::White {
            Square::E1
        } else {
            Square::E8
        };
        let occupied = self.occupied();
        let between: &[i8] = if kingside { &[1, 2] } else { &[1, 2, 3] };
        let blocked = between
            .iter()
            .filter_map(|&steps| king.offset(steps * direction))
            .any(|sq| occupied.contains(sq));
        if blocked {
            return false;
        }

        if verify_attacks {
            let them = color.opposite();
            return (0..3)
                .filter_map(|steps| king.offset(steps * direction))
                .all(|sq| !self.is_attacked(them, sq));
        }
        true
    }

    /// Generates moves for the side to move.
    ///
    /// With `pseudo_legal` the moves may leave the mover's own king
    /// attacked. With `only_captures`, quiet moves and castling are skipped.
    pub fn moves(&mut self, pseudo_legal: bool, only_captures: bool) -> MoveList {
        let mut moves = self.pseudo_legal_moves(only_captures);
        if !pseudo_legal {
            moves.retain(|&m| self.is_move_legal(m));
        }
        moves
    }

    /// Generates all legal moves for the side to move.
    pub fn legal_moves(&mut self) -> MoveList {
        self.moves(false, false)
    }

    /// Generates moves that obey piece movement but may leave the king in check.
    pub fn pseudo_legal_moves(&self, only_captures: bool) -> MoveList {
        let mut moves = MoveList::new();
        self.generate_pawn_moves(&mut moves, only_captures);
        self.generate_piece_moves(&mut moves, only_captures);
        if !only_captures {
            self.generate_castling_moves(&mut moves);
        }
        moves
    }

    fn generate_pawn_moves(&self, moves: &mut MoveList, only_captures: bool) {
        let us = self.side_to_move;
        let file_direction = us.pawn_direction() as i32;
        let rank_direction = 8 * file_direction;
        let pawns = self.pieces_of(Piece::Pawn, us);
        let opponent = self.color_pieces(us.opposite());
        let occupied = self.occupied();
        let last_rank = Bitboard::RANKS[us.promotion_rank() as usize];

        if !only_captures {
            let double_pushed = (pawns & Bitboard::RANKS[us.pawn_rank() as usize])
                .shift(2 * rank_direction)
                .and_not(occupied)
                .and_not(occupied.shift(rank_direction));
            self.add_pawn_moves(moves, double_pushed, 2 * rank_direction, MoveKind::DoublePawnPush);

            let pushed = pawns.shift(rank_direction).and_not(occupied);
            self.add_pawn_moves(moves, pushed.and_not(last_rank), rank_direction, MoveKind::Quiet);
            self.add_pawn_promotions(moves, pushed & last_rank, rank_direction, false);
        }

        // "Left" and "right" are seen from the mover's side of the board.
        let (left_file, right_file) = match us {
            Color::White => (Bitboard::FILES[0], Bitboard::FILES[7]),
            Color::Black => (Bitboard::FILES[7], Bitboard::FILES[0]),
        };
        let left_movement = rank_direction - file_direction;
        let right_movement = rank_direction + file_direction;

        let left_captures = pawns.and_not(left_file).shift(left_movement) & opponent;
        self.add_pawn_moves(moves, left_captures.and_not(last_rank), left_movement, MoveKind::Capture);
        self.add_pawn_promotions(moves, left_captures & last_rank, left_movement, true);

        let right_captures = pawns.and_not(right_file).shift(right_movement) & opponent;
        self.add_pawn_moves(moves, right_captures.and_not(last_rank), right_movement, MoveKind::Capture);
        self.add_pawn_promotions(moves, right_captures & last_rank, right_movement, true);

        if let Some(ep) = self.en_passant {
            let ep = Bitboard::from_square(ep);
            let from_right = ep.shift(file_direction) & pawns;
            self.add_pawn_moves(
                moves,
                from_right.and_not(left_file).shift(left_movement),
                left_movement,
                MoveKind::EnPassant,
            );
            let from_left = ep.shift(-file_direction) & pawns;
            self.add_pawn_moves(
                moves,
                from_left.and_not(right_file).shift(right_movement),
                right_movement,
                MoveKind::EnPassant,
            );
        }
    }

    /// Adds one pawn move per target square, coming from `movement` behind it.
    fn add_pawn_moves(&self, moves: &mut MoveList, targets: Bitboard, movement: i32, kind: MoveKind) {
        for to in targets {
            let Some(from) = to.offset(-movement as i8) else {
                continue;
            };
            let captured = match kind {
                MoveKind::EnPassant => Some(Piece::Pawn),
                _ => self.piece_at(to),
            };
            moves.push(Move::new(from, to, kind, Piece::Pawn, captured));
        }
    }

    fn add_pawn_promotions(&self, moves: &mut MoveList, targets: Bitboard, movement: i32, capture: bool) {
        for piece in Piece::PROMOTIONS {
            if let Some(kind) = MoveKind::promotion(piece, capture) {
                self.add_pawn_moves(moves, targets, movement, kind);
            }
        }
    }

    fn generate_piece_moves(&self, moves: &mut MoveList, only_captures: bool) {
        let us = self.side_to_move;
        let opponent = self.color_pieces(us.opposite());
        let occupied = self.occupied();
        let mut targets = !self.color_pieces(us);
        if only_captures {
            targets &= opponent;
        }

        for from in self.pieces_of(Piece::Knight, us) {
            self.add_piece_moves(moves, Piece::Knight, from, knight_attacks(from) & targets);
        }
        for from in self.pieces_of(Piece::Queen, us) {
            let reach = queen_attacks(Bitboard::from_square(from), occupied);
            self.add_piece_moves(moves, Piece::Queen, from, reach & targets);
        }
        for from in self.pieces_of(Piece::Bishop, us) {
            let reach = bishop_attacks(Bitboard::from_square(from), occupied);
            self.add_piece_moves(moves, Piece::Bishop, from, reach & targets);
        }
        for from in self.pieces_of(Piece::Rook, us) {
            let reach = rook_attacks(Bitboard::from_square(from), occupied);
            self.add_piece_moves(moves, Piece::Rook, from, reach & targets);
        }
        for from in self.pieces_of(Piece::King, us) {
            self.add_piece_moves(moves, Piece::King, from, king_attacks(from) & targets);
        }
    }

    fn add_piece_moves(&self, moves: &mut MoveList, piece: Piece, from: Square, targets: Bitboard) {
        for to in targets {
            let captured = self.piece_at(to);
            let kind = if captured.is_some() {
                MoveKind::Capture
            } else {
                MoveKind::Quiet
            };
            moves.push(Move::new(from, to, kind, piece, captured));
        }
    }

    fn generate_castling_moves(&self, moves: &mut MoveList) {
        let us = self.side_to_move;
        let Some(king) = self.king_square(us) else {
            return;
        };
        for (kingside, kind, step) in [(true, MoveKind::KingCastle, 2), (false, MoveKind::QueenCastle, -2)] {
            if !self.can_castle(us, kingside, true) {
                continue;
            }
            if let Some(to) = king.offset(step) {
                moves.push(Move::new(king, to, kind, Piece::King, None));
            }
        }
    }
}
