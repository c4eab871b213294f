//! Attack sets for all piece types.
//!
//! Knight and king reach is tabulated per square at compile time. Pawn
//! attacks are computed set-wise by shifting, and sliding attacks are found
//! by casting rays one step at a time until they hit a blocker. All functions
//! here accept a whole set of attackers, so "is this square attacked by any
//! bishop" is a single call.

use crate::Bitboard;
use chess_core::{Color, Square};

/// Precomputed knight attack tables.
const KNIGHT_ATTACKS: [Bitboard; 64] = compute_knight_attacks();

/// Precomputed king attack tables.
const KING_ATTACKS: [Bitboard; 64] = compute_king_attacks();

/// Masks applied after a sliding step, indexed by `file_step + 1`. A step
/// toward the a-file must not land on the h-file and vice versa.
const SLIDING_MASKS: [Bitboard; 3] = [
    Bitboard(!Bitboard::FILE_H.0),
    Bitboard::FULL,
    Bitboard(!Bitboard::FILE_A.0),
];

/// Returns knight attacks from the given square.
#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_ATTACKS[sq.index() as usize]
}

/// Returns king attacks from the given square.
#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    KING_ATTACKS[sq.index() as usize]
}

/// Returns every square attacked by the given pawns of `color`.
#[inline]
pub fn pawn_attacks(pawns: Bitboard, color: Color) -> Bitboard {
    let (toward_a, toward_h) = match color {
        Color::White => (7, 9),
        Color::Black => (-9, -7),
    };
    pawns.and_not(Bitboard::FILE_A).shift(toward_a) | pawns.and_not(Bitboard::FILE_H).shift(toward_h)
}

/// Casts rays from every square in `sliders` in one direction.
///
/// The ray stops on the first occupied square, which is itself included.
fn sliding_attacks(sliders: Bitboard, occupied: Bitboard, rank_step: i32, file_step: i32) -> Bitboard {
    let step = rank_step * 8 + file_step;
    let mask = SLIDING_MASKS[(file_step + 1) as usize];
    let mut attacks = Bitboard::EMPTY;
    let mut ray = sliders.shift(step) & mask;
    while ray.is_not_empty() {
        attacks |= ray;
        ray = ray.and_not(occupied).shift(step) & mask;
    }
    attacks
}

/// Returns the squares attacked diagonally by `sliders`.
pub fn bishop_attacks(sliders: Bitboard, occupied: Bitboard) -> Bitboard {
    sliding_attacks(sliders, occupied, 1, 1)
        | sliding_attacks(sliders, occupied, 1, -1)
        | sliding_attacks(sliders, occupied, -1, 1)
        | sliding_attacks(sliders, occupied, -1, -1)
}

/// Returns the squares attacked along ranks and files by `sliders`.
pub fn rook_attacks(sliders: Bitboard, occupied: Bitboard) -> Bitboard {
    sliding_attacks(sliders, occupied, 0, 1)
        | sliding_attacks(sliders, occupied, 0, -1)
        | sliding_attacks(sliders, occupied, 1, 0)
        | sliding_attacks(sliders, occupied, -1, 0)
}

/// Returns the squares attacked by `sliders` moving as queens.
#[inline]
pub fn queen_attacks(sliders: Bitboard, occupied: Bitboard) -> Bitboard {
    bishop_attacks(sliders, occupied) | rook_attacks(sliders, occupied)
}

/// Knight reach: one- and two-file sideways offsets (masked so they cannot
/// wrap to the far edge), moved two and one ranks up and down respectively.
const fn compute_knight_attacks() -> [Bitboard; 64] {
    let not_a = !Bitboard::FILE_A.0;
    let not_ab = not_a & !Bitboard::FILE_A.shift(1).0;
    let not_h = !Bitboard::FILE_H.0;
    let not_gh = not_h & !Bitboard::FILE_H.shift(-1).0;

    let mut attacks = [Bitboard::EMPTY; 64];
    let mut sq = 0;
    while sq < 64 {
        let b = 1u64 << sq;
        let left1 = (b >> 1) & not_h;
        let left2 = (b >> 2) & not_gh;
        let right1 = (b << 1) & not_a;
        let right2 = (b << 2) & not_ab;
        let one_file = left1 | right1;
        let two_files = left2 | right2;
        attacks[sq] = Bitboard((two_files << 8) | (two_files >> 8) | (one_file << 16) | (one_file >> 16));
        sq += 1;
    }
    attacks
}

/// King reach: the sideways neighbours, plus the square and its neighbours
/// moved one rank up and down.
const fn compute_king_attacks() -> [Bitboard; 64] {
    let mut attacks = [Bitboard::EMPTY; 64];
    let mut sq = 0;
    while sq < 64 {
        let b = 1u64 << sq;
        let sideways = ((b >> 1) & !Bitboard::FILE_H.0) | ((b << 1) & !Bitboard::FILE_A.0);
        let row = b | sideways;
        attacks[sq] = Bitboard(sideways | (row << 8) | (row >> 8));
        sq += 1;
    }
    attacks
}
