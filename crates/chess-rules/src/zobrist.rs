//! Zobrist hashing for position identification.
//!
//! A position's key is the XOR of pseudo-random values for:
//! - each piece on each square (6 pieces × 2 colours × 64 squares)
//! - black to move
//! - the full castling-rights mask (16 values, one per combination)
//! - the en passant file (8 values)
//!
//! Every component is its own inverse under XOR, so making and unmaking a
//! move toggles the same values and the key always matches a from-scratch
//! recomputation.

use crate::position::CastlingRights;
use chess_core::{Color, Piece, Square};
use std::fmt;

/// Zobrist hash keys.
///
/// Generated using a fixed seed so keys are identical across runs.
pub struct ZobristKeys {
    /// Keys for pieces: [piece][color][square]
    pub pieces: [[[u64; 64]; 2]; 6],
    /// Key for black to move.
    pub black_to_move: u64,
    /// Keys for each castling-rights mask.
    pub castling: [u64; 16],
    /// Keys for en passant file.
    pub en_passant: [u64; 8],
}

impl ZobristKeys {
    /// Initializes the keys with an xorshift64 generator.
    pub const fn new() -> Self {
        const fn next_random(state: u64) -> u64 {
            let mut x = state;
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            x
        }

        let mut state = 0x9E37_79B9_7F4A_7C15u64;
        let mut pieces = [[[0u64; 64]; 2]; 6];
        let mut castling = [0u64; 16];
        let mut en_passant = [0u64; 8];

        let mut piece = 0;
        while piece < 6 {
            let mut color = 0;
            while color < 2 {
                let mut square = 0;
                while square < 64 {
                    state = next_random(state);
                    pieces[piece][color][square] = state;
                    square += 1;
                }
                color += 1;
            }
            piece += 1;
        }

        state = next_random(state);
        let black_to_move = state;

        // No rights at all hashes to zero so a bare position needs no toggle.
        let mut i = 1;
        while i < 16 {
            state = next_random(state);
            castling[i] = state;
            i += 1;
        }

        let mut i = 0;
        while i < 8 {
            state = next_random(state);
            en_passant[i] = state;
            i += 1;
        }

        ZobristKeys {
            pieces,
            black_to_move,
            castling,
            en_passant,
        }
    }

    /// Returns the key for a piece on a square.
    #[inline]
    pub const fn piece_key(&self, piece: Piece, color: Color, square: Square) -> u64 {
        self.pieces[piece.index()][color.index()][square.index() as usize]
    }

    /// Returns the key for a castling-rights mask.
    #[inline]
    pub const fn castling_key(&self, rights: CastlingRights) -> u64 {
        self.castling[rights.raw() as usize]
    }

    /// Returns the key for an en passant file (0-7).
    #[inline]
    pub const fn en_passant_key(&self, file: usize) -> u64 {
        self.en_passant[file]
    }
}

/// Global Zobrist keys (initialized at compile time).
pub static ZOBRIST: ZobristKeys = ZobristKeys::new();

/// A position fingerprint.
///
/// Keys are built by toggling components in and out; toggling the same
/// component twice restores the previous key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ZobristKey(u64);

impl ZobristKey {
    /// Creates a key from its raw value.
    #[inline]
    pub const fn new(value: u64) -> Self {
        ZobristKey(value)
    }

    /// Returns the raw 64-bit value.
    #[inline]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Lower 32 bits.
    #[inline]
    pub const fn low(self) -> u32 {
        self.0 as u32
    }

    /// Upper 32 bits.
    #[inline]
    pub const fn high(self) -> u32 {
        (self.0 >> 32) as u32
    }

    #[inline]
    pub fn toggle_piece(&mut self, piece: Piece, color: Color, square: Square) {
        self.0 ^= ZOBRIST.piece_key(piece, color, square);
    }

    #[inline]
    pub fn toggle_turn(&mut self) {
        self.0 ^= ZOBRIST.black_to_move;
    }

    #[inline]
    pub fn toggle_castling(&mut self, rights: CastlingRights) {
        self.0 ^= ZOBRIST.castling_key(rights);
    }

    /// Toggles the en passant file of `square`; `None` is a no-op.
    #[inline]
    pub fn toggle_en_passant(&mut self, square: Option<Square>) {
        if let Some(sq) = square {
            self.0 ^= ZOBRIST.en_passant_key(sq.file().index() as usize);
        }
    }
}

impl fmt::Debug for ZobristKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ZobristKey({:#018x})", self.0)
    }
}

impl fmt::Display for ZobristKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}
