//! Bitboard representation and operations.
//!
//! A bitboard is a 64-bit set where each bit represents a square on the
//! chess board. The geometric masks (files, ranks, diagonals, square colors)
//! are derived by formula in `const fn`s and baked into the binary, so they
//! are never built or mutated at run time.

use chess_core::Square;
use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

/// A set of squares.
///
/// Bit 0 = a1, bit 1 = b1, ..., bit 63 = h8 (little-endian rank-file mapping).
/// The low 32-bit half covers ranks 1-4 and the high half ranks 5-8.
///
/// `Bitboard` is `Copy` and every combining operator takes its operands by
/// value, so a shared mask can never be modified through an alias.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bitboard(pub u64);

impl Bitboard {
    /// Empty bitboard (no squares set).
    pub const EMPTY: Bitboard = Bitboard(0);

    /// Full bitboard (all squares set).
    pub const FULL: Bitboard = Bitboard(!0);

    pub const FILE_A: Bitboard = Bitboard::from_halves(0x0101_0101, 0x0101_0101);
    pub const FILE_H: Bitboard = Bitboard::FILE_A.shift(7);
    pub const RANK_1: Bitboard = Bitboard(0xFF);

    /// Squares whose rank and file sum to an odd number (b1, a2, ...).
    pub const LIGHT_SQUARES: Bitboard = Bitboard::from_halves(0x55AA_55AA, 0x55AA_55AA);

    /// Squares whose rank and file sum to an even number (a1, b2, ...).
    pub const DARK_SQUARES: Bitboard = Bitboard::from_halves(0xAA55_AA55, 0xAA55_AA55);

    /// The eight files, a to h.
    pub const FILES: [Bitboard; 8] = compute_files();

    /// The eight ranks, 1 to 8.
    pub const RANKS: [Bitboard; 8] = compute_ranks();

    /// Lines running from lower right to upper left, indexed by
    /// `rank + file`: entry 7 is the long h1-a8 diagonal.
    pub const DIAGONALS: [Bitboard; 15] = compute_diagonals();

    /// Lines running from lower left to upper right, indexed by
    /// `file - rank + 7`: entry 7 is the long a1-h8 diagonal.
    pub const ANTIDIAGONALS: [Bitboard; 15] = compute_antidiagonals();

    /// Creates a bitboard from a raw u64.
    #[inline]
    pub const fn new(bits: u64) -> Self {
        Bitboard(bits)
    }

    /// Creates a bitboard from its low (a1-h4) and high (a5-h8) halves.
    #[inline]
    pub const fn from_halves(low: u32, high: u32) -> Self {
        Bitboard((low as u64) | ((high as u64) << 32))
    }

    /// Returns the half covering squares 0-31.
    #[inline]
    pub const fn low(self) -> u32 {
        self.0 as u32
    }

    /// Returns the half covering squares 32-63.
    #[inline]
    pub const fn high(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Creates a bitboard with a single square set.
    #[inline]
    pub const fn from_square(sq: Square) -> Self {
        Bitboard(1u64 << sq.index())
    }

    /// Returns true if the bitboard is empty.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns true if the bitboard is not empty.
    #[inline]
    pub const fn is_not_empty(self) -> bool {
        self.0 != 0
    }

    /// Returns the number of set bits (population count).
    #[inline]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Returns true if the given square is set.
    #[inline]
    pub const fn contains(self, sq: Square) -> bool {
        (self.0 & (1u64 << sq.index())) != 0
    }

    /// Sets the given square.
    #[inline]
    pub fn set(&mut self, sq: Square) {
        self.0 |= 1u64 << sq.index();
    }

    /// Clears the given square.
    #[inline]
    pub fn clear(&mut self, sq: Square) {
        self.0 &= !(1u64 << sq.index());
    }

    /// Toggles the given square.
    #[inline]
    pub fn toggle(&mut self, sq: Square) {
        self.0 ^= 1u64 << sq.index();
    }

    /// Returns the lowest set square, or `None` if the bitboard is empty.
    #[inline]
    pub const fn lsb(self) -> Option<Square> {
        if self.0 == 0 {
            None
        } else {
            Square::from_index(self.0.trailing_zeros() as u8)
        }
    }

    /// Isolates the lowest set bit. Empty stays empty.
    #[inline]
    pub const fn lowest_bit(self) -> Bitboard {
        Bitboard(self.0 & self.0.wrapping_neg())
    }

    /// Removes and returns the lowest set square.
    #[inline]
    pub fn pop_lsb(&mut self) -> Option<Square> {
        let sq = self.lsb()?;
        self.0 &= self.0 - 1;
        Some(sq)
    }

    /// Returns the squares in `self` that are not in `other`.
    #[inline]
    pub const fn and_not(self, other: Bitboard) -> Bitboard {
        Bitboard(self.0 & !other.0)
    }

    /// Shifts every square by `amount` indices: positive toward h8, negative
    /// toward a1.
    ///
    /// Squares shifted off either end are dropped; an amount of 64 or more in
    /// either direction yields the empty set. Shifts are not file-aware, so
    /// callers mask out the edge files that would wrap around.
    #[inline]
    pub const fn shift(self, amount: i32) -> Bitboard {
        if amount >= 64 || amount <= -64 {
            Bitboard::EMPTY
        } else if amount > 0 {
            Bitboard(self.0 << amount)
        } else if amount < 0 {
            Bitboard(self.0 >> -amount)
        } else {
            self
        }
    }
}

const fn compute_files() -> [Bitboard; 8] {
    let mut files = [Bitboard::EMPTY; 8];
    let mut file = 0;
    while file < 8 {
        files[file] = Bitboard::FILE_A.shift(file as i32);
        file += 1;
    }
    files
}

const fn compute_ranks() -> [Bitboard; 8] {
    let mut ranks = [Bitboard::EMPTY; 8];
    let mut rank = 0;
    while rank < 8 {
        ranks[rank] = Bitboard::RANK_1.shift(rank as i32 * 8);
        rank += 1;
    }
    ranks
}

const fn compute_diagonals() -> [Bitboard; 15] {
    // h1-a8
    const LONG: Bitboard = Bitboard::from_halves(0x1020_4080, 0x0102_0408);
    let mut diagonals = [Bitboard::EMPTY; 15];
    let mut d = -7i32;
    while d <= 7 {
        let clipped = LONG.0 & Bitboard::FULL.shift(d * 8).0;
        diagonals[(d + 7) as usize] = Bitboard(clipped).shift(d);
        d += 1;
    }
    diagonals
}

const fn compute_antidiagonals() -> [Bitboard; 15] {
    // a1-h8
    const LONG: Bitboard = Bitboard::from_halves(0x0804_0201, 0x8040_2010);
    let mut antidiagonals = [Bitboard::EMPTY; 15];
    let mut d = -7i32;
    while d <= 7 {
        let clipped = LONG.0 & Bitboard::FULL.shift(-d * 8).0;
        antidiagonals[(d + 7) as usize] = Bitboard(clipped).shift(d);
        d += 1;
    }
    antidiagonals
}

impl BitAnd for Bitboard {
    type Output = Self;
    #[inline]
    fn bitand(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 & rhs.0)
    }
}

impl BitAndAssign for Bitboard {
    #[inline]
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl BitOr for Bitboard {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 | rhs.0)
    }
}

impl BitOrAssign for Bitboard {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitXor for Bitboard {
    type Output = Self;
    #[inline]
    fn bitxor(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 ^ rhs.0)
    }
}

impl BitXorAssign for Bitboard {
    #[inline]
    fn bitxor_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0;
    }
}

impl Not for Bitboard {
    type Output = Self;
    #[inline]
    fn not(self) -> Self::Output {
        Bitboard(!self.0)
    }
}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Bitboard({:#010x}, {:#010x})", self.low(), self.high())?;
        for rank in (0..8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8 {
                let sq = rank * 8 + file;
                if (self.0 >> sq) & 1 == 1 {
                    write!(f, "X ")?;
                } else {
                    write!(f, ". ")?;
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "  a b c d e f g h")
    }
}

/// Iterator over set squares in a bitboard, lowest first.
pub struct BitboardIter(Bitboard);

impl Iterator for BitboardIter {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.0.pop_lsb()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = self.0.count() as usize;
        (count, Some(count))
    }
}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = BitboardIter;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        BitboardIter(self)
    }
}
