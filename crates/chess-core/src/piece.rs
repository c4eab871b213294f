//! Chess piece representation.

use crate::Color;

/// The six types of chess pieces.
///
/// The ordinal order is significant: it indexes the per-piece bitboards and
/// the promotion kinds are encoded as `Knight + n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Piece {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl Piece {
    /// All piece types in order.
    pub const ALL: [Piece; 6] = [
        Piece::Pawn,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
        Piece::King,
    ];

    /// Pieces a pawn may promote to, strongest first.
    pub const PROMOTIONS: [Piece; 4] = [Piece::Queen, Piece::Rook, Piece::Bishop, Piece::Knight];

    /// Returns the index of this piece type (0-5).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Creates a piece from its index (0-5).
    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Piece::Pawn),
            1 => Some(Piece::Knight),
            2 => Some(Piece::Bishop),
            3 => Some(Piece::Rook),
            4 => Some(Piece::Queen),
            5 => Some(Piece::King),
            _ => None,
        }
    }

    /// Returns the letter used for this piece in move notation.
    ///
    /// Pawns have no letter.
    pub const fn algebraic_letter(self) -> Option<char> {
        match self {
            Piece::Pawn => None,
            Piece::Knight => Some('N'),
            Piece::Bishop => Some('B'),
            Piece::Rook => Some('R'),
            Piece::Queen => Some('Q'),
            Piece::King => Some('K'),
        }
    }

    /// Returns a board-diagram character: upper case for White, lower case for Black.
    pub const fn to_char(self, color: Color) -> char {
        let c = match self {
            Piece::Pawn => 'p',
            Piece::Knight => 'n',
            Piece::Bishop => 'b',
            Piece::Rook => 'r',
            Piece::Queen => 'q',
            Piece::King => 'k',
        };
        match color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// Returns the Unicode chess glyph for this piece.
    pub const fn symbol(self, color: Color) -> char {
        match (color, self) {
            (Color::White, Piece::Pawn) => '\u{2659}',
            (Color::White, Piece::Knight) => '\u{2658}',
            (Color::White, Piece::Bishop) => '\u{2657}',
            (Color::White, Piece::Rook) => '\u{2656}',
            (Color::White, Piece::Queen) => '\u{2655}',
            (Color::White, Piece::King) => '\u{2654}',
            (Color::Black, Piece::Pawn) => '\u{265F}',
            (Color::Black, Piece::Knight) => '\u{265E}',
            (Color::Black, Piece::Bishop) => '\u{265D}',
            (Color::Black, Piece::Rook) => '\u{265C}',
            (Color::Black, Piece::Queen) => '\u{265B}',
            (Color::Black, Piece::King) => '\u{265A}',
        }
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Piece::Pawn => "pawn",
            Piece::Knight => "knight",
            Piece::Bishop => "bishop",
            Piece::Rook => "rook",
            Piece::Queen => "queen",
            Piece::King => "king",
        };
        write!(f, "{}", name)
    }
}
