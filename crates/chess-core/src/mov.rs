//! Move representation.

use crate::{Piece, Square};
use std::fmt;

/// What a move does besides relocating the moving piece.
///
/// The discriminants are a packed encoding: `4` marks a capture and `8` marks
/// a promotion, in which case the low two bits select the promoted piece as
/// `Knight + n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveKind {
    /// Plain relocation to an empty square.
    Quiet = 0,
    /// Pawn double push from its starting rank.
    DoublePawnPush = 1,
    /// Kingside castling (0-0).
    KingCastle = 2,
    /// Queenside castling (0-0-0).
    QueenCastle = 3,
    /// Capture on the destination square.
    Capture = 4,
    /// En passant capture.
    EnPassant = 5,
    KnightPromotion = 8,
    BishopPromotion = 9,
    RookPromotion = 10,
    QueenPromotion = 11,
    KnightPromotionCapture = 12,
    BishopPromotionCapture = 13,
    RookPromotionCapture = 14,
    QueenPromotionCapture = 15,
}

impl MoveKind {
    const CAPTURE_BIT: u8 = 4;
    const PROMOTION_BIT: u8 = 8;

    /// Decodes a kind from its 4-bit value. Values 6 and 7 are unused.
    #[inline]
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(MoveKind::Quiet),
            1 => Some(MoveKind::DoublePawnPush),
            2 => Some(MoveKind::KingCastle),
            3 => Some(MoveKind::QueenCastle),
            4 => Some(MoveKind::Capture),
            5 => Some(MoveKind::EnPassant),
            8 => Some(MoveKind::KnightPromotion),
            9 => Some(MoveKind::BishopPromotion),
            10 => Some(MoveKind::RookPromotion),
            11 => Some(MoveKind::QueenPromotion),
            12 => Some(MoveKind::KnightPromotionCapture),
            13 => Some(MoveKind::BishopPromotionCapture),
            14 => Some(MoveKind::RookPromotionCapture),
            15 => Some(MoveKind::QueenPromotionCapture),
            _ => None,
        }
    }

    /// Returns the promotion kind for `piece`, or `None` if a pawn cannot
    /// promote to it.
    #[inline]
    pub const fn promotion(piece: Piece, capture: bool) -> Option<Self> {
        let offset = match piece {
            Piece::Knight | Piece::Bishop | Piece::Rook | Piece::Queen => {
                piece as u8 - Piece::Knight as u8
            }
            Piece::Pawn | Piece::King => return None,
        };
        let capture_bit = if capture { Self::CAPTURE_BIT } else { 0 };
        Self::from_bits(Self::PROMOTION_BIT | capture_bit | offset)
    }

    /// Returns the raw 4-bit value.
    #[inline]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Returns true if this kind removes an opponent piece.
    #[inline]
    pub const fn is_capture(self) -> bool {
        self as u8 & Self::CAPTURE_BIT != 0
    }

    /// Returns true if this is a promotion (with or without capture).
    #[inline]
    pub const fn is_promotion(self) -> bool {
        self as u8 & Self::PROMOTION_BIT != 0
    }

    /// Returns true if this is a castling move.
    #[inline]
    pub const fn is_castle(self) -> bool {
        matches!(self, MoveKind::KingCastle | MoveKind::QueenCastle)
    }

    /// Returns the promotion piece if this is a promotion move.
    #[inline]
    pub const fn promotion_piece(self) -> Option<Piece> {
        if self.is_promotion() {
            Piece::from_index(Piece::Knight as u8 + (self as u8 & 3))
        } else {
            None
        }
    }
}

/// A chess move.
///
/// Packed into 22 bits of a `u32`:
///
/// | bits  | field          |
/// |-------|----------------|
/// | 0-5   | destination    |
/// | 6-11  | source         |
/// | 12-15 | [`MoveKind`]   |
/// | 16-18 | moving piece   |
/// | 19-21 | captured piece |
///
/// The captured piece field is only meaningful for capture kinds.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move(u32);

impl Move {
    /// Creates a new move.
    #[inline]
    pub const fn new(
        from: Square,
        to: Square,
        kind: MoveKind,
        piece: Piece,
        captured: Option<Piece>,
    ) -> Self {
        let captured = match captured {
            Some(p) => p as u32,
            None => 0,
        };
        Move(
            (to.index() as u32)
                | ((from.index() as u32) << 6)
                | ((kind as u32) << 12)
                | ((piece as u32) << 16)
                | (captured << 19),
        )
    }

    /// Returns the source square.
    #[inline]
    pub const fn from(self) -> Square {
        // SAFETY: masked to 6 bits, always a valid square index
        unsafe { Square::from_index_unchecked(((self.0 >> 6) & 0x3F) as u8) }
    }

    /// Returns the destination square.
    #[inline]
    pub const fn to(self) -> Square {
        // SAFETY: masked to 6 bits, always a valid square index
        unsafe { Square::from_index_unchecked((self.0 & 0x3F) as u8) }
    }

    /// Returns the move kind.
    #[inline]
    pub const fn kind(self) -> MoveKind {
        match MoveKind::from_bits(((self.0 >> 12) & 0xF) as u8) {
            Some(kind) => kind,
            None => MoveKind::Quiet,
        }
    }

    /// Returns the piece being moved (a pawn for promotions).
    #[inline]
    pub const fn piece(self) -> Piece {
        match Piece::from_index(((self.0 >> 16) & 0x7) as u8) {
            Some(piece) => piece,
            None => Piece::Pawn,
        }
    }

    /// Returns the captured piece, or `None` if this is not a capture.
    #[inline]
    pub const fn captured_piece(self) -> Option<Piece> {
        if self.is_capture() {
            Piece::from_index(((self.0 >> 19) & 0x7) as u8)
        } else {
            None
        }
    }

    #[inline]
    pub const fn is_capture(self) -> bool {
        self.kind().is_capture()
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.kind().is_promotion()
    }

    #[inline]
    pub const fn is_castle(self) -> bool {
        self.kind().is_castle()
    }

    /// Returns the piece a pawn promotes to, if this is a promotion.
    #[inline]
    pub const fn promotion_piece(self) -> Option<Piece> {
        self.kind().promotion_piece()
    }

    /// Returns the square the captured piece stands on.
    ///
    /// This is the destination for every kind except en passant, where the
    /// captured pawn sits on the destination file and the origin rank.
    #[inline]
    pub const fn capture_square(self) -> Square {
        match self.kind() {
            MoveKind::EnPassant => Square::new(self.to().file(), self.from().rank()),
            _ => self.to(),
        }
    }

    /// Returns the UCI notation for this move (e.g., "e2e4", "e7e8q").
    pub fn to_uci(self) -> String {
        let promo = match self.promotion_piece() {
            Some(Piece::Knight) => "n",
            Some(Piece::Bishop) => "b",
            Some(Piece::Rook) => "r",
            Some(Piece::Queen) => "q",
            _ => "",
        };
        format!("{}{}{}", self.from(), self.to(), promo)
    }

    /// A null move (used as placeholder, not a legal move).
    pub const NULL: Move = Move(0);
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({})", self)
    }
}

/// Long algebraic rendering: `Ng1-f3`, `e4xd5`, `e5xd6e.p.`, `e7-e8Q`, `0-0`.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            MoveKind::KingCastle => return write!(f, "0-0"),
            MoveKind::QueenCastle => return write!(f, "0-0-0"),
            _ => {}
        }
        if let Some(letter) = self.piece().algebraic_letter() {
            write!(f, "{}", letter)?;
        }
        let separator = if self.is_capture() { 'x' } else { '-' };
        write!(f, "{}{}{}", self.from(), separator, self.to())?;
        if self.kind() == MoveKind::EnPassant {
            write!(f, "e.p.")?;
        }
        if let Some(letter) = self.promotion_piece().and_then(Piece::algebraic_letter) {
            write!(f, "{}", letter)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn move_encoding() {
        let m = Move::new(sq("e2"), sq("e4"), MoveKind::DoublePawnPush, Piece::Pawn, None);

        assert_eq!(m.from(), sq("e2"));
        assert_eq!(m.to(), sq("e4"));
        assert_eq!(m.kind(), MoveKind::DoublePawnPush);
        assert_eq!(m.piece(), Piece::Pawn);
        assert_eq!(m.captured_piece(), None);
    }

    #[test]
    fn captured_piece_only_for_captures() {
        let capture = Move::new(sq("d1"), sq("d8"), MoveKind::Capture, Piece::Queen, Some(Piece::Rook));
        assert_eq!(capture.captured_piece(), Some(Piece::Rook));

        // A stray captured field on a quiet move is ignored.
        let quiet = Move::new(sq("d1"), sq("d4"), MoveKind::Quiet, Piece::Queen, Some(Piece::Rook));
        assert_eq!(quiet.captured_piece(), None);
    }

    #[test]
    fn kind_bits() {
        assert!(MoveKind::Capture.is_capture());
        assert!(MoveKind::EnPassant.is_capture());
        assert!(!MoveKind::DoublePawnPush.is_capture());
        assert!(!MoveKind::QueenCastle.is_capture());
        assert!(MoveKind::QueenPromotionCapture.is_capture());
        assert!(MoveKind::QueenPromotionCapture.is_promotion());
        assert!(!MoveKind::QueenPromotion.is_capture());
        assert!(MoveKind::KingCastle.is_castle());
        assert!(MoveKind::QueenCastle.is_castle());
        assert!(!MoveKind::EnPassant.is_castle());
        assert_eq!(MoveKind::from_bits(6), None);
        assert_eq!(MoveKind::from_bits(7), None);
        assert_eq!(MoveKind::from_bits(16), None);
    }

    #[test]
    fn promotion_kinds() {
        assert_eq!(MoveKind::promotion(Piece::Knight, false), Some(MoveKind::KnightPromotion));
        assert_eq!(MoveKind::promotion(Piece::Bishop, false), Some(MoveKind::BishopPromotion));
        assert_eq!(MoveKind::promotion(Piece::Rook, true), Some(MoveKind::RookPromotionCapture));
        assert_eq!(MoveKind::promotion(Piece::Queen, true), Some(MoveKind::QueenPromotionCapture));
        assert_eq!(MoveKind::promotion(Piece::Pawn, false), None);
        assert_eq!(MoveKind::promotion(Piece::King, true), None);

        for piece in Piece::PROMOTIONS {
            for capture in [false, true] {
                let kind = MoveKind::promotion(piece, capture).unwrap();
                assert_eq!(kind.promotion_piece(), Some(piece));
                assert_eq!(kind.is_capture(), capture);
            }
        }
        assert_eq!(MoveKind::Capture.promotion_piece(), None);
    }

    #[test]
    fn capture_square() {
        let normal = Move::new(sq("e4"), sq("d5"), MoveKind::Capture, Piece::Pawn, Some(Piece::Pawn));
        assert_eq!(normal.capture_square(), sq("d5"));

        let white_ep = Move::new(sq("e5"), sq("d6"), MoveKind::EnPassant, Piece::Pawn, Some(Piece::Pawn));
        assert_eq!(white_ep.capture_square(), sq("d5"));

        let black_ep = Move::new(sq("d4"), sq("e3"), MoveKind::EnPassant, Piece::Pawn, Some(Piece::Pawn));
        assert_eq!(black_ep.capture_square(), sq("e4"));
    }

    #[test]
    fn capture_square_stays_on_board() {
        let edge = Move::new(Square::A1, sq("b1"), MoveKind::EnPassant, Piece::Pawn, Some(Piece::Pawn));
        assert_eq!(edge.capture_square(), sq("b1"));

        let top = Move::new(sq("g8"), sq("h8"), MoveKind::EnPassant, Piece::Pawn, Some(Piece::Pawn));
        assert_eq!(top.capture_square(), sq("h8"));
    }

    #[test]
    fn display() {
        let knight = Move::new(sq("g1"), sq("f3"), MoveKind::Quiet, Piece::Knight, None);
        assert_eq!(knight.to_string(), "Ng1-f3");

        let pawn = Move::new(sq("e4"), sq("d5"), MoveKind::Capture, Piece::Pawn, Some(Piece::Pawn));
        assert_eq!(pawn.to_string(), "e4xd5");

        let ep = Move::new(sq("e5"), sq("d6"), MoveKind::EnPassant, Piece::Pawn, Some(Piece::Pawn));
        assert_eq!(ep.to_string(), "e5xd6e.p.");

        let promo = Move::new(sq("e7"), sq("f8"), MoveKind::KnightPromotionCapture, Piece::Pawn, Some(Piece::Bishop));
        assert_eq!(promo.to_string(), "e7xf8N");

        let short = Move::new(sq("e1"), sq("g1"), MoveKind::KingCastle, Piece::King, None);
        let long = Move::new(sq("e8"), sq("c8"), MoveKind::QueenCastle, Piece::King, None);
        assert_eq!(short.to_string(), "0-0");
        assert_eq!(long.to_string(), "0-0-0");
        assert_eq!(format!("{:?}", short), "Move(0-0)");
    }

    #[test]
    fn uci() {
        let push = Move::new(sq("e2"), sq("e4"), MoveKind::DoublePawnPush, Piece::Pawn, None);
        assert_eq!(push.to_uci(), "e2e4");

        let promo = Move::new(sq("e7"), sq("e8"), MoveKind::QueenPromotion, Piece::Pawn, None);
        assert_eq!(promo.to_uci(), "e7e8q");

        let castle = Move::new(sq("e1"), sq("c1"), MoveKind::QueenCastle, Piece::King, None);
        assert_eq!(castle.to_uci(), "e1c1");
    }

    #[test]
    fn move_null() {
        assert_eq!(Move::NULL.from(), Square::A1);
        assert_eq!(Move::NULL.to(), Square::A1);
        assert_eq!(Move::NULL.kind(), MoveKind::Quiet);
    }

    proptest! {
        #[test]
        fn en_passant_capture_square_is_beside_origin(from in 0u8..64, to in 0u8..64) {
            let from = Square::from_index(from).unwrap();
            let to = Square::from_index(to).unwrap();
            let m = Move::new(from, to, MoveKind::EnPassant, Piece::Pawn, Some(Piece::Pawn));
            let captured = m.capture_square();
            prop_assert!(captured.index() < 64);
            prop_assert_eq!(captured.file(), to.file());
            prop_assert_eq!(captured.rank(), from.rank());
        }

        #[test]
        fn fields_do_not_overlap(from in 0u8..64, to in 0u8..64, kind in 0u8..16, piece in 0u8..6, captured in 0u8..6) {
            prop_assume!(MoveKind::from_bits(kind).is_some());
            let kind = MoveKind::from_bits(kind).unwrap();
            let from = Square::from_index(from).unwrap();
            let to = Square::from_index(to).unwrap();
            let piece = Piece::from_index(piece).unwrap();
            let captured = Piece::from_index(captured);

            let m = Move::new(from, to, kind, piece, captured);
            prop_assert_eq!(m.from(), from);
            prop_assert_eq!(m.to(), to);
            prop_assert_eq!(m.kind(), kind);
            prop_assert_eq!(m.piece(), piece);
            prop_assert_eq!(m.captured_piece(), if kind.is_capture() { captured } else { None });
        }
    }
}
