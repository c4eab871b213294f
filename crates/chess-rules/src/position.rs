//! Chess position representation and the make/unmake state machine.

use std::fmt;

use chess_core::{Color, File, Move, MoveKind, Piece, Rank, Square};
use tracing::trace;

use crate::zobrist::ZobristKey;
use crate::Bitboard;

/// Castling rights flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const WHITE_KINGSIDE: u8 = 0b0001;
    pub const WHITE_QUEENSIDE: u8 = 0b0010;
    pub const BLACK_KINGSIDE: u8 = 0b0100;
    pub const BLACK_QUEENSIDE: u8 = 0b1000;
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    /// Creates new castling rights from flags.
    #[inline]
    pub const fn new(flags: u8) -> Self {
        CastlingRights(flags & 0b1111)
    }

    /// Returns the flag for one side of one colour.
    #[inline]
    pub const fn flag(color: Color, kingside: bool) -> u8 {
        match (color, kingside) {
            (Color::White, true) => Self::WHITE_KINGSIDE,
            (Color::White, false) => Self::WHITE_QUEENSIDE,
            (Color::Black, true) => Self::BLACK_KINGSIDE,
            (Color::Black, false) => Self::BLACK_QUEENSIDE,
        }
    }

    /// Returns the home square of the rook a castling right refers to.
    #[inline]
    pub const fn rook_square(color: Color, kingside: bool) -> Square {
        match (color, kingside) {
            (Color::White, true) => Square::H1,
            (Color::White, false) => Square::A1,
            (Color::Black, true) => Square::H8,
            (Color::Black, false) => Square::A8,
        }
    }

    /// Returns true if `color` may still castle on the given side.
    #[inline]
    pub const fn has(self, color: Color, kingside: bool) -> bool {
        (self.0 & Self::flag(color, kingside)) != 0
    }

    #[inline]
    pub const fn can_castle_kingside(self, color: Color) -> bool {
        self.has(color, true)
    }

    #[inline]
    pub const fn can_castle_queenside(self, color: Color) -> bool {
        self.has(color, false)
    }

    /// Adds a castling right.
    #[inline]
    pub fn insert(&mut self, color: Color, kingside: bool) {
        self.0 |= Self::flag(color, kingside);
    }

    /// Removes castling rights for a color.
    #[inline]
    pub fn remove_color(&mut self, color: Color) {
        self.remove(color, true);
        self.remove(color, false);
    }

    /// Removes one castling right.
    #[inline]
    pub fn remove(&mut self, color: Color, kingside: bool) {
        self.0 &= !Self::flag(color, kingside);
    }

    /// Removes the right tied to a rook standing on `square`, if any.
    pub fn remove_rook_square(&mut self, color: Color, square: Square) {
        for kingside in [true, false] {
            if square == Self::rook_square(color, kingside) {
                self.remove(color, kingside);
            }
        }
    }

    /// Returns the raw flags.
    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return write!(f, "-");
        }
        for (color, kingside, c) in [
            (Color::White, true, 'K'),
            (Color::White, false, 'Q'),
            (Color::Black, true, 'k'),
            (Color::Black, false, 'q'),
        ] {
            if self.has(color, kingside) {
                write!(f, "{}", c)?;
            }
        }
        Ok(())
    }
}

/// State needed to take back one committed move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct UndoRecord {
    pub(crate) mov: Move,
    pub(crate) en_passant: Option<Square>,
    pub(crate) castling: CastlingRights,
    pub(crate) halfmove_clock: u32,
}

/// Complete, mutable chess game state.
///
/// A position is changed only by [`make_move`](Position::make_move) and
/// [`unmake_move`](Position::unmake_move), which keep the bitboards, the
/// mailbox, the Zobrist key and the history stacks in step with each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    /// Bitboards for each piece type regardless of colour, indexed by `Piece`.
    pub(crate) pieces: [Bitboard; 6],

    /// Bitboards for each color's pieces.
    pub(crate) colors: [Bitboard; 2],

    /// Square-indexed mirror of `pieces`.
    pub(crate) mailbox: [Option<Piece>; 64],

    pub(crate) side_to_move: Color,

    pub(crate) castling: CastlingRights,

    /// Square of the pawn that just made a double step, if any.
    pub(crate) en_passant: Option<Square>,

    /// Plies since the last capture or pawn move.
    pub(crate) halfmove_clock: u32,

    pub(crate) undo_stack: Vec<UndoRecord>,

    /// Keys of the positions before each committed move.
    pub(crate) hash_history: Vec<ZobristKey>,

    pub(crate) hash: ZobristKey,
}

impl Position {
    /// Creates an empty board with white to move and no rights.
    pub(crate) fn empty() -> Self {
        Position {
            pieces: [Bitboard::EMPTY; 6],
            colors: [Bitboard::EMPTY; 2],
            mailbox: [None; 64],
            side_to_move: Color::White,
            castling: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            undo_stack: Vec::new(),
            hash_history: Vec::new(),
            hash: ZobristKey::default(),
        }
    }

    /// Creates the standard starting position.
    pub fn startpos() -> Self {
        const BACK_RANK: [Piece; 8] = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];

        let mut position = Position::empty();
        for color in Color::ALL {
            let back = Rank::ALL[color.back_rank() as usize];
            let pawns = Rank::ALL[color.pawn_rank() as usize];
            for (file, piece) in File::ALL.into_iter().zip(BACK_RANK) {
                position.place_piece(piece, color, Square::new(file, back));
                position.place_piece(Piece::Pawn, color, Square::new(file, pawns));
            }
        }
        position.castling = CastlingRights::ALL;
        position.hash = position.compute_hash();
        position
    }

    /// Returns the piece on the given square, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.mailbox[sq.index() as usize]
    }

    /// Returns the colour of the piece on the given square, if any.
    #[inline]
    pub fn color_at(&self, sq: Square) -> Option<Color> {
        let bb = Bitboard::from_square(sq);
        Color::ALL
            .into_iter()
            .find(|color| (self.colors[color.index()] & bb).is_not_empty())
    }

    /// Returns a bitboard of all occupied squares.
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.colors[0] | self.colors[1]
    }

    /// Returns all pieces of one colour.
    #[inline]
    pub fn color_pieces(&self, color: Color) -> Bitboard {
        self.colors[color.index()]
    }

    /// Returns a bitboard of pieces of one type, both colours.
    #[inline]
    pub fn pieces(&self, piece: Piece) -> Bitboard {
        self.pieces[piece.index()]
    }

    /// Returns a bitboard of pieces of the given type and color.
    #[inline]
    pub fn pieces_of(&self, piece: Piece, color: Color) -> Bitboard {
        self.pieces[piece.index()] & self.colors[color.index()]
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    /// Returns the square of the pawn that may be captured en passant.
    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    /// Returns the current Zobrist key.
    #[inline]
    pub fn hash(&self) -> ZobristKey {
        self.hash
    }

    /// Returns the most recently committed move.
    pub fn last_move(&self) -> Option<Move> {
        self.undo_stack.last().map(|record| record.mov)
    }

    /// Returns the number of moves that can be taken back.
    #[inline]
    pub fn made_move_count(&self) -> usize {
        self.undo_stack.len()
    }

    #[inline]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns the square of `color`'s king.
    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces_of(Piece::King, color).lsb()
    }

    /// Returns true if the side to move is in check.
    pub fn is_in_check(&self) -> bool {
        self.is_king_attacked(self.side_to_move)
    }

    /// Returns true if `color`'s king is attacked by the other side.
    pub(crate) fn is_king_attacked(&self, color: Color) -> bool {
        self.king_square(color)
            .is_some_and(|king| self.is_attacked(color.opposite(), king))
    }

    /// Recomputes the Zobrist key from scratch.
    pub fn compute_hash(&self) -> ZobristKey {
        let mut key = ZobristKey::default();
        for color in Color::ALL {
            for piece in Piece::ALL {
                for sq in self.pieces_of(piece, color) {
                    key.toggle_piece(piece, color, sq);
                }
            }
        }
        if self.side_to_move == Color::Black {
            key.toggle_turn();
        }
        key.toggle_castling(self.castling);
        key.toggle_en_passant(self.en_passant);
        key
    }

    /// Applies a move generated for this position.
    ///
    /// Returns `false` and leaves the position untouched if the move would
    /// leave the mover's king attacked.
    pub fn make_move(&mut self, m: Move) -> bool {
        let us = self.side_to_move;
        let them = us.opposite();

        self.hash_history.push(self.hash);
        self.update_pieces(m);

        if self.is_king_attacked(us) {
            self.revert_pieces(m);
            self.hash_history.pop();
            trace!(mv = %m, "rejected move leaving the king attacked");
            return false;
        }

        self.undo_stack.push(UndoRecord {
            mov: m,
            en_passant: self.en_passant,
            castling: self.castling,
            halfmove_clock: self.halfmove_clock,
        });

        let en_passant = (m.kind() == MoveKind::DoublePawnPush).then(|| m.to());
        self.set_en_passant(en_passant);

        let mut castling = self.castling;
        match m.piece() {
            Piece::King => castling.remove_color(us),
            Piece::Rook => castling.remove_rook_square(us, m.from()),
            _ => {}
        }
        if m.captured_piece() == Some(Piece::Rook) {
            castling.remove_rook_square(them, m.capture_square());
        }
        self.set_castling(castling);

        if m.is_capture() || m.piece() == Piece::Pawn {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        self.side_to_move = them;
        self.hash.toggle_turn();
        true
    }

    /// Takes back the last committed move and returns it.
    pub fn unmake_move(&mut self) -> Option<Move> {
        let record = self.undo_stack.pop()?;

        self.side_to_move = self.side_to_move.opposite();
        self.hash.toggle_turn();
        self.revert_pieces(record.mov);

        self.halfmove_clock = record.halfmove_clock;
        self.set_castling(record.castling);
        self.set_en_passant(record.en_passant);
        self.hash_history.pop();

        Some(record.mov)
    }

    /// Returns true if `m` does not leave the mover's king attacked.
    ///
    /// Only piece placement is simulated; no history is touched.
    pub fn is_move_legal(&mut self, m: Move) -> bool {
        self.update_pieces(m);
        let legal = !self.is_king_attacked(self.side_to_move);
        self.revert_pieces(m);
        legal
    }

    /// Finds the legal move written in UCI notation, e.g. `e2e4` or `e7e8q`.
    pub fn find_move(&mut self, uci: &str) -> Option<Move> {
        self.legal_moves()
            .as_slice()
            .iter()
            .copied()
            .find(|m| m.to_uci() == uci)
    }

    fn update_pieces(&mut self, m: Move) {
        let us = self.side_to_move;

        if let Some(captured) = m.captured_piece() {
            self.remove_piece(captured, us.opposite(), m.capture_square());
        }
        if m.is_castle() {
            let (from, to) = castling_rook_squares(m);
            self.relocate_piece(Piece::Rook, us, from, to);
        }
        self.relocate_piece(m.piece(), us, m.from(), m.to());
        if let Some(promoted) = m.promotion_piece() {
            self.promote_piece(Piece::Pawn, promoted, us, m.to());
        }
    }

    fn revert_pieces(&mut self, m: Move) {
        let us = self.side_to_move;

        if let Some(promoted) = m.promotion_piece() {
            self.promote_piece(promoted, Piece::Pawn, us, m.to());
        }
        self.relocate_piece(m.piece(), us, m.to(), m.from());
        if m.is_castle() {
            let (from, to) = castling_rook_squares(m);
            self.relocate_piece(Piece::Rook, us, to, from);
        }
        if let Some(captured) = m.captured_piece() {
            self.place_piece(captured, us.opposite(), m.capture_square());
        }
    }

    fn set_en_passant(&mut self, square: Option<Square>) {
        self.hash.toggle_en_passant(self.en_passant);
        self.en_passant = square;
        self.hash.toggle_en_passant(self.en_passant);
    }

    fn set_castling(&mut self, rights: CastlingRights) {
        self.hash.toggle_castling(self.castling);
        self.castling = rights;
        self.hash.toggle_castling(self.castling);
    }

    pub(crate) fn place_piece(&mut self, piece: Piece, color: Color, sq: Square) {
        self.pieces[piece.index()].set(sq);
        self.colors[color.index()].set(sq);
        self.mailbox[sq.index() as usize] = Some(piece);
        self.hash.toggle_piece(piece, color, sq);
    }

    pub(crate) fn remove_piece(&mut self, piece: Piece, color: Color, sq: Square) {
        self.pieces[piece.index()].clear(sq);
        self.colors[color.index()].clear(sq);
        self.mailbox[sq.index() as usize] = None;
        self.hash.toggle_piece(piece, color, sq);
    }

    fn relocate_piece(&mut self, piece: Piece, color: Color, from: Square, to: Square) {
        let mask = Bitboard::from_square(from) | Bitboard::from_square(to);
        self.pieces[piece.index()] ^= mask;
        self.colors[color.index()] ^= mask;
        self.mailbox[from.index() as usize] = None;
        self.mailbox[to.index() as usize] = Some(piece);
        self.hash.toggle_piece(piece, color, from);
        self.hash.toggle_piece(piece, color, to);
    }

    fn promote_piece(&mut self, old: Piece, new: Piece, color: Color, sq: Square) {
        self.pieces[old.index()].clear(sq);
        self.pieces[new.index()].set(sq);
        self.mailbox[sq.index() as usize] = Some(new);
        self.hash.toggle_piece(old, color, sq);
        self.hash.toggle_piece(new, color, sq);
    }
}

/// Returns the rook's (from, to) squares for a castling move.
fn castling_rook_squares(m: Move) -> (Square, Square) {
    let rank = m.from().rank();
    match m.kind() {
        MoveKind::KingCastle => (Square::new(File::H, rank), Square::new(File::F, rank)),
        _ => (Square::new(File::A, rank), Square::new(File::D, rank)),
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::ALL.into_iter().rev() {
            write!(f, "{} ", rank)?;
            for file in File::ALL {
                let sq = Square::new(file, rank);
                let c = match (self.piece_at(sq), self.color_at(sq)) {
                    (Some(piece), Some(color)) => piece.to_char(color),
                    _ => '.',
                };
                write!(f, " {}", c)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "   a b c d e f g h")?;
        write!(
            f,
            "{} to move, castling {}, en passant {}, halfmove clock {}",
            self.side_to_move,
            self.castling,
            self.en_passant
                .map_or_else(|| "-".to_string(), |sq| sq.to_algebraic()),
            self.halfmove_clock
        )
    }
}
