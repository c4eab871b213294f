//! Property tests over random legal playouts from several set-up positions.
//!
//! Every visited position is checked for internal consistency, and every
//! legal move is checked to be perfectly reversible.

use chess_core::{Color, Piece, Square};
use chess_rules::{Bitboard, GameStatus, Position, PositionBuilder};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

/// Snapshot of all observable state, for make/unmake comparisons.
#[derive(Debug, PartialEq, Eq)]
struct Snapshot {
    board: Vec<(Option<Piece>, Option<Color>)>,
    pieces: Vec<Bitboard>,
    colors: Vec<Bitboard>,
    side_to_move: Color,
    castling: u8,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    hash: u64,
    made_moves: usize,
}

fn snapshot(pos: &Position) -> Snapshot {
    Snapshot {
        board: all_squares()
            .map(|sq| (pos.piece_at(sq), pos.color_at(sq)))
            .collect(),
        pieces: Piece::ALL.iter().map(|&p| pos.pieces(p)).collect(),
        colors: Color::ALL.iter().map(|&c| pos.color_pieces(c)).collect(),
        side_to_move: pos.side_to_move(),
        castling: pos.castling().raw(),
        en_passant: pos.en_passant(),
        halfmove_clock: pos.halfmove_clock(),
        hash: pos.hash().value(),
        made_moves: pos.made_move_count(),
    }
}

fn all_squares() -> impl Iterator<Item = Square> {
    (0..64).filter_map(Square::from_index)
}

fn check_board(pos: &Position) -> Result<(), TestCaseError> {
    let white = pos.color_pieces(Color::White);
    let black = pos.color_pieces(Color::Black);
    prop_assert!((white & black).is_empty(), "colour sets overlap");

    let mut union = Bitboard::EMPTY;
    for (i, &a) in Piece::ALL.iter().enumerate() {
        for &b in &Piece::ALL[i + 1..] {
            prop_assert!((pos.pieces(a) & pos.pieces(b)).is_empty());
        }
        union |= pos.pieces(a);
    }
    prop_assert_eq!(union, white | black);
    prop_assert_eq!(union, pos.occupied());

    for sq in all_squares() {
        let expected = Piece::ALL.into_iter().find(|&p| pos.pieces(p).contains(sq));
        prop_assert_eq!(pos.piece_at(sq), expected, "mailbox disagrees at {}", sq);
        prop_assert_eq!(pos.color_at(sq).is_some(), expected.is_some());
    }

    for color in Color::ALL {
        prop_assert_eq!(pos.pieces_of(Piece::King, color).count(), 1);
    }
    prop_assert_eq!(pos.hash(), pos.compute_hash());
    Ok(())
}

/// Every pseudo-legal move is accepted by `make_move` exactly when it is in
/// the legal list, and every accepted move unmakes back to the same state.
fn check_moves(pos: &mut Position) -> Result<(), TestCaseError> {
    let before = snapshot(pos);
    let legal = pos.legal_moves();
    let us = pos.side_to_move();

    for &m in &pos.pseudo_legal_moves(false) {
        let accepted = pos.make_move(m);
        prop_assert_eq!(accepted, legal.contains(m), "disagreement on {}", m);
        if accepted {
            let king = pos.king_square(us);
            prop_assert!(king.is_some_and(|k| !pos.is_attacked(us.opposite(), k)));
            prop_assert_eq!(pos.hash(), pos.compute_hash(), "hash drift after {}", m);
            check_board(pos)?;
            prop_assert_eq!(pos.unmake_move(), Some(m));
        }
        prop_assert_eq!(&snapshot(pos), &before, "state not restored after {}", m);
    }
    Ok(())
}

/// Plays random legal moves from `pos`, checking every position on the way,
/// then unmakes all of them and expects the starting state back.
fn playout(mut pos: Position, choices: Vec<u16>) -> Result<(), TestCaseError> {
    let start = snapshot(&pos);
    check_board(&pos)?;

    let mut played = 0;
    for choice in choices {
        check_moves(&mut pos)?;
        let legal = pos.legal_moves();
        if legal.is_empty() {
            prop_assert!(matches!(pos.status(), GameStatus::Checkmate | GameStatus::Draw(_)));
            break;
        }
        let m = legal[choice as usize % legal.len()];
        prop_assert!(pos.make_move(m));
        played += 1;
        check_board(&pos)?;
    }

    for _ in 0..played {
        prop_assert!(pos.unmake_move().is_some());
    }
    prop_assert_eq!(pos.unmake_move(), None);
    prop_assert_eq!(snapshot(&pos), start);
    Ok(())
}

fn sq(name: &str) -> Square {
    Square::from_algebraic(name).unwrap()
}

fn setup(pieces: &[(Piece, Color, &str)]) -> PositionBuilder {
    pieces
        .iter()
        .fold(PositionBuilder::new(), |builder, &(piece, color, square)| {
            builder.piece(piece, color, sq(square))
        })
}

/// r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -
fn kiwipete() -> Position {
    use Color::{Black, White};
    use Piece::*;
    setup(&[
        (King, White, "e1"),
        (Rook, White, "a1"),
        (Rook, White, "h1"),
        (Bishop, White, "d2"),
        (Bishop, White, "e2"),
        (Knight, White, "c3"),
        (Queen, White, "f3"),
        (Knight, White, "e5"),
        (Pawn, White, "a2"),
        (Pawn, White, "b2"),
        (Pawn, White, "c2"),
        (Pawn, White, "f2"),
        (Pawn, White, "g2"),
        (Pawn, White, "h2"),
        (Pawn, White, "e4"),
        (Pawn, White, "d5"),
        (King, Black, "e8"),
        (Rook, Black, "a8"),
        (Rook, Black, "h8"),
        (Queen, Black, "e7"),
        (Bishop, Black, "g7"),
        (Bishop, Black, "a6"),
        (Knight, Black, "b6"),
        (Knight, Black, "f6"),
        (Pawn, Black, "a7"),
        (Pawn, Black, "c7"),
        (Pawn, Black, "d7"),
        (Pawn, Black, "f7"),
        (Pawn, Black, "e6"),
        (Pawn, Black, "g6"),
        (Pawn, Black, "b4"),
        (Pawn, Black, "h3"),
    ])
    .castling(White, true)
    .castling(White, false)
    .castling(Black, true)
    .castling(Black, false)
    .build()
    .unwrap()
}

/// r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq -
fn promotion_heavy() -> Position {
    use Color::{Black, White};
    use Piece::*;
    setup(&[
        (King, White, "g1"),
        (Rook, White, "a1"),
        (Rook, White, "f1"),
        (Queen, White, "d1"),
        (Knight, White, "f3"),
        (Knight, White, "h6"),
        (Bishop, White, "a4"),
        (Bishop, White, "b4"),
        (Pawn, White, "a2"),
        (Pawn, White, "d2"),
        (Pawn, White, "g2"),
        (Pawn, White, "h2"),
        (Pawn, White, "c4"),
        (Pawn, White, "e4"),
        (Pawn, White, "b5"),
        (Pawn, White, "a7"),
        (King, Black, "e8"),
        (Rook, Black, "a8"),
        (Rook, Black, "h8"),
        (Queen, Black, "a3"),
        (Bishop, Black, "b6"),
        (Bishop, Black, "g6"),
        (Knight, Black, "f6"),
        (Knight, Black, "a5"),
        (Pawn, Black, "b7"),
        (Pawn, Black, "c7"),
        (Pawn, Black, "d7"),
        (Pawn, Black, "f7"),
        (Pawn, Black, "g7"),
        (Pawn, Black, "h7"),
        (Pawn, Black, "b2"),
    ])
    .castling(Black, true)
    .castling(Black, false)
    .build()
    .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 48, .. ProptestConfig::default() })]

    #[test]
    fn random_playouts_keep_invariants(choices in prop::collection::vec(any::<u16>(), 1..80)) {
        playout(Position::startpos(), choices)?;
    }

    #[test]
    fn kiwipete_playouts_keep_invariants(choices in prop::collection::vec(any::<u16>(), 1..30)) {
        playout(kiwipete(), choices)?;
    }

    #[test]
    fn promotion_playouts_keep_invariants(choices in prop::collection::vec(any::<u16>(), 1..30)) {
        playout(promotion_heavy(), choices)?;
    }

    #[test]
    fn capture_generation_is_a_subset(choices in prop::collection::vec(any::<u16>(), 1..40)) {
        let mut pos = Position::startpos();
        for choice in choices {
            let legal = pos.legal_moves();
            if legal.is_empty() {
                break;
            }
            let captures = pos.moves(false, true);
            for &m in &captures {
                prop_assert!(m.is_capture());
                prop_assert!(legal.contains(m));
            }
            let capture_count = legal.iter().filter(|m| m.is_capture()).count();
            prop_assert_eq!(captures.len(), capture_count);

            let m = legal[choice as usize % legal.len()];
            prop_assert!(pos.make_move(m));
        }
    }
}

fn play(pos: &mut Position, moves: &[&str]) {
    for uci in moves {
        let m = pos.find_move(uci).unwrap_or_else(|| panic!("{} not legal", uci));
        assert!(pos.make_move(m));
    }
}

#[test]
fn promotions_round_trip() {
    use Color::{Black, White};
    use Piece::*;
    let mut pos = setup(&[
        (King, White, "e1"),
        (Pawn, White, "g7"),
        (King, Black, "e8"),
        (Rook, Black, "h8"),
        (Rook, Black, "a8"),
    ])
    .castling(Black, true)
    .castling(Black, false)
    .build()
    .unwrap();
    let before = pos.clone();

    let promotions: Vec<_> = pos
        .legal_moves()
        .iter()
        .copied()
        .filter(|m| m.promotion_piece().is_some())
        .collect();
    assert_eq!(promotions.len(), 8);

    for m in promotions {
        assert!(pos.make_move(m), "{} rejected", m);
        let target = m.to();
        assert_eq!(pos.piece_at(target), m.promotion_piece());
        assert_eq!(pos.color_at(target), Some(White));
        assert_eq!(pos.piece_at(sq("g7")), None);
        assert_eq!(pos.hash(), pos.compute_hash(), "hash drift after {}", m);
        if m.is_capture() {
            assert_eq!(m.captured_piece(), Some(Rook));
            assert!(!pos.castling().has(Black, true));
        } else {
            assert!(pos.castling().has(Black, true));
        }
        assert!(pos.castling().has(Black, false));

        assert_eq!(pos.unmake_move(), Some(m));
        assert_eq!(pos, before, "state not restored after {}", m);
    }
}

#[test]
fn transpositions_share_a_hash() {
    let mut a = Position::startpos();
    let mut b = Position::startpos();
    play(&mut a, &["g1f3", "g8f6", "b1c3", "b8c6"]);
    play(&mut b, &["b1c3", "b8c6", "g1f3", "g8f6"]);
    assert_eq!(a.hash(), b.hash());
    assert_eq!(a.to_string(), b.to_string());
}

/// A builder reproducing the board, turn, castling rights and clock of `pos`.
fn rebuild(pos: &Position) -> PositionBuilder {
    let mut builder = PositionBuilder::new()
        .side_to_move(pos.side_to_move())
        .halfmove_clock(pos.halfmove_clock());
    for sq in all_squares() {
        if let (Some(piece), Some(color)) = (pos.piece_at(sq), pos.color_at(sq)) {
            builder = builder.piece(piece, color, sq);
        }
    }
    for color in Color::ALL {
        for kingside in [true, false] {
            if pos.castling().has(color, kingside) {
                builder = builder.castling(color, kingside);
            }
        }
    }
    builder
}

#[test]
fn en_passant_state_changes_the_hash() {
    let mut pos = Position::startpos();
    play(&mut pos, &["g1f3", "g8f6", "e2e4"]);
    let e4 = sq("e4");
    assert_eq!(pos.en_passant(), Some(e4));

    let with_en_passant = rebuild(&pos).en_passant(e4).build().unwrap();
    let without_en_passant = rebuild(&pos).build().unwrap();
    assert_eq!(with_en_passant.hash(), pos.hash());
    assert_ne!(without_en_passant.hash(), pos.hash());
}

#[test]
fn castling_rights_change_the_hash() {
    let mut a = Position::startpos();
    let mut b = Position::startpos();
    play(&mut a, &["g1f3", "g8f6", "f3g1", "f6g8"]);
    play(
        &mut b,
        &["g1f3", "g8f6", "h1g1", "f6g8", "g1h1", "b8c6", "f3g1", "c6b8"],
    );
    assert_eq!(snapshot(&a).board, snapshot(&b).board);
    assert_eq!(a.side_to_move(), b.side_to_move());
    assert_ne!(a.castling(), b.castling());
    assert_ne!(a.hash(), b.hash());
    assert_eq!(a.hash(), Position::startpos().hash());
}

#[test]
fn back_rank_mate_has_no_legal_moves() {
    let mut pos = PositionBuilder::new()
        .piece(Piece::King, Color::White, Square::G1)
        .piece(Piece::Pawn, Color::White, sq("f2"))
        .piece(Piece::Pawn, Color::White, sq("g2"))
        .piece(Piece::Pawn, Color::White, sq("h2"))
        .piece(Piece::King, Color::Black, Square::G8)
        .piece(Piece::Rook, Color::Black, sq("d8"))
        .side_to_move(Color::Black)
        .build()
        .unwrap();
    play(&mut pos, &["d8d1"]);
    assert!(pos.is_in_check());
    assert!(pos.legal_moves().is_empty());
    assert_eq!(pos.status(), GameStatus::Checkmate);
}

#[test]
fn insufficient_material() {
    let kings = || {
        PositionBuilder::new()
            .piece(Piece::King, Color::White, Square::E1)
            .piece(Piece::King, Color::Black, Square::E8)
    };

    assert!(kings().build().unwrap().is_insufficient_material());
    assert!(kings()
        .piece(Piece::Knight, Color::Black, sq("g8"))
        .build()
        .unwrap()
        .is_insufficient_material());
    assert!(kings()
        .piece(Piece::Bishop, Color::White, sq("f1"))
        .build()
        .unwrap()
        .is_insufficient_material());
    // f1 and c8 are both light squares.
    assert!(kings()
        .piece(Piece::Bishop, Color::White, sq("f1"))
        .piece(Piece::Bishop, Color::Black, sq("c8"))
        .build()
        .unwrap()
        .is_insufficient_material());
    assert!(!kings()
        .piece(Piece::Bishop, Color::White, sq("f1"))
        .piece(Piece::Bishop, Color::Black, sq("f8"))
        .build()
        .unwrap()
        .is_insufficient_material());
}
