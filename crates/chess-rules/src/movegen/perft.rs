//! Perft (performance test) for move generator validation.
//!
//! Perft counts the number of leaf nodes at a given depth, which can be
//! compared against known-correct values to validate the move generator and
//! the make/unmake pair together.

use crate::Position;
use tracing::debug;

/// Counts the number of leaf nodes at the given depth.
///
/// Every pseudo-legal move is tried with [`Position::make_move`]; moves it
/// rejects are not counted. The position is restored before returning.
pub fn perft(position: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = position.pseudo_legal_moves(false);
    let mut nodes = 0u64;
    for &m in &moves {
        if position.make_move(m) {
            nodes += perft(position, depth - 1);
            position.unmake_move();
        }
    }
    nodes
}

/// Perft with divide - node count below each legal root move.
///
/// Useful for debugging to identify which moves have incorrect counts.
/// Results are sorted by the move's UCI text. Depth 0 has no root moves to
/// break down, so the result is empty.
pub fn perft_divide(position: &mut Position, depth: u32) -> Vec<(String, u64)> {
    if depth == 0 {
        return Vec::new();
    }

    let moves = position.pseudo_legal_moves(false);
    let mut results = Vec::with_capacity(moves.len());

    for &m in &moves {
        if !position.make_move(m) {
            continue;
        }
        let nodes = if depth > 1 {
            perft(position, depth - 1)
        } else {
            1
        };
        position.unmake_move();
        debug!(mv = %m.to_uci(), nodes, "perft divide");
        results.push((m.to_uci(), nodes));
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}
