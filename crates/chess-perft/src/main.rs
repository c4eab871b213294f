//! Perft harness - counts move-tree leaves to validate move generation.
//!
//! Optionally plays a list of UCI moves from the starting position first and
//! can break the count down per root move.

use std::time::{Duration, Instant};

use anyhow::Context;
use chess_rules::{perft, perft_divide, Position};
use clap::Parser;

/// Counts leaf nodes of the move tree from the starting position.
#[derive(Parser)]
#[command(name = "chess-perft")]
#[command(about = "Counts move-tree leaf nodes to validate move generation")]
struct Args {
    /// Search depth in plies
    #[arg(short, long, default_value = "4")]
    depth: u32,

    /// Print the node count below each root move
    #[arg(long)]
    divide: bool,

    /// Moves to play before counting, in UCI notation (e.g. e2e4,e7e5)
    #[arg(long, value_delimiter = ',')]
    moves: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    tracing::info!("Depth: {}", args.depth);
    if !args.moves.is_empty() {
        tracing::info!("Moves: {}", args.moves.join(" "));
    }

    let mut position = Position::startpos();
    for uci in &args.moves {
        let m = position
            .find_move(uci)
            .with_context(|| format!("move {} is not legal after {}", uci, played(&position)))?;
        anyhow::ensure!(position.make_move(m), "move {} was rejected", uci);
    }
    println!("{}\n", position);

    let start = Instant::now();
    let nodes = count_nodes(&mut position, args.depth, args.divide);
    let elapsed = start.elapsed();

    tracing::info!("Finished in {:?}", elapsed);
    println!("Nodes:  {}", nodes);
    println!("Time:   {:.3}s", elapsed.as_secs_f64());
    println!("Speed:  {} nodes/s", nodes_per_second(nodes, elapsed));
    println!("Status: {}", position.status());

    Ok(())
}

/// Runs perft, printing the per-move breakdown first when `divide` is set.
fn count_nodes(position: &mut Position, depth: u32, divide: bool) -> u64 {
    if !divide || depth == 0 {
        return perft(position, depth);
    }
    let results = perft_divide(position, depth);
    for (mv, count) in &results {
        println!("{}: {}", mv, count);
    }
    println!();
    results.iter().map(|(_, count)| count).sum()
}

/// Describes the moves played so far for error messages.
fn played(position: &Position) -> String {
    match position.made_move_count() {
        0 => "the starting position".to_string(),
        1 => "1 move".to_string(),
        n => format!("{} moves", n),
    }
}

fn nodes_per_second(nodes: u64, elapsed: Duration) -> u64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        (nodes as f64 / secs) as u64
    } else {
        nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated_moves() {
        let args = Args::parse_from(["chess-perft", "--depth", "2", "--moves", "e2e4,e7e5"]);
        assert_eq!(args.depth, 2);
        assert!(!args.divide);
        assert_eq!(args.moves, vec!["e2e4", "e7e5"]);
    }

    #[test]
    fn defaults() {
        let args = Args::parse_from(["chess-perft"]);
        assert_eq!(args.depth, 4);
        assert!(args.moves.is_empty());
    }

    #[test]
    fn speed() {
        assert_eq!(nodes_per_second(1000, Duration::from_millis(500)), 2000);
        assert_eq!(nodes_per_second(20, Duration::ZERO), 20);
    }

    #[test]
    fn played_description() {
        let mut position = Position::startpos();
        assert_eq!(played(&position), "the starting position");
        let m = position.find_move("d2d4").unwrap();
        assert!(position.make_move(m));
        assert_eq!(played(&position), "1 move");
    }

    #[test]
    fn divide_agrees_with_plain_count() {
        let mut position = Position::startpos();
        for depth in 0..=2 {
            assert_eq!(
                count_nodes(&mut position, depth, true),
                count_nodes(&mut position, depth, false),
                "depth {}",
                depth
            );
        }
        assert_eq!(count_nodes(&mut position, 0, true), 1);
    }
}
