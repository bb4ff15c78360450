use std::time::Instant;

use crate::position::Position;

pub mod board;
pub mod castling;
pub mod driver;
pub mod error;
pub mod evaluation;
pub mod history;
pub mod move_generator;
pub mod movelist;
pub mod piece;
pub mod position;
pub mod r#move;
pub mod search;
pub mod square;

/// Counts the leaf nodes of the legal move tree `depth` plies below `position`
pub fn perft(position: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = position.legal_moves();
    if depth == 1 {
        return moves.len() as u64;
    }
    let mut nodes = 0u64;
    for mv in &moves {
        position.apply_move(*mv);
        nodes += perft(position, depth - 1);
        position.undo_move();
    }
    nodes
}

/// Prints the perft node counts of every depth up to `depth`, with timings
pub fn perft_report(position: &mut Position, depth: u32) {
    println!("{}\n", position);
    println!("depth nodes\n--------");
    for d in 0..depth + 1 {
        let start = Instant::now();
        let nodes = perft(position, d);
        let elapsed = start.elapsed();
        println!(
            "{}     {} ({}s, {} nps)",
            d,
            nodes,
            elapsed.as_secs_f32(),
            (nodes as f32 / elapsed.as_secs_f32().max(f32::EPSILON)) as u64
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perft_counts_and_restores() {
        let mut position = Position::new();
        assert_eq!(perft(&mut position, 0), 1);
        assert_eq!(perft(&mut position, 1), 20);
        assert_eq!(perft(&mut position, 3), 8902);
        assert_eq!(position.history_len(), 0);
        assert_eq!(position.board(), Position::new().board());
    }
}
