//! Module for counting and printing the number of variations from a given position
//
//  Copyright 2019 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use log::trace;
use crate::*;

/// Print the number of variations of the given `depth` for each legal move from `pos`
pub fn print(pos: &Position, depth: usize) -> usize {
    if depth < 1 {
        return 1;
    }

    let mut total = 0;

    for (m, pos) in successors(pos) {
        let count = count(&pos, depth - 1);
        total += count;
        println!("\t{:7}\t{:12}\t{}", m, count, pos);
    }

    total
}

/// Count the number of variations of the given `depth` from `pos`
pub fn count(pos: &Position, depth: usize) -> usize {
    if depth < 1 {
        return 1;
    }

    let moves = pos.generate_legal_moves();
    if depth == 1 {
        return moves.len();
    }

    let mut work = pos.clone();
    let snapshot = work.snapshot();
    let mut total = 0;

    for m in moves {
        if work.apply_move(&m, true).is_ok() {
            total += count(&work, depth - 1);
        }
        work.revert(&snapshot);
    }
    trace!("{} variations of depth {} from {}", total, depth, pos);

    total
}

/// Returns each legal move from `pos` together with the position it leads to
pub fn successors(pos: &Position) -> Vec<(Move, Position)> {
    pos.generate_legal_moves()
        .into_iter()
        .filter_map(|m| {
            let mut next = pos.clone();
            next.apply_move(&m, true).ok().map(|_| (m, next))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_zero_is_one_variation() {
        assert_eq!(count(&Position::new(), 0), 1);
        assert_eq!(print(&Position::new(), 0), 1);
    }

    #[test]
    fn start_position_counts() {
        let pos = Position::new();
        assert_eq!(count(&pos, 1), 20);
        assert_eq!(count(&pos, 2), 400);
        assert_eq!(print(&pos, 2), 400);
    }

    #[test]
    fn successors_follow_legal_moves() {
        let pos = Position::new();
        let next = successors(&pos);
        assert_eq!(next.len(), 20);
        assert!(next.iter().all(|(_, p)| p.turn() == Side::Black));
    }

    #[test]
    fn checkmate_has_no_variations() {
        let pos: Position = "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3"
            .parse().unwrap();
        assert_eq!(count(&pos, 1), 0);
        assert_eq!(count(&pos, 3), 0);
    }
}
