//! Coordinate move notation, such as `e2e4` or `e7e8q`
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use chess::{Move, PieceKind, Position, Square};

lazy_static! {
    static ref COORDINATE_MOVE: Regex =
        Regex::new(r"^([a-h][1-8])([a-h][1-8])([qrbn])?$").expect("INFALLIBLE");
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// The parts of a move written in coordinate notation
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Coordinates {
    /// The square the piece moves from
    pub from: Square,
    /// The square the piece moves to
    pub to: Square,
    /// The kind of piece a pawn promotes to
    pub promotion: Option<PieceKind>,
}

/// Splits `s` into its squares and promotion, or returns `None` if `s` is not a coordinate move
pub fn parse(s: &str) -> Option<Coordinates> {
    let caps = COORDINATE_MOVE.captures(s.trim())?;
    let from = caps[1].parse().ok()?;
    let to = caps[2].parse().ok()?;
    let promotion = match caps.get(3) {
        Some(m) => Some(m.as_str().parse().ok()?),
        None => None,
    };

    Some(Coordinates { from, to, promotion })
}

/// Finds the legal move in `pos` written as `s`
///
/// Returns `None` if `s` is malformed or names no legal move. A promotion must give the piece it
/// promotes to.
///
/// ```rust
/// use chess::Position;
/// use bitchess::notation::find_move;
///
/// let mut pos = Position::new();
/// let m = find_move(&mut pos, "g1f3").unwrap();
/// assert_eq!(m.to_string(), "g1f3");
/// assert!(find_move(&mut pos, "g1g3").is_none());
/// ```
pub fn find_move(pos: &mut Position, s: &str) -> Option<Move> {
    let coords = parse(s)?;
    let found = pos.legal_moves()
        .iter()
        .find(|m| {
            m.from == coords.from
                && m.to == coords.to
                && m.promotion.map(|p| p.kind()) == coords.promotion
        })
        .copied();

    if found.is_none() {
        debug!("{}: no legal move in {}", s, pos);
    }
    found
}

/// Plays each move in `moves` from `pos` in turn, stopping at the first one that is not legal
///
/// On failure returns the text of the offending move.
pub fn play<'a, I>(pos: &mut Position, moves: I) -> Result<(), &'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    for s in moves {
        let m = find_move(pos, s).ok_or(s)?;
        pos.apply_move(&m, true).map_err(|_| s)?;
    }
    Ok(())
}
