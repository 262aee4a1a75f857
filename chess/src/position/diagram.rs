//! Text diagrams of a position
//
//  Copyright 2019 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::convert::TryFrom;
use std::fmt;
use super::*;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A printable diagram of a position, created by `Position::diagram()`
///
/// ```rust
/// use chess::{Position, Side};
///
/// let pos = Position::new();
/// let text = pos.diagram().unicode(false).fill_empty(true).to_string();
/// assert!(text.contains("8  | r n b q k b n r"));
/// assert!(text.contains("4  | . . . . . . . ."));
///
/// let text = pos.diagram().orientation(Side::Black).to_string();
/// assert!(text.ends_with("     h g f e d c b a\n"));
/// ```
#[derive(Debug, Copy, Clone)]
pub struct Diagram<'a> {
    pos: &'a Position,
    orientation: Side,
    unicode: bool,
    fill_empty: bool,
}

impl<'a> Diagram<'a> {
    /// Sets which side is shown at the bottom of the board
    pub fn orientation(mut self, side: Side) -> Self {
        self.orientation = side;
        self
    }

    /// Selects Unicode chess symbols (the default) or FEN letters. Diagrams using letters also
    /// show whose turn it is.
    pub fn unicode(mut self, unicode: bool) -> Self {
        self.unicode = unicode;
        self
    }

    /// Shows a `.` on empty squares instead of a blank
    pub fn fill_empty(mut self, fill_empty: bool) -> Self {
        self.fill_empty = fill_empty;
        self
    }
}

impl Position {
    /// Returns a diagram of the position, shown from `White`'s side with Unicode symbols
    pub fn diagram(&self) -> Diagram<'_> {
        Diagram { pos: self, orientation: Side::White, unicode: true, fill_empty: false }
    }
}

impl<'a> fmt::Display for Diagram<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let white = self.orientation == Side::White;

        writeln!(f)?;
        if !self.unicode {
            let turn = match self.pos.turn() {
                Side::White => "white",
                Side::Black => "black",
            };
            writeln!(f, "      Turn: {}", turn)?;
        }

        for row in 0..Rank::COUNT {
            let rank = if white { Rank::COUNT - row } else { row + 1 };
            write!(f, "{}  |", rank)?;

            for file in 0..File::COUNT {
                let index = row * File::COUNT + file;
                let index = if white { index } else { Square::COUNT - 1 - index };
                let sq = Square::try_from(index).expect("INFALLIBLE");

                let c = match self.pos.piece_at(sq) {
                    Some(piece) if self.unicode => piece.unicode(),
                    Some(piece) => piece.fen_char(),
                    None if self.fill_empty => '.',
                    None => ' ',
                };
                write!(f, " {}", c)?;
            }
            writeln!(f)?;
        }

        writeln!(f, "   ------------------")?;
        if white {
            writeln!(f, "     a b c d e f g h")
        } else {
            writeln!(f, "     h g f e d c b a")
        }
    }
}
