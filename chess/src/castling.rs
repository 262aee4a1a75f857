//! Contains the `CastlingRights` set
//
//  Copyright 2019 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fmt;
use std::ops;
use std::str::FromStr;
use super::*;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// The set of castling moves which are still available to each side
///
/// Rights only ever get removed during play: moving the king removes both of its side's rights,
/// and moving or capturing a rook on its original corner removes the right for that corner.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    /// No castling rights
    pub const NONE: CastlingRights = CastlingRights(0);
    /// `White` may castle on the king side
    pub const WHITE_KING_SIDE: CastlingRights = CastlingRights(0x1);
    /// `White` may castle on the queen side
    pub const WHITE_QUEEN_SIDE: CastlingRights = CastlingRights(0x2);
    /// `Black` may castle on the king side
    pub const BLACK_KING_SIDE: CastlingRights = CastlingRights(0x4);
    /// `Black` may castle on the queen side
    pub const BLACK_QUEEN_SIDE: CastlingRights = CastlingRights(0x8);
    /// All four castling rights
    pub const ALL: CastlingRights = CastlingRights(0xf);

    /// Returns both rights belonging to `side`
    pub fn for_side(side: Side) -> CastlingRights {
        match side {
            Side::White => Self::WHITE_KING_SIDE | Self::WHITE_QUEEN_SIDE,
            Side::Black => Self::BLACK_KING_SIDE | Self::BLACK_QUEEN_SIDE,
        }
    }

    /// Returns the king side right of `side`
    pub fn king_side(side: Side) -> CastlingRights {
        match side {
            Side::White => Self::WHITE_KING_SIDE,
            Side::Black => Self::BLACK_KING_SIDE,
        }
    }

    /// Returns the queen side right of `side`
    pub fn queen_side(side: Side) -> CastlingRights {
        match side {
            Side::White => Self::WHITE_QUEEN_SIDE,
            Side::Black => Self::BLACK_QUEEN_SIDE,
        }
    }

    /// Returns the right that is lost when the rook on `sq` moves or is captured, if `sq` is one
    /// of the four corners
    pub fn for_rook_square(sq: Square) -> CastlingRights {
        match sq {
            Square::H1 => Self::WHITE_KING_SIDE,
            Square::A1 => Self::WHITE_QUEEN_SIDE,
            Square::H8 => Self::BLACK_KING_SIDE,
            Square::A8 => Self::BLACK_QUEEN_SIDE,
            _ => Self::NONE,
        }
    }

    /// Returns the raw 4-bit value
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Returns `true` if there are no rights left
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if all of the rights in `other` are present
    pub fn contains(self, other: CastlingRights) -> bool {
        self.0 & other.0 == other.0
    }

    /// Adds the rights in `other`
    pub fn insert(&mut self, other: CastlingRights) {
        self.0 |= other.0;
    }

    /// Removes the rights in `other`
    pub fn remove(&mut self, other: CastlingRights) {
        self.0 &= !other.0;
    }
}

impl ops::BitOr for CastlingRights {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        CastlingRights(self.0 | rhs.0)
    }
}

impl fmt::Display for CastlingRights {
    /// Writes the rights as they appear in FEN: a combination of "KQkq", or "-"
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = String::new();

        for &(right, c) in &[
            (Self::WHITE_KING_SIDE, 'K'),
            (Self::WHITE_QUEEN_SIDE, 'Q'),
            (Self::BLACK_KING_SIDE, 'k'),
            (Self::BLACK_QUEEN_SIDE, 'q'),
        ] {
            if self.contains(right) {
                s.push(c);
            }
        }
        if s.is_empty() {
            s.push('-');
        }

        s.fmt(f)
    }
}

impl FromStr for CastlingRights {
    type Err = Error;

    /// Parses the castling field of a FEN string
    fn from_str(s: &str) -> Result<Self> {
        if s == "-" {
            return Ok(Self::NONE);
        }
        if s.is_empty() {
            return Err(Error::ParseError);
        }

        let mut rights = Self::NONE;
        for c in s.chars() {
            match c {
                'K' => rights.insert(Self::WHITE_KING_SIDE),
                'Q' => rights.insert(Self::WHITE_QUEEN_SIDE),
                'k' => rights.insert(Self::BLACK_KING_SIDE),
                'q' => rights.insert(Self::BLACK_QUEEN_SIDE),
                _ => return Err(Error::ParseError),
            }
        }

        Ok(rights)
    }
}
