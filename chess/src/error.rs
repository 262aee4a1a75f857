//! Defines the error types needed by the chess crate
//
//  Copyright 2019 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fmt;
use crate::{PieceKind, Square};

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Error type used by methods in the `chess` crate
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Error {
    /// Cannot parse string
    ParseError,
    /// Failed to convert an integer to an another type
    TryFromIntError,
    /// Square index outside of `0..64`
    InvalidSquare,
    /// Move applied for the side which is not to move
    IllegalMove,
    /// Two occupancies with different attacks share a slot in a magic attack table
    MagicCollision {
        /// The square whose table has the collision
        square: Square,
        /// `Bishop` or `Rook`
        piece: PieceKind,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Error::*;

        match self {
            ParseError => "cannot parse string".fmt(f),
            TryFromIntError => "integer out of range".fmt(f),
            InvalidSquare => "square index out of range".fmt(f),
            IllegalMove => "piece does not belong to the side to move".fmt(f),
            MagicCollision { square, piece } => {
                write!(f, "magic index collision in {} table for {}", piece, square)
            },
        }
    }
}

impl std::error::Error for Error { }

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Result type used by methods in the `chess` crate
pub type Result<T> = std::result::Result<T, Error>;
