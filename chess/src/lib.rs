//! The `chess` crate implements the rules of chess on bitboards: board representation, attack
//! tables, legal move generation, move application and FEN conversion.
//!
//! Squares are numbered from the top-left corner of a board printed from `White`'s side: `a8` is
//! square 0, `h8` is square 7, `a1` is square 56 and `h1` is square 63.
//!
//! ```rust
//! use chess::Position;
//!
//! let mut pos = Position::new();
//! assert_eq!(pos.legal_moves().len(), 20);
//! ```
//
//  Copyright 2019 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
#![warn(missing_docs, missing_debug_implementations, unused_extern_crates)]
#![warn(clippy::unimplemented, clippy::option_unwrap_used, clippy::result_unwrap_used)]

use std::ops;
use std::fmt;
use std::mem;
use std::str::FromStr;
use std::convert::TryFrom;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Which side a piece or player is on, based on the color of the pieces for that side.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Side {
    White = 0,
    Black = 1,
}

impl Side {
    /// The number of sides
    pub const COUNT: usize = 2;

    /// Both sides, in ordinal order
    pub const ALL: [Side; Side::COUNT] = [Side::White, Side::Black];

    /// Returns the opposite side
    pub fn opposite(self) -> Side {
        !self
    }
}

impl ops::Not for Side {
    type Output = Side;

    /// Returns the opposite side
    ///
    /// # Example
    /// ```
    /// use chess::Side;
    /// assert_eq!(!Side::White, Side::Black);
    /// assert_eq!(!Side::Black, Side::White);
    /// ```
    fn not(self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::White => 'w'.fmt(f),
            Side::Black => 'b'.fmt(f),
        }
    }
}

impl FromStr for Side {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "w" => Ok(Side::White),
            "b" => Ok(Side::Black),
            _   => Err(Error::ParseError),
        }
    }
}

impl Default for Side {
    fn default() -> Self {
        Side::White
    }
}

impl TryFrom<usize> for Side {
    type Error = Error;

    fn try_from(value: usize) -> Result<Self> {
        if value < Self::COUNT {
            unsafe { Ok(mem::transmute::<u8, Side>(value as u8)) }
        } else {
            Err(Error::TryFromIntError)
        }
    }
}

impl From<Side> for usize {
    fn from(value: Side) -> Self {
        value as Self
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// The type of a chess piece, regardless of side
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl PieceKind {
    /// The number of piece kinds
    pub const COUNT: usize = PieceKind::King as usize + 1;

    /// The kinds a pawn may promote to, in the order promotions are generated
    pub const PROMOTIONS: [PieceKind; 4] =
        [PieceKind::Queen, PieceKind::Rook, PieceKind::Bishop, PieceKind::Knight];
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PieceKind::Pawn => "P",
            PieceKind::Knight => "N",
            PieceKind::Bishop => "B",
            PieceKind::Rook => "R",
            PieceKind::Queen => "Q",
            PieceKind::King => "K",
        }.fmt(f)
    }
}

impl FromStr for PieceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "P"|"p" => Ok(PieceKind::Pawn),
            "N"|"n" => Ok(PieceKind::Knight),
            "B"|"b" => Ok(PieceKind::Bishop),
            "R"|"r" => Ok(PieceKind::Rook),
            "Q"|"q" => Ok(PieceKind::Queen),
            "K"|"k" => Ok(PieceKind::King),
            _       => Err(Error::ParseError),
        }
    }
}

impl TryFrom<usize> for PieceKind {
    type Error = Error;

    fn try_from(value: usize) -> Result<Self> {
        if value < Self::COUNT {
            unsafe { Ok(mem::transmute::<u8, PieceKind>(value as u8)) }
        } else {
            Err(Error::TryFromIntError)
        }
    }
}

impl From<PieceKind> for usize {
    fn from(value: PieceKind) -> Self {
        value as Self
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A piece kind together with its side. There are 12 piece classes, with `White`'s pieces at
/// ordinals 0 through 5 and `Black`'s at 6 through 11.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum PieceClass {
    WhitePawn = 0, WhiteKnight = 1, WhiteBishop = 2, WhiteRook = 3, WhiteQueen = 4, WhiteKing = 5,
    BlackPawn = 6, BlackKnight = 7, BlackBishop = 8, BlackRook = 9, BlackQueen = 10, BlackKing = 11,
}

impl PieceClass {
    /// The number of piece classes
    pub const COUNT: usize = PieceClass::BlackKing as usize + 1;

    /// All piece classes, in ordinal order
    pub const ALL: [PieceClass; PieceClass::COUNT] = [
        PieceClass::WhitePawn, PieceClass::WhiteKnight, PieceClass::WhiteBishop,
        PieceClass::WhiteRook, PieceClass::WhiteQueen, PieceClass::WhiteKing,
        PieceClass::BlackPawn, PieceClass::BlackKnight, PieceClass::BlackBishop,
        PieceClass::BlackRook, PieceClass::BlackQueen, PieceClass::BlackKing,
    ];

    /// Returns the piece class of the given side and kind
    pub fn new(side: Side, kind: PieceKind) -> PieceClass {
        PieceClass::try_from(side as usize * PieceKind::COUNT + kind as usize).expect("INFALLIBLE")
    }

    /// Returns the side the piece belongs to
    pub fn side(self) -> Side {
        if (self as usize) < PieceKind::COUNT { Side::White } else { Side::Black }
    }

    /// Returns the kind of piece, regardless of side
    pub fn kind(self) -> PieceKind {
        PieceKind::try_from(self as usize % PieceKind::COUNT).expect("INFALLIBLE")
    }

    /// Returns the six piece classes of `side`, in ordinal order
    pub fn of_side(side: Side) -> &'static [PieceClass] {
        let start = side as usize * PieceKind::COUNT;
        &PieceClass::ALL[start..start + PieceKind::COUNT]
    }

    /// Returns the FEN letter for the piece: upper case for `White`, lower case for `Black`
    pub fn fen_char(self) -> char {
        let c = match self.kind() {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        };

        match self.side() {
            Side::White => c,
            Side::Black => c.to_ascii_lowercase(),
        }
    }

    /// Returns the piece class for a FEN letter
    pub fn from_fen_char(c: char) -> Result<PieceClass> {
        let side = if c.is_ascii_uppercase() { Side::White } else { Side::Black };
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return Err(Error::ParseError),
        };

        Ok(PieceClass::new(side, kind))
    }

    /// Returns the Unicode chess symbol for the piece
    pub fn unicode(self) -> char {
        match self {
            PieceClass::WhitePawn => '♙',
            PieceClass::WhiteKnight => '♘',
            PieceClass::WhiteBishop => '♗',
            PieceClass::WhiteRook => '♖',
            PieceClass::WhiteQueen => '♕',
            PieceClass::WhiteKing => '♔',
            PieceClass::BlackPawn => '♟',
            PieceClass::BlackKnight => '♞',
            PieceClass::BlackBishop => '♝',
            PieceClass::BlackRook => '♜',
            PieceClass::BlackQueen => '♛',
            PieceClass::BlackKing => '♚',
        }
    }
}

impl fmt::Display for PieceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fen_char().fmt(f)
    }
}

impl FromStr for PieceClass {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => PieceClass::from_fen_char(c),
            _ => Err(Error::ParseError),
        }
    }
}

impl TryFrom<usize> for PieceClass {
    type Error = Error;

    fn try_from(value: usize) -> Result<Self> {
        if value < Self::COUNT {
            unsafe { Ok(mem::transmute::<u8, PieceClass>(value as u8)) }
        } else {
            Err(Error::TryFromIntError)
        }
    }
}

impl From<PieceClass> for usize {
    fn from(value: PieceClass) -> Self {
        value as Self
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Vertical column of the board, labeled from left to right from `White`'s perspective as
/// `A` through `H`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum File {
    // discriminants are spelled out so nothing can go wrong when we use transmute later
    A = 0, B = 1, C = 2, D = 3, E = 4, F = 5, G = 6, H = 7,
}

impl File {
    /// The number of files
    pub const COUNT: usize = File::H as usize + 1;
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ((b'a' + *self as u8) as char).fmt(f)
    }
}

impl FromStr for File {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "a"|"A" => Ok(File::A),
            "b"|"B" => Ok(File::B),
            "c"|"C" => Ok(File::C),
            "d"|"D" => Ok(File::D),
            "e"|"E" => Ok(File::E),
            "f"|"F" => Ok(File::F),
            "g"|"G" => Ok(File::G),
            "h"|"H" => Ok(File::H),
            _       => Err(Error::ParseError),
        }
    }
}

impl TryFrom<usize> for File {
    type Error = Error;

    fn try_from(value: usize) -> Result<Self> {
        if value < Self::COUNT {
            unsafe { Ok(mem::transmute::<u8, File>(value as u8)) }
        } else {
            Err(Error::TryFromIntError)
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Horizontal row of the board, labeled from nearest to farthest from `White`'s perspective
/// as `R1` through `R8`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Rank {
    // discriminants are spelled out so nothing can go wrong when we use transmute later
    R1 = 0, R2 = 1, R3 = 2, R4 = 3, R5 = 4, R6 = 5, R7 = 6, R8 = 7,
}

impl Rank {
    /// The number of ranks
    pub const COUNT: usize = Rank::R8 as usize + 1;

    /// Returns the rank where `side`'s king and rooks start
    pub fn back_rank(side: Side) -> Rank {
        match side {
            Side::White => Rank::R1,
            Side::Black => Rank::R8,
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (*self as usize + 1).fmt(f)
    }
}

impl FromStr for Rank {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "1" => Ok(Rank::R1),
            "2" => Ok(Rank::R2),
            "3" => Ok(Rank::R3),
            "4" => Ok(Rank::R4),
            "5" => Ok(Rank::R5),
            "6" => Ok(Rank::R6),
            "7" => Ok(Rank::R7),
            "8" => Ok(Rank::R8),
            _   => Err(Error::ParseError),
        }
    }
}

impl TryFrom<usize> for Rank {
    type Error = Error;

    fn try_from(value: usize) -> Result<Self> {
        if value < Self::COUNT {
            unsafe { Ok(mem::transmute::<u8, Rank>(value as u8)) }
        } else {
            Err(Error::TryFromIntError)
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A specific square on the board.
///
/// Squares are numbered row by row starting from the top-left of a board printed from `White`'s
/// perspective, so the square's file is `index % 8` and its row from the top is `index / 8`.
///
/// ```text
///     a    b    c    d    e    f    g    h
///    ---------------------------------------
/// 8 | 00 | 01 | 02 | 03 | 04 | 05 | 06 | 07 | 8
///    ---------------------------------------
/// 7 | 08 | 09 | 10 | 11 | 12 | 13 | 14 | 15 | 7
///    ---------------------------------------
///                      ...
///    ---------------------------------------
/// 1 | 56 | 57 | 58 | 59 | 60 | 61 | 62 | 63 | 1
///    ---------------------------------------
///     a    b    c    d    e    f    g    h
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Square {
    // discriminants are spelled out so nothing can go wrong when we use transmute later
    A8 = 0o00, B8 = 0o01, C8 = 0o02, D8 = 0o03, E8 = 0o04, F8 = 0o05, G8 = 0o06, H8 = 0o07,
    A7 = 0o10, B7 = 0o11, C7 = 0o12, D7 = 0o13, E7 = 0o14, F7 = 0o15, G7 = 0o16, H7 = 0o17,
    A6 = 0o20, B6 = 0o21, C6 = 0o22, D6 = 0o23, E6 = 0o24, F6 = 0o25, G6 = 0o26, H6 = 0o27,
    A5 = 0o30, B5 = 0o31, C5 = 0o32, D5 = 0o33, E5 = 0o34, F5 = 0o35, G5 = 0o36, H5 = 0o37,
    A4 = 0o40, B4 = 0o41, C4 = 0o42, D4 = 0o43, E4 = 0o44, F4 = 0o45, G4 = 0o46, H4 = 0o47,
    A3 = 0o50, B3 = 0o51, C3 = 0o52, D3 = 0o53, E3 = 0o54, F3 = 0o55, G3 = 0o56, H3 = 0o57,
    A2 = 0o60, B2 = 0o61, C2 = 0o62, D2 = 0o63, E2 = 0o64, F2 = 0o65, G2 = 0o66, H2 = 0o67,
    A1 = 0o70, B1 = 0o71, C1 = 0o72, D1 = 0o73, E1 = 0o74, F1 = 0o75, G1 = 0o76, H1 = 0o77,
}

impl Square {
    /// The number of squares
    pub const COUNT: usize = Square::H1 as usize + 1;

    /// Returns a square from its file and rank
    pub fn from_coord(file: File, rank: Rank) -> Square {
        let row = Rank::COUNT - 1 - rank as usize;
        Square::try_from(row * File::COUNT + file as usize).expect("INFALLIBLE")
    }

    /// Returns the square's index, from 0 (`a8`) to 63 (`h1`)
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns the square's file
    pub fn file(self) -> File {
        File::try_from(self as usize % File::COUNT).expect("INFALLIBLE")
    }

    /// Returns the square's rank
    pub fn rank(self) -> Rank {
        Rank::try_from(Rank::COUNT - 1 - self as usize / File::COUNT).expect("INFALLIBLE")
    }

    /// Returns the row of the square counted from the top of the board, so `a8` is in row 0
    pub fn row(self) -> usize {
        self as usize / File::COUNT
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (self.file().to_string() + &self.rank().to_string()).fmt(f)
    }
}

impl FromStr for Square {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let c: Vec<_> = s.chars().collect();
        if c.len() == 2 {
            Ok(Square::from_coord(c[0].to_string().parse()?, c[1].to_string().parse()?))
        } else {
            Err(Error::ParseError)
        }
    }
}

impl TryFrom<usize> for Square {
    type Error = Error;

    fn try_from(value: usize) -> Result<Self> {
        if value < Self::COUNT {
            unsafe { Ok(mem::transmute::<u8, Square>(value as u8)) }
        } else {
            Err(Error::InvalidSquare)
        }
    }
}

impl From<Square> for usize {
    fn from(value: Square) -> Self {
        value as Self
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
pub mod bitboard;
pub mod error;
pub mod variations;
mod castling;
mod moves;
mod position;

pub use bitboard::{AttackTables, Bitboard};
pub use castling::CastlingRights;
pub use error::{Error, Result};
pub use moves::{Move, MoveFlag};
pub use position::{Diagram, Position, Snapshot};



#[cfg(test)]
mod square_tests {
    use std::convert::TryFrom;
    use super::*;

    #[test]
    fn indices_run_from_a8_to_h1() {
        assert_eq!(Square::A8 as usize, 0);
        assert_eq!(Square::H8 as usize, 7);
        assert_eq!(Square::A7 as usize, 8);
        assert_eq!(Square::E4 as usize, 36);
        assert_eq!(Square::A1 as usize, 56);
        assert_eq!(Square::H1 as usize, 63);
    }

    #[test]
    fn file_and_row_follow_the_index() {
        for i in 0..Square::COUNT {
            let sq = Square::try_from(i).unwrap();
            assert_eq!(sq.file() as usize, i % 8);
            assert_eq!(sq.row(), i / 8);
            assert_eq!(sq.rank() as usize, 7 - i / 8);
            assert_eq!(Square::from_coord(sq.file(), sq.rank()), sq);
        }
    }

    #[test]
    fn from_coord_matches_variant_names() {
        assert_eq!(Square::from_coord(File::A, Rank::R8), Square::A8);
        assert_eq!(Square::from_coord(File::H, Rank::R8), Square::H8);
        assert_eq!(Square::from_coord(File::E, Rank::R2), Square::E2);
        assert_eq!(Square::from_coord(File::A, Rank::R1), Square::A1);
        assert_eq!(Square::from_coord(File::H, Rank::R1), Square::H1);
    }

    #[test]
    fn display_and_fromstr_traits_match_file_and_rank() {
        assert_eq!(Square::A8.to_string(), "a8");
        assert_eq!(Square::H1.to_string(), "h1");
        assert_eq!(Square::E4.to_string(), "e4");
        for i in 0..Square::COUNT {
            let sq = Square::try_from(i).unwrap();
            assert_eq!(sq.to_string().parse::<Square>().unwrap(), sq);
        }
    }

    #[test]
    fn fromstr_trait_produces_errors_when_it_should() {
        assert!("a".parse::<Square>().is_err());
        assert!("1".parse::<Square>().is_err());
        assert!("ax".parse::<Square>().is_err());
        assert!("x1".parse::<Square>().is_err());
        assert!("a9".parse::<Square>().is_err());
        assert!("a1x".parse::<Square>().is_err());
    }

    #[test]
    fn out_of_bound_usize_conversion_is_an_error() {
        assert_eq!(Square::try_from(Square::COUNT), Err(Error::InvalidSquare));
        assert_eq!(Square::try_from(1000), Err(Error::InvalidSquare));
    }
}
