//! Provides a representation of sets of squares, and the attack tables built from them
//
//  Copyright 2019 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
//! # Moves and Attacks
//! Bitboards are useful for quickly computing the moves or attacks available to a piece based on
//! its location on the board. In addition to the [`Bitboard`](struct.Bitboard.html) type, the
//! `bitboard` module provides [`AttackTables`](struct.AttackTables.html), which hold precomputed
//! attacks for every piece kind.
//!
//! ## Direct attacks (Pawns, Knights and Kings)
//! Pawns, knights and kings move directly to their destinations without passing through any
//! other squares, so their attacks depend only on the square they stand on. For example, the
//! squares attacked by a knight on h1 can be computed as follows:
//!
//! ```rust
//! use chess::Square;
//! use chess::bitboard::AttackTables;
//!
//! let mut attacks = AttackTables::shared().knight_attacks(Square::H1);
//! assert_eq!(attacks.pop(), Some(Square::G3));
//! assert_eq!(attacks.pop(), Some(Square::F2));
//! assert_eq!(attacks.pop(), None);
//! ```
//!
//! ## Sliding Attacks (Bishops, Rooks and Queens)
//! Moves by sliding pieces can be blocked by pieces in the path. For this reason, the lookups for
//! sliding attacks require an additional argument: a `Bitboard` of occupied squares. The lookup
//! is a single multiplication by a per-square "magic" number followed by a table access.
//!
//! ```rust
//! use chess::Square;
//! use chess::bitboard::{AttackTables, Bitboard};
//!
//! let occ = Bitboard::from(Square::A2) | Square::C1.into();
//! let mut attacks = AttackTables::shared().rook_attacks(Square::A1, occ);
//! assert_eq!(attacks.pop(), Some(Square::A2));
//! assert_eq!(attacks.pop(), Some(Square::B1));
//! assert_eq!(attacks.pop(), Some(Square::C1));
//! assert_eq!(attacks.pop(), None);
//! ```
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::convert::{TryFrom, TryInto};
use std::iter::FusedIterator;
use std::iter::{FromIterator, Extend};
use std::ops;
use std::fmt;
use super::*;

mod attacks;
mod magic;
pub use attacks::*;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A set of squares with each bit representing one square
///
/// A `Bitboard` is, essentially, a set of [`Square`](../enum.Square.html)s stored in a 64-bit
/// integer. Bit `n` is set when the square with index `n` is present. The diagram below shows the
/// layout of the bits.
///
/// ```text
///     a    b    c    d    e    f    g    h
///    ---------------------------------------
/// 8 | 00 | 01 | 02 | 03 | 04 | 05 | 06 | 07 | 8
///    ---------------------------------------
/// 7 | 08 | 09 | 10 | 11 | 12 | 13 | 14 | 15 | 7
///    ---------------------------------------
/// 6 | 16 | 17 | 18 | 19 | 20 | 21 | 22 | 23 | 6
///    ---------------------------------------
/// 5 | 24 | 25 | 26 | 27 | 28 | 29 | 30 | 31 | 5
///    ---------------------------------------
/// 4 | 32 | 33 | 34 | 35 | 36 | 37 | 38 | 39 | 4
///    ---------------------------------------
/// 3 | 40 | 41 | 42 | 43 | 44 | 45 | 46 | 47 | 3
///    ---------------------------------------
/// 2 | 48 | 49 | 50 | 51 | 52 | 53 | 54 | 55 | 2
///    ---------------------------------------
/// 1 | 56 | 57 | 58 | 59 | 60 | 61 | 62 | 63 | 1
///    ---------------------------------------
///     a    b    c    d    e    f    g    h
/// ```
///
/// `Bitboard` implements all the bit-wise logic operators: `|`, `&`, `^`, `!`, `|=`, `&=`, and
/// `^=`, as well as the logical shifts `<<` and `>>`. Shifting by 64 or more bits results in an
/// empty set; bits are never wrapped around. It also has methods that are typical for sets and
/// collections, such as `insert`, `remove`, `len`, and `contains`. Since it's only a 64-bit value,
/// it implements `Copy`, and there's no need for the borrowing iterator methods `iter` and
/// `iter_mut`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Bitboard(u64);

impl Bitboard {
    /// The empty set
    pub const EMPTY: Bitboard = Bitboard(0);
    /// Every square on the board
    pub const FULL: Bitboard = Bitboard(0xffff_ffff_ffff_ffff);
    /// The light squares, including a8 and h1
    pub const LIGHT_SQUARES: Bitboard = Bitboard(0xaa55_aa55_aa55_aa55);
    /// The dark squares, including a1 and h8
    pub const DARK_SQUARES: Bitboard = Bitboard(0x55aa_55aa_55aa_55aa);
    /// The long diagonal from a8 to h1
    pub const DIAGONAL: Bitboard = Bitboard(0x8040_2010_0804_0201);
    /// The long diagonal from h8 to a1
    pub const ANTIDIAGONAL: Bitboard = Bitboard(0x0102_0408_1020_4080);
    /// The four corner squares
    pub const CORNERS: Bitboard = Bitboard(0x8100_0000_0000_0081);
    /// The four center squares: d4, e4, d5 and e5
    pub const CENTER: Bitboard = Bitboard(0x0000_0018_1800_0000);
    /// The first and eighth ranks
    pub const BACK_RANKS: Bitboard = Bitboard(0xff00_0000_0000_00ff);
    /// Every square except the a-file
    pub const NOT_A_FILE: Bitboard = Bitboard(0xfefe_fefe_fefe_fefe);
    /// Every square except the a-file and the b-file
    pub const NOT_AB_FILE: Bitboard = Bitboard(0xfcfc_fcfc_fcfc_fcfc);
    /// Every square except the h-file
    pub const NOT_H_FILE: Bitboard = Bitboard(0x7f7f_7f7f_7f7f_7f7f);
    /// Every square except the g-file and the h-file
    pub const NOT_GH_FILE: Bitboard = Bitboard(0x3f3f_3f3f_3f3f_3f3f);

    /// Creates a new, empty bitboard
    pub fn new() -> Bitboard {
        Default::default()
    }

    /// Returns the raw 64-bit value
    pub fn value(self) -> u64 {
        self.0
    }

    /// Returns the number of squares in the bitboard
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Returns `true` if the bitboard is empty
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the bitboard contains any square at all
    pub fn any(self) -> bool {
        self.0 != 0
    }

    /// Returns `true` if the bitboard contains `sq`
    pub fn contains(self, sq: Square) -> bool {
        !(self & sq.into()).is_empty()
    }

    /// Returns `true` if `self` intersects `other`
    pub fn intersects(self, other: Bitboard) -> bool {
        !(self & other).is_empty()
    }

    /// Returns `true` if `self` does not intersect `other`
    pub fn is_disjoint(self, other: Bitboard) -> bool {
        (self & other).is_empty()
    }

    /// Returns the squares in `self` which are not in `other`
    pub fn difference(self, other: Bitboard) -> Bitboard {
        self & !other
    }

    /// Returns a copy of the bitboard with `sq` added
    pub fn with(self, sq: Square) -> Bitboard {
        self | sq.into()
    }

    /// Returns a copy of the bitboard with `sq` removed
    pub fn without(self, sq: Square) -> Bitboard {
        self & !Bitboard::from(sq)
    }

    /// Adds a square to the bitboard if it is not already present
    pub fn insert(&mut self, sq: Square) {
        *self |= sq.into();
    }

    /// Removes a square from the bitboard if it is present
    pub fn remove(&mut self, sq: Square) {
        *self &= !Bitboard::from(sq);
    }

    /// Toggles a square in the bitboard
    pub fn toggle(&mut self, sq: Square) {
        *self ^= sq.into();
    }

    /// Removes the square with the lowest index from the bitboard and returns it
    pub fn pop(&mut self) -> Option<Square> {
        let sq = self.peek()?;
        // clear the least significant bit
        self.0 &= self.0 - 1;

        Some(sq)
    }

    /// Returns the square that would be removed by a pop command
    pub fn peek(self) -> Option<Square> {
        if self.0 != 0 {
            // get the least significant bit
            Some((self.0.trailing_zeros() as usize).try_into().expect("INFALLIBLE"))
        } else {
            None
        }
    }

    /// Returns a bitboard containing only the square with the lowest index, or an empty bitboard
    /// if `self` is empty
    pub fn isolate_lowest(self) -> Bitboard {
        Bitboard(self.0 & self.0.wrapping_neg())
    }

    /// Returns a bitboard with all squares shifted by `x` files toward the h-file and `y` ranks
    /// toward the eighth rank. Negative values shift the other way.
    ///
    /// Squares shifted off the board are dropped: neither files nor ranks wrap.
    ///
    /// ```rust
    /// # use chess::Square;
    /// # use chess::bitboard::Bitboard;
    /// #
    /// assert_eq!(Bitboard::from(Square::E2).shift_xy(0, 2), Bitboard::from(Square::E4));
    /// assert_eq!(Bitboard::from(Square::B1).shift_xy(-1, 2), Bitboard::from(Square::A3));
    /// assert!(Bitboard::from(Square::H4).shift_xy(1, 0).is_empty());
    /// assert!(Bitboard::from(Square::A8).shift_xy(0, 1).is_empty());
    /// ```
    pub fn shift_xy(self, x: i8, y: i8) -> Bitboard {
        let bits = i32::from(x) - i32::from(y) * File::COUNT as i32;

        let shifted = if bits >= 0 {
            self << bits as u32
        } else {
            self >> (-bits) as u32
        };

        // drop squares that wrapped around to the other side of the board
        let mut mask = Bitboard::FULL;
        for f in 0..File::COUNT as i8 {
            let came_from = f - x;
            if came_from < 0 || came_from >= File::COUNT as i8 {
                mask &= !Bitboard::from(File::try_from(f as usize).expect("INFALLIBLE"));
            }
        }

        shifted & mask
    }

    /// Renders the bitboard as an 8x8 grid of `1`s and `0`s, with rank 8 at the top
    pub fn diagram(self) -> String {
        let mut s = String::new();

        for row in 0..Rank::COUNT {
            s += &format!("{}  | ", Rank::COUNT - row);
            for file in 0..File::COUNT {
                let bit = (self.0 >> (row * File::COUNT + file)) & 1;
                s += &format!("{} ", bit);
            }
            s += "\n";
        }
        s += "   ------------------\n";
        s += "     a b c d e f g h\n";

        s
    }
}

impl ops::Not for Bitboard {
    type Output = Self;

    fn not(self) -> Self::Output {
        Bitboard(!self.0)
    }
}

impl ops::BitAnd for Bitboard {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 & rhs.0)
    }
}

impl ops::BitAndAssign for Bitboard {
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0
    }
}

impl ops::BitOr for Bitboard {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 | rhs.0)
    }
}

impl ops::BitOrAssign for Bitboard {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0
    }
}

impl ops::BitXor for Bitboard {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 ^ rhs.0)
    }
}

impl ops::BitXorAssign for Bitboard {
    fn bitxor_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0
    }
}

impl ops::Shl<u32> for Bitboard {
    type Output = Self;

    /// Logical left shift toward higher square indices. Overflow is discarded.
    fn shl(self, rhs: u32) -> Self::Output {
        Bitboard(self.0.checked_shl(rhs).unwrap_or(0))
    }
}

impl ops::Shr<u32> for Bitboard {
    type Output = Self;

    /// Logical right shift toward lower square indices. Overflow is discarded.
    fn shr(self, rhs: u32) -> Self::Output {
        Bitboard(self.0.checked_shr(rhs).unwrap_or(0))
    }
}

impl fmt::Display for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl fmt::UpperHex for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.0, f)
    }
}

impl fmt::LowerHex for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl fmt::Binary for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Binary::fmt(&self.0, f)
    }
}

impl From<u64> for Bitboard {
    fn from(val: u64) -> Bitboard {
        Bitboard(val)
    }
}

impl From<Bitboard> for u64 {
    fn from(bd: Bitboard) -> u64 {
        bd.0
    }
}

impl From<Square> for Bitboard {
    fn from(sq: Square) -> Bitboard {
        Bitboard(1 << sq as u64)
    }
}

impl From<File> for Bitboard {
    fn from(f: File) -> Bitboard {
        Bitboard(0x0101_0101_0101_0101 << f as u64)
    }
}

impl From<Rank> for Bitboard {
    fn from(r: Rank) -> Bitboard {
        Bitboard(0x0000_0000_0000_00ff << (8 * (Rank::COUNT - 1 - r as usize) as u64))
    }
}

impl From<IntoIter> for Bitboard {
    fn from(iter: IntoIter) -> Bitboard {
        iter.0
    }
}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter(self)
    }
}

impl FromIterator<Square> for Bitboard {
    /// If converting from `bitboard::IntoIter`, use `Bitboard::from()` instead as that is faster
    fn from_iter<I: IntoIterator<Item=Square>>(iter: I) -> Self {
        let mut bd = Bitboard::new();

        for sq in iter {
            bd.insert(sq);
        }

        bd
    }
}

impl Extend<Square> for Bitboard {
    fn extend<I: IntoIterator<Item=Square>>(&mut self, iter: I) {
        for sq in iter {
            self.insert(sq);
        }
    }
}

/// Iterator over the squares of a `Bitboard`, from the lowest index to the highest
#[derive(Debug, Copy, Clone)]
pub struct IntoIter(Bitboard);

impl Iterator for IntoIter {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.pop()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.0.len(), Some(self.0.len()))
    }
}

impl ExactSizeIterator for IntoIter {
    fn len(&self) -> usize {
        self.0.len()
    }
}

impl FusedIterator for IntoIter { }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitboard() {
        // test new() method and Default trait
        assert_eq!(Bitboard::new(), Bitboard(0));
        assert_eq!(Bitboard::new(), Default::default());

        // test len() and is_empty() methods
        assert_eq!(Bitboard::new().len(), 0);
        assert!(Bitboard::new().is_empty());
        assert!(!Bitboard::new().any());
        assert_eq!(Bitboard::FULL.len(), 64);
        assert!(!Bitboard::FULL.is_empty());

        // test contains() method
        assert!(Bitboard::from(Square::A8).contains(Square::A8));
        assert!(Bitboard::from(Square::H1).contains(Square::H1));
        assert!(!Bitboard::from(Square::A8).contains(Square::H1));
        assert_eq!(Bitboard::from(Square::H1).value(), 1 << 63);

        // test formatting
        assert_eq!(format!("{}", Bitboard::from(0x0123456789abcdefu64)), "123456789abcdef");
        assert_eq!(format!("{:016x}", Bitboard::from(0x0123456789abcdefu64)), "0123456789abcdef");
        assert_eq!(format!("{:X}", Bitboard::from(0x0123456789ABCDEFu64)), "123456789ABCDEF");
        assert_eq!(format!("{:b}", Bitboard::from(0b1011u64)), "1011");
    }

    #[test]
    fn set_algebra() {
        let a = Bitboard::from(Square::A8) | Square::B8.into();
        let b = Bitboard::from(Square::B8) | Square::C8.into();

        assert_eq!(a | b, [Square::A8, Square::B8, Square::C8].iter().copied().collect());
        assert_eq!(a & b, Bitboard::from(Square::B8));
        assert_eq!(a.difference(b), Bitboard::from(Square::A8));
        assert_eq!(a ^ b, Bitboard::from(Square::A8) | Square::C8.into());
        assert_eq!((!a).len(), 62);
        assert!(a.intersects(b));
        assert!(a.is_disjoint(Square::H1.into()));

        // with() and without() leave the original untouched
        let c = a.with(Square::H1);
        assert!(c.contains(Square::H1));
        assert!(!a.contains(Square::H1));
        assert_eq!(c.without(Square::H1), a);

        let mut d = a;
        d.insert(Square::E4);
        d.remove(Square::A8);
        d.toggle(Square::B8);
        assert_eq!(d, Bitboard::from(Square::E4));
    }

    #[test]
    fn shifts_discard_overflow() {
        assert_eq!(Bitboard::FULL << 64, Bitboard::EMPTY);
        assert_eq!(Bitboard::FULL >> 64, Bitboard::EMPTY);
        assert_eq!(Bitboard::FULL << 100, Bitboard::EMPTY);
        assert_eq!(Bitboard::from(Square::H1) << 1, Bitboard::EMPTY);
        // right shift is logical, the top bit does not propagate
        assert_eq!(Bitboard::from(Square::H1) >> 63, Bitboard::from(Square::A8));
        assert_eq!((Bitboard::FULL >> 1).len(), 63);
        assert_eq!(Bitboard::from(Square::A8) << 0, Bitboard::from(Square::A8));
    }

    #[test]
    fn shift_xy_does_not_wrap() {
        assert!(Bitboard::from(Square::A4).shift_xy(-1, 0).is_empty());
        assert!(Bitboard::from(Square::H4).shift_xy(1, 1).is_empty());
        assert!(Bitboard::from(Square::E1).shift_xy(0, -1).is_empty());
        assert_eq!(Bitboard::from(Square::G1).shift_xy(-1, 2), Bitboard::from(Square::F3));
        assert_eq!(Bitboard::from(Square::E5).shift_xy(2, -1), Bitboard::from(Square::G4));
        assert_eq!(Bitboard::from(File::A).shift_xy(1, 0), Bitboard::from(File::B));
        assert_eq!(Bitboard::from(Rank::R2).shift_xy(0, 1), Bitboard::from(Rank::R3));
    }

    #[test]
    fn lowest_square_of_empty_board_is_none() {
        let mut bd = Bitboard::EMPTY;
        assert_eq!(bd.peek(), None);
        assert_eq!(bd.pop(), None);
        assert_eq!(bd.isolate_lowest(), Bitboard::EMPTY);

        let bd = Bitboard::from(Square::H1) | Square::C3.into();
        assert_eq!(bd.peek(), Some(Square::C3));
        assert_eq!(bd.isolate_lowest(), Bitboard::from(Square::C3));
        assert_eq!(Bitboard::from(Square::H1).isolate_lowest(), Bitboard::from(Square::H1));
    }

    #[test]
    fn iteration_runs_from_a8_to_h1() {
        let squares: Vec<_> = (Bitboard::from(Square::H1) | Square::A8.into() | Square::E4.into())
            .into_iter()
            .collect();
        assert_eq!(squares, vec![Square::A8, Square::E4, Square::H1]);
        assert_eq!(Bitboard::FULL.into_iter().len(), 64);
    }

    #[test]
    fn named_sets_are_correct() {
        assert!(Bitboard::LIGHT_SQUARES.contains(Square::A8));
        assert!(Bitboard::LIGHT_SQUARES.contains(Square::H1));
        assert!(Bitboard::DARK_SQUARES.contains(Square::A1));
        assert!(Bitboard::DARK_SQUARES.contains(Square::H8));
        assert_eq!(Bitboard::LIGHT_SQUARES | Bitboard::DARK_SQUARES, Bitboard::FULL);
        assert_eq!(Bitboard::CORNERS,
            [Square::A8, Square::H8, Square::A1, Square::H1].iter().copied().collect());
        assert_eq!(Bitboard::CENTER,
            [Square::D5, Square::E5, Square::D4, Square::E4].iter().copied().collect());
        assert_eq!(Bitboard::BACK_RANKS, Bitboard::from(Rank::R1) | Rank::R8.into());
        assert!(Bitboard::DIAGONAL.contains(Square::D5));
        assert!(Bitboard::ANTIDIAGONAL.contains(Square::D4));
        assert_eq!(Bitboard::NOT_A_FILE, !Bitboard::from(File::A));
        assert_eq!(Bitboard::NOT_GH_FILE, !(Bitboard::from(File::G) | File::H.into()));
    }

    #[test]
    fn diagram_marks_occupied_squares() {
        let diagram = Bitboard::from(Square::A8).diagram();
        let mut lines = diagram.lines();
        assert_eq!(lines.next(), Some("8  | 1 0 0 0 0 0 0 0 "));
        assert_eq!(lines.next(), Some("7  | 0 0 0 0 0 0 0 0 "));
        assert_eq!(diagram.lines().last(), Some("     a b c d e f g h"));
    }
}
