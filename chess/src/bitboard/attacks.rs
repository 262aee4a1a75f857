//! Provides precomputed attack tables for every kind of piece
//
//  Copyright 2019 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::convert::TryFrom;
use lazy_static::lazy_static;
use log::debug;
use super::*;
use super::magic::{self, Magic};

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2), (2, 1), (2, -1), (1, -2), (-1, -2), (-2, -1), (-2, 1), (-1, 2),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (0, 1), (1, 1), (1, 0), (1, -1), (0, -1), (-1, -1), (-1, 0), (-1, 1),
];

lazy_static! {
    static ref SHARED: AttackTables = AttackTables::new();
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Attacks of every kind of piece from every square
///
/// Tables are built once and never modified. Most code should use the process-wide instance
/// returned by [`AttackTables::shared`](#method.shared) rather than building its own.
#[derive(Debug, Clone)]
pub struct AttackTables {
    pawns: [[Bitboard; Square::COUNT]; Side::COUNT],
    knights: [Bitboard; Square::COUNT],
    kings: [Bitboard; Square::COUNT],
    bishops: Vec<Magic>,
    rooks: Vec<Magic>,
}

impl AttackTables {
    /// Builds the tables from the built-in magic multipliers
    pub fn new() -> AttackTables {
        AttackTables::with_magics(&magic::BISHOP_MAGICS, &magic::ROOK_MAGICS)
            .expect("INFALLIBLE")
    }

    /// Builds the tables with freshly searched magic multipliers
    ///
    /// The same `seed` always finds the same multipliers. Use `magics()` to print a new set of
    /// constants.
    pub fn with_seed(seed: u64) -> AttackTables {
        let mut rng = magic::rng(seed);
        let bishops = magic::search_all(PieceKind::Bishop, &mut rng);
        let rooks = magic::search_all(PieceKind::Rook, &mut rng);

        AttackTables::with_sliders(bishops, rooks)
    }

    /// Builds the tables with the given magic multipliers for bishops and rooks, indexed by
    /// square
    ///
    /// Every occupancy of every square is checked. Returns `Err(MagicCollision)` naming the first
    /// square whose multiplier maps two occupancies with different attacks to the same slot.
    pub fn with_magics(
        bishop_magics: &[u64; Square::COUNT],
        rook_magics: &[u64; Square::COUNT],
    ) -> Result<AttackTables> {
        let bishops = Self::validate(PieceKind::Bishop, bishop_magics)?;
        let rooks = Self::validate(PieceKind::Rook, rook_magics)?;

        Ok(AttackTables::with_sliders(bishops, rooks))
    }

    /// Returns the process-wide tables, building them on first use
    pub fn shared() -> &'static AttackTables {
        &SHARED
    }

    fn validate(piece: PieceKind, magics: &[u64; Square::COUNT]) -> Result<Vec<Magic>> {
        magics.iter()
            .enumerate()
            .map(|(i, &magic)| {
                let sq = Square::try_from(i).expect("INFALLIBLE");
                Magic::with_multiplier(piece, sq, magic)
            })
            .collect()
    }

    fn with_sliders(bishops: Vec<Magic>, rooks: Vec<Magic>) -> AttackTables {
        let mut tables = AttackTables {
            pawns: [[Bitboard::EMPTY; Square::COUNT]; Side::COUNT],
            knights: [Bitboard::EMPTY; Square::COUNT],
            kings: [Bitboard::EMPTY; Square::COUNT],
            bishops,
            rooks,
        };

        for i in 0..Square::COUNT {
            let sq = Square::try_from(i).expect("INFALLIBLE");
            let bd = Bitboard::from(sq);

            // pawns of each side can't wrap from one edge of the board to the other
            tables.pawns[Side::White as usize][i] =
                ((bd >> 7) & Bitboard::NOT_A_FILE) | ((bd >> 9) & Bitboard::NOT_H_FILE);
            tables.pawns[Side::Black as usize][i] =
                ((bd << 7) & Bitboard::NOT_H_FILE) | ((bd << 9) & Bitboard::NOT_A_FILE);

            tables.knights[i] = KNIGHT_OFFSETS.iter()
                .fold(Bitboard::EMPTY, |acc, &(x, y)| acc | bd.shift_xy(x, y));
            tables.kings[i] = KING_OFFSETS.iter()
                .fold(Bitboard::EMPTY, |acc, &(x, y)| acc | bd.shift_xy(x, y));
        }

        debug!("attack tables built");
        tables
    }

    /// Returns the squares attacked by a pawn of the given side on `sq`
    pub fn pawn_attacks(&self, side: Side, sq: Square) -> Bitboard {
        self.pawns[side as usize][sq as usize]
    }

    /// Returns the squares attacked by a knight on `sq`
    pub fn knight_attacks(&self, sq: Square) -> Bitboard {
        self.knights[sq as usize]
    }

    /// Returns the squares attacked by a king on `sq`
    pub fn king_attacks(&self, sq: Square) -> Bitboard {
        self.kings[sq as usize]
    }

    /// Returns the squares attacked by a bishop on `sq` when the squares in `occ` are occupied
    pub fn bishop_attacks(&self, sq: Square, occ: Bitboard) -> Bitboard {
        self.bishops[sq as usize].attacks(occ)
    }

    /// Returns the squares attacked by a rook on `sq` when the squares in `occ` are occupied
    pub fn rook_attacks(&self, sq: Square, occ: Bitboard) -> Bitboard {
        self.rooks[sq as usize].attacks(occ)
    }

    /// Returns the squares attacked by a queen on `sq` when the squares in `occ` are occupied
    pub fn queen_attacks(&self, sq: Square, occ: Bitboard) -> Bitboard {
        self.bishop_attacks(sq, occ) | self.rook_attacks(sq, occ)
    }

    /// Returns the squares attacked by `piece` on `sq` when the squares in `occ` are occupied
    pub fn attacks(&self, piece: PieceClass, sq: Square, occ: Bitboard) -> Bitboard {
        match piece.kind() {
            PieceKind::Pawn => self.pawn_attacks(piece.side(), sq),
            PieceKind::Knight => self.knight_attacks(sq),
            PieceKind::Bishop => self.bishop_attacks(sq, occ),
            PieceKind::Rook => self.rook_attacks(sq, occ),
            PieceKind::Queen => self.queen_attacks(sq, occ),
            PieceKind::King => self.king_attacks(sq),
        }
    }

    /// Returns the relevant occupancy mask of a bishop or rook on `sq`. Other pieces have none.
    pub fn relevant_mask(&self, piece: PieceKind, sq: Square) -> Bitboard {
        match piece {
            PieceKind::Bishop => self.bishops[sq as usize].mask,
            PieceKind::Rook => self.rooks[sq as usize].mask,
            _ => Bitboard::EMPTY,
        }
    }

    /// Returns the number of relevant occupancy bits of a bishop or rook on `sq`
    pub fn relevant_bits(&self, piece: PieceKind, sq: Square) -> u32 {
        match piece {
            PieceKind::Bishop => self.bishops[sq as usize].bits,
            PieceKind::Rook => self.rooks[sq as usize].bits,
            _ => 0,
        }
    }

    /// Returns the bishop and rook magic multipliers, indexed by square
    pub fn magics(&self) -> ([u64; Square::COUNT], [u64; Square::COUNT]) {
        let mut bishops = [0; Square::COUNT];
        let mut rooks = [0; Square::COUNT];

        for i in 0..Square::COUNT {
            bishops[i] = self.bishops[i].magic;
            rooks[i] = self.rooks[i].magic;
        }

        (bishops, rooks)
    }
}

impl Default for AttackTables {
    fn default() -> Self {
        Self::new()
    }
}
