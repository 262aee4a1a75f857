//! Relevant occupancy masks, ray tracing, and magic multipliers for sliding pieces
//
//  Copyright 2019 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::convert::TryFrom;
use log::debug;
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use super::*;

/// Number of relevant occupancy bits for a bishop on each square
pub(super) const BISHOP_BITS: [u32; Square::COUNT] = [
    6, 5, 5, 5, 5, 5, 5, 6,
    5, 5, 5, 5, 5, 5, 5, 5,
    5, 5, 7, 7, 7, 7, 5, 5,
    5, 5, 7, 9, 9, 7, 5, 5,
    5, 5, 7, 9, 9, 7, 5, 5,
    5, 5, 7, 7, 7, 7, 5, 5,
    5, 5, 5, 5, 5, 5, 5, 5,
    6, 5, 5, 5, 5, 5, 5, 6,
];

/// Number of relevant occupancy bits for a rook on each square
pub(super) const ROOK_BITS: [u32; Square::COUNT] = [
    12, 11, 11, 11, 11, 11, 11, 12,
    11, 10, 10, 10, 10, 10, 10, 11,
    11, 10, 10, 10, 10, 10, 10, 11,
    11, 10, 10, 10, 10, 10, 10, 11,
    11, 10, 10, 10, 10, 10, 10, 11,
    11, 10, 10, 10, 10, 10, 10, 11,
    11, 10, 10, 10, 10, 10, 10, 11,
    12, 11, 11, 11, 11, 11, 11, 12,
];

/// Bishop multipliers, indexed by square
pub(super) const BISHOP_MAGICS: [u64; Square::COUNT] = [
    0x0e02_4408_0204_0020, 0x20b2_0202_0202_1601, 0x0410_0400_6040_0040, 0x6204_0414_8044_0801,
    0x1082_0210_0004_8000, 0x0100_8820_0800_0014, 0x0084_1108_8824_2000, 0x0800_4724_1008_0c05,
    0x0800_c008_9204_1040, 0x1840_2404_0c04_2224, 0x0010_1024_3040_4301, 0x0801_8820_8020_0000,
    0x2609_4c14_a0a3_0000, 0x0001_0090_1c20_8000, 0x0181_0202_1004_8404, 0x0002_0200_4424_2498,
    0x1040_00a0_0811_0370, 0x8410_0420_4101_1110, 0x1010_0001_0400_8012, 0x0242_0224_2202_0120,
    0x0001_0218_9040_0100, 0x0006_0009_0901_2009, 0x020c_1001_0101_1000, 0x4881_0180_8041_1010,
    0x0020_2011_0448_0200, 0x4012_1012_2004_4083, 0x0204_0400_0208_0011, 0x8800_4040_0401_0200,
    0x8810_0480_1400_2100, 0x1041_0040_0200_5000, 0x8050_8200_2882_1030, 0x0028_4440_4601_0400,
    0x4022_0840_4107_1000, 0x2212_0120_0210_0244, 0x0220_2804_0418_0c20, 0x8019_2080_2018_0200,
    0x0034_0404_0000_1100, 0x1010_1a00_8088_0880, 0x0008_0801_0200_4126, 0x0052_0200_4442_0048,
    0x0902_10ba_0800_2020, 0x0009_08c2_2009_1000, 0x8040_8400_4800_8100, 0x0301_0520_1104_4800,
    0x0040_5819_0042_1c00, 0x1002_1a00_4200_0104, 0x0a02_08a1_0104_840c, 0x0018_0258_9120_0600,
    0x0004_0088_0808_2101, 0x0105_0080_b088_1001, 0x3008_0042_0804_5342, 0x8054_2040_2a08_0000,
    0x4c80_20f2_1202_0800, 0x0000_2004_903a_2080, 0x1120_0802_20a4_0020, 0xd102_120c_0116_0000,
    0x0300_2022_0820_0900, 0x2080_8100_4210_0580, 0x0410_8008_8400_8880, 0x0244_0220_5084_2400,
    0x8018_0001_0803_0400, 0x0022_00e6_1408_0200, 0x0244_0810_1000_9100, 0x0448_0104_0094_0901,
];

/// Rook multipliers, indexed by square
pub(super) const ROOK_MAGICS: [u64; Square::COUNT] = [
    0x2080_0010_2080_4000, 0x4440_0260_00c0_1000, 0x0100_1020_0100_4008, 0x0080_0800_1000_8006,
    0x0200_0810_2004_0200, 0x1080_0104_0002_0080, 0x0080_0100_0080_0200, 0x0300_0d00_01c0_8962,
    0x5010_8000_2080_4008, 0x7200_4000_4020_1000, 0x000a_8020_0680_9000, 0x0041_000a_1002_2101,
    0x4002_8008_0004_0080, 0x60c0_8002_0180_0400, 0x0102_8001_0002_0080, 0x1c01_0000_6200_9100,
    0x2000_8a80_0040_0221, 0x8000_8080_2000_4010, 0x0620_1900_2001_0040, 0x0001_0100_1000_0825,
    0x2000_8080_0400_0800, 0x4080_8080_0400_0201, 0x4200_6c00_4810_0209, 0x0420_0200_110c_4484,
    0x01c0_1020_8000_8048, 0x4028_5002_4004_2000, 0x2820_0010_1002_0400, 0x0490_0010_8008_0080,
    0x1000_2401_8008_0080, 0x0222_0016_0004_1028, 0x0822_1004_0002_0801, 0x4a08_8062_0001_009c,
    0x0040_0040_8080_0020, 0x0400_2008_8480_4000, 0x0000_4020_0100_1108, 0x0200_3002_8280_0802,
    0x8223_0004_1100_0801, 0x0714_0100_4040_0200, 0x002c_2208_0400_4110, 0x0000_0408_4200_1491,
    0x0540_0430_4880_8000, 0x1000_5102_0082_0020, 0x0200_8010_2202_0040, 0x8000_1000_0800_8080,
    0x0400_0800_0400_8080, 0x0440_9004_4008_0120, 0x4022_0008_8102_0044, 0x0004_4880_410a_0014,
    0x0620_8010_2040_0880, 0x1000_2040_0100_8100, 0x4147_4100_1820_0100, 0x6614_0c10_0021_0100,
    0x0030_0800_0400_8080, 0x0012_0010_0408_0200, 0x0406_1170_080a_4400, 0x0402_0440_8524_0200,
    0x9101_0440_8000_102b, 0x0148_8102_1024_4001, 0x0913_8042_0111_0822, 0x0022_8900_3001_2025,
    0x4843_0004_0800_0211, 0x2002_0010_2824_1172, 0x8088_2a08_0091_1004, 0x080a_8840_8c01_0822,
];

const BISHOP_DIRECTIONS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ROOK_DIRECTIONS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Magic lookup for a single square
#[derive(Debug, Clone)]
pub(super) struct Magic {
    pub mask: Bitboard,
    pub magic: u64,
    pub bits: u32,
    table: Vec<Bitboard>,
}

impl Magic {
    /// Builds the lookup for `sq` with the given multiplier, checking every occupancy subset
    pub fn with_multiplier(piece: PieceKind, sq: Square, magic: u64) -> Result<Magic> {
        let subsets = Subsets::new(piece, sq);
        let mut table = vec![Bitboard::EMPTY; subsets.len()];
        let mut filled = vec![0u32; subsets.len()];

        if subsets.fill(magic, &mut table, &mut filled, 1) {
            Ok(Magic { mask: subsets.mask, magic, bits: subsets.bits, table })
        } else {
            Err(Error::MagicCollision { square: sq, piece })
        }
    }

    /// Searches for a multiplier which maps every occupancy subset of `sq` without a destructive
    /// collision
    pub fn search(piece: PieceKind, sq: Square, rng: &mut StdRng) -> (Magic, u32) {
        let subsets = Subsets::new(piece, sq);
        let mut table = vec![Bitboard::EMPTY; subsets.len()];
        let mut filled = vec![0u32; subsets.len()];
        let mut attempt = 0;

        loop {
            let magic = rng.gen::<u64>() & rng.gen::<u64>() & rng.gen::<u64>();

            // a multiplier that spreads too few mask bits into the index can't work
            if (subsets.mask.0.wrapping_mul(magic) & 0xff00_0000_0000_0000).count_ones() < 6 {
                continue;
            }

            attempt += 1;
            if subsets.fill(magic, &mut table, &mut filled, attempt) {
                let magic = Magic { mask: subsets.mask, magic, bits: subsets.bits, table };
                return (magic, attempt);
            }
        }
    }

    /// Returns the attacks for the given board occupancy
    pub fn attacks(&self, occ: Bitboard) -> Bitboard {
        self.table[index(occ & self.mask, self.magic, self.bits)]
    }
}

/// Returns a new random generator for the multiplier search
pub(super) fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Returns the number of relevant occupancy bits for a bishop or rook on `sq`
pub(super) fn relevant_bits(piece: PieceKind, sq: Square) -> u32 {
    match piece {
        PieceKind::Bishop => BISHOP_BITS[sq as usize],
        _ => ROOK_BITS[sq as usize],
    }
}

fn index(occ: Bitboard, magic: u64, bits: u32) -> usize {
    (occ.0.wrapping_mul(magic) >> (64 - bits)) as usize
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Every relevant occupancy of a square along with its ray-traced attacks
struct Subsets {
    mask: Bitboard,
    bits: u32,
    occupancies: Vec<Bitboard>,
    attacks: Vec<Bitboard>,
}

impl Subsets {
    fn new(piece: PieceKind, sq: Square) -> Subsets {
        let mask = relevant_mask(piece, sq);
        let bits = relevant_bits(piece, sq);
        debug_assert_eq!(mask.len() as u32, bits);
        let occupancies: Vec<_> = (0..1 << bits).map(|i| set_occupancy(i, mask)).collect();
        let attacks = occupancies.iter().map(|&occ| ray_attacks(piece, sq, occ)).collect();

        Subsets { mask, bits, occupancies, attacks }
    }

    fn len(&self) -> usize {
        self.occupancies.len()
    }

    /// Inserts every subset into `table`. Slots not stamped with `stamp` are treated as free.
    /// Returns `false` on a collision between two different attack sets.
    fn fill(&self, magic: u64, table: &mut [Bitboard], filled: &mut [u32], stamp: u32) -> bool {
        for (&occ, &attacks) in self.occupancies.iter().zip(self.attacks.iter()) {
            let i = index(occ, magic, self.bits);

            if filled[i] != stamp {
                filled[i] = stamp;
                table[i] = attacks;
            } else if table[i] != attacks {
                return false;
            }
        }

        true
    }
}

/// Returns the magic lookups of every square for `piece`, found by a seeded search
pub(super) fn search_all(piece: PieceKind, rng: &mut StdRng) -> Vec<Magic> {
    let mut attempts = 0;
    let magics = (0..Square::COUNT)
        .map(|i| {
            let sq = Square::try_from(i).expect("INFALLIBLE");
            let (magic, n) = Magic::search(piece, sq, rng);
            attempts += n;
            magic
        })
        .collect();

    debug!("found {} magics after {} attempts", piece, attempts);
    magics
}

/// Returns the squares whose occupancy affects the attacks of a `piece` on `sq`. The last square
/// of each ray, on the edge of the board, is excluded.
pub(super) fn relevant_mask(piece: PieceKind, sq: Square) -> Bitboard {
    let mut mask = Bitboard::EMPTY;

    for &(dx, dy) in directions(piece) {
        let mut file = sq.file() as i32 + dx;
        let mut row = sq.row() as i32 + dy;

        while on_board(file + dx, row + dy) {
            mask |= bit(file, row);
            file += dx;
            row += dy;
        }
    }

    mask
}

/// Returns the attacks of a `piece` on `sq`, tracing each ray until it reaches the first occupied
/// square
pub(super) fn ray_attacks(piece: PieceKind, sq: Square, occ: Bitboard) -> Bitboard {
    let mut attacks = Bitboard::EMPTY;

    for &(dx, dy) in directions(piece) {
        let mut file = sq.file() as i32 + dx;
        let mut row = sq.row() as i32 + dy;

        while on_board(file, row) {
            let b = bit(file, row);
            attacks |= b;
            if occ.intersects(b) {
                break;
            }
            file += dx;
            row += dy;
        }
    }

    attacks
}

/// Returns the subset of `mask` selected by the bits of `index`, taking the squares of `mask`
/// from the lowest index up
pub(super) fn set_occupancy(index: usize, mask: Bitboard) -> Bitboard {
    mask.into_iter()
        .enumerate()
        .filter(|&(n, _)| index & (1 << n) != 0)
        .map(|(_, sq)| sq)
        .collect()
}

fn directions(piece: PieceKind) -> &'static [(i32, i32)] {
    match piece {
        PieceKind::Bishop => &BISHOP_DIRECTIONS,
        _ => &ROOK_DIRECTIONS,
    }
}

fn on_board(file: i32, row: i32) -> bool {
    0 <= file && file < 8 && 0 <= row && row < 8
}

fn bit(file: i32, row: i32) -> Bitboard {
    Bitboard(1 << (row * 8 + file))
}
