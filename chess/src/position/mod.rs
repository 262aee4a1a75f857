//! Contains structures related to the `Position`
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

mod diagram;
mod fen;
mod movegen;

pub use diagram::Diagram;

use PieceKind::*;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A representation of the arrangement of pieces on the board at a given point in the game, as well
/// as castling availability and en passant legality.
///
/// The position keeps the list of legal moves once it has been generated. Every change to the
/// position discards the list, and the next call to `legal_moves()` generates it again.
#[derive(Clone)]
pub struct Position {
    tables: &'static AttackTables,
    pieces: [Bitboard; PieceClass::COUNT],
    turn: Side,
    castling_rights: CastlingRights,
    en_passant: Option<Square>,
    half_move_clock: u32,
    full_move_number: u32,
    legal_moves: Option<Vec<Move>>,
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Everything needed to restore a `Position` to an earlier state
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pieces: [Bitboard; PieceClass::COUNT],
    turn: Side,
    castling_rights: CastlingRights,
    en_passant: Option<Square>,
    half_move_clock: u32,
    full_move_number: u32,
}

impl Position {
    /// Returns the standard starting Position
    pub fn new() -> Position {
        let mut pos = Position::empty();

        pos.pieces = [
            // white
            Bitboard::from(0x00ff_0000_0000_0000u64),
            Bitboard::from(0x4200_0000_0000_0000u64),
            Bitboard::from(0x2400_0000_0000_0000u64),
            Bitboard::from(0x8100_0000_0000_0000u64),
            Bitboard::from(0x0800_0000_0000_0000u64),
            Bitboard::from(0x1000_0000_0000_0000u64),
            // black
            Bitboard::from(0x0000_0000_0000_ff00u64),
            Bitboard::from(0x0000_0000_0000_0042u64),
            Bitboard::from(0x0000_0000_0000_0024u64),
            Bitboard::from(0x0000_0000_0000_0081u64),
            Bitboard::from(0x0000_0000_0000_0008u64),
            Bitboard::from(0x0000_0000_0000_0010u64),
        ];
        pos.castling_rights = CastlingRights::ALL;

        pos
    }

    /// Returns a position with an empty board, `White` to move, and no castling rights
    pub fn empty() -> Position {
        Position {
            tables: AttackTables::shared(),
            pieces: [Bitboard::EMPTY; PieceClass::COUNT],
            turn: Side::White,
            castling_rights: CastlingRights::NONE,
            en_passant: None,
            half_move_clock: 0,
            full_move_number: 1,
            legal_moves: None,
        }
    }

    /// Returns the position using `tables` for attack lookups instead of the shared tables
    pub fn with_tables(mut self, tables: &'static AttackTables) -> Position {
        self.tables = tables;
        self.legal_moves = None;
        self
    }

    /// Returns the attack tables used by the position
    pub fn tables(&self) -> &'static AttackTables {
        self.tables
    }

    /// Returns the side whose turn it is
    pub fn turn(&self) -> Side {
        self.turn
    }

    /// Returns the remaining castling rights
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    /// Returns the square a pawn passed over on the previous move, if it advanced two squares
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    /// Returns the number of plies since the last capture or pawn move
    pub fn half_move_clock(&self) -> u32 {
        self.half_move_clock
    }

    /// Returns the full move number, which starts at 1 and increments after each `Black` move
    pub fn full_move_number(&self) -> u32 {
        self.full_move_number
    }

    /// Returns the squares occupied by `piece`
    pub fn pieces(&self, piece: PieceClass) -> Bitboard {
        self.pieces[piece as usize]
    }

    /// Returns all occupied squares
    pub fn occupied(&self) -> Bitboard {
        self.pieces.iter().fold(Bitboard::EMPTY, |acc, &bd| acc | bd)
    }

    /// Returns the squares occupied by pieces of `side`
    pub fn occupied_by(&self, side: Side) -> Bitboard {
        PieceClass::of_side(side).iter().fold(Bitboard::EMPTY, |acc, &pc| acc | self.pieces(pc))
    }

    /// Returns the piece, if any, at the given square
    pub fn piece_at(&self, sq: Square) -> Option<PieceClass> {
        PieceClass::ALL.iter().copied().find(|&pc| self.pieces(pc).contains(sq))
    }

    /// Returns the square of the king of `side`, or `None` if it has no king
    pub fn king_square(&self, side: Side) -> Option<Square> {
        self.pieces(PieceClass::new(side, King)).peek()
    }

    /// Places `piece` on `sq`, removing anything already there
    pub fn put_piece(&mut self, sq: Square, piece: PieceClass) {
        self.remove_piece(sq);
        self.pieces[piece as usize].insert(sq);
        self.legal_moves = None;
    }

    /// Removes and returns the piece on `sq`, if any
    pub fn remove_piece(&mut self, sq: Square) -> Option<PieceClass> {
        let piece = self.piece_at(sq)?;
        self.pieces[piece as usize].remove(sq);
        self.legal_moves = None;

        Some(piece)
    }

    /// Returns `true` if `sq` is attacked by a piece of side `by`
    pub fn is_attacked(&self, sq: Square, by: Side) -> bool {
        let occ = self.occupied();
        let find = |kind| self.pieces(PieceClass::new(by, kind));

        // a pawn of `by` attacks `sq` if a pawn of the other side on `sq` would attack it
        self.tables.pawn_attacks(!by, sq).intersects(find(Pawn))
            || self.tables.knight_attacks(sq).intersects(find(Knight))
            || self.tables.bishop_attacks(sq, occ).intersects(find(Bishop) | find(Queen))
            || self.tables.rook_attacks(sq, occ).intersects(find(Rook) | find(Queen))
            || self.tables.king_attacks(sq).intersects(find(King))
    }

    /// Returns `true` if the side to move is in check. A side with no king is never in check.
    pub fn is_check(&self) -> bool {
        match self.king_square(self.turn) {
            Some(sq) => self.is_attacked(sq, !self.turn),
            None => false,
        }
    }

    /// Captures the state of the position so it can be restored with `revert()`
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            pieces: self.pieces,
            turn: self.turn,
            castling_rights: self.castling_rights,
            en_passant: self.en_passant,
            half_move_clock: self.half_move_clock,
            full_move_number: self.full_move_number,
        }
    }

    /// Restores the position to the state captured in `snapshot`
    pub fn revert(&mut self, snapshot: &Snapshot) {
        self.pieces = snapshot.pieces;
        self.turn = snapshot.turn;
        self.castling_rights = snapshot.castling_rights;
        self.en_passant = snapshot.en_passant;
        self.half_move_clock = snapshot.half_move_clock;
        self.full_move_number = snapshot.full_move_number;
        self.legal_moves = None;
    }

    /// Applies `mv` to the position and passes the turn to the other side
    ///
    /// The move itself is trusted: it should come from `legal_moves()` or the pseudo-legal
    /// generators. When `validate_side` is `true`, a move by a piece that doesn't belong to the
    /// side to move returns `Err(IllegalMove)` and leaves the position unchanged.
    pub fn apply_move(&mut self, mv: &Move, validate_side: bool) -> Result<()> {
        let side = mv.side();
        if validate_side && side != self.turn {
            return Err(Error::IllegalMove);
        }
        let them = !side;
        let mut captured = false;

        // castling moves the rook as well
        if mv.is_castle() {
            let rank = Rank::back_rank(side);
            let (rook_from, rook_to) = if mv.flag == MoveFlag::KingCastle {
                (File::H, File::F)
            } else {
                (File::A, File::D)
            };
            let rook = &mut self.pieces[PieceClass::new(side, Rook) as usize];
            rook.remove(Square::from_coord(rook_from, rank));
            rook.insert(Square::from_coord(rook_to, rank));
        }
        match mv.piece.kind() {
            King => self.castling_rights.remove(CastlingRights::for_side(side)),
            Rook => self.remove_corner_right(side, mv.from),
            _ => {},
        }

        // remove a captured piece
        if mv.flag != MoveFlag::EnPassant {
            let victim = PieceClass::of_side(them).iter()
                .copied()
                .find(|&pc| self.pieces(pc).contains(mv.to));
            if let Some(victim) = victim {
                self.pieces[victim as usize].remove(mv.to);
                if victim.kind() == Rook {
                    self.remove_corner_right(them, mv.to);
                }
                captured = true;
            }
        }

        let moving = &mut self.pieces[mv.piece as usize];
        moving.remove(mv.from);
        moving.insert(mv.to);

        // the pawn captured en passant sits beside the capturing pawn's starting square
        if mv.flag == MoveFlag::EnPassant {
            let sq = Square::from_coord(mv.to.file(), mv.from.rank());
            self.pieces[PieceClass::new(them, Pawn) as usize].remove(sq);
            captured = true;
        }
        self.en_passant = if mv.flag == MoveFlag::DoublePush {
            Some(Square::try_from((mv.from as usize + mv.to as usize) / 2).expect("INFALLIBLE"))
        } else {
            None
        };

        if let Some(promotion) = mv.promotion {
            self.pieces[mv.piece as usize].remove(mv.to);
            self.pieces[promotion as usize].insert(mv.to);
        }

        if captured || mv.piece.kind() == Pawn {
            self.half_move_clock = 0;
        } else {
            self.half_move_clock += 1;
        }
        if side == Side::Black {
            self.full_move_number += 1;
        }

        self.turn = !self.turn;
        self.legal_moves = None;

        Ok(())
    }

    /// Removes the castling right of `side` tied to a rook on `sq`, if `sq` is one of that side's
    /// corners
    fn remove_corner_right(&mut self, side: Side, sq: Square) {
        let right = CastlingRights::for_rook_square(sq);

        if !right.is_empty() && CastlingRights::for_side(side).contains(right) {
            self.castling_rights.remove(right);
        }
    }
}

impl Default for Position {
    /// Returns the standard starting Position
    fn default() -> Self {
        Position::new()
    }
}

impl PartialEq for Position {
    /// Positions are equal when the pieces, turn, castling rights, en passant square and clocks
    /// all match
    fn eq(&self, other: &Self) -> bool {
        self.snapshot() == other.snapshot()
    }
}

impl Eq for Position { }

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Position").field(&self.to_fen()).finish()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use super::*;

    fn find(pos: &mut Position, text: &str) -> Move {
        let moves = pos.legal_moves().to_vec();
        moves.into_iter()
            .find(|mv| mv.to_string() == text)
            .unwrap_or_else(|| panic!("{} is not legal in {}", text, pos))
    }

    fn play(pos: &mut Position, moves: &[&str]) {
        for text in moves {
            let mv = find(pos, text);
            pos.apply_move(&mv, true).unwrap();
        }
    }

    /// Position::new() must return the standard starting position.
    ///
    /// Depends on to_fen() working properly.
    #[test]
    fn new_returns_the_standard_starting_position() {
        assert_eq!(Position::new().to_fen(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert_eq!(Position::default(), Position::new());
        assert_eq!(Position::new().piece_at(Square::E1), Some(PieceClass::WhiteKing));
        assert_eq!(Position::new().piece_at(Square::D8), Some(PieceClass::BlackQueen));
        assert_eq!(Position::new().king_square(Side::Black), Some(Square::E8));
    }

    #[test]
    fn empty_board() {
        let pos = Position::empty();
        assert!(pos.occupied().is_empty());
        assert_eq!(pos.king_square(Side::White), None);
        assert!(!pos.is_check());
        assert_eq!(pos.to_fen(), "8/8/8/8/8/8/8/8 w - - 0 1");
    }

    #[test]
    fn attacks_and_check_agree() {
        let fens = [
            "rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq g3 0 2",
            "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3",
            "4k3/8/8/8/8/8/3p4/4K3 w - - 0 1",
            "4k3/8/5N2/8/8/8/8/4K3 b - - 0 1",
            "4k3/8/8/8/8/8/8/4K2r w - - 0 1",
        ];

        for fen in &fens {
            let pos: Position = fen.parse().unwrap();
            let king = pos.king_square(pos.turn()).unwrap();
            assert_eq!(pos.is_check(), pos.is_attacked(king, !pos.turn()), "{}", fen);
        }

        let pos: Position = fens[1].parse().unwrap();
        assert!(pos.is_check());
        let pos: Position = fens[2].parse().unwrap();
        assert!(pos.is_check());
        assert!(pos.is_attacked(Square::C1, Side::Black));
        assert!(!pos.is_attacked(Square::D1, Side::Black));
    }

    #[test]
    fn capture_removes_the_victim() {
        let mut pos = Position::new();
        play(&mut pos, &["e2e4", "d7d5", "e4d5"]);

        assert_eq!(pos.piece_at(Square::D5), Some(PieceClass::WhitePawn));
        assert_eq!(pos.pieces(PieceClass::BlackPawn).len(), 7);
        assert_eq!(pos.half_move_clock(), 0);
        assert_eq!(pos.full_move_number(), 2);
        assert_eq!(pos.turn(), Side::Black);
    }

    #[test]
    fn en_passant_lifecycle() {
        let mut pos = Position::new();
        play(&mut pos, &["e2e4"]);
        assert_eq!(pos.en_passant(), Some(Square::E3));
        play(&mut pos, &["g8f6"]);
        assert_eq!(pos.en_passant(), None);

        play(&mut pos, &["e4e5", "d7d5"]);
        assert_eq!(pos.en_passant(), Some(Square::D6));

        let ep = find(&mut pos, "e5d6");
        assert_eq!(ep.flag, MoveFlag::EnPassant);
        pos.apply_move(&ep, true).unwrap();
        assert_eq!(pos.piece_at(Square::D5), None);
        assert_eq!(pos.piece_at(Square::D6), Some(PieceClass::WhitePawn));
        assert_eq!(pos.en_passant(), None);
        assert_eq!(pos.pieces(PieceClass::BlackPawn).len(), 7);
    }

    #[test]
    fn castling_moves_the_rook_and_clears_rights() {
        let mut pos: Position = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1".parse().unwrap();

        let castle = find(&mut pos, "e1g1");
        assert_eq!(castle.flag, MoveFlag::KingCastle);
        pos.apply_move(&castle, true).unwrap();
        assert_eq!(pos.piece_at(Square::F1), Some(PieceClass::WhiteRook));
        assert_eq!(pos.piece_at(Square::H1), None);
        assert_eq!(pos.castling_rights().to_string(), "kq");

        let castle = find(&mut pos, "e8c8");
        assert_eq!(castle.flag, MoveFlag::QueenCastle);
        pos.apply_move(&castle, true).unwrap();
        assert_eq!(pos.piece_at(Square::D8), Some(PieceClass::BlackRook));
        assert_eq!(pos.piece_at(Square::C8), Some(PieceClass::BlackKing));
        assert_eq!(pos.castling_rights(), CastlingRights::NONE);
        assert_eq!(pos.to_fen(), "2kr3r/8/8/8/8/8/8/R4RK1 w - - 2 2");
    }

    #[test]
    fn rook_moves_and_captures_clear_rights() {
        let mut pos: Position = "r2nk2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1".parse().unwrap();

        play(&mut pos, &["a1a8"]);
        assert_eq!(pos.castling_rights().to_string(), "Kk");

        play(&mut pos, &["h8h1"]);
        assert_eq!(pos.castling_rights(), CastlingRights::NONE);
    }

    #[test]
    fn wrong_side_is_rejected() {
        let mut pos = Position::new();
        let before = pos.snapshot();
        let mv = Move::new(Square::E7, Square::E5, PieceClass::BlackPawn, MoveFlag::DoublePush);

        assert_eq!(pos.apply_move(&mv, true), Err(Error::IllegalMove));
        assert_eq!(pos.snapshot(), before);

        // without validation the move is applied as given
        pos.apply_move(&mv, false).unwrap();
        assert_eq!(pos.piece_at(Square::E5), Some(PieceClass::BlackPawn));
    }

    #[test]
    fn revert_restores_everything() {
        let mut pos: Position = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1"
            .parse().unwrap();
        let original = pos.clone();
        let snapshot = pos.snapshot();

        for mv in pos.generate_legal_moves() {
            pos.apply_move(&mv, true).unwrap();
            pos.revert(&snapshot);
            assert_eq!(pos, original, "after {}", mv);
        }
    }

    #[test]
    fn pieces_never_overlap() {
        let mut pos = Position::new();
        play(&mut pos, &["e2e4", "d7d5", "e4d5", "d8d5", "b1c3", "d5a5", "d2d4", "c7c6",
            "g1f3", "c8g4", "c1d2", "e7e6", "f1e2", "f8b4", "e1g1"]);

        for (i, &a) in PieceClass::ALL.iter().enumerate() {
            for &b in &PieceClass::ALL[i + 1..] {
                assert!(pos.pieces(a).is_disjoint(pos.pieces(b)), "{} and {}", a, b);
            }
        }
        assert_eq!(pos.occupied().len(), 30);
    }

    #[test]
    fn clocks_follow_captures_and_pawn_moves() {
        let mut pos = Position::new();
        play(&mut pos, &["g1f3", "g8f6", "b1c3"]);
        assert_eq!(pos.half_move_clock(), 3);
        assert_eq!(pos.full_move_number(), 2);

        play(&mut pos, &["e7e5"]);
        assert_eq!(pos.half_move_clock(), 0);
        assert_eq!(pos.full_move_number(), 3);

        play(&mut pos, &["f3e5"]);
        assert_eq!(pos.half_move_clock(), 0);
    }

    #[test]
    fn editing_pieces_clears_the_move_list() {
        let mut pos = Position::empty();
        pos.put_piece(Square::E1, PieceClass::WhiteKing);
        pos.put_piece(Square::E8, PieceClass::BlackKing);
        assert_eq!(pos.legal_moves().len(), 5);

        pos.put_piece(Square::A1, PieceClass::WhiteRook);
        assert_eq!(pos.legal_moves().len(), 5 + 10);
        assert_eq!(pos.remove_piece(Square::A1), Some(PieceClass::WhiteRook));
        assert_eq!(pos.remove_piece(Square::A1), None);
        assert_eq!(pos.legal_moves().len(), 5);
    }
}
