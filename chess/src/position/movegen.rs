//! Generates pseudo-legal and legal moves
//
//  Copyright 2019 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use log::trace;
use super::*;

use PieceKind::*;

impl Position {
    /// Returns the legal moves from this position, generating them if they haven't been generated
    /// since the position last changed
    pub fn legal_moves(&mut self) -> &[Move] {
        if self.legal_moves.is_none() {
            self.legal_moves = Some(self.generate_legal_moves());
        }

        match &self.legal_moves {
            Some(moves) => moves.as_slice(),
            None => &[],
        }
    }

    /// Discards any previously generated moves and generates the legal moves again
    pub fn regenerate_legal_moves(&mut self) -> &[Move] {
        self.legal_moves = None;
        self.legal_moves()
    }

    /// Generates the legal moves from this position without storing them
    ///
    /// Each pseudo-legal move is applied to a copy of the position and kept only if it doesn't
    /// leave the mover's king attacked.
    pub fn generate_legal_moves(&self) -> Vec<Move> {
        let mover = self.turn;
        let mut scratch = self.scratch();
        let snapshot = scratch.snapshot();

        let moves: Vec<_> = self.pseudo_legal_moves()
            .into_iter()
            .filter(|mv| {
                // applying without validation can't fail
                let legal = scratch.apply_move(mv, false).is_ok()
                    && match scratch.king_square(mover) {
                        Some(king) => !scratch.is_attacked(king, !mover),
                        None => true,
                    };
                scratch.revert(&snapshot);
                legal
            })
            .collect();

        trace!("{} legal moves in {}", moves.len(), self);
        moves
    }

    /// Returns the pseudo-legal moves for the side to move
    pub fn pseudo_legal_moves(&self) -> Vec<Move> {
        self.pseudo_legal_moves_for(self.turn)
    }

    /// Returns the pseudo-legal moves for `side`, whether or not it is that side's turn
    ///
    /// Pseudo-legal moves follow the movement rules of each piece but may leave the mover's king
    /// attacked. Castling moves are the exception: they are only generated when the king and the
    /// square it passes over are not attacked.
    pub fn pseudo_legal_moves_for(&self, side: Side) -> Vec<Move> {
        let own = self.occupied_by(side);
        let them = self.occupied_by(!side);
        let occ = own | them;
        let mut moves = Vec::with_capacity(64);

        for &piece in PieceClass::of_side(side) {
            for from in self.pieces(piece) {
                match piece.kind() {
                    Pawn => self.pawn_moves(piece, from, occ, them, &mut moves),
                    kind => {
                        let targets = self.tables.attacks(piece, from, occ).difference(own);
                        for to in targets {
                            let flag = if them.contains(to) {
                                MoveFlag::Capture
                            } else {
                                MoveFlag::Quiet
                            };
                            moves.push(Move::new(from, to, piece, flag));
                        }
                        if kind == King {
                            self.castling_moves(piece, from, occ, &mut moves);
                        }
                    }
                }
            }
        }

        moves
    }

    fn pawn_moves(
        &self,
        piece: PieceClass,
        from: Square,
        occ: Bitboard,
        them: Bitboard,
        moves: &mut Vec<Move>,
    ) {
        let side = piece.side();
        let (forward, start_rank) = match side {
            Side::White => (1, Rank::R2),
            Side::Black => (-1, Rank::R7),
        };
        let last_rank = Rank::back_rank(!side);

        // pushes
        let single = Bitboard::from(from).shift_xy(0, forward).difference(occ);
        if let Some(to) = single.peek() {
            if to.rank() == last_rank {
                push_promotions(piece, from, to, MoveFlag::Quiet, moves);
            } else {
                moves.push(Move::new(from, to, piece, MoveFlag::Quiet));

                let double = single.shift_xy(0, forward).difference(occ);
                if from.rank() == start_rank {
                    if let Some(to) = double.peek() {
                        moves.push(Move::new(from, to, piece, MoveFlag::DoublePush));
                    }
                }
            }
        }

        // captures
        let attacks = self.tables.pawn_attacks(side, from);
        for to in attacks & them {
            if to.rank() == last_rank {
                push_promotions(piece, from, to, MoveFlag::PromotionCapture, moves);
            } else {
                moves.push(Move::new(from, to, piece, MoveFlag::Capture));
            }
        }

        // en passant, when the pawn that just advanced is actually there
        if let Some(ep) = self.en_passant {
            let victim = Square::from_coord(ep.file(), from.rank());
            if attacks.contains(ep)
                && !occ.contains(ep)
                && self.pieces(PieceClass::new(!side, Pawn)).contains(victim)
            {
                moves.push(Move::new(from, ep, piece, MoveFlag::EnPassant));
            }
        }
    }

    fn castling_moves(&self, king: PieceClass, from: Square, occ: Bitboard, moves: &mut Vec<Move>) {
        let side = king.side();
        let rank = Rank::back_rank(side);
        let home = Square::from_coord(File::E, rank);
        if from != home {
            return;
        }

        let rooks = self.pieces(PieceClass::new(side, Rook));
        let sides = [
            (CastlingRights::king_side(side), File::H, &[File::F, File::G][..], File::F, File::G,
                MoveFlag::KingCastle),
            (CastlingRights::queen_side(side), File::A, &[File::B, File::C, File::D][..], File::D,
                File::C, MoveFlag::QueenCastle),
        ];

        for &(right, rook_file, between, transit, to, flag) in &sides {
            if !self.castling_rights.contains(right)
                || !rooks.contains(Square::from_coord(rook_file, rank))
                || between.iter().any(|&f| occ.contains(Square::from_coord(f, rank)))
                || self.is_attacked(home, !side)
                || self.is_attacked(Square::from_coord(transit, rank), !side)
            {
                continue;
            }

            moves.push(Move::new(home, Square::from_coord(to, rank), king, flag));
        }
    }

    /// Returns a copy of the position without the stored move list
    fn scratch(&self) -> Position {
        Position {
            tables: self.tables,
            pieces: self.pieces,
            turn: self.turn,
            castling_rights: self.castling_rights,
            en_passant: self.en_passant,
            half_move_clock: self.half_move_clock,
            full_move_number: self.full_move_number,
            legal_moves: None,
        }
    }
}

/// Adds the four promotions of a pawn moving from `from` to `to`: queen, rook, bishop and knight
fn push_promotions(
    piece: PieceClass,
    from: Square,
    to: Square,
    flag: MoveFlag,
    moves: &mut Vec<Move>,
) {
    for &kind in &PieceKind::PROMOTIONS {
        moves.push(Move::promotion(from, to, piece, PieceClass::new(piece.side(), kind), flag));
    }
}
