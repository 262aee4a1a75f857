//! Contains structures to represent moves
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fmt;
use super::*;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// The type of move
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MoveFlag {
    /// Any move to an empty square which is not one of the other types, including promotions
    /// without capture
    Quiet,
    /// A two-square pawn advancement
    DoublePush,
    /// Castling on the king side
    KingCastle,
    /// Castling on the queen side
    QueenCastle,
    /// A capture which is neither en passant nor a promotion
    Capture,
    /// An en passant capture
    EnPassant,
    /// A pawn promotion which also captures a piece
    PromotionCapture,
}

impl Default for MoveFlag {
    fn default() -> Self {
        MoveFlag::Quiet
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A transition from one position to the next
///
/// Moves are plain values. The only checks made on them happen when they're applied with
/// `Position::apply_move()`, so use `Position::legal_moves()` to obtain moves that are known to
/// be legal.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    /// The square the piece moves from
    pub from: Square,
    /// The square the piece moves to
    pub to: Square,
    /// The piece which moves
    pub piece: PieceClass,
    /// For a promotion, the piece the pawn becomes
    pub promotion: Option<PieceClass>,
    /// The type of move
    pub flag: MoveFlag,
}

impl Move {
    /// Creates a move without promotion
    pub fn new(from: Square, to: Square, piece: PieceClass, flag: MoveFlag) -> Move {
        Move { from, to, piece, promotion: None, flag }
    }

    /// Creates a promotion to `promotion`. `flag` should be `Quiet` or `PromotionCapture`.
    pub fn promotion(
        from: Square,
        to: Square,
        piece: PieceClass,
        promotion: PieceClass,
        flag: MoveFlag,
    ) -> Move {
        Move { from, to, piece, promotion: Some(promotion), flag }
    }

    /// Returns the side making the move
    pub fn side(&self) -> Side {
        self.piece.side()
    }

    /// Returns `true` if the move captures a piece, including en passant
    pub fn is_capture(&self) -> bool {
        match self.flag {
            MoveFlag::Capture | MoveFlag::EnPassant | MoveFlag::PromotionCapture => true,
            _ => false,
        }
    }

    /// Returns `true` if the move is castling on either side
    pub fn is_castle(&self) -> bool {
        self.flag == MoveFlag::KingCastle || self.flag == MoveFlag::QueenCastle
    }

    /// Returns `true` if the move promotes a pawn
    pub fn is_promotion(&self) -> bool {
        self.promotion.is_some()
    }
}

impl fmt::Display for Move {
    /// Writes the move in coordinate notation, such as "e2e4" or "e7e8q"
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = format!("{}{}", self.from, self.to);

        if let Some(promotion) = self.promotion {
            s += &promotion.kind().to_string().to_lowercase();
        }

        s.fmt(f)
    }
}
