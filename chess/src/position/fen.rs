//! Converts positions to and from Forsyth-Edwards Notation
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
use std::str::FromStr;
use super::*;

impl Position {
    /// Parse a position from a FEN string
    ///
    /// The board, turn, castling and en passant fields are required. The half-move clock and
    /// full move number default to 0 and 1 if they are missing or aren't numbers.
    pub fn from_fen(s: &str) -> Result<Position> {
        let mut pos = Position::empty();
        let mut fields = s.split_whitespace();

        // parse the board
        let board = fields.next().ok_or(Error::ParseError)?;
        let mut row = 0;
        let mut file = 0;
        for c in board.chars() {
            match c {
                '1' ..= '8' => {
                    file += c.to_digit(10).expect("INFALLIBLE") as usize;
                    if file > File::COUNT {
                        return Err(Error::ParseError);
                    }
                }
                '/' => {
                    if file == File::COUNT && row < Rank::COUNT - 1 {
                        row += 1;
                        file = 0;
                    } else {
                        return Err(Error::ParseError);
                    }
                }
                _ => {
                    if file >= File::COUNT {
                        return Err(Error::ParseError);
                    }
                    let piece = PieceClass::from_fen_char(c)?;
                    let sq = Square::try_from(row * File::COUNT + file).expect("INFALLIBLE");
                    pos.pieces[piece as usize].insert(sq);

                    file += 1;
                }
            }
        }
        if row < Rank::COUNT - 1 || file < File::COUNT {
            return Err(Error::ParseError);
        }

        // parse the turn
        pos.turn = fields.next().ok_or(Error::ParseError)?.parse()?;

        // parse the castling flags
        pos.castling_rights = fields.next().ok_or(Error::ParseError)?.parse()?;

        // parse en passant square
        pos.en_passant = match fields.next() {
            Some("-") => None,
            Some(sq) => Some(sq.parse()?),
            None => return Err(Error::ParseError),
        };

        // clocks, if present
        pos.half_move_clock = fields.next().and_then(|s| s.parse().ok()).unwrap_or(0);
        pos.full_move_number = fields.next().and_then(|s| s.parse().ok()).unwrap_or(1);

        Ok(pos)
    }

    /// Converts the position to a FEN string
    pub fn to_fen(&self) -> String {
        // the board
        let mut board = String::new();
        for row in 0..Rank::COUNT {
            let mut count = 0;
            for file in 0..File::COUNT {
                let sq = Square::try_from(row * File::COUNT + file).expect("INFALLIBLE");
                if let Some(piece) = self.piece_at(sq) {
                    if count > 0 {
                        board += &count.to_string();
                        count = 0;
                    }
                    board.push(piece.fen_char());
                } else {
                    count += 1;
                }
            }
            if count > 0 {
                board += &count.to_string();
            }
            if row < Rank::COUNT - 1 {
                board += "/";
            }
        }

        // en passant square
        let ep_square = match self.en_passant {
            Some(sq) => sq.to_string(),
            None => "-".to_string(),
        };

        format!("{} {} {} {} {} {}", board, self.turn, self.castling_rights, ep_square,
                                     self.half_move_clock, self.full_move_number)
    }
}

impl fmt::Display for Position {
    /// Writes out the position using FEN
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_fen().fmt(f)
    }
}

impl FromStr for Position {
    type Err = Error;

    /// Parse a position from a FEN string
    fn from_str(s: &str) -> Result<Self> {
        Position::from_fen(s)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use super::*;

    /// Tests for Position::from_fen()
    mod from_fen {
        use super::*;
        use Error::ParseError;

        // 1. empty string returns Err(ParseError)
        #[test]
        fn empty_string_returns_error() {
            assert_eq!(Position::from_fen(""), Err(ParseError));
            assert_eq!(Position::from_fen(" \t\r\n"), Err(ParseError));
        }

        // 2. 0 or 9 in board string returns Err(ParseError)
        #[test]
        fn invalid_empty_square_count_returns_error() {
            assert_eq!(Position::from_fen("0K1k5/8/8/8/8/8/8/8 w - - 0 1"), Err(ParseError));
            assert_eq!(Position::from_fen("K1k5/9/8/8/8/8/8/8 w - - 0 1"), Err(ParseError));
        }

        // 3. 1 and 8 do not return an error (if used correctly)
        #[test]
        fn valid_empty_square_count_is_ok() {
            Position::from_fen("K1k5/8/8/8/8/8/8/8 w - - 0 1").expect("valid fen");
        }

        // 4. A rank with more than 8 squares returns Err(ParseError)
        #[test]
        fn rank_too_long_returns_error() {
            assert_eq!(Position::from_fen("K1k6/8/8/8/8/8/8/8 w - - 0 1"), Err(ParseError));
            assert_eq!(Position::from_fen("K1k5b/8/8/8/8/8/8/8 w - - 0 1"), Err(ParseError));
            assert_eq!(Position::from_fen("K1k5/8/8/8/8/8/8/8B w - - 0 1"), Err(ParseError));
            assert_eq!(Position::from_fen("K1k5/8/8/8/8/8/8/b8 w - - 0 1"), Err(ParseError));
        }

        // 5. A rank with less than 8 squares returns Err(ParseError)
        #[test]
        fn rank_too_short_returns_error() {
            assert_eq!(Position::from_fen("K1k4/8/8/8/8/8/8/8 w - - 0 1"), Err(ParseError));
            assert_eq!(Position::from_fen("K1k3b/8/8/8/8/8/8/8 w - - 0 1"), Err(ParseError));
            assert_eq!(Position::from_fen("K1k5/8/8/8/8/8/8/6B w - - 0 1"), Err(ParseError));
            assert_eq!(Position::from_fen("K1k5/8/8/8/8/8/8/b6 w - - 0 1"), Err(ParseError));
        }

        // 6. Too many ranks returns an error
        #[test]
        fn too_many_ranks_returns_error() {
            assert_eq!(Position::from_fen("K1k5/8/8/8/8/8/8/8/7R w - - 0 1"), Err(ParseError));
            assert_eq!(Position::from_fen("K1k5/8/8/8/8/8/8/8/8 w - - 0 1"), Err(ParseError));
        }

        // 7. Too few ranks returns an error
        #[test]
        fn too_few_ranks_returns_error() {
            assert_eq!(Position::from_fen("K1k5/8/8/8/8/8/7Q w - - 0 1"), Err(ParseError));
            assert_eq!(Position::from_fen("K1k5/8/8/8/8/8/8 w - - 0 1"), Err(ParseError));
        }

        // 8. Pieces on files a and h do not return an error
        // 9. Pieces on ranks 1 and 8 do not return an error
        #[test]
        fn edge_files_and_ranks_ok() {
            let pos = Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
                .expect("valid fen");
            assert_eq!(pos, Position::new());
        }

        // 10. Unknown piece letters return Err(ParseError)
        #[test]
        fn unknown_piece_returns_error() {
            assert_eq!(Position::from_fen("K1k4x/8/8/8/8/8/8/8 w - - 0 1"), Err(ParseError));
        }

        // 11. Kings are not required
        #[test]
        fn kingless_board_is_ok() {
            let pos = Position::from_fen("8/8/8/8/8/8/8/8 w - - 0 1").expect("valid fen");
            assert!(pos.occupied().is_empty());
            assert!(!pos.is_check());
        }

        // 12. Missing turn field returns Err(ParseError)
        #[test]
        fn missing_turn_field_returns_error() {
            assert_eq!(Position::from_fen("K1k5/8/8/8/8/8/8/8"), Err(ParseError));
        }

        // 13. 'w' and 'b' set the turn correctly
        #[test]
        fn turn_set_correctly() {
            assert_eq!(Position::from_fen("K1k5/8/8/8/8/8/8/8 w - - 0 1")
                .expect("valid fen").turn(), Side::White);
            assert_eq!(Position::from_fen("K1k5/8/8/8/8/8/8/8 b - - 0 1")
                .expect("valid fen").turn(), Side::Black);
        }

        // 14. Anything other than 'w' and 'b' returns Err(ParseError)
        #[test]
        fn invalid_turn_side_returns_error() {
            assert_eq!(Position::from_fen("K1k5/8/8/8/8/8/8/8 x - - 0 1"), Err(ParseError));
        }

        // 15. Missing castling flags field returns Err(ParseError)
        #[test]
        fn missing_castling_flag_field_returns_error() {
            assert_eq!(Position::from_fen("K1k5/8/8/8/8/8/8/8 w"), Err(ParseError));
        }

        // 16. Invalid castling flags returns Err(ParseError)
        #[test]
        fn invalid_castling_flag_returns_error() {
            assert_eq!(Position::from_fen("K1k5/8/8/8/8/8/8/8 w x - 0 1"), Err(ParseError));
        }

        // 17. "-" castling flag leaves all castling flags empty
        #[test]
        fn empty_castling_flags_set_correctly() {
            let pos = Position::from_fen("K1k5/8/8/8/8/8/8/8 w - - 0 1").expect("valid fen");
            assert_eq!(pos.castling_rights(), CastlingRights::NONE);
        }

        // 18. Any combination of "KQkq" sets the appropriate flags
        #[test]
        fn castling_flags_set_correctly() {
            let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w Kk - 0 1")
                .expect("valid fen");
            assert_eq!(pos.castling_rights(),
                CastlingRights::WHITE_KING_SIDE | CastlingRights::BLACK_KING_SIDE);

            let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w Qq - 0 1")
                .expect("valid fen");
            assert_eq!(pos.castling_rights(),
                CastlingRights::WHITE_QUEEN_SIDE | CastlingRights::BLACK_QUEEN_SIDE);

            let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1")
                .expect("valid fen");
            assert_eq!(pos.castling_rights(), CastlingRights::ALL);

            let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQ - 0 1")
                .expect("valid fen");
            assert_eq!(pos.castling_rights(), CastlingRights::for_side(Side::White));

            let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w kq - 0 1")
                .expect("valid fen");
            assert_eq!(pos.castling_rights(), CastlingRights::for_side(Side::Black));
        }

        // 19. Missing en passant field returns Err(ParseError)
        #[test]
        fn missing_en_passant_field_returns_error() {
            assert_eq!(Position::from_fen("K1k5/8/8/8/8/8/8/8 w -"), Err(ParseError));
        }

        // 20. "-" in the en passant field sets `en_passant` to `None`
        #[test]
        fn no_en_passant_square_set_correctly() {
            let pos = Position::from_fen("K1k5/8/8/8/8/8/8/8 w - - 0 1").expect("valid fen");
            assert_eq!(pos.en_passant(), None);
        }

        // 21. An en passant field that is not a square returns Err(ParseError)
        #[test]
        fn bad_en_passant_square_returns_error() {
            assert_eq!(Position::from_fen("K1k5/8/8/8/8/8/8/8 w - x 0 1"), Err(ParseError));
            assert_eq!(Position::from_fen("K1k5/8/8/8/8/8/8/8 w - i9 0 1"), Err(ParseError));
        }

        // 22. A valid en passant square sets `en_passant` to that square
        #[test]
        fn valid_en_passant_square_set_correctly() {
            let pos = Position::from_fen("K1k5/8/8/7p/8/8/8/8 w - h6 0 1").expect("valid fen");
            assert_eq!(pos.en_passant(), Some(Square::H6));
        }

        // 23. Missing clock fields default to 0 and 1
        #[test]
        fn missing_clock_fields_use_defaults() {
            let pos = Position::from_fen("K1k5/8/8/8/8/8/8/8 w - -").expect("valid fen");
            assert_eq!(pos.half_move_clock(), 0);
            assert_eq!(pos.full_move_number(), 1);
        }

        // 24. Malformed clock fields default to 0 and 1
        #[test]
        fn malformed_clock_fields_use_defaults() {
            let pos = Position::from_fen("K1k5/8/8/8/8/8/8/8 w - - x y").expect("valid fen");
            assert_eq!(pos.half_move_clock(), 0);
            assert_eq!(pos.full_move_number(), 1);
        }

        // 25. Integer clock fields set the values
        #[test]
        fn clock_fields_set_correctly() {
            let pos = Position::from_fen("K1k5/8/8/8/8/8/8/8 b - - 37 52").expect("valid fen");
            assert_eq!(pos.half_move_clock(), 37);
            assert_eq!(pos.full_move_number(), 52);
        }
    }

    #[test]
    fn start_position_round_trips() {
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        assert_eq!(Position::from_fen(fen).unwrap().to_fen(), fen);
        assert_eq!(Position::new().to_string(), fen);
    }

    #[test]
    fn played_positions_round_trip() {
        let lines: [&[&str]; 6] = [
            &["e2e4"],
            &["e2e4", "c7c5", "g1f3"],
            &["d2d4", "d7d5", "c2c4", "d5c4", "e2e3", "b7b5", "a2a4"],
            &["e2e4", "e7e5", "g1f3", "b8c6", "f1c4", "g8f6", "e1g1"],
            &["g1f3", "g8f6", "f3g1", "f6g8", "b1c3", "b8c6"],
            &["e2e4", "d7d5", "e4e5", "f7f5"],
        ];

        for line in &lines {
            let mut pos = Position::new();
            for text in line.iter() {
                let mv = *pos.legal_moves().iter()
                    .find(|mv| mv.to_string() == *text)
                    .expect("legal move");
                pos.apply_move(&mv, true).unwrap();
            }

            let copy = Position::from_fen(&pos.to_fen()).unwrap();
            assert_eq!(copy, pos, "{:?}", line);
            assert_eq!(copy.turn(), pos.turn());
            assert_eq!(copy.castling_rights(), pos.castling_rights());
            assert_eq!(copy.en_passant(), pos.en_passant());
            assert_eq!(copy.half_move_clock(), pos.half_move_clock());
            assert_eq!(copy.full_move_number(), pos.full_move_number());
        }
    }

    #[test]
    fn fen_after_play_is_exact() {
        let mut pos = Position::new();
        for text in &["e2e4", "d7d5", "e4e5", "f7f5"] {
            let mv = *pos.legal_moves().iter()
                .find(|mv| mv.to_string() == *text)
                .expect("legal move");
            pos.apply_move(&mv, true).unwrap();
        }

        assert_eq!(pos.to_fen(), "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3");
    }
}
