//! SFEN parsing and formatting

use crate::types::{BOARD_SIZE, Color, HAND_ORDER, MAX_HAND_PIECES, Piece, PieceType, Square};
use crate::usi::UsiParseError;

use super::Position;

impl Position {
    /// Parse a SFEN string ("<board> <side> <hands> [<move number>]")
    ///
    /// A leading "sfen " token and the word "startpos" are accepted as well.
    pub fn from_sfen(sfen: &str) -> Result<Position, UsiParseError> {
        let sfen = sfen.trim();
        let sfen = sfen.strip_prefix("sfen ").unwrap_or(sfen);
        if sfen == "startpos" {
            return Ok(Position::startpos());
        }

        let parts: Vec<&str> = sfen.split_whitespace().collect();
        if parts.len() < 3 {
            return Err(UsiParseError::InvalidSfen("Too few parts".to_string()));
        }

        let mut pos = Position::empty();
        parse_board(parts[0], &mut pos)?;

        pos.side_to_move = match parts[1] {
            "b" => Color::Black,
            "w" => Color::White,
            other => return Err(UsiParseError::InvalidSideToMove(other.to_string())),
        };

        parse_hands(parts[2], &mut pos)?;

        if let Some(number) = parts.get(3) {
            let n: u32 = number
                .parse()
                .map_err(|_| UsiParseError::InvalidMoveCount(number.to_string()))?;
            pos.ply = n.saturating_sub(1);
        }

        pos.refresh_key();
        Ok(pos)
    }

    /// Format as SFEN
    pub fn to_sfen(&self) -> String {
        let mut out = String::new();
        for rank in 0..BOARD_SIZE {
            if rank > 0 {
                out.push('/');
            }
            let mut empty = 0;
            for file in 0..BOARD_SIZE {
                match self.piece_at(Square::new(file, rank)) {
                    Some(piece) => {
                        if empty > 0 {
                            out.push_str(&empty.to_string());
                            empty = 0;
                        }
                        out.push_str(&piece.to_sfen());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push_str(&empty.to_string());
            }
        }

        out.push(' ');
        out.push(match self.side_to_move {
            Color::Black => 'b',
            Color::White => 'w',
        });
        out.push(' ');

        let mut hands = String::new();
        for color in [Color::Black, Color::White] {
            for (pt, count) in self.hand(color).iter() {
                if count > 1 {
                    hands.push_str(&count.to_string());
                }
                let letter = pt.usi_char();
                hands.push(match color {
                    Color::Black => letter,
                    Color::White => letter.to_ascii_lowercase(),
                });
            }
        }
        if hands.is_empty() {
            hands.push('-');
        }
        out.push_str(&hands);
        out.push_str(&format!(" {}", self.ply + 1));
        out
    }
}

fn parse_board(board: &str, pos: &mut Position) -> Result<(), UsiParseError> {
    let ranks: Vec<&str> = board.split('/').collect();
    if ranks.len() != BOARD_SIZE as usize {
        return Err(UsiParseError::InvalidRankCount(ranks.len()));
    }

    for (rank, row) in ranks.iter().enumerate() {
        let mut file = 0u8;
        let mut promoted = false;
        for c in row.chars() {
            if let Some(skip) = c.to_digit(10) {
                if promoted || skip == 0 {
                    return Err(UsiParseError::InvalidSfen(row.to_string()));
                }
                file += skip as u8;
            } else if c == '+' {
                promoted = true;
            } else {
                if file >= BOARD_SIZE {
                    return Err(UsiParseError::InvalidSfen(row.to_string()));
                }
                let piece_type = PieceType::from_usi_char(c)?;
                let color = if c.is_ascii_uppercase() { Color::Black } else { Color::White };
                if promoted && !piece_type.can_promote() {
                    return Err(UsiParseError::InvalidPiece(c));
                }
                let piece = Piece {
                    piece_type,
                    color,
                    promoted,
                };
                pos.board[Square::new(file, rank as u8).index()] = Some(piece);
                promoted = false;
                file += 1;
            }
            if file > BOARD_SIZE {
                return Err(UsiParseError::InvalidSfen(row.to_string()));
            }
        }
        if file != BOARD_SIZE || promoted {
            return Err(UsiParseError::InvalidSfen(row.to_string()));
        }
    }
    Ok(())
}

/// Parse hands from SFEN format (e.g., "2P3l4n" or "-")
fn parse_hands(hands: &str, pos: &mut Position) -> Result<(), UsiParseError> {
    if hands == "-" {
        return Ok(());
    }

    let mut count: Option<u32> = None;
    for c in hands.chars() {
        if let Some(d) = c.to_digit(10) {
            count = Some(count.unwrap_or(0).saturating_mul(10).saturating_add(d));
            continue;
        }
        let piece_type = PieceType::from_usi_char(c)
            .map_err(|_| UsiParseError::InvalidHandsFormat(hands.to_string()))?;
        let Some(hand_idx) = piece_type.hand_index() else {
            return Err(UsiParseError::InvalidHandsFormat(hands.to_string()));
        };
        let color = if c.is_ascii_uppercase() { Color::Black } else { Color::White };
        let current = pos.hand(color).count(piece_type) as u32;
        // Accumulate pieces and clip to maximum possible count
        let total = (current + count.take().unwrap_or(1)).min(MAX_HAND_PIECES[hand_idx] as u32);
        pos.hands[color.index()].set(HAND_ORDER[hand_idx], total as u8);
    }

    if count.is_some() {
        return Err(UsiParseError::InvalidHandsFormat(hands.to_string()));
    }
    Ok(())
}
