//! Move representation and utilities

use std::fmt;

use smallvec::SmallVec;

use crate::types::{BOARD_SQUARES, PieceType, Square};
use crate::usi::UsiParseError;

/// Type alias for move lists using SmallVec
/// Most shogi positions have < 128 legal moves, so this avoids heap allocation
pub type MoveList = SmallVec<[Move; 128]>;

/// Move representation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    /// Encoded move data (16-bit):
    /// - bits 0-6: destination square (0-80)
    /// - bits 7-13: source square (0-80) or 81 + hand index for drops
    /// - bit 14: promotion flag
    /// - bit 15: drop flag
    data: u16,
}

const TO_MASK: u16 = 0x7f;
const FROM_SHIFT: u16 = 7;
const PROMOTE_FLAG: u16 = 1 << 14;
const DROP_FLAG: u16 = 1 << 15;

impl Move {
    /// Create a normal move (piece moving on board)
    #[inline]
    pub fn normal(from: Square, to: Square, promote: bool) -> Self {
        debug_assert!(from.index() < BOARD_SQUARES && to.index() < BOARD_SQUARES);
        let mut data = to.0 as u16 | ((from.0 as u16) << FROM_SHIFT);
        if promote {
            data |= PROMOTE_FLAG;
        }
        Move { data }
    }

    /// Create a drop move (placing piece from hand)
    #[inline]
    pub fn drop(piece_type: PieceType, to: Square) -> Self {
        debug_assert!(to.index() < BOARD_SQUARES);
        let hand_idx = piece_type.hand_index().expect("King cannot be dropped") as u16;
        let source = BOARD_SQUARES as u16 + hand_idx;
        Move {
            data: to.0 as u16 | (source << FROM_SHIFT) | DROP_FLAG,
        }
    }

    #[inline]
    pub const fn to(self) -> Square {
        Square((self.data & TO_MASK) as u8)
    }

    /// Source square, None for drops
    #[inline]
    pub const fn from(self) -> Option<Square> {
        if self.is_drop() {
            None
        } else {
            Some(Square(((self.data >> FROM_SHIFT) & TO_MASK) as u8))
        }
    }

    #[inline]
    pub const fn is_drop(self) -> bool {
        self.data & DROP_FLAG != 0
    }

    #[inline]
    pub const fn is_promote(self) -> bool {
        self.data & PROMOTE_FLAG != 0
    }

    /// Piece type dropped by this move
    ///
    /// Panics in debug builds when called on a normal move.
    #[inline]
    pub fn drop_piece_type(self) -> PieceType {
        debug_assert!(self.is_drop());
        let source = ((self.data >> FROM_SHIFT) & TO_MASK) as usize;
        PieceType::from_hand_index(source - BOARD_SQUARES).unwrap_or(PieceType::Pawn)
    }

    /// USI notation ("7g7f", "2b3c+", "P*5e")
    pub fn to_usi(self) -> String {
        match self.from() {
            None => format!("{}*{}", self.drop_piece_type().usi_char(), self.to()),
            Some(from) if self.is_promote() => format!("{from}{}+", self.to()),
            Some(from) => format!("{from}{}", self.to()),
        }
    }

    /// Parse USI move text without checking it against any position.
    ///
    /// Use `Position::parse_move` to obtain a move that is legal.
    pub fn from_usi(s: &str) -> Result<Move, UsiParseError> {
        if let Some((piece, to)) = s.split_once('*') {
            let mut chars = piece.chars();
            let (Some(c), None) = (chars.next(), chars.next()) else {
                return Err(UsiParseError::InvalidMoveFormat(s.to_string()));
            };
            // 打つ駒は大文字のみ（"p*5e" は不正）
            if !c.is_ascii_uppercase() {
                return Err(UsiParseError::InvalidMoveFormat(s.to_string()));
            }
            let piece_type = PieceType::from_usi_char(c)?;
            if piece_type == PieceType::King {
                return Err(UsiParseError::InvalidMoveFormat(s.to_string()));
            }
            return Ok(Move::drop(piece_type, to.parse()?));
        }

        let (body, promote) = match s.strip_suffix('+') {
            Some(stripped) => (stripped, true),
            None => (s, false),
        };
        if body.len() != 4 || !body.is_ascii() {
            return Err(UsiParseError::InvalidMoveFormat(s.to_string()));
        }
        let from: Square = body[0..2].parse()?;
        let to: Square = body[2..4].parse()?;
        Ok(Move::normal(from, to, promote))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_usi())
    }
}
