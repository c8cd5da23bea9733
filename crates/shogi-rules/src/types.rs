//! Basic types for shogi board representation
//!
//! This module contains fundamental types like Square, PieceType, Piece, Color and Hand.

use std::fmt;

use crate::usi::UsiParseError;

/// Board width and height
pub const BOARD_SIZE: u8 = 9;

/// Number of squares on the board
pub const BOARD_SQUARES: usize = 81;

/// Number of piece kinds that can be held in hand
pub const NUM_HAND_PIECE_TYPES: usize = 7;

/// Square on shogi board (0-80)
///
/// **IMPORTANT**: Internal file coordinate is reversed from USI notation!
/// - file 0 = 9筋 (leftmost)
/// - file 8 = 1筋 (rightmost)
///
/// To avoid confusion, prefer using from_usi_chars() instead of Square::new().
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(pub u8);

impl Square {
    /// Create square from file and rank
    ///
    /// **WARNING**: file coordinate is reversed from USI notation!
    #[inline]
    pub const fn new(file: u8, rank: u8) -> Self {
        debug_assert!(file < BOARD_SIZE && rank < BOARD_SIZE);
        Square(rank * BOARD_SIZE + file)
    }

    /// Get file (0-8, left to right in internal representation)
    #[inline]
    pub const fn file(self) -> u8 {
        self.0 % BOARD_SIZE
    }

    /// Get rank (0-8, top to bottom)
    #[inline]
    pub const fn rank(self) -> u8 {
        self.0 / BOARD_SIZE
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Point reflection through the board center: (8 - rank, 8 - file)
    #[inline]
    pub const fn flip(self) -> Self {
        Square(80 - self.0)
    }

    /// Square reached by moving `df` files and `dr` ranks, if it stays on the board
    #[inline]
    pub fn offset(self, df: i8, dr: i8) -> Option<Square> {
        let file = self.file() as i8 + df;
        let rank = self.rank() as i8 + dr;
        if (0..BOARD_SIZE as i8).contains(&file) && (0..BOARD_SIZE as i8).contains(&rank) {
            Some(Square::new(file as u8, rank as u8))
        } else {
            None
        }
    }

    /// All 81 squares in index order
    pub fn all() -> impl Iterator<Item = Square> {
        (0..BOARD_SQUARES as u8).map(Square)
    }

    /// Create square from USI notation characters (e.g. '7', 'g')
    pub fn from_usi_chars(file: char, rank: char) -> Result<Self, UsiParseError> {
        let file_idx = match file.to_digit(10) {
            Some(d @ 1..=9) => 8 - (d as u8 - 1),
            _ => return Err(UsiParseError::InvalidSquare(format!("Invalid file: {file}"))),
        };

        let rank_idx = match rank {
            'a'..='i' => (rank as u32 - 'a' as u32) as u8,
            _ => return Err(UsiParseError::InvalidSquare(format!("Invalid rank: {rank}"))),
        };

        Ok(Square::new(file_idx, rank_idx))
    }
}

/// Display square in USI notation (e.g., "5e")
impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = b'9' - self.file();
        let rank = b'a' + self.rank();
        write!(f, "{}{}", file as char, rank as char)
    }
}

impl std::str::FromStr for Square {
    type Err = UsiParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(f), Some(r), None) => Self::from_usi_chars(f, r),
            _ => Err(UsiParseError::InvalidSquare(s.to_string())),
        }
    }
}

/// Side to move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    Black = 0, // Sente (先手) - plays from bottom (rank 8)
    White = 1, // Gote (後手) - plays from top (rank 0)
}

impl Color {
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Rank seen from this side: Black's rank 0 is the far edge, White's is rank 8
    #[inline]
    pub const fn relative_rank(self, sq: Square) -> u8 {
        match self {
            Color::Black => sq.rank(),
            Color::White => BOARD_SIZE - 1 - sq.rank(),
        }
    }

    /// 敵陣（相手側3段）かどうか
    #[inline]
    pub const fn in_promotion_zone(self, sq: Square) -> bool {
        self.relative_rank(sq) <= 2
    }
}

/// Piece types (8 base kinds)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceType {
    King = 0,   // K
    Rook = 1,   // R
    Bishop = 2, // B
    Gold = 3,   // G
    Silver = 4, // S
    Knight = 5, // N
    Lance = 6,  // L
    Pawn = 7,   // P
}

// 持ち駒配列 (Hand) の並び順を一元管理（King を除く 7 種、SFEN の出力順）
pub const HAND_ORDER: [PieceType; NUM_HAND_PIECE_TYPES] = [
    PieceType::Rook,
    PieceType::Bishop,
    PieceType::Gold,
    PieceType::Silver,
    PieceType::Knight,
    PieceType::Lance,
    PieceType::Pawn,
];

/// Maximum number of each piece kind that can be in one hand, indexed like HAND_ORDER
pub const MAX_HAND_PIECES: [u8; NUM_HAND_PIECE_TYPES] = [2, 2, 4, 4, 4, 4, 18];

impl PieceType {
    #[inline]
    pub const fn as_index(self) -> usize {
        self as usize
    }

    /// Hand index (King is None)
    #[inline]
    pub const fn hand_index(self) -> Option<usize> {
        match self {
            PieceType::King => None,
            _ => Some(self as usize - 1),
        }
    }

    #[inline]
    pub const fn from_hand_index(index: usize) -> Option<PieceType> {
        if index < NUM_HAND_PIECE_TYPES { Some(HAND_ORDER[index]) } else { None }
    }

    #[inline]
    pub const fn can_promote(self) -> bool {
        matches!(
            self,
            PieceType::Rook
                | PieceType::Bishop
                | PieceType::Silver
                | PieceType::Knight
                | PieceType::Lance
                | PieceType::Pawn
        )
    }

    /// Uppercase USI letter
    pub const fn usi_char(self) -> char {
        match self {
            PieceType::King => 'K',
            PieceType::Rook => 'R',
            PieceType::Bishop => 'B',
            PieceType::Gold => 'G',
            PieceType::Silver => 'S',
            PieceType::Knight => 'N',
            PieceType::Lance => 'L',
            PieceType::Pawn => 'P',
        }
    }

    /// Parse a USI piece letter, either case
    pub fn from_usi_char(c: char) -> Result<PieceType, UsiParseError> {
        match c.to_ascii_uppercase() {
            'K' => Ok(PieceType::King),
            'R' => Ok(PieceType::Rook),
            'B' => Ok(PieceType::Bishop),
            'G' => Ok(PieceType::Gold),
            'S' => Ok(PieceType::Silver),
            'N' => Ok(PieceType::Knight),
            'L' => Ok(PieceType::Lance),
            'P' => Ok(PieceType::Pawn),
            _ => Err(UsiParseError::InvalidPiece(c)),
        }
    }
}

/// Complete piece representation including promoted pieces
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub piece_type: PieceType,
    pub color: Color,
    pub promoted: bool,
}

/// Offset for promoted pieces in indexing
pub const PROMOTED_OFFSET: usize = 8;

/// Maximum piece index (including unused promoted King and Gold slots)
pub const MAX_PIECE_INDEX: usize = 16;

impl Piece {
    #[inline]
    pub const fn new(piece_type: PieceType, color: Color) -> Self {
        Piece {
            piece_type,
            color,
            promoted: false,
        }
    }

    #[inline]
    pub const fn promoted(piece_type: PieceType, color: Color) -> Self {
        Piece {
            piece_type,
            color,
            promoted: true,
        }
    }

    #[inline]
    pub fn promote(self) -> Self {
        Piece {
            promoted: true,
            ..self
        }
    }

    #[inline]
    pub fn flip_color(self) -> Self {
        Piece {
            color: self.color.opposite(),
            ..self
        }
    }

    /// Convert to index (0-15)
    #[inline]
    pub fn to_index(self) -> usize {
        let base = self.piece_type as usize;
        if self.promoted && self.piece_type.can_promote() {
            base + PROMOTED_OFFSET
        } else {
            base
        }
    }

    /// SFEN token: "+P", "p", "K", ...
    pub fn to_sfen(self) -> String {
        let letter = match self.color {
            Color::Black => self.piece_type.usi_char(),
            Color::White => self.piece_type.usi_char().to_ascii_lowercase(),
        };
        if self.promoted {
            format!("+{letter}")
        } else {
            letter.to_string()
        }
    }
}

/// Pieces in hand for one side, indexed like HAND_ORDER
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Hand([u8; NUM_HAND_PIECE_TYPES]);

impl Hand {
    pub const EMPTY: Hand = Hand([0; NUM_HAND_PIECE_TYPES]);

    #[inline]
    pub fn count(&self, pt: PieceType) -> u8 {
        pt.hand_index().map_or(0, |i| self.0[i])
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&n| n == 0)
    }

    pub(crate) fn set(&mut self, pt: PieceType, count: u8) {
        if let Some(i) = pt.hand_index() {
            self.0[i] = count;
        }
    }

    pub(crate) fn add(&mut self, pt: PieceType) {
        if let Some(i) = pt.hand_index() {
            self.0[i] += 1;
        }
    }

    pub(crate) fn remove(&mut self, pt: PieceType) {
        if let Some(i) = pt.hand_index() {
            debug_assert!(self.0[i] > 0, "removing {pt:?} from empty hand");
            self.0[i] -= 1;
        }
    }

    /// (kind, count) pairs with a non-zero count, in HAND_ORDER
    pub fn iter(&self) -> impl Iterator<Item = (PieceType, u8)> + '_ {
        HAND_ORDER.iter().zip(self.0.iter()).filter(|(_, n)| **n > 0).map(|(&pt, &n)| (pt, n))
    }
}
