//! Zobrist hashing for position identification
//!
//! Keys feed repetition (千日手) detection only; there is no transposition table.

use std::sync::LazyLock;

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::types::{BOARD_SQUARES, Color, MAX_PIECE_INDEX, NUM_HAND_PIECE_TYPES, Piece, PieceType};

use super::Position;

/// Upper bound for the count axis of the hand table (all 18 pawns in one hand)
const MAX_HAND_COUNT: usize = 18;

/// Process-wide Zobrist table
pub static ZOBRIST: LazyLock<ZobristTable> = LazyLock::new(ZobristTable::new);

/// Zobrist hash tables
pub struct ZobristTable {
    /// \[color\]\[piece_index\]\[square\], piece_index includes promoted pieces (0-15)
    piece_square: [[[u64; BOARD_SQUARES]; MAX_PIECE_INDEX]; 2],
    /// \[color\]\[hand_index\]\[count\]
    hand: [[[u64; MAX_HAND_COUNT + 1]; NUM_HAND_PIECE_TYPES]; 2],
    /// Hash value for White to move
    side_to_move: u64,
}

impl Default for ZobristTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ZobristTable {
    /// Create new Zobrist table with random values
    pub fn new() -> Self {
        // Use fixed seed for reproducibility
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0x1234567890ABCDEF);

        let mut table = ZobristTable {
            piece_square: [[[0; BOARD_SQUARES]; MAX_PIECE_INDEX]; 2],
            hand: [[[0; MAX_HAND_COUNT + 1]; NUM_HAND_PIECE_TYPES]; 2],
            side_to_move: rng.random(),
        };

        for color in table.piece_square.iter_mut() {
            for piece_kind in color.iter_mut() {
                for key in piece_kind.iter_mut() {
                    *key = rng.random();
                }
            }
        }

        for color in table.hand.iter_mut() {
            for piece_type in color.iter_mut() {
                // count 0 hashes to zero so empty hands contribute nothing
                for key in piece_type.iter_mut().skip(1) {
                    *key = rng.random();
                }
            }
        }

        table
    }

    #[inline]
    pub fn piece_square(&self, piece: Piece, sq_index: usize) -> u64 {
        self.piece_square[piece.color.index()][piece.to_index()][sq_index]
    }

    #[inline]
    pub fn hand(&self, color: Color, pt: PieceType, count: u8) -> u64 {
        match pt.hand_index() {
            Some(i) => self.hand[color.index()][i][(count as usize).min(MAX_HAND_COUNT)],
            None => 0,
        }
    }

    #[inline]
    pub fn side(&self) -> u64 {
        self.side_to_move
    }

    /// Full recomputation of a position key
    pub fn compute(&self, pos: &Position) -> u64 {
        let mut key = 0;
        for (sq, piece) in pos.pieces() {
            key ^= self.piece_square(piece, sq.index());
        }
        for color in [Color::Black, Color::White] {
            for (pt, count) in pos.hand(color).iter() {
                key ^= self.hand(color, pt, count);
            }
        }
        if pos.side_to_move == Color::White {
            key ^= self.side_to_move;
        }
        key
    }
}
