//! Position module
//!
//! This module manages the complete game position including board state,
//! hands, key history, and provides methods for move execution and validation.
//!
//! ## Module Structure
//! - `moves` - Move execution and undo functionality
//! - `attacks` - Attack detection and check queries
//! - `status` - Checkmate / repetition / game-over queries
//! - `sfen` - SFEN parsing and formatting
//! - `zobrist` - Zobrist hashing for repetition detection

mod attacks;
mod moves;
mod sfen;
mod status;
mod zobrist;


use crate::types::{BOARD_SQUARES, Color, Hand, Piece, PieceType, Square};
use crate::usi::STARTPOS_SFEN;

pub(crate) use self::attacks::{is_attacked, king_square, oriented, slide_deltas, step_deltas};
pub use self::moves::UndoInfo;
pub use self::zobrist::{ZOBRIST, ZobristTable};

/// Piece on each square, indexed by `Square::index`
pub(crate) type Board = [Option<Piece>; BOARD_SQUARES];

/// Complete game position
///
/// Two positions compare equal only when board, hands, side to move, ply and
/// key history all match, so a search that forgets to undo a move is caught by
/// a plain `assert_eq!`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    pub(crate) board: Board,
    pub(crate) hands: [Hand; 2],
    pub(crate) side_to_move: Color,
    /// Number of half moves played (SFEN move number - 1)
    pub(crate) ply: u32,
    /// Zobrist key of the current position
    pub(crate) key: u64,
    /// Keys of all previous positions, oldest first
    pub(crate) history: Vec<u64>,
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

impl Position {
    /// Empty board, Black to move, no pieces in hand
    pub fn empty() -> Self {
        let mut pos = Position {
            board: [None; BOARD_SQUARES],
            hands: [Hand::EMPTY; 2],
            side_to_move: Color::Black,
            ply: 0,
            key: 0,
            history: Vec::new(),
        };
        pos.refresh_key();
        pos
    }

    /// Standard starting position (平手)
    pub fn startpos() -> Self {
        Self::from_sfen(STARTPOS_SFEN).expect("STARTPOS_SFEN must parse")
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn ply(&self) -> u32 {
        self.ply
    }

    #[inline]
    pub fn key(&self) -> u64 {
        self.key
    }

    /// Piece on a square
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.board[sq.index()]
    }

    /// Pieces held in hand by `color`
    #[inline]
    pub fn hand(&self, color: Color) -> &Hand {
        &self.hands[color.index()]
    }

    /// All occupied squares with their pieces
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(|sq| self.piece_at(sq).map(|p| (sq, p)))
    }

    /// King square of `color`, if that king is on the board
    pub fn king_square(&self, color: Color) -> Option<Square> {
        king_square(&self.board, color)
    }

    /// Place a piece (setup helper, clears history)
    pub fn put_piece(&mut self, sq: Square, piece: Piece) {
        self.board[sq.index()] = Some(piece);
        self.reset_setup();
    }

    /// Remove a piece (setup helper, clears history)
    pub fn remove_piece(&mut self, sq: Square) -> Option<Piece> {
        let removed = self.board[sq.index()].take();
        self.reset_setup();
        removed
    }

    /// Set the number of `pt` in `color`'s hand (setup helper, clears history)
    pub fn set_hand_count(&mut self, color: Color, pt: PieceType, count: u8) {
        self.hands[color.index()].set(pt, count);
        self.reset_setup();
    }

    /// Set side to move (setup helper, clears history)
    pub fn set_side_to_move(&mut self, color: Color) {
        self.side_to_move = color;
        self.reset_setup();
    }

    /// Mirror image: colors swapped, board reflected through its center,
    /// hands exchanged. The side to move is swapped as well.
    pub fn flipped(&self) -> Position {
        let mut mirrored = Position::empty();
        for (sq, piece) in self.pieces() {
            mirrored.board[sq.flip().index()] = Some(piece.flip_color());
        }
        mirrored.hands = [self.hands[1], self.hands[0]];
        mirrored.side_to_move = self.side_to_move.opposite();
        mirrored.ply = self.ply;
        mirrored.refresh_key();
        mirrored
    }

    fn reset_setup(&mut self) {
        self.history.clear();
        self.refresh_key();
    }

    /// Recompute the Zobrist key from scratch
    pub(crate) fn refresh_key(&mut self) {
        self.key = ZOBRIST.compute(self);
    }
}
