//! Move execution and undo functionality
//!
//! This module handles making and unmaking moves on the position,
//! including incremental key updates and the key history.

use log::debug;

use crate::error::{RulesError, RulesResult};
use crate::moves::Move;
use crate::types::{Piece, PieceType};

use super::Position;
use super::zobrist::ZOBRIST;

/// Information needed to undo a move
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UndoInfo {
    /// Piece captured on the destination square (with its promoted flag)
    pub captured: Option<Piece>,
    /// Moving piece as it stood on the source square, None for drops
    pub moved: Option<Piece>,
    /// Key before the move
    pub previous_key: u64,
}

impl Position {
    /// Make a move on the position without checking legality
    ///
    /// IMPORTANT: When capturing a promoted piece, it is automatically unpromoted
    /// when added to hand. The promoted flag is stored in UndoInfo for restoration.
    pub fn do_move(&mut self, mv: Move) -> UndoInfo {
        let us = self.side_to_move;
        let to = mv.to();
        let mut undo = UndoInfo {
            captured: None,
            moved: None,
            previous_key: self.key,
        };
        self.history.push(self.key);

        match mv.from() {
            None => {
                let piece_type = mv.drop_piece_type();
                let piece = Piece::new(piece_type, us);
                let count = self.hands[us.index()].count(piece_type);
                self.key ^= ZOBRIST.hand(us, piece_type, count);
                self.hands[us.index()].remove(piece_type);
                self.key ^= ZOBRIST.hand(us, piece_type, count - 1);

                self.board[to.index()] = Some(piece);
                self.key ^= ZOBRIST.piece_square(piece, to.index());
            }
            Some(from) => {
                let piece = self.board[from.index()]
                    .take()
                    .expect("Move source must have a piece");
                debug_assert_eq!(piece.color, us, "moving opponent's piece: {mv}");
                undo.moved = Some(piece);
                self.key ^= ZOBRIST.piece_square(piece, from.index());

                if let Some(captured) = self.board[to.index()] {
                    debug_assert_ne!(captured.piece_type, PieceType::King, "king capture: {mv}");
                    undo.captured = Some(captured);
                    self.key ^= ZOBRIST.piece_square(captured, to.index());

                    let count = self.hands[us.index()].count(captured.piece_type);
                    self.key ^= ZOBRIST.hand(us, captured.piece_type, count);
                    self.hands[us.index()].add(captured.piece_type);
                    self.key ^= ZOBRIST.hand(us, captured.piece_type, count + 1);
                }

                let placed = if mv.is_promote() { piece.promote() } else { piece };
                self.board[to.index()] = Some(placed);
                self.key ^= ZOBRIST.piece_square(placed, to.index());
            }
        }

        self.side_to_move = us.opposite();
        self.key ^= ZOBRIST.side();
        self.ply += 1;
        undo
    }

    /// Undo the most recent `do_move(mv)`
    pub fn undo_move(&mut self, mv: Move, undo: UndoInfo) {
        self.side_to_move = self.side_to_move.opposite();
        self.ply -= 1;
        let us = self.side_to_move;
        let to = mv.to();

        match mv.from() {
            None => {
                self.board[to.index()] = None;
                self.hands[us.index()].add(mv.drop_piece_type());
            }
            Some(from) => {
                self.board[from.index()] = undo.moved;
                self.board[to.index()] = undo.captured;
                if let Some(captured) = undo.captured {
                    self.hands[us.index()].remove(captured.piece_type);
                }
            }
        }

        self.key = undo.previous_key;
        self.history.pop();
    }

    /// Apply a move after checking it against the legal move list
    pub fn apply_move(&mut self, mv: Move) -> RulesResult<UndoInfo> {
        if !self.is_legal(mv) {
            debug!("rejected illegal move {mv} in {}", self.to_sfen());
            return Err(RulesError::IllegalMove(mv.to_usi()));
        }
        Ok(self.do_move(mv))
    }

    /// Parse a USI move and apply it if legal
    pub fn apply_usi(&mut self, usi: &str) -> RulesResult<Move> {
        let mv = self.parse_move(usi)?;
        self.do_move(mv);
        Ok(mv)
    }

    /// Resolve USI text against the legal move list
    pub fn parse_move(&self, usi: &str) -> RulesResult<Move> {
        let mv = Move::from_usi(usi)?;
        if self.is_legal(mv) {
            Ok(mv)
        } else {
            Err(RulesError::IllegalMove(usi.to_string()))
        }
    }

    /// Is `mv` a member of the current legal move list?
    pub fn is_legal(&self, mv: Move) -> bool {
        self.legal_moves().contains(&mv)
    }
}
