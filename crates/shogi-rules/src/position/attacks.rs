//! Piece movement patterns and attack detection
//!
//! Patterns are written from Black's point of view (forward = rank - 1) and
//! rotated for White by negating both deltas.

use crate::types::{Color, Piece, PieceType, Square};

use super::{Board, Position};

/// (file delta, rank delta)
pub(crate) type Delta = (i8, i8);

const KING_STEPS: &[Delta] = &[(-1, -1), (0, -1), (1, -1), (-1, 0), (1, 0), (-1, 1), (0, 1), (1, 1)];
const GOLD_STEPS: &[Delta] = &[(-1, -1), (0, -1), (1, -1), (-1, 0), (1, 0), (0, 1)];
const SILVER_STEPS: &[Delta] = &[(-1, -1), (0, -1), (1, -1), (-1, 1), (1, 1)];
const KNIGHT_STEPS: &[Delta] = &[(-1, -2), (1, -2)];
const PAWN_STEPS: &[Delta] = &[(0, -1)];
const ORTHOGONAL: &[Delta] = &[(0, -1), (-1, 0), (1, 0), (0, 1)];
const DIAGONAL: &[Delta] = &[(-1, -1), (1, -1), (-1, 1), (1, 1)];
const LANCE_RAY: &[Delta] = &[(0, -1)];
const NONE: &[Delta] = &[];

/// Single-step (or jump) deltas of a piece, Black orientation
pub(crate) fn step_deltas(piece: Piece) -> &'static [Delta] {
    match (piece.piece_type, piece.promoted) {
        (PieceType::King, _) => KING_STEPS,
        (PieceType::Rook, true) => DIAGONAL,
        (PieceType::Bishop, true) => ORTHOGONAL,
        (PieceType::Rook | PieceType::Bishop | PieceType::Lance, false) => NONE,
        (PieceType::Gold, _) | (_, true) => GOLD_STEPS,
        (PieceType::Silver, false) => SILVER_STEPS,
        (PieceType::Knight, false) => KNIGHT_STEPS,
        (PieceType::Pawn, false) => PAWN_STEPS,
    }
}

/// Sliding ray directions of a piece, Black orientation
pub(crate) fn slide_deltas(piece: Piece) -> &'static [Delta] {
    match (piece.piece_type, piece.promoted) {
        (PieceType::Rook, _) => ORTHOGONAL,
        (PieceType::Bishop, _) => DIAGONAL,
        (PieceType::Lance, false) => LANCE_RAY,
        _ => NONE,
    }
}

/// Rotate a Black-oriented delta for `color`
#[inline]
pub(crate) fn oriented(delta: Delta, color: Color) -> Delta {
    match color {
        Color::Black => delta,
        Color::White => (-delta.0, -delta.1),
    }
}

/// Does `piece` standing next to a square reach it with direction `dir` in one step?
fn steps_along(piece: Piece, dir: Delta) -> bool {
    step_deltas(piece).iter().any(|&d| oriented(d, piece.color) == dir)
}

fn slides_along(piece: Piece, dir: Delta) -> bool {
    slide_deltas(piece).iter().any(|&d| oriented(d, piece.color) == dir)
}

/// Is `target` attacked by any piece of `by`?
///
/// Scans outward from the target along the eight king directions and checks
/// knight jumps separately.
pub(crate) fn is_attacked(board: &Board, target: Square, by: Color) -> bool {
    for &(df, dr) in KING_STEPS {
        let mut distance = 1;
        let mut cursor = target.offset(df, dr);
        while let Some(sq) = cursor {
            if let Some(piece) = board[sq.index()] {
                if piece.color == by {
                    // the attacker moves toward the target: opposite direction
                    let toward = (-df, -dr);
                    if slides_along(piece, toward) || (distance == 1 && steps_along(piece, toward)) {
                        return true;
                    }
                }
                break;
            }
            distance += 1;
            cursor = sq.offset(df, dr);
        }
    }

    KNIGHT_STEPS.iter().any(|&d| {
        let (df, dr) = oriented(d, by);
        target.offset(-df, -dr).and_then(|sq| board[sq.index()])
            == Some(Piece::new(PieceType::Knight, by))
    })
}

pub(crate) fn king_square(board: &Board, color: Color) -> Option<Square> {
    let king = Piece::new(PieceType::King, color);
    Square::all().find(|sq| board[sq.index()] == Some(king))
}

impl Position {
    /// Is the side to move in check?
    pub fn in_check(&self) -> bool {
        self.is_in_check(self.side_to_move)
    }

    /// Is `color`'s king attacked? False when that king is not on the board.
    pub fn is_in_check(&self, color: Color) -> bool {
        self.king_square(color)
            .is_some_and(|ksq| is_attacked(&self.board, ksq, color.opposite()))
    }

    /// Is `sq` attacked by `by`?
    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        is_attacked(&self.board, sq, by)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_pawn_attacks_forward_only() {
        let mut pos = Position::empty();
        pos.put_piece(sq("5e"), Piece::new(PieceType::Pawn, Color::Black));
        assert!(pos.is_square_attacked(sq("5d"), Color::Black));
        assert!(!pos.is_square_attacked(sq("5f"), Color::Black));

        pos.put_piece(sq("3c"), Piece::new(PieceType::Pawn, Color::White));
        assert!(pos.is_square_attacked(sq("3d"), Color::White));
        assert!(!pos.is_square_attacked(sq("3b"), Color::White));
    }

    #[test]
    fn test_lance_blocked_by_piece() {
        let mut pos = Position::empty();
        pos.put_piece(sq("1i"), Piece::new(PieceType::Lance, Color::Black));
        assert!(pos.is_square_attacked(sq("1a"), Color::Black));
        pos.put_piece(sq("1e"), Piece::new(PieceType::Pawn, Color::White));
        assert!(pos.is_square_attacked(sq("1e"), Color::Black));
        assert!(!pos.is_square_attacked(sq("1d"), Color::Black));
    }

    #[test]
    fn test_knight_jumps() {
        let mut pos = Position::empty();
        pos.put_piece(sq("5e"), Piece::new(PieceType::Knight, Color::Black));
        assert!(pos.is_square_attacked(sq("4c"), Color::Black));
        assert!(pos.is_square_attacked(sq("6c"), Color::Black));
        assert!(!pos.is_square_attacked(sq("4g"), Color::Black));

        pos.put_piece(sq("5a"), Piece::new(PieceType::Knight, Color::White));
        assert!(pos.is_square_attacked(sq("4c"), Color::White));
        assert!(pos.is_square_attacked(sq("6c"), Color::White));
    }

    #[test]
    fn test_dragon_steps_diagonally() {
        let mut pos = Position::empty();
        pos.put_piece(sq("5e"), Piece::promoted(PieceType::Rook, Color::Black));
        assert!(pos.is_square_attacked(sq("4d"), Color::Black));
        assert!(!pos.is_square_attacked(sq("3c"), Color::Black));
        assert!(pos.is_square_attacked(sq("5a"), Color::Black));
    }

    #[test]
    fn test_in_check_from_bishop() {
        let mut pos = Position::empty();
        pos.put_piece(sq("5i"), Piece::new(PieceType::King, Color::Black));
        pos.put_piece(sq("1e"), Piece::new(PieceType::Bishop, Color::White));
        assert!(pos.in_check());
        pos.put_piece(sq("3g"), Piece::new(PieceType::Gold, Color::Black));
        assert!(!pos.in_check());
    }
}
