//! Legal move generation
//!
//! Pseudo-legal moves are generated piece by piece from the mailbox board and
//! filtered by playing them on a scratch copy of the board. Drop rules:
//! - 二歩: no second unpromoted pawn on a file
//! - 行き所のない駒: pawns/lances not on the last rank, knights not on the last two
//! - 打ち歩詰め: a pawn drop must not deliver checkmate

use crate::moves::{Move, MoveList};
use crate::position::{
    Board, Position, is_attacked, king_square, oriented, slide_deltas, step_deltas,
};
use crate::types::{Color, Piece, PieceType, Square};

/// Generate all legal moves for the side to move
pub fn generate_legal(pos: &Position, moves: &mut MoveList) {
    let mut pseudo = MoveList::new();
    generate_pseudo_legal(pos, &mut pseudo);
    moves.extend(pseudo.into_iter().filter(|&mv| is_pseudo_legal_move_legal(pos, mv)));
}

/// Moves obeying piece movement, promotion and drop placement rules, possibly
/// leaving the own king in check
pub fn generate_pseudo_legal(pos: &Position, moves: &mut MoveList) {
    let us = pos.side_to_move();

    for (from, piece) in pos.pieces().filter(|(_, p)| p.color == us) {
        for &delta in step_deltas(piece) {
            let (df, dr) = oriented(delta, us);
            let Some(to) = from.offset(df, dr) else {
                continue;
            };
            if pos.piece_at(to).is_none_or(|p| p.color != us) {
                push_board_move(moves, us, piece, from, to);
            }
        }
        for &delta in slide_deltas(piece) {
            let (df, dr) = oriented(delta, us);
            let mut cursor = from.offset(df, dr);
            while let Some(to) = cursor {
                match pos.piece_at(to) {
                    Some(p) if p.color == us => break,
                    Some(_) => {
                        push_board_move(moves, us, piece, from, to);
                        break;
                    }
                    None => push_board_move(moves, us, piece, from, to),
                }
                cursor = to.offset(df, dr);
            }
        }
    }

    for (pt, _) in pos.hand(us).iter() {
        for to in Square::all().filter(|&sq| pos.piece_at(sq).is_none()) {
            if !drop_has_future(pt, us, to) {
                continue;
            }
            if pt == PieceType::Pawn && has_pawn_on_file(pos, us, to.file()) {
                continue;
            }
            moves.push(Move::drop(pt, to));
        }
    }
}

/// Normal move plus its promotion variants
fn push_board_move(moves: &mut MoveList, us: Color, piece: Piece, from: Square, to: Square) {
    let may_promote = !piece.promoted
        && piece.piece_type.can_promote()
        && (us.in_promotion_zone(from) || us.in_promotion_zone(to));

    if !must_promote(piece, us, to) {
        moves.push(Move::normal(from, to, false));
    }
    if may_promote {
        moves.push(Move::normal(from, to, true));
    }
}

/// Unpromoted pawn/lance on the last rank or knight on the last two ranks could never move again
fn must_promote(piece: Piece, us: Color, to: Square) -> bool {
    !piece.promoted && !drop_has_future(piece.piece_type, us, to)
}

fn drop_has_future(pt: PieceType, us: Color, to: Square) -> bool {
    let rank = us.relative_rank(to);
    match pt {
        PieceType::Pawn | PieceType::Lance => rank >= 1,
        PieceType::Knight => rank >= 2,
        _ => true,
    }
}

fn has_pawn_on_file(pos: &Position, us: Color, file: u8) -> bool {
    let pawn = Piece::new(PieceType::Pawn, us);
    (0..9).any(|rank| pos.piece_at(Square::new(file, rank)) == Some(pawn))
}

/// Play `mv` on a scratch board and look at the own king
fn leaves_king_safe(pos: &Position, mv: Move) -> bool {
    let us = pos.side_to_move();
    let mut board: Board = pos.board;
    match mv.from() {
        None => board[mv.to().index()] = Some(Piece::new(mv.drop_piece_type(), us)),
        Some(from) => {
            let moving = board[from.index()].take();
            board[mv.to().index()] = moving;
        }
    }
    match king_square(&board, us) {
        Some(ksq) => !is_attacked(&board, ksq, us.opposite()),
        None => true,
    }
}

fn is_pseudo_legal_move_legal(pos: &Position, mv: Move) -> bool {
    if !leaves_king_safe(pos, mv) {
        return false;
    }
    !(mv.is_drop() && mv.drop_piece_type() == PieceType::Pawn && is_pawn_drop_mate(pos, mv))
}

/// 打ち歩詰め判定
fn is_pawn_drop_mate(pos: &Position, mv: Move) -> bool {
    let us = pos.side_to_move();
    let them = us.opposite();
    let (df, dr) = oriented((0, -1), us);
    let gives_check = mv.to().offset(df, dr).is_some_and(|sq| pos.king_square(them) == Some(sq));
    if !gives_check {
        return false;
    }
    let mut next = pos.clone();
    next.do_move(mv);
    next.legal_moves().is_empty()
}

impl Position {
    /// All legal moves, board moves first (by source square) then drops
    pub fn legal_moves(&self) -> MoveList {
        let mut moves = MoveList::new();
        generate_legal(self, &mut moves);
        moves
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startpos_has_30_moves() {
        let pos = Position::startpos();
        assert_eq!(pos.legal_moves().len(), 30);
    }

    #[test]
    fn test_must_promote_pawn_on_last_rank() {
        let pos = Position::from_sfen("4k4/1P7/9/9/9/9/9/9/4K4 b - 1").unwrap();
        let pawn_moves: Vec<String> = pos
            .legal_moves()
            .iter()
            .map(|m| m.to_usi())
            .filter(|u| u.starts_with("8b8a"))
            .collect();
        assert_eq!(pawn_moves, vec!["8b8a+".to_string()]);
    }

    #[test]
    fn test_knight_must_promote_on_last_two_ranks() {
        let pos = Position::from_sfen("4k4/9/9/4N4/9/9/9/9/4K4 b - 1").unwrap();
        let knight: Vec<String> = pos
            .legal_moves()
            .iter()
            .filter(|m| m.from().map(|s| s.to_string()) == Some("5d".to_string()))
            .map(|m| m.to_usi())
            .collect();
        assert_eq!(knight, vec!["5d6b+".to_string(), "5d4b+".to_string()]);
    }

    #[test]
    fn test_optional_promotion_generates_both() {
        let pos = Position::from_sfen("4k4/9/9/1S7/9/9/9/9/4K4 b - 1").unwrap();
        let usi: Vec<String> = pos.legal_moves().iter().map(|m| m.to_usi()).collect();
        assert!(usi.contains(&"8d8c".to_string()));
        assert!(usi.contains(&"8d8c+".to_string()));
        // retreating outside the zone from outside the zone cannot promote
        assert!(usi.contains(&"8d7e".to_string()));
        assert!(!usi.contains(&"8d7e+".to_string()));
    }

    #[test]
    fn test_nifu_forbidden() {
        let pos = Position::from_sfen("4k4/9/9/9/9/9/4P4/9/4K4 b P 1").unwrap();
        let drops: Vec<String> = pos
            .legal_moves()
            .iter()
            .filter(|m| m.is_drop())
            .map(|m| m.to_usi())
            .collect();
        assert!(!drops.iter().any(|u| u.starts_with("P*5")));
        assert!(drops.contains(&"P*4e".to_string()));
        // no pawn drops on the last rank
        assert!(!drops.contains(&"P*4a".to_string()));
    }

    #[test]
    fn test_pinned_piece_cannot_leave_line() {
        // 5i king, 5h gold pinned by the rook on 5a
        let pos = Position::from_sfen("4r4/9/9/9/9/9/9/4G4/4K4 b - 1").unwrap();
        let gold_moves: Vec<String> = pos
            .legal_moves()
            .iter()
            .filter(|m| m.from().map(|s| s.to_string()) == Some("5h".to_string()))
            .map(|m| m.to_usi())
            .collect();
        assert_eq!(gold_moves, vec!["5h5g".to_string()]);
    }
}
