//! Piece values and piece-square tables
//!
//! All tables are written from Black's (先手) viewpoint: the first row is
//! rank a (White's back rank), the last row rank i, and each row runs from
//! file 9 to file 1, the same layout as a SFEN board string. White reads the
//! table through `Square::flip`.

use shogi_rules::{Color, Piece, PieceType, Square};

/// Material value of unpromoted pieces, indexed by `PieceType::as_index`
/// (King, Rook, Bishop, Gold, Silver, Knight, Lance, Pawn)
pub const PIECE_VALUES: [i32; 8] = [0, 1100, 950, 600, 550, 450, 350, 100];

/// Material value of promoted pieces (竜, 馬, 成銀, 成桂, 成香, と).
/// King and Gold cannot promote and keep their base value.
pub const PROMOTED_PIECE_VALUES: [i32; 8] = [0, 1500, 1300, 600, 600, 600, 600, 600];

#[rustfmt::skip]
const KING_PST: [i32; 81] = [
    -80, -80, -80, -80, -80, -80, -80, -80, -80,
    -70, -70, -70, -70, -70, -70, -70, -70, -70,
    -60, -60, -60, -60, -60, -60, -60, -60, -60,
    -50, -50, -50, -50, -50, -50, -50, -50, -50,
    -40, -40, -40, -40, -40, -40, -40, -40, -40,
    -25, -25, -25, -30, -30, -30, -25, -25, -25,
    -10,  -5,  -5, -10, -15, -10,  -5,  -5, -10,
      0,  10,  15,   5,   0,   5,  15,  10,   0,
      5,  15,  10,   0,  -5,   0,  10,  15,   5,
];

#[rustfmt::skip]
const ROOK_PST: [i32; 81] = [
     30,  30,  30,  30,  30,  30,  30,  30,  30,
     35,  35,  35,  35,  35,  35,  35,  35,  35,
     25,  25,  25,  25,  25,  25,  25,  25,  25,
      5,   5,   5,   5,   5,   5,   5,   5,   5,
      0,   0,   0,   5,   5,   5,   0,   0,   0,
      0,   0,   0,   5,   5,   5,   0,   0,   0,
      0,   0,   0,   0,   0,   0,   0,   0,   0,
      0,   5,   5,   5,   5,   5,   5,   5,   0,
      0,   0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const BISHOP_PST: [i32; 81] = [
     10,   5,   5,   5,   5,   5,   5,   5,  10,
      5,  20,  10,  10,  10,  10,  10,  20,   5,
      5,  10,  20,  15,  15,  15,  20,  10,   5,
      0,   5,  10,  20,  15,  20,  10,   5,   0,
      0,   5,  10,  15,  25,  15,  10,   5,   0,
      0,   5,  10,  20,  15,  20,  10,   5,   0,
      0,  10,  15,  10,  10,  10,  15,  10,   0,
      0,  15,  10,   5,   5,   5,  10,  15,   0,
      0,   0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const GOLD_PST: [i32; 81] = [
     10,  15,  15,  15,  15,  15,  15,  15,  10,
     10,  20,  20,  20,  20,  20,  20,  20,  10,
      5,  15,  15,  15,  15,  15,  15,  15,   5,
      0,   5,  10,  10,  10,  10,  10,   5,   0,
     -5,   0,   5,   5,   5,   5,   5,   0,  -5,
     -5,   0,   5,   5,   5,   5,   5,   0,  -5,
     -5,   5,  10,  10,  10,  10,  10,   5,  -5,
     -5,   5,  15,  10,   5,  10,  15,   5,  -5,
    -10,   0,   5,   5,   0,   5,   5,   0, -10,
];

#[rustfmt::skip]
const SILVER_PST: [i32; 81] = [
      0,   5,   5,   5,   5,   5,   5,   5,   0,
      5,  15,  15,  15,  15,  15,  15,  15,   5,
      5,  15,  20,  20,  20,  20,  20,  15,   5,
      0,  10,  15,  20,  20,  20,  15,  10,   0,
      0,   5,  15,  15,  20,  15,  15,   5,   0,
      0,   5,  10,  15,  15,  15,  10,   5,   0,
     -5,   5,  10,  10,  10,  10,  10,   5,  -5,
    -10,   0,   5,   5,   5,   5,   5,   0, -10,
    -15,  -5,   0,   0,   0,   0,   0,  -5, -15,
];

#[rustfmt::skip]
const KNIGHT_PST: [i32; 81] = [
      0,   0,   0,   0,   0,   0,   0,   0,   0,
      0,   0,   0,   0,   0,   0,   0,   0,   0,
      5,  15,  20,  20,  20,  20,  20,  15,   5,
      0,  10,  15,  20,  20,  20,  15,  10,   0,
     -5,   5,  10,  15,  15,  15,  10,   5,  -5,
    -10,   0,   5,   5,  10,   5,   5,   0, -10,
    -15,  -5,   0,   0,   0,   0,   0,  -5, -15,
    -20, -10,  -5,  -5,  -5,  -5,  -5, -10, -20,
    -10,  -5,  -5,  -5,  -5,  -5,  -5,  -5, -10,
];

#[rustfmt::skip]
const LANCE_PST: [i32; 81] = [
      0,   0,   0,   0,   0,   0,   0,   0,   0,
     10,   5,   5,   5,   5,   5,   5,   5,  10,
     10,   5,   5,   5,   5,   5,   5,   5,  10,
      5,   0,   0,   0,   0,   0,   0,   0,   5,
      0,   0,   0,   0,   0,   0,   0,   0,   0,
      0,   0,   0,   0,   0,   0,   0,   0,   0,
      0,   0,   0,   0,   0,   0,   0,   0,   0,
      5,   0,   0,   0,   0,   0,   0,   0,   5,
     10,   0,   0,   0,   0,   0,   0,   0,  10,
];

#[rustfmt::skip]
const PAWN_PST: [i32; 81] = [
      0,   0,   0,   0,   0,   0,   0,   0,   0,
     30,  30,  30,  30,  30,  30,  30,  30,  30,
     25,  25,  25,  25,  25,  25,  25,  25,  25,
     15,  15,  15,  20,  20,  20,  15,  15,  15,
     10,  10,  10,  15,  15,  15,  10,  10,  10,
      5,   5,   5,  10,  10,  10,   5,   5,   5,
      0,   0,   0,   0,   0,   0,   0,   0,   0,
      0,   0,   0,   0,   0,   0,   0,   0,   0,
      0,   0,   0,   0,   0,   0,   0,   0,   0,
];

/// Material value of a piece on the board
#[inline]
pub fn piece_value(piece: Piece) -> i32 {
    let idx = piece.piece_type.as_index();
    if piece.promoted {
        PROMOTED_PIECE_VALUES[idx]
    } else {
        PIECE_VALUES[idx]
    }
}

/// Material value of a piece held in hand (always unpromoted)
#[inline]
pub fn hand_value(pt: PieceType) -> i32 {
    PIECE_VALUES[pt.as_index()]
}

/// Table used for a piece. 成銀・成桂・成香・と share the gold table,
/// 竜 and 馬 stay on the rook and bishop tables.
fn table_for(piece: Piece) -> &'static [i32; 81] {
    match (piece.piece_type, piece.promoted) {
        (PieceType::King, _) => &KING_PST,
        (PieceType::Rook, _) => &ROOK_PST,
        (PieceType::Bishop, _) => &BISHOP_PST,
        (PieceType::Gold, _) => &GOLD_PST,
        (_, true) => &GOLD_PST,
        (PieceType::Silver, false) => &SILVER_PST,
        (PieceType::Knight, false) => &KNIGHT_PST,
        (PieceType::Lance, false) => &LANCE_PST,
        (PieceType::Pawn, false) => &PAWN_PST,
    }
}

/// Positional bonus for `piece` standing on `sq`, from the owner's viewpoint
#[inline]
pub fn pst_bonus(piece: Piece, sq: Square) -> i32 {
    let oriented = match piece.color {
        Color::Black => sq,
        Color::White => sq.flip(),
    };
    table_for(piece)[oriented.index()]
}
