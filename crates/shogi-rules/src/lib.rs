//! # shogi-rules
//!
//! 将棋のルールエンジン。探索コア（`shogi-search`）からはブラックボックスとして扱う。
//!
//! ## モジュール構成
//!
//! - `types`: 基本型（Color, Square, PieceType, Piece, Hand）
//! - `moves`: 指し手表現（Move, MoveList）
//! - `position`: 局面表現と do_move/undo_move、王手・千日手判定、SFEN
//! - `movegen`: 合法手生成（二歩・行き所のない駒・打ち歩詰めを含む）
//! - `usi`: USI 表記のエラー型と平手初期局面

pub mod error;
pub mod movegen;
pub mod moves;
pub mod position;
pub mod types;
pub mod usi;

pub use error::{RulesError, RulesResult};
pub use moves::{Move, MoveList};
pub use position::{Position, UndoInfo};
pub use types::{Color, Hand, Piece, PieceType, Square};
pub use usi::{STARTPOS_SFEN, UsiParseError};
