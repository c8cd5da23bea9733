//! # shogi-search
//!
//! 時間制限付きの αβ 探索コア。局面・合法手・王手判定は `shogi-rules` に任せる。
//!
//! ## モジュール構成
//!
//! - `eval`: 駒割り + 駒位置評価（PST）。先手（Black）視点のセンチポーン
//! - `ordering`: 取る駒の価値・成り・王手による指し手オーダリング
//! - `limits`: 探索予算（時間・深さ・ノード数・停止フラグ）
//! - `alpha_beta`: ミニマックス αβ 探索（打ち切りは `Result` で伝播）
//! - `driver`: 反復深化と `find_best_move`
//! - `selector`: 決定的選択 / 許容幅ランダム選択
//! - `config`: TOML から読む探索設定
//! - `prethink`: 別スレッドでの先読み（キャンセル可能）

pub mod alpha_beta;
pub mod config;
pub mod driver;
pub mod eval;
pub mod limits;
pub mod ordering;
pub mod prethink;
pub mod selector;

pub use alpha_beta::{INFINITY_SCORE, MATE_SCORE, Searcher};
pub use config::{PolicyKind, SearchConfig};
pub use driver::{SearchReport, find_best_move};
pub use eval::{Evaluator, MaterialEvaluator, PieceSquareEvaluator, evaluate, evaluate_for};
pub use limits::SearchBudget;
pub use ordering::{ScoredMove, order_moves};
pub use prethink::Prethink;
pub use selector::{MoveSelector, Selection, SelectionPolicy};
