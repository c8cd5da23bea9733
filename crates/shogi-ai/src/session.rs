//! 対局セッション
//!
//! プレイヤーの手を受け取り、合法なら指して AI の応手を返す。
//! AI が指した後は相手の手番中に先読み（prethink）を走らせる。

use std::fmt;

use log::{debug, info, warn};
use shogi_rules::{Move, Position, RulesResult};
use shogi_search::{MoveSelector, Prethink, SearchConfig, Searcher, Selection};

/// Answer to one player input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reply {
    /// AI's answer
    Move(Move),
    /// AI has no legal move
    Resign,
    /// Player's move was rejected; nothing changed
    Illegal,
    /// Player's move repeated the position
    Draw,
    /// The game has already ended
    GameOver,
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Move(mv) => write!(f, "{}", mv.to_usi()),
            Reply::Resign => f.write_str("resign"),
            Reply::Illegal => f.write_str("illegal"),
            Reply::Draw => f.write_str("draw"),
            Reply::GameOver => f.write_str("gameover"),
        }
    }
}

pub struct GameSession {
    pos: Position,
    selector: MoveSelector,
    prethink: Option<Prethink>,
    over: bool,
}

impl GameSession {
    pub fn new(pos: Position, config: SearchConfig) -> Self {
        GameSession {
            pos,
            selector: MoveSelector::new(config),
            prethink: None,
            over: false,
        }
    }

    #[inline]
    pub fn position(&self) -> &Position {
        &self.pos
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.over
    }

    pub fn is_prethinking(&self) -> bool {
        self.prethink.is_some()
    }

    /// Play the player's move and answer it
    pub fn handle_move(&mut self, usi: &str) -> RulesResult<Reply> {
        if self.over {
            return Ok(Reply::GameOver);
        }
        // 不正な手なら局面も先読みもそのまま
        let mv = match self.pos.parse_move(usi) {
            Ok(mv) => mv,
            Err(e) => {
                debug!("rejected {usi}: {e}");
                return Ok(Reply::Illegal);
            }
        };

        self.stop_prethink();
        self.pos.do_move(mv);
        if self.pos.is_repetition() {
            info!("repetition after {usi}");
            self.over = true;
            return Ok(Reply::Draw);
        }
        self.ai_move()
    }

    /// Let the AI move in the current position
    pub fn ai_move(&mut self) -> RulesResult<Reply> {
        if self.over {
            return Ok(Reply::GameOver);
        }
        self.stop_prethink();

        let selection = self.selector.play(&mut self.pos)?;
        let mv = match selection {
            Selection::NoLegalMoves => {
                self.over = true;
                return Ok(Reply::Resign);
            }
            Selection::Searched { mv, score } => {
                info!("ai move {} score {score}", mv.to_usi());
                mv
            }
            Selection::Random(mv) => {
                info!("ai move {} (random)", mv.to_usi());
                mv
            }
        };

        if self.pos.is_game_over() {
            self.over = true;
        } else if self.selector.config().prethink {
            self.start_prethink();
        }
        Ok(Reply::Move(mv))
    }

    /// Suggest a move for the player
    ///
    /// Uses the running pre-think if it has a result, otherwise searches
    /// with the move budget. The pre-think is restarted afterwards.
    pub fn hint(&mut self) -> Option<Move> {
        if self.over {
            return None;
        }
        let key = self.pos.key();
        let pondered = self
            .prethink
            .take()
            .filter(|p| p.position_key() == key)
            .and_then(Prethink::finish)
            .and_then(|report| report.best_move);

        let hint = pondered.or_else(|| {
            let mut scratch = self.pos.clone();
            let budget = self.selector.config().budget();
            Searcher::new(budget, *self.selector.evaluator()).find_best_move(&mut scratch).best_move
        });
        if self.selector.config().prethink {
            self.start_prethink();
        }
        hint
    }

    fn start_prethink(&mut self) {
        let evaluator = *self.selector.evaluator();
        match Prethink::spawn_with_evaluator(&self.pos, self.selector.config(), evaluator) {
            Ok(prethink) => self.prethink = Some(prethink),
            Err(e) => warn!("failed to start prethink: {e}"),
        }
    }

    fn stop_prethink(&mut self) {
        if let Some(prethink) = self.prethink.take() {
            prethink.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_config(prethink: bool) -> SearchConfig {
        SearchConfig {
            time_ms: 0,
            max_depth: 1,
            seed: Some(1),
            prethink,
            ..SearchConfig::default()
        }
    }

    #[test]
    fn test_illegal_move_changes_nothing() {
        let mut session = GameSession::new(Position::startpos(), quick_config(false));
        let before = session.position().clone();
        for input in ["7g7e", "5a5b", "xx", ""] {
            assert_eq!(session.handle_move(input).unwrap(), Reply::Illegal);
            assert_eq!(session.position(), &before);
        }
        assert!(!session.is_over());
    }

    #[test]
    fn test_illegal_move_keeps_prethink() {
        let mut session = GameSession::new(Position::startpos(), quick_config(true));
        session.handle_move("7g7f").unwrap();
        assert!(session.is_prethinking());
        assert_eq!(session.handle_move("7g7f").unwrap(), Reply::Illegal);
        assert!(session.is_prethinking());
    }

    #[test]
    fn test_legal_move_gets_answer() {
        let mut session = GameSession::new(Position::startpos(), quick_config(true));
        let Reply::Move(mv) = session.handle_move("7g7f").unwrap() else {
            panic!("expected an answer");
        };
        assert!(mv.to_usi().len() >= 4);
        assert_eq!(session.position().ply(), 2);
        assert!(session.is_prethinking());
    }

    #[test]
    fn test_resign_when_mated() {
        let pos = Position::from_sfen("8k/9/6NG1/9/9/9/9/9/4K4 b GP 1").unwrap();
        let mut session = GameSession::new(pos, quick_config(true));
        assert_eq!(session.handle_move("G*1b").unwrap(), Reply::Resign);
        assert!(session.is_over());
        assert!(!session.is_prethinking());
        assert_eq!(session.handle_move("5i5h").unwrap(), Reply::GameOver);
        assert_eq!(session.hint(), None);
    }

    #[test]
    fn test_ai_mates_and_game_ends() {
        let pos = Position::from_sfen("8k/9/6NG1/9/9/9/9/9/4K4 b GP 1").unwrap();
        let mut session = GameSession::new(pos, quick_config(true));
        let reply = session.ai_move().unwrap();
        assert!(matches!(reply, Reply::Move(_)));
        assert!(session.is_over());
        assert!(session.position().is_checkmate());
    }

    #[test]
    fn test_hint_is_legal_for_player() {
        let mut session = GameSession::new(Position::startpos(), quick_config(true));
        session.handle_move("7g7f").unwrap();
        let hint = session.hint().unwrap();
        assert!(session.position().is_legal(hint));
        assert!(session.is_prethinking());
    }

    #[test]
    fn test_reply_display() {
        let mv = Move::from_usi("7g7f").unwrap();
        assert_eq!(Reply::Move(mv).to_string(), "7g7f");
        assert_eq!(Reply::Resign.to_string(), "resign");
        assert_eq!(Reply::Illegal.to_string(), "illegal");
    }
}
