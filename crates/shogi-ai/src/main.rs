// Command line front end: best move, evaluation, interactive play and self-play

mod session;
mod settings;

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, info};
use session::{GameSession, Reply};
use settings::SearchArgs;
use shogi_rules::Position;
use shogi_search::{MoveSelector, SearchConfig, Selection, evaluate};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(flatten)]
    search: SearchArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the move the engine would play
    Bestmove {
        /// SFEN of the position, or "startpos"
        #[arg(long, default_value = "startpos")]
        sfen: String,

        /// USI moves played from the position
        #[arg(long, num_args = 0..)]
        moves: Vec<String>,
    },
    /// Print the static evaluation (Black's point of view)
    Eval {
        #[arg(long, default_value = "startpos")]
        sfen: String,

        #[arg(long, num_args = 0..)]
        moves: Vec<String>,
    },
    /// Play against the engine on stdin/stdout
    Play {
        #[arg(long, default_value = "startpos")]
        sfen: String,

        /// The engine moves first
        #[arg(long)]
        ai_first: bool,
    },
    /// Let the engine play against itself
    Selfplay {
        #[arg(long, default_value_t = 20)]
        plies: u32,

        #[arg(long, default_value = "startpos")]
        sfen: String,
    },
}

fn main() {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, log_level),
    )
    .format(|buf, record| writeln!(buf, "[{}] {}: {}", record.level(), record.target(), record.args()))
    .write_style(env_logger::WriteStyle::Never)
    .target(env_logger::Target::Stderr)
    .init();

    if let Err(e) = run(args) {
        log::error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = args.search.resolve()?;
    match args.command {
        Command::Bestmove { sfen, moves } => {
            let mut pos = build_position(&sfen, &moves)?;
            let mut selector = MoveSelector::new(config);
            match selector.select(&mut pos) {
                Selection::NoLegalMoves => println!("resign"),
                selection => {
                    if let Selection::Searched { score, .. } = selection {
                        info!("score {score}");
                    }
                    if let Some(mv) = selection.mv() {
                        println!("{}", mv.to_usi());
                    }
                }
            }
        }
        Command::Eval { sfen, moves } => {
            let pos = build_position(&sfen, &moves)?;
            println!("{}", evaluate(&pos));
        }
        Command::Play { sfen, ai_first } => {
            let pos = build_position(&sfen, &[])?;
            play(pos, config, ai_first)?;
        }
        Command::Selfplay { plies, sfen } => {
            let pos = build_position(&sfen, &[])?;
            selfplay(pos, config, plies)?;
        }
    }
    Ok(())
}

fn build_position(sfen: &str, moves: &[String]) -> Result<Position> {
    let mut pos = if sfen == "startpos" {
        Position::startpos()
    } else {
        Position::from_sfen(sfen).with_context(|| format!("invalid sfen: {sfen}"))?
    };
    for usi in moves {
        pos.apply_usi(usi).with_context(|| format!("cannot play {usi}"))?;
    }
    Ok(pos)
}

/// Read moves from stdin, one per line, and answer each
fn play(pos: Position, config: SearchConfig, ai_first: bool) -> Result<()> {
    let mut session = GameSession::new(pos, config);
    let stdout = io::stdout();
    play_loop(&mut session, io::stdin().lock(), stdout.lock(), ai_first)?;
    debug!("play loop finished at ply {}", session.position().ply());
    Ok(())
}

/// Besides USI moves the loop accepts `hint`, `sfen` and `quit`.
fn play_loop<R: BufRead, W: Write>(
    session: &mut GameSession,
    input: R,
    mut out: W,
    ai_first: bool,
) -> Result<()> {
    if ai_first {
        let reply = session.ai_move()?;
        write_reply(&mut out, session, reply)?;
        out.flush()?;
    }

    for line in input.lines() {
        let line = line.context("failed to read stdin")?;
        match line.trim() {
            "" => continue,
            "quit" => break,
            "sfen" => writeln!(out, "{}", session.position().to_sfen())?,
            "hint" => match session.hint() {
                Some(mv) => writeln!(out, "{}", mv.to_usi())?,
                None => writeln!(out, "none")?,
            },
            usi => {
                let reply = session.handle_move(usi)?;
                write_reply(&mut out, session, reply)?;
            }
        }
        out.flush()?;
    }
    Ok(())
}

/// An engine move that ends the game is followed by `gameover`
fn write_reply<W: Write>(out: &mut W, session: &GameSession, reply: Reply) -> io::Result<()> {
    writeln!(out, "{reply}")?;
    if matches!(reply, Reply::Move(_)) && session.is_over() {
        writeln!(out, "gameover")?;
    }
    Ok(())
}

fn selfplay(mut pos: Position, config: SearchConfig, plies: u32) -> Result<()> {
    let mut selector = MoveSelector::new(config);
    for _ in 0..plies {
        match selector.play(&mut pos)? {
            Selection::NoLegalMoves => {
                println!("resign");
                break;
            }
            selection => {
                if let Some(mv) = selection.mv() {
                    println!("{}", mv.to_usi());
                }
            }
        }
        if pos.is_repetition() {
            println!("draw");
            break;
        }
    }
    info!("final position: {}", pos.to_sfen());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_config() -> SearchConfig {
        SearchConfig {
            time_ms: 0,
            max_depth: 1,
            seed: Some(1),
            prethink: false,
            ..SearchConfig::default()
        }
    }

    fn transcript(sfen: &str, input: &str, ai_first: bool) -> Vec<String> {
        let pos = build_position(sfen, &[]).unwrap();
        let mut session = GameSession::new(pos, quick_config());
        let mut out = Vec::new();
        play_loop(&mut session, input.as_bytes(), &mut out, ai_first).unwrap();
        String::from_utf8(out).unwrap().lines().map(str::to_string).collect()
    }

    #[test]
    fn test_ai_first_mate_prints_gameover() {
        let lines = transcript("8k/9/6NG1/9/9/9/9/9/4K4 b GP 1", "", true);
        assert_eq!(lines.len(), 2, "{lines:?}");
        assert_eq!(lines[1], "gameover");
    }

    #[test]
    fn test_illegal_then_resign() {
        let lines = transcript("8k/9/6NG1/9/9/9/9/9/4K4 b GP 1", "5i6i6i\nG*1b\n7g7f\n", false);
        assert_eq!(lines, ["illegal", "resign", "gameover"]);
    }

    #[test]
    fn test_quit_stops_reading() {
        let lines = transcript("startpos", "sfen\nquit\n7g7f\n", false);
        assert_eq!(lines, [Position::startpos().to_sfen()]);
    }
}
