use chess::{Board, ChessMove, Color};
use chess_hint::{
    ascii_board, engine_reply, ensure_session, locate_engine, parse_user_move, suggest_moves,
    ChessHintError, EngineSession, GameState, SuggestionPack, LOG_DISPLAY_WINDOW,
};
use clap::{Arg, ArgAction, Command};
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::str::FromStr;

fn main() {
    let matches = Command::new("chess-hint")
        .version("0.1.0")
        .about("Ranked Stockfish move suggestions and rating-limited play over UCI")
        .arg(
            Arg::new("fen")
                .long("fen")
                .value_name("FEN")
                .help("Position to analyze (FEN string, quoted)"),
        )
        .arg(
            Arg::new("rating")
                .long("rating")
                .value_name("ELO")
                .help("Desired engine strength; clamped into the engine's supported range")
                .value_parser(clap::value_parser!(i32).range(100..=4000))
                .default_value("1000"),
        )
        .arg(
            Arg::new("think_ms")
                .long("think-ms")
                .value_name("MILLISECONDS")
                .help("Time budget per engine request")
                .value_parser(clap::value_parser!(u64).range(20..=60000))
                .default_value("200"),
        )
        .arg(
            Arg::new("engine")
                .long("engine")
                .value_name("PATH")
                .help("Explicit engine executable (otherwise PATH is searched for stockfish)"),
        )
        .arg(
            Arg::new("lines")
                .long("lines")
                .value_name("COUNT")
                .help("How many candidate lines to show")
                .value_parser(clap::value_parser!(usize))
                .default_value("3"),
        )
        .arg(
            Arg::new("play")
                .long("play")
                .help("Play against the engine in the console instead of a one-shot suggestion")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("start_fen")
                .long("start-fen")
                .value_name("FEN")
                .help("Initial position for --play (default: the standard start)"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the one-shot suggestion pack as JSON")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let rating = *matches.get_one::<i32>("rating").unwrap();
    let think_ms = *matches.get_one::<u64>("think_ms").unwrap();
    let lines = *matches.get_one::<usize>("lines").unwrap();

    let play = matches.get_flag("play");
    let fen = matches.get_one::<String>("fen");
    if !play && fen.is_none() {
        eprintln!("error: --fen is required unless --play is used");
        std::process::exit(2);
    }

    let engine_path = match locate_engine(matches.get_one::<String>("engine").map(String::as_str))
    {
        Ok(path) => path,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    if play {
        let start_fen = matches.get_one::<String>("start_fen").map(String::as_str);
        if let Err(e) = play_console(&engine_path, rating, think_ms, lines, start_fen) {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
        return;
    }

    let fen = fen.unwrap();
    let json = matches.get_flag("json");
    if let Err(e) = run_one_shot(&engine_path, fen, rating, think_ms, lines, json) {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}

fn run_one_shot(
    engine_path: &Path,
    fen: &str,
    rating: i32,
    think_ms: u64,
    lines: usize,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let board = Board::from_str(fen).map_err(|e| format!("bad FEN '{}': {}", fen, e))?;

    let mut slot = None;
    let session = ensure_session(&mut slot, engine_path, rating)?;
    let pack = suggest_moves(session, &board, think_ms, lines)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&pack)?);
    } else {
        print_suggestions(&pack);
    }

    if let Some(session) = slot.take() {
        session.stop()?;
    }
    Ok(())
}

fn print_suggestions(pack: &SuggestionPack) {
    println!("[engine] strength: {}, think_ms={}", pack.mode, pack.think_ms);
    if pack.lines.is_empty() {
        println!("No suggestions available.");
        return;
    }
    for line in &pack.lines {
        let eval = match line.score_cp {
            Some(cp) => format!("Eval(cp): {:+}", cp),
            None => "Eval: mate/unknown".to_string(),
        };
        println!(
            "{}) SAN: {:6} | UCI: {:6} | {}",
            line.rank, line.move_san, line.move_uci, eval
        );
    }
}

fn play_console(
    engine_path: &Path,
    rating: i32,
    think_ms: u64,
    lines: usize,
    start_fen: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut game = match start_fen {
        Some(fen) => GameState::from_fen(fen)?,
        None => GameState::new(),
    };

    let mut slot = None;
    let session = ensure_session(&mut slot, engine_path, rating)?;
    println!(
        "[engine] strength: {}, think_ms={}",
        session.strength_mode(),
        think_ms
    );
    println!("Enter moves in SAN (e4, Nf3) or coordinate notation (e2e4, g1f3).");
    println!("Commands: hint, play <n>, engine, undo, new, log, pgn, save, quit");

    let stdin = io::stdin();
    'game: while !game.is_over() {
        println!("\n{}", ascii_board(game.current()));
        println!("Turn: {}", side_name(game.current().side_to_move()));
        print!("Your move> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break; // stdin closed
        }
        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let mut words = input.split_whitespace();
        let command = words.next().unwrap_or("").to_ascii_lowercase();
        match command.as_str() {
            "q" | "quit" | "exit" => break 'game,
            "new" => {
                game.reset();
                println!("New game.");
            }
            "undo" => {
                if !game.undo() {
                    println!("Nothing to undo.");
                }
            }
            "log" => {
                for entry in game.log().recent(LOG_DISPLAY_WINDOW) {
                    println!("{}", entry);
                }
                if game.log().is_empty() {
                    println!("No moves yet.");
                }
            }
            "pgn" => print!("{}", game.generate_pgn("You", "Engine")),
            "save" => {
                let filename = format!(
                    "chess_hint_{}.pgn",
                    game.started_at().format("%Y%m%d_%H%M%S")
                );
                std::fs::write(&filename, game.generate_pgn("You", "Engine"))?;
                println!("📁 Game saved to {}", filename);
            }
            "hint" => match suggest_moves(session, game.current(), think_ms, lines) {
                Ok(pack) => {
                    print_suggestions(&pack);
                    game.store_suggestions(&pack.lines);
                }
                Err(e) if e.is_validation() => println!("❌ {}", e),
                Err(e) => return Err(e.into()),
            },
            "play" => {
                let rank = match words.next().and_then(|w| w.parse::<usize>().ok()) {
                    Some(rank) => rank,
                    None => {
                        println!("Usage: play <n> (after asking for hints)");
                        continue;
                    }
                };
                match game.take_suggestion(rank) {
                    Ok(chosen) => {
                        apply_user_move(&mut game, chosen);
                        if !game.is_over() {
                            engine_turn_reporting(&mut game, session, think_ms)?;
                        }
                    }
                    Err(e) if e.is_validation() => println!("❌ {}", e),
                    Err(e) => return Err(e.into()),
                }
            }
            "engine" => engine_turn_reporting(&mut game, session, think_ms)?,
            _ => match parse_user_move(game.current(), input) {
                Ok(chosen) => {
                    apply_user_move(&mut game, chosen);
                    if !game.is_over() {
                        engine_turn_reporting(&mut game, session, think_ms)?;
                    }
                }
                // bad move text never aborts the session
                Err(e) => println!("❌ {}", e),
            },
        }
    }

    if game.is_over() {
        println!("\n{}", ascii_board(game.current()));
        if let Some(result) = game.result_string() {
            println!("🏁 Game over: {}", result);
        }
        println!("\n{}", game.generate_pgn("You", "Engine"));

        print!("Save PGN to a file? [y/N] ");
        io::stdout().flush()?;
        let mut answer = String::new();
        if stdin.lock().read_line(&mut answer)? > 0 && answer.trim().eq_ignore_ascii_case("y") {
            let filename = format!(
                "chess_hint_{}.pgn",
                game.started_at().format("%Y%m%d_%H%M%S")
            );
            std::fs::write(&filename, game.generate_pgn("You", "Engine"))?;
            println!("📁 Game saved to {}", filename);
        }
    }

    if let Some(session) = slot.take() {
        session.stop()?;
    }
    Ok(())
}

fn apply_user_move(game: &mut GameState, chess_move: ChessMove) {
    let uci = chess_move.to_string();
    match game.play_move(chess_move) {
        Ok(san) => {
            println!("You: {} ({})", san, uci);
            game.record(format!("you: {} ({})", san, uci));
        }
        Err(e) => println!("❌ {}", e),
    }
}

/// Validation failures are reported and the session continues; anything
/// else propagates and ends the game loop.
fn engine_turn_reporting(
    game: &mut GameState,
    session: &mut EngineSession,
    think_ms: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    match engine_turn(game, session, think_ms) {
        Ok(()) => Ok(()),
        Err(e) if e.is_validation() => {
            println!("❌ {}", e);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn engine_turn(
    game: &mut GameState,
    session: &mut EngineSession,
    think_ms: u64,
) -> Result<(), ChessHintError> {
    let reply = engine_reply(session, game.current(), think_ms)?;
    game.play_move(reply.chess_move)?;
    println!("🤖 Engine: {} ({})", reply.move_san, reply.move_uci);
    game.record(format!(
        "engine: {} ({}) [{}]",
        reply.move_san, reply.move_uci, reply.mode
    ));
    Ok(())
}

fn side_name(color: Color) -> &'static str {
    match color {
        Color::White => "White",
        Color::Black => "Black",
    }
}
