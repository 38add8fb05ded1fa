//! # Chess Hint
//!
//! A command-line chess assistant that turns any UCI engine (typically
//! Stockfish) into a ranked move-suggestion service and a rating-limited
//! sparring partner.
//!
//! ## Features
//!
//! - **Engine discovery**: explicit path override or a `PATH` search, with
//!   actionable guidance when no engine is installed
//! - **Approximate strength**: a requested rating is clamped into the
//!   engine's advertised `UCI_Elo` range, with a `Skill Level` fallback
//! - **Ranked suggestions**: multi-PV analysis condensed into SAN +
//!   coordinate moves with centipawn evaluations (absent on forced mates)
//! - **Console play**: move entry in SAN or coordinate notation, hints,
//!   undo, move log, and PGN export
//!
//! All rules, legality and notation handling are delegated to the
//! [`chess`] crate; move selection is delegated to the engine subprocess.
//!
//! ## Quick Start
//!
//! ```no_run
//! use chess::Board;
//! use chess_hint::{ensure_session, locate_engine, suggest_moves};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engine_path = locate_engine(None)?;
//!
//! let mut slot = None;
//! let session = ensure_session(&mut slot, &engine_path, 1000)?;
//! println!("engine strength: {}", session.strength_mode());
//!
//! let pack = suggest_moves(session, &Board::default(), 200, 3)?;
//! for line in &pack.lines {
//!     println!("{}) {} ({})", line.rank, line.move_san, line.move_uci);
//! }
//! # Ok(())
//! # }
//! ```

// Core modules
pub mod errors;

// Re-export commonly used types
pub use errors::ChessHintError;

pub mod engine_locator;
pub mod engine_session;
pub mod game_session;
pub mod move_input;
pub mod san;
pub mod strength;
pub mod suggestion;
pub mod uci_session;

pub use engine_locator::{locate_engine, DEFAULT_ENGINE_NAME};
pub use engine_session::{ensure_session, EngineSession};
pub use game_session::{ascii_board, GameState, MoveLog, LOG_DISPLAY_WINDOW};
pub use move_input::{normalize_move_text, parse_user_move};
pub use san::to_san;
pub use strength::{clamp_rating, configure_strength, StrengthControl, DEFAULT_SKILL_LEVEL};
pub use suggestion::{engine_reply, suggest_moves, EngineReply, Suggestion, SuggestionPack};
pub use uci_session::{AnalysisLine, SearchScore, UciOption, UciSession};
