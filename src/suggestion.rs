use chess::{Board, BoardStatus, ChessMove};
use serde::{Deserialize, Serialize};

use crate::engine_session::EngineSession;
use crate::errors::{ChessHintError, Result};
use crate::san;

/// One ranked candidate reply: the move in both textual encodings plus an
/// optional evaluation in centipawns from the side to move's perspective.
/// The evaluation is absent for forced-mate lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    pub rank: usize,
    pub move_uci: String,
    pub move_san: String,
    pub score_cp: Option<i32>,
}

/// The result of one suggestion request: which strength mode was active,
/// how long the engine thought, and the ranked lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionPack {
    pub mode: String,
    pub think_ms: u64,
    pub lines: Vec<Suggestion>,
}

/// A move the engine chose to play. The SAN rendering is computed against
/// the position *before* the move; the caller decides when (and whether)
/// to apply it.
#[derive(Debug, Clone)]
pub struct EngineReply {
    pub chess_move: ChessMove,
    pub move_uci: String,
    pub move_san: String,
    pub mode: String,
}

/// Ask the engine for up to `k` ranked candidate moves in the given
/// position. Lines come back in the engine's own preference order; a line
/// with an empty principal variation is skipped rather than fabricating a
/// move. The position is never mutated.
pub fn suggest_moves(
    session: &mut EngineSession,
    board: &Board,
    think_ms: u64,
    k: usize,
) -> Result<SuggestionPack> {
    reject_finished(board)?;

    let analysis = session.analyze(board, think_ms, k)?;

    let mut lines = Vec::with_capacity(analysis.len());
    for line in &analysis {
        let first = match line.pv.first() {
            Some(m) => *m,
            None => continue,
        };
        // every surfaced suggestion must be legal in the analyzed position
        if !board.legal(first) {
            continue;
        }
        lines.push(Suggestion {
            rank: line.multipv,
            move_uci: first.to_string(),
            move_san: san::to_san(board, first),
            score_cp: line.score.and_then(|s| s.centipawns()),
        });
    }

    Ok(SuggestionPack {
        mode: session.strength_mode().to_string(),
        think_ms,
        lines,
    })
}

/// Ask the engine to choose its reply in the given position. The caller
/// applies the move; SAN is rendered before application since it is only
/// valid relative to this position.
pub fn engine_reply(session: &mut EngineSession, board: &Board, think_ms: u64) -> Result<EngineReply> {
    reject_finished(board)?;

    let chosen = session.bestmove(board, think_ms)?;
    if !board.legal(chosen) {
        return Err(ChessHintError::Communication(format!(
            "engine replied with illegal move '{}'",
            chosen
        )));
    }

    Ok(EngineReply {
        chess_move: chosen,
        move_uci: chosen.to_string(),
        move_san: san::to_san(board, chosen),
        mode: session.strength_mode().to_string(),
    })
}

fn reject_finished(board: &Board) -> Result<()> {
    match board.status() {
        BoardStatus::Ongoing => Ok(()),
        BoardStatus::Checkmate => Err(ChessHintError::GameOver(
            "the game is over (checkmate); nothing to analyze".to_string(),
        )),
        BoardStatus::Stalemate => Err(ChessHintError::GameOver(
            "the game is over (stalemate); nothing to analyze".to_string(),
        )),
    }
}
