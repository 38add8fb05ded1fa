use chess::{Board, BoardStatus, ChessMove, Color, File, Piece, Rank, Square};
use chrono::{DateTime, Utc};
use std::str::FromStr;

use crate::errors::{ChessHintError, Result};
use crate::san;
use crate::suggestion::Suggestion;

/// How many log entries the console shows at once. Storage is unbounded.
pub const LOG_DISPLAY_WINDOW: usize = 20;

/// Append-only log of human-readable move descriptions
#[derive(Debug, Clone, Default)]
pub struct MoveLog {
    entries: Vec<String>,
}

impl MoveLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, entry: impl Into<String>) {
        self.entries.push(entry.into());
    }

    /// The most recent `n` entries, oldest first
    pub fn recent(&self, n: usize) -> &[String] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// State of one console game: board history (undo pops one ply), the
/// applied moves, the move log, and any suggestions fetched for the
/// current position.
///
/// Stored suggestions are cleared on every position change; applying one
/// later still re-validates it against the current board.
pub struct GameState {
    history: Vec<Board>,
    moves: Vec<ChessMove>,
    log: MoveLog,
    suggestions: Vec<Suggestion>,
    start_time: DateTime<Utc>,
}

impl GameState {
    pub fn new() -> Self {
        Self::with_board(Board::default())
    }

    pub fn with_board(board: Board) -> Self {
        Self {
            history: vec![board],
            moves: Vec::new(),
            log: MoveLog::new(),
            suggestions: Vec::new(),
            start_time: Utc::now(),
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self> {
        let board = Board::from_str(fen)
            .map_err(|e| ChessHintError::InvalidPosition(format!("bad FEN '{}': {}", fen, e)))?;
        Ok(Self::with_board(board))
    }

    pub fn current(&self) -> &Board {
        self.history.last().unwrap_or(&self.history[0])
    }

    /// Validate and apply a move, returning its SAN rendering (computed
    /// before the move, the only position it is valid against).
    pub fn play_move(&mut self, chess_move: ChessMove) -> Result<String> {
        let board = *self.current();
        if !board.legal(chess_move) {
            return Err(ChessHintError::InvalidMove(format!(
                "'{}' is not legal in the current position",
                chess_move
            )));
        }
        let san = san::to_san(&board, chess_move);
        self.history.push(board.make_move_new(chess_move));
        self.moves.push(chess_move);
        self.suggestions.clear();
        Ok(san)
    }

    /// Take back one ply. Never pops past the initial position.
    pub fn undo(&mut self) -> bool {
        if self.history.len() > 1 {
            self.history.pop();
            self.moves.pop();
            self.suggestions.clear();
            true
        } else {
            false
        }
    }

    /// Back to the initial position, dropping moves, log and suggestions
    pub fn reset(&mut self) {
        self.history.truncate(1);
        self.moves.clear();
        self.log.clear();
        self.suggestions.clear();
        self.start_time = Utc::now();
    }

    pub fn log(&self) -> &MoveLog {
        &self.log
    }

    pub fn record(&mut self, entry: impl Into<String>) {
        self.log.record(entry);
    }

    pub fn store_suggestions(&mut self, lines: &[Suggestion]) {
        self.suggestions = lines.to_vec();
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    /// Pick a stored suggestion by rank, re-validating it against the
    /// current position. A suggestion that no longer applies is reported
    /// as stale and the stored lines are discarded.
    pub fn take_suggestion(&mut self, rank: usize) -> Result<ChessMove> {
        let stored = self
            .suggestions
            .iter()
            .find(|s| s.rank == rank)
            .map(|s| (s.move_uci.clone(), s.move_san.clone()))
            .ok_or_else(|| {
                ChessHintError::InvalidMove(format!(
                    "no stored suggestion with rank {}; ask for hints first",
                    rank
                ))
            })?;

        let (uci, san_text) = stored;
        match ChessMove::from_str(&uci) {
            Ok(m) if self.current().legal(m) => Ok(m),
            _ => {
                self.suggestions.clear();
                Err(ChessHintError::StaleSuggestion(format!(
                    "suggestion {} ({}) is no longer legal; the position changed",
                    san_text, uci
                )))
            }
        }
    }

    pub fn status(&self) -> BoardStatus {
        self.current().status()
    }

    pub fn is_over(&self) -> bool {
        self.status() != BoardStatus::Ongoing
    }

    /// PGN-style result tag for a finished game
    pub fn result_string(&self) -> Option<String> {
        match self.status() {
            BoardStatus::Ongoing => None,
            BoardStatus::Stalemate => Some("1/2-1/2".to_string()),
            BoardStatus::Checkmate => Some(match self.current().side_to_move() {
                Color::White => "0-1".to_string(),
                Color::Black => "1-0".to_string(),
            }),
        }
    }

    pub fn moves_played(&self) -> usize {
        self.moves.len()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Render the game as PGN, replaying SAN from the initial position
    pub fn generate_pgn(&self, white: &str, black: &str) -> String {
        let result = self.result_string().unwrap_or_else(|| "*".to_string());

        let mut pgn = String::new();
        pgn.push_str("[Event \"chess-hint console game\"]\n");
        pgn.push_str("[Site \"chess-hint CLI\"]\n");
        pgn.push_str(&format!("[Date \"{}\"]\n", self.start_time.format("%Y.%m.%d")));
        pgn.push_str("[Round \"1\"]\n");
        pgn.push_str(&format!("[White \"{}\"]\n", white));
        pgn.push_str(&format!("[Black \"{}\"]\n", black));
        if self.history[0] != Board::default() {
            pgn.push_str("[SetUp \"1\"]\n");
            pgn.push_str(&format!("[FEN \"{}\"]\n", self.history[0]));
        }
        pgn.push_str(&format!("[Result \"{}\"]\n\n", result));

        let mut board = self.history[0];
        let mut number = 1;
        for (i, chess_move) in self.moves.iter().enumerate() {
            let white_to_move = board.side_to_move() == Color::White;
            if white_to_move {
                pgn.push_str(&format!("{}. ", number));
            } else if i == 0 {
                pgn.push_str(&format!("{}... ", number));
            }

            pgn.push_str(&san::to_san(&board, *chess_move));
            board = board.make_move_new(*chess_move);

            if white_to_move {
                pgn.push(' ');
            } else {
                number += 1;
                pgn.push('\n');
            }
        }

        pgn.push_str(&result);
        pgn.push('\n');
        pgn
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// Plain-text board for the console, white at the bottom
pub fn ascii_board(board: &Board) -> String {
    let mut out = String::new();
    for rank_index in (0..8).rev() {
        out.push((b'1' + rank_index as u8) as char);
        out.push(' ');
        for file_index in 0..8 {
            let square = Square::make_square(
                Rank::from_index(rank_index),
                File::from_index(file_index),
            );
            match (board.piece_on(square), board.color_on(square)) {
                (Some(piece), Some(color)) => {
                    let glyph = match piece {
                        Piece::Pawn => 'P',
                        Piece::Knight => 'N',
                        Piece::Bishop => 'B',
                        Piece::Rook => 'R',
                        Piece::Queen => 'Q',
                        Piece::King => 'K',
                    };
                    out.push(if color == Color::White {
                        glyph
                    } else {
                        glyph.to_ascii_lowercase()
                    });
                }
                _ => out.push('.'),
            }
            if file_index < 7 {
                out.push(' ');
            }
        }
        out.push('\n');
    }
    out.push_str("  a b c d e f g h");
    out
}
