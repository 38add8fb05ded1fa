use chess::{Board, ChessMove, MoveGen};
use std::str::FromStr;

use crate::errors::{ChessHintError, Result};
use crate::san;

/// Normalize free-text move input: trim, map digit-zero castling to the
/// letter-O form, and case-fold piece letters ("nf3" -> "Nf3").
///
/// A leading lowercase 'b' is left alone: it is also a file letter, and
/// uppercasing it would turn pawn captures like "bxc3" into bishop moves.
/// Idempotent: normalizing already-normalized text returns it unchanged.
pub fn normalize_move_text(input: &str) -> String {
    let text = input.trim();
    let text = text.replace("0-0-0", "O-O-O").replace("0-0", "O-O");

    let mut chars = text.chars();
    match chars.next() {
        Some(first) if matches!(first, 'K' | 'Q' | 'B' | 'N' | 'R' | 'k' | 'q' | 'n' | 'r') => {
            let mut out = String::with_capacity(text.len());
            out.push(first.to_ascii_uppercase());
            out.extend(chars.map(|c| c.to_ascii_lowercase()));
            out
        }
        _ => text,
    }
}

/// Interpret free-text user input as a move in the given position.
///
/// Coordinate notation is tried first (unambiguous, cheap to validate),
/// then algebraic notation; each candidate is accepted only if legal in
/// the current position. The two grammars do not overlap for legal
/// moves, so the ordering never changes the meaning of a valid SAN
/// string.
pub fn parse_user_move(board: &Board, input: &str) -> Result<ChessMove> {
    let text = normalize_move_text(input);

    if let Ok(candidate) = ChessMove::from_str(&text) {
        if board.legal(candidate) {
            return Ok(candidate);
        }
    }

    if let Ok(candidate) = ChessMove::from_san(board, &text) {
        if board.legal(candidate) {
            return Ok(candidate);
        }
    }

    // The rules library's SAN parser rejects some well-formed spellings
    // (castling, promotions), so match the input against the rendered
    // SAN of each legal move as well. Suffixes are cosmetic for lookup.
    let wanted = text.trim_end_matches(|c: char| matches!(c, '+' | '#' | '!' | '?'));
    for candidate in MoveGen::new_legal(board) {
        let rendered = san::to_san(board, candidate);
        if rendered.trim_end_matches(|c: char| matches!(c, '+' | '#')) == wanted {
            return Ok(candidate);
        }
    }

    Err(ChessHintError::InvalidMove(format!(
        "'{}' is not a legal move here. Enter algebraic notation (e4, Nf3) \
         or coordinate notation (e2e4, g1f3).",
        input.trim()
    )))
}
