use chess::{Board, ChessMove};
use std::path::{Path, PathBuf};

use crate::errors::Result;
use crate::strength::configure_strength;
use crate::uci_session::{AnalysisLine, UciSession};

/// A running engine subprocess configured for one (executable path,
/// rating) pair.
///
/// This is the only persistent state machine in the system:
/// {absent} -> start() -> {running, configured} -> stop() -> {absent}.
/// A rating or path change requires stop-then-start; `ensure_session`
/// implements that transition without leaking a subprocess handle.
pub struct EngineSession {
    path: PathBuf,
    rating: i32,
    strength_mode: String,
    uci: UciSession,
}

impl EngineSession {
    /// Spawn the engine, apply the strength configuration for `rating`,
    /// and wait until it is ready for requests. On any failure the
    /// subprocess is torn down by drop before the error propagates.
    pub fn start(path: impl Into<PathBuf>, rating: i32) -> Result<Self> {
        let path = path.into();
        let mut uci = UciSession::spawn(&path)?;
        let strength_mode = configure_strength(&mut uci, rating)?;
        uci.wait_ready()?;
        Ok(Self {
            path,
            rating,
            strength_mode,
            uci,
        })
    }

    /// Whether this session already matches the requested configuration
    pub fn matches(&self, path: &Path, rating: i32) -> bool {
        self.path == path && self.rating == rating
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rating(&self) -> i32 {
        self.rating
    }

    /// Description of the strength mode actually applied, e.g.
    /// "UCI_Elo=1350" or "Skill Level=5"
    pub fn strength_mode(&self) -> &str {
        &self.strength_mode
    }

    pub fn analyze(&mut self, board: &Board, think_ms: u64, lines: usize) -> Result<Vec<AnalysisLine>> {
        self.uci.analyze(board, think_ms, lines)
    }

    pub fn bestmove(&mut self, board: &Board, think_ms: u64) -> Result<ChessMove> {
        self.uci.bestmove(board, think_ms)
    }

    /// Orderly shutdown of the subprocess
    pub fn stop(self) -> Result<()> {
        self.uci.quit()
    }
}

/// Hand out a session matching (path, rating), stopping and replacing a
/// live session whose configuration differs. The caller owns the slot;
/// there is never more than one live subprocess behind it.
pub fn ensure_session<'a>(
    slot: &'a mut Option<EngineSession>,
    path: &Path,
    rating: i32,
) -> Result<&'a mut EngineSession> {
    if slot.as_ref().is_some_and(|s| !s.matches(path, rating)) {
        if let Some(old) = slot.take() {
            old.stop()?;
        }
    }

    match slot.take() {
        Some(session) => Ok(slot.insert(session)),
        None => Ok(slot.insert(EngineSession::start(path, rating)?)),
    }
}
