use std::fmt;

/// Custom error types for the hint engine.
///
/// Variants split into two families so callers can pick a policy without
/// inspecting message text: environment failures (missing executable,
/// subprocess trouble) and validation failures (bad user input, positions
/// the engine must not be asked about). `is_validation` tells them apart.
#[derive(Debug, Clone)]
pub enum ChessHintError {
    /// No usable engine executable could be resolved
    EngineNotFound(String),
    /// Engine subprocess failed to start or shut down
    Launch(String),
    /// Engine subprocess I/O or protocol failure
    Communication(String),
    /// Invalid FEN or otherwise unusable position
    InvalidPosition(String),
    /// User move text that is not a legal move in the current position
    InvalidMove(String),
    /// Operation requested on a position where the game has already ended
    GameOver(String),
    /// Stored suggestion is no longer legal because the position changed
    StaleSuggestion(String),
}

impl ChessHintError {
    /// Expected, recoverable rejection of user input or request context.
    /// Everything else is an environment failure.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ChessHintError::InvalidPosition(_)
                | ChessHintError::InvalidMove(_)
                | ChessHintError::GameOver(_)
                | ChessHintError::StaleSuggestion(_)
        )
    }
}

impl fmt::Display for ChessHintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChessHintError::EngineNotFound(msg) => write!(f, "Engine not found: {}", msg),
            ChessHintError::Launch(msg) => write!(f, "Launch error: {}", msg),
            ChessHintError::Communication(msg) => write!(f, "Communication error: {}", msg),
            ChessHintError::InvalidPosition(msg) => write!(f, "Invalid position: {}", msg),
            ChessHintError::InvalidMove(msg) => write!(f, "Invalid move: {}", msg),
            ChessHintError::GameOver(msg) => write!(f, "Game over: {}", msg),
            ChessHintError::StaleSuggestion(msg) => write!(f, "Stale suggestion: {}", msg),
        }
    }
}

impl std::error::Error for ChessHintError {}

// Convenience type alias
pub type Result<T> = std::result::Result<T, ChessHintError>;

// Convert from common error types
impl From<std::io::Error> for ChessHintError {
    fn from(error: std::io::Error) -> Self {
        ChessHintError::Communication(error.to_string())
    }
}

impl From<chess::Error> for ChessHintError {
    fn from(error: chess::Error) -> Self {
        ChessHintError::InvalidPosition(error.to_string())
    }
}
