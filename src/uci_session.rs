use chess::{Board, ChessMove};
use std::collections::HashMap;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::str::FromStr;

use crate::errors::{ChessHintError, Result};

/// UCI option types an engine can advertise during the `uci` handshake
#[derive(Debug, Clone, PartialEq)]
pub enum UciOption {
    Check { default: bool },
    Spin { default: i32, min: i32, max: i32 },
    Combo { default: String, choices: Vec<String> },
    Button,
    String { default: String },
}

/// Engine score for one line of analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchScore {
    /// Centipawns from the side to move's perspective
    Centipawns(i32),
    /// Moves to mate (positive if the side to move is winning)
    Mate(i32),
}

impl SearchScore {
    /// Numeric centipawn value, or `None` for forced mates. The mate
    /// sentinel never leaves this module.
    pub fn centipawns(self) -> Option<i32> {
        match self {
            SearchScore::Centipawns(cp) => Some(cp),
            SearchScore::Mate(_) => None,
        }
    }
}

/// One ranked line from a multi-PV analysis
#[derive(Debug, Clone)]
pub struct AnalysisLine {
    /// Engine rank, 1-based (`multipv` index; 1 when the engine omits it)
    pub multipv: usize,
    pub depth: u32,
    pub score: Option<SearchScore>,
    pub pv: Vec<ChessMove>,
}

/// Handle to a running UCI engine subprocess.
///
/// All requests take `&mut self`: the engine serializes one pending call
/// at a time and the borrow checker enforces that discipline for us.
pub struct UciSession {
    child: Child,
    stdin: BufWriter<ChildStdin>,
    stdout: BufReader<ChildStdout>,
    options: HashMap<String, UciOption>,
    multipv: usize,
}

impl UciSession {
    /// Start the engine subprocess and run the `uci`/`uciok` handshake,
    /// recording every advertised option.
    pub fn spawn(path: &Path) -> Result<Self> {
        let mut child = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                ChessHintError::Launch(format!(
                    "failed to start engine '{}': {}",
                    path.display(),
                    e
                ))
            })?;

        let stdin = BufWriter::new(child.stdin.take().ok_or_else(|| {
            ChessHintError::Launch("failed to get stdin handle for engine process".to_string())
        })?);
        let stdout = BufReader::new(child.stdout.take().ok_or_else(|| {
            ChessHintError::Launch("failed to get stdout handle for engine process".to_string())
        })?);

        let mut session = Self {
            child,
            stdin,
            stdout,
            options: HashMap::new(),
            multipv: 1,
        };
        session.handshake()?;
        Ok(session)
    }

    fn handshake(&mut self) -> Result<()> {
        self.send_command("uci")?;
        loop {
            let line = self.read_line()?;
            if line == "uciok" {
                break;
            }
            if let Some((name, option)) = parse_option_line(&line) {
                self.options.insert(name, option);
            }
        }
        self.wait_ready()
    }

    /// Look up an option advertised by the engine
    pub fn option(&self, name: &str) -> Option<&UciOption> {
        self.options.get(name)
    }

    pub fn options(&self) -> &HashMap<String, UciOption> {
        &self.options
    }

    pub fn set_option(&mut self, name: &str, value: &str) -> Result<()> {
        self.send_command(&format!("setoption name {} value {}", name, value))
    }

    /// `isready`/`readyok` barrier
    pub fn wait_ready(&mut self) -> Result<()> {
        self.send_command("isready")?;
        loop {
            if self.read_line()? == "readyok" {
                return Ok(());
            }
        }
    }

    /// Analyze a position for up to `think_ms` milliseconds, requesting
    /// `lines` independent best lines. Returns the deepest line seen per
    /// rank, sorted by rank ascending.
    pub fn analyze(&mut self, board: &Board, think_ms: u64, lines: usize) -> Result<Vec<AnalysisLine>> {
        let lines = lines.max(1);
        if lines != self.multipv && self.options.contains_key("MultiPV") {
            self.set_option("MultiPV", &lines.to_string())?;
            self.multipv = lines;
        }

        self.send_command(&format!("position fen {}", board))?;
        self.send_command(&format!("go movetime {}", think_ms))?;

        let mut deepest: HashMap<usize, AnalysisLine> = HashMap::new();
        loop {
            let line = self.read_line()?;
            if line.starts_with("bestmove") {
                break;
            }
            if let Some(parsed) = parse_info_line(&line) {
                let keep = deepest
                    .get(&parsed.multipv)
                    .map_or(true, |prev| parsed.depth >= prev.depth);
                if keep {
                    deepest.insert(parsed.multipv, parsed);
                }
            }
        }

        let mut collected: Vec<AnalysisLine> = deepest.into_values().collect();
        collected.sort_by_key(|l| l.multipv);
        collected.truncate(lines);
        Ok(collected)
    }

    /// Search for up to `think_ms` milliseconds and return the move the
    /// engine would play.
    pub fn bestmove(&mut self, board: &Board, think_ms: u64) -> Result<ChessMove> {
        self.send_command(&format!("position fen {}", board))?;
        self.send_command(&format!("go movetime {}", think_ms))?;
        loop {
            let line = self.read_line()?;
            if line.starts_with("bestmove") {
                return parse_bestmove_line(&line);
            }
        }
    }

    /// Orderly shutdown: `quit` and reap the child
    pub fn quit(mut self) -> Result<()> {
        self.send_command("quit")?;
        self.child
            .wait()
            .map_err(|e| ChessHintError::Launch(format!("failed to close engine: {}", e)))?;
        Ok(())
    }

    fn send_command(&mut self, command: &str) -> Result<()> {
        writeln!(self.stdin, "{}", command)
            .map_err(|e| ChessHintError::Communication(format!("send failed: {}", e)))?;
        self.stdin
            .flush()
            .map_err(|e| ChessHintError::Communication(format!("flush failed: {}", e)))?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        let read = self
            .stdout
            .read_line(&mut line)
            .map_err(|e| ChessHintError::Communication(format!("read failed: {}", e)))?;
        if read == 0 {
            return Err(ChessHintError::Communication(
                "engine terminated unexpectedly".to_string(),
            ));
        }
        Ok(line.trim().to_string())
    }
}

impl Drop for UciSession {
    fn drop(&mut self) {
        let _ = self.send_command("quit");
        let _ = self.child.wait();
    }
}

/// Parse one `option name <name> type <type> ...` handshake line.
/// Option names can contain spaces ("Skill Level", "Clear Hash").
fn parse_option_line(line: &str) -> Option<(String, UciOption)> {
    let rest = line.trim().strip_prefix("option ")?.strip_prefix("name ")?;
    let type_at = rest.find(" type ")?;
    let name = rest[..type_at].trim().to_string();
    let body = &rest[type_at + " type ".len()..];
    let mut tokens = body.split_whitespace();
    let kind = tokens.next()?;
    let tail = body[kind.len()..].trim();

    let option = match kind {
        "check" => UciOption::Check {
            default: tail.strip_prefix("default ").map(str::trim) == Some("true"),
        },
        "spin" => {
            let mut default = 0;
            let mut min = 0;
            let mut max = 0;
            let toks: Vec<&str> = tail.split_whitespace().collect();
            let mut i = 0;
            while i < toks.len() {
                match toks[i] {
                    "default" if i + 1 < toks.len() => {
                        default = toks[i + 1].parse().ok()?;
                        i += 2;
                    }
                    "min" if i + 1 < toks.len() => {
                        min = toks[i + 1].parse().ok()?;
                        i += 2;
                    }
                    "max" if i + 1 < toks.len() => {
                        max = toks[i + 1].parse().ok()?;
                        i += 2;
                    }
                    _ => i += 1,
                }
            }
            UciOption::Spin { default, min, max }
        }
        "combo" => {
            let mut pieces = tail.split(" var ");
            let default = pieces
                .next()
                .and_then(|p| p.trim().strip_prefix("default "))
                .unwrap_or("")
                .trim()
                .to_string();
            let choices = pieces.map(|c| c.trim().to_string()).collect();
            UciOption::Combo { default, choices }
        }
        "button" => UciOption::Button,
        "string" => UciOption::String {
            default: tail
                .strip_prefix("default")
                .map(str::trim)
                .unwrap_or("")
                .to_string(),
        },
        _ => return None,
    };
    Some((name, option))
}

/// Parse one `info ...` search line into an analysis line. Lines that
/// carry no score and no principal variation (periodic node counters,
/// `currmove` progress, `info string` chatter) yield `None`.
fn parse_info_line(line: &str) -> Option<AnalysisLine> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.first() != Some(&"info") {
        return None;
    }

    let mut depth = 0u32;
    let mut multipv = 1usize;
    let mut score = None;
    let mut pv = Vec::new();

    let mut i = 1;
    while i < tokens.len() {
        match tokens[i] {
            "depth" if i + 1 < tokens.len() => {
                depth = tokens[i + 1].parse().ok()?;
                i += 2;
            }
            "multipv" if i + 1 < tokens.len() => {
                multipv = tokens[i + 1].parse().ok()?;
                i += 2;
            }
            "score" if i + 2 < tokens.len() => {
                score = match tokens[i + 1] {
                    "cp" => tokens[i + 2].parse().ok().map(SearchScore::Centipawns),
                    "mate" => tokens[i + 2].parse().ok().map(SearchScore::Mate),
                    _ => None,
                };
                i += 3;
            }
            "pv" => {
                for tok in &tokens[i + 1..] {
                    match ChessMove::from_str(tok) {
                        Ok(m) => pv.push(m),
                        Err(_) => break,
                    }
                }
                i = tokens.len();
            }
            "string" => return None,
            _ => i += 1,
        }
    }

    if score.is_none() && pv.is_empty() {
        return None;
    }
    Some(AnalysisLine {
        multipv,
        depth,
        score,
        pv,
    })
}

fn parse_bestmove_line(line: &str) -> Result<ChessMove> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    match parts.get(1) {
        None | Some(&"(none)") => Err(ChessHintError::Communication(format!(
            "engine returned no playable move: '{}'",
            line
        ))),
        Some(text) => ChessMove::from_str(text).map_err(|_| {
            ChessHintError::Communication(format!("engine returned unparseable move '{}'", text))
        }),
    }
}
