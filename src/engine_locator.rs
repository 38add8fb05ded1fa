use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::errors::{ChessHintError, Result};

/// Conventional executable name searched for when no explicit path is given
pub const DEFAULT_ENGINE_NAME: &str = "stockfish";

/// Resolve a usable engine executable path.
///
/// An explicit path wins unconditionally; starting the subprocess surfaces
/// any problem with it. Otherwise every directory on `PATH` is searched for
/// the conventional name, and an absent engine fails here rather than
/// inside the subprocess-start call.
pub fn locate_engine(explicit: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(PathBuf::from(path));
    }

    let path_var = env::var_os("PATH").unwrap_or_default();
    search_path(DEFAULT_ENGINE_NAME, &path_var).ok_or_else(|| {
        ChessHintError::EngineNotFound(format!(
            "'{}' is not on PATH. Install it (e.g. `brew install stockfish` or \
             `apt install stockfish`) or pass an explicit path with --engine /path/to/stockfish",
            DEFAULT_ENGINE_NAME
        ))
    })
}

/// Scan a PATH-style value for an executable with the given name.
fn search_path(name: &str, path_var: &OsStr) -> Option<PathBuf> {
    for dir in env::split_paths(path_var) {
        if dir.as_os_str().is_empty() {
            continue;
        }
        let candidate = dir.join(name);
        if is_executable(&candidate) {
            return Some(candidate);
        }
        #[cfg(windows)]
        {
            let candidate = dir.join(format!("{}.exe", name));
            if is_executable(&candidate) {
                return Some(candidate);
            }
        }
    }
    None
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins_unconditionally() {
        let path = locate_engine(Some("/nonexistent/engine/binary")).unwrap();
        assert_eq!(path, PathBuf::from("/nonexistent/engine/binary"));
    }

    #[test]
    fn empty_path_value_finds_nothing() {
        assert!(search_path("stockfish", OsStr::new("")).is_none());
    }

    #[test]
    fn missing_engine_reports_remediation() {
        let err = search_path("no-such-engine-binary", OsStr::new("/nonexistent-dir"));
        assert!(err.is_none());

        // The user-facing failure names both remediation routes
        match locate_engine(None) {
            Ok(_) => {} // a real stockfish on PATH is fine too
            Err(e) => {
                let msg = e.to_string();
                assert!(msg.contains("--engine"));
                assert!(msg.contains("stockfish"));
            }
        }
    }

    #[cfg(unix)]
    #[test]
    fn path_search_requires_execute_bit() {
        use std::fs;
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("stockfish");
        fs::write(&exe, "#!/bin/sh\n").unwrap();

        // Plain file without the execute bit is not a usable engine
        fs::set_permissions(&exe, fs::Permissions::from_mode(0o644)).unwrap();
        assert!(search_path("stockfish", dir.path().as_os_str()).is_none());

        fs::set_permissions(&exe, fs::Permissions::from_mode(0o755)).unwrap();
        let found = search_path("stockfish", dir.path().as_os_str()).unwrap();
        assert_eq!(found, exe);
    }
}
