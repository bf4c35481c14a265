use std::env;
use std::path::PathBuf;

use dirs_next::home_dir;

/// Tokens that name "the directory I am in" and cannot be trusted once the
/// CLI runs in a separately spawned process.
const CURRENT_DIRECTORY_TOKENS: [&str; 3] = [".", "./", ".\\"];

pub fn expand_tilde(path: &str) -> PathBuf {
    let p = path.trim();
    if p == "~" {
        return home_dir().unwrap_or_else(|| PathBuf::from("~"));
    }
    if let Some(rest) = p.strip_prefix("~/") {
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    if let Some(rest) = p.strip_prefix("~\\") {
        // Windows-style
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    PathBuf::from(p)
}

/// Resolve a caller-supplied working directory into the path handed to the CLI.
///
/// `.` and `./` become this process's current directory; `~` prefixes are
/// expanded. Nothing is checked for existence here.
pub fn resolve_working_directory(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    if CURRENT_DIRECTORY_TOKENS.contains(&trimmed) {
        return env::current_dir().unwrap_or_else(|_| PathBuf::from(trimmed));
    }
    expand_tilde(trimmed)
}
