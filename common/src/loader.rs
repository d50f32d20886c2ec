//! Newline-delimited list files (hosts, usernames, passwords).

use std::path::Path;

use anyhow::Context;

/// Reads `path` into an ordered list, one entry per non-blank line.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected, since
/// password lists frequently mix encodings.
pub fn read_lines(path: impl AsRef<Path>) -> anyhow::Result<Vec<String>> {
    let path = path.as_ref();
    let bytes: Vec<u8> = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(parse_lines(&String::from_utf8_lossy(&bytes)))
}

/// Splits `content` into lines, dropping line endings and blank lines.
///
/// Non-blank lines are kept verbatim: leading or trailing spaces inside a
/// password are significant.
pub fn parse_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_owned)
        .collect()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
