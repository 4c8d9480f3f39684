//! Content Sanitizer/Truncator: turns raw file bytes into safe, size-bounded text.
//!
//! Rules are applied in a fixed order:
//! 1. `.env*` files get every value redacted (keys, comments and blank lines survive).
//! 2. Lock-like files keep only their first [`LOCK_MAX_LINES`] lines.
//! 3. Otherwise structured config (`.json`, `.yaml`, `.yml`) keeps [`CONFIG_MAX_LINES`] lines.
//! 4. Anything else passes through, already capped at [`MAX_FILE_BYTES`] on read.
//!
//! Decoding never fails: invalid UTF-8 is replaced with U+FFFD.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use tracing::debug;

use crate::filter::{is_env_file, is_lock_like, is_structured_config};

/// Per-file read ceiling in bytes.
pub const MAX_FILE_BYTES: usize = 512 * 1024;
/// Head-line cap for lock-like files.
pub const LOCK_MAX_LINES: usize = 200;
/// Head-line cap for structured config files.
pub const CONFIG_MAX_LINES: usize = 800;
/// Placeholder substituted for every `.env` value.
pub const ENV_PLACEHOLDER: &str = "<YOUR_VALUE>";
/// Appended whenever content was cut short.
pub const TRUNCATION_MARKER: &str = "\n\n# ...truncated...\n";

/// Decode bytes as UTF-8, replacing invalid sequences.
pub fn decode_lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Redact the value of every `KEY=value` line that is not a comment.
///
/// Idempotent: a line already reading `KEY=<YOUR_VALUE>` is rewritten to itself.
pub fn sanitize_env(text: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    for line in text.lines() {
        let is_comment = line.trim_start().starts_with('#');
        match line.split_once('=') {
            Some((key, _)) if !is_comment && !key.trim().is_empty() => {
                out.push(format!("{}={}", key.trim(), ENV_PLACEHOLDER));
            }
            _ => out.push(line.to_string()),
        }
    }
    let mut joined = out.join("\n");
    if text.ends_with('\n') {
        joined.push('\n');
    }
    joined
}

/// Keep the first `max_lines` lines, appending [`TRUNCATION_MARKER`] if more existed.
pub fn head_lines(text: &str, max_lines: usize) -> String {
    if text.lines().count() <= max_lines {
        return text.to_string();
    }
    let mut head = text.lines().take(max_lines).collect::<Vec<_>>().join("\n");
    head.push_str(TRUNCATION_MARKER);
    head
}

/// Apply the sanitizing rules for `path` to already-decoded text.
pub fn apply_rules(path: &Path, text: String) -> String {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let text = if is_env_file(name) {
        debug!(path = %path.display(), "Redacting env values");
        sanitize_env(&text)
    } else {
        text
    };
    if is_lock_like(path) {
        head_lines(&text, LOCK_MAX_LINES)
    } else if is_structured_config(path) {
        head_lines(&text, CONFIG_MAX_LINES)
    } else {
        text
    }
}

/// Read at most `max_bytes` bytes of `path`.
pub fn read_capped(path: &Path, max_bytes: usize) -> io::Result<Vec<u8>> {
    let file = File::open(path)?;
    let mut buf = Vec::new();
    file.take(max_bytes as u64).read_to_end(&mut buf)?;
    Ok(buf)
}

/// Read a file through the full rule set.
pub fn read_with_rules(path: &Path, max_bytes: usize) -> io::Result<String> {
    let raw = read_capped(path, max_bytes)?;
    Ok(apply_rules(path, decode_lossy(&raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn env_values_are_redacted_keys_and_comments_kept() {
        let input = "# database\nDB_URL=postgres://u:p@h/db\n\nAPI_KEY = secret=with=eq\nNOT_A_PAIR\n";
        let out = sanitize_env(input);
        assert_eq!(
            out,
            "# database\nDB_URL=<YOUR_VALUE>\n\nAPI_KEY=<YOUR_VALUE>\nNOT_A_PAIR\n"
        );
    }

    #[test]
    fn env_commented_assignment_passes_through() {
        assert_eq!(sanitize_env("  # TOKEN=abc"), "  # TOKEN=abc");
        assert_eq!(sanitize_env("=orphan"), "=orphan");
    }

    #[test]
    fn env_redaction_is_idempotent() {
        let input = "A=1\n# B=2\nC=three\n";
        let once = sanitize_env(input);
        assert_eq!(sanitize_env(&once), once);
    }

    #[test]
    fn head_lines_marks_only_when_over_cap() {
        let at_cap = "a\nb\nc\n";
        assert_eq!(head_lines(at_cap, 3), at_cap);

        let over = "a\nb\nc\nd\n";
        let cut = head_lines(over, 3);
        assert_eq!(cut, format!("a\nb\nc{TRUNCATION_MARKER}"));
        assert!(cut.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn lock_rule_wins_over_config_rule() {
        let body: String = (0..500).map(|i| format!("line {i}\n")).collect();
        let lock = apply_rules(&PathBuf::from("package-lock.json"), body.clone());
        assert_eq!(lock.lines().filter(|l| l.starts_with("line")).count(), LOCK_MAX_LINES);

        let config = apply_rules(&PathBuf::from("data.json"), body.clone());
        assert_eq!(config, body, "500 lines is under the config cap");

        let plain = apply_rules(&PathBuf::from("main.rs"), body.clone());
        assert_eq!(plain, body);
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let text = decode_lossy(&[b'o', b'k', 0xff, b'!']);
        assert_eq!(text, "ok\u{FFFD}!");
    }
}
