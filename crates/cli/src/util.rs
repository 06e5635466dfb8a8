use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use unicode_width::UnicodeWidthStr;

use crate::CliError;

/// True when `path` is the conventional `-` for stdin/stdout.
pub(crate) fn is_dash(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Read a whole file, or stdin when `path` is `-`.
pub(crate) fn read_input(path: &Path) -> Result<String, CliError> {
    if is_dash(path) {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .map_err(|e| CliError::io(format!("cannot read stdin: {e}")))?;
        return Ok(text);
    }
    fs::read_to_string(path).map_err(|e| CliError::io(format!("cannot read {}: {e}", path.display())))
}

/// Write bytes to a file, or stdout when `path` is `-`.
pub(crate) fn write_output(path: &Path, bytes: &[u8]) -> Result<(), CliError> {
    if is_dash(path) {
        let mut out = io::stdout().lock();
        return out
            .write_all(bytes)
            .and_then(|_| out.flush())
            .map_err(|e| CliError::io(e.to_string()));
    }
    fs::write(path, bytes).map_err(|e| CliError::io(format!("cannot write {}: {e}", path.display())))
}

/// Truncate a string to fit within `width` display columns, adding ".." if truncated.
pub(crate) fn truncate_display(s: &str, width: usize) -> String {
    if UnicodeWidthStr::width(s) <= width {
        return s.to_string();
    }
    if width < 3 {
        return s.chars().take(width).collect();
    }

    let budget = width - 2;
    let mut used = 0;
    let mut out = String::new();
    for ch in s.chars() {
        let cw = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + cw > budget {
            break;
        }
        used += cw;
        out.push(ch);
    }
    out.push_str("..");
    out
}

/// Pad or truncate a string to exactly `width` display columns.
pub(crate) fn pad_right(s: &str, width: usize) -> String {
    let sw = UnicodeWidthStr::width(s);
    if sw > width {
        truncate_display(s, width)
    } else {
        format!("{}{}", s, " ".repeat(width - sw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_and_truncate() {
        assert_eq!(pad_right("ab", 4), "ab  ");
        assert_eq!(pad_right("abcdef", 5), "abc..");
        assert_eq!(pad_right("£12", 4), "£12 ");
        assert_eq!(truncate_display("abc", 2), "ab");
    }

    #[test]
    fn dash_means_stdio() {
        assert!(is_dash(Path::new("-")));
        assert!(!is_dash(Path::new("./-x")));
    }
}
