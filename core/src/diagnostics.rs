//! Caret diagnostics for rejected command lines.
//!
//! A [`Diagnostic`] reconstructs the invocation as the user typed it and
//! marks the offending token:
//!
//! ```text
//! Invalid argument detected:
//! wperf test -v --json random
//! ~~~~~~~~~~~~~~~~~~~~~^
//! Hint: unrecognized argument
//! ```

use std::fmt;

use serde::Serialize;

/// Rendered error report for a single offending token.
///
/// # Examples
///
/// ```
/// use wperf_args_core::Diagnostic;
///
/// let args = vec!["test".to_string(), "random".to_string()];
/// let diag = Diagnostic::locate("wperf", &args, "random", None);
/// assert_eq!(diag.command_line, "wperf test random");
/// assert_eq!(diag.indicator, "~~~~~~~~~~~^");
/// assert_eq!(diag.offset, Some(11));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Program name followed by every supplied argument, space-joined.
    pub command_line: String,
    /// `~` up to the offending token followed by `^`.
    pub indicator: String,
    /// Byte offset of the token's first occurrence, `None` when the caret
    /// points at the end of the line.
    pub offset: Option<usize>,
    /// Optional one-line hint.
    pub hint: Option<String>,
}

impl Diagnostic {
    /// Builds a diagnostic pointing at the first occurrence of `token`.
    ///
    /// The token is matched by value, not by position. When it cannot be
    /// found, is empty, or would land at offset 0 (the program name), the
    /// caret is placed at the end of the line.
    pub fn locate(program: &str, args: &[String], token: &str, hint: Option<String>) -> Self {
        let command_line = reconstruct_command_line(program, args);

        let offset = if token.is_empty() {
            None
        } else {
            command_line.find(token).filter(|&pos| pos != 0)
        };
        let column = match offset {
            Some(pos) => command_line[..pos].chars().count(),
            None => command_line.chars().count(),
        };

        let mut indicator = "~".repeat(column);
        indicator.push('^');

        Self {
            command_line,
            indicator,
            offset,
            hint,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Invalid argument detected:")?;
        writeln!(f, "{}", self.command_line)?;
        writeln!(f, "{}", self.indicator)?;
        if let Some(hint) = self.hint.as_deref().filter(|h| !h.is_empty()) {
            writeln!(f, "{hint}")?;
        }
        Ok(())
    }
}

fn reconstruct_command_line(program: &str, args: &[String]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_caret_points_at_token() {
        let diag = Diagnostic::locate("wperf", &args(&["test", "-v", "--json", "random"]), "random", None);

        assert_eq!(diag.command_line, "wperf test -v --json random");
        assert_eq!(diag.offset, Some(21));
        assert_eq!(diag.indicator, format!("{}^", "~".repeat(21)));
    }

    #[test]
    fn test_first_occurrence_wins() {
        let diag = Diagnostic::locate("wperf", &args(&["stat", "-v", "-v"]), "-v", None);
        assert_eq!(diag.offset, Some(11));
    }

    #[test]
    fn test_missing_token_points_at_end() {
        let diag = Diagnostic::locate("wperf", &args(&["sample", "--timeout"]), "", None);

        assert_eq!(diag.offset, None);
        assert_eq!(diag.indicator.len(), diag.command_line.len() + 1);
        assert!(diag.indicator.ends_with('^'));
    }

    #[test]
    fn test_offset_zero_points_at_end() {
        let diag = Diagnostic::locate("wperf", &args(&["stat"]), "wperf", None);
        assert_eq!(diag.offset, None);
        assert_eq!(diag.indicator, "~~~~~~~~~~^");
    }

    #[test]
    fn test_display_includes_hint() {
        let diag = Diagnostic::locate(
            "wperf",
            &args(&["bogus"]),
            "bogus",
            Some("Hint: command not recognized".to_string()),
        );

        let rendered = diag.to_string();
        assert_eq!(
            rendered,
            "Invalid argument detected:\nwperf bogus\n~~~~~~^\nHint: command not recognized\n"
        );
    }

    #[test]
    fn test_display_without_hint() {
        let diag = Diagnostic::locate("wperf", &args(&["bogus"]), "bogus", None);
        assert_eq!(diag.to_string().lines().count(), 3);
    }
}
