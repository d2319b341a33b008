//! Terminal rendering of compile errors.

use crate::parser::parse::CompileError;
use crossterm::style::Stylize;

/// Format `error` as `file:line: Kind error: message`. With `color` the
/// `Kind error` label is styled red and bold.
pub fn render(error: &CompileError, source_name: &str, color: bool) -> String {
    let label = format!("{} error", error.kind);
    let label = if color {
        label.red().bold().to_string()
    } else {
        label
    };
    format!("{}:{}: {}: {}", source_name, error.line, label, error.message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse::ErrorKind;

    #[test]
    fn test_plain_rendering() {
        let message = "'=' used with operands of different types";
        let err = CompileError::new(ErrorKind::Type, 3, message);
        assert_eq!(
            render(&err, "prog.quad", false),
            "prog.quad:3: Type error: '=' used with operands of different types"
        );
    }

    #[test]
    fn test_colored_rendering_keeps_text() {
        let err = CompileError::new(ErrorKind::Syntax, 1, "expected ';'");
        let colored = render(&err, "a.quad", true);
        assert!(colored.starts_with("a.quad:1: "));
        assert!(colored.contains("Syntax error"));
        assert!(colored.ends_with(": expected ';'"));
        assert_ne!(colored, render(&err, "a.quad", false));
    }
}
