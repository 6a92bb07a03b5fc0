//! DSL (Domain Specific Language) for one-line Petri net sketches.
//!
//! A fragment describes a chain of places and transitions on a single line,
//! for example:
//!
//! ```text
//! I -> {a__1 0.4} -> p1 -> [b] -> F
//! ```
//!
//! # Grammar
//!
//! ```text
//! net         = place edge transition edge tail
//! tail        = place edge transition edge tail | place
//! transition  = '[' tran_body ']' | '{' tran_body [weight] '}'
//! tran_body   = (label | 'tau') ['__' id]
//! place       = label
//! edge        = '->'
//!
//! label       = [a-zA-Z][a-zA-Z0-9]*
//! weight      = [0-9]+ '.' [0-9]+
//! id          = [0-9]+
//! ```
//!
//! # Transitions
//!
//! | Syntax | Meaning |
//! |--------|---------|
//! | `[a]` | Simple transition labelled `a` |
//! | `{a 0.4}` | Immediate transition with weight 0.4 |
//! | `{a}` | Immediate transition with weight 1.0 |
//! | `[tau]` | Silent (invisible) transition |
//! | `[a__2]` | Transition labelled `a`, distinct from `[a__1]` |
//!
//! Places are always looked up by label. Transitions are looked up by
//! `label` or `label__id`, so several transitions can share a display label.

mod ast;
mod lexer;
mod parser;

pub use ast::*;
pub use lexer::{tokenize, Lexer, Token, TokenKind};
pub use parser::Parser;

use crate::error::Result;

/// Lex and parse one fragment into its syntax tree.
pub fn parse_fragment(text: &str) -> Result<Fragment> {
    let tokens = tokenize(text)?;
    let mut parser = Parser::new(tokens);
    parser.parse()
}

/// Iterate the fragment lines of a multi-line text, skipping blank
/// lines and `#` comments.
pub fn fragment_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_lines() {
        let text = "# a net\nI -> [a] -> p\n\n   \np -> [b] -> F\n";
        let lines: Vec<&str> = fragment_lines(text).collect();
        assert_eq!(lines, vec!["I -> [a] -> p", "p -> [b] -> F"]);
    }

    #[test]
    fn test_display_reparses() {
        let text = "I -> {a__1 0.4} -> p1 -> [tau] -> F";
        let fragment = parse_fragment(text).unwrap();
        assert_eq!(fragment.to_string(), text);
        assert_eq!(parse_fragment(&fragment.to_string()).unwrap(), fragment);
    }

    #[test]
    fn test_large_weight_reparses() {
        let fragment = parse_fragment("I -> {a 100000000000000000000.0} -> F").unwrap();
        assert_eq!(fragment.to_string(), "I -> {a 100000000000000000000.0} -> F");
        assert_eq!(parse_fragment(&fragment.to_string()).unwrap(), fragment);
    }
}
