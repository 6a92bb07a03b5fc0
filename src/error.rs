//! Error types for Petri net sketching.
//!
//! This module provides a unified error type [`SketchError`] that covers
//! all error conditions that can occur during fragment lexing and parsing,
//! graph construction and structural comparison.

use thiserror::Error;

use crate::dsl::{Token, TokenKind};
use crate::net::{NodeKind, NodeRef};

/// Result type alias using [`SketchError`].
pub type Result<T> = std::result::Result<T, SketchError>;

/// Unified error type for all sketching operations.
#[derive(Error, Debug)]
pub enum SketchError {
    // ============ DSL Errors ============
    /// No lexical pattern matches the remaining input
    #[error("Lexer error at position {position}: unexpected input '{remainder}'")]
    Lex { position: usize, remainder: String },

    /// The lookahead token is not one the grammar allows here
    #[error("Syntax error at position {}: expected one of [{}], found {found}", .found.position, kind_list(.expected))]
    Syntax {
        expected: Vec<TokenKind>,
        found: Token,
    },

    /// Tokens remain after a complete net was reduced
    #[error("Syntax error at position {}: unexpected trailing input {found}", .found.position)]
    TrailingInput { found: Token },

    // ============ Graph Construction Errors ============
    /// A label bound to one node kind was referenced as the other kind
    #[error("Label '{label}' is already bound to a {existing}, cannot reuse it as a {requested}")]
    TypeConflict {
        label: String,
        existing: NodeKind,
        requested: NodeKind,
    },

    /// Binding would map one external id to two nodes, or one node to two ids
    #[error("External id '{external_id}' conflicts with an existing identity binding")]
    IdentityConflict { external_id: String },

    /// Arc endpoints are of the same kind or not part of the net
    #[error("Invalid arc {from} -> {to}: arcs must connect a place and a transition of the same net")]
    InvalidArc { from: NodeRef, to: NodeRef },

    /// Accepting nets need at least one fragment
    #[error("Cannot create an empty accepting net")]
    EmptyAcceptingNet,

    // ============ Comparison Errors ============
    /// Duplicate-tolerant comparison found a node without an external id
    #[error("Net '{net}' has no external id for node {node} (was it built without an identity mapper?)")]
    ComparisonPrecondition { net: String, node: NodeRef },

    // ============ I/O Errors ============
    /// Error reading a fragment file
    #[error("Failed to read fragment file '{path}': {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl SketchError {
    /// Create a lexer error
    pub fn lex(position: usize, remainder: impl Into<String>) -> Self {
        Self::Lex {
            position,
            remainder: remainder.into(),
        }
    }

    /// Create a syntax error
    pub fn syntax(expected: &[TokenKind], found: Token) -> Self {
        Self::Syntax {
            expected: expected.to_vec(),
            found,
        }
    }

    /// Create a type conflict error
    pub fn type_conflict(label: impl Into<String>, existing: NodeKind, requested: NodeKind) -> Self {
        Self::TypeConflict {
            label: label.into(),
            existing,
            requested,
        }
    }
}

fn kind_list(kinds: &[TokenKind]) -> String {
    kinds
        .iter()
        .map(|kind| kind.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_message() {
        let found = Token::new(TokenKind::Label, "b", 7);
        let err = SketchError::syntax(&[TokenKind::SimpleTranEnd, TokenKind::IdPrefix], found);
        assert_eq!(
            err.to_string(),
            "Syntax error at position 7: expected one of [']', '__'], found label 'b'"
        );
    }

    #[test]
    fn test_type_conflict_message() {
        let err = SketchError::type_conflict("a", NodeKind::Place, NodeKind::Transition);
        assert_eq!(
            err.to_string(),
            "Label 'a' is already bound to a place, cannot reuse it as a transition"
        );
    }
}
