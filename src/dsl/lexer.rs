//! Lexer (tokenizer) for the net sketch DSL.

use std::fmt;

use crate::error::{Result, SketchError};

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The token's text, without surrounding whitespace
    pub text: String,
    /// Byte offset of the token in the fragment
    pub position: usize,
}

impl Token {
    /// Create a new token.
    pub fn new(kind: TokenKind, text: impl Into<String>, position: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
        }
    }

    /// The end-of-input token the parser synthesizes once the tokens run out.
    pub fn terminal(position: usize) -> Self {
        Self::new(TokenKind::Terminal, "", position)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Terminal => write!(f, "end of input"),
            TokenKind::Label | TokenKind::Weight | TokenKind::Id => {
                write!(f, "{} '{}'", self.kind, self.text)
            }
            _ => write!(f, "'{}'", self.text),
        }
    }
}

/// Token types in the DSL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Simple transition start '['
    SimpleTranStart,
    /// Simple transition end ']'
    SimpleTranEnd,
    /// Weighted transition start '{'
    WeightedTranStart,
    /// Weighted transition end '}'
    WeightedTranEnd,
    /// Separator between a transition label and its id '__'
    IdPrefix,
    /// Arc '->'
    Edge,
    /// The silent transition marker 'tau'
    SilentLabel,
    /// Alphanumeric label starting with a letter
    Label,
    /// Decimal weight, digits '.' digits
    Weight,
    /// Decimal id
    Id,
    /// End of input. Never produced by the lexer itself.
    Terminal,
}

impl TokenKind {
    /// Lexical patterns in the order they are tried at each position.
    pub const PRIORITY: [TokenKind; 10] = [
        TokenKind::SimpleTranStart,
        TokenKind::SimpleTranEnd,
        TokenKind::WeightedTranStart,
        TokenKind::WeightedTranEnd,
        TokenKind::IdPrefix,
        TokenKind::Edge,
        TokenKind::SilentLabel,
        TokenKind::Label,
        TokenKind::Weight,
        TokenKind::Id,
    ];

    /// The fixed lexeme for punctuation and keyword kinds.
    pub fn lexeme(self) -> Option<&'static str> {
        match self {
            TokenKind::SimpleTranStart => Some("["),
            TokenKind::SimpleTranEnd => Some("]"),
            TokenKind::WeightedTranStart => Some("{"),
            TokenKind::WeightedTranEnd => Some("}"),
            TokenKind::IdPrefix => Some(crate::ID_SEPARATOR),
            TokenKind::Edge => Some("->"),
            TokenKind::SilentLabel => Some(crate::SILENT_LABEL),
            TokenKind::Label | TokenKind::Weight | TokenKind::Id | TokenKind::Terminal => None,
        }
    }

    /// Length in bytes of the prefix of `input` this pattern matches, if any.
    fn match_len(self, input: &str) -> Option<usize> {
        if let Some(lexeme) = self.lexeme() {
            return input.starts_with(lexeme).then_some(lexeme.len());
        }
        let bytes = input.as_bytes();
        match self {
            TokenKind::Label => {
                if !bytes.first()?.is_ascii_alphabetic() {
                    return None;
                }
                Some(1 + run_len(&bytes[1..], u8::is_ascii_alphanumeric))
            }
            TokenKind::Weight => {
                let whole = run_len(bytes, u8::is_ascii_digit);
                if whole == 0 || bytes.get(whole) != Some(&b'.') {
                    return None;
                }
                let fraction = run_len(&bytes[whole + 1..], u8::is_ascii_digit);
                (fraction > 0).then_some(whole + 1 + fraction)
            }
            TokenKind::Id => {
                let len = run_len(bytes, u8::is_ascii_digit);
                (len > 0).then_some(len)
            }
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Label => write!(f, "label"),
            TokenKind::Weight => write!(f, "weight"),
            TokenKind::Id => write!(f, "id"),
            TokenKind::Terminal => write!(f, "end of input"),
            other => write!(f, "'{}'", other.lexeme().unwrap_or_default()),
        }
    }
}

fn run_len(bytes: &[u8], accept: fn(&u8) -> bool) -> usize {
    bytes.iter().take_while(|&b| accept(b)).count()
}

/// Lexer for tokenizing one fragment.
///
/// Whitespace between tokens is insignificant. At each position the
/// patterns of [`TokenKind::PRIORITY`] are tried in order and the first
/// one that matches wins, so `tau` is always a [`TokenKind::SilentLabel`]
/// and `__` is never swallowed by a neighbouring label or id.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Byte offset just past the last consumed token.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Get the next token, or `None` once only whitespace remains.
    pub fn next_token(&mut self) -> Result<Option<Token>> {
        self.skip_whitespace();
        let rest = &self.input[self.pos..];
        if rest.is_empty() {
            return Ok(None);
        }

        for kind in TokenKind::PRIORITY {
            if let Some(len) = kind.match_len(rest) {
                let token = Token::new(kind, &rest[..len], self.pos);
                self.pos += len;
                log::trace!("lexed {:?} '{}' at {}", token.kind, token.text, token.position);
                return Ok(Some(token));
            }
        }

        Err(SketchError::lex(self.pos, rest.trim_end()))
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.input[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

/// Tokenize a whole fragment.
pub fn tokenize(text: &str) -> Result<Vec<Token>> {
    Lexer::new(text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<TokenKind> {
        tokenize(text).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_lexer_basic() {
        let tokens = tokenize("I -> [a] -> F").unwrap();
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["I", "->", "[", "a", "]", "->", "F"]);
        assert_eq!(tokens[0].kind, TokenKind::Label);
        assert_eq!(tokens[1].kind, TokenKind::Edge);
        assert_eq!(tokens[3].position, 6);
    }

    #[test]
    fn test_lexer_weighted_with_id() {
        assert_eq!(
            kinds("{a__1 0.4}"),
            vec![
                TokenKind::WeightedTranStart,
                TokenKind::Label,
                TokenKind::IdPrefix,
                TokenKind::Id,
                TokenKind::Weight,
                TokenKind::WeightedTranEnd,
            ]
        );
    }

    #[test]
    fn test_lexer_weight_beats_id() {
        let tokens = tokenize("10.4 10").unwrap();
        assert_eq!(tokens[0], Token::new(TokenKind::Weight, "10.4", 0));
        assert_eq!(tokens[1], Token::new(TokenKind::Id, "10", 5));
    }

    #[test]
    fn test_lexer_silent_label_priority() {
        assert_eq!(kinds("[tau]")[1], TokenKind::SilentLabel);
        // 'tau' is tried before labels, even as a prefix
        assert_eq!(kinds("taux"), vec![TokenKind::SilentLabel, TokenKind::Label]);
    }

    #[test]
    fn test_lexer_position_tracks_consumed_input() {
        let mut lexer = Lexer::new("I  -> [a] ");
        assert_eq!(lexer.position(), 0);
        lexer.next_token().unwrap();
        assert_eq!(lexer.position(), 1);
        let edge = lexer.next_token().unwrap().unwrap();
        assert_eq!(edge.position, 3);
        assert_eq!(lexer.position(), 5);
        assert_eq!(lexer.by_ref().count(), 3);
        assert_eq!(lexer.next_token().unwrap(), None);
        assert_eq!(lexer.position(), 10);
    }

    #[test]
    fn test_lexer_insignificant_whitespace() {
        assert_eq!(kinds("I->[a]->F"), kinds("  I  ->  [ a ]  ->   F  "));
        assert!(tokenize("   ").unwrap().is_empty());
    }

    #[test]
    fn test_lexer_error() {
        match tokenize("I --> ~jerry [a] -> F") {
            Err(SketchError::Lex { position, remainder }) => {
                assert_eq!(position, 2);
                assert_eq!(remainder, "--> ~jerry [a] -> F");
            }
            other => panic!("expected lexer error, got {:?}", other),
        }
    }

    #[test]
    fn test_lexer_rejects_non_ascii_labels() {
        assert!(tokenize("I -> [é] -> F").is_err());
    }
}
