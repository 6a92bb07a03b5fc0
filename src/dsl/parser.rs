//! Parser for the net sketch DSL.

use super::ast::*;
use super::lexer::{Token, TokenKind};
use crate::error::{Result, SketchError};

/// Single-lookahead recursive-descent parser over one fragment's tokens.
pub struct Parser {
    tokens: std::vec::IntoIter<Token>,
    current: Token,
    end: usize,
}

impl Parser {
    /// Create a new parser over a token stream.
    pub fn new(tokens: Vec<Token>) -> Self {
        let end = tokens
            .last()
            .map(|t| t.position + t.text.len())
            .unwrap_or(0);
        let mut tokens = tokens.into_iter();
        let current = tokens.next().unwrap_or_else(|| Token::terminal(end));
        Self {
            tokens,
            current,
            end,
        }
    }

    /// Parse a complete fragment, rejecting anything after it.
    pub fn parse(&mut self) -> Result<Fragment> {
        let fragment = self.parse_net()?;
        if self.current.kind != TokenKind::Terminal {
            return Err(SketchError::TrailingInput {
                found: self.current.clone(),
            });
        }
        Ok(fragment)
    }

    fn advance(&mut self) {
        self.current = self
            .tokens
            .next()
            .unwrap_or_else(|| Token::terminal(self.end));
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.current.kind == kind {
            let tok = self.current.clone();
            self.advance();
            Ok(tok)
        } else {
            Err(self.unexpected(&[kind]))
        }
    }

    fn unexpected(&self, expected: &[TokenKind]) -> SketchError {
        SketchError::syntax(expected, self.current.clone())
    }

    // Net := Place Edge Transition Edge Tail
    // Tail := Place Edge Transition Edge Tail | Place
    fn parse_net(&mut self) -> Result<Fragment> {
        let head = self.parse_place()?;
        let mut steps = vec![self.parse_step()?];
        while self.current.kind == TokenKind::Edge {
            steps.push(self.parse_step()?);
        }
        Ok(Fragment { head, steps })
    }

    fn parse_step(&mut self) -> Result<Step> {
        self.expect(TokenKind::Edge)?;
        let transition = self.parse_transition()?;
        self.expect(TokenKind::Edge)?;
        let place = self.parse_place()?;
        Ok(Step { transition, place })
    }

    fn parse_place(&mut self) -> Result<String> {
        Ok(self.expect(TokenKind::Label)?.text)
    }

    fn parse_transition(&mut self) -> Result<TransitionSpec> {
        match self.current.kind {
            TokenKind::SimpleTranStart => {
                self.advance();
                let (label, id, silent) = self.parse_tran_body(&[TokenKind::SimpleTranEnd])?;
                self.expect(TokenKind::SimpleTranEnd)?;
                Ok(TransitionSpec {
                    label,
                    id,
                    silent,
                    style: TransitionStyle::Simple,
                })
            }
            TokenKind::WeightedTranStart => {
                self.advance();
                let (label, id, silent) =
                    self.parse_tran_body(&[TokenKind::Weight, TokenKind::WeightedTranEnd])?;
                let weight = if self.current.kind == TokenKind::Weight {
                    self.parse_weight()?
                } else {
                    crate::DEFAULT_WEIGHT
                };
                if self.current.kind != TokenKind::WeightedTranEnd {
                    let expected: &[TokenKind] = if id.is_some() {
                        &[TokenKind::Weight, TokenKind::WeightedTranEnd]
                    } else {
                        &[TokenKind::IdPrefix, TokenKind::Weight, TokenKind::WeightedTranEnd]
                    };
                    return Err(self.unexpected(expected));
                }
                self.advance();
                Ok(TransitionSpec {
                    label,
                    id,
                    silent,
                    style: TransitionStyle::Weighted(weight),
                })
            }
            _ => Err(self.unexpected(&[TokenKind::SimpleTranStart, TokenKind::WeightedTranStart])),
        }
    }

    /// TranBody := (Label | SilentLabel) [IdPrefix Id]
    ///
    /// `follow` lists the kinds that may come after the body, for errors.
    fn parse_tran_body(&mut self, follow: &[TokenKind]) -> Result<(String, Option<String>, bool)> {
        let silent = match self.current.kind {
            TokenKind::Label => false,
            TokenKind::SilentLabel => true,
            _ => return Err(self.unexpected(&[TokenKind::Label, TokenKind::SilentLabel])),
        };
        let label = self.current.text.clone();
        self.advance();

        let id = if self.current.kind == TokenKind::IdPrefix {
            self.advance();
            Some(self.expect(TokenKind::Id)?.text)
        } else {
            if !follow.contains(&self.current.kind) {
                let mut expected = vec![TokenKind::IdPrefix];
                expected.extend_from_slice(follow);
                return Err(self.unexpected(&expected));
            }
            None
        };
        Ok((label, id, silent))
    }

    fn parse_weight(&mut self) -> Result<f64> {
        let tok = self.expect(TokenKind::Weight)?;
        tok.text
            .parse::<f64>()
            .map_err(|_| SketchError::syntax(&[TokenKind::Weight], tok.clone()))
    }
}
