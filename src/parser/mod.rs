//! Parser for the query front end.
//!
//! Stops at the first diagnostic and returns no partial AQT:
//! `ast.is_some()` implies `diagnostics.is_empty()` and vice versa.

pub mod clause;
pub mod expression;
pub mod pattern;
mod primitives;

use crate::ast::Aqt;
use crate::dialect::Dialect;
use crate::diag::{Diag, SourceFile, convert_diagnostics_to_reports};
use crate::lexer::token::{Token, TokenKind};
use miette::Report;

/// Result of a parse call.
#[derive(Debug)]
pub struct ParseOutcome {
    pub ast: Option<Aqt>,
    pub diagnostics: Vec<Report>,
}

pub struct Parser<'source> {
    pub(crate) tokens: Vec<Token>,
    pub(crate) diagnostics: Vec<Diag>,
    pub(crate) source: &'source str,
    pub(crate) current: usize,
    pub(crate) dialect: Dialect,
}

impl<'source> Parser<'source> {
    pub fn new(mut tokens: Vec<Token>, source: &'source str, dialect: Dialect) -> Self {
        if tokens.is_empty() {
            tokens.push(Token::new(TokenKind::Eof, 0..0));
        } else if !matches!(tokens.last().map(|t| &t.kind), Some(TokenKind::Eof)) {
            let eof_pos = tokens.last().map(|t| t.span.end).unwrap_or(0);
            tokens.push(Token::new(TokenKind::Eof, eof_pos..eof_pos));
        }

        Self {
            tokens,
            diagnostics: Vec::new(),
            source,
            current: 0,
            dialect,
        }
    }

    /// Parses the token stream into an AQT, per the first-error-stops
    /// policy: either a complete AQT and no diagnostics, or no AQT and
    /// exactly one diagnostic.
    pub fn parse(mut self) -> ParseOutcome {
        let ast = self.parse_aqt().ok().and_then(|aqt| {
            if self.is_eof() {
                Some(aqt)
            } else {
                self.expected_token(&TokenKind::Eof, "after query");
                None
            }
        });

        let source = SourceFile::new(self.source);
        let diagnostics = convert_diagnostics_to_reports(&self.diagnostics, &source);

        ParseOutcome { ast, diagnostics }
    }

    fn parse_aqt(&mut self) -> Result<Aqt, ()> {
        if self.at(&TokenKind::Drop) {
            return clause::parse_drop_index(self).map(Aqt::Schema);
        }
        if self.at(&TokenKind::Create) && self.peek_nth(1).kind == TokenKind::Index {
            return clause::parse_create_index(self).map(Aqt::Schema);
        }
        if self.at(&TokenKind::Create) && self.peek_nth(1).kind == TokenKind::Constraint {
            return clause::parse_create_constraint(self).map(Aqt::Schema);
        }

        self.parse_query_or_union()
    }

    /// `A UNION B UNION C` (spec P6): left-associative, union-wide
    /// `distinct`. Mixing `UNION`/`UNION ALL` in the same chain, or using
    /// `UNION` at all pre-2.0, is a `DialectFeatureError`.
    fn parse_query_or_union(&mut self) -> Result<Aqt, ()> {
        let first = clause::parse_query(self)?;

        if !self.at(&TokenKind::Union) {
            return Ok(Aqt::Query(first));
        }

        if !self.dialect.is_v2() {
            self.error_here(
                crate::diag::ErrorKind::DialectFeature,
                "UNION is only available from dialect v2_0",
            );
            return Err(());
        }

        let span_start = first.span.start;
        let mut queries = vec![first];
        let mut distinct: Option<bool> = None;

        while self.at(&TokenKind::Union) {
            self.advance();
            let branch_distinct = if self.at(&TokenKind::All) {
                self.advance();
                false
            } else {
                true
            };
            match distinct {
                None => distinct = Some(branch_distinct),
                Some(d) if d == branch_distinct => {}
                Some(_) => {
                    self.error_here(
                        crate::diag::ErrorKind::DialectFeature,
                        "cannot mix UNION and UNION ALL in the same chain",
                    );
                    return Err(());
                }
            }
            queries.push(clause::parse_query(self)?);
        }

        let span_end = queries.last().map(|q| q.span.end).unwrap_or(span_start);
        Ok(Aqt::Union(crate::ast::Union {
            queries,
            distinct: distinct.unwrap_or(true),
            span: span_start..span_end,
        }))
    }

    pub(crate) fn expected_token(&mut self, expected: &TokenKind, context: &str) {
        let tok = self.peek().clone();
        self.diagnostics.push(
            Diag::error(format!(
                "expected {expected}, found {} {context}",
                tok.kind
            ))
            .with_primary_label(tok.span, "unexpected token")
            .with_code(crate::diag::ErrorKind::UnexpectedToken.code()),
        );
    }

    pub(crate) fn error_here(&mut self, kind: crate::diag::ErrorKind, message: impl Into<String>) {
        let tok = self.peek().clone();
        self.diagnostics.push(
            Diag::error(message)
                .with_primary_label(tok.span, "here")
                .with_code(kind.code()),
        );
    }

    pub(crate) fn error_at(
        &mut self,
        span: crate::ast::Span,
        kind: crate::diag::ErrorKind,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(
            Diag::error(message)
                .with_primary_label(span, "here")
                .with_code(kind.code()),
        );
    }
}
