//! Pattern grammar: node and relationship patterns, shared by
//! `MATCH`, `CREATE`, and `CREATE UNIQUE` via the low-level [`ParsedPath`]
//! representation. Lowering into `PatternPart`/update actions happens in
//! `parser::clause`.

use crate::ast::pattern::{Direction, ParsedNode, ParsedPath, ParsedRel, ShortestKind};
use crate::dialect::Dialect;
use crate::diag::ErrorKind;
use crate::lexer::token::TokenKind;
use crate::parser::Parser;
use smol_str::SmolStr;

/// Anonymous node/relationship names are synthesized from their byte offset
/// so they are deterministic and stable across reparses of the same text.
pub(crate) fn anon_name(offset: usize) -> SmolStr {
    SmolStr::new(format!("  UNNAMED{offset}"))
}

impl<'source> Parser<'source> {
    /// `pathVar = ` prefix, then a node/relationship chain, then (for
    /// `shortestPath(...)`/`allShortestPaths(...)`) a single wrapped path.
    pub(crate) fn parse_pattern_path(&mut self) -> Result<ParsedPath, ()> {
        let start = self.here();
        let mut name = None;

        if let TokenKind::Identifier(n) = self.peek_kind() {
            if self.peek_nth(1).kind == TokenKind::Eq {
                name = Some(n);
                self.advance();
                self.advance();
            }
        }

        if let Some(shortest) = self.try_parse_shortest_call()? {
            let (kind, mut path) = shortest;
            path.name = name;
            path.shortest = Some(kind);
            return Ok(path);
        }

        self.parse_node_relationship_chain(name, start)
    }

    /// Recognizes `shortestPath(...)` / `allShortestPaths(...)` pseudo-calls.
    /// Returns `Ok(None)` if the current position isn't one of these.
    fn try_parse_shortest_call(&mut self) -> Result<Option<(ShortestKind, ParsedPath)>, ()> {
        let kind = match self.peek_kind() {
            TokenKind::Identifier(ref n) if n.eq_ignore_ascii_case("shortestPath") => {
                ShortestKind::Single
            }
            TokenKind::Identifier(ref n) if n.eq_ignore_ascii_case("allShortestPaths") => {
                ShortestKind::All
            }
            _ => return Ok(None),
        };
        if self.peek_nth(1).kind != TokenKind::LParen {
            return Ok(None);
        }
        let start = self.here();
        self.advance();
        self.advance();
        let path = self.parse_node_relationship_chain(None, start)?;
        self.expect(&TokenKind::RParen, "after shortestPath(...)")?;
        Ok(Some((kind, path)))
    }

    pub(crate) fn parse_node_relationship_chain(
        &mut self,
        name: Option<SmolStr>,
        start: usize,
    ) -> Result<ParsedPath, ()> {
        let mut nodes = vec![self.parse_node()?];
        let mut rels = Vec::new();

        while self.at_any(&[TokenKind::Minus, TokenKind::LeftArrow]) {
            rels.push(self.parse_relationship()?);
            nodes.push(self.parse_node()?);
        }

        let end = nodes.last().map(|n| n.span.end).unwrap_or(self.here());
        Ok(ParsedPath {
            name,
            nodes,
            rels,
            shortest: None,
            span: start..end,
        })
    }

    /// `(name? labels* properties?)` or a bare identifier (pre-2.0 `CREATE n`
    /// style, also accepted here in patterns for grammar parity).
    pub(crate) fn parse_node(&mut self) -> Result<ParsedNode, ()> {
        let start = self.here();

        if let TokenKind::Identifier(n) = self.peek_kind() {
            if !self.at(&TokenKind::LParen) {
                self.advance();
                let end = self.tokens[self.current - 1].span.end;
                return Ok(ParsedNode {
                    name: n,
                    labels: Vec::new(),
                    properties: None,
                    bare: true,
                    anonymous: false,
                    span: start..end,
                });
            }
        }

        self.expect(&TokenKind::LParen, "at start of node pattern")?;

        let (name, anonymous) = if let TokenKind::Identifier(n) = self.peek_kind() {
            self.advance();
            (n, false)
        } else {
            (anon_name(start), true)
        };

        let labels = self.parse_label_list()?;

        let properties = if self.at(&TokenKind::LBrace) {
            Some(self.parse_brace_expr()?)
        } else {
            None
        };

        let close = self.expect(&TokenKind::RParen, "to close node pattern")?;
        Ok(ParsedNode {
            name,
            labels,
            properties,
            bare: false,
            anonymous,
            span: start..close.span.end,
        })
    }

    fn parse_label_list(&mut self) -> Result<Vec<SmolStr>, ()> {
        let mut labels = Vec::new();
        while self.at(&TokenKind::Colon) {
            self.advance();
            labels.push(self.expect_label_text()?);
        }
        Ok(labels)
    }

    /// `-[name? :type(|:type)* varlen? properties?]-`, with the surrounding
    /// dash/arrow tokens consumed here too so callers get a complete
    /// [`ParsedRel`].
    fn parse_relationship(&mut self) -> Result<ParsedRel, ()> {
        let start = self.here();

        let left_arrow = if self.at(&TokenKind::LeftArrow) {
            self.advance();
            true
        } else {
            self.expect(&TokenKind::Minus, "in relationship pattern")?;
            false
        };

        let mut name = None;
        let mut types = Vec::new();
        let mut var_length = None;
        let mut properties = None;
        let mut anonymous = true;
        let mut optional = false;

        if self.at(&TokenKind::LBracket) {
            self.advance();

            if let TokenKind::Identifier(n) = self.peek_kind() {
                self.advance();
                name = Some(n);
                anonymous = false;
            }

            // `-[r?]->` marks just this relationship optional, a v1_9-era
            // alternative to `OPTIONAL MATCH` scoped to a single edge.
            if self.at(&TokenKind::Question) {
                self.advance();
                optional = true;
            }

            if self.at(&TokenKind::Colon) {
                self.advance();
                types.push(self.expect_label_text()?);
                loop {
                    let sep = self.type_separator_for_dialect();
                    if self.at(&sep) {
                        self.advance();
                        types.push(self.expect_label_text()?);
                    } else if self.at_any(&[TokenKind::Pipe, TokenKind::PipeColon]) {
                        self.error_here(
                            ErrorKind::DialectFeature,
                            format!(
                                "relationship type separator for dialect {} is `{}`",
                                self.dialect, sep
                            ),
                        );
                        return Err(());
                    } else {
                        break;
                    }
                }
            }

            if !optional && self.at(&TokenKind::Question) {
                self.advance();
                optional = true;
            }

            if self.at(&TokenKind::Star) {
                self.advance();
                var_length = Some(self.parse_var_length_range()?);
            }

            if self.at(&TokenKind::LBrace) {
                properties = Some(self.parse_brace_expr()?);
            }

            self.expect(&TokenKind::RBracket, "to close relationship pattern")?;
        }

        let right_arrow = if self.at(&TokenKind::Arrow) {
            self.advance();
            true
        } else {
            self.expect(&TokenKind::Minus, "in relationship pattern")?;
            false
        };

        let direction = match (left_arrow, right_arrow) {
            (false, true) => Direction::Out,
            (true, false) => Direction::In,
            _ => Direction::Both,
        };

        let name = name.unwrap_or_else(|| anon_name(start));
        let end = self.tokens[self.current - 1].span.end;

        Ok(ParsedRel {
            name,
            types,
            properties,
            direction,
            optional,
            var_length,
            anonymous,
            span: start..end,
        })
    }

    fn type_separator_for_dialect(&self) -> TokenKind {
        if self.dialect == Dialect::V1_9 {
            TokenKind::Pipe
        } else {
            TokenKind::PipeColon
        }
    }

    /// `*`, `*n`, `*n..`, `*..m`, `*n..m`.
    fn parse_var_length_range(&mut self) -> Result<(Option<u32>, Option<u32>), ()> {
        let min = if let TokenKind::IntegerLiteral(n) = self.peek_kind() {
            self.advance();
            Some(n as u32)
        } else {
            None
        };

        if !self.at(&TokenKind::DotDot) {
            return Ok((min, min));
        }
        self.advance();

        let max = if let TokenKind::IntegerLiteral(n) = self.peek_kind() {
            self.advance();
            Some(n as u32)
        } else {
            None
        };

        Ok((min, max))
    }

    /// `{` either an identifier/integer/backtick-identifier parameter
    /// reference, or a `key: value, ...` map literal. The lexer deliberately
    /// doesn't disambiguate these; the parser looks one token past the
    /// opening brace.
    pub(crate) fn parse_brace_expr(&mut self) -> Result<crate::ast::Expression, ()> {
        super::expression::parse_brace_expr(self)
    }
}
