//! Token navigation and consumption primitives.

use crate::lexer::token::{Token, TokenKind};
use crate::parser::Parser;

impl<'source> Parser<'source> {
    /// Returns a reference to the current token without consuming it.
    ///
    /// This never fails - if at EOF, returns the EOF token.
    pub(crate) fn peek(&self) -> &Token {
        self.tokens.get(self.current).unwrap_or_else(|| {
            self.tokens
                .last()
                .expect("token stream should never be empty")
        })
    }

    /// Returns the kind of the current token.
    pub(crate) fn peek_kind(&self) -> TokenKind {
        self.peek().kind.clone()
    }

    /// Look ahead N tokens without consuming.
    ///
    /// Returns the token at position `current + n`. If out of bounds,
    /// returns the EOF token (or last token in stream).
    pub(crate) fn peek_nth(&self, n: usize) -> &Token {
        let index = self.current.saturating_add(n);
        self.tokens.get(index).unwrap_or_else(|| {
            self.tokens
                .last()
                .expect("token stream should never be empty")
        })
    }

    /// Consumes the current token and advances to the next.
    pub(crate) fn advance(&mut self) -> &Token {
        let index = self.current;
        if self.current + 1 < self.tokens.len() {
            self.current += 1;
        }
        &self.tokens[index]
    }

    /// Checks if the current token matches the given kind.
    pub(crate) fn at(&self, kind: &TokenKind) -> bool {
        &self.peek_kind() == kind
    }

    /// Checks if the current token matches any of the given kinds.
    pub(crate) fn at_any(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.peek_kind())
    }

    /// Checks if we're at the end of the token stream.
    pub(crate) fn is_eof(&self) -> bool {
        self.at(&TokenKind::Eof)
    }

    /// Consumes the current token if it matches the expected kind.
    ///
    /// Returns `Ok(token)` if successful, `Err(())` if the token doesn't
    /// match. Does not emit diagnostics on failure.
    #[allow(dead_code)]
    pub(crate) fn consume(&mut self, kind: &TokenKind) -> Result<Token, ()> {
        if self.at(kind) {
            Ok(self.advance().clone())
        } else {
            Err(())
        }
    }

    /// Consumes the current token, expecting it to be of the given kind.
    ///
    /// If the token doesn't match, emits a diagnostic and returns `Err(())`.
    pub(crate) fn expect(&mut self, kind: &TokenKind, context: &str) -> Result<Token, ()> {
        if self.at(kind) {
            Ok(self.advance().clone())
        } else {
            self.expected_token(kind, context);
            Err(())
        }
    }

    /// Tries to consume a keyword token.
    ///
    /// Returns `Some(token)` if the current token matches the keyword,
    /// `None` otherwise. Does not emit diagnostics.
    pub(crate) fn match_keyword(&mut self, keyword: &TokenKind) -> Option<Token> {
        if self.at(keyword) {
            Some(self.advance().clone())
        } else {
            None
        }
    }

    /// Current token's byte offset, used for anonymous-name generation.
    pub(crate) fn here(&self) -> usize {
        self.peek().span.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;

    fn make_token(kind: TokenKind, start: usize, end: usize) -> Token {
        Token::new(kind, start..end)
    }

    #[test]
    fn test_peek() {
        let tokens = vec![
            make_token(TokenKind::Match, 0, 5),
            make_token(TokenKind::Eof, 5, 5),
        ];
        let parser = Parser::new(tokens, "", Dialect::V2_0);
        assert_eq!(parser.peek().kind, TokenKind::Match);
    }

    #[test]
    fn test_peek_kind() {
        let tokens = vec![
            make_token(TokenKind::Return, 0, 6),
            make_token(TokenKind::Eof, 6, 6),
        ];
        let parser = Parser::new(tokens, "", Dialect::V2_0);
        assert_eq!(parser.peek_kind(), TokenKind::Return);
    }

    #[test]
    fn test_peek_nth() {
        let tokens = vec![
            make_token(TokenKind::Match, 0, 5),
            make_token(TokenKind::LParen, 5, 6),
            make_token(TokenKind::Identifier("n".into()), 6, 7),
            make_token(TokenKind::Eof, 7, 7),
        ];
        let parser = Parser::new(tokens, "", Dialect::V2_0);
        assert_eq!(parser.peek_nth(0).kind, TokenKind::Match);
        assert_eq!(parser.peek_nth(1).kind, TokenKind::LParen);
        assert_eq!(parser.peek_nth(2).kind, TokenKind::Identifier("n".into()));
        assert_eq!(parser.peek_nth(10).kind, TokenKind::Eof);
    }

    #[test]
    fn test_advance() {
        let tokens = vec![
            make_token(TokenKind::Match, 0, 5),
            make_token(TokenKind::Return, 5, 11),
            make_token(TokenKind::Eof, 11, 11),
        ];
        let mut parser = Parser::new(tokens, "", Dialect::V2_0);

        assert_eq!(parser.peek_kind(), TokenKind::Match);
        parser.advance();
        assert_eq!(parser.peek_kind(), TokenKind::Return);
        parser.advance();
        assert_eq!(parser.peek_kind(), TokenKind::Eof);
    }

    #[test]
    fn test_at() {
        let tokens = vec![
            make_token(TokenKind::Match, 0, 5),
            make_token(TokenKind::Eof, 5, 5),
        ];
        let parser = Parser::new(tokens, "", Dialect::V2_0);
        assert!(parser.at(&TokenKind::Match));
        assert!(!parser.at(&TokenKind::Return));
    }

    #[test]
    fn test_at_any() {
        let tokens = vec![
            make_token(TokenKind::Match, 0, 5),
            make_token(TokenKind::Eof, 5, 5),
        ];
        let parser = Parser::new(tokens, "", Dialect::V2_0);
        assert!(parser.at_any(&[TokenKind::Match, TokenKind::Return]));
        assert!(!parser.at_any(&[TokenKind::Return, TokenKind::Where]));
    }

    #[test]
    fn test_is_eof() {
        let tokens = vec![
            make_token(TokenKind::Match, 0, 5),
            make_token(TokenKind::Eof, 5, 5),
        ];
        let mut parser = Parser::new(tokens, "", Dialect::V2_0);
        assert!(!parser.is_eof());
        parser.advance();
        assert!(parser.is_eof());
    }

    #[test]
    fn test_consume() {
        let tokens = vec![
            make_token(TokenKind::Match, 0, 5),
            make_token(TokenKind::Eof, 5, 5),
        ];
        let mut parser = Parser::new(tokens, "", Dialect::V2_0);

        assert!(parser.consume(&TokenKind::Match).is_ok());
        assert_eq!(parser.peek_kind(), TokenKind::Eof);
        assert!(parser.consume(&TokenKind::Return).is_err());
    }

    #[test]
    fn test_match_keyword() {
        let tokens = vec![
            make_token(TokenKind::Match, 0, 5),
            make_token(TokenKind::Eof, 5, 5),
        ];
        let mut parser = Parser::new(tokens, "", Dialect::V2_0);

        assert!(parser.match_keyword(&TokenKind::Match).is_some());
        assert_eq!(parser.peek_kind(), TokenKind::Eof);
        assert!(parser.match_keyword(&TokenKind::Return).is_none());
    }
}
