//! Lexical analysis for the query front end.
//!
//! A single-pass, forward-only scanner over a UTF-8 byte slice. It does not
//! error-recover: the first lexical error stops scanning, matching the
//! parser's first-error-stops policy. Comments are `//` to end-of-line
//! only — no block comments, since the grammar this lexer serves never had
//! them.
//!
//! `{name}` parameter syntax is deliberately NOT tokenized here: `{` also
//! opens a property map literal, and the two are only distinguishable by
//! looking past the first identifier for a `:` — that lookahead belongs to
//! the expression parser, not the lexer.

pub mod keywords;
pub mod token;

use crate::diag::Diag;
use token::{Token, TokenKind};

/// Result of lexical analysis: either the full token stream, or the first
/// lexical error encountered.
#[derive(Debug, Clone, PartialEq)]
pub struct LexerResult {
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<Diag>,
}

pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    tokens: Vec<Token>,
    diagnostics: Vec<Diag>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            tokens: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn tokenize(mut self) -> LexerResult {
        while !self.is_at_end() {
            self.skip_whitespace_and_comments();
            if self.is_at_end() {
                break;
            }
            self.scan_token();
            if !self.diagnostics.is_empty() {
                return LexerResult {
                    tokens: self.tokens,
                    diagnostics: self.diagnostics,
                };
            }
        }

        let eof_pos = self.source.len();
        self.tokens.push(Token::new(TokenKind::Eof, eof_pos..eof_pos));

        LexerResult {
            tokens: self.tokens,
            diagnostics: self.diagnostics,
        }
    }

    fn scan_token(&mut self) {
        let start = self.pos;
        let ch = self.advance();

        match ch {
            '(' => self.add_token(TokenKind::LParen, start),
            ')' => self.add_token(TokenKind::RParen, start),
            '[' => self.add_token(TokenKind::LBracket, start),
            ']' => self.add_token(TokenKind::RBracket, start),
            '{' => self.add_token(TokenKind::LBrace, start),
            '}' => self.add_token(TokenKind::RBrace, start),
            ',' => self.add_token(TokenKind::Comma, start),
            ';' => self.add_token(TokenKind::Semicolon, start),
            '+' => self.add_token(TokenKind::Plus, start),
            '*' => self.add_token(TokenKind::Star, start),
            '/' => self.add_token(TokenKind::Slash, start),
            '%' => self.add_token(TokenKind::Percent, start),
            '^' => self.add_token(TokenKind::Caret, start),
            '?' => self.add_token(TokenKind::Question, start),

            '-' => {
                if self.match_char('>') {
                    self.add_token(TokenKind::Arrow, start);
                } else {
                    self.add_token(TokenKind::Minus, start);
                }
            }
            '<' => {
                if self.match_char('-') {
                    self.add_token(TokenKind::LeftArrow, start);
                } else if self.match_char('=') {
                    self.add_token(TokenKind::LtEq, start);
                } else if self.match_char('>') {
                    self.add_token(TokenKind::NotEq, start);
                } else {
                    self.add_token(TokenKind::Lt, start);
                }
            }
            '>' => {
                if self.match_char('=') {
                    self.add_token(TokenKind::GtEq, start);
                } else {
                    self.add_token(TokenKind::Gt, start);
                }
            }
            '=' => {
                if self.match_char('~') {
                    self.add_token(TokenKind::RegexMatch, start);
                } else {
                    self.add_token(TokenKind::Eq, start);
                }
            }
            '!' => self.add_token(TokenKind::Bang, start),
            '|' => {
                if self.match_char(':') {
                    self.add_token(TokenKind::PipeColon, start);
                } else {
                    self.add_token(TokenKind::Pipe, start);
                }
            }
            ':' => self.add_token(TokenKind::Colon, start),
            '.' => {
                if self.match_char('.') {
                    self.add_token(TokenKind::DotDot, start);
                } else if self.peek().is_ascii_digit() {
                    self.scan_number_from_dot(start);
                } else {
                    self.add_token(TokenKind::Dot, start);
                }
            }

            '\'' | '"' => self.scan_string_literal(start, ch),
            '`' => self.scan_delimited_identifier(start),
            '0'..='9' => self.scan_number(start),
            'a'..='z' | 'A'..='Z' | '_' => self.scan_identifier_or_keyword(start),

            _ => {
                self.error(start, &format!("invalid character '{ch}'"), "E-LEX");
            }
        }
    }

    fn scan_identifier_or_keyword(&mut self, start: usize) {
        while self.is_identifier_continue(self.peek()) {
            self.advance();
        }

        let text = &self.source[start..self.pos];
        if let Some(kind) = keywords::lookup_keyword(text) {
            self.add_token(kind, start);
        } else {
            self.add_token(TokenKind::Identifier(text.into()), start);
        }
    }

    /// Escapes: `\t \n \r \" \' \\ \/`. No `\u` unicode escape.
    fn scan_string_literal(&mut self, start: usize, quote: char) {
        let mut value = String::new();

        loop {
            if self.is_at_end() {
                self.error(start, "unterminated string literal", "E-LEX");
                return;
            }
            let ch = self.peek();
            if ch == quote {
                self.advance();
                break;
            }
            if ch == '\\' {
                self.advance();
                if self.is_at_end() {
                    self.error(start, "unterminated string literal", "E-LEX");
                    return;
                }
                let escaped = self.advance();
                match escaped {
                    't' => value.push('\t'),
                    'n' => value.push('\n'),
                    'r' => value.push('\r'),
                    '"' => value.push('"'),
                    '\'' => value.push('\''),
                    '\\' => value.push('\\'),
                    '/' => value.push('/'),
                    other => {
                        self.error(
                            self.pos - other.len_utf8(),
                            &format!("invalid escape sequence '\\{other}'"),
                            "E-LEX",
                        );
                        return;
                    }
                }
            } else {
                value.push(self.advance());
            }
        }

        self.add_token(TokenKind::StringLiteral(value.into()), start);
    }

    /// Identifier: `[A-Za-z_][A-Za-z_0-9]*` or back-tick-quoted, with a
    /// doubled back-tick (` `` `) as the escape for a literal back-tick.
    fn scan_delimited_identifier(&mut self, start: usize) {
        let mut value = String::new();

        loop {
            if self.is_at_end() {
                self.error(start, "unterminated delimited identifier", "E-LEX");
                return;
            }
            if self.peek() == '`' {
                if self.peek_next() == '`' {
                    self.advance();
                    self.advance();
                    value.push('`');
                    continue;
                }
                self.advance();
                break;
            }
            value.push(self.advance());
        }

        self.add_token(TokenKind::DelimitedIdentifier(value.into()), start);
    }

    fn scan_number(&mut self, start: usize) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            self.advance();
            self.scan_float_tail(start);
            return;
        }
        if matches!(self.peek(), 'e' | 'E') {
            self.scan_exponent(start);
            return;
        }

        let text = &self.source[start..self.pos];
        match text.parse::<i64>() {
            Ok(n) => self.add_token(TokenKind::IntegerLiteral(n), start),
            Err(_) => self.error(start, &format!("malformed numeric literal '{text}'"), "E-LEX"),
        }
    }

    /// A leading-dot decimal like `.5`. `start` is the byte offset of the
    /// `.`; the caller already consumed it.
    fn scan_number_from_dot(&mut self, start: usize) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }
        if matches!(self.peek(), 'e' | 'E') {
            self.scan_exponent(start);
        } else {
            let text = &self.source[start..self.pos];
            match text.parse::<f64>() {
                Ok(n) => self.add_token(TokenKind::FloatLiteral(n), start),
                Err(_) => {
                    self.error(start, &format!("malformed numeric literal '{text}'"), "E-LEX")
                }
            }
        }
    }

    fn scan_float_tail(&mut self, start: usize) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }
        if matches!(self.peek(), 'e' | 'E') {
            self.scan_exponent(start);
        } else {
            let text = &self.source[start..self.pos];
            match text.parse::<f64>() {
                Ok(n) => self.add_token(TokenKind::FloatLiteral(n), start),
                Err(_) => {
                    self.error(start, &format!("malformed numeric literal '{text}'"), "E-LEX")
                }
            }
        }
    }

    fn scan_exponent(&mut self, start: usize) {
        self.advance(); // 'e'/'E'
        if matches!(self.peek(), '+' | '-') {
            self.advance();
        }
        if !self.peek().is_ascii_digit() {
            self.error(start, "malformed numeric literal: empty exponent", "E-LEX");
            return;
        }
        while self.peek().is_ascii_digit() {
            self.advance();
        }
        let text = &self.source[start..self.pos];
        match text.parse::<f64>() {
            Ok(n) => self.add_token(TokenKind::FloatLiteral(n), start),
            Err(_) => self.error(start, &format!("malformed numeric literal '{text}'"), "E-LEX"),
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                ' ' | '\t' | '\r' | '\n' => {
                    self.advance();
                }
                '/' if self.peek_next() == '/' => {
                    self.advance();
                    self.advance();
                    while self.peek() != '\n' && !self.is_at_end() {
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn is_identifier_continue(&self, ch: char) -> bool {
        ch.is_ascii_alphanumeric() || ch == '_'
    }

    fn add_token(&mut self, kind: TokenKind, start: usize) {
        self.tokens.push(Token::new(kind, start..self.pos));
    }

    fn error(&mut self, pos: usize, message: &str, code: &str) {
        let span = pos..pos.saturating_add(1).min(self.source.len()).max(pos);
        self.diagnostics.push(
            Diag::error(message)
                .with_primary_label(span, "here")
                .with_code(code),
        );
    }

    fn peek(&self) -> char {
        self.source[self.pos..].chars().next().unwrap_or('\0')
    }

    fn peek_next(&self) -> char {
        let mut chars = self.source[self.pos..].chars();
        chars.next();
        chars.next().unwrap_or('\0')
    }

    fn advance(&mut self) -> char {
        let ch = self.peek();
        if ch != '\0' {
            self.pos += ch.len_utf8();
        }
        ch
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.source.len()
    }
}

/// Convenience function to tokenize a source string.
pub fn tokenize(source: &str) -> LexerResult {
    Lexer::new(source).tokenize()
}
