//! Token types for the query lexer.

use crate::ast::Span;
use smol_str::SmolStr;
use std::fmt;

/// The kind of a lexical token.
///
/// Reserved words still lex to their own `TokenKind` variant (not a generic
/// `Identifier`) because clause parsing needs to recognize them — but the
/// label/relationship-type grammar production accepts *any* keyword token's
/// display text too, since keywords like `WHERE`, `ON`, `CREATE` may
/// legally appear as labels or relationship types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Clause keywords
    Start,
    Match,
    Where,
    With,
    Create,
    Unique,
    Set,
    Remove,
    Delete,
    Foreach,
    Return,
    Order,
    By,
    Skip,
    Limit,
    Asc,
    Ascending,
    Desc,
    Descending,
    Union,
    All,
    Distinct,
    Optional,
    Using,
    Index,
    Scan,
    Drop,
    Constraint,
    On,
    Assert,

    // Operators that are also keywords
    Is,
    Not,
    And,
    Or,
    Xor,
    In,
    As,

    // CASE
    Case,
    When,
    Then,
    Else,
    End,

    // Literal keywords
    True,
    False,
    Null,

    // Identifiers
    Identifier(SmolStr),
    DelimitedIdentifier(SmolStr),

    // Literals
    StringLiteral(SmolStr),
    IntegerLiteral(i64),
    FloatLiteral(f64),

    // Operators
    Plus,       // +
    Minus,      // -
    Star,       // *
    Slash,      // /
    Percent,    // %
    Caret,      // ^
    Eq,         // =
    NotEq,      // <>
    Lt,         // <
    Gt,         // >
    LtEq,       // <=
    GtEq,       // >=
    Arrow,      // ->
    LeftArrow,  // <-
    Question,   // ?
    Bang,       // !
    Pipe,       // |
    PipeColon,  // |:
    DotDot,     // ..
    RegexMatch, // =~

    // Punctuation
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Semicolon,
    Dot,
    Colon,

    Eof,
}

impl TokenKind {
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Start
                | TokenKind::Match
                | TokenKind::Where
                | TokenKind::With
                | TokenKind::Create
                | TokenKind::Unique
                | TokenKind::Set
                | TokenKind::Remove
                | TokenKind::Delete
                | TokenKind::Foreach
                | TokenKind::Return
                | TokenKind::Order
                | TokenKind::By
                | TokenKind::Skip
                | TokenKind::Limit
                | TokenKind::Asc
                | TokenKind::Ascending
                | TokenKind::Desc
                | TokenKind::Descending
                | TokenKind::Union
                | TokenKind::All
                | TokenKind::Distinct
                | TokenKind::Optional
                | TokenKind::Using
                | TokenKind::Index
                | TokenKind::Scan
                | TokenKind::Drop
                | TokenKind::Constraint
                | TokenKind::On
                | TokenKind::Assert
                | TokenKind::Is
                | TokenKind::Not
                | TokenKind::And
                | TokenKind::Or
                | TokenKind::Xor
                | TokenKind::In
                | TokenKind::As
                | TokenKind::Case
                | TokenKind::When
                | TokenKind::Then
                | TokenKind::Else
                | TokenKind::End
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Null
        )
    }

    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::StringLiteral(_)
                | TokenKind::IntegerLiteral(_)
                | TokenKind::FloatLiteral(_)
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Null
        )
    }

    pub fn is_operator(&self) -> bool {
        matches!(
            self,
            TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Star
                | TokenKind::Slash
                | TokenKind::Percent
                | TokenKind::Caret
                | TokenKind::Eq
                | TokenKind::NotEq
                | TokenKind::Lt
                | TokenKind::Gt
                | TokenKind::LtEq
                | TokenKind::GtEq
                | TokenKind::Arrow
                | TokenKind::LeftArrow
                | TokenKind::Question
                | TokenKind::Bang
                | TokenKind::Pipe
                | TokenKind::PipeColon
                | TokenKind::DotDot
                | TokenKind::RegexMatch
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Start => write!(f, "START"),
            TokenKind::Match => write!(f, "MATCH"),
            TokenKind::Where => write!(f, "WHERE"),
            TokenKind::With => write!(f, "WITH"),
            TokenKind::Create => write!(f, "CREATE"),
            TokenKind::Unique => write!(f, "UNIQUE"),
            TokenKind::Set => write!(f, "SET"),
            TokenKind::Remove => write!(f, "REMOVE"),
            TokenKind::Delete => write!(f, "DELETE"),
            TokenKind::Foreach => write!(f, "FOREACH"),
            TokenKind::Return => write!(f, "RETURN"),
            TokenKind::Order => write!(f, "ORDER"),
            TokenKind::By => write!(f, "BY"),
            TokenKind::Skip => write!(f, "SKIP"),
            TokenKind::Limit => write!(f, "LIMIT"),
            TokenKind::Asc => write!(f, "ASC"),
            TokenKind::Ascending => write!(f, "ASCENDING"),
            TokenKind::Desc => write!(f, "DESC"),
            TokenKind::Descending => write!(f, "DESCENDING"),
            TokenKind::Union => write!(f, "UNION"),
            TokenKind::All => write!(f, "ALL"),
            TokenKind::Distinct => write!(f, "DISTINCT"),
            TokenKind::Optional => write!(f, "OPTIONAL"),
            TokenKind::Using => write!(f, "USING"),
            TokenKind::Index => write!(f, "INDEX"),
            TokenKind::Scan => write!(f, "SCAN"),
            TokenKind::Drop => write!(f, "DROP"),
            TokenKind::Constraint => write!(f, "CONSTRAINT"),
            TokenKind::On => write!(f, "ON"),
            TokenKind::Assert => write!(f, "ASSERT"),
            TokenKind::Is => write!(f, "IS"),
            TokenKind::Not => write!(f, "NOT"),
            TokenKind::And => write!(f, "AND"),
            TokenKind::Or => write!(f, "OR"),
            TokenKind::Xor => write!(f, "XOR"),
            TokenKind::In => write!(f, "IN"),
            TokenKind::As => write!(f, "AS"),
            TokenKind::Case => write!(f, "CASE"),
            TokenKind::When => write!(f, "WHEN"),
            TokenKind::Then => write!(f, "THEN"),
            TokenKind::Else => write!(f, "ELSE"),
            TokenKind::End => write!(f, "END"),
            TokenKind::True => write!(f, "TRUE"),
            TokenKind::False => write!(f, "FALSE"),
            TokenKind::Null => write!(f, "NULL"),
            TokenKind::Identifier(name) => write!(f, "{name}"),
            TokenKind::DelimitedIdentifier(name) => write!(f, "`{name}`"),
            TokenKind::StringLiteral(s) => write!(f, "'{s}'"),
            TokenKind::IntegerLiteral(n) => write!(f, "{n}"),
            TokenKind::FloatLiteral(n) => write!(f, "{n}"),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::Star => write!(f, "*"),
            TokenKind::Slash => write!(f, "/"),
            TokenKind::Percent => write!(f, "%"),
            TokenKind::Caret => write!(f, "^"),
            TokenKind::Eq => write!(f, "="),
            TokenKind::NotEq => write!(f, "<>"),
            TokenKind::Lt => write!(f, "<"),
            TokenKind::Gt => write!(f, ">"),
            TokenKind::LtEq => write!(f, "<="),
            TokenKind::GtEq => write!(f, ">="),
            TokenKind::Arrow => write!(f, "->"),
            TokenKind::LeftArrow => write!(f, "<-"),
            TokenKind::Question => write!(f, "?"),
            TokenKind::Bang => write!(f, "!"),
            TokenKind::Pipe => write!(f, "|"),
            TokenKind::PipeColon => write!(f, "|:"),
            TokenKind::DotDot => write!(f, ".."),
            TokenKind::RegexMatch => write!(f, "=~"),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::LBracket => write!(f, "["),
            TokenKind::RBracket => write!(f, "]"),
            TokenKind::LBrace => write!(f, "{{"),
            TokenKind::RBrace => write!(f, "}}"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Semicolon => write!(f, ";"),
            TokenKind::Dot => write!(f, "."),
            TokenKind::Colon => write!(f, ":"),
            TokenKind::Eof => write!(f, "<EOF>"),
        }
    }
}

/// A lexical token with its kind and source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.clone()]
    }

    /// The text a keyword or identifier token would contribute if used in a
    /// label/relationship-type position.
    pub fn text(&self) -> SmolStr {
        match &self.kind {
            TokenKind::Identifier(s) | TokenKind::DelimitedIdentifier(s) => s.clone(),
            other => SmolStr::new(other.to_string()),
        }
    }
}
