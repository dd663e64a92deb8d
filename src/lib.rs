#![allow(rustdoc::broken_intra_doc_links, rustdoc::invalid_html_tags)]
//! Front end for a Cypher-family graph query language: lexes and parses
//! query text into an immutable Abstract Query Tree (AQT) for a downstream
//! planner.
//!
//! # Parse
//!
//! ```
//! use aqt_parser::{parse, DialectSelector};
//!
//! let source = "MATCH (n:Person) WHERE n.age > 18 RETURN n.name";
//! let outcome = parse(source, DialectSelector::default());
//! assert!(outcome.ast.is_some());
//! assert!(outcome.diagnostics.is_empty());
//! ```
//!
//! # Pin a dialect explicitly
//!
//! ```
//! use aqt_parser::{parse, Dialect, DialectSelector};
//!
//! let outcome = parse("start n = node(1) return n", DialectSelector::Explicit(Dialect::V1_9));
//! assert!(outcome.ast.is_some());
//! ```
//!
//! # Honor a leading dialect directive
//!
//! ```
//! use aqt_parser::{parse, DialectSelector};
//!
//! let outcome = parse("cypher v1_9 start n = node(1) return n", DialectSelector::FromDirective);
//! assert!(outcome.ast.is_some());
//! ```

pub mod ast;
pub mod diag;
pub mod dialect;
pub mod lexer;
pub mod parser;

// Re-export syntax span primitives.
pub use ast::{Span, Spanned};

// Re-export the AQT itself.
pub use ast::{
    Aggregation, Aqt, BinaryArith, BooleanOp, Comparison, CreateNodeAction,
    CreateRelationshipAction, Direction, Expression, Hint, IdsOrParam, INNER_VAR, IndexLookup,
    LabelOp, LimitValue, NamedPath, NodeRef, ParsedNode, ParsedPath, ParsedRel, PathSegment,
    PatternPart, Query, RelatedTo, ReturnItem, ReturnSpec, SchemaCommand, ShortestKind,
    ShortestPathPattern, SortItem, StartItem, Union, UniqueEndpoint, UniqueLinkAction,
    UpdateAction, VarLengthRelatedTo, WhenThen,
};

// Re-export dialect selection types.
pub use dialect::{Dialect, DialectSelector, consume_dialect_directive, parse_dialect_version};

// Re-export diagnostic types.
pub use diag::{
    Diag, DiagLabel, DiagSeverity, ErrorKind, SourceFile, convert_diagnostics_to_reports,
};

// Re-export lexer types.
pub use lexer::token::{Token, TokenKind};
pub use lexer::{Lexer, LexerResult, tokenize};

// Re-export the parser itself.
pub use parser::{ParseOutcome, Parser};

/// Parses query source text end-to-end: lexing, dialect resolution, and
/// parsing into an AQT. This is the crate's single entry point.
///
/// A leading `cypher <version> ` directive is always consumed from `source`
/// before lexing, regardless of `dialect`; its version only takes effect
/// when `dialect` is [`DialectSelector::FromDirective`] and is otherwise
/// ignored in favor of the explicit selector. Diagnostics are reported
/// against the query body that follows the directive, since the directive
/// itself is never part of the parsed text.
///
/// Parsing never partially recovers: `ast.is_some()` implies
/// `diagnostics.is_empty()` and vice versa.
pub fn parse(source: &str, dialect: DialectSelector) -> ParseOutcome {
    let (directive_dialect, body) = consume_dialect_directive(source);
    let resolved = match dialect {
        DialectSelector::Explicit(d) => d,
        DialectSelector::FromDirective => {
            directive_dialect.unwrap_or_else(Dialect::default_dialect)
        }
    };

    let lexed = tokenize(body);
    if !lexed.diagnostics.is_empty() {
        let source_file = SourceFile::new(body);
        let diagnostics = convert_diagnostics_to_reports(&lexed.diagnostics, &source_file);
        return ParseOutcome {
            ast: None,
            diagnostics,
        };
    }

    Parser::new(lexed.tokens, body, resolved).parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_accessible() {
        let _span: Span = 0..5;
        let _spanned = Spanned::new(42, 0..5);
    }

    #[test]
    fn parse_includes_lexer_diagnostics() {
        let outcome = parse("@", DialectSelector::default());
        assert!(outcome.ast.is_none());
        assert!(!outcome.diagnostics.is_empty());
    }

    #[test]
    fn parse_defaults_to_v2_0_when_no_directive_and_no_explicit_selector() {
        let outcome = parse("MATCH (n) RETURN n", DialectSelector::default());
        assert!(outcome.ast.is_some());
    }

    #[test]
    fn parse_honors_v1_9_directive() {
        let outcome = parse(
            "cypher v1_9 start n = node(1) return n",
            DialectSelector::FromDirective,
        );
        assert!(outcome.ast.is_some(), "{:?}", outcome.diagnostics);

        // bare MATCH (no START) is a v2_0-only feature; under the v1_9
        // directive it must fail.
        let outcome = parse(
            "cypher v1_9 MATCH (n) RETURN n",
            DialectSelector::FromDirective,
        );
        assert!(outcome.ast.is_none());
    }

    #[test]
    fn explicit_selector_overrides_directive_version() {
        // the directive says v1_9, but Explicit(V2_0) wins: bare MATCH
        // (no START) is legal here.
        let outcome = parse(
            "cypher v1_9 MATCH (n) RETURN n",
            DialectSelector::Explicit(Dialect::V2_0),
        );
        assert!(outcome.ast.is_some(), "{:?}", outcome.diagnostics);
    }

    #[test]
    fn directive_prefix_is_excluded_from_parsed_body() {
        // a lexical error inside the directive-stripped body should report
        // a span relative to the body, not the original source.
        let outcome = parse("cypher v2_0 @", DialectSelector::FromDirective);
        assert!(outcome.ast.is_none());
        assert!(!outcome.diagnostics.is_empty());
    }
}
