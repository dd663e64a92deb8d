//! Dialect selection for the query front end.
//!
//! Two grammar/desugaring variants are supported: `v1_9` and `v2_0`. They
//! share most of the surface grammar but differ in pattern semantics,
//! boolean literal lowering, the relationship-type list separator, and a
//! handful of dialect-gated clauses (`UNION`, schema DDL, label actions,
//! list comprehension, generic `CASE`, `reduce`, hints, bare `MATCH`).

use std::fmt;

/// A concrete grammar/desugaring dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// The older dialect: `|` type separator, `?`/`!` nullable postfix
    /// operators, boolean literals as plain values, no `UNION`, no schema
    /// DDL, no bare `MATCH` without `START`.
    V1_9,
    /// The newer dialect: `|:` type separator, optional-node propagation,
    /// `true`/`false` lowered to `True()`/`Not(True())`, `UNION`, schema DDL,
    /// label actions, list comprehension/extract, generic `CASE`, `reduce`,
    /// hints, bare `MATCH`.
    V2_0,
}

impl Dialect {
    /// The dialect chosen when no directive and no explicit selector apply.
    ///
    /// Open question (recorded in DESIGN.md): nothing pins down which
    /// dialect `default` resolves to. We pin `default` to the newer
    /// dialect, matching how a `cypher` front end
    /// that is still actively gaining features would set its own default.
    pub fn default_dialect() -> Dialect {
        Dialect::V2_0
    }

    /// True for the dialect where `UNION`, schema DDL, label actions, list
    /// comprehension, generic `CASE`, `reduce`, hints, and bare `MATCH` are
    /// legal.
    pub fn is_v2(self) -> bool {
        matches!(self, Dialect::V2_0)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::V1_9 => write!(f, "v1_9"),
            Dialect::V2_0 => write!(f, "v2_0"),
        }
    }
}

/// How the caller wants the dialect resolved for a given parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialectSelector {
    /// Use exactly this dialect; a leading `cypher <version>` directive, if
    /// present, is still consumed from the token stream (so the same query
    /// text behaves the same whether or not a caller pins the dialect) but
    /// its version is ignored in favor of the explicit selector.
    Explicit(Dialect),
    /// Honor a leading `cypher <version>` directive if present, otherwise
    /// fall back to [`Dialect::default_dialect`].
    FromDirective,
}

impl Default for DialectSelector {
    fn default() -> Self {
        DialectSelector::FromDirective
    }
}

/// Parses a version token's text (as it appears after `cypher `) into a
/// [`Dialect`]. Accepts `v1_9`, `1.9`, `v2_0`, `2.0` (case-insensitive).
pub fn parse_dialect_version(text: &str) -> Option<Dialect> {
    match text.to_ascii_lowercase().as_str() {
        "v1_9" | "1.9" => Some(Dialect::V1_9),
        "v2_0" | "2.0" => Some(Dialect::V2_0),
        _ => None,
    }
}

/// Strips a leading `cypher <version> ` directive (the wire form) from
/// `source`, returning the directive's dialect (if any) and the
/// remaining query body. The directive keyword, version, and at least one
/// byte of trailing whitespace must all be present and well-formed; a
/// malformed or unrecognized prefix is left untouched and treated as not a
/// directive at all (the query body is then the whole source).
pub fn consume_dialect_directive(source: &str) -> (Option<Dialect>, &str) {
    let trimmed = source.trim_start();

    let keyword_end = trimmed
        .find(|c: char| c.is_whitespace())
        .unwrap_or(trimmed.len());
    let keyword = &trimmed[..keyword_end];
    if !keyword.eq_ignore_ascii_case("cypher") || keyword_end >= trimmed.len() {
        return (None, source);
    }

    let after_keyword = trimmed[keyword_end..].trim_start_matches([' ', '\t']);
    let version_end = match after_keyword.find(|c: char| c.is_whitespace()) {
        Some(i) => i,
        None => return (None, source),
    };
    let version_text = &after_keyword[..version_end];
    let Some(dialect) = parse_dialect_version(version_text) else {
        return (None, source);
    };

    let body = after_keyword[version_end..].trim_start_matches([' ', '\t']);
    (Some(dialect), body)
}
