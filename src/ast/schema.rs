//! Standalone schema commands: top-level AQT values that are not a `Query`
//! or `Union`.

use crate::ast::span::Span;
use smol_str::SmolStr;

#[derive(Debug, Clone, PartialEq)]
pub enum SchemaCommand {
    CreateIndex {
        label: SmolStr,
        properties: Vec<SmolStr>,
        span: Span,
    },
    DropIndex {
        label: SmolStr,
        properties: Vec<SmolStr>,
        span: Span,
    },
    /// `CREATE CONSTRAINT ON (v:Label) ASSERT v.p IS UNIQUE`. The node
    /// variable appears twice positionally (`ON` and `ASSERT`); it is one
    /// binding here.
    CreateUniqueConstraint {
        variable: SmolStr,
        label: SmolStr,
        property: SmolStr,
        span: Span,
    },
}

/// A hint attached to the nearest enclosing query segment.
#[derive(Debug, Clone, PartialEq)]
pub enum Hint {
    /// `USING INDEX v:L(p)`.
    SchemaIndex {
        node: SmolStr,
        label: SmolStr,
        property: SmolStr,
        value: Option<crate::ast::expression::Expression>,
        span: Span,
    },
    /// `USING SCAN v:L`.
    NodeByLabel {
        node: SmolStr,
        label: SmolStr,
        span: Span,
    },
}
