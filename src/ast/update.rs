//! Update actions: the ordered list of mutation steps a `Query` carries
//! alongside its read clauses.

use crate::ast::expression::Expression;
use crate::ast::pattern::Direction;
use crate::ast::span::Span;
use smol_str::SmolStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelOp {
    Set,
    Remove,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateNodeAction {
    pub name: SmolStr,
    pub labels: Vec<SmolStr>,
    pub properties: Option<Expression>,
    /// See DESIGN.md open question (a): `CREATE n` and `CREATE (n)` build the
    /// same action but differ in this flag.
    pub bare: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateRelationshipAction {
    pub name: SmolStr,
    pub rel_type: SmolStr,
    pub from: SmolStr,
    pub to: SmolStr,
    pub direction: Direction,
    pub properties: Option<Expression>,
    pub span: Span,
}

/// One endpoint of a `CREATE UNIQUE` link. Unlike `PatternPart` endpoints,
/// these keep their property map (parameter or literal) because `CREATE
/// UNIQUE` may need to create the endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct UniqueEndpoint {
    pub name: SmolStr,
    pub labels: Vec<SmolStr>,
    pub properties: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UniqueLinkAction {
    pub left: UniqueEndpoint,
    pub right: UniqueEndpoint,
    pub rel_name: SmolStr,
    pub rel_type: Option<SmolStr>,
    pub direction: Direction,
    pub rel_properties: Option<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UpdateAction {
    CreateNode(CreateNodeAction),
    CreateRelationship(CreateRelationshipAction),
    DeleteEntity {
        expr: Expression,
        span: Span,
    },
    /// `DELETE n.p`, accepted only in v1_9.
    DeleteProperty {
        target: Expression,
        property: SmolStr,
        span: Span,
    },
    PropertySet {
        target: Expression,
        property: SmolStr,
        value: Expression,
        span: Span,
    },
    /// `SET n = {map}`.
    MapPropertySet {
        target: SmolStr,
        value: Expression,
        span: Span,
    },
    /// `SET n:Label…` / `REMOVE n:Label…` (≥2.0 only).
    LabelAction {
        target: SmolStr,
        op: LabelOp,
        labels: Vec<SmolStr>,
        span: Span,
    },
    Foreach {
        iterable: Expression,
        variable: SmolStr,
        actions: Vec<UpdateAction>,
        span: Span,
    },
    UniqueLink(UniqueLinkAction),
}
