//! Pattern records: the normalized shapes path patterns are lowered into.
//!
//! The pattern parser itself works over a lower-level [`ParsedPath`]
//! representation shared by `MATCH`, `CREATE`, and `CREATE UNIQUE` (they all
//! parse the same path grammar but lower it differently — `MATCH` into
//! [`PatternPart`] records plus `WHERE` conjuncts, `CREATE`/`CREATE UNIQUE`
//! into update actions that keep the property maps `PatternPart` drops).

use crate::ast::expression::Expression;
use crate::ast::span::Span;
use smol_str::SmolStr;

/// Relationship direction as written, or after normalization (§4.4, §4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Out,
    In,
    Both,
}

/// A node endpoint reference. `SingleOptionalNode` is produced only in
/// dialect ≥2.0, by propagation from an incident optional relationship (I5).
#[derive(Debug, Clone, PartialEq)]
pub enum NodeRef {
    SingleNode { name: SmolStr, labels: Vec<SmolStr> },
    SingleOptionalNode { name: SmolStr, labels: Vec<SmolStr> },
}

impl NodeRef {
    pub fn name(&self) -> &SmolStr {
        match self {
            NodeRef::SingleNode { name, .. } => name,
            NodeRef::SingleOptionalNode { name, .. } => name,
        }
    }

    pub fn labels(&self) -> &[SmolStr] {
        match self {
            NodeRef::SingleNode { labels, .. } => labels,
            NodeRef::SingleOptionalNode { labels, .. } => labels,
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, NodeRef::SingleOptionalNode { .. })
    }

    /// Upgrades a `SingleNode` to `SingleOptionalNode` in place. A no-op if
    /// already optional.
    pub fn make_optional(self) -> NodeRef {
        match self {
            NodeRef::SingleNode { name, labels } | NodeRef::SingleOptionalNode { name, labels } => {
                NodeRef::SingleOptionalNode { name, labels }
            }
        }
    }
}

/// The four pattern-record shapes normalized `MATCH` patterns lower into.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternPart {
    RelatedTo(RelatedTo),
    VarLengthRelatedTo(VarLengthRelatedTo),
    ShortestPath(ShortestPathPattern),
    SingleNode(NodeRef),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelatedTo {
    pub from: NodeRef,
    pub to: NodeRef,
    pub rel_name: SmolStr,
    pub types: Vec<SmolStr>,
    pub direction: Direction,
    pub optional: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarLengthRelatedTo {
    pub path_name: SmolStr,
    pub from: NodeRef,
    pub to: NodeRef,
    pub min: Option<u32>,
    pub max: Option<u32>,
    pub types: Vec<SmolStr>,
    pub direction: Direction,
    pub rel_binding: Option<SmolStr>,
    pub optional: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPathPattern {
    pub name: SmolStr,
    pub from: NodeRef,
    pub to: NodeRef,
    pub types: Vec<SmolStr>,
    pub direction: Direction,
    pub max: Option<u32>,
    pub optional: bool,
    /// `true` for `shortestPath(...)`, `false` for `allShortestPaths(...)`.
    pub single: bool,
    pub rel_binding: Option<SmolStr>,
    pub span: Span,
}

/// A path bound to a name via `p = ...`, recording the author-written node
/// and relationship sequence (direction unnormalized) so `nodes(p)`,
/// `rels(p)`, and `length(p)` can recover the original shape (§4.7).
#[derive(Debug, Clone, PartialEq)]
pub struct NamedPath {
    pub name: SmolStr,
    pub segments: Vec<PathSegment>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    Node(NodeRef),
    Relationship {
        name: SmolStr,
        types: Vec<SmolStr>,
        direction: Direction,
        var_length: Option<(Option<u32>, Option<u32>)>,
        optional: bool,
    },
}

/// `single` vs `all` for a `shortestPath`/`allShortestPaths` call, shared by
/// the pattern parser and the `ShortestPathExpression` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortestKind {
    Single,
    All,
}

/// One node as written in a path, before it is known whether the path is
/// being lowered for `MATCH` (property maps become `WHERE` conjuncts) or for
/// `CREATE`/`CREATE UNIQUE` (property maps are kept on the action).
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedNode {
    pub name: SmolStr,
    pub labels: Vec<SmolStr>,
    pub properties: Option<Expression>,
    /// Written as a bare identifier rather than `(identifier)` (pre-2.0 only,
    /// or the single-node `CREATE n` form). Preserved per DESIGN.md open
    /// question (a) even where it makes no AQT-shape difference.
    pub bare: bool,
    pub anonymous: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRel {
    pub name: SmolStr,
    pub types: Vec<SmolStr>,
    pub properties: Option<Expression>,
    pub direction: Direction,
    pub optional: bool,
    pub var_length: Option<(Option<u32>, Option<u32>)>,
    pub anonymous: bool,
    pub span: Span,
}

/// A full path as written: `nodes.len() == rels.len() + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPath {
    pub name: Option<SmolStr>,
    pub nodes: Vec<ParsedNode>,
    pub rels: Vec<ParsedRel>,
    pub shortest: Option<ShortestKind>,
    pub span: Span,
}
