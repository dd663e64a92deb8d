//! The root AQT shapes: `Query`, `Union`, and the start-item
//! variants a query's `START` clause (or legacy `CREATE`) can carry.

use crate::ast::expression::Expression;
use crate::ast::pattern::{NamedPath, PatternPart};
use crate::ast::schema::{Hint, SchemaCommand};
use crate::ast::span::Span;
use crate::ast::update::{CreateNodeAction, CreateRelationshipAction, UniqueLinkAction, UpdateAction};
use smol_str::SmolStr;

/// A literal integer list or a `{param}` reference, used by `NodeById` /
/// `RelById`.
#[derive(Debug, Clone, PartialEq)]
pub enum IdsOrParam {
    Ids(Vec<i64>),
    Parameter(SmolStr),
}

/// `NodeByIndex`'s two lookup shapes, shared with `RelByIndex` rather than
/// spelling out a separate `RelByIndexQuery` variant.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexLookup {
    KeyValue { key: Expression, value: Expression },
    Query(Expression),
}

#[derive(Debug, Clone, PartialEq)]
pub enum StartItem {
    NodeById {
        name: SmolStr,
        ids: IdsOrParam,
        span: Span,
    },
    RelById {
        name: SmolStr,
        ids: IdsOrParam,
        span: Span,
    },
    NodeByIndex {
        name: SmolStr,
        index: SmolStr,
        key: Expression,
        value: Expression,
        span: Span,
    },
    NodeByIndexQuery {
        name: SmolStr,
        index: SmolStr,
        query: Expression,
        span: Span,
    },
    RelByIndex {
        name: SmolStr,
        index: SmolStr,
        lookup: IndexLookup,
        span: Span,
    },
    AllNodes {
        name: SmolStr,
        span: Span,
    },
    AllRels {
        name: SmolStr,
        span: Span,
    },
    CreateNode(CreateNodeAction),
    CreateRel(CreateRelationshipAction),
    CreateUnique {
        links: Vec<UniqueLinkAction>,
        span: Span,
    },
}

/// A literal integer or a `{param}` reference, used by `SKIP`/`LIMIT`.
#[derive(Debug, Clone, PartialEq)]
pub enum LimitValue {
    Literal(i64),
    Parameter(SmolStr),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnItem {
    pub expr: Expression,
    pub alias: SmolStr,
    pub span: Span,
}

/// Invariant: exactly one of these three shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum ReturnSpec {
    Items(Vec<ReturnItem>),
    AllIdentifiers,
    /// Terminal update-only queries with no `RETURN` at all.
    Empty,
}

/// Marks a query as grouped. Present when `RETURN` contains at least one
/// aggregate expression, or when `RETURN DISTINCT` is used with none (a
/// grouping-only aggregation).
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    pub aggregate_expressions: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortItem {
    pub expr: Expression,
    pub descending: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub start_items: Vec<StartItem>,
    pub matches: Vec<PatternPart>,
    pub named_paths: Vec<NamedPath>,
    pub where_clause: Option<Expression>,
    pub hints: Vec<Hint>,
    pub updates: Vec<UpdateAction>,
    pub return_spec: ReturnSpec,
    pub aggregation: Option<Aggregation>,
    pub order_by: Vec<SortItem>,
    pub skip: Option<LimitValue>,
    pub limit: Option<LimitValue>,
    pub tail: Option<Box<Query>>,
    pub span: Span,
}

impl Query {
    /// A query with no clauses filled in, `return_spec = Empty`. Clause
    /// parsing fills fields in as it consumes the token stream.
    pub fn empty(span: Span) -> Query {
        Query {
            start_items: Vec::new(),
            matches: Vec::new(),
            named_paths: Vec::new(),
            where_clause: None,
            hints: Vec::new(),
            updates: Vec::new(),
            return_spec: ReturnSpec::Empty,
            aggregation: None,
            order_by: Vec::new(),
            skip: None,
            limit: None,
            tail: None,
            span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Union {
    pub queries: Vec<Query>,
    /// `true` for `UNION`, `false` for `UNION ALL` (I4: union-wide, not
    /// per-branch).
    pub distinct: bool,
    pub span: Span,
}

/// The top-level AQT value `parse` returns.
#[derive(Debug, Clone, PartialEq)]
pub enum Aqt {
    Query(Query),
    Union(Union),
    Schema(SchemaCommand),
}
