//! AST foundation types and node structures.

pub mod expression;
pub mod pattern;
pub mod query;
pub mod schema;
mod span;
pub mod update;

// Re-export span types
pub use span::{Span, Spanned};

pub use expression::{
    BinaryArith, BooleanOp, Comparison, Expression, WhenThen, INNER_VAR,
};
pub use pattern::{
    Direction, NamedPath, NodeRef, ParsedNode, ParsedPath, ParsedRel, PathSegment, PatternPart,
    RelatedTo, ShortestKind, ShortestPathPattern, VarLengthRelatedTo,
};
pub use query::{
    Aggregation, Aqt, IdsOrParam, IndexLookup, LimitValue, Query, ReturnItem, ReturnSpec,
    SortItem, StartItem, Union,
};
pub use schema::{Hint, SchemaCommand};
pub use update::{
    CreateNodeAction, CreateRelationshipAction, LabelOp, UniqueEndpoint, UniqueLinkAction,
    UpdateAction,
};
