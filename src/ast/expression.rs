//! Expression AST.
//!
//! A closed tagged-variant set. Desugaring at parse time — `IN` to
//! `AnyInCollection`, `filter`/comprehension forms, boolean literal
//! lowering per dialect, `<>` to `Not(Eq(...))` — happens in the
//! expression parser; this module only defines the shapes it builds.

use crate::ast::pattern::ParsedPath;
use crate::ast::span::Span;
use smol_str::SmolStr;

/// The synthetic iterator name reserved for `IN`-over-collection desugaring.
/// Observable to downstream consumers; never change this string.
pub const INNER_VAR: &str = "-_-INNER-_-";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BinaryArith {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    And,
    Or,
    Xor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhenThen {
    pub when: Expression,
    pub then: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    IntegerLiteral(i64, Span),
    FloatLiteral(f64, Span),
    StringLiteral(SmolStr, Span),
    /// Pre-2.0 boolean literal. From 2.0, `true`/`false` lower to
    /// [`Expression::True`]/`Not(True())` instead.
    BooleanLiteral(bool, Span),
    /// Canonical `true` from dialect ≥2.0.
    True(Span),
    Null(Span),
    ListLiteral(Vec<Expression>, Span),
    MapLiteral(Vec<(SmolStr, Expression)>, Span),
    Identifier(SmolStr, Span),
    Parameter(SmolStr, Span),
    Property(Box<Expression>, SmolStr, Span),
    /// `a.p?` (pre-2.0 only).
    Nullable(Box<Expression>, Span),
    /// `a.p!` (pre-2.0 only); `default` is the `NullablePredicate` default
    /// used in predicate positions (DESIGN NOTES, operator lowering).
    NullablePredicate(Box<Expression>, bool, Span),
    Arith(BinaryArith, Box<Expression>, Box<Expression>, Span),
    Neg(Box<Expression>, Span),
    Compare(Comparison, Box<Expression>, Box<Expression>, Span),
    /// `a =~ "literal"` — RHS is a string literal known at parse time.
    LiteralRegularExpression(Box<Expression>, SmolStr, Span),
    /// `a =~ expr` — RHS is an arbitrary expression.
    RegularExpression(Box<Expression>, Box<Expression>, Span),
    Boolean(BooleanOp, Box<Expression>, Box<Expression>, Span),
    Not(Box<Expression>, Span),
    FunctionCall {
        name: SmolStr,
        args: Vec<Expression>,
        distinct: bool,
        span: Span,
    },
    /// `count(*)`, a distinct case from `count(expr)`.
    CountStar(Span),
    HasLabel(Box<Expression>, SmolStr, Span),
    IsNull {
        expr: Box<Expression>,
        negated: bool,
        span: Span,
    },
    AnyInCollection {
        collection: Box<Expression>,
        variable: SmolStr,
        predicate: Box<Expression>,
        span: Span,
    },
    AllInCollection {
        collection: Box<Expression>,
        variable: SmolStr,
        predicate: Box<Expression>,
        span: Span,
    },
    NoneInCollection {
        collection: Box<Expression>,
        variable: SmolStr,
        predicate: Box<Expression>,
        span: Span,
    },
    SingleInCollection {
        collection: Box<Expression>,
        variable: SmolStr,
        predicate: Box<Expression>,
        span: Span,
    },
    FilterFunction {
        collection: Box<Expression>,
        variable: SmolStr,
        predicate: Box<Expression>,
        span: Span,
    },
    ExtractFunction {
        collection: Box<Expression>,
        variable: SmolStr,
        extract: Box<Expression>,
        span: Span,
    },
    ReduceFunction {
        collection: Box<Expression>,
        variable: SmolStr,
        expr: Box<Expression>,
        accumulator: SmolStr,
        init: Box<Expression>,
        span: Span,
    },
    SimpleCase {
        operand: Box<Expression>,
        whens: Vec<WhenThen>,
        else_branch: Option<Box<Expression>>,
        span: Span,
    },
    GenericCase {
        whens: Vec<WhenThen>,
        else_branch: Option<Box<Expression>>,
        span: Span,
    },
    /// `≥2.0` pattern-existence predicate, e.g. `WHERE (a)-[:KNOWS]->(b)`.
    PatternPredicate(Vec<ParsedPath>, Span),
    /// Pre-2.0 equivalent: `NonEmpty(PathExpression(patterns))`.
    NonEmpty(Vec<ParsedPath>, Span),
    ShortestPathExpression(ParsedPath, Span),
    Index(Box<Expression>, Box<Expression>, Span),
    Slice(Box<Expression>, Option<Box<Expression>>, Option<Box<Expression>>, Span),
}

impl Expression {
    pub fn span(&self) -> Span {
        use Expression::*;
        match self {
            IntegerLiteral(_, s)
            | FloatLiteral(_, s)
            | StringLiteral(_, s)
            | BooleanLiteral(_, s)
            | True(s)
            | Null(s)
            | ListLiteral(_, s)
            | MapLiteral(_, s)
            | Identifier(_, s)
            | Parameter(_, s)
            | Property(_, _, s)
            | Nullable(_, s)
            | NullablePredicate(_, _, s)
            | Arith(_, _, _, s)
            | Neg(_, s)
            | Compare(_, _, _, s)
            | LiteralRegularExpression(_, _, s)
            | RegularExpression(_, _, s)
            | Boolean(_, _, _, s)
            | Not(_, s)
            | CountStar(s)
            | HasLabel(_, _, s)
            | PatternPredicate(_, s)
            | NonEmpty(_, s)
            | ShortestPathExpression(_, s)
            | Index(_, _, s)
            | Slice(_, _, _, s) => s.clone(),
            IsNull { span, .. }
            | AnyInCollection { span, .. }
            | AllInCollection { span, .. }
            | NoneInCollection { span, .. }
            | SingleInCollection { span, .. }
            | FilterFunction { span, .. }
            | ExtractFunction { span, .. }
            | ReduceFunction { span, .. }
            | SimpleCase { span, .. }
            | GenericCase { span, .. }
            | FunctionCall { span, .. } => span.clone(),
        }
    }
}
