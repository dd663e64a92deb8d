//! Expression grammar: precedence, desugaring, and the
//! dialect-gated forms, exercised end to end through `RETURN <expr>`.

use aqt_parser::{
    Aqt, BinaryArith, BooleanOp, Comparison, Dialect, DialectSelector, Expression, INNER_VAR,
    ReturnSpec, parse,
};

fn return_expr(source: &str, dialect: Dialect) -> Expression {
    let outcome = parse(source, DialectSelector::Explicit(dialect));
    assert!(outcome.ast.is_some(), "{:?}", outcome.diagnostics);
    let Aqt::Query(query) = outcome.ast.unwrap() else {
        panic!("expected a plain query");
    };
    let ReturnSpec::Items(mut items) = query.return_spec else {
        panic!("expected RETURN items");
    };
    items.remove(0).expr
}

#[test]
fn arithmetic_follows_the_precedence_ladder() {
    // `*` binds tighter than `+`.
    let expr = return_expr("RETURN 1 + 2 * 3", Dialect::V2_0);
    match expr {
        Expression::Arith(BinaryArith::Add, lhs, rhs, _) => {
            assert!(matches!(*lhs, Expression::IntegerLiteral(1, _)));
            assert!(matches!(*rhs, Expression::Arith(BinaryArith::Mul, _, _, _)));
        }
        other => panic!("unexpected shape: {other:?}"),
    }
}

#[test]
fn power_is_right_associative_and_binds_tighter_than_unary_minus() {
    let expr = return_expr("RETURN -2^2", Dialect::V2_0);
    match expr {
        Expression::Neg(inner, _) => {
            assert!(matches!(*inner, Expression::Arith(BinaryArith::Pow, _, _, _)));
        }
        other => panic!("unexpected shape: {other:?}"),
    }
}

#[test]
fn boolean_operators_respect_or_xor_and_not_ordering() {
    let expr = return_expr("RETURN true OR false XOR true AND NOT false", Dialect::V2_0);
    // top level must be OR, since OR is the loosest operator.
    assert!(matches!(expr, Expression::Boolean(BooleanOp::Or, _, _, _)));
}

#[test]
fn property_access_binds_tighter_than_unary_minus() {
    let expr = return_expr("RETURN -a.p", Dialect::V2_0);
    match expr {
        Expression::Neg(inner, _) => {
            assert!(matches!(*inner, Expression::Property(_, _, _)));
        }
        other => panic!("unexpected shape: {other:?}"),
    }
}

#[test]
fn not_equal_desugars_to_not_of_eq() {
    let expr = return_expr("RETURN a <> b", Dialect::V2_0);
    match expr {
        Expression::Not(inner, _) => {
            assert!(matches!(*inner, Expression::Compare(Comparison::Eq, _, _, _)));
        }
        other => panic!("unexpected shape: {other:?}"),
    }
}

#[test]
fn in_desugars_to_any_in_collection_with_inner_var_predicate() {
    let expr = return_expr("RETURN x IN [1, 2, 3]", Dialect::V2_0);
    match expr {
        Expression::AnyInCollection {
            variable, predicate, ..
        } => {
            assert_eq!(variable, INNER_VAR);
            match *predicate {
                Expression::Compare(Comparison::Eq, lhs, _, _) => {
                    assert!(matches!(*lhs, Expression::Identifier(ref n, _) if n == INNER_VAR));
                }
                other => panic!("unexpected predicate shape: {other:?}"),
            }
        }
        other => panic!("unexpected shape: {other:?}"),
    }
}

#[test]
fn boolean_literals_lower_differently_per_dialect() {
    let v2 = return_expr("RETURN true", Dialect::V2_0);
    assert!(matches!(v2, Expression::True(_)));

    let v2_false = return_expr("RETURN false", Dialect::V2_0);
    assert!(matches!(v2_false, Expression::Not(_, _)));

    let v1 = return_expr("RETURN true", Dialect::V1_9);
    assert!(matches!(v1, Expression::BooleanLiteral(true, _)));
}

#[test]
fn nullable_postfix_operators_are_pre_2_0_only() {
    let expr = return_expr("RETURN a.p?", Dialect::V1_9);
    assert!(matches!(expr, Expression::Nullable(_, _)));

    let outcome = parse("RETURN a.p?", DialectSelector::Explicit(Dialect::V2_0));
    assert!(outcome.ast.is_none());
}

#[test]
fn count_star_is_distinct_from_count_of_expr() {
    let star = return_expr("RETURN count(*)", Dialect::V2_0);
    assert!(matches!(star, Expression::CountStar(_)));

    let call = return_expr("RETURN count(n)", Dialect::V2_0);
    assert!(matches!(call, Expression::FunctionCall { .. }));
}

#[test]
fn has_label_expression_form_is_v2_only() {
    let expr = return_expr("RETURN n:Person", Dialect::V2_0);
    assert!(matches!(expr, Expression::HasLabel(_, _, _)));

    let outcome = parse("RETURN n:Person", DialectSelector::Explicit(Dialect::V1_9));
    assert!(outcome.ast.is_none());
}

#[test]
fn list_comprehension_forms_are_v2_only() {
    for source in [
        "RETURN filter(x IN [1,2] WHERE x > 1)",
        "RETURN extract(x IN [1,2] | x * 2)",
        "RETURN reduce(acc = 0, x IN [1,2] | acc + x)",
    ] {
        let outcome = parse(source, DialectSelector::Explicit(Dialect::V2_0));
        assert!(outcome.ast.is_some(), "{source}: {:?}", outcome.diagnostics);

        let outcome = parse(source, DialectSelector::Explicit(Dialect::V1_9));
        assert!(outcome.ast.is_none(), "{source} should be rejected pre-2.0");
    }
}

#[test]
fn any_all_none_single_predicates_desugar_with_explicit_variable() {
    let expr = return_expr("RETURN any(x IN [1,2,3] WHERE x > 1)", Dialect::V2_0);
    match expr {
        Expression::AnyInCollection { variable, .. } => assert_eq!(variable, "x"),
        other => panic!("unexpected shape: {other:?}"),
    }
}

#[test]
fn generic_case_requires_v2() {
    let source = "RETURN CASE WHEN 1 = 1 THEN 'a' ELSE 'b' END";
    let outcome = parse(source, DialectSelector::Explicit(Dialect::V2_0));
    assert!(outcome.ast.is_some(), "{:?}", outcome.diagnostics);

    let outcome = parse(source, DialectSelector::Explicit(Dialect::V1_9));
    assert!(outcome.ast.is_none());
}

#[test]
fn simple_case_is_allowed_in_both_dialects() {
    let source = "RETURN CASE n.kind WHEN 1 THEN 'a' ELSE 'b' END";
    for dialect in [Dialect::V1_9, Dialect::V2_0] {
        let outcome = parse(source, DialectSelector::Explicit(dialect));
        assert!(outcome.ast.is_some(), "{dialect}: {:?}", outcome.diagnostics);
    }
}

#[test]
fn index_and_slice_postfix_forms() {
    let expr = return_expr("RETURN xs[0]", Dialect::V2_0);
    assert!(matches!(expr, Expression::Index(_, _, _)));

    let expr = return_expr("RETURN xs[1..3]", Dialect::V2_0);
    assert!(matches!(expr, Expression::Slice(_, Some(_), Some(_), _)));

    let expr = return_expr("RETURN xs[..3]", Dialect::V2_0);
    assert!(matches!(expr, Expression::Slice(_, None, Some(_), _)));
}

#[test]
fn map_literal_and_parameter_reference_are_disambiguated_by_one_token_lookahead() {
    let expr = return_expr("RETURN {name}", Dialect::V2_0);
    assert!(matches!(expr, Expression::Parameter(_, _)));

    let expr = return_expr("RETURN {name: 'Alice'}", Dialect::V2_0);
    assert!(matches!(expr, Expression::MapLiteral(_, _)));
}

#[test]
fn regex_match_distinguishes_literal_from_expression_rhs() {
    let expr = return_expr("RETURN a =~ 'x.*'", Dialect::V2_0);
    assert!(matches!(expr, Expression::LiteralRegularExpression(_, _, _)));

    let expr = return_expr("RETURN a =~ p", Dialect::V2_0);
    assert!(matches!(expr, Expression::RegularExpression(_, _, _)));
}
