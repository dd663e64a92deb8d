//! Concrete end-to-end scenarios, verbatim inputs and dialects.

use aqt_parser::{
    Aqt, Dialect, DialectSelector, Direction, IdsOrParam, LimitValue, NodeRef, PatternPart,
    ReturnSpec, StartItem, parse,
};

#[test]
fn scenario_1_start_and_return_the_same_identifier() {
    for dialect in [Dialect::V1_9, Dialect::V2_0] {
        let outcome = parse("start s = NODE(1) return s", DialectSelector::Explicit(dialect));
        assert!(outcome.ast.is_some(), "{dialect}: {:?}", outcome.diagnostics);
        let Aqt::Query(query) = outcome.ast.unwrap() else {
            panic!("expected a plain query");
        };
        assert!(matches!(
            &query.start_items[0],
            StartItem::NodeById { name, ids: IdsOrParam::Ids(ids), .. }
                if name == "s" && ids == &vec![1]
        ));
        let ReturnSpec::Items(items) = query.return_spec else {
            panic!("expected RETURN items");
        };
        assert_eq!(items[0].alias, "s");
    }
}

#[test]
fn scenario_2_anonymous_relationship_offset_is_dialect_independent() {
    let source = "start a = NODE(1) match a -[:KNOWS]-> (b) return a, b";
    let outcome = parse(source, DialectSelector::Explicit(Dialect::V2_0));
    assert!(outcome.ast.is_some(), "{:?}", outcome.diagnostics);
    let Aqt::Query(query) = outcome.ast.unwrap() else {
        panic!("expected a plain query");
    };
    match &query.matches[0] {
        PatternPart::RelatedTo(rel) => {
            assert_eq!(rel.rel_name, "  UNNAMED26");
            assert_eq!(rel.types.len(), 1);
            assert_eq!(rel.types[0], "KNOWS");
            assert_eq!(rel.direction, Direction::Out);
            assert_eq!(rel.from.name(), "a");
            assert_eq!(rel.to.name(), "b");
        }
        other => panic!("unexpected shape: {other:?}"),
    }

    // see DESIGN.md open question decision 9: this parser's own
    // byte-offset rule for anonymous names does not depend on dialect, so
    // the same offset is produced for the identical input under v1_9.
    let outcome = parse(source, DialectSelector::Explicit(Dialect::V1_9));
    assert!(outcome.ast.is_some(), "{:?}", outcome.diagnostics);
    let Aqt::Query(query) = outcome.ast.unwrap() else {
        panic!("expected a plain query");
    };
    match &query.matches[0] {
        PatternPart::RelatedTo(rel) => assert_eq!(rel.rel_name, "  UNNAMED26"),
        other => panic!("unexpected shape: {other:?}"),
    }
}

#[test]
fn scenario_3_single_relationship_optional_marker() {
    let source = "start a=node(0) match a -[r?*1..3]-> x return x";

    let outcome = parse(source, DialectSelector::Explicit(Dialect::V2_0));
    assert!(outcome.ast.is_some(), "{:?}", outcome.diagnostics);
    let Aqt::Query(query) = outcome.ast.unwrap() else {
        panic!("expected a plain query");
    };
    match &query.matches[0] {
        PatternPart::VarLengthRelatedTo(rel) => {
            assert_eq!(rel.path_name, "  UNNAMED24");
            assert!(matches!(rel.from, NodeRef::SingleNode { ref name, .. } if name == "a"));
            assert!(matches!(rel.to, NodeRef::SingleOptionalNode { ref name, .. } if name == "x"));
            assert_eq!(rel.min, Some(1));
            assert_eq!(rel.max, Some(3));
            assert!(rel.types.is_empty());
            assert_eq!(rel.direction, Direction::Out);
            assert_eq!(rel.rel_binding.as_deref(), Some("r"));
            assert!(rel.optional);
        }
        other => panic!("unexpected shape: {other:?}"),
    }

    let outcome = parse(source, DialectSelector::Explicit(Dialect::V1_9));
    assert!(outcome.ast.is_some(), "{:?}", outcome.diagnostics);
    let Aqt::Query(query) = outcome.ast.unwrap() else {
        panic!("expected a plain query");
    };
    match &query.matches[0] {
        PatternPart::VarLengthRelatedTo(rel) => {
            assert!(matches!(rel.to, NodeRef::SingleNode { ref name, .. } if name == "x"));
        }
        other => panic!("unexpected shape: {other:?}"),
    }
}

#[test]
fn scenario_4_with_splits_order_skip_limit_from_the_tail_where_and_return() {
    let source = "start n=node(0,1,2) with n order by ID(n) desc limit 2 where ID(n) = 1 return n";
    for dialect in [Dialect::V1_9, Dialect::V2_0] {
        let outcome = parse(source, DialectSelector::Explicit(dialect));
        assert!(outcome.ast.is_some(), "{dialect}: {:?}", outcome.diagnostics);
        let Aqt::Query(query) = outcome.ast.unwrap() else {
            panic!("expected a plain query");
        };
        assert!(matches!(
            &query.start_items[0],
            StartItem::NodeById { name, ids: IdsOrParam::Ids(ids), .. }
                if name == "n" && ids == &vec![0, 1, 2]
        ));
        assert_eq!(query.order_by.len(), 1);
        assert!(query.order_by[0].descending);
        assert_eq!(query.limit, Some(LimitValue::Literal(2)));
        assert!(query.where_clause.is_none());
        // `WITH n` projects through the same item grammar as `RETURN`.
        let ReturnSpec::Items(with_items) = &query.return_spec else {
            panic!("expected the WITH projection to populate return_spec");
        };
        assert_eq!(with_items.len(), 1);
        assert_eq!(with_items[0].alias, "n");

        let tail = query.tail.expect("expected a tail query");
        assert!(tail.where_clause.is_some());
        assert!(matches!(tail.return_spec, ReturnSpec::Items(_)));
        assert!(tail.order_by.is_empty());
        assert!(tail.limit.is_none());
    }
}

#[test]
fn scenario_5_boolean_literal_lowering_differs_by_dialect() {
    use aqt_parser::Expression;

    let outcome = parse(
        "start a = NODE(1) return true = false",
        DialectSelector::Explicit(Dialect::V2_0),
    );
    assert!(outcome.ast.is_some(), "{:?}", outcome.diagnostics);
    let Aqt::Query(query) = outcome.ast.unwrap() else {
        panic!("expected a plain query");
    };
    let ReturnSpec::Items(mut items) = query.return_spec else {
        panic!("expected RETURN items");
    };
    match items.remove(0).expr {
        Expression::Compare(aqt_parser::Comparison::Eq, lhs, rhs, _) => {
            assert!(matches!(*lhs, Expression::True(_)));
            assert!(matches!(*rhs, Expression::Not(_, _)));
        }
        other => panic!("unexpected shape: {other:?}"),
    }

    let outcome = parse(
        "start a = NODE(1) return true = false",
        DialectSelector::Explicit(Dialect::V1_9),
    );
    assert!(outcome.ast.is_some(), "{:?}", outcome.diagnostics);
    let Aqt::Query(query) = outcome.ast.unwrap() else {
        panic!("expected a plain query");
    };
    let ReturnSpec::Items(mut items) = query.return_spec else {
        panic!("expected RETURN items");
    };
    match items.remove(0).expr {
        Expression::Compare(aqt_parser::Comparison::Eq, lhs, rhs, _) => {
            assert!(matches!(*lhs, Expression::BooleanLiteral(true, _)));
            assert!(matches!(*rhs, Expression::BooleanLiteral(false, _)));
        }
        other => panic!("unexpected shape: {other:?}"),
    }
}

#[test]
fn scenario_6_union_all_vs_bare_union_distinct_flag() {
    let outcome = parse(
        "start s=NODE(1) return s UNION all start t=NODE(1) return t",
        DialectSelector::Explicit(Dialect::V2_0),
    );
    assert!(outcome.ast.is_some(), "{:?}", outcome.diagnostics);
    let Aqt::Union(union) = outcome.ast.unwrap() else {
        panic!("expected a union");
    };
    assert_eq!(union.queries.len(), 2);
    assert!(!union.distinct);

    let outcome = parse(
        "start s=NODE(1) return s UNION start t=NODE(1) return t",
        DialectSelector::Explicit(Dialect::V2_0),
    );
    assert!(outcome.ast.is_some(), "{:?}", outcome.diagnostics);
    let Aqt::Union(union) = outcome.ast.unwrap() else {
        panic!("expected a union");
    };
    assert!(union.distinct);
}
