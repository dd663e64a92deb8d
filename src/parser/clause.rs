//! Clause grammar: `START`, `MATCH`, `WHERE`, `CREATE`,
//! `CREATE UNIQUE`, `SET`/`REMOVE`/`DELETE`/`FOREACH`, `WITH`, `RETURN`,
//! `ORDER BY`/`SKIP`/`LIMIT`, hints, and schema DDL.

use crate::ast::pattern::{Direction, NodeRef, ParsedNode, ParsedPath, PathSegment};
use crate::ast::update::{CreateNodeAction, CreateRelationshipAction, UniqueEndpoint, UniqueLinkAction};
use crate::ast::{
    Aggregation, BooleanOp, Expression, Hint, IdsOrParam, IndexLookup, LabelOp, LimitValue,
    NamedPath, PatternPart, Query, RelatedTo, ReturnItem, ReturnSpec, SchemaCommand,
    ShortestKind, ShortestPathPattern, SortItem, StartItem, UpdateAction, VarLengthRelatedTo,
};
use crate::diag::ErrorKind;
use crate::lexer::token::TokenKind;
use crate::parser::expression::parse_expression;
use crate::parser::Parser;
use smol_str::SmolStr;

pub(crate) fn parse_query(p: &mut Parser) -> Result<Query, ()> {
    let start = p.here();
    let mut query = Query::empty(start..start);

    if p.at(&TokenKind::Start) {
        parse_start_clause(p, &mut query)?;
    }

    let at_match = p.at(&TokenKind::Match)
        || (p.at(&TokenKind::Optional) && p.peek_nth(1).kind == TokenKind::Match);
    if at_match && query.start_items.is_empty() && !p.dialect.is_v2() {
        p.error_here(
            ErrorKind::DialectFeature,
            "MATCH without a preceding START clause is only available from dialect v2_0",
        );
        return Err(());
    }

    while p.at(&TokenKind::Match)
        || (p.at(&TokenKind::Optional) && p.peek_nth(1).kind == TokenKind::Match)
    {
        parse_match_clause(p, &mut query)?;
    }

    while p.at(&TokenKind::Using) {
        parse_hint(p, &mut query)?;
    }

    if p.at(&TokenKind::Where) {
        p.advance();
        let expr = parse_expression(p)?;
        merge_where(&mut query, expr);
    }

    loop {
        match p.peek_kind() {
            TokenKind::Create => {
                let as_start_item =
                    query.start_items.is_empty() && query.matches.is_empty() && query.where_clause.is_none();
                parse_create_clause(p, &mut query, as_start_item)?
            }
            TokenKind::Set => parse_set_clause(p, &mut query)?,
            TokenKind::Remove => parse_remove_clause(p, &mut query)?,
            TokenKind::Delete => parse_delete_clause(p, &mut query)?,
            TokenKind::Foreach => parse_foreach_clause(p, &mut query)?,
            _ => break,
        }
    }

    if p.at(&TokenKind::With) {
        parse_with(p, &mut query)?;
        let tail_start = p.here();
        query.tail = Some(Box::new(parse_query(p)?));
        let _ = tail_start;
        query.span = start..p.tokens[p.current.saturating_sub(1)].span.end;
        return Ok(query);
    }

    if p.at(&TokenKind::Return) {
        parse_return_clause(p, &mut query)?;
        parse_order_skip_limit(p, &mut query)?;
    }

    query.span = start..p.tokens[p.current.saturating_sub(1)].span.end.max(start);
    Ok(query)
}

// ---- START ----------------------------------------------------------

fn parse_start_clause(p: &mut Parser, query: &mut Query) -> Result<(), ()> {
    p.advance();
    query.start_items.push(parse_start_item(p)?);
    while p.at(&TokenKind::Comma) {
        p.advance();
        query.start_items.push(parse_start_item(p)?);
    }
    Ok(())
}

fn parse_start_item(p: &mut Parser) -> Result<StartItem, ()> {
    let start = p.here();
    let name = p.expect_identifier_text("as a start item variable")?;
    p.expect(&TokenKind::Eq, "after start item variable")?;

    let func = p.expect_identifier_text("as NODE/RELATIONSHIP function name")?;
    let lower = func.to_ascii_lowercase();
    p.expect(&TokenKind::LParen, "after NODE/RELATIONSHIP")?;

    let item = match lower.as_str() {
        "node" => parse_node_start_body(p, name.clone(), start)?,
        "relationship" | "rel" => parse_rel_start_body(p, name.clone(), start)?,
        _ => {
            p.error_here(ErrorKind::SemanticArity, format!("unknown start item function `{func}`"));
            return Err(());
        }
    };

    let close = p.expect(&TokenKind::RParen, "to close start item")?;
    Ok(retag_span(item, start..close.span.end))
}

fn retag_span(item: StartItem, span: crate::ast::Span) -> StartItem {
    match item {
        StartItem::NodeById { name, ids, .. } => StartItem::NodeById { name, ids, span },
        StartItem::RelById { name, ids, .. } => StartItem::RelById { name, ids, span },
        StartItem::NodeByIndex { name, index, key, value, .. } => {
            StartItem::NodeByIndex { name, index, key, value, span }
        }
        StartItem::NodeByIndexQuery { name, index, query, .. } => {
            StartItem::NodeByIndexQuery { name, index, query, span }
        }
        StartItem::RelByIndex { name, index, lookup, .. } => {
            StartItem::RelByIndex { name, index, lookup, span }
        }
        StartItem::AllNodes { name, .. } => StartItem::AllNodes { name, span },
        StartItem::AllRels { name, .. } => StartItem::AllRels { name, span },
        other => other,
    }
}

fn parse_node_start_body(p: &mut Parser, name: SmolStr, span_start: usize) -> Result<StartItem, ()> {
    if p.at(&TokenKind::Star) {
        p.advance();
        return Ok(StartItem::AllNodes { name, span: span_start..p.here() });
    }

    if let TokenKind::IntegerLiteral(_) = p.peek_kind() {
        let ids = parse_ids_or_param(p)?;
        return Ok(StartItem::NodeById { name, ids, span: span_start..p.here() });
    }
    if p.at(&TokenKind::LBrace) {
        let ids = parse_ids_or_param(p)?;
        return Ok(StartItem::NodeById { name, ids, span: span_start..p.here() });
    }

    // index lookup forms: NODE(index, "key", value) or NODE(index, "query")
    let index = p.expect_identifier_text("as index name")?;
    p.expect(&TokenKind::Comma, "after index name")?;
    let first = parse_expression(p)?;
    if p.at(&TokenKind::Comma) {
        p.advance();
        let value = parse_expression(p)?;
        return Ok(StartItem::NodeByIndex {
            name,
            index,
            key: first,
            value,
            span: span_start..p.here(),
        });
    }
    Ok(StartItem::NodeByIndexQuery {
        name,
        index,
        query: first,
        span: span_start..p.here(),
    })
}

fn parse_rel_start_body(p: &mut Parser, name: SmolStr, span_start: usize) -> Result<StartItem, ()> {
    if p.at(&TokenKind::Star) {
        p.advance();
        return Ok(StartItem::AllRels { name, span: span_start..p.here() });
    }

    if matches!(p.peek_kind(), TokenKind::IntegerLiteral(_)) || p.at(&TokenKind::LBrace) {
        let ids = parse_ids_or_param(p)?;
        return Ok(StartItem::RelById { name, ids, span: span_start..p.here() });
    }

    let index = p.expect_identifier_text("as index name")?;
    p.expect(&TokenKind::Comma, "after index name")?;
    let first = parse_expression(p)?;
    let lookup = if p.at(&TokenKind::Comma) {
        p.advance();
        let value = parse_expression(p)?;
        IndexLookup::KeyValue { key: first, value }
    } else {
        IndexLookup::Query(first)
    };
    Ok(StartItem::RelByIndex { name, index, lookup, span: span_start..p.here() })
}

fn parse_ids_or_param(p: &mut Parser) -> Result<IdsOrParam, ()> {
    if p.at(&TokenKind::LBrace) {
        return match p.parse_brace_expr()? {
            Expression::Parameter(name, _) => Ok(IdsOrParam::Parameter(name)),
            _ => {
                p.error_here(ErrorKind::SemanticArity, "expected a parameter reference for node/rel ids");
                Err(())
            }
        };
    }
    let mut ids = Vec::new();
    if let TokenKind::IntegerLiteral(n) = p.peek_kind() {
        p.advance();
        ids.push(n);
    }
    while p.at(&TokenKind::Comma) && matches!(p.peek_nth(1).kind, TokenKind::IntegerLiteral(_)) {
        p.advance();
        if let TokenKind::IntegerLiteral(n) = p.peek_kind() {
            p.advance();
            ids.push(n);
        }
    }
    Ok(IdsOrParam::Ids(ids))
}

// ---- MATCH ------------------------------------------------------------

fn parse_match_clause(p: &mut Parser, query: &mut Query) -> Result<(), ()> {
    let optional = if p.at(&TokenKind::Optional) {
        p.advance();
        true
    } else {
        false
    };
    p.expect(&TokenKind::Match, "at start of MATCH clause")?;

    if optional && !p.dialect.is_v2() {
        p.error_here(
            ErrorKind::DialectFeature,
            "OPTIONAL MATCH is only available from dialect v2_0",
        );
        return Err(());
    }

    let before = query.matches.len();

    let path = p.parse_pattern_path()?;
    lower_match_path(p, path, query)?;
    while p.at(&TokenKind::Comma) {
        p.advance();
        let path = p.parse_pattern_path()?;
        lower_match_path(p, path, query)?;
    }

    if optional {
        for part in &mut query.matches[before..] {
            mark_optional(part);
        }
    }

    Ok(())
}

fn mark_optional(part: &mut PatternPart) {
    match part {
        PatternPart::RelatedTo(r) => {
            r.optional = true;
            r.from = std::mem::replace(&mut r.from, NodeRef::SingleNode { name: SmolStr::default(), labels: Vec::new() }).make_optional();
            r.to = std::mem::replace(&mut r.to, NodeRef::SingleNode { name: SmolStr::default(), labels: Vec::new() }).make_optional();
        }
        PatternPart::VarLengthRelatedTo(r) => {
            r.optional = true;
            r.from = std::mem::replace(&mut r.from, NodeRef::SingleNode { name: SmolStr::default(), labels: Vec::new() }).make_optional();
            r.to = std::mem::replace(&mut r.to, NodeRef::SingleNode { name: SmolStr::default(), labels: Vec::new() }).make_optional();
        }
        PatternPart::ShortestPath(r) => {
            r.optional = true;
            r.from = std::mem::replace(&mut r.from, NodeRef::SingleNode { name: SmolStr::default(), labels: Vec::new() }).make_optional();
            r.to = std::mem::replace(&mut r.to, NodeRef::SingleNode { name: SmolStr::default(), labels: Vec::new() }).make_optional();
        }
        PatternPart::SingleNode(n) => {
            *n = std::mem::replace(n, NodeRef::SingleNode { name: SmolStr::default(), labels: Vec::new() }).make_optional();
        }
    }
}

fn node_ref_from_parsed(node: &ParsedNode) -> NodeRef {
    NodeRef::SingleNode {
        name: node.name.clone(),
        labels: node.labels.clone(),
    }
}

fn normalize_direction(from: NodeRef, to: NodeRef, direction: Direction) -> (NodeRef, NodeRef, Direction) {
    match direction {
        Direction::In => (to, from, Direction::Out),
        other => (from, to, other),
    }
}

fn lower_match_path(p: &mut Parser, path: ParsedPath, query: &mut Query) -> Result<(), ()> {
    if let Some(name) = path.name.clone() {
        let mut segments = Vec::new();
        for (i, node) in path.nodes.iter().enumerate() {
            segments.push(PathSegment::Node(node_ref_from_parsed(node)));
            if let Some(rel) = path.rels.get(i) {
                segments.push(PathSegment::Relationship {
                    name: rel.name.clone(),
                    types: rel.types.clone(),
                    direction: rel.direction,
                    var_length: rel.var_length,
                    optional: rel.optional,
                });
            }
        }
        query.named_paths.push(NamedPath { name, segments, span: path.span.clone() });
    }

    for node in &path.nodes {
        if let Some(props) = &node.properties {
            push_property_conjuncts(query, &node.name, props);
        }
    }
    for rel in &path.rels {
        if let Some(props) = &rel.properties {
            push_property_conjuncts(query, &rel.name, props);
        }
    }

    if path.shortest.is_some() {
        let from = node_ref_from_parsed(&path.nodes[0]);
        let to = node_ref_from_parsed(path.nodes.last().expect("path has at least one node"));
        let rel = path.rels.first();
        query.matches.push(PatternPart::ShortestPath(ShortestPathPattern {
            name: path.name.clone().unwrap_or_default(),
            from,
            to,
            types: rel.map(|r| r.types.clone()).unwrap_or_default(),
            direction: rel.map(|r| r.direction).unwrap_or(Direction::Out),
            max: rel.and_then(|r| r.var_length).and_then(|(_, max)| max),
            optional: false,
            single: path.shortest == Some(ShortestKind::Single),
            rel_binding: rel.filter(|r| !r.anonymous).map(|r| r.name.clone()),
            span: path.span.clone(),
        }));
        return Ok(());
    }

    if path.nodes.len() == 1 {
        query.matches.push(PatternPart::SingleNode(node_ref_from_parsed(&path.nodes[0])));
        return Ok(());
    }

    for (i, rel) in path.rels.iter().enumerate() {
        let from = node_ref_from_parsed(&path.nodes[i]);
        let to = node_ref_from_parsed(&path.nodes[i + 1]);
        let (from, to, direction) = normalize_direction(from, to, rel.direction);

        // A `-[r?]->` single-relationship-optional marker always makes the
        // edge itself optional; endpoint propagation to `SingleOptionalNode`
        // (I5) only happens from dialect v2_0, and only onto the endpoint
        // reached through the optional relationship, not the bound anchor.
        let to = if rel.optional && p.dialect.is_v2() { to.make_optional() } else { to };

        if let Some((min, max)) = rel.var_length {
            query.matches.push(PatternPart::VarLengthRelatedTo(VarLengthRelatedTo {
                path_name: super::pattern::anon_name(rel.span.start),
                from,
                to,
                min,
                max,
                types: rel.types.clone(),
                direction,
                rel_binding: if rel.anonymous { None } else { Some(rel.name.clone()) },
                optional: rel.optional,
                span: rel.span.clone(),
            }));
        } else {
            query.matches.push(PatternPart::RelatedTo(RelatedTo {
                from,
                to,
                rel_name: rel.name.clone(),
                types: rel.types.clone(),
                direction,
                optional: rel.optional,
                span: rel.span.clone(),
            }));
        }
    }

    Ok(())
}

fn push_property_conjuncts(query: &mut Query, entity: &SmolStr, props: &Expression) {
    match props {
        Expression::MapLiteral(entries, span) => {
            for (key, value) in entries {
                let conjunct = Expression::Compare(
                    crate::ast::Comparison::Eq,
                    Box::new(Expression::Property(
                        Box::new(Expression::Identifier(entity.clone(), span.clone())),
                        key.clone(),
                        span.clone(),
                    )),
                    Box::new(value.clone()),
                    span.clone(),
                );
                merge_where(query, conjunct);
            }
        }
        other => {
            let span = other.span();
            let conjunct = Expression::Compare(
                crate::ast::Comparison::Eq,
                Box::new(Expression::Identifier(entity.clone(), span.clone())),
                Box::new(other.clone()),
                span,
            );
            merge_where(query, conjunct);
        }
    }
}

fn merge_where(query: &mut Query, conjunct: Expression) {
    query.where_clause = Some(match query.where_clause.take() {
        None => conjunct,
        Some(existing) => {
            let span = existing.span().start..conjunct.span().end;
            Expression::Boolean(BooleanOp::And, Box::new(existing), Box::new(conjunct), span)
        }
    });
}

fn parse_hint(p: &mut Parser, query: &mut Query) -> Result<(), ()> {
    let start = p.here();
    if !p.dialect.is_v2() {
        p.error_here(ErrorKind::DialectFeature, "USING hints are only available from dialect v2_0");
        return Err(());
    }
    p.advance();
    if p.at(&TokenKind::Index) {
        p.advance();
        let node = p.expect_identifier_text("as hint node variable")?;
        p.expect(&TokenKind::Colon, "after hint node variable")?;
        let label = p.expect_label_text()?;
        p.expect(&TokenKind::LParen, "after hint label")?;
        let property = p.expect_identifier_text("as hint property")?;
        let close = p.expect(&TokenKind::RParen, "to close USING INDEX hint")?;
        query.hints.push(Hint::SchemaIndex {
            node,
            label,
            property,
            value: None,
            span: start..close.span.end,
        });
        return Ok(());
    }
    p.expect(&TokenKind::Scan, "after USING")?;
    let node = p.expect_identifier_text("as hint node variable")?;
    p.expect(&TokenKind::Colon, "after hint node variable")?;
    let label = p.expect_label_text()?;
    query.hints.push(Hint::NodeByLabel { node, label: label.clone(), span: start..p.here() });
    Ok(())
}

// ---- CREATE / CREATE UNIQUE -------------------------------------------

fn lower_create_path(path: &ParsedPath) -> (Vec<CreateNodeAction>, Vec<CreateRelationshipAction>) {
    let nodes = path
        .nodes
        .iter()
        .map(|n| CreateNodeAction {
            name: n.name.clone(),
            labels: n.labels.clone(),
            properties: n.properties.clone(),
            bare: n.bare,
            span: n.span.clone(),
        })
        .collect();

    let mut rels = Vec::new();
    for (i, rel) in path.rels.iter().enumerate() {
        let (from, to, direction) = match rel.direction {
            Direction::In => (path.nodes[i + 1].name.clone(), path.nodes[i].name.clone(), Direction::Out),
            other => (path.nodes[i].name.clone(), path.nodes[i + 1].name.clone(), other),
        };
        rels.push(CreateRelationshipAction {
            name: rel.name.clone(),
            rel_type: rel.types.first().cloned().unwrap_or_default(),
            from,
            to,
            direction,
            properties: rel.properties.clone(),
            span: rel.span.clone(),
        });
    }
    (nodes, rels)
}

/// `as_start_item` is set for `CREATE` clauses that open a query with no
/// preceding `START`/`MATCH` — modeled as a start item rather than an
/// update (see DESIGN.md).
pub(crate) fn parse_create_clause(p: &mut Parser, query: &mut Query, as_start_item: bool) -> Result<(), ()> {
    p.advance();

    if p.at(&TokenKind::Unique) {
        if !p.dialect.is_v2() {
            p.error_here(ErrorKind::DialectFeature, "CREATE UNIQUE is only available from dialect v2_0");
            return Err(());
        }
        p.advance();
        return parse_create_unique_body(p, query);
    }

    let as_start_item = as_start_item && query.matches.is_empty() && query.where_clause.is_none();

    let path = p.parse_pattern_path()?;
    push_create_path(query, &path, as_start_item);
    while p.at(&TokenKind::Comma) {
        p.advance();
        let path = p.parse_pattern_path()?;
        push_create_path(query, &path, as_start_item);
    }
    Ok(())
}

fn push_create_path(query: &mut Query, path: &ParsedPath, as_start_item: bool) {
    let (nodes, rels) = lower_create_path(path);
    if as_start_item {
        for node in nodes {
            query.start_items.push(StartItem::CreateNode(node));
        }
        for rel in rels {
            query.start_items.push(StartItem::CreateRel(rel));
        }
    } else {
        for node in nodes {
            query.updates.push(UpdateAction::CreateNode(node));
        }
        for rel in rels {
            query.updates.push(UpdateAction::CreateRelationship(rel));
        }
    }
}

fn parse_create_unique_body(p: &mut Parser, query: &mut Query) -> Result<(), ()> {
    let link = parse_unique_link(p)?;
    let mut links = vec![link];
    while p.at(&TokenKind::Comma) {
        p.advance();
        links.push(parse_unique_link(p)?);
    }
    if query.matches.is_empty() {
        let span = links.first().map(|l| l.span.start).unwrap_or(p.here())
            ..links.last().map(|l| l.span.end).unwrap_or(p.here());
        query.start_items.push(StartItem::CreateUnique { links, span });
    } else {
        for link in links {
            query.updates.push(UpdateAction::UniqueLink(link));
        }
    }
    Ok(())
}

fn parse_unique_link(p: &mut Parser) -> Result<UniqueLinkAction, ()> {
    let path = p.parse_pattern_path()?;
    if path.nodes.len() != 2 || path.rels.len() != 1 {
        p.error_at(path.span.clone(), ErrorKind::SemanticArity, "CREATE UNIQUE links connect exactly two endpoints");
        return Err(());
    }
    let rel = &path.rels[0];
    let left = unique_endpoint(&path.nodes[0]);
    let right = unique_endpoint(&path.nodes[1]);
    Ok(UniqueLinkAction {
        left,
        right,
        rel_name: rel.name.clone(),
        rel_type: rel.types.first().cloned(),
        direction: rel.direction,
        rel_properties: rel.properties.clone(),
        span: path.span,
    })
}

fn unique_endpoint(node: &ParsedNode) -> UniqueEndpoint {
    UniqueEndpoint {
        name: node.name.clone(),
        labels: node.labels.clone(),
        properties: node.properties.clone(),
    }
}

// ---- SET / REMOVE / DELETE / FOREACH -----------------------------------

fn parse_set_clause(p: &mut Parser, query: &mut Query) -> Result<(), ()> {
    p.advance();
    query.updates.push(parse_set_item(p)?);
    while p.at(&TokenKind::Comma) {
        p.advance();
        query.updates.push(parse_set_item(p)?);
    }
    Ok(())
}

fn parse_set_item(p: &mut Parser) -> Result<UpdateAction, ()> {
    let start = p.here();
    let target = p.expect_identifier_text("as a SET target")?;
    let target_end = p.tokens[p.current - 1].span.end;

    if p.at(&TokenKind::Dot) {
        p.advance();
        let property = p.expect_identifier_text("after `.` in SET")?;
        p.expect(&TokenKind::Eq, "after SET property target")?;
        let value = parse_expression(p)?;
        return Ok(UpdateAction::PropertySet {
            target: Expression::Identifier(target, start..target_end),
            property,
            value,
            span: start..p.here(),
        });
    }

    if p.at(&TokenKind::Colon) {
        if !p.dialect.is_v2() {
            p.error_here(ErrorKind::DialectFeature, "SET n:Label is only available from dialect v2_0");
            return Err(());
        }
        let mut labels = Vec::new();
        while p.at(&TokenKind::Colon) {
            p.advance();
            labels.push(p.expect_label_text()?);
        }
        return Ok(UpdateAction::LabelAction {
            target,
            op: LabelOp::Set,
            labels,
            span: start..p.here(),
        });
    }

    p.expect(&TokenKind::Eq, "after SET target")?;
    let value = parse_expression(p)?;
    Ok(UpdateAction::MapPropertySet {
        target,
        value,
        span: start..p.here(),
    })
}

fn parse_remove_clause(p: &mut Parser, query: &mut Query) -> Result<(), ()> {
    p.advance();
    query.updates.push(parse_remove_item(p)?);
    while p.at(&TokenKind::Comma) {
        p.advance();
        query.updates.push(parse_remove_item(p)?);
    }
    Ok(())
}

fn parse_remove_item(p: &mut Parser) -> Result<UpdateAction, ()> {
    let start = p.here();
    let target = p.expect_identifier_text("as a REMOVE target")?;
    let target_end = p.tokens[p.current - 1].span.end;

    if p.at(&TokenKind::Dot) {
        p.advance();
        let property = p.expect_identifier_text("after `.` in REMOVE")?;
        if !p.dialect.is_v2() {
            p.error_at(
                start..p.here(),
                ErrorKind::DialectFeature,
                "REMOVE n.p is only available from dialect v2_0; use DELETE n.p pre-2.0",
            );
            return Err(());
        }
        return Ok(UpdateAction::DeleteProperty {
            target: Expression::Identifier(target, start..target_end),
            property,
            span: start..p.here(),
        });
    }

    if !p.dialect.is_v2() {
        p.error_here(ErrorKind::DialectFeature, "REMOVE n:Label is only available from dialect v2_0");
        return Err(());
    }
    let mut labels = Vec::new();
    while p.at(&TokenKind::Colon) {
        p.advance();
        labels.push(p.expect_label_text()?);
    }
    Ok(UpdateAction::LabelAction {
        target,
        op: LabelOp::Remove,
        labels,
        span: start..p.here(),
    })
}

fn parse_delete_clause(p: &mut Parser, query: &mut Query) -> Result<(), ()> {
    p.advance();
    query.updates.push(parse_delete_item(p)?);
    while p.at(&TokenKind::Comma) {
        p.advance();
        query.updates.push(parse_delete_item(p)?);
    }
    Ok(())
}

fn parse_delete_item(p: &mut Parser) -> Result<UpdateAction, ()> {
    let start = p.here();
    let expr = parse_expression(p)?;
    if let Expression::Property(target, property, span) = expr {
        if !p.dialect.is_v2() {
            return Ok(UpdateAction::DeleteProperty { target: *target, property, span });
        }
        p.error_at(span, ErrorKind::DialectFeature, "DELETE n.p is only available pre-2.0");
        return Err(());
    }
    Ok(UpdateAction::DeleteEntity { expr, span: start..p.here() })
}

fn parse_foreach_clause(p: &mut Parser, query: &mut Query) -> Result<(), ()> {
    let start = p.here();
    p.advance();
    p.expect(&TokenKind::LParen, "after FOREACH")?;
    let variable = p.expect_identifier_text("as FOREACH iteration variable")?;
    p.expect(&TokenKind::In, "in FOREACH")?;
    let iterable = parse_expression(p)?;
    // `:` is quietly accepted as an alternate separator outside dialect
    // v2_0, alongside the normal `|`.
    if !p.dialect.is_v2() && p.at(&TokenKind::Colon) {
        p.advance();
    } else {
        p.expect(&TokenKind::Pipe, "before FOREACH actions")?;
    }

    let mut actions = Vec::new();
    loop {
        match p.peek_kind() {
            TokenKind::Set => {
                let mut nested = Query::empty(p.here()..p.here());
                parse_set_clause(p, &mut nested)?;
                actions.extend(nested.updates);
            }
            TokenKind::Remove => {
                let mut nested = Query::empty(p.here()..p.here());
                parse_remove_clause(p, &mut nested)?;
                actions.extend(nested.updates);
            }
            TokenKind::Delete => {
                let mut nested = Query::empty(p.here()..p.here());
                parse_delete_clause(p, &mut nested)?;
                actions.extend(nested.updates);
            }
            TokenKind::Create => {
                let mut nested = Query::empty(p.here()..p.here());
                parse_create_clause(p, &mut nested, false)?;
                actions.extend(nested.updates);
            }
            _ => break,
        }
    }

    let close = p.expect(&TokenKind::RParen, "to close FOREACH")?;
    query.updates.push(UpdateAction::Foreach {
        iterable,
        variable,
        actions,
        span: start..close.span.end,
    });
    Ok(())
}

// ---- WITH ---------------------------------------------------------------

fn parse_with(p: &mut Parser, query: &mut Query) -> Result<(), ()> {
    p.advance();
    parse_return_like(p, query)?;
    parse_order_skip_limit(p, query)
}

// ---- RETURN -------------------------------------------------------------

fn parse_return_clause(p: &mut Parser, query: &mut Query) -> Result<(), ()> {
    p.advance();
    parse_return_like(p, query)
}

fn parse_return_like(p: &mut Parser, query: &mut Query) -> Result<(), ()> {
    let distinct = if p.at(&TokenKind::Distinct) {
        p.advance();
        true
    } else {
        false
    };

    if p.at(&TokenKind::Star) {
        p.advance();
        query.return_spec = ReturnSpec::AllIdentifiers;
        if distinct {
            query.aggregation = Some(Aggregation { aggregate_expressions: Vec::new() });
        }
        return Ok(());
    }

    let mut items = vec![parse_return_item(p)?];
    while p.at(&TokenKind::Comma) {
        p.advance();
        items.push(parse_return_item(p)?);
    }

    let aggregate_expressions: Vec<Expression> =
        items.iter().filter(|item| is_aggregate(&item.expr)).map(|item| item.expr.clone()).collect();

    if !aggregate_expressions.is_empty() || distinct {
        query.aggregation = Some(Aggregation { aggregate_expressions });
    }

    query.return_spec = ReturnSpec::Items(items);
    Ok(())
}

fn is_aggregate(expr: &Expression) -> bool {
    match expr {
        Expression::CountStar(_) => true,
        Expression::FunctionCall { name, .. } => matches!(
            name.to_ascii_lowercase().as_str(),
            "count"
                | "sum"
                | "avg"
                | "min"
                | "max"
                | "collect"
                | "percentilecont"
                | "percentiledisc"
                | "stdev"
                | "stdevp"
        ),
        _ => false,
    }
}

fn parse_return_item(p: &mut Parser) -> Result<ReturnItem, ()> {
    let start = p.here();
    let expr = parse_expression(p)?;
    let alias = if p.at(&TokenKind::As) {
        p.advance();
        p.expect_identifier_text("as RETURN alias")?
    } else {
        default_alias(&expr)
    };
    Ok(ReturnItem { expr, alias, span: start..p.here() })
}

fn default_alias(expr: &Expression) -> SmolStr {
    match expr {
        Expression::Identifier(name, _) => name.clone(),
        Expression::Property(_, name, _) => name.clone(),
        _ => SmolStr::new(""),
    }
}

fn parse_order_skip_limit(p: &mut Parser, query: &mut Query) -> Result<(), ()> {
    if p.at(&TokenKind::Order) {
        p.advance();
        p.expect(&TokenKind::By, "after ORDER")?;
        query.order_by.push(parse_sort_item(p)?);
        while p.at(&TokenKind::Comma) {
            p.advance();
            query.order_by.push(parse_sort_item(p)?);
        }
    }

    if p.at(&TokenKind::Skip) {
        p.advance();
        query.skip = Some(parse_limit_value(p)?);
    }
    if p.at(&TokenKind::Limit) {
        p.advance();
        query.limit = Some(parse_limit_value(p)?);
    }
    Ok(())
}

fn parse_sort_item(p: &mut Parser) -> Result<SortItem, ()> {
    let start = p.here();
    let expr = parse_expression(p)?;
    let descending = match p.peek_kind() {
        TokenKind::Asc | TokenKind::Ascending => {
            p.advance();
            false
        }
        TokenKind::Desc | TokenKind::Descending => {
            p.advance();
            true
        }
        _ => false,
    };
    Ok(SortItem { expr, descending, span: start..p.here() })
}

fn parse_limit_value(p: &mut Parser) -> Result<LimitValue, ()> {
    if p.at(&TokenKind::LBrace) {
        return match p.parse_brace_expr()? {
            Expression::Parameter(name, _) => Ok(LimitValue::Parameter(name)),
            _ => {
                p.error_here(ErrorKind::SemanticArity, "expected a parameter reference for SKIP/LIMIT");
                Err(())
            }
        };
    }
    if let TokenKind::IntegerLiteral(n) = p.peek_kind() {
        p.advance();
        return Ok(LimitValue::Literal(n));
    }
    p.error_here(ErrorKind::UnexpectedToken, "expected an integer literal or parameter as a SKIP/LIMIT value");
    Err(())
}

// ---- schema DDL (standalone) --------------------------------------------

/// A single-property index specifier `(p)`. Composite property lists are a
/// `SemanticArityError`: this grammar has no notion of a multi-property
/// index.
fn parse_index_properties(p: &mut Parser) -> Result<Vec<SmolStr>, ()> {
    let property = p.expect_identifier_text("as indexed property")?;
    if p.at(&TokenKind::Comma) {
        p.error_here(
            ErrorKind::SemanticArity,
            "composite-property indexes are not supported; index exactly one property",
        );
        return Err(());
    }
    Ok(vec![property])
}

pub(crate) fn parse_drop_index(p: &mut Parser) -> Result<SchemaCommand, ()> {
    let start = p.here();
    if !p.dialect.is_v2() {
        p.error_here(ErrorKind::DialectFeature, "schema DDL is only available from dialect v2_0");
        return Err(());
    }
    p.advance();
    p.expect(&TokenKind::Index, "after DROP")?;
    p.expect(&TokenKind::On, "after DROP INDEX")?;
    let label = p.expect_label_text()?;
    p.expect(&TokenKind::LParen, "after DROP INDEX label")?;
    let properties = parse_index_properties(p)?;
    let close = p.expect(&TokenKind::RParen, "to close DROP INDEX")?;
    Ok(SchemaCommand::DropIndex { label, properties, span: start..close.span.end })
}

pub(crate) fn parse_create_index(p: &mut Parser) -> Result<SchemaCommand, ()> {
    let start = p.here();
    if !p.dialect.is_v2() {
        p.error_here(ErrorKind::DialectFeature, "schema DDL is only available from dialect v2_0");
        return Err(());
    }
    p.advance();
    p.expect(&TokenKind::Index, "after CREATE")?;
    p.expect(&TokenKind::On, "after CREATE INDEX")?;
    let label = p.expect_label_text()?;
    p.expect(&TokenKind::LParen, "after CREATE INDEX label")?;
    let properties = parse_index_properties(p)?;
    let close = p.expect(&TokenKind::RParen, "to close CREATE INDEX")?;
    Ok(SchemaCommand::CreateIndex { label, properties, span: start..close.span.end })
}

pub(crate) fn parse_create_constraint(p: &mut Parser) -> Result<SchemaCommand, ()> {
    let start = p.here();
    if !p.dialect.is_v2() {
        p.error_here(ErrorKind::DialectFeature, "schema DDL is only available from dialect v2_0");
        return Err(());
    }
    p.advance();
    p.expect(&TokenKind::Constraint, "after CREATE")?;
    p.expect(&TokenKind::On, "after CREATE CONSTRAINT")?;
    p.expect(&TokenKind::LParen, "after ON")?;
    let variable = p.expect_identifier_text("as constraint node variable")?;
    p.expect(&TokenKind::Colon, "after constraint node variable")?;
    let label = p.expect_label_text()?;
    p.expect(&TokenKind::RParen, "to close constraint node pattern")?;
    p.expect(&TokenKind::Assert, "after constraint node pattern")?;
    let assert_var = p.expect_identifier_text("as constraint ASSERT variable")?;
    if assert_var != variable {
        p.error_here(
            ErrorKind::SemanticArity,
            "ASSERT must reference the same variable bound in ON",
        );
        return Err(());
    }
    p.expect(&TokenKind::Dot, "after ASSERT variable")?;
    let property = p.expect_identifier_text("as constraint property")?;
    p.expect(&TokenKind::Is, "after constraint property")?;
    p.expect(&TokenKind::Unique, "to close CREATE CONSTRAINT")?;
    Ok(SchemaCommand::CreateUniqueConstraint {
        variable,
        label,
        property,
        span: start..p.here(),
    })
}
