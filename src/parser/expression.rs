//! Expression grammar: precedence climbs from `OR` (loosest) to
//! postfix property/index/call access (tightest):
//!
//! `OR < XOR < AND < NOT < comparison < +/- < * / % < ^ < unary - < .prop <
//! call(...)/index[...]`
//!
//! Several productions desugar at parse time rather than building a
//! dedicated node: `IN` becomes `AnyInCollection`, `<>` becomes
//! `Not(Compare(Eq, ...))`, boolean literals lower per dialect.

use crate::ast::pattern::ShortestKind;
use crate::ast::{BinaryArith, BooleanOp, Comparison, Expression, WhenThen, INNER_VAR};
use crate::diag::ErrorKind;
use crate::lexer::token::TokenKind;
use crate::parser::Parser;
use smol_str::SmolStr;

pub(crate) fn parse_expression(p: &mut Parser) -> Result<Expression, ()> {
    parse_or(p)
}

fn parse_or(p: &mut Parser) -> Result<Expression, ()> {
    let mut lhs = parse_xor(p)?;
    while p.at(&TokenKind::Or) {
        p.advance();
        let rhs = parse_xor(p)?;
        let span = lhs.span().start..rhs.span().end;
        lhs = Expression::Boolean(BooleanOp::Or, Box::new(lhs), Box::new(rhs), span);
    }
    Ok(lhs)
}

fn parse_xor(p: &mut Parser) -> Result<Expression, ()> {
    let mut lhs = parse_and(p)?;
    while p.at(&TokenKind::Xor) {
        p.advance();
        let rhs = parse_and(p)?;
        let span = lhs.span().start..rhs.span().end;
        lhs = Expression::Boolean(BooleanOp::Xor, Box::new(lhs), Box::new(rhs), span);
    }
    Ok(lhs)
}

fn parse_and(p: &mut Parser) -> Result<Expression, ()> {
    let mut lhs = parse_not(p)?;
    while p.at(&TokenKind::And) {
        p.advance();
        let rhs = parse_not(p)?;
        let span = lhs.span().start..rhs.span().end;
        lhs = Expression::Boolean(BooleanOp::And, Box::new(lhs), Box::new(rhs), span);
    }
    Ok(lhs)
}

fn parse_not(p: &mut Parser) -> Result<Expression, ()> {
    if p.at(&TokenKind::Not) {
        let start = p.here();
        p.advance();
        let inner = parse_not(p)?;
        let span = start..inner.span().end;
        return Ok(Expression::Not(Box::new(inner), span));
    }
    parse_comparison(p)
}

fn parse_comparison(p: &mut Parser) -> Result<Expression, ()> {
    let lhs = parse_additive(p)?;

    if p.at(&TokenKind::Is) {
        p.advance();
        let negated = if p.at(&TokenKind::Not) {
            p.advance();
            true
        } else {
            false
        };
        let end_tok = p.expect(&TokenKind::Null, "after IS [NOT]")?;
        let span = lhs.span().start..end_tok.span.end;
        return Ok(Expression::IsNull {
            expr: Box::new(lhs),
            negated,
            span,
        });
    }

    if p.at(&TokenKind::In) {
        p.advance();
        let collection = parse_additive(p)?;
        let span = lhs.span().start..collection.span().end;
        let var_span = span.clone();
        let predicate = Expression::Compare(
            Comparison::Eq,
            Box::new(Expression::Identifier(SmolStr::new(INNER_VAR), var_span.clone())),
            Box::new(lhs),
            var_span,
        );
        return Ok(Expression::AnyInCollection {
            collection: Box::new(collection),
            variable: SmolStr::new(INNER_VAR),
            predicate: Box::new(predicate),
            span,
        });
    }

    let comparison = match p.peek_kind() {
        TokenKind::Eq => Some(Comparison::Eq),
        TokenKind::Lt => Some(Comparison::Lt),
        TokenKind::LtEq => Some(Comparison::Le),
        TokenKind::Gt => Some(Comparison::Gt),
        TokenKind::GtEq => Some(Comparison::Ge),
        _ => None,
    };
    if let Some(cmp) = comparison {
        p.advance();
        let rhs = parse_additive(p)?;
        let span = lhs.span().start..rhs.span().end;
        return Ok(Expression::Compare(cmp, Box::new(lhs), Box::new(rhs), span));
    }

    if p.at(&TokenKind::NotEq) {
        p.advance();
        let rhs = parse_additive(p)?;
        let span = lhs.span().start..rhs.span().end;
        let eq = Expression::Compare(Comparison::Eq, Box::new(lhs), Box::new(rhs), span.clone());
        return Ok(Expression::Not(Box::new(eq), span));
    }

    if p.at(&TokenKind::RegexMatch) {
        p.advance();
        let rhs = parse_additive(p)?;
        let span = lhs.span().start..rhs.span().end;
        return Ok(match rhs {
            Expression::StringLiteral(s, _) => {
                Expression::LiteralRegularExpression(Box::new(lhs), s, span)
            }
            other => Expression::RegularExpression(Box::new(lhs), Box::new(other), span),
        });
    }

    Ok(lhs)
}

fn parse_additive(p: &mut Parser) -> Result<Expression, ()> {
    let mut lhs = parse_multiplicative(p)?;
    loop {
        let op = match p.peek_kind() {
            TokenKind::Plus => BinaryArith::Add,
            TokenKind::Minus => BinaryArith::Sub,
            _ => break,
        };
        p.advance();
        let rhs = parse_multiplicative(p)?;
        let span = lhs.span().start..rhs.span().end;
        lhs = Expression::Arith(op, Box::new(lhs), Box::new(rhs), span);
    }
    Ok(lhs)
}

fn parse_multiplicative(p: &mut Parser) -> Result<Expression, ()> {
    let mut lhs = parse_power(p)?;
    loop {
        let op = match p.peek_kind() {
            TokenKind::Star => BinaryArith::Mul,
            TokenKind::Slash => BinaryArith::Div,
            TokenKind::Percent => BinaryArith::Mod,
            _ => break,
        };
        p.advance();
        let rhs = parse_power(p)?;
        let span = lhs.span().start..rhs.span().end;
        lhs = Expression::Arith(op, Box::new(lhs), Box::new(rhs), span);
    }
    Ok(lhs)
}

fn parse_power(p: &mut Parser) -> Result<Expression, ()> {
    let lhs = parse_unary(p)?;
    if p.at(&TokenKind::Caret) {
        p.advance();
        let rhs = parse_power(p)?;
        let span = lhs.span().start..rhs.span().end;
        return Ok(Expression::Arith(BinaryArith::Pow, Box::new(lhs), Box::new(rhs), span));
    }
    Ok(lhs)
}

fn parse_unary(p: &mut Parser) -> Result<Expression, ()> {
    if p.at(&TokenKind::Minus) {
        let start = p.here();
        p.advance();
        let inner = parse_unary(p)?;
        let span = start..inner.span().end;
        return Ok(Expression::Neg(Box::new(inner), span));
    }
    parse_postfix(p)
}

/// Property access, nullable postfix (`?`/`!`, pre-2.0), and index/slice all
/// bind tighter than unary minus.
fn parse_postfix(p: &mut Parser) -> Result<Expression, ()> {
    let mut expr = parse_primary(p)?;

    loop {
        if p.at(&TokenKind::Dot) {
            p.advance();
            let name = p.expect_identifier_text("after `.`")?;
            let span = expr.span().start..p.tokens[p.current - 1].span.end;
            expr = Expression::Property(Box::new(expr), name, span);
            continue;
        }

        if p.at(&TokenKind::Question) && !p.dialect.is_v2() {
            p.advance();
            let span = expr.span().start..p.tokens[p.current - 1].span.end;
            expr = Expression::Nullable(Box::new(expr), span);
            continue;
        }
        if p.at(&TokenKind::Bang) && !p.dialect.is_v2() {
            p.advance();
            let span = expr.span().start..p.tokens[p.current - 1].span.end;
            expr = Expression::NullablePredicate(Box::new(expr), false, span);
            continue;
        }

        if p.at(&TokenKind::LBracket) {
            p.advance();
            if p.at(&TokenKind::DotDot) {
                p.advance();
                let to = if p.at(&TokenKind::RBracket) {
                    None
                } else {
                    Some(Box::new(parse_expression(p)?))
                };
                let close = p.expect(&TokenKind::RBracket, "to close slice")?;
                let span = expr.span().start..close.span.end;
                expr = Expression::Slice(Box::new(expr), None, to, span);
                continue;
            }
            let first = parse_expression(p)?;
            if p.at(&TokenKind::DotDot) {
                p.advance();
                let to = if p.at(&TokenKind::RBracket) {
                    None
                } else {
                    Some(Box::new(parse_expression(p)?))
                };
                let close = p.expect(&TokenKind::RBracket, "to close slice")?;
                let span = expr.span().start..close.span.end;
                expr = Expression::Slice(Box::new(expr), Some(Box::new(first)), to, span);
            } else {
                let close = p.expect(&TokenKind::RBracket, "to close index")?;
                let span = expr.span().start..close.span.end;
                expr = Expression::Index(Box::new(expr), Box::new(first), span);
            }
            continue;
        }

        break;
    }

    Ok(expr)
}

impl<'source> Parser<'source> {
    pub(crate) fn expect_identifier_text(&mut self, context: &str) -> Result<SmolStr, ()> {
        let tok = self.peek().clone();
        match tok.kind {
            TokenKind::Identifier(_) | TokenKind::DelimitedIdentifier(_) => {
                self.advance();
                Ok(tok.text())
            }
            ref k if k.is_keyword() => {
                self.advance();
                Ok(tok.text())
            }
            _ => {
                self.expected_token(&TokenKind::Identifier("<name>".into()), context);
                Err(())
            }
        }
    }

    /// Labels and relationship types accept any keyword's display text, not
    /// just `Identifier` tokens.
    pub(crate) fn expect_label_text(&mut self) -> Result<SmolStr, ()> {
        self.expect_identifier_text("expected a label or type name")
    }
}

fn parse_primary(p: &mut Parser) -> Result<Expression, ()> {
    let tok = p.peek().clone();
    match tok.kind {
        TokenKind::IntegerLiteral(n) => {
            p.advance();
            Ok(Expression::IntegerLiteral(n, tok.span))
        }
        TokenKind::FloatLiteral(n) => {
            p.advance();
            Ok(Expression::FloatLiteral(n, tok.span))
        }
        TokenKind::StringLiteral(ref s) => {
            p.advance();
            Ok(Expression::StringLiteral(s.clone(), tok.span))
        }
        TokenKind::True => {
            p.advance();
            Ok(lower_bool(p, true, tok.span))
        }
        TokenKind::False => {
            p.advance();
            Ok(lower_bool(p, false, tok.span))
        }
        TokenKind::Null => {
            p.advance();
            Ok(Expression::Null(tok.span))
        }
        TokenKind::LBracket => parse_list_literal(p),
        TokenKind::LBrace => parse_brace_expr(p),
        TokenKind::LParen => parse_paren(p),
        TokenKind::Case => parse_case(p),
        TokenKind::Identifier(ref name) => parse_identifier_led(p, name.clone(), tok.span.clone()),
        TokenKind::DelimitedIdentifier(ref name) => {
            p.advance();
            Ok(Expression::Identifier(name.clone(), tok.span))
        }
        _ => {
            p.expected_token(&TokenKind::Identifier("<expression>".into()), "in expression");
            Err(())
        }
    }
}

fn lower_bool(p: &Parser, value: bool, span: crate::ast::Span) -> Expression {
    if p.dialect.is_v2() {
        if value {
            Expression::True(span)
        } else {
            Expression::Not(Box::new(Expression::True(span.clone())), span)
        }
    } else {
        Expression::BooleanLiteral(value, span)
    }
}

fn parse_list_literal(p: &mut Parser) -> Result<Expression, ()> {
    let start = p.here();
    p.advance();
    let mut items = Vec::new();
    if !p.at(&TokenKind::RBracket) {
        items.push(parse_expression(p)?);
        while p.at(&TokenKind::Comma) {
            p.advance();
            items.push(parse_expression(p)?);
        }
    }
    let close = p.expect(&TokenKind::RBracket, "to close list literal")?;
    Ok(Expression::ListLiteral(items, start..close.span.end))
}

/// `{name}` / `{42}` / `` {`name`} `` is a parameter reference; anything
/// else inside `{...}` is a map literal.
pub(crate) fn parse_brace_expr(p: &mut Parser) -> Result<Expression, ()> {
    let start = p.here();
    p.advance();

    if p.at(&TokenKind::RBrace) {
        let close = p.advance().clone();
        return Ok(Expression::MapLiteral(Vec::new(), start..close.span.end));
    }

    let looks_like_param = matches!(
        p.peek_kind(),
        TokenKind::Identifier(_) | TokenKind::IntegerLiteral(_) | TokenKind::DelimitedIdentifier(_)
    ) && p.peek_nth(1).kind == TokenKind::RBrace;

    if looks_like_param {
        let name = match p.peek_kind() {
            TokenKind::Identifier(n) | TokenKind::DelimitedIdentifier(n) => n,
            TokenKind::IntegerLiteral(n) => SmolStr::new(n.to_string()),
            _ => unreachable!(),
        };
        p.advance();
        let close = p.expect(&TokenKind::RBrace, "to close parameter")?;
        return Ok(Expression::Parameter(name, start..close.span.end));
    }

    let mut entries = Vec::new();
    loop {
        let key = p.expect_identifier_text("as map key")?;
        p.expect(&TokenKind::Colon, "after map key")?;
        let value = parse_expression(p)?;
        entries.push((key, value));
        if p.at(&TokenKind::Comma) {
            p.advance();
        } else {
            break;
        }
    }
    let close = p.expect(&TokenKind::RBrace, "to close map literal")?;
    Ok(Expression::MapLiteral(entries, start..close.span.end))
}

/// Either a grouped expression, or (when followed by a relationship arrow)
/// a pattern-existence predicate.
fn parse_paren(p: &mut Parser) -> Result<Expression, ()> {
    if p.starts_pattern_predicate() {
        return parse_pattern_predicate(p);
    }
    p.advance();
    let inner = parse_expression(p)?;
    p.expect(&TokenKind::RParen, "to close grouped expression")?;
    Ok(inner)
}

impl<'source> Parser<'source> {
    /// Non-destructive lookahead: does the `(` at the cursor open a pattern
    /// (followed, after its matching `)`, by a relationship arrow) rather
    /// than a grouped expression?
    fn starts_pattern_predicate(&self) -> bool {
        let mut depth = 0i32;
        let mut i = self.current;
        loop {
            let tok = self.tokens.get(i);
            let Some(tok) = tok else { return false };
            match tok.kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        let next = self.tokens.get(i + 1);
                        return matches!(
                            next.map(|t| &t.kind),
                            Some(TokenKind::Minus) | Some(TokenKind::LeftArrow)
                        );
                    }
                }
                TokenKind::Eof => return false,
                _ => {}
            }
            i += 1;
        }
    }
}

fn parse_pattern_predicate(p: &mut Parser) -> Result<Expression, ()> {
    let start = p.here();
    let mut paths = vec![p.parse_pattern_path()?];
    while p.at(&TokenKind::Comma) {
        p.advance();
        paths.push(p.parse_pattern_path()?);
    }
    let end = paths.last().map(|path| path.span.end).unwrap_or(start);
    let span = start..end;
    Ok(if p.dialect.is_v2() {
        Expression::PatternPredicate(paths, span)
    } else {
        Expression::NonEmpty(paths, span)
    })
}

fn parse_case(p: &mut Parser) -> Result<Expression, ()> {
    let start = p.here();
    p.advance();

    let operand = if p.at(&TokenKind::When) {
        None
    } else {
        Some(Box::new(parse_expression(p)?))
    };

    let mut whens = Vec::new();
    while p.at(&TokenKind::When) {
        p.advance();
        let when = parse_expression(p)?;
        p.expect(&TokenKind::Then, "in CASE branch")?;
        let then = parse_expression(p)?;
        whens.push(WhenThen { when, then });
    }

    let else_branch = if p.at(&TokenKind::Else) {
        p.advance();
        Some(Box::new(parse_expression(p)?))
    } else {
        None
    };

    let close = p.expect(&TokenKind::End, "to close CASE")?;
    let span = start..close.span.end;

    Ok(match operand {
        Some(operand) => Expression::SimpleCase {
            operand,
            whens,
            else_branch,
            span,
        },
        None => {
            if !p.dialect.is_v2() {
                p.error_at(
                    span.clone(),
                    ErrorKind::DialectFeature,
                    "generic CASE is only available from dialect v2_0",
                );
                return Err(());
            }
            Expression::GenericCase {
                whens,
                else_branch,
                span,
            }
        }
    })
}

enum ComprehensionForm {
    Filter,
    Extract,
    Reduce,
    Any,
    All,
    None,
    SingleOf,
}

fn parse_identifier_led(p: &mut Parser, name: SmolStr, start_span: crate::ast::Span) -> Result<Expression, ()> {
    let lower = name.to_ascii_lowercase();

    if (lower == "shortestpath" || lower == "allshortestpaths") && p.peek_nth(1).kind == TokenKind::LParen
    {
        return parse_shortest_path_expression(p, lower == "shortestpath");
    }

    let comprehension_form = match lower.as_str() {
        "filter" => Some(ComprehensionForm::Filter),
        "extract" => Some(ComprehensionForm::Extract),
        "reduce" => Some(ComprehensionForm::Reduce),
        "any" => Some(ComprehensionForm::Any),
        "all" => Some(ComprehensionForm::All),
        "none" => Some(ComprehensionForm::None),
        "single" => Some(ComprehensionForm::SingleOf),
        _ => None,
    };
    if let Some(form) = comprehension_form {
        if p.peek_nth(1).kind == TokenKind::LParen {
            if matches!(
                form,
                ComprehensionForm::Filter | ComprehensionForm::Extract | ComprehensionForm::Reduce
            ) && !p.dialect.is_v2()
            {
                p.error_here(
                    ErrorKind::DialectFeature,
                    format!("{lower}(...) is only available from dialect v2_0"),
                );
                return Err(());
            }
            p.advance();
            return parse_comprehension(p, form, start_span);
        }
    }

    if lower == "count" && p.peek_nth(1).kind == TokenKind::LParen && p.peek_nth(2).kind == TokenKind::Star
    {
        p.advance();
        p.advance();
        p.advance();
        let close = p.expect(&TokenKind::RParen, "to close count(*)")?;
        return Ok(Expression::CountStar(start_span.start..close.span.end));
    }

    p.advance();

    if p.at(&TokenKind::LParen) {
        return parse_function_call(p, name, start_span);
    }

    if p.at(&TokenKind::Colon) && p.dialect.is_v2() {
        p.advance();
        let label = p.expect_label_text()?;
        let span = start_span.start..p.tokens[p.current - 1].span.end;
        return Ok(Expression::HasLabel(
            Box::new(Expression::Identifier(name, start_span)),
            label,
            span,
        ));
    }

    Ok(Expression::Identifier(name, start_span))
}

fn parse_comprehension(
    p: &mut Parser,
    form: ComprehensionForm,
    start_span: crate::ast::Span,
) -> Result<Expression, ()> {
    p.expect(&TokenKind::LParen, "after comprehension keyword")?;

    if matches!(form, ComprehensionForm::Reduce) {
        let accumulator = p.expect_identifier_text("as reduce accumulator")?;
        p.expect(&TokenKind::Eq, "after reduce accumulator")?;
        let init = parse_expression(p)?;
        p.expect(&TokenKind::Comma, "after reduce initial value")?;
        let variable = p.expect_identifier_text("as reduce iteration variable")?;
        p.expect(&TokenKind::In, "in reduce(...)")?;
        let collection = parse_expression(p)?;
        p.expect(&TokenKind::Pipe, "before reduce expression")?;
        let expr = parse_expression(p)?;
        let close = p.expect(&TokenKind::RParen, "to close reduce(...)")?;
        return Ok(Expression::ReduceFunction {
            collection: Box::new(collection),
            variable,
            expr: Box::new(expr),
            accumulator,
            init: Box::new(init),
            span: start_span.start..close.span.end,
        });
    }

    let variable = p.expect_identifier_text("as comprehension iteration variable")?;
    p.expect(&TokenKind::In, "in comprehension")?;
    let collection = parse_expression(p)?;

    match form {
        ComprehensionForm::Extract => {
            p.expect(&TokenKind::Pipe, "before extract expression")?;
            let extract = parse_expression(p)?;
            let close = p.expect(&TokenKind::RParen, "to close extract(...)")?;
            Ok(Expression::ExtractFunction {
                collection: Box::new(collection),
                variable,
                extract: Box::new(extract),
                span: start_span.start..close.span.end,
            })
        }
        ComprehensionForm::Filter => {
            p.expect(&TokenKind::Where, "before filter predicate")?;
            let predicate = parse_expression(p)?;
            let close = p.expect(&TokenKind::RParen, "to close filter(...)")?;
            Ok(Expression::FilterFunction {
                collection: Box::new(collection),
                variable,
                predicate: Box::new(predicate),
                span: start_span.start..close.span.end,
            })
        }
        ComprehensionForm::Any | ComprehensionForm::All | ComprehensionForm::None | ComprehensionForm::SingleOf => {
            p.expect(&TokenKind::Where, "before predicate")?;
            let predicate = parse_expression(p)?;
            let close = p.expect(&TokenKind::RParen, "to close predicate function")?;
            let span = start_span.start..close.span.end;
            Ok(match form {
                ComprehensionForm::Any => Expression::AnyInCollection {
                    collection: Box::new(collection),
                    variable,
                    predicate: Box::new(predicate),
                    span,
                },
                ComprehensionForm::All => Expression::AllInCollection {
                    collection: Box::new(collection),
                    variable,
                    predicate: Box::new(predicate),
                    span,
                },
                ComprehensionForm::None => Expression::NoneInCollection {
                    collection: Box::new(collection),
                    variable,
                    predicate: Box::new(predicate),
                    span,
                },
                ComprehensionForm::SingleOf => Expression::SingleInCollection {
                    collection: Box::new(collection),
                    variable,
                    predicate: Box::new(predicate),
                    span,
                },
                _ => unreachable!(),
            })
        }
        ComprehensionForm::Reduce => unreachable!(),
    }
}

fn parse_shortest_path_expression(p: &mut Parser, single: bool) -> Result<Expression, ()> {
    let start = p.here();
    p.advance();
    p.advance();
    let mut path = p.parse_node_relationship_chain(None, start)?;
    let close = p.expect(&TokenKind::RParen, "to close shortestPath(...)")?;
    path.shortest = Some(if single { ShortestKind::Single } else { ShortestKind::All });
    Ok(Expression::ShortestPathExpression(path, start..close.span.end))
}

fn parse_function_call(p: &mut Parser, name: SmolStr, start_span: crate::ast::Span) -> Result<Expression, ()> {
    p.advance();
    let distinct = if p.at(&TokenKind::Distinct) {
        p.advance();
        true
    } else {
        false
    };
    let mut args = Vec::new();
    if !p.at(&TokenKind::RParen) {
        args.push(parse_expression(p)?);
        while p.at(&TokenKind::Comma) {
            p.advance();
            args.push(parse_expression(p)?);
        }
    }
    let close = p.expect(&TokenKind::RParen, "to close function call")?;
    Ok(Expression::FunctionCall {
        name,
        args,
        distinct,
        span: start_span.start..close.span.end,
    })
}
