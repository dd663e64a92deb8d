//! End-to-end parser benchmarks.
//!
//! - **simple_queries**: minimal START/MATCH/RETURN shapes
//! - **pattern_heavy**: multi-hop and variable-length relationship patterns
//! - **dialect_directive**: overhead of stripping a leading `cypher <version>`
//! - **lexer_only**: tokenizing without parsing
//! - **pipeline_stages**: lexer vs full parse on the same query

use aqt_parser::{DialectSelector, parse, tokenize};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

fn bench_simple_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("simple_queries");

    let queries = vec![
        ("start_return", "start n = node(1) return n"),
        ("match_return", "MATCH (n:Person) RETURN n"),
        (
            "where_clause",
            "MATCH (n:Person) WHERE n.age > 18 RETURN n.name",
        ),
        (
            "order_skip_limit",
            "MATCH (n:Person) RETURN n.name ORDER BY n.age DESC SKIP 5 LIMIT 10",
        ),
    ];

    for (name, query) in queries {
        group.throughput(Throughput::Bytes(query.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &query, |b, q| {
            b.iter(|| parse(black_box(q), DialectSelector::default()));
        });
    }

    group.finish();
}

fn bench_pattern_heavy(c: &mut Criterion) {
    let mut group = c.benchmark_group("pattern_heavy");

    let queries = vec![
        (
            "multi_hop",
            "MATCH (a:Person)-[:KNOWS]->(b:Person)-[:WORKS_AT]->(c:Company) RETURN a, b, c",
        ),
        (
            "var_length",
            "MATCH (a)-[r:KNOWS*1..5]->(b) RETURN a, b",
        ),
        (
            "named_path_with_create_unique",
            "MATCH p = (a)-[:KNOWS]->(b) CREATE UNIQUE (a)-[:FRIEND]->(b) RETURN p",
        ),
        (
            "optional_relationship_marker",
            "start a=node(0) match a -[r?*1..3]-> x return x",
        ),
    ];

    for (name, query) in queries {
        group.throughput(Throughput::Bytes(query.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &query, |b, q| {
            b.iter(|| parse(black_box(q), DialectSelector::default()));
        });
    }

    group.finish();
}

fn bench_dialect_directive(c: &mut Criterion) {
    let mut group = c.benchmark_group("dialect_directive");

    let queries = vec![
        ("no_directive", "MATCH (n) RETURN n"),
        ("with_directive", "cypher v2_0 MATCH (n) RETURN n"),
    ];

    for (name, query) in queries {
        group.bench_with_input(BenchmarkId::from_parameter(name), &query, |b, q| {
            b.iter(|| parse(black_box(q), DialectSelector::FromDirective));
        });
    }

    group.finish();
}

fn bench_lexer_only(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_only");

    let queries = vec![
        ("simple", "MATCH (n:Person) WHERE n.age > 18 RETURN n"),
        (
            "complex",
            "MATCH (a:Person)-[:KNOWS]->(b:Person)-[:WORKS_AT]->(c:Company) WHERE a.age > 25 AND b.salary > 50000 RETURN a, b, c",
        ),
    ];

    for (name, query) in queries {
        group.bench_with_input(BenchmarkId::from_parameter(name), &query, |b, q| {
            b.iter(|| tokenize(black_box(q)));
        });
    }

    group.finish();
}

fn bench_pipeline_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline_stages");

    let query = "MATCH (a:Person)-[:KNOWS]->(b:Person) WHERE a.age > 25 RETURN a.name, b.name";

    group.bench_function("01_lexer_only", |b| {
        b.iter(|| tokenize(black_box(query)));
    });

    group.bench_function("02_parse", |b| {
        b.iter(|| parse(black_box(query), DialectSelector::default()));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_simple_queries,
    bench_pattern_heavy,
    bench_dialect_directive,
    bench_lexer_only,
    bench_pipeline_stages,
);

criterion_main!(benches);
