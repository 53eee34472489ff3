//! Benchmarks for query-graph matching.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use sparql_nlg::graph::QueryGraph;
use sparql_nlg::graph::isomorphism::{CliqueMatcher, IsomorphismMatcher};
use sparql_nlg::token::Token;

/// A star: one subject with `arms` outgoing triples.
fn star(arms: usize, variables: bool) -> QueryGraph {
    let term = |name: String| {
        if variables {
            Token::variable(name)
        } else {
            Token::resource(format!("http://ex.org/{name}"))
        }
    };
    let mut g = QueryGraph::new();
    for i in 0..arms {
        g.add_triple(term("s".into()), term(format!("p{i}")), term(format!("o{i}")));
    }
    g
}

/// A path of `len` triples.
fn path(len: usize, variables: bool) -> QueryGraph {
    let term = |name: String| {
        if variables {
            Token::variable(name)
        } else {
            Token::resource(format!("http://ex.org/{name}"))
        }
    };
    let mut g = QueryGraph::new();
    for i in 0..len {
        g.add_triple(term(format!("n{i}")), term(format!("p{i}")), term(format!("n{}", i + 1)));
    }
    g
}

fn bench_path(c: &mut Criterion) {
    let query = path(4, false);
    let template = path(4, true);
    let matcher = CliqueMatcher::default();

    c.bench_function("clique_path_4", |bench| {
        bench.iter(|| black_box(matcher.find(&query, &template)))
    });
}

fn bench_star(c: &mut Criterion) {
    let query = star(3, false);
    let template = star(3, true);
    let matcher = CliqueMatcher::default();

    c.bench_function("clique_star_3_all", |bench| {
        bench.iter(|| black_box(matcher.correspondences(&query, &template)))
    });
}

criterion_group!(benches, bench_path, bench_star);
criterion_main!(benches);
