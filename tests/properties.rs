//! Property tests for alignment and substitution.

use proptest::prelude::*;

use sparql_nlg::align::{align, align_graphs};
use sparql_nlg::graph::QueryGraph;
use sparql_nlg::graph::isomorphism::{CliqueMatcher, IsomorphismMatcher};
use sparql_nlg::label::Label;
use sparql_nlg::substitute::substitute;
use sparql_nlg::template::Slot;
use sparql_nlg::token::Token;

/// Triples over `n` term tokens and up to 3 predicate tokens.
fn triples() -> impl Strategy<Value = Vec<(usize, usize, usize)>> {
    prop::collection::vec((0..5usize, 0..3usize, 0..5usize), 1..5)
}

/// The same pattern twice: once over resources, once over renamed and
/// reordered variables.
fn isomorphic_pair() -> impl Strategy<Value = (QueryGraph, QueryGraph)> {
    (triples(), Just((0..5usize).collect::<Vec<_>>()).prop_shuffle()).prop_map(
        |(triples, perm)| {
            let mut query = QueryGraph::new();
            for &(s, p, o) in &triples {
                query.add_triple(
                    Token::resource(format!("http://ex.org/e{s}")),
                    Token::resource(format!("http://ex.org/p{p}")),
                    Token::resource(format!("http://ex.org/e{o}")),
                );
            }
            let mut template = QueryGraph::new();
            for &(s, p, o) in triples.iter().rev() {
                template.add_triple(
                    Token::variable(format!("v{}", perm[s])),
                    Token::variable(format!("q{p}")),
                    Token::variable(format!("v{}", perm[o])),
                );
            }
            (query, template)
        },
    )
}

/// Like [`isomorphic_pair`], but terms and predicates share one pool of
/// four tokens, so a token may be both a subject and a predicate.
fn shared_namespace_pair() -> impl Strategy<Value = (QueryGraph, QueryGraph)> {
    (
        prop::collection::vec((0..4usize, 0..4usize, 0..4usize), 1..5),
        Just((0..4usize).collect::<Vec<_>>()).prop_shuffle(),
    )
        .prop_map(|(triples, perm)| {
            let mut query = QueryGraph::new();
            for &(s, p, o) in &triples {
                query.add_triple(
                    Token::resource(format!("http://ex.org/t{s}")),
                    Token::resource(format!("http://ex.org/t{p}")),
                    Token::resource(format!("http://ex.org/t{o}")),
                );
            }
            let mut template = QueryGraph::new();
            for &(s, p, o) in triples.iter().rev() {
                template.add_triple(
                    Token::variable(format!("v{}", perm[s])),
                    Token::variable(format!("v{}", perm[p])),
                    Token::variable(format!("v{}", perm[o])),
                );
            }
            (query, template)
        })
}

proptest! {
    #[test]
    fn renamed_patterns_are_isomorphic((query, template) in isomorphic_pair()) {
        prop_assert!(CliqueMatcher::default().find(&query, &template).is_some());
    }

    #[test]
    fn reordered_shared_namespace_patterns_are_isomorphic((query, template) in shared_namespace_pair()) {
        let all = CliqueMatcher::default().correspondences(&query, &template);
        prop_assert!(!all.is_empty());
        for c in &all {
            for &(a1, b1) in c.pairs() {
                for &(a2, b2) in c.pairs() {
                    prop_assert_eq!(query.edge_roles(a1, a2), template.edge_roles(b1, b2));
                }
            }
        }
    }

    #[test]
    fn alignment_maps_are_inverse((query, template) in isomorphic_pair()) {
        let aligned = align_graphs(&query, &template, &CliqueMatcher::default()).unwrap();
        prop_assert_eq!(aligned.len(), query.node_count());
        for (t, q) in aligned.template_to_query() {
            prop_assert_eq!(aligned.template_token(q), Some(t));
        }
        for (q, t) in aligned.query_to_template() {
            prop_assert_eq!(aligned.query_token(t), Some(q));
        }
    }

    #[test]
    fn every_correspondence_preserves_edges((query, template) in isomorphic_pair()) {
        for c in CliqueMatcher::default().correspondences(&query, &template) {
            let aligned = align(&query, &template, &c).unwrap();
            prop_assert_eq!(aligned.len(), query.node_count());
            for &(a1, b1) in c.pairs() {
                for &(a2, b2) in c.pairs() {
                    prop_assert_eq!(query.edge_roles(a1, a2), template.edge_roles(b1, b2));
                }
            }
        }
    }

    #[test]
    fn unmapped_slots_never_change_text(
        question in "[a-z ]{0,30}",
        words in prop::collection::vec("[a-z]{1,6}", 1..3),
    ) {
        let slots = vec![Slot { anchor: "unbound".into(), words, slot_type: Default::default() }];
        let out = substitute(
            &question,
            &slots,
            &Default::default(),
            |_| Label::Found("LABEL".into()),
        );
        prop_assert_eq!(out, question);
    }
}
