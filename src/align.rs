//! Variable alignment: node correspondences → token maps.
//!
//! A [`Correspondence`] speaks in graph-internal node indices. Alignment
//! translates each pair through both graphs' node/token lookups and records
//! it in two maps at once, so `template_to_query` and `query_to_template`
//! are always exact inverses.

use std::collections::HashMap;

use petgraph::graph::NodeIndex;

use crate::error::{NlgError, NlgResult};
use crate::graph::QueryGraph;
use crate::graph::isomorphism::{Correspondence, IsomorphismMatcher};
use crate::token::Token;

/// Token-level alignment between a query and a template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableCorrespondence {
    template_to_query: HashMap<Token, Token>,
    query_to_template: HashMap<Token, Token>,
}

impl VariableCorrespondence {
    /// Record that `query` and `template` correspond.
    ///
    /// Fails if either token is already aligned with something else.
    pub fn insert(&mut self, query: Token, template: Token) -> NlgResult<()> {
        if let Some(existing) = self.query_to_template.get(&query) {
            if *existing != template {
                return Err(NlgError::InconsistentMapping {
                    token: query.to_string(),
                    existing: existing.to_string(),
                    incoming: template.to_string(),
                });
            }
        }
        if let Some(existing) = self.template_to_query.get(&template) {
            if *existing != query {
                return Err(NlgError::InconsistentMapping {
                    token: template.to_string(),
                    existing: existing.to_string(),
                    incoming: query.to_string(),
                });
            }
        }
        self.template_to_query.insert(template.clone(), query.clone());
        self.query_to_template.insert(query, template);
        Ok(())
    }

    /// The query token aligned with a template token.
    pub fn query_token(&self, template: &Token) -> Option<&Token> {
        self.template_to_query.get(template)
    }

    /// The template token aligned with a query token.
    pub fn template_token(&self, query: &Token) -> Option<&Token> {
        self.query_to_template.get(query)
    }

    pub fn template_to_query(&self) -> &HashMap<Token, Token> {
        &self.template_to_query
    }

    pub fn query_to_template(&self) -> &HashMap<Token, Token> {
        &self.query_to_template
    }

    /// Query-side tokens that are concrete (not variables).
    pub fn concrete_query_tokens(&self) -> impl Iterator<Item = &Token> + '_ {
        self.query_to_template.keys().filter(|t| !t.is_variable())
    }

    pub fn len(&self) -> usize {
        self.template_to_query.len()
    }

    pub fn is_empty(&self) -> bool {
        self.template_to_query.is_empty()
    }
}

fn token<'g>(graph: &'g QueryGraph, node: NodeIndex, which: &'static str) -> NlgResult<&'g Token> {
    graph.token_of(node).ok_or(NlgError::CorruptGraph {
        graph: which,
        node: node.index(),
    })
}

/// Translate a node correspondence (query node, template node) into token maps.
pub fn align(
    query: &QueryGraph,
    template: &QueryGraph,
    correspondence: &Correspondence,
) -> NlgResult<VariableCorrespondence> {
    let mut aligned = VariableCorrespondence::default();
    for &(nq, nt) in correspondence.pairs() {
        let q = token(query, nq, "query")?;
        let t = token(template, nt, "template")?;
        tracing::trace!(query = %q, template = %t, "aligned");
        aligned.insert(q.clone(), t.clone())?;
    }
    Ok(aligned)
}

/// Match the two graphs and align the first correspondence found.
///
/// Non-isomorphic graphs are a hard [`NlgError::Isomorphism`].
pub fn align_graphs(
    query: &QueryGraph,
    template: &QueryGraph,
    matcher: &dyn IsomorphismMatcher,
) -> NlgResult<VariableCorrespondence> {
    let correspondence = matcher
        .find(query, template)
        .ok_or(NlgError::Isomorphism {
            query_nodes: query.node_count(),
            template_nodes: template.node_count(),
        })?;
    align(query, template, &correspondence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::isomorphism::CliqueMatcher;

    fn microsoft_pair() -> (QueryGraph, QueryGraph) {
        let mut q = QueryGraph::new();
        q.add_triple(
            Token::resource("http://dbpedia.org/resource/Microsoft"),
            Token::resource("http://dbpedia.org/ontology/foundedBy"),
            Token::variable("x"),
        );
        let mut t = QueryGraph::new();
        t.add_triple(Token::variable("y"), Token::variable("p"), Token::variable("x1"));
        (q, t)
    }

    #[test]
    fn maps_are_inverse() {
        let (q, t) = microsoft_pair();
        let aligned = align_graphs(&q, &t, &CliqueMatcher::default()).unwrap();
        assert_eq!(aligned.len(), 3);
        for (tt, qt) in aligned.template_to_query() {
            assert_eq!(aligned.template_token(qt), Some(tt));
        }
        for (qt, tt) in aligned.query_to_template() {
            assert_eq!(aligned.query_token(tt), Some(qt));
        }
        assert_eq!(
            aligned.query_token(&Token::variable("y")),
            Some(&Token::resource("http://dbpedia.org/resource/Microsoft"))
        );
        assert_eq!(aligned.query_token(&Token::variable("x1")), Some(&Token::variable("x")));
    }

    #[test]
    fn concrete_tokens_exclude_variables() {
        let (q, t) = microsoft_pair();
        let aligned = align_graphs(&q, &t, &CliqueMatcher::default()).unwrap();
        let mut concrete: Vec<_> = aligned.concrete_query_tokens().cloned().collect();
        concrete.sort();
        assert_eq!(
            concrete,
            vec![
                Token::resource("http://dbpedia.org/ontology/foundedBy"),
                Token::resource("http://dbpedia.org/resource/Microsoft"),
            ]
        );
    }

    #[test]
    fn non_isomorphic_graphs_fail() {
        let (q, _) = microsoft_pair();
        let mut t = QueryGraph::new();
        t.add_triple(Token::variable("a"), Token::variable("p"), Token::variable("b"));
        t.add_triple(Token::variable("b"), Token::variable("p"), Token::variable("c"));
        let err = align_graphs(&q, &t, &CliqueMatcher::default()).unwrap_err();
        assert!(matches!(
            err,
            NlgError::Isomorphism {
                query_nodes: 3,
                template_nodes: 4
            }
        ));
    }

    #[test]
    fn unknown_node_is_corrupt() {
        let (q, t) = microsoft_pair();
        let bogus = Correspondence::new(vec![(NodeIndex::new(0), NodeIndex::new(42))]);
        let err = align(&q, &t, &bogus).unwrap_err();
        assert!(matches!(err, NlgError::CorruptGraph { graph: "template", node: 42 }));
    }

    #[test]
    fn conflicting_pairs_are_rejected() {
        let (q, t) = microsoft_pair();
        let bad = Correspondence::new(vec![
            (NodeIndex::new(0), NodeIndex::new(0)),
            (NodeIndex::new(0), NodeIndex::new(1)),
        ]);
        let err = align(&q, &t, &bad).unwrap_err();
        assert!(matches!(err, NlgError::InconsistentMapping { .. }));
    }

    #[test]
    fn empty_correspondence_yields_empty_maps() {
        let aligned = align(&QueryGraph::new(), &QueryGraph::new(), &Correspondence::default()).unwrap();
        assert!(aligned.is_empty());
    }
}
