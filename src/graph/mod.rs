//! Query graphs: the structural view of a SPARQL query used for alignment.
//!
//! Every distinct [`Token`] of a query's triple patterns becomes exactly one
//! node. A pattern `s p o` contributes the edges `s → p` and `p → o`, so the
//! predicate is a node of its own and property slots can be aligned like any
//! other variable.
//!
//! - [`builder`]: SPARQL text → [`QueryGraph`]
//! - [`isomorphism`]: node correspondences between two query graphs

pub mod builder;
pub mod isomorphism;

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};

use crate::token::Token;

/// Positions a token occupies in the query's triple patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeRole {
    /// Subject or object only.
    Term,
    /// Predicate only.
    Predicate,
    /// Used both as a term and as a predicate.
    Both,
}

impl NodeRole {
    fn merge(self, other: NodeRole) -> NodeRole {
        if self == other { self } else { NodeRole::Both }
    }
}

/// Which half of a reified triple pattern an edge encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EdgeRole {
    /// subject → predicate
    SubjectOf,
    /// predicate → object
    ObjectOf,
}

/// Node weight stored on petgraph nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    /// The original token this node stands for.
    pub token: Token,
    /// Positions the token occupies.
    pub role: NodeRole,
}

/// A query graph with a token ↔ node bijection.
#[derive(Debug, Clone, Default)]
pub struct QueryGraph {
    graph: DiGraph<GraphNode, EdgeRole>,
    token_index: HashMap<Token, NodeIndex>,
    /// The query text the graph was built from, if any.
    source: Option<String>,
}

impl QueryGraph {
    /// Create an empty query graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the original query text.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Ensure a node exists for `token`, widening its role if needed.
    pub fn add_token(&mut self, token: Token, role: NodeRole) -> NodeIndex {
        if let Some(&idx) = self.token_index.get(&token) {
            if let Some(node) = self.graph.node_weight_mut(idx) {
                node.role = node.role.merge(role);
            }
            return idx;
        }
        let idx = self.graph.add_node(GraphNode {
            token: token.clone(),
            role,
        });
        self.token_index.insert(token, idx);
        idx
    }

    /// Add the triple pattern `subject predicate object`.
    pub fn add_triple(&mut self, subject: Token, predicate: Token, object: Token) {
        let s = self.add_token(subject, NodeRole::Term);
        let p = self.add_token(predicate, NodeRole::Predicate);
        let o = self.add_token(object, NodeRole::Term);
        self.add_edge(s, p, EdgeRole::SubjectOf);
        self.add_edge(p, o, EdgeRole::ObjectOf);
    }

    fn add_edge(&mut self, from: NodeIndex, to: NodeIndex, role: EdgeRole) {
        let exists = self
            .graph
            .edges_connecting(from, to)
            .any(|e| *e.weight() == role);
        if !exists {
            self.graph.add_edge(from, to, role);
        }
    }

    /// The token a node stands for.
    pub fn token_of(&self, node: NodeIndex) -> Option<&Token> {
        self.graph.node_weight(node).map(|n| &n.token)
    }

    /// The node standing for a token.
    pub fn node_of(&self, token: &Token) -> Option<NodeIndex> {
        self.token_index.get(token).copied()
    }

    /// Whether `token` is a node of this graph.
    pub fn contains(&self, token: &Token) -> bool {
        self.token_index.contains_key(token)
    }

    /// Role of a node.
    pub fn role_of(&self, node: NodeIndex) -> Option<NodeRole> {
        self.graph.node_weight(node).map(|n| n.role)
    }

    /// Edge roles on `from → to`, sorted.
    pub fn edge_roles(&self, from: NodeIndex, to: NodeIndex) -> Vec<EdgeRole> {
        let mut roles: Vec<EdgeRole> = self
            .graph
            .edges_connecting(from, to)
            .map(|e| *e.weight())
            .collect();
        roles.sort();
        roles
    }

    /// Number of outgoing and incoming edges of a node.
    pub fn degree(&self, node: NodeIndex) -> (usize, usize) {
        (
            self.graph.edges_directed(node, Direction::Outgoing).count(),
            self.graph.edges_directed(node, Direction::Incoming).count(),
        )
    }

    /// All node indices in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// All tokens in node insertion order.
    pub fn tokens(&self) -> impl Iterator<Item = &Token> + '_ {
        self.graph.node_weights().map(|n| &n.token)
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// The original query text, if known.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Underlying petgraph graph.
    pub fn graph(&self) -> &DiGraph<GraphNode, EdgeRole> {
        &self.graph
    }
}
