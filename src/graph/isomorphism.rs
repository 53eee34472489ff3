//! Structural alignment of two query graphs.
//!
//! [`IsomorphismMatcher`] is the pluggable capability; [`CliqueMatcher`] is
//! the default implementation. It first compares the multisets of node
//! roles and degrees, then enumerates maximum cliques of the association
//! graph: one vertex per
//! compatible node pair, an edge wherever two pairs agree on every edge
//! between their nodes. A clique covering all nodes is an isomorphism.

use std::collections::BTreeSet;

use petgraph::graph::{NodeIndex, UnGraph};

use super::{NodeRole, QueryGraph};

/// A node-level alignment: `(node in A, node in B)` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Correspondence {
    pairs: Vec<(NodeIndex, NodeIndex)>,
}

impl Correspondence {
    pub fn new(pairs: Vec<(NodeIndex, NodeIndex)>) -> Self {
        Self { pairs }
    }

    pub fn pairs(&self) -> &[(NodeIndex, NodeIndex)] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Computes node correspondences between two graphs.
pub trait IsomorphismMatcher: Send + Sync {
    /// All correspondences found, in the matcher's enumeration order.
    ///
    /// An empty list means the graphs are not isomorphic.
    fn correspondences(&self, a: &QueryGraph, b: &QueryGraph) -> Vec<Correspondence>;

    /// The first correspondence, if the graphs are isomorphic.
    fn find(&self, a: &QueryGraph, b: &QueryGraph) -> Option<Correspondence> {
        self.correspondences(a, b).into_iter().next()
    }
}

/// Default number of correspondences enumerated before stopping.
pub const DEFAULT_MAX_CORRESPONDENCES: usize = 64;

/// Association-graph / Bron–Kerbosch matcher.
#[derive(Debug, Clone)]
pub struct CliqueMatcher {
    max_correspondences: usize,
}

impl Default for CliqueMatcher {
    fn default() -> Self {
        Self {
            max_correspondences: DEFAULT_MAX_CORRESPONDENCES,
        }
    }
}

impl CliqueMatcher {
    pub fn new(max_correspondences: usize) -> Self {
        Self {
            max_correspondences: max_correspondences.max(1),
        }
    }

    /// Whether the graphs are isomorphic, respecting node and edge roles.
    pub fn is_isomorphic(&self, a: &QueryGraph, b: &QueryGraph) -> bool {
        !CliqueMatcher::new(1).correspondences(a, b).is_empty()
    }

    /// Sorted `(role, out-degree, in-degree)` of every node. Equal profiles
    /// are necessary for an isomorphism and independent of triple order.
    fn profile(g: &QueryGraph) -> Vec<(NodeRole, usize, usize)> {
        let mut profile: Vec<_> = g
            .nodes()
            .filter_map(|n| {
                let (out, inc) = g.degree(n);
                g.role_of(n).map(|role| (role, out, inc))
            })
            .collect();
        profile.sort_unstable();
        profile
    }

    fn association_graph(a: &QueryGraph, b: &QueryGraph) -> UnGraph<(NodeIndex, NodeIndex), ()> {
        let mut assoc = UnGraph::new_undirected();
        for na in a.nodes() {
            for nb in b.nodes() {
                if a.role_of(na) == b.role_of(nb) && a.degree(na) == b.degree(nb) {
                    assoc.add_node((na, nb));
                }
            }
        }

        let vertices: Vec<NodeIndex> = assoc.node_indices().collect();
        for (i, &u) in vertices.iter().enumerate() {
            for &v in &vertices[i + 1..] {
                let (a1, b1) = assoc[u];
                let (a2, b2) = assoc[v];
                if a1 == a2 || b1 == b2 {
                    continue;
                }
                if a.edge_roles(a1, a2) == b.edge_roles(b1, b2)
                    && a.edge_roles(a2, a1) == b.edge_roles(b2, b1)
                {
                    assoc.add_edge(u, v, ());
                }
            }
        }
        assoc
    }
}

impl IsomorphismMatcher for CliqueMatcher {
    fn correspondences(&self, a: &QueryGraph, b: &QueryGraph) -> Vec<Correspondence> {
        if a.node_count() != b.node_count() || a.edge_count() != b.edge_count() {
            return vec![];
        }
        if a.is_empty() {
            return vec![Correspondence::default()];
        }
        if Self::profile(a) != Self::profile(b) {
            tracing::debug!(
                a_nodes = a.node_count(),
                b_nodes = b.node_count(),
                "node role/degree profiles differ"
            );
            return vec![];
        }

        let assoc = Self::association_graph(a, b);
        let mut search = CliqueSearch {
            assoc: &assoc,
            target: a.node_count(),
            limit: self.max_correspondences,
            found: Vec::new(),
        };
        let candidates: BTreeSet<NodeIndex> = assoc.node_indices().collect();
        search.expand(&mut Vec::new(), candidates, BTreeSet::new());

        tracing::debug!(
            associations = assoc.node_count(),
            found = search.found.len(),
            "enumerated correspondences"
        );
        search
            .found
            .into_iter()
            .map(|clique| Correspondence::new(clique.into_iter().map(|v| assoc[v]).collect()))
            .collect()
    }
}

/// Bron–Kerbosch with pivoting, restricted to cliques of size `target`.
struct CliqueSearch<'a> {
    assoc: &'a UnGraph<(NodeIndex, NodeIndex), ()>,
    target: usize,
    limit: usize,
    found: Vec<Vec<NodeIndex>>,
}

impl CliqueSearch<'_> {
    fn neighbours(&self, v: NodeIndex) -> BTreeSet<NodeIndex> {
        self.assoc.neighbors(v).collect()
    }

    fn expand(
        &mut self,
        clique: &mut Vec<NodeIndex>,
        mut candidates: BTreeSet<NodeIndex>,
        mut excluded: BTreeSet<NodeIndex>,
    ) {
        if self.found.len() >= self.limit {
            return;
        }
        if candidates.is_empty() && excluded.is_empty() {
            if clique.len() == self.target {
                self.found.push(clique.clone());
            }
            return;
        }
        // A full alignment needs one pair per node; prune branches that cannot reach it.
        if clique.len() + candidates.len() < self.target {
            return;
        }

        let pivot = candidates
            .iter()
            .chain(excluded.iter())
            .copied()
            .max_by_key(|&u| {
                let n = self.neighbours(u);
                (candidates.intersection(&n).count(), std::cmp::Reverse(u))
            });
        let pivot_neighbours = pivot.map(|p| self.neighbours(p)).unwrap_or_default();

        let branch: Vec<NodeIndex> = candidates.difference(&pivot_neighbours).copied().collect();
        for v in branch {
            let n = self.neighbours(v);
            clique.push(v);
            self.expand(
                clique,
                candidates.intersection(&n).copied().collect(),
                excluded.intersection(&n).copied().collect(),
            );
            clique.pop();
            candidates.remove(&v);
            excluded.insert(v);
            if self.found.len() >= self.limit {
                return;
            }
        }
    }
}
