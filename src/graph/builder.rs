//! Build a [`QueryGraph`] from SPARQL text.
//!
//! Syntax is handled by `spargebra`; this module only walks the resulting
//! algebra and collects the triple patterns. Solution modifiers (projection,
//! DISTINCT, ORDER BY, LIMIT), filters and BIND are transparent: they do not
//! change the shape of the pattern.

use spargebra::algebra::{GraphPattern, PropertyPathExpression};
use spargebra::term::{Literal, NamedNodePattern, TermPattern, TriplePattern};
use spargebra::{Query, SparqlParser};

use crate::error::GraphError;
use crate::token::Token;

use super::QueryGraph;

const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

/// Result type for graph construction.
pub type GraphResult<T> = std::result::Result<T, GraphError>;

/// Converts SPARQL queries into query graphs.
#[derive(Debug, Clone, Default)]
pub struct QueryGraphBuilder;

impl QueryGraphBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Parse `sparql` and build its query graph.
    pub fn build(&self, sparql: &str) -> GraphResult<QueryGraph> {
        let query = SparqlParser::new()
            .parse_query(sparql)
            .map_err(|e| GraphError::Parse {
                message: e.to_string(),
            })?;

        let pattern = match &query {
            Query::Select { pattern, .. }
            | Query::Construct { pattern, .. }
            | Query::Describe { pattern, .. }
            | Query::Ask { pattern, .. } => pattern,
        };

        let mut graph = QueryGraph::new().with_source(sparql);
        collect_pattern(pattern, &mut graph)?;
        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "built query graph"
        );
        Ok(graph)
    }
}

fn collect_pattern(pattern: &GraphPattern, graph: &mut QueryGraph) -> GraphResult<()> {
    match pattern {
        GraphPattern::Bgp { patterns } => {
            for triple in patterns {
                add_triple_pattern(triple, graph)?;
            }
            Ok(())
        }
        GraphPattern::Path {
            subject,
            path,
            object,
        } => match path {
            PropertyPathExpression::NamedNode(predicate) => {
                graph.add_triple(
                    term_token(subject)?,
                    Token::resource(predicate.as_str()),
                    term_token(object)?,
                );
                Ok(())
            }
            other => Err(GraphError::UnsupportedPattern {
                pattern: format!("property path {other}"),
            }),
        },
        GraphPattern::Join { left, right }
        | GraphPattern::LeftJoin { left, right, .. }
        | GraphPattern::Union { left, right } => {
            collect_pattern(left, graph)?;
            collect_pattern(right, graph)
        }
        GraphPattern::Filter { inner, .. }
        | GraphPattern::Extend { inner, .. }
        | GraphPattern::Project { inner, .. }
        | GraphPattern::Distinct { inner }
        | GraphPattern::Reduced { inner }
        | GraphPattern::Slice { inner, .. }
        | GraphPattern::OrderBy { inner, .. }
        | GraphPattern::Group { inner, .. }
        | GraphPattern::Graph { inner, .. } => collect_pattern(inner, graph),
        GraphPattern::Values { .. } => Ok(()),
        other => Err(GraphError::UnsupportedPattern {
            pattern: other.to_string(),
        }),
    }
}

fn add_triple_pattern(triple: &TriplePattern, graph: &mut QueryGraph) -> GraphResult<()> {
    let predicate = match &triple.predicate {
        NamedNodePattern::NamedNode(nn) => Token::resource(nn.as_str()),
        NamedNodePattern::Variable(v) => Token::variable(v.as_str()),
    };
    graph.add_triple(term_token(&triple.subject)?, predicate, term_token(&triple.object)?);
    Ok(())
}

fn term_token(term: &TermPattern) -> GraphResult<Token> {
    match term {
        TermPattern::NamedNode(nn) => Ok(Token::resource(nn.as_str())),
        TermPattern::Variable(v) => Ok(Token::variable(v.as_str())),
        TermPattern::BlankNode(b) => Ok(Token::Blank(b.as_str().to_string())),
        TermPattern::Literal(l) => Ok(literal_token(l)),
        #[allow(unreachable_patterns)]
        other => Err(GraphError::InvalidToken {
            token: other.to_string(),
        }),
    }
}

fn literal_token(literal: &Literal) -> Token {
    if let Some(language) = literal.language() {
        Token::annotated_literal(literal.value(), format!("@{language}"))
    } else if literal.datatype().as_str() == XSD_STRING {
        Token::literal(literal.value())
    } else {
        Token::annotated_literal(literal.value(), format!("^^<{}>", literal.datatype().as_str()))
    }
}
