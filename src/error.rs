//! Rich diagnostic error types for sparql-nlg.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes, help text, and source chains so callers know exactly
//! which stage of a generation call failed and why.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for a generation call.
///
/// Only graph mismatch and internal corruption abort generation. Label lookup
/// failures never reach this type from [`crate::generator`]; they degrade the
/// affected slot instead.
#[derive(Debug, Error, Diagnostic)]
pub enum NlgError {
    #[error("query and template graphs are not isomorphic ({query_nodes} vs {template_nodes} nodes)")]
    #[diagnostic(
        code(nlg::isomorphism),
        help(
            "The template does not structurally correspond to the query, so no \
             slot can be mapped meaningfully. Pick a template whose canonical \
             SPARQL has the same triple-pattern shape as the query."
        )
    )]
    Isomorphism {
        query_nodes: usize,
        template_nodes: usize,
    },

    #[error("corrupt {graph} graph: node {node} has no token")]
    #[diagnostic(
        code(nlg::corrupt_graph),
        help(
            "A graph node is missing from the node/token lookup. This is a bug in \
             the component that built the graph, not a problem with the input."
        )
    )]
    CorruptGraph { graph: &'static str, node: usize },

    #[error("inconsistent alignment for {token}: already mapped to {existing}, got {incoming}")]
    #[diagnostic(
        code(nlg::inconsistent_mapping),
        help(
            "The chosen correspondence maps one token to two different counterparts. \
             The matcher returned a pair list that is not a bijection."
        )
    )]
    InconsistentMapping {
        token: String,
        existing: String,
        incoming: String,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Label(#[from] LabelError),

    #[error("invalid configuration: {message}")]
    #[diagnostic(
        code(nlg::invalid_config),
        help("Check the GeneratorConfig fields. {message}")
    )]
    Config { message: String },
}

// ---------------------------------------------------------------------------
// Graph errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum GraphError {
    #[error("SPARQL parse error: {message}")]
    #[diagnostic(
        code(nlg::graph::parse),
        help("The query text is not valid SPARQL. Check prefixes and brackets.")
    )]
    Parse { message: String },

    #[error("unsupported graph pattern: {pattern}")]
    #[diagnostic(
        code(nlg::graph::unsupported_pattern),
        help(
            "Only basic graph patterns, joins, OPTIONAL, UNION, FILTER, BIND and \
             simple predicate paths can be turned into a query graph."
        )
    )]
    UnsupportedPattern { pattern: String },

    #[error("token {token} is used as a graph node but is not a term")]
    #[diagnostic(
        code(nlg::graph::invalid_token),
        help("Graph nodes must be variables, IRIs, literals or blank nodes.")
    )]
    InvalidToken { token: String },
}

// ---------------------------------------------------------------------------
// Template errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum TemplateError {
    #[error("slot anchor ?{anchor} does not occur in the template query")]
    #[diagnostic(
        code(nlg::template::unknown_anchor),
        help(
            "Every slot must be bound to a variable of the template's canonical \
             SPARQL. Fix the templating component or the catalogue entry."
        )
    )]
    UnknownAnchor { anchor: String },

    #[error("no template available for question: \"{question}\"")]
    #[diagnostic(
        code(nlg::template::none),
        help(
            "The templating component produced no candidate for this question. \
             Add a catalogue entry or rephrase the question."
        )
    )]
    NoTemplate { question: String },

    #[error("failed to read template catalogue {path}: {source}")]
    #[diagnostic(
        code(nlg::template::read),
        help("Check that the catalogue file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse template catalogue: {message}")]
    #[diagnostic(
        code(nlg::template::parse),
        help(
            "The catalogue must be TOML with [[template]] tables carrying \
             `question`, `query` and optional [[template.slot]] entries."
        )
    )]
    Parse { message: String },
}

// ---------------------------------------------------------------------------
// Label errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum LabelError {
    #[error("label endpoint {url} unreachable: {message}")]
    #[diagnostic(
        code(nlg::label::transport),
        help("Check network access to the SPARQL endpoint or use a local label store.")
    )]
    Transport { url: String, message: String },

    #[error("label lookup timed out after {timeout_secs}s")]
    #[diagnostic(
        code(nlg::label::timeout),
        help("Increase `timeout_secs` in EndpointConfig or use a closer endpoint.")
    )]
    Timeout { timeout_secs: u64 },

    #[error("label endpoint returned HTTP {status}")]
    #[diagnostic(
        code(nlg::label::status),
        help("The endpoint rejected the label query. It may be overloaded or down.")
    )]
    Status { status: u16 },

    #[error("malformed label response: {message}")]
    #[diagnostic(
        code(nlg::label::malformed),
        help("The endpoint did not return SPARQL JSON results.")
    )]
    MalformedResponse { message: String },

    #[error("refusing to look up invalid IRI: {iri}")]
    #[diagnostic(
        code(nlg::label::invalid_iri),
        help("Resource tokens must be absolute IRIs without spaces or angle brackets.")
    )]
    InvalidIri { iri: String },

    #[error("label store error: {message}")]
    #[diagnostic(
        code(nlg::label::store),
        help("The local oxigraph label store failed. Check the loaded RDF data.")
    )]
    Store { message: String },
}

/// Convenience alias for functions returning sparql-nlg results.
pub type NlgResult<T> = std::result::Result<T, NlgError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_error_converts_to_nlg_error() {
        let err = GraphError::Parse {
            message: "unexpected token".into(),
        };
        let nlg: NlgError = err.into();
        assert!(matches!(nlg, NlgError::Graph(GraphError::Parse { .. })));
    }

    #[test]
    fn template_error_converts_to_nlg_error() {
        let err = TemplateError::UnknownAnchor {
            anchor: "x1".into(),
        };
        let nlg: NlgError = err.into();
        assert!(matches!(
            nlg,
            NlgError::Template(TemplateError::UnknownAnchor { .. })
        ));
    }

    #[test]
    fn error_display_messages_are_descriptive() {
        let err = NlgError::Isomorphism {
            query_nodes: 3,
            template_nodes: 5,
        };
        let msg = format!("{err}");
        assert!(msg.contains("not isomorphic"));
        assert!(msg.contains('3'));
        assert!(msg.contains('5'));

        let err = TemplateError::UnknownAnchor {
            anchor: "y".into(),
        };
        assert!(format!("{err}").contains("?y"));
    }
}
