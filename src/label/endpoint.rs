//! Remote SPARQL endpoint label source.
//!
//! Sends `SELECT ?label { <iri> rdfs:label ?label . FILTER(lang(?label) = 'en') }`
//! over HTTP with a bounded timeout and reads the first binding of the JSON
//! result. The endpoint is only ever asked for labels; every failure surfaces
//! as a [`LabelError`] for the resolver to absorb.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::LabelError;

use super::LabelSource;

/// Configuration for a label endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// SPARQL endpoint URL.
    pub url: String,
    /// Default graph passed as `default-graph-uri`, if any.
    pub default_graph: Option<String>,
    /// Language tag the label must carry.
    pub language: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: "http://live.dbpedia.org/sparql/".into(),
            default_graph: Some("http://dbpedia.org".into()),
            language: "en".into(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SparqlJson {
    results: SparqlBindings,
}

#[derive(Debug, Deserialize)]
struct SparqlBindings {
    bindings: Vec<std::collections::HashMap<String, SparqlValue>>,
}

#[derive(Debug, Deserialize)]
struct SparqlValue {
    value: String,
}

/// Label source backed by a remote SPARQL endpoint.
pub struct SparqlEndpointLabels {
    config: EndpointConfig,
    agent: ureq::Agent,
}

impl SparqlEndpointLabels {
    pub fn new(config: EndpointConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();
        Self { config, agent }
    }

    /// Client for the public DBpedia endpoint.
    pub fn dbpedia() -> Self {
        Self::new(EndpointConfig::default())
    }

    pub fn config(&self) -> &EndpointConfig {
        &self.config
    }

    fn parse_response(body: &str) -> Result<Option<String>, LabelError> {
        let json: SparqlJson =
            serde_json::from_str(body).map_err(|e| LabelError::MalformedResponse {
                message: e.to_string(),
            })?;
        Ok(json
            .results
            .bindings
            .into_iter()
            .find_map(|mut row| row.remove("label"))
            .map(|v| v.value))
    }

    fn is_timeout(transport: &ureq::Transport) -> bool {
        std::error::Error::source(transport)
            .and_then(|s| s.downcast_ref::<std::io::Error>())
            .is_some_and(|e| {
                matches!(
                    e.kind(),
                    std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
                )
            })
    }
}

impl LabelSource for SparqlEndpointLabels {
    fn lookup(&self, iri: &str) -> Result<Option<String>, LabelError> {
        let query = label_query(iri, &self.config.language)?;

        let mut request = self
            .agent
            .get(&self.config.url)
            .set("Accept", "application/sparql-results+json")
            .query("query", &query);
        if let Some(graph) = &self.config.default_graph {
            request = request.query("default-graph-uri", graph);
        }

        let resp = match request.call() {
            Ok(resp) => resp,
            Err(ureq::Error::Status(code, _)) => return Err(LabelError::Status { status: code }),
            Err(ureq::Error::Transport(transport)) => {
                if Self::is_timeout(&transport) {
                    return Err(LabelError::Timeout {
                        timeout_secs: self.config.timeout_secs,
                    });
                }
                return Err(LabelError::Transport {
                    url: self.config.url.clone(),
                    message: transport.to_string(),
                });
            }
        };

        let body = resp.into_string().map_err(|e| LabelError::MalformedResponse {
            message: e.to_string(),
        })?;
        Self::parse_response(&body)
    }
}

impl std::fmt::Debug for SparqlEndpointLabels {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SparqlEndpointLabels")
            .field("config", &self.config)
            .finish()
    }
}

/// The label query for one IRI.
///
/// IRIs containing characters that could break out of `<...>` are refused.
pub fn label_query(iri: &str, language: &str) -> Result<String, LabelError> {
    let invalid = iri.is_empty()
        || iri
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '<' | '>' | '"' | '{' | '}' | '\\'));
    if invalid || !language.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(LabelError::InvalidIri { iri: iri.to_string() });
    }
    Ok(format!(
        "PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#> \
         SELECT ?label WHERE {{ <{iri}> rdfs:label ?label . \
         FILTER(lang(?label) = '{language}') }}"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_embeds_iri_and_language() {
        let q = label_query("http://dbpedia.org/resource/Microsoft", "en").unwrap();
        assert!(q.contains("<http://dbpedia.org/resource/Microsoft> rdfs:label ?label"));
        assert!(q.contains("lang(?label) = 'en'"));
    }

    #[test]
    fn query_rejects_injection() {
        assert!(label_query("http://ex.org/a> } DROP ALL {", "en").is_err());
        assert!(label_query("", "en").is_err());
        assert!(label_query("http://ex.org/a", "en') || true || ('").is_err());
    }

    #[test]
    fn first_binding_wins() {
        let body = r#"{
            "head": { "vars": ["label"] },
            "results": { "bindings": [
                { "label": { "type": "literal", "xml:lang": "en", "value": "Microsoft" } },
                { "label": { "type": "literal", "xml:lang": "en", "value": "Microsoft Corp." } }
            ] }
        }"#;
        assert_eq!(
            SparqlEndpointLabels::parse_response(body).unwrap(),
            Some("Microsoft".into())
        );
    }

    #[test]
    fn empty_results_are_not_found() {
        let body = r#"{ "head": { "vars": ["label"] }, "results": { "bindings": [] } }"#;
        assert_eq!(SparqlEndpointLabels::parse_response(body).unwrap(), None);
    }

    #[test]
    fn html_error_pages_are_malformed() {
        let err = SparqlEndpointLabels::parse_response("<html>503</html>").unwrap_err();
        assert!(matches!(err, LabelError::MalformedResponse { .. }));
    }

    #[test]
    fn unreachable_endpoint_is_a_transport_error() {
        let labels = SparqlEndpointLabels::new(EndpointConfig {
            url: "http://127.0.0.1:9/sparql".into(),
            timeout_secs: 1,
            ..Default::default()
        });
        let err = labels.lookup("http://dbpedia.org/resource/Microsoft").unwrap_err();
        assert!(matches!(
            err,
            LabelError::Transport { .. } | LabelError::Timeout { .. }
        ));
    }

    #[test]
    fn default_config_targets_dbpedia() {
        let config = EndpointConfig::default();
        assert_eq!(config.url, "http://live.dbpedia.org/sparql/");
        assert_eq!(config.default_graph.as_deref(), Some("http://dbpedia.org"));
        assert_eq!(config.language, "en");
    }
}
