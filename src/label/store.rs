//! Local label source backed by oxigraph.
//!
//! Holds `rdfs:label` triples in an in-memory or on-disk store and answers
//! the same label query the remote endpoint gets. Useful offline, for
//! fixtures, and for pre-fetched label dumps.

use oxigraph::io::RdfFormat;
use oxigraph::model::{GraphNameRef, Literal, NamedNode, Quad, Term};
use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;

use crate::error::LabelError;

use super::LabelSource;
use super::endpoint::label_query;

const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";

/// Result type for label store operations.
pub type StoreResult<T> = std::result::Result<T, LabelError>;

/// oxigraph-backed label source.
pub struct StoreLabels {
    store: Store,
    language: String,
}

impl StoreLabels {
    /// Create a new in-memory label store.
    pub fn in_memory() -> StoreResult<Self> {
        let store = Store::new().map_err(|e| LabelError::Store {
            message: format!("failed to create oxigraph store: {e}"),
        })?;
        Ok(Self {
            store,
            language: "en".into(),
        })
    }

    /// Open or create a persistent label store at the given path.
    pub fn open(path: &std::path::Path) -> StoreResult<Self> {
        std::fs::create_dir_all(path).map_err(|e| LabelError::Store {
            message: format!("failed to create oxigraph directory: {e}"),
        })?;
        let store = Store::open(path).map_err(|e| LabelError::Store {
            message: format!("failed to open oxigraph store at {}: {e}", path.display()),
        })?;
        Ok(Self {
            store,
            language: "en".into(),
        })
    }

    /// Use a different label language than English.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Add a language-tagged `rdfs:label` for `iri`.
    pub fn insert_label(&self, iri: &str, label: &str, language: &str) -> StoreResult<()> {
        let subject = NamedNode::new(iri).map_err(|_| LabelError::InvalidIri {
            iri: iri.to_string(),
        })?;
        let object = Literal::new_language_tagged_literal(label, language).map_err(|e| {
            LabelError::Store {
                message: format!("invalid language tag {language}: {e}"),
            }
        })?;
        let quad = Quad::new(
            subject,
            NamedNode::new_unchecked(RDFS_LABEL),
            object,
            GraphNameRef::DefaultGraph,
        );
        self.store.insert(&quad).map_err(|e| LabelError::Store {
            message: format!("insert failed: {e}"),
        })?;
        Ok(())
    }

    /// Load N-Triples data (e.g. a label dump) into the store.
    pub fn load_ntriples(&self, data: &str) -> StoreResult<()> {
        self.store
            .load_from_reader(RdfFormat::NTriples, data.as_bytes())
            .map_err(|e| LabelError::Store {
                message: format!("failed to load N-Triples: {e}"),
            })
    }

    /// Number of quads in the store.
    pub fn len(&self) -> StoreResult<usize> {
        self.store.len().map_err(|e| LabelError::Store {
            message: e.to_string(),
        })
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        self.len().map(|n| n == 0)
    }
}

impl LabelSource for StoreLabels {
    fn lookup(&self, iri: &str) -> Result<Option<String>, LabelError> {
        let query = label_query(iri, &self.language)?;
        let results = self.store.query(query.as_str()).map_err(|e| LabelError::Store {
            message: format!("SPARQL label query failed: {e}"),
        })?;

        match results {
            QueryResults::Solutions(solutions) => {
                for solution in solutions {
                    let solution = solution.map_err(|e| LabelError::Store {
                        message: format!("solution error: {e}"),
                    })?;
                    if let Some(Term::Literal(label)) = solution.get("label") {
                        return Ok(Some(label.value().to_string()));
                    }
                }
                Ok(None)
            }
            _ => Err(LabelError::Store {
                message: "unexpected result type from label query".into(),
            }),
        }
    }
}

impl std::fmt::Debug for StoreLabels {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreLabels")
            .field("language", &self.language)
            .finish()
    }
}
