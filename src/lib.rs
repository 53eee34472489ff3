// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # sparql-nlg
//!
//! Verbalizes SPARQL queries by aligning them with question templates.
//!
//! A template is a natural-language question plus its canonical SPARQL and
//! a list of slots. When the query and the template's SPARQL have the same
//! graph shape, every template variable corresponds to a query token; slots
//! bound to concrete query entities get the entity's label, slots bound to
//! query variables keep their wording.
//!
//! ## Architecture
//!
//! - **Tokens** (`token`): variables, IRIs, literals, blank nodes
//! - **Query graphs** (`graph`): petgraph graph with a token ↔ node bijection,
//!   built from SPARQL via `spargebra`
//! - **Isomorphism** (`graph::isomorphism`): association-graph clique matcher
//! - **Alignment** (`align`): node correspondence → inverse token maps
//! - **Labels** (`label`): memoized lookup over a remote endpoint or oxigraph
//! - **Substitution** (`substitute`): sequential slot rewriting
//!
//! ## Library usage
//!
//! ```no_run
//! use sparql_nlg::generator::{GeneratorConfig, NaturalLanguageGenerator};
//! use sparql_nlg::label::endpoint::SparqlEndpointLabels;
//! use sparql_nlg::template::{Slot, Template};
//!
//! let generator =
//!     NaturalLanguageGenerator::new(GeneratorConfig::default(), SparqlEndpointLabels::dbpedia())
//!         .unwrap();
//! let template = Template::new(
//!     "SELECT ?x1 WHERE { ?y ?p ?x1 . }",
//!     vec![Slot::new("x1", &["founded"]), Slot::new("y", &["Microsoft"])],
//! );
//! let sentence = generator
//!     .generate_sentence(
//!         "SELECT ?x WHERE { <http://dbpedia.org/resource/Apple_Inc.> \
//!          <http://dbpedia.org/ontology/foundedBy> ?x . }",
//!         &template,
//!         "Who founded Microsoft?",
//!     )
//!     .unwrap();
//! println!("{sentence}");
//! ```

pub mod align;
pub mod error;
pub mod generator;
pub mod graph;
pub mod label;
pub mod substitute;
pub mod template;
pub mod token;
