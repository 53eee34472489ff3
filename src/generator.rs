//! Generator facade: top-level API for verbalizing a SPARQL query.
//!
//! The [`NaturalLanguageGenerator`] owns the collaborators of a generation
//! call (isomorphism matcher, label source, query graph builder) and runs
//! the pipeline: build the template graph, align it with the query, resolve
//! labels for every concrete query entity, substitute the template's slots.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::align::{VariableCorrespondence, align};
use crate::error::{NlgError, NlgResult, TemplateError};
use crate::graph::QueryGraph;
use crate::graph::builder::QueryGraphBuilder;
use crate::graph::isomorphism::{
    CliqueMatcher, Correspondence, DEFAULT_MAX_CORRESPONDENCES, IsomorphismMatcher,
};
use crate::label::{LabelCache, LabelResolver, LabelSource};
use crate::substitute::{SlotOutcome, substitute_with_outcomes};
use crate::template::{Template, TemplateSource};

/// How to pick among several valid correspondences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrespondenceSelection {
    /// The first one the matcher enumerates.
    #[default]
    First,
    /// The one that lets the most slots resolve to a real label; ties go to
    /// the earliest.
    MostResolvedLabels,
}

/// Configuration for the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub selection: CorrespondenceSelection,
    /// Resolve distinct entities on the rayon pool before substituting.
    pub parallel_labels: bool,
    /// Reject templates whose slot anchors are missing from their query.
    /// When off, such slots are logged and skipped.
    pub validate_templates: bool,
    /// Upper bound on correspondences the default matcher enumerates.
    pub max_correspondences: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            selection: CorrespondenceSelection::First,
            parallel_labels: false,
            validate_templates: false,
            max_correspondences: DEFAULT_MAX_CORRESPONDENCES,
        }
    }
}

impl GeneratorConfig {
    /// Parse a configuration from TOML; missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> NlgResult<Self> {
        toml::from_str(content).map_err(|e| NlgError::Config {
            message: e.to_string(),
        })
    }
}

/// Result of one generation call.
#[derive(Debug, Clone)]
pub struct Generation {
    /// The rewritten question.
    pub sentence: String,
    /// The token alignment that was used.
    pub correspondence: VariableCorrespondence,
    /// Every label resolved during the call.
    pub labels: LabelCache,
    /// Outcome per template slot, in slot order.
    pub outcomes: Vec<SlotOutcome>,
}

/// Turns SPARQL queries into sentences using question templates.
pub struct NaturalLanguageGenerator {
    config: GeneratorConfig,
    matcher: Box<dyn IsomorphismMatcher>,
    labels: Arc<dyn LabelSource>,
    builder: QueryGraphBuilder,
}

impl NaturalLanguageGenerator {
    /// Create a generator with the default clique matcher.
    pub fn new(config: GeneratorConfig, labels: impl LabelSource + 'static) -> NlgResult<Self> {
        Self::with_shared_labels(config, Arc::new(labels))
    }

    /// Create a generator around a label source shared with other callers.
    pub fn with_shared_labels(
        config: GeneratorConfig,
        labels: Arc<dyn LabelSource>,
    ) -> NlgResult<Self> {
        if config.max_correspondences == 0 {
            return Err(NlgError::Config {
                message: "max_correspondences must be > 0".into(),
            });
        }
        tracing::info!(
            selection = ?config.selection,
            parallel_labels = config.parallel_labels,
            "initializing generator"
        );
        Ok(Self {
            matcher: Box::new(CliqueMatcher::new(config.max_correspondences)),
            config,
            labels,
            builder: QueryGraphBuilder::new(),
        })
    }

    /// Replace the isomorphism matcher.
    pub fn with_matcher(mut self, matcher: impl IsomorphismMatcher + 'static) -> Self {
        self.matcher = Box::new(matcher);
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Verbalize `query` using `template`, rewriting `question`.
    pub fn generate(
        &self,
        query: &QueryGraph,
        template: &Template,
        question: &str,
    ) -> NlgResult<Generation> {
        let template_graph = self.builder.build(&template.query)?;
        match template.validate(&template_graph) {
            Err(e) if self.config.validate_templates => return Err(e.into()),
            Err(e) => tracing::warn!(error = %e, "slot anchor not in template query, slot skipped"),
            Ok(()) => {}
        }

        let candidates = self.matcher.correspondences(query, &template_graph);
        if candidates.is_empty() {
            return Err(NlgError::Isomorphism {
                query_nodes: query.node_count(),
                template_nodes: template_graph.node_count(),
            });
        }
        tracing::debug!(candidates = candidates.len(), "query and template are isomorphic");

        let mut resolver = LabelResolver::new(self.labels.as_ref());
        let correspondence =
            self.select(query, &template_graph, template, &candidates, &mut resolver)?;

        resolver.prefetch(correspondence.concrete_query_tokens(), self.config.parallel_labels);
        let (sentence, outcomes) = substitute_with_outcomes(
            question,
            &template.slots,
            &correspondence,
            |token| resolver.resolve(token),
        );

        tracing::info!(
            slots = template.slots.len(),
            labels = resolver.cache().len(),
            resolved = resolver.cache().found_count(),
            "generated sentence"
        );
        Ok(Generation {
            sentence,
            correspondence,
            labels: resolver.into_cache(),
            outcomes,
        })
    }

    /// Build the query graph from SPARQL text, then [`generate`](Self::generate).
    pub fn generate_from_sparql(
        &self,
        sparql: &str,
        template: &Template,
        question: &str,
    ) -> NlgResult<Generation> {
        let query = self.builder.build(sparql)?;
        self.generate(&query, template, question)
    }

    /// Only the sentence of [`generate_from_sparql`](Self::generate_from_sparql).
    pub fn generate_sentence(
        &self,
        sparql: &str,
        template: &Template,
        question: &str,
    ) -> NlgResult<String> {
        self.generate_from_sparql(sparql, template, question)
            .map(|g| g.sentence)
    }

    /// Ask `templates` for the question's candidates and use the first one.
    pub fn generate_for_question(
        &self,
        sparql: &str,
        question: &str,
        templates: &dyn TemplateSource,
    ) -> NlgResult<Generation> {
        let template = templates
            .build_templates(question)?
            .into_iter()
            .next()
            .ok_or_else(|| TemplateError::NoTemplate {
                question: question.to_string(),
            })?;
        self.generate_from_sparql(sparql, &template, question)
    }

    fn select(
        &self,
        query: &QueryGraph,
        template_graph: &QueryGraph,
        template: &Template,
        candidates: &[Correspondence],
        resolver: &mut LabelResolver<'_>,
    ) -> NlgResult<VariableCorrespondence> {
        match self.config.selection {
            CorrespondenceSelection::First => align(query, template_graph, &candidates[0]),
            CorrespondenceSelection::MostResolvedLabels => {
                let mut best: Option<(usize, VariableCorrespondence)> = None;
                for candidate in candidates {
                    let aligned = align(query, template_graph, candidate)?;
                    resolver.prefetch(aligned.concrete_query_tokens(), self.config.parallel_labels);
                    let score = resolved_slots(template, &aligned, resolver);
                    if best.as_ref().is_none_or(|(top, _)| score > *top) {
                        best = Some((score, aligned));
                    }
                }
                tracing::debug!(
                    score = best.as_ref().map(|(s, _)| *s),
                    "selected correspondence by resolved labels"
                );
                best.map(|(_, aligned)| aligned).ok_or(NlgError::Isomorphism {
                    query_nodes: query.node_count(),
                    template_nodes: template_graph.node_count(),
                })
            }
        }
    }
}

/// Slots whose anchor maps to a concrete entity with a real label.
fn resolved_slots(
    template: &Template,
    aligned: &VariableCorrespondence,
    resolver: &mut LabelResolver<'_>,
) -> usize {
    let mut count = 0;
    for slot in &template.slots {
        if let Some(token) = aligned.query_token(&slot.anchor_token()) {
            if !token.is_variable() && resolver.resolve(token).is_found() {
                count += 1;
            }
        }
    }
    count
}

impl std::fmt::Debug for NaturalLanguageGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NaturalLanguageGenerator")
            .field("config", &self.config)
            .finish()
    }
}
