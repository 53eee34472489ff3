//! Question templates and their slots.
//!
//! A [`Template`] is what the templating component produces for a question:
//! the question's canonical SPARQL plus an ordered list of [`Slot`]s, each
//! naming the template variable it is bound to and the words it currently
//! occupies in the question text.
//!
//! The templating component itself is external. [`TemplateSource`] is its
//! interface and [`TemplateCatalog`] a file-backed stand-in.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{NlgResult, TemplateError};
use crate::graph::QueryGraph;
use crate::token::Token;

/// Kind of entity a slot expects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotType {
    Resource,
    Class,
    Property,
    SymbolicProperty,
    Literal,
    #[default]
    Unspecified,
}

/// One fillable span of words in a template sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// Template variable the slot is bound to, without sigil.
    pub anchor: String,
    /// Surface form, one entry per word.
    pub words: Vec<String>,
    #[serde(rename = "type", default)]
    pub slot_type: SlotType,
}

impl Slot {
    pub fn new(anchor: impl Into<String>, words: &[&str]) -> Self {
        Self {
            anchor: anchor.into(),
            words: words.iter().map(|w| w.to_string()).collect(),
            slot_type: SlotType::Unspecified,
        }
    }

    pub fn with_type(mut self, slot_type: SlotType) -> Self {
        self.slot_type = slot_type;
        self
    }

    /// The template-graph token of the anchor.
    pub fn anchor_token(&self) -> Token {
        Token::variable(&self.anchor)
    }

    /// The words joined by single spaces.
    pub fn surface_form(&self) -> String {
        self.words.join(" ")
    }
}

/// A natural-language question skeleton.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    /// Canonical SPARQL form of the template.
    pub query: String,
    /// Slots in the order the templating component produced them.
    #[serde(rename = "slot", default)]
    pub slots: Vec<Slot>,
}

impl Template {
    pub fn new(query: impl Into<String>, slots: Vec<Slot>) -> Self {
        Self {
            query: query.into(),
            slots,
        }
    }

    /// Check that every slot anchor is a node of the template's graph.
    pub fn validate(&self, graph: &QueryGraph) -> Result<(), TemplateError> {
        for slot in &self.slots {
            if !graph.contains(&slot.anchor_token()) {
                return Err(TemplateError::UnknownAnchor {
                    anchor: slot.anchor.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Settings for the templating component.
///
/// Passed explicitly rather than kept in process-wide state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplatorConfig {
    /// Lexicon/grammar files the templator loads.
    pub grammar_files: Vec<PathBuf>,
    /// Emit the templator's intermediate derivations.
    pub verbose: bool,
}

/// Interface of the templating component.
pub trait TemplateSource {
    /// Candidate templates for a question, best first.
    fn build_templates(&self, question: &str) -> NlgResult<Vec<Template>>;
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    template: Vec<CatalogEntry>,
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    question: String,
    #[serde(flatten)]
    template: Template,
}

/// Fixed question → templates table, loadable from TOML.
///
/// ```toml
/// [[template]]
/// question = "Who founded Microsoft?"
/// query = "SELECT ?x1 WHERE { ?y ?p ?x1 . }"
///
/// [[template.slot]]
/// anchor = "y"
/// words = ["Microsoft"]
/// type = "resource"
/// ```
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    config: TemplatorConfig,
    templates: HashMap<String, Vec<Template>>,
}

impl TemplateCatalog {
    pub fn new(config: TemplatorConfig) -> Self {
        Self {
            config,
            templates: HashMap::new(),
        }
    }

    /// Register a candidate template for `question`.
    pub fn insert(&mut self, question: impl Into<String>, template: Template) {
        self.templates
            .entry(question.into())
            .or_default()
            .push(template);
    }

    /// Parse a TOML catalogue.
    pub fn from_toml_str(config: TemplatorConfig, content: &str) -> Result<Self, TemplateError> {
        let file: CatalogFile = toml::from_str(content).map_err(|e| TemplateError::Parse {
            message: e.to_string(),
        })?;
        let mut catalog = Self::new(config);
        for entry in file.template {
            catalog.insert(entry.question, entry.template);
        }
        if catalog.config.verbose {
            tracing::info!(questions = catalog.templates.len(), "loaded template catalogue");
        }
        Ok(catalog)
    }

    /// Load every configured grammar file into one catalogue.
    pub fn load(config: TemplatorConfig) -> Result<Self, TemplateError> {
        let mut catalog = Self::new(config.clone());
        for path in &config.grammar_files {
            let part = Self::load_file(config.clone(), path)?;
            for (question, templates) in part.templates {
                catalog
                    .templates
                    .entry(question)
                    .or_default()
                    .extend(templates);
            }
        }
        Ok(catalog)
    }

    fn load_file(config: TemplatorConfig, path: &Path) -> Result<Self, TemplateError> {
        let content = std::fs::read_to_string(path).map_err(|e| TemplateError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml_str(config, &content)
    }

    pub fn config(&self) -> &TemplatorConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl TemplateSource for TemplateCatalog {
    fn build_templates(&self, question: &str) -> NlgResult<Vec<Template>> {
        let found = self.templates.get(question.trim()).cloned().unwrap_or_default();
        if self.config.verbose {
            tracing::debug!(question, candidates = found.len(), "templates for question");
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::builder::QueryGraphBuilder;

    const CATALOG: &str = r#"
[[template]]
question = "Who founded Microsoft?"
query = "SELECT ?x1 WHERE { ?y ?p ?x1 . }"

[[template.slot]]
anchor = "x1"
words = ["founded"]

[[template.slot]]
anchor = "y"
words = ["Microsoft"]
type = "resource"
"#;

    #[test]
    fn surface_form_joins_words() {
        let slot = Slot::new("y", &["Bill", "Gates"]);
        assert_eq!(slot.surface_form(), "Bill Gates");
        assert_eq!(slot.anchor_token(), Token::variable("y"));
    }

    #[test]
    fn validate_rejects_unknown_anchor() {
        let template = Template::new(
            "SELECT ?x WHERE { ?x ?p ?y }",
            vec![Slot::new("z", &["Berlin"])],
        );
        let graph = QueryGraphBuilder::new().build(&template.query).unwrap();
        let err = template.validate(&graph).unwrap_err();
        assert!(matches!(err, TemplateError::UnknownAnchor { anchor } if anchor == "z"));
    }

    #[test]
    fn catalogue_parses_slots_in_order() {
        let catalog = TemplateCatalog::from_toml_str(TemplatorConfig::default(), CATALOG).unwrap();
        let templates = catalog.build_templates("Who founded Microsoft?").unwrap();
        assert_eq!(templates.len(), 1);
        let slots = &templates[0].slots;
        assert_eq!(slots[0].anchor, "x1");
        assert_eq!(slots[0].slot_type, SlotType::Unspecified);
        assert_eq!(slots[1].anchor, "y");
        assert_eq!(slots[1].slot_type, SlotType::Resource);
    }

    #[test]
    fn unknown_question_has_no_templates() {
        let catalog = TemplateCatalog::from_toml_str(TemplatorConfig::default(), CATALOG).unwrap();
        assert!(catalog.build_templates("Who is Bill Gates?").unwrap().is_empty());
    }

    #[test]
    fn malformed_catalogue_is_a_parse_error() {
        let err = TemplateCatalog::from_toml_str(TemplatorConfig::default(), "[[template]]\nquery = 1")
            .unwrap_err();
        assert!(matches!(err, TemplateError::Parse { .. }));
    }

    #[test]
    fn load_merges_grammar_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let first = dir.path().join("a.toml");
        let second = dir.path().join("b.toml");
        std::fs::write(&first, CATALOG).unwrap();
        std::fs::write(&second, CATALOG).unwrap();

        let catalog = TemplateCatalog::load(TemplatorConfig {
            grammar_files: vec![first, second],
            ..Default::default()
        })
        .unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.build_templates("Who founded Microsoft?").unwrap().len(), 2);
    }

    #[test]
    fn templator_config_reads_from_toml() {
        let config: TemplatorConfig =
            toml::from_str("grammar_files = [\"lexicon.toml\"]\nverbose = true\n").unwrap();
        assert_eq!(
            config,
            TemplatorConfig {
                grammar_files: vec![PathBuf::from("lexicon.toml")],
                verbose: true,
            }
        );
    }

    #[test]
    fn missing_grammar_file_is_a_read_error() {
        let err = TemplateCatalog::load(TemplatorConfig {
            grammar_files: vec![PathBuf::from("/nonexistent/lexicon.toml")],
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, TemplateError::Read { .. }));
    }
}
