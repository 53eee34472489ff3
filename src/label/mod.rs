//! Label resolution for concrete query entities.
//!
//! A [`LabelSource`] knows how to find an English label for an IRI. The
//! [`LabelResolver`] wraps a source for the duration of one generation call:
//! it memoizes every lookup in a [`LabelCache`] and turns every failure
//! into [`Label::NotFound`], so a single unreachable endpoint never aborts
//! a sentence.
//!
//! - [`endpoint`]: remote SPARQL endpoint (DBpedia by default)
//! - [`store`]: local oxigraph store

pub mod endpoint;
pub mod store;

use std::collections::HashMap;

use rayon::prelude::*;

use crate::error::LabelError;
use crate::token::Token;

/// Sentinel text for an entity whose label could not be resolved.
pub const LABEL_NOT_FOUND: &str = "N/A";

/// Outcome of a label lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Label {
    Found(String),
    NotFound,
}

impl Label {
    pub fn is_found(&self) -> bool {
        matches!(self, Label::Found(_))
    }

    /// The label text, or the `N/A` sentinel.
    pub fn as_str(&self) -> &str {
        match self {
            Label::Found(text) => text,
            Label::NotFound => LABEL_NOT_FOUND,
        }
    }
}

impl From<Option<String>> for Label {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(text) if text != LABEL_NOT_FOUND => Label::Found(text),
            _ => Label::NotFound,
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something that can look up a human-readable label for an IRI.
///
/// `Ok(None)` means the source answered but has no label.
pub trait LabelSource: Send + Sync {
    fn lookup(&self, iri: &str) -> Result<Option<String>, LabelError>;
}

/// Fixed IRI → label table.
#[derive(Debug, Clone, Default)]
pub struct StaticLabels {
    labels: HashMap<String, String>,
}

impl StaticLabels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, iri: impl Into<String>, label: impl Into<String>) -> Self {
        self.labels.insert(iri.into(), label.into());
        self
    }

    pub fn insert(&mut self, iri: impl Into<String>, label: impl Into<String>) {
        self.labels.insert(iri.into(), label.into());
    }
}

impl LabelSource for StaticLabels {
    fn lookup(&self, iri: &str) -> Result<Option<String>, LabelError> {
        Ok(self.labels.get(iri).cloned())
    }
}

/// Resolved labels, one per distinct concrete token. Never holds variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelCache {
    entries: HashMap<Token, Label>,
}

impl LabelCache {
    pub fn get(&self, token: &Token) -> Option<&Label> {
        self.entries.get(token)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries with a real label.
    pub fn found_count(&self) -> usize {
        self.entries.values().filter(|l| l.is_found()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Token, &Label)> + '_ {
        self.entries.iter()
    }

    fn insert(&mut self, token: Token, label: Label) {
        debug_assert!(!token.is_variable());
        self.entries.insert(token, label);
    }
}

/// Memoizing, failure-absorbing wrapper around a [`LabelSource`].
pub struct LabelResolver<'a> {
    source: &'a dyn LabelSource,
    cache: LabelCache,
}

impl<'a> LabelResolver<'a> {
    pub fn new(source: &'a dyn LabelSource) -> Self {
        Self {
            source,
            cache: LabelCache::default(),
        }
    }

    /// Resolve a token's label, consulting the source at most once per token.
    ///
    /// Variables and blank nodes have no label; literals are their own label.
    pub fn resolve(&mut self, token: &Token) -> Label {
        if token.is_variable() {
            return Label::NotFound;
        }
        if let Some(label) = self.cache.get(token) {
            return label.clone();
        }
        let label = lookup_token(self.source, token);
        self.cache.insert(token.clone(), label.clone());
        label
    }

    /// Resolve every distinct concrete token up front.
    ///
    /// With `parallel`, lookups run on the rayon pool; the cache is filled
    /// once per token after all of them return.
    pub fn prefetch<'t>(&mut self, tokens: impl IntoIterator<Item = &'t Token>, parallel: bool) {
        let mut pending: Vec<&Token> = tokens
            .into_iter()
            .filter(|t| !t.is_variable() && self.cache.get(t).is_none())
            .collect();
        pending.sort();
        pending.dedup();
        if pending.is_empty() {
            return;
        }

        let source = self.source;
        let resolved: Vec<(Token, Label)> = if parallel {
            pending
                .par_iter()
                .map(|t| ((*t).clone(), lookup_token(source, t)))
                .collect()
        } else {
            pending
                .iter()
                .map(|t| ((*t).clone(), lookup_token(source, t)))
                .collect()
        };
        for (token, label) in resolved {
            self.cache.insert(token, label);
        }
    }

    pub fn cache(&self) -> &LabelCache {
        &self.cache
    }

    pub fn into_cache(self) -> LabelCache {
        self.cache
    }
}

fn lookup_token(source: &dyn LabelSource, token: &Token) -> Label {
    match token {
        Token::Literal { lexical, .. } => Label::Found(lexical.clone()),
        Token::Resource(iri) => match source.lookup(iri) {
            Ok(found) => {
                let label = Label::from(found);
                tracing::debug!(%iri, %label, "resolved label");
                label
            }
            Err(e) => {
                tracing::warn!(%iri, error = %e, "label lookup failed, marking entity unresolved");
                Label::NotFound
            }
        },
        Token::Variable(_) | Token::Blank(_) => Label::NotFound,
    }
}
