//! SPARQL tokens: the terms that become query-graph nodes.
//!
//! A [`Token`] is what a node stands for in the original query text: a
//! variable, an IRI, a literal, or a blank node. The variable check used by
//! slot substitution is a pattern match on the variant instead of a string
//! prefix test.

use serde::{Deserialize, Serialize};

/// Sigil used when rendering a variable token.
pub const VARIABLE_SIGIL: char = '?';

/// Alternate sigil accepted when parsing (`$x` is the same variable as `?x`).
pub const ALT_VARIABLE_SIGIL: char = '$';

/// A term of a SPARQL triple pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Token {
    /// A SPARQL variable, stored without its sigil.
    Variable(String),
    /// A concrete resource, stored as the bare IRI.
    Resource(String),
    /// A literal: its lexical form and the `@lang` or `^^<datatype>`
    /// annotation, if any. Differently annotated literals are distinct tokens.
    Literal {
        lexical: String,
        annotation: Option<String>,
    },
    /// A blank node label, stored without the `_:` prefix.
    Blank(String),
}

impl Token {
    /// Variable token from a name with or without sigil.
    pub fn variable(name: impl AsRef<str>) -> Self {
        let name = name.as_ref();
        let bare = name
            .strip_prefix(VARIABLE_SIGIL)
            .or_else(|| name.strip_prefix(ALT_VARIABLE_SIGIL))
            .unwrap_or(name);
        Token::Variable(bare.to_string())
    }

    /// Resource token from an IRI with or without angle brackets.
    pub fn resource(iri: impl AsRef<str>) -> Self {
        let iri = iri.as_ref();
        let bare = iri
            .strip_prefix('<')
            .and_then(|s| s.strip_suffix('>'))
            .unwrap_or(iri);
        Token::Resource(bare.to_string())
    }

    /// Simple literal without language tag or datatype.
    pub fn literal(lexical: impl Into<String>) -> Self {
        Token::Literal {
            lexical: lexical.into(),
            annotation: None,
        }
    }

    /// Literal with an `@lang` or `^^<datatype>` annotation.
    pub fn annotated_literal(lexical: impl Into<String>, annotation: impl Into<String>) -> Self {
        Token::Literal {
            lexical: lexical.into(),
            annotation: Some(annotation.into()),
        }
    }

    /// Parse the textual form of a token.
    ///
    /// `?x`/`$x` are variables, `_:b0` blank nodes, `"..."` literals and
    /// anything else a resource IRI.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if text.starts_with(VARIABLE_SIGIL) || text.starts_with(ALT_VARIABLE_SIGIL) {
            Token::variable(text)
        } else if let Some(id) = text.strip_prefix("_:") {
            Token::Blank(id.to_string())
        } else if let Some(rest) = text.strip_prefix('"') {
            match rest.rsplit_once('"') {
                Some((lexical, "")) => Token::literal(lexical),
                Some((lexical, annotation)) => Token::annotated_literal(lexical, annotation),
                None => Token::literal(rest),
            }
        } else {
            Token::resource(text)
        }
    }

    /// Whether the token acts as a variable in a pattern.
    ///
    /// Blank nodes in a query pattern are non-distinguished variables, so they
    /// count as variables too.
    pub fn is_variable(&self) -> bool {
        matches!(self, Token::Variable(_) | Token::Blank(_))
    }

    /// The IRI, if this is a resource.
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Token::Resource(iri) => Some(iri),
            _ => None,
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Variable(name) => write!(f, "{VARIABLE_SIGIL}{name}"),
            Token::Resource(iri) => write!(f, "{iri}"),
            Token::Literal {
                lexical,
                annotation,
            } => write!(f, "\"{lexical}\"{}", annotation.as_deref().unwrap_or("")),
            Token::Blank(id) => write!(f, "_:{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_sigils_name_the_same_variable() {
        assert_eq!(Token::parse("?x"), Token::parse("$x"));
        assert_eq!(Token::parse("$x"), Token::Variable("x".into()));
        assert_eq!(Token::variable("x1"), Token::variable("?x1"));
    }

    #[test]
    fn parse_distinguishes_kinds() {
        assert_eq!(
            Token::parse("<http://dbpedia.org/resource/Microsoft>"),
            Token::Resource("http://dbpedia.org/resource/Microsoft".into())
        );
        assert_eq!(
            Token::parse("http://dbpedia.org/resource/Microsoft"),
            Token::Resource("http://dbpedia.org/resource/Microsoft".into())
        );
        assert_eq!(Token::parse("_:b0"), Token::Blank("b0".into()));
        assert_eq!(
            Token::parse("\"1975\"^^xsd:gYear"),
            Token::annotated_literal("1975", "^^xsd:gYear")
        );
        assert_eq!(Token::parse("\"Berlin\"@de"), Token::annotated_literal("Berlin", "@de"));
        assert_eq!(Token::parse("\"plain\""), Token::literal("plain"));
    }

    #[test]
    fn variables_and_blanks_are_variables() {
        assert!(Token::variable("x").is_variable());
        assert!(Token::Blank("b".into()).is_variable());
        assert!(!Token::resource("http://example.org/a").is_variable());
        assert!(!Token::literal("a").is_variable());
    }

    #[test]
    fn display_restores_sigil() {
        assert_eq!(Token::variable("x").to_string(), "?x");
        assert_eq!(Token::Blank("b1".into()).to_string(), "_:b1");
        assert_eq!(
            Token::resource("<http://example.org/a>").to_string(),
            "http://example.org/a"
        );
        assert_eq!(Token::annotated_literal("1", "@en").to_string(), "\"1\"@en");
        assert_eq!(Token::literal("1").to_string(), "\"1\"");
    }
}
