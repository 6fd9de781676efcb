//! Bundled tag rules, and tree-sitter parsers to run them against.
//!
//! ```
//! use tagquery_langs::ruby;
//!
//! let query = ruby::tags_query().expect("bundled rules compile");
//! assert_eq!(query.rule_count(), 4);
//! ```

use std::sync::Arc;

use tagquery_lib::{Error, Query};

pub mod ruby;

#[cfg(test)]
mod lib_tests;

/// A language with bundled tag rules.
#[derive(Debug, Clone, Copy)]
pub struct Lang {
    name: &'static str,
    extensions: &'static [&'static str],
    tags: &'static str,
    tags_query: fn() -> Result<Arc<Query>, Error>,
    #[cfg(feature = "lang-ruby")]
    ts_lang: fn() -> tree_sitter::Language,
}

impl Lang {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn extensions(&self) -> &'static [&'static str] {
        self.extensions
    }

    /// Rule text of the bundled `tags.scm`.
    pub fn tags(&self) -> &'static str {
        self.tags
    }

    /// The bundled rules, compiled on first use and shared afterwards.
    pub fn tags_query(&self) -> Result<Arc<Query>, Error> {
        (self.tags_query)()
    }

    #[cfg(feature = "lang-ruby")]
    pub fn parse(&self, source: &str) -> Result<tree_sitter::Tree, ParseError> {
        parse_with((self.ts_lang)(), source)
    }
}

/// Failure to produce a tree-sitter tree.
#[cfg(feature = "lang-ruby")]
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Language(#[from] tree_sitter::LanguageError),

    #[error("parser produced no tree")]
    NoTree,
}

#[cfg(feature = "lang-ruby")]
pub(crate) fn parse_with(
    language: tree_sitter::Language,
    source: &str,
) -> Result<tree_sitter::Tree, ParseError> {
    let mut parser = tree_sitter::Parser::new();
    parser.set_language(&language)?;
    parser.parse(source, None).ok_or(ParseError::NoTree)
}

pub fn from_name(s: &str) -> Option<Lang> {
    match s.to_ascii_lowercase().as_str() {
        "ruby" | "rb" => Some(ruby::LANG),
        _ => None,
    }
}

pub fn from_ext(ext: &str) -> Option<Lang> {
    let ext = ext.to_ascii_lowercase();
    all()
        .into_iter()
        .find(|lang| lang.extensions.contains(&ext.as_str()))
}

pub fn all() -> Vec<Lang> {
    vec![ruby::LANG]
}
