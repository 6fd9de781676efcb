//! Ruby: definitions of methods, classes and modules.

use std::sync::{Arc, LazyLock};

use tagquery_lib::{Error, Query};

use crate::Lang;

/// Ruby tag rules. Captures `@name`, `@doc` and `@definition.{function,class,module}`.
pub const TAGS: &str = include_str!("../queries/ruby/tags.scm");

pub const LANG: Lang = Lang {
    name: "ruby",
    extensions: &["rb", "rake", "gemspec", "ru"],
    tags: TAGS,
    tags_query,
    #[cfg(feature = "lang-ruby")]
    ts_lang: language,
};

static TAGS_QUERY: LazyLock<Result<Arc<Query>, Error>> =
    LazyLock::new(|| Query::new(TAGS).map(Arc::new));

/// Compiled [`TAGS`], shared by every caller.
pub fn tags_query() -> Result<Arc<Query>, Error> {
    (*TAGS_QUERY).clone()
}

#[cfg(feature = "lang-ruby")]
pub fn language() -> tree_sitter::Language {
    tree_sitter_ruby::LANGUAGE.into()
}

/// Parses Ruby source with the bundled grammar.
#[cfg(feature = "lang-ruby")]
pub fn parse(source: &str) -> Result<tree_sitter::Tree, crate::ParseError> {
    crate::parse_with(language(), source)
}
