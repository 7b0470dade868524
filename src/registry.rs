//! # Registry Module
//!
//! This module holds the closed set of comment dialects the engine knows how
//! to render and detect, along with the filetype names and file suffixes that
//! select each one.
//!
//! The module includes:
//! - [`DialectId`] naming each dialect
//! - [`Dialect`] describing delimiters, markers and the [`RenderMode`]
//! - [`Registry`] for lookups by filetype or suffix, optionally extended with
//!   aliases loaded from configuration

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a comment dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialectId {
  /// `#`-prefixed lines framed by `=` borders (Python, shell, Dockerfile)
  HashComment,
  /// `/** ... **/` block framed by `*` borders (Java, Groovy, Jenkinsfile)
  GroovyStyleComment,
  /// `/** ... */` block with ` * ` prefixed lines (C and C++)
  CStyleComment,
}

impl DialectId {
  /// Returns the stable string key of the dialect.
  pub const fn as_str(self) -> &'static str {
    match self {
      DialectId::HashComment => "hash_comment",
      DialectId::GroovyStyleComment => "groovy_style_comment",
      DialectId::CStyleComment => "c_style_comment",
    }
  }
}

impl fmt::Display for DialectId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// How a header is laid out for a dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
  /// Unframed text, each line prefixed by the comment marker.
  Simple,
  /// Fixed-width box: border line, padded content lines, border line.
  Bordered,
}

/// A comment dialect.
///
/// Dialects are static data; nothing mutates them after the registry is
/// built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialect {
  pub id: DialectId,
  /// Lowercase filetype names that select this dialect
  pub filetypes: &'static [&'static str],
  /// Lowercase suffixes, including the leading dot
  pub suffixes: &'static [&'static str],
  /// Line that opens a rendered header, empty when the dialect has none
  pub start_marker: &'static str,
  /// Line that closes a rendered header, empty when the dialect has none
  pub end_marker: &'static str,
  /// Per-line comment prefix
  pub comment_marker: &'static str,
  /// Character used to draw borders
  pub box_char: char,
  pub mode: RenderMode,
  /// Prefix of any block comment opener, used when looking for headers that
  /// were not rendered by this tool. Empty for line-comment dialects.
  pub block_open: &'static str,
  /// Suffix of any block comment terminator. Empty for line-comment dialects.
  pub block_close: &'static str,
  /// Whether sources conventionally begin with a `package` declaration
  pub package_declaration: bool,
}

impl Dialect {
  /// Returns `true` if this dialect renders unframed, prefixed text.
  pub fn is_simple(&self) -> bool {
    self.mode == RenderMode::Simple
  }

  /// Returns `true` if the dialect wraps headers in start/end marker lines.
  pub fn has_delimiters(&self) -> bool {
    !self.start_marker.is_empty()
  }
}

const HASH_COMMENT: Dialect = Dialect {
  id: DialectId::HashComment,
  filetypes: &["python", "shell", "bash", "sh", "dockerfile"],
  suffixes: &[".sh", ".py", ".dockerfile"],
  start_marker: "",
  end_marker: "",
  comment_marker: "#",
  box_char: '=',
  mode: RenderMode::Bordered,
  block_open: "",
  block_close: "",
  package_declaration: false,
};

const GROOVY_STYLE_COMMENT: Dialect = Dialect {
  id: DialectId::GroovyStyleComment,
  filetypes: &["jenkinsfile", "groovy", "gradle", "java"],
  suffixes: &[".groovy", ".java"],
  start_marker: "/**",
  end_marker: "**/",
  comment_marker: "* ",
  box_char: '*',
  mode: RenderMode::Bordered,
  block_open: "/*",
  block_close: "*/",
  package_declaration: true,
};

const C_STYLE_COMMENT: Dialect = Dialect {
  id: DialectId::CStyleComment,
  filetypes: &["c", "cpp", "c++", "cxx", "h", "hpp", "hxx"],
  suffixes: &[".c", ".cpp", ".cxx", ".h", ".hpp", ".hxx"],
  start_marker: "/**",
  end_marker: " */",
  comment_marker: " * ",
  box_char: '*',
  mode: RenderMode::Simple,
  block_open: "/*",
  block_close: "*/",
  package_declaration: false,
};

/// The builtin dialect table, in lookup order.
pub static BUILTIN_DIALECTS: [Dialect; 3] = [HASH_COMMENT, GROOVY_STYLE_COMMENT, C_STYLE_COMMENT];

/// Lookup table from filetype names and suffixes to dialects.
///
/// The set of dialects is closed. Configuration may only add extra names
/// that point at one of the builtin dialects.
#[derive(Debug, Clone)]
pub struct Registry {
  filetype_aliases: HashMap<String, DialectId>,
  suffix_aliases: HashMap<String, DialectId>,
}

impl Default for Registry {
  fn default() -> Self {
    Self::builtin()
  }
}

impl Registry {
  /// Creates a registry holding only the builtin dialects.
  pub fn builtin() -> Self {
    Self {
      filetype_aliases: HashMap::new(),
      suffix_aliases: HashMap::new(),
    }
  }

  /// Adds filetype and suffix aliases.
  ///
  /// Keys are matched case-insensitively. Suffix keys may be given with or
  /// without the leading dot.
  pub fn with_aliases(
    mut self,
    filetypes: impl IntoIterator<Item = (String, DialectId)>,
    suffixes: impl IntoIterator<Item = (String, DialectId)>,
  ) -> Self {
    for (name, id) in filetypes {
      self.filetype_aliases.insert(name.to_lowercase(), id);
    }
    for (suffix, id) in suffixes {
      self.suffix_aliases.insert(normalize_suffix(&suffix), id);
    }
    self
  }

  /// Returns the dialect for an identifier.
  pub fn dialect(&self, id: DialectId) -> &'static Dialect {
    match id {
      DialectId::HashComment => &BUILTIN_DIALECTS[0],
      DialectId::GroovyStyleComment => &BUILTIN_DIALECTS[1],
      DialectId::CStyleComment => &BUILTIN_DIALECTS[2],
    }
  }

  /// Looks up a dialect by filetype name (case-insensitive).
  pub fn by_filetype(&self, name: &str) -> Option<DialectId> {
    let name = name.to_lowercase();
    BUILTIN_DIALECTS
      .iter()
      .find(|d| d.filetypes.contains(&name.as_str()))
      .map(|d| d.id)
      .or_else(|| self.filetype_aliases.get(&name).copied())
  }

  /// Looks up a dialect by file suffix such as `.py` (case-insensitive).
  pub fn by_suffix(&self, suffix: &str) -> Option<DialectId> {
    let suffix = normalize_suffix(suffix);
    BUILTIN_DIALECTS
      .iter()
      .find(|d| d.suffixes.contains(&suffix.as_str()))
      .map(|d| d.id)
      .or_else(|| self.suffix_aliases.get(&suffix).copied())
  }

  /// Returns every known filetype name, sorted and deduplicated.
  pub fn supported_filetypes(&self) -> Vec<String> {
    let mut names: Vec<String> = BUILTIN_DIALECTS
      .iter()
      .flat_map(|d| d.filetypes.iter().map(|ft| ft.to_string()))
      .chain(self.filetype_aliases.keys().cloned())
      .collect();
    names.sort();
    names.dedup();
    names
  }
}

fn normalize_suffix(suffix: &str) -> String {
  let lower = suffix.to_lowercase();
  if lower.starts_with('.') { lower } else { format!(".{lower}") }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_lookup_by_filetype_is_case_insensitive() {
    let registry = Registry::builtin();

    assert_eq!(registry.by_filetype("Python"), Some(DialectId::HashComment));
    assert_eq!(registry.by_filetype("JAVA"), Some(DialectId::GroovyStyleComment));
    assert_eq!(registry.by_filetype("c++"), Some(DialectId::CStyleComment));
    assert_eq!(registry.by_filetype("rust"), None);
  }

  #[test]
  fn test_lookup_by_suffix() {
    let registry = Registry::builtin();

    assert_eq!(registry.by_suffix(".PY"), Some(DialectId::HashComment));
    assert_eq!(registry.by_suffix(".groovy"), Some(DialectId::GroovyStyleComment));
    assert_eq!(registry.by_suffix(".hpp"), Some(DialectId::CStyleComment));
    assert_eq!(registry.by_suffix(".xyz"), None);
  }

  #[test]
  fn test_aliases_extend_lookups() {
    let registry = Registry::builtin().with_aliases(
      [("Kotlin".to_string(), DialectId::GroovyStyleComment)],
      [("kt".to_string(), DialectId::GroovyStyleComment)],
    );

    assert_eq!(registry.by_filetype("kotlin"), Some(DialectId::GroovyStyleComment));
    assert_eq!(registry.by_suffix(".KT"), Some(DialectId::GroovyStyleComment));
    assert!(registry.supported_filetypes().contains(&"kotlin".to_string()));
  }

  #[test]
  fn test_supported_filetypes_sorted() {
    let names = Registry::builtin().supported_filetypes();
    let mut sorted = names.clone();
    sorted.sort();

    assert_eq!(names, sorted);
    assert!(names.contains(&"dockerfile".to_string()));
    assert!(names.contains(&"hxx".to_string()));
  }

  #[test]
  fn test_dialect_modes() {
    let registry = Registry::builtin();

    assert!(!registry.dialect(DialectId::HashComment).is_simple());
    assert!(!registry.dialect(DialectId::HashComment).has_delimiters());
    assert!(registry.dialect(DialectId::CStyleComment).is_simple());
    assert_eq!(registry.dialect(DialectId::GroovyStyleComment).end_marker, "**/");
  }

  #[test]
  fn test_dialect_id_serde_names() {
    let id: DialectId = serde_json::from_str("\"groovy_style_comment\"").expect("parse dialect id");
    assert_eq!(id, DialectId::GroovyStyleComment);
    assert_eq!(DialectId::CStyleComment.to_string(), "c_style_comment");
  }
}
