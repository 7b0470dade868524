//! # Detect Module
//!
//! Picks the comment dialect for a file. Signals are tried in a fixed order
//! and the first one that resolves wins:
//!
//! 1. A forced filetype given by the caller
//! 2. An editor modeline (`vim: ft=python`) near the end of the file
//! 3. The file suffix
//! 4. Content heuristics (Jenkinsfile path component, shebang)
//! 5. The forced filetype retried as a suffix alias (`py` -> `.py`)

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{trace, warn};

use crate::engine::FileIO;
use crate::registry::{DialectId, Registry};

/// Number of trailing non-blank lines searched for a modeline.
const MODELINE_SEARCH_LINES: usize = 5;

static MODELINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?i)(?:^|\s)(?:vim?|ex):.*?(?:filetype|ft)[=\s]+([a-zA-Z0-9_-]+)(?:\s|:|$)")
    .expect("modeline regex must compile")
});

/// Resolves the dialect for `path`, or `None` when no signal matches.
///
/// The file is read on a best-effort basis: a read failure only disables the
/// modeline and content checks.
pub fn detect(registry: &Registry, path: &Path, forced: Option<&str>) -> Option<DialectId> {
  if let Some(id) = forced.and_then(|ft| registry.by_filetype(ft)) {
    trace!("{}: forced filetype selects {}", path.display(), id);
    return Some(id);
  }

  let content = match FileIO::read_lossy(path) {
    Ok(content) => Some(content),
    Err(e) => {
      warn!("Could not read {} for format detection: {:#}", path.display(), e);
      None
    }
  };

  if let Some(id) = content
    .as_deref()
    .and_then(parse_modeline)
    .and_then(|ft| registry.by_filetype(&ft))
  {
    trace!("{}: modeline selects {}", path.display(), id);
    return Some(id);
  }

  if let Some(id) = path
    .extension()
    .and_then(|ext| ext.to_str())
    .and_then(|ext| registry.by_suffix(ext))
  {
    trace!("{}: suffix selects {}", path.display(), id);
    return Some(id);
  }

  if let Some(id) = content.as_deref().and_then(|c| sniff_content(path, c)) {
    trace!("{}: content heuristics select {}", path.display(), id);
    return Some(id);
  }

  if let Some(ft) = forced {
    if let Some(id) = registry.by_suffix(ft) {
      trace!("{}: forced filetype '{}' resolved as suffix", path.display(), ft);
      return Some(id);
    }
    warn!("Forced filetype '{}' is not in the known configurations", ft);
  }

  None
}

/// Extracts the filetype declared by an editor modeline.
///
/// Only the last few non-blank lines are considered, and only those that look
/// like comment lines. The returned value is lowercase.
pub fn parse_modeline(content: &str) -> Option<String> {
  let lines: Vec<&str> = content.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
  let tail = &lines[lines.len().saturating_sub(MODELINE_SEARCH_LINES)..];

  tail
    .iter()
    .rev()
    .filter(|line| ["#", "//", "/*", "*"].iter().any(|p| line.starts_with(p)))
    .find_map(|line| MODELINE_REGEX.captures(line))
    .map(|caps| caps[1].to_lowercase())
}

/// Guesses a dialect from the path and the first line of content.
pub fn sniff_content(path: &Path, content: &str) -> Option<DialectId> {
  let is_jenkinsfile = path
    .components()
    .any(|c| c.as_os_str().to_string_lossy().eq_ignore_ascii_case("jenkinsfile"));
  if is_jenkinsfile {
    return Some(DialectId::GroovyStyleComment);
  }

  let first_line = content.lines().next().unwrap_or("").trim().to_lowercase();
  if !first_line.starts_with("#!") {
    return None;
  }

  if first_line.contains("python") || first_line.contains("bash") || first_line.contains("sh") {
    Some(DialectId::HashComment)
  } else if first_line.contains("groovy") {
    Some(DialectId::GroovyStyleComment)
  } else {
    None
  }
}

#[cfg(test)]
mod tests {
  use std::fs;

  use tempfile::tempdir;

  use super::*;

  #[test]
  fn test_parse_modeline_vim() {
    let content = "print('hi')\n\n# vim:tabstop=4:softtabstop=4:shiftwidth=4:expandtab:filetype=python:\n";
    assert_eq!(parse_modeline(content), Some("python".to_string()));
  }

  #[test]
  fn test_parse_modeline_ft_with_space() {
    let content = "int main() {}\n// vim: set ft cpp :\n";
    assert_eq!(parse_modeline(content), Some("cpp".to_string()));
  }

  #[test]
  fn test_parse_modeline_requires_comment_line() {
    let content = "vim: ft=python\n";
    assert_eq!(parse_modeline(content), None);
  }

  #[test]
  fn test_parse_modeline_only_checks_tail() {
    let mut content = String::from("# vim: ft=java\n");
    for i in 0..6 {
      content.push_str(&format!("line {i}\n"));
    }
    assert_eq!(parse_modeline(&content), None);
  }

  #[test]
  fn test_sniff_shebang() {
    let path = Path::new("script");
    assert_eq!(sniff_content(path, "#!/usr/bin/env python3\n"), Some(DialectId::HashComment));
    assert_eq!(sniff_content(path, "#!/bin/bash\n"), Some(DialectId::HashComment));
    assert_eq!(sniff_content(path, "#!/usr/bin/env groovy\n"), Some(DialectId::GroovyStyleComment));
    assert_eq!(sniff_content(path, "#!/usr/bin/perl\n"), None);
    assert_eq!(sniff_content(path, "print('no shebang')\n"), None);
  }

  #[test]
  fn test_sniff_jenkinsfile_component() {
    assert_eq!(
      sniff_content(Path::new("ci/Jenkinsfile"), "pipeline {}\n"),
      Some(DialectId::GroovyStyleComment)
    );
  }

  #[test]
  fn test_detect_priority_chain() {
    let registry = Registry::builtin();
    let dir = tempdir().expect("create temp dir");

    // Suffix alone
    let java = dir.path().join("Main.java");
    fs::write(&java, "class Main {}\n").expect("write file");
    assert_eq!(detect(&registry, &java, None), Some(DialectId::GroovyStyleComment));

    // Forced filetype beats the suffix
    assert_eq!(detect(&registry, &java, Some("c")), Some(DialectId::CStyleComment));

    // Modeline beats the suffix
    let py = dir.path().join("tool.py");
    fs::write(&py, "x = 1\n# vim: ft=groovy\n").expect("write file");
    assert_eq!(detect(&registry, &py, None), Some(DialectId::GroovyStyleComment));

    // Shebang when there is no suffix
    let script = dir.path().join("run");
    fs::write(&script, "#!/bin/sh\necho hi\n").expect("write file");
    assert_eq!(detect(&registry, &script, None), Some(DialectId::HashComment));

    // Forced type retried as suffix alias
    let plain = dir.path().join("notes");
    fs::write(&plain, "hello\n").expect("write file");
    assert_eq!(detect(&registry, &plain, Some("py")), Some(DialectId::HashComment));
    assert_eq!(detect(&registry, &plain, Some("hs")), None);
  }

  #[test]
  fn test_detect_unreadable_file_uses_suffix() {
    let registry = Registry::builtin();
    let missing = Path::new("/nonexistent/dir/file.cpp");
    assert_eq!(detect(&registry, missing, None), Some(DialectId::CStyleComment));
    assert_eq!(detect(&registry, Path::new("/nonexistent/file.xyz"), None), None);
  }
}
