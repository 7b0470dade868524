//! # Render Module
//!
//! Turns preprocessed template lines into the exact header lines for a
//! dialect. Rendering is a pure function of (template, dialect): the check
//! operation relies on two renders being byte-identical.
//!
//! Bordered dialects produce a fixed-width box in which every border and
//! content line is exactly [`LINE_WIDTH`] characters. The locator depends on
//! that padding to recognize content lines by their markers alone.

use crate::registry::Dialect;

/// Total width of a rendered header line.
pub const LINE_WIDTH: usize = 80;

/// Renders the full header, including start and end markers.
///
/// Returns an empty list when the template has no lines.
pub fn render(dialect: &Dialect, lines: &[String]) -> Vec<String> {
  if lines.is_empty() {
    return Vec::new();
  }

  let mut block = Vec::new();
  if !dialect.start_marker.is_empty() {
    block.push(dialect.start_marker.to_string());
  }
  block.extend(render_body(dialect, lines));
  if !dialect.end_marker.is_empty() {
    block.push(dialect.end_marker.to_string());
  }
  block
}

/// Renders the header without its start and end markers.
///
/// For bordered dialects this is the two borders and the content between
/// them; for simple dialects it is the content lines alone.
pub fn render_body(dialect: &Dialect, lines: &[String]) -> Vec<String> {
  if dialect.is_simple() {
    return render_content(dialect, lines);
  }

  let border = border_line(dialect);
  let mut body = Vec::with_capacity(lines.len() + 2);
  body.push(border.clone());
  body.extend(render_content(dialect, lines));
  body.push(border);
  body
}

/// Renders only the content lines of the header.
pub fn render_content(dialect: &Dialect, lines: &[String]) -> Vec<String> {
  if dialect.is_simple() {
    let bare = dialect.comment_marker.trim_end();
    let prefix = format!("{bare} ");
    let wrap_width = LINE_WIDTH.saturating_sub(prefix.chars().count());

    let mut content = Vec::new();
    for line in lines {
      if line.is_empty() {
        content.push(bare.to_string());
        continue;
      }
      content.extend(wrap(line, wrap_width).into_iter().map(|part| format!("{prefix}{part}")));
    }
    return content;
  }

  let marker = dialect.comment_marker.trim();
  let left = format!(" {marker} ");
  let right = format!(" {marker}");
  let text_width = LINE_WIDTH.saturating_sub(left.chars().count() + right.chars().count());

  let mut content = Vec::new();
  for line in lines {
    let parts = if line.is_empty() {
      vec![String::new()]
    } else {
      wrap(line, text_width)
    };
    for part in parts {
      content.push(format!("{left}{part:<text_width$}{right}"));
    }
  }
  content
}

/// Builds the horizontal border line of a bordered dialect.
pub fn border_line(dialect: &Dialect) -> String {
  let (left, right) = border_parts(dialect);
  let box_char = dialect.box_char.to_string();
  let fill = LINE_WIDTH.saturating_sub(left.chars().count() + right.chars().count() + 2);

  format!("{left}{box_char}{}{box_char}{right}", box_char.repeat(fill))
}

/// Left and right parts framing the box run of a border line.
pub(crate) fn border_parts(dialect: &Dialect) -> (&'static str, &'static str) {
  if dialect.has_delimiters() {
    (" ", dialect.comment_marker.trim())
  } else {
    (dialect.comment_marker, "")
  }
}

/// Greedy word wrap that keeps whitespace and never splits a word.
///
/// The text is cut into alternating runs of non-whitespace and whitespace.
/// Runs are packed onto a line while they fit in `width`; a run that does not
/// fit starts the next line. A single word wider than `width` is emitted on
/// its own line unchanged. A `width` of zero disables wrapping.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
  if width == 0 || text.chars().count() <= width {
    return vec![text.to_string()];
  }

  let mut lines = Vec::new();
  let mut current = String::new();
  let mut current_len = 0;

  for chunk in split_runs(text) {
    let chunk_len = chunk.chars().count();
    if current_len + chunk_len <= width {
      current.push_str(chunk);
      current_len += chunk_len;
      continue;
    }

    if current_len > 0 {
      lines.push(std::mem::take(&mut current));
    }
    current.push_str(chunk);
    current_len = chunk_len;
  }

  if current_len > 0 {
    lines.push(current);
  }
  lines
}

/// Splits text into maximal runs of whitespace and non-whitespace.
fn split_runs(text: &str) -> Vec<&str> {
  let mut runs = Vec::new();
  let mut start = 0;
  let mut in_space: Option<bool> = None;

  for (idx, ch) in text.char_indices() {
    let is_space = ch.is_whitespace();
    match in_space {
      Some(prev) if prev != is_space => {
        runs.push(&text[start..idx]);
        start = idx;
      }
      _ => {}
    }
    in_space = Some(is_space);
  }

  if start < text.len() {
    runs.push(&text[start..]);
  }
  runs
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::registry::{DialectId, RenderMode, Registry};

  const NOTICE: &str = "Copyright (c) 2024 Example Corp. All rights reserved.";

  fn template(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|l| l.to_string()).collect()
  }

  #[test]
  fn test_wrap_short_line_untouched() {
    assert_eq!(wrap("hello world", 20), vec!["hello world"]);
  }

  #[test]
  fn test_wrap_keeps_whitespace() {
    assert_eq!(wrap("aaa bbb ccc", 7), vec!["aaa bbb", " ccc"]);
    assert_eq!(wrap("aaa bbb ccc", 8), vec!["aaa bbb ", "ccc"]);
  }

  #[test]
  fn test_wrap_never_splits_words() {
    assert_eq!(wrap("tiny enormousword end", 6), vec!["tiny ", "enormousword", " end"]);
  }

  #[test]
  fn test_wrap_zero_width() {
    assert_eq!(wrap("no wrapping at all", 0), vec!["no wrapping at all"]);
  }

  #[test]
  fn test_render_hash_dialect() {
    let registry = Registry::builtin();
    let dialect = registry.dialect(DialectId::HashComment);
    let lines = render(dialect, &template(&[NOTICE]));

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], format!("#{}", "=".repeat(79)));
    assert_eq!(lines[2], lines[0]);
    assert!(lines[1].starts_with(" # Copyright (c) 2024"));
    assert!(lines[1].ends_with(" #"));
    assert!(lines.iter().all(|l| l.chars().count() == LINE_WIDTH));
  }

  #[test]
  fn test_render_groovy_dialect() {
    let registry = Registry::builtin();
    let dialect = registry.dialect(DialectId::GroovyStyleComment);
    let lines = render(dialect, &template(&[NOTICE, "", "Second paragraph."]));

    assert_eq!(lines.first().map(String::as_str), Some("/**"));
    assert_eq!(lines.last().map(String::as_str), Some("**/"));
    assert_eq!(lines[1], format!(" {}", "*".repeat(79)));
    assert_eq!(lines[3], format!(" *{} *", " ".repeat(76)));
    for line in &lines[1..lines.len() - 1] {
      assert_eq!(line.chars().count(), LINE_WIDTH, "line {line:?}");
    }
  }

  #[test]
  fn test_render_c_style_is_simple() {
    let registry = Registry::builtin();
    let dialect = registry.dialect(DialectId::CStyleComment);
    let lines = render(dialect, &template(&[NOTICE, "", "Second paragraph."]));

    assert_eq!(
      lines,
      vec![
        "/**".to_string(),
        format!(" * {NOTICE}"),
        " *".to_string(),
        " * Second paragraph.".to_string(),
        " */".to_string(),
      ]
    );
  }

  #[test]
  fn test_render_is_pure() {
    let registry = Registry::builtin();
    let text = template(&[NOTICE, "", "Licensed under the Example License."]);
    for id in [DialectId::HashComment, DialectId::GroovyStyleComment, DialectId::CStyleComment] {
      let dialect = registry.dialect(id);
      assert_eq!(render(dialect, &text), render(dialect, &text));
    }
  }

  #[test]
  fn test_long_line_wraps_at_fixed_width() {
    let registry = Registry::builtin();
    let dialect = registry.dialect(DialectId::GroovyStyleComment);
    let long = "Licensed under the Example License, Version 2.0; you may not use this file except in compliance with the License.";
    let content = render_content(dialect, &template(&[long]));

    assert!(content.len() >= 2);
    assert!(content.iter().all(|l| l.chars().count() == LINE_WIDTH));
  }

  #[test]
  fn test_simple_mode_wraps_with_prefix() {
    let registry = Registry::builtin();
    let dialect = registry.dialect(DialectId::CStyleComment);
    let long = "word ".repeat(30);
    let content = render_content(dialect, &template(&[long.trim_end()]));

    assert!(content.len() >= 2);
    assert!(content.iter().all(|l| l.starts_with(" * ")));
    assert!(content.iter().all(|l| l.chars().count() <= LINE_WIDTH));
  }

  #[test]
  fn test_degenerate_marker_width_clamps() {
    const WIDE_MARKER: &str =
      "##########################################################################################";
    let dialect = Dialect {
      id: DialectId::HashComment,
      filetypes: &[],
      suffixes: &[],
      start_marker: "",
      end_marker: "",
      comment_marker: WIDE_MARKER,
      box_char: '=',
      mode: RenderMode::Bordered,
      block_open: "",
      block_close: "",
      package_declaration: false,
    };

    let lines = render(&dialect, &template(&["some words here"]));
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], format!("{WIDE_MARKER}=="));
  }

  #[test]
  fn test_empty_template_renders_nothing() {
    let registry = Registry::builtin();
    assert!(render(registry.dialect(DialectId::CStyleComment), &[]).is_empty());
  }
}
