//! # Edit Module
//!
//! Pure line-level edits behind the engine's verbs. Nothing here touches the
//! filesystem; every function takes the current lines and returns new ones.

use crate::locate::{AUTHOR_TAG_REGEX, COPYRIGHT_KEYWORD_REGEX, HeaderSpan, LocatedBlock, Locator, preamble_end};
use crate::registry::Dialect;
use crate::render::{render, render_body, render_content};

/// The lines of an existing header that a check compares.
///
/// Marker lines of a bordered block are compared without their surrounding
/// whitespace, since the locator accepts them indented.
pub fn actual_header<'a>(lines: &'a [String], block: &LocatedBlock) -> Vec<&'a str> {
  let slice = |from: usize, to: usize| lines[from..=to].iter().map(String::as_str);

  match block.header {
    HeaderSpan::Bordered { top, bottom } => {
      let mut actual = Vec::with_capacity(bottom - top + 3);
      if block.start < top {
        actual.push(lines[block.start].trim());
      }
      actual.extend(slice(top, bottom));
      if block.end > bottom {
        actual.push(lines[block.end].trim());
      }
      actual
    }
    HeaderSpan::Paragraph { first, last } => slice(first, last).collect(),
    HeaderSpan::Whole => slice(block.start, block.end).collect(),
  }
}

/// The rendered lines an existing header is expected to equal.
pub fn expected_header(dialect: &Dialect, template: &[String], block: &LocatedBlock) -> Vec<String> {
  match block.header {
    HeaderSpan::Paragraph { .. } => render_body(dialect, template),
    HeaderSpan::Bordered { .. } | HeaderSpan::Whole => render(dialect, template),
  }
}

/// Compares headers line by line, ignoring trailing whitespace.
pub fn headers_match<A: AsRef<str>, B: AsRef<str>>(actual: &[A], expected: &[B]) -> bool {
  actual.len() == expected.len()
    && actual
      .iter()
      .zip(expected)
      .all(|(a, e)| a.as_ref().trim_end() == e.as_ref().trim_end())
}

/// Splices a freshly rendered header into a file with no header.
///
/// The header goes after the preamble. A blank line separates it from any
/// non-blank neighbour, and no blank line is added where one already exists.
pub fn insert(dialect: &Dialect, lines: &[String], rendered: &[String]) -> Vec<String> {
  let pos = preamble_end(dialect, lines);
  let mut new_lines = Vec::with_capacity(lines.len() + rendered.len() + 2);

  new_lines.extend_from_slice(&lines[..pos]);
  if pos > 0 && !lines[pos - 1].trim().is_empty() {
    new_lines.push(String::new());
  }
  new_lines.extend_from_slice(rendered);
  if lines.get(pos).is_some_and(|l| !l.trim().is_empty()) {
    new_lines.push(String::new());
  }
  new_lines.extend_from_slice(&lines[pos..]);

  new_lines
}

/// Replaces the header proper of a located block with the current template.
///
/// Borders, delimiters and foreign lines around the header are kept. A block
/// whose opening or closing line carries the notice next to author tags is
/// rebuilt with the fresh header on its own lines and the tags kept.
pub fn replace(
  dialect: &Dialect,
  locator: &Locator<'_>,
  lines: &[String],
  block: &LocatedBlock,
  template: &[String],
) -> Vec<String> {
  let mut new_lines = Vec::with_capacity(lines.len() + template.len() + 4);

  match (block.header, shared_whole(lines, block)) {
    (HeaderSpan::Whole, Some(SharedWhole::Leading { tags_from })) => {
      new_lines.extend_from_slice(&lines[..block.start]);
      new_lines.push(dialect.start_marker.to_string());
      new_lines.extend(render_body(dialect, template));
      new_lines.push(blank_comment_line(dialect));
      new_lines.extend_from_slice(&lines[tags_from..]);
    }
    (HeaderSpan::Whole, Some(SharedWhole::Trailing { tags_to })) => {
      new_lines.extend_from_slice(&lines[..=tags_to]);
      new_lines.push(blank_comment_line(dialect));
      new_lines.extend(render_body(dialect, template));
      new_lines.push(closer_line(dialect));
      new_lines.extend_from_slice(&lines[block.end + 1..]);
    }
    (HeaderSpan::Whole, None) => {
      new_lines.extend_from_slice(&lines[..block.start]);
      new_lines.extend(render(dialect, template));
      new_lines.extend_from_slice(&lines[block.end + 1..]);
    }
    (HeaderSpan::Bordered { top, bottom }, _) => {
      new_lines.extend_from_slice(&lines[..=top]);
      new_lines.extend(render_content(dialect, template));
      new_lines.extend_from_slice(&lines[bottom..]);
    }
    (HeaderSpan::Paragraph { first, last }, _) => {
      new_lines.extend_from_slice(&lines[..first]);
      new_lines.extend(render_body(dialect, template));
      let (_, interior_end) = locator.interior(block);
      if last < interior_end && !locator.is_blank_comment(&lines[last + 1]) {
        new_lines.push(blank_comment_line(dialect));
      }
      new_lines.extend_from_slice(&lines[last + 1..]);
    }
  }

  new_lines
}

/// Removes a located header.
///
/// When the block also carries author tags, only the header proper and one
/// adjacent blank comment line on each side are removed. Otherwise the whole
/// block goes. Returns `None` when the header cannot be separated from the
/// foreign lines sharing its block.
pub fn remove(dialect: &Dialect, locator: &Locator<'_>, lines: &[String], block: &LocatedBlock) -> Option<Vec<String>> {
  if block.header == HeaderSpan::Whole
    && let Some(shared) = shared_whole(lines, block)
  {
    let mut new_lines = Vec::with_capacity(lines.len());
    match shared {
      SharedWhole::Leading { tags_from } => {
        new_lines.extend_from_slice(&lines[..block.start]);
        new_lines.push(opener_line(dialect, &lines[block.start]));
        new_lines.extend_from_slice(&lines[tags_from..]);
      }
      SharedWhole::Trailing { tags_to } => {
        new_lines.extend_from_slice(&lines[..=tags_to]);
        new_lines.push(closer_line(dialect));
        new_lines.extend_from_slice(&lines[block.end + 1..]);
      }
    }
    return Some(new_lines);
  }

  let has_foreign = lines[block.start..=block.end]
    .iter()
    .any(|l| AUTHOR_TAG_REGEX.is_match(l));

  let (from, to) = match (block.header, has_foreign) {
    (HeaderSpan::Whole, true) => return None,
    (HeaderSpan::Bordered { top, bottom }, true) => widen_over_blanks(locator, lines, block, top, bottom),
    (HeaderSpan::Paragraph { first, last }, true) => widen_over_blanks(locator, lines, block, first, last),
    (_, false) => (block.start, block.end),
  };
  let to = absorb_separator(locator, lines, to);

  let mut new_lines: Vec<String> = lines[..from].iter().chain(&lines[to + 1..]).cloned().collect();
  collapse_blank_at(&mut new_lines, from);
  Some(new_lines)
}

/// Where the notice sits in a whole-block header that also holds author tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SharedWhole {
  /// The notice starts on the opening line; the tags begin at `tags_from`.
  Leading { tags_from: usize },
  /// The notice ends on the closing line; the tags end at `tags_to`.
  Trailing { tags_to: usize },
}

fn shared_whole(lines: &[String], block: &LocatedBlock) -> Option<SharedWhole> {
  if block.header != HeaderSpan::Whole {
    return None;
  }
  let mut tags = (block.start..=block.end).filter(|&i| AUTHOR_TAG_REGEX.is_match(&lines[i]));
  let first_tag = tags.next()?;
  let last_tag = tags.last().unwrap_or(first_tag);

  if first_tag > block.start && COPYRIGHT_KEYWORD_REGEX.is_match(&lines[block.start]) {
    Some(SharedWhole::Leading { tags_from: first_tag })
  } else if last_tag < block.end {
    Some(SharedWhole::Trailing { tags_to: last_tag })
  } else {
    None
  }
}

/// In line comment dialects the comment lines below a header lie outside its
/// block. A blank comment line between the two belongs to the header.
fn absorb_separator(locator: &Locator<'_>, lines: &[String], to: usize) -> usize {
  let separator = lines.get(to + 1).is_some_and(|l| locator.is_blank_comment(l));
  let followed = lines.get(to + 2).is_some_and(|l| locator.is_line_comment(l));
  if separator && followed { to + 1 } else { to }
}

/// Extends `[from, to]` over one blank comment line after and before it,
/// staying inside the block.
fn widen_over_blanks(
  locator: &Locator<'_>,
  lines: &[String],
  block: &LocatedBlock,
  mut from: usize,
  mut to: usize,
) -> (usize, usize) {
  let (interior_start, interior_end) = locator.interior(block);
  if to < interior_end && locator.is_blank_comment(&lines[to + 1]) {
    to += 1;
  }
  if from > interior_start && locator.is_blank_comment(&lines[from - 1]) {
    from -= 1;
  }
  (from, to)
}

/// Drops a blank line left doubled (or leading/trailing) at a cut point.
fn collapse_blank_at(lines: &mut Vec<String>, cut: usize) {
  let is_blank = |line: &String| line.trim().is_empty();

  if cut < lines.len() {
    if is_blank(&lines[cut]) && (cut == 0 || is_blank(&lines[cut - 1])) {
      lines.remove(cut);
    }
  } else if lines.last().is_some_and(is_blank) {
    lines.pop();
  }
}

/// The opening delimiter of `line`, without the text that followed it.
fn opener_line(dialect: &Dialect, line: &str) -> String {
  let rest = line.trim_start().strip_prefix(dialect.block_open).unwrap_or_default();
  let stars = rest.chars().take_while(|&c| c == dialect.box_char).count();
  format!("{}{}", dialect.block_open, dialect.box_char.to_string().repeat(stars))
}

fn closer_line(dialect: &Dialect) -> String {
  format!(" {}", dialect.block_close)
}

/// A comment line with no text, in the dialect's own style.
fn blank_comment_line(dialect: &Dialect) -> String {
  if dialect.has_delimiters() {
    format!(" {}", dialect.comment_marker.trim())
  } else {
    dialect.comment_marker.trim_end().to_string()
  }
}
