//! # Locate Module
//!
//! Finds an existing header inside a file's lines so it can be compared,
//! replaced or removed.
//!
//! Two strategies are used:
//!
//! - **Structural**: for bordered dialects, a pair of border lines (optionally
//!   framed by the dialect's start and end markers) identifies a header this
//!   tool rendered earlier.
//! - **Keyword**: for simple dialects, and as a fallback for bordered ones, the
//!   first comment block after the file preamble, wherever it starts, is
//!   searched for a copyright keyword and the paragraph around it is isolated.
//!
//! Both strategies stop at the first plausible match. A later, better match
//! is never preferred over an earlier one.

use std::sync::LazyLock;

use regex::Regex;

use crate::registry::Dialect;
use crate::render::border_parts;

/// Lines that mark a paragraph as copyright text.
pub static COPYRIGHT_KEYWORD_REGEX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?i)copyright|©|license|licensed").expect("copyright keyword regex must compile"));

/// Documentation tags that belong to the file, not to the copyright notice.
pub static AUTHOR_TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?i)@author|@date|@brief|@file|@description").expect("author tag regex must compile")
});

/// PEP 263 style encoding declaration.
static ENCODING_REGEX: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[ \t\f]*#.*?coding[:=][ \t]*[-_.a-zA-Z0-9]+").expect("encoding declaration regex must compile")
});

static PACKAGE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^\s*package\s+[A-Za-z_][\w.]*\s*;?\s*$").expect("package declaration regex must compile")
});

/// Which part of a located block is the header proper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderSpan {
  /// A rendered box: the lines from `top` to `bottom` are the two borders and
  /// the content between them.
  Bordered { top: usize, bottom: usize },
  /// A copyright paragraph inside a larger comment block.
  Paragraph { first: usize, last: usize },
  /// The whole block is the header.
  Whole,
}

/// An existing header found in a file.
///
/// `start` and `end` are inclusive line indices of the enclosing comment
/// block. Lines inside the block but outside `header` are foreign content
/// that edits must leave alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocatedBlock {
  pub start: usize,
  pub end: usize,
  pub header: HeaderSpan,
}

/// Header locator for one dialect.
pub struct Locator<'d> {
  dialect: &'d Dialect,
  start_regex: Option<Regex>,
  end_regex: Option<Regex>,
  border_regex: Regex,
}

impl<'d> Locator<'d> {
  /// Builds the locator, compiling the dialect's marker patterns.
  ///
  /// # Errors
  ///
  /// Returns an error if a pattern built from the dialect's markers does not
  /// compile.
  pub fn new(dialect: &'d Dialect) -> Result<Self, regex::Error> {
    Ok(Self {
      dialect,
      start_regex: delimiter_regex(dialect.start_marker)?,
      end_regex: delimiter_regex(dialect.end_marker)?,
      border_regex: border_regex(dialect)?,
    })
  }

  /// Locates the header in `lines`, or returns `None` when there is none.
  pub fn locate<S: AsRef<str>>(&self, lines: &[S]) -> Option<LocatedBlock> {
    if !self.dialect.is_simple() {
      let structural = if self.dialect.has_delimiters() {
        self.locate_delimited(lines)
      } else {
        self.locate_undelimited(lines)
      };
      if structural.is_some() {
        return structural;
      }
    }

    self.locate_by_keyword(lines)
  }

  /// Widens a paragraph span over the rest of a rendered header body.
  ///
  /// A paragraph ends at its first blank comment line, which cuts a notice
  /// with several paragraphs short. The span only grows when the lines after
  /// it already equal the rest of `body`, so other text sharing the block is
  /// never taken for part of the header.
  pub fn fit<S: AsRef<str>, B: AsRef<str>>(&self, lines: &[S], block: LocatedBlock, body: &[B]) -> LocatedBlock {
    let HeaderSpan::Paragraph { first, last } = block.header else {
      return block;
    };

    let (_, interior_end) = self.interior(&block);
    let Some(wanted_last) = (first + body.len()).checked_sub(1) else {
      return block;
    };
    if wanted_last <= last || wanted_last > interior_end {
      return block;
    }

    let continues = lines[last + 1..=wanted_last]
      .iter()
      .zip(&body[last + 1 - first..])
      .all(|(line, expected)| line.as_ref().trim_end() == expected.as_ref().trim_end());
    if !continues {
      return block;
    }

    LocatedBlock {
      header: HeaderSpan::Paragraph {
        first,
        last: wanted_last,
      },
      ..block
    }
  }

  /// Inclusive bounds of the lines inside a block, excluding its delimiter
  /// lines when the dialect uses block comments.
  pub fn interior(&self, block: &LocatedBlock) -> (usize, usize) {
    if self.dialect.block_open.is_empty() {
      (block.start, block.end)
    } else {
      (block.start + 1, block.end.saturating_sub(1))
    }
  }

  /// Returns `true` if `line` is a border line of this dialect.
  pub fn is_border(&self, line: &str) -> bool {
    self.border_regex.is_match(line)
  }

  /// Returns `true` if `line` is a comment line in a line comment dialect.
  pub fn is_line_comment(&self, line: &str) -> bool {
    let marker = self.dialect.comment_marker.trim();
    self.dialect.block_open.is_empty() && !marker.is_empty() && line.trim_start().starts_with(marker)
  }

  /// Returns `true` if `line` is a comment line with no text.
  pub fn is_blank_comment(&self, line: &str) -> bool {
    let marker = self.dialect.comment_marker.trim();
    let trimmed = line.trim();
    if marker.is_empty() { trimmed.is_empty() } else { trimmed == marker }
  }

  fn locate_delimited<S: AsRef<str>>(&self, lines: &[S]) -> Option<LocatedBlock> {
    let start_regex = self.start_regex.as_ref()?;
    let end_regex = self.end_regex.as_ref()?;

    let start = (0..lines.len().saturating_sub(1))
      .find(|&i| start_regex.is_match(lines[i].as_ref()) && self.is_border(lines[i + 1].as_ref()))?;
    let top = start + 1;

    let end = (top + 1..lines.len()).find(|&i| end_regex.is_match(lines[i].as_ref()))?;
    let bottom = (top + 1..end).rev().find(|&i| self.is_border(lines[i].as_ref()))?;

    Some(LocatedBlock {
      start,
      end,
      header: HeaderSpan::Bordered { top, bottom },
    })
  }

  fn locate_undelimited<S: AsRef<str>>(&self, lines: &[S]) -> Option<LocatedBlock> {
    let (block_start, block_end) = self.first_comment_block(lines)?;

    let top = (block_start..=block_end).find(|&i| self.is_border(lines[i].as_ref()))?;
    let bottom = (top + 1..=block_end).find(|&i| self.is_border(lines[i].as_ref()))?;

    Some(LocatedBlock {
      start: top,
      end: bottom,
      header: HeaderSpan::Bordered { top, bottom },
    })
  }

  fn locate_by_keyword<S: AsRef<str>>(&self, lines: &[S]) -> Option<LocatedBlock> {
    let (start, end) = self.first_comment_block(lines)?;
    let delimited = !self.dialect.block_open.is_empty();

    let keyword_line = (start..=end).find(|&i| COPYRIGHT_KEYWORD_REGEX.is_match(lines[i].as_ref()))?;
    if delimited && (keyword_line == start || keyword_line == end) {
      return Some(LocatedBlock {
        start,
        end,
        header: HeaderSpan::Whole,
      });
    }

    let (interior_start, interior_end) = self.interior(&LocatedBlock {
      start,
      end,
      header: HeaderSpan::Whole,
    });
    let marker = self.dialect.comment_marker.trim();

    let mut first = keyword_line;
    let mut last = keyword_line;
    for (i, line) in lines.iter().enumerate().take(interior_end + 1).skip(keyword_line + 1) {
      let line = line.as_ref();
      if AUTHOR_TAG_REGEX.is_match(line) {
        break;
      }
      if line.trim().trim_start_matches(marker).trim().is_empty() {
        break;
      }
      last = i;
    }

    if !self.dialect.is_simple() {
      if first > interior_start && self.is_border(lines[first - 1].as_ref()) {
        first -= 1;
      }
      if last < interior_end && self.is_border(lines[last + 1].as_ref()) {
        last += 1;
      }
    }

    Some(LocatedBlock {
      start,
      end,
      header: HeaderSpan::Paragraph { first, last },
    })
  }

  /// Finds the first comment block after the preamble, as inclusive indices.
  ///
  /// Code may come before the block. For block comment dialects the block
  /// runs from an opener line to the first line that closes it; for line
  /// comment dialects it is the run of consecutive comment lines.
  fn first_comment_block<S: AsRef<str>>(&self, lines: &[S]) -> Option<(usize, usize)> {
    let from = preamble_end(self.dialect, lines);

    if self.dialect.block_open.is_empty() {
      let start = (from..lines.len()).find(|&i| self.is_line_comment(lines[i].as_ref()))?;
      let len = lines[start..]
        .iter()
        .take_while(|l| self.is_line_comment(l.as_ref()))
        .count();
      return Some((start, start + len - 1));
    }

    let start = (from..lines.len()).find(|&i| lines[i].as_ref().trim_start().starts_with(self.dialect.block_open))?;
    let first = lines[start].as_ref().trim();
    if first[self.dialect.block_open.len()..].ends_with(self.dialect.block_close) {
      // Opened and closed on the same line
      return Some((start, start));
    }
    let end = (start + 1..lines.len()).find(|&i| lines[i].as_ref().trim_end().ends_with(self.dialect.block_close))?;
    Some((start, end))
  }
}

/// Index of the first line after the shebang, the encoding declaration and,
/// for dialects with a package convention, a `package` line directly after
/// them.
pub fn preamble_end<S: AsRef<str>>(dialect: &Dialect, lines: &[S]) -> usize {
  let mut pos = 0;
  if lines.first().is_some_and(|l| l.as_ref().starts_with("#!")) {
    pos = 1;
  }
  if lines.get(pos).is_some_and(|l| ENCODING_REGEX.is_match(l.as_ref())) {
    pos += 1;
  }
  if dialect.package_declaration && lines.get(pos).is_some_and(|l| PACKAGE_REGEX.is_match(l.as_ref())) {
    pos += 1;
  }
  pos
}

/// Pattern for a line holding only the given marker.
fn delimiter_regex(marker: &str) -> Result<Option<Regex>, regex::Error> {
  let marker = marker.trim();
  if marker.is_empty() {
    return Ok(None);
  }
  Regex::new(&format!(r"^\s*{}\s*$", regex::escape(marker))).map(Some)
}

/// Builds the border pattern: optional left border marker, a run of at least
/// three box characters, optional right border marker, nothing else.
fn border_regex(dialect: &Dialect) -> Result<Regex, regex::Error> {
  let (left, right) = border_parts(dialect);
  let box_char = regex::escape(&dialect.box_char.to_string());

  let mut pattern = String::from(r"^\s*");
  if !left.trim().is_empty() {
    pattern.push_str(&regex::escape(left.trim()));
    pattern.push_str(r"\s*");
  }
  pattern.push_str(&format!("(?:{box_char}){{3,}}"));
  if !right.trim().is_empty() {
    pattern.push_str(&format!(r"\s*(?:{})?", regex::escape(right.trim())));
  }
  pattern.push_str(r"\s*$");

  Regex::new(&pattern)
}
