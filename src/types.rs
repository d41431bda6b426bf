/// Core domain types for viewlink references, links, and completions.
use std::ops::Range;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::Error;

/// Which family of patterns applies to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// A template file (`.edge` by default): directives and component tags.
    Template,
    /// A script file: `view.render()` calls and route bindings.
    Code,
}

impl SourceKind {
    /// Infer the source kind from a file extension.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnsupportedLanguage` for extensions that are neither
    /// the configured template extension nor a script extension.
    pub fn from_path(path: &Path, template_extension: &str) -> Result<Self, Error> {
        let ext = path.extension().and_then(|e| return e.to_str()).unwrap_or("");

        if ext.eq_ignore_ascii_case(template_extension) {
            return Ok(Self::Template);
        }
        return match ext {
            "ts" | "tsx" | "mts" | "cts" | "js" | "jsx" | "mjs" | "cjs" => Ok(Self::Code),
            _ => Err(Error::UnsupportedLanguage {
                ext: ext.to_string(),
            }),
        };
    }
}

/// What syntax a reference was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReferenceKind {
    /// `@include('partials.header')`
    Include,
    /// `@layout('layouts.main')`
    Layout,
    /// `@component('components.card')` or `@!component(...)`
    Component,
    /// `@card()` or `<Card>` resolved through the component index.
    ComponentTag,
    /// `view.render('users.show')`
    Render,
    /// `Route.get('/', 'UsersController.index')`
    RouteHandler,
}

/// A symbolic identifier extracted from text. Lives for one scan.
#[derive(Debug, Clone)]
pub struct Reference {
    /// Syntax the identifier was found in.
    pub kind: ReferenceKind,
    /// Byte range of `raw_text` in the scanned text.
    pub match_span: Range<usize>,
    /// The identifier exactly as written, without quotes.
    pub raw_text: String,
}

/// Zero-based line and column span of a link. Columns count chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LinkPosition {
    /// End column, exclusive.
    pub col_end: usize,
    /// Start column, inclusive.
    pub col_start: usize,
    /// Zero-based line index.
    pub line: usize,
}

impl LinkPosition {
    /// Whether a zero-based (line, column) falls on this span, ends included.
    pub const fn contains(&self, line: usize, column: usize) -> bool {
        return self.line == line && self.col_start <= column && column <= self.col_end;
    }
}

impl Ord for LinkPosition {
    /// Order by (line, `col_start`, `col_end`), i.e. reading order.
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        return (self.line, self.col_start, self.col_end).cmp(&(
            other.line,
            other.col_start,
            other.col_end,
        ));
    }
}

impl PartialOrd for LinkPosition {
    /// Delegate to `Ord` implementation.
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        return Some(self.cmp(other));
    }
}

/// A reference that was mapped onto an existing file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ResolvedLink {
    /// Where the clickable text sits in the scanned file.
    pub position: LinkPosition,
    /// Absolute path of the file the reference points at.
    pub target_path: PathBuf,
}

/// A component template and the name it is addressed by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentEntry {
    /// Dotted identifier, e.g. `form.inputGroup`.
    pub name: String,
    /// Absolute path of the template file.
    pub path: PathBuf,
}

/// What a completion candidate names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateKind {
    /// A template addressable by dotted path.
    Template,
    /// A controller module addressable from a route binding.
    Controller,
    /// A method exported by a controller.
    Method,
}

/// One completion suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    /// What the suggestion names.
    pub kind: CandidateKind,
    /// Text to insert.
    pub label: String,
    /// File backing the suggestion, when there is one.
    pub path: Option<PathBuf>,
}

/// Hover content for a link under the cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HoverInfo {
    /// Span of the hovered link.
    pub position: LinkPosition,
    /// Markdown: the first lines of the target in a fenced block.
    pub preview: String,
    /// File the link points at.
    pub target_path: PathBuf,
}
