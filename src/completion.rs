//! Completion resolver: suggestions for a reference still being typed.

use std::path::PathBuf;

use crate::error::Error;
use crate::introspect;
use crate::patterns::{self, RENDER_FRAGMENT, RouteHandler, TEMPLATE_FRAGMENT};
use crate::project::Project;
use crate::types::{Candidate, CandidateKind, SourceKind};

/// What the cursor sits in, with the text typed so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionContext {
    /// A template name inside a directive or render call.
    Template {
        /// Typed text before the cursor.
        prefix: String,
    },
    /// The module part of a route handler.
    ControllerModule {
        /// Typed text before the cursor.
        prefix: String,
    },
    /// The method part of a route handler, after the `.`.
    ControllerMethod {
        /// The module written before the `.`.
        module: String,
        /// Typed text before the cursor.
        prefix: String,
    },
}

/// Suggestions for the reference fragment under `cursor_offset` (a byte offset).
///
/// Returns nothing when the cursor isn't inside an unterminated or open
/// reference string. Failures while listing or introspecting also give
/// nothing. Results are sorted by label.
pub fn resolve_completions(
    text: &str,
    cursor_offset: usize,
    source_kind: SourceKind,
    project: &Project,
) -> Vec<Candidate> {
    let Some(context) = completion_context(text, cursor_offset, source_kind) else {
        return Vec::new();
    };
    tracing::debug!(?context, "completing");

    let mut candidates = match context {
        CompletionContext::Template { prefix } => template_candidates(&prefix, project),
        CompletionContext::ControllerModule { prefix } => controller_candidates(&prefix, project),
        CompletionContext::ControllerMethod { module, prefix } => {
            method_candidates(&module, &prefix, project)
        },
    };

    candidates.sort_by(|a, b| return a.label.cmp(&b.label));
    candidates.dedup_by(|a, b| return a.label == b.label);
    return candidates;
}

/// Work out which fragment, if any, the cursor is typing in.
pub fn completion_context(text: &str, cursor: usize, source_kind: SourceKind) -> Option<CompletionContext> {
    if cursor > text.len() || !text.is_char_boundary(cursor) {
        return None;
    }

    return match source_kind {
        SourceKind::Template => template_context(&TEMPLATE_FRAGMENT, text, cursor),
        SourceKind::Code => template_context(&RENDER_FRAGMENT, text, cursor)
            .or_else(|| return route_context(text, cursor)),
    };
}

fn template_context(pattern: &regex::Regex, text: &str, cursor: usize) -> Option<CompletionContext> {
    let range = patterns::fragment_at(pattern, text, cursor)?;
    let prefix = text.get(range.start..cursor)?.to_string();
    return Some(CompletionContext::Template { prefix });
}

fn route_context(text: &str, cursor: usize) -> Option<CompletionContext> {
    let RouteHandler { method, module } = patterns::route_fragment_at(text, cursor)?;

    if let Some(method) = method {
        // The cursor can still be back in the module part of `Module.meth`.
        if cursor >= method.start {
            return Some(CompletionContext::ControllerMethod {
                module: text.get(module)?.to_string(),
                prefix: text.get(method.start..cursor)?.to_string(),
            });
        }
    }

    if cursor > module.end {
        return None;
    }
    let prefix = text.get(module.start..cursor)?.to_string();
    return Some(CompletionContext::ControllerModule { prefix });
}

/// Templates whose dotted name starts with the typed prefix (`/` typed as `.`).
fn template_candidates(prefix: &str, project: &Project) -> Vec<Candidate> {
    let prefix = prefix.replace('/', ".");
    return project
        .templates()
        .into_iter()
        .filter(|(name, _)| return name.starts_with(&prefix))
        .map(|(label, path)| {
            return Candidate {
                kind: CandidateKind::Template,
                label,
                path: Some(path),
            };
        })
        .collect();
}

/// Controller modules whose path starts with the typed prefix, ignoring case.
fn controller_candidates(prefix: &str, project: &Project) -> Vec<Candidate> {
    let prefix = prefix.to_lowercase();
    return project
        .controllers()
        .into_iter()
        .filter(|(module, _)| return module.to_lowercase().starts_with(&prefix))
        .map(|(label, path)| {
            return Candidate {
                kind: CandidateKind::Controller,
                label,
                path: Some(path),
            };
        })
        .collect();
}

/// Methods of the typed module starting with the typed prefix.
fn method_candidates(module: &str, prefix: &str, project: &Project) -> Vec<Candidate> {
    let methods = match load_methods(module, project) {
        Ok(Some((path, methods))) => methods.into_iter().map(move |m| return (m, path.clone())),
        Ok(None) => {
            tracing::debug!(module, "no controller for route handler");
            return Vec::new();
        },
        Err(e) => {
            tracing::debug!(module, error = %e, "controller introspection failed");
            return Vec::new();
        },
    };

    return methods
        .filter(|(name, _)| return name.starts_with(prefix))
        .map(|(label, path)| {
            return Candidate {
                kind: CandidateKind::Method,
                label,
                path: Some(path),
            };
        })
        .collect();
}

fn load_methods(module: &str, project: &Project) -> Result<Option<(PathBuf, Vec<String>)>, Error> {
    let Some(path) = project.find_controller(module)? else {
        return Ok(None);
    };
    let methods = introspect::controller_methods(&path, project.config().max_file_size)?;
    return Ok(Some((path, methods)));
}
