//! Reference resolver: turns the references found in a file into links
//! to the files they name.
//!
//! Every public function here degrades instead of failing. A reference that
//! names nothing, a capture that can't be a path, or a directory that can't
//! be read each drop that one reference and the scan carries on.

use std::path::PathBuf;

use rayon::prelude::*;

use crate::components::ComponentIndex;
use crate::error::Error;
use crate::patterns;
use crate::position;
use crate::project::Project;
use crate::types::{Reference, ResolvedLink, SourceKind};

/// Links for template directives (templates) or render calls (code), plus
/// components used as tags (templates only).
///
/// Directive candidates are resolved in parallel and side by side with the
/// component tags, so the result order is unspecified; every resolving
/// reference appears exactly once.
pub fn resolve_links(text: &str, source_kind: SourceKind, project: &Project) -> Vec<ResolvedLink> {
    let (mut links, tag_links) = rayon::join(
        || return template_links(text, source_kind, project),
        || {
            return match source_kind {
                SourceKind::Template => component_tag_links(text, project),
                SourceKind::Code => Vec::new(),
            };
        },
    );

    links.extend(tag_links);
    return links;
}

/// Links from route handler bindings to controller files.
///
/// The clickable span covers `Module` or `Module.method` as written.
pub fn resolve_route_links(text: &str, project: &Project) -> Vec<ResolvedLink> {
    return patterns::route_handlers(text)
        .into_par_iter()
        .filter_map(|handler| {
            let module = text.get(handler.module.clone())?;
            let reference = handler.reference(text)?;
            let target_path = collapse(module, project.find_controller(module))?;
            let position = position::first_line_position(text, &reference.raw_text)?;

            tracing::trace!(kind = ?reference.kind, raw = %reference.raw_text, path = %target_path.display(), "resolved");
            return Some(ResolvedLink { position, target_path });
        })
        .collect();
}

/// Every link a document offers: [`resolve_links`], plus route handlers for code.
pub fn document_links(text: &str, source_kind: SourceKind, project: &Project) -> Vec<ResolvedLink> {
    let mut links = resolve_links(text, source_kind, project);
    if source_kind == SourceKind::Code {
        links.extend(resolve_route_links(text, project));
    }
    return links;
}

/// `partials.nav` and `partials/nav` both name `partials/nav`.
pub fn logical_template_path(raw: &str) -> String {
    return raw.replace(['"', '\''], "").replace('.', "/");
}

fn template_links(text: &str, source_kind: SourceKind, project: &Project) -> Vec<ResolvedLink> {
    let references = match source_kind {
        SourceKind::Template => patterns::template_directives(text),
        SourceKind::Code => patterns::render_calls(text),
    };

    return references
        .into_par_iter()
        .filter_map(|reference| return resolve_template_reference(text, &reference, project))
        .collect();
}

fn resolve_template_reference(
    text: &str,
    reference: &Reference,
    project: &Project,
) -> Option<ResolvedLink> {
    let logical = logical_template_path(&reference.raw_text);
    let target_path = collapse(&reference.raw_text, project.find_template(&logical))?;
    let position = position::first_line_position(text, &reference.raw_text)?;

    tracing::trace!(kind = ?reference.kind, raw = %reference.raw_text, path = %target_path.display(), "resolved");
    return Some(ResolvedLink { position, target_path });
}

fn component_tag_links(text: &str, project: &Project) -> Vec<ResolvedLink> {
    let tags = patterns::component_tags(text);
    if tags.is_empty() {
        return Vec::new();
    }

    let components = project.components();
    return tags
        .iter()
        .filter_map(|tag| {
            let entry = ComponentIndex::lookup(components, &tag.raw_text)?;
            let position = position::first_line_position(text, &tag.raw_text)?;
            return Some(ResolvedLink {
                position,
                target_path: entry.path.clone(),
            });
        })
        .collect();
}

/// Collapse one candidate's lookup to present/absent, logging why it's absent.
fn collapse(candidate: &str, found: Result<Option<PathBuf>, Error>) -> Option<PathBuf> {
    return match found {
        Ok(Some(path)) => Some(path),
        Ok(None) => {
            tracing::trace!(candidate, "no file for reference");
            None
        },
        Err(e) => {
            tracing::debug!(candidate, error = %e, "reference lookup failed");
            None
        },
    };
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, reason = "tests")]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::types::LinkPosition;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "").unwrap();
    }

    fn project_with(files: &[&str]) -> (tempfile::TempDir, Project) {
        let dir = tempfile::tempdir().unwrap();
        for file in files {
            touch(dir.path(), file);
        }
        let project = Project::open(dir.path()).unwrap();
        (dir, project)
    }

    #[test]
    fn normalizes_dots_and_quotes() {
        assert_eq!(logical_template_path("partials.nav"), "partials/nav");
        assert_eq!(logical_template_path("'users/show'"), "users/show");
    }

    #[test]
    fn directive_links_to_template() {
        let (_dir, project) = project_with(&["resources/views/partials/nav.edge"]);
        let links = resolve_links("line0\n@include('partials.nav')\n", SourceKind::Template, &project);

        assert_eq!(links.len(), 1);
        assert!(links[0].target_path.ends_with("partials/nav.edge"));
        assert_eq!(links[0].position, LinkPosition { line: 1, col_start: 10, col_end: 22 });
    }

    #[test]
    fn missing_template_is_dropped() {
        let (_dir, project) = project_with(&["resources/views/home.edge"]);
        let links = resolve_links("@include('nowhere')\n@layout('home')", SourceKind::Template, &project);
        assert_eq!(links.len(), 1);
        assert!(links[0].target_path.ends_with("home.edge"));
    }

    #[test]
    fn escaping_reference_is_dropped() {
        let (_dir, project) = project_with(&["resources/secret.edge"]);
        let links = resolve_links("@include('../secret')", SourceKind::Template, &project);
        assert!(links.is_empty());
    }

    #[test]
    fn render_call_only_in_code() {
        let (_dir, project) = project_with(&["resources/views/users/show.edge"]);
        let text = "return view.render('users.show')";

        assert_eq!(resolve_links(text, SourceKind::Code, &project).len(), 1);
        assert!(resolve_links(text, SourceKind::Template, &project).is_empty());
    }

    #[test]
    fn component_tags_match_exact_names() {
        let (_dir, project) = project_with(&[
            "resources/views/components/MyCard.edge",
            "resources/views/components/form/input_group.edge",
        ]);
        let text = "<MyCard>\n<MyCards>\n<Card>\n@form.inputGroup()";
        let mut links = resolve_links(text, SourceKind::Template, &project);
        links.sort();

        assert_eq!(links.len(), 2);
        assert!(links[0].target_path.ends_with("MyCard.edge"));
        assert_eq!(links[0].position.line, 0);
        assert!(links[1].target_path.ends_with("input_group.edge"));
        assert_eq!(links[1].position, LinkPosition { line: 3, col_start: 1, col_end: 16 });
    }

    #[test]
    fn html_elements_do_not_link_to_components() {
        let (_dir, project) = project_with(&["resources/views/components/header.edge"]);
        let links = resolve_links("<header>plain html</header>", SourceKind::Template, &project);
        assert!(links.is_empty());

        let links = resolve_links("@!header()", SourceKind::Template, &project);
        assert_eq!(links.len(), 1);
    }

    #[test]
    fn route_links_point_at_controllers() {
        let (_dir, project) = project_with(&["app/controllers/UsersController.ts"]);
        let text = "Route.get('/users', 'UsersController.index')\nRoute.get('/x', 'MissingController')";
        let links = resolve_route_links(text, &project);

        assert_eq!(links.len(), 1);
        assert!(links[0].target_path.ends_with("UsersController.ts"));
        assert_eq!(links[0].position, LinkPosition { line: 0, col_start: 21, col_end: 42 });
    }

    #[test]
    fn document_links_add_routes_for_code() {
        let (_dir, project) = project_with(&[
            "app/controllers/home_controller.ts",
            "resources/views/home.edge",
        ]);
        let text = "Route.get('/', 'home_controller')\nview.render('home')";
        assert_eq!(document_links(text, SourceKind::Code, &project).len(), 2);
        assert_eq!(resolve_links(text, SourceKind::Code, &project).len(), 1);
    }

    #[test]
    fn repeated_resolution_is_stable() {
        let (_dir, project) = project_with(&[
            "resources/views/a.edge",
            "resources/views/b.edge",
            "resources/views/components/card.edge",
        ]);
        let text = "@include('a')\n@include('b')\n@card()";
        let mut first = resolve_links(text, SourceKind::Template, &project);
        let mut second = resolve_links(text, SourceKind::Template, &project);
        first.sort();
        second.sort();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }
}
