//! Component index: the templates under the components directory, each
//! addressed by the dotted name Edge gives components used as tags.

use crate::project::{Project, files_with_extension};
use crate::types::ComponentEntry;

/// Builds the name → path listing of a project's components.
pub struct ComponentIndex;

impl ComponentIndex {
    /// Scan the project's components directory.
    ///
    /// Entries come back in directory-scan order, which is also the order
    /// lookups see: when two files normalize to the same name the first one
    /// scanned wins. A missing directory gives an empty index.
    pub fn build(project: &Project) -> Vec<ComponentEntry> {
        let dir = project.components_dir();
        let ext = project.config().template_extension.as_str();

        let entries: Vec<ComponentEntry> = files_with_extension(&dir, &[ext])
            .into_iter()
            .filter_map(|(relative, path)| {
                let name = component_name(&relative)?;
                return Some(ComponentEntry { name, path });
            })
            .collect();

        tracing::debug!(dir = %dir.display(), count = entries.len(), "indexed components");
        return entries;
    }

    /// First entry named exactly `name`.
    pub fn lookup<'a>(entries: &'a [ComponentEntry], name: &str) -> Option<&'a ComponentEntry> {
        return entries.iter().find(|entry| return entry.name == name);
    }
}

/// Derive a component's tag name from its slash-separated path relative to
/// the components directory.
///
/// `form/input_group` → `form.inputGroup`, `card/index` → `card`,
/// `_partials/alert` → `partials.alert`.
pub fn component_name(relative: &str) -> Option<String> {
    let mut segments: Vec<String> = relative
        .split('/')
        .map(|segment| return camel_case(segment.trim_start_matches('_')))
        .collect();

    if segments.len() > 1 && segments.last().is_some_and(|s| return s == "index") {
        segments.pop();
    }
    if segments.iter().any(String::is_empty) {
        return None;
    }

    return Some(segments.join("."));
}

/// `input_group` and `input-group` → `inputGroup`. Other text is kept as written.
fn camel_case(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut upper_next = false;

    for c in segment.chars() {
        if c == '_' || c == '-' {
            upper_next = !out.is_empty();
            continue;
        }
        if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    return out;
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, reason = "tests")]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::linker;
    use crate::types::SourceKind;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "").unwrap();
    }

    #[test]
    fn names_follow_tag_convention() {
        assert_eq!(component_name("card").unwrap(), "card");
        assert_eq!(component_name("form/input_group").unwrap(), "form.inputGroup");
        assert_eq!(component_name("form/text-area").unwrap(), "form.textArea");
        assert_eq!(component_name("modal/index").unwrap(), "modal");
        assert_eq!(component_name("_partials/alert").unwrap(), "partials.alert");
        assert_eq!(component_name("MyCard").unwrap(), "MyCard");
    }

    #[test]
    fn degenerate_names_are_skipped() {
        assert!(component_name("_").is_none());
        assert!(component_name("a/__/b").is_none());
    }

    #[test]
    fn lone_index_keeps_its_name() {
        assert_eq!(component_name("index").unwrap(), "index");
    }

    #[test]
    fn builds_from_components_dir_only() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "resources/views/components/card.edge");
        touch(dir.path(), "resources/views/components/form/input_group.edge");
        touch(dir.path(), "resources/views/components/form/readme.md");
        touch(dir.path(), "resources/views/home.edge");
        let project = Project::open(dir.path()).unwrap();

        let mut names: Vec<String> = ComponentIndex::build(&project)
            .into_iter()
            .map(|e| e.name)
            .collect();
        names.sort();
        assert_eq!(names, ["card", "form.inputGroup"]);
    }

    #[test]
    fn missing_dir_gives_empty_index() {
        let dir = tempfile::tempdir().unwrap();
        let project = Project::open(dir.path()).unwrap();
        assert!(ComponentIndex::build(&project).is_empty());
    }

    #[test]
    fn colliding_names_resolve_to_first_scanned() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "resources/views/components/card.edge");
        touch(dir.path(), "resources/views/components/card/index.edge");
        let project = Project::open(dir.path()).unwrap();

        let entries = project.components();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.name == "card"));

        let links = linker::resolve_links("@card()", SourceKind::Template, &project);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].target_path, entries[0].path);
        assert_eq!(ComponentIndex::lookup(entries, "card").unwrap().path, entries[0].path);
    }

    #[test]
    fn lookup_is_exact() {
        let entries = vec![ComponentEntry {
            name: "MyCard".to_string(),
            path: "/x/MyCard.edge".into(),
        }];
        assert!(ComponentIndex::lookup(&entries, "MyCard").is_some());
        assert!(ComponentIndex::lookup(&entries, "Card").is_none());
        assert!(ComponentIndex::lookup(&entries, "MyCards").is_none());
        assert!(ComponentIndex::lookup(&entries, "mycard").is_none());
    }
}
