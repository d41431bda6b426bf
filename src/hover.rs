//! Hover previews for links under the cursor.

use std::io::BufRead as _;
use std::path::Path;

use crate::linker;
use crate::position;
use crate::project::Project;
use crate::types::{HoverInfo, SourceKind};

/// Preview of the file linked from the cursor position, if any.
///
/// The preview is the first `hover_preview_lines` lines of the target in a
/// fenced block tagged with the target's extension. An unreadable target
/// gives no hover.
pub fn hover(
    text: &str,
    cursor_offset: usize,
    source_kind: SourceKind,
    project: &Project,
) -> Option<HoverInfo> {
    let (line, column) = position::line_column_of(text, cursor_offset);

    let mut links = linker::document_links(text, source_kind, project);
    links.sort();
    let link = links.into_iter().find(|link| return link.position.contains(line, column))?;

    let preview = match render_preview(&link.target_path, project.config().hover_preview_lines) {
        Ok(preview) => preview,
        Err(e) => {
            tracing::debug!(path = %link.target_path.display(), error = %e, "hover preview unavailable");
            return None;
        },
    };

    return Some(HoverInfo {
        position: link.position,
        preview,
        target_path: link.target_path,
    });
}

/// Markdown preview of the first `max_lines` lines of `path`.
///
/// # Errors
///
/// Returns the I/O error if the file can't be opened or read.
pub fn render_preview(path: &Path, max_lines: usize) -> Result<String, std::io::Error> {
    let file = std::fs::File::open(path)?;
    let mut lines = Vec::new();
    for line in std::io::BufReader::new(file).lines().take(max_lines.saturating_add(1)) {
        lines.push(line?);
    }
    let truncated = lines.len() > max_lines;
    lines.truncate(max_lines);

    let lang = path.extension().and_then(|e| return e.to_str()).unwrap_or("");
    let mut out = format!("```{lang}\n");
    for line in &lines {
        out.push_str(line);
        out.push('\n');
    }
    if truncated {
        out.push_str("...\n");
    }
    out.push_str("```\n");
    return Ok(out);
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests")]
mod tests {
    use super::*;

    fn project_with_nav() -> (tempfile::TempDir, Project) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resources/views/partials/nav.edge");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "<nav>\n  {{ title }}\n</nav>\n").unwrap();
        let project = Project::open(dir.path()).unwrap();
        (dir, project)
    }

    #[test]
    fn hover_on_directive_shows_preview() {
        let (_dir, project) = project_with_nav();
        let text = "<main>\n  @include('partials.nav')\n</main>";
        let cursor = text.find("nav')").unwrap();

        let info = hover(text, cursor, SourceKind::Template, &project).unwrap();
        assert!(info.target_path.ends_with("partials/nav.edge"));
        assert_eq!(info.preview, "```edge\n<nav>\n  {{ title }}\n</nav>\n```\n");
        assert_eq!(info.position.line, 1);
    }

    #[test]
    fn hover_off_link_is_none() {
        let (_dir, project) = project_with_nav();
        let text = "<main>\n  @include('partials.nav')\n</main>";
        assert!(hover(text, 2, SourceKind::Template, &project).is_none());
    }

    #[test]
    fn preview_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("long.edge");
        std::fs::write(&path, "a\nb\nc\n").unwrap();
        assert_eq!(render_preview(&path, 2).unwrap(), "```edge\na\nb\n...\n```\n");
        assert_eq!(render_preview(&path, 3).unwrap(), "```edge\na\nb\nc\n```\n");
    }
}
