use std::path::Path;

use crate::config::CONFIG_FILE;
use crate::error::Error;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Render an error as markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as a structured markdown diagnostic: what happened and how to fix it.
pub fn render_error(e: &Error) -> String {
    match e {
        Error::ConfigInvalid { key, reason } => render_config_invalid(key, reason),
        Error::FileTooLarge { file, size_bytes, max_bytes } => render_file_too_large(file, *size_bytes, *max_bytes),
        Error::ProjectRootNotFound { path } => render_project_root_not_found(path),
        Error::UnsupportedLanguage { ext } => render_unsupported_language(ext),
        _ => render_generic(e),
    }
}

fn render_generic(e: &Error) -> String {
    match e {
        Error::FileNotFound { path } => format!("\
# Error: File Not Found

`{}` does not exist.
", path.display()),

        Error::InvalidCandidate { candidate, reason } => format!("\
# Error: Invalid Reference

`{candidate}` cannot name a file inside the project ({reason}).
"),

        Error::ParseFailed { file, reason } => format!("\
# Error: Parse Failed

Could not parse `{}`: {reason}
", file.display()),

        Error::Io(e) => format!("\
# Error: I/O

{e}
"),
        Error::TomlDe(e) => format!("\
# Error: Invalid TOML

{e}

## Fix

Correct or remove `{CONFIG_FILE}`.
"),
        // Already handled in render_error, but need exhaustive match.
        _ => format!("\
# Error

{e}
"),
    }
}

fn render_config_invalid(key: &str, reason: &str) -> String {
    format!(
        "\
# Error: Invalid Config

`{key}` in `{CONFIG_FILE}`: {reason}

## Fix

Directories are relative to the project root (`components_dir` to
`views_dir`), and extensions are written without the dot:

    views_dir = \"resources/views\"
    template_extension = \"edge\"
"
    )
}

fn render_file_too_large(file: &Path, size_bytes: u64, max_bytes: u64) -> String {
    format!("\
# Error: File Too Large

`{}` is {size_bytes} bytes (max {max_bytes}).

## Fix

Raise `max_file_size` in `{CONFIG_FILE}`.
", file.display())
}

fn render_project_root_not_found(path: &Path) -> String {
    format!(
        "\
# Error: Project Root Not Found

`{}` is not a directory.

## Fix

Pass the project directory with `--root`.
",
        path.display()
    )
}

fn render_unsupported_language(ext: &str) -> String {
    format!(
        "\
# Error: Unsupported File

No reference patterns apply to `.{ext}` files.

## Supported extensions

- the template extension (`.edge` unless `template_extension` says otherwise)
- `.ts`, `.tsx`, `.js`, `.jsx`, `.mjs`, `.cjs` and friends
"
    )
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn every_render_starts_with_a_heading() {
        let errors = [
            Error::ConfigInvalid { key: "views_dir", reason: "bad".to_string() },
            Error::FileNotFound { path: PathBuf::from("a.edge") },
            Error::ProjectRootNotFound { path: PathBuf::from("/nope") },
            Error::UnsupportedLanguage { ext: "md".to_string() },
            Error::InvalidCandidate { candidate: "../x".to_string(), reason: "relative segment" },
        ];
        for e in &errors {
            assert!(render_error(e).starts_with("# Error"), "{e}");
        }
    }

    #[test]
    fn unsupported_language_names_extension() {
        let md = render_error(&Error::UnsupportedLanguage { ext: "md".to_string() });
        assert!(md.contains("`.md`"));
    }
}
