use std::path::{Component, Path, PathBuf};

use crate::error::Error;

/// Name of the optional per-project config file.
pub const CONFIG_FILE: &str = ".viewlink.toml";

/// Project layout loaded from `.viewlink.toml`.
/// Every directory is relative to the project root, except
/// `components_dir` which is relative to `views_dir`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Components directory, relative to the views directory.
    pub components_dir: PathBuf,
    /// Extensions tried, in order, when resolving a controller module.
    pub controller_extensions: Vec<String>,
    /// Directory route handlers are resolved against.
    pub controllers_dir: PathBuf,
    /// How many lines of the target a hover preview shows.
    pub hover_preview_lines: usize,
    /// Largest controller file introspection will parse, in bytes.
    pub max_file_size: u64,
    /// Template extension without the leading dot.
    pub template_extension: String,
    /// Root of all templates.
    pub views_dir: PathBuf,
}

/// Raw TOML structure for `.viewlink.toml`. Absent keys keep their defaults.
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct ViewlinkTomlConfig {
    components_dir: Option<PathBuf>,
    controller_extensions: Option<Vec<String>>,
    controllers_dir: Option<PathBuf>,
    hover_preview_lines: Option<usize>,
    max_file_size: Option<u64>,
    template_extension: Option<String>,
    views_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        return Self {
            components_dir: PathBuf::from("components"),
            controller_extensions: vec!["ts".to_string(), "js".to_string()],
            controllers_dir: PathBuf::from("app/controllers"),
            hover_preview_lines: 20,
            max_file_size: 1024 * 1024,
            template_extension: "edge".to_string(),
            views_dir: PathBuf::from("resources/views"),
        };
    }
}

impl Config {
    /// Load config from `.viewlink.toml` in the given root directory.
    /// Returns the defaults if the file doesn't exist. A file that exists
    /// but is malformed is an error, never a silent fallback.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// `Error::TomlDe` if the TOML is malformed,
    /// or `Error::ConfigInvalid` if a value fails validation.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(CONFIG_FILE);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(Error::Io(e)),
        };

        return Self::parse(&content);
    }

    /// Parse config from TOML text, filling gaps with defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::TomlDe` or `Error::ConfigInvalid`.
    pub fn parse(content: &str) -> Result<Self, Error> {
        let raw: ViewlinkTomlConfig = toml::from_str(content)?;
        let defaults = Self::default();

        let config = Self {
            components_dir: raw.components_dir.unwrap_or(defaults.components_dir),
            controller_extensions: raw
                .controller_extensions
                .unwrap_or(defaults.controller_extensions),
            controllers_dir: raw.controllers_dir.unwrap_or(defaults.controllers_dir),
            hover_preview_lines: raw.hover_preview_lines.unwrap_or(defaults.hover_preview_lines),
            max_file_size: raw.max_file_size.unwrap_or(defaults.max_file_size),
            template_extension: raw.template_extension.unwrap_or(defaults.template_extension),
            views_dir: raw.views_dir.unwrap_or(defaults.views_dir),
        };
        config.validate()?;

        return Ok(config);
    }

    /// Reject values that would let lookups escape the project root.
    fn validate(&self) -> Result<(), Error> {
        check_relative_dir("views_dir", &self.views_dir)?;
        check_relative_dir("components_dir", &self.components_dir)?;
        check_relative_dir("controllers_dir", &self.controllers_dir)?;
        check_extension("template_extension", &self.template_extension)?;

        if self.controller_extensions.is_empty() {
            return Err(Error::ConfigInvalid {
                key: "controller_extensions",
                reason: "at least one extension is required".to_string(),
            });
        }
        for ext in &self.controller_extensions {
            check_extension("controller_extensions", ext)?;
        }

        return Ok(());
    }
}

fn check_relative_dir(key: &'static str, dir: &Path) -> Result<(), Error> {
    let escapes = dir
        .components()
        .any(|c| return !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(Error::ConfigInvalid {
            key,
            reason: format!("`{}` must be a relative path without `..`", dir.display()),
        });
    }
    return Ok(());
}

fn check_extension(key: &'static str, ext: &str) -> Result<(), Error> {
    if ext.is_empty() || ext.starts_with('.') || ext.contains(['/', '\\']) {
        return Err(Error::ConfigInvalid {
            key,
            reason: format!("`{ext}` must be a bare extension such as `edge`"),
        });
    }
    return Ok(());
}
