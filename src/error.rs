/// Crate-level error types for viewlink diagnostics.
use std::path::PathBuf;

/// Every failure names the file, candidate, or setting it came from.
/// Resolver entry points never return these to the caller: per-reference
/// failures collapse to "no result" and are only logged. The CLI and
/// the config loader are the only places they surface.
#[allow(clippy::error_impl_error, reason = "crate-level error type")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A `.viewlink.toml` value is syntactically valid but unusable.
    #[error("invalid config `{key}`: {reason}")]
    ConfigInvalid {
        /// Config key holding the bad value.
        key: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// A requested file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// Source file exceeds the configured introspection size limit.
    #[error("file too large ({size_bytes} bytes, max {max_bytes}): {}", file.display())]
    FileTooLarge {
        /// File that exceeded the size limit.
        file: PathBuf,
        /// Maximum allowed file size in bytes.
        max_bytes: u64,
        /// Actual file size in bytes.
        size_bytes: u64,
    },

    /// A captured identifier cannot be mapped onto a path inside the project.
    #[error("invalid reference `{candidate}`: {reason}")]
    InvalidCandidate {
        /// The identifier as captured from the text.
        candidate: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// Tree-sitter failed to parse a controller file.
    #[error("parse failed: {}: {reason}", file.display())]
    ParseFailed {
        /// File that failed to parse.
        file: PathBuf,
        /// Description of the parse failure.
        reason: String,
    },

    /// The project root does not exist or is not a directory.
    #[error("project root not found: {}", path.display())]
    ProjectRootNotFound {
        /// The root that was given.
        path: PathBuf,
    },

    /// TOML deserialization failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// No source kind or grammar is registered for this file extension.
    #[error("unsupported file extension: .{ext}")]
    UnsupportedLanguage {
        /// File extension without the leading dot.
        ext: String,
    },
}
