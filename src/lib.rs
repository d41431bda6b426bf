//! viewlink: resolve template includes, view renders and route handlers
//! written as strings in source text to the files they name.
//!
//! The crate backs editor features (document links, hovers, completion)
//! for projects laid out the AdonisJS way: Edge templates under
//! `resources/views`, components under `resources/views/components`, and
//! controllers under `app/controllers`. Everything works on raw text with
//! the regular expressions in [`patterns`]; nothing is parsed into an AST
//! except controller classes, whose method names feed route completion.
//!
//! ```ignore
//! use viewlink::{Project, SourceKind, linker};
//!
//! let project = Project::open(Path::new("."))?;
//! let links = linker::resolve_links(&text, SourceKind::Template, &project);
//! ```

pub mod completion;
pub mod components;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod hover;
pub mod introspect;
pub mod linker;
pub mod patterns;
pub mod position;
pub mod project;
pub mod types;

pub use error::Error;
pub use project::Project;
pub use types::{Candidate, CandidateKind, ComponentEntry, HoverInfo, LinkPosition, ResolvedLink, SourceKind};
