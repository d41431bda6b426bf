use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use viewlink::{Project, SourceKind, completion, diagnostics, error, hover, linker, position};

#[derive(Parser)]
#[command(name = "viewlink", about = "Resolve template and route references to files", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,
    /// Project root directory
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,
    /// Log resolution details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the links a file offers
    Links {
        /// Template or script file to scan
        file: PathBuf,
    },
    /// Suggest completions at a cursor position
    Complete {
        /// Template or script file to scan
        file: PathBuf,
        #[command(flatten)]
        cursor: Cursor,
    },
    /// Preview the file linked at a cursor position
    Hover {
        /// Template or script file to scan
        file: PathBuf,
        #[command(flatten)]
        cursor: Cursor,
    },
    /// List the project's components and their tag names
    Components,
}

/// A cursor given as a byte offset or as a zero-based line and column.
#[derive(Args)]
struct Cursor {
    /// Byte offset into the file
    #[arg(long, conflicts_with_all = ["line", "column"])]
    offset: Option<usize>,
    /// Zero-based line
    #[arg(long, requires = "column")]
    line: Option<usize>,
    /// Zero-based column, in characters
    #[arg(long, requires = "line")]
    column: Option<usize>,
}

impl Cursor {
    /// Byte offset of the cursor in `text`; defaults to the end of the text.
    fn offset_in(&self, text: &str) -> usize {
        if let Some(offset) = self.offset {
            return offset;
        }
        return match (self.line, self.column) {
            (Some(line), Some(column)) => position::offset_at(text, line, column).unwrap_or(text.len()),
            _ => text.len(),
        };
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Commands::Links { file } => cmd_links(&cli, file),
        Commands::Complete { file, cursor } => cmd_complete(&cli, file, cursor),
        Commands::Hover { file, cursor } => cmd_hover(&cli, file, cursor),
        Commands::Components => cmd_components(&cli),
    };

    return match result {
        Ok(code) => code,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::from(2)
        },
    };
}

/// Logs go to stderr; `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "viewlink=debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| return tracing_subscriber::EnvFilter::new(default));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

/// Open the project and read `file` with its source kind.
///
/// # Errors
///
/// Returns errors from project opening, an unsupported extension, or reading the file.
fn load(cli: &Cli, file: &Path) -> Result<(Project, String, SourceKind), error::Error> {
    let project = Project::open(&cli.root)?;
    let kind = SourceKind::from_path(file, &project.config().template_extension)?;
    let text = std::fs::read_to_string(file).map_err(|_err| {
        return error::Error::FileNotFound {
            path: file.to_path_buf(),
        };
    })?;
    return Ok((project, text, kind));
}

/// Print the document links of `file`.
///
/// # Errors
///
/// Returns errors from [`load`].
fn cmd_links(cli: &Cli, file: &Path) -> Result<ExitCode, error::Error> {
    let (project, text, kind) = load(cli, file)?;
    let mut links = linker::document_links(&text, kind, &project);
    links.sort();

    if cli.json {
        print_json(&links);
    } else {
        for link in &links {
            let p = link.position;
            println!("{}:{}-{}  {}", p.line + 1, p.col_start + 1, p.col_end + 1, link.target_path.display());
        }
    }
    return Ok(found_any(!links.is_empty()));
}

/// Print completion candidates at the cursor.
///
/// # Errors
///
/// Returns errors from [`load`].
fn cmd_complete(cli: &Cli, file: &Path, cursor: &Cursor) -> Result<ExitCode, error::Error> {
    let (project, text, kind) = load(cli, file)?;
    let offset = cursor.offset_in(&text);
    let candidates = completion::resolve_completions(&text, offset, kind, &project);

    if cli.json {
        print_json(&candidates);
    } else {
        for candidate in &candidates {
            println!("{}", candidate.label);
        }
    }
    return Ok(found_any(!candidates.is_empty()));
}

/// Print the hover preview at the cursor.
///
/// # Errors
///
/// Returns errors from [`load`].
fn cmd_hover(cli: &Cli, file: &Path, cursor: &Cursor) -> Result<ExitCode, error::Error> {
    let (project, text, kind) = load(cli, file)?;
    let offset = cursor.offset_in(&text);
    let info = hover::hover(&text, offset, kind, &project);

    match (&info, cli.json) {
        (Some(info), true) => print_json(info),
        (Some(info), false) => {
            println!("{}", info.target_path.display());
            print!("{}", info.preview);
        },
        (None, _) => {},
    }
    return Ok(found_any(info.is_some()));
}

/// Print the component index.
///
/// # Errors
///
/// Returns errors from opening the project.
fn cmd_components(cli: &Cli) -> Result<ExitCode, error::Error> {
    let project = Project::open(&cli.root)?;
    let components = project.components();

    if cli.json {
        print_json(&components);
    } else {
        for entry in components {
            println!("{}  {}", entry.name, entry.path.display());
        }
    }
    return Ok(found_any(!components.is_empty()));
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::error!(error = %e, "failed to serialize output"),
    }
}

/// Exit 0 when something was found, 1 when the answer is empty.
fn found_any(found: bool) -> ExitCode {
    return if found { ExitCode::SUCCESS } else { ExitCode::from(1) };
}
