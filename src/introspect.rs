/// Best-effort discovery of the methods a controller module exposes.
use std::path::Path;

use tree_sitter::{Language, Node, Parser, Tree};

use crate::error::Error;

/// Map a controller file extension to its tree-sitter language.
/// JavaScript parses with the TypeScript grammar, which accepts it.
///
/// # Errors
///
/// Returns `Error::UnsupportedLanguage` for unknown extensions.
pub fn language_for_path(path: &Path) -> Result<Language, Error> {
    let ext = path.extension().and_then(|e| return e.to_str()).unwrap_or("");

    return match ext {
        "ts" | "mts" | "cts" | "js" | "mjs" | "cjs" => {
            Ok(tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())
        },
        "tsx" | "jsx" => Ok(tree_sitter_typescript::LANGUAGE_TSX.into()),
        _ => Err(Error::UnsupportedLanguage {
            ext: ext.to_string(),
        }),
    };
}

/// Read a controller file and list the public methods of its class.
///
/// # Errors
///
/// Returns `Error::FileNotFound` if the file can't be read,
/// `Error::FileTooLarge` if it exceeds `max_bytes`,
/// or errors from [`exported_methods`].
pub fn controller_methods(path: &Path, max_bytes: u64) -> Result<Vec<String>, Error> {
    let size_bytes = std::fs::metadata(path)
        .map_err(|_err| return Error::FileNotFound { path: path.to_path_buf() })?
        .len();
    if size_bytes > max_bytes {
        return Err(Error::FileTooLarge {
            file: path.to_path_buf(),
            max_bytes,
            size_bytes,
        });
    }

    let source = std::fs::read_to_string(path)?;
    return exported_methods(path, &source);
}

/// Public instance methods of the module's class.
///
/// The class is the first exported one (named or `export default`), or the
/// first class in the file when nothing is exported. Constructors, static
/// members, `private`/`protected` members and `#private` names are left out.
/// A file without a class yields no methods.
///
/// # Errors
///
/// Returns `Error::UnsupportedLanguage` or `Error::ParseFailed`.
pub fn exported_methods(path: &Path, source: &str) -> Result<Vec<String>, Error> {
    let language = language_for_path(path)?;
    let tree = parse_source(path, source, &language)?;
    let root = tree.root_node();

    let Some(class) = find_exported_class(root).or_else(|| return find_any_class(root)) else {
        return Ok(Vec::new());
    };
    let Some(body) = class.child_by_field_name("body") else {
        return Ok(Vec::new());
    };

    let mut methods = Vec::new();
    let mut cursor = body.walk();
    for member in body.children(&mut cursor) {
        if let Some(name) = public_method_name(member, source) {
            methods.push(name);
        }
    }

    return Ok(methods);
}

/// Parse source into a tree-sitter tree.
///
/// # Errors
///
/// Returns `Error::ParseFailed` if the language cannot be set or parsing fails.
fn parse_source(file_path: &Path, source: &str, language: &Language) -> Result<Tree, Error> {
    let mut parser = Parser::new();
    parser.set_language(language).map_err(|e| {
        return Error::ParseFailed {
            file: file_path.to_path_buf(),
            reason: e.to_string(),
        };
    })?;

    return parser.parse(source, None).ok_or_else(|| {
        return Error::ParseFailed {
            file: file_path.to_path_buf(),
            reason: "tree-sitter returned None".to_string(),
        };
    });
}

fn is_class(node: Node<'_>) -> bool {
    return matches!(node.kind(), "class_declaration" | "abstract_class_declaration" | "class");
}

/// The class wrapped by the first `export` statement that has one.
fn find_exported_class(root: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = root.walk();
    for node in root.children(&mut cursor) {
        if node.kind() != "export_statement" {
            continue;
        }
        if let Some(decl) = node.child_by_field_name("declaration").filter(|d| return is_class(*d)) {
            return Some(decl);
        }
        // `export default class { ... }` puts the class under `value` or as a plain child.
        let mut inner = node.walk();
        if let Some(class) = node.children(&mut inner).find(|c| return is_class(*c)) {
            return Some(class);
        }
    }
    return None;
}

/// The first top-level class, exported or not.
fn find_any_class(root: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = root.walk();
    return root.children(&mut cursor).find(|node| return is_class(*node));
}

/// Name of a `method_definition` if it is a public instance method.
fn public_method_name(member: Node<'_>, source: &str) -> Option<String> {
    if member.kind() != "method_definition" {
        return None;
    }

    let mut cursor = member.walk();
    for child in member.children(&mut cursor) {
        match child.kind() {
            "static" => return None,
            "accessibility_modifier" => {
                let modifier = child.utf8_text(source.as_bytes()).ok()?;
                if modifier != "public" {
                    return None;
                }
            },
            _ => {},
        }
    }

    let name_node = member.child_by_field_name("name")?;
    if name_node.kind() == "private_property_identifier" {
        return None;
    }
    let name = name_node.utf8_text(source.as_bytes()).ok()?;
    if name == "constructor" {
        return None;
    }

    return Some(name.to_string());
}
