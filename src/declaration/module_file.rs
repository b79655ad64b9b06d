//! Reader for module declaration files.
//!
//! Declarations live in `*.module.json` files, one module per file,
//! typically placed next to the sources of the module they describe.

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use super::types::ModuleDeclaration;

/// File name suffix identifying module declaration files.
pub const MODULE_FILE_SUFFIX: &str = ".module.json";

/// Errors that can occur while reading module declarations.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Failed to read a declaration file from disk.
    #[error("Failed to read declaration file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse JSON content.
    #[error("Failed to parse declaration JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The declaration is structurally valid JSON but not a usable module.
    #[error("Invalid module declaration: {0}")]
    InvalidDeclaration(String),

    /// Failed to walk a declaration directory.
    #[error("Failed to walk declaration directory: {0}")]
    WalkError(#[from] walkdir::Error),
}

/// Result type alias for declaration reading.
pub type ParseResult<T> = Result<T, ParseError>;

/// Parses a module declaration from a string.
///
/// # Example
///
/// ```
/// use buildgraph::declaration::module_file::parse_str;
///
/// let json = r#"{
///     "name": "enterprise-workers",
///     "capabilities": ["used-in-workers"],
///     "issues": {"any": "fail"}
/// }"#;
///
/// let decl = parse_str(json).unwrap();
/// assert_eq!(decl.name, "enterprise-workers");
/// ```
pub fn parse_str(content: &str) -> ParseResult<ModuleDeclaration> {
    let decl: ModuleDeclaration = serde_json::from_str(content)?;
    validate(&decl)?;
    Ok(decl)
}

/// Parses a module declaration from a file path.
///
/// # Arguments
///
/// * `path` - Path to the `*.module.json` file
///
/// # Returns
///
/// A `ParseResult` containing the parsed `ModuleDeclaration` or an error.
pub fn parse_file(path: &Path) -> ParseResult<ModuleDeclaration> {
    let content = fs::read_to_string(path)?;
    parse_str(&content)
}

/// Validates a parsed module declaration.
///
/// The identity must be non-empty and free of whitespace; everything else
/// is optional.
pub fn validate(decl: &ModuleDeclaration) -> ParseResult<()> {
    if decl.name.is_empty() {
        return Err(ParseError::InvalidDeclaration(
            "module declaration has an empty name".to_string(),
        ));
    }
    if decl.name.chars().any(char::is_whitespace) {
        return Err(ParseError::InvalidDeclaration(format!(
            "module name '{}' contains whitespace",
            decl.name
        )));
    }
    Ok(())
}

/// Discovers and parses all module declarations under a directory tree.
///
/// Walks the tree looking for files named `*.module.json`. Files are
/// visited in sorted path order so repeated discovery over the same tree
/// yields the declarations in the same order.
///
/// # Arguments
///
/// * `root` - Directory to search for declaration files
///
/// # Returns
///
/// All parsed declarations, in sorted path order.
pub fn discover(root: &Path) -> ParseResult<Vec<ModuleDeclaration>> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if name.ends_with(MODULE_FILE_SUFFIX) {
            paths.push(entry.into_path());
        }
    }
    paths.sort();

    let mut declarations = Vec::with_capacity(paths.len());
    for path in paths {
        log::debug!("reading module declaration {}", path.display());
        declarations.push(parse_file(&path)?);
    }
    Ok(declarations)
}
