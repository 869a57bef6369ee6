//! Request path resolution.
//!
//! Maps the raw, still percent-encoded path of an HTTP request to a markdown
//! file inside the content root. The character allow-list narrows what can
//! reach the filesystem; the canonical prefix check is the actual boundary.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;

/// Extension every resolved document carries.
const DOCUMENT_SUFFIX: &str = ".md";

/// Canonical directory that all documents must live under.
///
/// Canonicalized once at construction and never changed afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentRoot {
    path: PathBuf,
}

impl ContentRoot {
    /// Canonicalize `path` and use it as the content root.
    ///
    /// # Errors
    ///
    /// Returns an error if the path does not exist or is not a directory.
    pub fn new(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().canonicalize()?;
        if !path.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotADirectory,
                format!("content root is not a directory: {}", path.display()),
            ));
        }
        Ok(Self { path })
    }

    /// Canonical absolute path of the root.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Settings that shape request path normalization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolveOptions {
    /// URL prefix under which documents are served (e.g. `/index.php`).
    pub mount_point: String,
    /// Document served for an empty request path.
    pub default_document: String,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            mount_point: "/index.php".to_owned(),
            default_document: "index.md".to_owned(),
        }
    }
}

/// A document found inside the content root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedDocument {
    /// Normalized request path, relative to the root and ending in `.md`.
    pub request_path: String,
    /// Canonical absolute file path.
    pub file_path: PathBuf,
    /// Raw file contents.
    pub content: Vec<u8>,
}

/// No servable document exists for a request.
///
/// Missing files, directories, and paths escaping the root all produce the
/// same error. The fields are diagnostics for debug output only.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("document not found: {request_path}")]
pub struct NotFound {
    /// Normalized request path.
    pub request_path: String,
    /// Candidate file path (joined, not canonicalized).
    pub file_path: PathBuf,
}

/// Normalize a raw request path into a relative document name.
///
/// The result never starts with `/`, contains only alphanumerics, whitespace,
/// `/`, `-`, `_` and `.`, and always ends with `.md`. It may still contain
/// `..` segments; containment is enforced by [`PathResolver::resolve`].
///
/// # Example
///
/// ```
/// use mdsite_site::{ResolveOptions, normalize_request_path};
///
/// let options = ResolveOptions::default();
/// assert_eq!(normalize_request_path("/index.php/my+notes", &options), "my notes.md");
/// assert_eq!(normalize_request_path("/index.php/", &options), "index.md");
/// ```
#[must_use]
pub fn normalize_request_path(raw_path: &str, options: &ResolveOptions) -> String {
    let path = strip_mount_point(raw_path, &options.mount_point).trim_start_matches('/');

    let decoded = percent_decode_str(path)
        .decode_utf8_lossy()
        .replace('+', " ");

    let filtered: String = decoded.chars().filter(|&c| is_allowed(c)).collect();
    let filtered = filtered.trim_start_matches('/');

    let mut name = if filtered.is_empty() {
        options.default_document.clone()
    } else {
        filtered.to_owned()
    };
    if !name.ends_with(DOCUMENT_SUFFIX) {
        name.push_str(DOCUMENT_SUFFIX);
    }
    name
}

/// Strip `mount_point` when it is a whole leading path segment of `path`.
fn strip_mount_point<'a>(path: &'a str, mount_point: &str) -> &'a str {
    if mount_point.is_empty() {
        return path;
    }
    match path.strip_prefix(mount_point) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => path,
    }
}

fn is_allowed(c: char) -> bool {
    c.is_alphanumeric() || c.is_whitespace() || matches!(c, '/' | '-' | '_' | '.')
}

/// Resolves request paths to documents under a fixed [`ContentRoot`].
///
/// Holds no mutable state; share it across requests behind an `Arc`.
#[derive(Clone, Debug)]
pub struct PathResolver {
    root: ContentRoot,
    options: ResolveOptions,
}

impl PathResolver {
    /// Create a resolver for `root`.
    #[must_use]
    pub fn new(root: ContentRoot, options: ResolveOptions) -> Self {
        Self { root, options }
    }

    /// Content root documents are resolved against.
    #[must_use]
    pub fn root(&self) -> &ContentRoot {
        &self.root
    }

    /// Resolve `raw_path` and read the document.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound`] if the file does not exist, is not a regular
    /// file, lies outside the content root, or cannot be read.
    pub fn resolve(&self, raw_path: &str) -> Result<ResolvedDocument, NotFound> {
        let request_path = normalize_request_path(raw_path, &self.options);
        let candidate = self.root.path().join(&request_path);

        let not_found = |reason: &str| {
            tracing::debug!(
                raw_path,
                request_path = %request_path,
                candidate = %candidate.display(),
                reason,
                "Document request rejected"
            );
            NotFound {
                request_path: request_path.clone(),
                file_path: candidate.clone(),
            }
        };

        let Ok(file_path) = candidate.canonicalize() else {
            return Err(not_found("missing"));
        };
        if !file_path.starts_with(self.root.path()) {
            return Err(not_found("outside content root"));
        }
        if !fs::metadata(&file_path).is_ok_and(|meta| meta.is_file()) {
            return Err(not_found("not a regular file"));
        }
        let Ok(content) = fs::read(&file_path) else {
            return Err(not_found("unreadable"));
        };

        Ok(ResolvedDocument {
            request_path,
            file_path,
            content,
        })
    }
}
