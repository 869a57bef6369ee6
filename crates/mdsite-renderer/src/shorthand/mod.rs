//! Shorthand preprocessor for wiki links and media embeds.
//!
//! Rewrites two bracket notations into HTML that passes through the markdown
//! converter unchanged:
//!
//! - `![[file]]`, `![[file|width]]` → `<img>` or `<video>`
//! - `[[target]]` → `<a>` to an internal document or an absolute URL
//!
//! Everything outside those spans is left for the converter.

mod link;
mod media;
mod scanner;

use link::WikiLink;
use media::MediaEmbed;
use scanner::Segment;

/// Error for shorthand that cannot be rewritten safely.
///
/// Any of these aborts the whole document; partially rewritten output is
/// never returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreprocessError {
    /// `[[` without a closing `]]` on the same line.
    #[error("line {line}: unterminated [[ ... ]]")]
    Unterminated {
        /// Line of the opening brackets (1-indexed).
        line: usize,
    },
    /// `[[` inside another `[[ ... ]]` span.
    #[error("line {line}: nested [[ inside [[ ... ]]")]
    Nested {
        /// Line of the outer opening brackets (1-indexed).
        line: usize,
    },
    /// Span with nothing to link or embed.
    #[error("line {line}: empty [[ ... ]] target")]
    EmptyTarget {
        /// Line of the opening brackets (1-indexed).
        line: usize,
    },
}

/// URL settings for generated links and media sources.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShorthandOptions {
    /// Prefix for internal document links (the page handler's mount point).
    pub link_prefix: String,
    /// Absolute media base URL. Empty means relative to `media_public_root`.
    pub media_base_url: String,
    /// Public URL of the content root.
    pub media_public_root: String,
    /// Media subdirectory beneath the content root.
    pub media_dir: String,
}

impl Default for ShorthandOptions {
    fn default() -> Self {
        Self {
            link_prefix: "/index.php".to_owned(),
            media_base_url: String::new(),
            media_public_root: "/markdown".to_owned(),
            media_dir: "share".to_owned(),
        }
    }
}

impl ShorthandOptions {
    /// Full media URL for an already percent-encoded filename.
    fn media_url(&self, encoded_filename: &str) -> String {
        let base = if self.media_base_url.is_empty() {
            self.media_public_root.as_str()
        } else {
            self.media_base_url.trim_end_matches('/')
        };
        format!("{base}/{}/{encoded_filename}", self.media_dir)
    }
}

/// Preprocessor that rewrites shorthand spans into HTML.
///
/// Media embeds are recognised when the scanner meets the opening brackets,
/// so `![[x.jpg]]` is always consumed whole and never seen as a link.
///
/// # Example
///
/// ```
/// use mdsite_renderer::{ShorthandOptions, ShorthandPreprocessor};
///
/// let preprocessor = ShorthandPreprocessor::new(ShorthandOptions::default());
/// let output = preprocessor
///     .process("Hello [[About]] and ![[pic.jpg|200]]")
///     .unwrap();
///
/// assert!(output.contains(r#"<a href="/index.php/About">About</a>"#));
/// assert!(output.contains(r#"src="/markdown/share/pic.jpg""#));
/// assert!(output.contains("width: 200px; height: auto;"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ShorthandPreprocessor {
    options: ShorthandOptions,
}

impl ShorthandPreprocessor {
    /// Create a preprocessor with the given URL settings.
    #[must_use]
    pub fn new(options: ShorthandOptions) -> Self {
        Self { options }
    }

    /// Rewrite all shorthand spans in `input`.
    ///
    /// # Errors
    ///
    /// Returns [`PreprocessError`] for unterminated, nested, or empty spans.
    pub fn process(&self, input: &str) -> Result<String, PreprocessError> {
        let segments = scanner::scan(input)?;
        let mut output = String::with_capacity(input.len() + input.len() / 4);

        for segment in segments {
            match segment {
                Segment::Text(text) => output.push_str(text),
                Segment::Media(inner) => MediaEmbed::parse(inner).render(&self.options, &mut output),
                Segment::Link(inner) => WikiLink::parse(inner).render(&self.options, &mut output),
            }
        }

        Ok(output)
    }
}
