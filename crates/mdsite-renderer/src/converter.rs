//! Markdown to HTML conversion.

use pulldown_cmark::{Options, Parser, html};

/// Error returned when a converter rejects its input.
#[derive(Debug, thiserror::Error)]
#[error("markdown conversion failed: {message}")]
pub struct ConvertError {
    message: String,
}

impl ConvertError {
    /// Create a conversion error with a description.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Converts preprocessed markdown into HTML.
///
/// The returned markup is final: callers insert it into the page without
/// further escaping.
pub trait MarkdownConverter: Send + Sync {
    /// Convert `markdown` to HTML.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError`] if the input cannot be converted.
    fn convert(&self, markdown: &str) -> Result<String, ConvertError>;
}

/// pulldown-cmark converter with tables, strikethrough and task lists.
///
/// Raw HTML in the input (including the fragments produced by the shorthand
/// preprocessor) is passed through.
#[derive(Clone, Copy, Debug)]
pub struct CmarkConverter {
    options: Options,
}

impl CmarkConverter {
    /// Create a converter with the default extension set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            options: Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS,
        }
    }
}

impl Default for CmarkConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownConverter for CmarkConverter {
    fn convert(&self, markdown: &str) -> Result<String, ConvertError> {
        let parser = Parser::new_ext(markdown, self.options);
        let mut output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut output, parser);
        Ok(output)
    }
}
