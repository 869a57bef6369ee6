//! Document rendering: shorthand preprocessing, markdown conversion, title.

use std::path::Path;

use mdsite_renderer::{ConvertError, MarkdownConverter, PreprocessError, ShorthandPreprocessor};

use crate::resolver::ResolvedDocument;

/// Output of [`RenderPipeline::render`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedPage {
    /// Page title (not escaped).
    pub title: String,
    /// Converted HTML body, ready to insert into a template.
    pub html: String,
}

/// Error returned when a document cannot be rendered.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Malformed shorthand in the document.
    #[error("Shorthand error: {0}")]
    Preprocess(#[from] PreprocessError),
    /// The markdown converter failed.
    #[error(transparent)]
    Convert(#[from] ConvertError),
}

/// Configuration for [`RenderPipeline`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Title of the default document.
    pub site_title: String,
    /// Normalized name of the default document.
    pub default_document: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            site_title: "Markdown Site".to_owned(),
            default_document: "index.md".to_owned(),
        }
    }
}

/// Renders resolved documents into pages.
///
/// Immutable after construction and safe to share across requests.
pub struct RenderPipeline {
    preprocessor: ShorthandPreprocessor,
    converter: Box<dyn MarkdownConverter>,
    config: PipelineConfig,
}

impl RenderPipeline {
    /// Create a pipeline from its two rendering steps.
    #[must_use]
    pub fn new(
        preprocessor: ShorthandPreprocessor,
        converter: Box<dyn MarkdownConverter>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            preprocessor,
            converter,
            config,
        }
    }

    /// Render `document` into a page.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if the shorthand is malformed or the converter
    /// fails. Nothing is rendered in either case.
    pub fn render(&self, document: &ResolvedDocument) -> Result<RenderedPage, RenderError> {
        let text = String::from_utf8_lossy(&document.content);

        let preprocessed = self.preprocessor.process(&text)?;
        let html = self.converter.convert(&preprocessed)?;

        tracing::debug!(
            path = %document.file_path.display(),
            bytes = html.len(),
            "Rendered document"
        );

        Ok(RenderedPage {
            title: self.title_for(&document.request_path),
            html,
        })
    }

    /// Site title for the default document, file stem otherwise.
    fn title_for(&self, request_path: &str) -> String {
        if request_path == self.config.default_document {
            return self.config.site_title.clone();
        }
        Path::new(request_path)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for RenderPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderPipeline")
            .field("preprocessor", &self.preprocessor)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    static_assertions::assert_impl_all!(super::RenderPipeline: Send, Sync);

    use std::path::PathBuf;

    use mdsite_renderer::{CmarkConverter, ShorthandOptions};
    use pretty_assertions::assert_eq;

    use super::*;

    struct FailingConverter;

    impl MarkdownConverter for FailingConverter {
        fn convert(&self, _markdown: &str) -> Result<String, ConvertError> {
            Err(ConvertError::new("backend unavailable"))
        }
    }

    fn pipeline() -> RenderPipeline {
        RenderPipeline::new(
            ShorthandPreprocessor::new(ShorthandOptions::default()),
            Box::new(CmarkConverter::new()),
            PipelineConfig::default(),
        )
    }

    fn document(request_path: &str, content: &str) -> ResolvedDocument {
        ResolvedDocument {
            request_path: request_path.to_owned(),
            file_path: PathBuf::from("/srv/markdown").join(request_path),
            content: content.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_render_end_to_end() {
        let page = pipeline()
            .render(&document("index.md", "Hello [[About]] and ![[pic.jpg|200]]"))
            .unwrap();

        assert_eq!(page.title, "Markdown Site");
        assert_eq!(
            page.html,
            "<p>Hello <a href=\"/index.php/About\">About</a> and \
             <img src=\"/markdown/share/pic.jpg\" alt=\"\" style=\"width: 200px; height: auto;\"></p>\n"
        );
    }

    #[test]
    fn test_title_from_file_stem() {
        let p = pipeline();
        assert_eq!(p.render(&document("about.md", "")).unwrap().title, "about");
        assert_eq!(
            p.render(&document("guide/my notes.md", "")).unwrap().title,
            "my notes"
        );
    }

    #[test]
    fn test_nested_index_is_not_default_document() {
        let page = pipeline()
            .render(&document("guide/index.md", "# Guide"))
            .unwrap();
        assert_eq!(page.title, "index");
    }

    #[test]
    fn test_custom_site_title() {
        let p = RenderPipeline::new(
            ShorthandPreprocessor::default(),
            Box::new(CmarkConverter::new()),
            PipelineConfig {
                site_title: "Team Wiki".to_owned(),
                default_document: "home.md".to_owned(),
            },
        );
        assert_eq!(p.render(&document("home.md", "")).unwrap().title, "Team Wiki");
        assert_eq!(p.render(&document("index.md", "")).unwrap().title, "index");
    }

    #[test]
    fn test_invalid_utf8_is_lossy() {
        let doc = ResolvedDocument {
            content: b"caf\xff".to_vec(),
            ..document("about.md", "")
        };
        let page = pipeline().render(&doc).unwrap();
        assert_eq!(page.html, "<p>caf\u{FFFD}</p>\n");
    }

    #[test]
    fn test_preprocess_error() {
        let err = pipeline()
            .render(&document("about.md", "ok\n[[broken"))
            .unwrap_err();

        assert!(matches!(
            err,
            RenderError::Preprocess(PreprocessError::Unterminated { line: 2 })
        ));
        assert_eq!(
            err.to_string(),
            "Shorthand error: line 2: unterminated [[ ... ]]"
        );
    }

    #[test]
    fn test_convert_error() {
        let p = RenderPipeline::new(
            ShorthandPreprocessor::default(),
            Box::new(FailingConverter),
            PipelineConfig::default(),
        );
        let err = p.render(&document("about.md", "text")).unwrap_err();

        assert!(matches!(err, RenderError::Convert(_)));
        assert_eq!(
            err.to_string(),
            "markdown conversion failed: backend unavailable"
        );
    }
}
