//! `![[file]]` and `![[file|width]]` media embeds.

use std::fmt::Write;

use html_escape::encode_quoted_attribute;

use super::ShorthandOptions;
use crate::encode::encode_path_segment;

/// The single extension rendered as `<video>`.
const VIDEO_EXTENSION: &str = ".mp4";
const VIDEO_MIME: &str = "video/mp4";

const RESPONSIVE_STYLE: &str = "max-width: 100%; height: auto;";

/// A parsed media embed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MediaEmbed<'a> {
    /// Bare filename inside the media directory.
    pub(crate) filename: &'a str,
    /// Fixed pixel width, if a positive integer was given.
    pub(crate) width: Option<u32>,
}

impl<'a> MediaEmbed<'a> {
    /// Parse the text between `![[` and `]]`.
    ///
    /// Splits on the first `|`. The width is the leading run of digits, so
    /// `200px` is 200; no digits, zero, or a sign means no width.
    pub(crate) fn parse(inner: &'a str) -> Self {
        let (filename, width) = match inner.split_once('|') {
            Some((filename, width)) => (filename, parse_width(width)),
            None => (inner, None),
        };
        Self {
            filename: filename.trim(),
            width,
        }
    }

    fn is_video(&self) -> bool {
        self.filename
            .to_ascii_lowercase()
            .ends_with(VIDEO_EXTENSION)
    }

    fn style(&self) -> String {
        match self.width {
            Some(width) => format!("width: {width}px; height: auto;"),
            None => RESPONSIVE_STYLE.to_owned(),
        }
    }

    /// Render the embed as an `<img>` or `<video>` element.
    pub(crate) fn render(&self, options: &ShorthandOptions, out: &mut String) {
        let src = options.media_url(&encode_path_segment(self.filename));
        let src = encode_quoted_attribute(&src);
        let style = self.style();

        if self.is_video() {
            write!(
                out,
                r#"<video controls style="{style}"><source src="{src}" type="{VIDEO_MIME}">Your browser does not support the video tag.</video>"#
            )
            .unwrap();
        } else {
            write!(out, r#"<img src="{src}" alt="" style="{style}">"#).unwrap();
        }
    }
}

/// Leading decimal digits of `text` after trimming, if positive.
fn parse_width(text: &str) -> Option<u32> {
    let text = text.trim();
    let digits = text
        .find(|c: char| !c.is_ascii_digit())
        .map_or(text, |end| &text[..end]);
    digits.parse::<u32>().ok().filter(|&w| w > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(inner: &str) -> String {
        let mut out = String::new();
        MediaEmbed::parse(inner).render(&ShorthandOptions::default(), &mut out);
        out
    }

    #[test]
    fn test_parse_filename_only() {
        assert_eq!(
            MediaEmbed::parse(" pic.jpg "),
            MediaEmbed {
                filename: "pic.jpg",
                width: None
            }
        );
    }

    #[test]
    fn test_parse_width() {
        assert_eq!(MediaEmbed::parse("pic.jpg | 200 ").width, Some(200));
    }

    #[test]
    fn test_parse_non_numeric_width() {
        assert_eq!(MediaEmbed::parse("pic.jpg|abc").width, None);
        assert_eq!(MediaEmbed::parse("pic.jpg|px200").width, None);
        assert_eq!(MediaEmbed::parse("pic.jpg|-5").width, None);
        assert_eq!(MediaEmbed::parse("pic.jpg|+5").width, None);
    }

    #[test]
    fn test_parse_width_with_unit_suffix() {
        assert_eq!(MediaEmbed::parse("pic.jpg|200px").width, Some(200));
        assert_eq!(MediaEmbed::parse("pic.jpg| 200.5 ").width, Some(200));
        assert_eq!(
            render("pic.jpg|200px"),
            r#"<img src="/markdown/share/pic.jpg" alt="" style="width: 200px; height: auto;">"#
        );
    }

    #[test]
    fn test_parse_width_overflow_is_responsive() {
        assert_eq!(MediaEmbed::parse("pic.jpg|99999999999").width, None);
    }

    #[test]
    fn test_parse_zero_width_is_responsive() {
        assert_eq!(MediaEmbed::parse("pic.jpg|0").width, None);
    }

    #[test]
    fn test_parse_splits_on_first_pipe() {
        let embed = MediaEmbed::parse("pic.jpg|200|300");
        assert_eq!(embed.filename, "pic.jpg");
        assert_eq!(embed.width, Some(200));
    }

    #[test]
    fn test_render_image_responsive() {
        assert_eq!(
            render("pic.jpg"),
            r#"<img src="/markdown/share/pic.jpg" alt="" style="max-width: 100%; height: auto;">"#
        );
    }

    #[test]
    fn test_render_image_with_width() {
        assert_eq!(
            render("pic.jpg|200"),
            r#"<img src="/markdown/share/pic.jpg" alt="" style="width: 200px; height: auto;">"#
        );
    }

    #[test]
    fn test_render_video_case_insensitive() {
        assert_eq!(
            render("Clip.MP4|640"),
            r#"<video controls style="width: 640px; height: auto;"><source src="/markdown/share/Clip.MP4" type="video/mp4">Your browser does not support the video tag.</video>"#
        );
    }

    #[test]
    fn test_render_other_video_formats_are_images() {
        assert!(render("clip.webm").starts_with("<img "));
    }

    #[test]
    fn test_render_encodes_filename() {
        assert_eq!(
            render("my photo \"1\".png"),
            r#"<img src="/markdown/share/my%20photo%20%221%22.png" alt="" style="max-width: 100%; height: auto;">"#
        );
    }

    #[test]
    fn test_render_with_absolute_base_url() {
        let options = ShorthandOptions {
            media_base_url: "https://cdn.example.com/notes/".to_owned(),
            ..ShorthandOptions::default()
        };
        let mut out = String::new();
        MediaEmbed::parse("a b.png").render(&options, &mut out);
        assert!(out.contains(r#"src="https://cdn.example.com/notes/share/a%20b.png""#));
    }
}
