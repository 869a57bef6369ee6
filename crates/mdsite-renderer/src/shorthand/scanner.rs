//! Token scanner for `[[...]]` and `![[...]]` spans.
//!
//! The scanner splits input into plain text and shorthand tokens. Text
//! segments are borrowed slices of the input, so everything outside a
//! matched span reaches the output byte for byte.

use super::PreprocessError;

const OPEN: &str = "[[";
const CLOSE: &str = "]]";

/// A piece of scanned input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    /// Text outside any shorthand span.
    Text(&'a str),
    /// `![[inner]]` media embed.
    Media(&'a str),
    /// `[[inner]]` wiki link.
    Link(&'a str),
}

/// Split `input` into text and shorthand segments.
///
/// A span opens at `[[` and closes at the first `]]` on the same line. The
/// span is a media embed when the opener is directly preceded by `!`, in
/// which case the `!` belongs to the token rather than the surrounding text.
pub(crate) fn scan(input: &str) -> Result<Vec<Segment<'_>>, PreprocessError> {
    let mut segments = Vec::new();
    let bytes = input.as_bytes();
    let mut text_start = 0;

    while let Some(offset) = input[text_start..].find(OPEN) {
        let open = text_start + offset;
        let is_media = open > text_start && bytes[open - 1] == b'!';

        let inner_start = open + OPEN.len();
        let line_end = input[inner_start..]
            .find('\n')
            .map_or(input.len(), |i| inner_start + i);
        let line_rest = &input[inner_start..line_end];

        let Some(close) = line_rest.find(CLOSE) else {
            return Err(PreprocessError::Unterminated {
                line: line_number(input, open),
            });
        };
        let inner = &line_rest[..close];

        if inner.contains(OPEN) {
            return Err(PreprocessError::Nested {
                line: line_number(input, open),
            });
        }
        if target_of(inner, is_media).trim().is_empty() {
            return Err(PreprocessError::EmptyTarget {
                line: line_number(input, open),
            });
        }

        let text_end = if is_media { open - 1 } else { open };
        if text_end > text_start {
            segments.push(Segment::Text(&input[text_start..text_end]));
        }
        segments.push(if is_media {
            Segment::Media(inner)
        } else {
            Segment::Link(inner)
        });

        text_start = inner_start + close + CLOSE.len();
    }

    if text_start < input.len() {
        segments.push(Segment::Text(&input[text_start..]));
    }

    Ok(segments)
}

/// The part of a span that names its target.
fn target_of(inner: &str, is_media: bool) -> &str {
    if is_media {
        inner.split_once('|').map_or(inner, |(target, _)| target)
    } else {
        inner
    }
}

/// 1-indexed line number of a byte offset.
fn line_number(input: &str, offset: usize) -> usize {
    input[..offset].bytes().filter(|&b| b == b'\n').count() + 1
}
