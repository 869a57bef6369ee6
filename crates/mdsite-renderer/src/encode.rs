//! URL encoding for generated links and media sources.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// RFC 3986 unreserved characters: A-Z a-z 0-9 - . _ ~
const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode a string for use as a single URL path segment.
///
/// Everything outside the unreserved set is escaped, including `/`, `+`
/// and space (as `%20`).
///
/// # Examples
///
/// ```
/// use mdsite_renderer::encode_path_segment;
///
/// assert_eq!(encode_path_segment("my photo.jpg"), "my%20photo.jpg");
/// assert_eq!(encode_path_segment("a/b+c"), "a%2Fb%2Bc");
/// ```
pub fn encode_path_segment(input: &str) -> String {
    utf8_percent_encode(input, PATH_SEGMENT_ENCODE_SET).to_string()
}

/// Encode a wiki link target.
///
/// Spaces become `+` first, then the result is percent-encoded, so the
/// `+` itself travels as `%2B`. The request path decoder reverses this by
/// percent-decoding and then mapping `+` back to space.
///
/// # Examples
///
/// ```
/// use mdsite_renderer::encode_link_target;
///
/// assert_eq!(encode_link_target("Release Notes"), "Release%2BNotes");
/// ```
pub fn encode_link_target(target: &str) -> String {
    encode_path_segment(&target.replace(' ', "+"))
}
