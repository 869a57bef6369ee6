//! `[[target]]` wiki links.

use std::fmt::Write;

use html_escape::{encode_quoted_attribute, encode_text};

use super::ShorthandOptions;
use crate::encode::encode_link_target;

/// A parsed wiki link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WikiLink<'a> {
    /// Link target exactly as written.
    pub(crate) target: &'a str,
}

impl<'a> WikiLink<'a> {
    pub(crate) fn parse(inner: &'a str) -> Self {
        Self { target: inner }
    }

    /// Render the link as an anchor.
    ///
    /// Absolute URLs link to themselves. Anything else is a document name
    /// routed through the page handler's mount point.
    pub(crate) fn render(&self, options: &ShorthandOptions, out: &mut String) {
        if is_absolute_url(self.target) {
            let escaped = encode_quoted_attribute(self.target);
            write!(out, r#"<a href="{escaped}">{escaped}</a>"#).unwrap();
        } else {
            let href = format!(
                "{}/{}",
                options.link_prefix,
                encode_link_target(self.target)
            );
            write!(
                out,
                r#"<a href="{}">{}</a>"#,
                encode_quoted_attribute(&href),
                encode_text(self.target)
            )
            .unwrap();
        }
    }
}

/// Schemes that execute script when followed, never linked directly.
const SCRIPT_SCHEMES: [&str; 3] = ["javascript", "vbscript", "data"];

/// Check whether `s` is an absolute URL with a scheme and a host.
///
/// Accepts `scheme://host...` where the scheme follows RFC 3986
/// (`ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`) and the authority has a
/// non-empty host made of unreserved or percent-encoded characters (or an
/// IPv6 literal). Whitespace, control and non-ASCII characters reject.
fn is_absolute_url(s: &str) -> bool {
    if !s.is_ascii() || s.bytes().any(|b| b.is_ascii_whitespace() || b.is_ascii_control()) {
        return false;
    }

    let Some((scheme, rest)) = s.split_once("://") else {
        return false;
    };

    let mut scheme_chars = scheme.chars();
    let scheme_ok = scheme_chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && scheme_chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !scheme_ok
        || SCRIPT_SCHEMES
            .iter()
            .any(|script| scheme.eq_ignore_ascii_case(script))
    {
        return false;
    }

    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, hp)| hp);

    if let Some(literal) = host_port.strip_prefix('[') {
        return literal.split_once(']').is_some_and(|(ip, _)| {
            !ip.is_empty() && ip.chars().all(|c| c.is_ascii_hexdigit() || c == ':' || c == '.')
        });
    }

    let host = host_port.split(':').next().unwrap_or_default();
    !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~' | '%'))
}
