//! HTML page template.

/// Stylesheet for rendered pages: dark theme, Lexend Deca, indented outline.
const STYLE: &str = r#"        body {
            background-color: #1a1a1a;
            color: #f0f0f0;
            line-height: 1.2;
            font-family: "Lexend Deca", serif;
            font-optical-sizing: auto;
            font-weight: 300;
            font-style: normal;
            margin-top: 0.2em;
            margin-bottom: 0.5em;
        }
        h1, h2, h3, h4, h5, h6 {
            margin-top: 0.2em;
            margin-bottom: 0.2em;
        }
        h1 { margin-left: 1em; }
        h2 { margin-left: 2em; }
        h3 { margin-left: 3em; }
        h4 { margin-left: 4em; }
        h5 { margin-left: 5em; }
        h6 { margin-left: 6em; }
        p, ul, ol, img, video, source {
            margin-left: 7em;
            margin-top: 0.5em;
            margin-bottom: 0.5em;
        }
        ul ul, ol ol {
            margin-left: -1em;
            margin-top: 0.3em;
            margin-bottom: 0.3em;
        }
        a {
            color: #007BFF;
            text-decoration: none;
        }
        a:hover {
            text-decoration: underline;
        }
"#;

const FONT_LINKS: &str = r#"    <link rel="preconnect" href="https://fonts.googleapis.com">
    <link rel="preconnect" href="https://fonts.gstatic.com" crossorigin>
    <link href="https://fonts.googleapis.com/css2?family=Lexend+Deca&display=swap" rel="stylesheet">
"#;

/// Wrap a rendered body in a complete HTML document.
///
/// `title` is escaped; `body` is inserted verbatim.
pub(crate) fn render_page(title: &str, body: &str) -> String {
    let title = html_escape::encode_text(title);

    let mut html = String::with_capacity(body.len() + STYLE.len() + 512);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("    <meta charset=\"UTF-8\">\n");
    html.push_str(
        "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    html.push_str("    <title>");
    html.push_str(&title);
    html.push_str("</title>\n");
    html.push_str(FONT_LINKS);
    html.push_str("    <style>\n");
    html.push_str(STYLE);
    html.push_str("    </style>\n</head>\n<body>\n");
    html.push_str(body);
    html.push_str("</body>\n</html>\n");
    html
}
