use pulldown_cmark::{html, Event, Options, Parser};

fn parser_options() -> Options {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_TABLES);
    opts.insert(Options::ENABLE_TASKLISTS);
    opts
}

/// Render post content to HTML for display.
///
/// Raw HTML in the source is shown as text rather than passed through, since the
/// result is injected into the page.
pub fn render_markdown(source: &str) -> String {
    let parser = Parser::new_ext(source, parser_options()).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_markdown() {
        let html = render_markdown("# Hello\n\nSome *emphasis* and ~~gone~~.");
        assert!(html.contains("<h1>Hello</h1>"));
        assert!(html.contains("<em>emphasis</em>"));
        assert!(html.contains("<del>gone</del>"));
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let html = render_markdown(
            "<script>alert(document.cookie)</script>\n\nHello <b onclick=\"steal()\">there</b>",
        );
        assert!(!html.contains("<script"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<b "));
        assert!(html.contains("&lt;b "));
        assert!(html.contains("Hello"));
    }

    #[test]
    fn test_empty_content() {
        assert_eq!(render_markdown(""), "");
    }
}
