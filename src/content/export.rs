use pulldown_cmark::{html, Options, Parser};

use super::funnel::FunnelTemplate;
use crate::seo::html_escape;

pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Standalone HTML document for download
pub fn render_page(
    title: &str,
    description: &str,
    content: &str,
    template: FunnelTemplate,
) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<meta name="description" content="{description}">
<style>
body {{ max-width: 760px; margin: 0 auto; padding: 40px 20px; font-family: Georgia, serif; line-height: 1.7; color: #222; }}
h1, h2, h3 {{ font-family: Helvetica, Arial, sans-serif; line-height: 1.25; }}
a {{ color: #0b6bcb; }}
blockquote {{ border-left: 4px solid #ddd; margin-left: 0; padding-left: 16px; color: #555; }}
</style>
</head>
<body class="funnel-{template}">
{body}
</body>
</html>
"#,
        title = html_escape(title),
        description = html_escape(description),
        template = template.name(),
        body = markdown_to_html(content),
    )
}

/// `<slug>.html`, or `landing-page.html` when the title has no usable chars
pub fn filename(title: &str) -> String {
    let slug = slug::slugify(title);
    if slug.is_empty() {
        "landing-page.html".to_string()
    } else {
        format!("{}.html", slug)
    }
}
