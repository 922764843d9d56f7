//! Askama views over the section tree. Templates live in `templates/` and
//! escape every interpolated value unless marked `|safe`.

use askama::Template;

use super::seo::PageMetadata;
use super::{Block, Section};

#[derive(Template)]
#[template(path = "article.html")]
pub struct Article<'a> {
    pub heading: &'a str,
    pub sections: &'a [Section],
}

#[derive(Template)]
#[template(path = "message.html")]
pub struct Message<'a> {
    pub message: &'a str,
}

/// `<head>` tags for a detail page. `json_ld` is inserted verbatim.
#[derive(Template)]
#[template(path = "head.html")]
pub struct Head<'a> {
    pub meta: &'a PageMetadata,
    pub json_ld: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{ActionLink, Figure};

    #[test]
    fn sections_render_in_order_with_anchors() {
        let sections = vec![
            Section::new("overview", Some("Overview"), vec![Block::Facts(vec![("Company".into(), "Acme".into())])]),
            Section::new("responsibilities", Some("Responsibilities"), vec![Block::bullets(vec![], "Details not specified")]),
        ];
        let html = Article { heading: "Data <Analyst>", sections: &sections }.render().unwrap();
        assert!(html.contains("<h1 class=\"text-3xl md:text-4xl font-bold mb-2\">Data &lt;Analyst&gt;</h1>"));
        let overview = html.find("sec-overview").unwrap();
        let resp = html.find("sec-responsibilities").unwrap();
        assert!(overview < resp);
        assert!(html.contains("<span class=\"font-semibold\">Company:</span> Acme"));
        assert!(html.contains("<li>Details not specified</li>"));
        assert!(!html.contains("<ul class=\"list-disc pl-6 mb-6 space-y-2\"></ul>"));
    }

    #[test]
    fn record_values_cannot_inject_markup() {
        let sections = vec![Section::new(
            "apply",
            None,
            vec![
                Block::Paragraph("<script>alert(1)</script>".into()),
                Block::Image(Figure {
                    src: "/a.svg\" onload=\"x".into(),
                    alt: "Tom & Jerry".into(),
                    fallback: "/b.svg".into(),
                }),
                Block::Action(ActionLink {
                    label: "Apply".into(),
                    href: "https://acme.com/apply".into(),
                    external: true,
                }),
            ],
        )];
        let html = Article { heading: "x", sections: &sections }.render().unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("\" onload=\""));
        assert!(html.contains("alt=\"Tom &amp; Jerry\""));
        assert!(html.contains("href=\"https://acme.com/apply\" target=\"_blank\" rel=\"noopener noreferrer\""));
        assert!(!html.contains("<h2"));
    }

    #[test]
    fn message_is_escaped() {
        let html = Message { message: "a < b" }.render().unwrap();
        assert_eq!(html.trim_end(), "<p class=\"text-center text-red-600\">a &lt; b</p>");
    }
}
