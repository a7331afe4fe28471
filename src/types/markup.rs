//! Serializes a rendered surface into the self-contained markup document
//! behind the `.doc` export. No scripting, no external fetches at open
//! time: links keep their already-resolved targets and the embedded image
//! is inlined as a data URI when its bytes were resolved.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::types::{style_map, ImageSource, RenderedSurface, SurfaceNode};

/// fixed banner prepended to every word-processor export
pub const FIDELITY_NOTICE: &str =
    "Note: Formatting may vary in Microsoft Word. Use PDF for the best result.";

/// assembles the complete word-compatible document for a surface
pub fn document_markup(surface: &RenderedSurface) -> String {
    let mut out = String::with_capacity(8192);

    out.push_str(
        "<html xmlns:o='urn:schemas-microsoft-com:office:office' \
         xmlns:w='urn:schemas-microsoft-com:office:word' \
         xmlns='http://www.w3.org/TR/REC-html40'>\n",
    );
    out.push_str("<head>\n<meta charset='utf-8'>\n<title>Onboarding Cheat Sheet</title>\n");
    out.push_str("<style>\n");
    out.push_str(&style_map::style_sheet());
    out.push_str("</style>\n</head>\n<body>\n");

    // fidelity warning always comes first
    out.push_str(
        "<p style=\"color: #000; background: #ffff00; padding: 5px; \
         font-size: 12px; border: 1px solid #eab308;\"><strong>",
    );
    out.push_str(FIDELITY_NOTICE);
    out.push_str("</strong></p>\n<br/>\n<div class=\"card clearfix\">\n");

    write_nodes(&mut out, surface.nodes());

    out.push_str("</div>\n</body>\n</html>\n");
    out
}

fn write_nodes(out: &mut String, nodes: &[SurfaceNode]) {
    let mut in_list = false;

    for node in nodes {
        // consecutive list items group into one <ul>
        let is_item = matches!(node, SurfaceNode::ListItem { .. });
        if in_list && !is_item {
            out.push_str("</ul>\n");
            in_list = false;
        }
        if is_item && !in_list {
            out.push_str("<ul>\n");
            in_list = true;
        }

        match node {
            SurfaceNode::Heading { text, level, .. } => {
                let tag = if *level == 1 { "h1" } else { "h2" };
                out.push_str(&format!("<{tag}>{}</{tag}>\n", escape(text)));
            }
            SurfaceNode::Paragraph { text, muted, .. } => {
                let class = if *muted { "muted" } else { "body-text" };
                out.push_str(&format!("<p class=\"{class}\">{}</p>\n", escape(text)));
            }
            SurfaceNode::KeyValue { label, value, code, .. } => {
                out.push_str("<div class=\"clearfix\"><span class=\"label\">");
                out.push_str(&escape(label));
                out.push_str("</span><span class=\"value\">");
                if *code {
                    out.push_str(&format!("<code>{}</code>", escape(value)));
                } else {
                    out.push_str(&format!("<span class=\"bold\">{}</span>", escape(value)));
                }
                out.push_str("</span></div>\n");
            }
            SurfaceNode::ListItem { text, lead, .. } => {
                out.push_str("<li>");
                if let Some(lead) = lead {
                    out.push_str(&format!("<strong>{}</strong> ", escape(lead)));
                }
                out.push_str(&escape(text));
                out.push_str("</li>\n");
            }
            SurfaceNode::Link { text, url, .. } => {
                out.push_str(&format!(
                    "<p><a href=\"{}\" class=\"accent\">{}</a></p>\n",
                    escape(url),
                    escape(text)
                ));
            }
            SurfaceNode::Image { alt, source, .. } => match source {
                ImageSource::Embedded(png) => {
                    out.push_str(&format!(
                        "<img src=\"data:image/png;base64,{}\" alt=\"{}\" width=\"90\" height=\"90\"/>\n",
                        STANDARD.encode(png),
                        escape(alt)
                    ));
                }
                // never fetched; leave the resolved URL for the word
                // processor, exactly what the live page would have shown
                ImageSource::Remote(url) => {
                    out.push_str(&format!(
                        "<img src=\"{}\" alt=\"{}\" width=\"90\" height=\"90\"/>\n",
                        escape(url),
                        escape(alt)
                    ));
                }
            },
            SurfaceNode::Divider { .. } => out.push_str("<hr class=\"divider\"/>\n"),
        }
    }

    if in_list {
        out.push_str("</ul>\n");
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CaseRecord, Renderer};

    fn markup() -> String {
        document_markup(&Renderer::new().render(&CaseRecord::default()))
    }

    #[test]
    fn banner_comes_before_the_content() {
        let doc = markup();
        let banner = doc.find(FIDELITY_NOTICE).expect("banner missing");
        let body = doc.find("<h1>").expect("content missing");
        assert!(banner < body);
    }

    #[test]
    fn document_is_self_contained_markup() {
        let doc = markup();
        assert!(doc.starts_with("<html"));
        assert!(doc.contains("<style>"));
        assert!(doc.contains("urn:schemas-microsoft-com:office:word"));
        assert!(doc.trim_end().ends_with("</html>"));
        assert!(!doc.contains("<script"));
    }

    #[test]
    fn links_keep_their_targets() {
        let doc = markup();
        assert!(doc.contains("href=\"https://zoom.us/download\""));
        assert!(doc.contains("href=\"mailto:support@usasean.org\""));
    }

    #[test]
    fn consecutive_list_items_share_a_list() {
        let doc = markup();
        assert!(doc.contains("<ul>"));
        assert_eq!(doc.matches("<ul>").count(), doc.matches("</ul>").count());
    }

    #[test]
    fn text_is_escaped() {
        let record = CaseRecord {
            given_name: "A<b>".to_string(),
            family_name: "O&Co".to_string(),
            ..CaseRecord::default()
        };
        let doc = document_markup(&Renderer::new().render(&record));
        assert!(doc.contains("A&lt;b&gt;"));
        assert!(doc.contains("O&amp;Co"));
    }
}
