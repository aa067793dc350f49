//! Reduce HTML verse content to the text a reader would see.

use scraper::{node::Node, ElementRef, Html};

/// Elements whose content is never visible text.
const SKIPPED: &[&str] = &["script", "style", "template", "head", "noscript"];

/// Elements that break the line when rendered; a space keeps their words apart.
const BLOCKS: &[&str] = &[
    "p", "div", "br", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "tr",
    "td", "th", "table", "section",
];

/// Extract visible text from an HTML fragment.
///
/// Tags are dropped, entities are decoded by the parser, and runs of
/// whitespace (including the ones left between block elements) collapse to a
/// single space. Script and style content is ignored, never executed.
pub fn to_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut raw = String::new();
    collect_text(fragment.root_element(), &mut raw);
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collect_text(element: ElementRef, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                let name = el.name();
                if SKIPPED.contains(&name) {
                    continue;
                }
                let is_block = BLOCKS.contains(&name);
                if is_block {
                    out.push(' ');
                }
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_text(child_el, out);
                }
                if is_block {
                    out.push(' ');
                }
            }
            _ => {}
        }
    }
}
