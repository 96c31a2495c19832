use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::Html;

pub const ELLIPSIS: &str = "...";

/// Plain text of an HTML fragment: script and style blocks dropped, tags
/// treated as word breaks, entities decoded, whitespace collapsed.
pub fn html_to_text(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }
    let fragment = Html::parse_fragment(html);
    let mut raw = String::with_capacity(html.len());
    for child in fragment.root_element().children() {
        collect_text(child, &mut raw);
    }
    collapse_whitespace(&raw)
}

fn collect_text(node: NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Text(text) => out.push_str(text),
        Node::Element(element) => {
            if matches!(
                element.name(),
                "script" | "style" | "noscript" | "template"
            ) {
                return;
            }
            out.push(' ');
            for child in node.children() {
                collect_text(child, out);
            }
            out.push(' ');
        }
        _ => {
            for child in node.children() {
                collect_text(child, out);
            }
        }
    }
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cuts `text` to `max_chars` characters and appends [`ELLIPSIS`] when it was
/// longer. Text of exactly `max_chars` characters is returned unchanged.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
        None => text.to_string(),
    }
}
