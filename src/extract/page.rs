//! Visible text of a whole page.
use scraper::{ElementRef, Html, Node};

use super::normalize_whitespace;

const INVISIBLE: [&str; 4] = ["script", "style", "noscript", "template"];

pub(super) fn is_invisible(name: &str) -> bool {
    INVISIBLE.contains(&name)
}

/// First `<title>` of a parsed document.
pub(super) fn title(document: &Html) -> Option<String> {
    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "title")
        .map(|el| normalize_whitespace(&el.text().collect::<String>()))
        .filter(|t| !t.is_empty())
}

/// Visible text of `html`, one text node per line, and the page title.
///
/// Text inside `script`, `style`, `noscript` and `template` elements is skipped.
pub fn page_text(html: &str) -> (String, Option<String>) {
    let document = Html::parse_document(html);

    let mut text = String::new();
    for node in document.root_element().descendants() {
        let Node::Text(t) = node.value() else {
            continue;
        };
        let hidden = node
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|el| is_invisible(el.value().name()));
        let t = t.trim();
        if hidden || t.is_empty() {
            continue;
        }
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(t);
    }

    (text, title(&document))
}

#[cfg(test)]
mod tests {
    use super::page_text;

    #[test]
    fn visible_text() {
        let html = r#"<html><head><title> Foo  bar </title><style>p { color: red; }</style></head>
            <body><p>Hello <b>world</b></p><script>var x = 1;</script><noscript>enable js</noscript></body></html>"#;
        let (text, title) = page_text(html);
        assert_eq!(title.as_deref(), Some("Foo bar"));
        assert_eq!(text.lines().collect::<Vec<_>>(), vec!["Foo  bar", "Hello", "world"]);
    }

    #[test]
    fn no_title() {
        let (text, title) = page_text("<p>just text</p>");
        assert_eq!(text, "just text");
        assert_eq!(title, None);
    }

    #[test]
    fn garbage() {
        let (text, title) = page_text("\u{0}\u{1}not really < html >");
        assert!(title.is_none());
        assert!(text.contains("not really"));
    }
}
