//! Main content extractor.
use scraper::{ElementRef, Html, Selector};

use super::page::{is_invisible, title};
use super::{normalize_whitespace, Article, Extractor};
use crate::error::Error;

/// Class/id fragments of containers that are not content.
const BOILERPLATE: [&str; 14] = [
    "nav",
    "navbar",
    "menu",
    "sidebar",
    "footer",
    "header",
    "banner",
    "cookie",
    "consent",
    "ads",
    "advert",
    "promo",
    "subscribe",
    "newsletter",
];

const PARAGRAPHS: &str = "p, h1, h2, h3, h4, h5, h6, li, pre, blockquote";

/// Picks the densest non-boilerplate container of a page and returns its paragraphs.
///
/// Containers (`article`, `main`, `section`, `div`, `body`) are scored by their text length
/// minus twice their link text length. `article` and `main` get a bonus,
/// link-heavy containers a penalty.
/// Paragraphs are joined with newlines.
pub struct MainContent {
    containers: Selector,
    links: Selector,
    paragraphs: Selector,
    min_chars: usize,
}

impl MainContent {
    pub fn new() -> Result<Self, Error> {
        let parse = |s: &str| {
            Selector::parse(s).map_err(|e| Error::Custom(format!("invalid selector {s}: {e:?}")))
        };
        Ok(Self {
            containers: parse("article, main, section, div, body")?,
            links: parse("a")?,
            paragraphs: parse(PARAGRAPHS)?,
            min_chars: 20,
        })
    }

    /// Containers with less text than `min_chars` are never picked.
    pub fn with_min_chars(mut self, min_chars: usize) -> Self {
        self.min_chars = min_chars;
        self
    }

    fn is_boilerplate(el: &ElementRef) -> bool {
        let value = el.value();
        let names = format!(
            "{} {}",
            value.attr("class").unwrap_or_default(),
            value.attr("id").unwrap_or_default()
        )
        .to_ascii_lowercase();
        BOILERPLATE.iter().any(|b| names.contains(b))
    }

    /// Visible text length, in chars.
    fn text_chars(el: &ElementRef) -> usize {
        visible_text(el).map(|t| t.chars().count()).sum()
    }

    fn link_chars(&self, el: &ElementRef) -> usize {
        el.select(&self.links)
            .map(|a| a.text().map(|t| t.chars().count()).sum::<usize>())
            .sum()
    }

    fn score(&self, el: &ElementRef) -> Option<i64> {
        if Self::is_boilerplate(el) {
            return None;
        }
        let text = Self::text_chars(el);
        if text < self.min_chars {
            return None;
        }
        let links = self.link_chars(el);

        let mut score = text as i64 - 2 * links as i64;
        match el.value().name() {
            "article" => score += 500,
            "main" => score += 300,
            _ => (),
        }
        if links > text / 2 {
            score -= 500;
        }
        Some(score)
    }

    fn best_container<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        let mut best: Option<(i64, ElementRef<'a>)> = None;
        for el in document.select(&self.containers) {
            if let Some(score) = self.score(&el) {
                if score > 0 && best.map_or(true, |(s, _)| score > s) {
                    best = Some((score, el));
                }
            }
        }
        best.map(|(_, el)| el)
    }

    fn paragraphs(&self, container: &ElementRef) -> Vec<String> {
        container
            .select(&self.paragraphs)
            // nested paragraphs (p in li...) are already part of their parent
            .filter(|el| {
                !el.ancestors()
                    .filter_map(ElementRef::wrap)
                    .take_while(|a| a.id() != container.id())
                    .any(|a| self.paragraphs.matches(&a) || is_invisible(a.value().name()))
            })
            .map(|el| normalize_whitespace(&visible_text(&el).collect::<Vec<_>>().join(" ")))
            .filter(|p| !p.is_empty())
            .collect()
    }
}

/// Text nodes of `el` that are not inside invisible elements.
fn visible_text<'a>(el: &ElementRef<'a>) -> impl Iterator<Item = &'a str> {
    let root = el.id();
    el.descendants().filter_map(move |node| {
        let text = node.value().as_text()?;
        let hidden = node
            .ancestors()
            .filter_map(ElementRef::wrap)
            .take_while(|a| a.id() != root)
            .any(|a| is_invisible(a.value().name()));
        (!hidden).then_some(&**text)
    })
}

impl Extractor for MainContent {
    fn extract(&self, html: &str) -> Result<Article, Error> {
        let document = Html::parse_document(html);
        let container = self
            .best_container(&document)
            .ok_or_else(|| Error::Extraction("no content container".to_string()))?;

        let mut paragraphs = self.paragraphs(&container);
        if paragraphs.is_empty() {
            let text = normalize_whitespace(&visible_text(&container).collect::<Vec<_>>().join(" "));
            paragraphs.push(text);
        }

        let text = paragraphs.join("\n");
        if text.is_empty() {
            return Err(Error::Extraction("empty article".to_string()));
        }

        Ok(Article {
            text,
            title: title(&document),
        })
    }
}
