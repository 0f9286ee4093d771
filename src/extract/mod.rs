/*! HTML text extraction

- [Extractor]s pull the main article out of a page. [MainContent] is the shipped one.
- [page_text] gets the whole visible text of a page, and its title.
!*/
mod main_content;
mod page;

pub use main_content::MainContent;
pub use page::page_text;

use crate::error::Error;

/// Extracted article.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Article {
    pub text: String,
    pub title: Option<String>,
}

/// All extractors should implement [Extractor] to be useable in stages.
pub trait Extractor: Sync {
    /// # Errors
    /// Returns [Error::Extraction] when no article can be found.
    fn extract(&self, html: &str) -> Result<Article, Error>;
}

/// Collapse whitespace runs into single spaces.
pub(crate) fn normalize_whitespace(text: &str) -> String {
    itertools::join(text.split_whitespace(), " ")
}
