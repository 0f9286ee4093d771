/*! Fetch stage.

Downloads a Common Crawl WARC segment and keeps the pages that:

- are in a wanted language (declared by the crawl metadata, identified from the visible text
  when the page has no metadata record),
- do not contain too many flagged words.

Kept pages are forwarded with their raw HTML as content and their `<title>`.
!*/
use log::{debug, warn};
use url::Url;

use crate::document::Document;
use crate::error::Error;
use crate::extract::page_text;
use crate::filtering::{Filter, FlaggedWords, LanguageFilter};
use crate::identifiers::Identifier;
use crate::sources::commoncrawl::{paths, Pages};
use crate::sources::download::Downloader;

use super::processor::{Sink, Stage};

pub struct Fetch<I: Identifier> {
    downloader: Downloader,
    identifier: I,
    languages: LanguageFilter,
    flagged: FlaggedWords,
}

impl<I: Identifier> Fetch<I> {
    /// Wanted languages default to chinese and english, with no flagged words.
    pub fn new(downloader: Downloader, identifier: I) -> Self {
        Self {
            downloader,
            identifier,
            languages: LanguageFilter::default(),
            flagged: FlaggedWords::default(),
        }
    }

    pub fn with_languages(mut self, languages: LanguageFilter) -> Self {
        self.languages = languages;
        self
    }

    pub fn with_flagged_words(mut self, flagged: FlaggedWords) -> Self {
        self.flagged = flagged;
        self
    }

    /// Segment url of an input: full urls are used as is,
    /// anything else is a path relative to the Common Crawl domain.
    pub fn url(input: &str) -> Result<Url, Error> {
        if input.starts_with("http://") || input.starts_with("https://") {
            Ok(Url::parse(input)?)
        } else {
            paths::segment_url(input)
        }
    }

    /// Gate a single page. Returns `None` if the page is dropped.
    fn keep(&self, mut page: Document) -> Result<Option<Document>, Error> {
        let (text, title) = page_text(page.content());

        if page.languages().is_none() {
            match self.identifier.identify(&text)? {
                Some(lang) => page.set_languages(vec![lang]),
                None => {
                    debug!("{}: language not identified", page.label());
                    return Ok(None);
                }
            }
        }

        if !self.languages.detect(&page) {
            return Ok(None);
        }

        if !self.flagged.detect(text.as_str()) {
            debug!("{}: too many flagged words", page.label());
            return Ok(None);
        }

        page.set_title(title);
        Ok(Some(page))
    }

    /// Gate every page and send the kept ones.
    pub fn process_pages<P>(&self, pages: P, sink: &Sink) -> Result<usize, Error>
    where
        P: Iterator<Item = Result<Document, Error>>,
    {
        let mut nb_kept = 0;
        for page in pages {
            match self.keep(page?) {
                Ok(Some(page)) => {
                    sink.send(page)?;
                    nb_kept += 1;
                }
                Ok(None) => (),
                Err(e) if e.is_record_level() => warn!("skipping page: {}", e),
                Err(e) => return Err(e),
            }
        }
        Ok(nb_kept)
    }
}

impl<I: Identifier> Stage for Fetch<I> {
    fn name(&self) -> &'static str {
        "fetch"
    }

    fn prefix(&self) -> &'static str {
        "raw_content"
    }

    fn process(&self, input: &str, sink: &Sink) -> Result<usize, Error> {
        let url = Self::url(input)?;
        let body = self.downloader.fetch(&url)?;
        self.process_pages(Pages::from_bytes(body), sink)
    }
}
