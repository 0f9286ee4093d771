//! Extract stage: raw html shards to text shards.
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error::Error;
use crate::extract::Extractor;
use crate::filtering::{Filter, LanguageFilter};
use crate::io::ShardReader;

use super::processor::{Sink, Stage};

/// Reads raw shards from `src`, keeps documents in the wanted languages and replaces
/// their html content with the extracted article.
///
/// Documents where no article is found are kept with an empty content.
pub struct Extract<E: Extractor> {
    src: PathBuf,
    extractor: E,
    languages: LanguageFilter,
}

impl<E: Extractor> Extract<E> {
    /// Keeps english documents that are not also chinese.
    pub fn new(src: &Path, extractor: E) -> Self {
        Self {
            src: src.to_path_buf(),
            extractor,
            languages: LanguageFilter::new(vec!["en".to_string()], vec!["zh".to_string()]),
        }
    }

    pub fn with_languages(mut self, languages: LanguageFilter) -> Self {
        self.languages = languages;
        self
    }
}

impl<E: Extractor> Stage for Extract<E> {
    fn name(&self) -> &'static str {
        "extract"
    }

    fn prefix(&self) -> &'static str {
        "text_content"
    }

    fn process(&self, input: &str, sink: &Sink) -> Result<usize, Error> {
        let reader = ShardReader::from_path(&self.src.join(input))?;
        let mut nb_kept = 0;

        for doc in reader {
            let mut doc = match doc {
                Ok(doc) => doc,
                Err(e) if e.is_record_level() => {
                    warn!("{}: skipping record: {}", input, e);
                    continue;
                }
                Err(e) => return Err(e),
            };

            if !self.languages.detect(&doc) {
                continue;
            }

            match self.extractor.extract(doc.content()) {
                Ok(article) => {
                    doc.set_content(article.text);
                    if doc.title().is_none() {
                        doc.set_title(article.title);
                    }
                }
                Err(e) => {
                    debug!("{}: {}", doc.label(), e);
                    doc.set_content(String::new());
                }
            }

            sink.send(doc)?;
            nb_kept += 1;
        }

        Ok(nb_kept)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::Path;
    use std::sync::atomic::AtomicBool;

    use crossbeam::channel::bounded;
    use flate2::write::GzEncoder;
    use flate2::Compression;

    use super::Extract;
    use crate::document::Document;
    use crate::error::Error;
    use crate::extract::{Article, Extractor, MainContent};
    use crate::pipelines::{Sink, Stage};

    /// Returns the html as is, fails on empty html.
    struct Echo;

    impl Extractor for Echo {
        fn extract(&self, html: &str) -> Result<Article, Error> {
            if html.is_empty() {
                return Err(Error::Extraction("empty".to_string()));
            }
            Ok(Article {
                text: html.to_string(),
                title: Some("echo".to_string()),
            })
        }
    }

    fn write_shard(path: &Path, lines: &[&str]) {
        let mut enc = GzEncoder::new(std::fs::File::create(path).unwrap(), Compression::default());
        for line in lines {
            writeln!(enc, "{line}").unwrap();
        }
        enc.finish().unwrap();
    }

    fn run<E: Extractor>(stage: &Extract<E>, input: &str) -> Result<Vec<Document>, Error> {
        let (tx, rx) = bounded(16);
        let halt = AtomicBool::new(false);
        let sink = Sink::new(tx, &halt);
        let n = stage.process(input, &sink)?;
        drop(sink);
        let docs: Vec<Document> = rx.iter().collect();
        assert_eq!(n, docs.len());
        Ok(docs)
    }

    #[test_log::test]
    fn gate_and_extract() {
        let src = tempfile::tempdir().unwrap();
        write_shard(
            &src.path().join("raw_content_0.jsonl.gz"),
            &[
                r#"{"id":"1","content":"english","languages":["en"],"title":"kept"}"#,
                r#"{"id":"2","content":"mixed","languages":["en","zh"]}"#,
                r#"{"id":"3","content":"chinese","languages":["zh"]}"#,
                r#"not json"#,
                r#"{"id":"4","content":"","languages":"en","source":"cc"}"#,
                r#"{"id":"5","content":"no languages"}"#,
            ],
        );

        let stage = Extract::new(src.path(), Echo);
        let docs = run(&stage, "raw_content_0.jsonl.gz").unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id(), Some("1"));
        assert_eq!(docs[0].content(), "english");
        assert_eq!(docs[0].title(), Some("kept"));

        // failed extraction
        assert_eq!(docs[1].id(), Some("4"));
        assert_eq!(docs[1].content(), "");
        assert_eq!(docs[1].extra()["source"], "cc");
    }

    #[test]
    fn main_content() {
        let src = tempfile::tempdir().unwrap();
        let html = "<html><head><title>Page</title></head><body><article><p>This is the main paragraph of the page, long enough.</p></article></body></html>";
        let line = serde_json::json!({"id": "1", "content": html, "languages": ["en"]}).to_string();
        write_shard(&src.path().join("raw.jsonl.gz"), &[line.as_str()]);

        let stage = Extract::new(src.path(), MainContent::new().unwrap());
        let docs = run(&stage, "raw.jsonl.gz").unwrap();
        assert_eq!(
            docs[0].content(),
            "This is the main paragraph of the page, long enough."
        );
        assert_eq!(docs[0].title(), Some("Page"));
    }

    #[test]
    fn missing_shard() {
        let src = tempfile::tempdir().unwrap();
        let stage = Extract::new(src.path(), Echo);
        assert!(matches!(run(&stage, "nope.jsonl.gz"), Err(Error::Io(_))));
    }
}
