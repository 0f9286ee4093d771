//! Filter stage: text shards to filtered shards.
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error::Error;
use crate::filtering::{QualityFilter, Verdict};
use crate::io::ShardReader;
use crate::tokenizer::{Tokenizer, WordBounds};

use super::processor::{Sink, Stage};

/// Runs the [QualityFilter] on every document of the text shards in `src`.
pub struct Quality<T: Tokenizer = WordBounds> {
    src: PathBuf,
    filter: QualityFilter<T>,
}

impl<T: Tokenizer> Quality<T> {
    pub fn new(src: &Path, filter: QualityFilter<T>) -> Self {
        Self {
            src: src.to_path_buf(),
            filter,
        }
    }
}

impl<T: Tokenizer> Stage for Quality<T> {
    fn name(&self) -> &'static str {
        "filter"
    }

    fn prefix(&self) -> &'static str {
        "filtered"
    }

    fn process(&self, input: &str, sink: &Sink) -> Result<usize, Error> {
        let reader = ShardReader::from_path(&self.src.join(input))?;
        let (mut nb_kept, mut nb_rejected) = (0, 0);

        for doc in reader {
            let doc = match doc {
                Ok(doc) => doc,
                Err(e) if e.is_record_level() => {
                    warn!("{}: skipping record: {}", input, e);
                    continue;
                }
                Err(e) => return Err(e),
            };

            match self.filter.evaluate(doc.content()) {
                Verdict::Accept => {
                    sink.send(doc)?;
                    nb_kept += 1;
                }
                Verdict::Reject(reason) => {
                    debug!("{}: rejected ({})", doc.label(), reason);
                    nb_rejected += 1;
                }
            }
        }

        debug!("{}: {} kept, {} rejected", input, nb_kept, nb_rejected);
        Ok(nb_kept)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::atomic::AtomicBool;

    use crossbeam::channel::bounded;
    use flate2::write::GzEncoder;
    use flate2::Compression;

    use super::Quality;
    use crate::document::Document;
    use crate::filtering::{QualityConfig, QualityFilter};
    use crate::pipelines::{Sink, Stage};

    #[test]
    fn keeps_accepted_only() {
        let src = tempfile::tempdir().unwrap();
        let clean: String = (0..10)
            .map(|l| {
                (0..8)
                    .map(|w| format!("word{}", l * 8 + w))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n");
        let docs = [
            Document::new("short".to_string()),
            Document::new(clean.clone()),
        ];
        let mut enc = GzEncoder::new(
            std::fs::File::create(src.path().join("text_content_0.jsonl.gz")).unwrap(),
            Compression::default(),
        );
        for doc in &docs {
            writeln!(enc, "{}", serde_json::to_string(doc).unwrap()).unwrap();
        }
        writeln!(enc, "{{broken").unwrap();
        enc.finish().unwrap();

        let stage = Quality::new(src.path(), QualityFilter::with_config(QualityConfig::default()).unwrap());
        let (tx, rx) = bounded(4);
        let halt = AtomicBool::new(false);
        let sink = Sink::new(tx, &halt);
        let kept = stage.process("text_content_0.jsonl.gz", &sink).unwrap();
        drop(sink);

        assert_eq!(kept, 1);
        let out: Vec<Document> = rx.iter().collect();
        assert_eq!(out, vec![Document::new(clean)]);
    }
}
