//! Rotating shard writer.
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use log::{debug, info};

use crate::document::Document;
use crate::error::Error;

type Encoder = GzEncoder<BufWriter<File>>;

/// Name of the shard with index `index`.
pub fn shard_name(prefix: &str, index: usize) -> String {
    format!("{prefix}_{index}.jsonl.gz")
}

/// Parse the index out of a shard file name.
pub(crate) fn shard_index(prefix: &str, file_name: &str) -> Option<usize> {
    file_name
        .strip_prefix(prefix)?
        .strip_prefix('_')?
        .strip_suffix(".jsonl.gz")?
        .parse()
        .ok()
}

/// One past the highest `{prefix}_{n}.jsonl.gz` index in `dst`, 0 if there's none.
pub fn next_index(dst: &Path, prefix: &str) -> Result<usize, Error> {
    let mut next = 0;
    for entry in std::fs::read_dir(dst)? {
        let entry = entry?;
        if let Some(idx) = entry.file_name().to_str().and_then(|n| shard_index(prefix, n)) {
            next = next.max(idx + 1);
        }
    }
    Ok(next)
}

/// Rotating gzip JSON lines writer.
///
/// Shards are named `{prefix}_{stripe * stride + offset}.jsonl.gz`,
/// where `stripe` is incremented at each rotation.
/// The first shard is created on the first write,
/// then a new one is created as soon as the current one holds `max_items` documents.
///
/// Shards are never overwritten: creating an existing shard is an error.
/// Every I/O failure is reported as [Error::Writer].
pub struct RotatingWriter {
    dst: PathBuf,
    prefix: String,
    offset: usize,
    stride: usize,
    max_items: usize,
    stripe: usize,
    nb_items: usize,
    encoder: Option<Encoder>,
    written: Vec<PathBuf>,
}

impl RotatingWriter {
    /// Create a new writer.
    /// Note that nothing is created unless a write is performed.
    pub fn new(dst: &Path, prefix: &str, offset: usize, stride: usize, max_items: usize) -> Self {
        Self {
            dst: dst.to_path_buf(),
            prefix: prefix.to_string(),
            offset,
            stride: stride.max(1),
            max_items: max_items.max(1),
            stripe: 0,
            nb_items: 0,
            encoder: None,
            written: Vec::new(),
        }
    }

    fn current_path(&self) -> PathBuf {
        self.dst.join(shard_name(
            &self.prefix,
            self.stripe * self.stride + self.offset,
        ))
    }

    fn create_next_file(&mut self) -> Result<(), Error> {
        let path = self.current_path();
        debug!("creating shard {:?}", path);
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(Error::Writer)?;
        self.encoder = Some(GzEncoder::new(BufWriter::new(file), Compression::default()));
        self.written.push(path);
        Ok(())
    }

    /// Finish the gzip stream, flush and close the current file.
    fn close_file(&mut self) -> Result<(), Error> {
        if let Some(encoder) = self.encoder.take() {
            let mut inner = encoder.finish().map_err(Error::Writer)?;
            inner.flush().map_err(Error::Writer)?;
        }
        Ok(())
    }

    /// Write a single document, rotating if needed.
    pub fn write(&mut self, doc: &Document) -> Result<(), Error> {
        let mut line = serde_json::to_vec(doc)?;
        line.push(b'\n');

        if self.encoder.is_none() {
            self.create_next_file()?;
        }
        if let Some(encoder) = &mut self.encoder {
            encoder.write_all(&line).map_err(Error::Writer)?;
        }
        self.nb_items += 1;

        if self.nb_items == self.max_items {
            self.close_file()?;
            info!(
                "{:?}: shard complete ({} documents)",
                self.current_path(),
                self.nb_items
            );
            self.stripe += 1;
            self.nb_items = 0;
            self.create_next_file()?;
        }

        Ok(())
    }

    /// Close the current shard, even if it holds no document.
    pub fn finish(mut self) -> Result<Vec<PathBuf>, Error> {
        self.close_file()?;
        Ok(self.written)
    }

    /// Shards created so far.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}
