//! gzip JSON lines document reader.
use std::fs::File;
use std::io::{BufRead, BufReader, Split};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;

use crate::document::Document;
use crate::error::Error;

/// Iterates over the documents of a shard, one line at a time.
///
/// Lines that can't be deserialized yield [Error::MalformedRecord] and reading continues.
/// Read or decompression failures yield [Error::Io] and end the iteration.
#[derive(Debug)]
pub struct ShardReader {
    path: PathBuf,
    lines: Split<BufReader<MultiGzDecoder<File>>>,
    line: usize,
    broken: bool,
}

impl ShardReader {
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        Ok(Self {
            path: path.to_path_buf(),
            lines: Self::open(path)?,
            line: 0,
            broken: false,
        })
    }

    fn open(path: &Path) -> Result<Split<BufReader<MultiGzDecoder<File>>>, Error> {
        let file = File::open(path)?;
        Ok(BufReader::new(MultiGzDecoder::new(file)).split(b'\n'))
    }

    /// Start again from the first document.
    pub fn restart(&mut self) -> Result<(), Error> {
        self.lines = Self::open(&self.path)?;
        self.line = 0;
        self.broken = false;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of lines read so far.
    pub fn line(&self) -> usize {
        self.line
    }
}

impl Iterator for ShardReader {
    type Item = Result<Document, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.broken {
            return None;
        }

        loop {
            match self.lines.next()? {
                Ok(line) => {
                    self.line += 1;
                    if line.iter().all(u8::is_ascii_whitespace) {
                        continue;
                    }
                    return Some(serde_json::from_slice(&line).map_err(Error::MalformedRecord));
                }
                Err(e) => {
                    self.broken = true;
                    return Some(Err(Error::Io(e)));
                }
            }
        }
    }
}
