/*! Completion ledger.

An append-only text file with one `identity<TAB>SUCCESS|FAILED` line per processed input.
An input with at least one `SUCCESS` line is considered done, `FAILED` inputs are retried on the next run.
!*/
use std::collections::HashSet;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::warn;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Success,
    Failed,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => write!(f, "SUCCESS"),
            Outcome::Failed => write!(f, "FAILED"),
        }
    }
}

impl FromStr for Outcome {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUCCESS" => Ok(Outcome::Success),
            "FAILED" => Ok(Outcome::Failed),
            other => Err(Error::Custom(format!("unknown outcome {other}"))),
        }
    }
}

/// Parse a single ledger line.
fn parse_line(line: &str) -> Option<(&str, Outcome)> {
    let (identity, outcome) = line.split_once('\t')?;
    Some((identity, outcome.trim_end_matches('\r').parse().ok()?))
}

/// Read every entry of the ledger, in order.
///
/// A missing ledger has no entries. Lines that can't be parsed are skipped with a warning.
pub fn entries(path: &Path) -> Result<Vec<(String, Outcome)>, Error> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut entries = Vec::new();
    for (nb, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        match parse_line(&line) {
            Some((identity, outcome)) => entries.push((identity.to_string(), outcome)),
            None => warn!("{:?}:{}: ignoring malformed ledger line {:?}", path, nb + 1, line),
        }
    }
    Ok(entries)
}

/// Identities that have been successfully processed.
pub fn completed(path: &Path) -> Result<HashSet<String>, Error> {
    Ok(entries(path)?
        .into_iter()
        .filter(|(_, outcome)| *outcome == Outcome::Success)
        .map(|(identity, _)| identity)
        .collect())
}

/// Append-only ledger handle.
///
/// Each entry is written as one whole line and flushed immediately.
#[derive(Debug)]
pub struct LedgerWriter {
    path: PathBuf,
    file: File,
}

impl LedgerWriter {
    /// Open (or create) the ledger at `path` for appending.
    pub fn open(path: &Path) -> Result<Self, Error> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append an entry.
    ///
    /// # Errors
    /// Identities holding a tab or a newline can't be stored and are refused.
    pub fn append(&mut self, identity: &str, outcome: Outcome) -> Result<(), Error> {
        if identity.contains(['\t', '\n', '\r']) {
            return Err(Error::Custom(format!(
                "invalid ledger identity {identity:?}"
            )));
        }
        let line = format!("{identity}\t{outcome}\n");
        self.file.write_all(line.as_bytes())?;
        self.file.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{completed, entries, LedgerWriter, Outcome};

    #[test]
    fn missing_ledger() {
        assert!(completed(Path::new("does/not/exist.paths")).unwrap().is_empty());
    }

    #[test]
    fn outcome_str() {
        assert_eq!(Outcome::Success.to_string(), "SUCCESS");
        assert_eq!("FAILED".parse::<Outcome>().unwrap(), Outcome::Failed);
        assert!("success".parse::<Outcome>().is_err());
    }

    #[test]
    fn append_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("completed.paths");

        let mut ledger = LedgerWriter::open(&path).unwrap();
        ledger.append("a", Outcome::Failed).unwrap();
        ledger.append("b", Outcome::Success).unwrap();
        drop(ledger);

        // reopening appends
        let mut ledger = LedgerWriter::open(&path).unwrap();
        ledger.append("a", Outcome::Success).unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "a\tFAILED\nb\tSUCCESS\na\tSUCCESS\n"
        );
        let done = completed(&path).unwrap();
        assert_eq!(done.len(), 2);
        assert!(done.contains("a") && done.contains("b"));
    }

    #[test]
    fn failed_is_not_done() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("completed.paths");
        std::fs::write(&path, "a\tFAILED\nb\tSUCCESS\n").unwrap();
        let done = completed(&path).unwrap();
        assert!(!done.contains("a"));
        assert!(done.contains("b"));
    }

    #[test_log::test]
    fn malformed_lines_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("completed.paths");
        std::fs::write(&path, "a\tSUCCESS\ngarbage\nb\tMAYBE\n\nc\tSUCCESS\r\n").unwrap();
        let e = entries(&path).unwrap();
        assert_eq!(
            e,
            vec![
                ("a".to_string(), Outcome::Success),
                ("c".to_string(), Outcome::Success)
            ]
        );
    }

    #[test]
    fn invalid_identity() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("completed.paths");
        let mut ledger = LedgerWriter::open(&path).unwrap();
        assert!(ledger.append("a\tb", Outcome::Success).is_err());
        assert!(ledger.append("a\nb", Outcome::Success).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }
}
