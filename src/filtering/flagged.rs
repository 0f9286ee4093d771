//! Flagged words gate.
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::debug;

use crate::error::Error;
use crate::filtering::Filter;

/// Drops text where flagged words occur more than `max_occurrences` times in total.
///
/// Occurrences are non-overlapping substring matches, so the list works
/// for languages that are not whitespace-separated.
#[derive(Debug, Clone)]
pub struct FlaggedWords {
    words: Vec<String>,
    max_occurrences: usize,
}

impl FlaggedWords {
    /// Build from a list of words. Words are trimmed, empty ones dropped.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_string())
            .filter(|w| !w.is_empty())
            .collect();
        Self {
            words,
            ..Default::default()
        }
    }

    /// Load a word list, one word per line.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let reader = BufReader::new(File::open(path)?);
        let words = reader.lines().collect::<Result<Vec<_>, _>>()?;
        let flagged = Self::new(words);
        debug!("loaded {} flagged words from {:?}", flagged.len(), path);
        Ok(flagged)
    }

    pub fn with_max_occurrences(mut self, max_occurrences: usize) -> Self {
        self.max_occurrences = max_occurrences;
        self
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Count occurrences, stopping as soon as the maximum is exceeded.
    pub fn count(&self, text: &str) -> usize {
        let mut total = 0;
        for word in &self.words {
            total += text.matches(word.as_str()).count();
            if total > self.max_occurrences {
                break;
            }
        }
        total
    }
}

impl Default for FlaggedWords {
    /// Empty list, 3 occurrences tolerated.
    fn default() -> Self {
        Self {
            words: Vec::new(),
            max_occurrences: 3,
        }
    }
}

impl Filter<&str> for FlaggedWords {
    fn detect(&self, text: &str) -> bool {
        self.count(text) <= self.max_occurrences
    }
}
