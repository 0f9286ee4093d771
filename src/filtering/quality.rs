/*! Document quality filter.

A cascade of repetition heuristics over a document's lines and word n-grams.
Checks are run in a fixed order and the first failing one decides the [Reason]:

1. length bounds, in unicode scalar values,
2. duplicate line and duplicate line-character ratios,
3. character fraction of the most frequent 2/3/4-gram (counted within lines),
4. character fraction of tokens covered by repeated 5..10-grams (over the whole document).

Every ratio is compared with a strict `>`.
!*/
use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::filtering::lines::LineStats;
use crate::filtering::ngram::{self, NgramCounts};
use crate::filtering::Filter;
use crate::tokenizer::{Tokenizer, WordBounds};

/// Thresholds of the quality filter.
///
/// Missing keys fall back to their default when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    pub min_chars: usize,
    pub max_chars: usize,
    pub dup_line_ratio: f64,
    pub dup_char_ratio: f64,
    /// `(n, threshold)` for the most frequent n-gram check.
    pub top_ngrams: Vec<(usize, f64)>,
    /// `(n, threshold)` for the repeated overlapping n-gram check.
    pub dup_ngrams: Vec<(usize, f64)>,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            min_chars: 100,
            max_chars: 100_000,
            dup_line_ratio: 0.3,
            dup_char_ratio: 0.3,
            top_ngrams: vec![(2, 0.20), (3, 0.18), (4, 0.16)],
            dup_ngrams: vec![
                (5, 0.15),
                (6, 0.14),
                (7, 0.13),
                (8, 0.12),
                (9, 0.11),
                (10, 0.10),
            ],
        }
    }
}

impl QualityConfig {
    /// Refuse n-gram orders of 0.
    pub fn validate(&self) -> Result<(), Error> {
        for (key, pairs) in [("top_ngrams", &self.top_ngrams), ("dup_ngrams", &self.dup_ngrams)] {
            if pairs.iter().any(|(n, _)| *n == 0) {
                return Err(Error::Custom(format!(
                    "{key}: n-gram order must be positive"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reason {
    TooShortOrTooLong,
    /// No line or no token to compute ratios on.
    EmptyContent,
    DuplicateLines,
    RepeatedNgram(usize),
    RepeatedOverlapNgram(usize),
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::TooShortOrTooLong => write!(f, "too short or too long"),
            Reason::EmptyContent => write!(f, "empty content"),
            Reason::DuplicateLines => write!(f, "duplicate lines"),
            Reason::RepeatedNgram(n) => write!(f, "repeated {n}-gram"),
            Reason::RepeatedOverlapNgram(n) => write!(f, "repeated overlapping {n}-grams"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Reject(Reason),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accept)
    }
}

/// Quality filter, generic over the word segmenter.
#[derive(Debug, Default, Clone)]
pub struct QualityFilter<T = WordBounds> {
    config: QualityConfig,
    tokenizer: T,
}

impl QualityFilter<WordBounds> {
    pub fn with_config(config: QualityConfig) -> Result<Self, Error> {
        Self::new(config, WordBounds)
    }
}

impl<T: Tokenizer> QualityFilter<T> {
    /// Fails if `config` does not [validate](QualityConfig::validate).
    pub fn new(config: QualityConfig, tokenizer: T) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self { config, tokenizer })
    }

    pub fn config(&self) -> &QualityConfig {
        &self.config
    }

    /// Run the checks on `content`, stopping at the first failing one.
    pub fn evaluate(&self, content: &str) -> Verdict {
        match self.check(content) {
            Ok(()) => Verdict::Accept,
            Err(reason) => Verdict::Reject(reason),
        }
    }

    fn check(&self, content: &str) -> Result<(), Reason> {
        let length = content.chars().count();
        if length < self.config.min_chars || length > self.config.max_chars {
            return Err(Reason::TooShortOrTooLong);
        }

        let stats = LineStats::new(content);
        let (line_ratio, char_ratio) = stats
            .dup_line_ratio()
            .zip(stats.dup_char_ratio())
            .ok_or(Reason::EmptyContent)?;
        if line_ratio > self.config.dup_line_ratio || char_ratio > self.config.dup_char_ratio {
            return Err(Reason::DuplicateLines);
        }

        let (tokens, ranges) = self.tokenize(content);
        let lengths: Vec<usize> = tokens.iter().map(|t| t.chars().count()).collect();
        let n_chars_tok: usize = lengths.iter().sum();
        if n_chars_tok == 0 {
            return Err(Reason::EmptyContent);
        }
        let n_chars_tok = n_chars_tok as f64;

        for &(n, threshold) in &self.config.top_ngrams {
            let mut counts = NgramCounts::new(n);
            for range in &ranges {
                counts.add(&tokens[range.clone()], range.start);
            }

            if let Some((top, occurrences)) = counts.most_common() {
                let chars: usize = top.iter().map(|t| t.chars().count()).sum();
                if (chars * occurrences) as f64 / n_chars_tok > threshold {
                    return Err(Reason::RepeatedNgram(n));
                }
            }
        }

        for &(n, threshold) in &self.config.dup_ngrams {
            let masked: usize = ngram::overlap_mask(&tokens, n)
                .into_iter()
                .zip(&lengths)
                .filter_map(|(masked, len)| masked.then_some(*len))
                .sum();
            if masked as f64 / n_chars_tok > threshold {
                return Err(Reason::RepeatedOverlapNgram(n));
            }
        }

        Ok(())
    }

    /// Tokens of every non-empty trimmed line, concatenated,
    /// along with the token range of each line.
    fn tokenize<'a>(&self, content: &'a str) -> (Vec<&'a str>, Vec<Range<usize>>) {
        let mut tokens = Vec::new();
        let mut ranges = Vec::new();
        for line in content.split('\n').map(str::trim).filter(|l| !l.is_empty()) {
            let start = tokens.len();
            tokens.extend(self.tokenizer.segment(line));
            ranges.push(start..tokens.len());
        }
        (tokens, ranges)
    }
}

impl<T: Tokenizer + Default> Filter<&str> for QualityFilter<T> {
    fn detect(&self, content: &str) -> bool {
        self.evaluate(content).is_accepted()
    }
}
