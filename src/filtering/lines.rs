//! Line/paragraph repetition statistics.
use std::collections::HashMap;
use std::hash::BuildHasherDefault;

use twox_hash::XxHash64;

/// Repetition counts over the non-empty, trimmed lines of a text.
///
/// Lengths are in unicode scalar values.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LineStats {
    pub lines: usize,
    pub chars: usize,
    /// Total occurrences of lines that appear more than once.
    pub dup_lines: usize,
    /// Total length of every occurrence of lines that appear more than once.
    pub dup_chars: usize,
}

impl LineStats {
    pub fn new(text: &str) -> Self {
        let mut counter: HashMap<&str, usize, BuildHasherDefault<XxHash64>> = HashMap::default();
        let mut stats = Self::default();

        for line in text.split('\n').map(str::trim).filter(|l| !l.is_empty()) {
            *counter.entry(line).or_default() += 1;
            stats.lines += 1;
            stats.chars += line.chars().count();
        }

        for (line, n) in counter.into_iter().filter(|(_, n)| *n > 1) {
            stats.dup_lines += n;
            stats.dup_chars += line.chars().count() * n;
        }

        stats
    }

    /// `None` when there are no lines.
    pub fn dup_line_ratio(&self) -> Option<f64> {
        (self.lines > 0).then(|| self.dup_lines as f64 / self.lines as f64)
    }

    /// `None` when there are no characters.
    pub fn dup_char_ratio(&self) -> Option<f64> {
        (self.chars > 0).then(|| self.dup_chars as f64 / self.chars as f64)
    }
}
