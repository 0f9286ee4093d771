/*! Word n-gram counting.

N-grams are borrowed slices of a document's token sequence, so counting never copies tokens.
Tables use xxHash, which is both fast and deterministic across runs.

```
use cc_sieve::filtering::ngram;

let tokens = ["a", "b", "a", "b", "c"];
let counts = ngram::count(&tokens, 2);
assert_eq!(counts.get(&["a", "b"]), 2);
assert_eq!(counts.most_common(), Some((&["a", "b"][..], 2)));

let mask = ngram::overlap_mask(&tokens, 2);
assert_eq!(mask, vec![false, false, true, true, false]);
```
!*/
use std::collections::{HashMap, HashSet};
use std::hash::BuildHasherDefault;

use twox_hash::XxHash64;

type Table<'a> = HashMap<&'a [&'a str], Entry, BuildHasherDefault<XxHash64>>;

#[derive(Debug, Clone, Copy)]
struct Entry {
    count: usize,
    first: usize,
}

/// Frequency table for a single n-gram order.
#[derive(Debug)]
pub struct NgramCounts<'a> {
    order: usize,
    table: Table<'a>,
}

impl<'a> NgramCounts<'a> {
    pub fn new(order: usize) -> Self {
        assert!(order > 0, "n-gram order must be positive");
        Self {
            order,
            table: Table::default(),
        }
    }

    /// Count every window of `tokens`.
    ///
    /// `offset` is the position of `tokens[0]` in the whole document,
    /// and is used to break ties between equally frequent n-grams.
    pub fn add(&mut self, tokens: &'a [&'a str], offset: usize) {
        for (idx, window) in tokens.windows(self.order).enumerate() {
            self.table
                .entry(window)
                .and_modify(|e| {
                    e.count += 1;
                    e.first = e.first.min(offset + idx);
                })
                .or_insert(Entry {
                    count: 1,
                    first: offset + idx,
                });
        }
    }

    /// number of distinct n-grams.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Occurrences of `ngram`, 0 if unseen.
    pub fn get(&self, ngram: &[&str]) -> usize {
        self.table.get(ngram).map_or(0, |e| e.count)
    }

    /// Most frequent n-gram and its count.
    ///
    /// Ties are won by the n-gram that appeared first.
    pub fn most_common(&self) -> Option<(&'a [&'a str], usize)> {
        self.table
            .iter()
            .max_by(|(_, a), (_, b)| a.count.cmp(&b.count).then(b.first.cmp(&a.first)))
            .map(|(ngram, e)| (*ngram, e.count))
    }

    /// Iterate over `(ngram, count)` pairs, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a [&'a str], usize)> + '_ {
        self.table.iter().map(|(ngram, e)| (*ngram, e.count))
    }
}

/// Count all n-grams of order `n` in `tokens`.
pub fn count<'a>(tokens: &'a [&'a str], n: usize) -> NgramCounts<'a> {
    let mut counts = NgramCounts::new(n);
    counts.add(tokens, 0);
    counts
}

/// Mark tokens covered by a repeated n-gram.
///
/// Windows are scanned left to right. When a window has already been seen,
/// its `n` positions are marked. The first occurrence of an n-gram is not marked.
pub fn overlap_mask(tokens: &[&str], n: usize) -> Vec<bool> {
    assert!(n > 0, "n-gram order must be positive");
    let mut mask = vec![false; tokens.len()];
    let mut seen: HashSet<&[&str], BuildHasherDefault<XxHash64>> = HashSet::default();

    for (idx, window) in tokens.windows(n).enumerate() {
        if !seen.insert(window) {
            mask[idx..idx + n].iter_mut().for_each(|m| *m = true);
        }
    }

    mask
}
