/*! Filtering utilities

Filters operate on document content or on document metadata.

Every filter implements [filter::Filter]: a pure, stateless detection where `true` means *keep*.
The [quality::QualityFilter] additionally reports *why* a document is rejected through a [quality::Verdict].

- [quality::QualityFilter]: line repetition and n-gram repetition heuristics.
- [language::LanguageFilter]: keeps documents in wanted languages.
- [flagged::FlaggedWords]: drops documents containing too many flagged words.
!*/
mod filter;
pub mod flagged;
pub mod language;
pub mod lines;
pub mod ngram;
pub mod quality;

pub use filter::Filter;
pub use flagged::FlaggedWords;
pub use language::LanguageFilter;
pub use quality::{QualityConfig, QualityFilter, Reason, Verdict};
