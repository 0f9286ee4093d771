/*! # cc-sieve

Quality filtering and resumable processing of Common Crawl text corpora.

The crate can be used as a tool (see the `cc-sieve` binary) or as a library:

- [sources] downloads segment listings and WARC segments,
- [extract] and [identifiers] turn html pages into text in known languages,
- [filtering] decides which documents are worth keeping,
- [io] reads and writes gzip JSON lines shards, and keeps completion ledgers,
- [pipelines] runs all of the above over many inputs, in parallel and resumably.
!*/
pub mod document;
pub mod error;
pub mod extract;
pub mod filtering;
pub mod identifiers;
pub mod io;
pub mod pipelines;
pub mod processing;
pub mod sources;
pub mod tokenizer;
