/*! Common Crawl

Common Crawl publishes each snapshot as a list of segment paths (`warc.paths.gz`, `wet.paths.gz`...),
each path pointing to a gzipped WARC file under [paths::CC_DOMAIN].

- [paths]: listing download and sampling.
- [segment]: WARC segment parsing into [crate::document::Document]s.
!*/
pub mod paths;
pub mod segment;

pub use segment::Pages;
