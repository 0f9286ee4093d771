/*! Data sources

- [download]: blocking HTTP fetching of remote files.
- [commoncrawl]: Common Crawl paths listings and WARC segments.
!*/
pub mod commoncrawl;
pub mod download;
