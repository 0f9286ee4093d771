/*! WARC segment parsing.

Common Crawl WARC segments hold, for each fetched page, a `request`, a `response` and a `metadata` record.
[Pages] pairs each `response` with the `metadata` record that follows it:

- `WARC-Record-ID`, `WARC-Target-URI` and `WARC-Date` become the document's id, url and timestamp,
- the HTTP body (without HTTP headers) becomes the content, decoded lossily as UTF-8,
- the `languages-cld2` line of the metadata record gives the languages when the detection is reliable.

A page with a metadata record always has languages, possibly none when cld2 was not reliable.
A page whose metadata record is missing is still yielded, with no languages at all.
!*/
use std::io::{BufRead, BufReader};

use bytes::{Buf, Bytes};
use flate2::read::MultiGzDecoder;
use log::debug;
use serde::Deserialize;
use warc::{BufferedBody, Record, RecordIter, RecordType, WarcHeader, WarcReader};

use crate::document::Document;
use crate::error::Error;

const CONTENT_LANGUAGE: &str = "languages-cld2:";

#[derive(Debug, Deserialize)]
struct Cld2 {
    #[serde(default)]
    reliable: bool,
    #[serde(default)]
    languages: Vec<Cld2Language>,
}

#[derive(Debug, Deserialize)]
struct Cld2Language {
    code: Option<String>,
}

/// Get the language codes from a metadata record body.
///
/// Empty if there's no reliable detection with at least one code.
pub fn parse_metadata(body: &[u8]) -> Vec<String> {
    let body = String::from_utf8_lossy(body);
    for line in body.lines().filter_map(|l| l.strip_prefix(CONTENT_LANGUAGE)) {
        let cld2: Cld2 = match serde_json::from_str(line.trim()) {
            Ok(cld2) => cld2,
            Err(e) => {
                debug!("invalid {} line: {}", CONTENT_LANGUAGE, e);
                continue;
            }
        };
        if !cld2.reliable {
            continue;
        }

        let codes: Vec<String> = cld2.languages.into_iter().filter_map(|l| l.code).collect();
        if !codes.is_empty() {
            return codes;
        }
    }
    Vec::new()
}

/// Strip the HTTP status line and headers from a response payload.
pub fn http_body(payload: &[u8]) -> &[u8] {
    let crlf = payload.windows(4).position(|w| w == b"\r\n\r\n").map(|p| p + 4);
    let lf = || payload.windows(2).position(|w| w == b"\n\n").map(|p| p + 2);
    match crlf.or_else(lf) {
        Some(start) => &payload[start..],
        None => payload,
    }
}

fn page_from_response(record: &Record<BufferedBody>) -> Document {
    let header = |h: WarcHeader| record.header(h).map(|v| v.to_string());
    let mut doc = Document::with_headers(
        header(WarcHeader::RecordID),
        header(WarcHeader::TargetURI),
        header(WarcHeader::Date),
    );
    doc.set_content(String::from_utf8_lossy(http_body(record.body())).into_owned());
    doc
}

/// Iterator over the pages of a WARC segment.
pub struct Pages<R: BufRead> {
    records: RecordIter<R>,
    pending: Option<Document>,
}

/// Pages of a downloaded gzipped segment.
impl Pages<BufReader<MultiGzDecoder<bytes::buf::Reader<Bytes>>>> {
    pub fn from_bytes(body: Bytes) -> Self {
        Self::new(BufReader::new(MultiGzDecoder::new(body.reader())))
    }
}

impl<R: BufRead> Pages<R> {
    pub fn new(reader: R) -> Self {
        Self {
            records: WarcReader::new(reader).iter_records(),
            pending: None,
        }
    }
}

impl<R: BufRead> Iterator for Pages<R> {
    type Item = Result<Document, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let record = match self.records.next() {
                Some(Ok(record)) => record,
                Some(Err(e)) => return Some(Err(e.into())),
                None => return self.pending.take().map(Ok),
            };

            match record.warc_type() {
                RecordType::Response => {
                    let page = page_from_response(&record);
                    if let Some(previous) = self.pending.replace(page) {
                        return Some(Ok(previous));
                    }
                }
                RecordType::Metadata => {
                    if let Some(mut page) = self.pending.take() {
                        page.set_languages(parse_metadata(record.body()));
                        return Some(Ok(page));
                    }
                }
                _ => (),
            }
        }
    }
}
