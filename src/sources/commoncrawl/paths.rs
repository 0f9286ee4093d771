//! Segment listings.
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use bytes::Buf;
use flate2::read::MultiGzDecoder;
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use reqwest::Url;

use crate::error::Error;
use crate::sources::download::Downloader;

pub const CC_DOMAIN: &str = "https://data.commoncrawl.org/";

/// URL of a segment, from its path in a listing.
pub fn segment_url(path: &str) -> Result<Url, Error> {
    Ok(Url::parse(CC_DOMAIN)?.join(path.trim().trim_start_matches('/'))?)
}

/// URL of the `kind` (`warc`, `wet`, `wat`...) listing of `snapshot` (such as `CC-MAIN-2022-33`).
pub fn listing_url(snapshot: &str, kind: &str) -> Result<Url, Error> {
    Ok(Url::parse(CC_DOMAIN)?.join(&format!("crawl-data/{snapshot}/{kind}.paths.gz"))?)
}

/// Read a listing, one path per line. Blank lines are skipped.
pub fn read_paths<R: BufRead>(reader: R) -> Result<Vec<String>, Error> {
    let mut paths = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if !line.is_empty() {
            paths.push(line.to_string());
        }
    }
    Ok(paths)
}

/// Read a plain text listing from disk.
pub fn from_path(path: &Path) -> Result<Vec<String>, Error> {
    read_paths(BufReader::new(File::open(path)?))
}

/// Keep each path with probability `ratio`.
///
/// The sample only depends on `seed` and on the listing order.
pub fn sample(paths: Vec<String>, ratio: f64, seed: u64) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(seed);
    paths
        .into_iter()
        .filter(|_| rng.gen::<f64>() <= ratio)
        .collect()
}

/// Download the listing of `snapshot`, sample it and save it to `dst`.
///
/// Returns the number of kept paths.
pub fn download(
    downloader: &Downloader,
    snapshot: &str,
    kind: &str,
    ratio: f64,
    seed: u64,
    dst: &Path,
) -> Result<usize, Error> {
    let url = listing_url(snapshot, kind)?;
    let body = downloader.fetch(&url)?;
    let paths = read_paths(BufReader::new(MultiGzDecoder::new(body.reader())))?;
    let total = paths.len();

    let kept = sample(paths, ratio, seed);
    let mut out = BufWriter::new(File::create(dst)?);
    for path in &kept {
        writeln!(out, "{path}")?;
    }
    out.flush()?;

    info!(
        "{snapshot}: kept {}/{} {kind} segments, saved to {:?}",
        kept.len(),
        total,
        dst
    );
    Ok(kept.len())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::{listing_url, read_paths, sample, segment_url};

    #[test]
    fn urls() {
        assert_eq!(
            segment_url("crawl-data/CC-MAIN-2022-33/segments/1/warc/a.warc.gz\n")
                .unwrap()
                .as_str(),
            "https://data.commoncrawl.org/crawl-data/CC-MAIN-2022-33/segments/1/warc/a.warc.gz"
        );
        assert_eq!(
            listing_url("CC-MAIN-2022-33", "warc").unwrap().as_str(),
            "https://data.commoncrawl.org/crawl-data/CC-MAIN-2022-33/warc.paths.gz"
        );
    }

    #[test]
    fn read() {
        let listing = Cursor::new("a/b.gz\n\n  c/d.gz \n");
        assert_eq!(read_paths(listing).unwrap(), vec!["a/b.gz", "c/d.gz"]);
    }

    #[test]
    fn sampling() {
        let paths: Vec<String> = (0..1000).map(|i| format!("p{i}")).collect();

        assert_eq!(sample(paths.clone(), 1.0, 42).len(), 1000);
        assert!(sample(paths.clone(), 0.0, 42).len() < 5);

        let a = sample(paths.clone(), 0.2, 42);
        let b = sample(paths.clone(), 0.2, 42);
        assert_eq!(a, b);
        assert!(a.len() > 100 && a.len() < 300);

        // sample keeps listing order
        let positions: Vec<usize> = a
            .iter()
            .map(|p| paths.iter().position(|q| q == p).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }
}
