//! Error enum
use std::fmt;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Serde(serde_json::Error),
    Warc(warc::Error),
    Reqwest(reqwest::Error),
    Glob(glob::GlobError),
    GlobPattern(glob::PatternError),
    Url(url::ParseError),
    FastText(String),

    /// A single record could not be deserialized.
    MalformedRecord(serde_json::Error),
    /// Article extraction failed on a record.
    Extraction(String),
    /// Language identification failed on a record.
    LanguageDetection(String),
    /// A remote input could not be fetched (non-success HTTP status).
    Fetch { url: String, status: u16 },
    /// Output shard could not be written. Halts the run.
    Writer(std::io::Error),
    /// The run is halting and no longer accepts documents.
    Halted,
    Custom(String),
}

impl Error {
    /// Record-level errors are skipped by stages, the rest fail the whole input.
    pub fn is_record_level(&self) -> bool {
        matches!(
            self,
            Error::MalformedRecord(_) | Error::Extraction(_) | Error::LanguageDetection(_)
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "io error: {e}"),
            Error::Serde(e) => write!(f, "serialization error: {e}"),
            Error::Warc(e) => write!(f, "warc error: {e:?}"),
            Error::Reqwest(e) => write!(f, "http error: {e}"),
            Error::Glob(e) => write!(f, "glob error: {e}"),
            Error::GlobPattern(e) => write!(f, "glob pattern error: {e}"),
            Error::Url(e) => write!(f, "url error: {e}"),
            Error::FastText(e) => write!(f, "fasttext error: {e}"),
            Error::MalformedRecord(e) => write!(f, "malformed record: {e}"),
            Error::Extraction(e) => write!(f, "extraction failed: {e}"),
            Error::LanguageDetection(e) => write!(f, "language detection failed: {e}"),
            Error::Fetch { url, status } => write!(f, "could not fetch {url}: HTTP {status}"),
            Error::Writer(e) => write!(f, "writer failure: {e}"),
            Error::Halted => write!(f, "run is halting"),
            Error::Custom(s) => write!(f, "{s}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Error {
        Error::Serde(e)
    }
}

impl From<warc::Error> for Error {
    fn from(e: warc::Error) -> Error {
        Error::Warc(e)
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Error {
        Error::Reqwest(e)
    }
}

impl From<glob::GlobError> for Error {
    fn from(e: glob::GlobError) -> Error {
        Error::Glob(e)
    }
}

impl From<glob::PatternError> for Error {
    fn from(e: glob::PatternError) -> Error {
        Error::GlobPattern(e)
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Error {
        Error::Url(e)
    }
}

impl From<String> for Error {
    fn from(s: String) -> Error {
        Error::Custom(s)
    }
}
