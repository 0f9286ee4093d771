//! Blocking HTTP downloads.
use std::time::Duration;

use bytes::Bytes;
use log::debug;
use reqwest::blocking::Client;
use reqwest::Url;

use crate::error::Error;

/// Holds the http client that will make the requests.
///
/// The client is cheap to clone and can be shared between threads.
#[derive(Debug, Clone)]
pub struct Downloader {
    client: Client,
}

impl Downloader {
    /// Build a downloader. `timeout` covers a whole request, body included.
    pub fn new(timeout: Duration) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    /// Fetch the whole body at `url`.
    ///
    /// # Errors
    /// Non-success statuses are reported as [Error::Fetch],
    /// network failures as [Error::Reqwest].
    pub fn fetch(&self, url: &Url) -> Result<Bytes, Error> {
        debug!("downloading {}", url);
        let response = self.client.get(url.clone()).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Fetch {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.bytes()?;
        debug!("downloaded {} ({} bytes)", url, body.len());
        Ok(body)
    }
}
