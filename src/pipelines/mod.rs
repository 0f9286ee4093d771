//! Pipelines.
//!
//! A [Processor] runs one [Stage] over many inputs, in parallel and resumably.
//! The module also provides a light [Pipeline] trait for runnable pipelines.
//!
//! Shipped stages:
//!
//! - [Fetch]: Common Crawl WARC segments to `raw_content` shards,
//! - [Extract]: `raw_content` shards to `text_content` shards,
//! - [Quality]: `text_content` shards to `filtered` shards.
mod extract;
mod fetch;
#[allow(clippy::module_inception)]
mod pipeline;
mod processor;
mod quality;
mod work_queue;

use std::path::Path;

pub use extract::Extract;
pub use fetch::Fetch;
pub use pipeline::Pipeline;
pub use processor::{Processor, ProcessorConfig, Sink, Stage, Summary, LEDGER_NAME};
pub use quality::Quality;
pub use work_queue::WorkQueue;

use crate::error::Error;

/// Names of the `*.gz` files in `src`, sorted.
///
/// Names are relative to `src` so that ledgers stay valid if the folder is moved.
pub fn shard_names(src: &Path) -> Result<Vec<String>, Error> {
    let pattern = src.join("*.gz");
    let pattern = pattern
        .to_str()
        .ok_or_else(|| Error::Custom(format!("non utf-8 path: {src:?}")))?;

    let mut names = Vec::new();
    for path in glob::glob(pattern)? {
        let path = path?;
        if !path.is_file() {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}
