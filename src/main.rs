//! # cc-sieve
//!
//! Builds a filtered text corpus out of a Common Crawl snapshot, in resumable steps:
//!
//! ```sh
//! cc-sieve paths CC-MAIN-2022-33 warc.paths --ratio 0.01
//! cc-sieve download warc.paths raw/ --lid-path lid.176.bin
//! cc-sieve collect raw/ raw_complete/
//! cc-sieve extract raw_complete/ text/
//! cc-sieve filter text/ filtered/
//! ```
//!
//! Every processing step writes a `completed.paths` ledger in its destination:
//! running the same command again only processes what is left.
use std::fs::File;
use std::io::BufReader;
use std::time::Duration;

use cc_sieve::error::Error;
use cc_sieve::extract::MainContent;
use cc_sieve::filtering::{FlaggedWords, LanguageFilter, QualityConfig, QualityFilter};
use cc_sieve::identifiers::FastTextBuilder;
use cc_sieve::pipelines::{self, Extract, Fetch, Pipeline, Processor, ProcessorConfig, Quality, Stage};
use cc_sieve::processing;
use cc_sieve::sources::commoncrawl::paths;
use cc_sieve::sources::download::Downloader;
use log::{debug, info};
use structopt::StructOpt;

mod cli;

/// Default shard size of the extract step, where documents are much smaller.
const TEXT_MAX_ITEMS: usize = 1_000_000;

fn processor_config(run: &cli::Run, default_max_items: usize) -> ProcessorConfig {
    let default = ProcessorConfig::default();
    ProcessorConfig {
        workers: run.workers.unwrap_or(default.workers),
        writers: run.writers,
        max_items: run.max_items.unwrap_or(default_max_items),
        capacity: run.capacity,
    }
}

fn process<S: Stage>(
    stage: S,
    inputs: Vec<String>,
    dst: &std::path::Path,
    run: &cli::Run,
    default_max_items: usize,
) -> Result<(), Error> {
    let mut processor =
        Processor::new(stage, inputs, dst).with_config(processor_config(run, default_max_items));
    if let Some(ledger) = &run.ledger {
        processor = processor.with_ledger(ledger);
    }
    let summary = processor.run()?;
    if summary.failed > 0 {
        info!("{} inputs failed, run the command again to retry them", summary.failed);
    }
    Ok(())
}

fn main() -> Result<(), Error> {
    env_logger::init();

    let opt = cli::CcSieve::from_args();
    debug!("cli args\n{:#?}", opt);

    match opt {
        cli::CcSieve::Paths(p) => {
            let downloader = Downloader::new(Duration::from_secs(600))?;
            paths::download(&downloader, &p.snapshot, &p.kind, p.ratio, p.seed, &p.dst)?;
        }

        cli::CcSieve::Download(d) => {
            let inputs = paths::from_path(&d.paths_file)?;
            let identifier = FastTextBuilder::default()
                .path(&d.lid_path)
                .threshold(d.lid_threshold)
                .build()?;
            let mut stage = Fetch::new(Downloader::new(Duration::from_secs(d.timeout))?, identifier)
                .with_languages(LanguageFilter::new(d.langs.clone(), Vec::new()));
            if let Some(flagged) = &d.flagged_words {
                stage = stage.with_flagged_words(FlaggedWords::from_path(flagged)?);
            }
            process(stage, inputs, &d.dst, &d.run, ProcessorConfig::default().max_items)?;
        }

        cli::CcSieve::Collect(c) => {
            processing::collect(&c.src, &c.dst, &c.prefix, c.writers)?;
        }

        cli::CcSieve::Extract(e) => {
            let inputs = pipelines::shard_names(&e.src)?;
            let stage = Extract::new(&e.src, MainContent::new()?)
                .with_languages(LanguageFilter::new(e.langs.clone(), e.exclude.clone()));
            process(stage, inputs, &e.dst, &e.run, TEXT_MAX_ITEMS)?;
        }

        cli::CcSieve::Filter(f) => {
            let config: QualityConfig = match &f.config {
                Some(path) => serde_json::from_reader(BufReader::new(File::open(path)?))?,
                None => QualityConfig::default(),
            };
            config.validate()?;
            debug!("quality filter config: {:?}", config);
            let inputs = pipelines::shard_names(&f.src)?;
            let stage = Quality::new(&f.src, QualityFilter::with_config(config)?);
            process(stage, inputs, &f.dst, &f.run, ProcessorConfig::default().max_items)?;
        }
    };
    Ok(())
}
