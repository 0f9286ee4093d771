//! Command line arguments and parameters management/parsing.
use std::path::PathBuf;

use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "cc-sieve",
    about = "Common Crawl downloading, extraction and quality filtering."
)]
/// Holds every command that is callable by the `cc-sieve` command.
pub enum CcSieve {
    #[structopt(about = "Download and sample a segment listing")]
    Paths(Paths),
    #[structopt(about = "Download segments and keep pages in wanted languages")]
    Download(Download),
    #[structopt(about = "Move complete raw shards out of a download folder")]
    Collect(Collect),
    #[structopt(about = "Extract main content from raw shards")]
    Extract(Extract),
    #[structopt(about = "Run the quality filter on text shards")]
    Filter(Filter),
}

#[derive(Debug, StructOpt)]
/// Processor tunables, shared by the processing commands.
pub struct Run {
    #[structopt(
        parse(from_os_str),
        long = "ledger",
        help = "completion ledger. Default is <dst>/completed.paths"
    )]
    pub ledger: Option<PathBuf>,
    #[structopt(short = "w", long = "workers", help = "number of worker threads. Default is the number of cores.")]
    pub workers: Option<usize>,
    #[structopt(long = "writers", default_value = "1", help = "number of writer threads")]
    pub writers: usize,
    #[structopt(long = "max-items", help = "documents per output shard")]
    pub max_items: Option<usize>,
    #[structopt(long = "capacity", default_value = "1024", help = "capacity of the document channel")]
    pub capacity: usize,
}

#[derive(Debug, StructOpt)]
/// Paths command and parameters.
///
/// ```sh
/// cc-sieve paths CC-MAIN-2022-33 warc.paths --ratio 0.01 --seed 42
/// ```
pub struct Paths {
    #[structopt(help = "snapshot name, such as CC-MAIN-2022-33")]
    pub snapshot: String,
    #[structopt(parse(from_os_str), help = "sampled listing destination")]
    pub dst: PathBuf,
    #[structopt(long = "kind", default_value = "warc", help = "listing kind (warc, wet, wat)")]
    pub kind: String,
    #[structopt(long = "ratio", default_value = "1.0", help = "fraction of segments to keep")]
    pub ratio: f64,
    #[structopt(long = "seed", default_value = "0", help = "sampling seed")]
    pub seed: u64,
}

#[derive(Debug, StructOpt)]
/// Download command and parameters.
pub struct Download {
    #[structopt(parse(from_os_str), help = "path to a warc.paths file")]
    pub paths_file: PathBuf,
    #[structopt(parse(from_os_str), help = "raw shards destination")]
    pub dst: PathBuf,
    #[structopt(flatten)]
    pub run: Run,
    #[structopt(
        parse(from_os_str),
        long = "lid-path",
        help = "Path to lid.176.bin",
        default_value = "lid.176.bin"
    )]
    pub lid_path: PathBuf,
    #[structopt(
        long = "lid-threshold",
        default_value = "0.8",
        help = "minimum probability of an identified language"
    )]
    pub lid_threshold: f32,
    #[structopt(parse(from_os_str), long = "flagged-words", help = "flagged words list, one per line")]
    pub flagged_words: Option<PathBuf>,
    #[structopt(
        long = "langs",
        default_value = "zh,en",
        use_delimiter = true,
        help = "wanted languages"
    )]
    pub langs: Vec<String>,
    #[structopt(long = "timeout", default_value = "600", help = "download timeout, in seconds")]
    pub timeout: u64,
}

#[derive(Debug, StructOpt)]
/// Collect command and parameters.
pub struct Collect {
    #[structopt(parse(from_os_str), help = "download folder")]
    pub src: PathBuf,
    #[structopt(parse(from_os_str), help = "destination of complete shards")]
    pub dst: PathBuf,
    #[structopt(long = "writers", default_value = "1", help = "number of writers of the download")]
    pub writers: usize,
    #[structopt(long = "prefix", default_value = "raw_content", help = "shard prefix")]
    pub prefix: String,
}

#[derive(Debug, StructOpt)]
/// Extract command and parameters.
pub struct Extract {
    #[structopt(parse(from_os_str), help = "source (contains raw_content_n.jsonl.gz)")]
    pub src: PathBuf,
    #[structopt(parse(from_os_str), help = "text shards destination")]
    pub dst: PathBuf,
    #[structopt(flatten)]
    pub run: Run,
    #[structopt(long = "langs", default_value = "en", use_delimiter = true, help = "wanted languages")]
    pub langs: Vec<String>,
    #[structopt(long = "exclude", default_value = "zh", use_delimiter = true, help = "unwanted languages")]
    pub exclude: Vec<String>,
}

#[derive(Debug, StructOpt)]
/// Filter command and parameters.
pub struct Filter {
    #[structopt(parse(from_os_str), help = "source (contains text_content_n.jsonl.gz)")]
    pub src: PathBuf,
    #[structopt(parse(from_os_str), help = "filtered shards destination")]
    pub dst: PathBuf,
    #[structopt(flatten)]
    pub run: Run,
    #[structopt(parse(from_os_str), long = "config", help = "quality filter thresholds (JSON)")]
    pub config: Option<PathBuf>,
}
