/*! Resumable parallel processor.

Runs a [Stage] over a list of inputs (remote segments or local shards):

- `workers` threads take inputs from a [WorkQueue] and run the stage on each of them,
- kept documents go through a bounded channel to `writers` threads, each owning a [RotatingWriter],
- a ledger thread appends one `SUCCESS`/`FAILED` line per processed input.

Inputs already marked `SUCCESS` in the ledger are skipped, so an interrupted run can be resumed
by running the same command again.

A writer or ledger failure stops the run: workers stop taking inputs,
[Sink::send] fails with [Error::Halted], and the failure is returned once every thread is done.
!*/
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crossbeam::channel::{bounded, Receiver, Sender};
use log::{debug, error, info, warn};

use crate::document::Document;
use crate::error::Error;
use crate::io::ledger::{self, LedgerWriter, Outcome};
use crate::io::writer::{next_index, RotatingWriter};

use super::pipeline::Pipeline;
use super::work_queue::WorkQueue;

/// Default ledger file name, in the destination folder.
pub const LEDGER_NAME: &str = "completed.paths";

/// Per-input work.
pub trait Stage: Sync {
    /// Used in logs.
    fn name(&self) -> &'static str;

    /// Output shards prefix.
    fn prefix(&self) -> &'static str;

    /// Process a single input, sending kept documents to `sink`.
    ///
    /// Returns the number of documents sent.
    /// Record-level problems should be logged and skipped:
    /// any error returned here marks the whole input as failed.
    fn process(&self, input: &str, sink: &Sink) -> Result<usize, Error>;
}

/// Sending end of the document channel, handed to stages.
pub struct Sink<'a> {
    tx: Sender<Document>,
    halt: &'a AtomicBool,
}

impl<'a> Sink<'a> {
    pub fn new(tx: Sender<Document>, halt: &'a AtomicBool) -> Self {
        Self { tx, halt }
    }

    /// Hand a document to the writers. Blocks when they fall behind.
    ///
    /// # Errors
    /// [Error::Halted] if the run is stopping.
    pub fn send(&self, doc: Document) -> Result<(), Error> {
        if self.halt.load(Ordering::Relaxed) {
            return Err(Error::Halted);
        }
        self.tx.send(doc).map_err(|_| Error::Halted)
    }
}

/// Tunables of a [Processor].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorConfig {
    /// Number of worker threads.
    pub workers: usize,
    /// Number of writer threads, and of interleaved shard series.
    pub writers: usize,
    /// Documents per output shard.
    pub max_items: usize,
    /// Capacity of the document channel.
    pub capacity: usize,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
            writers: 1,
            max_items: 50_000,
            capacity: 1024,
        }
    }
}

/// Outcome of a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Distinct inputs given to the run.
    pub inputs: usize,
    /// Inputs skipped because they were already completed.
    pub skipped: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Documents sent to the writers.
    pub documents: usize,
}

impl Summary {
    pub fn log(&self) {
        info!(
            "inputs: {} ({} skipped), succeeded: {}, failed: {}, documents: {}",
            self.inputs, self.skipped, self.succeeded, self.failed, self.documents
        );
    }
}

#[derive(Default)]
struct Counters {
    succeeded: AtomicUsize,
    failed: AtomicUsize,
    documents: AtomicUsize,
}

/// Runs a [Stage] over inputs. See module documentation.
pub struct Processor<S: Stage> {
    stage: S,
    inputs: Vec<String>,
    dst: PathBuf,
    ledger: PathBuf,
    config: ProcessorConfig,
}

impl<S: Stage> Processor<S> {
    /// The ledger defaults to [LEDGER_NAME] in `dst`.
    pub fn new(stage: S, inputs: Vec<String>, dst: &Path) -> Self {
        Self {
            stage,
            inputs,
            dst: dst.to_path_buf(),
            ledger: dst.join(LEDGER_NAME),
            config: ProcessorConfig::default(),
        }
    }

    pub fn with_ledger(mut self, ledger: &Path) -> Self {
        self.ledger = ledger.to_path_buf();
        self
    }

    pub fn with_config(mut self, config: ProcessorConfig) -> Self {
        self.config = config;
        self
    }

    fn work_loop(
        &self,
        queue: &WorkQueue<String>,
        sink: Sink,
        ledger_tx: Sender<(String, Outcome)>,
        halt: &AtomicBool,
        counters: &Counters,
    ) {
        while !halt.load(Ordering::Relaxed) {
            let Some(input) = queue.next() else {
                break;
            };
            info!("{}: working on {}", self.stage.name(), input);

            let outcome = match self.stage.process(input, &sink) {
                // documents may not all have been written
                Ok(_) | Err(Error::Halted) if halt.load(Ordering::Relaxed) => {
                    warn!("{}: {} interrupted", self.stage.name(), input);
                    break;
                }
                Ok(nb_docs) => {
                    info!("{}: {} done, {} documents", self.stage.name(), input, nb_docs);
                    counters.succeeded.fetch_add(1, Ordering::Relaxed);
                    counters.documents.fetch_add(nb_docs, Ordering::Relaxed);
                    Outcome::Success
                }
                Err(e) => {
                    error!("{}: {} failed: {}", self.stage.name(), input, e);
                    counters.failed.fetch_add(1, Ordering::Relaxed);
                    Outcome::Failed
                }
            };

            if ledger_tx.send((input.clone(), outcome)).is_err() {
                break;
            }
        }
    }

    fn write_loop(
        &self,
        mut writer: RotatingWriter,
        rx: Receiver<Document>,
        halt: &AtomicBool,
    ) -> Result<usize, Error> {
        let mut nb_docs = 0;
        for doc in rx.iter() {
            if let Err(e) = writer.write(&doc) {
                error!("writer failure, halting: {}", e);
                halt.store(true, Ordering::Relaxed);
                return Err(e);
            }
            nb_docs += 1;
        }
        writer.finish().map_err(|e| {
            halt.store(true, Ordering::Relaxed);
            e
        })?;
        Ok(nb_docs)
    }

    fn ledger_loop(
        mut ledger: LedgerWriter,
        rx: Receiver<(String, Outcome)>,
        halt: &AtomicBool,
    ) -> Result<(), Error> {
        for (input, outcome) in rx.iter() {
            if let Err(e) = ledger.append(&input, outcome) {
                error!("ledger failure on {}, halting: {}", input, e);
                halt.store(true, Ordering::Relaxed);
                return Err(e);
            }
        }
        Ok(())
    }
}

impl<S: Stage> Pipeline<Summary> for Processor<S> {
    fn run(&self) -> Result<Summary, Error> {
        if !self.dst.exists() {
            warn!("Destination folder does not exist. Creating");
            std::fs::create_dir_all(&self.dst)?;
        }
        if !self.dst.is_dir() {
            return Err(Error::Custom(format!(
                "destination has to be a directory: {:?}",
                self.dst
            )));
        }

        // inputs are unique within a run
        let mut seen = HashSet::new();
        let inputs: Vec<String> = self
            .inputs
            .iter()
            .filter(|i| seen.insert(i.as_str()))
            .cloned()
            .collect();

        let completed = ledger::completed(&self.ledger)?;
        let nb_inputs = inputs.len();
        let queue = WorkQueue::filtered(inputs, |i| !completed.contains(i));
        let skipped = nb_inputs - queue.total();
        info!(
            "{}: {} inputs, {} already completed",
            self.stage.name(),
            nb_inputs,
            skipped
        );

        let prefix = self.stage.prefix();
        let base = next_index(&self.dst, prefix)?;
        debug!("{}: first shard index is {}", self.stage.name(), base);

        let ledger = LedgerWriter::open(&self.ledger)?;
        let writers = self.config.writers.max(1);
        let workers = self.config.workers.max(1).min(queue.total().max(1));

        let (doc_tx, doc_rx) = bounded::<Document>(self.config.capacity);
        let (ledger_tx, ledger_rx) = bounded::<(String, Outcome)>(workers * 2);
        let halt = AtomicBool::new(false);
        let counters = Counters::default();

        let (writer_results, ledger_result) = crossbeam::thread::scope(|s| {
            let writer_handles: Vec<_> = (0..writers)
                .map(|idx| {
                    let writer = RotatingWriter::new(
                        &self.dst,
                        prefix,
                        base + idx,
                        writers,
                        self.config.max_items,
                    );
                    let rx = doc_rx.clone();
                    let halt = &halt;
                    s.spawn(move |_| self.write_loop(writer, rx, halt))
                })
                .collect();

            let ledger_handle = {
                let halt = &halt;
                s.spawn(move |_| Self::ledger_loop(ledger, ledger_rx, halt))
            };

            for _ in 0..workers {
                let sink = Sink::new(doc_tx.clone(), &halt);
                let ledger_tx = ledger_tx.clone();
                let (queue, halt, counters) = (&queue, &halt, &counters);
                s.spawn(move |_| self.work_loop(queue, sink, ledger_tx, halt, counters));
            }

            // only threads hold channel ends now,
            // so that channels close as soon as their producers/consumers are done.
            drop(doc_tx);
            drop(doc_rx);
            drop(ledger_tx);

            let writer_results: Vec<Result<usize, Error>> = writer_handles
                .into_iter()
                .map(|h| {
                    h.join()
                        .unwrap_or_else(|_| Err(Error::Custom("writer thread panicked".to_string())))
                })
                .collect();
            let ledger_result = ledger_handle
                .join()
                .unwrap_or_else(|_| Err(Error::Custom("ledger thread panicked".to_string())));

            (writer_results, ledger_result)
        })
        .map_err(|_| Error::Custom("worker thread panicked".to_string()))?;

        let mut written = 0;
        for result in writer_results {
            written += result?;
        }
        ledger_result?;

        let summary = Summary {
            inputs: nb_inputs,
            skipped,
            succeeded: counters.succeeded.into_inner(),
            failed: counters.failed.into_inner(),
            documents: counters.documents.into_inner(),
        };
        debug!("{}: {} documents written", self.stage.name(), written);
        summary.log();
        Ok(summary)
    }
}
