use std::io::Write;
use std::path::{Path, PathBuf};

use cc_sieve::document::Document;
use cc_sieve::filtering::QualityFilter;
use cc_sieve::io::ledger::{self, Outcome};
use cc_sieve::io::ShardReader;
use cc_sieve::pipelines::{self, Pipeline, Processor, ProcessorConfig, Quality};
use flate2::write::GzEncoder;
use flate2::Compression;

fn write_shard(path: &Path, docs: &[Document]) {
    let mut enc = GzEncoder::new(std::fs::File::create(path).unwrap(), Compression::default());
    for doc in docs {
        writeln!(enc, "{}", serde_json::to_string(doc).unwrap()).unwrap();
    }
    enc.finish().unwrap();
}

fn read_shards(dst: &Path, prefix: &str) -> Vec<(PathBuf, Vec<Document>)> {
    let mut shards: Vec<PathBuf> = glob::glob(&format!("{}/{prefix}_*.jsonl.gz", dst.display()))
        .unwrap()
        .map(Result::unwrap)
        .collect();
    shards.sort();
    shards
        .into_iter()
        .map(|p| {
            let docs = ShardReader::from_path(&p)
                .unwrap()
                .map(Result::unwrap)
                .collect();
            (p, docs)
        })
        .collect()
}

/// Distinct words only, at least `chars` long.
fn clean_text(tag: &str, chars: usize) -> String {
    let mut lines = Vec::new();
    let mut len = 0;
    let mut idx = 0;
    while len < chars {
        let line = (0..8)
            .map(|w| format!("{tag}{}", idx * 8 + w))
            .collect::<Vec<_>>()
            .join(" ");
        len += line.chars().count() + 1;
        lines.push(line);
        idx += 1;
    }
    lines.join("\n")
}

/// 2 out of 5 lines are the same.
fn duplicated_text() -> String {
    let repeated = "this exact line of text shows up twice";
    let unique: Vec<String> = (0..3)
        .map(|i| format!("alpha{i} beta{i} gamma{i} delta{i} epsilon{i}"))
        .collect();
    format!("{repeated}\n{}\n{repeated}\n{}\n{}", unique[0], unique[1], unique[2])
}

fn config() -> ProcessorConfig {
    ProcessorConfig {
        workers: 2,
        writers: 1,
        max_items: 100,
        capacity: 8,
    }
}

fn filter_stage(src: &Path) -> Quality {
    Quality::new(src, QualityFilter::default())
}

#[test_log::test]
fn only_clean_documents_are_kept() {
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();

    let short = Document::new("x".repeat(50));
    let duplicated = Document::new(duplicated_text());
    let clean = Document::new(clean_text("w", 500));
    assert!(duplicated.content().chars().count() >= 100);

    write_shard(
        &src.path().join("text_content_0.jsonl.gz"),
        &[short, duplicated, clean.clone()],
    );

    let inputs = pipelines::shard_names(src.path()).unwrap();
    let summary = Processor::new(filter_stage(src.path()), inputs, dst.path())
        .with_config(config())
        .run()
        .unwrap();
    assert_eq!(summary.documents, 1);

    let shards = read_shards(dst.path(), "filtered");
    assert_eq!(shards.len(), 1);
    assert_eq!(shards[0].1, vec![clean]);

    let entries = ledger::entries(&dst.path().join("completed.paths")).unwrap();
    assert_eq!(
        entries,
        vec![("text_content_0.jsonl.gz".to_string(), Outcome::Success)]
    );
}

#[test]
fn completed_inputs_are_skipped() {
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();

    write_shard(
        &src.path().join("a.jsonl.gz"),
        &[Document::new(clean_text("a", 200))],
    );
    write_shard(
        &src.path().join("b.jsonl.gz"),
        &[Document::new(clean_text("b", 200))],
    );

    // output of a previous run, that processed a
    let previous = dst.path().join("filtered_0.jsonl.gz");
    write_shard(&previous, &[Document::new(clean_text("a", 200))]);
    let before = std::fs::read(&previous).unwrap();
    std::fs::write(dst.path().join("completed.paths"), "a.jsonl.gz\tSUCCESS\n").unwrap();

    let inputs = pipelines::shard_names(src.path()).unwrap();
    let summary = Processor::new(filter_stage(src.path()), inputs, dst.path())
        .with_config(config())
        .run()
        .unwrap();
    assert_eq!(summary.inputs, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.succeeded, 1);

    assert_eq!(std::fs::read(&previous).unwrap(), before);
    let shards = read_shards(dst.path(), "filtered");
    assert_eq!(shards.len(), 2);
    assert_eq!(shards[1].0, dst.path().join("filtered_1.jsonl.gz"));
    assert_eq!(shards[1].1, vec![Document::new(clean_text("b", 200))]);

    let completed = ledger::completed(&dst.path().join("completed.paths")).unwrap();
    assert!(completed.contains("a.jsonl.gz"));
    assert!(completed.contains("b.jsonl.gz"));
}

#[test]
fn failed_inputs_are_retried() {
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();
    let doc = Document::new(clean_text("c", 200));

    // not a gzip file
    std::fs::write(src.path().join("c.jsonl.gz"), b"not gzip").unwrap();
    let inputs = pipelines::shard_names(src.path()).unwrap();
    let summary = Processor::new(filter_stage(src.path()), inputs.clone(), dst.path())
        .with_config(config())
        .run()
        .unwrap();
    assert_eq!(summary.failed, 1);

    write_shard(&src.path().join("c.jsonl.gz"), &[doc.clone()]);
    let summary = Processor::new(filter_stage(src.path()), inputs, dst.path())
        .with_config(config())
        .run()
        .unwrap();
    assert_eq!(summary.skipped, 0);
    assert_eq!(summary.succeeded, 1);

    let docs: Vec<Document> = read_shards(dst.path(), "filtered")
        .into_iter()
        .flat_map(|(_, docs)| docs)
        .collect();
    assert_eq!(docs, vec![doc]);

    let entries = ledger::entries(&dst.path().join("completed.paths")).unwrap();
    assert_eq!(
        entries.iter().map(|(_, o)| *o).collect::<Vec<_>>(),
        vec![Outcome::Failed, Outcome::Success]
    );
}

#[test]
fn many_shards_many_writers() {
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();

    for shard in 0..6 {
        let docs: Vec<Document> = (0..5)
            .map(|d| Document::new(clean_text(&format!("s{shard}d{d}x"), 300)))
            .collect();
        write_shard(&src.path().join(format!("text_content_{shard}.jsonl.gz")), &docs);
    }

    let inputs = pipelines::shard_names(src.path()).unwrap();
    let summary = Processor::new(filter_stage(src.path()), inputs, dst.path())
        .with_config(ProcessorConfig {
            workers: 3,
            writers: 2,
            max_items: 4,
            capacity: 2,
        })
        .run()
        .unwrap();
    assert_eq!(summary.succeeded, 6);
    assert_eq!(summary.documents, 30);

    let shards = read_shards(dst.path(), "filtered");
    let total: usize = shards.iter().map(|(_, docs)| docs.len()).sum();
    assert_eq!(total, 30);
    assert!(shards.iter().all(|(_, docs)| docs.len() <= 4));
}
