use criterion::{black_box, criterion_group, criterion_main, Criterion};
use cc_sieve::filtering::{ngram, QualityFilter};
use cc_sieve::tokenizer::{Tokenizer, WordBounds};

fn clean_document(lines: usize) -> String {
    (0..lines)
        .map(|l| {
            (0..12)
                .map(|w| format!("word{}", l * 12 + w))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn repetitive_document(lines: usize) -> String {
    (0..lines)
        .map(|l| format!("lorem ipsum dolor sit amet, consectetur adipiscing elit {}", l % 7))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn quality(c: &mut Criterion) {
    let filter: QualityFilter = QualityFilter::default();
    let clean = clean_document(500);
    let repetitive = repetitive_document(500);

    c.bench_function("quality_clean_500_lines", |b| {
        b.iter(|| filter.evaluate(black_box(&clean)))
    });
    c.bench_function("quality_repetitive_500_lines", |b| {
        b.iter(|| filter.evaluate(black_box(&repetitive)))
    });
}

pub fn overlap(c: &mut Criterion) {
    let content = clean_document(500);
    let tokens: Vec<&str> = content.lines().flat_map(|l| WordBounds.segment(l)).collect();

    c.bench_function("overlap_mask_10", |b| {
        b.iter(|| ngram::overlap_mask(black_box(&tokens), 10))
    });
}

criterion_group!(benches, quality, overlap);
criterion_main!(benches);
