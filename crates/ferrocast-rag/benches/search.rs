use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ferrocast_core::{Document, RagConfig};
use ferrocast_rag::Retriever;

const SEGMENTS: &[&str] = &[
    "payments", "lending", "insurance", "wealth", "neobanking", "regtech", "crypto", "remittance",
];

fn corpus(size: usize) -> Vec<Document> {
    (0..size)
        .map(|i| {
            let segment = SEGMENTS[i % SEGMENTS.len()];
            let text = format!(
                "Report {i} covers {segment} growth. Quarter {} saw {segment} volumes rise {}%. \
                 Analysts expect consolidation among {segment} providers.",
                i % 4 + 1,
                i % 37
            );
            Document::new(format!("doc-{i}"), text).expect("document")
        })
        .collect()
}

fn search_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("retrieve");
    for size in [100_usize, 1_000, 5_000] {
        let retriever = Retriever::from_config(&RagConfig::default()).expect("retriever");
        retriever.index_documents(corpus(size)).expect("index");
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &retriever, |b, retriever| {
            b.iter(|| black_box(retriever.retrieve("lending volumes in quarter 3", 3)));
        });
    }
    group.finish();
}

fn embed_benchmarks(c: &mut Criterion) {
    let retriever = Retriever::from_config(&RagConfig::default()).expect("retriever");
    let docs = corpus(1_000);
    c.bench_function("embed_documents/1000", |b| {
        b.iter(|| black_box(retriever.embedder().embed_documents(&docs)));
    });
}

criterion_group!(benches, search_benchmarks, embed_benchmarks);
criterion_main!(benches);
