//! Aggregation and layout benchmarks
//!
//! Measures the in-memory stages of the pipeline: RTT extraction and
//! reduction over a synthetic corpus, and bar layout for the combined chart.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use dns_rtt_plotter::{
    charts::{layout_bars, ClusterLayout, ProtocolSeries, DEFAULT_BAR_WIDTH},
    ingest::{parse_result_lines, Corpus},
    models::{GroupingKey, Protocol, TestId},
    rtt_means, rtt_summaries,
};
use std::hint::black_box;
use std::path::Path;

/// Result file content with `periods` latency rows
fn result_content(cmdline: &str, periods: usize) -> String {
    let mut lines = vec![format!("{{\"cmdline\": \"{}\"}}", cmdline)];
    for i in 0..periods {
        let value = if i % 17 == 0 { "NaN".to_string() } else { format!("{}.5", 5 + i % 40) };
        lines.push(format!("{{\"period_response_avg_ms\": [{}, 0]}}", value));
    }
    lines.push("{\"total_response_avg_ms\": 21.0}".to_string());
    lines.join("\n")
}

/// Corpus with every charted protocol over all eight tests
fn create_corpus(files_per_key: usize, periods: usize) -> Corpus {
    let mut corpus = Corpus::new();
    for protocol in Protocol::charted() {
        let cmdline = match protocol {
            Protocol::Udp => "dnsperf -P udp",
            Protocol::DohGet => "dnsperf -P doh -M GET",
            _ => "dnsperf -P doh -M POST",
        };
        for test in TestId::all() {
            let key = GroupingKey::new(protocol.clone(), test);
            for file in 0..files_per_key {
                let source = format!("tests/{}/{}-{}.json", test, protocol, file);
                let batch = parse_result_lines(&result_content(cmdline, periods), Path::new(&source))
                    .expect("benchmark fixture parses");
                corpus.entry(key.clone()).or_default().push(batch);
            }
        }
    }
    corpus
}

fn bench_parse(c: &mut Criterion) {
    let content = result_content("dnsperf -P doh -M POST -s 9.9.9.9", 600);
    c.bench_function("parse_result_lines_600", |b| {
        b.iter(|| parse_result_lines(black_box(&content), Path::new("tests/test1/post.json")))
    });
}

fn bench_aggregation(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregation");

    for files_per_key in [1usize, 10, 50] {
        let corpus = create_corpus(files_per_key, 120);
        group.bench_with_input(BenchmarkId::new("rtt_means", files_per_key), &corpus, |b, corpus| {
            b.iter(|| rtt_means(black_box(corpus)))
        });
        group.bench_with_input(BenchmarkId::new("rtt_summaries", files_per_key), &corpus, |b, corpus| {
            b.iter(|| rtt_summaries(black_box(corpus)))
        });
    }

    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let series: Vec<ProtocolSeries> = (0..3)
        .map(|offset| {
            TestId::all()
                .map(|test| (test, f64::from(test.number()) * 3.0 + f64::from(offset)))
                .collect()
        })
        .collect();
    let refs: Vec<&ProtocolSeries> = series.iter().collect();
    let layout = ClusterLayout::three_bar(DEFAULT_BAR_WIDTH);

    c.bench_function("layout_three_bar", |b| {
        b.iter(|| layout_bars(black_box(&layout), black_box(&refs)))
    });
}

criterion_group!(benches, bench_parse, bench_aggregation, bench_layout);
criterion_main!(benches);
