//! Benchmarks for render pass throughput.

#![allow(clippy::format_push_string)] // Benchmark setup code, performance not critical

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use quill_render::{Extensions, HtmlFlags, HtmlRenderer, Renderer, TocRenderer, html, render};

/// Generate markdown content with specified structure.
fn generate_markdown(headings: usize, paragraphs_per_section: usize) -> String {
    let mut md = String::with_capacity(headings * 50 + headings * paragraphs_per_section * 200);
    md.push_str("# Document Title\n\n");

    for i in 0..headings {
        md.push_str(&format!("## Section {i}\n\n"));
        for j in 0..paragraphs_per_section {
            md.push_str(&format!(
                "Paragraph {j} in section {i} has **bold**, *italic*, `code` and a [link](http://example.com/{i}).\n\n"
            ));
        }
        md.push_str("- one\n- two\n- three\n\n");
        md.push_str("| a | b |\n|---|--:|\n| 1 | 2 |\n\n");
    }
    md
}

/// Keeps paragraphs only; everything else falls back.
struct Paragraphs;

impl Renderer for Paragraphs {
    fn paragraph(&mut self, content: &str) -> Option<String> {
        Some(format!("{content}\n"))
    }
}

fn bench_html_simple(c: &mut Criterion) {
    c.bench_function("html_simple", |b| {
        b.iter(|| html("# Hello\n\nSimple *content*.", Extensions::empty(), HtmlFlags::empty()));
    });
}

fn bench_html_varying_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("html_by_size");
    let extensions = Extensions::TABLES | Extensions::STRIKETHROUGH | Extensions::AUTOLINK;

    for sections in [10, 50, 200] {
        let markdown = generate_markdown(sections, 3);
        group.throughput(Throughput::Bytes(markdown.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(sections), &markdown, |b, md| {
            let mut renderer = HtmlRenderer::default();
            b.iter(|| render(md, extensions, &mut renderer));
        });
    }
    group.finish();
}

fn bench_fallback_heavy(c: &mut Criterion) {
    let markdown = generate_markdown(50, 3);
    c.bench_function("fallback_heavy", |b| {
        b.iter(|| render(&markdown, Extensions::TABLES, &mut Paragraphs));
    });
}

fn bench_toc(c: &mut Criterion) {
    let markdown = generate_markdown(50, 1);
    c.bench_function("toc_50_headings", |b| {
        let mut toc = TocRenderer::default();
        b.iter(|| render(&markdown, Extensions::empty(), &mut toc));
    });
}

criterion_group!(
    benches,
    bench_html_simple,
    bench_html_varying_sizes,
    bench_fallback_heavy,
    bench_toc
);
criterion_main!(benches);
