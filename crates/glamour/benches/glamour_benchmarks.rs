//! Benchmarks for glamour parsing, wrapping and rendering.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use glamour::wordwrap::{DEFAULT_BREAKPOINTS, wordwrap};
use glamour::{ColorProfile, Node, Renderer, Style, StyleBlock, StyleConfig, StylePrimitive, TerminalInfo};
use std::fmt::Write;

const SMALL_DOC: &str = "# Title\n\nA short paragraph with **bold**, *italic* and `code`.\n";

fn medium_doc() -> String {
    let mut doc = String::from("# Release notes\n\n");
    for i in 0..20 {
        let _ = write!(
            &mut doc,
            "## Section {i}\n\nThe renderer wraps long paragraphs at the configured width, \
             keeping [links](https://example.com/{i}) and `spans` intact.\n\n\
             - first item {i}\n- second item with a longer body that wraps\n  1. nested\n\n\
             > quoted text {i}\n\n"
        );
    }
    doc
}

fn renderer(style: Style) -> Renderer {
    Renderer::new()
        .with_style(style)
        .with_color_profile(ColorProfile::TrueColor)
        .with_terminal(TerminalInfo::default())
}

fn custom_style_config() -> StyleConfig {
    let mut config = Style::Dark.config();
    config.h1 = StyleBlock::new().style(StylePrimitive::new().prefix("## ").color("196").bold(true));
    config.code = StyleBlock::new().style(
        StylePrimitive::new()
            .prefix(" ")
            .suffix(" ")
            .color("45")
            .background_color("236"),
    );
    config
}

fn benchmark_parsing(c: &mut Criterion) {
    let medium = medium_doc();
    let large = medium.repeat(8);
    let docs = [("small", SMALL_DOC), ("medium", medium.as_str()), ("large", large.as_str())];

    let mut group = c.benchmark_group("glamour/parsing");
    for (name, doc) in docs {
        group.throughput(Throughput::Bytes(doc.len() as u64));
        group.bench_with_input(BenchmarkId::new("parse", name), doc, |b, doc| {
            b.iter(|| black_box(Node::parse(doc)));
        });
    }
    group.finish();
}

fn benchmark_full_render(c: &mut Criterion) {
    let medium = medium_doc();
    let large = medium.repeat(8);
    let docs = [("small", SMALL_DOC), ("medium", medium.as_str()), ("large", large.as_str())];

    let mut group = c.benchmark_group("glamour/render");
    for (name, doc) in docs {
        group.throughput(Throughput::Bytes(doc.len() as u64));
        group.bench_with_input(BenchmarkId::new("full", name), doc, |b, doc| {
            let renderer = renderer(Style::Dark);
            b.iter(|| black_box(renderer.render(doc)));
        });
    }
    group.finish();
}

fn benchmark_wordwrap(c: &mut Criterion) {
    let text = "The quick brown fox jumps over the lazy dog, again and again; ".repeat(40);
    let mut group = c.benchmark_group("glamour/wordwrap");
    for width in [20, 80] {
        group.bench_with_input(BenchmarkId::from_parameter(width), &width, |b, &width| {
            b.iter(|| black_box(wordwrap(&text, width, DEFAULT_BREAKPOINTS)));
        });
    }
    group.finish();
}

fn benchmark_elements(c: &mut Criterion) {
    let mut group = c.benchmark_group("glamour/elements");

    let mut headers_base = String::new();
    for n in 1..=6 {
        let _ = write!(&mut headers_base, "{} Header Level {n}\n\n", "#".repeat(n));
    }
    let headers = headers_base.repeat(100);
    group.bench_function("headers", |b| {
        let renderer = renderer(Style::Dark);
        b.iter(|| black_box(renderer.render(&headers)));
    });

    let mut list = String::new();
    for i in 0..100 {
        let _ = writeln!(&mut list, "- Item {i}");
    }
    group.bench_function("unordered_list_100", |b| {
        let renderer = renderer(Style::Dark);
        b.iter(|| black_box(renderer.render(&list)));
    });

    let mut nested_list = String::new();
    for i in 0..50 {
        let _ = writeln!(&mut nested_list, "- Item {i}");
        let _ = writeln!(&mut nested_list, "  - Nested {i}");
        let _ = writeln!(&mut nested_list, "    - Deep {i}");
    }
    group.bench_function("nested_list", |b| {
        let renderer = renderer(Style::Dark);
        b.iter(|| black_box(renderer.render(&nested_list)));
    });

    let code_blocks = "```rust\nfn main() {\n    println!(\"Hello\");\n}\n```\n\n".repeat(50);
    group.bench_function("code_blocks_50", |b| {
        let renderer = renderer(Style::Dark);
        b.iter(|| black_box(renderer.render(&code_blocks)));
    });

    let mut links = String::new();
    for i in 0..100 {
        let _ = writeln!(&mut links, "[Link {i}](https://example.com/{i}) and **bold** and *italic*");
    }
    group.bench_function("links_emphasis_100", |b| {
        let renderer = renderer(Style::Dark);
        b.iter(|| black_box(renderer.render(&links)));
    });

    let table = "| Col 1 | Col 2 | Col 3 |\n|-------|-------|-------|\n| A | [B](https://b.io) | C |\n\n".repeat(50);
    group.bench_function("tables_50", |b| {
        let renderer = renderer(Style::Dark);
        b.iter(|| black_box(renderer.render(&table)));
    });

    group.finish();
}

fn benchmark_config_impact(c: &mut Criterion) {
    let medium = medium_doc();
    let mut group = c.benchmark_group("glamour/config");

    group.bench_function("default_dark", |b| {
        let renderer = renderer(Style::Dark);
        b.iter(|| black_box(renderer.render(&medium)));
    });

    group.bench_function("ascii_profile", |b| {
        let renderer = renderer(Style::Dark).with_color_profile(ColorProfile::Ascii);
        b.iter(|| black_box(renderer.render(&medium)));
    });

    let custom = custom_style_config();
    group.bench_function("custom_styles", |b| {
        let renderer = renderer(Style::Dark).with_style_config(custom.clone());
        b.iter(|| black_box(renderer.render(&medium)));
    });

    group.bench_function("justified", |b| {
        let renderer = renderer(Style::Dark).with_justified_alignment(2, 2);
        b.iter(|| black_box(renderer.render(&medium)));
    });

    group.finish();
}

criterion_group!(
    glamour_benches,
    benchmark_parsing,
    benchmark_full_render,
    benchmark_wordwrap,
    benchmark_elements,
    benchmark_config_impact
);
criterion_main!(glamour_benches);
