//! Benchmarks for markdown to HTML conversion and HTML parsing.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use marksplit::markdown::to_html;
use marksplit::preview::parse_blocks;

fn sample_document(sections: usize) -> String {
    let mut md = String::new();
    for i in 1..=sections {
        md.push_str(&format!("## Section {i}\n\n"));
        md.push_str("Some *emphasis*, some **strong** text and a [link](https://example.com).\n\n");
        md.push_str("- first\n- second\n- third\n\n");
        md.push_str("```rust\nfn main() {\n    println!(\"hi\");\n}\n```\n\n");
        md.push_str("| name | value |\n|------|------:|\n| a | 1 |\n| b | 2 |\n\n");
    }
    md
}

fn bench_to_html(c: &mut Criterion) {
    let md = sample_document(50);
    c.bench_function("to_html", |b| b.iter(|| to_html(black_box(&md))));
}

fn bench_parse_blocks(c: &mut Criterion) {
    let html = to_html(&sample_document(50));
    c.bench_function("parse_blocks", |b| b.iter(|| parse_blocks(black_box(&html))));
}

criterion_group!(benches, bench_to_html, bench_parse_blocks);
criterion_main!(benches);
