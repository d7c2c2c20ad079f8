use criterion::{Criterion, black_box, criterion_group, criterion_main};
use litreview_core::citation::{format_citation_authors, render_study_detail};
use litreview_core::paper::{PaperRecord, RawPaper, SourceId};
use litreview_core::persistence::normalize_filename;
use litreview_core::research::summarizer::Summarizer;
use litreview_core::research::{Category, select};

fn sample_papers(n: usize) -> Vec<PaperRecord> {
    (0..n)
        .map(|i| {
            PaperRecord::new(format!("Paper number {i} on sparse attention"), SourceId::Arxiv)
                .with_summary("We study sparse attention patterns in long-context transformers. ".repeat(8))
                .with_authors(["Vaswani, A", "Shazeer, N", "Parmar, N"])
                .with_year("2024")
                .with_url(format!("http://arxiv.org/abs/2401.{i:05}"))
        })
        .collect()
}

fn bench_normalization(c: &mut Criterion) {
    c.bench_function("raw_paper_normalize", |b| {
        b.iter(|| {
            let raw = RawPaper {
                title: Some("Grid cells and spatial memory".into()),
                summary: Some("None".into()),
                snippet: Some("Entorhinal cortex recordings.".into()),
                publication_date: Some("2023-11-02".into()),
                authors: vec!["Moser, E".into(), "Moser, M".into()],
                ..Default::default()
            };
            black_box(raw.normalize(SourceId::SemanticScholar))
        })
    });

    c.bench_function("normalize_filename", |b| {
        b.iter(|| normalize_filename(black_box("Transformer attention: mechanisms & scaling laws!")))
    });
}

fn bench_citations(c: &mut Criterion) {
    let authors = ["Vaswani, A", "Shazeer, N", "Parmar, N", "Uszkoreit, J"];
    c.bench_function("format_citation_authors", |b| {
        b.iter(|| format_citation_authors(black_box(&authors)))
    });

    let papers = sample_papers(1);
    c.bench_function("render_study_detail", |b| {
        b.iter(|| render_study_detail(black_box(&papers[0])))
    });

    let papers = sample_papers(30);
    c.bench_function("summarizer_research_text_30", |b| {
        b.iter(|| Summarizer::research_text(black_box("sparse attention"), black_box(&papers)))
    });
}

fn bench_selection(c: &mut Criterion) {
    c.bench_function("select_all_categories", |b| {
        b.iter(|| {
            for category in Category::ALL {
                black_box(select(category));
            }
        })
    });
}

criterion_group!(benches, bench_normalization, bench_citations, bench_selection);
criterion_main!(benches);
