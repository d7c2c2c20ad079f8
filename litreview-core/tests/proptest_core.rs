//! Property-based tests for core components using proptest.

use proptest::prelude::*;
use std::sync::Arc;

use litreview_core::citation::format_citation_authors;
use litreview_core::paper::{PaperRecord, RawPaper, SourceId, UNKNOWN_YEAR, year_in};
use litreview_core::persistence::normalize_filename;
use litreview_core::research::{Category, select};
use litreview_core::sources::{AdapterKind, SourceRouter, StaticSource};

fn surname() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{1,12}"
}

fn author() -> impl Strategy<Value = String> {
    (surname(), "[A-Z]{1,2}").prop_map(|(last, initials)| format!("{last}, {initials}"))
}

// --- Citation author formatting ---

proptest! {
    #[test]
    fn single_author_is_surname(a in author()) {
        let expected = a.split(',').next().unwrap().to_string();
        prop_assert_eq!(format_citation_authors(&[a]), expected);
    }

    #[test]
    fn two_authors_joined_with_and(a in author(), b in author()) {
        let out = format_citation_authors(&[a.clone(), b.clone()]);
        let expected = format!(
            "{} and {}",
            a.split(',').next().unwrap(),
            b.split(',').next().unwrap()
        );
        prop_assert_eq!(out, expected);
    }

    #[test]
    fn three_or_more_authors_use_et_al(authors in prop::collection::vec(author(), 3..12)) {
        let out = format_citation_authors(&authors);
        let first = authors[0].split(',').next().unwrap();
        prop_assert_eq!(out, format!("{first} et al."));
    }
}

// --- Year extraction ---

proptest! {
    #[test]
    fn iso_dates_yield_their_year(year in 1900u32..2100, month in 1u32..13, day in 1u32..29) {
        let raw = RawPaper {
            published: Some(format!("{year}-{month:02}-{day:02}")),
            ..Default::default()
        };
        prop_assert_eq!(raw.extract_year(), year.to_string());
    }

    #[test]
    fn text_without_digits_is_unknown(text in "[a-zA-Z ,.-]{0,40}") {
        let raw = RawPaper {
            year: Some(text.clone()),
            date: Some(text),
            ..Default::default()
        };
        prop_assert_eq!(raw.extract_year(), UNKNOWN_YEAR);
    }

    #[test]
    fn extracted_year_is_four_digits(text in ".{0,60}") {
        if let Some(year) = year_in(&text) {
            prop_assert_eq!(year.len(), 4);
            prop_assert!(year.starts_with("19") || year.starts_with("20"));
        }
    }
}

// --- Normalization ---

proptest! {
    #[test]
    fn normalized_record_never_has_blank_title(title in prop::option::of(" {0,3}"), summary in prop::option::of(".{0,20}")) {
        let raw = RawPaper { title, summary, ..Default::default() };
        let paper = raw.normalize(SourceId::Arxiv);
        prop_assert!(!paper.title.trim().is_empty());
        prop_assert!(!paper.summary.trim().is_empty());
    }

    #[test]
    fn normalized_filenames_are_safe(topic in ".{0,80}") {
        let name = normalize_filename(&topic);
        prop_assert!(name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
        prop_assert_eq!(name.clone(), name.to_lowercase());
    }

    #[test]
    fn selection_is_deterministic(idx in 0usize..14) {
        let category = Category::ALL[idx];
        prop_assert_eq!(select(category), select(category));
    }
}

// --- Router ordering ---

proptest! {
    #[test]
    fn router_output_follows_source_order(
        arxiv_n in 0usize..5,
        pubmed_n in 0usize..5,
        order in prop::sample::subsequence(vec![0usize, 1], 0..=2),
        parallel in any::<bool>(),
    ) {
        let make = |n: usize, id: SourceId| -> Vec<PaperRecord> {
            (0..n).map(|i| PaperRecord::new(format!("{id}-{i}"), id.clone())).collect()
        };
        let router = SourceRouter::new(10)
            .with_adapter(AdapterKind::Arxiv, Arc::new(StaticSource::new("arxiv", make(arxiv_n, SourceId::Arxiv))))
            .with_adapter(AdapterKind::Pubmed, Arc::new(StaticSource::new("pubmed", make(pubmed_n, SourceId::Pubmed))))
            .with_parallel(parallel);
        let ids = [SourceId::Arxiv, SourceId::Pubmed];
        let selected: Vec<SourceId> = order.iter().map(|&i| ids[i].clone()).collect();

        let papers = tokio_test::block_on(router.fetch_all("q", &selected, None));

        let expected: Vec<String> = selected
            .iter()
            .flat_map(|id| {
                let n = if *id == SourceId::Arxiv { arxiv_n } else { pubmed_n };
                make(n, id.clone()).into_iter().map(|p| p.title)
            })
            .collect();
        let got: Vec<String> = papers.into_iter().map(|p| p.title).collect();
        prop_assert_eq!(got, expected);
    }
}
