//! Static category to source mapping.

use super::classifier::{Category, DomainClassifier};
use crate::error::LlmError;
use crate::paper::SourceId;
use serde::{Deserialize, Serialize};

/// The category a query was classified into and the sources chosen for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicClassification {
    pub category: Category,
    pub sources: Vec<SourceId>,
}

/// Ordered sources for a category. Pure and total.
///
/// [`Category::Unclassified`] uses the general-science row.
pub fn select(category: Category) -> Vec<SourceId> {
    use SourceId::*;
    match category {
        Category::Biology => vec![Biorxiv, Pubmed, SemanticScholar],
        Category::Chemistry => vec![ScienceDirect, SemanticScholar, SpringerLink],
        Category::ComputerScience => vec![Arxiv, IeeeXplore, SemanticScholar],
        Category::Economics => vec![Nber, Repec, Ssrn],
        Category::Engineering => vec![IeeeXplore, SemanticScholar],
        Category::EnvironmentalScience => vec![ScienceDirect, SemanticScholar, SpringerLink],
        Category::Finance => vec![Nber, Ssrn],
        Category::GeneralScience | Category::Unclassified => {
            vec![ScienceDirect, SemanticScholar, SpringerLink]
        }
        Category::Math => vec![Arxiv, SemanticScholar],
        Category::Medicine => vec![Pubmed, SemanticScholar, SpringerLink],
        Category::Neuroscience => vec![Arxiv, Biorxiv, Pubmed, SemanticScholar],
        Category::Physics => vec![Arxiv, SemanticScholar],
        Category::Psychology => vec![Pubmed, SemanticScholar, Ssrn],
        Category::PublicHealth => vec![Pubmed, ScienceDirect],
    }
}

/// Classify `query` and select its sources.
pub async fn select_sources(
    classifier: &DomainClassifier,
    query: &str,
) -> Result<TopicClassification, LlmError> {
    let category = classifier.classify(query).await?;
    Ok(TopicClassification {
        category,
        sources: select(category),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::{Brain, MockLlmProvider};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn ids(raw: &[&str]) -> Vec<SourceId> {
        raw.iter().map(|s| SourceId::parse(s)).collect()
    }

    #[test]
    fn test_table_matches_wire_identifiers() {
        let expected: [(&str, &[&str]); 14] = [
            ("biology", &["biorxiv", "pubmed", "semantic_scholar"]),
            ("chemistry", &["sciencedirect", "semantic_scholar", "springerlink"]),
            ("computer science", &["arxiv", "ieee_xplore", "semantic_scholar"]),
            ("economics", &["nber", "repec", "ssrn"]),
            ("engineering", &["ieee_xplore", "semantic_scholar"]),
            ("environmental science", &["sciencedirect", "semantic_scholar", "springerlink"]),
            ("finance", &["nber", "ssrn"]),
            ("general science", &["sciencedirect", "semantic_scholar", "springerlink"]),
            ("math", &["arxiv", "semantic_scholar"]),
            ("medicine", &["pubmed", "semantic_scholar", "springerlink"]),
            ("neuroscience", &["arxiv", "biorxiv", "pubmed", "semantic_scholar"]),
            ("physics", &["arxiv", "semantic_scholar"]),
            ("psychology", &["pubmed", "semantic_scholar", "ssrn"]),
            ("public health", &["pubmed", "sciencedirect"]),
        ];
        for (label, sources) in expected {
            let category = Category::from_label(label).unwrap();
            assert_eq!(select(category), ids(sources), "row {label}");
        }
    }

    #[test]
    fn test_select_is_deterministic() {
        for category in Category::ALL {
            assert_eq!(select(category), select(category));
            assert!(!select(category).is_empty());
        }
    }

    #[test]
    fn test_unclassified_uses_general_science_row() {
        assert_eq!(
            select(Category::Unclassified),
            select(Category::GeneralScience)
        );
    }

    #[tokio::test]
    async fn test_select_sources() {
        let mock = Arc::new(MockLlmProvider::with_response("physics"));
        let classifier = DomainClassifier::new(Brain::new(mock));
        let selection = select_sources(&classifier, "dark matter halos").await.unwrap();
        assert_eq!(selection.category, Category::Physics);
        assert_eq!(
            selection.sources,
            vec![SourceId::Arxiv, SourceId::SemanticScholar]
        );
    }
}
