//! Domain classification of free-text research questions.

use crate::brain::Brain;
use crate::error::LlmError;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

/// Scientific domain used to pick bibliographic sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Biology,
    Chemistry,
    ComputerScience,
    Economics,
    Engineering,
    EnvironmentalScience,
    Finance,
    GeneralScience,
    Math,
    Medicine,
    Neuroscience,
    Physics,
    Psychology,
    PublicHealth,
    /// The model answered with something outside the fixed label set.
    ///
    /// Its label is `general_science`, which deliberately does not match the
    /// `general science` label of [`Category::GeneralScience`].
    Unclassified,
}

impl Category {
    /// Every classifiable category, in label order.
    pub const ALL: [Category; 14] = [
        Category::Biology,
        Category::Chemistry,
        Category::ComputerScience,
        Category::Economics,
        Category::Engineering,
        Category::EnvironmentalScience,
        Category::Finance,
        Category::GeneralScience,
        Category::Math,
        Category::Medicine,
        Category::Neuroscience,
        Category::Physics,
        Category::Psychology,
        Category::PublicHealth,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Biology => "biology",
            Category::Chemistry => "chemistry",
            Category::ComputerScience => "computer science",
            Category::Economics => "economics",
            Category::Engineering => "engineering",
            Category::EnvironmentalScience => "environmental science",
            Category::Finance => "finance",
            Category::GeneralScience => "general science",
            Category::Math => "math",
            Category::Medicine => "medicine",
            Category::Neuroscience => "neuroscience",
            Category::Physics => "physics",
            Category::Psychology => "psychology",
            Category::PublicHealth => "public health",
            Category::Unclassified => "general_science",
        }
    }

    /// Exact match against the 14 labels, after trimming and lowercasing.
    pub fn from_label(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_lowercase();
        Self::ALL.into_iter().find(|c| c.label() == normalized)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classifies queries with a single LLM call.
pub struct DomainClassifier {
    brain: Brain,
}

impl DomainClassifier {
    pub fn new(brain: Brain) -> Self {
        Self { brain }
    }

    pub fn system_prompt() -> String {
        let labels: Vec<&str> = Category::ALL.iter().map(|c| c.label()).collect();
        format!(
            "You are a classifier that categorizes research questions into fields of science.\n\
             Possible categories are: {}.\n\
             Return only the best matching category from that list, with no explanations.",
            labels.join(", ")
        )
    }

    /// Classify `query`. Replies outside the label set become [`Category::Unclassified`].
    pub async fn classify(&self, query: &str) -> Result<Category, LlmError> {
        let reply = self
            .brain
            .complete_text(
                &Self::system_prompt(),
                &format!("Classify this query: {query}"),
            )
            .await?;

        match Category::from_label(&reply) {
            Some(category) => {
                info!(category = %category, "Classified query");
                Ok(category)
            }
            None => {
                warn!(reply = %reply.trim(), "Classifier reply is not a known category");
                Ok(Category::Unclassified)
            }
        }
    }
}
