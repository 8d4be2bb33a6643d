use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::AdvisorError;

macro_rules! entity_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Ord, PartialOrd, Hash)]
        pub struct $name(pub Ulid);

        impl $name {
            #[must_use]
            pub fn new() -> Self {
                Self(Ulid::new())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(ArticleId);
entity_id!(CaseId);
entity_id!(ProcedureId);
entity_id!(QuickReplyId);

/// One constitutional article. Immutable after load; `number` is the short
/// alphanumeric code ("21", "21a") and is unique case-insensitively within a
/// corpus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Article {
    pub id: ArticleId,
    pub number: String,
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LandmarkCase {
    pub id: CaseId,
    pub name: String,
    pub year: i32,
    pub significance: String,
    #[serde(default)]
    pub detailed_explanation: Option<String>,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Procedure {
    pub id: ProcedureId,
    pub name: String,
    pub description: String,
    /// Free-text ordered steps; persisted under the legacy key `procedure`.
    #[serde(rename = "procedure")]
    pub procedure_text: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Suggested query shown by the presentation layer; never consulted by the
/// ranking engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuickReply {
    pub id: QuickReplyId,
    pub text: String,
    pub category: String,
    pub order: u32,
}

/// Read-only snapshot of the knowledge base. Collection order is significant:
/// entity lookup is first-match and scorer tie-breaks preserve stored order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Corpus {
    #[serde(default)]
    pub articles: Vec<Article>,
    #[serde(default)]
    pub cases: Vec<LandmarkCase>,
    #[serde(default)]
    pub procedures: Vec<Procedure>,
    #[serde(default)]
    pub quick_replies: Vec<QuickReply>,
}

impl Corpus {
    /// Validate corpus invariants before it is handed to the engine.
    ///
    /// # Errors
    /// Returns [`AdvisorError::Validation`] when an article number is blank or
    /// duplicated (case-insensitively), or an entity name is blank.
    pub fn validate(&self) -> Result<(), AdvisorError> {
        let mut seen_numbers = BTreeSet::new();
        for article in &self.articles {
            let number = article.number.trim().to_ascii_lowercase();
            if number.is_empty() {
                return Err(AdvisorError::Validation(format!(
                    "article `{}` MUST have a non-empty number",
                    article.title
                )));
            }
            if !seen_numbers.insert(number) {
                return Err(AdvisorError::Validation(format!(
                    "article number `{}` MUST be unique within the corpus",
                    article.number
                )));
            }
        }

        for case in &self.cases {
            if case.name.trim().is_empty() {
                return Err(AdvisorError::Validation(
                    "landmark case name MUST be non-empty".to_string(),
                ));
            }
        }

        for procedure in &self.procedures {
            if procedure.name.trim().is_empty() {
                return Err(AdvisorError::Validation(
                    "procedure name MUST be non-empty".to_string(),
                ));
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
            && self.cases.is_empty()
            && self.procedures.is_empty()
            && self.quick_replies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(number: &str, title: &str) -> Article {
        Article {
            id: ArticleId::new(),
            number: number.to_string(),
            title: title.to_string(),
            description: String::new(),
            category: "Fundamental Rights".to_string(),
            keywords: Vec::new(),
        }
    }

    #[test]
    fn validate_rejects_duplicate_numbers_case_insensitively() {
        let corpus = Corpus {
            articles: vec![article("21A", "Right to Education"), article("21a", "Duplicate")],
            ..Corpus::default()
        };

        let err = match corpus.validate() {
            Ok(()) => panic!("duplicate article numbers should be rejected"),
            Err(err) => err,
        };
        assert!(err.to_string().contains("unique"));
    }

    #[test]
    fn validate_rejects_blank_article_number() {
        let corpus =
            Corpus { articles: vec![article("  ", "Blank Number")], ..Corpus::default() };
        assert!(corpus.validate().is_err());
    }

    #[test]
    fn validate_accepts_well_formed_corpus() {
        let corpus = Corpus {
            articles: vec![article("14", "Equality before law"), article("21", "Right to Life")],
            ..Corpus::default()
        };
        assert!(corpus.validate().is_ok());
        assert!(!corpus.is_empty());
    }
}
