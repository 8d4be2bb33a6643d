use serde::{Deserialize, Serialize};

/// Classified purpose of a query, decided by a strict priority chain:
/// procedure vocabulary first, then case vocabulary, then article search.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum QueryIntent {
    Procedure,
    Case,
    ArticleSearch,
}

impl QueryIntent {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Procedure => "procedure",
            Self::Case => "case",
            Self::ArticleSearch => "article_search",
        }
    }
}

/// Intent vocabulary. The case terms include landmark-case name tokens, which
/// are corpus-bound data rather than a universal rule, so the whole table is
/// replaceable configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IntentRules {
    pub procedure_terms: Vec<String>,
    pub case_terms: Vec<String>,
}

impl Default for IntentRules {
    fn default() -> Self {
        Self {
            procedure_terms: ["how to", "procedure", "process", "file", "filing"]
                .map(str::to_string)
                .to_vec(),
            case_terms: ["case", "judgment", "judgement", "kesavananda", "maneka", "puttaswamy"]
                .map(str::to_string)
                .to_vec(),
        }
    }
}

impl IntentRules {
    /// True when any procedure term occurs as a substring of the query.
    #[must_use]
    pub fn matches_procedure(&self, normalized_query: &str) -> bool {
        self.procedure_terms.iter().any(|term| normalized_query.contains(term.as_str()))
    }

    /// True when any case term occurs as a substring of the query.
    #[must_use]
    pub fn matches_case(&self, normalized_query: &str) -> bool {
        self.case_terms.iter().any(|term| normalized_query.contains(term.as_str()))
    }

    /// Classify a normalized query. Procedure vocabulary always wins over case
    /// vocabulary; scoring plays no part in the decision.
    #[must_use]
    pub fn classify(&self, normalized_query: &str) -> QueryIntent {
        if self.matches_procedure(normalized_query) {
            return QueryIntent::Procedure;
        }
        if self.matches_case(normalized_query) {
            return QueryIntent::Case;
        }
        QueryIntent::ArticleSearch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn procedure_vocabulary_fires() {
        let rules = IntentRules::default();
        assert_eq!(rules.classify("how to file an fir"), QueryIntent::Procedure);
        assert_eq!(rules.classify("pil filing steps"), QueryIntent::Procedure);
    }

    #[test]
    fn case_vocabulary_fires_after_procedure() {
        let rules = IntentRules::default();
        assert_eq!(rules.classify("kesavananda bharati judgment"), QueryIntent::Case);
        // Both vocabularies present: procedure wins.
        assert_eq!(rules.classify("how to cite the kesavananda case"), QueryIntent::Procedure);
    }

    #[test]
    fn everything_else_is_article_search() {
        let rules = IntentRules::default();
        assert_eq!(rules.classify("right to equality"), QueryIntent::ArticleSearch);
    }

    #[test]
    fn vocabulary_is_replaceable() {
        let rules = IntentRules {
            procedure_terms: vec!["anleitung".to_string()],
            case_terms: vec!["urteil".to_string()],
        };
        assert_eq!(rules.classify("anleitung bitte"), QueryIntent::Procedure);
        assert_eq!(rules.classify("das urteil"), QueryIntent::Case);
        assert_eq!(rules.classify("how to file"), QueryIntent::ArticleSearch);
    }
}
