//! Query-understanding and relevance-ranking engine over a fixed legal
//! knowledge base.
//!
//! The pipeline for one query is a single deterministic pass:
//! procedure check, case check, article scoring, then either a formatted
//! answer or a topic-bucket fallback. All of it is pure computation over an
//! immutable corpus snapshot; acquiring that snapshot is the caller's job.

mod corpus;
mod fallback;
mod intent;
mod locate;
mod respond;
mod score;
pub mod text;

pub use corpus::{
    Article, ArticleId, CaseId, Corpus, LandmarkCase, Procedure, ProcedureId, QuickReply,
    QuickReplyId,
};
pub use fallback::{select_bucket, FallbackBucket, FallbackTemplates};
pub use intent::{IntentRules, QueryIntent};
pub use locate::{find_case, find_procedure};
pub use respond::{
    article_response, case_response, fallback_response, procedure_response, ChatResponse,
};
pub use score::{
    score_articles, ScoredMatch, CONFIDENCE_THRESHOLD, EXACT_REFERENCE_SCORE, MAX_MATCHES,
    RELATED_SCORE_THRESHOLD,
};

#[derive(Debug, Clone, thiserror::Error, Eq, PartialEq)]
pub enum AdvisorError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("query error: {0}")]
    Query(String),
}

/// The orchestrator: intent rules plus fallback templates, both plain data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdvisorEngine {
    rules: IntentRules,
    templates: FallbackTemplates,
}

impl AdvisorEngine {
    #[must_use]
    pub fn new(rules: IntentRules, templates: FallbackTemplates) -> Self {
        Self { rules, templates }
    }

    /// Classify a raw query without running the full pipeline.
    #[must_use]
    pub fn classify(&self, query: &str) -> QueryIntent {
        self.rules.classify(&text::normalize(query))
    }

    /// Answer one query against a corpus snapshot.
    ///
    /// The pass never loops back: a procedure-vocabulary query whose locator
    /// scan misses falls through to the case check, and a case miss falls
    /// through to article scoring. Scoring answers only when the top
    /// normalized score reaches [`CONFIDENCE_THRESHOLD`]; otherwise the
    /// fallback bucket text is returned. An empty corpus degrades to the
    /// fallback path rather than an error.
    ///
    /// # Errors
    /// Returns [`AdvisorError::Query`] when the query is blank after
    /// normalization; callers are expected to reject such input upstream.
    pub fn process(&self, query: &str, corpus: &Corpus) -> Result<ChatResponse, AdvisorError> {
        let normalized = text::normalize(query);
        if normalized.is_empty() {
            return Err(AdvisorError::Query("query MUST be non-empty".to_string()));
        }

        if self.rules.matches_procedure(&normalized) {
            if let Some(procedure) = find_procedure(&normalized, &corpus.procedures) {
                return Ok(procedure_response(procedure));
            }
        }

        if self.rules.matches_case(&normalized) {
            if let Some(case) = find_case(&normalized, &corpus.cases) {
                return Ok(case_response(case));
            }
        }

        let matches = score_articles(query, &corpus.articles);
        let confident =
            matches.first().is_some_and(|best| best.score >= CONFIDENCE_THRESHOLD);
        if !confident {
            let bucket = select_bucket(&normalized);
            return Ok(fallback_response(self.templates.text_for(bucket)));
        }

        let best = matches[0].article.clone();
        let related: Vec<Article> = matches[1..]
            .iter()
            .filter(|matched| matched.score > RELATED_SCORE_THRESHOLD)
            .map(|matched| matched.article.clone())
            .collect();
        Ok(article_response(&best, related))
    }
}
