//! Weighted multi-field article scoring.

use std::cmp::Ordering;

use crate::corpus::Article;
use crate::text;

/// Score assigned when the query names the article number explicitly; it
/// bypasses field scoring and normalization entirely.
pub const EXACT_REFERENCE_SCORE: f64 = 100.0;
/// Minimum normalized top score for a confident article answer; below it the
/// orchestrator falls back.
pub const CONFIDENCE_THRESHOLD: f64 = 1.5;
/// Minimum normalized score for a match to be listed as a related article.
pub const RELATED_SCORE_THRESHOLD: f64 = 1.0;
/// Upper bound on returned matches.
pub const MAX_MATCHES: usize = 3;

const KEYWORD_WEIGHT: f64 = 2.0;
const TITLE_WORD_WEIGHT: f64 = 3.0;
const CATEGORY_WEIGHT: f64 = 2.0;
const DESCRIPTION_WORD_WEIGHT: f64 = 0.5;
// Description words of three characters or fewer are too common to count.
// Measured in characters, not bytes, so multi-byte scripts gate identically.
const DESCRIPTION_MIN_WORD_LEN: usize = 4;

/// Ephemeral pairing of an article with its normalized relevance score. Lives
/// only for the duration of one ranking call.
#[derive(Debug, Clone, Copy)]
pub struct ScoredMatch<'a> {
    pub article: &'a Article,
    pub score: f64,
}

/// Rank articles against a raw query.
///
/// Returns at most [`MAX_MATCHES`] matches, every one with score > 0, sorted
/// by descending score. The sort is stable, so equal scores keep corpus
/// order; no secondary ranking key exists.
#[must_use]
pub fn score_articles<'a>(query: &str, articles: &'a [Article]) -> Vec<ScoredMatch<'a>> {
    let normalized = text::normalize(query);
    let reference = text::extract_article_reference(&normalized);
    let query_words = text::tokenize(&normalized);
    let word_count = f64::from(u32::try_from(query_words.len().max(1)).unwrap_or(u32::MAX));

    let mut matches = Vec::new();

    for article in articles {
        if let Some(reference) = &reference {
            if article.number.eq_ignore_ascii_case(reference) {
                matches.push(ScoredMatch { article, score: EXACT_REFERENCE_SCORE });
                continue;
            }
        }

        let mut raw_score = 0.0;

        for keyword in &article.keywords {
            if normalized.contains(&keyword.to_lowercase()) {
                raw_score += KEYWORD_WEIGHT;
            }
        }

        let title_lower = article.title.to_lowercase();
        let title_words: Vec<&str> = title_lower.split_whitespace().collect();
        for word in &query_words {
            if title_words.contains(word) {
                raw_score += TITLE_WORD_WEIGHT;
            }
        }

        if normalized.contains(&article.category.to_lowercase()) {
            raw_score += CATEGORY_WEIGHT;
        }

        let description_lower = article.description.to_lowercase();
        let description_words: Vec<&str> = description_lower.split_whitespace().collect();
        for word in &query_words {
            if word.chars().count() >= DESCRIPTION_MIN_WORD_LEN && description_words.contains(word)
            {
                raw_score += DESCRIPTION_WORD_WEIGHT;
            }
        }

        if raw_score > 0.0 {
            matches.push(ScoredMatch { article, score: raw_score / word_count });
        }
    }

    // Stable by construction: Vec::sort_by is a stable sort and the key is
    // score alone, so ties retain corpus order.
    matches.sort_by(|lhs, rhs| rhs.score.partial_cmp(&lhs.score).unwrap_or(Ordering::Equal));
    matches.truncate(MAX_MATCHES);
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::ArticleId;

    fn article(number: &str, title: &str, description: &str, keywords: &[&str]) -> Article {
        Article {
            id: ArticleId::new(),
            number: number.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            category: "Fundamental Rights".to_string(),
            keywords: keywords.iter().map(|kw| (*kw).to_string()).collect(),
        }
    }

    fn fixture_articles() -> Vec<Article> {
        vec![
            article(
                "14",
                "Equality before law",
                "The State shall not deny to any person equality before the law",
                &["equality", "equal protection"],
            ),
            article(
                "19",
                "Protection of certain rights regarding freedom of speech",
                "All citizens shall have the right to freedom of speech and expression",
                &["freedom of speech", "expression"],
            ),
            article(
                "21",
                "Protection of life and personal liberty",
                "No person shall be deprived of his life or personal liberty",
                &["life", "liberty", "right to life"],
            ),
        ]
    }

    #[test]
    fn explicit_reference_scores_one_hundred() {
        let articles = fixture_articles();
        let matches = score_articles("What is Article 21?", &articles);

        assert_eq!(matches[0].article.number, "21");
        assert!((matches[0].score - EXACT_REFERENCE_SCORE).abs() < f64::EPSILON);
    }

    #[test]
    fn reference_comparison_is_case_insensitive() {
        let articles = vec![article("21A", "Right to education", "", &[])];
        let matches = score_articles("ARTICLE 21a", &articles);
        assert_eq!(matches.len(), 1);
        assert!((matches[0].score - EXACT_REFERENCE_SCORE).abs() < f64::EPSILON);
    }

    #[test]
    fn keyword_title_and_description_weights_accumulate() {
        let articles = vec![article(
            "21",
            "Protection of life and personal liberty",
            "No person shall be deprived of his life or personal liberty",
            &["life", "liberty"],
        )];

        // "personal liberty" (5 words): keywords "life"? no, "liberty" yes (+2);
        // title words: "personal" (+3), "liberty" (+3); description words
        // longer than 3 chars: "personal" (+0.5), "liberty" (+0.5).
        let matches = score_articles("tell me about personal liberty", &articles);
        assert_eq!(matches.len(), 1);
        let expected = (2.0 + 3.0 + 3.0 + 0.5 + 0.5) / 5.0;
        assert!((matches[0].score - expected).abs() < 1e-9);
    }

    #[test]
    fn description_word_gate_counts_characters_not_bytes() {
        let articles = vec![article("44", "Uniform provisions", "süd élan", &[])];

        // "süd" is four bytes but three characters, so only "élan" earns the
        // description credit.
        let matches = score_articles("süd élan", &articles);
        assert_eq!(matches.len(), 1);
        assert!((matches[0].score - 0.5 / 2.0).abs() < 1e-9);
    }

    #[test]
    fn zero_score_articles_are_excluded() {
        let articles = fixture_articles();
        let matches = score_articles("asdkjqwoeiasd", &articles);
        assert!(matches.is_empty());
    }

    #[test]
    fn never_more_than_three_matches() {
        let mut articles = fixture_articles();
        articles.push(article("22", "Protection against arrest", "rights of arrested", &[]));
        // "rights" hits several entries via title/description words.
        let matches = score_articles("freedom rights equality liberty speech law", &articles);
        assert!(matches.len() <= MAX_MATCHES);
        assert!(matches.iter().all(|matched| matched.score > 0.0));
    }

    #[test]
    fn equal_scores_keep_corpus_order() {
        let articles = vec![
            article("1", "shared title", "", &[]),
            article("2", "shared title", "", &[]),
            article("3", "shared title", "", &[]),
        ];

        let matches = score_articles("shared title", &articles);
        let numbers: Vec<&str> =
            matches.iter().map(|matched| matched.article.number.as_str()).collect();
        assert_eq!(numbers, vec!["1", "2", "3"]);
    }

    #[test]
    fn empty_corpus_yields_empty_result() {
        assert!(score_articles("anything", &[]).is_empty());
    }
}
