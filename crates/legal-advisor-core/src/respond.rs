//! Rendering of located entities into chat responses.

use serde::{Deserialize, Serialize};

use crate::corpus::{Article, LandmarkCase, Procedure};

/// The engine's answer to one query. A fallback is a normal outcome, so
/// `success` stays true; `false` is reserved for faults detected by callers
/// before this logic runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_articles: Option<Vec<Article>>,
}

#[must_use]
pub fn procedure_response(procedure: &Procedure) -> ChatResponse {
    let message = format!(
        "**{}**\n\n**Description:**\n{}\n\n**Procedure:**\n{}\n",
        procedure.name, procedure.description, procedure.procedure_text
    );
    ChatResponse { success: true, message, related_articles: None }
}

#[must_use]
pub fn case_response(case: &LandmarkCase) -> ChatResponse {
    let mut message = format!(
        "**{}**\n\n**Year:** {}\n\n**Significance:**\n{}\n\n**Key Points:**\n",
        case.name, case.year, case.significance
    );
    for point in &case.key_points {
        message.push_str("- ");
        message.push_str(point);
        message.push('\n');
    }
    ChatResponse { success: true, message, related_articles: None }
}

/// Render the best-scoring article, appending a related-articles section when
/// qualifying follow-up matches exist (already filtered and in sorted order).
#[must_use]
pub fn article_response(best: &Article, related: Vec<Article>) -> ChatResponse {
    let mut message = format!(
        "**Article {}: {}**\n\n**Category:** {}\n\n**Description:**\n{}\n",
        best.number, best.title, best.category, best.description
    );

    let related_articles = if related.is_empty() {
        None
    } else {
        message.push_str("\n**Related Articles:**\n");
        for article in &related {
            message.push_str(&format!("- Article {}: {}\n", article.number, article.title));
        }
        Some(related)
    };

    ChatResponse { success: true, message, related_articles }
}

#[must_use]
pub fn fallback_response(text: &str) -> ChatResponse {
    ChatResponse { success: true, message: text.to_string(), related_articles: None }
}
