//! Topic-bucket fallback selection and its canned message table.
//!
//! Bucket vocabulary is tested in a fixed priority order; the first bucket
//! with any term contained in the query wins. Message texts are plain data
//! and can be overridden wholesale through configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum FallbackBucket {
    FundamentalRights,
    FundamentalDuties,
    UnionExecutive,
    Parliament,
    Judiciary,
    General,
}

impl FallbackBucket {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FundamentalRights => "fundamental_rights",
            Self::FundamentalDuties => "fundamental_duties",
            Self::UnionExecutive => "union_executive",
            Self::Parliament => "parliament",
            Self::Judiciary => "judiciary",
            Self::General => "general",
        }
    }
}

const RIGHTS_TERMS: [&str; 4] = ["right", "freedom", "equality", "liberty"];
const DUTIES_TERMS: [&str; 3] = ["duty", "duties", "responsibility"];
const EXECUTIVE_TERMS: [&str; 5] =
    ["president", "governor", "executive", "prime minister", "minister"];
const PARLIAMENT_TERMS: [&str; 4] = ["parliament", "lok sabha", "rajya sabha", "legislature"];
const JUDICIARY_TERMS: [&str; 6] =
    ["court", "judge", "judiciary", "justice", "supreme court", "high court"];

/// Select the fallback bucket for a normalized query. Buckets are tested in
/// priority order 1 through 6; a query matching several categories gets the
/// first one.
#[must_use]
pub fn select_bucket(normalized_query: &str) -> FallbackBucket {
    let contains_any =
        |terms: &[&str]| terms.iter().any(|term| normalized_query.contains(term));

    if contains_any(&RIGHTS_TERMS) {
        FallbackBucket::FundamentalRights
    } else if contains_any(&DUTIES_TERMS) {
        FallbackBucket::FundamentalDuties
    } else if contains_any(&EXECUTIVE_TERMS) {
        FallbackBucket::UnionExecutive
    } else if contains_any(&PARLIAMENT_TERMS) {
        FallbackBucket::Parliament
    } else if contains_any(&JUDICIARY_TERMS) {
        FallbackBucket::Judiciary
    } else {
        FallbackBucket::General
    }
}

/// Canned overview text per bucket. Every field defaults independently so a
/// configuration file may override only some of them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FallbackTemplates {
    pub fundamental_rights: String,
    pub fundamental_duties: String,
    pub union_executive: String,
    pub parliament: String,
    pub judiciary: String,
    pub general: String,
}

impl FallbackTemplates {
    #[must_use]
    pub fn text_for(&self, bucket: FallbackBucket) -> &str {
        match bucket {
            FallbackBucket::FundamentalRights => &self.fundamental_rights,
            FallbackBucket::FundamentalDuties => &self.fundamental_duties,
            FallbackBucket::UnionExecutive => &self.union_executive,
            FallbackBucket::Parliament => &self.parliament,
            FallbackBucket::Judiciary => &self.judiciary,
            FallbackBucket::General => &self.general,
        }
    }
}

impl Default for FallbackTemplates {
    fn default() -> Self {
        Self {
            fundamental_rights: "I don't have specific information about that query, but here \
                                 are related constitutional topics:\n\n\
                                 **Fundamental Rights (Part III):**\n\
                                 - Right to Equality (Articles 14-18)\n\
                                 - Right to Freedom (Articles 19-22)\n\
                                 - Right against Exploitation (Articles 23-24)\n\
                                 - Right to Freedom of Religion (Articles 25-28)\n\
                                 - Cultural and Educational Rights (Articles 29-30)\n\
                                 - Right to Constitutional Remedies (Article 32)\n\n\
                                 Try asking about a specific article, for example \"What is \
                                 Article 21?\""
                .to_string(),
            fundamental_duties: "I don't have specific information about that query, but here \
                                 is an overview of citizen duties:\n\n\
                                 **Fundamental Duties (Part IVA, Article 51A):**\n\
                                 - Abide by the Constitution and respect its ideals\n\
                                 - Uphold the sovereignty, unity and integrity of India\n\
                                 - Promote harmony and the spirit of common brotherhood\n\
                                 - Protect the natural environment\n\n\
                                 Ask about Article 51A for the full list of duties."
                .to_string(),
            union_executive: "I don't have specific information about that query, but here is \
                              an overview of the Union Executive:\n\n\
                              **Union Executive (Part V):**\n\
                              - The President (Articles 52-62)\n\
                              - The Vice-President (Articles 63-71)\n\
                              - The Council of Ministers and Prime Minister (Articles 74-75)\n\
                              - Governors of States (Articles 153-162)\n\n\
                              Ask about a specific article for details."
                .to_string(),
            parliament: "I don't have specific information about that query, but here is an \
                         overview of Parliament:\n\n\
                         **Parliament (Part V, Chapter II):**\n\
                         - Composition of Parliament (Article 79)\n\
                         - Rajya Sabha, the Council of States (Article 80)\n\
                         - Lok Sabha, the House of the People (Article 81)\n\
                         - Legislative procedure (Articles 107-111)\n\n\
                         Ask about a specific article for details."
                .to_string(),
            judiciary: "I don't have specific information about that query, but here is an \
                        overview of the Judiciary:\n\n\
                        **The Judiciary (Parts V and VI):**\n\
                        - The Supreme Court (Articles 124-147)\n\
                        - High Courts in the States (Articles 214-231)\n\
                        - Subordinate Courts (Articles 233-237)\n\n\
                        You can also ask about landmark judgments, for example \"Kesavananda \
                        Bharati case\"."
                .to_string(),
            general: "I couldn't find specific information about that query. Here are some \
                      things you can ask me:\n\n\
                      - \"What is Article 21?\" - look up a specific article\n\
                      - \"Tell me about the Kesavananda Bharati case\" - landmark judgments\n\
                      - \"How to file a PIL\" - legal procedures\n\
                      - \"What are my fundamental rights?\" - constitutional topics"
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buckets_follow_fixed_priority_order() {
        assert_eq!(select_bucket("what are my rights"), FallbackBucket::FundamentalRights);
        assert_eq!(select_bucket("duties of a citizen"), FallbackBucket::FundamentalDuties);
        assert_eq!(select_bucket("who elects the president"), FallbackBucket::UnionExecutive);
        assert_eq!(select_bucket("seats in the lok sabha"), FallbackBucket::Parliament);
        assert_eq!(select_bucket("powers of the supreme court"), FallbackBucket::Judiciary);
        assert_eq!(select_bucket("asdkjqwoeiasd"), FallbackBucket::General);
    }

    #[test]
    fn first_matching_bucket_wins_on_overlap() {
        // Matches both rights ("right") and judiciary ("court"); rights is
        // earlier in the priority order.
        assert_eq!(
            select_bucket("right to approach the supreme court"),
            FallbackBucket::FundamentalRights
        );
    }

    #[test]
    fn templates_can_be_partially_overridden() {
        let overrides = r#"{"general": "custom help text"}"#;
        let templates: FallbackTemplates = match serde_json::from_str(overrides) {
            Ok(templates) => templates,
            Err(err) => panic!("templates should deserialize: {err}"),
        };
        assert_eq!(templates.text_for(FallbackBucket::General), "custom help text");
        assert_eq!(
            templates.fundamental_rights,
            FallbackTemplates::default().fundamental_rights
        );
    }
}
