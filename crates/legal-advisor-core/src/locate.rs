//! First-match entity lookup for procedures and landmark cases.
//!
//! Lookup scans the collection in stored order and returns the first entity
//! whose keywords intersect the query (substring containment); cases also
//! match on their full name. This is deliberately not ranked; corpus order
//! is the documented tie-break policy for these collections.

use crate::corpus::{LandmarkCase, Procedure};

#[must_use]
pub fn find_procedure<'a>(
    normalized_query: &str,
    procedures: &'a [Procedure],
) -> Option<&'a Procedure> {
    procedures.iter().find(|procedure| {
        procedure
            .keywords
            .iter()
            .any(|keyword| normalized_query.contains(&keyword.to_lowercase()))
    })
}

#[must_use]
pub fn find_case<'a>(
    normalized_query: &str,
    cases: &'a [LandmarkCase],
) -> Option<&'a LandmarkCase> {
    cases.iter().find(|case| {
        case.keywords.iter().any(|keyword| normalized_query.contains(&keyword.to_lowercase()))
            || normalized_query.contains(&case.name.to_lowercase())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{CaseId, ProcedureId};

    fn procedure(name: &str, keywords: &[&str]) -> Procedure {
        Procedure {
            id: ProcedureId::new(),
            name: name.to_string(),
            description: String::new(),
            procedure_text: String::new(),
            keywords: keywords.iter().map(|kw| (*kw).to_string()).collect(),
        }
    }

    fn case(name: &str, keywords: &[&str]) -> LandmarkCase {
        LandmarkCase {
            id: CaseId::new(),
            name: name.to_string(),
            year: 1973,
            significance: String::new(),
            detailed_explanation: None,
            key_points: Vec::new(),
            keywords: keywords.iter().map(|kw| (*kw).to_string()).collect(),
        }
    }

    #[test]
    fn first_matching_procedure_wins() {
        let procedures = vec![
            procedure("Filing an FIR", &["fir", "police"]),
            procedure("Filing a PIL", &["pil", "public interest"]),
        ];
        let found = find_procedure("how to file pil and fir", &procedures);
        assert_eq!(found.map(|p| p.name.as_str()), Some("Filing an FIR"));
    }

    #[test]
    fn procedure_lookup_misses_without_overlap() {
        let procedures = vec![procedure("Filing a PIL", &["pil"])];
        assert!(find_procedure("how to register a company", &procedures).is_none());
    }

    #[test]
    fn case_matches_on_keyword_or_name() {
        let cases = vec![case("Kesavananda Bharati case", &["basic structure"])];
        assert!(find_case("what is the basic structure doctrine", &cases).is_some());
        assert!(find_case("tell me about kesavananda bharati case", &cases).is_some());
        assert!(find_case("puttaswamy judgment", &cases).is_none());
    }
}
