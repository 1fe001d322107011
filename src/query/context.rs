//! Grounding assembly: joins retrieved snippets and, when a question
//! names a known administrative district, prepends a registered-facility
//! count for it.

use crate::store::{SearchResult, SupabaseStore};

const SNIPPET_SEPARATOR: &str = "\n---\n";

/// Builds the district side fact, or `None` when no known district is
/// involved or the store reads fail. A missing side fact never blocks
/// an answer.
pub async fn side_fact(
    store: &SupabaseStore,
    question: &str,
    extracted: Option<&str>,
) -> Option<String> {
    let places = match store.list_place_names().await {
        Ok(places) => places,
        Err(err) => {
            tracing::warn!("place list unavailable, skipping side fact: {}", err);
            return None;
        }
    };

    let place = resolve_place(&places, question, extracted)?;
    match store.count_facilities_at(&place).await {
        Ok(count) => Some(format!(
            "참고로, {}에는 총 {}개의 공공시설이 등록되어 있습니다.",
            place, count
        )),
        Err(err) => {
            tracing::warn!("facility count unavailable for {}: {}", place, err);
            None
        }
    }
}

/// Prefers the extracted district when it matches a known place name,
/// otherwise falls back to the first known place mentioned verbatim in
/// the question.
fn resolve_place(places: &[String], question: &str, extracted: Option<&str>) -> Option<String> {
    if let Some(candidate) = extracted {
        if places.iter().any(|p| p == candidate) {
            return Some(candidate.to_string());
        }
    }
    places
        .iter()
        .find(|p| question.contains(p.as_str()))
        .cloned()
}

/// Joins snippet contents with a visible separator, with the side fact
/// (when present) on its own leading line.
pub fn grounding_text(side_fact: Option<&str>, results: &[SearchResult]) -> String {
    let snippets = results
        .iter()
        .map(|r| r.content.as_str())
        .collect::<Vec<_>>()
        .join(SNIPPET_SEPARATOR);
    match side_fact {
        Some(fact) => format!("{}\n{}", fact, snippets),
        None => snippets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn places() -> Vec<String> {
        vec!["수송동".to_string(), "나운동".to_string()]
    }

    fn result(content: &str) -> SearchResult {
        SearchResult {
            content: content.to_string(),
            score: 0.9,
        }
    }

    #[test]
    fn a_known_extracted_place_wins() {
        let place = resolve_place(&places(), "나운동 말고 수송동 쪽이요", Some("수송동"));
        assert_eq!(place, Some("수송동".to_string()));
    }

    #[test]
    fn an_unknown_extraction_falls_back_to_scanning_the_question() {
        let place = resolve_place(&places(), "나운동에 체육관 있나요?", Some("서울시"));
        assert_eq!(place, Some("나운동".to_string()));
    }

    #[test]
    fn no_match_anywhere_means_no_place() {
        assert_eq!(resolve_place(&places(), "수영장 어디 있어요?", None), None);
        assert_eq!(
            resolve_place(&places(), "수영장 어디 있어요?", Some("서울시")),
            None
        );
    }

    #[test]
    fn snippets_join_with_a_visible_separator() {
        let results = vec![result("첫 번째"), result("두 번째")];
        assert_eq!(grounding_text(None, &results), "첫 번째\n---\n두 번째");
    }

    #[test]
    fn the_side_fact_leads_the_grounding_text() {
        let results = vec![result("첫 번째")];
        let text = grounding_text(Some("참고 사실입니다."), &results);
        assert_eq!(text, "참고 사실입니다.\n첫 번째");
    }
}
