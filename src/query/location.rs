//! Administrative-district extraction: pulls a neighborhood name out of
//! a question so the answer can carry a per-district facility count.

use crate::genai::{GeminiClient, GenAiError};

const NONE_SENTINEL: &str = "없음";

/// Extracts an administrative-district name from the question, or
/// `None` when the model reports there is nothing to extract.
pub async fn extract(genai: &GeminiClient, question: &str) -> Result<Option<String>, GenAiError> {
    let raw = genai.generate(&build_prompt(question)).await?;
    Ok(raw.as_deref().and_then(parse_place))
}

fn build_prompt(question: &str) -> String {
    format!(
        "다음 질문에서 군산시의 행정동 이름을 하나만 추출하세요.\n\
         예시: 수송동, 나운동, 미성동.\n\
         행정동 이름이 없으면 '{none}'이라고만 답하세요.\n\
         다른 설명 없이 이름만 답하세요.\n\n\
         질문: {question}",
        none = NONE_SENTINEL,
    )
}

fn parse_place(raw: &str) -> Option<String> {
    let place = raw
        .trim()
        .trim_matches(|c: char| c == '\'' || c == '"')
        .trim();
    if place.is_empty() || place == NONE_SENTINEL {
        None
    } else {
        Some(place.to_string())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn mock_model(output: &str) -> (MockServer, GeminiClient) {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-1.5-flash-latest:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{ "content": { "parts": [{ "text": output }] } }]
            })))
            .mount(&server)
            .await;
        let client = GeminiClient::new("test-key".to_string()).with_base_url(server.uri());
        (server, client)
    }

    #[test]
    fn place_names_come_back_trimmed_and_unquoted() {
        assert_eq!(parse_place(" 수송동\n"), Some("수송동".to_string()));
        assert_eq!(parse_place("'나운동'"), Some("나운동".to_string()));
    }

    #[test]
    fn the_none_sentinel_and_blank_output_mean_no_place() {
        assert_eq!(parse_place("없음"), None);
        assert_eq!(parse_place(" '없음' "), None);
        assert_eq!(parse_place("   "), None);
    }

    #[tokio::test]
    async fn district_mentions_are_extracted() {
        let (_server, client) = mock_model("수송동").await;
        let place = extract(&client, "수송동 맛집 알려줘").await.unwrap();
        assert_eq!(place.as_deref(), Some("수송동"));
    }

    #[tokio::test]
    async fn questions_without_a_district_extract_nothing() {
        let (_server, client) = mock_model("없음").await;
        let place = extract(&client, "군산시 소식 알려줘").await.unwrap();
        assert_eq!(place, None);
    }
}
