//! Route classification: decides which dataset a question should be
//! answered from before any retrieval happens.

use crate::genai::{GeminiClient, GenAiError};
use crate::store::Domain;

const FACILITY_LABEL: &str = "facility";
const NEWS_LABEL: &str = "news";

/// Classifies a question as a facility or news lookup. Unrecognized or
/// empty model output falls back to the facility route, which covers
/// the majority of traffic.
pub async fn classify(genai: &GeminiClient, question: &str) -> Result<Domain, GenAiError> {
    let raw = genai.generate(&build_prompt(question)).await?;
    match raw.as_deref().and_then(parse_route) {
        Some(domain) => Ok(domain),
        None => {
            tracing::warn!("unrecognized route label {:?}, defaulting to facility", raw);
            Ok(Domain::Facility)
        }
    }
}

fn build_prompt(question: &str) -> String {
    format!(
        "다음 사용자 질문의 질문 유형을 분류하세요.\n\
         공공시설의 위치, 주소, 운영 시간, 휴무일, 연락처, 이용 방법을 묻는 질문이면 '{facility}',\n\
         군산시의 행사, 축제, 정책, 소식, 공지를 묻는 질문이면 '{news}'라고 답하세요.\n\
         다른 설명 없이 반드시 한 단어로만 답하세요.\n\n\
         질문: {question}",
        facility = FACILITY_LABEL,
        news = NEWS_LABEL,
    )
}

/// Accepts exactly the two known labels, tolerating surrounding
/// whitespace, quotes and punctuation in the model output.
fn parse_route(raw: &str) -> Option<Domain> {
    let label = raw
        .trim()
        .trim_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace())
        .to_ascii_lowercase();
    match label.as_str() {
        FACILITY_LABEL => Some(Domain::Facility),
        NEWS_LABEL => Some(Domain::News),
        _ => None,
    }
}
