//! Answer synthesis: a constrained Korean prompt that pins the model to
//! the retrieved grounding text.

use crate::genai::{GeminiClient, GenAiError};

/// Canned refusal the model is instructed to emit when the grounding
/// text does not cover the question. Also served directly for blank
/// questions.
pub const REFUSAL: &str = "죄송합니다, 문의하신 내용에 대한 정보는 가지고 있지 않습니다.";

/// Served when generation succeeds at the HTTP level but comes back
/// without usable text.
pub const GENERATION_FALLBACK: &str = "AI가 답변을 생성하는 데 실패했습니다.";

/// Produces the final answer. Transport and API failures propagate;
/// an empty completion degrades to the fallback sentence instead.
pub async fn synthesize(
    genai: &GeminiClient,
    question: &str,
    grounding: &str,
) -> Result<String, GenAiError> {
    match genai.generate(&build_prompt(question, grounding)).await? {
        Some(answer) => Ok(answer),
        None => {
            tracing::warn!("generation returned no text, serving the fallback sentence");
            Ok(GENERATION_FALLBACK.to_string())
        }
    }
}

fn build_prompt(question: &str, grounding: &str) -> String {
    format!(
        r#"당신은 사용자를 돕는 친절한 '군산시 안내 전문가'입니다.
당신의 임무는 아래 [참고 정보]를 바탕으로 사용자의 질문에 한국어로 답변하는 것입니다.

**규칙:**
1.  답변은 반드시 [참고 정보]에 있는 내용만을 근거로 해야 합니다.
2.  질문에 대한 정보가 [참고 정보]에 없다면, 절대로 추측해서 답변하지 말고 "{refusal}" 라고만 말하세요.
3.  만약 '참고 정보'에서 여러 시설의 이름이 발견되면, 그 시설들의 목록을 먼저 보여주고, 사용자가 특정 시설에 대한 상세 정보를 원하면 다시 질문하도록 자연스럽게 유도하세요.

---
[참고 정보]
{grounding}
---

[사용자 질문]
{question}
---

자, 이제 위의 규칙에 따라 답변을 생성하세요."#,
        refusal = REFUSAL,
        grounding = grounding,
        question = question,
    )
}
