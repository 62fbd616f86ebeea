use serde::{Deserialize, Serialize};

use crate::content::Content;
use crate::enums::FinishReason;
use crate::logprobs::LogprobsResult;

/// 生成内容响应。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
}

impl GenerateContentResponse {
    /// 提取第一个候选的文本。
    #[must_use]
    pub fn text(&self) -> Option<String> {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .and_then(|content| content.first_text())
            .map(ToString::to_string)
    }

    /// 第一个候选的 logprobs 结果。
    #[must_use]
    pub fn logprobs(&self) -> Option<&LogprobsResult> {
        self.candidates
            .first()
            .and_then(|candidate| candidate.logprobs_result.as_ref())
    }
}

/// 响应候选。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_logprobs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logprobs_result: Option<LogprobsResult>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn response_text_and_logprobs() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                {
                    "content": {"role": "model", "parts": [{"text": " fox"}]},
                    "finishReason": "MAX_TOKENS",
                    "avgLogprobs": -0.05,
                    "logprobsResult": {
                        "chosenCandidates": [
                            {"token": " fox", "tokenId": 7, "logProbability": -0.05}
                        ]
                    }
                },
                {"content": {"role": "model", "parts": [{"text": " dog"}]}}
            ],
            "usageMetadata": {"promptTokenCount": 20, "totalTokenCount": 21},
            "modelVersion": "gemini-2.0-flash"
        }))
        .unwrap();

        assert_eq!(response.text(), Some(" fox".to_string()));
        assert_eq!(
            response.candidates[0].finish_reason,
            Some(FinishReason::MaxTokens)
        );
        assert_eq!(response.candidates[0].avg_logprobs, Some(-0.05));
        let logprobs = response.logprobs().unwrap();
        assert_eq!(logprobs.chosen_candidates.len(), 1);
        assert!(logprobs.top_candidates.is_empty());
    }

    #[test]
    fn empty_response_has_no_text() {
        let response: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert!(response.candidates.is_empty());
        assert_eq!(response.text(), None);
        assert!(response.logprobs().is_none());
    }
}
