use serde::{Deserialize, Serialize};

/// 生成配置。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<i32>,
    /// 是否返回 logprobs 结果。
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_logprobs: Option<bool>,
    /// 每个 token 返回的候选数（0-20）。
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logprobs: Option<i32>,
}
