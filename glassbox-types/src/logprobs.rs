use serde::{Deserialize, Serialize};

/// Logprobs 候选项。
///
/// 服务端按 proto3 JSON 输出，零值字段可能被省略，因此全部字段可选。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogprobCandidate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_probability: Option<f64>,
}

/// 单个解码位置的 top candidates。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopCandidates {
    #[serde(default)]
    pub candidates: Vec<LogprobCandidate>,
}

/// Logprobs 结果。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogprobsResult {
    /// 按解码位置排列，每个位置包含 top-K 候选。
    #[serde(default)]
    pub top_candidates: Vec<TopCandidates>,
    /// 实际选中路径上的候选，每个解码位置一个。
    #[serde(default)]
    pub chosen_candidates: Vec<LogprobCandidate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_probability_sum: Option<f64>,
}
