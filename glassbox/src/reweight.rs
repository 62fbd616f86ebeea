//! Live temperature re-weighting of a returned top-K distribution.
//!
//! The service reports log-probabilities for only a handful of tokens, so the
//! softmax here is taken over those candidates alone. The percentages are a
//! view of how temperature reshapes the observed candidates, not the model's
//! full-vocabulary distribution.

use serde::Serialize;

use crate::prediction::{PredictionResult, TokenCandidate};

/// 温度下限，避免除零。
pub const MIN_TEMPERATURE: f64 = 0.01;

/// 按温度重新加权后的展示条目。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightedCandidate {
    pub label: String,
    pub percentage: f64,
    pub is_chosen: bool,
}

/// 以 `temperature` 对候选做 softmax，返回百分比（与输入顺序一致）。
///
/// 纯函数：不修改输入，相同输入得到逐位相同的输出。空输入返回空输出。
#[must_use]
pub fn reweight(
    candidates: &[TokenCandidate],
    chosen_token: &str,
    temperature: f64,
) -> Vec<WeightedCandidate> {
    if candidates.is_empty() {
        return Vec::new();
    }

    let t = temperature.max(MIN_TEMPERATURE);
    // Shifting by the max leaves the normalized result unchanged and keeps the
    // largest weight at exactly 1.
    let max = candidates
        .iter()
        .map(TokenCandidate::log_probability)
        .fold(f64::NEG_INFINITY, f64::max);
    let weights: Vec<f64> = candidates
        .iter()
        .map(|candidate| {
            if max.is_finite() {
                ((candidate.log_probability() - max) / t).exp()
            } else {
                1.0
            }
        })
        .collect();
    let total: f64 = weights.iter().sum();

    candidates
        .iter()
        .zip(weights)
        .map(|(candidate, weight)| WeightedCandidate {
            label: display_label(candidate.token()),
            percentage: weight / total * 100.0,
            is_chosen: candidate.token() == chosen_token,
        })
        .collect()
}

/// 对一次预测结果按温度重新加权。
#[must_use]
pub fn reweight_prediction(
    prediction: &PredictionResult,
    temperature: f64,
) -> Vec<WeightedCandidate> {
    reweight(prediction.candidates(), prediction.chosen_token(), temperature)
}

/// 按百分比降序排列（稳定排序）。
#[must_use]
pub fn rank(mut weighted: Vec<WeightedCandidate>) -> Vec<WeightedCandidate> {
    weighted.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
    weighted
}

/// 图表标签：加引号，换行显示为 `\n`。
#[must_use]
pub fn display_label(token: &str) -> String {
    format!("\"{}\"", token.replace('\n', "\\n"))
}
