//! Prediction data model.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// 请求温度上限。
pub const MAX_TEMPERATURE: f64 = 2.0;

/// 首位候选概率低于该百分比时视为幻觉风险。
pub const HALLUCINATION_THRESHOLD: f64 = 40.0;

/// 单个下一 token 候选。
///
/// 只保存 log-probability；百分比总是由 [`TokenCandidate::probability`] 现算。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenCandidate {
    token: String,
    log_probability: f64,
}

impl TokenCandidate {
    pub fn new(token: impl Into<String>, log_probability: f64) -> Self {
        Self {
            token: token.into(),
            log_probability,
        }
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    #[must_use]
    pub const fn log_probability(&self) -> f64 {
        self.log_probability
    }

    /// `exp(log_probability) * 100`。
    #[must_use]
    pub fn probability(&self) -> f64 {
        self.log_probability.exp() * 100.0
    }
}

/// 一次成功预测的结果。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    chosen_token: String,
    candidates: Vec<TokenCandidate>,
    latency_ms: u64,
    estimated_cost: f64,
    model: String,
}

impl PredictionResult {
    /// 构建结果；候选按概率降序排列（稳定排序，同概率保持原顺序）。
    pub fn new(
        chosen_token: impl Into<String>,
        mut candidates: Vec<TokenCandidate>,
        latency_ms: u64,
        estimated_cost: f64,
        model: impl Into<String>,
    ) -> Self {
        candidates.sort_by(|a, b| b.probability().total_cmp(&a.probability()));
        Self {
            chosen_token: chosen_token.into(),
            candidates,
            latency_ms,
            estimated_cost,
            model: model.into(),
        }
    }

    #[must_use]
    pub fn chosen_token(&self) -> &str {
        &self.chosen_token
    }

    /// 候选列表，概率最高者在前。
    #[must_use]
    pub fn candidates(&self) -> &[TokenCandidate] {
        &self.candidates
    }

    #[must_use]
    pub const fn latency_ms(&self) -> u64 {
        self.latency_ms
    }

    #[must_use]
    pub const fn estimated_cost(&self) -> f64 {
        self.estimated_cost
    }

    /// 实际应答的模型标识。
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub fn top_candidate(&self) -> Option<&TokenCandidate> {
        self.candidates.first()
    }

    /// 模型对首位候选把握不足（低于 [`HALLUCINATION_THRESHOLD`]）。
    #[must_use]
    pub fn hallucination_risk(&self) -> bool {
        self.top_candidate()
            .is_some_and(|candidate| candidate.probability() < HALLUCINATION_THRESHOLD)
    }
}

/// 调用方提供的请求参数，在构造时校验。
#[derive(Debug, Clone, PartialEq)]
pub struct RequestParameters {
    context_text: String,
    temperature: f64,
}

impl RequestParameters {
    /// # Errors
    /// 上下文为空或温度不在 `[0, 2]` 内时返回 [`Error::InvalidConfig`]。
    pub fn new(context_text: impl Into<String>, temperature: f64) -> Result<Self> {
        let context_text = context_text.into();
        if context_text.is_empty() {
            return Err(Error::InvalidConfig {
                message: "context text must not be empty".into(),
            });
        }
        validate_temperature(temperature)?;
        Ok(Self {
            context_text,
            temperature,
        })
    }

    #[must_use]
    pub fn context_text(&self) -> &str {
        &self.context_text
    }

    #[must_use]
    pub const fn temperature(&self) -> f64 {
        self.temperature
    }
}

pub(crate) fn validate_temperature(temperature: f64) -> Result<()> {
    if !(0.0..=MAX_TEMPERATURE).contains(&temperature) {
        return Err(Error::InvalidConfig {
            message: format!(
                "temperature must be within [0, {MAX_TEMPERATURE}], got {temperature}"
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probability_is_derived_from_log_probability() {
        let candidate = TokenCandidate::new(" fox", 0.5_f64.ln());
        assert!((candidate.probability() - 50.0).abs() < 1e-9);
        assert_eq!(TokenCandidate::new("x", 0.0).probability(), 100.0);
    }

    #[test]
    fn result_sorts_candidates_descending() {
        let result = PredictionResult::new(
            " be",
            vec![
                TokenCandidate::new(" see", 0.1_f64.ln()),
                TokenCandidate::new(" be", 0.7_f64.ln()),
                TokenCandidate::new(" do", 0.2_f64.ln()),
            ],
            12,
            0.0,
            "gemini-2.0-flash",
        );
        let tokens: Vec<&str> = result
            .candidates()
            .iter()
            .map(TokenCandidate::token)
            .collect();
        assert_eq!(tokens, vec![" be", " do", " see"]);
        assert_eq!(result.top_candidate().map(TokenCandidate::token), Some(" be"));
        assert_eq!(result.model(), "gemini-2.0-flash");
    }

    #[test]
    fn equal_probabilities_keep_response_order() {
        let result = PredictionResult::new(
            "a",
            vec![
                TokenCandidate::new("a", -100.0),
                TokenCandidate::new("b", -100.0),
                TokenCandidate::new("c", -200.0),
            ],
            0,
            0.0,
            "m",
        );
        let tokens: Vec<&str> = result
            .candidates()
            .iter()
            .map(TokenCandidate::token)
            .collect();
        assert_eq!(tokens, vec!["a", "b", "c"]);
    }

    #[test]
    fn hallucination_risk_below_threshold() {
        let confident = PredictionResult::new(
            " Paris",
            vec![TokenCandidate::new(" Paris", 0.95_f64.ln())],
            0,
            0.0,
            "m",
        );
        assert!(!confident.hallucination_risk());

        let unsure = PredictionResult::new(
            " John",
            vec![
                TokenCandidate::new(" John", 0.3_f64.ln()),
                TokenCandidate::new(" there", 0.25_f64.ln()),
            ],
            0,
            0.0,
            "m",
        );
        assert!(unsure.hallucination_risk());

        let empty = PredictionResult::new("", Vec::new(), 0, 0.0, "m");
        assert!(!empty.hallucination_risk());
    }

    #[test]
    fn request_parameters_validate_boundary() {
        let params = RequestParameters::new("The quick brown", 0.5).unwrap();
        assert_eq!(params.context_text(), "The quick brown");
        assert_eq!(params.temperature(), 0.5);

        assert!(RequestParameters::new("x", 0.0).is_ok());
        assert!(RequestParameters::new("x", 2.0).is_ok());
        assert!(matches!(
            RequestParameters::new("", 1.0),
            Err(Error::InvalidConfig { .. })
        ));
        assert!(RequestParameters::new("x", -0.1).is_err());
        assert!(RequestParameters::new("x", 2.5).is_err());
        assert!(RequestParameters::new("x", f64::NAN).is_err());
    }
}
