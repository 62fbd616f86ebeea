//! Auto-regressive exploration session.
//!
//! A [`Session`] keeps the running context, the user's temperature and the
//! latest prediction. [`Session::step`] borrows the session mutably, so only
//! one step per session can be in flight.

use crate::error::Result;
use crate::prediction::{validate_temperature, PredictionResult, RequestParameters};
use crate::predictor::Predictor;
use crate::reweight::{reweight_prediction, WeightedCandidate};

/// 新会话的初始上下文。
pub const INITIAL_CONTEXT: &str = "The artificial intelligence revolution is";

/// 新会话的初始温度。
pub const DEFAULT_TEMPERATURE: f64 = 0.5;

/// 诱导幻觉的错误前提提示。
pub const HALLUCINATION_TEST_PROMPT: &str =
    "Who was the first Martian President in 1600? The answer is";

/// 预设上下文。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub label: &'static str,
    pub context: &'static str,
}

pub const PRESETS: &[Preset] = &[
    Preset {
        label: "Sci-Fi Intro",
        context: "The year is 3042 and the first thing I saw when I woke up was",
    },
    Preset {
        label: "Coding (JS)",
        context: "function calculateFibonacci(n) {",
    },
    Preset {
        label: "Poetry",
        context: "The autumn leaves fell gently like",
    },
    Preset {
        label: "Philosophy",
        context: "The true nature of consciousness is",
    },
    Preset {
        label: "Mystery",
        context: "The detective looked at the shattered glass and realized",
    },
    Preset {
        label: "Recipe",
        context: "To make the perfect chocolate cake, first you must",
    },
];

pub struct Session {
    predictor: Predictor,
    context: String,
    temperature: f64,
    last_prediction: Option<PredictionResult>,
}

impl Session {
    #[must_use]
    pub fn new(predictor: Predictor) -> Self {
        Self {
            predictor,
            context: INITIAL_CONTEXT.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            last_prediction: None,
        }
    }

    #[must_use]
    pub fn context(&self) -> &str {
        &self.context
    }

    #[must_use]
    pub const fn temperature(&self) -> f64 {
        self.temperature
    }

    #[must_use]
    pub const fn last_prediction(&self) -> Option<&PredictionResult> {
        self.last_prediction.as_ref()
    }

    /// # Errors
    /// 温度不在 `[0, 2]` 内时返回 [`crate::Error::InvalidConfig`]，原温度保持不变。
    pub fn set_temperature(&mut self, temperature: f64) -> Result<()> {
        validate_temperature(temperature)?;
        self.temperature = temperature;
        Ok(())
    }

    /// 替换上下文并清除上一次预测。
    pub fn set_context(&mut self, context: impl Into<String>) {
        self.context = context.into();
        self.last_prediction = None;
    }

    pub fn load_preset(&mut self, preset: &Preset) {
        self.set_context(preset.context);
    }

    /// 回到初始上下文。
    pub fn reset(&mut self) {
        self.set_context(INITIAL_CONTEXT);
    }

    /// 预测下一个 token，并把选中 token 追加到上下文。
    ///
    /// 失败时上下文与上一次预测保持不变。
    ///
    /// # Errors
    /// 上下文为空时返回 [`crate::Error::InvalidConfig`]；其余同 [`Predictor::predict`]。
    pub async fn step(&mut self) -> Result<&PredictionResult> {
        let params = RequestParameters::new(self.context.as_str(), self.temperature)?;
        let result = self.predictor.predict_with(&params).await?;
        self.context.push_str(result.chosen_token());
        Ok(&*self.last_prediction.insert(result))
    }

    /// 载入错误前提提示并执行一步。
    ///
    /// # Errors
    /// 同 [`Session::step`]。
    pub async fn hallucination_test(&mut self) -> Result<&PredictionResult> {
        self.set_context(HALLUCINATION_TEST_PROMPT);
        self.step().await
    }

    /// 上一次预测是否存在幻觉风险。
    #[must_use]
    pub fn hallucination_warning(&self) -> bool {
        self.last_prediction
            .as_ref()
            .is_some_and(PredictionResult::hallucination_risk)
    }

    /// 以当前温度重新加权上一次预测；没有预测时为空。
    #[must_use]
    pub fn distribution(&self) -> Vec<WeightedCandidate> {
        self.last_prediction
            .as_ref()
            .map(|prediction| reweight_prediction(prediction, self.temperature))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Client;
    use crate::error::Error;

    fn session() -> Session {
        Session::new(Predictor::new(Client::new("test-key").unwrap()))
    }

    #[test]
    fn new_session_starts_from_initial_state() {
        let session = session();
        assert_eq!(session.context(), INITIAL_CONTEXT);
        assert_eq!(session.temperature(), DEFAULT_TEMPERATURE);
        assert!(session.last_prediction().is_none());
        assert!(!session.hallucination_warning());
        assert!(session.distribution().is_empty());
    }

    #[test]
    fn set_temperature_rejects_out_of_range() {
        let mut session = session();
        session.set_temperature(1.7).unwrap();
        assert_eq!(session.temperature(), 1.7);
        assert!(matches!(
            session.set_temperature(2.1),
            Err(Error::InvalidConfig { .. })
        ));
        assert_eq!(session.temperature(), 1.7);
    }

    #[test]
    fn presets_and_reset_replace_context() {
        let mut session = session();
        session.load_preset(&PRESETS[2]);
        assert_eq!(session.context(), "The autumn leaves fell gently like");
        session.reset();
        assert_eq!(session.context(), INITIAL_CONTEXT);
        assert_eq!(PRESETS.len(), 6);
    }

    #[tokio::test]
    async fn step_rejects_empty_context_without_network() {
        let mut session = session();
        session.set_context("");
        let err = session.step().await.err().unwrap();
        assert!(matches!(err, Error::InvalidConfig { .. }));
        assert!(session.last_prediction().is_none());
    }
}
