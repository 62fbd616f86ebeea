//! Next-token prediction with ordered model fallback.
//!
//! [`Predictor::predict`] walks its model list in priority order and issues one
//! `generateContent` request per model. The first success wins. A credential
//! failure aborts the walk immediately. Any other failure moves on to the next
//! model, and once the list is exhausted the last failure decides which error
//! the caller sees.

use std::time::Instant;

use glassbox_types::config::GenerationConfig;
use glassbox_types::content::Content;
use glassbox_types::logprobs::LogprobCandidate;
use glassbox_types::models::GenerateContentConfig;
use glassbox_types::response::GenerateContentResponse;
use http::StatusCode;

use crate::client::Client;
use crate::error::{Error, Result};
use crate::prediction::{PredictionResult, RequestParameters, TokenCandidate};

/// 默认候选模型，优先级从高到低。
pub const DEFAULT_MODEL_CANDIDATES: &[&str] = &[
    "gemini-3-flash-preview",
    "gemini-2.0-flash-exp",
    "gemini-1.5-pro-002",
    "gemini-1.5-flash-002",
    "gemini-2.0-flash",
    "gemini-flash-latest",
];

/// 每字符估算费用（示意用途，不对应真实计费）。
pub const COST_PER_CHARACTER: f64 = 0.000_018_75 / 1000.0;

/// 每个位置请求的 top-K 候选数。
pub const TOP_LOGPROBS: i32 = 5;

/// 缺失 log-probability 时使用的哨兵值。
pub const MISSING_LOG_PROBABILITY: f64 = -100.0;

const SYSTEM_INSTRUCTION: &str = "You are a pure text completion engine. You are NOT a chat \
assistant. You must continue the stream of text provided by the user. Do not repeat the input. \
Do not start a new sentence unless the previous one is finished. Output ONLY the immediate next \
likely token.";

const FEW_SHOT_EXAMPLES: [(&str, &str); 3] = [
    ("The quick brown", " fox"),
    ("To be or not to", " be"),
    ("I enjoy walking in the", " rain"),
];

const GENERIC_FAILURE: &str = "Failed to generate token after multiple attempts.";

/// 按优先级尝试多个模型的预测器。
///
/// 不持有可变状态；克隆后并发调用会各自发出独立的请求序列。
#[derive(Clone)]
pub struct Predictor {
    client: Client,
    models: Vec<String>,
}

impl Predictor {
    /// 使用 [`DEFAULT_MODEL_CANDIDATES`] 创建预测器。
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self::with_models(client, DEFAULT_MODEL_CANDIDATES.iter().copied())
    }

    /// 使用自定义模型列表创建预测器。
    pub fn with_models<I, S>(client: Client, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            client,
            models: models.into_iter().map(Into::into).collect(),
        }
    }

    /// 从环境变量创建预测器。
    ///
    /// 客户端配置见 [`Client::from_env`]；`GLASSBOX_MODELS` 可用逗号分隔覆盖模型列表。
    ///
    /// # Errors
    /// 当客户端无法从环境构建时返回错误。
    pub fn from_env() -> Result<Self> {
        let client = Client::from_env()?;
        let models = std::env::var("GLASSBOX_MODELS")
            .ok()
            .map(|value| parse_model_list(&value))
            .filter(|models| !models.is_empty());
        Ok(match models {
            Some(models) => Self::with_models(client, models),
            None => Self::new(client),
        })
    }

    /// 候选模型列表。
    #[must_use]
    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// 使用已校验的参数预测。
    ///
    /// # Errors
    /// 同 [`Predictor::predict`]。
    pub async fn predict_with(&self, params: &RequestParameters) -> Result<PredictionResult> {
        self.predict(params.context_text(), params.temperature())
            .await
    }

    /// 预测 `context_text` 之后的下一个 token。
    ///
    /// # Errors
    /// 只返回 [`Error::Auth`]、[`Error::NoCompatibleModel`]、
    /// [`Error::FeatureUnavailable`] 或 [`Error::UnknownRequest`]。
    pub async fn predict(&self, context_text: &str, temperature: f64) -> Result<PredictionResult> {
        let mut attempted: Vec<String> = Vec::with_capacity(self.models.len());
        let mut last_failure: Option<(AttemptFailure, Error)> = None;

        for model in &self.models {
            attempted.push(model.clone());
            tracing::debug!(
                model = %model,
                context_chars = context_text.chars().count(),
                temperature,
                "requesting next token"
            );

            match self.attempt(model, context_text, temperature).await {
                Ok(result) => {
                    tracing::info!(
                        model = %model,
                        latency_ms = result.latency_ms(),
                        candidates = result.candidates().len(),
                        "next token predicted"
                    );
                    return Ok(result);
                }
                Err(err) => {
                    tracing::warn!(model = %model, error = %err, "model attempt failed");
                    let failure = AttemptFailure::classify(&err);
                    if failure == AttemptFailure::Fatal {
                        return Err(Error::Auth {
                            message: auth_message(err),
                        });
                    }
                    last_failure = Some((failure, err));
                }
            }
        }

        tracing::error!(attempted = ?attempted, "all model attempts failed");
        Err(match last_failure {
            Some((AttemptFailure::ModelNotFound, _)) => Error::NoCompatibleModel { attempted },
            Some((AttemptFailure::LogprobsUnsupported, _)) => Error::FeatureUnavailable,
            Some((_, err)) => Error::UnknownRequest {
                message: failure_message(err),
            },
            None => Error::UnknownRequest {
                message: GENERIC_FAILURE.into(),
            },
        })
    }

    async fn attempt(
        &self,
        model: &str,
        context_text: &str,
        temperature: f64,
    ) -> Result<PredictionResult> {
        let contents = completion_contents(context_text);
        let config = completion_config(temperature);

        let start = Instant::now();
        let response = self
            .client
            .models()
            .generate_content_with_config(model, contents, config)
            .await?;
        let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        let (chosen_token, candidates) = extract_candidates(&response);
        let estimated_cost = estimate_cost(context_text, &chosen_token);
        Ok(PredictionResult::new(
            chosen_token,
            candidates,
            latency_ms,
            estimated_cost,
            model,
        ))
    }
}

/// 使用给定 API Key 预测下一个 token（默认模型列表）。
///
/// # Errors
/// 同 [`Predictor::predict`]；无法作为请求头使用的 API Key 视为 [`Error::Auth`]。
pub async fn predict_next_token(
    api_key: &str,
    context_text: &str,
    temperature: f64,
) -> Result<PredictionResult> {
    let client = Client::new(api_key).map_err(|err| match err {
        Error::InvalidConfig { message } => Error::Auth { message },
        other => Error::UnknownRequest {
            message: other.to_string(),
        },
    })?;
    Predictor::new(client)
        .predict(context_text, temperature)
        .await
}

/// 按字符数线性估算费用。
#[must_use]
pub fn estimate_cost(context_text: &str, chosen_token: &str) -> f64 {
    let chars = context_text.chars().count() + chosen_token.chars().count();
    chars as f64 * COST_PER_CHARACTER
}

/// 单次模型尝试失败的分类。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AttemptFailure {
    /// 凭据问题，终止整个循环。
    Fatal,
    ModelNotFound,
    LogprobsUnsupported,
    Other,
}

impl AttemptFailure {
    pub(crate) fn classify(err: &Error) -> Self {
        match err {
            Error::Auth { .. } => Self::Fatal,
            Error::ApiError { status, message } => {
                let status = StatusCode::from_u16(*status).ok();
                if matches!(
                    status,
                    Some(StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
                ) || is_auth_message(message)
                {
                    Self::Fatal
                } else if status == Some(StatusCode::NOT_FOUND) || message.contains("NOT_FOUND") {
                    Self::ModelNotFound
                } else if message.to_ascii_lowercase().contains("logprobs") {
                    Self::LogprobsUnsupported
                } else {
                    Self::Other
                }
            }
            _ => Self::Other,
        }
    }
}

fn is_auth_message(message: &str) -> bool {
    ["API key not valid", "API_KEY_INVALID", "PERMISSION_DENIED"]
        .iter()
        .any(|marker| message.contains(marker))
}

fn auth_message(err: Error) -> String {
    match err {
        Error::Auth { message } | Error::ApiError { message, .. } if !message.is_empty() => message,
        other => other.to_string(),
    }
}

/// 最后一次失败的原始信息；为空时使用通用提示。
fn failure_message(err: Error) -> String {
    let message = match err {
        Error::ApiError { message, .. }
        | Error::UnknownRequest { message }
        | Error::InvalidConfig { message } => message,
        other => other.to_string(),
    };
    if message.trim().is_empty() {
        GENERIC_FAILURE.into()
    } else {
        message
    }
}

fn parse_model_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|model| !model.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// few-shot 示例在前，实时上下文作为最后一个 user 轮次。
fn completion_contents(context_text: &str) -> Vec<Content> {
    let mut contents = Vec::with_capacity(FEW_SHOT_EXAMPLES.len() * 2 + 1);
    for (input, output) in FEW_SHOT_EXAMPLES {
        contents.push(Content::user(input));
        contents.push(Content::model(output));
    }
    contents.push(Content::user(context_text));
    contents
}

#[allow(clippy::cast_possible_truncation)]
fn completion_config(temperature: f64) -> GenerateContentConfig {
    GenerateContentConfig {
        system_instruction: Some(Content::text(SYSTEM_INSTRUCTION)),
        generation_config: Some(GenerationConfig {
            temperature: Some(temperature as f32),
            max_output_tokens: Some(1),
            response_logprobs: Some(true),
            logprobs: Some(TOP_LOGPROBS),
        }),
    }
}

/// 提取选中 token 与候选列表。
///
/// 优先使用首个位置的 top candidates，其次 chosen candidates；二者都没有但有文本时，
/// 以选中 token 作为唯一候选（log-probability 为 0）。
fn extract_candidates(response: &GenerateContentResponse) -> (String, Vec<TokenCandidate>) {
    let chosen_token = response.text().unwrap_or_default();

    let logprobs = response.logprobs();
    let top = logprobs
        .and_then(|result| result.top_candidates.first())
        .map(|position| position.candidates.as_slice())
        .filter(|candidates| !candidates.is_empty());
    let chosen = logprobs
        .map(|result| result.chosen_candidates.as_slice())
        .filter(|candidates| !candidates.is_empty());

    let mut candidates: Vec<TokenCandidate> = top
        .or(chosen)
        .unwrap_or_default()
        .iter()
        .map(to_token_candidate)
        .collect();

    if candidates.is_empty() && !chosen_token.is_empty() {
        candidates.push(TokenCandidate::new(chosen_token.clone(), 0.0));
    }

    (chosen_token, candidates)
}

fn to_token_candidate(candidate: &LogprobCandidate) -> TokenCandidate {
    TokenCandidate::new(
        candidate.token.clone().unwrap_or_default(),
        candidate.log_probability.unwrap_or(MISSING_LOG_PROBABILITY),
    )
}
