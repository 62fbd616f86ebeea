//! Error definitions for the explorer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP client error: {source}")]
    HttpClient {
        #[from]
        source: reqwest::Error,
    },

    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    /// 凭据无效或无权限；不会在其他模型上重试。
    #[error("Auth error: {message}")]
    Auth { message: String },

    /// 所有候选模型都不存在或不可用。
    #[error(
        "Could not find a compatible model. Tried: {}. Please check your API key access.",
        .attempted.join(", ")
    )]
    NoCompatibleModel { attempted: Vec<String> },

    /// 可访问的模型均不支持 logprobs。
    #[error("Logprobs feature is currently unavailable for the models accessible by your key.")]
    FeatureUnavailable,

    /// 其他失败，携带最后一次尝试的错误信息。
    #[error("{message}")]
    UnknownRequest { message: String },
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_compatible_model_lists_attempts() {
        let err = Error::NoCompatibleModel {
            attempted: vec!["gemini-a".into(), "gemini-b".into()],
        };
        let message = err.to_string();
        assert!(message.contains("Tried: gemini-a, gemini-b."));
    }

    #[test]
    fn api_error_display_includes_status() {
        let err = Error::ApiError {
            status: 404,
            message: "NOT_FOUND".into(),
        };
        assert_eq!(err.to_string(), "API error (status 404): NOT_FOUND");
    }
}
