//! Converter module.

use serde_json::Value;

use crate::models::GenerateContentRequest;
use crate::response::GenerateContentResponse;

/// `GenerateContent` 请求转换（Gemini API）。
///
/// # Errors
/// 当序列化失败时返回错误。
pub fn generate_content_request_to_mldev(
    request: &GenerateContentRequest,
) -> Result<Value, serde_json::Error> {
    serde_json::to_value(request)
}

/// `GenerateContent` 响应转换（Gemini API）。
///
/// # Errors
/// 当反序列化失败时返回错误。
pub fn generate_content_response_from_mldev(
    value: Value,
) -> Result<GenerateContentResponse, serde_json::Error> {
    serde_json::from_value(value)
}
