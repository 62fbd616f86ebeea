#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use glassbox::{Client, Predictor};

pub fn build_gemini_client(base_url: &str) -> Client {
    Client::builder()
        .api_key("test-key")
        .base_url(base_url)
        .build()
        .unwrap()
}

pub fn build_predictor(base_url: &str, models: &[&str]) -> Predictor {
    Predictor::with_models(build_gemini_client(base_url), models.iter().copied())
}

pub fn generate_path(model: &str) -> String {
    format!("/v1beta/models/{model}:generateContent")
}

/// 单 token 响应，带首位置 top candidates。
pub fn logprobs_response(chosen: &str, top: &[(&str, f64)]) -> Value {
    let candidates: Vec<Value> = top
        .iter()
        .enumerate()
        .map(|(idx, (token, log_probability))| {
            json!({"token": token, "tokenId": idx, "logProbability": log_probability})
        })
        .collect();
    let chosen_log_probability = top.first().map_or(0.0, |(_, lp)| *lp);
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": chosen}]},
            "finishReason": "MAX_TOKENS",
            "logprobsResult": {
                "topCandidates": [{"candidates": candidates}],
                "chosenCandidates": [
                    {"token": chosen, "logProbability": chosen_log_probability}
                ]
            }
        }]
    })
}

pub fn ok_logprobs(chosen: &str, top: &[(&str, f64)]) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(logprobs_response(chosen, top))
}

pub fn json_response(status: u16, body: Value) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(body)
}

pub fn not_found_body(model: &str) -> Value {
    let message = format!(
        "models/{model} is not found for API version v1beta, \
         or is not supported for generateContent."
    );
    json!({
        "error": {
            "code": 404,
            "message": message,
            "status": "NOT_FOUND"
        }
    })
}

pub fn invalid_key_body() -> Value {
    json!({
        "error": {
            "code": 400,
            "message": "API key not valid. Please pass a valid API key.",
            "status": "INVALID_ARGUMENT",
            "details": [{"reason": "API_KEY_INVALID"}]
        }
    })
}

pub fn logprobs_unsupported_body() -> Value {
    json!({
        "error": {
            "code": 400,
            "message": "Logprobs is not supported for the current model.",
            "status": "INVALID_ARGUMENT"
        }
    })
}

/// 为指定模型挂载固定响应，并断言请求次数。
pub async fn mount_model(
    server: &MockServer,
    model: &str,
    response: ResponseTemplate,
    expected_calls: u64,
) {
    Mock::given(method("POST"))
        .and(path(generate_path(model)))
        .respond_with(response)
        .expect(expected_calls)
        .mount(server)
        .await;
}
