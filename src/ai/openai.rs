use serde_json::{json, Value};

use super::{send_error, upstream_error, AiError, AiRequest, AiResponse, Provider, Usage};

const URL: &str = "https://api.openai.com/v1/chat/completions";
pub const MODEL: &str = "gpt-4o-mini";
const MAX_TOKENS: u32 = 4000;
const TEMPERATURE: f32 = 0.7;
const PRESENCE_PENALTY: f32 = 0.1;
const FREQUENCY_PENALTY: f32 = 0.1;

pub fn request_body(req: &AiRequest) -> Value {
    json!({
        "model": MODEL,
        "messages": [
            {"role": "system", "content": req.system},
            {"role": "user", "content": req.prompt}
        ],
        "max_tokens": req.max_tokens.unwrap_or(MAX_TOKENS),
        "temperature": req.temperature.unwrap_or(TEMPERATURE),
        "presence_penalty": PRESENCE_PENALTY,
        "frequency_penalty": FREQUENCY_PENALTY
    })
}

pub fn call(
    client: &reqwest::blocking::Client,
    api_key: &str,
    req: &AiRequest,
) -> Result<AiResponse, AiError> {
    let resp = client
        .post(URL)
        .header("Authorization", format!("Bearer {}", api_key))
        .header("Content-Type", "application/json")
        .json(&request_body(req))
        .send()
        .map_err(|e| send_error(Provider::OpenAi, e))?;

    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let text = resp.text().unwrap_or_default();
        log::warn!("[ai] OpenAI returned {}", status);
        return Err(upstream_error(Provider::OpenAi, status, &text));
    }

    let json: Value = resp.json().map_err(|e| AiError::Malformed {
        provider: Provider::OpenAi,
        message: format!("OpenAI JSON parse error: {}", e),
    })?;

    parse_response(&json)
}

pub fn parse_response(json: &Value) -> Result<AiResponse, AiError> {
    let text = json
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .ok_or_else(|| AiError::Malformed {
            provider: Provider::OpenAi,
            message: "response has no choices[0].message.content".into(),
        })?
        .to_string();

    let usage = json.get("usage").map(|u| Usage {
        input_tokens: u.get("prompt_tokens").and_then(|v| v.as_u64()).unwrap_or(0),
        output_tokens: u
            .get("completion_tokens")
            .and_then(|v| v.as_u64())
            .unwrap_or(0),
    });

    let model = json
        .get("model")
        .and_then(|m| m.as_str())
        .unwrap_or(MODEL)
        .to_string();

    Ok(AiResponse {
        text,
        provider: Provider::OpenAi,
        model,
        usage,
    })
}
