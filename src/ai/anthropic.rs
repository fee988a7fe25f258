use serde_json::{json, Value};

use super::{send_error, upstream_error, AiError, AiRequest, AiResponse, Provider, Usage};

const URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
pub const MODEL: &str = "claude-3-haiku-20240307";
const MAX_TOKENS: u32 = 4000;

/// Anthropic takes the system prompt as a top-level field, not a message.
pub fn request_body(req: &AiRequest) -> Value {
    let mut body = json!({
        "model": MODEL,
        "max_tokens": req.max_tokens.unwrap_or(MAX_TOKENS),
        "system": req.system,
        "messages": [
            {"role": "user", "content": req.prompt}
        ]
    });
    if let Some(t) = req.temperature {
        body["temperature"] = json!(t);
    }
    body
}

pub fn call(
    client: &reqwest::blocking::Client,
    api_key: &str,
    req: &AiRequest,
) -> Result<AiResponse, AiError> {
    let resp = client
        .post(URL)
        .header("x-api-key", api_key)
        .header("anthropic-version", API_VERSION)
        .header("content-type", "application/json")
        .json(&request_body(req))
        .send()
        .map_err(|e| send_error(Provider::Anthropic, e))?;

    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let text = resp.text().unwrap_or_default();
        log::warn!("[ai] Anthropic returned {}", status);
        return Err(upstream_error(Provider::Anthropic, status, &text));
    }

    let json: Value = resp.json().map_err(|e| AiError::Malformed {
        provider: Provider::Anthropic,
        message: format!("Anthropic JSON parse error: {}", e),
    })?;

    parse_response(&json)
}

pub fn parse_response(json: &Value) -> Result<AiResponse, AiError> {
    let blocks = json
        .get("content")
        .and_then(|c| c.as_array())
        .ok_or_else(|| AiError::Malformed {
            provider: Provider::Anthropic,
            message: "response has no content blocks".into(),
        })?;

    // Long answers can come back split across several text blocks
    let text: String = blocks
        .iter()
        .filter(|b| b.get("type").and_then(|t| t.as_str()).unwrap_or("text") == "text")
        .filter_map(|b| b.get("text").and_then(|t| t.as_str()))
        .collect::<Vec<_>>()
        .join("");

    let usage = json.get("usage").map(|u| Usage {
        input_tokens: u.get("input_tokens").and_then(|v| v.as_u64()).unwrap_or(0),
        output_tokens: u.get("output_tokens").and_then(|v| v.as_u64()).unwrap_or(0),
    });

    let model = json
        .get("model")
        .and_then(|m| m.as_str())
        .unwrap_or(MODEL)
        .to_string();

    Ok(AiResponse {
        text,
        provider: Provider::Anthropic,
        model,
        usage,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_prompt_is_top_level() {
        let req = AiRequest {
            system: "persona".into(),
            prompt: "write".into(),
            max_tokens: None,
            temperature: None,
        };
        let body = request_body(&req);
        assert_eq!(body["system"], "persona");
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["max_tokens"], 4000);
        assert!(body.get("temperature").is_none());
    }

    #[test]
    fn joins_text_blocks_and_reads_usage() {
        let json = json!({
            "model": MODEL,
            "content": [
                {"type": "text", "text": "# Part one\n"},
                {"type": "text", "text": "Part two"}
            ],
            "usage": {"input_tokens": 50, "output_tokens": 700}
        });
        let resp = parse_response(&json).unwrap();
        assert_eq!(resp.text, "# Part one\nPart two");
        assert_eq!(resp.usage.unwrap().output_tokens, 700);
    }

    #[test]
    fn missing_content_is_malformed() {
        assert!(parse_response(&json!({"id": "msg_1"})).is_err());
    }
}
