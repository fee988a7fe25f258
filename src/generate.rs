use rocket::http::Status;
use serde_json::Value;
use std::time::Instant;

use crate::ai::prompts::{self, InputKind, PromptOptions};
use crate::ai::{self, AiError, AiRequest, ChatBackend, Provider, Usage};
use crate::content::affiliate::{self, AffiliateNetworkConfig, Network};
use crate::content::demo::demo_content;
use crate::content::funnel::FunnelTemplate;
use crate::content::{self, ProcessedContent};

pub const MIN_TOPIC_CHARS: usize = 3;
pub const MAX_TOPIC_CHARS: usize = 2000;
pub const DEFAULT_WORD_COUNT: i64 = 1200;
pub const MIN_WORD_COUNT: i64 = 300;
pub const MAX_WORD_COUNT: i64 = 5000;

// ── Request Types ─────────────────────────────────────

/// Wire body of `POST /api/generate`. Each field is read on its own, so a
/// field with an unexpected type is dropped without losing its siblings.
#[derive(Debug, Default)]
pub struct GenerateBody {
    pub input_value: Option<String>,
    pub input_type: Option<String>,
    pub selected_niche: Option<String>,
    pub api_provider: Option<String>,
    pub word_count: Option<i64>,
    pub include_affiliate: Option<bool>,
    pub seo_optimized: Option<bool>,
    pub template: Option<String>,
    pub affiliate: Option<AffiliateNetworkConfig>,
    pub demo_fallback: bool,
}

impl GenerateBody {
    /// Anything that is not a JSON object becomes an empty body and fails
    /// validation downstream.
    pub fn from_json(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(v) => Self::from_value(&v),
            Err(_) => GenerateBody::default(),
        }
    }

    pub fn from_value(v: &Value) -> Self {
        let text = |key: &str| v.get(key).and_then(Value::as_str).map(str::to_string);
        let flag = |key: &str| v.get(key).and_then(Value::as_bool);

        GenerateBody {
            input_value: text("inputValue"),
            input_type: text("inputType"),
            selected_niche: text("selectedNiche"),
            api_provider: text("apiProvider"),
            word_count: v.get("wordCount").and_then(number),
            include_affiliate: flag("includeAffiliate"),
            seo_optimized: flag("seoOptimized"),
            template: text("template"),
            affiliate: v.get("affiliate").and_then(affiliate_config),
            demo_fallback: flag("demoFallback").unwrap_or(false),
        }
    }
}

/// Integer, float (truncated) or numeric string
fn number(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f.trunc() as i64),
        _ => None,
    }
}

/// Nulls are stripped first so they fall back to field defaults
fn affiliate_config(v: &Value) -> Option<AffiliateNetworkConfig> {
    match serde_json::from_value(strip_nulls(v)) {
        Ok(config) => Some(config),
        Err(e) => {
            log::warn!("[generate] ignoring affiliate settings: {}", e);
            None
        }
    }
}

fn strip_nulls(v: &Value) -> Value {
    match v {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k.clone(), strip_nulls(v)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// A validated generation request
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub topic: String,
    pub input_kind: InputKind,
    pub niche: Option<String>,
    pub provider: Provider,
    pub options: PromptOptions,
    pub template: FunnelTemplate,
    pub affiliate: AffiliateNetworkConfig,
    pub demo_fallback: bool,
}

impl GenerationRequest {
    pub fn from_body(body: GenerateBody) -> Result<Self, GenerateError> {
        let topic = body.input_value.unwrap_or_default().trim().to_string();
        let len = topic.chars().count();
        if len < MIN_TOPIC_CHARS {
            return Err(GenerateError::InvalidInput(format!(
                "Invalid input: inputValue must be at least {} characters",
                MIN_TOPIC_CHARS
            )));
        }
        if len > MAX_TOPIC_CHARS {
            return Err(GenerateError::InvalidInput(format!(
                "Invalid input: inputValue must be at most {} characters",
                MAX_TOPIC_CHARS
            )));
        }

        let provider_flag = body.api_provider.unwrap_or_else(|| "openai".to_string());
        let provider = Provider::from_str(&provider_flag)
            .ok_or(GenerateError::UnknownProvider(provider_flag))?;

        let kind_flag = body.input_type.unwrap_or_else(|| "keyword".to_string());
        let (input_kind, known) = InputKind::parse(&kind_flag);
        if !known {
            log::warn!("Unknown inputType '{}', treating it as a free prompt", kind_flag);
        }

        let word_count = body
            .word_count
            .unwrap_or(DEFAULT_WORD_COUNT)
            .clamp(MIN_WORD_COUNT, MAX_WORD_COUNT) as u32;

        Ok(GenerationRequest {
            topic,
            input_kind,
            niche: body
                .selected_niche
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            provider,
            options: PromptOptions {
                word_count,
                include_affiliate: body.include_affiliate.unwrap_or(true),
                seo_optimized: body.seo_optimized.unwrap_or(true),
            },
            template: FunnelTemplate::parse(body.template.as_deref().unwrap_or("")),
            affiliate: body.affiliate.unwrap_or_default(),
            demo_fallback: body.demo_fallback,
        })
    }
}

// ── Errors ────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum GenerateError {
    InvalidInput(String),
    UnknownProvider(String),
    Provider(AiError),
}

impl std::fmt::Display for GenerateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerateError::InvalidInput(msg) => write!(f, "{}", msg),
            GenerateError::UnknownProvider(p) => write!(f, "Unknown provider: {}", p),
            GenerateError::Provider(e) => write!(f, "{}", e),
        }
    }
}

impl From<AiError> for GenerateError {
    fn from(e: AiError) -> Self {
        GenerateError::Provider(e)
    }
}

impl GenerateError {
    pub fn status(&self) -> Status {
        match self {
            GenerateError::InvalidInput(_) | GenerateError::UnknownProvider(_) => {
                Status::BadRequest
            }
            GenerateError::Provider(AiError::MissingApiKey(_)) => Status::InternalServerError,
            GenerateError::Provider(AiError::Upstream { status, .. }) => {
                match *status {
                    400..=599 => Status::new(*status),
                    _ => Status::BadGateway,
                }
            }
            GenerateError::Provider(AiError::Network { .. }) => Status::InternalServerError,
            GenerateError::Provider(AiError::Malformed { .. }) => Status::BadGateway,
        }
    }
}

// ── Pipeline ──────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub content: ProcessedContent,
    pub provider: Provider,
    pub model: Option<String>,
    pub usage: Option<Usage>,
    pub template: FunnelTemplate,
    pub affiliate_network: Option<Network>,
    pub links_inserted: usize,
    pub is_demo: bool,
    /// Why demo content was served instead of a live draft
    pub notice: Option<String>,
}

/// Validate-free core: build prompts, make one provider call, post-process.
/// Missing keys always fail; provider and network failures fall back to
/// demo content only when the request asked for it.
pub fn run(
    backend: &dyn ChatBackend,
    req: &GenerationRequest,
    api_key: Option<&str>,
) -> Result<GenerationOutcome, GenerateError> {
    let started = Instant::now();
    let (system, prompt) =
        prompts::build(&req.topic, req.input_kind, req.niche.as_deref(), &req.options);
    let ai_req = AiRequest {
        system,
        prompt,
        max_tokens: None,
        temperature: None,
    };

    match ai::complete(backend, req.provider, api_key, &ai_req) {
        Ok(resp) => {
            log::debug!(
                "[generate] raw response preview: {}",
                resp.text.chars().take(300).collect::<String>()
            );
            let processed = content::process(&resp.text, &req.topic);
            let outcome = decorate(req, processed, false, None, Some(resp.model), resp.usage);
            log::info!(
                "[generate] provider={} kind={} words={} seo={} in {}ms",
                req.provider.name(),
                req.input_kind.name(),
                outcome.content.word_count,
                outcome.content.seo_score,
                started.elapsed().as_millis()
            );
            Ok(outcome)
        }
        Err(e @ AiError::MissingApiKey(_)) => Err(e.into()),
        Err(e) if req.demo_fallback => {
            log::warn!("[generate] {} failed, serving demo content: {}", req.provider.label(), e);
            let demo = demo_content(&req.topic, req.niche.as_deref(), req.provider);
            let notice = format!("Failed to generate content. {}", e);
            Ok(decorate(req, demo, true, Some(notice), None, None))
        }
        Err(e) => Err(e.into()),
    }
}

/// Apply affiliate links and the funnel marker to processed content
fn decorate(
    req: &GenerationRequest,
    mut content: ProcessedContent,
    is_demo: bool,
    notice: Option<String>,
    model: Option<String>,
    usage: Option<Usage>,
) -> GenerationOutcome {
    let mut affiliate_network = None;
    let mut links_inserted = 0;
    if req.options.include_affiliate {
        let sub = affiliate::substitute_links(&content.content, &req.affiliate, &req.topic);
        content.content = sub.text;
        affiliate_network = sub.network;
        links_inserted = sub.replaced;
    }
    content.content = req.template.apply(&content.content);

    GenerationOutcome {
        content,
        provider: req.provider,
        model,
        usage,
        template: req.template,
        affiliate_network,
        links_inserted,
        is_demo,
        notice,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Returns a canned reply and remembers the prompts it saw
    struct Canned {
        reply: Result<String, AiError>,
        seen: Mutex<Vec<AiRequest>>,
    }

    impl Canned {
        fn ok(text: &str) -> Self {
            Canned {
                reply: Ok(text.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }
        fn err(e: AiError) -> Self {
            Canned {
                reply: Err(e),
                seen: Mutex::new(Vec::new()),
            }
        }
        fn calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    impl ChatBackend for Canned {
        fn call(&self, provider: Provider, _: &str, req: &AiRequest) -> Result<ai::AiResponse, AiError> {
            self.seen.lock().unwrap().push(req.clone());
            self.reply.clone().map(|text| ai::AiResponse {
                text,
                provider,
                model: "stub-model".into(),
                usage: Some(Usage {
                    input_tokens: 10,
                    output_tokens: 20,
                }),
            })
        }
    }

    fn body(json: &str) -> GenerateBody {
        GenerateBody::from_json(json)
    }

    fn request(json: &str) -> GenerationRequest {
        GenerationRequest::from_body(body(json)).unwrap()
    }

    #[test]
    fn short_and_long_topics_are_rejected() {
        let err = GenerationRequest::from_body(body(r#"{"inputValue":"ok"}"#)).unwrap_err();
        assert_eq!(err.status(), Status::BadRequest);
        let long = format!(r#"{{"inputValue":"{}"}}"#, "a".repeat(2001));
        assert!(GenerationRequest::from_body(body(&long)).is_err());
        let max = format!(r#"{{"inputValue":"{}"}}"#, "a".repeat(2000));
        assert!(GenerationRequest::from_body(body(&max)).is_ok());
    }

    #[test]
    fn topic_is_trimmed_before_length_check() {
        assert!(GenerationRequest::from_body(body(r#"{"inputValue":"  ab  "}"#)).is_err());
    }

    #[test]
    fn malformed_body_fails_validation() {
        let err = GenerationRequest::from_body(body("not json")).unwrap_err();
        assert!(matches!(err, GenerateError::InvalidInput(_)));
        let wrong_type = GenerationRequest::from_body(body(r#"{"inputValue": 42}"#));
        assert!(wrong_type.is_err());
    }

    #[test]
    fn bad_sibling_field_keeps_input_value() {
        let req = request(r#"{"inputValue":"keto recipes","wordCount":1500.5,"seoOptimized":"yes"}"#);
        assert_eq!(req.topic, "keto recipes");
        assert_eq!(req.options.word_count, 1500);
        assert!(req.options.seo_optimized);

        let req = request(r#"{"inputValue":"keto recipes","wordCount":"1800"}"#);
        assert_eq!(req.options.word_count, 1800);

        let req = request(r#"{"inputValue":"keto recipes","wordCount":[1]}"#);
        assert_eq!(req.options.word_count, 1200);
    }

    #[test]
    fn null_affiliate_fields_fall_back_to_defaults() {
        let req = request(
            r#"{"inputValue":"keto recipes","affiliate":{"amazon":{"enabled":true,"tag":null}}}"#,
        );
        assert_eq!(req.affiliate.enabled(), vec![Network::Amazon]);
        assert!(req.affiliate.amazon.tag.is_empty());

        let req = request(r#"{"inputValue":"keto recipes","affiliate":{"amazon":{"enabled":"on"}}}"#);
        assert!(req.affiliate.enabled().is_empty());
    }

    #[test]
    fn defaults_and_clamping() {
        let req = request(r#"{"inputValue":"keto recipes","wordCount":99999,"inputType":"video"}"#);
        assert_eq!(req.provider, Provider::OpenAi);
        assert_eq!(req.input_kind, InputKind::Prompt);
        assert_eq!(req.options.word_count, 5000);
        assert!(req.options.include_affiliate);
        assert_eq!(req.template, FunnelTemplate::Minimalist);
        let low = request(r#"{"inputValue":"keto recipes","wordCount":-5}"#);
        assert_eq!(low.options.word_count, 300);
    }

    #[test]
    fn unknown_provider_is_bad_request() {
        let err = GenerationRequest::from_body(body(
            r#"{"inputValue":"keto recipes","apiProvider":"gemini"}"#,
        ))
        .unwrap_err();
        assert_eq!(err, GenerateError::UnknownProvider("gemini".into()));
        assert_eq!(err.status(), Status::BadRequest);
    }

    #[test]
    fn missing_key_skips_backend_even_with_fallback() {
        let backend = Canned::ok("# Hi");
        let req = request(r#"{"inputValue":"keto recipes","apiProvider":"anthropic","demoFallback":true}"#);
        let err = run(&backend, &req, None).unwrap_err();
        assert_eq!(err.status(), Status::InternalServerError);
        assert_eq!(err.to_string(), "Missing ANTHROPIC_API_KEY");
        assert_eq!(backend.calls(), 0);
    }

    #[test]
    fn success_processes_and_decorates() {
        let draft = "# Keto Recipes That Work\n\n\
                     I recommend starting with one simple breakfast and one dinner each week. [AFFILIATE_LINK: Meal Plan]\n\n\
                     Later you can add more [AFFILIATE_LINK].";
        let backend = Canned::ok(draft);
        let req = request(
            r#"{"inputValue":"keto recipes","selectedNiche":"Health","template":"quiz",
                "affiliate":{"amazon":{"enabled":true,"tag":"me-20"}}}"#,
        );
        let out = run(&backend, &req, Some("sk-test")).unwrap();
        assert_eq!(backend.calls(), 1);
        assert_eq!(out.content.title, "Keto Recipes That Work");
        assert!(out.content.content.starts_with("<!-- funnel-template: quiz -->\n# Keto"));
        assert_eq!(out.links_inserted, 2);
        assert_eq!(out.affiliate_network, Some(Network::Amazon));
        assert!(out.content.content.contains("tag=me-20"));
        assert_eq!(out.model.as_deref(), Some("stub-model"));
        assert!(!out.is_demo);

        let seen = backend.seen.lock().unwrap();
        assert!(seen[0].system.contains("Health niche"));
        assert!(seen[0].prompt.contains("keto recipes"));
    }

    #[test]
    fn metrics_come_from_the_raw_draft() {
        let draft = "# Title\n\nSome body text that is long enough to be a real paragraph here.";
        let backend = Canned::ok(draft);
        let req = request(r#"{"inputValue":"keto recipes","template":"story"}"#);
        let out = run(&backend, &req, Some("k")).unwrap();
        assert_eq!(out.content.word_count, content::extract::count_words(draft));
        assert_eq!(out.content.title, "Title");
    }

    #[test]
    fn affiliate_off_leaves_placeholders() {
        let backend = Canned::ok("Buy [AFFILIATE_LINK] now");
        let req = request(
            r#"{"inputValue":"keto recipes","includeAffiliate":false,
                "affiliate":{"jvzoo":{"enabled":true}}}"#,
        );
        let out = run(&backend, &req, Some("k")).unwrap();
        assert!(out.content.content.contains("[AFFILIATE_LINK]"));
        assert_eq!(out.links_inserted, 0);
    }

    #[test]
    fn upstream_status_is_forwarded() {
        let backend = Canned::err(AiError::Upstream {
            provider: Provider::OpenAi,
            status: 429,
            message: "Rate limit reached".into(),
        });
        let req = request(r#"{"inputValue":"keto recipes"}"#);
        let err = run(&backend, &req, Some("k")).unwrap_err();
        assert_eq!(err.status(), Status::TooManyRequests);
        assert_eq!(err.to_string(), "Rate limit reached");
    }

    #[test]
    fn unnamed_upstream_codes_are_forwarded() {
        let overloaded = GenerateError::Provider(AiError::Upstream {
            provider: Provider::Anthropic,
            status: 529,
            message: "Overloaded".into(),
        });
        assert_eq!(overloaded.status().code, 529);

        let odd = GenerateError::Provider(AiError::Upstream {
            provider: Provider::OpenAi,
            status: 302,
            message: "moved".into(),
        });
        assert_eq!(odd.status(), Status::BadGateway);
    }

    #[test]
    fn demo_fallback_on_network_failure() {
        let backend = Canned::err(AiError::Network {
            provider: Provider::OpenAi,
            message: "timed out".into(),
        });
        let req = request(r#"{"inputValue":"keto recipes","demoFallback":true}"#);
        let out = run(&backend, &req, Some("k")).unwrap();
        assert!(out.is_demo);
        assert!(out.content.title.ends_with("(Demo)"));
        assert_eq!(
            out.notice.as_deref(),
            Some("Failed to generate content. Failed to reach OpenAI. Please try again.")
        );
        assert!(out.model.is_none());
    }

    #[test]
    fn malformed_reply_is_bad_gateway() {
        let err = GenerateError::Provider(AiError::Malformed {
            provider: Provider::Anthropic,
            message: "x".into(),
        });
        assert_eq!(err.status(), Status::BadGateway);
    }
}
