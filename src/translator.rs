//! Translation through the Gemini `generateContent` API.
//!
//! A [`Translator`] is a session built once per run from a backend, a
//! target language, and a tone. It issues exactly one remote call per
//! text unit; retries are handled by the caller.

use crate::config::ApiConfig;
use crate::console::Console;
use crate::error::{TranslationError, UnitKind};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// System instruction used by the API key probe.
const PROBE_INSTRUCTION: &str = "Respond concisely.";

/// Prompt sent by the API key probe.
const PROBE_PROMPT: &str = "Hello Gemini";

/// Builds the system instruction for a translation session.
pub fn system_instruction(language: &str, tone: &str) -> String {
    format!(
        "You are an AI specialized in translating books.\n\
         Translate all text into {language}.\n\
         Maintain a {tone} tone throughout the translation.\n\
         Use words that are simple to understand with modern and formal diction (avoid slang or gen-z terms).\n\
         Ensure readers are engaged.\n\
         Crucially, only produce the translated text, without any additional commentary, introductions, or conclusions."
    )
}

/// Prompt for a body paragraph.
pub fn paragraph_prompt(text: &str) -> String {
    format!("Translate the following paragraph. Text: {}", text)
}

/// Prompt for a chapter title or section heading.
pub fn heading_prompt(text: &str) -> String {
    format!(
        "Translate the following chapter title or section heading. Title/Heading: {}",
        text
    )
}

/// A text-generation service that answers a prompt under a system instruction.
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    /// Issues one call and returns the trimmed response text.
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, TranslationError>;
}

/// A text part in a Gemini request or response.
#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

/// A content block holding parts.
#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

/// Request body for `generateContent`.
#[derive(Debug, Serialize)]
struct GenerateRequest {
    system_instruction: Content,
    contents: Vec<Content>,
}

/// Response body from `generateContent`.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

/// A single candidate in the response.
#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateRequest {
    fn new(system: &str, prompt: &str) -> Self {
        Self {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: Some(system.to_string()),
                }],
            },
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        }
    }
}

/// Extracts the text of the first candidate from a response body.
fn extract_text(body: &str) -> Result<String, TranslationError> {
    let response: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| TranslationError::ParseError(format!("Invalid JSON: {}", e)))?;

    let content = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .ok_or_else(|| TranslationError::ParseError("No candidates in API response".to_string()))?;

    let texts: Vec<String> = content.parts.into_iter().filter_map(|p| p.text).collect();
    if texts.is_empty() {
        return Err(TranslationError::ParseError(
            "Candidate contained no text part".to_string(),
        ));
    }

    Ok(texts.concat().trim().to_string())
}

/// Gemini REST client.
pub struct GeminiClient {
    client: Client,
    api_config: ApiConfig,
}

impl GeminiClient {
    pub fn new(api_config: ApiConfig) -> Result<Self, TranslationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(api_config.timeout_sec))
            .build()?;

        Ok(Self { client, api_config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_config.base_url.trim_end_matches('/'),
            self.api_config.model
        )
    }
}

#[async_trait]
impl TranslationBackend for GeminiClient {
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, TranslationError> {
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_config.key)
            .json(&GenerateRequest::new(system, prompt))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(TranslationError::ApiError(format!("HTTP {}: {}", status, body)));
        }

        extract_text(&body)
    }
}

/// A configured translation session.
pub struct Translator<B> {
    backend: B,
    system_instruction: String,
    console: Console,
}

impl<B: TranslationBackend> Translator<B> {
    /// Create a new session translating into `language` with the given `tone`.
    pub fn new(backend: B, language: &str, tone: &str) -> Self {
        Self {
            backend,
            system_instruction: system_instruction(language, tone),
            console: Console::new(),
        }
    }

    /// Replaces the console used for error reporting.
    pub fn with_console(mut self, console: Console) -> Self {
        self.console = console;
        self
    }

    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Translate one body paragraph.
    pub async fn translate_paragraph(&self, text: &str) -> Result<String, TranslationError> {
        self.translate(text, UnitKind::Paragraph).await
    }

    /// Translate one chapter title or section heading.
    pub async fn translate_heading(&self, text: &str) -> Result<String, TranslationError> {
        self.translate(text, UnitKind::Heading).await
    }

    async fn translate(&self, text: &str, kind: UnitKind) -> Result<String, TranslationError> {
        let prompt = match kind {
            UnitKind::Paragraph => paragraph_prompt(text),
            UnitKind::Heading => heading_prompt(text),
        };

        match self.backend.generate(&self.system_instruction, &prompt).await {
            Ok(translated) => Ok(translated.trim().to_string()),
            Err(e) => {
                self.console
                    .error(&format!("Error during {} translation: {}", kind, e));
                Err(TranslationError::Failed { kind })
            }
        }
    }
}

/// Probes the backend with a trivial call.
///
/// Returns true when the call returns any text.
pub async fn check_api_key<B: TranslationBackend + ?Sized>(backend: &B, console: &Console) -> bool {
    match backend.generate(PROBE_INSTRUCTION, PROBE_PROMPT).await {
        Ok(reply) => {
            console.success("API key is valid.");
            console.info(&format!("Test response: {}", reply.trim()));
            true
        }
        Err(e) => {
            console.error("Invalid API key or another error occurred during validation.");
            console.error(&format!("{}", e));
            false
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedBackend;
    use super::*;

    fn quiet() -> Console {
        Console::with_colors(false)
    }

    #[test]
    fn test_system_instruction_embeds_settings() {
        let instruction = system_instruction("Telugu", "formal");
        assert!(instruction.contains("Translate all text into Telugu."));
        assert!(instruction.contains("Maintain a formal tone"));
        assert!(instruction.contains("avoid slang"));
        assert!(instruction.contains("only produce the translated text"));
    }

    #[test]
    fn test_prompt_framing() {
        assert_eq!(
            paragraph_prompt("Hello!"),
            "Translate the following paragraph. Text: Hello!"
        );
        assert!(heading_prompt("Intro").ends_with("Title/Heading: Intro"));
    }

    #[test]
    fn test_request_shape() {
        let value = serde_json::to_value(GenerateRequest::new("sys", "hi")).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "system_instruction": {"parts": [{"text": "sys"}]},
                "contents": [{"role": "user", "parts": [{"text": "hi"}]}]
            })
        );
    }

    #[test]
    fn test_extract_text() {
        let body = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"  Bonjour!\n"}]},"finishReason":"STOP"}]}"#;
        assert_eq!(extract_text(body).unwrap(), "Bonjour!");
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"Bon"},{"text":"jour"}]}}]}"#;
        assert_eq!(extract_text(body).unwrap(), "Bonjour");
    }

    #[test]
    fn test_extract_text_errors() {
        assert!(matches!(
            extract_text(r#"{"candidates":[]}"#),
            Err(TranslationError::ParseError(_))
        ));
        assert!(matches!(
            extract_text(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#),
            Err(TranslationError::ParseError(_))
        ));
        assert!(matches!(
            extract_text("not json"),
            Err(TranslationError::ParseError(_))
        ));
        assert!(matches!(
            extract_text(r#"{"candidates":[{"content":{"parts":[]}}]}"#),
            Err(TranslationError::ParseError(_))
        ));
    }

    #[test]
    fn test_extract_text_empty_part_is_text() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":""}]}}]}"#;
        assert_eq!(extract_text(body).unwrap(), "");

        let body = r#"{"candidates":[{"content":{"parts":[{"text":"  \n "}]}}]}"#;
        assert_eq!(extract_text(body).unwrap(), "");
    }

    #[test]
    fn test_endpoint() {
        let mut config = ApiConfig::default();
        config.base_url = "https://example.test/v1beta/".to_string();
        let client = GeminiClient::new(config).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://example.test/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_with_console_replaces_default() {
        let console = Console::with_colors(true);
        let translator =
            Translator::new(ScriptedBackend::failing(), "French", "simple").with_console(console);
        assert_eq!(translator.console, console);

        let translator = translator.with_console(quiet());
        assert_eq!(translator.console, quiet());
    }

    #[tokio::test]
    async fn test_translate_paragraph_success() {
        let translator =
            Translator::new(ScriptedBackend::new(vec![Ok(" Bonjour! ")]), "French", "simple")
                .with_console(quiet());

        let result = translator.translate_paragraph("Hello!").await.unwrap();
        assert_eq!(result, "Bonjour!");

        let calls = translator.backend.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, translator.system_instruction());
        assert_eq!(calls[0].1, paragraph_prompt("Hello!"));
    }

    #[tokio::test]
    async fn test_translate_failure_is_uniform() {
        let translator = Translator::new(ScriptedBackend::failing(), "French", "simple")
            .with_console(quiet());

        let err = translator.translate_paragraph("Hello!").await.unwrap_err();
        assert!(matches!(
            err,
            TranslationError::Failed {
                kind: UnitKind::Paragraph
            }
        ));

        let err = translator.translate_heading("Intro").await.unwrap_err();
        assert!(matches!(
            err,
            TranslationError::Failed {
                kind: UnitKind::Heading
            }
        ));
    }

    #[tokio::test]
    async fn test_heading_uses_heading_prompt() {
        let translator = Translator::new(ScriptedBackend::always("Introduction"), "English", "formal")
            .with_console(quiet());

        assert_eq!(translator.translate_heading("Einleitung").await.unwrap(), "Introduction");
        assert_eq!(translator.backend.calls()[0].1, heading_prompt("Einleitung"));
    }

    #[tokio::test]
    async fn test_check_api_key() {
        let console = quiet();

        assert!(check_api_key(&ScriptedBackend::always("anything at all"), &console).await);
        assert!(check_api_key(&ScriptedBackend::always(""), &console).await);
        assert!(!check_api_key(&ScriptedBackend::failing(), &console).await);

        let probe = ScriptedBackend::always("hi");
        check_api_key(&probe, &console).await;
        assert_eq!(
            probe.calls(),
            vec![(PROBE_INSTRUCTION.to_string(), PROBE_PROMPT.to_string())]
        );
    }
}
