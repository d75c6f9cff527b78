use std::time::Duration;

use async_trait::async_trait;
use eyre::{Result, bail};
use log::debug;

use crate::config::{self, Config, LLM_API_KEY_VAR};
use crate::pipeline::Summarizer;

const SYSTEM_PROMPT: &str = "You are an expert content summarizer. Create a concise summary with key points.";

/// Client for an OpenAI-compatible chat-completion endpoint
pub struct ChatCompletions {
    client: reqwest::Client,
    base_url: String,
    model: String,
    temperature: f64,
    max_tokens: u32,
    max_transcript_chars: usize,
    timeout: Duration,
}

impl ChatCompletions {
    pub fn from_config(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.base_url(),
            model: config.model(),
            temperature: config.temperature(),
            max_tokens: config.max_tokens(),
            max_transcript_chars: config.max_transcript_chars(),
            timeout: config.summary_timeout(),
        }
    }

    fn request_body(&self, transcript: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "messages": [
                {
                    "role": "system",
                    "content": SYSTEM_PROMPT
                },
                {
                    "role": "user",
                    "content": user_prompt(transcript, self.max_transcript_chars)
                }
            ],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens
        })
    }
}

#[async_trait]
impl Summarizer for ChatCompletions {
    async fn summarize(&self, transcript: &str) -> Result<String> {
        let api_key = config::api_key(LLM_API_KEY_VAR)?;

        debug!("Summarizing via {} with model {}", self.base_url, self.model);

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&api_key)
            .header("Content-Type", "application/json")
            .json(&self.request_body(transcript))
            .timeout(self.timeout)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("API returned {status}: {body}");
        }

        let json: serde_json::Value = resp.json().await?;
        extract_openai_text(&json)
    }
}

/// First `max_chars` characters of `text`, cut without regard to word boundaries
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn user_prompt(transcript: &str, max_chars: usize) -> String {
    format!(
        "Please summarize this video transcript into:\n\
         1. A brief overview (2-3 sentences)\n\
         2. 5-7 key bullet points\n\
         3. Important takeaways\n\n\
         Transcript: {}",
        truncate_chars(transcript, max_chars)
    )
}

fn extract_openai_text(json: &serde_json::Value) -> Result<String> {
    if let Some(text) = json
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|t| t.as_str())
    {
        return Ok(text.to_string());
    }
    if let Some(message) = json.get("error").and_then(|e| e.get("message")).and_then(|m| m.as_str()) {
        bail!("{message}");
    }
    bail!("unexpected chat completion response format");
}
