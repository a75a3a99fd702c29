use async_trait::async_trait;

use crate::{
    error::{Result, ShporaError},
    services::{QuizGenerator, Summarizer},
    types::{Question, Summary, Transcript},
};

/// AI provider behind an OpenAI-compatible chat completions endpoint.
#[derive(Clone, Debug, Default)]
pub enum Provider {
    Grok,
    Openai,
    #[default]
    Gemini,
}

pub struct ProviderConfig {
    pub api_url: &'static str,
    pub model: &'static str,
    pub env_var: &'static str,
}

impl Provider {
    pub fn config(&self) -> ProviderConfig {
        match self {
            Provider::Grok => ProviderConfig {
                api_url: "https://api.x.ai/v1/chat/completions",
                model: "grok-4-fast",
                env_var: "XAI_API_KEY",
            },
            Provider::Openai => ProviderConfig {
                api_url: "https://api.openai.com/v1/chat/completions",
                model: "gpt-5.1",
                env_var: "OPENAI_API_KEY",
            },
            Provider::Gemini => ProviderConfig {
                api_url: "https://generativelanguage.googleapis.com/v1beta/openai/chat/completions",
                model: "gemini-2.5-flash",
                env_var: "GEMINI_API_KEY",
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Provider::Grok => "Grok",
            Provider::Openai => "OpenAI",
            Provider::Gemini => "Gemini",
        }
    }

    /// Validate that the API key is set for this provider
    pub fn validate_api_key(&self) -> Result<String> {
        let config = self.config();
        std::env::var(config.env_var).map_err(|_| ShporaError::MissingApiKey {
            env_var: config.env_var.to_string(),
        })
    }
}

const SUMMARY_SYSTEM_PROMPT: &str = "You are a study assistant. Summarize educational video \
transcripts into concise, easy-to-read prose focused on the key concepts. Output only the \
summary, no preamble.";

fn quiz_system_prompt(question_count: usize) -> String {
    format!(
        "You are a quiz writer. Based on a video transcript, generate a {question_count}-question \
multiple-choice quiz. Return the quiz as a valid JSON array where each object has \"question\", \
\"options\" (an array of 4 strings), and \"answer\" (the string of the correct option). \
Output ONLY the JSON, nothing else."
    )
}

/// Chat-completions client serving both summary and quiz generation.
pub struct ChatClient {
    provider: Provider,
    http: reqwest::Client,
    quiz_size: usize,
}

impl ChatClient {
    pub fn new(provider: Provider) -> Self {
        Self {
            provider,
            http: reqwest::Client::new(),
            quiz_size: 5,
        }
    }

    pub fn with_quiz_size(mut self, quiz_size: usize) -> Self {
        self.quiz_size = quiz_size;
        self
    }

    pub fn provider(&self) -> &Provider {
        &self.provider
    }

    async fn chat(&self, system_prompt: &str, user_prompt: &str) -> Result<serde_json::Value> {
        let config = self.provider.config();
        let api_key = self.provider.validate_api_key()?;

        let response = self
            .http
            .post(config.api_url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&serde_json::json!({
                "model": config.model,
                "messages": [
                    {
                        "role": "system",
                        "content": system_prompt,
                    },
                    {
                        "role": "user",
                        "content": user_prompt,
                    },
                ],
                "temperature": 0.3,
            }))
            .send()
            .await?
            .json::<serde_json::Value>()
            .await?;

        Ok(response)
    }
}

fn extract_content(response: &serde_json::Value) -> Option<&str> {
    response["choices"][0]["message"]["content"].as_str()
}

/// Models wrap JSON payloads in markdown fences more often than not.
fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix("```").unwrap_or(trimmed);
    trimmed.trim()
}

fn parse_quiz_payload(content: &str) -> Result<Vec<Question>> {
    serde_json::from_str(strip_code_fences(content)).map_err(|e| {
        ShporaError::QuizGenerationFailed {
            reason: format!("quiz payload was not valid JSON: {e}"),
        }
    })
}

#[async_trait]
impl Summarizer for ChatClient {
    async fn summarize(&self, transcript: &Transcript) -> Result<Summary> {
        tracing::debug!(provider = self.provider.name(), "requesting summary");
        let user_prompt = format!(
            "Provide a concise, easy-to-read summary of the following educational video \
transcript, focusing on the key concepts.\n\nTranscript:\n{}",
            transcript.text
        );

        let response = self.chat(SUMMARY_SYSTEM_PROMPT, &user_prompt).await?;
        let content = extract_content(&response).ok_or_else(|| {
            ShporaError::SummaryGenerationFailed {
                reason: format!("invalid API response: {response:?}"),
            }
        })?;

        Ok(Summary {
            text: content.trim().to_string(),
        })
    }
}

#[async_trait]
impl QuizGenerator for ChatClient {
    async fn generate_quiz(&self, transcript: &Transcript) -> Result<Vec<Question>> {
        tracing::debug!(
            provider = self.provider.name(),
            questions = self.quiz_size,
            "requesting quiz"
        );
        let user_prompt = format!("Transcript:\n{}", transcript.text);

        let response = self
            .chat(&quiz_system_prompt(self.quiz_size), &user_prompt)
            .await?;
        let content = extract_content(&response).ok_or_else(|| {
            ShporaError::QuizGenerationFailed {
                reason: format!("invalid API response: {response:?}"),
            }
        })?;

        parse_quiz_payload(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_code_fences() {
        let content = "```json\n[{\"question\":\"Q\"}]\n```";
        assert_eq!(strip_code_fences(content), "[{\"question\":\"Q\"}]");
    }

    #[test]
    fn strips_bare_code_fences() {
        let content = "```\n[1, 2]\n```";
        assert_eq!(strip_code_fences(content), "[1, 2]");
    }

    #[test]
    fn leaves_plain_payloads_alone() {
        assert_eq!(strip_code_fences("  [1, 2] "), "[1, 2]");
    }

    #[test]
    fn decodes_the_service_question_format() {
        let payload = r#"
        ```json
        [
            {"question": "Q1", "options": ["A", "B", "C", "D"], "answer": "B"},
            {"question": "Q2", "options": ["W", "X", "Y", "Z"], "answer": "Z"}
        ]
        ```
        "#;

        let questions = parse_quiz_payload(payload).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].prompt, "Q1");
        assert_eq!(questions[0].correct_option, "B");
        assert_eq!(questions[1].options, vec!["W", "X", "Y", "Z"]);
    }

    #[test]
    fn rejects_malformed_quiz_payloads() {
        let err = parse_quiz_payload("the model rambled instead").unwrap_err();
        assert!(matches!(err, ShporaError::QuizGenerationFailed { .. }));
    }
}
