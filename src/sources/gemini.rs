//! Gemini source — native Generative Language API client.
//!
//! Speaks the REST wire format directly over reqwest: POST to the
//! generateContent endpoint with the API key in the `x-goog-api-key`
//! header, then pulls the candidate text out of the response.
//!
//! Question generation fails hard (the session stays in Setup and the
//! user retries); feedback analysis never does: any failure degrades to
//! the fixed mock report.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::error::SourceError;
use crate::session::model::{FeedbackReport, Question, SetupData};

use super::mock::mock_report;
use super::prompts::{
    extract_json_block, feedback_analysis_prompt, parse_questions, question_generation_prompt,
};
use super::{FeedbackSource, QuestionSource};

const GEMINI_MODEL: &str = "gemini-1.0-pro";

const GEMINI_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.0-pro:generateContent";

/// Fixed generation parameters per call site, not user-configurable.
struct GenerationParams {
    temperature: f64,
    max_output_tokens: u32,
    top_p: f64,
    top_k: u32,
}

const QUESTION_PARAMS: GenerationParams = GenerationParams {
    temperature: 0.7,
    max_output_tokens: 2048,
    top_p: 0.95,
    top_k: 40,
};

const FEEDBACK_PARAMS: GenerationParams = GenerationParams {
    temperature: 0.2,
    max_output_tokens: 2048,
    top_p: 0.95,
    top_k: 40,
};

/// Gemini-backed question and feedback source.
pub struct GeminiSource {
    api_key: Option<SecretString>,
    client: reqwest::Client,
    endpoint: String,
}

impl GeminiSource {
    /// Create a source with an injected credential. A missing key is
    /// allowed at construction and reported at call time.
    pub fn new(api_key: Option<SecretString>) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
            endpoint: GEMINI_ENDPOINT.to_string(),
        }
    }

    fn require_key(&self) -> Result<&SecretString, SourceError> {
        self.api_key.as_ref().ok_or_else(|| SourceError::MissingCredential {
            provider: "gemini".to_string(),
        })
    }

    /// Issue a generateContent call and return the candidate text.
    async fn generate_content(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, SourceError> {
        let key = self.require_key()?;

        let body = serde_json::json!({
            "model": GEMINI_MODEL,
            "contents": [
                {
                    "role": "user",
                    "parts": [{ "text": prompt }]
                }
            ],
            "generationConfig": {
                "temperature": params.temperature,
                "maxOutputTokens": params.max_output_tokens,
                "topP": params.top_p,
                "topK": params.top_k,
            }
        });

        let resp = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| SourceError::Http {
                provider: "gemini".to_string(),
                reason: e.to_string(),
            })?;

        if !resp.status().is_success() {
            return Err(SourceError::Status {
                provider: "gemini".to_string(),
                status: resp.status().as_u16(),
            });
        }

        let data: serde_json::Value = resp.json().await.map_err(|e| {
            SourceError::UnparsableResponse {
                provider: "gemini".to_string(),
                reason: e.to_string(),
            }
        })?;

        data["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| SourceError::UnparsableResponse {
                provider: "gemini".to_string(),
                reason: "no candidate text in response".to_string(),
            })
    }

    async fn try_analyze(
        &self,
        answers: &[Option<String>],
        setup: &SetupData,
        questions: &[Question],
    ) -> Result<FeedbackReport, SourceError> {
        let prompt = feedback_analysis_prompt(questions, answers, setup);
        let text = self.generate_content(&prompt, &FEEDBACK_PARAMS).await?;
        parse_feedback_text(&text)
    }
}

/// Pull a JSON report out of free-form response text.
fn parse_feedback_text(text: &str) -> Result<FeedbackReport, SourceError> {
    let block = extract_json_block(text).ok_or_else(|| SourceError::UnparsableResponse {
        provider: "gemini".to_string(),
        reason: "no JSON block in response".to_string(),
    })?;

    let mut report: FeedbackReport =
        serde_json::from_str(block).map_err(|e| SourceError::UnparsableResponse {
            provider: "gemini".to_string(),
            reason: e.to_string(),
        })?;
    report.clamp_scores();
    Ok(report)
}

#[async_trait]
impl QuestionSource for GeminiSource {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate_questions(
        &self,
        setup: &SetupData,
    ) -> Result<Vec<Question>, SourceError> {
        let prompt = question_generation_prompt(setup);
        let text = self.generate_content(&prompt, &QUESTION_PARAMS).await?;

        let questions = parse_questions(&text);
        if questions.is_empty() {
            return Err(SourceError::UnparsableResponse {
                provider: "gemini".to_string(),
                reason: "no questions parsed from response".to_string(),
            });
        }

        tracing::info!(count = questions.len(), "Gemini generated questions");
        Ok(questions)
    }
}

#[async_trait]
impl FeedbackSource for GeminiSource {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn analyze(
        &self,
        answers: &[Option<String>],
        setup: &SetupData,
        questions: &[Question],
    ) -> Result<FeedbackReport, SourceError> {
        match self.try_analyze(answers, setup, questions).await {
            Ok(report) => Ok(report),
            // Feedback degrades gracefully; question generation does not.
            Err(e) => {
                tracing::warn!(
                    cause = e.label(),
                    "Gemini feedback failed, falling back to mock report: {e}"
                );
                Ok(mock_report())
            }
        }
    }
}
