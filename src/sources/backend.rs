//! Backend source — client for the companion REST backend.
//!
//! Questions and feedback come back verbatim in the crate's wire shapes;
//! every non-2xx status is treated uniformly as the source being
//! unavailable, regardless of body content.
//!
//! Also carries the two collaborator hooks the state machine does not
//! drive: resume analysis (multipart upload) and company lookup.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use crate::error::SourceError;
use crate::session::model::{FeedbackReport, Question, SetupData};

use super::{FeedbackSource, QuestionSource};

const PROVIDER: &str = "backend";

/// Response of the resume-analysis hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeAnalysis {
    pub status: String,
    pub message: String,
}

/// REST client for the companion backend.
pub struct BackendClient {
    base_url: String,
    client: reqwest::Client,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Upload a resume with its target job description for analysis.
    ///
    /// Collaborator hook: invoked by the front-end, never by the state
    /// machine.
    pub async fn analyze_resume(
        &self,
        file_name: &str,
        resume: Vec<u8>,
        job_description: &str,
    ) -> Result<ResumeAnalysis, SourceError> {
        let part = Part::bytes(resume).file_name(file_name.to_string());
        let form = Form::new()
            .part("resume", part)
            .text("jobDescription", job_description.to_string());

        let resp = self
            .client
            .post(self.endpoint("resume/analyze"))
            .multipart(form)
            .send()
            .await
            .map_err(http_error)?;

        if !resp.status().is_success() {
            return Err(status_error(resp.status()));
        }
        resp.json().await.map_err(parse_error)
    }

    /// Look up company information by name.
    ///
    /// Best-effort collaborator hook: any failure yields `None` rather
    /// than an error.
    pub async fn company_info(&self, name: &str) -> Option<serde_json::Value> {
        let result = self
            .client
            .get(self.endpoint("companies"))
            .query(&[("name", name)])
            .send()
            .await;

        match result {
            Ok(resp) if resp.status().is_success() => resp.json().await.ok(),
            Ok(resp) => {
                tracing::warn!(status = %resp.status(), "Company lookup failed");
                None
            }
            Err(e) => {
                tracing::warn!("Company lookup failed: {e}");
                None
            }
        }
    }
}

fn http_error(e: reqwest::Error) -> SourceError {
    SourceError::Http {
        provider: PROVIDER.to_string(),
        reason: e.to_string(),
    }
}

fn status_error(status: reqwest::StatusCode) -> SourceError {
    SourceError::Status {
        provider: PROVIDER.to_string(),
        status: status.as_u16(),
    }
}

fn parse_error(e: reqwest::Error) -> SourceError {
    SourceError::UnparsableResponse {
        provider: PROVIDER.to_string(),
        reason: e.to_string(),
    }
}

#[async_trait]
impl QuestionSource for BackendClient {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn generate_questions(
        &self,
        setup: &SetupData,
    ) -> Result<Vec<Question>, SourceError> {
        let body = serde_json::json!({
            "company": setup.company,
            "positionTitle": setup.position_title,
            "interviewType": setup.interview_type,
            "skills": setup.skills,
        });

        let resp = self
            .client
            .post(self.endpoint("questions/generate"))
            .json(&body)
            .send()
            .await
            .map_err(http_error)?;

        if !resp.status().is_success() {
            return Err(status_error(resp.status()));
        }

        let questions: Vec<Question> = resp.json().await.map_err(parse_error)?;
        tracing::info!(count = questions.len(), "Backend returned questions");
        Ok(questions)
    }
}

#[async_trait]
impl FeedbackSource for BackendClient {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn analyze(
        &self,
        answers: &[Option<String>],
        setup: &SetupData,
        questions: &[Question],
    ) -> Result<FeedbackReport, SourceError> {
        // Skipped slots serialize as JSON null.
        let body = serde_json::json!({
            "answers": answers,
            "company": setup.company,
            "positionTitle": setup.position_title,
            "interviewType": setup.interview_type,
            "questions": questions.iter().map(|q| &q.question).collect::<Vec<_>>(),
        });

        let resp = self
            .client
            .post(self.endpoint("feedback/analyze"))
            .json(&body)
            .send()
            .await
            .map_err(http_error)?;

        if !resp.status().is_success() {
            return Err(status_error(resp.status()));
        }

        let mut report: FeedbackReport = resp.json().await.map_err(parse_error)?;
        report.clamp_scores();
        Ok(report)
    }
}
