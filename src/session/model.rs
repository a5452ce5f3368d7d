//! Core interview data model — setup, questions, answers, feedback.
//!
//! Serde field names follow the backend wire contract exactly
//! (`positionTitle`, `overallScore`, ...), so these types deserialize
//! backend responses verbatim.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::SetupError;

/// Maximum number of skills a setup may carry.
pub const MAX_SKILLS: usize = 5;

/// The kind of interview being practiced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewKind {
    Behavioral,
    Technical,
}

impl std::fmt::Display for InterviewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Behavioral => "behavioral",
            Self::Technical => "technical",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for InterviewKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "behavioral" => Ok(Self::Behavioral),
            "technical" => Ok(Self::Technical),
            other => Err(format!("Unknown interview kind: {other}")),
        }
    }
}

/// Interview configuration, immutable once submitted.
///
/// Constructed by the presentation layer from form input, consumed by the
/// question source on submission, and retained read-only for the
/// session's duration (the feedback source reads it again for context).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupData {
    pub interview_type: InterviewKind,
    pub position_title: String,
    pub company: String,
    pub job_description: String,
    /// 1 to [`MAX_SKILLS`] non-empty skill strings, in the order entered.
    pub skills: Vec<String>,
    /// Optional resume document on disk, forwarded to the resume-analysis
    /// collaborator hook; the state machine itself never reads it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_path: Option<PathBuf>,
}

impl SetupData {
    /// Validate the setup invariants.
    ///
    /// Called by the presentation layer before `submit_setup`; the state
    /// machine trusts its input and does not re-check.
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.position_title.trim().is_empty() {
            return Err(SetupError::EmptyField {
                field: "position title",
            });
        }
        if self.company.trim().is_empty() {
            return Err(SetupError::EmptyField { field: "company" });
        }
        if self.job_description.trim().is_empty() {
            return Err(SetupError::EmptyField {
                field: "job description",
            });
        }
        if self.skills.is_empty() {
            return Err(SetupError::NoSkills);
        }
        if self.skills.len() > MAX_SKILLS {
            return Err(SetupError::TooManySkills {
                max: MAX_SKILLS,
                count: self.skills.len(),
            });
        }
        if let Some(index) = self.skills.iter().position(|s| s.trim().is_empty()) {
            return Err(SetupError::EmptySkill { index });
        }
        Ok(())
    }
}

/// A single interview question with its category label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub category: String,
}

impl Question {
    pub fn new(question: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            category: category.into(),
        }
    }
}

/// One scored dimension of a feedback report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackMetric {
    pub name: String,
    /// 0–100, clamped after parsing.
    pub score: u8,
    pub description: String,
}

/// The scored report produced once per completed question pass.
///
/// Immutable once produced; discarded on restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackReport {
    /// 0–100, clamped after parsing.
    pub overall_score: u8,
    pub metrics: Vec<FeedbackMetric>,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub summary: String,
}

impl FeedbackReport {
    /// Clamp every score into [0, 100].
    ///
    /// External sources are free-form text generators; a report that
    /// parses may still carry out-of-range scores.
    pub fn clamp_scores(&mut self) {
        self.overall_score = self.overall_score.min(100);
        for metric in &mut self.metrics {
            metric.score = metric.score.min(100);
        }
    }
}
