//! Mock sources — deterministic in-process pools. Never fail, never
//! suspend; the default variant and the fallback report for Gemini
//! feedback failures.

use async_trait::async_trait;

use crate::error::SourceError;
use crate::session::model::{
    FeedbackMetric, FeedbackReport, InterviewKind, Question, SetupData,
};

use super::{FeedbackSource, QuestionSource};

/// Number of questions a session draws from a pool.
pub const QUESTIONS_PER_SESSION: usize = 5;

/// Category labels, cycled across the drawn questions (`labels[i % 6]`).
pub const CATEGORY_CYCLE: [&str; 6] = [
    "Problem Solving",
    "Teamwork",
    "Leadership",
    "Technical Skills",
    "Communication",
    "Adaptability",
];

const BEHAVIORAL_POOL: [&str; 6] = [
    "Tell me about a time when you had to work with a difficult team member. How did you handle it?",
    "Describe a situation where you had to meet a tight deadline. How did you manage your time?",
    "Tell me about a time when you had to adapt to a significant change at work or school.",
    "Describe a project where you demonstrated leadership skills.",
    "Tell me about a time when you failed. What did you learn from the experience?",
    "Describe a situation where you had to make an important decision with limited information.",
];

const TECHNICAL_POOL: [&str; 6] = [
    "Explain how you would design a scalable web application architecture.",
    "How would you optimize a slow database query?",
    "Explain the concept of asynchronous programming and when you would use it.",
    "What strategies would you use to ensure your code is maintainable and easy to understand?",
    "How would you approach debugging a complex issue in production?",
    "Describe your experience with version control systems and your workflow.",
];

/// The fixed report every mock analysis returns.
pub fn mock_report() -> FeedbackReport {
    FeedbackReport {
        overall_score: 78,
        metrics: vec![
            FeedbackMetric {
                name: "Clarity".to_string(),
                score: 82,
                description: "How clearly you articulated your thoughts and ideas.".to_string(),
            },
            FeedbackMetric {
                name: "Relevance".to_string(),
                score: 75,
                description: "How well your answers addressed the questions asked.".to_string(),
            },
            FeedbackMetric {
                name: "Structure".to_string(),
                score: 70,
                description: "How well-organized your responses were.".to_string(),
            },
            FeedbackMetric {
                name: "Examples".to_string(),
                score: 85,
                description: "How effectively you supported your answers with examples."
                    .to_string(),
            },
        ],
        strengths: vec![
            "Strong use of specific examples to illustrate points".to_string(),
            "Clear articulation of complex ideas".to_string(),
            "Effective communication of technical concepts".to_string(),
            "Good demonstration of problem-solving approach".to_string(),
        ],
        improvements: vec![
            "Consider using the STAR method more consistently in responses".to_string(),
            "Try to be more concise in your answers".to_string(),
            "Include more quantifiable results in your examples".to_string(),
            "Focus on highlighting leadership experiences".to_string(),
        ],
        summary: "Overall, you demonstrated good communication skills and provided relevant \
                  examples. With some improvements in response structure and conciseness, you \
                  can make your interview answers even more effective."
            .to_string(),
    }
}

/// Question source backed by the fixed pools.
pub struct MockQuestionSource;

#[async_trait]
impl QuestionSource for MockQuestionSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate_questions(
        &self,
        setup: &SetupData,
    ) -> Result<Vec<Question>, SourceError> {
        let pool = match setup.interview_type {
            InterviewKind::Behavioral => &BEHAVIORAL_POOL,
            InterviewKind::Technical => &TECHNICAL_POOL,
        };

        Ok(pool
            .iter()
            .take(QUESTIONS_PER_SESSION)
            .enumerate()
            .map(|(i, text)| Question::new(*text, CATEGORY_CYCLE[i % CATEGORY_CYCLE.len()]))
            .collect())
    }
}

/// Feedback source that ignores its inputs and returns the fixed report.
pub struct MockFeedbackSource;

#[async_trait]
impl FeedbackSource for MockFeedbackSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn analyze(
        &self,
        _answers: &[Option<String>],
        _setup: &SetupData,
        _questions: &[Question],
    ) -> Result<FeedbackReport, SourceError> {
        Ok(mock_report())
    }
}
