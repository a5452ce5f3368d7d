//! Question and feedback sources — pluggable data-producing capabilities.
//!
//! Three interchangeable variants, selected once at startup by
//! configuration (never per call):
//! - **Mock**: deterministic in-process pools, never fails
//! - **Gemini**: the Generative Language API over HTTPS
//! - **Backend**: the companion REST backend
//!
//! The session state machine only ever sees the two traits below.

pub mod backend;
pub mod gemini;
pub mod mock;
pub mod prompts;

pub use backend::{BackendClient, ResumeAnalysis};
pub use gemini::GeminiSource;
pub use mock::{MockFeedbackSource, MockQuestionSource};

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{AppConfig, SourceBackend};
use crate::error::SourceError;
use crate::session::model::{FeedbackReport, Question, SetupData};

/// Produces the ordered question sequence for a submitted setup.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Source name for logging.
    fn name(&self) -> &str;

    /// Generate questions in presentation order, the order they will be
    /// asked. The returned length determines the session's question count.
    async fn generate_questions(
        &self,
        setup: &SetupData,
    ) -> Result<Vec<Question>, SourceError>;
}

/// Produces the scored feedback report for a completed question pass.
#[async_trait]
pub trait FeedbackSource: Send + Sync {
    /// Source name for logging.
    fn name(&self) -> &str;

    /// Analyze the recorded answers. `answers` is index-aligned with
    /// `questions`; `None` marks a skipped slot.
    async fn analyze(
        &self,
        answers: &[Option<String>],
        setup: &SetupData,
        questions: &[Question],
    ) -> Result<FeedbackReport, SourceError>;
}

/// The source pair selected for this process.
///
/// `backend` additionally exposes the concrete client when the backend
/// variant is active, for the collaborator hooks (resume analysis,
/// company lookup) that the state machine does not drive.
#[derive(Clone)]
pub struct Sources {
    pub questions: Arc<dyn QuestionSource>,
    pub feedback: Arc<dyn FeedbackSource>,
    pub backend: Option<Arc<BackendClient>>,
}

/// Build the source pair from configuration.
pub fn create_sources(config: &AppConfig) -> Sources {
    match config.source {
        SourceBackend::Mock => {
            tracing::info!("Using mock sources");
            Sources {
                questions: Arc::new(MockQuestionSource),
                feedback: Arc::new(MockFeedbackSource),
                backend: None,
            }
        }
        SourceBackend::Gemini => {
            tracing::info!("Using Gemini sources");
            let gemini = Arc::new(GeminiSource::new(config.gemini_api_key.clone()));
            Sources {
                questions: gemini.clone(),
                feedback: gemini,
                backend: None,
            }
        }
        SourceBackend::Backend => {
            tracing::info!(base_url = %config.backend_url, "Using backend sources");
            let backend = Arc::new(BackendClient::new(config.backend_url.clone()));
            Sources {
                questions: backend.clone(),
                feedback: backend.clone(),
                backend: Some(backend),
            }
        }
    }
}
