//! InterviewSession — owns the session aggregate and drives the wizard
//! stage transitions, invoking the configured sources at the right
//! moments.
//!
//! Lock discipline: the aggregate lives behind an `RwLock` that is never
//! held across a source await. Each transition validates and snapshots
//! under the lock, drops it, awaits the source, re-acquires, re-checks
//! the generation counter, then applies the result.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::{Error, SessionError, SourceError};
use crate::session::model::SetupData;
use crate::session::state::{InterviewStage, SessionState};
use crate::sources::{FeedbackSource, QuestionSource, Sources};

/// The interview session state machine.
///
/// Cheap to clone; clones share the same aggregate.
#[derive(Clone)]
pub struct InterviewSession {
    state: Arc<RwLock<SessionState>>,
    questions: Arc<dyn QuestionSource>,
    feedback: Arc<dyn FeedbackSource>,
    max_questions: usize,
}

impl InterviewSession {
    pub fn new(sources: Sources, max_questions: usize) -> Self {
        Self::with_sources(sources.questions, sources.feedback, max_questions)
    }

    pub fn with_sources(
        questions: Arc<dyn QuestionSource>,
        feedback: Arc<dyn FeedbackSource>,
        max_questions: usize,
    ) -> Self {
        Self {
            state: Arc::new(RwLock::new(SessionState::default())),
            questions,
            feedback,
            max_questions,
        }
    }

    /// A read-only snapshot of the aggregate for the presentation layer.
    pub async fn snapshot(&self) -> SessionState {
        self.state.read().await.clone()
    }

    /// Current wizard stage.
    pub async fn stage(&self) -> InterviewStage {
        self.state.read().await.stage
    }

    /// Submit the interview setup and generate the question sequence.
    ///
    /// Valid only in the Setup stage. On success the session moves to
    /// Questions with the index at 0 and empty answer slots; on source
    /// failure nothing changes and the caller may resubmit.
    pub async fn submit_setup(&self, setup: SetupData) -> Result<(), Error> {
        let generation = {
            let mut state = self.state.write().await;
            if !state.stage.can_transition_to(InterviewStage::Questions) {
                return Err(SessionError::InvalidTransition {
                    action: "submit setup".to_string(),
                    stage: state.stage.to_string(),
                }
                .into());
            }
            if state.in_flight {
                return Err(SessionError::RequestInFlight {
                    action: "submit setup".to_string(),
                }
                .into());
            }
            state.in_flight = true;
            state.generation
        };

        let result = self.questions.generate_questions(&setup).await;

        let mut state = self.state.write().await;
        if state.generation != generation {
            tracing::info!("Discarding stale question generation result");
            return Ok(());
        }
        state.in_flight = false;

        let mut questions = match result {
            Ok(questions) => questions,
            Err(e) => {
                tracing::warn!(
                    source = self.questions.name(),
                    cause = e.label(),
                    "Question generation failed: {e}"
                );
                return Err(e.into());
            }
        };

        questions.truncate(self.max_questions);
        if questions.is_empty() {
            return Err(SourceError::UnparsableResponse {
                provider: self.questions.name().to_string(),
                reason: "empty question list".to_string(),
            }
            .into());
        }

        tracing::info!(
            source = self.questions.name(),
            count = questions.len(),
            kind = %setup.interview_type,
            "Interview started"
        );
        state.answers = vec![None; questions.len()];
        state.questions = questions;
        state.setup = Some(setup);
        state.current_index = 0;
        state.feedback = None;
        state.stage = InterviewStage::Questions;
        Ok(())
    }

    /// Record an answer for the current question and advance.
    ///
    /// Valid only in the Questions stage. Overwrites any prior value at
    /// the slot. On the last question this triggers feedback analysis.
    pub async fn complete_current_question(
        &self,
        answer: impl Into<String>,
    ) -> Result<(), Error> {
        self.finish_question(Some(answer.into()), "complete question")
            .await
    }

    /// Advance past the current question without recording an answer.
    ///
    /// Valid only in the Questions stage. The slot stays `None` (or
    /// keeps a previously recorded answer when retrying analysis).
    pub async fn skip_current_question(&self) -> Result<(), Error> {
        self.finish_question(None, "skip question").await
    }

    /// Discard the full aggregate and return to the Setup stage.
    ///
    /// Valid in any state. Bumps the generation counter so a source call
    /// still in flight has its result discarded when it resolves.
    pub async fn restart(&self) {
        let mut state = self.state.write().await;
        state.reset();
        tracing::info!(generation = state.generation, "Session restarted");
    }

    /// Shared tail of complete/skip: record, then advance or analyze.
    async fn finish_question(
        &self,
        answer: Option<String>,
        action: &str,
    ) -> Result<(), Error> {
        let (generation, answers, setup, questions) = {
            let mut state = self.state.write().await;
            if !state.stage.can_transition_to(InterviewStage::Feedback) {
                return Err(SessionError::InvalidTransition {
                    action: action.to_string(),
                    stage: state.stage.to_string(),
                }
                .into());
            }
            if state.in_flight {
                return Err(SessionError::RequestInFlight {
                    action: action.to_string(),
                }
                .into());
            }
            if let Some(text) = answer {
                state.record_answer(text);
            }
            if state.current_index + 1 < state.questions.len() {
                state.current_index += 1;
                tracing::debug!(index = state.current_index, "Advanced to next question");
                return Ok(());
            }

            // Last question done; analysis runs outside the lock.
            let Some(setup) = state.setup.clone() else {
                return Err(SessionError::InvalidTransition {
                    action: action.to_string(),
                    stage: state.stage.to_string(),
                }
                .into());
            };
            state.in_flight = true;
            (
                state.generation,
                state.answers.clone(),
                setup,
                state.questions.clone(),
            )
        };

        let result = self.feedback.analyze(&answers, &setup, &questions).await;

        let mut state = self.state.write().await;
        if state.generation != generation {
            tracing::info!("Discarding stale feedback analysis result");
            return Ok(());
        }
        state.in_flight = false;

        match result {
            Ok(report) => {
                tracing::info!(
                    source = self.feedback.name(),
                    score = report.overall_score,
                    "Feedback ready"
                );
                state.feedback = Some(report);
                state.stage = InterviewStage::Feedback;
                Ok(())
            }
            Err(e) => {
                // Session stays at the last question; completing or
                // skipping again re-triggers analysis.
                tracing::warn!(
                    source = self.feedback.name(),
                    cause = e.label(),
                    "Feedback analysis failed: {e}"
                );
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use super::*;
    use crate::session::model::{
        FeedbackReport, InterviewKind, Question, SetupData,
    };
    use crate::sources::mock::{MockFeedbackSource, MockQuestionSource, mock_report};

    fn setup() -> SetupData {
        SetupData {
            interview_type: InterviewKind::Behavioral,
            position_title: "Engineer".to_string(),
            company: "Acme".to_string(),
            job_description: "Build things.".to_string(),
            skills: vec!["Leadership".to_string()],
            resume_path: None,
        }
    }

    fn mock_session() -> InterviewSession {
        InterviewSession::with_sources(
            Arc::new(MockQuestionSource),
            Arc::new(MockFeedbackSource),
            10,
        )
    }

    /// Question source that fails on demand.
    struct FlakyQuestions {
        fail: AtomicBool,
    }

    #[async_trait]
    impl QuestionSource for FlakyQuestions {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn generate_questions(
            &self,
            setup: &SetupData,
        ) -> Result<Vec<Question>, SourceError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(SourceError::Http {
                    provider: "flaky".to_string(),
                    reason: "connection refused".to_string(),
                });
            }
            MockQuestionSource.generate_questions(setup).await
        }
    }

    /// Feedback source that counts invocations and fails on demand.
    struct CountingFeedback {
        calls: AtomicUsize,
        fail: AtomicBool,
        captured_len: AtomicUsize,
    }

    impl CountingFeedback {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: AtomicBool::new(false),
                captured_len: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl FeedbackSource for CountingFeedback {
        fn name(&self) -> &str {
            "counting"
        }

        async fn analyze(
            &self,
            answers: &[Option<String>],
            _setup: &SetupData,
            _questions: &[Question],
        ) -> Result<FeedbackReport, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.captured_len.store(answers.len(), Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(SourceError::Status {
                    provider: "counting".to_string(),
                    status: 503,
                });
            }
            Ok(mock_report())
        }
    }

    /// Feedback source that blocks until the test opens the gate.
    struct GatedFeedback {
        started: Notify,
        gate: Notify,
    }

    #[async_trait]
    impl FeedbackSource for GatedFeedback {
        fn name(&self) -> &str {
            "gated"
        }

        async fn analyze(
            &self,
            _answers: &[Option<String>],
            _setup: &SetupData,
            _questions: &[Question],
        ) -> Result<FeedbackReport, SourceError> {
            self.started.notify_one();
            self.gate.notified().await;
            Ok(mock_report())
        }
    }

    #[tokio::test]
    async fn submit_setup_enters_questions_at_index_zero() {
        let session = mock_session();
        session.submit_setup(setup()).await.unwrap();

        let state = session.snapshot().await;
        assert_eq!(state.stage, InterviewStage::Questions);
        assert_eq!(state.current_index, 0);
        assert_eq!(state.questions.len(), 5);
        assert_eq!(state.answers, vec![None; 5]);
        assert!(state.feedback.is_none());
        assert!(state.setup.is_some());
    }

    #[tokio::test]
    async fn submit_setup_rejected_outside_setup_stage() {
        let session = mock_session();
        session.submit_setup(setup()).await.unwrap();

        let result = session.submit_setup(setup()).await;
        assert!(matches!(
            result,
            Err(Error::Session(SessionError::InvalidTransition { .. }))
        ));
    }

    #[tokio::test]
    async fn complete_rejected_in_setup_stage() {
        let session = mock_session();
        let result = session.complete_current_question("hello").await;
        assert!(matches!(
            result,
            Err(Error::Session(SessionError::InvalidTransition { .. }))
        ));
    }

    #[tokio::test]
    async fn full_pass_analyzes_exactly_once_with_aligned_slots() {
        let feedback = Arc::new(CountingFeedback::new());
        let session = InterviewSession::with_sources(
            Arc::new(MockQuestionSource),
            feedback.clone(),
            10,
        );
        session.submit_setup(setup()).await.unwrap();

        session.complete_current_question("a").await.unwrap();
        session.skip_current_question().await.unwrap();
        session.complete_current_question("c").await.unwrap();
        session.skip_current_question().await.unwrap();
        session.complete_current_question("e").await.unwrap();

        assert_eq!(feedback.calls.load(Ordering::SeqCst), 1);
        assert_eq!(feedback.captured_len.load(Ordering::SeqCst), 5);

        let state = session.snapshot().await;
        assert_eq!(state.stage, InterviewStage::Feedback);
        assert_eq!(
            state.answers,
            vec![
                Some("a".to_string()),
                None,
                Some("c".to_string()),
                None,
                Some("e".to_string()),
            ]
        );
        assert_eq!(state.feedback.unwrap(), mock_report());
    }

    #[tokio::test]
    async fn all_skips_still_reach_feedback() {
        let session = mock_session();
        session.submit_setup(setup()).await.unwrap();
        for _ in 0..5 {
            session.skip_current_question().await.unwrap();
        }
        let state = session.snapshot().await;
        assert_eq!(state.stage, InterviewStage::Feedback);
        assert_eq!(state.answers, vec![None; 5]);
    }

    #[tokio::test]
    async fn question_failure_leaves_setup_untouched() {
        let questions = Arc::new(FlakyQuestions {
            fail: AtomicBool::new(true),
        });
        let session = InterviewSession::with_sources(
            questions.clone(),
            Arc::new(MockFeedbackSource),
            10,
        );

        let result = session.submit_setup(setup()).await;
        assert!(matches!(result, Err(Error::Source(_))));

        let state = session.snapshot().await;
        assert_eq!(state.stage, InterviewStage::Setup);
        assert!(state.questions.is_empty());
        assert!(state.setup.is_none());
        assert!(!state.in_flight);

        // Retry once the source recovers.
        questions.fail.store(false, Ordering::SeqCst);
        session.submit_setup(setup()).await.unwrap();
        assert_eq!(session.stage().await, InterviewStage::Questions);
    }

    #[tokio::test]
    async fn feedback_failure_allows_retry_at_last_question() {
        let feedback = Arc::new(CountingFeedback::new());
        feedback.fail.store(true, Ordering::SeqCst);
        let session = InterviewSession::with_sources(
            Arc::new(MockQuestionSource),
            feedback.clone(),
            10,
        );
        session.submit_setup(setup()).await.unwrap();
        for _ in 0..4 {
            session.skip_current_question().await.unwrap();
        }

        let result = session.complete_current_question("final answer").await;
        assert!(matches!(result, Err(Error::Source(_))));

        let state = session.snapshot().await;
        assert_eq!(state.stage, InterviewStage::Questions);
        assert_eq!(state.current_index, 4);
        assert_eq!(state.answers[4].as_deref(), Some("final answer"));
        assert!(!state.in_flight);

        // Skipping again re-triggers analysis and keeps the stored answer.
        feedback.fail.store(false, Ordering::SeqCst);
        session.skip_current_question().await.unwrap();
        assert_eq!(feedback.calls.load(Ordering::SeqCst), 2);

        let state = session.snapshot().await;
        assert_eq!(state.stage, InterviewStage::Feedback);
        assert_eq!(state.answers[4].as_deref(), Some("final answer"));
    }

    #[tokio::test]
    async fn restart_from_any_stage_restores_initial_aggregate() {
        let session = mock_session();

        // From Setup.
        session.restart().await;
        assert_eq!(session.stage().await, InterviewStage::Setup);

        // From Questions.
        session.submit_setup(setup()).await.unwrap();
        session.complete_current_question("a").await.unwrap();
        session.restart().await;
        let state = session.snapshot().await;
        assert_eq!(state.stage, InterviewStage::Setup);
        assert!(state.setup.is_none());
        assert!(state.questions.is_empty());
        assert!(state.answers.is_empty());
        assert_eq!(state.current_index, 0);
        assert!(state.feedback.is_none());

        // From Feedback.
        session.submit_setup(setup()).await.unwrap();
        for _ in 0..5 {
            session.skip_current_question().await.unwrap();
        }
        assert_eq!(session.stage().await, InterviewStage::Feedback);
        session.restart().await;
        let state = session.snapshot().await;
        assert_eq!(state.stage, InterviewStage::Setup);
        assert!(state.feedback.is_none());
    }

    #[tokio::test]
    async fn max_questions_truncates_generated_list() {
        let session = InterviewSession::with_sources(
            Arc::new(MockQuestionSource),
            Arc::new(MockFeedbackSource),
            3,
        );
        session.submit_setup(setup()).await.unwrap();
        let state = session.snapshot().await;
        assert_eq!(state.questions.len(), 3);
        assert_eq!(state.answers.len(), 3);
    }

    #[tokio::test]
    async fn single_question_session_goes_straight_to_feedback() {
        let session = InterviewSession::with_sources(
            Arc::new(MockQuestionSource),
            Arc::new(MockFeedbackSource),
            1,
        );
        session.submit_setup(setup()).await.unwrap();
        session.complete_current_question("only answer").await.unwrap();
        assert_eq!(session.stage().await, InterviewStage::Feedback);
    }

    #[tokio::test]
    async fn in_flight_analysis_blocks_double_trigger() {
        let feedback = Arc::new(GatedFeedback {
            started: Notify::new(),
            gate: Notify::new(),
        });
        let session = InterviewSession::with_sources(
            Arc::new(MockQuestionSource),
            feedback.clone(),
            1,
        );
        session.submit_setup(setup()).await.unwrap();

        let worker = session.clone();
        let handle = tokio::spawn(async move {
            worker.complete_current_question("answer").await
        });
        feedback.started.notified().await;

        // Second trigger while the first analysis is outstanding.
        let result = session.skip_current_question().await;
        assert!(matches!(
            result,
            Err(Error::Session(SessionError::RequestInFlight { .. }))
        ));

        feedback.gate.notify_one();
        handle.await.unwrap().unwrap();
        assert_eq!(session.stage().await, InterviewStage::Feedback);
    }

    #[tokio::test]
    async fn restart_discards_stale_analysis_result() {
        let feedback = Arc::new(GatedFeedback {
            started: Notify::new(),
            gate: Notify::new(),
        });
        let session = InterviewSession::with_sources(
            Arc::new(MockQuestionSource),
            feedback.clone(),
            1,
        );
        session.submit_setup(setup()).await.unwrap();

        let worker = session.clone();
        let handle = tokio::spawn(async move {
            worker.complete_current_question("answer").await
        });
        feedback.started.notified().await;

        session.restart().await;
        feedback.gate.notify_one();
        handle.await.unwrap().unwrap();

        // The resolved report must not leak into the fresh session.
        let state = session.snapshot().await;
        assert_eq!(state.stage, InterviewStage::Setup);
        assert!(state.feedback.is_none());
        assert!(!state.in_flight);
        assert_eq!(state.generation, 1);
    }
}
