//! Session state — the wizard stage and the owned aggregate.

use serde::{Deserialize, Serialize};

use super::model::{FeedbackReport, Question, SetupData};

/// The stages of an interview session.
///
/// Progresses linearly: Setup → Questions → Feedback. `restart` returns
/// to Setup from any stage; no stage is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStage {
    Setup,
    Questions,
    Feedback,
}

impl InterviewStage {
    /// Check if a forward transition from `self` to `target` is valid.
    /// Restart (any stage → Setup) is handled separately and always allowed.
    pub fn can_transition_to(&self, target: InterviewStage) -> bool {
        use InterviewStage::*;
        matches!((self, target), (Setup, Questions) | (Questions, Feedback))
    }

    /// Get the next stage in the forward progression, if any.
    pub fn next(&self) -> Option<InterviewStage> {
        match self {
            Self::Setup => Some(Self::Questions),
            Self::Questions => Some(Self::Feedback),
            Self::Feedback => None,
        }
    }
}

impl Default for InterviewStage {
    fn default() -> Self {
        Self::Setup
    }
}

impl std::fmt::Display for InterviewStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Setup => "setup",
            Self::Questions => "questions",
            Self::Feedback => "feedback",
        };
        write!(f, "{s}")
    }
}

/// The session aggregate, owned exclusively by the state machine.
///
/// The presentation layer only ever sees cloned snapshots of this struct
/// and raises transitions through [`super::InterviewSession`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    /// Current wizard stage.
    pub stage: InterviewStage,
    /// Submitted setup; `None` until the Setup stage is left.
    pub setup: Option<SetupData>,
    /// Ordered question sequence, fixed for the session once generated.
    pub questions: Vec<Question>,
    /// 0-based index into `questions`, valid while in the Questions stage.
    pub current_index: usize,
    /// Index-aligned answers. `None` = skipped, `Some("")` = typed empty.
    pub answers: Vec<Option<String>>,
    /// The scored report; `None` until the Feedback stage.
    pub feedback: Option<FeedbackReport>,
    /// Bumped on every restart. Source calls capture it before awaiting
    /// and discard their result if it changed underneath them.
    pub generation: u64,
    /// True while a question-generation or analysis call is outstanding.
    pub in_flight: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            stage: InterviewStage::default(),
            setup: None,
            questions: Vec::new(),
            current_index: 0,
            answers: Vec::new(),
            feedback: None,
            generation: 0,
            in_flight: false,
        }
    }
}

impl SessionState {
    /// Reset to the initial aggregate, bumping the generation counter so
    /// any in-flight source result gets discarded when it resolves.
    pub fn reset(&mut self) {
        let generation = self.generation.wrapping_add(1);
        *self = Self {
            generation,
            ..Self::default()
        };
    }

    /// Total number of questions in this session.
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// The question currently being asked, if any.
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    /// Whether the current question is the last one.
    pub fn is_last_question(&self) -> bool {
        !self.questions.is_empty() && self.current_index + 1 == self.questions.len()
    }

    /// Record an answer for the current question, overwriting any prior
    /// value at that slot.
    pub fn record_answer(&mut self, answer: String) {
        if let Some(slot) = self.answers.get_mut(self.current_index) {
            *slot = Some(answer);
        }
    }
}
