//! Interview session — data model, owned state, and the state machine
//! that drives Setup → Questions → Feedback → (restart).

pub mod manager;
pub mod model;
pub mod state;

pub use manager::InterviewSession;
pub use model::{
    FeedbackMetric, FeedbackReport, InterviewKind, MAX_SKILLS, Question, SetupData,
};
pub use state::{InterviewStage, SessionState};
