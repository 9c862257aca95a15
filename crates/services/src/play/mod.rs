mod service;
mod shuffle;
mod view;

// Public API of the play subsystem.
pub use crate::error::PlayError;
pub use service::PlayService;
pub use shuffle::build_ledger;
pub use view::{AnswerFeedback, NextStep, QuizView, ResultView, StartView};
