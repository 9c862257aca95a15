#![forbid(unsafe_code)]

pub mod error;
pub mod play;

pub use quiz_core::Clock;

pub use error::PlayError;
pub use play::{AnswerFeedback, NextStep, PlayService, QuizView, ResultView, StartView};
