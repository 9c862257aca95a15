mod category;
mod ids;
mod ledger;
mod quiz;
mod session;

pub use category::{Category, CategoryError};
pub use ids::{CategoryId, OptionId, ParseIdError, QuizId, SessionKey};
pub use ledger::{Ledger, LedgerEntry, LedgerError, LedgerSummary};
pub use quiz::{AnswerOption, OptionError, QuizError, QuizItem};
pub use session::SessionState;
