use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::CategoryId;
use crate::model::ledger::Ledger;

/// Everything the session store persists for one play-through of a category.
///
/// This is the opaque blob behind the `SessionStore` contract: created on
/// first visit to a category's question screen, replaced on explicit restart,
/// gone when the hosting session expires. The ledger inside is exclusively
/// owned by the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    category_id: CategoryId,
    ledger: Ledger,
    started_at: DateTime<Utc>,
}

impl SessionState {
    /// Creates session state for a freshly built ledger.
    #[must_use]
    pub fn new(category_id: CategoryId, ledger: Ledger, started_at: DateTime<Utc>) -> Self {
        Self {
            category_id,
            ledger,
            started_at,
        }
    }

    #[must_use]
    pub fn category_id(&self) -> CategoryId {
        self.category_id
    }

    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}
