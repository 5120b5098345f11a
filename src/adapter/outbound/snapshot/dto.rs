//! Wire format of snapshot documents.
//!
//! ```json
//! {
//!   "version": 42,
//!   "markets": [{
//!     "id": "election",
//!     "title": "2028 election",
//!     "conditions": [{
//!       "id": "winner-a",
//!       "question": "Will A win?",
//!       "outcomes": [
//!         {"id": "a-yes", "name": "Yes", "book": {"bids": [[0.44, 100]], "asks": [[0.46, 150]]}},
//!         {"id": "a-no",  "name": "No",  "book": {"bids": [[0.52, 80]],  "asks": [[0.55, 90]]}}
//!       ]
//!     }]
//!   }],
//!   "relations": [{"type": "containment", "subset": "a-yes", "superset": "party-yes"}]
//! }
//! ```
//!
//! Levels are `[price, size]` pairs. Prices and sizes may be JSON numbers or
//! strings; both are parsed exactly into decimals.
//!
//! Only the envelope is strict. A level or relation that does not parse is
//! dropped with a data-error diagnostic and the rest of the document loads.

use serde::{Deserialize, Serialize};

use crate::domain::money::{Price, Volume};
use crate::domain::relation::RelationSpec;
use crate::domain::snapshot::{ConditionDraft, MarketDraft, OutcomeDraft, Snapshot, SnapshotBuilder};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotDocument {
    pub version: u64,
    #[serde(default)]
    pub markets: Vec<MarketDocument>,
    /// Kept raw so one bad entry cannot fail the whole document.
    #[serde(default)]
    pub relations: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketDocument {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub conditions: Vec<ConditionDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionDocument {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(default)]
    pub outcomes: Vec<OutcomeDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeDocument {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub book: BookDocument,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookDocument {
    #[serde(default)]
    pub bids: Vec<LevelDocument>,
    #[serde(default)]
    pub asks: Vec<LevelDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LevelDocument {
    Level(Price, Volume),
    Malformed(serde_json::Value),
}

impl From<(Price, Volume)> for LevelDocument {
    fn from((price, size): (Price, Volume)) -> Self {
        Self::Level(price, size)
    }
}

impl SnapshotDocument {
    /// Validate the document into a snapshot. Rejected records end up in
    /// [`Snapshot::diagnostics`].
    #[must_use]
    pub fn into_snapshot(self) -> Snapshot {
        let mut builder = SnapshotBuilder::new(self.version);
        for market in self.markets {
            let mut draft = MarketDraft::new(market.id);
            draft.title = market.title;
            for condition in market.conditions {
                let mut cond = ConditionDraft::new(condition.id);
                cond.question = condition.question;
                for outcome in condition.outcomes {
                    let (bids, bad_bids) = split_levels(outcome.book.bids);
                    let (asks, bad_asks) = split_levels(outcome.book.asks);
                    for raw in bad_bids.iter().chain(&bad_asks) {
                        builder = builder
                            .malformed_level(&outcome.id, format!("expected [price, size], got {raw}"));
                    }
                    cond = cond.outcome(OutcomeDraft {
                        id: outcome.id.into(),
                        name: outcome.name,
                        bids,
                        asks,
                    });
                }
                draft = draft.condition(cond);
            }
            builder = builder.market(draft);
        }
        for raw in self.relations {
            builder = match serde_json::from_value::<RelationSpec>(raw) {
                Ok(relation) => builder.relation(relation),
                Err(err) => builder.malformed_relation(err.to_string()),
            };
        }
        builder.build()
    }
}

fn split_levels(levels: Vec<LevelDocument>) -> (Vec<(Price, Volume)>, Vec<serde_json::Value>) {
    let mut good = Vec::with_capacity(levels.len());
    let mut bad = Vec::new();
    for level in levels {
        match level {
            LevelDocument::Level(price, size) => good.push((price, size)),
            LevelDocument::Malformed(raw) => bad.push(raw),
        }
    }
    (good, bad)
}
