//! Identifier types for snapshot records.
//!
//! String identifiers come from the market-data source and are what the
//! execution side needs. Keys are positions in a [`Snapshot`] arena and are
//! only meaningful for the snapshot that issued them.
//!
//! [`Snapshot`]: super::snapshot::Snapshot

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[doc = concat!("Create a new `", stringify!($name), "`.")]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }
    };
}

string_id!(
    /// Identifier of a real-world event grouping one or more conditions.
    MarketId
);

string_id!(
    /// Identifier of a condition (a single resolvable question).
    ConditionId
);

string_id!(
    /// Identifier of a tradable outcome token.
    OutcomeId
);

/// Position of a condition inside a snapshot arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConditionKey(pub(crate) usize);

impl ConditionKey {
    /// Arena index of the condition.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Position of an outcome inside a snapshot arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OutcomeKey(pub(crate) usize);

impl OutcomeKey {
    /// Arena index of the outcome.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}
