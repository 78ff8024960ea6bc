use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Opaque user or song identifier as found in the source data.
///
/// Integer-looking identifiers are numeric and order numerically; everything
/// else is text. Numeric identifiers sort before textual ones.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Numeric(i64),
    Text(String),
}

impl Identifier {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<i64>() {
            Ok(value) => Identifier::Numeric(value),
            Err(_) => Identifier::Text(trimmed.to_string()),
        }
    }
}

impl FromStr for Identifier {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Identifier::parse(s))
    }
}

impl From<i64> for Identifier {
    fn from(value: i64) -> Self {
        Identifier::Numeric(value)
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Identifier::parse(value)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Numeric(value) => write!(f, "{}", value),
            Identifier::Text(value) => f.write_str(value),
        }
    }
}

/// One (user, song, rating) record from the ingestion side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction<U, I> {
    pub user: U,
    pub item: I,
    pub rating: f64,
}

impl<U, I> Interaction<U, I> {
    pub fn new(user: U, item: I, rating: f64) -> Self {
        Self { user, item, rating }
    }
}

/// Predicted score for an unrated song, on the mean-centered scale
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredItem<I> {
    pub item: I,
    pub score: f64,
}

impl<I> ScoredItem<I> {
    /// Move the centered score back onto the user's rating scale
    pub fn estimated_rating(&self, user_mean: f64) -> f64 {
        self.score + user_mean
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Neighbor<U> {
    pub user: U,
    pub similarity: f64,
}

/// Full answer to a recommendation query: the neighbourhood that was used and
/// the predictions derived from it.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation<U, I> {
    pub user: U,
    pub user_mean: f64,
    pub neighbors: Vec<Neighbor<U>>,
    pub predictions: Vec<ScoredItem<I>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SnapshotStats {
    pub num_users: usize,
    pub num_items: usize,
    pub num_ratings: usize,
}
