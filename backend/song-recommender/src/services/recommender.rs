use crate::error::{RecommendError, Result};
use crate::models::{Interaction, Neighbor, Recommendation, ScoredItem, SnapshotStats};
use crate::services::neighbors::{similar_users, SimilarUser};
use crate::services::predictor::predict_from_neighbors;
use crate::services::{
    build_utility_matrix, center, CenteredMatrix, IndexMapper, RatingMatrix, SimilarityMatrix,
};
use std::fmt::Display;
use tracing::{debug, info, warn};

/// Read-only snapshot of the user-based collaborative filtering pipeline.
///
/// Built once from an immutable set of interactions:
///   index mappers → utility matrix → centered matrix → similarity matrix
///
/// Queries only read from the snapshot. Absorbing new ratings means building
/// a new snapshot and swapping it in; nothing here mutates after `build`.
#[derive(Debug, Clone)]
pub struct Recommender<U, I> {
    users: IndexMapper<U>,
    items: IndexMapper<I>,
    utility: RatingMatrix,
    centered: CenteredMatrix,
    similarities: SimilarityMatrix,
}

impl<U, I> Recommender<U, I>
where
    U: Ord + Clone + Display,
    I: Ord + Clone,
{
    pub fn build(interactions: &[Interaction<U, I>]) -> Result<Self> {
        Self::build_with_catalog(interactions, Vec::new(), Vec::new())
    }

    /// Build with extra known users and songs that may have no ratings yet.
    /// Such users get an empty row and a mean of 0.0.
    pub fn build_with_catalog(
        interactions: &[Interaction<U, I>],
        known_users: impl IntoIterator<Item = U>,
        known_items: impl IntoIterator<Item = I>,
    ) -> Result<Self> {
        if let Some(position) = interactions.iter().position(|r| !r.rating.is_finite()) {
            return Err(RecommendError::InvalidParameter(format!(
                "rating of interaction #{} is not a finite number",
                position
            )));
        }

        let users = IndexMapper::from_keys(
            interactions
                .iter()
                .map(|r| r.user.clone())
                .chain(known_users),
        );
        let items = IndexMapper::from_keys(
            interactions
                .iter()
                .map(|r| r.item.clone())
                .chain(known_items),
        );

        let utility = build_utility_matrix(interactions, &users, &items);
        let centered = center(&utility);
        let similarities = SimilarityMatrix::compute(centered.ratings());

        let recommender = Self {
            users,
            items,
            utility,
            centered,
            similarities,
        };

        let stats = recommender.stats();
        if stats.num_users == 0 || stats.num_items == 0 {
            warn!("Recommender built from empty input, every query will report not found");
        }
        info!(
            interactions = interactions.len(),
            num_users = stats.num_users,
            num_items = stats.num_items,
            num_ratings = stats.num_ratings,
            "Recommender snapshot built"
        );

        Ok(recommender)
    }

    /// Predicted centered scores for the songs `user` has not rated, best first.
    pub fn recommend(&self, user: &U, k: usize) -> Result<Vec<ScoredItem<I>>> {
        Ok(self.report(user, k)?.predictions)
    }

    /// The `k` users most similar to `user`, most similar first.
    pub fn neighbors(&self, user: &U, k: usize) -> Result<Vec<Neighbor<U>>> {
        let user_index = self.user_index(user)?;
        let neighbors = similar_users(&self.similarities, user_index, k)?;
        Ok(self.to_neighbors(&neighbors))
    }

    /// Neighbourhood and predictions for `user` in one pass.
    pub fn report(&self, user: &U, k: usize) -> Result<Recommendation<U, I>> {
        let user_index = self.user_index(user)?;
        let selected = similar_users(&self.similarities, user_index, k)?;
        let scores = predict_from_neighbors(&self.centered, user_index, &selected);

        let predictions: Vec<ScoredItem<I>> = scores
            .into_iter()
            .filter_map(|scored| {
                self.items.key_of(scored.item).map(|item| ScoredItem {
                    item: item.clone(),
                    score: scored.score,
                })
            })
            .collect();

        debug!(
            user = %user,
            k,
            neighbors = selected.len(),
            predictions = predictions.len(),
            "Recommendations computed"
        );

        Ok(Recommendation {
            user: user.clone(),
            user_mean: self.centered.user_mean(user_index).unwrap_or(0.0),
            neighbors: self.to_neighbors(&selected),
            predictions,
        })
    }

    /// Mean of the user's actual ratings (0.0 if they have none)
    pub fn user_mean(&self, user: &U) -> Option<f64> {
        self.users
            .index_of(user)
            .and_then(|index| self.centered.user_mean(index))
    }

    pub fn stats(&self) -> SnapshotStats {
        SnapshotStats {
            num_users: self.users.len(),
            num_items: self.items.len(),
            num_ratings: self.utility.nnz(),
        }
    }

    pub fn users(&self) -> &IndexMapper<U> {
        &self.users
    }

    pub fn items(&self) -> &IndexMapper<I> {
        &self.items
    }

    pub fn utility(&self) -> &RatingMatrix {
        &self.utility
    }

    pub fn centered(&self) -> &CenteredMatrix {
        &self.centered
    }

    pub fn similarities(&self) -> &SimilarityMatrix {
        &self.similarities
    }

    fn user_index(&self, user: &U) -> Result<usize> {
        self.users.index_of(user).ok_or_else(|| {
            debug!(user = %user, "User not found");
            RecommendError::NotFound(format!("user {}", user))
        })
    }

    fn to_neighbors(&self, selected: &[SimilarUser]) -> Vec<Neighbor<U>> {
        selected
            .iter()
            .filter_map(|similar| {
                self.users.key_of(similar.user).map(|user| Neighbor {
                    user: user.clone(),
                    similarity: similar.similarity,
                })
            })
            .collect()
    }
}

/// Parse a neighbourhood size coming from outside the process.
///
/// Non-numeric input is an `InvalidParameter`; negative sizes clamp to 0,
/// and sizes beyond the number of users are clamped at query time.
pub fn parse_neighborhood_size(raw: &str) -> Result<usize> {
    let value: i64 = raw.trim().parse().map_err(|_| {
        RecommendError::InvalidParameter(format!(
            "neighbourhood size must be an integer, got {:?}",
            raw
        ))
    })?;

    if value < 0 {
        warn!(value, "Negative neighbourhood size clamped to 0");
        return Ok(0);
    }

    Ok(usize::try_from(value).unwrap_or(usize::MAX))
}
