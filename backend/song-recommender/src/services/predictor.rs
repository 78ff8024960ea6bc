use crate::error::Result;
use crate::services::neighbors::{similar_users, SimilarUser};
use crate::services::{CenteredMatrix, SimilarityMatrix};
use std::cmp::Ordering;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemScore {
    pub item: usize,
    pub score: f64,
}

/// Predict centered scores for the songs `user` has not rated.
///
/// Algorithm:
/// 1. Select the `k` most similar other users
/// 2. For each song absent from the user's row, combine the neighbours that
///    did rate it: score = Σ(sim × centered_rating) / Σ(sim)
/// 3. Drop songs whose similarity sum is not positive (nobody rated them, or
///    only dissimilar users did)
/// 4. Sort by score descending; ties keep ascending song index
pub fn predict(
    centered: &CenteredMatrix,
    similarities: &SimilarityMatrix,
    user: usize,
    k: usize,
) -> Result<Vec<ItemScore>> {
    let neighbors = similar_users(similarities, user, k)?;
    Ok(predict_from_neighbors(centered, user, &neighbors))
}

pub(crate) fn predict_from_neighbors(
    centered: &CenteredMatrix,
    user: usize,
    neighbors: &[SimilarUser],
) -> Vec<ItemScore> {
    let ratings = centered.ratings();

    // item -> (weighted sum, similarity sum)
    let mut accumulated: BTreeMap<usize, (f64, f64)> = BTreeMap::new();

    for neighbor in neighbors {
        for (item, centered_rating) in ratings.row_entries(neighbor.user) {
            if ratings.is_present(user, item) {
                continue;
            }
            let entry = accumulated.entry(item).or_insert((0.0, 0.0));
            entry.0 += neighbor.similarity * centered_rating;
            entry.1 += neighbor.similarity;
        }
    }

    let mut predictions: Vec<ItemScore> = accumulated
        .into_iter()
        .filter(|(_, (_, total_similarity))| *total_similarity > 0.0)
        .map(|(item, (weighted_sum, total_similarity))| ItemScore {
            item,
            score: weighted_sum / total_similarity,
        })
        .collect();

    predictions.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    predictions
}
