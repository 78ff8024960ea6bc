use crate::error::{RecommendError, Result};
use crate::services::SimilarityMatrix;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarUser {
    pub user: usize,
    pub similarity: f64,
}

impl SimilarUser {
    pub fn new(user: usize, similarity: f64) -> Self {
        Self { user, similarity }
    }
}

/// Find the `top_n` users most similar to `user`.
///
/// The user itself is never part of the result, even when its own row has
/// zero norm. Equal similarities keep ascending user index order. `top_n` is
/// clamped to the number of other users; 0 selects nobody.
pub fn similar_users(
    similarities: &SimilarityMatrix,
    user: usize,
    top_n: usize,
) -> Result<Vec<SimilarUser>> {
    let row = similarities
        .row(user)
        .ok_or_else(|| RecommendError::NotFound(format!("user index {}", user)))?;

    let mut candidates: Vec<SimilarUser> = row
        .iter()
        .enumerate()
        .filter(|(other, _)| *other != user)
        .map(|(other, &similarity)| SimilarUser::new(other, similarity))
        .collect();

    // Stable sort: ties stay in index order
    candidates.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(Ordering::Equal)
    });
    candidates.truncate(top_n);

    Ok(candidates)
}
