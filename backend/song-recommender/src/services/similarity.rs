// ============================================
// Similarity Engine
// ============================================
//
// Dense user x user cosine similarity over the rows of the centered matrix:
//
//   cos(u, v) = (u . v) / (||u|| x ||v||)
//
// Dot products are accumulated sparsely: for each song u rated, walk the
// column of users who also rated it. Only pairs with u <= v are computed and
// then mirrored, so the result is exactly symmetric.
//
// Zero-vector convention: any pair involving a zero-norm row has similarity
// 0.0, including the diagonal entry of that row. Nonzero-norm rows have a
// diagonal of exactly 1.0.
//
// Cost is O(num_users^2) memory. An approximate nearest-neighbour index can
// replace this matrix for large catalogues as long as it keeps the
// `similar_users` contract.

use crate::services::row_accumulator::RowAccumulator;
use crate::services::RatingMatrix;
use ndarray::{Array2, ArrayView1};
use sprs::CsMat;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    scores: Array2<f64>,
}

impl SimilarityMatrix {
    pub fn compute(centered: &RatingMatrix) -> Self {
        let num_users = centered.num_users();

        let l2norms: Vec<f64> = (0..num_users)
            .map(|user| {
                centered
                    .row_entries(user)
                    .map(|(_, value)| value * value)
                    .sum::<f64>()
                    .sqrt()
            })
            .collect();

        let by_item: CsMat<f64> = centered.as_csr().to_csc();
        let item_ptr = by_item.indptr();
        let raters = by_item.indices();
        let rater_values = by_item.data();

        let mut scores = Array2::zeros((num_users, num_users));
        let mut accumulator = RowAccumulator::new(num_users);

        for user in 0..num_users {
            for (item, value) in centered.row_entries(user) {
                for position in item_ptr.outer_inds_sz(item) {
                    let other = raters[position];
                    if other >= user {
                        accumulator.add_to(other, rater_values[position] * value);
                    }
                }
            }

            for (other, dot) in accumulator.drain() {
                let similarity = cosine(dot, l2norms[user], l2norms[other]);
                scores[[user, other]] = similarity;
                scores[[other, user]] = similarity;
            }

            if l2norms[user] > 0.0 {
                scores[[user, user]] = 1.0;
            }
        }

        debug!(num_users, "User similarity matrix computed");

        Self { scores }
    }

    pub fn num_users(&self) -> usize {
        self.scores.nrows()
    }

    pub fn get(&self, user: usize, other: usize) -> Option<f64> {
        self.scores.get([user, other]).copied()
    }

    pub fn row(&self, user: usize) -> Option<ArrayView1<'_, f64>> {
        if user < self.num_users() {
            Some(self.scores.row(user))
        } else {
            None
        }
    }

    pub fn as_array(&self) -> &Array2<f64> {
        &self.scores
    }
}

fn cosine(dot: f64, norm_a: f64, norm_b: f64) -> f64 {
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
    }
}
