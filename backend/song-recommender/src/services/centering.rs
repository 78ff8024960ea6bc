use crate::services::RatingMatrix;
use ndarray::Array1;
use tracing::debug;

/// Utility matrix with each user's mean subtracted from their own ratings.
///
/// Formula: centered(u, i) = rating(u, i) - mean(u), where mean(u) is taken
/// over the songs u actually rated. The sparsity pattern is exactly the one
/// of the source matrix: no cell is added or dropped, and a centered value
/// of 0.0 (a rating equal to the mean) stays a rated cell.
#[derive(Debug, Clone)]
pub struct CenteredMatrix {
    ratings: RatingMatrix,
    means: Array1<f64>,
}

impl CenteredMatrix {
    pub fn ratings(&self) -> &RatingMatrix {
        &self.ratings
    }

    /// Per-user means; 0.0 for users without ratings
    pub fn means(&self) -> &Array1<f64> {
        &self.means
    }

    pub fn user_mean(&self, user: usize) -> Option<f64> {
        self.means.get(user).copied()
    }
}

pub fn center(utility: &RatingMatrix) -> CenteredMatrix {
    let (num_users, num_items) = utility.shape();
    let mut means = Array1::zeros(num_users);
    let mut cells = Vec::with_capacity(utility.nnz());
    let mut rated_users = 0usize;

    for user in 0..num_users {
        let (count, sum) = utility
            .row_entries(user)
            .fold((0usize, 0.0f64), |(count, sum), (_, value)| (count + 1, sum + value));

        if count == 0 {
            continue;
        }

        let mean = sum / count as f64;
        means[user] = mean;
        rated_users += 1;
        cells.extend(
            utility
                .row_entries(user)
                .map(|(item, value)| ((user, item), value - mean)),
        );
    }

    let ratings = RatingMatrix::from_sorted_cells(num_users, num_items, cells);

    debug!(num_users, rated_users, "Ratings mean-centered");

    CenteredMatrix { ratings, means }
}
