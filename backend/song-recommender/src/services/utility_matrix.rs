// ============================================
// Utility Matrix
// ============================================
//
// Sparse user x song matrix in CSR layout. A cell is "rated" iff the
// matrix stores an entry for it; stored values may be exactly 0.0, so
// numeric zero is never used as the "unrated" marker.

use crate::models::Interaction;
use crate::services::IndexMapper;
use ndarray::Array1;
use sprs::CsMat;
use std::collections::BTreeMap;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct RatingMatrix {
    ratings: CsMat<f64>,
}

impl RatingMatrix {
    /// Assemble a CSR matrix from cells sorted by (row, column) with no
    /// duplicate coordinates.
    pub(crate) fn from_sorted_cells(
        num_rows: usize,
        num_cols: usize,
        cells: impl IntoIterator<Item = ((usize, usize), f64)>,
    ) -> Self {
        let mut indptr = Vec::with_capacity(num_rows + 1);
        let mut indices = Vec::new();
        let mut data = Vec::new();

        indptr.push(0);
        let mut row = 0;
        for ((cell_row, column), value) in cells {
            while row < cell_row {
                indptr.push(indices.len());
                row += 1;
            }
            indices.push(column);
            data.push(value);
        }
        while row < num_rows {
            indptr.push(indices.len());
            row += 1;
        }

        if data.is_empty() {
            return Self {
                ratings: CsMat::zero((num_rows, num_cols)),
            };
        }

        Self {
            ratings: CsMat::new((num_rows, num_cols), indptr, indices, data),
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        self.ratings.shape()
    }

    pub fn num_users(&self) -> usize {
        self.ratings.rows()
    }

    pub fn num_items(&self) -> usize {
        self.ratings.cols()
    }

    /// Number of stored (rated) cells
    pub fn nnz(&self) -> usize {
        self.ratings.nnz()
    }

    pub fn get(&self, user: usize, item: usize) -> Option<f64> {
        if user >= self.num_users() || item >= self.num_items() {
            return None;
        }
        self.ratings.get(user, item).copied()
    }

    pub fn is_present(&self, user: usize, item: usize) -> bool {
        self.get(user, item).is_some()
    }

    /// Stored entries of a row as (item, value), in ascending item order
    pub fn row_entries(&self, user: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let range = if user < self.num_users() {
            self.ratings.indptr().outer_inds_sz(user)
        } else {
            0..0
        };
        let indices = &self.ratings.indices()[range.clone()];
        let data = &self.ratings.data()[range];
        indices.iter().copied().zip(data.iter().copied())
    }

    pub fn row_len(&self, user: usize) -> usize {
        self.row_entries(user).count()
    }

    /// Row as a dense vector; unrated cells read as 0.0
    pub fn dense_row(&self, user: usize) -> Array1<f64> {
        let mut row = Array1::zeros(self.num_items());
        for (item, value) in self.row_entries(user) {
            row[item] = value;
        }
        row
    }

    pub fn as_csr(&self) -> &CsMat<f64> {
        &self.ratings
    }
}

/// Build the utility matrix from raw interactions.
///
/// Duplicate (user, song) pairs keep the last rating ingested.
pub fn build_utility_matrix<U: Ord + Clone, I: Ord + Clone>(
    interactions: &[Interaction<U, I>],
    users: &IndexMapper<U>,
    items: &IndexMapper<I>,
) -> RatingMatrix {
    let mut cells: BTreeMap<(usize, usize), f64> = BTreeMap::new();
    let mut unmapped = 0usize;

    for interaction in interactions {
        match (users.index_of(&interaction.user), items.index_of(&interaction.item)) {
            (Some(user), Some(item)) => {
                cells.insert((user, item), interaction.rating);
            }
            _ => unmapped += 1,
        }
    }

    if unmapped > 0 {
        warn!(unmapped, "Interactions without a mapped user or song were skipped");
    }

    let matrix = RatingMatrix::from_sorted_cells(users.len(), items.len(), cells);

    debug!(
        num_users = matrix.num_users(),
        num_items = matrix.num_items(),
        nnz = matrix.nnz(),
        "Utility matrix built"
    );

    matrix
}
