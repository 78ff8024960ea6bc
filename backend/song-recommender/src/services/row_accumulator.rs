/// Sparse accumulator for one row of user-user dot products.
///
/// Touched users are threaded into an intrusive linked list so that draining
/// only visits users that share at least one rated song with the current row.
pub(crate) struct RowAccumulator {
    sums: Vec<f64>,
    non_zeros: Vec<isize>,
    head: isize,
}

const NONE: f64 = 0.0;
const NOT_OCCUPIED: isize = -1;
const NO_HEAD: isize = -2;

impl RowAccumulator {
    pub(crate) fn new(num_users: usize) -> Self {
        RowAccumulator {
            sums: vec![NONE; num_users],
            non_zeros: vec![NOT_OCCUPIED; num_users],
            head: NO_HEAD,
        }
    }

    pub(crate) fn add_to(&mut self, user: usize, value: f64) {
        self.sums[user] += value;

        if self.non_zeros[user] == NOT_OCCUPIED {
            self.non_zeros[user] = self.head;
            self.head = user as isize;
        }
    }

    /// Returns the accumulated (user, dot product) pairs and resets the
    /// accumulator for the next row. Order is unspecified.
    pub(crate) fn drain(&mut self) -> Vec<(usize, f64)> {
        let mut touched = Vec::new();

        while self.head != NO_HEAD {
            let user = self.head as usize;
            touched.push((user, self.sums[user]));

            self.head = self.non_zeros[user];
            self.sums[user] = NONE;
            self.non_zeros[user] = NOT_OCCUPIED;
        }

        touched
    }
}
