//! Deterministic synthetic score rows for demos and load runs

/// One raw score row to insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedRow {
    pub user_id: String,
    pub score: Option<i64>,
    pub created_at: i64,
}

/// Shape of a synthetic data set.
///
/// The same plan always produces the same rows. Every tenth user carries the
/// malformed id prefix so id correction is visible in responses, and roughly
/// one row in twenty has no score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedPlan {
    pub rows: usize,
    pub users: usize,
    pub seed: u64,
    /// Epoch milliseconds of the first row
    pub start_ms: i64,
}

impl SeedPlan {
    /// A plan for `rows` rows spread over about a quarter as many users
    pub fn for_rows(rows: usize) -> Self {
        Self {
            rows,
            users: (rows / 4).max(1),
            seed: 0x5eed,
            start_ms: 1_700_000_000_000,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn rows(&self) -> Vec<SeedRow> {
        let mut rng = fastrand::Rng::with_seed(self.seed);
        let users = self.users.max(1);

        (0..self.rows)
            .map(|i| {
                let user = rng.usize(0..users);
                let score = if rng.u8(0..20) == 0 {
                    None
                } else {
                    Some(rng.i64(0..2600))
                };
                SeedRow {
                    user_id: user_id(user),
                    score,
                    created_at: self.start_ms + (i as i64) * 1_000 + rng.i64(0..1_000),
                }
            })
            .collect()
    }
}

fn user_id(user: usize) -> String {
    if user % 10 == 0 {
        format!("대이터독_{:05}", user)
    } else {
        format!("player_{:05}", user)
    }
}
