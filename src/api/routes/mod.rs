pub mod analysis;
pub mod events;
pub mod health;
pub mod monitor;
pub mod prediction;

use serde::Deserialize;

/// `?limit=N` query, 20 when absent
#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    limit: Option<usize>,
}

impl LimitQuery {
    pub const DEFAULT: usize = 20;

    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(Self::DEFAULT)
    }
}
