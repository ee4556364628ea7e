use chrono::Utc;

use crate::domain::repository::StatsRepository;
use crate::domain::types::Stats;
use crate::error::ApiError;

pub struct GetStatsUseCase<S: StatsRepository> {
    pub stats: S,
}

impl<S: StatsRepository> GetStatsUseCase<S> {
    pub async fn execute(&self) -> Result<Stats, ApiError> {
        self.stats.snapshot(Utc::now()).await
    }
}
