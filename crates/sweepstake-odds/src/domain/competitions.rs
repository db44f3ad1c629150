use log::debug;
use std::sync::Arc;
use sweepstake_odds_core::Competition;

use super::Error;
use crate::infra::platform::Platform;

pub struct CompetitionLister {
    platform: Arc<dyn Platform>,
}

impl CompetitionLister {
    pub fn new(platform: Arc<dyn Platform>) -> Self {
        Self { platform }
    }

    /// Recent competitions in the order the platform returned them
    pub async fn list(&self) -> Result<Vec<Competition>, Error> {
        let sweepstakes = self
            .platform
            .recent_sweepstakes()
            .await
            .map_err(Error::ListCompetitions)?;
        debug!("platform returned {} recent sweepstakes", sweepstakes.len());

        Ok(sweepstakes.into_iter().map(Competition::from).collect())
    }
}
