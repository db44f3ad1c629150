use log::{debug, info};
use std::sync::Arc;
use sweepstake_odds_core::{calculate, sort_packages, CalculationResult, EntryPackage, OddsInput};

use super::Error;
use crate::infra::platform::Platform;

pub struct OddsCalculator {
    platform: Arc<dyn Platform>,
}

impl OddsCalculator {
    pub fn new(platform: Arc<dyn Platform>) -> Self {
        Self { platform }
    }

    /// Odds for `comp_id` given `your_entries` already held.
    ///
    /// Any upstream failure aborts the whole calculation.
    pub async fn calculate(
        &self,
        comp_id: &str,
        your_entries: u64,
    ) -> Result<CalculationResult, Error> {
        let others_entries = self.total_entries(comp_id).await?;

        let detail = self.platform.sweepstake(comp_id).await?;
        let mut packages: Vec<EntryPackage> = detail
            .entry_packages
            .into_iter()
            .map(EntryPackage::from)
            .collect();
        sort_packages(&mut packages);

        Ok(calculate(OddsInput {
            comp_id: comp_id.to_owned(),
            comp_name: detail.name,
            others_entries,
            your_entries,
            prize_count: detail.prizes.len(),
            packages,
        }))
    }

    /// Sums entry counts over every participant page.
    ///
    /// The page count is only known after a page has been read, so pages are
    /// fetched one at a time and the bound is refreshed after each fetch. A
    /// page that reports no usable page count keeps the previous bound.
    pub async fn total_entries(&self, comp_id: &str) -> Result<u64, Error> {
        let mut total: u64 = 0;
        let mut page: u64 = 1;
        let mut page_count: u64 = 1;

        while page <= page_count {
            let participants = self.platform.participant_page(comp_id, page).await?;
            let entries = participants.entries();
            debug!(
                "sweepstake {} page {}/{}: {} entries",
                comp_id, page, participants.page_count, entries
            );

            total = total.saturating_add(entries);
            if participants.page_count > 0 {
                page_count = participants.page_count;
            }
            page += 1;
        }

        info!(
            "sweepstake {} has {} entries across {} pages",
            comp_id, total, page_count
        );
        Ok(total)
    }
}
