//! Odds calculation for entry purchases
//!
//! Every prize draw is modelled as an independent trial won with probability
//! `your_entries / total_entries`. Multi-prize competitions additionally get
//! an "any place" probability of winning at least one of the draws.

use crate::types::{CalculationResult, EntryPackage, Odds, PackageRow};

/// Everything the calculation needs once upstream has been read
#[derive(Debug, Clone)]
pub struct OddsInput {
    pub comp_id: String,
    pub comp_name: Option<String>,
    /// Entries sold to everyone else
    pub others_entries: u64,
    pub your_entries: u64,
    pub prize_count: usize,
    /// Must already be sorted by ascending price
    pub packages: Vec<EntryPackage>,
}

/// Round to two decimal places, halves away from zero
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `yours / total`, or 0 when nothing has been sold
pub fn win_probability(yours: u64, total: u64) -> f64 {
    if total > 0 {
        yours as f64 / total as f64
    } else {
        0.0
    }
}

/// Probability of winning at least one of `prize_count` independent draws
pub fn any_place_probability(single: f64, prize_count: usize) -> f64 {
    let draws = i32::try_from(prize_count).unwrap_or(i32::MAX);
    1.0 - (1.0 - single).powi(draws)
}

/// Reciprocal of `probability` rounded to cents, unreachable at zero
pub fn one_in(probability: f64) -> Odds {
    if probability > 0.0 {
        Odds::Finite(round2(1.0 / probability))
    } else {
        Odds::Unreachable
    }
}

pub fn is_multi_prize(prize_count: usize) -> bool {
    prize_count > 1
}

/// Sort packages by ascending price. Equal prices keep their upstream order.
pub fn sort_packages(packages: &mut [EntryPackage]) {
    packages.sort_by(|a, b| a.price.total_cmp(&b.price));
}

/// Odds after buying `package` on top of `your_entries`
pub fn project_package(
    others_entries: u64,
    your_entries: u64,
    prize_count: usize,
    package: &EntryPackage,
) -> PackageRow {
    let new_your = your_entries.saturating_add(package.entries);
    let new_total = others_entries.saturating_add(new_your);

    let probability = win_probability(new_your, new_total);
    let one_in_top = one_in(probability);

    let any_place_prob = if is_multi_prize(prize_count) && new_total > 0 {
        any_place_probability(probability, prize_count)
    } else {
        probability
    };

    PackageRow {
        entries: package.entries,
        price: package.price,
        probability,
        one_in: one_in_top,
        cost_based_on_odds: one_in_top.map(|n| n * package.price),
        any_place_prob,
        any_place_one_in: one_in(any_place_prob),
    }
}

pub fn calculate(input: OddsInput) -> CalculationResult {
    let overall_entries = input.others_entries.saturating_add(input.your_entries);
    let current_odds = win_probability(input.your_entries, overall_entries);
    let multi_prize = is_multi_prize(input.prize_count);

    let current_any_place_odds = if multi_prize && overall_entries > 0 && input.your_entries > 0 {
        any_place_probability(current_odds, input.prize_count)
    } else {
        current_odds
    };

    let packages = input
        .packages
        .iter()
        .map(|pkg| {
            project_package(
                input.others_entries,
                input.your_entries,
                input.prize_count,
                pkg,
            )
        })
        .collect();

    CalculationResult {
        comp_id: input.comp_id,
        comp_name: input.comp_name,
        others_entries: input.others_entries,
        your_entries: input.your_entries,
        overall_entries,
        current_odds,
        current_any_place_odds,
        prize_count: input.prize_count,
        is_multi_prize: multi_prize,
        packages,
    }
}
