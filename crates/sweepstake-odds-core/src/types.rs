//! Response types returned by the proxy

use serde::{Serialize, Serializer};

/// Competition as listed to the front-end
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Competition {
    pub id: String,
    pub name: String,
}

/// A priced bundle of entries offered by a competition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntryPackage {
    pub entries: u64,
    pub price: f64,
}

/// "1 in N" style odds, or a cost derived from them.
///
/// Serializes as a plain number when finite and as `null` when unreachable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Odds {
    Finite(f64),
    Unreachable,
}

impl Odds {
    pub fn is_finite(&self) -> bool {
        matches!(self, Odds::Finite(_))
    }

    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Odds {
        match self {
            Odds::Finite(v) => Odds::Finite(f(v)),
            Odds::Unreachable => Odds::Unreachable,
        }
    }
}

impl Serialize for Odds {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Odds::Finite(v) => serializer.serialize_f64(*v),
            Odds::Unreachable => serializer.serialize_none(),
        }
    }
}

/// Projected outcome of buying one entry package
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PackageRow {
    pub entries: u64,
    pub price: f64,
    /// Top prize probability after the purchase
    pub probability: f64,
    pub one_in: Odds,
    /// Expected spend to win the top prize at this tier's price
    pub cost_based_on_odds: Odds,
    pub any_place_prob: f64,
    pub any_place_one_in: Odds,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub comp_id: String,
    pub comp_name: Option<String>,
    pub others_entries: u64,
    pub your_entries: u64,
    pub overall_entries: u64,
    pub current_odds: f64,
    pub current_any_place_odds: f64,
    pub prize_count: usize,
    pub is_multi_prize: bool,
    pub packages: Vec<PackageRow>,
}
