use axum::{
    extract::{Query, State},
    response::ErrorResponse,
    Json,
};
use log::{debug, error};
use std::sync::Arc;
use sweepstake_odds_core::{parse_count_or_zero, CalculationResult};

use crate::{domain::Error, startup::AppState};

/// Query string of `/api/calculate`, kept as raw strings so bad input degrades instead of failing
#[derive(Debug, Default)]
pub struct CalculateParams {
    pub compid: Option<String>,
    /// Every `entries` value given, in order
    pub entries: Vec<String>,
}

impl CalculateParams {
    /// Repeated `compid` keys keep the last one. Unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        pairs
            .into_iter()
            .fold(Self::default(), |mut params, (key, value)| {
                match key.as_str() {
                    "compid" => params.compid = Some(value),
                    "entries" => params.entries.push(value),
                    _ => {}
                }
                params
            })
    }

    pub fn comp_id(&self) -> Result<&str, Error> {
        match self.compid.as_deref() {
            Some(id) if !id.is_empty() => Ok(id),
            _ => Err(Error::MissingParameter("compid")),
        }
    }

    /// A single `entries` value parsed or zero; a repeated key is not a number and gives zero
    pub fn your_entries(&self) -> u64 {
        match self.entries.as_slice() {
            [entries] => parse_count_or_zero(entries),
            _ => 0,
        }
    }
}

pub async fn calculate(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<CalculationResult>, ErrorResponse> {
    let params = CalculateParams::from_pairs(pairs);
    let comp_id = params.comp_id()?;
    let your_entries = params.your_entries();
    debug!("calculating odds for {} with {} entries", comp_id, your_entries);

    state
        .calculator
        .calculate(comp_id, your_entries)
        .await
        .map(Json)
        .map_err(|e| {
            error!("error calculating odds for {}: {}", comp_id, e);
            e.into()
        })
}
