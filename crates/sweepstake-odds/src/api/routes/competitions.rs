use axum::{extract::State, response::ErrorResponse, Json};
use log::error;
use std::sync::Arc;
use sweepstake_odds_core::Competition;

use crate::startup::AppState;

pub async fn get_competitions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Competition>>, ErrorResponse> {
    state.competitions.list().await.map(Json).map_err(|e| {
        error!("error fetching competitions: {:?}", e);
        e.into()
    })
}
