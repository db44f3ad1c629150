mod calculate;
mod competitions;
mod health_check;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domain::Error;

pub use calculate::*;
pub use competitions::*;
pub use health_check::*;

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::MissingParameter(_) => StatusCode::BAD_REQUEST,
            Error::ListCompetitions(_) | Error::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(json!({
            "error": self.to_string(),
        }));
        (status, body).into_response()
    }
}
