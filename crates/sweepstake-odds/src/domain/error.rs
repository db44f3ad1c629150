use thiserror::Error;

use crate::infra::platform;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing {0} parameter")]
    MissingParameter(&'static str),
    #[error("Failed to fetch competitions")]
    ListCompetitions(#[source] platform::Error),
    #[error("{0}")]
    Upstream(#[from] platform::Error),
}
