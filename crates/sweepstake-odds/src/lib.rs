pub mod api;
pub mod config;
pub mod domain;
pub mod infra;
pub mod startup;

pub use api::routes::*;
pub use config::*;
pub use domain::{CompetitionLister, Error, OddsCalculator};
pub use infra::platform::{
    Error as PlatformError, Participant, ParticipantPage, Platform, PlatformClient,
    SweepstakeDetail, SweepstakeSummary, UpstreamPackage,
};
pub use startup::*;
