//! sweepstake-odds-core: types and math shared by the odds proxy
//!
//! Nothing in this crate performs I/O. The proxy crate feeds it numbers
//! pulled from the upstream platform and serializes what comes back.

pub mod coerce;
pub mod odds;
pub mod types;

pub use coerce::*;
pub use odds::*;
pub use types::*;
