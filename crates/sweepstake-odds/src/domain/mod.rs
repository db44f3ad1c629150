mod calculator;
mod competitions;
mod error;

pub use calculator::*;
pub use competitions::*;
pub use error::*;
