//! Client for the Global Omnium (Aguas de Valencia) water virtual office.

pub mod client;
pub mod endpoints;
pub mod parsers;
pub mod unstable;

pub use client::{Client, ENV_PREFIX, PROVIDER};
pub use parsers::ContractDetails;
pub use unstable::Unstable;
