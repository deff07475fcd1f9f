//! Clients for Spanish utility customer portals.
//!
//! The portals are not public APIs: the clients log in the way the official
//! web and mobile apps do, keep the session cookie, and read the JSON their
//! internal endpoints return.
//!
//! - [`ideenergy`]: i-DE electricity distribution (measure, consumption,
//!   generation, power demand)
//! - [`globalomnium`]: Global Omnium water supply (measure, consumption)
//!
//! Both clients implement [`MeterClient`].

pub mod config;
pub mod error;
pub mod globalomnium;
pub mod helper;
pub mod http;
pub mod ideenergy;
pub mod model;
pub mod parsers;
pub mod session;

#[cfg(test)]
mod test_utils;

pub use config::{ClientConfig, Credentials};
pub use error::{Error, ParseError, Result};
pub use model::MeterClient;
