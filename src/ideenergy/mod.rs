//! Client for the i-DE (Iberdrola distribution) electricity portal.

pub mod client;
pub mod endpoints;
pub mod parsers;
pub mod unstable;

pub use client::{Client, ENV_PREFIX, PROVIDER};
pub use unstable::Unstable;
