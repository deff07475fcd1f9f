//! Test utilities shared by the client and parser tests.
//!
//! This module provides client configuration builders and canned portal
//! payloads.

#![cfg(test)]

pub mod config;
pub mod fixtures;
