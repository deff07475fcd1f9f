//! Endpoint paths of the Global Omnium virtual office, relative to [`BASE_URL`].
//!
//! Hourly readings were last reviewed on 2024-05-16.

use chrono::NaiveDateTime;

pub const BASE_URL: &str = "https://www.globalomnium.com/VirtualOffice";

pub const LOGIN: &str = "/action_Login/";
pub const CONTRACTS: &str = "/Secure/action_getSuministros/";
pub const CONTRACT_DETAILS: &str = "/Secure/action_getSuministro/";
pub const CONTRACT_SELECTION: &str = "/Secure/action_setSuministroActivo/";
pub const HOURLY_READINGS: &str = "/Secure/action_getDatosLecturaHorariaEntreFechas";

/// Supplies listing; `cache_buster` is the current time in milliseconds.
pub fn contracts(cache_buster: i64) -> String {
    format!("{}?order=asc&_={}", CONTRACTS, cache_buster)
}

/// Hourly readings between two days, both sent as `dd/mm/yy`.
pub fn hourly_readings(start: NaiveDateTime, end: NaiveDateTime) -> String {
    format!(
        "{}?start={}&end={}",
        HOURLY_READINGS,
        start.format("%d/%m/%y"),
        end.format("%d/%m/%y"),
    )
}
