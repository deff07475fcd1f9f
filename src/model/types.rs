use chrono::{NaiveDateTime, TimeDelta};
use serde_derive::Serialize;
use std::collections::BTreeMap;

/// Length of every bucket the portals report.
pub const PERIOD_LENGTH: TimeDelta = TimeDelta::hours(1);

/// Breakdown of a value by tariff period name (e.g. "P1", "P2", "P3").
pub type TariffBreakdown = BTreeMap<String, f64>;

/// Contract record as returned by the portal.
///
/// The schema differs between providers and is not modelled.
pub type Contract = serde_json::Map<String, serde_json::Value>;

/// A point-in-time meter reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Measure {
    /// Cumulative meter counter. i-DE reports it as is; for Global Omnium
    /// it is the m³ reading converted to litres
    pub accumulate: i64,
    /// Instantaneous magnitude: power demand for i-DE, litres of the last
    /// hour for Global Omnium
    pub instant: f64,
}

/// One hourly bucket of a time series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodValue {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub value: f64,
}

impl PeriodValue {
    /// Creates a bucket covering `[start, start + 1h)`.
    pub fn hourly(start: NaiveDateTime, value: f64) -> Self {
        Self {
            start,
            end: start + PERIOD_LENGTH,
            value,
        }
    }

    /// Whether the bucket lies entirely inside `[start, end)`.
    pub fn is_within(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.start >= start && self.end <= end
    }
}

/// Hourly consumption, optionally broken down by tariff period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsumptionForPeriod {
    #[serde(flatten)]
    pub period: PeriodValue,
    pub desglosed: TariffBreakdown,
}

impl From<PeriodValue> for ConsumptionForPeriod {
    fn from(period: PeriodValue) -> Self {
        Self {
            period,
            desglosed: TariffBreakdown::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HistoricalConsumption {
    pub periods: Vec<ConsumptionForPeriod>,
    pub total: f64,
    pub desglosed: TariffBreakdown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HistoricalGeneration {
    pub periods: Vec<PeriodValue>,
    /// Accumulated generation over the queried range, when reported
    pub accumulated: Option<f64>,
    /// CO2-equivalent of the accumulated generation, when reported
    pub accumulated_co2: Option<f64>,
}

/// A power-demand spike sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemandAtInstant {
    pub dt: NaiveDateTime,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HistoricalPowerDemand {
    /// Samples sorted ascending by `dt`
    pub demands: Vec<DemandAtInstant>,
}

/// Session lifetime announced by the portal, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionLimits {
    pub total: i64,
    /// How long before expiry the portal starts warning the user
    pub warning: i64,
}
