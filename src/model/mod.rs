//! Data model for metering records and the client interface.
//!
//! Records are plain values built by the parsers from portal responses and
//! handed to the caller.

pub mod traits;
pub mod types;

pub use traits::MeterClient;
pub use types::{
    ConsumptionForPeriod, Contract, DemandAtInstant, HistoricalConsumption, HistoricalGeneration,
    HistoricalPowerDemand, Measure, PeriodValue, SessionLimits, TariffBreakdown, PERIOD_LENGTH,
};
