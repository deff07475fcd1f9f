use crate::error::{Error, Result};
use crate::model::{
    Contract, HistoricalConsumption, HistoricalGeneration, HistoricalPowerDemand, Measure,
};
use async_trait::async_trait;
use chrono::NaiveDateTime;

/// Operations every utility portal client offers.
///
/// Implementors keep one portal session each. Methods that talk to the portal
/// take `&mut self`: an expired session may trigger a login, which updates the
/// session state.
#[async_trait]
pub trait MeterClient: Send {
    /// Short provider name used in logs and error messages.
    fn provider(&self) -> &'static str;

    /// Whether the portal session is still considered valid.
    fn is_logged(&self) -> bool;

    /// Authenticates against the portal and starts a new session.
    async fn login(&mut self) -> Result<()>;

    /// Lists the contracts (supply points) of the logged user.
    async fn get_contracts(&mut self) -> Result<Vec<Contract>>;

    /// Makes `id` the contract subsequent metering queries refer to.
    async fn select_contract(&mut self, id: &str) -> Result<()>;

    /// Reads the meter.
    async fn get_measure(&mut self) -> Result<Measure>;

    /// Hourly consumption between `start` and `end`, in either order.
    async fn get_historical_consumption(
        &mut self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<HistoricalConsumption>;

    /// Hourly generation between `start` and `end`, in either order.
    ///
    /// Providers without self-consumption data answer [`Error::Unsupported`].
    async fn get_historical_generation(
        &mut self,
        _start: NaiveDateTime,
        _end: NaiveDateTime,
    ) -> Result<HistoricalGeneration> {
        Err(Error::unsupported(self.provider(), "historical generation"))
    }

    /// Power-demand spikes over the range the portal makes available.
    async fn get_historical_power_demand(&mut self) -> Result<HistoricalPowerDemand> {
        Err(Error::unsupported(self.provider(), "historical power demand"))
    }
}
