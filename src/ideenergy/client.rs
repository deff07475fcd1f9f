use super::endpoints;
use super::parsers;
use super::unstable::Unstable;
use crate::config::{ClientConfig, Credentials};
use crate::error::{Error, ParseError, Result};
use crate::helper::normalize_range;
use crate::http::{Charset, Payload, Requester};
use crate::model::{
    Contract, HistoricalConsumption, HistoricalGeneration, HistoricalPowerDemand, Measure,
    MeterClient,
};
use crate::parsers::{is_success, parse_contracts};
use crate::session::Session;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, USER_AGENT};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};

pub const PROVIDER: &str = "ideenergy";
/// Prefix of the environment variables configuring this client.
pub const ENV_PREFIX: &str = "I_DE_ENERGY";

const USER_AGENT_VALUE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 11_4_1 like Mac OS X) \
    AppleWebKit/605.1.15 (KHTML, like Gecko) Mobile/15G77";
const USER_EXPIRED: &str = "userExpired";
const RESULT_OK: &str = "correcto";

/// Client for the i-DE electricity portal.
pub struct Client {
    requester: Requester,
    base_url: String,
    credentials: Credentials,
    contract: Option<String>,
    pub(super) session: Session,
}

impl Client {
    pub fn new(credentials: Credentials, config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            requester: Requester::new(required_headers(), config.request_timeout())?,
            base_url: config.base_url_or(endpoints::BASE_URL).to_string(),
            credentials,
            contract: config.contract.clone(),
            session: Session::new(config.session_timeout(), config.auto_renew_session),
        })
    }

    pub fn username(&self) -> &str {
        &self.credentials.username
    }

    /// Contract selected after every login, if any.
    pub fn contract(&self) -> Option<&str> {
        self.contract.as_deref()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_logged(&self) -> bool {
        self.session.is_logged()
    }

    /// Experimental endpoints.
    pub fn unstable(&mut self) -> Unstable<'_> {
        Unstable::new(self)
    }

    /// Sends a request to `path` and decodes the JSON answer.
    pub async fn request_json(
        &self,
        method: Method,
        path: &str,
        charset: Charset,
        payload: Payload,
    ) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        self.requester
            .request_json(method, &url, charset, payload)
            .await
    }

    pub(super) async fn ensure_session(&mut self) -> Result<()> {
        if self.session.needs_login() {
            debug!(provider = PROVIDER, "Session expired, logging in again");
            self.login().await?;
        }
        Ok(())
    }

    /// Logs in and, when a contract is configured, selects it.
    ///
    /// If the configured contract cannot be selected the session is dropped
    /// again, so the next call logs in anew instead of running without it.
    pub async fn login(&mut self) -> Result<()> {
        self.session.invalidate();

        let payload = json!([
            self.credentials.username,
            self.credentials.password,
            "",
            "Android 6.0",
            "Móvil",
            "Chrome 119.0.0.0",
            "0",
            "",
            "s",
            "",
        ]);
        let data = self
            .request_json(
                Method::POST,
                endpoints::LOGIN,
                Charset::Utf8,
                Payload::Json(payload),
            )
            .await?;

        if !data.is_object() {
            return Err(Error::invalid_data(
                &data,
                ParseError::unexpected_type("login response", "object"),
            ));
        }
        if data.get("success").and_then(Value::as_str) == Some(USER_EXPIRED) {
            return Err(Error::user_expired(&data));
        }
        if !is_success(data.get("success")) {
            return Err(Error::command(&data));
        }

        self.session.mark_logged_in();
        info!(provider = PROVIDER, username = %self.credentials.username, "Successful authentication");

        if let Some(contract) = self.contract.clone() {
            if let Err(e) = self.select_contract_unchecked(&contract).await {
                self.session.invalidate();
                return Err(e);
            }
        }
        Ok(())
    }

    pub async fn select_contract(&mut self, id: &str) -> Result<()> {
        self.ensure_session().await?;
        self.select_contract_unchecked(id).await
    }

    async fn select_contract_unchecked(&mut self, id: &str) -> Result<()> {
        let data = self
            .request_json(
                Method::GET,
                &endpoints::contract_selection(id),
                Charset::Utf8,
                Payload::Empty,
            )
            .await?;

        if !is_success(data.get("success")) {
            return Err(Error::invalid_contract(id));
        }

        self.contract = Some(id.to_string());
        info!(provider = PROVIDER, contract = id, "Contract selected");
        Ok(())
    }

    pub async fn get_contracts(&mut self) -> Result<Vec<Contract>> {
        self.ensure_session().await?;
        let data = self
            .request_json(Method::GET, endpoints::CONTRACTS, Charset::Utf8, Payload::Empty)
            .await?;

        if !is_success(data.get("success")) {
            return Err(Error::command(&data));
        }
        parse_contracts(&data, "contratos").map_err(|e| Error::invalid_data(&data, e))
    }

    /// Details of the selected contract.
    pub async fn get_contract_details(&mut self) -> Result<Contract> {
        self.ensure_session().await?;
        let data = self
            .request_json(
                Method::GET,
                endpoints::CONTRACT_DETAILS,
                Charset::Utf8,
                Payload::Empty,
            )
            .await?;

        parsers::parse_contract_details(&data).map_err(|e| Error::invalid_data(&data, e))
    }

    /// Whether the ICP (power control switch) answers.
    pub async fn is_icp_ready(&mut self) -> Result<bool> {
        self.ensure_session().await?;
        let data = self
            .request_json(Method::POST, endpoints::ICP_STATUS, Charset::Utf8, Payload::Empty)
            .await?;

        parsers::parse_icp_status(&data).map_err(|e| Error::invalid_data(&data, e))
    }

    /// Reads the meter through the ICP, which can take up to a minute.
    pub async fn get_measure(&mut self) -> Result<Measure> {
        self.ensure_session().await?;
        debug!(provider = PROVIDER, "Requesting data to the ICP, may take up to a minute");
        let data = self
            .request_json(Method::GET, endpoints::MEASURE, Charset::Utf8, Payload::Empty)
            .await?;
        debug!(provider = PROVIDER, ?data, "Got reply");

        let measure = parsers::parse_measure(&data).map_err(|e| Error::invalid_data(&data, e))?;
        info!(
            provider = PROVIDER,
            accumulate = measure.accumulate,
            instant = measure.instant,
            "Measure retrieved"
        );
        Ok(measure)
    }

    pub async fn get_historical_consumption(
        &mut self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<HistoricalConsumption> {
        self.ensure_session().await?;
        let (start, end) = normalize_range(start, end);
        let data = self
            .request_json(
                Method::GET,
                &endpoints::consumption_period(start, end),
                Charset::Latin1,
                Payload::Empty,
            )
            .await?;

        let mut consumption = parsers::parse_historical_consumption(&data)
            .map_err(|e| Error::invalid_data(&data, e))?;
        consumption
            .periods
            .retain(|p| p.period.is_within(start, end));
        Ok(consumption)
    }

    pub async fn get_historical_generation(
        &mut self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<HistoricalGeneration> {
        self.ensure_session().await?;
        let (start, end) = normalize_range(start, end);
        let data = self
            .request_json(
                Method::GET,
                &endpoints::generation_period(start, end),
                Charset::Latin1,
                Payload::Empty,
            )
            .await?;

        let mut generation = parsers::parse_historical_generation(&data)
            .map_err(|e| Error::invalid_data(&data, e))?;
        generation.periods.retain(|p| p.is_within(start, end));
        Ok(generation)
    }

    /// Power-demand spikes over the whole range the portal keeps.
    pub async fn get_historical_power_demand(&mut self) -> Result<HistoricalPowerDemand> {
        self.ensure_session().await?;
        let limits = self
            .request_json(
                Method::GET,
                endpoints::POWER_DEMAND_LIMITS,
                Charset::Utf8,
                Payload::Empty,
            )
            .await?;

        if limits.get("resultado").and_then(Value::as_str) != Some(RESULT_OK) {
            return Err(Error::command(&limits));
        }
        let limits = parsers::parse_power_demand_limits(&limits)
            .map_err(|e| Error::invalid_data(&limits, e))?;

        let data = self
            .request_json(
                Method::GET,
                &endpoints::power_demand_period(&limits.min, &limits.max),
                Charset::Utf8,
                Payload::Empty,
            )
            .await?;

        match data.get("resultado").and_then(Value::as_str) {
            Some(result) if result != RESULT_OK => Err(Error::command(&data)),
            _ => parsers::parse_historical_power_demand(&data)
                .map_err(|e| Error::invalid_data(&data, e)),
        }
    }
}

fn required_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("application/json; charset=utf-8"),
    );
    // header names travel lower-cased, the portal matches them case-insensitively
    headers.insert("esversionnueva", HeaderValue::from_static("1"));
    headers.insert("idioma", HeaderValue::from_static("es"));
    headers.insert("movilapp", HeaderValue::from_static("si"));
    headers.insert("tipoapp", HeaderValue::from_static("ios"));
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
    headers
}

#[async_trait]
impl MeterClient for Client {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    fn is_logged(&self) -> bool {
        Client::is_logged(self)
    }

    async fn login(&mut self) -> Result<()> {
        Client::login(self).await
    }

    async fn get_contracts(&mut self) -> Result<Vec<Contract>> {
        Client::get_contracts(self).await
    }

    async fn select_contract(&mut self, id: &str) -> Result<()> {
        Client::select_contract(self, id).await
    }

    async fn get_measure(&mut self) -> Result<Measure> {
        Client::get_measure(self).await
    }

    async fn get_historical_consumption(
        &mut self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<HistoricalConsumption> {
        Client::get_historical_consumption(self, start, end).await
    }

    async fn get_historical_generation(
        &mut self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<HistoricalGeneration> {
        Client::get_historical_generation(self, start, end).await
    }

    async fn get_historical_power_demand(&mut self) -> Result<HistoricalPowerDemand> {
        Client::get_historical_power_demand(self).await
    }
}
