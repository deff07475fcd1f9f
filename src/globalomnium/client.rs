use super::endpoints;
use super::parsers;
use super::unstable::Unstable;
use crate::config::{ClientConfig, Credentials};
use crate::error::{Error, ParseError, Result};
use crate::helper::{day_of_beginning, normalize_range};
use crate::http::{Charset, Payload, Requester};
use crate::model::{Contract, HistoricalConsumption, Measure, MeterClient};
use crate::parsers::{is_success, parse_contracts};
use crate::session::Session;
use async_trait::async_trait;
use chrono::{Local, NaiveDateTime, TimeDelta, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, info};

pub const PROVIDER: &str = "globalomnium";
/// Prefix of the environment variables configuring this client.
pub const ENV_PREFIX: &str = "GLOBALOMNIUM";

const USER_AGENT_VALUE: &str = concat!("utility-portals/", env!("CARGO_PKG_VERSION"));
const USER_EXPIRED: &str = "UserExpired";

/// Client for the Global Omnium water virtual office.
pub struct Client {
    base_url: String,
    requester: Requester,
    credentials: Credentials,
    pub(super) contract: Option<String>,
    session: Session,
}

impl Client {
    pub fn new(credentials: Credentials, config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            base_url: config.base_url_or(endpoints::BASE_URL).to_string(),
            requester: Requester::new(required_headers(), config.request_timeout())?,
            credentials,
            contract: config.contract.clone(),
            session: Session::new(config.session_timeout(), config.auto_renew_session),
        })
    }

    pub fn username(&self) -> &str {
        &self.credentials.username
    }

    pub fn contract(&self) -> Option<&str> {
        self.contract.as_deref()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_logged(&self) -> bool {
        self.session.is_logged()
    }

    /// Endpoints that have not been confirmed to work.
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

    /// Logs in and, when a contract is configured, makes it the active supply.
    ///
    /// A failed supply selection drops the session again.
    pub async fn login(&mut self) -> Result<()> {
        self.session.invalidate();

        let payload = Payload::Form(vec![
            ("login", self.credentials.username.clone()),
            ("pass", self.credentials.password.clone()),
            ("remember", "true".to_string()),
            ("suministro", String::new()),
        ]);
        let data = self
            .request_json(Method::POST, endpoints::LOGIN, Charset::Utf8, payload)
            .await?;

        if !data.is_object() {
            return Err(Error::invalid_data(
                &data,
                ParseError::unexpected_type("login response", "object"),
            ));
        }
        if data.get("error").and_then(Value::as_str) == Some(USER_EXPIRED) {
            return Err(Error::user_expired(&data));
        }
        if !is_success(data.get("result")) {
            return Err(Error::command(&data));
        }

        self.session.mark_logged_in();
        info!(provider = PROVIDER, username = %self.credentials.username, "Successful authentication");

        if let Some(contract) = self.contract.clone() {
            let selected = self.unstable().select_contract_unchecked(&contract).await;
            if let Err(e) = selected {
                self.session.invalidate();
                return Err(e);
            }
        }
        Ok(())
    }

    pub async fn get_contracts(&mut self) -> Result<Vec<Contract>> {
        self.ensure_session().await?;
        let path = endpoints::contracts(Utc::now().timestamp_millis());
        let data = self
            .request_json(Method::GET, &path, Charset::Utf8, Payload::Empty)
            .await?;

        if !is_success(data.get("result")) {
            return Err(Error::command(&data));
        }
        parse_contracts(&data, "data").map_err(|e| Error::invalid_data(&data, e))
    }

    /// Latest hourly reading of the meter, looking back to yesterday.
    pub async fn get_measure(&mut self) -> Result<Measure> {
        self.ensure_session().await?;
        let today = Local::now().naive_local();
        let path = endpoints::hourly_readings(today - TimeDelta::days(1), today);

        debug!(provider = PROVIDER, "Requesting readings, may take up to a minute");
        let data = self
            .request_json(Method::GET, &path, Charset::Utf8, Payload::Empty)
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
                &endpoints::hourly_readings(start, end),
                Charset::Latin1,
                Payload::Empty,
            )
            .await?;

        parsers::parse_historical_consumption(&data, day_of_beginning(start), start, end)
            .map_err(|e| Error::invalid_data(&data, e))
    }
}

fn required_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("application/x-www-form-urlencoded; charset=UTF-8"),
    );
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
        self.unstable().select_contract(id).await
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
}
