//! Supply selection and details.
//!
//! Neither endpoint has been seen working against a real account yet.

use super::client::{Client, PROVIDER};
use super::endpoints;
use super::parsers::{self, ContractDetails};
use crate::error::{Error, ParseError, Result};
use crate::http::{Charset, Payload};
use crate::parsers::is_success;
use reqwest::Method;
use serde_json::Value;
use tracing::info;

pub struct Unstable<'a> {
    client: &'a mut Client,
}

impl<'a> Unstable<'a> {
    pub(super) fn new(client: &'a mut Client) -> Self {
        Self { client }
    }

    /// Makes `id` the active supply.
    pub async fn select_contract(&mut self, id: &str) -> Result<()> {
        self.client.ensure_session().await?;
        self.select_contract_unchecked(id).await
    }

    pub(super) async fn select_contract_unchecked(&mut self, id: &str) -> Result<()> {
        let payload = Payload::Form(vec![("suministro", id.to_string())]);
        let data = self
            .client
            .request_json(
                Method::POST,
                endpoints::CONTRACT_SELECTION,
                Charset::Utf8,
                payload,
            )
            .await?;

        if !is_success(data.get("result")) {
            return Err(Error::invalid_contract(id));
        }

        self.client.contract = Some(id.to_string());
        info!(provider = PROVIDER, contract = id, "Contract selected");
        Ok(())
    }

    /// Details of the active supply, scraped from the portal's HTML form.
    pub async fn get_contract_details(&mut self) -> Result<ContractDetails> {
        self.client.ensure_session().await?;
        let data = self
            .client
            .request_json(
                Method::GET,
                endpoints::CONTRACT_DETAILS,
                Charset::Utf8,
                Payload::Empty,
            )
            .await?;

        if !is_success(data.get("result")) {
            return Err(Error::command(&data));
        }
        let fragment = data.get("data").and_then(Value::as_str).ok_or_else(|| {
            Error::invalid_data(&data, ParseError::unexpected_type("data", "string"))
        })?;

        parsers::parse_contract_details(fragment).map_err(|e| Error::invalid_data(&data, e))
    }
}
