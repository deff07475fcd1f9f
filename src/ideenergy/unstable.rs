//! Endpoints whose behaviour has not been confirmed against real accounts.

use super::client::{Client, PROVIDER};
use super::endpoints;
use super::parsers;
use crate::error::{Error, Result};
use crate::http::{Charset, Payload};
use crate::model::SessionLimits;
use reqwest::Method;
use tracing::debug;

pub struct Unstable<'a> {
    client: &'a mut Client,
}

impl<'a> Unstable<'a> {
    pub(super) fn new(client: &'a mut Client) -> Self {
        Self { client }
    }

    /// Asks the portal to extend the current session.
    ///
    /// The announced limits are reported as is; the client keeps using its
    /// configured session timeout.
    pub async fn keep_session(&mut self) -> Result<SessionLimits> {
        self.client.ensure_session().await?;
        let data = self
            .client
            .request_json(
                Method::GET,
                endpoints::KEEP_SESSION,
                Charset::Utf8,
                Payload::Empty,
            )
            .await?;

        match parsers::parse_session_limits(&data) {
            Ok(Some(limits)) => {
                self.client.session.mark_logged_in();
                debug!(provider = PROVIDER, total = limits.total, "Session kept alive");
                Ok(limits)
            }
            Ok(None) => Err(Error::command(&data)),
            Err(e) => Err(Error::invalid_data(&data, e)),
        }
    }
}
