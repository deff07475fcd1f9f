//! Request layer shared by the portal clients.
//!
//! [`Requester`] owns the HTTP client (and with it the cookie jar holding the
//! portal session), adds the headers a portal insists on, and turns non-200
//! answers into [`Error::RequestFailed`].

use crate::error::{DecodeError, Error, Result};
use reqwest::header::HeaderMap;
use reqwest::{Client as HttpClient, Method, StatusCode};
use serde_json::Value;
use std::time::Duration;

/// Character encoding of a response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Charset {
    #[default]
    Utf8,
    /// ISO-8859-1, used by the older consumption endpoints
    Latin1,
}

impl Charset {
    pub fn name(&self) -> &'static str {
        match self {
            Charset::Utf8 => "utf-8",
            Charset::Latin1 => "iso-8859-1",
        }
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<String, DecodeError> {
        match self {
            Charset::Utf8 => {
                String::from_utf8(bytes.to_vec()).map_err(|e| DecodeError::Charset {
                    charset: self.name(),
                    message: e.to_string(),
                })
            }
            // every byte maps to the code point of the same value
            Charset::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }
}

/// Request body.
#[derive(Debug, Clone, Default)]
pub enum Payload {
    #[default]
    Empty,
    Json(Value),
    Form(Vec<(&'static str, String)>),
}

pub struct Requester {
    http_client: HttpClient,
    headers: HeaderMap,
}

impl Requester {
    /// Builds a requester whose every call carries `headers`.
    pub fn new(headers: HeaderMap, timeout: Duration) -> Result<Self> {
        let http_client = HttpClient::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http_client,
            headers,
        })
    }

    /// Sends a request; `extra_headers` are sent too unless a required header overrides them.
    pub async fn request_bytes(
        &self,
        method: Method,
        url: &str,
        extra_headers: HeaderMap,
        payload: Payload,
    ) -> Result<Vec<u8>> {
        let mut headers = extra_headers;
        for (name, value) in &self.headers {
            headers.insert(name.clone(), value.clone());
        }

        let builder = self.http_client.request(method.clone(), url).headers(headers);
        let builder = match payload {
            Payload::Empty => builder,
            Payload::Json(body) => builder.json(&body),
            Payload::Form(fields) => builder.form(&fields),
        };

        tracing::debug!(%method, url, "Sending request");
        let response = builder.send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::request_failed(status));
        }

        Ok(response.bytes().await?.to_vec())
    }

    /// Sends a request and decodes the body as JSON in the given charset.
    pub async fn request_json(
        &self,
        method: Method,
        url: &str,
        charset: Charset,
        payload: Payload,
    ) -> Result<Value> {
        let bytes = self
            .request_bytes(method, url, HeaderMap::new(), payload)
            .await?;
        Ok(decode_json(&bytes, charset)?)
    }
}

/// Decodes `bytes` with `charset` and parses the text as JSON.
pub fn decode_json(bytes: &[u8], charset: Charset) -> Result<Value, DecodeError> {
    let text = charset.decode(bytes)?;
    Ok(serde_json::from_str(&text)?)
}
