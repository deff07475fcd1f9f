//! Configuration utilities for testing.

use crate::config::ClientConfig;

/// Builder for client configurations pointing at a mock server.
///
/// Request timeouts are kept short so that a missing mock fails fast.
#[derive(Debug)]
pub struct TestClientConfigBuilder {
    config: ClientConfig,
}

impl TestClientConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig {
                base_url: Some("http://test.local".to_string()),
                request_timeout_sec: 5,
                ..ClientConfig::default()
            },
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    pub fn with_session_timeout_sec(mut self, seconds: u64) -> Self {
        self.config.session_timeout_sec = seconds;
        self
    }

    pub fn with_auto_renew_session(mut self, enabled: bool) -> Self {
        self.config.auto_renew_session = enabled;
        self
    }

    pub fn with_contract(mut self, contract: impl Into<String>) -> Self {
        self.config.contract = Some(contract.into());
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_builder() {
        let config = TestClientConfigBuilder::new()
            .with_base_url("http://mock.local")
            .with_session_timeout_sec(0)
            .with_auto_renew_session(false)
            .with_contract("123")
            .build();

        assert_eq!(config.base_url_or("http://unused"), "http://mock.local");
        assert_eq!(config.session_timeout_sec, 0);
        assert!(!config.auto_renew_session);
        assert_eq!(config.contract.as_deref(), Some("123"));
        assert_eq!(config.request_timeout_sec, 5);
    }
}
