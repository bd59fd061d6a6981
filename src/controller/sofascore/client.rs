use crate::error::CoreError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::info;

/// HTTP GET capability the cache core is built on.
#[async_trait]
pub trait HttpGet: Send + Sync {
    async fn get_json(&self, url: &str, headers: &[(String, String)]) -> Result<Value, CoreError>;
}

pub struct ReqwestHttp {
    client: Client,
    timeout_secs: u64,
}

impl ReqwestHttp {
    /// # Errors
    ///
    /// Will return `Err` if the underlying client cannot be built
    pub fn new(timeout_secs: u64) -> Result<Self, CoreError> {
        let client = Client::builder()
            .user_agent(concat!("rusty-liga/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            timeout_secs,
        })
    }
}

#[async_trait]
impl HttpGet for ReqwestHttp {
    async fn get_json(&self, url: &str, headers: &[(String, String)]) -> Result<Value, CoreError> {
        info!(url, "GET");
        let mut req = self.client.get(url);
        for (name, value) in headers {
            req = req.header(name.as_str(), value.as_str());
        }

        let resp = req.send().await.map_err(|e| {
            if e.is_timeout() {
                CoreError::Timeout(self.timeout_secs)
            } else {
                CoreError::from(e)
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CoreError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let json: Value = resp.json().await?;
        Ok(json)
    }
}
