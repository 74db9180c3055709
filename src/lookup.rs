//! Outbound IP lookup collaborator.
//!
//! One command handler asks an external endpoint for the server's public
//! address. A failure here is reported to the requesting user only and
//! never affects the session.

use std::time::Duration;

use serde::Deserialize;

use crate::config::LookupConfig;
use crate::{ParleyError, Result};

#[derive(Debug, Deserialize)]
struct IpResponse {
    ip: String,
}

/// Client for the public IP lookup endpoint.
#[derive(Clone)]
pub struct IpLookup {
    client: reqwest::Client,
    url: String,
}

impl IpLookup {
    /// Create a lookup client from configuration.
    pub fn new(config: &LookupConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }

    /// Fetch the public IP address.
    pub async fn my_ip(&self) -> Result<String> {
        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(ParleyError::Lookup(format!(
                "lookup endpoint returned {}",
                response.status()
            )));
        }

        let body: IpResponse = response.json().await?;
        Ok(body.ip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_from_default_config() {
        let lookup = IpLookup::new(&LookupConfig::default());
        assert!(lookup.is_ok());
    }

    #[tokio::test]
    async fn test_my_ip_unreachable_endpoint() {
        let config = LookupConfig {
            // Nothing listens here; the request must fail, not hang.
            url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
        };
        let lookup = IpLookup::new(&config).unwrap();

        let result = lookup.my_ip().await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_my_ip_parses_json_body() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf).await;
            let body = r#"{"ip":"203.0.113.7"}"#;
            let response = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes()).await;
        });

        let config = LookupConfig {
            url: format!("http://{addr}/"),
            timeout_secs: 2,
        };
        let lookup = IpLookup::new(&config).unwrap();

        let ip = lookup.my_ip().await.unwrap();
        assert_eq!(ip, "203.0.113.7");
    }
}
