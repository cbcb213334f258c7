use crate::config::Config;
use std::time::Duration;

/// Client for the third-party TURN credential vendor.
///
/// Fail-open by design: every failure path (missing configuration, network
/// error, timeout, non-success status, parse error) is logged and yields an
/// empty server list, so the caller always gets a well-formed answer and the
/// client decides how to cope without a relay.
pub struct TurnClient {
    http: reqwest::Client,
    /// Fully-formed vendor URL including the API key, when configured.
    endpoint: Option<String>,
    timeout: Duration,
}

impl TurnClient {
    pub fn new(endpoint: Option<String>, timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
            timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let endpoint = config.turn_api_url.as_ref().map(|url| {
            match &config.turn_api_key {
                Some(key) => format!("{url}?apiKey={key}"),
                None => url.clone(),
            }
        });
        Self::new(endpoint, config.turn_fetch_timeout)
    }

    /// Fetch short-lived relay credentials. The vendor answers with a JSON
    /// array of ICE server objects, forwarded verbatim.
    pub async fn fetch_ice_servers(&self) -> Vec<serde_json::Value> {
        let Some(endpoint) = &self.endpoint else {
            tracing::warn!("TURN_API_URL not configured, returning no relay servers");
            return Vec::new();
        };

        let response = match self.http.get(endpoint).timeout(self.timeout).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, "TURN credential fetch failed");
                return Vec::new();
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(%status, body = %body, "TURN vendor returned non-success status");
            return Vec::new();
        }

        match response.json::<Vec<serde_json::Value>>().await {
            Ok(servers) => servers,
            Err(e) => {
                tracing::error!(error = %e, "TURN credential response parse failed");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unconfigured_client_returns_empty_list() {
        let client = TurnClient::new(None, Duration::from_secs(5));
        assert!(client.fetch_ice_servers().await.is_empty());
    }

    #[test]
    fn from_config_appends_api_key() {
        let config = Config {
            database_url: String::new(),
            port: 3000,
            turn_api_url: Some("https://turn.example.com/api/v1/credentials".into()),
            turn_api_key: Some("secret".into()),
            turn_fetch_timeout: Duration::from_secs(5),
            turn_cache_max_age: 300,
        };
        let client = TurnClient::from_config(&config);
        assert_eq!(
            client.endpoint.as_deref(),
            Some("https://turn.example.com/api/v1/credentials?apiKey=secret")
        );
    }
}
