//! Staking API HTTP client

use async_trait::async_trait;
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::{Config, Network};
use super::error::StakingApiError;
use super::types::{StakeIntentRequest, StakeIntentResponse, StakingApi};

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Client for the staking intents API
#[derive(Debug, Clone)]
pub struct StakingClient {
    /// API host, without trailing slash
    base_url: String,
    /// API key attached to every call once set
    api_key: Option<String>,
    /// HTTP client
    client: reqwest::Client,
}

impl StakingClient {
    /// Create an unauthenticated client
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            base_url,
            api_key: None,
            client: reqwest::Client::new(),
        }
    }

    /// Create an unauthenticated client for the configured host
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.staking_api_base_url.clone())
    }

    /// Attach the API key used by every subsequent call
    pub fn authenticate(&mut self, api_key: impl Into<String>) {
        self.api_key = Some(api_key.into());
    }

    /// Whether an API key is attached
    pub fn is_authenticated(&self) -> bool {
        self.api_key.is_some()
    }

    /// API host
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of an API path.
    ///
    /// Each segment is percent-encoded on its own, so a `/` inside a
    /// segment never introduces another path level.
    fn endpoint(&self, path: &[&str]) -> Result<Url, StakingApiError> {
        let invalid_base = || StakingApiError::Transport(format!("Invalid base URL {}", self.base_url));

        let mut url = Url::parse(&self.base_url).map_err(|_| invalid_base())?;
        url.path_segments_mut()
            .map_err(|_| invalid_base())?
            .pop_if_empty()
            .extend(path);
        Ok(url)
    }

    /// Send one request and decode the JSON response.
    ///
    /// `path` lists the segments appended to the base URL, starting with
    /// the API version, e.g. `["v1", "ethereum", ...]`.
    #[instrument(skip(self, body), fields(base_url = %self.base_url))]
    pub async fn request<B, T>(&self, method: Method, path: &[&str], body: Option<&B>) -> Result<T, StakingApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;

        let mut request = self
            .client
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(api_key) = &self.api_key {
            request = request.header(API_KEY_HEADER, api_key);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| StakingApiError::Transport(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| StakingApiError::Transport(format!("Failed to read response: {}", e)))?;

        debug!(status = status.as_u16(), "Staking API responded");

        if !status.is_success() {
            return Err(StakingApiError::from_response(status.as_u16(), &text));
        }

        serde_json::from_str(&text).map_err(|e| StakingApiError::Decode(e.to_string()))
    }

    /// `POST /v1/ethereum/{network}/stake-intents`
    pub async fn create_stake_intent(
        &self,
        network: Network,
        request: &StakeIntentRequest,
    ) -> Result<StakeIntentResponse, StakingApiError> {
        self.request(Method::POST, &stake_intents_path(network), Some(request))
            .await
    }

    /// `GET /v1/ethereum/{network}/stake-intents`
    pub async fn list_stake_intents(&self, network: Network) -> Result<Value, StakingApiError> {
        self.request::<(), _>(Method::GET, &stake_intents_path(network), None)
            .await
    }

    /// `GET /v1/ethereum/{network}/stake-intents/{id}`
    pub async fn get_stake_intent(
        &self,
        network: Network,
        stake_intent_id: &str,
    ) -> Result<StakeIntentResponse, StakingApiError> {
        // Dot segments are dropped by the URL parser
        if matches!(stake_intent_id, "" | "." | "..") {
            return Err(StakingApiError::InvalidRequest(format!(
                "Invalid stake intent id {:?}",
                stake_intent_id
            )));
        }

        let mut path: Vec<&str> = stake_intents_path(network);
        path.push(stake_intent_id);
        self.request::<(), _>(Method::GET, &path, None).await
    }
}

fn stake_intents_path(network: Network) -> Vec<&'static str> {
    vec!["v1", "ethereum", network.as_str(), "stake-intents"]
}

#[async_trait]
impl StakingApi for StakingClient {
    fn authenticate(&mut self, api_key: &str) {
        StakingClient::authenticate(self, api_key);
    }

    async fn create_stake_intent(
        &self,
        network: Network,
        request: &StakeIntentRequest,
    ) -> Result<StakeIntentResponse, StakingApiError> {
        StakingClient::create_stake_intent(self, network, request).await
    }
}
