use super::{
    error::{BlockchainError, Result},
    payload,
    types::{ApiKey, ContractCall, ContractWriteRequest, DeployRequest, RpcOutcome, RpcPayload},
};
use crate::config::Config;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use tracing::{debug, warn};

/// Client for the Stability ZKT gateway.
///
/// Every operation issues exactly one POST and never fails: the outcome is the
/// raw response body, or a redacted message when no body could be obtained.
/// Gateway-side failures are passed through untouched as bodies.
#[derive(Clone)]
pub struct StabilityClient {
    http: reqwest::Client,
    base_url: String,
    api_key: ApiKey,
    write_wait: bool,
}

impl StabilityClient {
    pub fn new(base_url: String, api_key: ApiKey, write_wait: bool) -> Result<Self> {
        let http = reqwest::Client::builder().build()?;
        if api_key.is_public() {
            warn!("using the public try-it-out api key; requests are rate limited");
        }
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            write_wait,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.rpc_url.clone(),
            config.api_key.clone(),
            config.write_wait,
        )
    }

    /// Same connection pool, different key.
    pub fn with_api_key(&self, api_key: ApiKey) -> Self {
        Self {
            api_key,
            ..self.clone()
        }
    }

    pub fn endpoint(&self) -> String {
        self.endpoint_for(&self.api_key)
    }

    fn endpoint_for(&self, api_key: &ApiKey) -> String {
        format!("{}/zkt/{}", self.base_url, api_key.as_str())
    }

    /// Sends a plain text message.
    pub async fn post_zkt_v1(&self, arguments: &str) -> RpcOutcome {
        self.deliver(&payload::post(arguments), &self.api_key).await
    }

    pub async fn call_contract_read(&self, call: &ContractCall) -> RpcOutcome {
        let body = payload::contract_read(call);
        self.send_as(call.api_key.as_deref(), &body).await
    }

    pub async fn call_contract_write(&self, req: &ContractWriteRequest) -> RpcOutcome {
        let body = payload::contract_write(req, self.write_wait);
        self.send_as(req.api_key.as_deref(), &body).await
    }

    pub async fn deploy_contract(&self, req: &DeployRequest) -> RpcOutcome {
        let body = payload::deploy(req);
        self.send_as(req.api_key.as_deref(), &body).await
    }

    pub async fn send(&self, payload: &RpcPayload) -> String {
        self.send_with_key(payload, &self.api_key).await
    }

    /// Never fails: transport errors come back as `Error: <message>` with the key redacted.
    pub async fn send_with_key(&self, payload: &RpcPayload, api_key: &ApiKey) -> String {
        self.deliver(payload, api_key).await.into_text()
    }

    pub async fn deliver(&self, payload: &RpcPayload, api_key: &ApiKey) -> RpcOutcome {
        debug!(kind = payload.kind(), api_key = %api_key.masked(), "posting to gateway");
        match self.request(payload, api_key).await {
            Ok(body) => RpcOutcome::Response(body),
            Err(error) => {
                let message = api_key.redact(&error.to_string());
                warn!(kind = payload.kind(), error = %message, "gateway request failed");
                RpcOutcome::Failed(message)
            }
        }
    }

    async fn send_as(&self, api_key: Option<&str>, payload: &RpcPayload) -> RpcOutcome {
        match api_key {
            None => self.deliver(payload, &self.api_key).await,
            Some(raw) => match ApiKey::new(raw) {
                Ok(key) => self.deliver(payload, &key).await,
                Err(error) => RpcOutcome::Failed(error.to_string()),
            },
        }
    }

    async fn request(&self, payload: &RpcPayload, api_key: &ApiKey) -> Result<String> {
        let response = self
            .http
            .post(self.endpoint_for(api_key))
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .json(payload)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "gateway returned non-success status");
        }

        response
            .text()
            .await
            .map_err(|e| BlockchainError::from(e.without_url()))
    }
}
