//! Blocking HTTP client for the agent observe/act endpoints

use crate::action::{Action, ActionResult};
use crate::config::AgentConfig;
use crate::error::{ConfigError, HttpError, Result};
use crate::observation::Observation;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

/// Client bound to one agent identity and base URL.
///
/// Every call is a single request: non-2xx responses and transport failures are
/// returned to the caller as-is, never retried.
#[derive(Debug, Clone)]
pub struct AgentClient {
    config: AgentConfig,
    http: Client,
}

impl AgentClient {
    /// Create a client with the HTTP library's default timeouts
    pub fn new(config: AgentConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("civforge-agent/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ConfigError::Client)?;

        Ok(Self { config, http })
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    fn url(&self, operation: &str, world_id: &str) -> String {
        format!(
            "{}/agent/{}/{}?worldId={}",
            self.config.base_url(),
            urlencoding::encode(self.config.agent_id()),
            operation,
            urlencoding::encode(world_id)
        )
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header(AUTHORIZATION, self.config.identity().bearer())
    }

    /// Fetch the agent's current view of `world_id`
    #[instrument(skip(self), fields(agent_id = %self.config.agent_id()))]
    pub fn observe(&self, world_id: &str) -> Result<Observation> {
        let url = self.url("observe", world_id);
        debug!(%url, "requesting observation");

        let request = self.authorized(self.http.get(&url));
        self.send("GET", &url, request)
    }

    /// Submit one action to `world_id`
    #[instrument(skip(self, action), fields(agent_id = %self.config.agent_id(), action_id = %action.id, kind = %action.kind))]
    pub fn act(&self, world_id: &str, action: &Action) -> Result<ActionResult> {
        let url = self.url("act", world_id);
        debug!(%url, unit_id = %action.unit_id, "submitting action");

        let request = self.authorized(self.http.post(&url)).json(action);
        self.send("POST", &url, request)
    }

    /// Build an action for this agent with an empty payload.
    pub fn new_action(&self, kind: impl Into<String>, unit_id: impl Into<String>) -> Action {
        Action::new(kind, self.config.agent_id(), unit_id)
    }

    /// Observe, then act on the observed unit.
    ///
    /// Stops at the first failure; a missing `unit.id` means no action is sent.
    pub fn step(
        &self,
        world_id: &str,
        kind: &str,
        payload: Map<String, Value>,
    ) -> Result<ActionResult> {
        let observation = self.observe(world_id)?;
        let unit_id = observation.unit_id()?;

        let action = self.new_action(kind, unit_id).with_payload(payload);
        self.act(world_id, &action)
    }

    fn send<T: DeserializeOwned>(
        &self,
        method: &'static str,
        url: &str,
        request: RequestBuilder,
    ) -> Result<T> {
        let transport = |source: reqwest::Error| HttpError::Transport {
            method,
            url: url.to_string(),
            source,
        };

        let resp = request.send().map_err(transport)?;
        let status = resp.status();
        let body = resp.text().map_err(transport)?;

        if !status.is_success() {
            warn!(method, %url, status = status.as_u16(), "request rejected");
            return Err(HttpError::Status {
                method,
                url: url.to_string(),
                status: status.as_u16(),
                body,
            }
            .into());
        }

        debug!(method, status = status.as_u16(), bytes = body.len(), "response received");

        serde_json::from_str(&body).map_err(|source| {
            HttpError::Decode {
                method,
                url: url.to_string(),
                source,
            }
            .into()
        })
    }
}
