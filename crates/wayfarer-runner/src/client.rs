//! HTTP client for the external decision service.
//!
//! Every call is a single JSON `POST` with a hard deadline and no retries.
//! Failures never reach the turn loop: the [`TurnDecisionSource`] impl
//! falls back to `Rest` and the [`TradeDecisionSource`] impl falls back to
//! `Reject`.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use wayfarer_core::config::DecisionServiceConfig;
use wayfarer_core::{TradeDecisionSource, TurnDecisionSource};
use wayfarer_types::{
    Decision, DecisionRequest, DecisionResponse, TradeAction, TradeDecisionRequest, TradeDecisionResponse,
};

use crate::error::RunnerError;
use crate::parse::{parse_decision, parse_trade_action};

/// Client for the `/decide`, `/trade` and `/reset` endpoints.
#[derive(Debug, Clone)]
pub struct DecisionClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl DecisionClient {
    /// Build a client from the decision service configuration.
    pub fn new(config: &DecisionServiceConfig) -> Result<Self, RunnerError> {
        let timeout = config.request_timeout();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RunnerError::Http(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            timeout,
        })
    }

    /// The base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Ask the service what the player does this turn.
    pub async fn request_decision(&self, request: &DecisionRequest) -> Result<Decision, RunnerError> {
        let response: DecisionResponse = self.post_json("decide", request).await?;
        Ok(parse_decision(&response.decision))
    }

    /// Ask the service how to answer the offer on the table.
    ///
    /// A response carrying an `error` is an error even if it also names an
    /// action.
    pub async fn request_trade_action(&self, request: &TradeDecisionRequest) -> Result<TradeAction, RunnerError> {
        let response: TradeDecisionResponse = self.post_json("trade", request).await?;
        if let Some(error) = response.error.filter(|e| !e.is_empty()) {
            return Err(RunnerError::Service(error));
        }
        Ok(parse_trade_action(&response.trade_action))
    }

    /// Clear the service's memory of the previous run.
    pub async fn reset_session(&self) -> Result<(), RunnerError> {
        let url = self.endpoint("reset");
        let response = tokio::time::timeout(self.timeout, self.client.post(&url).send())
            .await
            .map_err(|_elapsed| RunnerError::Timeout(self.timeout.as_millis()))?
            .map_err(|e| RunnerError::Http(format!("reset request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RunnerError::Status(status.to_string()));
        }
        info!(url = %url, "Decision service session reset");
        Ok(())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, RunnerError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = self.endpoint(path);
        let call = async {
            let response = self
                .client
                .post(&url)
                .json(body)
                .send()
                .await
                .map_err(|e| RunnerError::Http(format!("{path} request failed: {e}")))?;

            let status = response.status();
            if !status.is_success() {
                return Err(RunnerError::Status(status.to_string()));
            }

            let text = response
                .text()
                .await
                .map_err(|e| RunnerError::Http(format!("{path} response read failed: {e}")))?;
            Ok::<R, RunnerError>(serde_json::from_str(&text)?)
        };

        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_elapsed| RunnerError::Timeout(self.timeout.as_millis()))?
    }
}

impl TurnDecisionSource for DecisionClient {
    async fn decide_turn(&mut self, request: &DecisionRequest) -> Decision {
        match self.request_decision(request).await {
            Ok(decision) => {
                debug!(%decision, "Decision service answered");
                decision
            }
            Err(e) => {
                warn!(error = %e, "Turn decision failed, resting");
                Decision::Rest
            }
        }
    }
}

impl TradeDecisionSource for DecisionClient {
    async fn decide_trade(&mut self, request: &TradeDecisionRequest) -> TradeAction {
        match self.request_trade_action(request).await {
            Ok(action) => {
                debug!(action = action.keyword(), round = request.round, "Trade decision answered");
                action
            }
            Err(e) => {
                warn!(error = %e, round = request.round, "Trade decision failed, rejecting");
                TradeAction::Reject
            }
        }
    }
}
