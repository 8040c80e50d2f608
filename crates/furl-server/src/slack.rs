//! Slack Web API client and event payload types.

use std::time::Duration;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::json;

use furl_common::Error;

const SLACK_API_BASE: &str = "https://slack.com/api";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

// ── Event payloads ──────────────────────────────────────────────────────

/// Outer envelope of an Events API delivery.
#[derive(Debug)]
pub enum EventEnvelope {
    /// Endpoint ownership challenge; echoed back verbatim.
    UrlVerification { challenge: String },
    EventCallback { team_id: String, event: SlackEvent },
    Other(serde_json::Value),
}

impl<'de> Deserialize<'de> for EventEnvelope {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        let text_field = |name: &str| {
            value
                .get(name)
                .and_then(serde_json::Value::as_str)
                .unwrap_or_default()
                .to_owned()
        };

        match value.get("type").and_then(serde_json::Value::as_str) {
            Some("url_verification") => Ok(EventEnvelope::UrlVerification {
                challenge: text_field("challenge"),
            }),
            Some("event_callback") => {
                let team_id = text_field("team_id");
                let event = value
                    .get("event")
                    .cloned()
                    .unwrap_or(serde_json::Value::Null);
                let event = serde_json::from_value(event).map_err(D::Error::custom)?;
                Ok(EventEnvelope::EventCallback { team_id, event })
            }
            _ => Ok(EventEnvelope::Other(value)),
        }
    }
}

#[derive(Debug)]
pub enum SlackEvent {
    LinkShared(LinkSharedEvent),
    Other(serde_json::Value),
}

impl<'de> Deserialize<'de> for SlackEvent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        match value.get("type").and_then(serde_json::Value::as_str) {
            Some("link_shared") => serde_json::from_value(value)
                .map(SlackEvent::LinkShared)
                .map_err(D::Error::custom),
            _ => Ok(SlackEvent::Other(value)),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LinkSharedEvent {
    pub channel: String,
    pub message_ts: String,
    #[serde(default)]
    pub links: Vec<SharedLink>,
}

#[derive(Debug, Deserialize)]
pub struct SharedLink {
    pub url: String,
    #[serde(default)]
    pub domain: String,
}

// ── Web API client ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SlackClient {
    http: reqwest::Client,
}

impl SlackClient {
    pub fn new() -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| Error::Slack(err.to_string()))?;
        Ok(Self { http })
    }

    /// Attach rendered unfurls to a message via `chat.unfurl`.
    ///
    /// Failures are reported for logging only; callers never retry.
    pub async fn chat_unfurl(
        &self,
        bot_token: &str,
        channel: &str,
        message_ts: &str,
        unfurls: serde_json::Map<String, serde_json::Value>,
    ) -> Result<(), Error> {
        let payload = json!({
            "channel": channel,
            "ts": message_ts,
            "unfurls": unfurls,
        });

        let response = self
            .http
            .post(format!("{SLACK_API_BASE}/chat.unfurl"))
            .bearer_auth(bot_token)
            .json(&payload)
            .send()
            .await
            .map_err(|err| Error::Slack(err.to_string()))?;

        let envelope: ApiEnvelope = response
            .json()
            .await
            .map_err(|err| Error::Slack(err.to_string()))?;
        if !envelope.ok {
            return Err(Error::Slack(
                envelope.error.unwrap_or_else(|| "unknown error".into()),
            ));
        }
        Ok(())
    }
}
