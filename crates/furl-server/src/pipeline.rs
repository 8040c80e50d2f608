//! Per-event unfurl orchestration: fetch → resolve → blocks → chat.unfurl.
//!
//! Thin composition over the fetcher and renderer. Every failure here is
//! terminal for its link or event: logged and abandoned, never retried,
//! never propagated back to the webhook.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, warn};

use furl_common::{Error, PostThreadFetcher, Transport};
use furl_renderer::{render_blocks, resolve_thread};

use crate::queue::UnfurlJob;
use crate::slack::SlackClient;
use crate::store::TeamTokenStore;

pub struct UnfurlPipeline<T> {
    fetcher: PostThreadFetcher<T>,
    slack: SlackClient,
    store: Arc<TeamTokenStore>,
}

impl<T: Transport> UnfurlPipeline<T> {
    pub fn new(
        fetcher: PostThreadFetcher<T>,
        slack: SlackClient,
        store: Arc<TeamTokenStore>,
    ) -> Self {
        Self {
            fetcher,
            slack,
            store,
        }
    }

    pub async fn run(&self, job: UnfurlJob) {
        let Some(bot_token) = self.store.get(&job.team_id) else {
            warn!(team_id = %job.team_id, "no bot token for team, skipping unfurl");
            return;
        };

        let mut unfurls = serde_json::Map::new();
        for link in &job.links {
            match self.unfurl_link(link).await {
                Ok(blocks) => {
                    unfurls.insert(link.clone(), json!({ "blocks": blocks }));
                }
                Err(Error::InvalidUrl { .. }) => {
                    debug!(link, "not a post url, skipping");
                }
                Err(err) => {
                    warn!(link, error = %err, "unfurl failed, abandoning link");
                }
            }
        }
        if unfurls.is_empty() {
            return;
        }

        if let Err(err) = self
            .slack
            .chat_unfurl(&bot_token, &job.channel, &job.message_ts, unfurls)
            .await
        {
            warn!(channel = %job.channel, error = %err, "chat.unfurl failed");
        }
    }

    async fn unfurl_link(&self, link: &str) -> Result<serde_json::Value, Error> {
        let thread = self.fetcher.thread_for_url(link).await?;
        let nodes = resolve_thread(&thread);
        let blocks = render_blocks(&nodes);
        serde_json::to_value(&blocks).map_err(|err| Error::Render(err.to_string()))
    }
}
