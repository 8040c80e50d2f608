//! furl: unfurl Bluesky post links shared in Slack.

use std::sync::Arc;

use clap::Parser;
use miette::IntoDiagnostic;
use tower_http::trace::TraceLayer;
use tracing::info;

use furl_common::{
    telemetry, Credentials, PostThreadFetcher, ReqwestTransport, SessionManager,
};

use crate::config::Config;
use crate::pipeline::UnfurlPipeline;
use crate::queue::UnfurlQueue;
use crate::slack::SlackClient;
use crate::state::AppState;
use crate::store::TeamTokenStore;

mod config;
mod pipeline;
mod queue;
mod routes;
mod slack;
mod state;
mod store;

#[tokio::main]
async fn main() -> miette::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init("info,furl_server=debug");

    let config = Config::parse();

    let session = Arc::new(SessionManager::new(
        ReqwestTransport::new()?,
        config.bsky_service.clone(),
        Credentials {
            identifier: config.bsky_identifier.clone(),
            password: config.bsky_app_password.clone(),
        },
    ));
    let fetcher = PostThreadFetcher::new(session);

    let store = Arc::new(TeamTokenStore::new());
    store.upsert(&config.slack_team_id, &config.slack_bot_token);

    let pipeline = Arc::new(UnfurlPipeline::new(fetcher, SlackClient::new()?, store));
    let queue = UnfurlQueue::spawn(config.queue_depth, move |job| {
        let pipeline = pipeline.clone();
        async move { pipeline.run(job).await }
    });

    let app = routes::router()
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::new(queue));

    info!(addr = %config.bind_addr, "starting furl server");
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .into_diagnostic()?;
    axum::serve(listener, app).await.into_diagnostic()?;

    Ok(())
}
