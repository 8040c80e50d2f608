use std::net::SocketAddr;

use clap::Parser;
use url::Url;

/// Runtime configuration, from flags or the environment (a `.env` file is
/// loaded first when present).
#[derive(Debug, Parser)]
#[command(name = "furl-server", about = "Unfurl Bluesky post links shared in Slack")]
pub struct Config {
    /// Bluesky account identifier (handle or email).
    #[arg(long, env = "BSKY_IDENTIFIER")]
    pub bsky_identifier: String,

    /// App password for the Bluesky account.
    #[arg(long, env = "BSKY_APP_PASSWORD", hide_env_values = true)]
    pub bsky_app_password: String,

    #[arg(long, env = "BSKY_SERVICE", default_value = "https://bsky.social")]
    pub bsky_service: Url,

    /// Bot token used for chat.unfurl calls.
    #[arg(long, env = "SLACK_BOT_TOKEN", hide_env_values = true)]
    pub slack_bot_token: String,

    /// Workspace the configured bot token belongs to.
    #[arg(long, env = "SLACK_TEAM_ID")]
    pub slack_team_id: String,

    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind_addr: SocketAddr,

    /// Pending unfurl jobs beyond this are dropped and logged.
    #[arg(long, env = "UNFURL_QUEUE_DEPTH", default_value_t = 64)]
    pub queue_depth: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_from_flags() {
        let config = Config::try_parse_from([
            "furl-server",
            "--bsky-identifier",
            "bot.example",
            "--bsky-app-password",
            "secret",
            "--slack-bot-token",
            "xoxb-123",
            "--slack-team-id",
            "T123",
        ])
        .unwrap();

        assert_eq!(config.bsky_service.as_str(), "https://bsky.social/");
        assert_eq!(config.queue_depth, 64);
        assert_eq!(config.bind_addr.port(), 8080);
    }
}
