//! Per-workspace bot token store.
//!
//! In-memory only: authorization flows upsert into it and the pipeline
//! reads the team's token before each run.

use dashmap::DashMap;

#[derive(Debug, Default)]
pub struct TeamTokenStore {
    tokens: DashMap<String, String>,
}

impl TeamTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&self, team_id: &str, bot_token: &str) {
        self.tokens.insert(team_id.to_owned(), bot_token.to_owned());
    }

    pub fn get(&self, team_id: &str) -> Option<String> {
        self.tokens.get(team_id).map(|token| token.value().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_replaces_token() {
        let store = TeamTokenStore::new();
        assert_eq!(store.get("T123"), None);

        store.upsert("T123", "xoxb-first");
        assert_eq!(store.get("T123").as_deref(), Some("xoxb-first"));

        store.upsert("T123", "xoxb-second");
        assert_eq!(store.get("T123").as_deref(), Some("xoxb-second"));
    }
}
