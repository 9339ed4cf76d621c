use async_trait::async_trait;

use crate::error::FetchError;
use crate::http::FetchClient;
use crate::model::Character;

/// Resolves a character ID to its metadata
#[async_trait]
pub trait CharacterSource: Send + Sync {
    async fn resolve_character(&self, id: i64) -> Result<Character, FetchError>;
}

/// Client for the character API (`GET <base>/<id>`)
#[derive(Clone)]
pub struct CharacterResolver {
    client: FetchClient,
    base_url: String,
}

impl CharacterResolver {
    pub fn new(client: FetchClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn character_url(&self, id: i64) -> String {
        format!("{}/{}", self.base_url, id)
    }
}

#[async_trait]
impl CharacterSource for CharacterResolver {
    async fn resolve_character(&self, id: i64) -> Result<Character, FetchError> {
        self.client.fetch_json(&self.character_url(id)).await
    }
}
