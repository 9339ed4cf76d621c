use async_trait::async_trait;
use tracing::info;

use crate::error::FetchError;
use crate::http::FetchClient;
use crate::model::User;

/// Anything that can hand over the user directory
#[async_trait]
pub trait UserSource: Send + Sync {
    async fn load_users(&self) -> Result<Vec<User>, FetchError>;
}

/// Client for the user directory API (`GET <base>/users`)
#[derive(Clone)]
pub struct UserDirectory {
    client: FetchClient,
    base_url: String,
}

impl UserDirectory {
    pub fn new(client: FetchClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn users_url(&self) -> String {
        format!("{}/users", self.base_url)
    }
}

#[async_trait]
impl UserSource for UserDirectory {
    async fn load_users(&self) -> Result<Vec<User>, FetchError> {
        let users: Vec<User> = self.client.fetch_json(&self.users_url()).await?;
        info!(count = users.len(), "Loaded user directory");
        Ok(users)
    }
}
