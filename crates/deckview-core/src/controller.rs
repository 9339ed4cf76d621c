//! Startup wiring: user directory -> selector -> pipeline.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::error::FetchError;
use crate::model::User;
use crate::pipeline::DeckPipeline;
use crate::surface::{DisplaySurface, SelectHandler, Selector};
use crate::users::UserSource;

pub struct DeckController<S: DisplaySurface> {
    users: Arc<dyn UserSource>,
    pipeline: Arc<DeckPipeline<S>>,
}

impl<S: DisplaySurface> DeckController<S> {
    pub fn new(users: Arc<dyn UserSource>, pipeline: Arc<DeckPipeline<S>>) -> Self {
        Self { users, pipeline }
    }

    pub fn pipeline(&self) -> &Arc<DeckPipeline<S>> {
        &self.pipeline
    }

    /// Load the user directory, hand the names to `selector`, and load the
    /// first user's deck. Returns how many users were loaded.
    ///
    /// On failure the selector is left untouched and nothing is retried.
    pub async fn start(&self, selector: &dyn Selector) -> Result<usize, FetchError> {
        let users: Arc<[User]> = match self.users.load_users().await {
            Ok(users) => users.into(),
            Err(err) => {
                error!(
                    status = ?err.status(),
                    url = %err.url(),
                    "Failed to load users: {}",
                    err
                );
                return Err(err);
            }
        };

        let pipeline = self.pipeline.clone();
        let directory = users.clone();
        let handler: SelectHandler =
            Arc::new(move |index| select_user(&pipeline, &directory, index));

        selector.on_select(handler.clone());
        let names: Vec<String> = users.iter().map(|u| u.name.clone()).collect();
        selector.populate(&names);

        if !users.is_empty() {
            handler(0);
        }

        Ok(users.len())
    }
}

fn select_user<S: DisplaySurface>(pipeline: &DeckPipeline<S>, users: &[User], index: usize) {
    match users.get(index) {
        Some(user) => {
            info!(index, user = %user.name, "User selected");
            pipeline.start_run(user.clone());
        }
        None => warn!(index, count = users.len(), "Ignoring selection outside the user list"),
    }
}
