use std::sync::Arc;

use deckview_core::{
    CharacterResolver, Config, DeckController, DeckPipeline, FetchClient, FetchError,
    ImageFetcher, RunHandle, SelectorList, SlotBoard, UserDirectory,
};
use anyhow::Result;
use ratatui::widgets::ListState;
use tokio::task::JoinHandle;
use tracing::warn;

/// Where the user directory load stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryStatus {
    Loading,
    Ready(usize),
    Failed(String),
}

pub struct App {
    pub should_quit: bool,

    // User list (the selector) and its highlight
    pub selector: SelectorList,
    pub user_state: ListState,

    // Cards
    pub board: SlotBoard,
    pub pipeline: Arc<DeckPipeline<SlotBoard>>,

    pub status: DirectoryStatus,
    pub startup_task: Option<JoinHandle<Result<usize, FetchError>>>,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation
}

impl App {
    pub fn new(pipeline: Arc<DeckPipeline<SlotBoard>>, selector: SelectorList) -> Self {
        let board = pipeline.surface().as_ref().clone();
        Self {
            should_quit: false,
            selector,
            user_state: ListState::default(),
            board,
            pipeline,
            status: DirectoryStatus::Loading,
            startup_task: None,
            animation_frame: 0,
        }
    }

    /// Build the clients from `config` and start loading the user directory
    /// in the background.
    pub fn start(config: &Config) -> Result<Self> {
        let client = FetchClient::new(config.request_timeout())?;
        let board = SlotBoard::new();
        let pipeline = Arc::new(DeckPipeline::new(
            Arc::new(CharacterResolver::new(client.clone(), &config.character_api)),
            Arc::new(ImageFetcher::new(client.clone())),
            Arc::new(board),
        ));
        let controller = DeckController::new(
            Arc::new(UserDirectory::new(client, &config.users_api)),
            pipeline.clone(),
        );

        let selector = SelectorList::new();
        let mut app = Self::new(pipeline, selector.clone());
        app.startup_task = Some(tokio::spawn(async move {
            controller.start(&selector).await
        }));
        Ok(app)
    }

    /// Pick up the result of the directory load once it lands
    pub async fn poll_startup(&mut self) {
        let finished = self
            .startup_task
            .as_ref()
            .is_some_and(|task| task.is_finished());
        if !finished {
            return;
        }

        let Some(task) = self.startup_task.take() else {
            return;
        };
        self.status = match task.await {
            Ok(Ok(count)) => {
                if count > 0 {
                    self.user_state.select(Some(0));
                }
                DirectoryStatus::Ready(count)
            }
            Ok(Err(err)) => DirectoryStatus::Failed(err.slot_text()),
            Err(join_err) => {
                warn!("User directory task ended abnormally: {}", join_err);
                DirectoryStatus::Failed("User directory task ended abnormally".to_string())
            }
        };
    }

    pub fn user_count(&self) -> usize {
        self.selector.len()
    }

    pub fn user_down(&mut self) {
        let count = self.user_count();
        if count == 0 {
            return;
        }
        let next = match self.user_state.selected() {
            Some(i) if i + 1 < count => i + 1,
            Some(_) => 0,
            None => 0,
        };
        self.user_state.select(Some(next));
    }

    pub fn user_up(&mut self) {
        let count = self.user_count();
        if count == 0 {
            return;
        }
        let prev = match self.user_state.selected() {
            Some(0) | None => count - 1,
            Some(i) => i - 1,
        };
        self.user_state.select(Some(prev));
    }

    pub fn user_first(&mut self) {
        if self.user_count() > 0 {
            self.user_state.select(Some(0));
        }
    }

    pub fn user_last(&mut self) {
        let count = self.user_count();
        if count > 0 {
            self.user_state.select(Some(count - 1));
        }
    }

    /// Load the highlighted user's deck
    pub fn select_highlighted(&mut self) {
        if let Some(index) = self.user_state.selected() {
            self.selector.select(index);
        }
    }

    pub fn cancel_loading(&mut self) {
        self.pipeline.cancel();
    }

    /// The most recent deck run, if any
    pub fn current_run(&self) -> Option<RunHandle> {
        self.pipeline.current_run()
    }

    pub fn tick_animation(&mut self) {
        self.animation_frame = (self.animation_frame + 1) % 3;
    }

    pub fn shutdown(&mut self) {
        if let Some(task) = self.startup_task.take() {
            task.abort();
        }
        self.pipeline.cancel();
    }
}
