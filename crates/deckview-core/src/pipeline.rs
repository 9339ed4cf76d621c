//! Deck loading pipeline
//!
//! Each user selection becomes one *run*: reset every slot, then walk the
//! user's deck one entry at a time, resolving the character (slot text) and
//! kicking off a detached image download (slot image), pausing
//! [`PACING_DELAY`] between entries so the character API only ever sees one
//! request from us at a time.
//!
//! # Cancellation
//!
//! Starting a run retires the previous one. Every run writes to the surface
//! through a `RunGuard`, which compares the run's id against the pipeline's
//! current id *under the same lock* as the write. Resets for the new run take
//! that lock too, so once [`DeckPipeline::start_run`] returns, nothing the old
//! run (or any image download it spawned) does can reach the surface.
//!
//! ```text
//! Idle -> Resetting -> FetchingSlot(0) -> Pacing -> FetchingSlot(1) -> ... -> Done
//!            \______________\_________________\______________________________-> Cancelled
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::character::CharacterSource;
use crate::image::ImageSource;
use crate::model::{User, SLOT_COUNT};
use crate::surface::DisplaySurface;

/// Pause between two deck entries
pub const PACING_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Resetting,
    FetchingSlot(usize),
    Pacing,
    Done,
    Cancelled,
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Done | RunState::Cancelled)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Move a run forward unless it already finished
fn advance(state: &watch::Sender<RunState>, next: RunState) {
    state.send_if_modified(|current| {
        if current.is_terminal() {
            false
        } else {
            *current = next;
            true
        }
    });
}

/// A run's write access to the surface
struct RunGuard<S> {
    run_id: u64,
    current: Arc<Mutex<u64>>,
    surface: Arc<S>,
}

impl<S> Clone for RunGuard<S> {
    fn clone(&self) -> Self {
        Self {
            run_id: self.run_id,
            current: self.current.clone(),
            surface: self.surface.clone(),
        }
    }
}

impl<S: DisplaySurface> RunGuard<S> {
    fn is_cancelled(&self) -> bool {
        *lock(&self.current) != self.run_id
    }

    /// Apply `write` only if this run is still the active one
    fn apply(&self, write: impl FnOnce(&S)) -> bool {
        let current = lock(&self.current);
        if *current != self.run_id {
            return false;
        }
        write(&self.surface);
        true
    }
}

/// Observer for a single run
#[derive(Clone)]
pub struct RunHandle {
    id: u64,
    cards: usize,
    state: watch::Receiver<RunState>,
}

impl RunHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// How many cards this run will fill (the deck, capped at [`SLOT_COUNT`])
    pub fn cards(&self) -> usize {
        self.cards
    }

    pub fn state(&self) -> RunState {
        *self.state.borrow()
    }

    /// Resolve once the run is `Done` or `Cancelled`
    pub async fn wait(mut self) -> RunState {
        loop {
            let state = *self.state.borrow_and_update();
            if state.is_terminal() {
                return state;
            }
            if self.state.changed().await.is_err() {
                return *self.state.borrow();
            }
        }
    }
}

struct ActiveRun {
    id: u64,
    cards: usize,
    state: Arc<watch::Sender<RunState>>,
    task: JoinHandle<()>,
}

pub struct DeckPipeline<S: DisplaySurface> {
    characters: Arc<dyn CharacterSource>,
    images: Arc<dyn ImageSource>,
    surface: Arc<S>,
    /// Id of the only run allowed to write to the surface
    current: Arc<Mutex<u64>>,
    active: Mutex<Option<ActiveRun>>,
}

impl<S: DisplaySurface> DeckPipeline<S> {
    pub fn new(
        characters: Arc<dyn CharacterSource>,
        images: Arc<dyn ImageSource>,
        surface: Arc<S>,
    ) -> Self {
        Self {
            characters,
            images,
            surface,
            current: Arc::new(Mutex::new(0)),
            active: Mutex::new(None),
        }
    }

    pub fn surface(&self) -> &Arc<S> {
        &self.surface
    }

    /// Cancel whatever is loading and start loading `user`'s deck.
    ///
    /// All slots are reset before this returns. Must be called from within a
    /// tokio runtime.
    pub fn start_run(&self, user: User) -> RunHandle {
        let mut active = lock(&self.active);

        let (state_tx, state_rx) = watch::channel(RunState::Idle);
        let state_tx = Arc::new(state_tx);

        // Claiming the next id and resetting happen under one lock, so the
        // previous run can't slip a write in between.
        let run_id = {
            let mut current = lock(&self.current);
            *current += 1;
            advance(&state_tx, RunState::Resetting);
            self.surface.set_caption(&format!("User: {}", user.name));
            for slot in 0..SLOT_COUNT {
                self.surface.reset_slot(slot);
            }
            *current
        };

        if let Some(previous) = active.take() {
            retire(previous);
        }

        let cards = user.visible_deck().len();
        info!(run = run_id, user = %user.name, deck_len = user.deck.len(), "Starting deck run");

        let guard = RunGuard {
            run_id,
            current: self.current.clone(),
            surface: self.surface.clone(),
        };
        let task = tokio::spawn(walk_deck(
            guard,
            user,
            self.characters.clone(),
            self.images.clone(),
            state_tx.clone(),
        ));

        *active = Some(ActiveRun {
            id: run_id,
            cards,
            state: state_tx,
            task,
        });

        RunHandle {
            id: run_id,
            cards,
            state: state_rx,
        }
    }

    /// Stop the active run without starting another. Slots keep whatever
    /// the run had written so far.
    pub fn cancel(&self) {
        let mut active = lock(&self.active);
        *lock(&self.current) += 1;
        if let Some(previous) = active.take() {
            retire(previous);
        }
    }

    /// Handle to the most recently started run
    pub fn current_run(&self) -> Option<RunHandle> {
        lock(&self.active).as_ref().map(|run| RunHandle {
            id: run.id,
            cards: run.cards,
            state: run.state.subscribe(),
        })
    }
}

impl<S: DisplaySurface> Drop for DeckPipeline<S> {
    fn drop(&mut self) {
        if let Some(run) = lock(&self.active).take() {
            retire(run);
        }
    }
}

fn retire(run: ActiveRun) {
    if !run.state.borrow().is_terminal() {
        debug!(run = run.id, "Cancelling deck run");
    }
    advance(&run.state, RunState::Cancelled);
    run.task.abort();
}

async fn walk_deck<S: DisplaySurface>(
    guard: RunGuard<S>,
    user: User,
    characters: Arc<dyn CharacterSource>,
    images: Arc<dyn ImageSource>,
    state: Arc<watch::Sender<RunState>>,
) {
    let run_id = guard.run_id;
    let deck = user.visible_deck();
    if user.deck.len() > deck.len() {
        debug!(run = run_id, ignored = user.deck.len() - deck.len(), "Deck longer than the board");
    }

    for (slot, &character_id) in deck.iter().enumerate() {
        advance(&state, RunState::FetchingSlot(slot));

        match characters.resolve_character(character_id).await {
            Ok(character) => {
                info!(
                    run = run_id,
                    slot,
                    name = %character.name,
                    species = %character.species,
                    "Card resolved"
                );
                if guard.apply(|surface| surface.set_slot_text(slot, &character.name)) {
                    spawn_image_fetch(guard.clone(), images.clone(), slot, character.image);
                }
            }
            Err(err) => {
                error!(
                    run = run_id,
                    slot,
                    character_id,
                    status = ?err.status(),
                    url = %err.url(),
                    "Failed to fetch character: {}",
                    err
                );
                guard.apply(|surface| surface.set_slot_text(slot, &err.slot_text()));
            }
        }

        if guard.is_cancelled() {
            debug!(run = run_id, slot, "Run superseded, stopping");
            advance(&state, RunState::Cancelled);
            return;
        }

        if slot + 1 < deck.len() {
            advance(&state, RunState::Pacing);
            tokio::time::sleep(PACING_DELAY).await;
        }
    }

    debug!(run = run_id, cards = deck.len(), "Deck run finished");
    advance(&state, RunState::Done);
}

/// Download a card's artwork without holding up the walk
fn spawn_image_fetch<S: DisplaySurface>(
    guard: RunGuard<S>,
    images: Arc<dyn ImageSource>,
    slot: usize,
    url: String,
) {
    tokio::spawn(async move {
        if guard.is_cancelled() {
            return;
        }
        match images.fetch_image(&url).await {
            Ok(image) => {
                if !guard.apply(|surface| surface.set_slot_image(slot, Some(image))) {
                    debug!(run = guard.run_id, slot, "Dropping image from a superseded run");
                }
            }
            Err(err) => {
                warn!(run = guard.run_id, slot, %url, "Failed to download image: {}", err);
            }
        }
    });
}
