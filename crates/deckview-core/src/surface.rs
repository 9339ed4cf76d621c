//! The two collaborators the pipeline talks to: something that shows cards,
//! and something the user picks a name from.
//!
//! Both come as traits plus a shared in-memory implementation. A front end
//! renders from [`SlotBoard::snapshot`] and forwards picks to
//! [`SelectorList::select`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::model::{ImageBytes, SLOT_COUNT};

/// Text every slot shows between a reset and its character arriving
pub const LOADING_PLACEHOLDER: &str = "Loading...";

pub trait DisplaySurface: Send + Sync + 'static {
    fn set_slot_text(&self, slot: usize, text: &str);

    fn set_slot_image(&self, slot: usize, image: Option<ImageBytes>);

    /// Clear the image and show the loading placeholder
    fn reset_slot(&self, slot: usize) {
        self.set_slot_image(slot, None);
        self.set_slot_text(slot, LOADING_PLACEHOLDER);
    }

    /// Header line above the cards (e.g. the selected user's name)
    fn set_caption(&self, _text: &str) {}
}

/// One card on the board
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slot {
    pub text: String,
    pub image: Option<ImageBytes>,
    /// Reset and still waiting for its character
    pub loading: bool,
}

#[derive(Debug, Default)]
struct BoardState {
    caption: String,
    slots: Vec<Slot>,
}

/// Fixed set of [`SLOT_COUNT`] cards behind a shared lock
#[derive(Clone, Debug)]
pub struct SlotBoard {
    state: Arc<Mutex<BoardState>>,
}

impl SlotBoard {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(BoardState {
                caption: String::new(),
                slots: vec![Slot::default(); SLOT_COUNT],
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BoardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> Vec<Slot> {
        self.lock().slots.clone()
    }

    pub fn slot(&self, slot: usize) -> Option<Slot> {
        self.lock().slots.get(slot).cloned()
    }

    pub fn caption(&self) -> String {
        self.lock().caption.clone()
    }
}

impl Default for SlotBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySurface for SlotBoard {
    fn set_slot_text(&self, slot: usize, text: &str) {
        if let Some(s) = self.lock().slots.get_mut(slot) {
            s.text = text.to_string();
            s.loading = false;
        }
    }

    fn reset_slot(&self, slot: usize) {
        if let Some(s) = self.lock().slots.get_mut(slot) {
            s.text = LOADING_PLACEHOLDER.to_string();
            s.image = None;
            s.loading = true;
        }
    }

    fn set_slot_image(&self, slot: usize, image: Option<ImageBytes>) {
        if let Some(s) = self.lock().slots.get_mut(slot) {
            s.image = image;
        }
    }

    fn set_caption(&self, text: &str) {
        self.lock().caption = text.to_string();
    }
}

/// Called with the index of the picked name
pub type SelectHandler = Arc<dyn Fn(usize) + Send + Sync>;

pub trait Selector: Send + Sync {
    /// Replace the options, in display order
    fn populate(&self, names: &[String]);

    fn on_select(&self, handler: SelectHandler);
}

#[derive(Default)]
struct SelectorState {
    names: Vec<String>,
    handler: Option<SelectHandler>,
}

/// In-memory selector: a list of names and at most one selection handler
#[derive(Clone, Default)]
pub struct SelectorList {
    state: Arc<Mutex<SelectorState>>,
}

impl SelectorList {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SelectorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn names(&self) -> Vec<String> {
        self.lock().names.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().names.is_empty()
    }

    /// Fire the selection handler. Returns false when nobody is listening.
    pub fn select(&self, index: usize) -> bool {
        // Clone out so the handler runs without our lock held
        let handler = self.lock().handler.clone();
        match handler {
            Some(handler) => {
                handler(index);
                true
            }
            None => false,
        }
    }
}

impl Selector for SelectorList {
    fn populate(&self, names: &[String]) {
        self.lock().names = names.to_vec();
    }

    fn on_select(&self, handler: SelectHandler) {
        self.lock().handler = Some(handler);
    }
}
