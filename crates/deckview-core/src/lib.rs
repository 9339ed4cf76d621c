pub mod character;
pub mod config;
pub mod controller;
pub mod error;
pub mod http;
pub mod image;
pub mod model;
pub mod pipeline;
pub mod surface;
pub mod users;

#[cfg(test)]
mod test_support;

// Re-export main types for convenience
pub use character::{CharacterResolver, CharacterSource};
pub use config::Config;
pub use controller::DeckController;
pub use error::FetchError;
pub use http::FetchClient;
pub use image::{ImageFetcher, ImageSource};
pub use model::{Character, ImageBytes, User, SLOT_COUNT};
pub use pipeline::{DeckPipeline, RunHandle, RunState, PACING_DELAY};
pub use surface::{DisplaySurface, SelectHandler, Selector, SelectorList, Slot, SlotBoard, LOADING_PLACEHOLDER};
pub use users::{UserDirectory, UserSource};
