//! Fakes and helpers shared by the unit tests

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpListener;
use tokio::time::Instant;

use crate::character::CharacterSource;
use crate::error::FetchError;
use crate::http::FetchClient;
use crate::image::ImageSource;
use crate::model::{Character, ImageBytes, User};
use crate::surface::{DisplaySurface, SlotBoard, LOADING_PLACEHOLDER};
use crate::users::UserSource;

/// A client with a timeout generous enough for local mock servers
pub fn client() -> FetchClient {
    FetchClient::new(Duration::from_secs(5)).unwrap()
}

pub fn user(id: i64, name: &str, deck: Vec<i64>) -> User {
    User {
        id,
        name: name.to_string(),
        deck,
    }
}

/// The bytes [`FakeImages`] serves for `url`
pub fn image_for(url: &str) -> ImageBytes {
    ImageBytes::new(url.as_bytes().to_vec(), Some("image/jpeg".to_string()))
}

/// Let detached image downloads finish (the clock is paused in these tests)
pub async fn settle() {
    tokio::time::sleep(Duration::from_secs(10)).await;
}

#[derive(Default)]
pub struct FakeCharacters {
    responses: HashMap<i64, Result<Character, FetchError>>,
    delays: HashMap<i64, Duration>,
    calls: Mutex<Vec<(i64, Instant)>>,
}

impl FakeCharacters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_character(mut self, id: i64, name: &str, image: &str) -> Self {
        self.responses.insert(
            id,
            Ok(Character {
                id,
                name: name.to_string(),
                species: "Human".to_string(),
                image: image.to_string(),
            }),
        );
        self
    }

    pub fn failing(mut self, id: i64, err: FetchError) -> Self {
        self.responses.insert(id, Err(err));
        self
    }

    pub fn delayed(mut self, id: i64, delay: Duration) -> Self {
        self.delays.insert(id, delay);
        self
    }

    pub fn calls(&self) -> Vec<i64> {
        self.timed_calls().into_iter().map(|(id, _)| id).collect()
    }

    pub fn timed_calls(&self) -> Vec<(i64, Instant)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CharacterSource for FakeCharacters {
    async fn resolve_character(&self, id: i64) -> Result<Character, FetchError> {
        self.calls.lock().unwrap().push((id, Instant::now()));
        if let Some(delay) = self.delays.get(&id) {
            tokio::time::sleep(*delay).await;
        }
        self.responses.get(&id).cloned().unwrap_or_else(|| {
            Err(FetchError::http_status(
                &format!("https://api.test/character/{}", id),
                404,
                "Not Found",
            ))
        })
    }
}

#[derive(Default)]
pub struct FakeImages {
    failing: HashSet<String>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<String>>,
}

impl FakeImages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    pub fn delayed(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(url.to_string(), delay);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageSource for FakeImages {
    async fn fetch_image(&self, url: &str) -> Result<ImageBytes, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());
        if let Some(delay) = self.delays.get(url) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.contains(url) {
            return Err(FetchError::network(url, "connection reset by peer"));
        }
        Ok(image_for(url))
    }
}

pub struct FakeUsers {
    response: Result<Vec<User>, FetchError>,
    calls: Mutex<usize>,
}

impl FakeUsers {
    pub fn new(response: Result<Vec<User>, FetchError>) -> Self {
        Self {
            response,
            calls: Mutex::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl UserSource for FakeUsers {
    async fn load_users(&self) -> Result<Vec<User>, FetchError> {
        *self.calls.lock().unwrap() += 1;
        self.response.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    Text(usize, String),
    Image(usize, bool),
    Caption(String),
}

/// A [`SlotBoard`] that also keeps a timestamped log of every write
#[derive(Default)]
pub struct RecordingSurface {
    board: SlotBoard,
    events: Mutex<Vec<(SurfaceEvent, Instant)>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn board(&self) -> SlotBoard {
        self.board.clone()
    }

    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.events.lock().unwrap().iter().map(|(e, _)| e.clone()).collect()
    }

    /// When `slot`'s text was last written
    pub fn text_written_at(&self, slot: usize) -> Option<Instant> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(event, _)| matches!(event, SurfaceEvent::Text(s, _) if *s == slot))
            .map(|(_, at)| *at)
    }

    fn record(&self, event: SurfaceEvent) {
        self.events.lock().unwrap().push((event, Instant::now()));
    }
}

impl DisplaySurface for RecordingSurface {
    fn set_slot_text(&self, slot: usize, text: &str) {
        self.record(SurfaceEvent::Text(slot, text.to_string()));
        self.board.set_slot_text(slot, text);
    }

    fn set_slot_image(&self, slot: usize, image: Option<ImageBytes>) {
        self.record(SurfaceEvent::Image(slot, image.is_some()));
        self.board.set_slot_image(slot, image);
    }

    fn reset_slot(&self, slot: usize) {
        self.record(SurfaceEvent::Image(slot, false));
        self.record(SurfaceEvent::Text(slot, LOADING_PLACEHOLDER.to_string()));
        self.board.reset_slot(slot);
    }

    fn set_caption(&self, text: &str) {
        self.record(SurfaceEvent::Caption(text.to_string()));
        self.board.set_caption(text);
    }
}

/// A local URL nothing is listening on
pub async fn unused_local_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/", addr)
}

/// A local URL that accepts connections and never answers. Keep the listener
/// alive for as long as the URL is in use.
pub async fn silent_local_url() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    (listener, format!("http://{}/", addr))
}
