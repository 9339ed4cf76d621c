//! Data shared between the loaders, the pipeline, and whatever draws the cards.

use serde::{Deserialize, Serialize};

/// Number of card slots on the board
pub const SLOT_COUNT: usize = 10;

/// A user from the directory API, owning a deck of character IDs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub deck: Vec<i64>,
}

impl User {
    /// The deck entries that map onto slots; anything past the board is ignored
    pub fn visible_deck(&self) -> &[i64] {
        let len = self.deck.len().min(SLOT_COUNT);
        &self.deck[..len]
    }
}

/// A character from the character API. Only the fields the cards need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub species: String,
    /// Image URL
    pub image: String,
}

/// Raw image payload as served
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBytes {
    pub data: Vec<u8>,
    pub content_type: Option<String>,
}

impl ImageBytes {
    pub fn new(data: Vec<u8>, content_type: Option<String>) -> Self {
        Self { data, content_type }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Short format label, e.g. "jpeg" for `image/jpeg`
    pub fn format(&self) -> &str {
        self.content_type
            .as_deref()
            .and_then(|ct| ct.split(';').next())
            .and_then(|mime| mime.trim().strip_prefix("image/"))
            .unwrap_or("image")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_decodes_from_directory_json() {
        let json = r#"[{"id":1,"name":"Alice","deck":[1,2,3]},{"id":2,"name":"Bob","deck":[]}]"#;
        let users: Vec<User> = serde_json::from_str(json).unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].name, "Alice");
        assert_eq!(users[0].deck, vec![1, 2, 3]);
        assert!(users[1].deck.is_empty());
    }

    #[test]
    fn test_character_ignores_unused_fields() {
        let json = r#"{
            "id": 1,
            "name": "Rick Sanchez",
            "status": "Alive",
            "species": "Human",
            "origin": {"name": "Earth (C-137)", "url": ""},
            "image": "https://rickandmortyapi.com/api/character/avatar/1.jpeg",
            "episode": []
        }"#;
        let character: Character = serde_json::from_str(json).unwrap();
        assert_eq!(character.name, "Rick Sanchez");
        assert_eq!(character.species, "Human");
        assert!(character.image.ends_with("1.jpeg"));
    }

    #[test]
    fn test_visible_deck_caps_at_slot_count() {
        let user = User {
            id: 1,
            name: "Alice".to_string(),
            deck: (1..=15).collect(),
        };
        assert_eq!(user.visible_deck(), &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_image_format_from_content_type() {
        let img = ImageBytes::new(vec![1, 2, 3], Some("image/jpeg; charset=binary".to_string()));
        assert_eq!(img.format(), "jpeg");
        assert_eq!(img.len(), 3);

        let unknown = ImageBytes::new(vec![], None);
        assert_eq!(unknown.format(), "image");
        assert!(unknown.is_empty());
    }
}
