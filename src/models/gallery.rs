use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub enum MediaType {
    Image,
    Video,
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaType::Image => write!(f, "image"),
            MediaType::Video => write!(f, "video"),
        }
    }
}

/// A gallery entry. The public list is served read-only by the gallery
/// collaborator API; admin additions and removals are local.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct GalleryItem {
    #[serde(default)]
    pub id: i64,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub url: String,
    pub title: String,
    pub category: String,
    pub date: DateTime<Utc>,
}

/// Input for adding a gallery entry locally.
#[derive(Debug, Clone)]
pub struct NewGalleryItem {
    pub media_type: MediaType,
    pub url: String,
    pub title: String,
    pub category: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gallery_item_wire_format() {
        let json = r#"{
            "id": 7,
            "type": "video",
            "url": "https://media.example.com/feast-2025.mp4",
            "title": "Feast procession",
            "category": "Feast",
            "date": "2025-09-08T18:30:00Z"
        }"#;
        let parsed: GalleryItem = serde_json::from_str(json).expect("gallery item should parse");
        assert_eq!(parsed.media_type, MediaType::Video);
        assert_eq!(parsed.category, "Feast");
    }
}
