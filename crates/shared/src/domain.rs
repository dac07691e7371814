use std::fmt;

use serde::{Deserialize, Serialize};

/// Shown in place of an item image that failed to load.
pub const PLACEHOLDER_IMAGE_URL: &str =
    "https://store.cloudflare.steamstatic.com/public/images/v6/app_image_not_available.png";

/// A catalog entry. Identity is its position inside the bucket it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub title: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Opaque action payload handed to the item-open hook.
    #[serde(rename = "game_url", alias = "target_url")]
    pub target_url: String,
}

impl Item {
    pub fn new(
        title: impl Into<String>,
        image: impl Into<String>,
        target_url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            image: image.into(),
            description: None,
            version: None,
            target_url: target_url.into(),
        }
    }

    /// Image to display, given whether the renderer already failed to load it.
    pub fn image_or_placeholder(&self, load_failed: bool) -> &str {
        if load_failed || self.image.trim().is_empty() {
            PLACEHOLDER_IMAGE_URL
        } else {
            &self.image
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketKind {
    Carousel,
    Trending,
    Upcoming,
    Latest,
}

impl BucketKind {
    /// Request order; bucket identity is tied to this, never to arrival order.
    pub const ALL: [BucketKind; 4] = [
        BucketKind::Carousel,
        BucketKind::Trending,
        BucketKind::Upcoming,
        BucketKind::Latest,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BucketKind::Carousel => "carousel",
            BucketKind::Trending => "trending",
            BucketKind::Upcoming => "upcoming",
            BucketKind::Latest => "latest",
        }
    }

    /// Heading used when the bucket is rendered as a section.
    pub fn section_title(self) -> &'static str {
        match self {
            BucketKind::Carousel => "Featured Games",
            BucketKind::Trending => "Trending Games",
            BucketKind::Upcoming => "Upcoming Games",
            BucketKind::Latest => "Latest Games",
        }
    }
}

impl fmt::Display for BucketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabItem {
    pub id: String,
    pub label: String,
}

impl TabItem {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}
