//! Wire types for the blog API
//!
//! Field names follow the API's camelCase JSON; `_id` is the MongoDB-style
//! document id and doubles as the tab id in the UI.

use serde::{Deserialize, Serialize};

/// An image reference as served by the API
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    pub url: String,
    #[serde(default)]
    pub file_name: String,
}

/// One post as returned by `GET /api/blogs/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub author_name: String,
    #[serde(default)]
    pub author_role: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub small_description: String,
    #[serde(default)]
    pub image: ImageRef,
}

impl BlogPost {
    /// Tab label: the author's first name
    pub fn tab_label(&self) -> &str {
        self.author_name
            .split_whitespace()
            .next()
            .unwrap_or(self.author_name.as_str())
    }

    /// Single-letter avatar badge
    pub fn author_initial(&self) -> Option<char> {
        self.author_name.chars().next()
    }
}

/// A titled section of the long-form article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailInfo {
    pub title: String,
    pub paragraph: String,
}

/// Full post as returned by `GET /api/blogs/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogDetail {
    #[serde(flatten)]
    pub post: BlogPost,
    #[serde(default)]
    pub large_image: Option<ImageRef>,
    #[serde(default)]
    pub detail_info: Vec<DetailInfo>,
}

impl BlogDetail {
    /// Banner image: the large image when present, else the card thumbnail
    pub fn banner_url(&self) -> &str {
        match &self.large_image {
            Some(image) if !image.url.is_empty() => &image.url,
            _ => &self.post.image.url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_list_entry() {
        let post: BlogPost = serde_json::from_value(json!({
            "_id": "65a1",
            "title": "Attention Is Still All You Need",
            "authorName": "Ada Lovelace",
            "authorRole": "Research Lead",
            "slug": "attention",
            "smallDescription": "A short tour.",
            "image": { "url": "https://cdn.example/a.png", "fileName": "a.png" }
        }))
        .unwrap();

        assert_eq!(post.id, "65a1");
        assert_eq!(post.tab_label(), "Ada");
        assert_eq!(post.author_initial(), Some('A'));
        assert_eq!(post.image.file_name, "a.png");
    }

    #[test]
    fn detail_banner_falls_back_to_thumbnail() {
        let detail: BlogDetail = serde_json::from_value(json!({
            "_id": "65a1",
            "title": "T",
            "authorName": "Grace",
            "image": { "url": "small.png", "fileName": "small.png" },
            "detailInfo": [{ "title": "Intro", "paragraph": "Hello" }]
        }))
        .unwrap();

        assert_eq!(detail.banner_url(), "small.png");
        assert_eq!(detail.detail_info.len(), 1);
        assert_eq!(detail.post.tab_label(), "Grace");
    }

    #[test]
    fn detail_prefers_large_image() {
        let detail: BlogDetail = serde_json::from_value(json!({
            "_id": "1",
            "title": "T",
            "authorName": "Grace Hopper",
            "image": { "url": "small.png" },
            "largeImage": { "url": "large.png", "fileName": "large.png" }
        }))
        .unwrap();

        assert_eq!(detail.banner_url(), "large.png");
        assert!(detail.detail_info.is_empty());
    }
}
