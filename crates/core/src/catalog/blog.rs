//! Blog posts and their content blocks.

use std::convert::Infallible;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::error::CatalogError;
use super::fields::FormFields;
use super::resource::Resource;

/// One section of a blog post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    /// Section heading.
    pub title: String,
    /// Section body.
    pub description: String,
    /// Icon URL, empty when the block has none.
    pub icon: String,
}

/// A blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    /// Blog ID.
    pub id: Uuid,
    /// Headline.
    pub title: String,
    /// Summary shown in listings.
    pub description: String,
    /// Header image URLs.
    pub images: Vec<String>,
    /// Ordered content blocks.
    pub content: Vec<ContentBlock>,
    /// Whether the post is published.
    pub is_active: bool,
    /// When the post was created.
    pub created_at: DateTime<Utc>,
    /// When the post was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A validated new blog post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogDraft {
    pub title: String,
    pub description: String,
    pub images: Vec<String>,
    pub content: Vec<ContentBlock>,
    pub is_active: bool,
}

/// A validated partial update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlogChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Replaces every block when set.
    pub content: Option<Vec<ContentBlock>>,
    pub is_active: Option<bool>,
    /// Full image list after the update.
    pub images: Option<Vec<String>>,
}

/// List filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlogFilter {
    pub is_active: Option<bool>,
    /// Case-insensitive substring of the title.
    pub search: Option<String>,
}

impl Resource for Blog {
    type Draft = BlogDraft;
    type Changes = BlogChanges;
    type Filter = BlogFilter;
    type Key = Infallible;

    fn id(&self) -> Uuid {
        self.id
    }

    fn draft_key(_: &BlogDraft) -> Option<Infallible> {
        None
    }

    fn changed_key(&self, _: &BlogChanges) -> Option<Infallible> {
        None
    }
}

/// Blog fields as sent by the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlogForm {
    pub title: Option<String>,
    pub description: Option<String>,
    /// `None` when `content` was not sent.
    pub content: Option<Vec<ContentBlock>>,
    pub is_active: Option<bool>,
}

impl BlogForm {
    /// Coerce raw fields.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Invalid` when `content` is not JSON or
    /// `isActive` is not a boolean.
    pub fn parse(fields: &FormFields) -> Result<Self, CatalogError> {
        let content = if fields.contains("content") {
            Some(parse_content(fields.text("content").unwrap_or_default())?)
        } else {
            None
        };

        Ok(Self {
            title: fields.non_blank("title").map(String::from),
            description: fields.non_blank("description").map(String::from),
            content,
            is_active: fields.flag("isActive")?,
        })
    }

    /// Number of content blocks that can receive an uploaded icon.
    #[must_use]
    pub fn icon_slots(&self) -> usize {
        self.content.as_ref().map_or(0, Vec::len)
    }

    /// Check required fields for create.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Invalid` when title or description is missing.
    pub fn into_draft(self) -> Result<BlogDraft, CatalogError> {
        let (Some(title), Some(description)) = (self.title, self.description) else {
            return Err(CatalogError::invalid("Title & description are required"));
        };

        Ok(BlogDraft {
            title,
            description,
            images: Vec::new(),
            content: self.content.unwrap_or_default(),
            is_active: self.is_active.unwrap_or(true),
        })
    }

    /// Partial update; images are settled after upload.
    #[must_use]
    pub fn into_changes(self) -> BlogChanges {
        BlogChanges {
            title: self.title,
            description: self.description,
            content: self.content,
            is_active: self.is_active,
            images: None,
        }
    }
}

/// Parses the `content` field into normalized blocks.
///
/// Blank input and any JSON value other than an array give no blocks.
/// Non-string block fields become empty strings.
///
/// # Errors
///
/// Returns `CatalogError::Invalid` when the text is not JSON.
pub fn parse_content(raw: &str) -> Result<Vec<ContentBlock>, CatalogError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    let value: Value = serde_json::from_str(raw)
        .map_err(|_| CatalogError::invalid("Invalid content format. Must be JSON."))?;

    let Value::Array(blocks) = value else {
        return Ok(Vec::new());
    };

    Ok(blocks
        .iter()
        .map(|block| ContentBlock {
            title: string_field(block, "title"),
            description: string_field(block, "description"),
            icon: string_field(block, "icon"),
        })
        .collect())
}

/// Points content blocks at their uploaded icons. Out-of-range indices are
/// ignored.
pub fn apply_icons(content: &mut [ContentBlock], icons: Vec<(usize, String)>) {
    for (index, url) in icons {
        if let Some(block) = content.get_mut(index) {
            block.icon = url;
        }
    }
}

/// Icon URLs of a post's content, in block order.
#[must_use]
pub fn content_icons(content: &[ContentBlock]) -> Vec<String> {
    content.iter().map(|block| block.icon.clone()).collect()
}

fn string_field(block: &Value, name: &str) -> String {
    block
        .get(name)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
