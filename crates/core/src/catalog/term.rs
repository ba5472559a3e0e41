//! Categories, materials and sizes.
//!
//! All three share one shape and differ only by [`TaxonomyKind`]. Names are
//! unique per kind, ignoring case.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::CatalogError;
use super::fields::deserialize_flag;
use super::resource::Resource;

/// Which taxonomy a term belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxonomyKind {
    /// Product category.
    Category,
    /// Product material.
    Material,
    /// Product size.
    Size,
}

impl TaxonomyKind {
    /// All kinds.
    pub const ALL: [Self; 3] = [Self::Category, Self::Material, Self::Size];

    /// Label used in messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Category => "Category",
            Self::Material => "Material",
            Self::Size => "Size",
        }
    }
}

impl fmt::Display for TaxonomyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A category, material or size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Term {
    /// Term ID.
    pub id: Uuid,
    /// Which taxonomy this term belongs to.
    #[serde(skip)]
    pub kind: TaxonomyKind,
    /// Display name.
    pub name: String,
    /// Whether the term is offered.
    pub is_active: bool,
    /// When the term was created.
    pub created_at: DateTime<Utc>,
    /// When the term was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A validated new term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermDraft {
    /// Trimmed name.
    pub name: String,
    /// Active flag.
    pub is_active: bool,
}

/// A validated partial update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermChanges {
    /// New trimmed name.
    pub name: Option<String>,
    /// New active flag.
    pub is_active: Option<bool>,
}

/// List filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermFilter {
    /// Case-insensitive substring of the name.
    pub search: Option<String>,
    /// Exact active flag.
    pub is_active: Option<bool>,
}

/// The name a term claims, compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermKey(pub String);

impl fmt::Display for TermKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.0)
    }
}

impl Resource for Term {
    type Draft = TermDraft;
    type Changes = TermChanges;
    type Filter = TermFilter;
    type Key = TermKey;

    fn id(&self) -> Uuid {
        self.id
    }

    fn draft_key(draft: &TermDraft) -> Option<TermKey> {
        Some(TermKey(draft.name.clone()))
    }

    fn changed_key(&self, changes: &TermChanges) -> Option<TermKey> {
        changes.name.clone().map(TermKey)
    }
}

/// Request body for creating or updating a term.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermInput {
    /// Name.
    #[serde(default)]
    pub name: Option<String>,
    /// `true`/`false`, as a boolean or a string.
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub is_active: Option<bool>,
}

impl TermInput {
    /// Validate for create. Active defaults to true.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Invalid` when the name is missing or blank.
    pub fn into_draft(self) -> Result<TermDraft, CatalogError> {
        let name = trimmed(self.name).ok_or_else(|| CatalogError::invalid("Name is required"))?;
        Ok(TermDraft {
            name,
            is_active: self.is_active.unwrap_or(true),
        })
    }

    /// Validate for update. Omitted fields stay unchanged.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Invalid` when a name is sent but blank.
    pub fn into_changes(self) -> Result<TermChanges, CatalogError> {
        let name = match self.name {
            Some(raw) => Some(
                trimmed(Some(raw)).ok_or_else(|| CatalogError::invalid("Name cannot be empty"))?,
            ),
            None => None,
        };
        Ok(TermChanges {
            name,
            is_active: self.is_active,
        })
    }
}

fn trimmed(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}
