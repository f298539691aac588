//! The recipe record and its client-supplied draft form.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::id::generate_id;
use crate::time::now_utc;

/// A stored recipe.
///
/// The identifier and publication timestamp are assigned by the server
/// at creation and never mutated afterwards; everything else is
/// client-supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,

    pub name: String,

    pub tags: Vec<String>,

    pub ingredients: Vec<String>,

    pub instructions: Vec<String>,

    #[serde(rename = "publishedAt", with = "time::serde::rfc3339")]
    pub published_at: OffsetDateTime,
}

impl Recipe {
    /// Returns `true` if any of the recipe's tags matches `tag`,
    /// compared case-insensitively.
    pub fn has_tag(&self, tag: &str) -> bool {
        let needle = tag.to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase() == needle)
    }
}

/// The client-supplied portion of a recipe.
///
/// Used as the request body for create and update; the server fills in
/// `id` and `publishedAt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDraft {
    pub name: String,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub ingredients: Vec<String>,

    #[serde(default)]
    pub instructions: Vec<String>,
}

impl RecipeDraft {
    /// Materializes the draft into a stored recipe with a fresh ID and
    /// the current time as the publication timestamp.
    pub fn into_recipe(self) -> Recipe {
        Recipe {
            id: generate_id(),
            name: self.name,
            tags: self.tags,
            ingredients: self.ingredients,
            instructions: self.instructions,
            published_at: now_utc(),
        }
    }

    /// Applies the draft on top of an existing recipe, replacing the
    /// mutable fields wholesale. Identifier and publication timestamp
    /// are carried over untouched.
    pub fn apply_to(self, existing: &Recipe) -> Recipe {
        Recipe {
            id: existing.id.clone(),
            name: self.name,
            tags: self.tags,
            ingredients: self.ingredients,
            instructions: self.instructions,
            published_at: existing.published_at,
        }
    }
}
