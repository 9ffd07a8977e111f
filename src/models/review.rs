//! Review model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use super::{id::id_from_value, pick_string, EntityId, Identified};

/// Reviewer name used when the form leaves it blank
pub const ANONYMOUS_REVIEWER: &str = "Anon";

/// Review attached to a book through the book id (never embedded server-side)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[schema(value_type = i64)]
    pub id: EntityId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// True when the review only exists in local storage
    #[serde(rename = "_local", default)]
    pub local: bool,
}

impl Review {
    /// Decode a review from a remote payload
    pub fn from_value(raw: &Value) -> Self {
        let Some(obj) = raw.as_object() else {
            return Self {
                id: EntityId::default(),
                name: String::new(),
                source: None,
                description: String::new(),
                created_at: None,
                local: false,
            };
        };

        let source = pick_string(obj, "source");
        Self {
            id: id_from_value(obj.get("id")),
            name: pick_string(obj, "name"),
            source: (!source.is_empty()).then_some(source),
            description: pick_string(obj, "description"),
            created_at: None,
            local: false,
        }
    }
}

impl Identified for Review {
    fn id(&self) -> EntityId {
        self.id
    }
}

/// Review form as submitted by the UI
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateReview {
    /// Reviewer name or alias (optional)
    #[serde(default)]
    pub name: String,
    /// Where the review was published: blog, podcast, magazine... (optional)
    #[serde(default)]
    pub source: Option<String>,
    /// Review content (required)
    #[serde(default)]
    pub description: String,
}

impl CreateReview {
    /// Trim every field, default a blank name and drop a blank source
    pub fn normalize(self) -> NewReview {
        let name = self.name.trim();
        NewReview {
            name: if name.is_empty() { ANONYMOUS_REVIEWER.to_string() } else { name.to_string() },
            source: self
                .source
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            description: self.description.trim().to_string(),
        }
    }
}

/// Normalized review, the remote payload and the local store input
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct NewReview {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
}
