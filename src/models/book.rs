//! Book model and related types

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use super::{id::id_from_value, pick_string, EntityId, Identified};

/// Book as displayed by the UI, either server-issued or embedded in a local author
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    #[schema(value_type = i64)]
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub publishing_date: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editorial_name: Option<String>,
}

impl Book {
    /// Decode a book from a loosely shaped remote payload.
    ///
    /// The remote catalog has shipped several field spellings over time
    /// (`name`/`title`/`Title`, `publishingDate`/`release`/`Release`).
    /// Anything that is not an object decodes as an empty book with id 0.
    pub fn from_value(raw: &Value) -> Self {
        let Some(obj) = raw.as_object() else {
            return Self::empty();
        };

        let first_non_empty = |keys: &[&str]| {
            keys.iter()
                .map(|k| pick_string(obj, k))
                .find(|s| !s.is_empty())
                .unwrap_or_default()
        };

        let isbn = pick_string(obj, "isbn");
        let editorial_name = obj
            .get("editorial")
            .and_then(Value::as_object)
            .and_then(|e| e.get("name"))
            .and_then(Value::as_str)
            .map(str::to_string);

        Self {
            id: id_from_value(obj.get("id")),
            name: first_non_empty(&["name", "title", "Title"]),
            publishing_date: first_non_empty(&["publishingDate", "release", "Release"]),
            image: pick_string(obj, "image"),
            description: pick_string(obj, "description"),
            isbn: (!isbn.is_empty()).then_some(isbn),
            editorial_name,
        }
    }

    fn empty() -> Self {
        Self {
            id: EntityId::default(),
            name: String::new(),
            publishing_date: String::new(),
            image: String::new(),
            description: String::new(),
            isbn: None,
            editorial_name: None,
        }
    }
}

impl Identified for Book {
    fn id(&self) -> EntityId {
        self.id
    }
}

/// Book fields without an identifier: remote create/update payload and
/// the shape embedded into a local author draft
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
    #[validate(length(min = 1, message = "Book name is required"))]
    pub name: String,
    #[serde(default)]
    pub publishing_date: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
}

impl NewBook {
    pub fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            publishing_date: self.publishing_date.trim().to_string(),
            image: self.image.trim().to_string(),
            description: self.description.trim().to_string(),
        }
    }

    pub fn with_id(self, id: EntityId) -> Book {
        Book {
            id,
            name: self.name,
            publishing_date: self.publishing_date,
            image: self.image,
            description: self.description,
            isbn: None,
            editorial_name: None,
        }
    }
}
