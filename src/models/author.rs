//! Author model and related types

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use super::{
    book::{Book, NewBook},
    id::id_from_value,
    pick_string,
    prize::{NewPrize, Prize},
    EntityId, Identified,
};

/// Author with the books and prizes it owns.
///
/// Local authors created by the catalog-entry fallback embed exactly one
/// book and one prize; remote authors carry whatever the catalog returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    #[schema(value_type = i64)]
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub birth_date: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub books: Vec<Book>,
    #[serde(default)]
    pub prizes: Vec<Prize>,
}

impl Author {
    /// Decode an author from a remote payload, tolerating missing or
    /// mistyped fields the same way [`Book::from_value`] does.
    pub fn from_value(raw: &Value) -> Self {
        let empty = serde_json::Map::new();
        let obj = raw.as_object().unwrap_or(&empty);

        let books = obj
            .get("books")
            .and_then(Value::as_array)
            .map(|books| books.iter().map(Book::from_value).collect())
            .unwrap_or_default();

        let prizes = obj
            .get("prizes")
            .and_then(Value::as_array)
            .map(|prizes| {
                prizes
                    .iter()
                    .filter_map(Value::as_object)
                    .map(|p| Prize {
                        id: id_from_value(p.get("id")),
                        name: pick_string(p, "name"),
                        premiation_date: pick_string(p, "premiationDate"),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            id: id_from_value(obj.get("id")),
            name: pick_string(obj, "name"),
            birth_date: pick_string(obj, "birthDate"),
            image: pick_string(obj, "image"),
            description: pick_string(obj, "description"),
            books,
            prizes,
        }
    }
}

impl Identified for Author {
    fn id(&self) -> EntityId {
        self.id
    }
}

/// Create/update author request, also the remote payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewAuthor {
    #[validate(length(min = 1, message = "Author name is required"))]
    pub name: String,
    #[serde(default)]
    pub birth_date: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
}

impl NewAuthor {
    pub fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            birth_date: self.birth_date.trim().to_string(),
            image: self.image.trim().to_string(),
            description: self.description.trim().to_string(),
        }
    }
}

/// Author not yet stored: the local store assigns every id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthorDraft {
    pub author: NewAuthor,
    pub books: Vec<NewBook>,
    pub prizes: Vec<NewPrize>,
}

impl From<NewAuthor> for AuthorDraft {
    fn from(author: NewAuthor) -> Self {
        Self {
            author,
            books: Vec::new(),
            prizes: Vec::new(),
        }
    }
}
