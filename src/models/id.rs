//! Entity identifiers tagged by origin

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of an author, book, prize or review.
///
/// On the wire and in storage this is a plain integer; negative values are
/// records fabricated locally, non-negative values were issued by the remote
/// catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum EntityId {
    Local(i64),
    Remote(i64),
}

impl EntityId {
    /// Raw integer value, as exchanged with the remote API and the UI
    pub fn raw(self) -> i64 {
        match self {
            EntityId::Local(id) | EntityId::Remote(id) => id,
        }
    }

    pub fn is_local(self) -> bool {
        matches!(self, EntityId::Local(_))
    }
}

impl From<i64> for EntityId {
    fn from(raw: i64) -> Self {
        if raw < 0 {
            EntityId::Local(raw)
        } else {
            EntityId::Remote(raw)
        }
    }
}

impl From<EntityId> for i64 {
    fn from(id: EntityId) -> Self {
        id.raw()
    }
}

impl Default for EntityId {
    fn default() -> Self {
        EntityId::Remote(0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw())
    }
}

/// Lenient decoding of an id that may arrive as a number or a numeric string.
pub(crate) fn id_from_value(value: Option<&serde_json::Value>) -> EntityId {
    let raw = match value {
        Some(serde_json::Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Some(serde_json::Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    };
    EntityId::from(raw)
}

/// Collections keyed by entity id (authors, reviews...)
pub trait Identified {
    fn id(&self) -> EntityId;
}
