//! Prize model

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::EntityId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Prize {
    #[schema(value_type = i64)]
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub premiation_date: String,
}

/// Prize fields without an identifier
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewPrize {
    pub name: String,
    #[serde(default)]
    pub premiation_date: String,
}

impl NewPrize {
    pub fn with_id(self, id: EntityId) -> Prize {
        Prize {
            id,
            name: self.name,
            premiation_date: self.premiation_date,
        }
    }
}
