use serde::{Deserialize, Serialize};

use crate::domain::OwnerId;

/// Body of `POST {items_path}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    #[serde(rename = "userId")]
    pub owner_id: OwnerId,
    pub title: String,
    pub completed: bool,
}

impl NewItem {
    pub fn new(owner_id: OwnerId, title: impl Into<String>) -> Self {
        Self {
            owner_id,
            title: title.into(),
            completed: false,
        }
    }
}

/// Body of `PATCH {items_path}/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedPatch {
    pub completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ListQuery {
    #[serde(rename = "_limit", skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}
