use std::{convert::Infallible, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(OwnerId);

/// Item id as the service assigns it: a JSON integer or a JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemKey {
    Int(i64),
    Str(String),
}

/// Opaque item identifier. A string holding a canonical integer is stored as `Int`, so
/// `"101"` typed at a prompt and `101` from the service name the same item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "ItemKey", into = "ItemKey")]
pub struct ItemId(ItemKey);

impl ItemId {
    pub fn key(&self) -> &ItemKey {
        &self.0
    }
}

impl From<i64> for ItemId {
    fn from(id: i64) -> Self {
        Self(ItemKey::Int(id))
    }
}

impl From<&str> for ItemId {
    fn from(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.parse::<i64>() {
            Ok(id) if id.to_string() == raw => Self(ItemKey::Int(id)),
            _ => Self(ItemKey::Str(raw.to_string())),
        }
    }
}

impl FromStr for ItemId {
    type Err = Infallible;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(raw))
    }
}

impl From<ItemKey> for ItemId {
    fn from(key: ItemKey) -> Self {
        match key {
            ItemKey::Str(raw) => Self::from(raw.as_str()),
            key => Self(key),
        }
    }
}

impl From<ItemId> for ItemKey {
    fn from(id: ItemId) -> Self {
        id.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            ItemKey::Int(id) => write!(f, "{id}"),
            ItemKey::Str(id) => f.write_str(id),
        }
    }
}

/// A single to-do entry as the remote collection reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    #[serde(rename = "userId")]
    pub owner_id: OwnerId,
    pub title: String,
    pub completed: bool,
}

/// Read-only owner record. Extra fields returned by the service are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub id: OwnerId,
    pub name: String,
}
