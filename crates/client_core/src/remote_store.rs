use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use shared::{
    domain::{Item, ItemId, Owner, OwnerId},
    protocol::{CompletedPatch, ListQuery, NewItem},
};
use tracing::debug;

use crate::error::RemoteError;

pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";
pub const DEFAULT_ITEMS_PATH: &str = "/todos";
pub const DEFAULT_OWNERS_PATH: &str = "/users";

/// The remote collection of items plus the read-only collection of owners.
///
/// Implementations never touch local state; they only translate a call into a typed outcome.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn list_items(&self, limit: Option<u32>) -> Result<Vec<Item>, RemoteError>;
    async fn list_owners(&self) -> Result<Vec<Owner>, RemoteError>;
    /// Returns the item as stored by the service, including its assigned id.
    async fn create_item(&self, owner_id: OwnerId, title: &str) -> Result<Item, RemoteError>;
    async fn set_completed(&self, item_id: &ItemId, completed: bool) -> Result<(), RemoteError>;
    async fn delete_item(&self, item_id: &ItemId) -> Result<(), RemoteError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEndpoints {
    pub base_url: String,
    pub items_path: String,
    pub owners_path: String,
}

impl Default for RemoteEndpoints {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            items_path: DEFAULT_ITEMS_PATH.into(),
            owners_path: DEFAULT_OWNERS_PATH.into(),
        }
    }
}

impl RemoteEndpoints {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    fn items_url(&self) -> String {
        format!("{}{}", self.base_url, self.items_path)
    }

    fn item_url(&self, item_id: &ItemId) -> String {
        format!("{}{}/{item_id}", self.base_url, self.items_path)
    }

    fn owners_url(&self) -> String {
        format!("{}{}", self.base_url, self.owners_path)
    }
}

pub struct HttpRemoteStore {
    http: Client,
    endpoints: RemoteEndpoints,
}

impl HttpRemoteStore {
    pub fn new(endpoints: RemoteEndpoints) -> Self {
        Self {
            http: Client::new(),
            endpoints,
        }
    }

    /// Builds a store whose requests give up after `timeout`. `None` waits indefinitely.
    pub fn with_timeout(
        endpoints: RemoteEndpoints,
        timeout: Option<Duration>,
    ) -> Result<Self, RemoteError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            endpoints,
        })
    }
}

fn ensure_accepted(operation: &'static str, status: StatusCode) -> Result<(), RemoteError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(RemoteError::ServerRejected {
            operation,
            status: status.as_u16(),
        })
    }
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn list_items(&self, limit: Option<u32>) -> Result<Vec<Item>, RemoteError> {
        let url = self.endpoints.items_url();
        debug!(%url, ?limit, "fetching items");
        let items = self
            .http
            .get(url)
            .query(&ListQuery { limit })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(items)
    }

    async fn list_owners(&self) -> Result<Vec<Owner>, RemoteError> {
        let url = self.endpoints.owners_url();
        debug!(%url, "fetching owners");
        let owners = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(owners)
    }

    async fn create_item(&self, owner_id: OwnerId, title: &str) -> Result<Item, RemoteError> {
        let url = self.endpoints.items_url();
        debug!(%url, %owner_id, "creating item");
        let item = self
            .http
            .post(url)
            .json(&NewItem::new(owner_id, title))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(item)
    }

    async fn set_completed(&self, item_id: &ItemId, completed: bool) -> Result<(), RemoteError> {
        let url = self.endpoints.item_url(item_id);
        debug!(%url, completed, "patching completion");
        let response = self
            .http
            .patch(url)
            .json(&CompletedPatch { completed })
            .send()
            .await?;
        ensure_accepted("set_completed", response.status())
    }

    async fn delete_item(&self, item_id: &ItemId) -> Result<(), RemoteError> {
        let url = self.endpoints.item_url(item_id);
        debug!(%url, "deleting item");
        let response = self.http.delete(url).send().await?;
        ensure_accepted("delete_item", response.status())
    }
}

#[cfg(test)]
#[path = "tests/remote_store_tests.rs"]
mod tests;
