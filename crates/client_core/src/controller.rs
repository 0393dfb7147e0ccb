//! Runs each user intent end to end: remote call first, local state and presentation after.

use shared::{
    domain::{Item, ItemId, OwnerId},
    error::ApiError,
};
use tokio::sync::mpsc::Receiver;
use tracing::{debug, info, warn};

use crate::{
    error::SyncError,
    intent::{Intent, IntentKind},
    list_state::ListState,
    presentation::{Presentation, UNKNOWN_OWNER_PLACEHOLDER},
    remote_store::RemoteStore,
};

pub struct SyncController<R, P> {
    remote: R,
    state: ListState,
    presentation: P,
    page_size: Option<u32>,
}

impl<R: RemoteStore, P: Presentation> SyncController<R, P> {
    pub fn new(remote: R, presentation: P) -> Self {
        Self {
            remote,
            state: ListState::new(),
            presentation,
            page_size: None,
        }
    }

    pub fn with_page_size(mut self, page_size: Option<u32>) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn presentation(&self) -> &P {
        &self.presentation
    }

    /// Fetches items and owners concurrently and initializes the list only if both arrive.
    pub async fn start(&mut self) -> Result<(), SyncError> {
        debug!(page_size = ?self.page_size, "loading items and owners");
        let (items, owners) = tokio::join!(
            self.remote.list_items(self.page_size),
            self.remote.list_owners()
        );
        let (items, owners) = match items.and_then(|items| owners.map(|owners| (items, owners))) {
            Ok(loaded) => loaded,
            Err(err) => return Err(self.report(IntentKind::Load, err.into())),
        };

        self.state.initialize(items, owners);
        for owner in self.state.owners() {
            self.presentation.render_owner_option(owner);
        }
        for item in self.state.items() {
            render_item(&self.state, &mut self.presentation, item);
        }
        info!(
            items = self.state.items().len(),
            owners = self.state.owners().len(),
            "list loaded"
        );
        Ok(())
    }

    /// Failures are already reported through the presentation when these return `Err`.
    pub async fn on_submit_create(
        &mut self,
        owner_id: OwnerId,
        title: &str,
    ) -> Result<ItemId, SyncError> {
        match self.create(owner_id, title).await {
            Ok(item_id) => Ok(item_id),
            Err(err) => Err(self.report(IntentKind::Create, err)),
        }
    }

    pub async fn on_toggle(&mut self, item_id: ItemId, completed: bool) -> Result<(), SyncError> {
        match self.toggle(&item_id, completed).await {
            Ok(()) => Ok(()),
            Err(err) => {
                self.presentation.set_rendered_completed(&item_id, !completed);
                Err(self.report(IntentKind::ToggleComplete, err))
            }
        }
    }

    pub async fn on_close(&mut self, item_id: ItemId) -> Result<(), SyncError> {
        match self.delete(&item_id).await {
            Ok(()) => Ok(()),
            Err(err) => Err(self.report(IntentKind::Delete, err)),
        }
    }

    pub async fn handle(&mut self, intent: Intent) -> Result<(), SyncError> {
        match intent {
            Intent::SubmitCreate { owner_id, title } => {
                self.on_submit_create(owner_id, &title).await.map(|_| ())
            }
            Intent::Toggle { item_id, completed } => self.on_toggle(item_id, completed).await,
            Intent::Close { item_id } => self.on_close(item_id).await,
        }
    }

    /// Processes intents one at a time until every sender is dropped.
    pub async fn run(&mut self, mut intents: Receiver<Intent>) {
        while let Some(intent) = intents.recv().await {
            let kind = intent.kind();
            if let Err(err) = self.handle(intent).await {
                debug!(intent = kind.as_str(), error = %err, "intent ended in reported failure");
            }
        }
        debug!("intent channel closed");
    }

    async fn create(&mut self, owner_id: OwnerId, title: &str) -> Result<ItemId, SyncError> {
        self.ensure_ready()?;
        let title = title.trim();
        if title.is_empty() {
            return Err(SyncError::Validation("title must not be empty".into()));
        }
        if !self.state.has_owner(owner_id) {
            return Err(SyncError::Validation(format!(
                "owner {owner_id} is not one of the loaded owners"
            )));
        }

        debug!(%owner_id, "submitting create");
        let item = self.remote.create_item(owner_id, title).await?;
        let item_id = item.id.clone();
        if let Some(replaced) = self.state.insert(item) {
            warn!(
                %item_id,
                replaced_title = %replaced.title,
                "service reused an id already in the list; keeping the new item"
            );
            self.presentation.remove_rendered(&item_id);
        }
        if let Some(item) = self.state.get(&item_id) {
            render_item(&self.state, &mut self.presentation, item);
        }
        info!(%item_id, %owner_id, "item created");
        Ok(item_id)
    }

    async fn toggle(&mut self, item_id: &ItemId, completed: bool) -> Result<(), SyncError> {
        self.ensure_ready()?;
        debug!(%item_id, completed, "submitting completion change");
        self.remote.set_completed(item_id, completed).await?;
        info!(%item_id, completed, "completion confirmed");
        Ok(())
    }

    async fn delete(&mut self, item_id: &ItemId) -> Result<(), SyncError> {
        self.ensure_ready()?;
        debug!(%item_id, "submitting delete");
        self.remote.delete_item(item_id).await?;
        self.state.remove(item_id);
        self.presentation.remove_rendered(item_id);
        info!(%item_id, "item deleted");
        Ok(())
    }

    fn ensure_ready(&self) -> Result<(), SyncError> {
        if self.state.is_initialized() {
            Ok(())
        } else {
            Err(SyncError::NotReady)
        }
    }

    fn report(&mut self, kind: IntentKind, err: SyncError) -> SyncError {
        warn!(intent = kind.as_str(), error = %err, "intent failed");
        let notice = ApiError::new(err.code(), format!("{}: {err}", kind.failure_message()));
        self.presentation.notify_error(&notice);
        err
    }
}

fn render_item<P: Presentation>(state: &ListState, presentation: &mut P, item: &Item) {
    let owner_name = match state.owner_name(item.owner_id) {
        Ok(name) => name,
        Err(err) => {
            warn!(item_id = %item.id, error = %err, "rendering item with placeholder owner");
            UNKNOWN_OWNER_PLACEHOLDER
        }
    };
    presentation.render_item(item, owner_name);
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
