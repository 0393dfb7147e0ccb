//! User intents queued from the presentation layer to the sync controller.

use shared::domain::{ItemId, OwnerId};
use thiserror::Error;
use tokio::sync::mpsc::{error::TrySendError, Sender};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    SubmitCreate { owner_id: OwnerId, title: String },
    Toggle { item_id: ItemId, completed: bool },
    Close { item_id: ItemId },
}

impl Intent {
    pub fn kind(&self) -> IntentKind {
        match self {
            Self::SubmitCreate { .. } => IntentKind::Create,
            Self::Toggle { .. } => IntentKind::ToggleComplete,
            Self::Close { .. } => IntentKind::Delete,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentKind {
    Load,
    Create,
    ToggleComplete,
    Delete,
}

impl IntentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Create => "create",
            Self::ToggleComplete => "toggle_complete",
            Self::Delete => "delete",
        }
    }

    pub(crate) fn failure_message(self) -> &'static str {
        match self {
            Self::Load => "could not load the to-do list",
            Self::Create => "could not create the item",
            Self::ToggleComplete => "could not update the item",
            Self::Delete => "could not delete the item",
        }
    }
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("intent queue is full; please retry")]
    QueueFull(Intent),
    #[error("sync controller has stopped")]
    Disconnected(Intent),
}

pub fn dispatch_intent(tx: &Sender<Intent>, intent: Intent) -> Result<(), DispatchError> {
    let kind = intent.kind();
    match tx.try_send(intent) {
        Ok(()) => {
            tracing::debug!(intent = kind.as_str(), "queued intent");
            Ok(())
        }
        Err(TrySendError::Full(intent)) => Err(DispatchError::QueueFull(intent)),
        Err(TrySendError::Closed(intent)) => Err(DispatchError::Disconnected(intent)),
    }
}
