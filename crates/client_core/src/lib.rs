//! Client-side state and remote synchronization for a to-do list backed by a REST collection.

pub mod controller;
pub mod error;
pub mod intent;
pub mod list_state;
pub mod presentation;
pub mod remote_store;

pub use controller::SyncController;
pub use error::{RemoteError, StateError, SyncError};
pub use intent::{dispatch_intent, DispatchError, Intent, IntentKind};
pub use list_state::ListState;
pub use presentation::{Presentation, UNKNOWN_OWNER_PLACEHOLDER};
pub use remote_store::{HttpRemoteStore, RemoteEndpoints, RemoteStore};
