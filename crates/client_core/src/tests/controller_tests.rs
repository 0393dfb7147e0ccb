use super::*;
use std::sync::Arc;

use async_trait::async_trait;
use shared::{domain::Owner, error::ErrorCode};
use tokio::sync::{mpsc, Mutex};

use crate::error::RemoteError;

struct FakeRemote {
    items: Vec<Item>,
    owners: Vec<Owner>,
    fail_items: Option<String>,
    fail_owners: Option<String>,
    fail_create: Option<String>,
    rejected_status: Option<u16>,
    next_created_ids: Arc<Mutex<Vec<i64>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeRemote {
    fn with(items: Vec<Item>, owners: Vec<Owner>) -> Self {
        Self {
            items,
            owners,
            fail_items: None,
            fail_owners: None,
            fail_create: None,
            rejected_status: None,
            next_created_ids: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn creating(self, ids: Vec<i64>) -> Self {
        Self {
            next_created_ids: Arc::new(Mutex::new(ids)),
            ..self
        }
    }

    fn rejecting_mutations(self, status: u16) -> Self {
        Self {
            rejected_status: Some(status),
            ..self
        }
    }

    fn mutation_outcome(&self, operation: &'static str) -> Result<(), RemoteError> {
        match self.rejected_status {
            Some(status) => Err(RemoteError::ServerRejected { operation, status }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RemoteStore for FakeRemote {
    async fn list_items(&self, limit: Option<u32>) -> Result<Vec<Item>, RemoteError> {
        self.calls.lock().await.push(format!("list_items {limit:?}"));
        if let Some(err) = &self.fail_items {
            return Err(RemoteError::NetworkFailure(err.clone()));
        }
        Ok(self.items.clone())
    }

    async fn list_owners(&self) -> Result<Vec<Owner>, RemoteError> {
        self.calls.lock().await.push("list_owners".into());
        if let Some(err) = &self.fail_owners {
            return Err(RemoteError::NetworkFailure(err.clone()));
        }
        Ok(self.owners.clone())
    }

    async fn create_item(&self, owner_id: OwnerId, title: &str) -> Result<Item, RemoteError> {
        self.calls
            .lock()
            .await
            .push(format!("create_item {owner_id} {title}"));
        if let Some(err) = &self.fail_create {
            return Err(RemoteError::NetworkFailure(err.clone()));
        }
        let mut ids = self.next_created_ids.lock().await;
        let id = if ids.is_empty() { 201 } else { ids.remove(0) };
        Ok(Item {
            id: ItemId::from(id),
            owner_id,
            title: title.to_string(),
            completed: false,
        })
    }

    async fn set_completed(&self, item_id: &ItemId, completed: bool) -> Result<(), RemoteError> {
        self.calls
            .lock()
            .await
            .push(format!("set_completed {item_id} {completed}"));
        self.mutation_outcome("set_completed")
    }

    async fn delete_item(&self, item_id: &ItemId) -> Result<(), RemoteError> {
        self.calls
            .lock()
            .await
            .push(format!("delete_item {item_id}"));
        self.mutation_outcome("delete_item")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Rendered {
    Item {
        id: ItemId,
        owner_name: String,
        completed: bool,
    },
    OwnerOption(OwnerId),
    Removed(ItemId),
    Checkbox(ItemId, bool),
    Error(ErrorCode),
}

#[derive(Debug, Default)]
struct RecordingPresentation {
    events: Vec<Rendered>,
    notices: Vec<ApiError>,
}

impl Presentation for RecordingPresentation {
    fn render_item(&mut self, item: &Item, owner_name: &str) {
        self.events.push(Rendered::Item {
            id: item.id.clone(),
            owner_name: owner_name.to_string(),
            completed: item.completed,
        });
    }

    fn render_owner_option(&mut self, owner: &Owner) {
        self.events.push(Rendered::OwnerOption(owner.id));
    }

    fn remove_rendered(&mut self, item_id: &ItemId) {
        self.events.push(Rendered::Removed(item_id.clone()));
    }

    fn set_rendered_completed(&mut self, item_id: &ItemId, completed: bool) {
        self.events.push(Rendered::Checkbox(item_id.clone(), completed));
    }

    fn notify_error(&mut self, error: &ApiError) {
        self.events.push(Rendered::Error(error.code));
        self.notices.push(error.clone());
    }
}

fn item(id: i64, owner_id: i64, title: &str) -> Item {
    Item {
        id: ItemId::from(id),
        owner_id: OwnerId(owner_id),
        title: title.to_string(),
        completed: false,
    }
}

fn alice() -> Owner {
    Owner {
        id: OwnerId(1),
        name: "Alice".into(),
    }
}

async fn started(
    remote: FakeRemote,
) -> SyncController<FakeRemote, RecordingPresentation> {
    let mut controller = SyncController::new(remote, RecordingPresentation::default());
    controller.start().await.expect("start");
    controller
}

#[tokio::test]
async fn start_renders_owner_options_then_items() {
    let remote = FakeRemote::with(vec![item(1, 1, "a"), item(2, 1, "b")], vec![alice()]);
    let calls = Arc::clone(&remote.calls);
    let mut controller =
        SyncController::new(remote, RecordingPresentation::default()).with_page_size(Some(20));

    controller.start().await.expect("start");

    assert!(controller.state().is_initialized());
    assert_eq!(controller.state().items().len(), 2);
    assert_eq!(
        controller.presentation().events,
        vec![
            Rendered::OwnerOption(OwnerId(1)),
            Rendered::Item {
                id: ItemId::from(1),
                owner_name: "Alice".into(),
                completed: false
            },
            Rendered::Item {
                id: ItemId::from(2),
                owner_name: "Alice".into(),
                completed: false
            },
        ]
    );
    let calls = calls.lock().await;
    assert!(calls.contains(&"list_items Some(20)".to_string()));
    assert!(calls.contains(&"list_owners".to_string()));
}

#[tokio::test]
async fn start_fails_as_a_whole_when_owners_fail() {
    let mut remote = FakeRemote::with(vec![item(1, 1, "a")], vec![alice()]);
    remote.fail_owners = Some("connection refused".into());
    let mut controller = SyncController::new(remote, RecordingPresentation::default());

    let err = controller.start().await.unwrap_err();

    assert!(matches!(err, SyncError::Remote(RemoteError::NetworkFailure(_))));
    assert!(!controller.state().is_initialized());
    assert!(controller.state().items().is_empty());
    assert_eq!(
        controller.presentation().events,
        vec![Rendered::Error(ErrorCode::NetworkFailure)]
    );
    assert!(controller.presentation().notices[0]
        .message
        .starts_with("could not load the to-do list"));
}

#[tokio::test]
async fn start_fails_when_items_fail() {
    let mut remote = FakeRemote::with(Vec::new(), vec![alice()]);
    remote.fail_items = Some("malformed body".into());
    let mut controller = SyncController::new(remote, RecordingPresentation::default());

    assert!(controller.start().await.is_err());
    assert!(controller.state().owners().is_empty());
    assert_eq!(controller.presentation().events.len(), 1);
}

#[tokio::test]
async fn create_appends_confirmed_item_once() {
    let mut controller = started(FakeRemote::with(Vec::new(), vec![alice()]).creating(vec![101])).await;

    let item_id = controller
        .on_submit_create(OwnerId(1), "Buy milk")
        .await
        .expect("create");

    assert_eq!(item_id, ItemId::from(101));
    assert_eq!(controller.state().items(), &[item(101, 1, "Buy milk")]);
    assert_eq!(controller.state().owner_name(OwnerId(1)), Ok("Alice"));
    assert_eq!(
        controller.presentation().events.last(),
        Some(&Rendered::Item {
            id: ItemId::from(101),
            owner_name: "Alice".into(),
            completed: false
        })
    );
}

#[tokio::test]
async fn repeated_create_with_reused_id_keeps_latest_item() {
    let mut controller =
        started(FakeRemote::with(Vec::new(), vec![alice()]).creating(vec![201, 201])).await;
    let rendered_before = controller.presentation().events.len();

    let first = controller
        .on_submit_create(OwnerId(1), "Buy milk")
        .await
        .expect("first create");
    let second = controller
        .on_submit_create(OwnerId(1), "Walk dog")
        .await
        .expect("second create");

    assert_eq!(first, ItemId::from(201));
    assert_eq!(second, ItemId::from(201));
    assert_eq!(controller.state().items(), &[item(201, 1, "Walk dog")]);
    let rendered_item = Rendered::Item {
        id: ItemId::from(201),
        owner_name: "Alice".into(),
        completed: false,
    };
    assert_eq!(
        &controller.presentation().events[rendered_before..],
        &[
            rendered_item.clone(),
            Rendered::Removed(ItemId::from(201)),
            rendered_item
        ]
    );
    assert!(controller.presentation().notices.is_empty());
}

#[tokio::test]
async fn create_validates_before_calling_remote() {
    let remote = FakeRemote::with(Vec::new(), vec![alice()]);
    let calls = Arc::clone(&remote.calls);
    let mut controller = started(remote).await;

    let blank = controller.on_submit_create(OwnerId(1), "   ").await;
    let stranger = controller.on_submit_create(OwnerId(42), "Buy milk").await;

    assert!(matches!(blank, Err(SyncError::Validation(_))));
    assert!(matches!(stranger, Err(SyncError::Validation(_))));
    assert!(controller.state().items().is_empty());
    assert!(!calls
        .lock()
        .await
        .iter()
        .any(|call| call.starts_with("create_item")));
    assert_eq!(controller.presentation().notices.len(), 2);
}

#[tokio::test]
async fn create_failure_leaves_state_and_view_untouched() {
    let mut remote = FakeRemote::with(Vec::new(), vec![alice()]);
    remote.fail_create = Some("timed out".into());
    let mut controller = started(remote).await;

    let err = controller
        .on_submit_create(OwnerId(1), "Buy milk")
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::NetworkFailure);
    assert!(controller.state().items().is_empty());
    assert_eq!(
        controller.presentation().events,
        vec![
            Rendered::OwnerOption(OwnerId(1)),
            Rendered::Error(ErrorCode::NetworkFailure)
        ]
    );
}

#[tokio::test]
async fn confirmed_delete_removes_item_from_state_and_view() {
    let mut controller =
        started(FakeRemote::with(vec![item(101, 1, "Buy milk")], vec![alice()])).await;

    controller.on_close(ItemId::from(101)).await.expect("delete");

    assert!(controller.state().get(&ItemId::from(101)).is_none());
    assert_eq!(
        controller.presentation().events.last(),
        Some(&Rendered::Removed(ItemId::from(101)))
    );
}

#[tokio::test]
async fn rejected_delete_keeps_item() {
    let mut controller = started(
        FakeRemote::with(vec![item(101, 1, "Buy milk")], vec![alice()]).rejecting_mutations(500),
    )
    .await;

    let err = controller.on_close(ItemId::from(101)).await.unwrap_err();

    assert_eq!(err.code(), ErrorCode::ServerRejected);
    assert_eq!(controller.state().get(&ItemId::from(101)), Some(&item(101, 1, "Buy milk")));
    assert!(!controller
        .presentation()
        .events
        .contains(&Rendered::Removed(ItemId::from(101))));
    assert_eq!(
        controller.presentation().events.last(),
        Some(&Rendered::Error(ErrorCode::ServerRejected))
    );
}

#[tokio::test]
async fn rejected_toggle_reverts_checkbox_and_keeps_state() {
    let mut controller = started(
        FakeRemote::with(vec![item(101, 1, "Buy milk")], vec![alice()]).rejecting_mutations(500),
    )
    .await;

    let result = controller.on_toggle(ItemId::from(101), true).await;

    assert!(result.is_err());
    assert!(!controller.state().get(&ItemId::from(101)).expect("item").completed);
    let events = &controller.presentation().events;
    assert_eq!(
        &events[events.len() - 2..],
        &[
            Rendered::Checkbox(ItemId::from(101), false),
            Rendered::Error(ErrorCode::ServerRejected)
        ]
    );
}

#[tokio::test]
async fn confirmed_toggle_leaves_list_state_alone() {
    let remote = FakeRemote::with(vec![item(101, 1, "Buy milk")], vec![alice()]);
    let calls = Arc::clone(&remote.calls);
    let mut controller = started(remote).await;
    let rendered_before = controller.presentation().events.len();

    controller.on_toggle(ItemId::from(101), true).await.expect("toggle");

    assert_eq!(controller.state().items(), &[item(101, 1, "Buy milk")]);
    assert_eq!(controller.presentation().events.len(), rendered_before);
    assert!(calls
        .lock()
        .await
        .contains(&"set_completed 101 true".to_string()));
}

#[tokio::test]
async fn string_item_ids_reach_the_remote_unchanged() {
    let mut listed = item(0, 1, "Buy milk");
    listed.id = ItemId::from("a1b2");
    let remote = FakeRemote::with(vec![listed], vec![alice()]);
    let calls = Arc::clone(&remote.calls);
    let mut controller = started(remote).await;

    controller
        .on_toggle(ItemId::from("a1b2"), true)
        .await
        .expect("toggle");
    controller.on_close(ItemId::from("a1b2")).await.expect("delete");

    assert!(controller.state().items().is_empty());
    assert_eq!(
        controller.presentation().events.last(),
        Some(&Rendered::Removed(ItemId::from("a1b2")))
    );
    let calls = calls.lock().await;
    assert!(calls.contains(&"set_completed a1b2 true".to_string()));
    assert!(calls.contains(&"delete_item a1b2".to_string()));
}

#[tokio::test]
async fn intents_before_start_are_not_ready() {
    let remote = FakeRemote::with(vec![item(101, 1, "Buy milk")], vec![alice()]);
    let calls = Arc::clone(&remote.calls);
    let mut controller = SyncController::new(remote, RecordingPresentation::default());

    let err = controller.on_close(ItemId::from(101)).await.unwrap_err();

    assert!(matches!(err, SyncError::NotReady));
    assert!(calls.lock().await.is_empty());
    assert_eq!(
        controller.presentation().events,
        vec![Rendered::Error(ErrorCode::NotReady)]
    );
}

#[tokio::test]
async fn item_with_unknown_owner_renders_placeholder() {
    let controller = started(FakeRemote::with(vec![item(5, 9, "orphan")], vec![alice()])).await;

    assert_eq!(
        controller.presentation().events.last(),
        Some(&Rendered::Item {
            id: ItemId::from(5),
            owner_name: UNKNOWN_OWNER_PLACEHOLDER.into(),
            completed: false
        })
    );
}

#[tokio::test]
async fn run_processes_queued_intents_in_order() {
    let remote = FakeRemote::with(Vec::new(), vec![alice()]).creating(vec![101]);
    let calls = Arc::clone(&remote.calls);
    let mut controller = started(remote).await;
    let (tx, rx) = mpsc::channel(8);

    tx.send(Intent::SubmitCreate {
        owner_id: OwnerId(1),
        title: "Buy milk".into(),
    })
    .await
    .expect("queue create");
    tx.send(Intent::Toggle {
        item_id: ItemId::from(101),
        completed: true,
    })
    .await
    .expect("queue toggle");
    tx.send(Intent::Close {
        item_id: ItemId::from(101),
    })
    .await
    .expect("queue close");
    drop(tx);

    controller.run(rx).await;

    assert!(controller.state().items().is_empty());
    let calls = calls.lock().await;
    let mutations: Vec<&String> = calls
        .iter()
        .filter(|call| !call.starts_with("list_"))
        .collect();
    assert_eq!(
        mutations,
        vec![
            "create_item 1 Buy milk",
            "set_completed 101 true",
            "delete_item 101"
        ]
    );
}
