//! Integration tests for routing linked notebook operations across shards

mod common;

use ::common::prelude::*;
use ::common::store::{Call, MemoryNoteStoreError};

use self::common::{TestShards, HOME_TOKEN, OWNER_TOKEN, SHARE_TOKEN};

fn foreign_calls(shards: &TestShards) -> Vec<Call> {
    shards.foreign.calls().into_iter().map(|c| c.call).collect()
}

#[tokio::test]
async fn test_create_note_lands_in_shared_notebook() {
    let shards = TestShards::new();
    let (guid, linked) = shards.shared_notebook("Team", true);
    let router = shards.router(SHARE_TOKEN);

    let created = router
        .create_note(Note::new("Standup").with_content("notes"), &linked)
        .await
        .unwrap();

    assert!(created.guid.is_some());
    assert_eq!(created.notebook_guid, Some(guid));
    assert_eq!(shards.foreign.notes().len(), 1);

    assert_eq!(
        foreign_calls(&shards),
        vec![Call::GetSharedNotebookByAuth, Call::CreateNote]
    );
    assert!(shards
        .foreign
        .calls()
        .iter()
        .all(|recorded| recorded.token == SHARE_TOKEN));
    assert!(shards.home.calls().is_empty());
}

#[tokio::test]
async fn test_create_note_overrides_caller_notebook() {
    let shards = TestShards::new();
    let (guid, linked) = shards.shared_notebook("Team", true);
    let router = shards.router(SHARE_TOKEN);

    let mut note = Note::new("Misfiled");
    note.notebook_guid = Some(uuid::Uuid::new_v4());
    let created = router.create_note(note, &linked).await.unwrap();

    assert_eq!(created.notebook_guid, Some(guid));
}

#[tokio::test]
async fn test_create_note_not_attempted_when_share_missing() {
    let shards = TestShards::new();
    let (_, linked) = shards.shared_notebook("Team", true);
    shards.foreign.fail_next(
        Call::GetSharedNotebookByAuth,
        StoreError::not_found("SharedNotebook.id", None),
    );
    let router = shards.router(SHARE_TOKEN);

    let err = router
        .create_note(Note::new("Lost"), &linked)
        .await
        .unwrap_err();

    match err {
        LinkedStoreError::Store(store_err) => assert_eq!(store_err.kind(), ErrorKind::NotFound),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(shards.foreign.call_count(Call::GetSharedNotebookByAuth), 1);
    assert_eq!(shards.foreign.call_count(Call::CreateNote), 0);
    assert!(shards.foreign.notes().is_empty());
}

#[tokio::test]
async fn test_create_note_rejection_keeps_user_error() {
    let shards = TestShards::new();
    let (_, linked) = shards.shared_notebook("Read only", false);
    let router = shards.router(SHARE_TOKEN);

    let err = router
        .create_note(Note::new("Denied"), &linked)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        LinkedStoreError::Store(StoreError::User {
            code: ErrorCode::PermissionDenied,
            ..
        })
    ));
}

#[tokio::test]
async fn test_create_note_system_error_is_not_collapsed() {
    let shards = TestShards::new();
    let (_, linked) = shards.shared_notebook("Team", true);
    shards.foreign.fail_next(
        Call::CreateNote,
        StoreError::system(ErrorCode::ShardUnavailable, "s2 offline"),
    );
    let router = shards.router(SHARE_TOKEN);

    let err = router
        .create_note(Note::new("Later"), &linked)
        .await
        .unwrap_err();

    match err {
        LinkedStoreError::Store(store_err) => {
            assert_eq!(store_err.kind(), ErrorKind::System);
            assert!(store_err.kind().is_retryable());
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_create_note_transport_error_passes_through() {
    let shards = TestShards::new();
    let (_, linked) = shards.shared_notebook("Team", true);
    shards.foreign.fail_next(
        Call::GetSharedNotebookByAuth,
        StoreError::Transport(MemoryNoteStoreError::Internal("reset".to_string())),
    );
    let router = shards.router(SHARE_TOKEN);

    let err = router
        .create_note(Note::new("Dropped"), &linked)
        .await
        .unwrap_err();

    match err {
        LinkedStoreError::Store(StoreError::Transport(MemoryNoteStoreError::Internal(message))) => {
            assert_eq!(message, "reset")
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(shards.foreign.call_count(Call::CreateNote), 0);
    assert!(shards.foreign.notes().is_empty());
}

#[tokio::test]
async fn test_is_writable_not_found_passes_through() {
    let shards = TestShards::new();
    let (_, linked) = shards.shared_notebook("Team", true);
    shards.foreign.fail_next(
        Call::GetNotebook,
        StoreError::not_found("Notebook.guid", None),
    );
    let router = shards.router(SHARE_TOKEN);

    let err = router.is_writable(&linked).await.unwrap_err();

    match err {
        LinkedStoreError::Store(StoreError::NotFound { identifier, key }) => {
            assert_eq!(identifier, "Notebook.guid");
            assert_eq!(key, None);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(
        foreign_calls(&shards),
        vec![Call::GetSharedNotebookByAuth, Call::GetNotebook]
    );
}

#[tokio::test]
async fn test_list_linked_notebooks_reads_home_catalog() {
    let shards = TestShards::new();
    let (_, linked) = shards.shared_notebook("Team", true);
    shards
        .home
        .create_linked_notebook(HOME_TOKEN, linked.clone())
        .await
        .unwrap();
    let router = shards.router(SHARE_TOKEN);

    let listed = router.list_linked_notebooks().await.unwrap();

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].share_key, linked.share_key);
    assert!(shards.foreign.calls().is_empty());
    let home_calls = shards.home.calls();
    assert_eq!(home_calls.last().unwrap().call, Call::ListLinkedNotebooks);
    assert_eq!(home_calls.last().unwrap().token, HOME_TOKEN);
}

#[tokio::test]
async fn test_create_linked_notebook_registers_on_home() {
    let shards = TestShards::new();
    let router = shards.router(OWNER_TOKEN);

    let registered = router
        .create_linked_notebook(Notebook::new("Field notes"))
        .await
        .unwrap();

    let shared = shards.foreign.shared_notebooks();
    assert_eq!(shared.len(), 1);
    assert!(registered.guid.is_some());
    assert_eq!(registered.share_key.as_deref(), Some(shared[0].share_key.as_str()));
    assert_eq!(registered.share_name, "Field notes");
    assert_eq!(registered.username, "bob");
    assert_eq!(registered.shard_id, "s2");

    assert_eq!(shards.home.linked_notebooks(), vec![registered]);
    assert_eq!(foreign_calls(&shards), vec![Call::CreateNotebook]);
    let home_calls = shards.home.calls();
    assert_eq!(home_calls.len(), 1);
    assert_eq!(home_calls[0].call, Call::CreateLinkedNotebook);
    assert_eq!(home_calls[0].token, HOME_TOKEN);
}

#[tokio::test]
async fn test_create_linked_notebook_without_share_fails_fast() {
    let shards = TestShards::new();
    // A shard that does not share new notebooks
    let foreign = MemoryNoteStore::new();
    foreign.authorize(OWNER_TOKEN);
    let shards = TestShards {
        home: shards.home,
        foreign,
    };
    let router = shards.router(OWNER_TOKEN);

    let err = router
        .create_linked_notebook(Notebook::new("Private"))
        .await
        .unwrap_err();

    assert!(matches!(err, LinkedStoreError::NoSharedNotebook(name) if name == "Private"));
    assert_eq!(shards.foreign.call_count(Call::CreateNotebook), 1);
    assert!(shards.home.calls().is_empty());
    assert!(shards.home.linked_notebooks().is_empty());
}

#[tokio::test]
async fn test_create_linked_notebook_home_rejection_propagates() {
    let shards = TestShards::new();
    shards.home.fail_next(
        Call::CreateLinkedNotebook,
        StoreError::user(ErrorCode::LimitReached, "LinkedNotebook"),
    );
    let router = shards.router(OWNER_TOKEN);

    let err = router
        .create_linked_notebook(Notebook::new("One too many"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        LinkedStoreError::Store(StoreError::User {
            code: ErrorCode::LimitReached,
            ..
        })
    ));
    // No rollback of the foreign notebook
    assert_eq!(shards.foreign.shared_notebooks().len(), 1);
}

#[tokio::test]
async fn test_delete_linked_notebook_visits_foreign_then_home() {
    let shards = TestShards::new();
    let (_, linked) = shards.shared_notebook("Team", true);
    let registered = shards
        .home
        .create_linked_notebook(HOME_TOKEN, linked)
        .await
        .unwrap();
    let router = shards.router(SHARE_TOKEN);

    let removed = router.delete_linked_notebook(&registered).await.unwrap();

    assert_eq!(removed, 1);
    assert!(shards.foreign.shared_notebooks().is_empty());
    assert!(shards.home.linked_notebooks().is_empty());
    assert_eq!(
        foreign_calls(&shards),
        vec![Call::GetSharedNotebookByAuth, Call::ExpungeSharedNotebooks]
    );
    assert_eq!(shards.home.call_count(Call::ExpungeLinkedNotebook), 1);
}

#[tokio::test]
async fn test_delete_stops_when_foreign_expunge_fails() {
    let shards = TestShards::new();
    let (_, linked) = shards.shared_notebook("Team", true);
    let registered = shards
        .home
        .create_linked_notebook(HOME_TOKEN, linked)
        .await
        .unwrap();
    shards.foreign.fail_next(
        Call::ExpungeSharedNotebooks,
        StoreError::system(ErrorCode::InternalError, "expunge failed"),
    );
    let router = shards.router(SHARE_TOKEN);

    let err = router.delete_linked_notebook(&registered).await.unwrap_err();

    assert!(matches!(
        err,
        LinkedStoreError::Store(StoreError::System {
            code: ErrorCode::InternalError,
            ..
        })
    ));
    assert_eq!(shards.home.call_count(Call::ExpungeLinkedNotebook), 0);
    assert_eq!(shards.home.linked_notebooks(), vec![registered]);
    assert_eq!(shards.foreign.shared_notebooks().len(), 1);
}

#[tokio::test]
async fn test_delete_stops_when_share_cannot_be_resolved() {
    let shards = TestShards::new();
    let (_, linked) = shards.shared_notebook("Team", true);
    let registered = shards
        .home
        .create_linked_notebook(HOME_TOKEN, linked)
        .await
        .unwrap();
    // The owner token is not bound to any share
    let router = shards.router(OWNER_TOKEN);

    let err = router.delete_linked_notebook(&registered).await.unwrap_err();

    assert!(matches!(
        err,
        LinkedStoreError::Store(StoreError::NotFound { .. })
    ));
    assert_eq!(shards.foreign.call_count(Call::ExpungeSharedNotebooks), 0);
    assert_eq!(shards.home.call_count(Call::ExpungeLinkedNotebook), 0);
}

#[tokio::test]
async fn test_corresponding_notebook_comes_from_foreign() {
    let shards = TestShards::new();
    let (guid, linked) = shards.shared_notebook("Team", true);
    let router = shards.router(SHARE_TOKEN);

    let notebook = router.corresponding_notebook(&linked).await.unwrap();

    assert_eq!(notebook.guid, Some(guid));
    assert_eq!(notebook.name, "Team");
    assert_eq!(
        foreign_calls(&shards),
        vec![Call::GetSharedNotebookByAuth, Call::GetNotebook]
    );
    assert!(shards.home.calls().is_empty());
}

#[tokio::test]
async fn test_is_writable_follows_share_permissions() {
    let shards = TestShards::new();
    let (_, linked) = shards.shared_notebook("Team", true);
    assert!(shards.router(SHARE_TOKEN).is_writable(&linked).await.unwrap());

    let shards = TestShards::new();
    let (_, linked) = shards.shared_notebook("Read only", false);
    assert!(!shards.router(SHARE_TOKEN).is_writable(&linked).await.unwrap());
}

#[tokio::test]
async fn test_every_operation_resolves_share_again() {
    let shards = TestShards::new();
    let (_, linked) = shards.shared_notebook("Team", true);
    let router = shards.router(SHARE_TOKEN);

    router.corresponding_notebook(&linked).await.unwrap();
    router.is_writable(&linked).await.unwrap();
    router.create_note(Note::new("One"), &linked).await.unwrap();

    assert_eq!(shards.foreign.call_count(Call::GetSharedNotebookByAuth), 3);
}
