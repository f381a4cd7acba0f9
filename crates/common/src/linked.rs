//! Linked notebook routing
//!
//! A linked notebook is a notebook owned by one account and made visible
//! in another account's catalog. Working with one touches two shards:
//!
//! * the **home** shard, which holds the caller's own account and its
//!   catalog of linked notebooks, and
//! * the **foreign** shard, which hosts the shared notebook itself.
//!
//! [`LinkedStoreRouter`] holds one [`StoreHandle`] for each and documents,
//! for every step of every operation, which of the two it runs on. The
//! pair is fixed at construction and never swapped.
//!
//! Nothing is cached between calls. Every operation that needs the
//! sharing record resolves it again on the foreign shard, since the owner
//! can change or revoke the share at any time.

use url::Url;
use uuid::Uuid;

use crate::store::{NoteStore, StoreError, StoreHandle};
use crate::types::{AuthenticationResult, LinkedNotebook, Note, Notebook, SharedNotebook};

#[derive(thiserror::Error, Debug)]
pub enum LinkedStoreError<T: std::error::Error + 'static> {
    /// A remote call failed, passed through as the store reported it
    #[error(transparent)]
    Store(#[from] StoreError<T>),
    /// The store created the notebook without attaching a sharing record
    #[error("notebook {0:?} was created without a shared notebook record")]
    NoSharedNotebook(String),
    /// The linked notebook was never registered with the home store
    #[error("linked notebook {0:?} has no guid")]
    UnregisteredLinkedNotebook(String),
}

/// Routes linked notebook operations between the caller's home
///  shard and the shard hosting the shared notebook.
///
/// # Examples
///
/// ```ignore
/// let home = grant.bind(HttpNoteStore::new(grant.note_store_url())?);
/// let foreign = HttpNoteStore::new(&shared_shard_url)?;
/// let router = LinkedStoreRouter::from_authentication(home, shared_shard_url, foreign, auth);
///
/// for linked in router.list_linked_notebooks().await? {
///     println!("{} (writable: {})", linked.share_name, router.is_writable(&linked).await?);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct LinkedStoreRouter<S> {
    home: StoreHandle<S>,
    foreign: StoreHandle<S>,
    auth: AuthenticationResult,
}

impl<S: NoteStore> LinkedStoreRouter<S> {
    /// Build a router from a handle bound to the caller's own shard, a
    ///  handle bound to the shard hosting the shared notebook, and the
    ///  authentication result that authorized the link
    pub fn new(home: StoreHandle<S>, foreign: StoreHandle<S>, auth: AuthenticationResult) -> Self {
        Self {
            home,
            foreign,
            auth,
        }
    }

    /// Build a router whose foreign handle runs under the token of the
    ///  authentication result
    pub fn from_authentication(
        home: StoreHandle<S>,
        foreign_endpoint: Url,
        foreign_store: S,
        auth: AuthenticationResult,
    ) -> Self {
        let foreign = StoreHandle::new(
            foreign_endpoint,
            auth.authentication_token.clone(),
            foreign_store,
        );
        Self::new(home, foreign, auth)
    }

    pub fn home(&self) -> &StoreHandle<S> {
        &self.home
    }

    pub fn foreign(&self) -> &StoreHandle<S> {
        &self.foreign
    }

    pub fn authentication_result(&self) -> &AuthenticationResult {
        &self.auth
    }

    /// Create a note in a linked notebook.
    ///
    /// 1. **foreign**: resolve the sharing record for the foreign token
    /// 2. file the note under the notebook the record points at
    /// 3. **foreign**: create the note
    ///
    /// The note is never submitted when the sharing record cannot be
    ///  resolved.
    pub async fn create_note(
        &self,
        mut note: Note,
        linked_notebook: &LinkedNotebook,
    ) -> Result<Note, LinkedStoreError<S::Error>> {
        let shared = self.resolve_shared_notebook(linked_notebook).await?;
        note.notebook_guid = Some(shared.notebook_guid);

        tracing::debug!(
            "creating note {:?} in shared notebook {} on foreign shard {}",
            note.title,
            shared.notebook_guid,
            self.foreign.endpoint()
        );
        let created = self
            .foreign
            .store()
            .create_note(self.foreign.token(), note)
            .await?;

        tracing::info!(
            "created note {:?} in linked notebook {:?}",
            created.guid,
            linked_notebook.share_name
        );
        Ok(created)
    }

    /// List the linked notebooks in the caller's catalog.
    ///
    /// 1. **home**: list linked notebooks
    ///
    /// The catalog lives on the home shard regardless of which shard
    ///  each linked notebook is hosted on.
    pub async fn list_linked_notebooks(
        &self,
    ) -> Result<Vec<LinkedNotebook>, LinkedStoreError<S::Error>> {
        tracing::debug!(
            "listing linked notebooks on home shard {}",
            self.home.endpoint()
        );
        Ok(self
            .home
            .store()
            .list_linked_notebooks(self.home.token())
            .await?)
    }

    /// Create a notebook on the foreign shard and link it into the
    ///  home catalog.
    ///
    /// 1. **foreign**: create the notebook, the foreign account owns it
    /// 2. take the first sharing record the store attached to it
    /// 3. build a linked notebook from the record's share key, the
    ///    notebook name and the authenticated user's username and shard
    /// 4. **home**: register the linked notebook
    ///
    /// Fails with [`LinkedStoreError::NoSharedNotebook`], before anything
    ///  is registered on the home shard, when the created notebook carries
    ///  no sharing record.
    pub async fn create_linked_notebook(
        &self,
        notebook: Notebook,
    ) -> Result<LinkedNotebook, LinkedStoreError<S::Error>> {
        tracing::debug!(
            "creating notebook {:?} on foreign shard {}",
            notebook.name,
            self.foreign.endpoint()
        );
        let created = self
            .foreign
            .store()
            .create_notebook(self.foreign.token(), notebook)
            .await?;

        // NOTE: the store gives no ordering guarantee for the sharing
        //  records of a notebook; taking the first one assumes a freshly
        //  created notebook carries exactly one.
        if created.shared_notebooks.len() > 1 {
            tracing::warn!(
                "notebook {:?} came back with {} shared notebook records, linking the first",
                created.name,
                created.shared_notebooks.len()
            );
        }
        let shared = created
            .shared_notebooks
            .first()
            .ok_or_else(|| LinkedStoreError::NoSharedNotebook(created.name.clone()))?;

        let user = &self.auth.user;
        let linked_notebook = LinkedNotebook {
            guid: None,
            share_key: Some(shared.share_key.clone()),
            share_name: created.name.clone(),
            username: user.username.clone(),
            shard_id: user.shard_id.clone(),
            uri: None,
        };

        tracing::debug!(
            "registering linked notebook {:?} on home shard {}",
            linked_notebook.share_name,
            self.home.endpoint()
        );
        let registered = self
            .home
            .store()
            .create_linked_notebook(self.home.token(), linked_notebook)
            .await?;

        tracing::info!(
            "linked notebook {:?} registered as {:?}",
            registered.share_name,
            registered.guid
        );
        Ok(registered)
    }

    /// Stop sharing a linked notebook and drop it from the home catalog.
    ///
    /// 1. **foreign**: resolve the sharing record for the foreign token
    /// 2. **foreign**: expunge that sharing record
    /// 3. **home**: expunge the linked notebook by guid
    ///
    /// Returns the number of catalog entries removed from the home shard.
    ///  A failure at any step leaves the later steps unattempted, so a
    ///  failed foreign expunge keeps the home entry intact. A linked
    ///  notebook without a guid is rejected before any remote call.
    pub async fn delete_linked_notebook(
        &self,
        linked_notebook: &LinkedNotebook,
    ) -> Result<i32, LinkedStoreError<S::Error>> {
        let guid = linked_notebook.guid.ok_or_else(|| {
            LinkedStoreError::UnregisteredLinkedNotebook(linked_notebook.share_name.clone())
        })?;

        let shared = self.resolve_shared_notebook(linked_notebook).await?;

        tracing::debug!(
            "expunging shared notebook {} on foreign shard {}",
            shared.id,
            self.foreign.endpoint()
        );
        self.foreign
            .store()
            .expunge_shared_notebooks(self.foreign.token(), &[shared.id])
            .await?;

        tracing::debug!(
            "expunging linked notebook {} on home shard {}",
            guid,
            self.home.endpoint()
        );
        let removed = self
            .home
            .store()
            .expunge_linked_notebook(self.home.token(), guid)
            .await?;

        tracing::info!(
            "deleted linked notebook {:?} ({} catalog entries removed)",
            linked_notebook.share_name,
            removed
        );
        Ok(removed)
    }

    /// Fetch the notebook a linked notebook refers to, as the foreign
    ///  shard presents it to the foreign token.
    ///
    /// 1. **foreign**: resolve the sharing record for the foreign token
    /// 2. **foreign**: get the notebook the record points at
    pub async fn corresponding_notebook(
        &self,
        linked_notebook: &LinkedNotebook,
    ) -> Result<Notebook, LinkedStoreError<S::Error>> {
        let shared = self.resolve_shared_notebook(linked_notebook).await?;

        tracing::debug!(
            "fetching notebook {} from foreign shard {}",
            shared.notebook_guid,
            self.foreign.endpoint()
        );
        Ok(self
            .foreign
            .store()
            .get_notebook(self.foreign.token(), shared.notebook_guid)
            .await?)
    }

    /// Whether notes can be created in a linked notebook.
    ///
    /// Resolves the corresponding notebook on the foreign shard; a
    ///  notebook without any restrictions is writable.
    pub async fn is_writable(
        &self,
        linked_notebook: &LinkedNotebook,
    ) -> Result<bool, LinkedStoreError<S::Error>> {
        let notebook = self.corresponding_notebook(linked_notebook).await?;
        Ok(notebook
            .restrictions
            .map_or(true, |restrictions| !restrictions.no_create_notes))
    }

    async fn resolve_shared_notebook(
        &self,
        linked_notebook: &LinkedNotebook,
    ) -> Result<SharedNotebook, StoreError<S::Error>> {
        tracing::debug!(
            "resolving shared notebook for {:?} on foreign shard {}",
            linked_notebook.share_name,
            self.foreign.endpoint()
        );
        let shared = self
            .foreign
            .store()
            .get_shared_notebook_by_auth(self.foreign.token())
            .await?;

        if linked_notebook
            .share_key
            .as_deref()
            .is_some_and(|key| key != shared.share_key)
        {
            tracing::debug!(
                "share key for {:?} changed since it was linked",
                linked_notebook.share_name
            );
        }
        Ok(shared)
    }
}

/// Find a linked notebook in a catalog listing by its guid
pub fn find_linked_notebook(linked: &[LinkedNotebook], guid: Uuid) -> Option<&LinkedNotebook> {
    linked.iter().find(|linked| linked.guid == Some(guid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Call, ErrorCode, MemoryNoteStore};
    use crate::types::User;
    use time::macros::datetime;

    fn auth(token: &str) -> AuthenticationResult {
        AuthenticationResult {
            authentication_token: token.to_string(),
            expiration: datetime!(2030-01-01 0:00 UTC),
            user: User {
                id: 7,
                username: "owner".to_string(),
                name: Some("Owner".to_string()),
                shard_id: "s2".to_string(),
            },
            note_store_url: None,
            web_api_url_prefix: None,
        }
    }

    fn router(
        home: &MemoryNoteStore,
        foreign: &MemoryNoteStore,
        foreign_token: &str,
    ) -> LinkedStoreRouter<MemoryNoteStore> {
        let home = StoreHandle::new(
            Url::parse("https://example.com/shard/s1/notestore").unwrap(),
            "home-token",
            home.clone(),
        );
        LinkedStoreRouter::from_authentication(
            home,
            Url::parse("https://example.com/shard/s2/notestore").unwrap(),
            foreign.clone(),
            auth(foreign_token),
        )
    }

    #[test]
    fn test_from_authentication_binds_foreign_token() {
        let home = MemoryNoteStore::new();
        let foreign = MemoryNoteStore::new();
        let router = router(&home, &foreign, "share-token");

        assert_eq!(router.home().token(), "home-token");
        assert_eq!(router.foreign().token(), "share-token");
        assert_eq!(
            router.foreign().endpoint().as_str(),
            "https://example.com/shard/s2/notestore"
        );
    }

    #[tokio::test]
    async fn test_is_writable_without_restrictions() {
        let home = MemoryNoteStore::new();
        let foreign = MemoryNoteStore::new();
        let guid = foreign.insert_notebook(Notebook::new("Open")).guid.unwrap();
        foreign.share_notebook(guid, "share-token", true).unwrap();

        let router = router(&home, &foreign, "share-token");
        assert!(router.is_writable(&LinkedNotebook::default()).await.unwrap());
    }

    #[tokio::test]
    async fn test_is_writable_with_no_create_notes() {
        let home = MemoryNoteStore::new();
        let foreign = MemoryNoteStore::new();
        let guid = foreign.insert_notebook(Notebook::new("Closed")).guid.unwrap();
        foreign.share_notebook(guid, "share-token", false).unwrap();

        let router = router(&home, &foreign, "share-token");
        assert!(!router.is_writable(&LinkedNotebook::default()).await.unwrap());
    }

    #[tokio::test]
    async fn test_is_writable_ignores_other_restrictions() {
        let home = MemoryNoteStore::new();
        let foreign = MemoryNoteStore::new();
        let mut notebook = Notebook::new("Partly closed");
        notebook.restrictions = Some(crate::types::NotebookRestrictions {
            no_share_notes: true,
            no_update_notebook: true,
            ..Default::default()
        });
        let guid = foreign.insert_notebook(notebook).guid.unwrap();
        foreign.share_notebook(guid, "share-token", true).unwrap();

        let router = router(&home, &foreign, "share-token");
        assert!(router.is_writable(&LinkedNotebook::default()).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_requires_guid_before_any_call() {
        let home = MemoryNoteStore::new();
        let foreign = MemoryNoteStore::new();
        let router = router(&home, &foreign, "share-token");

        let err = router
            .delete_linked_notebook(&LinkedNotebook {
                share_name: "never linked".to_string(),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, LinkedStoreError::UnregisteredLinkedNotebook(_)));
        assert!(foreign.calls().is_empty());
        assert!(home.calls().is_empty());
    }

    #[tokio::test]
    async fn test_store_errors_pass_through_unchanged() {
        let home = MemoryNoteStore::new();
        let foreign = MemoryNoteStore::new();
        home.authorize("home-token");
        let injected = StoreError::system(ErrorCode::ShardUnavailable, "s1 offline");
        home.fail_next(Call::ListLinkedNotebooks, injected.clone());

        let router = router(&home, &foreign, "share-token");
        let err = router.list_linked_notebooks().await.unwrap_err();

        match err {
            LinkedStoreError::Store(store_err) => assert_eq!(store_err, injected),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_find_linked_notebook() {
        let guid = Uuid::new_v4();
        let linked = vec![
            LinkedNotebook {
                guid: Some(Uuid::new_v4()),
                share_name: "a".to_string(),
                ..Default::default()
            },
            LinkedNotebook {
                guid: Some(guid),
                share_name: "b".to_string(),
                ..Default::default()
            },
        ];

        assert_eq!(
            find_linked_notebook(&linked, guid).map(|l| l.share_name.as_str()),
            Some("b")
        );
        assert!(find_linked_notebook(&linked, Uuid::new_v4()).is_none());
    }
}
