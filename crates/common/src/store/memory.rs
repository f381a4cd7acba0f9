use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use time::OffsetDateTime;
use uuid::Uuid;

use super::error::{ErrorCode, StoreError};
use super::provider::NoteStore;
use crate::types::{LinkedNotebook, Note, Notebook, NotebookRestrictions, SharedNotebook};

/// The operations of [`NoteStore`], used to record and fail calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Call {
    GetSharedNotebookByAuth,
    CreateNote,
    CreateNotebook,
    GetNotebook,
    ListLinkedNotebooks,
    CreateLinkedNotebook,
    ExpungeSharedNotebooks,
    ExpungeLinkedNotebook,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub call: Call,
    pub token: String,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryNoteStoreError {
    #[error("memory store error: {0}")]
    Internal(String),
}

type Result<T> = std::result::Result<T, StoreError<MemoryNoteStoreError>>;

/// A single in-process shard.
///
/// Tokens must be registered before use: [`authorize`](Self::authorize)
///  registers a token for the account owning the shard, and
///  [`share_notebook`](Self::share_notebook) issues a token scoped to one
///  shared notebook. Every call is recorded with the token it ran under,
///  and the next call of a given kind can be made to fail with
///  [`fail_next`](Self::fail_next).
///
/// There is no default notebook, notes must name the notebook they go in.
#[derive(Debug, Clone)]
pub struct MemoryNoteStore {
    inner: Arc<RwLock<MemoryNoteStoreInner>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Principal {
    Owner,
    Share(i64),
}

#[derive(Debug, Default)]
struct MemoryNoteStoreInner {
    tokens: HashMap<String, Principal>,
    notebooks: HashMap<Uuid, Notebook>,
    notes: HashMap<Uuid, Note>,
    /// Sharing records by id, ids are handed out in increasing order
    shared_notebooks: BTreeMap<i64, SharedNotebook>,
    next_shared_id: i64,
    /// Linked notebook catalog, in insertion order
    linked_notebooks: Vec<LinkedNotebook>,
    share_on_create: bool,
    calls: Vec<RecordedCall>,
    failures: HashMap<Call, StoreError<MemoryNoteStoreError>>,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryNoteStoreInner::default())),
        }
    }

    /// Attach a sharing record to every notebook created through
    ///  [`NoteStore::create_notebook`]
    pub fn with_share_on_create(self) -> Self {
        self.lock().share_on_create = true;
        self
    }

    /// Register `token` as belonging to the account that owns this shard
    pub fn authorize(&self, token: impl Into<String>) {
        self.lock().tokens.insert(token.into(), Principal::Owner);
    }

    /// Store a notebook directly, assigning a guid if it has none
    pub fn insert_notebook(&self, mut notebook: Notebook) -> Notebook {
        let guid = *notebook.guid.get_or_insert_with(Uuid::new_v4);
        notebook.shared_notebooks.clear();
        self.lock().notebooks.insert(guid, notebook.clone());
        notebook
    }

    /// Share a stored notebook and issue `token` scoped to the share.
    ///  Returns `None` when no notebook has the given guid.
    pub fn share_notebook(
        &self,
        notebook_guid: Uuid,
        token: impl Into<String>,
        modifiable: bool,
    ) -> Option<SharedNotebook> {
        let mut inner = self.lock();
        if !inner.notebooks.contains_key(&notebook_guid) {
            return None;
        }
        let shared = inner.add_share(notebook_guid, modifiable);
        inner
            .tokens
            .insert(token.into(), Principal::Share(shared.id));
        Some(shared)
    }

    /// Make the next call of kind `call` fail with `error`
    pub fn fail_next(&self, call: Call, error: StoreError<MemoryNoteStoreError>) {
        self.lock().failures.insert(call, error);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.snapshot().calls.clone()
    }

    pub fn call_count(&self, call: Call) -> usize {
        self.snapshot()
            .calls
            .iter()
            .filter(|recorded| recorded.call == call)
            .count()
    }

    pub fn notes(&self) -> Vec<Note> {
        self.snapshot().notes.values().cloned().collect()
    }

    pub fn linked_notebooks(&self) -> Vec<LinkedNotebook> {
        self.snapshot().linked_notebooks.clone()
    }

    pub fn shared_notebooks(&self) -> Vec<SharedNotebook> {
        self.snapshot().shared_notebooks.values().cloned().collect()
    }

    // Setup and inspection helpers see through poisoning
    fn lock(&self) -> RwLockWriteGuard<'_, MemoryNoteStoreInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn snapshot(&self) -> RwLockReadGuard<'_, MemoryNoteStoreInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record the call, then either hand back the state or the
    ///  failure queued for this kind of call
    fn begin(&self, call: Call, token: &str) -> Result<RwLockWriteGuard<'_, MemoryNoteStoreInner>> {
        let mut inner = self.inner.write().map_err(|e| {
            StoreError::Transport(MemoryNoteStoreError::Internal(format!(
                "failed to acquire write lock: {}",
                e
            )))
        })?;

        inner.calls.push(RecordedCall {
            call,
            token: token.to_string(),
        });

        if let Some(error) = inner.failures.remove(&call) {
            return Err(error);
        }

        Ok(inner)
    }
}

impl Default for MemoryNoteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryNoteStoreInner {
    fn principal(&self, token: &str) -> Result<Principal> {
        self.tokens
            .get(token)
            .copied()
            .ok_or_else(|| StoreError::user(ErrorCode::InvalidAuth, "authenticationToken"))
    }

    fn owner(&self, token: &str, parameter: &str) -> Result<()> {
        match self.principal(token)? {
            Principal::Owner => Ok(()),
            Principal::Share(_) => Err(StoreError::user(ErrorCode::PermissionDenied, parameter)),
        }
    }

    fn share(&self, id: i64) -> Result<&SharedNotebook> {
        self.shared_notebooks
            .get(&id)
            .ok_or_else(|| StoreError::not_found("SharedNotebook.id", Some(id.to_string())))
    }

    fn add_share(&mut self, notebook_guid: Uuid, modifiable: bool) -> SharedNotebook {
        self.next_shared_id += 1;
        let shared = SharedNotebook {
            id: self.next_shared_id,
            share_key: Uuid::new_v4().simple().to_string(),
            notebook_guid,
            notebook_modifiable: modifiable,
            username: None,
        };
        self.shared_notebooks.insert(shared.id, shared.clone());
        shared
    }

    /// The notebook as its owner sees it, sharing records included
    fn owner_view(&self, notebook: &Notebook) -> Notebook {
        let mut view = notebook.clone();
        view.shared_notebooks = self
            .shared_notebooks
            .values()
            .filter(|shared| Some(shared.notebook_guid) == notebook.guid)
            .cloned()
            .collect();
        view
    }
}

#[async_trait]
impl NoteStore for MemoryNoteStore {
    type Error = MemoryNoteStoreError;

    async fn get_shared_notebook_by_auth(&self, token: &str) -> Result<SharedNotebook> {
        let inner = self.begin(Call::GetSharedNotebookByAuth, token)?;

        match inner.principal(token)? {
            Principal::Share(id) => inner.share(id).cloned(),
            Principal::Owner => Err(StoreError::not_found("SharedNotebook", None)),
        }
    }

    async fn create_note(&self, token: &str, mut note: Note) -> Result<Note> {
        let mut inner = self.begin(Call::CreateNote, token)?;
        let principal = inner.principal(token)?;

        if note.title.trim().is_empty() {
            return Err(StoreError::user(ErrorCode::LenTooShort, "Note.title"));
        }
        let notebook_guid = note
            .notebook_guid
            .ok_or_else(|| StoreError::user(ErrorCode::DataRequired, "Note.notebookGuid"))?;
        if !inner.notebooks.contains_key(&notebook_guid) {
            return Err(StoreError::not_found(
                "Note.notebookGuid",
                Some(notebook_guid.to_string()),
            ));
        }
        if let Principal::Share(id) = principal {
            let shared = inner.share(id)?;
            if shared.notebook_guid != notebook_guid {
                return Err(StoreError::user(
                    ErrorCode::PermissionDenied,
                    "Note.notebookGuid",
                ));
            }
            if !shared.notebook_modifiable {
                return Err(StoreError::user(ErrorCode::PermissionDenied, "Note"));
            }
        }

        let now = OffsetDateTime::now_utc();
        let guid = Uuid::new_v4();
        note.guid = Some(guid);
        note.created = Some(now);
        note.updated = Some(now);
        inner.notes.insert(guid, note.clone());

        Ok(note)
    }

    async fn create_notebook(&self, token: &str, notebook: Notebook) -> Result<Notebook> {
        let mut inner = self.begin(Call::CreateNotebook, token)?;
        inner.owner(token, "Notebook")?;

        if notebook.name.trim().is_empty() {
            return Err(StoreError::user(ErrorCode::LenTooShort, "Notebook.name"));
        }
        if inner
            .notebooks
            .values()
            .any(|existing| existing.name.eq_ignore_ascii_case(&notebook.name))
        {
            return Err(StoreError::user(ErrorCode::DataConflict, "Notebook.name"));
        }

        let guid = Uuid::new_v4();
        let stored = Notebook {
            guid: Some(guid),
            shared_notebooks: Vec::new(),
            ..notebook
        };
        inner.notebooks.insert(guid, stored.clone());
        if inner.share_on_create {
            inner.add_share(guid, true);
        }

        Ok(inner.owner_view(&stored))
    }

    async fn get_notebook(&self, token: &str, guid: Uuid) -> Result<Notebook> {
        let inner = self.begin(Call::GetNotebook, token)?;
        let principal = inner.principal(token)?;

        let notebook = inner
            .notebooks
            .get(&guid)
            .ok_or_else(|| StoreError::not_found("Notebook.guid", Some(guid.to_string())))?;

        match principal {
            Principal::Owner => Ok(inner.owner_view(notebook)),
            Principal::Share(id) => {
                let shared = inner.share(id)?;
                if shared.notebook_guid != guid {
                    return Err(StoreError::user(
                        ErrorCode::PermissionDenied,
                        "Notebook.guid",
                    ));
                }

                let mut view = notebook.clone();
                if !shared.notebook_modifiable {
                    let stored = view.restrictions.unwrap_or_default();
                    view.restrictions = Some(NotebookRestrictions {
                        no_share_notes: stored.no_share_notes,
                        no_update_notebook: stored.no_update_notebook,
                        ..NotebookRestrictions::read_only()
                    });
                }
                Ok(view)
            }
        }
    }

    async fn list_linked_notebooks(&self, token: &str) -> Result<Vec<LinkedNotebook>> {
        let inner = self.begin(Call::ListLinkedNotebooks, token)?;
        inner.owner(token, "LinkedNotebook")?;

        Ok(inner.linked_notebooks.clone())
    }

    async fn create_linked_notebook(
        &self,
        token: &str,
        mut linked_notebook: LinkedNotebook,
    ) -> Result<LinkedNotebook> {
        let mut inner = self.begin(Call::CreateLinkedNotebook, token)?;
        inner.owner(token, "LinkedNotebook")?;

        if linked_notebook.share_name.trim().is_empty() {
            return Err(StoreError::user(
                ErrorCode::LenTooShort,
                "LinkedNotebook.shareName",
            ));
        }
        if linked_notebook.share_key.is_none() && linked_notebook.uri.is_none() {
            return Err(StoreError::user(
                ErrorCode::DataRequired,
                "LinkedNotebook.shareKey",
            ));
        }

        linked_notebook.guid = Some(Uuid::new_v4());
        inner.linked_notebooks.push(linked_notebook.clone());

        Ok(linked_notebook)
    }

    async fn expunge_shared_notebooks(&self, token: &str, ids: &[i64]) -> Result<i32> {
        let mut inner = self.begin(Call::ExpungeSharedNotebooks, token)?;
        let principal = inner.principal(token)?;

        if ids.is_empty() {
            return Err(StoreError::user(
                ErrorCode::DataRequired,
                "sharedNotebookIds",
            ));
        }
        for id in ids {
            inner.share(*id)?;
            if matches!(principal, Principal::Share(own) if own != *id) {
                return Err(StoreError::user(
                    ErrorCode::PermissionDenied,
                    "SharedNotebook.id",
                ));
            }
        }

        let mut removed = 0;
        for id in ids {
            if inner.shared_notebooks.remove(id).is_some() {
                removed += 1;
            }
        }
        inner
            .tokens
            .retain(|_, bound| !matches!(bound, Principal::Share(id) if ids.contains(id)));

        Ok(removed)
    }

    async fn expunge_linked_notebook(&self, token: &str, guid: Uuid) -> Result<i32> {
        let mut inner = self.begin(Call::ExpungeLinkedNotebook, token)?;
        inner.owner(token, "LinkedNotebook")?;

        let position = inner
            .linked_notebooks
            .iter()
            .position(|linked| linked.guid == Some(guid))
            .ok_or_else(|| StoreError::not_found("LinkedNotebook.guid", Some(guid.to_string())))?;
        inner.linked_notebooks.remove(position);

        Ok(1)
    }
}
