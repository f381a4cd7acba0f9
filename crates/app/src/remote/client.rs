use async_trait::async_trait;
use reqwest::{header::HeaderMap, header::HeaderValue, Client};
use url::Url;
use uuid::Uuid;

use common::store::{NoteStore, StoreError, StoreHandle};
use common::types::{LinkedNotebook, Note, Notebook, SharedNotebook};

use super::error::{classify, ApiError};
use super::requests::*;
use super::ApiRequest;

/// A note store shard reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpNoteStore {
    remote: Url,
    client: Client,
}

impl HttpNoteStore {
    pub fn new(remote: &Url) -> Result<Self, ApiError> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder().default_headers(default_headers).build()?;

        Ok(Self {
            remote: remote.clone(),
            client,
        })
    }

    /// Pair this store with the token its calls should run under
    pub fn bind(self, token: impl Into<String>) -> StoreHandle<Self> {
        StoreHandle::new(self.remote.clone(), token, self)
    }

    pub fn base_url(&self) -> &Url {
        &self.remote
    }

    pub async fn call<T: ApiRequest>(&self, request: T) -> Result<T::Response, StoreError<ApiError>> {
        let request_builder = request.build_request(&self.remote, &self.client)?;
        tracing::debug!(method = T::METHOD, remote = %self.remote, "calling note store");
        let response = request_builder.send().await.map_err(ApiError::from)?;

        let status = response.status();
        if status.is_success() {
            Ok(response
                .json::<T::Response>()
                .await
                .map_err(ApiError::from)?)
        } else {
            let body = response.text().await.map_err(ApiError::from)?;
            tracing::debug!(method = T::METHOD, %status, "note store call failed");
            Err(classify(T::METHOD, status, body))
        }
    }
}

#[async_trait]
impl NoteStore for HttpNoteStore {
    type Error = ApiError;

    async fn get_shared_notebook_by_auth(
        &self,
        token: &str,
    ) -> Result<SharedNotebook, StoreError<ApiError>> {
        self.call(GetSharedNotebookByAuthRequest {
            authentication_token: token.to_string(),
        })
        .await
    }

    async fn create_note(&self, token: &str, note: Note) -> Result<Note, StoreError<ApiError>> {
        self.call(CreateNoteRequest {
            authentication_token: token.to_string(),
            note,
        })
        .await
    }

    async fn create_notebook(
        &self,
        token: &str,
        notebook: Notebook,
    ) -> Result<Notebook, StoreError<ApiError>> {
        self.call(CreateNotebookRequest {
            authentication_token: token.to_string(),
            notebook,
        })
        .await
    }

    async fn get_notebook(&self, token: &str, guid: Uuid) -> Result<Notebook, StoreError<ApiError>> {
        self.call(GetNotebookRequest {
            authentication_token: token.to_string(),
            guid,
        })
        .await
    }

    async fn list_linked_notebooks(
        &self,
        token: &str,
    ) -> Result<Vec<LinkedNotebook>, StoreError<ApiError>> {
        self.call(ListLinkedNotebooksRequest {
            authentication_token: token.to_string(),
        })
        .await
    }

    async fn create_linked_notebook(
        &self,
        token: &str,
        linked_notebook: LinkedNotebook,
    ) -> Result<LinkedNotebook, StoreError<ApiError>> {
        self.call(CreateLinkedNotebookRequest {
            authentication_token: token.to_string(),
            linked_notebook,
        })
        .await
    }

    async fn expunge_shared_notebooks(
        &self,
        token: &str,
        ids: &[i64],
    ) -> Result<i32, StoreError<ApiError>> {
        self.call(ExpungeSharedNotebooksRequest {
            authentication_token: token.to_string(),
            shared_notebook_ids: ids.to_vec(),
        })
        .await
    }

    async fn expunge_linked_notebook(
        &self,
        token: &str,
        guid: Uuid,
    ) -> Result<i32, StoreError<ApiError>> {
        self.call(ExpungeLinkedNotebookRequest {
            authentication_token: token.to_string(),
            guid,
        })
        .await
    }
}
