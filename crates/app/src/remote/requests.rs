//! One request type per note store method.
//!
//! Every body carries the token the call runs under as
//!  `authenticationToken`, next to the method's own arguments.

use serde::Serialize;
use uuid::Uuid;

use common::types::{LinkedNotebook, Note, Notebook, SharedNotebook};

use super::ApiRequest;

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetSharedNotebookByAuthRequest {
    pub authentication_token: String,
}

impl ApiRequest for GetSharedNotebookByAuthRequest {
    type Response = SharedNotebook;
    const METHOD: &'static str = "getSharedNotebookByAuth";
}

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteRequest {
    pub authentication_token: String,
    pub note: Note,
}

impl ApiRequest for CreateNoteRequest {
    type Response = Note;
    const METHOD: &'static str = "createNote";
}

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotebookRequest {
    pub authentication_token: String,
    pub notebook: Notebook,
}

impl ApiRequest for CreateNotebookRequest {
    type Response = Notebook;
    const METHOD: &'static str = "createNotebook";
}

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetNotebookRequest {
    pub authentication_token: String,
    pub guid: Uuid,
}

impl ApiRequest for GetNotebookRequest {
    type Response = Notebook;
    const METHOD: &'static str = "getNotebook";
}

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLinkedNotebooksRequest {
    pub authentication_token: String,
}

impl ApiRequest for ListLinkedNotebooksRequest {
    type Response = Vec<LinkedNotebook>;
    const METHOD: &'static str = "listLinkedNotebooks";
}

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkedNotebookRequest {
    pub authentication_token: String,
    pub linked_notebook: LinkedNotebook,
}

impl ApiRequest for CreateLinkedNotebookRequest {
    type Response = LinkedNotebook;
    const METHOD: &'static str = "createLinkedNotebook";
}

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpungeSharedNotebooksRequest {
    pub authentication_token: String,
    pub shared_notebook_ids: Vec<i64>,
}

impl ApiRequest for ExpungeSharedNotebooksRequest {
    type Response = i32;
    const METHOD: &'static str = "expungeSharedNotebooks";
}

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpungeLinkedNotebookRequest {
    pub authentication_token: String,
    pub guid: Uuid,
}

impl ApiRequest for ExpungeLinkedNotebookRequest {
    type Response = i32;
    const METHOD: &'static str = "expungeLinkedNotebook";
}
