use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use url::Url;
use uuid::Uuid;

/// A single note. The store assigns `guid` and the timestamps on creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guid: Option<Uuid>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// The notebook the note lives in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notebook_guid: Option<Uuid>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created: Option<OffsetDateTime>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated: Option<OffsetDateTime>,
}

impl Note {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notebook {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guid: Option<Uuid>,
    pub name: String,
    /// Sharing records the store attached to this notebook,
    ///  in the order the store returned them
    #[serde(default)]
    pub shared_notebooks: Vec<SharedNotebook>,
    /// What the authenticated caller may not do with this notebook.
    ///  `None` means no restrictions at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restrictions: Option<NotebookRestrictions>,
}

impl Notebook {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotebookRestrictions {
    pub no_create_notes: bool,
    pub no_update_notes: bool,
    pub no_expunge_notes: bool,
    pub no_share_notes: bool,
    pub no_update_notebook: bool,
}

impl NotebookRestrictions {
    /// Notes can be read but not created, updated or expunged
    pub fn read_only() -> Self {
        Self {
            no_create_notes: true,
            no_update_notes: true,
            no_expunge_notes: true,
            ..Default::default()
        }
    }
}

/// The owner-side record of a notebook being shared.
///
/// Lives on the shard of the account that owns the notebook and
///  is only ever fetched, never built, by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedNotebook {
    pub id: i64,
    pub share_key: String,
    pub notebook_guid: Uuid,
    #[serde(default)]
    pub notebook_modifiable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// The recipient-side record of a shared notebook, kept in the
///  catalog of the recipient's home shard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedNotebook {
    /// Assigned by the home store when the notebook is linked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guid: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_key: Option<String>,
    pub share_name: String,
    /// Username of the account that owns the shared notebook
    pub username: String,
    /// Shard hosting the shared notebook
    pub shard_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub shard_id: String,
}

/// The result of authenticating against the store, either as the
///  account itself or against a notebook another account shared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationResult {
    pub authentication_token: String,
    #[serde(with = "time::serde::rfc3339")]
    pub expiration: OffsetDateTime,
    pub user: User,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note_store_url: Option<Url>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_api_url_prefix: Option<Url>,
}

impl AuthenticationResult {
    /// Whether the token has expired as of `now`
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        now >= self.expiration
    }
}
