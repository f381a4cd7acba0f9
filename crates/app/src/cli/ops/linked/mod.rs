use std::fs;
use std::path::PathBuf;

use clap::Args;
use time::OffsetDateTime;
use url::Url;
use uuid::Uuid;

use common::linked::{find_linked_notebook, LinkedStoreError, LinkedStoreRouter};
use common::types::{AuthenticationResult, LinkedNotebook};
use shardnote::remote::{ApiError, HttpNoteStore};

use crate::cli::op::{Op, OpContext};

pub mod create_note;
pub mod delete;
pub mod list;
pub mod notebook;
pub mod share;
pub mod writable;

crate::command_enum! {
    (List, list::List),
    (Share, share::Share),
    (CreateNote, create_note::CreateNote),
    (Delete, delete::Delete),
    (Notebook, notebook::ShowNotebook),
    (Writable, writable::Writable),
}

pub type LinkedCommand = Command;

#[derive(Args, Debug, Clone)]
pub struct Linked {
    #[command(subcommand)]
    pub command: LinkedCommand,
}

#[async_trait::async_trait]
impl Op for Linked {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}

/// Where a linked notebook command finds its two shards
#[derive(Args, Debug, Clone)]
pub struct Session {
    /// JSON file holding the authentication result for the shared notebook
    #[arg(long)]
    pub auth: PathBuf,

    /// Note store URL of your home shard (defaults to the configured one)
    #[arg(long)]
    pub home_url: Option<Url>,

    /// Access token for your home shard
    #[arg(long)]
    pub home_token: String,

    /// Note store URL of the shard hosting the shared notebook
    /// (defaults to the one in the authentication result)
    #[arg(long)]
    pub foreign_url: Option<Url>,
}

#[derive(Debug, thiserror::Error)]
pub enum LinkedOpError {
    #[error("failed to read authentication result {path}: {source}")]
    ReadAuth {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid authentication result: {0}")]
    ParseAuth(#[from] serde_json::Error),
    #[error("no home note store URL; pass --home-url or set home_note_store_url in the config")]
    MissingHomeUrl,
    #[error("no note store URL for the shared notebook; pass --foreign-url")]
    MissingForeignUrl,
    #[error("HTTP client error: {0}")]
    Api(#[from] ApiError),
    #[error(transparent)]
    Store(#[from] LinkedStoreError<ApiError>),
    #[error("no linked notebook with guid {0}")]
    UnknownLinkedNotebook(Uuid),
}

impl Session {
    pub fn load_authentication(&self) -> Result<AuthenticationResult, LinkedOpError> {
        let raw = fs::read_to_string(&self.auth).map_err(|source| LinkedOpError::ReadAuth {
            path: self.auth.clone(),
            source,
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Build the router for this session, falling back to the configured
    ///  home shard and the shard named in the authentication result
    pub fn router(&self, ctx: &OpContext) -> Result<LinkedStoreRouter<HttpNoteStore>, LinkedOpError> {
        let auth = self.load_authentication()?;
        if auth.is_expired_at(OffsetDateTime::now_utc()) {
            tracing::warn!(
                "authentication result in {} expired at {}",
                self.auth.display(),
                auth.expiration
            );
        }

        let home_url = self
            .home_url
            .clone()
            .or_else(|| ctx.config.home_note_store_url.clone())
            .ok_or(LinkedOpError::MissingHomeUrl)?;
        let foreign_url = self
            .foreign_url
            .clone()
            .or_else(|| auth.note_store_url.clone())
            .ok_or(LinkedOpError::MissingForeignUrl)?;

        tracing::debug!(home = %home_url, foreign = %foreign_url, "linked notebook session");

        let home = HttpNoteStore::new(&home_url)?.bind(self.home_token.clone());
        let foreign = HttpNoteStore::new(&foreign_url)?;
        Ok(LinkedStoreRouter::from_authentication(
            home,
            foreign_url,
            foreign,
            auth,
        ))
    }
}

/// Look a linked notebook up in the home catalog by guid
pub async fn lookup(
    router: &LinkedStoreRouter<HttpNoteStore>,
    guid: Uuid,
) -> Result<LinkedNotebook, LinkedOpError> {
    let catalog = router.list_linked_notebooks().await?;
    find_linked_notebook(&catalog, guid)
        .cloned()
        .ok_or(LinkedOpError::UnknownLinkedNotebook(guid))
}

pub fn describe(linked: &LinkedNotebook) -> String {
    format!(
        "{} (guid: {} | owner: {} | shard: {})",
        linked.share_name,
        linked
            .guid
            .map(|guid| guid.to_string())
            .unwrap_or_else(|| "-".to_string()),
        linked.username,
        linked.shard_id
    )
}
