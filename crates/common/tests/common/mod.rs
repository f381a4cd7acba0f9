//! Shared setup for linked notebook routing tests
#![allow(dead_code)]

use ::common::prelude::*;
use time::macros::datetime;
use url::Url;
use uuid::Uuid;

pub const HOME_TOKEN: &str = "S=s1:U=a1:home";
pub const SHARE_TOKEN: &str = "S=s2:U=b2:share";
pub const OWNER_TOKEN: &str = "S=s2:U=b2:owner";

/// Two shards: the caller's home shard and the shard hosting
///  a notebook shared with the caller
pub struct TestShards {
    pub home: MemoryNoteStore,
    pub foreign: MemoryNoteStore,
}

impl TestShards {
    pub fn new() -> Self {
        init_tracing();

        let home = MemoryNoteStore::new();
        home.authorize(HOME_TOKEN);

        let foreign = MemoryNoteStore::new().with_share_on_create();
        foreign.authorize(OWNER_TOKEN);

        Self { home, foreign }
    }

    /// Put a notebook on the foreign shard and share it under
    ///  [`SHARE_TOKEN`], returning the notebook guid and its linked
    ///  notebook as registered on the home shard
    pub fn shared_notebook(&self, name: &str, modifiable: bool) -> (Uuid, LinkedNotebook) {
        let guid = self
            .foreign
            .insert_notebook(Notebook::new(name))
            .guid
            .unwrap();
        let shared = self
            .foreign
            .share_notebook(guid, SHARE_TOKEN, modifiable)
            .unwrap();

        let linked = LinkedNotebook {
            guid: Some(Uuid::new_v4()),
            share_key: Some(shared.share_key),
            share_name: name.to_string(),
            username: "bob".to_string(),
            shard_id: "s2".to_string(),
            uri: None,
        };
        (guid, linked)
    }

    /// Router whose foreign handle runs under `foreign_token`
    pub fn router(&self, foreign_token: &str) -> LinkedStoreRouter<MemoryNoteStore> {
        let home = StoreHandle::new(home_url(), HOME_TOKEN, self.home.clone());
        let foreign = StoreHandle::new(foreign_url(), foreign_token, self.foreign.clone());
        LinkedStoreRouter::new(home, foreign, authentication_result(foreign_token))
    }
}

pub fn home_url() -> Url {
    Url::parse("https://sandbox.example.com/shard/s1/notestore").unwrap()
}

pub fn foreign_url() -> Url {
    Url::parse("https://sandbox.example.com/shard/s2/notestore").unwrap()
}

pub fn authentication_result(token: &str) -> AuthenticationResult {
    AuthenticationResult {
        authentication_token: token.to_string(),
        expiration: datetime!(2030-01-01 0:00 UTC),
        user: User {
            id: 2,
            username: "bob".to_string(),
            name: Some("Bob".to_string()),
            shard_id: "s2".to_string(),
        },
        note_store_url: Some(foreign_url()),
        web_api_url_prefix: None,
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
