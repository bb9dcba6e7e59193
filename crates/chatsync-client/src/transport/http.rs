//! HTTP data source for history and the conversation list.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use chatsync_core::error::{ChatSyncError, Result};
use chatsync_core::model::{Message, PeerId, SummaryRecord};

use crate::engine::DataSource;

pub struct HttpDataSource {
    http: Client,
    api_base: Url,
    history_limit: u32,
}

impl HttpDataSource {
    pub fn new(api_base: &str, history_limit: u32) -> Result<Self> {
        let api_base = Url::parse(api_base)
            .map_err(|e| ChatSyncError::Config(format!("client.api_base invalid: {e}")))?;
        if api_base.cannot_be_a_base() {
            return Err(ChatSyncError::Config(
                "client.api_base must be a hierarchical URL".into(),
            ));
        }
        Ok(Self {
            http: Client::new(),
            api_base,
            history_limit,
        })
    }

    /// `api_base` with `segments` appended, each one percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| ChatSyncError::Config("client.api_base cannot be a base".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, query: &[(&str, u32)]) -> Result<T> {
        self.http
            .get(url.clone())
            .query(query)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ChatSyncError::Fetch(format!("GET {url}: {e}")))?
            .json()
            .await
            .map_err(|e| ChatSyncError::Fetch(format!("GET {url}: invalid body: {e}")))
    }
}

#[async_trait]
impl DataSource for HttpDataSource {
    async fn fetch_history(&self, peer: &PeerId) -> Result<Vec<Message>> {
        let url = self.endpoint(&["chats", peer.as_str()])?;
        self.get_json(url, &[("offset", 0), ("limit", self.history_limit)])
            .await
    }

    async fn fetch_conversations(&self) -> Result<Vec<SummaryRecord>> {
        let url = self.endpoint(&["chats"])?;
        self.get_json(url, &[]).await
    }
}
