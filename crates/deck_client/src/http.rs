use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize};
use shared::{
    domain::DeckId,
    protocol::{DrawResponse, NewDeckResponse, ShuffleResponse},
};
use tracing::debug;
use url::Url;

use crate::{error::ServiceError, DeckService};

pub const DEFAULT_API_BASE_URL: &str = "https://deckofcardsapi.com/api/deck";

/// [`DeckService`] backed by the public deck-of-cards HTTP API.
pub struct HttpDeckService {
    http: Client,
    base_url: Url,
}

impl HttpDeckService {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ServiceError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            base_url: parse_base_url(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ServiceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| cannot_be_a_base())?
            .pop_if_empty()
            .extend(segments)
            // Trailing empty segment keeps the service's `/` suffix.
            .push("");
        Ok(url)
    }

    async fn get_json<T>(&self, url: Url, query: Option<(&str, u32)>) -> Result<T, ServiceError>
    where
        T: DeserializeOwned,
    {
        debug!(%url, "deck service request");
        let mut request = self.http.get(url);
        if let Some(pair) = query {
            request = request.query(&[pair]);
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Status(status));
        }
        let raw = response.bytes().await?;
        // Refusals may omit the fields a successful reply carries.
        let flag: ReplyFlag = serde_json::from_slice(&raw).map_err(decode_error)?;
        if !flag.success {
            return Err(ServiceError::Rejected);
        }
        serde_json::from_slice(&raw).map_err(decode_error)
    }
}

#[derive(Deserialize)]
struct ReplyFlag {
    #[serde(default = "default_success")]
    success: bool,
}

fn default_success() -> bool {
    true
}

fn decode_error(err: serde_json::Error) -> ServiceError {
    ServiceError::Decode(err.to_string())
}

fn parse_base_url(raw: &str) -> Result<Url, ServiceError> {
    let url = Url::parse(raw.trim())?;
    if url.cannot_be_a_base() {
        return Err(cannot_be_a_base());
    }
    Ok(url)
}

fn cannot_be_a_base() -> ServiceError {
    ServiceError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase)
}

#[async_trait]
impl DeckService for HttpDeckService {
    async fn new_deck(&self) -> Result<NewDeckResponse, ServiceError> {
        let url = self.endpoint(&["new", "shuffle"])?;
        self.get_json(url, Some(("deck_count", 1))).await
    }

    async fn draw(&self, deck_id: &DeckId) -> Result<DrawResponse, ServiceError> {
        let url = self.endpoint(&[deck_id.as_str(), "draw"])?;
        self.get_json(url, Some(("count", 1))).await
    }

    async fn shuffle(&self, deck_id: &DeckId) -> Result<ShuffleResponse, ServiceError> {
        let url = self.endpoint(&[deck_id.as_str(), "shuffle"])?;
        self.get_json(url, None).await
    }
}

#[cfg(test)]
#[path = "tests/http_tests.rs"]
mod tests;
