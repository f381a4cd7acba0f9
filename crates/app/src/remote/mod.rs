use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use url::Url;

mod client;
mod error;
pub mod requests;

pub use client::HttpNoteStore;
pub use error::{classify, ApiError, ErrorBody};

/// A single note store method, posted as JSON to `{note store url}/{METHOD}`
pub trait ApiRequest: Serialize + Send + Sized {
    type Response: DeserializeOwned;

    /// The method name appended to the note store URL
    const METHOD: &'static str;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let url = method_url(base_url, Self::METHOD)?;
        Ok(client.post(url).json(&self))
    }
}

/// Append `method` as the last path segment of a note store URL
pub fn method_url(base_url: &Url, method: &str) -> Result<Url, ApiError> {
    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|_| ApiError::InvalidEndpoint(base_url.to_string()))?
        .pop_if_empty()
        .push(method);
    Ok(url)
}
