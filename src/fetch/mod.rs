//! HTTP transport seam.
//!
//! Sources never talk to `reqwest` directly: they go through an
//! [`HttpClient`], which lets credentials be layered on with the decorators
//! in [`auth`] and lets tests script responses.

mod basic;
mod client;
pub mod auth;

pub use basic::BasicClient;
pub use client::HttpClient;

use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::SourceError;

/// Builds a URL from a base, a path and query pairs.
pub fn build_url(base: &str, path: &str, query: &[(&str, String)]) -> Result<Url, SourceError> {
    let raw = format!("{}{}", base.trim_end_matches('/'), path);
    let mut url = Url::parse(&raw).map_err(|e| SourceError::InvalidUrl(format!("{raw}: {e}")))?;
    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in query {
            pairs.append_pair(key, value);
        }
    }
    Ok(url)
}

/// Issues a GET and returns the body of a 2xx response.
///
/// Non-2xx statuses are classified into [`SourceError`] variants so that
/// 401 and 429 can be reported distinctly.
pub async fn fetch_bytes(client: &dyn HttpClient, url: Url) -> Result<Vec<u8>, SourceError> {
    let url_str = url.to_string();
    let req = reqwest::Request::new(reqwest::Method::GET, url);

    let resp = client.execute(req).await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(SourceError::from_status(status, &url_str));
    }

    let bytes = resp.bytes().await?.to_vec();
    debug!(url = %url_str, bytes = bytes.len(), "Response received");
    Ok(bytes)
}

/// Issues a GET and decodes the 2xx body as JSON.
pub async fn fetch_json<T: DeserializeOwned>(
    client: &dyn HttpClient,
    url: Url,
) -> Result<T, SourceError> {
    let bytes = fetch_bytes(client, url).await?;
    Ok(serde_json::from_slice(&bytes)?)
}
