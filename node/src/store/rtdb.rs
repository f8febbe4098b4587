// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Firebase Realtime Database over its REST API.
//!
//! Conditional writes use the ETag protocol: a GET with
//! `X-Firebase-ETag: true` returns the revision, and a PUT carrying
//! `if-match` is refused with `412 Precondition Failed` when the path moved.

use async_trait::async_trait;
use reqwest::header::{ETAG, IF_MATCH};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;

use super::{segments, KeyedStore, Revision, StoreError, StoreResult, Versioned};

const ETAG_REQUEST_HEADER: &str = "X-Firebase-ETag";

#[derive(Deserialize)]
struct PushResponse {
    name: String,
}

pub struct RtdbStore {
    client: Client,
    base: Url,
    auth: Option<String>,
}

impl RtdbStore {
    /// `base_url` is the database root, e.g. `https://<db>.firebaseio.com/`.
    /// `auth` is sent as the `auth` query parameter when present.
    pub fn new(base_url: &str, auth: Option<String>) -> StoreResult<Self> {
        let base = Url::parse(base_url).map_err(|_| StoreError::InvalidUrl(base_url.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(StoreError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self {
            client: Client::new(),
            base,
            auth,
        })
    }

    /// REST URL for `path`: each segment percent-encoded, `.json` on the last.
    pub fn url(&self, path: &str) -> StoreResult<Url> {
        let parts: Vec<&str> = segments(path).collect();
        let mut url = self.base.clone();
        {
            let mut out = url
                .path_segments_mut()
                .map_err(|_| StoreError::InvalidUrl(self.base.to_string()))?;
            out.pop_if_empty();
            match parts.split_last() {
                Some((last, rest)) => {
                    out.extend(rest);
                    out.push(&format!("{}.json", last));
                }
                None => {
                    out.push(".json");
                }
            }
        }
        if let Some(auth) = &self.auth {
            url.query_pairs_mut().append_pair("auth", auth);
        }
        Ok(url)
    }

    fn check(path: &str, status: StatusCode) -> StoreResult<()> {
        if status.is_success() {
            Ok(())
        } else {
            Err(StoreError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            })
        }
    }
}

fn non_null(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        other => Some(other),
    }
}

#[async_trait]
impl KeyedStore for RtdbStore {
    async fn get(&self, path: &str) -> StoreResult<Option<Value>> {
        let resp = self.client.get(self.url(path)?).send().await?;
        Self::check(path, resp.status())?;
        Ok(non_null(resp.json::<Value>().await?))
    }

    async fn push(&self, collection: &str, value: Value) -> StoreResult<String> {
        let resp = self.client.post(self.url(collection)?).json(&value).send().await?;
        Self::check(collection, resp.status())?;
        let pushed: PushResponse = resp.json().await?;
        Ok(pushed.name)
    }

    async fn read_versioned(&self, path: &str) -> StoreResult<Versioned> {
        let resp = self
            .client
            .get(self.url(path)?)
            .header(ETAG_REQUEST_HEADER, "true")
            .send()
            .await?;
        Self::check(path, resp.status())?;

        let revision = resp
            .headers()
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .map(|v| Revision(v.to_string()))
            .ok_or_else(|| StoreError::MissingRevision(path.to_string()))?;
        let value = non_null(resp.json::<Value>().await?);
        Ok(Versioned { value, revision })
    }

    async fn write_if_unchanged(&self, path: &str, expected: &Revision, value: Value) -> StoreResult<bool> {
        let resp = self
            .client
            .put(self.url(path)?)
            .header(IF_MATCH, expected.0.as_str())
            .json(&value)
            .send()
            .await?;
        if resp.status() == StatusCode::PRECONDITION_FAILED {
            return Ok(false);
        }
        Self::check(path, resp.status())?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_encodes_each_segment() {
        let store = RtdbStore::new("https://stats.firebaseio.com/", None).unwrap();
        let url = store.url("matchUp/Soldier: 76-vs-Wrecking Ball").unwrap();
        assert_eq!(
            url.as_str(),
            "https://stats.firebaseio.com/matchUp/Soldier:%2076-vs-Wrecking%20Ball.json"
        );
        assert_eq!(store.url("").unwrap().as_str(), "https://stats.firebaseio.com/.json");
    }

    #[test]
    fn test_url_carries_auth_and_nested_base() {
        let store = RtdbStore::new("https://host.example/db", Some("s3cret".into())).unwrap();
        let url = store.url("/mapPerformance/").unwrap();
        assert_eq!(url.as_str(), "https://host.example/db/mapPerformance.json?auth=s3cret");
    }

    #[test]
    fn test_rejects_non_base_url() {
        assert!(matches!(
            RtdbStore::new("mailto:someone@example.com", None),
            Err(StoreError::InvalidUrl(_))
        ));
        assert!(RtdbStore::new("not a url", None).is_err());
    }
}
