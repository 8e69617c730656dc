use async_trait::async_trait;
use reqwest::{
    StatusCode,
    header::{AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde_json::json;
use std::time::Duration;
use tracing::instrument;

use crate::gateway::{error::GatewayError, store::PhotoBucket};

/// Photo bucket on a Supabase-compatible storage REST API.
///
/// Uploads and removals are authenticated with the service key; public URLs
/// need no credential.
pub struct StorageBucket {
    client: reqwest::Client,
    base_url: String,
    bucket: String,
    service_key: String,
}

impl StorageBucket {
    pub fn new(base_url: &str, bucket: &str, service_key: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            bucket: bucket.to_string(),
            service_key: service_key.to_string(),
        }
    }

    fn object_url(&self, name: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, name)
    }

    fn auth_headers(&self) -> Result<HeaderMap, GatewayError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.service_key))
            .map_err(|e| GatewayError::Transport(format!("invalid service key: {e}")))?;
        let apikey = HeaderValue::from_str(&self.service_key)
            .map_err(|e| GatewayError::Transport(format!("invalid service key: {e}")))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert("apikey", apikey);
        Ok(headers)
    }
}

/// Storage answers a name collision with 409, or with 400 and a
/// `"error": "Duplicate"` body depending on the server version.
pub(crate) fn is_duplicate(status: StatusCode, body: &str) -> bool {
    status == StatusCode::CONFLICT || body.contains("Duplicate")
}

#[async_trait]
impl PhotoBucket for StorageBucket {
    #[instrument(name = "bucket_upload", skip(self, bytes), fields(size = bytes.len()))]
    async fn upload(&self, name: &str, bytes: Vec<u8>) -> Result<(), GatewayError> {
        let resp = self
            .client
            .post(self.object_url(name))
            .headers(self.auth_headers()?)
            .header(CONTENT_TYPE, "image/jpeg")
            .header(CACHE_CONTROL, "max-age=3600")
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }

        let body = resp.text().await.unwrap_or_default();
        if is_duplicate(status, &body) {
            return Err(GatewayError::Duplicate(format!("object {name} already exists")));
        }
        Err(GatewayError::Transport(format!(
            "upload failed status={status}: {body}"
        )))
    }

    #[instrument(name = "bucket_remove", skip(self))]
    async fn remove(&self, name: &str) -> Result<(), GatewayError> {
        let resp = self
            .client
            .delete(format!("{}/storage/v1/object/{}", self.base_url, self.bucket))
            .headers(self.auth_headers()?)
            .json(&json!({ "prefixes": [name] }))
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        let body = resp.text().await.unwrap_or_default();
        Err(GatewayError::Transport(format!(
            "remove failed status={status}: {body}"
        )))
    }

    fn public_url(&self, name: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_url_uses_public_object_path() {
        let bucket = StorageBucket::new("https://demo.supabase.co/", "photos", "key");
        assert_eq!(
            bucket.public_url("2201001_20260302_075510.jpg"),
            "https://demo.supabase.co/storage/v1/object/public/photos/2201001_20260302_075510.jpg"
        );
        assert_eq!(
            bucket.object_url("a.jpg"),
            "https://demo.supabase.co/storage/v1/object/photos/a.jpg"
        );
    }

    #[test]
    fn recognizes_collision_responses() {
        assert!(is_duplicate(StatusCode::CONFLICT, ""));
        assert!(is_duplicate(
            StatusCode::BAD_REQUEST,
            r#"{"statusCode":"409","error":"Duplicate","message":"The resource already exists"}"#
        ));
        assert!(!is_duplicate(StatusCode::BAD_REQUEST, r#"{"error":"Invalid JWT"}"#));
    }
}
