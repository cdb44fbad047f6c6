//! WebDAV implementation of [`ObjectStore`].

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};

use framecast_core::WebdavConfig;

use crate::error::{StorageError, StorageResult};
use crate::traits::{ObjectStore, StoredObject};

/// WebDAV object store client.
///
/// Holds two HTTP clients: a short-timeout one for the reachability probe
/// and a long-timeout one for the actual PUT, so a slow upload never
/// inherits the probe's aggressive deadline (or vice versa).
pub struct WebdavStore {
    config: WebdavConfig,
    probe_client: Client,
    upload_client: Client,
}

impl WebdavStore {
    pub fn new(
        config: WebdavConfig,
        probe_timeout: Duration,
        upload_timeout: Duration,
    ) -> StorageResult<Self> {
        let probe_client = Client::builder()
            .timeout(probe_timeout)
            .build()
            .map_err(|e| StorageError::Config(format!("Failed to build probe client: {}", e)))?;
        let upload_client = Client::builder()
            .timeout(upload_timeout)
            .build()
            .map_err(|e| StorageError::Config(format!("Failed to build upload client: {}", e)))?;

        Ok(Self {
            config,
            probe_client,
            upload_client,
        })
    }

    fn folder_url(&self) -> String {
        format!(
            "{}/{}/",
            self.config.host.trim_end_matches('/'),
            self.config.upload_path.trim_matches('/')
        )
    }

    fn object_url(&self, destination_name: &str) -> String {
        format!(
            "{}/{}/{}",
            self.config.host.trim_end_matches('/'),
            self.config.upload_path.trim_matches('/'),
            urlencoding::encode(destination_name)
        )
    }

    /// Public URL receivers fetch the object from.
    pub fn public_url(&self, destination_name: &str) -> String {
        public_url(&self.config.public_host, destination_name)
    }

    /// Cheap existence probe against the destination folder.
    ///
    /// A 401 or 404 is authoritative and fails the upload. Anything else,
    /// including transport errors and servers that reject PROPFIND outright,
    /// is logged and ignored, so the probe never produces false negatives on
    /// stores that don't support the verb.
    async fn probe_folder(&self) -> StorageResult<()> {
        let url = self.folder_url();
        let method = Method::from_bytes(b"PROPFIND")
            .map_err(|e| StorageError::Config(format!("Invalid probe method: {}", e)))?;

        let response = self
            .probe_client
            .request(method, &url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .header("Depth", "0")
            .send()
            .await;

        match response {
            Ok(resp) => match resp.status() {
                StatusCode::UNAUTHORIZED => Err(StorageError::AuthenticationFailed),
                StatusCode::NOT_FOUND => Err(StorageError::FolderNotFound),
                status if status.is_success() || status == StatusCode::MULTI_STATUS => Ok(()),
                status => {
                    tracing::warn!(
                        url = %url,
                        status = status.as_u16(),
                        "Folder probe returned unexpected status, proceeding with upload"
                    );
                    Ok(())
                }
            },
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Folder probe failed, proceeding with upload");
                Ok(())
            }
        }
    }
}

/// Build the public URL for an object: configured public host plus the
/// URL-encoded destination name.
pub fn public_url(public_host: &str, destination_name: &str) -> String {
    format!(
        "{}/{}",
        public_host.trim_end_matches('/'),
        urlencoding::encode(destination_name)
    )
}

#[async_trait]
impl ObjectStore for WebdavStore {
    #[tracing::instrument(skip(self, local_path), fields(destination = %destination_name))]
    async fn upload(
        &self,
        local_path: &Path,
        destination_name: &str,
    ) -> StorageResult<StoredObject> {
        if !tokio::fs::try_exists(local_path).await.unwrap_or(false) {
            return Err(StorageError::FileNotFound(
                local_path.display().to_string(),
            ));
        }

        self.probe_folder().await?;

        let data = tokio::fs::read(local_path).await?;
        let size = data.len();
        let url = self.object_url(destination_name);

        let response = self
            .upload_client
            .put(&url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .body(data)
            .send()
            .await
            .map_err(StorageError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(
                url = %url,
                status = status.as_u16(),
                "Upload rejected by store"
            );
            return Err(StorageError::from_status(status.as_u16()));
        }

        let public = self.public_url(destination_name);
        tracing::info!(
            destination = %destination_name,
            size_bytes = size,
            public_url = %public,
            "Upload successful"
        );

        Ok(StoredObject {
            name: destination_name.to_string(),
            url: public,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> WebdavConfig {
        WebdavConfig {
            host: "http://127.0.0.1:1/dav/".to_string(),
            username: "alice".to_string(),
            password: "secret".to_string(),
            upload_path: "/uploads/".to_string(),
            public_host: "https://media.example.com".to_string(),
        }
    }

    fn test_store() -> WebdavStore {
        WebdavStore::new(
            test_config(),
            Duration::from_secs(1),
            Duration::from_secs(1),
        )
        .unwrap()
    }

    #[test]
    fn public_url_comes_from_public_host_not_store_host() {
        let store = test_store();
        let url = store.public_url("clip.mp4");
        assert_eq!(url, "https://media.example.com/clip.mp4");
        assert!(!url.contains("127.0.0.1"));
    }

    #[test]
    fn public_url_encodes_destination_name() {
        assert_eq!(
            public_url("https://media.example.com/", "my clip.mp4"),
            "https://media.example.com/my%20clip.mp4"
        );
    }

    #[test]
    fn folder_and_object_urls_normalize_slashes() {
        let store = test_store();
        assert_eq!(store.folder_url(), "http://127.0.0.1:1/dav/uploads/");
        assert_eq!(
            store.object_url("clip.mov"),
            "http://127.0.0.1:1/dav/uploads/clip.mov"
        );
    }

    #[tokio::test]
    async fn missing_local_file_fails_before_any_network_call() {
        let store = test_store();
        let err = store
            .upload(Path::new("/nonexistent/clip.mov"), "clip.mov")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn refused_connection_maps_to_connection_refused() {
        // Port 1 on loopback is closed; the probe soft-fails, then the PUT
        // surfaces the transport error.
        let store = test_store();
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("clip.mov");
        std::fs::write(&file, b"not really a video").unwrap();

        let err = store.upload(&file, "clip.mov").await.unwrap_err();
        assert!(
            matches!(err, StorageError::ConnectionRefused | StorageError::Timeout),
            "unexpected error: {err:?}"
        );
    }
}
