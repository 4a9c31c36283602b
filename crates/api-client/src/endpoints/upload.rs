//! Upload endpoint: the service parses the raw file itself.

use super::DataEnvelope;
use crate::client::RouteplanClient;
use crate::error::{ApiError, ApiResult};
use reqwest::multipart::{Form, Part};
use routeplan_core::ingest::FileFormat;
use routeplan_core::model::DeliveryPoint;
use std::path::Path;
use tracing::debug;

/// Upload API interface
#[derive(Clone)]
pub struct UploadApi {
    client: RouteplanClient,
}

impl UploadApi {
    pub(crate) fn new(client: RouteplanClient) -> Self {
        Self { client }
    }

    /// POST /upload with the file at `path` as the `file` part.
    ///
    /// Only `.csv` and `.json` files are sent; anything else fails before the
    /// file is read.
    pub async fn file(&self, path: impl AsRef<Path>) -> ApiResult<Vec<DeliveryPoint>> {
        let path = path.as_ref();
        check_format(&path.display().to_string())?;
        let bytes = tokio::fs::read(path).await.map_err(|source| ApiError::File {
            path: path.display().to_string(),
            source,
        })?;
        let name = path
            .file_name()
            .map_or_else(|| "upload".to_string(), |n| n.to_string_lossy().into_owned());

        self.bytes(name, bytes).await
    }

    /// POST /upload with in-memory contents.
    pub async fn bytes(&self, file_name: String, bytes: Vec<u8>) -> ApiResult<Vec<DeliveryPoint>> {
        let mime = check_format(&file_name)?.mime_type();
        debug!(file = %file_name, size = bytes.len(), mime, "Uploading file");

        let part = Part::bytes(bytes).file_name(file_name).mime_str(mime)?;
        let form = Form::new().part("file", part);

        let envelope: DataEnvelope = self.client.post_multipart("upload", form).await?;
        Ok(envelope.data)
    }
}

fn check_format(name: &str) -> ApiResult<FileFormat> {
    FileFormat::from_path(name).map_err(|_| ApiError::UnsupportedFormat(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::serve_once;
    use std::io::Write;

    #[tokio::test]
    async fn test_upload_sends_file_part() {
        let server = serve_once(
            "200 OK",
            r#"{"data": [{"id": 1, "customer_name": "Acme", "lat": 40.7, "lng": -74.0, "address": "1 Broadway"}]}"#,
        )
        .await;
        let client = RouteplanClient::with_config(server.config()).unwrap();

        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(b"id,customer_name,lat,lng,address\n1,Acme,40.7,-74.0,1 Broadway\n")
            .unwrap();

        let points = client.upload().file(file.path()).await.unwrap();
        assert_eq!(points[0].id, "1");

        let request = server.request().await;
        assert!(request.starts_with("POST /upload "));
        assert!(request.contains("name=\"file\""));
        assert!(request.to_ascii_lowercase().contains("content-type: text/csv"));
        assert!(request.contains("1,Acme,40.7,-74.0,1 Broadway"));
    }

    #[tokio::test]
    async fn test_missing_local_file() {
        let client = RouteplanClient::with_config(Default::default()).unwrap();
        let err = client.upload().file("/no/such/file.csv").await.unwrap_err();
        assert!(matches!(err, ApiError::File { .. }));
    }

    #[tokio::test]
    async fn test_unsupported_extension_is_not_sent() {
        let client = RouteplanClient::with_config(
            crate::config::ClientConfig::default().with_base_url("http://127.0.0.1:9"),
        )
        .unwrap();

        let mut file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        file.write_all(b"not a spreadsheet").unwrap();

        let err = client.upload().file(file.path()).await.unwrap_err();
        assert!(matches!(err, ApiError::UnsupportedFormat(_)));

        let err = client.upload().bytes("orders.txt".into(), b"x".to_vec()).await.unwrap_err();
        assert!(matches!(err, ApiError::UnsupportedFormat(ref name) if name == "orders.txt"));
    }
}
