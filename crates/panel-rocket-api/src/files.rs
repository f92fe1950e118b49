// File manager endpoints
//
// Uploads stream the local file into a multipart part rather than buffering
// it, so memory stays flat regardless of file size.

use std::path::Path;

use reqwest::multipart::{Form, Part};
use serde_json::json;
use tokio_util::io::ReaderStream;
use tracing::debug;

use crate::client::PanelClient;
use crate::error::Error;

impl PanelClient {
    /// Upload one local file into `target_dir` on the server.
    ///
    /// `POST /files/upload` with multipart fields `file`, `path`, and
    /// `overwrite="True"`: an existing remote file of the same name is
    /// always replaced. Returns the response `data`, or
    /// `{"message": "Upload success"}` when the server sends none.
    pub async fn upload_file(
        &self,
        local_path: &Path,
        target_dir: &str,
    ) -> Result<serde_json::Value, Error> {
        let io_err = |source: std::io::Error| Error::Io {
            path: local_path.to_path_buf(),
            source,
        };

        let file = tokio::fs::File::open(local_path).await.map_err(io_err)?;
        let len = file.metadata().await.map_err(io_err)?.len();
        let file_name = local_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        debug!(file = %local_path.display(), target_dir, len, "uploading file");

        let body = reqwest::Body::wrap_stream(ReaderStream::new(file));
        let part = Part::stream_with_length(body, len)
            .file_name(file_name)
            .mime_str("application/octet-stream")?;

        let form = Form::new()
            .part("file", part)
            .text("path", target_dir.to_owned())
            .text("overwrite", "True");

        let data: Option<serde_json::Value> = self.post_multipart("files/upload", form).await?;
        Ok(data
            .filter(|d| !d.is_null())
            .unwrap_or_else(|| json!({ "message": "Upload success" })))
    }
}
