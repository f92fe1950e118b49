// ── Single-file upload with retry ──
//
// The walker talks to a `FileUploader` rather than the HTTP client directly,
// so the retry and traversal logic can run against any sink.

use std::future::Future;
use std::path::Path;

use panel_rocket_api::PanelClient;
use tracing::{info, warn};

use crate::config::RetryPolicy;
use crate::error::CoreError;

/// Something that can place one local file into one remote directory.
pub trait FileUploader: Sync {
    /// Upload `local_path` into `target_dir`, replacing any file of the
    /// same name. Failures are reported as [`CoreError::Upload`].
    fn upload_file(
        &self,
        local_path: &Path,
        target_dir: &str,
    ) -> impl Future<Output = Result<serde_json::Value, CoreError>> + Send;
}

impl FileUploader for PanelClient {
    async fn upload_file(
        &self,
        local_path: &Path,
        target_dir: &str,
    ) -> Result<serde_json::Value, CoreError> {
        PanelClient::upload_file(self, local_path, target_dir)
            .await
            .map_err(|e| CoreError::Upload {
                path: local_path.to_path_buf(),
                message: e.to_string(),
            })
    }
}

/// Upload with up to `policy.max_attempts` tries and a fixed pause between
/// them. After the last failure that failure is returned as-is.
pub async fn upload_with_retry<U: FileUploader + ?Sized>(
    uploader: &U,
    local_path: &Path,
    target_dir: &str,
    policy: &RetryPolicy,
) -> Result<serde_json::Value, CoreError> {
    let attempts = policy.attempts();
    let mut attempt = 1;

    loop {
        match uploader.upload_file(local_path, target_dir).await {
            Ok(result) => return Ok(result),
            Err(err) => {
                warn!(
                    "Upload attempt {attempt}/{attempts} failed for {}: {err}",
                    local_path.display()
                );
                if attempt >= attempts {
                    return Err(err);
                }
                info!("Retrying in {}ms...", policy.delay.as_millis());
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::future::Future;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    use serde_json::json;

    use super::FileUploader;
    use crate::error::CoreError;

    /// In-memory uploader that fails a scripted number of times per file.
    #[derive(Default)]
    pub(crate) struct ScriptedUploader {
        failures: Mutex<HashMap<String, u32>>,
        calls: Mutex<Vec<(PathBuf, String)>>,
    }

    impl ScriptedUploader {
        /// Fail the next `times` uploads of any file whose name is `name`.
        pub(crate) fn fail(self, name: &str, times: u32) -> Self {
            self.failures.lock().unwrap().insert(name.to_owned(), times);
            self
        }

        pub(crate) fn calls(&self) -> Vec<(PathBuf, String)> {
            self.calls.lock().unwrap().clone()
        }

        fn record(
            &self,
            local_path: &Path,
            target_dir: &str,
        ) -> Result<serde_json::Value, CoreError> {
            self.calls
                .lock()
                .unwrap()
                .push((local_path.to_path_buf(), target_dir.to_owned()));

            let name = local_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let mut failures = self.failures.lock().unwrap();
            match failures.get_mut(&name) {
                Some(remaining) if *remaining > 0 => {
                    *remaining = remaining.saturating_sub(1);
                    Err(CoreError::Upload {
                        path: local_path.to_path_buf(),
                        message: "HTTP 502".into(),
                    })
                }
                _ => Ok(json!({ "name": name })),
            }
        }
    }

    impl FileUploader for ScriptedUploader {
        fn upload_file(
            &self,
            local_path: &Path,
            target_dir: &str,
        ) -> impl Future<Output = Result<serde_json::Value, CoreError>> + Send {
            let result = self.record(local_path, target_dir);
            async move { result }
        }
    }
}
