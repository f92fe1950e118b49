// ── Local tree walk ──
//
// The walk happens in two phases. Planning reads the local tree with an
// explicit stack and produces upload jobs in pre-order (entries sorted by
// name). Execution then streams the jobs through the uploader, at most
// `concurrency` at a time, and yields outcomes in job order.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use futures_util::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::config::WalkOptions;
use crate::error::CoreError;
use crate::ignore::to_slash;
use crate::summary::{OutcomeStatus, UploadOutcome};
use crate::upload::{FileUploader, upload_with_retry};

/// One file to send, with its remote directory already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadJob {
    pub file: String,
    pub local_path: PathBuf,
    pub target_path: String,
}

/// A discovered file: either sendable, or already failed during planning.
enum Planned {
    Upload(UploadJob),
    Rejected(UploadOutcome),
}

struct Entry {
    name: OsString,
    path: PathBuf,
    is_dir: bool,
    /// The entry is a symlink; `is_dir` is only known after following it.
    is_symlink: bool,
}

struct Frame {
    entries: std::vec::IntoIter<Entry>,
    /// Path of this directory relative to the source root.
    relative: PathBuf,
    depth: usize,
}

/// Walks a source directory and uploads every non-ignored file.
pub struct TreeWalker<'a, U> {
    uploader: &'a U,
    options: &'a WalkOptions,
}

impl<'a, U: FileUploader> TreeWalker<'a, U> {
    pub fn new(uploader: &'a U, options: &'a WalkOptions) -> Self {
        Self { uploader, options }
    }

    /// Upload everything under `source` into `remote_root`.
    ///
    /// Per-file upload failures become [`OutcomeStatus::Failed`] and the walk
    /// carries on. Failing to read the local tree aborts with an error.
    pub async fn walk(
        &self,
        source: &Path,
        remote_root: &str,
    ) -> Result<Vec<UploadOutcome>, CoreError> {
        let planned = self.discover(source, remote_root).await?;
        info!("Found {} file(s) to upload", planned.len());

        let outcomes = stream::iter(planned)
            .map(|p| self.settle(p))
            .buffered(self.options.concurrency.max(1))
            .collect()
            .await;
        Ok(outcomes)
    }

    /// Discover files to upload without sending anything.
    pub async fn plan(
        &self,
        source: &Path,
        remote_root: &str,
    ) -> Result<Vec<UploadJob>, CoreError> {
        let planned = self.discover(source, remote_root).await?;
        Ok(planned
            .into_iter()
            .filter_map(|p| match p {
                Planned::Upload(job) => Some(job),
                Planned::Rejected(_) => None,
            })
            .collect())
    }

    async fn discover(&self, source: &Path, remote_root: &str) -> Result<Vec<Planned>, CoreError> {
        let ignore = &self.options.ignore;
        let mut planned = Vec::new();
        let mut stack = vec![Frame {
            entries: read_sorted(source).await?.into_iter(),
            relative: PathBuf::new(),
            depth: 0,
        }];

        while let Some(frame) = stack.last_mut() {
            let Some(entry) = frame.entries.next() else {
                stack.pop();
                continue;
            };

            // Nothing but the name is consulted before this point, so an
            // ignored entry can be unreadable or a dangling link.
            let relative = frame.relative.join(&entry.name);
            if ignore.should_ignore_entry(&relative, entry.is_dir)
                || (entry.is_symlink && ignore.should_ignore_entry(&relative, true))
            {
                debug!(path = %entry.path.display(), "ignored");
                continue;
            }

            let is_dir = if entry.is_symlink {
                tokio::fs::metadata(&entry.path)
                    .await
                    .map_err(|source| CoreError::Io {
                        path: entry.path.clone(),
                        source,
                    })?
                    .is_dir()
            } else {
                entry.is_dir
            };

            if is_dir {
                let depth = frame.depth + 1;
                if let Some(max) = self.options.max_depth {
                    if depth > max {
                        return Err(CoreError::config(format!(
                            "{} is nested deeper than the maximum of {max} directories",
                            entry.path.display()
                        )));
                    }
                }
                stack.push(Frame {
                    entries: read_sorted(&entry.path).await?.into_iter(),
                    relative,
                    depth,
                });
                continue;
            }

            let job = UploadJob {
                file: entry.name.to_string_lossy().into_owned(),
                target_path: remote_dir(remote_root, &frame.relative),
                local_path: entry.path,
            };
            if relative.to_str().is_some() {
                planned.push(Planned::Upload(job));
            } else {
                warn!("Skipping {}: path is not valid UTF-8", job.local_path.display());
                planned.push(Planned::Rejected(UploadOutcome {
                    file: job.file,
                    local_path: job.local_path,
                    target_path: job.target_path,
                    status: OutcomeStatus::Failed {
                        error: "path is not valid UTF-8".into(),
                    },
                }));
            }
        }

        Ok(planned)
    }

    async fn settle(&self, planned: Planned) -> UploadOutcome {
        match planned {
            Planned::Upload(job) => self.run(job).await,
            Planned::Rejected(outcome) => outcome,
        }
    }

    async fn run(&self, job: UploadJob) -> UploadOutcome {
        let status = match upload_with_retry(
            self.uploader,
            &job.local_path,
            &job.target_path,
            &self.options.retry,
        )
        .await
        {
            Ok(result) => {
                info!("Uploaded {} -> {}", job.local_path.display(), job.target_path);
                OutcomeStatus::Uploaded { result }
            }
            Err(err) => {
                warn!("Giving up on {}: {err}", job.local_path.display());
                OutcomeStatus::Failed {
                    error: err.to_string(),
                }
            }
        };

        UploadOutcome {
            file: job.file,
            local_path: job.local_path,
            target_path: job.target_path,
            status,
        }
    }
}

/// Remote directory for files whose parent is `relative_parent` (relative to
/// the source root). Root-level files get `root/`, nested ones `root/a/b`.
pub fn remote_dir(remote_root: &str, relative_parent: &Path) -> String {
    let base = remote_root.trim_end_matches('/');
    let rel = to_slash(relative_parent);
    if rel.is_empty() {
        format!("{base}/")
    } else {
        format!("{base}/{rel}")
    }
}

/// List `dir` sorted by name. Types come from the directory entry itself,
/// so nothing is followed or stat'd here.
async fn read_sorted(dir: &Path) -> Result<Vec<Entry>, CoreError> {
    let io_err = |source: std::io::Error| CoreError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut read = tokio::fs::read_dir(dir).await.map_err(io_err)?;
    let mut entries = Vec::new();
    while let Some(entry) = read.next_entry().await.map_err(io_err)? {
        let file_type = entry.file_type().await.map_err(io_err)?;
        entries.push(Entry {
            name: entry.file_name(),
            path: entry.path(),
            is_dir: file_type.is_dir(),
            is_symlink: file_type.is_symlink(),
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}
