// ── Per-file outcomes and deployment totals ──

use std::path::PathBuf;

use serde::Serialize;

/// Result of uploading one discovered file.
#[derive(Debug, Clone, Serialize)]
pub struct UploadOutcome {
    /// File name (last path component).
    pub file: String,
    pub local_path: PathBuf,
    /// Remote directory the file was sent to.
    pub target_path: String,
    #[serde(flatten)]
    pub status: OutcomeStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeStatus {
    Uploaded { result: serde_json::Value },
    Failed { error: String },
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self.status, OutcomeStatus::Uploaded { .. })
    }
}

/// Totals over every outcome of one deployment.
#[derive(Debug, Clone, Serialize)]
pub struct UploadSummary {
    pub total_files: usize,
    pub success_count: usize,
    pub fail_count: usize,
    pub details: Vec<UploadOutcome>,
}

impl UploadSummary {
    pub fn from_outcomes(details: Vec<UploadOutcome>) -> Self {
        let success_count = details.iter().filter(|o| o.is_success()).count();
        let total_files = details.len();
        Self {
            total_files,
            success_count,
            fail_count: total_files - success_count,
            details,
        }
    }

    /// Outcomes that ended in failure, in walk order.
    pub fn failures(&self) -> impl Iterator<Item = &UploadOutcome> {
        self.details.iter().filter(|o| !o.is_success())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn outcome(file: &str, status: OutcomeStatus) -> UploadOutcome {
        UploadOutcome {
            file: file.into(),
            local_path: PathBuf::from("/src").join(file),
            target_path: "/r/".into(),
            status,
        }
    }

    #[test]
    fn counts_add_up() {
        let summary = UploadSummary::from_outcomes(vec![
            outcome("a", OutcomeStatus::Uploaded { result: json!({}) }),
            outcome("b", OutcomeStatus::Failed { error: "boom".into() }),
            outcome("c", OutcomeStatus::Uploaded { result: json!({}) }),
        ]);

        assert_eq!(summary.total_files, 3);
        assert_eq!(summary.success_count, 2);
        assert_eq!(summary.fail_count, 1);
        assert_eq!(summary.failures().map(|o| o.file.as_str()).collect::<Vec<_>>(), ["b"]);
    }

    #[test]
    fn empty_summary() {
        let summary = UploadSummary::from_outcomes(Vec::new());
        assert_eq!(summary.total_files, 0);
        assert_eq!(summary.success_count + summary.fail_count, 0);
    }

    #[test]
    fn outcome_serializes_with_flat_status() {
        let value = serde_json::to_value(outcome(
            "x.txt",
            OutcomeStatus::Failed { error: "timeout".into() },
        ))
        .expect("serialize");

        assert_eq!(value["status"], "failed");
        assert_eq!(value["error"], "timeout");
        assert_eq!(value["file"], "x.txt");
        assert_eq!(value["target_path"], "/r/");
    }
}
