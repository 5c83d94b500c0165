use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Run-level failures. Either one aborts the pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("format error in {}: {message}", path.display())]
    Format { path: PathBuf, message: String },
}

impl PipelineError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn format(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        PipelineError::Format {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Sorts a csv error into the I/O or format bucket.
    pub fn from_csv(path: impl Into<PathBuf>, err: csv::Error) -> Self {
        let path = path.into();
        let line = err.position().map(|pos| pos.line());
        match err.into_kind() {
            csv::ErrorKind::Io(source) => PipelineError::Io { path, source },
            csv::ErrorKind::UnequalLengths {
                expected_len, len, ..
            } => PipelineError::format(
                path,
                format!(
                    "line {}: expected {} fields, found {}",
                    line.unwrap_or(0),
                    expected_len,
                    len
                ),
            ),
            csv::ErrorKind::Utf8 { err, .. } => PipelineError::format(
                path,
                format!("line {}: invalid UTF-8 ({err})", line.unwrap_or(0)),
            ),
            other => PipelineError::format(path, format!("{other:?}")),
        }
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: String,
    pub value: String,
    pub reason: String,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {:?}: {}", self.field, self.value, self.reason)
    }
}

/// A single record failed the customer schema. Carries every offending field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid record: {}", join_issues(.issues))]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    pub fn fields(&self) -> Vec<&str> {
        self.issues.iter().map(|issue| issue.field.as_str()).collect()
    }
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
