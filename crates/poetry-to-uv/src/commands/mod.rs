//! Command handlers for poetry-to-uv.

use std::process::ExitCode;

pub mod convert;

/// Exit status for poetry-to-uv.
#[derive(Copy, Clone)]
pub enum ExitStatus {
    /// The conversion succeeded, possibly with unresolved dependencies.
    Success,

    /// The conversion failed.
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => Self::from(0),
            ExitStatus::Error => Self::from(2),
        }
    }
}
