// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Error
//!
//! Terminal failure kinds of a handover run. None of them is retried.

use crate::domain::drive::DriveError;

/// Checklist printed whenever the service account cannot see the file.
pub const TROUBLESHOOTING_STEPS: [&str; 3] = [
    "Make sure the file ID is correct",
    "Share the file with the service account email",
    "Verify the service account has the correct permissions",
];

/// Mutating step of the transfer flow that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStep {
    GrantWriter,
    PromoteOwner,
}

impl std::fmt::Display for TransferStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransferStep::GrantWriter => f.write_str("grant writer access"),
            TransferStep::PromoteOwner => f.write_str("promote to owner"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HandoverError {
    #[error("Missing required environment variables: {}", variables.join(", "))]
    ConfigMissing { variables: Vec<&'static str> },

    #[error("Service account does not have access to file {file_id}: {reason}")]
    AccessDenied { file_id: String, reason: String },

    #[error("File {file_id} is not owned by {email}")]
    OwnerMismatch { file_id: String, email: String },

    #[error("Failed to {step}: {source}")]
    TransferFailed {
        step: TransferStep,
        #[source]
        source: DriveError,
    },
}

impl HandoverError {
    /// Troubleshooting checklist to show alongside the error, if any.
    pub fn troubleshooting(&self) -> Option<&'static [&'static str]> {
        match self {
            HandoverError::AccessDenied { .. } => Some(&TROUBLESHOOTING_STEPS),
            _ => None,
        }
    }
}
