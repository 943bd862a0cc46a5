// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Config
//!
//! Run configuration, built once at startup and passed into the operations.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Explicit configuration instead of ambient environment reads
//!
//! Library code never reads the environment. The binary calls
//! [`TransferConfig::from_env`] once; tests use [`TransferConfig::from_lookup`].

use std::path::PathBuf;

use crate::domain::error::HandoverError;
use crate::domain::file::FileId;

pub const FILE_ID_VAR: &str = "FILE_ID";
pub const CURRENT_OWNER_EMAIL_VAR: &str = "CURRENT_OWNER_EMAIL";
pub const NEW_OWNER_EMAIL_VAR: &str = "NEW_OWNER_EMAIL";

/// Standard Google variable pointing at a service-account key file.
pub const CREDENTIALS_PATH_VAR: &str = "GOOGLE_APPLICATION_CREDENTIALS";

/// Key file looked up in the working directory when no override is set.
pub const DEFAULT_CREDENTIALS_FILE: &str = "credentials.json";

/// Full read/write access to the user's Drive, required to change owners.
pub const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";

/// What to hand over, and from whom to whom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub file_id: FileId,
    pub current_owner_email: String,
    pub new_owner_email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferConfig {
    pub request: TransferRequest,
    pub credentials_path: PathBuf,
}

impl TransferConfig {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Result<Self, HandoverError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    ///
    /// Absent and blank values both count as missing. Every missing variable
    /// is reported at once.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, HandoverError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let file_id = read(FILE_ID_VAR).and_then(FileId::new);
        let current_owner_email = read(CURRENT_OWNER_EMAIL_VAR);
        let new_owner_email = read(NEW_OWNER_EMAIL_VAR);

        match (file_id, current_owner_email, new_owner_email) {
            (Some(file_id), Some(current_owner_email), Some(new_owner_email)) => {
                let credentials_path = read(CREDENTIALS_PATH_VAR)
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_CREDENTIALS_FILE));

                Ok(Self {
                    request: TransferRequest {
                        file_id,
                        current_owner_email,
                        new_owner_email,
                    },
                    credentials_path,
                })
            }
            (file_id, current, new) => {
                let mut variables = Vec::new();
                if file_id.is_none() {
                    variables.push(FILE_ID_VAR);
                }
                if current.is_none() {
                    variables.push(CURRENT_OWNER_EMAIL_VAR);
                }
                if new.is_none() {
                    variables.push(NEW_OWNER_EMAIL_VAR);
                }
                Err(HandoverError::ConfigMissing { variables })
            }
        }
    }
}
