// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Access verification
//!
//! Confirms the service account can read a file before anything is changed.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Fetch file metadata and turn every failure into a denied result

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::drive::DriveApi;
use crate::domain::error::TROUBLESHOOTING_STEPS;
use crate::domain::file::{FileDescriptor, FileId, DESCRIPTOR_FIELDS};

const MISSING_FILE_HINT: &str = "check the file ID and that the file is shared with the service account";

/// Outcome of an access check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessCheck {
    Granted(FileDescriptor),
    Denied {
        reason: String,
        /// The provider reported the file as missing (or not shared with us).
        file_missing: bool,
    },
}

impl AccessCheck {
    pub fn is_granted(&self) -> bool {
        matches!(self, AccessCheck::Granted(_))
    }

    pub fn descriptor(&self) -> Option<&FileDescriptor> {
        match self {
            AccessCheck::Granted(file) => Some(file),
            AccessCheck::Denied { .. } => None,
        }
    }

    /// Checklist to show the operator, present only when the file looked missing.
    pub fn troubleshooting(&self) -> Option<&'static [&'static str]> {
        match self {
            AccessCheck::Denied { file_missing: true, .. } => Some(&TROUBLESHOOTING_STEPS),
            _ => None,
        }
    }
}

pub struct AccessVerifier {
    drive: Arc<dyn DriveApi>,
}

impl AccessVerifier {
    pub fn new(drive: Arc<dyn DriveApi>) -> Self {
        Self { drive }
    }

    /// Read `id, name, owners` for the file. Never fails: remote errors are
    /// logged and reported as [`AccessCheck::Denied`].
    pub async fn verify(&self, file_id: &FileId) -> AccessCheck {
        match self.drive.get_file(file_id, DESCRIPTOR_FIELDS).await {
            Ok(file) => {
                info!(
                    file_id = %file.id,
                    file_name = %file.name,
                    owners = ?file.owner_emails(),
                    "File access verified"
                );
                AccessCheck::Granted(file)
            }
            Err(e) => {
                let file_missing = e.indicates_missing_file();
                // The full checklist is printed once by the caller
                if file_missing {
                    warn!(file_id = %file_id, error = %e, hint = MISSING_FILE_HINT, "File access error");
                } else {
                    warn!(file_id = %file_id, error = %e, "File access error");
                }
                AccessCheck::Denied {
                    reason: e.to_string(),
                    file_missing,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::drive::DriveError;
    use crate::domain::permission::{Permission, PermissionRequest};
    use async_trait::async_trait;
    use std::io::Write;
    use std::sync::Mutex;
    use tracing_subscriber::fmt::MakeWriter;

    struct FailingDrive(DriveError);

    #[async_trait]
    impl DriveApi for FailingDrive {
        async fn get_file(&self, _file_id: &FileId, _fields: &str) -> Result<FileDescriptor, DriveError> {
            Err(self.0.clone())
        }

        async fn create_permission(
            &self,
            _file_id: &FileId,
            _request: &PermissionRequest,
        ) -> Result<Permission, DriveError> {
            Err(self.0.clone())
        }

        async fn update_permission(
            &self,
            _file_id: &FileId,
            _permission_id: &str,
            _request: &PermissionRequest,
        ) -> Result<Permission, DriveError> {
            Err(self.0.clone())
        }
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogBuffer {
        type Writer = LogBuffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    async fn verify_with_logs(err: DriveError) -> (AccessCheck, String) {
        let logs = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let verifier = AccessVerifier::new(Arc::new(FailingDrive(err)));
        let check = verifier.verify(&FileId::new("1AbC").unwrap()).await;
        (check, logs.contents())
    }

    #[tokio::test]
    async fn test_missing_file_logs_single_hint() {
        let (check, logs) = verify_with_logs(DriveError::NotFound("File not found: 1AbC.".into())).await;

        assert_eq!(check.troubleshooting(), Some(&TROUBLESHOOTING_STEPS[..]));
        assert_eq!(logs.matches("File access error").count(), 1, "logs: {}", logs);
        assert_eq!(logs.matches("hint=").count(), 1, "logs: {}", logs);
        for step in TROUBLESHOOTING_STEPS {
            assert!(!logs.contains(step), "logs: {}", logs);
        }
    }

    #[tokio::test]
    async fn test_other_errors_log_without_hint() {
        let (check, logs) = verify_with_logs(DriveError::Network("connection reset".into())).await;

        assert!(check.troubleshooting().is_none());
        assert!(logs.contains("connection reset"), "logs: {}", logs);
        assert!(!logs.contains("hint="), "logs: {}", logs);
    }
}
