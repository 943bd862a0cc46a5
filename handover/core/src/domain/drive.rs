// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Drive
//!
//! Capability interface over the file-storage provider.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Anti-Corruption Layer between the transfer flow and the vendor API

// Drive Provider Domain Interface
//
// Exposes exactly the three remote calls the transfer flow needs so that tests
// can substitute an in-memory fake. Implementation in infrastructure/drive_client.rs.

use async_trait::async_trait;

use crate::domain::file::{FileDescriptor, FileId};
use crate::domain::permission::{Permission, PermissionRequest};

/// Domain interface for the file-storage provider
#[async_trait]
pub trait DriveApi: Send + Sync {
    /// Read file metadata restricted to the given field mask
    async fn get_file(&self, file_id: &FileId, fields: &str) -> Result<FileDescriptor, DriveError>;

    /// Create a new permission record on the file
    async fn create_permission(
        &self,
        file_id: &FileId,
        request: &PermissionRequest,
    ) -> Result<Permission, DriveError>;

    /// Update an existing permission record on the file
    async fn update_permission(
        &self,
        file_id: &FileId,
        permission_id: &str,
        request: &PermissionRequest,
    ) -> Result<Permission, DriveError>;
}

/// Errors that can occur while talking to the provider
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DriveError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Credentials error: {0}")]
    Credentials(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Provider error: {0}")]
    Provider(String),
}

impl DriveError {
    /// True when the failure means the file does not exist or is not
    /// visible to the caller. The provider reports unshared files the same
    /// way as missing ones.
    pub fn indicates_missing_file(&self) -> bool {
        matches!(self, DriveError::NotFound(_)) || self.to_string().contains("File not found")
    }
}
