// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! File
//!
//! Drive file metadata as returned by `files.get`.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** FileId newtype, FileDescriptor and Owner value objects

use serde::{Deserialize, Serialize};
use std::fmt;

/// Field mask used when verifying access to a file.
pub const DESCRIPTOR_FIELDS: &str = "id, name, owners";

/// Field mask used when re-reading only the owner list.
pub const OWNER_FIELDS: &str = "owners";

/// Opaque Drive file identifier. The provider defines its syntax; the only
/// local rule is that it is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(String);

impl FileId {
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry of a file's owner list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    pub email_address: String,

    /// Identifier of the permission record that grants this user ownership.
    #[serde(default)]
    pub permission_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl Owner {
    /// Email addresses are case-insensitive at the provider.
    ///
    /// Deliberately looser than exact string equality: `Alice@Example.com `
    /// matches an owner listed as `alice@example.com`, so a differently cased
    /// or padded env value is not reported as an owner mismatch.
    pub fn has_email(&self, email: &str) -> bool {
        self.email_address.eq_ignore_ascii_case(email.trim())
    }
}

/// Metadata fetched fresh for every operation and never mutated locally.
///
/// Fields absent from the requested field mask deserialize to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub owners: Vec<Owner>,
}

impl FileDescriptor {
    /// First owner whose email matches `email`.
    pub fn find_owner(&self, email: &str) -> Option<&Owner> {
        self.owners.iter().find(|owner| owner.has_email(email))
    }

    pub fn owner_emails(&self) -> Vec<&str> {
        self.owners.iter().map(|o| o.email_address.as_str()).collect()
    }
}
