// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Permission
//!
//! Sharing permission requests and the records the provider returns for them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role granted by a permission record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Reader,
    Commenter,
    Writer,
    Owner,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let role = match self {
            Role::Reader => "reader",
            Role::Commenter => "commenter",
            Role::Writer => "writer",
            Role::Owner => "owner",
        };
        f.write_str(role)
    }
}

/// Kind of principal a permission applies to. Only individual users take
/// part in ownership transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GranteeType {
    User,
}

/// A permission to create or update, built per call and dropped afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionRequest {
    pub role: Role,
    pub grantee_type: GranteeType,
    pub email_address: String,
    pub transfer_ownership: bool,
}

impl PermissionRequest {
    /// Write access for `email`.
    pub fn writer(email: impl Into<String>) -> Self {
        Self {
            role: Role::Writer,
            grantee_type: GranteeType::User,
            email_address: email.into(),
            transfer_ownership: false,
        }
    }

    /// Ownership for `email`, with the transfer flag the provider requires
    /// for any change of owner.
    pub fn ownership(email: impl Into<String>) -> Self {
        Self {
            role: Role::Owner,
            grantee_type: GranteeType::User,
            email_address: email.into(),
            transfer_ownership: true,
        }
    }
}

/// Permission record as echoed back by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
}
