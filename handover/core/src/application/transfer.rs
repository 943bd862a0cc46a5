// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Ownership transfer
//!
//! Hands a file over from its current owner to a new one.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Orchestrate verify → confirm owner → grant writer → promote
//!
//! The promotion updates the permission record created by the writer grant,
//! so the new owner is identified by that record's id.
//!
//! Steps run strictly in order and stop at the first failure. There is no
//! rollback: when the promotion fails after the writer grant succeeded, the
//! new owner keeps write access. A second run after a successful transfer
//! fails with [`HandoverError::OwnerMismatch`] because the previous owner is
//! no longer listed.

use std::sync::Arc;

use tracing::{error, info};

use crate::application::access::{AccessCheck, AccessVerifier};
use crate::domain::config::TransferRequest;
use crate::domain::drive::DriveApi;
use crate::domain::error::{HandoverError, TransferStep};
use crate::domain::file::OWNER_FIELDS;
use crate::domain::permission::PermissionRequest;

/// Result of a completed handover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReceipt {
    pub file_id: String,
    pub file_name: String,
    pub previous_owner: String,
    pub new_owner: String,
    /// Permission created for the new owner before promotion.
    pub writer_permission_id: String,
}

pub struct OwnershipTransferService {
    drive: Arc<dyn DriveApi>,
    verifier: AccessVerifier,
}

impl OwnershipTransferService {
    pub fn new(drive: Arc<dyn DriveApi>) -> Self {
        Self {
            verifier: AccessVerifier::new(drive.clone()),
            drive,
        }
    }

    pub async fn transfer(&self, request: &TransferRequest) -> Result<TransferReceipt, HandoverError> {
        let file_id = &request.file_id;

        // 1. The service account must be able to see the file at all
        let file = match self.verifier.verify(file_id).await {
            AccessCheck::Granted(file) => file,
            AccessCheck::Denied { reason, .. } => {
                return Err(HandoverError::AccessDenied {
                    file_id: file_id.to_string(),
                    reason,
                });
            }
        };

        // 2. Fresh owner list
        let owners = self
            .drive
            .get_file(file_id, OWNER_FIELDS)
            .await
            .map_err(|e| HandoverError::AccessDenied {
                file_id: file_id.to_string(),
                reason: e.to_string(),
            })?;

        // 3. Claimed owner must actually own the file
        let current_owner = owners
            .find_owner(&request.current_owner_email)
            .ok_or_else(|| HandoverError::OwnerMismatch {
                file_id: file_id.to_string(),
                email: request.current_owner_email.clone(),
            })?;

        info!(
            file_id = %file_id,
            owner = %current_owner.email_address,
            permission_id = %current_owner.permission_id,
            "Current owner confirmed"
        );

        // 4. Writer access first, so the new owner has a relationship to the file
        let writer = self
            .drive
            .create_permission(file_id, &PermissionRequest::writer(&request.new_owner_email))
            .await
            .map_err(|source| {
                error!(file_id = %file_id, error = %source, "Error granting writer access");
                HandoverError::TransferFailed {
                    step: TransferStep::GrantWriter,
                    source,
                }
            })?;

        info!(
            file_id = %file_id,
            email = %request.new_owner_email,
            permission_id = %writer.id,
            "Writer access granted"
        );

        // 5. Promote the new owner's writer record with the transfer flag.
        // The permission id is what names the new owner on the wire.
        let promoted = self
            .drive
            .update_permission(
                file_id,
                &writer.id,
                &PermissionRequest::ownership(&request.new_owner_email),
            )
            .await
            .map_err(|source| {
                error!(file_id = %file_id, error = %source, "Error transferring ownership");
                HandoverError::TransferFailed {
                    step: TransferStep::PromoteOwner,
                    source,
                }
            })?;

        info!(
            file_id = %file_id,
            permission_id = %promoted.id,
            from = %current_owner.email_address,
            to = %request.new_owner_email,
            "Ownership transferred"
        );

        Ok(TransferReceipt {
            file_id: file.id,
            file_name: file.name,
            previous_owner: current_owner.email_address.clone(),
            new_owner: request.new_owner_email.clone(),
            writer_permission_id: writer.id,
        })
    }
}
