// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Ownership transfer command

use anyhow::{Context, Result};
use colored::Colorize;
use std::io::Write;
use std::sync::Arc;
use tracing::info;

use handover_core::application::{OwnershipTransferService, TransferReceipt};
use handover_core::domain::config::{TransferConfig, TransferRequest, DRIVE_SCOPE};
use handover_core::domain::drive::DriveApi;
use handover_core::infrastructure::{GoogleDriveClient, ServiceAccountKey, ServiceAccountTokenSource};

/// Authenticate with the configured service account and run the transfer.
pub async fn run(config: &TransferConfig) -> Result<()> {
    let key = ServiceAccountKey::from_file(&config.credentials_path)
        .context("Failed to load service account credentials")?;
    let tokens = ServiceAccountTokenSource::new(key, DRIVE_SCOPE)
        .context("Failed to initialize service account authentication")?;

    info!(service_account = tokens.client_email(), "Authenticating to Google Drive");

    let drive: Arc<dyn DriveApi> = Arc::new(GoogleDriveClient::new(Arc::new(tokens)));
    execute(drive, &config.request, &mut std::io::stdout()).await?;

    Ok(())
}

/// Run the transfer against any Drive implementation and print the outcome.
///
/// Transfer failures come back as [`handover_core::domain::error::HandoverError`]
/// inside the `anyhow::Error`, so callers can still downcast for the checklist.
pub async fn execute(
    drive: Arc<dyn DriveApi>,
    request: &TransferRequest,
    out: &mut impl Write,
) -> Result<TransferReceipt> {
    writeln!(
        out,
        "Transferring ownership of {} from {} to {}...",
        request.file_id.to_string().bold(),
        request.current_owner_email,
        request.new_owner_email
    )?;

    let receipt = OwnershipTransferService::new(drive).transfer(request).await?;

    writeln!(out, "{}", "File access verified:".green())?;
    writeln!(out, "  File Name: {}", receipt.file_name)?;
    writeln!(out, "  File ID: {}", receipt.file_id)?;
    writeln!(
        out,
        "{}",
        format!(
            "✓ Successfully transferred ownership from {} to {}",
            receipt.previous_owner, receipt.new_owner
        )
        .green()
    )?;

    Ok(receipt)
}
