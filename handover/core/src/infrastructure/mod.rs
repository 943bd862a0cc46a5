// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Drive Infrastructure - Anti-Corruption Layer Implementations
//
// Translates between the domain DriveApi interface and the Google Drive v3
// REST API, including service-account authentication.

pub mod drive_client;
pub mod service_account;

pub use drive_client::GoogleDriveClient;
pub use service_account::{ServiceAccountKey, ServiceAccountTokenSource, StaticToken, TokenSource};
