// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Google Drive v3 Adapter
//
// Anti-Corruption Layer for the Drive REST API: files.get, permissions.create
// and permissions.update. No retry, pagination or rate-limit handling.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::domain::drive::{DriveApi, DriveError};
use crate::domain::file::{FileDescriptor, FileId};
use crate::domain::permission::{GranteeType, Permission, PermissionRequest, Role};
use crate::infrastructure::service_account::TokenSource;

pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com";

const PERMISSION_FIELDS: &str = "id, emailAddress, role";

pub struct GoogleDriveClient {
    client: Client,
    base_url: String,
    tokens: Arc<dyn TokenSource>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreatePermissionBody<'a> {
    role: Role,
    #[serde(rename = "type")]
    grantee_type: GranteeType,
    email_address: &'a str,
}

#[derive(Serialize)]
struct UpdatePermissionBody {
    role: Role,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl GoogleDriveClient {
    pub fn new(tokens: Arc<dyn TokenSource>) -> Self {
        Self::with_base_url(tokens, DEFAULT_BASE_URL)
    }

    /// Point the client at another host, e.g. a mock server.
    pub fn with_base_url(tokens: Arc<dyn TokenSource>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
        }
    }

    /// `{base}/drive/v3/files/{file_id}/{extra...}` with every id escaped as
    /// a single path segment.
    fn file_url(&self, file_id: &FileId, extra: &[&str]) -> Result<Url, DriveError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| DriveError::Provider(format!("Invalid base URL {}: {}", self.base_url, e)))?;

        url.path_segments_mut()
            .map_err(|_| DriveError::Provider(format!("Base URL cannot carry a path: {}", self.base_url)))?
            .pop_if_empty()
            .extend(["drive", "v3", "files", file_id.as_str()])
            .extend(extra);

        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, DriveError> {
        let token = self.tokens.access_token().await?;

        let response = request
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| DriveError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        Ok(response)
    }
}

/// Map a failed response to a `DriveError`, preferring the provider's own
/// message from its JSON error envelope.
async fn error_from_response(response: Response) -> DriveError {
    let status = response.status();
    let error_text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorEnvelope>(&error_text)
        .map(|envelope| envelope.error.message)
        .unwrap_or(error_text);

    match status {
        StatusCode::UNAUTHORIZED => DriveError::Authentication(message),
        StatusCode::FORBIDDEN => DriveError::PermissionDenied(message),
        StatusCode::NOT_FOUND => DriveError::NotFound(message),
        StatusCode::TOO_MANY_REQUESTS => DriveError::RateLimit(message),
        _ => DriveError::Provider(format!("HTTP {}: {}", status, message)),
    }
}

async fn parse<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, DriveError> {
    response
        .json()
        .await
        .map_err(|e| DriveError::Provider(format!("Failed to parse response: {}", e)))
}

#[async_trait]
impl DriveApi for GoogleDriveClient {
    async fn get_file(&self, file_id: &FileId, fields: &str) -> Result<FileDescriptor, DriveError> {
        debug!(file_id = %file_id, fields, "files.get");

        let request = self
            .client
            .get(self.file_url(file_id, &[])?)
            .query(&[("fields", fields)]);
        parse(self.send(request).await?).await
    }

    async fn create_permission(
        &self,
        file_id: &FileId,
        request: &PermissionRequest,
    ) -> Result<Permission, DriveError> {
        debug!(file_id = %file_id, role = %request.role, email = %request.email_address, "permissions.create");

        let mut query = vec![("fields", PERMISSION_FIELDS)];
        if request.transfer_ownership {
            query.push(("transferOwnership", "true"));
        }

        let body = CreatePermissionBody {
            role: request.role,
            grantee_type: request.grantee_type,
            email_address: &request.email_address,
        };

        let builder = self
            .client
            .post(self.file_url(file_id, &["permissions"])?)
            .query(&query)
            .json(&body);
        parse(self.send(builder).await?).await
    }

    async fn update_permission(
        &self,
        file_id: &FileId,
        permission_id: &str,
        request: &PermissionRequest,
    ) -> Result<Permission, DriveError> {
        debug!(file_id = %file_id, permission_id, role = %request.role, "permissions.update");

        let mut query = vec![("fields", PERMISSION_FIELDS)];
        if request.transfer_ownership {
            query.push(("transferOwnership", "true"));
        }

        let builder = self
            .client
            .patch(self.file_url(file_id, &["permissions", permission_id])?)
            .query(&query)
            .json(&UpdatePermissionBody { role: request.role });
        parse(self.send(builder).await?).await
    }
}
