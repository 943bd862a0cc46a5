// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use async_trait::async_trait;
use handover_core::application::{AccessCheck, AccessVerifier, OwnershipTransferService};
use handover_core::domain::config::TransferRequest;
use handover_core::domain::drive::{DriveApi, DriveError};
use handover_core::domain::error::{HandoverError, TransferStep, TROUBLESHOOTING_STEPS};
use handover_core::domain::file::{FileDescriptor, FileId, Owner};
use handover_core::domain::permission::{Permission, PermissionRequest, Role};
use std::sync::{Arc, Mutex};

const ALICE: &str = "alice@example.com";
const BOB: &str = "bob@example.com";

#[derive(Debug, Clone, PartialEq)]
enum Call {
    GetFile { fields: String },
    CreatePermission { role: Role, email: String },
    UpdatePermission { permission_id: String, role: Role, transfer: bool },
}

impl Call {
    fn is_mutation(&self) -> bool {
        !matches!(self, Call::GetFile { .. })
    }
}

struct FakeState {
    file: Option<FileDescriptor>,
    writers: Vec<(String, String)>,
    calls: Vec<Call>,
    get_error: Option<DriveError>,
    create_error: Option<DriveError>,
    update_error: Option<DriveError>,
}

/// In-memory Drive that records calls and applies ownership changes.
struct FakeDrive {
    state: Mutex<FakeState>,
}

impl FakeDrive {
    fn with_owner(email: &str) -> Self {
        Self {
            state: Mutex::new(FakeState {
                file: Some(FileDescriptor {
                    id: "1AbC".to_string(),
                    name: "Quarterly report".to_string(),
                    owners: vec![Owner {
                        email_address: email.to_string(),
                        permission_id: format!("perm-{}", email),
                        display_name: None,
                    }],
                }),
                writers: Vec::new(),
                calls: Vec::new(),
                get_error: None,
                create_error: None,
                update_error: None,
            }),
        }
    }

    fn missing() -> Self {
        let fake = Self::with_owner(ALICE);
        fake.state.lock().unwrap().file = None;
        fake
    }

    fn failing_get(self, err: DriveError) -> Self {
        self.state.lock().unwrap().get_error = Some(err);
        self
    }

    fn failing_create(self, err: DriveError) -> Self {
        self.state.lock().unwrap().create_error = Some(err);
        self
    }

    fn failing_update(self, err: DriveError) -> Self {
        self.state.lock().unwrap().update_error = Some(err);
        self
    }

    fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    fn owner_emails(&self) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state
            .file
            .as_ref()
            .map(|f| f.owners.iter().map(|o| o.email_address.clone()).collect())
            .unwrap_or_default()
    }

    fn writer_emails(&self) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state.writers.iter().map(|(email, _)| email.clone()).collect()
    }
}

#[async_trait]
impl DriveApi for FakeDrive {
    async fn get_file(&self, file_id: &FileId, fields: &str) -> Result<FileDescriptor, DriveError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::GetFile { fields: fields.to_string() });

        if let Some(err) = state.get_error.clone() {
            return Err(err);
        }

        state
            .file
            .clone()
            .ok_or_else(|| DriveError::NotFound(format!("File not found: {}.", file_id)))
    }

    async fn create_permission(
        &self,
        _file_id: &FileId,
        request: &PermissionRequest,
    ) -> Result<Permission, DriveError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::CreatePermission {
            role: request.role,
            email: request.email_address.clone(),
        });

        if let Some(err) = state.create_error.clone() {
            return Err(err);
        }

        let id = format!("perm-{}", request.email_address);
        state.writers.push((request.email_address.clone(), id.clone()));
        Ok(Permission {
            id,
            role: Some(request.role),
            email_address: Some(request.email_address.clone()),
        })
    }

    async fn update_permission(
        &self,
        _file_id: &FileId,
        permission_id: &str,
        request: &PermissionRequest,
    ) -> Result<Permission, DriveError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::UpdatePermission {
            permission_id: permission_id.to_string(),
            role: request.role,
            transfer: request.transfer_ownership,
        });

        if let Some(err) = state.update_error.clone() {
            return Err(err);
        }

        // Only what goes over the wire counts: the permission id names the
        // grantee, the request's email is never sent on an update.
        let grantee = state
            .writers
            .iter()
            .find(|(_, id)| id == permission_id)
            .map(|(email, _)| email.clone())
            .ok_or_else(|| DriveError::NotFound(format!("Permission not found: {}.", permission_id)))?;

        if request.role == Role::Owner && request.transfer_ownership {
            let new_owner = Owner {
                email_address: grantee,
                permission_id: permission_id.to_string(),
                display_name: None,
            };
            if let Some(file) = state.file.as_mut() {
                file.owners = vec![new_owner];
            }
        }

        Ok(Permission {
            id: permission_id.to_string(),
            role: Some(request.role),
            email_address: None,
        })
    }
}

fn request(current: &str, new: &str) -> TransferRequest {
    TransferRequest {
        file_id: FileId::new("1AbC").unwrap(),
        current_owner_email: current.to_string(),
        new_owner_email: new.to_string(),
    }
}

fn service(fake: &Arc<FakeDrive>) -> OwnershipTransferService {
    OwnershipTransferService::new(fake.clone())
}

#[tokio::test]
async fn test_verifier_grants_and_returns_descriptor() {
    let fake = Arc::new(FakeDrive::with_owner(ALICE));
    let verifier = AccessVerifier::new(fake.clone());

    let check = verifier.verify(&FileId::new("1AbC").unwrap()).await;

    assert!(check.is_granted());
    let file = check.descriptor().unwrap();
    assert_eq!(file.name, "Quarterly report");
    assert_eq!(file.owner_emails(), vec![ALICE]);
    assert_eq!(fake.calls(), vec![Call::GetFile { fields: "id, name, owners".into() }]);
}

#[tokio::test]
async fn test_verifier_denies_missing_file_with_hint() {
    let fake = Arc::new(FakeDrive::missing());
    let verifier = AccessVerifier::new(fake.clone());

    for id in ["1AbC", "does-not-exist", "0B-xyz"] {
        let check = verifier.verify(&FileId::new(id).unwrap()).await;
        assert!(!check.is_granted());
        assert_eq!(check.troubleshooting(), Some(&TROUBLESHOOTING_STEPS[..]));
    }
}

#[tokio::test]
async fn test_verifier_hint_from_message_text() {
    let fake = Arc::new(
        FakeDrive::with_owner(ALICE)
            .failing_get(DriveError::Provider("HTTP 400: File not found: 1AbC.".into())),
    );
    let check = AccessVerifier::new(fake).verify(&FileId::new("1AbC").unwrap()).await;

    assert!(!check.is_granted());
    assert!(check.troubleshooting().is_some());
}

#[tokio::test]
async fn test_verifier_denies_other_errors_without_hint() {
    let fake = Arc::new(
        FakeDrive::with_owner(ALICE).failing_get(DriveError::Network("connection reset".into())),
    );
    let check = AccessVerifier::new(fake).verify(&FileId::new("1AbC").unwrap()).await;

    match &check {
        AccessCheck::Denied { reason, file_missing } => {
            assert!(reason.contains("connection reset"));
            assert!(!file_missing);
        }
        other => panic!("expected Denied, got {:?}", other),
    }
    assert!(check.troubleshooting().is_none());
}

#[tokio::test]
async fn test_transfer_happy_path_orders_calls() {
    let fake = Arc::new(FakeDrive::with_owner(ALICE));

    let receipt = service(&fake).transfer(&request(ALICE, BOB)).await.unwrap();

    assert_eq!(receipt.previous_owner, ALICE);
    assert_eq!(receipt.new_owner, BOB);
    assert_eq!(receipt.file_name, "Quarterly report");
    assert_eq!(receipt.writer_permission_id, format!("perm-{}", BOB));

    assert_eq!(
        fake.calls(),
        vec![
            Call::GetFile { fields: "id, name, owners".into() },
            Call::GetFile { fields: "owners".into() },
            Call::CreatePermission { role: Role::Writer, email: BOB.into() },
            Call::UpdatePermission {
                permission_id: format!("perm-{}", BOB),
                role: Role::Owner,
                transfer: true,
            },
        ]
    );
    assert_eq!(fake.owner_emails(), vec![BOB]);
}

#[tokio::test]
async fn test_owner_match_ignores_case() {
    let fake = Arc::new(FakeDrive::with_owner(ALICE));
    let receipt = service(&fake)
        .transfer(&request("Alice@Example.COM", BOB))
        .await
        .unwrap();
    assert_eq!(receipt.previous_owner, ALICE);
}

#[tokio::test]
async fn test_owner_mismatch_issues_no_mutations() {
    for claimed in ["carol@example.com", BOB, "alice@example.org"] {
        let fake = Arc::new(FakeDrive::with_owner(ALICE));

        let err = service(&fake).transfer(&request(claimed, BOB)).await.unwrap_err();

        match err {
            HandoverError::OwnerMismatch { email, .. } => assert_eq!(email, claimed),
            other => panic!("expected OwnerMismatch, got {:?}", other),
        }
        assert_eq!(fake.calls().iter().filter(|c| c.is_mutation()).count(), 0);
    }
}

#[tokio::test]
async fn test_access_denied_stops_before_owner_lookup() {
    let fake = Arc::new(FakeDrive::missing());

    let err = service(&fake).transfer(&request(ALICE, BOB)).await.unwrap_err();

    assert!(matches!(err, HandoverError::AccessDenied { .. }));
    assert!(err.troubleshooting().is_some());
    assert_eq!(fake.calls().len(), 1);
}

#[tokio::test]
async fn test_writer_grant_failure_skips_promotion() {
    let fake = Arc::new(
        FakeDrive::with_owner(ALICE)
            .failing_create(DriveError::PermissionDenied("Sharing is disabled".into())),
    );

    let err = service(&fake).transfer(&request(ALICE, BOB)).await.unwrap_err();

    match err {
        HandoverError::TransferFailed { step, .. } => assert_eq!(step, TransferStep::GrantWriter),
        other => panic!("expected TransferFailed, got {:?}", other),
    }
    assert!(!fake
        .calls()
        .iter()
        .any(|c| matches!(c, Call::UpdatePermission { .. })));
    assert_eq!(fake.owner_emails(), vec![ALICE]);
}

#[tokio::test]
async fn test_promotion_failure_leaves_extra_writer() {
    let fake = Arc::new(
        FakeDrive::with_owner(ALICE)
            .failing_update(DriveError::Provider("HTTP 400: Bad Request".into())),
    );

    let err = service(&fake).transfer(&request(ALICE, BOB)).await.unwrap_err();

    match err {
        HandoverError::TransferFailed { step, .. } => assert_eq!(step, TransferStep::PromoteOwner),
        other => panic!("expected TransferFailed, got {:?}", other),
    }
    assert_eq!(fake.writer_emails(), vec![BOB]);
    assert_eq!(fake.owner_emails(), vec![ALICE]);
}

#[tokio::test]
async fn test_second_run_fails_with_owner_mismatch() {
    let fake = Arc::new(FakeDrive::with_owner(ALICE));
    let service = service(&fake);

    service.transfer(&request(ALICE, BOB)).await.unwrap();
    let calls_after_first = fake.calls().len();

    let err = service.transfer(&request(ALICE, BOB)).await.unwrap_err();

    assert!(matches!(err, HandoverError::OwnerMismatch { .. }));
    let second_run: Vec<_> = fake.calls().into_iter().skip(calls_after_first).collect();
    assert_eq!(second_run.len(), 2);
    assert!(second_run.iter().all(|c| !c.is_mutation()));
}
