// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Application
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Access verification and ownership transfer use cases

pub mod access;
pub mod transfer;

pub use access::{AccessCheck, AccessVerifier};
pub use transfer::{OwnershipTransferService, TransferReceipt};
