// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Handover core
//!
//! Verifies access to a Google Drive file and hands its ownership over from
//! one account to another.
//!
//! # Architecture
//!
//! - **Layer:** Core System
//! - **Purpose:** Domain model, transfer flow and Drive API adapter

pub mod domain;
pub mod application;
pub mod infrastructure;

pub use domain::*;
