// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Domain
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Value types, errors and the Drive capability interface

pub mod config;
pub mod drive;
pub mod error;
pub mod file;
pub mod permission;
