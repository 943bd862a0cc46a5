// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the handover CLI

use colored::Colorize;
use handover_core::domain::error::HandoverError;
use std::io::Write;

pub mod transfer;

/// Print a terminal error, plus the troubleshooting checklist when the
/// failure carries one.
pub fn report_error(out: &mut impl Write, err: &anyhow::Error) -> std::io::Result<()> {
    writeln!(out, "{} {:#}", "Error:".red().bold(), err)?;

    if let Some(steps) = err
        .downcast_ref::<HandoverError>()
        .and_then(HandoverError::troubleshooting)
    {
        writeln!(out)?;
        writeln!(out, "{}", "Troubleshooting steps:".bold())?;
        for (i, step) in steps.iter().enumerate() {
            writeln!(out, "  {}. {}", i + 1, step)?;
        }
    }

    Ok(())
}
