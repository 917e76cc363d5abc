//! Shared utilities and error types for the voting contract suite.
//!
//! This crate provides:
//! - [`CommonError`]: standardised error codes for shared helpers.
//! - [`admin`]: single administrator slot with a two-step handoff.
//!
//! Contract-specific errors keep their own enums and convert from
//! [`CommonError`] at the call site.

#![no_std]
#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

use soroban_sdk::contracterror;

pub mod admin;

// ── Shared error enum ────────────────────────────────────────────────────────

/// Standardised error codes shared by every contract in the workspace.
///
/// # Code ranges
/// | Range   | Purpose                        |
/// |---------|--------------------------------|
/// | 1 – 9   | Lifecycle / initialisation     |
/// | 10 – 19 | Authentication & authorisation |
/// | 100+    | Reserved for contract-specific |
#[contracterror]
#[derive(Clone, Debug, Eq, PartialEq, Copy)]
#[repr(u32)]
pub enum CommonError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    AccessDenied = 10,
    /// `accept` was called while no successor had been proposed.
    NoPendingTransfer = 11,
}
