//! Shared types, errors and ledger plumbing for the prescription custody suite.
//!
//! This crate provides:
//! - [`LedgerError`]: the single error enum returned by every custody contract,
//!   so a failure inside a nested cross-contract call reaches the outermost
//!   caller with its original code.
//! - [`types`]: roles, lifecycle status, prescriptions and stage records.
//! - [`interfaces`]: `contractclient` interfaces the ledgers use to reach the
//!   roster, the registry and the delivery-accept ledger.
//! - [`stage`]: storage and wiring helpers shared by the five stage ledgers.
//! - [`allow_list`]: fixed construction-time allow-lists.
//! - [`replay`]: folds the lifecycle event stream back into statuses.

#![no_std]
#![allow(clippy::arithmetic_side_effects)]
#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

use soroban_sdk::contracterror;

// ── Modules ──────────────────────────────────────────────────────────────────

pub mod allow_list;
pub mod interfaces;
pub mod invoke;
pub mod replay;
pub mod stage;
pub mod types;

pub use interfaces::*;
pub use replay::*;
pub use types::*;

// ── Shared error enum ────────────────────────────────────────────────────────

/// Error codes shared by every custody contract.
///
/// # Code ranges
/// | Range   | Purpose                        |
/// |---------|--------------------------------|
/// | 1 – 9   | Lifecycle / initialisation     |
/// | 10 – 19 | Authorisation                  |
/// | 20 – 29 | Missing entities               |
/// | 30 – 39 | Validation / input             |
/// | 40 – 49 | Workflow state                 |
/// | 50 – 59 | Integrity faults               |
#[contracterror]
#[derive(Clone, Debug, Eq, PartialEq, Copy)]
#[repr(u32)]
pub enum LedgerError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    /// The acting identity does not satisfy the operation's role requirement.
    Unauthorized = 10,
    NotFound = 20,
    /// A record that the workflow guarantees must exist is absent.
    MissingPredecessor = 21,
    InvalidInput = 30,
    /// Current status is not the required predecessor, or the prescription is
    /// already delivered.
    InvalidTransition = 40,
    AlreadyRecorded = 41,
    AlreadyRegistered = 42,
    AlreadyBound = 43,
    Paused = 44,
    /// A wired contract aborted instead of returning a `LedgerError`.
    IntegrityFault = 50,
}
