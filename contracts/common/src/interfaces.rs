//! Cross-contract interfaces.
//!
//! Ledgers talk to their collaborators through these generated clients rather
//! than depending on the collaborator crates, so each contract can be deployed
//! and unit-tested against any implementation of the interface.

#![allow(dead_code)]

use soroban_sdk::{contractclient, Address, Env};

use crate::{LedgerError, Prescription, PrescriptionStatus, Role, RoleRequirement, StageRecord};

#[contractclient(name = "RosterClient")]
pub trait RosterInterface {
    fn authorize(env: Env, identity: Address, role: Role) -> bool;

    fn satisfies(env: Env, identity: Address, requirement: RoleRequirement) -> bool;
}

#[contractclient(name = "RegistryClient")]
pub trait RegistryInterface {
    fn get(env: Env, prescription_id: u64) -> Result<Prescription, LedgerError>;

    fn advance(
        env: Env,
        ledger: Address,
        prescription_id: u64,
        from: PrescriptionStatus,
        to: PrescriptionStatus,
        actor: Address,
        requirement: RoleRequirement,
    ) -> Result<(), LedgerError>;
}

#[contractclient(name = "DeliveryAcceptClient")]
pub trait DeliveryAcceptInterface {
    fn get_record(env: Env, prescription_id: u64) -> Option<StageRecord>;
}
