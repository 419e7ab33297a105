//! Plumbing shared by the five stage ledgers.
//!
//! Every ledger follows the same write path:
//!
//! ```text
//! require_init → actor.require_auth → role check
//!   → open_stage (exists? terminal? duplicate? predecessor?)
//!   → ledger-specific checks
//!   → advance (registry moves the status)
//!   → store_record + event
//! ```
//!
//! The functions here operate on the storage of whichever ledger contract is
//! currently executing.
//!
//! ## Storage keys
//!
//! - `CONFIG` (instance) → [`LedgerConfig`]
//! - `REC_CTR` (instance) → `u64` last issued record id
//! - `("REC", prescription_id)` (persistent) → the ledger's record type

use soroban_sdk::{
    contracttype, symbol_short, Address, Env, IntoVal, Symbol, TryFromVal, Val,
};

use crate::interfaces::{RegistryClient, RosterClient};
use crate::invoke::lift;
use crate::{LedgerError, Prescription, PrescriptionStatus, RoleRequirement, StageRecord};

pub const TTL_THRESHOLD: u32 = 518_400;
pub const TTL_EXTEND_TO: u32 = 3_110_400;

const CONFIG: Symbol = symbol_short!("CONFIG");
const REC_CTR: Symbol = symbol_short!("REC_CTR");
const RECORD: Symbol = symbol_short!("REC");

/// Wiring shared by every stage ledger.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LedgerConfig {
    pub admin: Address,
    pub registry: Address,
    pub roster: Address,
}

pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

fn record_key(prescription_id: u64) -> (Symbol, u64) {
    (RECORD, prescription_id)
}

/// Stores the wiring once. The deploying admin must authorize it.
pub fn initialize(env: &Env, config: &LedgerConfig) -> Result<(), LedgerError> {
    if env.storage().instance().has(&CONFIG) {
        return Err(LedgerError::AlreadyInitialized);
    }
    config.admin.require_auth();
    env.storage().instance().set(&CONFIG, config);
    extend_instance_ttl(env);
    Ok(())
}

pub fn config(env: &Env) -> Result<LedgerConfig, LedgerError> {
    env.storage()
        .instance()
        .get(&CONFIG)
        .ok_or(LedgerError::NotInitialized)
}

/// Rejects `actor` unless the roster says it satisfies `requirement`.
pub fn require_role(
    env: &Env,
    roster: &Address,
    actor: &Address,
    requirement: &RoleRequirement,
) -> Result<(), LedgerError> {
    let roster = RosterClient::new(env, roster);
    if !roster.satisfies(actor, requirement) {
        return Err(LedgerError::Unauthorized);
    }
    Ok(())
}

/// Loads the prescription and checks it may enter `stage` through this
/// ledger.
///
/// The terminal check runs before the duplicate check, so every write against
/// a delivered prescription reports `InvalidTransition`.
pub fn open_stage(
    env: &Env,
    config: &LedgerConfig,
    prescription_id: u64,
    stage: PrescriptionStatus,
) -> Result<Prescription, LedgerError> {
    let required = stage.predecessor().ok_or(LedgerError::InvalidInput)?;

    let registry = RegistryClient::new(env, &config.registry);
    let prescription = lift(env, registry.try_get(&prescription_id))?;

    if prescription.status.is_terminal() {
        return Err(LedgerError::InvalidTransition);
    }
    if has_record(env, prescription_id) {
        return Err(LedgerError::AlreadyRecorded);
    }
    if prescription.status != required {
        return Err(LedgerError::InvalidTransition);
    }
    Ok(prescription)
}

/// Asks the registry to move `prescription_id` into `stage`, naming the
/// executing contract as the bound ledger.
pub fn advance(
    env: &Env,
    config: &LedgerConfig,
    prescription_id: u64,
    stage: PrescriptionStatus,
    actor: &Address,
    requirement: &RoleRequirement,
) -> Result<(), LedgerError> {
    let from = stage.predecessor().ok_or(LedgerError::InvalidInput)?;
    let registry = RegistryClient::new(env, &config.registry);
    lift(
        env,
        registry.try_advance(
            &env.current_contract_address(),
            &prescription_id,
            &from,
            &stage,
            actor,
            requirement,
        ),
    )
}

pub fn next_record_id(env: &Env) -> u64 {
    let id: u64 = env.storage().instance().get(&REC_CTR).unwrap_or(0) + 1;
    env.storage().instance().set(&REC_CTR, &id);
    extend_instance_ttl(env);
    id
}

/// Issues the next record id and builds a plain stage record for `actor`.
pub fn stamp(env: &Env, prescription_id: u64, actor: &Address) -> StageRecord {
    StageRecord {
        record_id: next_record_id(env),
        prescription_id,
        actor: actor.clone(),
        recorded_at: env.ledger().timestamp(),
    }
}

pub fn store_record<T>(env: &Env, prescription_id: u64, record: &T)
where
    T: IntoVal<Env, Val>,
{
    let key = record_key(prescription_id);
    env.storage().persistent().set(&key, record);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn load_record<T>(env: &Env, prescription_id: u64) -> Option<T>
where
    T: TryFromVal<Env, Val>,
{
    env.storage().persistent().get(&record_key(prescription_id))
}

pub fn has_record(env: &Env, prescription_id: u64) -> bool {
    env.storage().persistent().has(&record_key(prescription_id))
}

/// Number of records written; record ids are issued densely from 1.
pub fn record_count(env: &Env) -> u64 {
    env.storage().instance().get(&REC_CTR).unwrap_or(0)
}
