//! # Prescription Registry
//!
//! The arena that owns canonical prescription state. Doctors create
//! prescriptions here; every later stage is entered only through
//! [`PrescriptionRegistryContract::advance`], which accepts calls solely from
//! the ledger contract bound to the target stage.
//!
//! ## Lifecycle
//!
//! ```text
//! Created → Dispensed → DeliveryAccepted → LogisticsReceived
//!         → LogisticsAccepted → Delivered (terminal)
//! ```
//!
//! Each successful `advance` appends a hash-chained [`TransitionRecord`] (see
//! [`history`]), so `status.ordinal()` always equals the history length.
//!
//! ## Storage keys
//!
//! - `ADMIN`, `ROSTER`, `INIT`, `RX_CTR`, `PAUSED` (instance)
//! - `("STAGE", status)` (instance) → bound ledger `Address`
//! - `("RX", id)` (persistent) → [`Prescription`]
//! - `("PAT_RX", patient)` / `("DOC_RX", doctor)` (persistent) → `Vec<u64>`
//! - `("RX_HIST", id)` / `("RX_LAST", id)` (persistent) → history chain

#![no_std]

#[cfg(test)]
extern crate std;

pub mod events;
pub mod history;


use common::stage::{extend_instance_ttl, TTL_EXTEND_TO, TTL_THRESHOLD};
use common::RosterClient;
pub use common::{
    LedgerError, Prescription, PrescriptionStatus, Role, RoleRequirement, TransitionRecord,
};
use soroban_sdk::{contract, contractimpl, symbol_short, Address, Env, String, Symbol, Vec};

const ADMIN: Symbol = symbol_short!("ADMIN");
const ROSTER: Symbol = symbol_short!("ROSTER");
const INITIALIZED: Symbol = symbol_short!("INIT");
const RX_CTR: Symbol = symbol_short!("RX_CTR");
const PAUSED: Symbol = symbol_short!("PAUSED");
const STAGE: Symbol = symbol_short!("STAGE");
const RX: Symbol = symbol_short!("RX");
const PAT_RX: Symbol = symbol_short!("PAT_RX");
const DOC_RX: Symbol = symbol_short!("DOC_RX");

fn rx_key(id: u64) -> (Symbol, u64) {
    (RX, id)
}

fn save_prescription(env: &Env, prescription: &Prescription) {
    let key = rx_key(prescription.id);
    env.storage().persistent().set(&key, prescription);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

fn push_index(env: &Env, key: (Symbol, Address), id: u64) {
    let mut ids: Vec<u64> = env
        .storage()
        .persistent()
        .get(&key)
        .unwrap_or(Vec::new(env));
    ids.push_back(id);
    env.storage().persistent().set(&key, &ids);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

fn read_index(env: &Env, key: (Symbol, Address)) -> Vec<u64> {
    env.storage()
        .persistent()
        .get(&key)
        .unwrap_or(Vec::new(env))
}

#[contract]
pub struct PrescriptionRegistryContract;

#[contractimpl]
impl PrescriptionRegistryContract {
    /// Initialize the registry with its admin and the roster it authorizes
    /// doctors and stage actors against.
    pub fn initialize(env: Env, admin: Address, roster: Address) -> Result<(), LedgerError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(LedgerError::AlreadyInitialized);
        }

        env.storage().instance().set(&ADMIN, &admin);
        env.storage().instance().set(&ROSTER, &roster);
        env.storage().instance().set(&INITIALIZED, &true);
        extend_instance_ttl(&env);

        events::publish_initialized(&env, admin, roster);
        Ok(())
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    pub fn get_admin(env: Env) -> Result<Address, LedgerError> {
        env.storage()
            .instance()
            .get(&ADMIN)
            .ok_or(LedgerError::NotInitialized)
    }

    pub fn get_roster(env: Env) -> Result<Address, LedgerError> {
        env.storage()
            .instance()
            .get(&ROSTER)
            .ok_or(LedgerError::NotInitialized)
    }

    /// Name the only ledger allowed to move prescriptions into `stage`.
    ///
    /// Bindings are permanent: rebinding a stage returns `AlreadyBound`.
    pub fn bind_ledger(
        env: Env,
        caller: Address,
        stage: PrescriptionStatus,
        ledger: Address,
    ) -> Result<(), LedgerError> {
        Self::require_admin(&env, &caller)?;

        if stage == PrescriptionStatus::Created {
            return Err(LedgerError::InvalidInput);
        }
        let key = (STAGE, stage);
        if env.storage().instance().has(&key) {
            return Err(LedgerError::AlreadyBound);
        }
        env.storage().instance().set(&key, &ledger);
        extend_instance_ttl(&env);

        events::publish_ledger_bound(&env, stage, ledger);
        Ok(())
    }

    pub fn get_stage_ledger(env: Env, stage: PrescriptionStatus) -> Option<Address> {
        env.storage().instance().get(&(STAGE, stage))
    }

    /// Issue a new prescription. `doctor` must hold the `Doctor` role and
    /// `patient` the `Patient` role, since only the named patient can later
    /// confirm delivery.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn create(
        env: Env,
        doctor: Address,
        patient: Address,
        payload: String,
    ) -> Result<u64, LedgerError> {
        Self::require_init(&env)?;
        Self::require_not_paused(&env)?;
        doctor.require_auth();

        let roster = RosterClient::new(&env, &Self::get_roster(env.clone())?);
        if !roster.authorize(&doctor, &Role::Doctor) {
            return Err(LedgerError::Unauthorized);
        }
        if payload.len() == 0 {
            return Err(LedgerError::InvalidInput);
        }
        if !roster.authorize(&patient, &Role::Patient) {
            return Err(LedgerError::InvalidInput);
        }

        let id: u64 = env.storage().instance().get(&RX_CTR).unwrap_or(0) + 1;
        env.storage().instance().set(&RX_CTR, &id);
        extend_instance_ttl(&env);

        let now = env.ledger().timestamp();
        let prescription = Prescription {
            id,
            doctor: doctor.clone(),
            patient: patient.clone(),
            payload,
            created_at: now,
            updated_at: now,
            status: PrescriptionStatus::Created,
        };
        save_prescription(&env, &prescription);
        push_index(&env, (PAT_RX, patient.clone()), id);
        push_index(&env, (DOC_RX, doctor.clone()), id);

        events::publish_prescription_created(&env, id, doctor, patient);
        Ok(id)
    }

    /// Move a prescription exactly one stage forward.
    ///
    /// Only the ledger bound to `to` may call this, naming itself as `ledger`.
    /// `from` must equal the current status, `to` must be its successor, and
    /// `actor` must satisfy `requirement` in the roster.
    pub fn advance(
        env: Env,
        ledger: Address,
        prescription_id: u64,
        from: PrescriptionStatus,
        to: PrescriptionStatus,
        actor: Address,
        requirement: RoleRequirement,
    ) -> Result<(), LedgerError> {
        Self::require_init(&env)?;
        Self::require_not_paused(&env)?;
        ledger.require_auth();

        match Self::get_stage_ledger(env.clone(), to) {
            Some(bound) if bound == ledger => {}
            _ => return Err(LedgerError::Unauthorized),
        }

        let mut prescription = Self::get(env.clone(), prescription_id)?;
        if prescription.status != from || from.successor() != Some(to) {
            return Err(LedgerError::InvalidTransition);
        }

        let roster = RosterClient::new(&env, &Self::get_roster(env.clone())?);
        if !roster.satisfies(&actor, &requirement) {
            return Err(LedgerError::Unauthorized);
        }

        prescription.status = to;
        prescription.updated_at = env.ledger().timestamp();
        save_prescription(&env, &prescription);
        history::append(&env, prescription_id, from, to, &actor, &ledger);

        Ok(())
    }

    pub fn get(env: Env, prescription_id: u64) -> Result<Prescription, LedgerError> {
        env.storage()
            .persistent()
            .get(&rx_key(prescription_id))
            .ok_or(LedgerError::NotFound)
    }

    pub fn status(env: Env, prescription_id: u64) -> Result<PrescriptionStatus, LedgerError> {
        Self::get(env, prescription_id).map(|rx| rx.status)
    }

    pub fn history(env: Env, prescription_id: u64) -> Vec<TransitionRecord> {
        history::get(&env, prescription_id)
    }

    /// Recompute the transition hash chain of a prescription.
    pub fn verify_history(env: Env, prescription_id: u64) -> bool {
        history::verify(&env, prescription_id)
    }

    pub fn prescriptions_for_patient(env: Env, patient: Address) -> Vec<u64> {
        read_index(&env, (PAT_RX, patient))
    }

    pub fn prescriptions_by_doctor(env: Env, doctor: Address) -> Vec<u64> {
        read_index(&env, (DOC_RX, doctor))
    }

    pub fn prescription_count(env: Env) -> u64 {
        env.storage().instance().get(&RX_CTR).unwrap_or(0)
    }

    /// Halt `create` and `advance`. Reads keep working.
    pub fn pause(env: Env, caller: Address) -> Result<(), LedgerError> {
        Self::require_admin(&env, &caller)?;
        env.storage().instance().set(&PAUSED, &true);
        events::publish_paused(&env, caller, true);
        Ok(())
    }

    pub fn unpause(env: Env, caller: Address) -> Result<(), LedgerError> {
        Self::require_admin(&env, &caller)?;
        env.storage().instance().set(&PAUSED, &false);
        events::publish_paused(&env, caller, false);
        Ok(())
    }

    pub fn is_paused(env: Env) -> bool {
        env.storage().instance().get(&PAUSED).unwrap_or(false)
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    fn require_init(env: &Env) -> Result<(), LedgerError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(LedgerError::NotInitialized);
        }
        Ok(())
    }

    fn require_not_paused(env: &Env) -> Result<(), LedgerError> {
        if Self::is_paused(env.clone()) {
            return Err(LedgerError::Paused);
        }
        Ok(())
    }

    fn require_admin(env: &Env, caller: &Address) -> Result<(), LedgerError> {
        caller.require_auth();
        let admin = Self::get_admin(env.clone())?;
        if admin != *caller {
            return Err(LedgerError::Unauthorized);
        }
        Ok(())
    }
}
