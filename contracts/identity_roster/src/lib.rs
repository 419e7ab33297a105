//! # Identity Roster
//!
//! Maps each identity to exactly one [`Role`] plus an informational access id.
//! Every other custody contract authorizes its callers through
//! [`IdentityRosterContract::authorize`] or
//! [`IdentityRosterContract::satisfies`], both pure lookups.
//!
//! Bootstrap entries are seeded at `initialize` without a caller check; after
//! that only an `Admin` entry may register new identities. Registering an
//! identity twice is rejected with `AlreadyRegistered` and the existing entry
//! stays as it was.
//!
//! ## Storage keys
//!
//! - `INIT` (instance) → `bool`
//! - `MEMBERS` (instance) → `u32` number of entries
//! - `("ENTRY", identity)` (persistent) → [`AccessEntry`]
//! - `("ROLE_IDX", role)` (persistent) → `Vec<Address>`

#![no_std]

pub mod events;


use common::stage::{extend_instance_ttl, TTL_EXTEND_TO, TTL_THRESHOLD};
pub use common::{AccessEntry, LedgerError, Role, RoleRequirement};
use soroban_sdk::{contract, contractimpl, symbol_short, Address, Env, String, Symbol, Vec};

const INITIALIZED: Symbol = symbol_short!("INIT");
const MEMBERS: Symbol = symbol_short!("MEMBERS");
const ENTRY: Symbol = symbol_short!("ENTRY");
const ROLE_IDX: Symbol = symbol_short!("ROLE_IDX");

fn entry_key(identity: &Address) -> (Symbol, Address) {
    (ENTRY, identity.clone())
}

fn role_key(role: Role) -> (Symbol, Role) {
    (ROLE_IDX, role)
}

fn load_entry(env: &Env, identity: &Address) -> Option<AccessEntry> {
    env.storage().persistent().get(&entry_key(identity))
}

fn insert_entry(env: &Env, entry: &AccessEntry) -> Result<(), LedgerError> {
    let key = entry_key(&entry.identity);
    if env.storage().persistent().has(&key) {
        return Err(LedgerError::AlreadyRegistered);
    }
    env.storage().persistent().set(&key, entry);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);

    let idx_key = role_key(entry.role);
    let mut members: Vec<Address> = env
        .storage()
        .persistent()
        .get(&idx_key)
        .unwrap_or(Vec::new(env));
    members.push_back(entry.identity.clone());
    env.storage().persistent().set(&idx_key, &members);
    env.storage()
        .persistent()
        .extend_ttl(&idx_key, TTL_THRESHOLD, TTL_EXTEND_TO);

    let count: u32 = env.storage().instance().get(&MEMBERS).unwrap_or(0);
    env.storage().instance().set(&MEMBERS, &(count + 1));
    extend_instance_ttl(env);

    events::publish_user_registered(env, entry);
    Ok(())
}

#[contract]
pub struct IdentityRosterContract;

#[contractimpl]
impl IdentityRosterContract {
    /// Seed the roster. No caller check: this is the bootstrap step.
    pub fn initialize(env: Env, seeds: Vec<AccessEntry>) -> Result<(), LedgerError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(LedgerError::AlreadyInitialized);
        }
        env.storage().instance().set(&INITIALIZED, &true);

        for entry in seeds.iter() {
            insert_entry(&env, &entry)?;
        }
        extend_instance_ttl(&env);
        Ok(())
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    /// Register `identity` under `role`. `caller` must hold `Admin`.
    pub fn register(
        env: Env,
        caller: Address,
        identity: Address,
        role: Role,
        access_id: String,
    ) -> Result<(), LedgerError> {
        Self::require_init(&env)?;
        caller.require_auth();

        if !Self::authorize(env.clone(), caller, Role::Admin) {
            return Err(LedgerError::Unauthorized);
        }

        insert_entry(
            &env,
            &AccessEntry {
                identity,
                role,
                access_id,
            },
        )
    }

    /// True when `identity` holds exactly `role`.
    pub fn authorize(env: Env, identity: Address, role: Role) -> bool {
        Self::satisfies(env, identity, RoleRequirement::Exactly(role))
    }

    pub fn satisfies(env: Env, identity: Address, requirement: RoleRequirement) -> bool {
        match load_entry(&env, &identity) {
            Some(entry) => requirement.is_met_by(entry.role),
            None => false,
        }
    }

    pub fn is_registered(env: Env, identity: Address) -> bool {
        env.storage().persistent().has(&entry_key(&identity))
    }

    pub fn get_entry(env: Env, identity: Address) -> Result<AccessEntry, LedgerError> {
        load_entry(&env, &identity).ok_or(LedgerError::NotFound)
    }

    /// Identities holding `role`, in registration order.
    pub fn members(env: Env, role: Role) -> Vec<Address> {
        env.storage()
            .persistent()
            .get(&role_key(role))
            .unwrap_or(Vec::new(&env))
    }

    pub fn member_count(env: Env) -> u32 {
        env.storage().instance().get(&MEMBERS).unwrap_or(0)
    }

    fn require_init(env: &Env) -> Result<(), LedgerError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(LedgerError::NotInitialized);
        }
        Ok(())
    }
}
