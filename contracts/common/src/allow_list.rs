//! Fixed allow-lists supplied when a contract is initialized.
//!
//! Membership is stored per address so checks stay O(1); the member list is
//! kept alongside for enumeration.

use soroban_sdk::{symbol_short, Address, Env, Symbol, Vec};

use crate::stage::{extend_instance_ttl, TTL_EXTEND_TO, TTL_THRESHOLD};
use crate::LedgerError;

const AL_ADDR: Symbol = symbol_short!("AL_ADR");
const AL_LIST: Symbol = symbol_short!("AL_LST");

fn extend_member_ttl(env: &Env, key: &(Symbol, Address)) {
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Stores the allow-list. Empty lists and repeated addresses are rejected.
pub fn seed(env: &Env, members: &Vec<Address>) -> Result<(), LedgerError> {
    if members.is_empty() {
        return Err(LedgerError::InvalidInput);
    }
    for member in members.iter() {
        let key = (AL_ADDR, member.clone());
        if env.storage().persistent().has(&key) {
            return Err(LedgerError::InvalidInput);
        }
        env.storage().persistent().set(&key, &true);
        extend_member_ttl(env, &key);
    }
    env.storage().instance().set(&AL_LIST, members);
    extend_instance_ttl(env);
    Ok(())
}

/// Returns whether `address` was on the list supplied at initialization.
pub fn contains(env: &Env, address: &Address) -> bool {
    env.storage()
        .persistent()
        .get(&(AL_ADDR, address.clone()))
        .unwrap_or(false)
}

/// Extends the TTL of a member's entry. Write paths only.
pub fn touch(env: &Env, address: &Address) {
    let key = (AL_ADDR, address.clone());
    if env.storage().persistent().has(&key) {
        extend_member_ttl(env, &key);
    }
}

pub fn members(env: &Env) -> Vec<Address> {
    env.storage()
        .instance()
        .get(&AL_LIST)
        .unwrap_or(Vec::new(env))
}
