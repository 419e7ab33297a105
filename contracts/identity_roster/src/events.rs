#![allow(deprecated)] // events().publish migration tracked separately

use common::{AccessEntry, Role};
use soroban_sdk::{contracttype, symbol_short, Address, Env, String};

/// Event published when an identity joins the roster.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserRegisteredEvent {
    pub identity: Address,
    pub role: Role,
    pub access_id: String,
    pub timestamp: u64,
}

pub fn publish_user_registered(env: &Env, entry: &AccessEntry) {
    let topics = (symbol_short!("USR_REG"), entry.identity.clone());
    let data = UserRegisteredEvent {
        identity: entry.identity.clone(),
        role: entry.role,
        access_id: entry.access_id.clone(),
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}
