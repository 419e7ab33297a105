#![allow(deprecated)] // events().publish migration tracked separately

use common::LifecycleEventKind;
use soroban_sdk::{contracttype, Address, Env};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DispensedEvent {
    pub id: u64,
    pub pharmacy: Address,
    pub timestamp: u64,
}

pub fn publish_dispensed(env: &Env, id: u64, pharmacy: Address) {
    let topics = (LifecycleEventKind::Dispensed.topic(), id);
    let data = DispensedEvent {
        id,
        pharmacy,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}
