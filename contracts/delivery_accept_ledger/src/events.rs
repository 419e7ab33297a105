#![allow(deprecated)] // events().publish migration tracked separately

use common::LifecycleEventKind;
use soroban_sdk::{contracttype, Address, Env};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DeliveryAcceptedEvent {
    pub id: u64,
    pub agent: Address,
    pub timestamp: u64,
}

pub fn publish_delivery_accepted(env: &Env, id: u64, agent: Address) {
    let topics = (LifecycleEventKind::DeliveryAccepted.topic(), id);
    let data = DeliveryAcceptedEvent {
        id,
        agent,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}
