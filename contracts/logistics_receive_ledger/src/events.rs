#![allow(deprecated)] // events().publish migration tracked separately

use common::LifecycleEventKind;
use soroban_sdk::{contracttype, Address, Env};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LogisticsReceivedEvent {
    pub id: u64,
    pub agent: Address,
    pub delivery_accept_ref: u64,
    pub timestamp: u64,
}

pub fn publish_logistics_received(env: &Env, id: u64, agent: Address, delivery_accept_ref: u64) {
    let topics = (LifecycleEventKind::LogisticsReceived.topic(), id);
    let data = LogisticsReceivedEvent {
        id,
        agent,
        delivery_accept_ref,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}
