#![allow(deprecated)] // events().publish migration tracked separately

use common::LifecycleEventKind;
use soroban_sdk::{contracttype, Address, Env};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DeliveryConfirmedEvent {
    pub id: u64,
    pub patient: Address,
    pub timestamp: u64,
}

pub fn publish_delivery_confirmed(env: &Env, id: u64, patient: Address) {
    let topics = (LifecycleEventKind::DeliveryConfirmed.topic(), id);
    let data = DeliveryConfirmedEvent {
        id,
        patient,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}
