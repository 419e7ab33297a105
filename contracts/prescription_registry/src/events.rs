//! Events published by the prescription registry.
//!
//! `PrescriptionCreated` opens every lifecycle in the event stream; the stage
//! ledgers publish the remaining lifecycle events themselves. Wiring and pause
//! events are administrative and carry no lifecycle meaning.

#![allow(deprecated)] // events().publish migration tracked separately

use common::{LifecycleEventKind, PrescriptionStatus};
use soroban_sdk::{contracttype, symbol_short, Address, Env};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub roster: Address,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PrescriptionCreatedEvent {
    pub id: u64,
    pub doctor: Address,
    pub patient: Address,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LedgerBoundEvent {
    pub stage: PrescriptionStatus,
    pub ledger: Address,
    pub timestamp: u64,
}

pub fn publish_initialized(env: &Env, admin: Address, roster: Address) {
    let topics = (symbol_short!("INIT"),);
    let data = InitializedEvent {
        admin,
        roster,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_prescription_created(env: &Env, id: u64, doctor: Address, patient: Address) {
    let topics = (LifecycleEventKind::Created.topic(), id);
    let data = PrescriptionCreatedEvent {
        id,
        doctor,
        patient,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_ledger_bound(env: &Env, stage: PrescriptionStatus, ledger: Address) {
    let topics = (symbol_short!("LDG_BIND"), ledger.clone());
    let data = LedgerBoundEvent {
        stage,
        ledger,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_paused(env: &Env, caller: Address, paused: bool) {
    let topic = if paused {
        symbol_short!("PAUSED")
    } else {
        symbol_short!("UNPAUSED")
    };
    env.events().publish((topic, caller), paused);
}
