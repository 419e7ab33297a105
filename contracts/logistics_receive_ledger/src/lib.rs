//! # Logistics Receive Ledger
//!
//! Records that a logistics provider took physical receipt of a prescription,
//! moving it from `DeliveryAccepted` to `LogisticsReceived`.
//!
//! Each record links back to the delivery-accept record it follows. That
//! record must exist once the status reads `DeliveryAccepted`; if the
//! delivery-accept ledger has no record the write fails with
//! `MissingPredecessor` and the inconsistency is logged.
//!
//! ## Storage keys
//!
//! - `DA_LEDGER` (instance) → delivery-accept ledger `Address`
//! - plus the shared stage keys (see `common::stage`)

#![no_std]

pub mod events;


use common::stage::{self, LedgerConfig};
use common::DeliveryAcceptClient;
pub use common::{LedgerError, PrescriptionStatus, ReceiveRecord, Role, RoleRequirement};
use soroban_sdk::{contract, contractimpl, log, symbol_short, Address, Env, Symbol};

const STAGE: PrescriptionStatus = PrescriptionStatus::LogisticsReceived;
const REQUIREMENT: RoleRequirement = RoleRequirement::Exactly(Role::Logistics);
const DA_LEDGER: Symbol = symbol_short!("DA_LEDGER");

#[contract]
pub struct LogisticsReceiveLedgerContract;

#[contractimpl]
impl LogisticsReceiveLedgerContract {
    pub fn initialize(
        env: Env,
        admin: Address,
        registry: Address,
        roster: Address,
        delivery_accept_ledger: Address,
    ) -> Result<(), LedgerError> {
        stage::initialize(
            &env,
            &LedgerConfig {
                admin,
                registry,
                roster,
            },
        )?;
        env.storage()
            .instance()
            .set(&DA_LEDGER, &delivery_accept_ledger);
        Ok(())
    }

    /// Record that logistics provider `agent` received `prescription_id`.
    pub fn record_receive(
        env: Env,
        prescription_id: u64,
        agent: Address,
    ) -> Result<u64, LedgerError> {
        let config = stage::config(&env)?;
        let accept_ledger = Self::get_delivery_accept_ledger(env.clone())?;
        agent.require_auth();
        stage::require_role(&env, &config.roster, &agent, &REQUIREMENT)?;
        stage::open_stage(&env, &config, prescription_id, STAGE)?;

        let accepted = DeliveryAcceptClient::new(&env, &accept_ledger);
        let Some(accept_record) = accepted.get_record(&prescription_id) else {
            log!(
                &env,
                "prescription {} is DeliveryAccepted but has no delivery-accept record",
                prescription_id
            );
            return Err(LedgerError::MissingPredecessor);
        };

        stage::advance(&env, &config, prescription_id, STAGE, &agent, &REQUIREMENT)?;

        let record = ReceiveRecord {
            record_id: stage::next_record_id(&env),
            prescription_id,
            actor: agent.clone(),
            delivery_accept_ref: accept_record.record_id,
            recorded_at: env.ledger().timestamp(),
        };
        stage::store_record(&env, prescription_id, &record);
        events::publish_logistics_received(
            &env,
            prescription_id,
            agent,
            record.delivery_accept_ref,
        );
        Ok(record.record_id)
    }

    pub fn get_delivery_accept_ledger(env: Env) -> Result<Address, LedgerError> {
        env.storage()
            .instance()
            .get(&DA_LEDGER)
            .ok_or(LedgerError::NotInitialized)
    }

    pub fn get_record(env: Env, prescription_id: u64) -> Option<ReceiveRecord> {
        stage::load_record(&env, prescription_id)
    }

    pub fn has_record(env: Env, prescription_id: u64) -> bool {
        stage::has_record(&env, prescription_id)
    }

    pub fn record_count(env: Env) -> u64 {
        stage::record_count(&env)
    }

    pub fn get_registry(env: Env) -> Result<Address, LedgerError> {
        stage::config(&env).map(|c| c.registry)
    }

    pub fn get_roster(env: Env) -> Result<Address, LedgerError> {
        stage::config(&env).map(|c| c.roster)
    }
}
