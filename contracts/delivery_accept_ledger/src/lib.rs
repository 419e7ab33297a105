//! # Delivery Accept Ledger
//!
//! Records that a delivery agent accepted a dispensed prescription for
//! delivery, moving it from `Dispensed` to `DeliveryAccepted`.
//!
//! Which identities count as a delivery agent is fixed at `initialize`: either
//! one exact role, or any registered identity. The logistics-receive ledger
//! reads these records back through [`DeliveryAcceptLedgerContract::get_record`].
//!
//! ## Storage keys
//!
//! - `AGENT_RQ` (instance) → [`RoleRequirement`]
//! - plus the shared stage keys (see `common::stage`)

#![no_std]

pub mod events;


use common::stage::{self, LedgerConfig};
pub use common::{LedgerError, PrescriptionStatus, Role, RoleRequirement, StageRecord};
use soroban_sdk::{contract, contractimpl, symbol_short, Address, Env, Symbol};

const STAGE: PrescriptionStatus = PrescriptionStatus::DeliveryAccepted;
const AGENT_REQ: Symbol = symbol_short!("AGENT_RQ");

#[contract]
pub struct DeliveryAcceptLedgerContract;

#[contractimpl]
impl DeliveryAcceptLedgerContract {
    pub fn initialize(
        env: Env,
        admin: Address,
        registry: Address,
        roster: Address,
        agent_requirement: RoleRequirement,
    ) -> Result<(), LedgerError> {
        stage::initialize(
            &env,
            &LedgerConfig {
                admin,
                registry,
                roster,
            },
        )?;
        env.storage().instance().set(&AGENT_REQ, &agent_requirement);
        Ok(())
    }

    /// Record that `agent` accepted `prescription_id` for delivery.
    pub fn record_accept(
        env: Env,
        prescription_id: u64,
        agent: Address,
    ) -> Result<u64, LedgerError> {
        let config = stage::config(&env)?;
        let requirement = Self::agent_requirement(env.clone())?;
        agent.require_auth();
        stage::require_role(&env, &config.roster, &agent, &requirement)?;
        stage::open_stage(&env, &config, prescription_id, STAGE)?;

        stage::advance(&env, &config, prescription_id, STAGE, &agent, &requirement)?;

        let record = stage::stamp(&env, prescription_id, &agent);
        stage::store_record(&env, prescription_id, &record);
        events::publish_delivery_accepted(&env, prescription_id, agent);
        Ok(record.record_id)
    }

    pub fn agent_requirement(env: Env) -> Result<RoleRequirement, LedgerError> {
        env.storage()
            .instance()
            .get(&AGENT_REQ)
            .ok_or(LedgerError::NotInitialized)
    }

    pub fn get_record(env: Env, prescription_id: u64) -> Option<StageRecord> {
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
