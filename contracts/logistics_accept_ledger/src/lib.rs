//! # Logistics Accept Ledger
//!
//! Records that an approved logistics provider accepted a received
//! prescription for final-leg delivery, moving it from `LogisticsReceived` to
//! `LogisticsAccepted`.
//!
//! Acting identities need the `Logistics` role **and** a place on the
//! allow-list fixed at `initialize`. The list cannot change afterwards.

#![no_std]

pub mod events;


use common::allow_list;
use common::stage::{self, LedgerConfig};
pub use common::{LedgerError, PrescriptionStatus, Role, RoleRequirement, StageRecord};
use soroban_sdk::{contract, contractimpl, Address, Env, Vec};

const STAGE: PrescriptionStatus = PrescriptionStatus::LogisticsAccepted;
const REQUIREMENT: RoleRequirement = RoleRequirement::Exactly(Role::Logistics);

#[contract]
pub struct LogisticsAcceptLedgerContract;

#[contractimpl]
impl LogisticsAcceptLedgerContract {
    /// Wire the ledger and fix its allow-list. `allowed` must be non-empty
    /// and free of repeats.
    pub fn initialize(
        env: Env,
        admin: Address,
        registry: Address,
        roster: Address,
        allowed: Vec<Address>,
    ) -> Result<(), LedgerError> {
        stage::initialize(
            &env,
            &LedgerConfig {
                admin,
                registry,
                roster,
            },
        )?;
        allow_list::seed(&env, &allowed)
    }

    /// Record that `agent` accepted `prescription_id` for final delivery.
    pub fn record_logistics_accept(
        env: Env,
        prescription_id: u64,
        agent: Address,
    ) -> Result<u64, LedgerError> {
        let config = stage::config(&env)?;
        agent.require_auth();
        if !allow_list::contains(&env, &agent) {
            return Err(LedgerError::Unauthorized);
        }
        stage::require_role(&env, &config.roster, &agent, &REQUIREMENT)?;
        stage::open_stage(&env, &config, prescription_id, STAGE)?;

        stage::advance(&env, &config, prescription_id, STAGE, &agent, &REQUIREMENT)?;

        let record = stage::stamp(&env, prescription_id, &agent);
        stage::store_record(&env, prescription_id, &record);
        allow_list::touch(&env, &agent);
        events::publish_logistics_accepted(&env, prescription_id, agent);
        Ok(record.record_id)
    }

    pub fn is_allowed(env: Env, agent: Address) -> bool {
        allow_list::contains(&env, &agent)
    }

    pub fn allowed(env: Env) -> Vec<Address> {
        allow_list::members(&env)
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
