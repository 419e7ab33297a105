//! # Dispense Ledger
//!
//! Records that a pharmacy dispensed a prescription, moving it from `Created`
//! to `Dispensed`. One record per prescription.

#![no_std]

pub mod events;


use common::stage::{self, LedgerConfig};
pub use common::{LedgerError, PrescriptionStatus, Role, RoleRequirement, StageRecord};
use soroban_sdk::{contract, contractimpl, Address, Env};

const STAGE: PrescriptionStatus = PrescriptionStatus::Dispensed;
const REQUIREMENT: RoleRequirement = RoleRequirement::Exactly(Role::Pharmacy);

#[contract]
pub struct DispenseLedgerContract;

#[contractimpl]
impl DispenseLedgerContract {
    pub fn initialize(
        env: Env,
        admin: Address,
        registry: Address,
        roster: Address,
    ) -> Result<(), LedgerError> {
        stage::initialize(
            &env,
            &LedgerConfig {
                admin,
                registry,
                roster,
            },
        )
    }

    /// Record that `pharmacy` dispensed `prescription_id`.
    pub fn record_dispense(
        env: Env,
        prescription_id: u64,
        pharmacy: Address,
    ) -> Result<u64, LedgerError> {
        let config = stage::config(&env)?;
        pharmacy.require_auth();
        stage::require_role(&env, &config.roster, &pharmacy, &REQUIREMENT)?;
        stage::open_stage(&env, &config, prescription_id, STAGE)?;

        stage::advance(&env, &config, prescription_id, STAGE, &pharmacy, &REQUIREMENT)?;

        let record = stage::stamp(&env, prescription_id, &pharmacy);
        stage::store_record(&env, prescription_id, &record);
        events::publish_dispensed(&env, prescription_id, pharmacy);
        Ok(record.record_id)
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
