//! # Delivery Confirmation Ledger
//!
//! The patient named on a prescription confirms receipt, moving it from
//! `LogisticsAccepted` to the terminal `Delivered` status. Any other identity,
//! including another patient, is rejected.

#![no_std]

pub mod events;


use common::stage::{self, LedgerConfig};
pub use common::{LedgerError, PrescriptionStatus, Role, RoleRequirement, StageRecord};
use soroban_sdk::{contract, contractimpl, Address, Env};

const STAGE: PrescriptionStatus = PrescriptionStatus::Delivered;
const REQUIREMENT: RoleRequirement = RoleRequirement::Exactly(Role::Patient);

#[contract]
pub struct DeliveryConfirmationLedgerContract;

#[contractimpl]
impl DeliveryConfirmationLedgerContract {
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

    /// Record that `confirmer`, the prescription's patient, received it.
    pub fn record_confirmation(
        env: Env,
        prescription_id: u64,
        confirmer: Address,
    ) -> Result<u64, LedgerError> {
        let config = stage::config(&env)?;
        confirmer.require_auth();
        stage::require_role(&env, &config.roster, &confirmer, &REQUIREMENT)?;
        let prescription = stage::open_stage(&env, &config, prescription_id, STAGE)?;
        if prescription.patient != confirmer {
            return Err(LedgerError::Unauthorized);
        }

        stage::advance(&env, &config, prescription_id, STAGE, &confirmer, &REQUIREMENT)?;

        let record = stage::stamp(&env, prescription_id, &confirmer);
        stage::store_record(&env, prescription_id, &record);
        events::publish_delivery_confirmed(&env, prescription_id, confirmer);
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
