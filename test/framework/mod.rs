//! # Custody Contract Testing Framework
//!
//! A reusable harness for the prescription custody contracts supporting
//! property-based testing, invariant checking, state exploration, and a
//! declarative scenario DSL.
//!
//! ## Architecture
//!
//! ```text
//! test/framework/
//! ├── mod.rs             — TestEnv, CustodyHarness, snapshots, re-exports
//! ├── generators.rs      — proptest strategies for custody actions
//! ├── invariants.rs      — cross-contract invariants & verification
//! ├── state_explorer.rs  — action-sequence exploration
//! └── scenario_dsl.rs    — Given-When-Then scenario builder
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use test_framework::CustodyHarness;
//!
//! let harness = CustodyHarness::new();
//! let id = harness.create();
//! harness.deliver(id);
//! assert_eq!(harness.status(id), PrescriptionStatus::Delivered);
//! ```

extern crate std;

pub mod state_explorer;

use core::cell::RefCell;
use core::fmt::Debug;

use common::{
    reconstruct, AccessEntry, LedgerError, LifecycleEvent, LifecycleEventKind, PrescriptionStatus,
    ReceiveRecord, Role, RoleRequirement, StageRecord,
};
use delivery_accept_ledger::{DeliveryAcceptLedgerContract, DeliveryAcceptLedgerContractClient};
use delivery_confirmation_ledger::{
    DeliveryConfirmationLedgerContract, DeliveryConfirmationLedgerContractClient,
};
use dispense_ledger::{DispenseLedgerContract, DispenseLedgerContractClient};
use identity_roster::{IdentityRosterContract, IdentityRosterContractClient};
use logistics_accept_ledger::{LogisticsAcceptLedgerContract, LogisticsAcceptLedgerContractClient};
use logistics_receive_ledger::{
    LogisticsReceiveLedgerContract, LogisticsReceiveLedgerContractClient,
};
use prescription_registry::{PrescriptionRegistryContract, PrescriptionRegistryContractClient};
use soroban_sdk::{
    testutils::{Address as _, Events as _, Ledger as _},
    vec, xdr, Address, Env, String, Symbol, TryFromVal, Val, Vec,
};

// ── Core Test Environment ────────────────────────────────────────────────────

/// A high-level test environment that wraps the Soroban `Env` and provides
/// time control and address management.
pub struct TestEnv {
    pub env: Env,
    generated_addresses: std::vec::Vec<Address>,
}

impl TestEnv {
    /// Create a new test environment with all auth mocked.
    pub fn new() -> Self {
        let env = Env::default();
        env.mock_all_auths();
        Self {
            env,
            generated_addresses: std::vec::Vec::new(),
        }
    }

    /// Generate a fresh Soroban address (cached for re-use).
    pub fn generate_address(&mut self) -> Address {
        let addr = Address::generate(&self.env);
        self.generated_addresses.push(addr.clone());
        addr
    }

    /// Generate `n` distinct addresses.
    pub fn generate_addresses(&mut self, n: usize) -> std::vec::Vec<Address> {
        (0..n).map(|_| self.generate_address()).collect()
    }

    /// Set the ledger timestamp.
    pub fn set_timestamp(&self, ts: u64) {
        self.env.ledger().set_timestamp(ts);
    }

    /// Advance the ledger timestamp by `delta` seconds.
    pub fn advance_time(&self, delta: u64) {
        let current = self.env.ledger().timestamp();
        self.env.ledger().set_timestamp(current.saturating_add(delta));
    }

    /// Current ledger timestamp.
    pub fn timestamp(&self) -> u64 {
        self.env.ledger().timestamp()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

// ── Participants ─────────────────────────────────────────────────────────────

/// The identities a [`CustodyHarness`] wires into its roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Participant {
    Admin,
    Doctor,
    Patient,
    /// A second patient, never named on harness-created prescriptions.
    OtherPatient,
    Pharmacy,
    /// Logistics provider on the logistics-accept allow-list.
    Courier,
    /// Logistics provider left off the allow-list.
    UnlistedCourier,
    /// Never registered in the roster.
    Stranger,
}

impl Participant {
    pub const ALL: [Participant; 8] = [
        Participant::Admin,
        Participant::Doctor,
        Participant::Patient,
        Participant::OtherPatient,
        Participant::Pharmacy,
        Participant::Courier,
        Participant::UnlistedCourier,
        Participant::Stranger,
    ];

    /// Roster role, if the participant is registered.
    pub fn role(&self) -> Option<Role> {
        match self {
            Participant::Admin => Some(Role::Admin),
            Participant::Doctor => Some(Role::Doctor),
            Participant::Patient | Participant::OtherPatient => Some(Role::Patient),
            Participant::Pharmacy => Some(Role::Pharmacy),
            Participant::Courier | Participant::UnlistedCourier => Some(Role::Logistics),
            Participant::Stranger => None,
        }
    }
}

/// Collapse a `try_*` client result into the contract's own error.
///
/// Host and conversion failures are never part of the custody contract
/// surface, so they abort the test.
pub fn settle<T, C: Debug, I: Debug>(
    result: Result<Result<T, C>, Result<LedgerError, I>>,
) -> Result<T, LedgerError> {
    match result {
        Ok(Ok(value)) => Ok(value),
        Err(Ok(error)) => Err(error),
        Ok(Err(conversion)) => panic!("return value failed to convert: {:?}", conversion),
        Err(Err(host)) => panic!("host error outside the contract surface: {:?}", host),
    }
}

// ── Published Events ─────────────────────────────────────────────────────────

/// A contract event decoded far enough to route it.
#[derive(Debug, Clone)]
pub struct PublishedEvent {
    /// Leading topic symbol.
    pub topic: Symbol,
    /// Second topic, when it is a prescription id.
    pub prescription_id: Option<u64>,
    pub data: Val,
}

impl PublishedEvent {
    /// Decode the event payload into its typed struct.
    pub fn payload<T: TryFromVal<Env, Val>>(&self, env: &Env) -> Option<T> {
        T::try_from_val(env, &self.data).ok()
    }

    /// Lifecycle event carried by this contract event, if any.
    pub fn lifecycle(&self) -> Option<LifecycleEvent> {
        let kind = LifecycleEventKind::from_topic(&self.topic)?;
        Some(LifecycleEvent {
            prescription_id: self.prescription_id?,
            kind,
        })
    }
}

/// Contract events published by the last top-level invocation. Empty when
/// that invocation failed.
pub fn published_events(env: &Env) -> std::vec::Vec<PublishedEvent> {
    env.events()
        .all()
        .events()
        .iter()
        .filter_map(|event| decode_event(env, event))
        .collect()
}

fn decode_event(env: &Env, event: &xdr::ContractEvent) -> Option<PublishedEvent> {
    let xdr::ContractEventBody::V0(body) = &event.body;
    let topic = Symbol::try_from_val(env, body.topics.first()?).ok()?;
    let prescription_id = match body.topics.get(1) {
        Some(xdr::ScVal::U64(id)) => Some(*id),
        _ => None,
    };
    let data = Val::try_from_val(env, &body.data).ok()?;
    Some(PublishedEvent {
        topic,
        prescription_id,
        data,
    })
}

// ── Custody Harness ──────────────────────────────────────────────────────────

/// All seven custody contracts deployed, initialized, and wired together.
///
/// After every write made through the harness, the events the contracts
/// published are captured. Lifecycle events accumulate into a log that tests
/// replay with [`common::reconstruct`].
pub struct CustodyHarness {
    pub env: TestEnv,
    pub roster: IdentityRosterContractClient<'static>,
    pub registry: PrescriptionRegistryContractClient<'static>,
    pub dispense: DispenseLedgerContractClient<'static>,
    pub delivery_accept: DeliveryAcceptLedgerContractClient<'static>,
    pub logistics_receive: LogisticsReceiveLedgerContractClient<'static>,
    pub logistics_accept: LogisticsAcceptLedgerContractClient<'static>,
    pub confirmation: DeliveryConfirmationLedgerContractClient<'static>,
    pub admin: Address,
    pub doctor: Address,
    pub patient: Address,
    pub other_patient: Address,
    pub pharmacy: Address,
    pub courier: Address,
    pub unlisted_courier: Address,
    pub stranger: Address,
    event_log: RefCell<std::vec::Vec<LifecycleEvent>>,
    last_published: RefCell<std::vec::Vec<PublishedEvent>>,
}

impl CustodyHarness {
    /// Deploy with any registered identity accepted as a delivery agent.
    pub fn new() -> Self {
        Self::with_agent_requirement(RoleRequirement::AnyRegistered)
    }

    pub fn with_agent_requirement(agent_requirement: RoleRequirement) -> Self {
        let mut env = TestEnv::new();
        let admin = env.generate_address();
        let doctor = env.generate_address();
        let patient = env.generate_address();
        let other_patient = env.generate_address();
        let pharmacy = env.generate_address();
        let courier = env.generate_address();
        let unlisted_courier = env.generate_address();
        let stranger = env.generate_address();

        let e = env.env.clone();
        let entry = |identity: &Address, role: Role, access_id: &str| AccessEntry {
            identity: identity.clone(),
            role,
            access_id: String::from_str(&e, access_id),
        };

        let roster_id = e.register(IdentityRosterContract, ());
        let roster = IdentityRosterContractClient::new(&e, &roster_id);
        roster.initialize(&vec![
            &e,
            entry(&admin, Role::Admin, "ADM-001"),
            entry(&doctor, Role::Doctor, "MD-4471"),
            entry(&patient, Role::Patient, "PT-0192"),
            entry(&other_patient, Role::Patient, "PT-0193"),
            entry(&pharmacy, Role::Pharmacy, "PH-310"),
            entry(&courier, Role::Logistics, "LG-77"),
            entry(&unlisted_courier, Role::Logistics, "LG-78"),
        ]);

        let registry_id = e.register(PrescriptionRegistryContract, ());
        let registry = PrescriptionRegistryContractClient::new(&e, &registry_id);
        registry.initialize(&admin, &roster_id);

        let dispense_id = e.register(DispenseLedgerContract, ());
        let dispense = DispenseLedgerContractClient::new(&e, &dispense_id);
        dispense.initialize(&admin, &registry_id, &roster_id);

        let delivery_accept_id = e.register(DeliveryAcceptLedgerContract, ());
        let delivery_accept = DeliveryAcceptLedgerContractClient::new(&e, &delivery_accept_id);
        delivery_accept.initialize(&admin, &registry_id, &roster_id, &agent_requirement);

        let logistics_receive_id = e.register(LogisticsReceiveLedgerContract, ());
        let logistics_receive =
            LogisticsReceiveLedgerContractClient::new(&e, &logistics_receive_id);
        logistics_receive.initialize(&admin, &registry_id, &roster_id, &delivery_accept_id);

        let logistics_accept_id = e.register(LogisticsAcceptLedgerContract, ());
        let logistics_accept = LogisticsAcceptLedgerContractClient::new(&e, &logistics_accept_id);
        logistics_accept.initialize(
            &admin,
            &registry_id,
            &roster_id,
            &vec![&e, courier.clone()],
        );

        let confirmation_id = e.register(DeliveryConfirmationLedgerContract, ());
        let confirmation = DeliveryConfirmationLedgerContractClient::new(&e, &confirmation_id);
        confirmation.initialize(&admin, &registry_id, &roster_id);

        for (stage, ledger) in [
            (PrescriptionStatus::Dispensed, &dispense_id),
            (PrescriptionStatus::DeliveryAccepted, &delivery_accept_id),
            (PrescriptionStatus::LogisticsReceived, &logistics_receive_id),
            (PrescriptionStatus::LogisticsAccepted, &logistics_accept_id),
            (PrescriptionStatus::Delivered, &confirmation_id),
        ] {
            registry.bind_ledger(&admin, &stage, ledger);
        }

        Self {
            env,
            roster,
            registry,
            dispense,
            delivery_accept,
            logistics_receive,
            logistics_accept,
            confirmation,
            admin,
            doctor,
            patient,
            other_patient,
            pharmacy,
            courier,
            unlisted_courier,
            stranger,
            event_log: RefCell::new(std::vec::Vec::new()),
            last_published: RefCell::new(std::vec::Vec::new()),
        }
    }

    pub fn address_of(&self, participant: Participant) -> Address {
        match participant {
            Participant::Admin => self.admin.clone(),
            Participant::Doctor => self.doctor.clone(),
            Participant::Patient => self.patient.clone(),
            Participant::OtherPatient => self.other_patient.clone(),
            Participant::Pharmacy => self.pharmacy.clone(),
            Participant::Courier => self.courier.clone(),
            Participant::UnlistedCourier => self.unlisted_courier.clone(),
            Participant::Stranger => self.stranger.clone(),
        }
    }

    /// Record what the write that just ran published.
    fn captured<T>(&self, result: Result<T, LedgerError>) -> Result<T, LedgerError> {
        let published = published_events(&self.env.env);
        self.event_log
            .borrow_mut()
            .extend(published.iter().filter_map(PublishedEvent::lifecycle));
        *self.last_published.borrow_mut() = published;
        result
    }

    // ── Writes ───────────────────────────────────────────────────────────────

    pub fn try_create(
        &self,
        doctor: &Address,
        patient: &Address,
        payload: &str,
    ) -> Result<u64, LedgerError> {
        let payload = String::from_str(&self.env.env, payload);
        let result = settle(self.registry.try_create(doctor, patient, &payload));
        self.captured(result)
    }

    /// Issue a prescription from the harness doctor to the harness patient.
    pub fn create(&self) -> u64 {
        match self.try_create(&self.doctor, &self.patient, "rx:amoxicillin-500mg-x21") {
            Ok(id) => id,
            Err(e) => panic!("create failed: {:?}", e),
        }
    }

    pub fn dispense(&self, id: u64, actor: &Address) -> Result<u64, LedgerError> {
        let result = settle(self.dispense.try_record_dispense(&id, actor));
        self.captured(result)
    }

    pub fn accept_delivery(&self, id: u64, actor: &Address) -> Result<u64, LedgerError> {
        let result = settle(self.delivery_accept.try_record_accept(&id, actor));
        self.captured(result)
    }

    pub fn receive(&self, id: u64, actor: &Address) -> Result<u64, LedgerError> {
        let result = settle(self.logistics_receive.try_record_receive(&id, actor));
        self.captured(result)
    }

    pub fn accept_logistics(&self, id: u64, actor: &Address) -> Result<u64, LedgerError> {
        let result = settle(self.logistics_accept.try_record_logistics_accept(&id, actor));
        self.captured(result)
    }

    pub fn confirm(&self, id: u64, actor: &Address) -> Result<u64, LedgerError> {
        let result = settle(self.confirmation.try_record_confirmation(&id, actor));
        self.captured(result)
    }

    /// Run the stage that follows the current status with the participant
    /// who normally performs it.
    pub fn step(&self, id: u64) -> Result<u64, LedgerError> {
        match self.status(id).successor() {
            Some(PrescriptionStatus::Dispensed) => self.dispense(id, &self.pharmacy),
            Some(PrescriptionStatus::DeliveryAccepted) => self.accept_delivery(id, &self.courier),
            Some(PrescriptionStatus::LogisticsReceived) => self.receive(id, &self.courier),
            Some(PrescriptionStatus::LogisticsAccepted) => self.accept_logistics(id, &self.courier),
            Some(PrescriptionStatus::Delivered) => self.confirm(id, &self.patient),
            _ => Err(LedgerError::InvalidTransition),
        }
    }

    /// Advance `id` until it holds `target`. Panics if any stage fails.
    pub fn advance_to(&self, id: u64, target: PrescriptionStatus) {
        while self.status(id).ordinal() < target.ordinal() {
            if let Err(e) = self.step(id) {
                panic!("stage after {:?} failed: {:?}", self.status(id), e);
            }
        }
    }

    /// Walk `id` through every remaining stage.
    pub fn deliver(&self, id: u64) {
        self.advance_to(id, PrescriptionStatus::Delivered);
    }

    // ── Reads ────────────────────────────────────────────────────────────────

    pub fn status(&self, id: u64) -> PrescriptionStatus {
        self.registry.status(&id)
    }

    /// Lifecycle events the contracts published across all harness writes,
    /// in order.
    pub fn event_log(&self) -> std::vec::Vec<LifecycleEvent> {
        self.event_log.borrow().clone()
    }

    /// Every event published by the most recent harness write.
    pub fn last_published(&self) -> std::vec::Vec<PublishedEvent> {
        self.last_published.borrow().clone()
    }

    /// Replay the lifecycle log into per-prescription statuses.
    pub fn replay(&self) -> Result<std::vec::Vec<(u64, PrescriptionStatus)>, LedgerError> {
        let mut events = Vec::new(&self.env.env);
        for event in self.event_log.borrow().iter() {
            events.push_back(event.clone());
        }
        let statuses = reconstruct(&self.env.env, &events)?;
        Ok(statuses.iter().collect())
    }

    pub fn view(&self, id: u64) -> PrescriptionView {
        let prescription = self.registry.get(&id);
        PrescriptionView {
            id,
            patient: prescription.patient,
            status: prescription.status,
            history_len: self.registry.history(&id).len(),
            history_verifies: self.registry.verify_history(&id),
            dispense: self.dispense.get_record(&id),
            delivery_accept: self.delivery_accept.get_record(&id),
            logistics_receive: self.logistics_receive.get_record(&id),
            logistics_accept: self.logistics_accept.get_record(&id),
            confirmation: self.confirmation.get_record(&id),
        }
    }

    /// Snapshot of every prescription issued so far.
    pub fn snapshot(&self) -> CustodySnapshot {
        let count = self.registry.prescription_count();
        CustodySnapshot {
            timestamp: self.env.timestamp(),
            prescriptions: (1..=count).map(|id| self.view(id)).collect(),
            replayed: self.replay(),
        }
    }
}

impl Default for CustodyHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything the custody contracts hold about one prescription.
#[derive(Debug, Clone)]
pub struct PrescriptionView {
    pub id: u64,
    pub patient: Address,
    pub status: PrescriptionStatus,
    pub history_len: u32,
    pub history_verifies: bool,
    pub dispense: Option<StageRecord>,
    pub delivery_accept: Option<StageRecord>,
    pub logistics_receive: Option<ReceiveRecord>,
    pub logistics_accept: Option<StageRecord>,
    pub confirmation: Option<StageRecord>,
}

impl PrescriptionView {
    /// Which of the five stage ledgers hold a record, in stage order.
    pub fn recorded_stages(&self) -> [bool; 5] {
        [
            self.dispense.is_some(),
            self.delivery_accept.is_some(),
            self.logistics_receive.is_some(),
            self.logistics_accept.is_some(),
            self.confirmation.is_some(),
        ]
    }
}

/// Immutable snapshot of custody state at a point in time.
#[derive(Debug, Clone)]
pub struct CustodySnapshot {
    pub timestamp: u64,
    pub prescriptions: std::vec::Vec<PrescriptionView>,
    /// Statuses rebuilt from the harness event log.
    pub replayed: Result<std::vec::Vec<(u64, PrescriptionStatus)>, LedgerError>,
}

impl CustodySnapshot {
    pub fn status_of(&self, id: u64) -> Option<PrescriptionStatus> {
        self.prescriptions
            .iter()
            .find(|view| view.id == id)
            .map(|view| view.status)
    }
}

// ── Test Outcome Tracking ────────────────────────────────────────────────────

/// Result of a single test action, used by the state explorer and scenario DSL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The action succeeded.
    Ok,
    /// The contract rejected the action with this error.
    Rejected(LedgerError),
}

impl From<Result<u64, LedgerError>> for ActionOutcome {
    fn from(result: Result<u64, LedgerError>) -> Self {
        match result {
            Ok(_) => ActionOutcome::Ok,
            Err(e) => ActionOutcome::Rejected(e),
        }
    }
}

/// Summary of a test run with coverage metrics.
#[derive(Debug, Clone)]
pub struct TestRunSummary {
    pub actions_executed: usize,
    pub invariant_checks: usize,
    pub invariant_violations: std::vec::Vec<std::string::String>,
    pub entry_points_hit: std::collections::HashSet<std::string::String>,
    pub transitions_observed: usize,
}

impl TestRunSummary {
    pub fn new() -> Self {
        Self {
            actions_executed: 0,
            invariant_checks: 0,
            invariant_violations: std::vec::Vec::new(),
            entry_points_hit: std::collections::HashSet::new(),
            transitions_observed: 0,
        }
    }

    /// True when no invariant violations were detected.
    pub fn passed(&self) -> bool {
        self.invariant_violations.is_empty()
    }

    /// Coverage ratio: entry points hit / total known entry points.
    pub fn entry_point_coverage(&self, total_entry_points: usize) -> f64 {
        if total_entry_points == 0 {
            return 0.0;
        }
        self.entry_points_hit.len() as f64 / total_entry_points as f64
    }
}

impl Default for TestRunSummary {
    fn default() -> Self {
        Self::new()
    }
}
