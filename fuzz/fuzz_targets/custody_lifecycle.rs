#![no_main]

use arbitrary::Arbitrary;
use common::{
    reconstruct, AccessEntry, LifecycleEvent, LifecycleEventKind, PrescriptionStatus, Role,
    RoleRequirement,
};
use delivery_accept_ledger::{DeliveryAcceptLedgerContract, DeliveryAcceptLedgerContractClient};
use delivery_confirmation_ledger::{
    DeliveryConfirmationLedgerContract, DeliveryConfirmationLedgerContractClient,
};
use dispense_ledger::{DispenseLedgerContract, DispenseLedgerContractClient};
use identity_roster::{IdentityRosterContract, IdentityRosterContractClient};
use libfuzzer_sys::fuzz_target;
use logistics_accept_ledger::{LogisticsAcceptLedgerContract, LogisticsAcceptLedgerContractClient};
use logistics_receive_ledger::{
    LogisticsReceiveLedgerContract, LogisticsReceiveLedgerContractClient,
};
use prescription_registry::{PrescriptionRegistryContract, PrescriptionRegistryContractClient};
use soroban_sdk::{
    testutils::{Address as _, Events as _, Ledger as _},
    xdr, Address, Env, String, Symbol, TryFromVal, Vec as SorobanVec,
};

/// Every custody write plus time advancement. `who` picks from the actor pool
/// and `rx` from the prescriptions issued so far, both modulo their length.
#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Create { who: u8, patient: u8 },
    Dispense { rx: u8, who: u8 },
    AcceptDelivery { rx: u8, who: u8 },
    Receive { rx: u8, who: u8 },
    AcceptLogistics { rx: u8, who: u8 },
    Confirm { rx: u8, who: u8 },
    Register { who: u8, role: u8 },
    AdvanceTime { delta: u16 },
}

#[derive(Arbitrary, Debug)]
pub struct FuzzInput {
    open_agents: bool,
    actions: Vec<FuzzAction>,
}

const ROLES: [Role; 5] = [
    Role::Admin,
    Role::Doctor,
    Role::Pharmacy,
    Role::Logistics,
    Role::Patient,
];

fuzz_target!(|input: FuzzInput| {
    let env = Env::default();
    env.mock_all_auths();

    // Pool: admin, doctor, pharmacy, courier and patient are seeded; the
    // last three start unregistered.
    let users: Vec<Address> = (0..8).map(|_| Address::generate(&env)).collect();
    let admin = users[0].clone();

    let mut seeds = SorobanVec::new(&env);
    for (user, role) in users.iter().zip(ROLES.iter()) {
        seeds.push_back(AccessEntry {
            identity: user.clone(),
            role: *role,
            access_id: String::from_str(&env, "seed"),
        });
    }

    let roster_id = env.register(IdentityRosterContract, ());
    let roster = IdentityRosterContractClient::new(&env, &roster_id);
    roster.initialize(&seeds);

    let registry_id = env.register(PrescriptionRegistryContract, ());
    let registry = PrescriptionRegistryContractClient::new(&env, &registry_id);
    registry.initialize(&admin, &roster_id);

    let agent_requirement = if input.open_agents {
        RoleRequirement::AnyRegistered
    } else {
        RoleRequirement::Exactly(Role::Logistics)
    };

    let dispense_id = env.register(DispenseLedgerContract, ());
    let dispense = DispenseLedgerContractClient::new(&env, &dispense_id);
    dispense.initialize(&admin, &registry_id, &roster_id);

    let accept_id = env.register(DeliveryAcceptLedgerContract, ());
    let accept = DeliveryAcceptLedgerContractClient::new(&env, &accept_id);
    accept.initialize(&admin, &registry_id, &roster_id, &agent_requirement);

    let receive_id = env.register(LogisticsReceiveLedgerContract, ());
    let receive = LogisticsReceiveLedgerContractClient::new(&env, &receive_id);
    receive.initialize(&admin, &registry_id, &roster_id, &accept_id);

    let handover_id = env.register(LogisticsAcceptLedgerContract, ());
    let handover = LogisticsAcceptLedgerContractClient::new(&env, &handover_id);
    let mut allowed = SorobanVec::new(&env);
    allowed.push_back(users[3].clone());
    allowed.push_back(users[6].clone());
    handover.initialize(&admin, &registry_id, &roster_id, &allowed);

    let confirm_id = env.register(DeliveryConfirmationLedgerContract, ());
    let confirm = DeliveryConfirmationLedgerContractClient::new(&env, &confirm_id);
    confirm.initialize(&admin, &registry_id, &roster_id);

    registry.bind_ledger(&admin, &PrescriptionStatus::Dispensed, &dispense_id);
    registry.bind_ledger(&admin, &PrescriptionStatus::DeliveryAccepted, &accept_id);
    registry.bind_ledger(&admin, &PrescriptionStatus::LogisticsReceived, &receive_id);
    registry.bind_ledger(&admin, &PrescriptionStatus::LogisticsAccepted, &handover_id);
    registry.bind_ledger(&admin, &PrescriptionStatus::Delivered, &confirm_id);

    let payload = String::from_str(&env, "rx:fuzz");
    let pick = |i: u8| &users[i as usize % users.len()];
    let mut issued: Vec<u64> = Vec::new();
    let mut shadow: SorobanVec<LifecycleEvent> = SorobanVec::new(&env);

    for action in input.actions.into_iter().take(64) {
        match action {
            FuzzAction::Create { who, patient } => {
                if let Ok(Ok(id)) = registry.try_create(pick(who), pick(patient), &payload) {
                    issued.push(id);
                }
                record_published(&env, &mut shadow);
            }
            FuzzAction::Dispense { rx, who } => {
                let id = target_id(&issued, rx);
                let _ = dispense.try_record_dispense(&id, pick(who));
                record_published(&env, &mut shadow);
            }
            FuzzAction::AcceptDelivery { rx, who } => {
                let id = target_id(&issued, rx);
                let _ = accept.try_record_accept(&id, pick(who));
                record_published(&env, &mut shadow);
            }
            FuzzAction::Receive { rx, who } => {
                let id = target_id(&issued, rx);
                let _ = receive.try_record_receive(&id, pick(who));
                record_published(&env, &mut shadow);
            }
            FuzzAction::AcceptLogistics { rx, who } => {
                let id = target_id(&issued, rx);
                let _ = handover.try_record_logistics_accept(&id, pick(who));
                record_published(&env, &mut shadow);
            }
            FuzzAction::Confirm { rx, who } => {
                let id = target_id(&issued, rx);
                let _ = confirm.try_record_confirmation(&id, pick(who));
                record_published(&env, &mut shadow);
            }
            FuzzAction::Register { who, role } => {
                let role = ROLES[role as usize % ROLES.len()];
                let _ = roster.try_register(&admin, pick(who), &role, &payload);
            }
            FuzzAction::AdvanceTime { delta } => {
                let ts = env.ledger().timestamp().saturating_add(delta as u64);
                env.ledger().set_timestamp(ts);
            }
        }

        // ── Post-action invariant checks ──
        for id in issued.iter() {
            let rx = registry.get(id);
            let reached = rx.status.ordinal();
            let history = registry.history(id);
            assert_eq!(history.len(), reached, "INVARIANT VIOLATION: history length");
            assert!(registry.verify_history(id), "INVARIANT VIOLATION: hash chain");

            let recorded = [
                dispense.has_record(id),
                accept.has_record(id),
                receive.has_record(id),
                handover.has_record(id),
                confirm.has_record(id),
            ];
            for (stage, present) in recorded.iter().enumerate() {
                assert_eq!(
                    *present,
                    (stage as u32) < reached,
                    "INVARIANT VIOLATION: record/status mismatch"
                );
            }

            if let Some(done) = confirm.get_record(id) {
                assert_eq!(done.actor, rx.patient, "INVARIANT VIOLATION: foreign confirmation");
            }
            if let (Some(accepted), Some(received)) =
                (accept.get_record(id), receive.get_record(id))
            {
                assert_eq!(
                    received.delivery_accept_ref, accepted.record_id,
                    "INVARIANT VIOLATION: receive references wrong accept record"
                );
            }
        }

        let replayed = reconstruct(&env, &shadow).expect("published events always replay");
        for id in issued.iter() {
            assert_eq!(
                replayed.get(*id),
                Some(registry.get(id).status),
                "INVARIANT VIOLATION: replay diverges from registry"
            );
        }
    }
});

fn target_id(issued: &[u64], rx: u8) -> u64 {
    if issued.is_empty() {
        1
    } else {
        issued[rx as usize % issued.len()]
    }
}

/// Appends the lifecycle events the last invocation published. A rejected
/// write publishes nothing.
fn record_published(env: &Env, shadow: &mut SorobanVec<LifecycleEvent>) {
    for event in env.events().all().events() {
        let xdr::ContractEventBody::V0(body) = &event.body;
        let Some(Ok(topic)) = body.topics.first().map(|t| Symbol::try_from_val(env, t)) else {
            continue;
        };
        let (Some(kind), Some(xdr::ScVal::U64(id))) =
            (LifecycleEventKind::from_topic(&topic), body.topics.get(1))
        else {
            continue;
        };
        shadow.push_back(LifecycleEvent {
            prescription_id: *id,
            kind,
        });
    }
}
